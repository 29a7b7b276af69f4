//! Reference canvas object: a named shape with cached bounds.

use serde::{Deserialize, Serialize};

use quadcanvas_core::{Bounds, CachedBounds, CanvasObject, ObjectId, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeType {
    Rectangle,
    Ellipse,
    Line,
    Polyline,
}

impl std::fmt::Display for ShapeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rectangle => write!(f, "Rectangle"),
            Self::Ellipse => write!(f, "Ellipse"),
            Self::Line => write!(f, "Line"),
            Self::Polyline => write!(f, "Polyline"),
        }
    }
}

/// Geometry of a drawing object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Rectangle {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Ellipse {
        center: Point,
        rx: f64,
        ry: f64,
    },
    Line {
        start: Point,
        end: Point,
    },
    Polyline {
        points: Vec<Point>,
    },
}

impl Shape {
    pub fn rectangle(x: f64, y: f64, width: f64, height: f64) -> Self {
        Shape::Rectangle {
            x,
            y,
            width,
            height,
        }
    }

    pub fn ellipse(center: Point, rx: f64, ry: f64) -> Self {
        Shape::Ellipse { center, rx, ry }
    }

    pub fn line(start: Point, end: Point) -> Self {
        Shape::Line { start, end }
    }

    pub fn polyline(points: Vec<Point>) -> Self {
        Shape::Polyline { points }
    }

    pub fn shape_type(&self) -> ShapeType {
        match self {
            Shape::Rectangle { .. } => ShapeType::Rectangle,
            Shape::Ellipse { .. } => ShapeType::Ellipse,
            Shape::Line { .. } => ShapeType::Line,
            Shape::Polyline { .. } => ShapeType::Polyline,
        }
    }

    /// Axis-aligned bounds of the geometry. An empty polyline collapses to
    /// the origin.
    pub fn bounds(&self) -> Bounds {
        match self {
            Shape::Rectangle {
                x,
                y,
                width,
                height,
            } => Bounds::from_rect(*x, *y, *width, *height),
            Shape::Ellipse { center, rx, ry } => {
                let (rx, ry) = (rx.abs(), ry.abs());
                Bounds::new(center.x - rx, center.y - ry, center.x + rx, center.y + ry)
            }
            Shape::Line { start, end } => Bounds::new(start.x, start.y, end.x, end.y),
            Shape::Polyline { points } => {
                Bounds::from_points(points).unwrap_or(Bounds::new(0.0, 0.0, 0.0, 0.0))
            }
        }
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        match self {
            Shape::Rectangle { x, y, .. } => {
                *x += dx;
                *y += dy;
            }
            Shape::Ellipse { center, .. } => *center = center.offset(dx, dy),
            Shape::Line { start, end } => {
                *start = start.offset(dx, dy);
                *end = end.offset(dx, dy);
            }
            Shape::Polyline { points } => {
                for p in points.iter_mut() {
                    *p = p.offset(dx, dy);
                }
            }
        }
    }

    /// Scales the geometry about `origin`.
    pub fn scale(&mut self, sx: f64, sy: f64, origin: Point) {
        let map = |p: Point| Point::new(origin.x + (p.x - origin.x) * sx, origin.y + (p.y - origin.y) * sy);
        match self {
            Shape::Rectangle {
                x,
                y,
                width,
                height,
            } => {
                let corner = map(Point::new(*x, *y));
                *x = corner.x;
                *y = corner.y;
                *width *= sx;
                *height *= sy;
            }
            Shape::Ellipse { center, rx, ry } => {
                *center = map(*center);
                *rx *= sx;
                *ry *= sy;
            }
            Shape::Line { start, end } => {
                *start = map(*start);
                *end = map(*end);
            }
            Shape::Polyline { points } => {
                for p in points.iter_mut() {
                    *p = map(*p);
                }
            }
        }
    }
}

/// Drawing object on the canvas.
///
/// Bounds are derived from the shape and cached; every mutator invalidates
/// the cache. After mutating a stored object, hand it back through
/// `Repository::update` (normally via a modify command).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawingObject {
    id: ObjectId,
    pub name: String,
    shape: Shape,
    #[serde(skip)]
    bounds_cache: CachedBounds,
}

impl DrawingObject {
    /// Creates a new drawing object named after its shape type.
    pub fn new(id: ObjectId, shape: Shape) -> Self {
        Self {
            id,
            name: shape.shape_type().to_string(),
            shape,
            bounds_cache: CachedBounds::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn shape_type(&self) -> ShapeType {
        self.shape.shape_type()
    }

    pub fn set_shape(&mut self, shape: Shape) {
        self.shape = shape;
        self.bounds_cache.invalidate();
    }

    /// Edits the shape in place.
    pub fn edit_shape(&mut self, edit: impl FnOnce(&mut Shape)) {
        edit(&mut self.shape);
        self.bounds_cache.invalidate();
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.edit_shape(|shape| shape.translate(dx, dy));
    }

    /// Moves the object so its bounds start at `(x, y)`.
    pub fn move_to(&mut self, x: f64, y: f64) {
        let bounds = self.bounds();
        self.translate(x - bounds.min_x, y - bounds.min_y);
    }

    pub fn scale(&mut self, sx: f64, sy: f64, origin: Point) {
        self.edit_shape(|shape| shape.scale(sx, sy, origin));
    }

    /// True when the cached bounds are current.
    pub fn bounds_cached(&self) -> bool {
        self.bounds_cache.is_valid()
    }
}

impl CanvasObject for DrawingObject {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn bounds(&self) -> Bounds {
        self.bounds_cache.get_or_compute(|| self.shape.bounds())
    }
}

impl PartialEq for DrawingObject {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.name == other.name && self.shape == other.shape
    }
}
