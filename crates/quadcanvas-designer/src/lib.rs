//! # QuadCanvas Designer
//!
//! Object storage, spatial queries and undo/redo for an infinite 2D canvas.
//!
//! ## Core Components
//!
//! - **Spatial Index**: quadtree from bounding boxes to object ids
//! - **Repository**: id-keyed objects, paint order and selection; sole owner
//!   of the spatial index
//! - **Commands / History**: reversible create, delete, modify and batch
//!   commands with bounded linear undo/redo
//! - **Queries**: hit testing and click selection seams
//! - **Session**: repository, history and id allocation bundled for a UI
//!
//! ## Architecture
//!
//! ```text
//! CanvasSession
//!   ├── CommandHistory (undo/redo of CanvasCommand)
//!   └── Repository
//!         ├── ShapeStore (objects + paint order)
//!         ├── SelectionManager
//!         └── SpatialIndex (quadtree)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use quadcanvas_designer::{CanvasSession, DrawingObject, Shape};
//! use quadcanvas_core::Point;
//!
//! let mut session: CanvasSession<DrawingObject> = CanvasSession::default();
//! let id = session.allocate_id();
//! session
//!     .create(DrawingObject::new(id, Shape::rectangle(0.0, 0.0, 50.0, 50.0)))
//!     .unwrap();
//! session.modify(id, "Move Object", |o| o.translate(100.0, 0.0)).unwrap();
//! assert!(session.hit_test(&Point::new(125.0, 25.0)).is_some());
//!
//! session.undo().unwrap();
//! assert!(session.hit_test(&Point::new(25.0, 25.0)).is_some());
//! ```

pub mod commands;
pub mod history;
pub mod model;
pub mod queries;
pub mod repository;
pub mod selection_manager;
pub mod session;
pub mod shape_store;
pub mod spatial_index;

pub use commands::{BatchCommand, CanvasCommand, CreateObject, DeleteObject, ModifyObject};
pub use history::CommandHistory;
pub use model::{DrawingObject, Shape, ShapeType};
pub use repository::{RemovedSlot, Repository};
pub use selection_manager::SelectionManager;
pub use session::CanvasSession;
pub use shape_store::ShapeStore;
pub use spatial_index::{SpatialIndex, SpatialIndexStats};
