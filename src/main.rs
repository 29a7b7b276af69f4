use std::path::PathBuf;

use quadcanvas::{
    build_session, init_logging, Bounds, CanvasConfig, CanvasObject, DrawingObject, Point, Shape,
    BUILD_DATE, VERSION,
};

fn main() -> anyhow::Result<()> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = CanvasConfig::load_or_default(config_path.as_deref())?;

    init_logging(&config.logging)?;
    tracing::info!(version = VERSION, build_date = BUILD_DATE, "QuadCanvas starting");

    let mut session = build_session(&config)?;

    // A small scripted edit session: draw, move, select, undo.
    let mut ids = Vec::new();
    for i in 0..5 {
        let offset = i as f64 * 60.0;
        let id = session.allocate_id();
        let object = DrawingObject::new(id, Shape::rectangle(offset, offset, 50.0, 50.0));
        ids.push(session.create(object)?);
    }
    tracing::info!(
        objects = session.repository().len(),
        nodes = session.repository().index_stats().total_nodes,
        "shapes created"
    );

    if let Some(&first) = ids.first() {
        session.modify(first, "Move Object", |o| o.move_to(500.0, 500.0))?;
    }

    let visible = session.query(&Bounds::from_rect(0.0, 0.0, 400.0, 400.0));
    tracing::info!(count = visible.len(), "objects in viewport");

    let click = Point::new(525.0, 525.0);
    if let Some(id) = session.hit_test(&click).map(|o| o.id()) {
        session.select(id, false);
        tracing::info!(%id, "selected object under pointer");
    }

    if session.undo()? {
        tracing::info!(
            redo = ?session.history().redo_description(),
            hit = ?session.hit_test(&click).map(|o| o.id()),
            "undid last edit"
        );
    }

    Ok(())
}
