//! # QuadCanvas
//!
//! Object storage for infinite 2D drawing canvases:
//! - Quadtree spatial index for hit testing and region queries
//! - Id-keyed object repository with paint order and selection
//! - Bounded linear undo/redo built from reversible commands
//!
//! ## Architecture
//!
//! QuadCanvas is organized as a workspace with multiple crates:
//!
//! 1. **quadcanvas-core** - Geometry, object identity, error types
//! 2. **quadcanvas-designer** - Spatial index, repository, commands, history
//! 3. **quadcanvas-settings** - Configuration files and validation
//! 4. **quadcanvas** - Logging setup and the demo binary

pub use quadcanvas_core::{Bounds, CanvasObject, Error, ObjectId, Point, Result};
pub use quadcanvas_designer::{
    CanvasCommand, CanvasSession, CommandHistory, DrawingObject, Repository, Shape, ShapeType,
    SpatialIndex,
};
pub use quadcanvas_settings::{CanvasConfig, LogFormat, LoggingSettings};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging from the logging section of the configuration
///
/// Sets up structured logging with:
/// - RUST_LOG environment variable support, falling back to `settings.level`
/// - Pretty or JSON console output
pub fn init_logging(settings: &LoggingSettings) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&settings.level)?,
    };

    match settings.format {
        LogFormat::Pretty => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stdout)
                .with_target(true)
                .with_level(true)
                .with_thread_ids(true)
                .with_thread_names(true)
                .with_line_number(true)
                .pretty();

            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stdout)
                .with_target(true)
                .with_level(true)
                .with_line_number(true)
                .json();

            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
    }

    Ok(())
}

/// Builds an empty editing session sized by `config`.
///
/// Validation failures come back as a [`quadcanvas_settings::ConfigError`].
pub fn build_session(config: &CanvasConfig) -> anyhow::Result<CanvasSession<DrawingObject>> {
    config.validate()?;

    let index = &config.index;
    let repository = Repository::with_world(index.world_bounds(), index.node_capacity, index.max_depth)?;
    let history = CommandHistory::new(config.history.max_history_size)?;

    tracing::debug!(
        capacity = index.node_capacity,
        max_depth = index.max_depth,
        max_history_size = config.history.max_history_size,
        "canvas session created"
    );
    Ok(CanvasSession::new(repository, history))
}
