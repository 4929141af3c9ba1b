//! Vellum: an interactive vector scene engine.
//!
//! This crate re-exports the workspace members and installs logging.
//! Most callers want [`Editor`] together with a [`DrawBackend`]
//! implementation, a [`Document`] and settings from a [`VellumConfig`].

pub use engine_core;
pub use vellum_config;
pub use vellum_doc;
pub use vellum_editor;

pub use engine_core::{DisplayList, DrawBackend, Painter, Transform2D};
pub use vellum_config::VellumConfig;
pub use vellum_doc::{Document, NodeId, SceneNode};
pub use vellum_editor::{Editor, EditorMode, EditorSettings};

use tracing_subscriber::EnvFilter;

/// Install a formatting subscriber. `RUST_LOG` wins over `filter`; with
/// neither set the level is `info`. Calling this more than once is harmless.
pub fn init_logging(filter: Option<&str>) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter.unwrap_or("info")))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(env_filter).try_init();
}

/// Load `vellum.toml` (plus environment overrides), install logging from it
/// and open the document at `path`.
pub fn open_session<B: DrawBackend>(path: &std::path::Path) -> anyhow::Result<Editor<B>> {
    let config = VellumConfig::load();
    init_logging(config.logging.filter.as_deref());
    tracing::info!(path = %path.display(), "opening document");
    Editor::from_path(path, EditorSettings::from(&config))
}
