//! Unified error type for internal composition.
//!
//! Nothing here escapes the public render surface: every entry point
//! degrades a failure to "emit nothing" and logs it. The umbrella type
//! exists so the assembly internals can use `?` across the host interfaces,
//! serialization, and templating.

use thiserror::Error;

use crowdstream_core::{CatalogError, OrderError, SessionError, SettingsError};

/// Internal error type for the tracking integration.
#[derive(Debug, Error)]
pub enum TrackingError {
    /// Settings store failed.
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// Session provider failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Order repository failed.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// Product catalog failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A payload failed to serialize.
    #[error("payload serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A script template failed to render.
    #[error("script template error: {0}")]
    Template(#[from] askama::Error),
}
