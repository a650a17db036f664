//! Error types and result aliases.
//!
//! Two layers: [`DriverError`] for failures raised while interacting with the
//! remote page (some of which are transient and retried), and [`SyncError`]
//! for fatal failures that abort a run before reconciliation begins.

use thiserror::Error;

/// Errors raised by a UI driver while interacting with the remote page
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("failed to launch browser: {0}")]
    LaunchFailed(String),

    #[error("navigation failed: {0}")]
    NavigationFailed(String),

    /// The element handle no longer refers to a live DOM node
    #[error("stale element reference: {0}")]
    StaleElement(String),

    /// Another element swallowed the click (overlay, animation, re-render)
    #[error("click intercepted: {0}")]
    ClickIntercepted(String),

    #[error("timed out waiting for {0}")]
    WaitTimeout(String),

    #[error("element not found: {0}")]
    NotFound(String),

    #[error("interaction failed: {0}")]
    InteractionFailed(String),

    #[error("file upload failed: {0}")]
    UploadFailed(String),

    #[error("screenshot failed: {0}")]
    ScreenshotFailed(String),
}

impl DriverError {
    /// Whether a retry can be expected to clear the failure.
    ///
    /// Staleness, interception and wait timeouts resolve on their own as the
    /// page settles; everything else is either structural (the descriptor
    /// contract is broken) or fatal to the session.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::StaleElement(_) | Self::ClickIntercepted(_) | Self::WaitTimeout(_)
        )
    }
}

/// Fatal errors that abort a run before any reconciliation happens
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("dataset is missing required columns: {0}")]
    MissingColumns(String),

    #[error("failed to read dataset: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Driver(#[from] DriverError),
}

/// Result alias for fatal, run-aborting operations
pub type Result<T> = std::result::Result<T, SyncError>;

/// Result alias for individual UI driver operations
pub type DriverResult<T> = std::result::Result<T, DriverError>;
