// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the view coordinator.

use thiserror::Error;

/// Result type for view coordination operations.
pub type ViewResult<T> = Result<T, ViewError>;

/// Result returned by a save-before-exit callback.
pub type CallbackResult = Result<(), Box<dyn std::error::Error>>;

/// Errors that can occur while coordinating the view.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ViewError {
    /// The platform failed to consolidate (close) the window.
    #[error("failed to consolidate the window: {0}")]
    Consolidate(String),
    /// A close callback returned an error or panicked.
    #[error("close callback failed: {0}")]
    CloseCallback(String),
    /// Configuration could not be loaded or stored.
    #[error("configuration error: {0}")]
    Config(String),
}
