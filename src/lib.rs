// SPDX-License-Identifier: GPL-3.0-only

//! Develop - view and window coordination for a desktop text editor
//!
//! This crate owns the primary editor window's lifecycle: how much margin the
//! page content gets, where the title bar leaves room for the caption buttons,
//! which presentation mode the window is in, how keyboard accelerators reach
//! the command layer, and how a close request waits for every
//! save-before-exit callback before the window goes away.
//!
//! # Architecture
//!
//! The platform window sits behind the [`platform::ViewPlatform`] trait. The
//! [`coordinator::ViewCoordinator`] composes the pure geometry resolvers, the
//! mode controller, the accelerator dispatcher and the close negotiator on
//! top of it. The COSMIC shell ([`app`] and [`shell`]) is one implementation
//! of the platform; tests drive the coordinator through an in-memory fake.
//!
//! Everything runs on the UI thread. Observers and close callbacks are plain
//! closures, so the coordinator is deliberately `!Send`.
//!
//! # Modules
//!
//! - `app`: COSMIC application model hosting the coordinator
//! - `app_settings`: Centralized application constants
//! - `close`: Close negotiation and the close-callback registry
//! - `config`: User configuration with cosmic_config persistence
//! - `coordinator`: The view coordinator and its published properties
//! - `error`: Error and result types
//! - `geometry`: Page margin and title-bar geometry
//! - `input`: Accelerator dispatch and modifier resolution
//! - `mode`: Presentation modes and the mode controller
//! - `notify`: Observer lists
//! - `platform`: The platform window seam
//! - `shell`: COSMIC implementation of the platform window

pub mod app;
pub mod app_settings;
pub mod close;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod geometry;
pub mod input;
pub mod mode;
pub mod notify;
pub mod platform;
pub mod shell;

pub use crate::coordinator::{ViewCoordinator, ViewProperties, ViewProperty};
pub use crate::error::{CallbackResult, ViewError, ViewResult};
pub use crate::mode::PresentationMode;

// ============================================================================
// Integration Tests
// ============================================================================
