// SPDX-License-Identifier: GPL-3.0-only

//! Centralized application settings and constants.

use crate::geometry::{Size, Thickness};

/// Application ID in RDNN (reverse domain name notation) format.
pub const APP_ID: &str = "io.github.develop.Develop";

/// Initial window width before the launch mode is applied.
pub const DEFAULT_WIDTH: f32 = 1024.0;

/// Initial window height before the launch mode is applied.
pub const DEFAULT_HEIGHT: f32 = 768.0;

/// Smallest size the window may be resized to, in logical units.
pub const MIN_WINDOW_SIZE: Size = Size::new(500.0, 500.0);

/// Custom size used whenever compact overlay mode is requested.
pub const COMPACT_OVERLAY_SIZE: Size = MIN_WINDOW_SIZE;

/// Width at which the page margin grows from the narrow to the medium profile.
pub const MEDIUM_WIDTH_BREAKPOINT: f64 = 641.0;

/// Width at which the page margin grows from the medium to the wide profile.
pub const WIDE_WIDTH_BREAKPOINT: f64 = 1008.0;

/// Page margin for windows narrower than [`MEDIUM_WIDTH_BREAKPOINT`].
pub const NARROW_PAGE_MARGIN: Thickness = Thickness::page(12.0);

/// Page margin between the two breakpoints.
pub const MEDIUM_PAGE_MARGIN: Thickness = Thickness::page(24.0);

/// Page margin from [`WIDE_WIDTH_BREAKPOINT`] upwards.
pub const WIDE_PAGE_MARGIN: Thickness = Thickness::page(36.0);

/// Height of the client-drawn title bar.
pub const TITLE_BAR_HEIGHT: f64 = 40.0;

/// Width reserved for the window caption buttons (minimize, maximize, close).
pub const CAPTION_BUTTONS_WIDTH: f64 = 138.0;

/// Default tracing directive installed by the binary.
pub const DEFAULT_LOG_DIRECTIVE: &str = "develop=info";
