// SPDX-License-Identifier: GPL-3.0-only

//! Geometry calculations for the page content and the window chrome.
//!
//! Both resolvers are pure: the page margin depends only on the window width,
//! and the chrome geometry depends only on the metrics the platform reports
//! for the title bar plus the current text flow direction.
//!
//! # Page Margin Profiles
//!
//! | Window width       | Margin (left, top, right, bottom) |
//! |--------------------|-----------------------------------|
//! | `< 641`            | `12, 12, 12, 0`                   |
//! | `641 ..< 1008`     | `24, 24, 24, 0`                   |
//! | `>= 1008`          | `36, 36, 36, 0`                   |

use crate::app_settings::{
    MEDIUM_PAGE_MARGIN, MEDIUM_WIDTH_BREAKPOINT, NARROW_PAGE_MARGIN, WIDE_PAGE_MARGIN,
    WIDE_WIDTH_BREAKPOINT,
};

/// A width/height pair in logical units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Per-edge spacing, used for the recommended page margin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Thickness {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Thickness {
    #[must_use]
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Page margin shape: the same spacing on left, top and right, none at the bottom.
    #[must_use]
    pub const fn page(spacing: f64) -> Self {
        Self::new(spacing, spacing, spacing, 0.0)
    }
}

/// Text flow direction of the UI language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowDirection {
    #[default]
    LeftToRight,
    RightToLeft,
}

impl FlowDirection {
    /// Flow direction for a BCP 47 locale such as `"en-US"` or `"ar_EG.UTF-8"`.
    #[must_use]
    pub fn for_locale(locale: &str) -> Self {
        let language = locale
            .split(['-', '_', '.', '@'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match language.as_str() {
            "ar" | "dv" | "fa" | "he" | "ks" | "ku" | "ps" | "sd" | "ug" | "ur" | "yi" => {
                FlowDirection::RightToLeft
            }
            _ => FlowDirection::LeftToRight,
        }
    }
}

/// Title-bar metrics as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChromeMetrics {
    /// Height of the title bar.
    pub height: f64,
    /// Width reserved by system-drawn controls on the left edge.
    pub system_overlay_left_inset: f64,
    /// Width reserved by system-drawn controls on the right edge.
    pub system_overlay_right_inset: f64,
}

/// Resolved title-bar geometry published to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChromeGeometry {
    pub height: f64,
    pub inset: f64,
}

/// Returns the recommended page margin for a window of the given width.
#[must_use]
pub fn recommended_margin(width: f64) -> Thickness {
    if width < MEDIUM_WIDTH_BREAKPOINT {
        NARROW_PAGE_MARGIN
    } else if width < WIDE_WIDTH_BREAKPOINT {
        MEDIUM_PAGE_MARGIN
    } else {
        WIDE_PAGE_MARGIN
    }
}

/// Resolves the title-bar height and the inset reserved for the caption buttons.
///
/// The caption buttons sit on the right edge for left-to-right layouts and on
/// the left edge for right-to-left layouts, so the inset follows them.
#[must_use]
pub fn resolve_chrome(metrics: ChromeMetrics, flow: FlowDirection) -> ChromeGeometry {
    let inset = match flow {
        FlowDirection::LeftToRight => metrics.system_overlay_right_inset,
        FlowDirection::RightToLeft => metrics.system_overlay_left_inset,
    };
    ChromeGeometry {
        height: metrics.height,
        inset,
    }
}
