// SPDX-License-Identifier: GPL-3.0-only

//! Presentation mode control for the primary window.
//!
//! The window is always in exactly one [`PresentationMode`]. The mode is
//! never stored here: every query asks the platform, because the user can
//! leave full screen through a system gesture the application never sees.
//!
//! The toggles only issue platform requests. Whether the mode actually
//! changed is announced later, from the size-changed handler.

use crate::app_settings::COMPACT_OVERLAY_SIZE;
use crate::platform::{PlatformViewMode, ViewModePreferences, ViewPlatform};
use std::cell::OnceCell;

/// The presentation mode of the primary window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresentationMode {
    #[default]
    Resizable,
    FullScreen,
    CompactOverlay,
}

impl PresentationMode {
    /// Derives the mode from the live platform state. Full screen wins.
    #[must_use]
    pub fn of(platform: &impl ViewPlatform) -> Self {
        if platform.is_full_screen() {
            PresentationMode::FullScreen
        } else if platform.view_mode() == PlatformViewMode::CompactOverlay {
            PresentationMode::CompactOverlay
        } else {
            PresentationMode::Resizable
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            PresentationMode::Resizable => "Resizable",
            PresentationMode::FullScreen => "FullScreen",
            PresentationMode::CompactOverlay => "CompactOverlay",
        }
    }
}

/// Issues presentation mode changes to the platform.
#[derive(Debug, Clone)]
pub struct ModeController {
    compact_overlay_preferences: ViewModePreferences,
    compact_overlay_supported: OnceCell<bool>,
}

impl Default for ModeController {
    fn default() -> Self {
        Self {
            compact_overlay_preferences: ViewModePreferences::custom(COMPACT_OVERLAY_SIZE),
            compact_overlay_supported: OnceCell::new(),
        }
    }
}

impl ModeController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn compact_overlay_preferences(&self) -> ViewModePreferences {
        self.compact_overlay_preferences
    }

    /// Whether the platform supports compact overlay. Queried once, then cached.
    pub fn is_compact_overlay_supported(&self, platform: &impl ViewPlatform) -> bool {
        *self
            .compact_overlay_supported
            .get_or_init(|| platform.is_view_mode_supported(PlatformViewMode::CompactOverlay))
    }

    /// Enters full screen, or leaves it when already full screen.
    pub fn toggle_full_screen(&self, platform: &mut impl ViewPlatform) {
        if platform.is_full_screen() {
            tracing::info!("Leaving full screen");
            platform.exit_full_screen();
        } else if platform.try_enter_full_screen() {
            tracing::info!("Entering full screen");
        } else {
            tracing::warn!("Platform refused to enter full screen");
        }
    }

    /// Enters compact overlay from the default mode, or returns to the default mode.
    ///
    /// Does nothing when the platform has no compact overlay support.
    pub async fn toggle_compact_overlay(&self, platform: &mut impl ViewPlatform) {
        if !self.is_compact_overlay_supported(&*platform) {
            tracing::debug!("Compact overlay not supported, ignoring toggle");
            return;
        }

        let target = match platform.view_mode() {
            PlatformViewMode::Default => PlatformViewMode::CompactOverlay,
            PlatformViewMode::CompactOverlay => PlatformViewMode::Default,
        };

        if platform
            .try_enter_view_mode(target, self.compact_overlay_preferences)
            .await
        {
            tracing::info!("Requested view mode {:?}", target);
        } else {
            tracing::warn!("Platform refused view mode {:?}", target);
        }
    }
}
