// SPDX-License-Identifier: GPL-3.0-only

use cosmic::cosmic_config;
use cosmic::cosmic_config::{cosmic_config_derive::CosmicConfigEntry, CosmicConfigEntry};
use serde::{Deserialize, Serialize};

/// How the primary window is presented when the editor starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaunchMode {
    /// Let the window manager decide.
    Windowed,
    #[default]
    Maximized,
    FullScreen,
}

/// User configuration that persists between application runs.
#[derive(Debug, Default, Clone, CosmicConfigEntry, Eq, PartialEq)]
#[version = 1]
pub struct Config {
    /// Presentation of the window at launch.
    pub launch_mode: LaunchMode,
}
