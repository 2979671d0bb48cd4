// SPDX-License-Identifier: GPL-3.0-only

//! Develop main application
//!
//! Opens the editor's primary window and hands its lifecycle to the view
//! coordinator.

use develop::{app, app_settings};
use std::time::Instant;

fn main() -> cosmic::iced::Result {
    let started = Instant::now();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new(app_settings::DEFAULT_LOG_DIRECTIVE)
                }),
        )
        .init();

    let min_size = app_settings::MIN_WINDOW_SIZE;

    // Settings for configuring the application window and iced runtime.
    let settings = cosmic::app::Settings::default()
        .size(cosmic::iced::Size::new(
            app_settings::DEFAULT_WIDTH,
            app_settings::DEFAULT_HEIGHT,
        ))
        // The window can never shrink below the preferred minimum size
        .size_limits(
            cosmic::iced::Limits::NONE
                .min_width(min_size.width as f32)
                .min_height(min_size.height as f32),
        )
        // The view draws its own title bar
        .client_decorations(true)
        // Closing goes through the coordinator's negotiation first
        .exit_on_close(false);

    cosmic::app::run::<app::AppModel>(settings, app::Flags { started })
}
