// SPDX-License-Identifier: GPL-3.0-only

//! The view coordinator: composition root for the primary window.
//!
//! [`ViewCoordinator`] owns the platform window handle, the published
//! [`ViewProperties`], the mode controller, the accelerator dispatcher, the
//! close negotiator and the observer lists. The shell owns one coordinator and
//! feeds it every [`PlatformEvent`]; collaborators subscribe to its
//! notifications or register close callbacks on it.
//!
//! # Notifications
//!
//! - [`ViewCoordinator::view_mode_changed`]: raised from the size-changed
//!   handler (and on demand through
//!   [`ViewCoordinator::raise_view_mode_changed`]), never from the toggles.
//! - [`ViewCoordinator::shortcut_pressed`]: one per accelerator key-down.
//! - [`ViewCoordinator::property_changed`]: one per changed [`ViewProperty`].

use crate::app_settings::MIN_WINDOW_SIZE;
use crate::close::{CloseCallback, CloseNegotiator, CloseState};
use crate::error::ViewResult;
use crate::geometry::{self, FlowDirection, Size, Thickness};
use crate::input::{AcceleratorDispatcher, DialogFlag, KeyEvent, ShortcutPressed};
use crate::mode::{ModeController, PresentationMode};
use crate::notify::Observers;
use crate::platform::{CloseRequest, PlatformEvent, TitleBarColors, ViewPlatform};

/// Observable properties of the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewProperty {
    Title,
    RecommendedMargin,
    TitleBarHeight,
    TitleBarInset,
    Closing,
}

/// Values the presentation layer binds to.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewProperties {
    pub title: String,
    pub recommended_margin: Thickness,
    pub title_bar_height: f64,
    pub title_bar_inset: f64,
    pub flow_direction: FlowDirection,
    /// Set once shutdown begins; never cleared.
    pub closing: bool,
}

pub struct ViewCoordinator<P: ViewPlatform> {
    platform: P,
    properties: ViewProperties,
    modes: ModeController,
    accelerators: AcceleratorDispatcher,
    close: CloseNegotiator,
    view_mode_changed: Observers<PresentationMode>,
    shortcut_pressed: Observers<ShortcutPressed>,
    property_changed: Observers<ViewProperty>,
    initialized: bool,
}

impl<P: ViewPlatform + std::fmt::Debug> std::fmt::Debug for ViewCoordinator<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewCoordinator")
            .field("platform", &self.platform)
            .field("properties", &self.properties)
            .field("close", &self.close)
            .field("initialized", &self.initialized)
            .finish_non_exhaustive()
    }
}

impl<P: ViewPlatform> ViewCoordinator<P> {
    /// Creates a coordinator for the given window.
    ///
    /// `dialog` is the flag dialog presenters set while a modal dialog is shown.
    pub fn new(platform: P, dialog: DialogFlag) -> Self {
        Self {
            platform,
            properties: ViewProperties::default(),
            modes: ModeController::new(),
            accelerators: AcceleratorDispatcher::new(dialog),
            close: CloseNegotiator::new(),
            view_mode_changed: Observers::new(),
            shortcut_pressed: Observers::new(),
            property_changed: Observers::new(),
            initialized: false,
        }
    }

    /// Prepares the window: chrome colors and metrics, page margin, minimum
    /// size, and a client area extended into the title bar.
    ///
    /// Runs once; later calls are ignored.
    pub fn initialize(&mut self) {
        if self.initialized {
            tracing::warn!("View coordinator already initialized");
            return;
        }
        self.initialized = true;

        self.properties.title = self.platform.title();
        self.refresh_title_bar();
        let width = self.platform.bounds().width;
        self.refresh_page_margin(width);
        self.platform.set_preferred_min_size(MIN_WINDOW_SIZE);
        self.platform.extend_view_into_title_bar(true);

        tracing::info!(
            "View initialized: margin {:?}, title bar {}x{}",
            self.properties.recommended_margin,
            self.properties.title_bar_height,
            self.properties.title_bar_inset
        );
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub fn properties(&self) -> &ViewProperties {
        &self.properties
    }

    /// The window title, as the platform currently shows it.
    pub fn title(&self) -> String {
        self.platform.title()
    }

    pub fn set_title(&mut self, title: &str) {
        self.platform.set_title(title);
        self.properties.title = title.to_string();
        self.notify_property(ViewProperty::Title);
    }

    pub fn dialog_flag(&self) -> &DialogFlag {
        self.accelerators.dialog_flag()
    }

    /// The current presentation mode, derived from the platform.
    pub fn mode(&self) -> PresentationMode {
        PresentationMode::of(&self.platform)
    }

    pub fn is_compact_overlay_supported(&self) -> bool {
        self.modes.is_compact_overlay_supported(&self.platform)
    }

    pub fn toggle_full_screen(&mut self) {
        self.modes.toggle_full_screen(&mut self.platform);
    }

    pub async fn toggle_compact_overlay(&mut self) {
        self.modes.toggle_compact_overlay(&mut self.platform).await;
    }

    /// Publishes the current presentation mode to every mode observer.
    pub fn raise_view_mode_changed(&mut self) {
        let mut mode = self.mode();
        tracing::debug!("View mode is {}", mode.as_str());
        self.view_mode_changed.notify(&mut mode);
    }

    pub fn view_mode_changed(&mut self) -> &mut Observers<PresentationMode> {
        &mut self.view_mode_changed
    }

    pub fn shortcut_pressed(&mut self) -> &mut Observers<ShortcutPressed> {
        &mut self.shortcut_pressed
    }

    pub fn property_changed(&mut self) -> &mut Observers<ViewProperty> {
        &mut self.property_changed
    }

    /// Registers a save-before-exit callback. Registering the same callback
    /// again has no effect.
    pub fn register_close_callback(&mut self, callback: CloseCallback) {
        self.close.register(callback);
    }

    pub fn unregister_close_callback(&mut self, callback: &CloseCallback) -> bool {
        self.close.unregister(callback)
    }

    pub fn close_state(&self) -> CloseState {
        self.close.state()
    }

    /// Routes a platform event. Returns whether the event was handled.
    pub async fn handle_event(&mut self, event: PlatformEvent) -> ViewResult<bool> {
        match event {
            PlatformEvent::SizeChanged(size) => Ok(self.handle_size_changed(size)),
            PlatformEvent::TitleBarMetricsChanged => {
                self.refresh_title_bar();
                Ok(false)
            }
            PlatformEvent::ThemeChanged => {
                tracing::debug!("Theme changed");
                self.refresh_title_bar();
                Ok(false)
            }
            PlatformEvent::AcceleratorKey(key) => Ok(self.handle_accelerator_key(key).handled),
            PlatformEvent::CloseRequested(request) => {
                self.handle_close_request(request).await?;
                Ok(true)
            }
        }
    }

    /// Recomputes the page margin and re-announces the presentation mode.
    pub fn handle_size_changed(&mut self, size: Size) -> bool {
        tracing::debug!("Window resized to {}x{}", size.width, size.height);
        self.refresh_page_margin(size.width);
        self.raise_view_mode_changed();
        true
    }

    /// Publishes a shortcut notification and returns the raw event with the
    /// receivers' `handled` decision.
    pub fn handle_accelerator_key(&mut self, event: KeyEvent) -> KeyEvent {
        self.accelerators
            .dispatch(event, &self.platform, &mut self.shortcut_pressed)
    }

    /// Runs the close negotiation for a platform close request.
    pub async fn handle_close_request(&mut self, mut request: CloseRequest) -> ViewResult<()> {
        let Some(deferral) = self.close.intercept(&mut request) else {
            return Ok(());
        };

        self.set_closing();
        self.close.drain();
        self.close.finish(&mut self.platform, deferral).await
    }

    /// Closes the window directly, without running the close callbacks.
    pub async fn close_view(&mut self) -> ViewResult<()> {
        self.platform.try_consolidate().await
    }

    fn set_closing(&mut self) {
        if !self.properties.closing {
            self.properties.closing = true;
            self.notify_property(ViewProperty::Closing);
        }
    }

    fn refresh_title_bar(&mut self) {
        let colors = TitleBarColors::from(self.platform.theme_colors());
        self.platform.apply_title_bar_colors(colors);

        let flow = self.platform.flow_direction();
        self.properties.flow_direction = flow;
        let chrome = geometry::resolve_chrome(self.platform.chrome_metrics(), flow);

        if self.properties.title_bar_height != chrome.height {
            self.properties.title_bar_height = chrome.height;
            self.notify_property(ViewProperty::TitleBarHeight);
        }
        if self.properties.title_bar_inset != chrome.inset {
            self.properties.title_bar_inset = chrome.inset;
            self.notify_property(ViewProperty::TitleBarInset);
        }
    }

    fn refresh_page_margin(&mut self, width: f64) {
        let margin = geometry::recommended_margin(width);
        if self.properties.recommended_margin != margin {
            self.properties.recommended_margin = margin;
            self.notify_property(ViewProperty::RecommendedMargin);
        }
    }

    fn notify_property(&mut self, mut property: ViewProperty) {
        self.property_changed.notify(&mut property);
    }
}
