// SPDX-License-Identifier: GPL-3.0-only

//! The platform seam of the view coordinator.
//!
//! [`ViewPlatform`] is the window handle the coordinator queries and commands.
//! The desktop shell implements it on top of the COSMIC runtime; tests use the
//! in-memory fake in [`fake`].
//!
//! The platform is the source of truth for the presentation mode: the
//! coordinator never remembers whether the window is full screen or in
//! compact overlay, it asks every time.
//!
//! Close requests arrive as a [`CloseRequest`]. Taking its [`Deferral`]
//! postpones the platform's teardown until the deferral is completed (or
//! dropped); the platform side waits on the paired [`CloseCompletion`].

use crate::error::ViewResult;
use crate::geometry::{ChromeMetrics, FlowDirection, Size};
use crate::input::{KeyEvent, KeyStateSource};
use futures::channel::oneshot;

/// Window mode as the platform reports it, independent of full screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlatformViewMode {
    #[default]
    Default,
    CompactOverlay,
}

/// How the platform should size the window when entering a view mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewSizePreference {
    #[default]
    Default,
    Custom,
}

/// Preferences passed along with a view mode request.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewModePreferences {
    pub size_preference: ViewSizePreference,
    pub custom_size: Size,
}

impl ViewModePreferences {
    /// Preferences requesting a fixed custom size.
    #[must_use]
    pub fn custom(size: Size) -> Self {
        Self {
            size_preference: ViewSizePreference::Custom,
            custom_size: size,
        }
    }
}

/// An RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 0xff)
    }
}

/// System theme colors relevant to the title bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThemeColors {
    pub background: Color,
    pub foreground: Color,
    pub inactive_foreground: Color,
}

/// Colors applied to the title bar and its caption buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TitleBarColors {
    pub background: Color,
    pub foreground: Color,
    pub button_background: Color,
    pub button_foreground: Color,
    pub button_inactive_background: Color,
}

impl From<ThemeColors> for TitleBarColors {
    fn from(theme: ThemeColors) -> Self {
        Self {
            background: theme.background,
            foreground: theme.foreground,
            button_background: Color::TRANSPARENT,
            button_foreground: theme.inactive_foreground,
            button_inactive_background: Color::TRANSPARENT,
        }
    }
}

/// The primary window as seen by the coordinator.
#[allow(async_fn_in_trait)]
pub trait ViewPlatform: KeyStateSource {
    fn title(&self) -> String;

    fn set_title(&mut self, title: &str);

    /// Current client bounds of the window.
    fn bounds(&self) -> Size;

    /// Layout direction of the current UI language.
    fn flow_direction(&self) -> FlowDirection;

    fn chrome_metrics(&self) -> ChromeMetrics;

    fn theme_colors(&self) -> ThemeColors;

    fn apply_title_bar_colors(&mut self, colors: TitleBarColors);

    fn set_preferred_min_size(&mut self, size: Size);

    /// Lets the client area draw underneath the title bar.
    fn extend_view_into_title_bar(&mut self, extend: bool);

    fn is_full_screen(&self) -> bool;

    /// Returns `false` if the platform refused to enter full screen.
    fn try_enter_full_screen(&mut self) -> bool;

    fn exit_full_screen(&mut self);

    fn view_mode(&self) -> PlatformViewMode;

    fn is_view_mode_supported(&self, mode: PlatformViewMode) -> bool;

    /// Returns `false` if the platform refused the mode change.
    async fn try_enter_view_mode(
        &mut self,
        mode: PlatformViewMode,
        preferences: ViewModePreferences,
    ) -> bool;

    /// Closes the window. Completion means the platform accepted the close.
    async fn try_consolidate(&mut self) -> ViewResult<()>;
}

/// Raw events delivered by the platform to the coordinator.
#[derive(Debug)]
pub enum PlatformEvent {
    /// The window bounds changed. The coordinator marks the event handled.
    SizeChanged(Size),
    /// Title-bar layout metrics changed.
    TitleBarMetricsChanged,
    /// The system theme changed.
    ThemeChanged,
    /// A key event reached the window before the focused control.
    AcceleratorKey(KeyEvent),
    /// The user or the system asked to close the window.
    CloseRequested(CloseRequest),
}

/// How a close deferral ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferralOutcome {
    /// The application completed the deferral.
    Completed,
    /// The deferral (or the request holding it) was dropped without completing.
    Abandoned,
}

/// Token postponing the platform's teardown of the window.
#[derive(Debug)]
pub struct Deferral {
    tx: Option<oneshot::Sender<()>>,
}

impl Deferral {
    /// A deferral no platform is waiting on.
    #[must_use]
    pub fn detached() -> Self {
        Self { tx: None }
    }

    /// Releases the deferral, allowing the platform to tear the window down.
    pub fn complete(mut self) {
        if let Some(tx) = self.tx.take() {
            // The platform may have stopped waiting already.
            let _ = tx.send(());
        }
    }
}

/// Platform side of a close deferral.
#[derive(Debug)]
pub struct CloseCompletion {
    rx: oneshot::Receiver<()>,
}

impl CloseCompletion {
    /// Waits until the deferral is completed or abandoned.
    pub async fn wait(self) -> DeferralOutcome {
        match self.rx.await {
            Ok(()) => DeferralOutcome::Completed,
            Err(oneshot::Canceled) => DeferralOutcome::Abandoned,
        }
    }

    /// Returns the outcome if the deferral has already ended.
    pub fn try_outcome(&mut self) -> Option<DeferralOutcome> {
        match self.rx.try_recv() {
            Ok(Some(())) => Some(DeferralOutcome::Completed),
            Ok(None) => None,
            Err(oneshot::Canceled) => Some(DeferralOutcome::Abandoned),
        }
    }
}

/// A request to close the primary window.
///
/// An unhandled request lets the platform close the window immediately.
#[derive(Debug)]
pub struct CloseRequest {
    handled: bool,
    deferral: Option<Deferral>,
}

impl CloseRequest {
    #[must_use]
    pub fn new() -> (Self, CloseCompletion) {
        let (tx, rx) = oneshot::channel();
        let request = Self {
            handled: false,
            deferral: Some(Deferral { tx: Some(tx) }),
        };
        (request, CloseCompletion { rx })
    }

    /// Intercepts the request so the platform does not close immediately.
    pub fn set_handled(&mut self) {
        self.handled = true;
    }

    #[must_use]
    pub fn is_handled(&self) -> bool {
        self.handled
    }

    /// Takes the deferral token. Only the first call returns it.
    pub fn take_deferral(&mut self) -> Option<Deferral> {
        self.deferral.take()
    }
}

#[cfg(test)]
pub(crate) mod fake {
    //! In-memory platform used by the unit and scenario tests.

    use super::*;
    use crate::error::ViewError;
    use crate::input::VirtualKey;
    use std::cell::Cell;
    use std::collections::HashSet;

    #[derive(Debug)]
    pub struct FakePlatform {
        pub title: String,
        pub bounds: Size,
        pub flow: FlowDirection,
        pub metrics: ChromeMetrics,
        pub theme: ThemeColors,
        pub applied_colors: Vec<TitleBarColors>,
        pub min_size: Option<Size>,
        pub extended_into_title_bar: bool,
        pub full_screen: bool,
        pub refuse_full_screen: bool,
        pub view_mode: PlatformViewMode,
        pub compact_overlay_supported: bool,
        pub support_queries: Cell<usize>,
        pub view_mode_requests: Vec<(PlatformViewMode, ViewModePreferences)>,
        pub keys_down: HashSet<VirtualKey>,
        pub consolidate_error: Option<String>,
        pub consolidate_calls: usize,
        pub consolidated: bool,
    }

    impl Default for FakePlatform {
        fn default() -> Self {
            Self {
                title: String::new(),
                bounds: Size::new(800.0, 600.0),
                flow: FlowDirection::LeftToRight,
                metrics: ChromeMetrics {
                    height: 32.0,
                    system_overlay_left_inset: 0.0,
                    system_overlay_right_inset: 138.0,
                },
                theme: ThemeColors {
                    background: Color::rgb(0x20, 0x20, 0x20),
                    foreground: Color::rgb(0xff, 0xff, 0xff),
                    inactive_foreground: Color::rgb(0x99, 0x99, 0x99),
                },
                applied_colors: Vec::new(),
                min_size: None,
                extended_into_title_bar: false,
                full_screen: false,
                refuse_full_screen: false,
                view_mode: PlatformViewMode::Default,
                compact_overlay_supported: true,
                support_queries: Cell::new(0),
                view_mode_requests: Vec::new(),
                keys_down: HashSet::new(),
                consolidate_error: None,
                consolidate_calls: 0,
                consolidated: false,
            }
        }
    }

    impl FakePlatform {
        pub fn with_keys_down(keys: &[VirtualKey]) -> Self {
            Self {
                keys_down: keys.iter().copied().collect(),
                ..Self::default()
            }
        }
    }

    impl KeyStateSource for FakePlatform {
        fn is_key_down(&self, key: VirtualKey) -> bool {
            self.keys_down.contains(&key)
        }
    }

    impl ViewPlatform for FakePlatform {
        fn title(&self) -> String {
            self.title.clone()
        }

        fn set_title(&mut self, title: &str) {
            self.title = title.to_string();
        }

        fn bounds(&self) -> Size {
            self.bounds
        }

        fn flow_direction(&self) -> FlowDirection {
            self.flow
        }

        fn chrome_metrics(&self) -> ChromeMetrics {
            self.metrics
        }

        fn theme_colors(&self) -> ThemeColors {
            self.theme
        }

        fn apply_title_bar_colors(&mut self, colors: TitleBarColors) {
            self.applied_colors.push(colors);
        }

        fn set_preferred_min_size(&mut self, size: Size) {
            self.min_size = Some(size);
        }

        fn extend_view_into_title_bar(&mut self, extend: bool) {
            self.extended_into_title_bar = extend;
        }

        fn is_full_screen(&self) -> bool {
            self.full_screen
        }

        fn try_enter_full_screen(&mut self) -> bool {
            if self.refuse_full_screen {
                return false;
            }
            self.full_screen = true;
            true
        }

        fn exit_full_screen(&mut self) {
            self.full_screen = false;
        }

        fn view_mode(&self) -> PlatformViewMode {
            self.view_mode
        }

        fn is_view_mode_supported(&self, mode: PlatformViewMode) -> bool {
            self.support_queries.set(self.support_queries.get() + 1);
            match mode {
                PlatformViewMode::Default => true,
                PlatformViewMode::CompactOverlay => self.compact_overlay_supported,
            }
        }

        async fn try_enter_view_mode(
            &mut self,
            mode: PlatformViewMode,
            preferences: ViewModePreferences,
        ) -> bool {
            self.view_mode_requests.push((mode, preferences));
            self.view_mode = mode;
            true
        }

        async fn try_consolidate(&mut self) -> ViewResult<()> {
            self.consolidate_calls += 1;
            match &self.consolidate_error {
                Some(message) => Err(ViewError::Consolidate(message.clone())),
                None => {
                    self.consolidated = true;
                    Ok(())
                }
            }
        }
    }
}
