// SPDX-License-Identifier: GPL-3.0-only

//! COSMIC implementation of the [`ViewPlatform`] seam.
//!
//! The COSMIC runtime changes windows through tasks returned from `update`,
//! so [`CosmicWindow`] cannot act on the window directly. It keeps the
//! window's last known state and queues a [`WindowCommand`] for every change
//! the coordinator asks for. The application drains the queue after each
//! coordinator call and turns the commands into runtime tasks.
//!
//! The header bar is drawn by the client (`show_headerbar = false`), so the
//! title-bar metrics come from [`app_settings`](crate::app_settings) and the
//! caption buttons sit on the trailing edge of the current flow direction.
//!
//! Full screen can be left without the coordinator's involvement, for example
//! through a compositor shortcut. The application re-reads the live window
//! mode after every resize and records it with [`CosmicWindow::set_window_mode`]
//! before the size change reaches the coordinator.

use crate::app_settings::{CAPTION_BUTTONS_WIDTH, TITLE_BAR_HEIGHT};
use crate::error::ViewResult;
use crate::geometry::{ChromeMetrics, FlowDirection, Size};
use crate::input::{KeyEventKind, KeyStateSource, VirtualKey};
use crate::platform::{
    Color, DeferralOutcome, PlatformViewMode, ThemeColors, TitleBarColors, ViewModePreferences,
    ViewPlatform,
};
use cosmic::app::cosmic::WindowingSystem;
use cosmic::iced::keyboard::{self, key::Named};
use cosmic::iced::window;

/// A window change requested by the coordinator, waiting to become a task.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowCommand {
    SetTitle(String),
    EnterFullScreen,
    ExitFullScreen,
    /// Resize and pin above other windows.
    EnterCompactOverlay(Size),
    /// Restore the size used before compact overlay and unpin.
    ExitCompactOverlay(Size),
    ShowHeaderBar(bool),
    Close,
}

/// The primary COSMIC window as seen by the coordinator.
#[derive(Debug)]
pub struct CosmicWindow {
    title: String,
    bounds: Size,
    restore_bounds: Size,
    min_size: Size,
    flow: FlowDirection,
    theme: ThemeColors,
    title_bar_colors: TitleBarColors,
    full_screen: bool,
    view_mode: PlatformViewMode,
    modifiers: keyboard::Modifiers,
    pending: Vec<WindowCommand>,
}

impl CosmicWindow {
    pub fn new(title: &str, bounds: Size, flow: FlowDirection, theme: ThemeColors) -> Self {
        Self {
            title: title.to_string(),
            bounds,
            restore_bounds: bounds,
            min_size: Size::default(),
            flow,
            theme,
            title_bar_colors: TitleBarColors::default(),
            full_screen: false,
            view_mode: PlatformViewMode::Default,
            modifiers: keyboard::Modifiers::empty(),
            pending: Vec::new(),
        }
    }

    /// Takes the commands queued since the last call.
    pub fn take_commands(&mut self) -> Vec<WindowCommand> {
        std::mem::take(&mut self.pending)
    }

    /// Records bounds reported by the runtime.
    pub fn set_bounds(&mut self, bounds: Size) {
        self.bounds = bounds;
    }

    /// Records the mode the runtime reports for the live window.
    pub fn set_window_mode(&mut self, mode: window::Mode) {
        let full_screen = mode == window::Mode::Fullscreen;
        if full_screen != self.full_screen {
            tracing::debug!("Window mode changed outside the coordinator: {:?}", mode);
        }
        self.full_screen = full_screen;
    }

    pub fn set_theme(&mut self, theme: ThemeColors) {
        self.theme = theme;
    }

    pub fn set_modifiers(&mut self, modifiers: keyboard::Modifiers) {
        self.modifiers = modifiers;
    }

    pub fn min_size(&self) -> Size {
        self.min_size
    }

    pub fn title_bar_colors(&self) -> TitleBarColors {
        self.title_bar_colors
    }
}

impl KeyStateSource for CosmicWindow {
    fn is_key_down(&self, key: VirtualKey) -> bool {
        match key {
            VirtualKey::Control => self.modifiers.control(),
            VirtualKey::Menu => self.modifiers.alt(),
            VirtualKey::Shift => self.modifiers.shift(),
            VirtualKey::Platform => self.modifiers.logo(),
            _ => false,
        }
    }
}

impl ViewPlatform for CosmicWindow {
    fn title(&self) -> String {
        self.title.clone()
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
        self.pending.push(WindowCommand::SetTitle(self.title.clone()));
    }

    fn bounds(&self) -> Size {
        self.bounds
    }

    fn flow_direction(&self) -> FlowDirection {
        self.flow
    }

    fn chrome_metrics(&self) -> ChromeMetrics {
        let (left, right) = match self.flow {
            FlowDirection::LeftToRight => (0.0, CAPTION_BUTTONS_WIDTH),
            FlowDirection::RightToLeft => (CAPTION_BUTTONS_WIDTH, 0.0),
        };
        ChromeMetrics {
            height: TITLE_BAR_HEIGHT,
            system_overlay_left_inset: left,
            system_overlay_right_inset: right,
        }
    }

    fn theme_colors(&self) -> ThemeColors {
        self.theme
    }

    fn apply_title_bar_colors(&mut self, colors: TitleBarColors) {
        self.title_bar_colors = colors;
    }

    fn set_preferred_min_size(&mut self, size: Size) {
        // Enforced by the size limits the window is launched with.
        self.min_size = size;
    }

    fn extend_view_into_title_bar(&mut self, extend: bool) {
        self.pending.push(WindowCommand::ShowHeaderBar(!extend));
    }

    fn is_full_screen(&self) -> bool {
        self.full_screen
    }

    fn try_enter_full_screen(&mut self) -> bool {
        self.full_screen = true;
        self.pending.push(WindowCommand::EnterFullScreen);
        true
    }

    fn exit_full_screen(&mut self) {
        self.full_screen = false;
        self.pending.push(WindowCommand::ExitFullScreen);
    }

    fn view_mode(&self) -> PlatformViewMode {
        self.view_mode
    }

    fn is_view_mode_supported(&self, mode: PlatformViewMode) -> bool {
        match mode {
            PlatformViewMode::Default => true,
            PlatformViewMode::CompactOverlay => {
                always_on_top_supported(cosmic::app::cosmic::windowing_system())
            }
        }
    }

    async fn try_enter_view_mode(
        &mut self,
        mode: PlatformViewMode,
        preferences: ViewModePreferences,
    ) -> bool {
        if mode == self.view_mode {
            return true;
        }
        match mode {
            PlatformViewMode::CompactOverlay => {
                self.restore_bounds = self.bounds;
                self.pending
                    .push(WindowCommand::EnterCompactOverlay(preferences.custom_size));
            }
            PlatformViewMode::Default => {
                self.pending
                    .push(WindowCommand::ExitCompactOverlay(self.restore_bounds));
            }
        }
        self.view_mode = mode;
        true
    }

    async fn try_consolidate(&mut self) -> ViewResult<()> {
        self.pending.push(WindowCommand::Close);
        Ok(())
    }
}

/// Whether the windowing system keeps a window above others, which compact
/// overlay depends on.
pub fn always_on_top_supported(system: Option<WindowingSystem>) -> bool {
    match system {
        Some(WindowingSystem::Xlib | WindowingSystem::Xcb) => {
            tracing::info!("Running on X11 - compact overlay uses _NET_WM_STATE_ABOVE");
            true
        }
        Some(WindowingSystem::Wayland) => {
            tracing::info!(
                "Running on Wayland - XDG toplevels cannot stay on top, \
                 compact overlay unavailable"
            );
            false
        }
        Some(other) => {
            tracing::warn!(
                "Running on unsupported windowing system: {:?} - \
                 compact overlay unavailable",
                other
            );
            false
        }
        None => {
            tracing::warn!("Windowing system not yet detected - compact overlay unavailable");
            false
        }
    }
}

/// Keeps queued commands for the runtime, dropping [`WindowCommand::Close`]
/// unless the close deferral was released.
pub fn release_commands(
    commands: Vec<WindowCommand>,
    outcome: Option<DeferralOutcome>,
) -> Vec<WindowCommand> {
    if outcome == Some(DeferralOutcome::Completed) {
        return commands;
    }
    tracing::warn!("Close deferral not released ({:?}), keeping the window open", outcome);
    commands
        .into_iter()
        .filter(|command| *command != WindowCommand::Close)
        .collect()
}

/// Converts a COSMIC theme into the colors the title bar is painted with.
pub fn theme_colors(theme: &cosmic::cosmic_theme::Theme) -> ThemeColors {
    let background = cosmic::iced::Color::from(theme.bg_color());
    let foreground = cosmic::iced::Color::from(theme.on_bg_color());
    ThemeColors {
        background: color(background),
        foreground: color(foreground),
        inactive_foreground: color(foreground.scale_alpha(0.6)),
    }
}

fn color(color: cosmic::iced::Color) -> Color {
    let [r, g, b, a] = color.into_rgba8();
    Color::rgba(r, g, b, a)
}

/// Maps a runtime key to the coordinator's virtual key.
///
/// Named keys without a dedicated variant keep a distinct code, so two
/// different keys never compare equal. Unidentified keys map to `Other(0)`.
pub fn virtual_key(key: &keyboard::Key) -> VirtualKey {
    match key {
        keyboard::Key::Named(named) => named_key(*named),
        keyboard::Key::Character(text) => text
            .chars()
            .next()
            .map_or(VirtualKey::Other(0), |c| {
                VirtualKey::Character(c.to_ascii_uppercase())
            }),
        keyboard::Key::Unidentified => VirtualKey::Other(0),
    }
}

fn named_key(named: Named) -> VirtualKey {
    match named {
        Named::Control => VirtualKey::Control,
        Named::Alt => VirtualKey::Menu,
        Named::Shift => VirtualKey::Shift,
        Named::Super | Named::Meta => VirtualKey::Platform,
        Named::Escape => VirtualKey::Escape,
        Named::Enter => VirtualKey::Enter,
        Named::Tab => VirtualKey::Tab,
        Named::Backspace => VirtualKey::Back,
        Named::Delete => VirtualKey::Delete,
        Named::Insert => VirtualKey::Insert,
        Named::Space => VirtualKey::Space,
        Named::ArrowLeft => VirtualKey::Left,
        Named::ArrowUp => VirtualKey::Up,
        Named::ArrowRight => VirtualKey::Right,
        Named::ArrowDown => VirtualKey::Down,
        Named::Home => VirtualKey::Home,
        Named::End => VirtualKey::End,
        Named::PageUp => VirtualKey::PageUp,
        Named::PageDown => VirtualKey::PageDown,
        Named::F1 => VirtualKey::Function(1),
        Named::F2 => VirtualKey::Function(2),
        Named::F3 => VirtualKey::Function(3),
        Named::F4 => VirtualKey::Function(4),
        Named::F5 => VirtualKey::Function(5),
        Named::F6 => VirtualKey::Function(6),
        Named::F7 => VirtualKey::Function(7),
        Named::F8 => VirtualKey::Function(8),
        Named::F9 => VirtualKey::Function(9),
        Named::F10 => VirtualKey::Function(10),
        Named::F11 => VirtualKey::Function(11),
        Named::F12 => VirtualKey::Function(12),
        Named::F13 => VirtualKey::Function(13),
        Named::F14 => VirtualKey::Function(14),
        Named::F15 => VirtualKey::Function(15),
        Named::F16 => VirtualKey::Function(16),
        Named::F17 => VirtualKey::Function(17),
        Named::F18 => VirtualKey::Function(18),
        Named::F19 => VirtualKey::Function(19),
        Named::F20 => VirtualKey::Function(20),
        Named::F21 => VirtualKey::Function(21),
        Named::F22 => VirtualKey::Function(22),
        Named::F23 => VirtualKey::Function(23),
        Named::F24 => VirtualKey::Function(24),
        // Offset past 0, which is reserved for unidentified keys.
        other => VirtualKey::Other(other as u32 + 1),
    }
}

/// Kind of a runtime key event: presses with Alt held count as system keys.
pub fn key_event_kind(pressed: bool, modifiers: keyboard::Modifiers) -> KeyEventKind {
    match (pressed, modifiers.alt()) {
        (true, false) => KeyEventKind::KeyDown,
        (true, true) => KeyEventKind::SystemKeyDown,
        (false, false) => KeyEventKind::KeyUp,
        (false, true) => KeyEventKind::SystemKeyUp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_settings::MIN_WINDOW_SIZE;
    use crate::coordinator::ViewCoordinator;
    use crate::input::{DialogFlag, Modifier, resolve_modifier};
    use crate::mode::PresentationMode;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn window() -> CosmicWindow {
        CosmicWindow::new(
            "Develop",
            Size::new(1024.0, 768.0),
            FlowDirection::LeftToRight,
            ThemeColors::default(),
        )
    }

    #[test]
    fn test_modifiers_resolve_through_key_state() {
        let mut window = window();
        window.set_modifiers(keyboard::Modifiers::CTRL | keyboard::Modifiers::SHIFT);
        assert_eq!(resolve_modifier(&window), Modifier::Control);

        window.set_modifiers(keyboard::Modifiers::empty());
        assert_eq!(resolve_modifier(&window), Modifier::Platform);
    }

    #[test]
    fn test_chrome_metrics_mirror_with_flow() {
        let mut window = window();
        assert_eq!(window.chrome_metrics().system_overlay_right_inset, CAPTION_BUTTONS_WIDTH);

        window.flow = FlowDirection::RightToLeft;
        let metrics = window.chrome_metrics();
        assert_eq!(metrics.system_overlay_left_inset, CAPTION_BUTTONS_WIDTH);
        assert_eq!(metrics.system_overlay_right_inset, 0.0);
    }

    #[test]
    fn test_coordinator_initialization_on_cosmic_window() {
        let mut coordinator = ViewCoordinator::new(window(), DialogFlag::new());
        coordinator.initialize();

        let window = coordinator.platform_mut();
        assert_eq!(window.min_size(), MIN_WINDOW_SIZE);
        assert_eq!(window.title_bar_colors().button_background, Color::TRANSPARENT);
        assert_eq!(window.take_commands(), vec![WindowCommand::ShowHeaderBar(false)]);
        assert_eq!(coordinator.properties().title_bar_inset, CAPTION_BUTTONS_WIDTH);
        assert_eq!(coordinator.properties().title_bar_height, TITLE_BAR_HEIGHT);
    }

    #[test]
    fn test_full_screen_queues_commands() {
        let mut window = window();
        assert!(window.try_enter_full_screen());
        window.exit_full_screen();

        assert_eq!(
            window.take_commands(),
            vec![WindowCommand::EnterFullScreen, WindowCommand::ExitFullScreen]
        );
        assert!(window.take_commands().is_empty());
    }

    #[tokio::test]
    async fn test_compact_overlay_restores_previous_bounds() {
        let mut window = window();
        let preferences = ViewModePreferences::custom(Size::new(500.0, 500.0));

        window
            .try_enter_view_mode(PlatformViewMode::CompactOverlay, preferences)
            .await;
        window.set_bounds(Size::new(500.0, 500.0));
        window
            .try_enter_view_mode(PlatformViewMode::Default, preferences)
            .await;

        assert_eq!(
            window.take_commands(),
            vec![
                WindowCommand::EnterCompactOverlay(Size::new(500.0, 500.0)),
                WindowCommand::ExitCompactOverlay(Size::new(1024.0, 768.0)),
            ]
        );
    }

    /// The compositor leaves full screen on its own; the next resize reports
    /// the live mode and the next toggle enters full screen again.
    #[test]
    fn test_external_full_screen_exit_is_observed() {
        let mut coordinator = ViewCoordinator::new(window(), DialogFlag::new());
        let modes = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&modes);
        coordinator
            .view_mode_changed()
            .subscribe(move |mode: &mut PresentationMode| sink.borrow_mut().push(*mode));

        coordinator.toggle_full_screen();
        assert_eq!(coordinator.mode(), PresentationMode::FullScreen);
        coordinator.platform_mut().take_commands();

        coordinator.platform_mut().set_window_mode(window::Mode::Windowed);
        coordinator.handle_size_changed(Size::new(1024.0, 768.0));
        assert_eq!(*modes.borrow(), vec![PresentationMode::Resizable]);

        coordinator.toggle_full_screen();
        assert_eq!(
            coordinator.platform_mut().take_commands(),
            vec![WindowCommand::EnterFullScreen]
        );
    }

    #[test]
    fn test_window_mode_enters_full_screen() {
        let mut window = window();
        window.set_window_mode(window::Mode::Fullscreen);
        assert!(window.is_full_screen());

        window.set_window_mode(window::Mode::Hidden);
        assert!(!window.is_full_screen());
    }

    #[test]
    fn test_always_on_top_support_by_windowing_system() {
        assert!(always_on_top_supported(Some(WindowingSystem::Xcb)));
        assert!(always_on_top_supported(Some(WindowingSystem::Xlib)));
        assert!(!always_on_top_supported(Some(WindowingSystem::Wayland)));
        assert!(!always_on_top_supported(None));
    }

    #[test]
    fn test_close_command_waits_for_deferral() {
        let commands = vec![WindowCommand::ShowHeaderBar(true), WindowCommand::Close];

        assert_eq!(
            release_commands(commands.clone(), Some(DeferralOutcome::Completed)),
            commands
        );
        assert_eq!(
            release_commands(commands.clone(), None),
            vec![WindowCommand::ShowHeaderBar(true)]
        );
        assert_eq!(
            release_commands(commands, Some(DeferralOutcome::Abandoned)),
            vec![WindowCommand::ShowHeaderBar(true)]
        );
    }

    #[test]
    fn test_navigation_and_unmapped_keys_stay_distinct() {
        assert_eq!(virtual_key(&keyboard::Key::Named(Named::ArrowLeft)), VirtualKey::Left);
        assert_eq!(virtual_key(&keyboard::Key::Named(Named::PageDown)), VirtualKey::PageDown);
        assert_eq!(virtual_key(&keyboard::Key::Named(Named::F24)), VirtualKey::Function(24));
        assert_ne!(
            virtual_key(&keyboard::Key::Named(Named::ArrowLeft)),
            virtual_key(&keyboard::Key::Named(Named::ArrowRight))
        );

        let print = virtual_key(&keyboard::Key::Named(Named::PrintScreen));
        let pause = virtual_key(&keyboard::Key::Named(Named::Pause));
        assert!(matches!(print, VirtualKey::Other(code) if code != 0));
        assert_ne!(print, pause);
        assert_eq!(virtual_key(&keyboard::Key::Unidentified), VirtualKey::Other(0));
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(
            virtual_key(&keyboard::Key::Named(Named::F11)),
            VirtualKey::Function(11)
        );
        assert_eq!(
            virtual_key(&keyboard::Key::Character("s".into())),
            VirtualKey::Character('S')
        );
        assert_eq!(
            key_event_kind(true, keyboard::Modifiers::ALT),
            KeyEventKind::SystemKeyDown
        );
        assert_eq!(
            key_event_kind(false, keyboard::Modifiers::empty()),
            KeyEventKind::KeyUp
        );
    }
}
