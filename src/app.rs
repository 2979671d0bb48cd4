// SPDX-License-Identifier: GPL-3.0-only

use crate::app_settings;
use crate::close::close_callback;
use crate::config::{Config, LaunchMode};
use crate::coordinator::ViewCoordinator;
use crate::error::ViewError;
use crate::geometry::{FlowDirection, Size};
use crate::input::{DialogFlag, KeyEvent, Modifier, ShortcutPressed, VirtualKey};
use crate::mode::PresentationMode;
use crate::platform::{CloseRequest, PlatformEvent};
use crate::shell::{self, CosmicWindow, WindowCommand};
use cosmic::cosmic_config::{self, CosmicConfigEntry};
use cosmic::iced::keyboard;
use cosmic::iced::{event, window, Event, Length, Padding, Subscription};
use cosmic::prelude::*;
use cosmic::ApplicationExt;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Instant;

/// Actions the shell performs in response to its own accelerators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellAction {
    ToggleFullScreen,
    ToggleCompactOverlay,
    Exit,
}

/// Accelerators handled by the shell itself.
pub const SHELL_SHORTCUTS: [(VirtualKey, Modifier, ShellAction); 3] = [
    (VirtualKey::Function(11), Modifier::Platform, ShellAction::ToggleFullScreen),
    (VirtualKey::Character('O'), Modifier::Alt, ShellAction::ToggleCompactOverlay),
    (VirtualKey::Character('Q'), Modifier::Control, ShellAction::Exit),
];

/// Returns the shell action bound to an enabled accelerator, if any.
pub fn shell_action(shortcut: &ShortcutPressed) -> Option<ShellAction> {
    SHELL_SHORTCUTS
        .iter()
        .find(|(key, modifier, _)| shortcut.matches(*key, *modifier))
        .map(|(_, _, action)| *action)
}

/// Data handed to the application at launch.
#[derive(Debug, Clone)]
pub struct Flags {
    /// When the process started, for launch timing.
    pub started: Instant,
}

/// The application model hosting the view coordinator.
pub struct AppModel {
    /// Application state which is managed by the COSMIC runtime.
    core: cosmic::Core,
    /// Configuration data that persists between application runs.
    config: Config,
    /// The coordinator for the primary window.
    coordinator: ViewCoordinator<CosmicWindow>,
    /// Shell accelerators recorded during dispatch, run afterwards.
    pending_actions: Rc<RefCell<Vec<ShellAction>>>,
}

/// Messages emitted by the application and its widgets.
#[derive(Debug, Clone)]
pub enum Message {
    /// Configuration has been updated.
    UpdateConfig(Config),
    /// The main window has been resized.
    WindowResized(f32, f32),
    /// The live window mode, read back after a resize.
    WindowMode(Size, window::Mode),
    /// A key was pressed or released in the main window.
    Key {
        key: keyboard::Key,
        modifiers: keyboard::Modifiers,
        pressed: bool,
    },
    /// Held modifiers changed.
    ModifiersChanged(keyboard::Modifiers),
    /// The window manager asked to close a window.
    CloseRequested(window::Id),
    /// A title-bar button was pressed.
    Shell(ShellAction),
}

/// Create a COSMIC application from the app model
impl cosmic::Application for AppModel {
    /// The async executor that will be used to run your application's commands.
    type Executor = cosmic::executor::Default;

    /// Data that your application receives to its init method.
    type Flags = Flags;

    /// Messages which the application and its widgets will emit.
    type Message = Message;

    /// Unique identifier in RDNN (reverse domain name notation) format.
    const APP_ID: &'static str = app_settings::APP_ID;

    fn core(&self) -> &cosmic::Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut cosmic::Core {
        &mut self.core
    }

    /// Initializes the coordinator and applies the launch presentation.
    fn init(core: cosmic::Core, flags: Self::Flags) -> (Self, Task<cosmic::Action<Self::Message>>) {
        // Load configuration
        let config_handle = match cosmic_config::Config::new(Self::APP_ID, Config::VERSION) {
            Ok(handle) => Some(handle),
            Err(err) => {
                tracing::warn!("{}", ViewError::Config(format!("{err:?}")));
                None
            }
        };
        let config = config_handle
            .as_ref()
            .map(|context| match Config::get_entry(context) {
                Ok(config) => config,
                Err((_errors, config)) => config,
            })
            .unwrap_or_default();

        let flow = sys_locale::get_locale()
            .map(|locale| FlowDirection::for_locale(&locale))
            .unwrap_or_default();
        let theme = shell::theme_colors(cosmic::theme::active().cosmic());
        let window = CosmicWindow::new(
            "Develop",
            Size::new(
                f64::from(app_settings::DEFAULT_WIDTH),
                f64::from(app_settings::DEFAULT_HEIGHT),
            ),
            flow,
            theme,
        );

        let mut coordinator = ViewCoordinator::new(window, DialogFlag::new());
        coordinator.initialize();

        let pending_actions = Rc::new(RefCell::new(Vec::new()));
        let actions = Rc::clone(&pending_actions);
        coordinator
            .shortcut_pressed()
            .subscribe(move |shortcut: &mut ShortcutPressed| {
                if let Some(action) = shell_action(shortcut) {
                    shortcut.mark_handled();
                    actions.borrow_mut().push(action);
                }
            });

        // Remember the mode the window closes in for the next launch.
        let last_mode = Rc::new(Cell::new(PresentationMode::Resizable));
        let observed = Rc::clone(&last_mode);
        coordinator
            .view_mode_changed()
            .subscribe(move |mode: &mut PresentationMode| observed.set(*mode));
        if let Some(handle) = config_handle {
            coordinator.register_close_callback(close_callback(move || {
                let config = Config {
                    launch_mode: launch_mode_for(last_mode.get()),
                };
                config.write_entry(&handle).map_err(|err| {
                    Box::new(ViewError::Config(format!("{err:?}"))) as Box<dyn std::error::Error>
                })
            }));
        }

        let mut app = AppModel {
            core,
            config,
            coordinator,
            pending_actions,
        };

        let launch = app.apply_launch_mode();
        tracing::info!(
            "Develop took {} ms to launch",
            flags.started.elapsed().as_millis()
        );

        (app, launch)
    }

    /// Describes the interface based on the current state of the application model.
    fn view(&self) -> Element<'_, Self::Message> {
        let properties = self.coordinator.properties();
        let margin = properties.recommended_margin;

        let mut title_row = cosmic::widget::row()
            .spacing(4)
            .push(cosmic::widget::text::body(properties.title.clone()))
            .push(cosmic::widget::horizontal_space());
        for (icon, action) in title_bar_actions(self.coordinator.mode()) {
            title_row = title_row.push(
                cosmic::widget::button::icon(cosmic::widget::icon::from_name(icon))
                    .on_press(Message::Shell(action)),
            );
        }

        let title_bar = cosmic::widget::container(title_row)
            .width(Length::Fill)
            .height(Length::Fixed(properties.title_bar_height as f32))
            .padding(title_bar_padding(properties.title_bar_inset, properties.flow_direction));

        let page = cosmic::widget::container(cosmic::widget::Space::new(Length::Fill, Length::Fill))
            .width(Length::Fill)
            .height(Length::Fill)
            .padding(
                Padding::new(0.0)
                    .top(margin.top as f32)
                    .right(margin.right as f32)
                    .bottom(margin.bottom as f32)
                    .left(margin.left as f32),
            );

        cosmic::widget::column().push(title_bar).push(page).into()
    }

    /// Register subscriptions for this application.
    fn subscription(&self) -> Subscription<Self::Message> {
        let config_subscription = self
            .core()
            .watch_config::<Config>(Self::APP_ID)
            .map(|update| Message::UpdateConfig(update.config));

        let window_events = event::listen_with(|event, _, _id| match event {
            Event::Window(window::Event::Resized(size)) => {
                Some(Message::WindowResized(size.width, size.height))
            }
            Event::Keyboard(keyboard::Event::KeyPressed { key, modifiers, .. }) => {
                Some(Message::Key {
                    key,
                    modifiers,
                    pressed: true,
                })
            }
            Event::Keyboard(keyboard::Event::KeyReleased { key, modifiers, .. }) => {
                Some(Message::Key {
                    key,
                    modifiers,
                    pressed: false,
                })
            }
            Event::Keyboard(keyboard::Event::ModifiersChanged(modifiers)) => {
                Some(Message::ModifiersChanged(modifiers))
            }
            _ => None,
        });

        Subscription::batch(vec![config_subscription, window_events])
    }

    /// Routes the close request into the coordinator's negotiation.
    fn on_close_requested(&self, id: window::Id) -> Option<Message> {
        Some(Message::CloseRequested(id))
    }

    /// Repaints the title bar when the system theme changes.
    fn system_theme_update(
        &mut self,
        _keys: &[&'static str],
        new_theme: &cosmic::cosmic_theme::Theme,
    ) -> Task<cosmic::Action<Self::Message>> {
        self.coordinator
            .platform_mut()
            .set_theme(shell::theme_colors(new_theme));
        self.dispatch(PlatformEvent::ThemeChanged)
    }

    /// Handles messages emitted by the application and its widgets.
    fn update(&mut self, message: Self::Message) -> Task<cosmic::Action<Self::Message>> {
        match message {
            Message::UpdateConfig(config) => {
                self.config = config;
                Task::none()
            }
            Message::WindowResized(width, height) => {
                let size = Size::new(f64::from(width), f64::from(height));
                self.coordinator.platform_mut().set_bounds(size);
                // Full screen may have been left outside the app: read the
                // live mode before the coordinator sees the new size.
                match self.core.main_window_id() {
                    Some(id) => window::get_mode(id)
                        .map(move |mode| cosmic::Action::App(Message::WindowMode(size, mode))),
                    None => self.dispatch(PlatformEvent::SizeChanged(size)),
                }
            }
            Message::WindowMode(size, mode) => {
                self.coordinator.platform_mut().set_window_mode(mode);
                self.dispatch(PlatformEvent::SizeChanged(size))
            }
            Message::ModifiersChanged(modifiers) => {
                self.coordinator.platform_mut().set_modifiers(modifiers);
                Task::none()
            }
            Message::Key {
                key,
                modifiers,
                pressed,
            } => {
                self.coordinator.platform_mut().set_modifiers(modifiers);
                let event = KeyEvent::new(
                    shell::virtual_key(&key),
                    shell::key_event_kind(pressed, modifiers),
                );
                let dispatched = self.dispatch(PlatformEvent::AcceleratorKey(event));
                let actions: Vec<ShellAction> = self.pending_actions.borrow_mut().drain(..).collect();
                let mut tasks = vec![dispatched];
                for action in actions {
                    tasks.push(self.run_action(action));
                }
                Task::batch(tasks)
            }
            Message::CloseRequested(id) => {
                if self.core.main_window_id() != Some(id) {
                    return Task::none();
                }
                self.close()
            }
            Message::Shell(action) => self.run_action(action),
        }
    }
}

impl AppModel {
    /// Feeds a platform event to the coordinator and flushes the resulting
    /// window commands.
    fn dispatch(&mut self, event: PlatformEvent) -> Task<cosmic::Action<Message>> {
        self.handle_event(event);
        self.flush_window_commands()
    }

    fn handle_event(&mut self, event: PlatformEvent) {
        // The COSMIC window completes its async calls immediately.
        if let Err(err) = futures::executor::block_on(self.coordinator.handle_event(event)) {
            tracing::error!("Failed to handle window event: {}", err);
        }
    }

    fn run_action(&mut self, action: ShellAction) -> Task<cosmic::Action<Message>> {
        tracing::debug!("Shell action {:?}", action);
        match action {
            ShellAction::ToggleFullScreen => self.coordinator.toggle_full_screen(),
            ShellAction::ToggleCompactOverlay => {
                futures::executor::block_on(self.coordinator.toggle_compact_overlay());
            }
            ShellAction::Exit => return self.close(),
        }
        self.flush_window_commands()
    }

    /// Runs the close negotiation. The window is torn down only once the
    /// close deferral has been released.
    fn close(&mut self) -> Task<cosmic::Action<Message>> {
        let (request, mut completion) = CloseRequest::new();
        self.handle_event(PlatformEvent::CloseRequested(request));
        let commands = shell::release_commands(
            self.coordinator.platform_mut().take_commands(),
            completion.try_outcome(),
        );
        self.command_tasks(commands)
    }

    fn apply_launch_mode(&mut self) -> Task<cosmic::Action<Message>> {
        let setup = self.flush_window_commands();
        let Some(id) = self.core.main_window_id() else {
            return setup;
        };

        let launch = match self.config.launch_mode {
            LaunchMode::Windowed => Task::none(),
            LaunchMode::Maximized => window::maximize(id, true),
            LaunchMode::FullScreen => {
                self.coordinator.toggle_full_screen();
                self.flush_window_commands()
            }
        };
        Task::batch([setup, launch])
    }

    fn flush_window_commands(&mut self) -> Task<cosmic::Action<Message>> {
        let commands = self.coordinator.platform_mut().take_commands();
        self.command_tasks(commands)
    }

    fn command_tasks(&mut self, commands: Vec<WindowCommand>) -> Task<cosmic::Action<Message>> {
        if commands.is_empty() {
            return Task::none();
        }
        let Some(id) = self.core.main_window_id() else {
            tracing::warn!("Dropping {} window commands: no main window", commands.len());
            return Task::none();
        };

        let tasks: Vec<_> = commands
            .into_iter()
            .map(|command| self.command_task(id, command))
            .collect();
        Task::batch(tasks)
    }

    fn command_task(&mut self, id: window::Id, command: WindowCommand) -> Task<cosmic::Action<Message>> {
        tracing::debug!("Window command {:?}", command);
        match command {
            WindowCommand::SetTitle(title) => self.set_window_title(title, id),
            WindowCommand::EnterFullScreen => window::change_mode(id, window::Mode::Fullscreen),
            WindowCommand::ExitFullScreen => window::change_mode(id, window::Mode::Windowed),
            WindowCommand::EnterCompactOverlay(size) => Task::batch([
                window::resize(id, iced_size(size)),
                window::change_level(id, window::Level::AlwaysOnTop),
            ]),
            WindowCommand::ExitCompactOverlay(size) => Task::batch([
                window::change_level(id, window::Level::Normal),
                window::resize(id, iced_size(size)),
            ]),
            WindowCommand::ShowHeaderBar(show) => {
                self.core.window.show_headerbar = show;
                Task::none()
            }
            WindowCommand::Close => cosmic::iced::exit(),
        }
    }
}

/// Title-bar buttons for the current presentation mode, as icon names.
fn title_bar_actions(mode: PresentationMode) -> [(&'static str, ShellAction); 2] {
    let full_screen = match mode {
        PresentationMode::FullScreen => "view-restore-symbolic",
        _ => "view-fullscreen-symbolic",
    };
    let compact_overlay = match mode {
        PresentationMode::CompactOverlay => "view-restore-symbolic",
        _ => "view-paged-symbolic",
    };
    [
        (full_screen, ShellAction::ToggleFullScreen),
        (compact_overlay, ShellAction::ToggleCompactOverlay),
    ]
}

fn launch_mode_for(mode: PresentationMode) -> LaunchMode {
    match mode {
        PresentationMode::FullScreen => LaunchMode::FullScreen,
        PresentationMode::Resizable | PresentationMode::CompactOverlay => LaunchMode::Maximized,
    }
}

fn iced_size(size: Size) -> cosmic::iced::Size {
    cosmic::iced::Size::new(size.width as f32, size.height as f32)
}

/// Keeps the title text clear of the caption buttons.
fn title_bar_padding(inset: f64, flow: FlowDirection) -> Padding {
    let padding = Padding::new(0.0).top(8.0).bottom(8.0);
    match flow {
        FlowDirection::LeftToRight => padding.left(12.0).right(inset as f32),
        FlowDirection::RightToLeft => padding.left(inset as f32).right(12.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shortcut(key: VirtualKey, modifier: Modifier, enabled: bool) -> ShortcutPressed {
        ShortcutPressed {
            key,
            modifier,
            enabled,
            raw: KeyEvent::key_down(key),
        }
    }

    #[test]
    fn test_shell_shortcuts() {
        assert_eq!(
            shell_action(&shortcut(VirtualKey::Function(11), Modifier::Platform, true)),
            Some(ShellAction::ToggleFullScreen)
        );
        assert_eq!(
            shell_action(&shortcut(VirtualKey::Character('O'), Modifier::Alt, true)),
            Some(ShellAction::ToggleCompactOverlay)
        );
        assert_eq!(
            shell_action(&shortcut(VirtualKey::Character('Q'), Modifier::Control, true)),
            Some(ShellAction::Exit)
        );
        assert_eq!(
            shell_action(&shortcut(VirtualKey::Function(11), Modifier::Shift, true)),
            None
        );
    }

    /// Shortcuts under a dialog are disabled and never trigger shell actions.
    #[test]
    fn test_disabled_shortcuts_are_ignored() {
        assert_eq!(
            shell_action(&shortcut(VirtualKey::Character('Q'), Modifier::Control, false)),
            None
        );
    }

    #[test]
    fn test_title_bar_actions_follow_mode() {
        let resizable = title_bar_actions(PresentationMode::Resizable);
        assert_eq!(resizable[0], ("view-fullscreen-symbolic", ShellAction::ToggleFullScreen));
        assert_eq!(resizable[1].1, ShellAction::ToggleCompactOverlay);

        let full_screen = title_bar_actions(PresentationMode::FullScreen);
        assert_eq!(full_screen[0].0, "view-restore-symbolic");

        let overlay = title_bar_actions(PresentationMode::CompactOverlay);
        assert_eq!(overlay[1], ("view-restore-symbolic", ShellAction::ToggleCompactOverlay));
        assert!(
            overlay.iter().all(|(_, action)| *action != ShellAction::Exit),
            "closing stays with the caption buttons"
        );
    }

    #[test]
    fn test_launch_mode_for_presentation_mode() {
        assert_eq!(launch_mode_for(PresentationMode::FullScreen), LaunchMode::FullScreen);
        assert_eq!(launch_mode_for(PresentationMode::Resizable), LaunchMode::Maximized);
        assert_eq!(launch_mode_for(PresentationMode::CompactOverlay), LaunchMode::Maximized);
    }

    #[test]
    fn test_title_bar_padding_mirrors() {
        let ltr = title_bar_padding(138.0, FlowDirection::LeftToRight);
        assert_eq!(ltr.right, 138.0);
        assert_eq!(ltr.left, 12.0);

        let rtl = title_bar_padding(138.0, FlowDirection::RightToLeft);
        assert_eq!(rtl.left, 138.0);
        assert_eq!(rtl.right, 12.0);
    }
}
