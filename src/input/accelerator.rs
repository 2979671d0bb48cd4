// SPDX-License-Identifier: GPL-3.0-only

//! Window-level accelerator capture and re-dispatch.
//!
//! Every key-down event that reaches the window is turned into a
//! [`ShortcutPressed`] notification carrying the key, the resolved modifier
//! and the raw event. Receivers decide whether they handle it; the
//! dispatcher never consumes the event itself.
//!
//! Accelerators are reported as disabled while a modal dialog is shown, so
//! shortcuts do not fire underneath it.

use super::modifier::{KeyStateSource, Modifier, VirtualKey, resolve_modifier};
use crate::notify::Observers;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Kind of a raw key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEventKind {
    KeyDown,
    KeyUp,
    /// Key down while the system menu key combination is active.
    SystemKeyDown,
    SystemKeyUp,
    Character,
}

impl KeyEventKind {
    #[must_use]
    pub fn is_down(&self) -> bool {
        matches!(self, KeyEventKind::KeyDown | KeyEventKind::SystemKeyDown)
    }
}

/// A raw key event from the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: VirtualKey,
    pub kind: KeyEventKind,
    /// Set by a receiver to stop further processing by the platform.
    pub handled: bool,
}

impl KeyEvent {
    #[must_use]
    pub fn new(key: VirtualKey, kind: KeyEventKind) -> Self {
        Self {
            key,
            kind,
            handled: false,
        }
    }

    #[must_use]
    pub fn key_down(key: VirtualKey) -> Self {
        Self::new(key, KeyEventKind::KeyDown)
    }
}

/// Notification published for every accelerator key-down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutPressed {
    pub key: VirtualKey,
    pub modifier: Modifier,
    /// `false` while a modal dialog is shown.
    pub enabled: bool,
    pub raw: KeyEvent,
}

impl ShortcutPressed {
    /// Marks the underlying platform event as handled.
    pub fn mark_handled(&mut self) {
        self.raw.handled = true;
    }

    #[must_use]
    pub fn is_handled(&self) -> bool {
        self.raw.handled
    }

    /// Returns `true` if this is an enabled accelerator for `key` with `modifier`.
    #[must_use]
    pub fn matches(&self, key: VirtualKey, modifier: Modifier) -> bool {
        self.enabled && self.key == key && self.modifier == modifier
    }
}

/// Shared flag set by dialog presenters while a modal dialog is visible.
#[derive(Debug, Clone, Default)]
pub struct DialogFlag(Arc<AtomicBool>);

impl DialogFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_shown(&self, shown: bool) {
        self.0.store(shown, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_shown(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Resolves and republishes accelerator key events.
#[derive(Debug, Clone, Default)]
pub struct AcceleratorDispatcher {
    dialog: DialogFlag,
}

impl AcceleratorDispatcher {
    #[must_use]
    pub fn new(dialog: DialogFlag) -> Self {
        Self { dialog }
    }

    /// The dialog flag consulted when building notifications.
    #[must_use]
    pub fn dialog_flag(&self) -> &DialogFlag {
        &self.dialog
    }

    /// Publishes a [`ShortcutPressed`] for key-down events and returns the raw
    /// event with whatever `handled` state the receivers left on it.
    pub fn dispatch(
        &self,
        event: KeyEvent,
        keys: &impl KeyStateSource,
        observers: &mut Observers<ShortcutPressed>,
    ) -> KeyEvent {
        if !event.kind.is_down() {
            return event;
        }

        let mut shortcut = ShortcutPressed {
            key: event.key,
            modifier: resolve_modifier(keys),
            enabled: !self.dialog.is_shown(),
            raw: event,
        };

        tracing::debug!(
            "Accelerator {:?} with {} (enabled: {})",
            shortcut.key,
            shortcut.modifier.as_str(),
            shortcut.enabled
        );

        observers.notify(&mut shortcut);
        shortcut.raw
    }
}
