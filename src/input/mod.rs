// SPDX-License-Identifier: GPL-3.0-only

//! Keyboard input handling for the primary window.
//!
//! - **Modifier resolution** ([`modifier`]): reduces the held modifier keys to
//!   the single [`Modifier`] reported with an accelerator.
//! - **Accelerator dispatch** ([`accelerator`]): turns window-level key-down
//!   events into [`ShortcutPressed`] notifications.
//!
//! # Example
//!
//! ```rust,ignore
//! use develop::input::{ShortcutPressed, VirtualKey, Modifier};
//!
//! coordinator.shortcut_pressed().subscribe(|shortcut: &mut ShortcutPressed| {
//!     if shortcut.matches(VirtualKey::Character('S'), Modifier::Control) {
//!         save_current_file();
//!         shortcut.mark_handled();
//!     }
//! });
//! ```

pub mod accelerator;
pub mod modifier;

pub use accelerator::{AcceleratorDispatcher, DialogFlag, KeyEvent, KeyEventKind, ShortcutPressed};
pub use modifier::{KeyStateSource, Modifier, VirtualKey, resolve_modifier};
