// SPDX-License-Identifier: GPL-3.0-only

//! Key types and modifier resolution for window-level accelerators.
//!
//! Exactly one logical modifier is reported per accelerator. The held
//! modifier keys are checked in a fixed priority order and the first one
//! that is down wins:
//!
//! 1. Control
//! 2. Alt (`VirtualKey::Menu`)
//! 3. Shift
//!
//! When none of them is held the accelerator is reported with the
//! [`Modifier::Platform`] modifier.

/// Virtual keys as delivered by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VirtualKey {
    Control,
    /// The Alt key.
    Menu,
    Shift,
    /// The platform (logo) key.
    Platform,
    Escape,
    Enter,
    Tab,
    Back,
    Delete,
    Insert,
    Space,
    Left,
    Up,
    Right,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    /// Function keys `F1` through `F24`.
    Function(u8),
    /// A key producing a printable character.
    Character(char),
    /// Any other key, by platform key code.
    Other(u32),
}

/// The logical modifier attached to an accelerator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Modifier {
    Control,
    Alt,
    Shift,
    Platform,
}

impl Modifier {
    /// Modifier keys in resolution priority order.
    pub const PRIORITY: [(VirtualKey, Modifier); 3] = [
        (VirtualKey::Control, Modifier::Control),
        (VirtualKey::Menu, Modifier::Alt),
        (VirtualKey::Shift, Modifier::Shift),
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Modifier::Control => "Control",
            Modifier::Alt => "Alt",
            Modifier::Shift => "Shift",
            Modifier::Platform => "Platform",
        }
    }
}

/// Live key state queries.
pub trait KeyStateSource {
    /// Returns `true` while the key is held down.
    fn is_key_down(&self, key: VirtualKey) -> bool;
}

/// Resolves the single modifier reported with an accelerator.
#[must_use]
pub fn resolve_modifier(keys: &impl KeyStateSource) -> Modifier {
    Modifier::PRIORITY
        .iter()
        .find(|(key, _)| keys.is_key_down(*key))
        .map_or(Modifier::Platform, |(_, modifier)| *modifier)
}
