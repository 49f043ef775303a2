use enigo::KeyboardControllable;
use enigo::{Enigo, Key};
use std::{thread, time::Duration};
use swipenav_core::{Action, Controller, Key as InternalKey, Keymap, Modifier, Shortcut, SpecialKey};
use tracing::{debug, warn};

/// Carries out actions by pressing their keyboard shortcuts
pub struct EnigoController {
    enigo: Enigo,
    keymap: Keymap,
}

// Delay between starting to hold down keys for keyboard shortcuts
const KEY_HOLD_DELAY: u64 = 2;

impl EnigoController {
    pub fn new(keymap: Keymap) -> Self {
        Self {
            enigo: Enigo::new(),
            keymap,
        }
    }

    fn key_combo(&mut self, keys: &[Key], delay: u64) {
        for k in keys {
            self.enigo.key_down(*k);
            thread::sleep(Duration::from_millis(delay));
        }

        // release in reverse so modifiers are let go last
        for k in keys.iter().rev() {
            self.enigo.key_up(*k);
        }
    }
}

impl Controller for EnigoController {
    fn dispatch(&mut self, action: Action) {
        let keys = match self.keymap.get(action) {
            Some(shortcut) => shortcut_keys(shortcut),
            None => {
                warn!("no shortcut for {:?}", action);
                return;
            }
        };
        debug!("pressing {:?} for {:?}", keys, action);
        self.key_combo(&keys, KEY_HOLD_DELAY);
    }
}

/// Keys to hold down for a shortcut, modifiers first
fn shortcut_keys(shortcut: &Shortcut) -> Vec<Key> {
    let mut keys = Vec::with_capacity(shortcut.modifiers.len() + 1);
    for m in &shortcut.modifiers {
        keys.push(from_modifier(*m));
    }
    keys.push(from_internal_key(&shortcut.key));
    keys
}

fn from_internal_key(key: &InternalKey) -> Key {
    match key {
        InternalKey::Special(special_key) => match special_key {
            SpecialKey::Backspace => Key::Backspace,
            SpecialKey::Delete => Key::Delete,
            SpecialKey::DownArrow => Key::DownArrow,
            SpecialKey::End => Key::End,
            SpecialKey::Escape => Key::Escape,
            SpecialKey::F1 => Key::F1,
            SpecialKey::F10 => Key::F10,
            SpecialKey::F11 => Key::F11,
            SpecialKey::F12 => Key::F12,
            SpecialKey::F2 => Key::F2,
            SpecialKey::F3 => Key::F3,
            SpecialKey::F4 => Key::F4,
            SpecialKey::F5 => Key::F5,
            SpecialKey::F6 => Key::F6,
            SpecialKey::F7 => Key::F7,
            SpecialKey::F8 => Key::F8,
            SpecialKey::F9 => Key::F9,
            SpecialKey::Home => Key::Home,
            SpecialKey::LeftArrow => Key::LeftArrow,
            SpecialKey::PageDown => Key::PageDown,
            SpecialKey::PageUp => Key::PageUp,
            SpecialKey::Return => Key::Return,
            SpecialKey::RightArrow => Key::RightArrow,
            SpecialKey::Space => Key::Space,
            SpecialKey::Tab => Key::Tab,
            SpecialKey::UpArrow => up_arrow(),
        },
        InternalKey::Layout(c) => Key::Layout(*c),
    }
}

// NOTE: enigo sends the wrong keycode for the up arrow on macOS
#[cfg(target_os = "macos")]
fn up_arrow() -> Key {
    Key::Raw(0x7e)
}

#[cfg(not(target_os = "macos"))]
fn up_arrow() -> Key {
    Key::UpArrow
}

fn from_modifier(modifier: Modifier) -> Key {
    match modifier {
        Modifier::Alt => Key::Alt,
        Modifier::Control => Key::Control,
        Modifier::Meta => Key::Meta,
        Modifier::Shift => Key::Shift,
    }
}
