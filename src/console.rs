// SPDX-License-Identifier: GPL-3.0-only

use uefi::status::{Result, Status};

use crate::config::PollErrorPolicy;

/// One keystroke as reported by the console input protocol.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct InputKey {
    pub scan_code: u16,
    pub unicode_char: u16,
}

impl InputKey {
    pub fn character(c: char) -> Self {
        Self {
            scan_code: 0,
            unicode_char: c as u16,
        }
    }
}

/// Console input, as the firmware exposes it.
pub trait ConsoleService {
    /// Non-blocking poll. Fails with `NOT_READY` when no key is pending.
    fn read_key_stroke(&mut self) -> Result<InputKey>;

    /// Blocks until the console signals that a key is available.
    fn wait_for_key_event(&mut self) -> Result<()>;
}

/// Waits for one keystroke and consumes it from the console queue.
///
/// A `NOT_READY` poll suspends on the console's key event before polling
/// again. Any other poll failure is handled according to `policy`.
pub fn wait_for_key<C: ConsoleService + ?Sized>(console: &mut C, policy: PollErrorPolicy) -> Result<InputKey> {
    loop {
        let status = match console.read_key_stroke() {
            Ok(input) => return Ok(input),
            Err(status) => status,
        };

        if status != Status::NOT_READY {
            debugln!("ReadKeyStroke: {}", status);
            match policy {
                PollErrorPolicy::Retry => continue,
                PollErrorPolicy::Propagate => return Err(status),
            }
        }

        if let Err(err) = console.wait_for_key_event() {
            debugln!("WaitForEvent: {}", err);
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Key {
    Backspace,
    Tab,
    Enter,
    Character(char),
    Up,
    Down,
    Right,
    Left,
    Home,
    End,
    Insert,
    Delete,
    PageUp,
    PageDown,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    Escape,
    Scancode(u16),
}

impl From<InputKey> for Key {
    fn from(input: InputKey) -> Self {
        match input.scan_code {
            0 => match char::from_u32(input.unicode_char as u32) {
                Some('\u{8}') => Key::Backspace,
                Some('\t') => Key::Tab,
                Some('\r') => Key::Enter,
                Some(c) => Key::Character(c),
                // Lone surrogate halves never arrive as keystrokes
                None => Key::Character(char::REPLACEMENT_CHARACTER),
            },
            1 => Key::Up,
            2 => Key::Down,
            3 => Key::Right,
            4 => Key::Left,
            5 => Key::Home,
            6 => Key::End,
            7 => Key::Insert,
            8 => Key::Delete,
            9 => Key::PageUp,
            10 => Key::PageDown,
            11 => Key::F1,
            12 => Key::F2,
            13 => Key::F3,
            14 => Key::F4,
            15 => Key::F5,
            16 => Key::F6,
            17 => Key::F7,
            18 => Key::F8,
            19 => Key::F9,
            20 => Key::F10,
            21 => Key::F11,
            22 => Key::F12,
            23 => Key::Escape,
            scancode => Key::Scancode(scancode),
        }
    }
}
