/// Ctrl+A, the escape key of the interactive sample.
pub const CTRL_A: u8 = 0x01;

/// What to do with one keystroke read from the local terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Forward these bytes to the connection.
    Send(Vec<u8>),
    /// Ctrl+A was pressed; wait for the next key.
    Pending,
    /// Ctrl+A then `x`.
    Exit,
}

/// Tracks the Ctrl+A escape across keystrokes.
///
/// Ctrl+A followed by any key other than `x` forwards both bytes. Ctrl+A
/// twice forwards a single Ctrl+A.
#[derive(Debug, Default)]
pub struct EscapeFilter {
    last_was_ctrl_a: bool,
}

impl EscapeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, ch: u8) -> KeyAction {
        if !self.last_was_ctrl_a {
            if ch == CTRL_A {
                self.last_was_ctrl_a = true;
                return KeyAction::Pending;
            }
            return KeyAction::Send(vec![ch]);
        }

        self.last_was_ctrl_a = false;
        match ch {
            b'x' => KeyAction::Exit,
            CTRL_A => KeyAction::Send(vec![CTRL_A]),
            other => KeyAction::Send(vec![CTRL_A, other]),
        }
    }
}
