#![forbid(unsafe_code)]

//! Canonical input events.
//!
//! The runtime converts raw crossterm events into this small canonical
//! set so the application model and its tests never touch the backend
//! types directly. Coordinates are 0-indexed.

/// Canonical input event delivered to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A keyboard press.
    Key(KeyEvent),
    /// A mouse event.
    Mouse(MouseEvent),
    /// Terminal was resized to `width` x `height` cells.
    Resize { width: u16, height: u16 },
    /// A scheduled tick fired.
    Tick,
}

/// A key press with modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// A key press without modifiers.
    #[inline]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
        }
    }

    /// Whether this is a plain press of `c`.
    #[inline]
    pub fn is_char(&self, c: char) -> bool {
        matches!(self.code, KeyCode::Char(ch) if ch == c) && self.modifiers == Modifiers::NONE
    }

    /// Whether Ctrl is held.
    #[inline]
    pub const fn ctrl(&self) -> bool {
        self.modifiers.ctrl
    }
}

/// The keys the viewer distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Escape,
    Up,
    Down,
    Left,
    Right,
}

/// Modifier keys held during an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        alt: false,
        shift: false,
    };

    /// Ctrl only.
    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        alt: false,
        shift: false,
    };
}

/// A mouse event at a cell position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub x: u16,
    pub y: u16,
}

/// What the mouse did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEventKind {
    Down(MouseButton),
    Up(MouseButton),
    Drag(MouseButton),
    Moved,
    ScrollUp,
    ScrollDown,
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl Event {
    /// Convert a crossterm event, dropping kinds the viewer ignores
    /// (key releases, focus and paste events).
    pub fn from_crossterm(event: crossterm::event::Event) -> Option<Self> {
        use crossterm::event as ct;

        match event {
            ct::Event::Key(key) if key.kind != ct::KeyEventKind::Release => {
                let code = match key.code {
                    ct::KeyCode::Char(c) => KeyCode::Char(c),
                    ct::KeyCode::Enter => KeyCode::Enter,
                    ct::KeyCode::Esc => KeyCode::Escape,
                    ct::KeyCode::Up => KeyCode::Up,
                    ct::KeyCode::Down => KeyCode::Down,
                    ct::KeyCode::Left => KeyCode::Left,
                    ct::KeyCode::Right => KeyCode::Right,
                    _ => return None,
                };
                Some(Self::Key(KeyEvent {
                    code,
                    modifiers: Modifiers {
                        ctrl: key.modifiers.contains(ct::KeyModifiers::CONTROL),
                        alt: key.modifiers.contains(ct::KeyModifiers::ALT),
                        shift: key.modifiers.contains(ct::KeyModifiers::SHIFT),
                    },
                }))
            }
            ct::Event::Key(_) => None,
            ct::Event::Mouse(mouse) => {
                let kind = match mouse.kind {
                    ct::MouseEventKind::Down(b) => MouseEventKind::Down(convert_button(b)?),
                    ct::MouseEventKind::Up(b) => MouseEventKind::Up(convert_button(b)?),
                    ct::MouseEventKind::Drag(b) => MouseEventKind::Drag(convert_button(b)?),
                    ct::MouseEventKind::Moved => MouseEventKind::Moved,
                    ct::MouseEventKind::ScrollUp => MouseEventKind::ScrollUp,
                    ct::MouseEventKind::ScrollDown => MouseEventKind::ScrollDown,
                    _ => return None,
                };
                Some(Self::Mouse(MouseEvent {
                    kind,
                    x: mouse.column,
                    y: mouse.row,
                }))
            }
            ct::Event::Resize(width, height) => Some(Self::Resize { width, height }),
            _ => None,
        }
    }
}

fn convert_button(button: crossterm::event::MouseButton) -> Option<MouseButton> {
    use crossterm::event::MouseButton as Ct;
    match button {
        Ct::Left => Some(MouseButton::Left),
        Ct::Right => Some(MouseButton::Right),
        Ct::Middle => Some(MouseButton::Middle),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event as ct;

    #[test]
    fn char_press_converts() {
        let raw = ct::Event::Key(ct::KeyEvent::new(
            ct::KeyCode::Char('q'),
            ct::KeyModifiers::NONE,
        ));
        let event = Event::from_crossterm(raw).unwrap();
        assert_eq!(event, Event::Key(KeyEvent::new(KeyCode::Char('q'))));
    }

    #[test]
    fn ctrl_modifier_survives_conversion() {
        let raw = ct::Event::Key(ct::KeyEvent::new(
            ct::KeyCode::Char('c'),
            ct::KeyModifiers::CONTROL,
        ));
        let Some(Event::Key(key)) = Event::from_crossterm(raw) else {
            panic!("expected a key event");
        };
        assert!(key.ctrl());
        assert!(!key.is_char('c'), "modified press is not a plain char");
    }

    #[test]
    fn key_release_is_dropped() {
        let raw = ct::Event::Key(ct::KeyEvent::new_with_kind(
            ct::KeyCode::Char('q'),
            ct::KeyModifiers::NONE,
            ct::KeyEventKind::Release,
        ));
        assert_eq!(Event::from_crossterm(raw), None);
    }

    #[test]
    fn scroll_converts_with_position() {
        let raw = ct::Event::Mouse(ct::MouseEvent {
            kind: ct::MouseEventKind::ScrollUp,
            column: 12,
            row: 7,
            modifiers: ct::KeyModifiers::NONE,
        });
        assert_eq!(
            Event::from_crossterm(raw),
            Some(Event::Mouse(MouseEvent {
                kind: MouseEventKind::ScrollUp,
                x: 12,
                y: 7,
            }))
        );
    }

    #[test]
    fn resize_converts() {
        let raw = ct::Event::Resize(120, 40);
        assert_eq!(
            Event::from_crossterm(raw),
            Some(Event::Resize {
                width: 120,
                height: 40
            })
        );
    }
}
