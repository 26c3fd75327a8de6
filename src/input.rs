//! Input handling: crossterm events to game commands
//!
//! The mouse is the pointer. Terminal cells are converted to layout units
//! relative to the play field, two columns to a unit horizontally.

use blastrs::layout::Vec2;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

/// Everything the player can ask for
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    DragStart(Vec2),
    DragMove(Vec2),
    DragEnd,
    Undo,
    Restart,
    ToggleMusic,
    Quit,
}

/// Map a key press to a command
pub fn key_command(key: KeyEvent) -> Option<Command> {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Command::Quit),
        KeyCode::Char('u') | KeyCode::Char('U') | KeyCode::Backspace => Some(Command::Undo),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::Restart),
        KeyCode::Char('m') | KeyCode::Char('M') => Some(Command::ToggleMusic),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Command::Quit),
        _ => None,
    }
}

/// Map a mouse event to a drag command, `field` being the play field's inner area
pub fn mouse_command(mouse: MouseEvent, field: Rect) -> Option<Command> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            Some(Command::DragStart(to_layout(mouse.column, mouse.row, field)))
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            Some(Command::DragMove(to_layout(mouse.column, mouse.row, field)))
        }
        MouseEventKind::Up(MouseButton::Left) => Some(Command::DragEnd),
        _ => None,
    }
}

/// Terminal cell to layout units, aimed at the middle of the cell
pub fn to_layout(column: u16, row: u16, field: Rect) -> Vec2 {
    let x = (column as f64 - field.x as f64 + 0.5) / 2.0;
    let y = row as f64 - field.y as f64 + 0.5;
    Vec2::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventKind;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_to_layout() {
        let field = Rect::new(10, 4, 40, 27);
        assert_eq!(to_layout(10, 4, field), Vec2::new(0.25, 0.5));
        // Fourth grid cell, second row of its glyphs
        assert_eq!(to_layout(23, 7, field), Vec2::new(6.75, 3.5));
    }

    #[test]
    fn test_pointer_left_of_field_is_negative() {
        let field = Rect::new(10, 4, 40, 27);
        let p = to_layout(0, 0, field);
        assert!(p.x < 0.0 && p.y < 0.0);
    }

    #[test]
    fn test_mouse_drag_sequence() {
        let field = Rect::new(0, 0, 40, 27);
        assert!(matches!(
            mouse_command(mouse(MouseEventKind::Down(MouseButton::Left), 4, 24), field),
            Some(Command::DragStart(_))
        ));
        assert!(matches!(
            mouse_command(mouse(MouseEventKind::Drag(MouseButton::Left), 5, 20), field),
            Some(Command::DragMove(_))
        ));
        assert_eq!(
            mouse_command(mouse(MouseEventKind::Up(MouseButton::Left), 5, 20), field),
            Some(Command::DragEnd)
        );
        assert_eq!(
            mouse_command(mouse(MouseEventKind::Down(MouseButton::Right), 5, 20), field),
            None
        );
        assert_eq!(mouse_command(mouse(MouseEventKind::Moved, 5, 20), field), None);
    }

    #[test]
    fn test_keys() {
        let press = |code| KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Press);
        assert_eq!(key_command(press(KeyCode::Char('u'))), Some(Command::Undo));
        assert_eq!(key_command(press(KeyCode::Char('r'))), Some(Command::Restart));
        assert_eq!(key_command(press(KeyCode::Char('m'))), Some(Command::ToggleMusic));
        assert_eq!(key_command(press(KeyCode::Esc)), Some(Command::Quit));
        assert_eq!(key_command(press(KeyCode::Char('x'))), None);
        assert_eq!(
            key_command(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Command::Quit)
        );
    }
}
