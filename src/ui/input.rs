//! Maps crossterm key and mouse events to game inputs.

use crate::core::geometry::{Vec2, Viewport};
use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameInput {
    Flap,
    /// A click, already mapped into viewport coordinates.
    Touch(Vec2),
    TogglePause,
    Revive,
    Quit,
    Other,
}

pub fn map_key(key: KeyEvent) -> GameInput {
    // Terminals that report releases would otherwise flap twice.
    if key.kind == KeyEventKind::Release {
        return GameInput::Other;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => GameInput::Quit,
        KeyCode::Char(' ') | KeyCode::Up | KeyCode::Enter | KeyCode::Char('k') => GameInput::Flap,
        KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Esc => GameInput::TogglePause,
        KeyCode::Char('r') | KeyCode::Char('R') => GameInput::Revive,
        KeyCode::Char('q') | KeyCode::Char('Q') => GameInput::Quit,
        _ => GameInput::Other,
    }
}

/// Left clicks inside the play area become touches.
///
/// `play_area` is `(x, y, width, height)` in terminal cells. The click lands
/// on the center of its cell.
pub fn map_mouse(mouse: MouseEvent, play_area: (u16, u16, u16, u16), viewport: Viewport) -> GameInput {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return GameInput::Other;
    }
    let (x, y, width, height) = play_area;
    if width == 0
        || height == 0
        || mouse.column < x
        || mouse.row < y
        || mouse.column >= x + width
        || mouse.row >= y + height
    {
        return GameInput::Other;
    }
    let cell_x = (mouse.column - x) as f64 + 0.5;
    let cell_y = (mouse.row - y) as f64 + 0.5;
    GameInput::Touch(Vec2::new(
        cell_x / width as f64 * viewport.width,
        cell_y / height as f64 * viewport.height,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_flap_keys() {
        assert_eq!(map_key(press(KeyCode::Char(' '))), GameInput::Flap);
        assert_eq!(map_key(press(KeyCode::Up)), GameInput::Flap);
        assert_eq!(map_key(press(KeyCode::Enter)), GameInput::Flap);
    }

    #[test]
    fn test_control_keys() {
        assert_eq!(map_key(press(KeyCode::Char('p'))), GameInput::TogglePause);
        assert_eq!(map_key(press(KeyCode::Char('r'))), GameInput::Revive);
        assert_eq!(map_key(press(KeyCode::Char('q'))), GameInput::Quit);
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            GameInput::Quit
        );
        assert_eq!(map_key(press(KeyCode::Char('z'))), GameInput::Other);
    }

    #[test]
    fn test_release_ignored() {
        let release = KeyEvent {
            code: KeyCode::Char(' '),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(map_key(release), GameInput::Other);
    }

    #[test]
    fn test_click_maps_to_viewport() {
        let vp = Viewport::new(720.0, 1280.0);
        let input = map_mouse(click(10, 5), (1, 1, 18, 32), vp);
        let GameInput::Touch(point) = input else {
            panic!("expected a touch, got {:?}", input);
        };
        assert!((point.x - 9.5 / 18.0 * 720.0).abs() < 1e-9);
        assert!((point.y - 4.5 / 32.0 * 1280.0).abs() < 1e-9);
    }

    #[test]
    fn test_click_outside_ignored() {
        let vp = Viewport::default();
        assert_eq!(map_mouse(click(0, 0), (1, 1, 18, 32), vp), GameInput::Other);
        assert_eq!(map_mouse(click(19, 5), (1, 1, 18, 32), vp), GameInput::Other);
    }
}
