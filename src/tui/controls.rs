//! Keyboard input handling for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::runtime::App;

/// Maps a key press to an application action.
pub fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit = true,
        KeyCode::Char(' ') => app.toggle_pause(),
        KeyCode::Char('+' | '=') | KeyCode::Right => app.speed_up(),
        KeyCode::Char('-') | KeyCode::Left => app.speed_down(),
        KeyCode::Char('1') => app.switch_preset("reference"),
        KeyCode::Char('2') => app.switch_preset("eclipse"),
        KeyCode::Char('3') => app.switch_preset("eol_overload"),
        KeyCode::Char('4') => app.switch_preset("cell_health"),
        KeyCode::Char('r') => app.restart(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn keys_drive_app() {
        let mut app = App::new("reference").expect("reference preset should load");
        press(&mut app, KeyCode::Char(' '));
        assert!(app.paused);
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.preset_name, "eclipse");
        press(&mut app, KeyCode::Char('q'));
        assert!(app.quit);
    }
}
