//! Keyboard input dispatch: global keys, then screen-specific keys.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::app::{AppState, Screen, WINDOW_STEP_DAYS};

pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => {
            app.running = false;
            return;
        }
        KeyCode::Char('1') => {
            app.screen = Screen::Quotes;
            return;
        }
        KeyCode::Char('2') => {
            app.screen = Screen::Tips;
            return;
        }
        KeyCode::Char('r') => {
            app.reload();
            return;
        }
        _ => {}
    }

    match app.screen {
        Screen::Quotes => handle_quotes_key(app, key),
        Screen::Tips => handle_tips_key(app, key),
    }
}

fn handle_quotes_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('[') => app.shift_window(-WINDOW_STEP_DAYS),
        KeyCode::Char(']') => app.shift_window(WINDOW_STEP_DAYS),
        _ => {}
    }
}

fn handle_tips_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Right | KeyCode::Char('l') => app.tips.next_chart(),
        KeyCode::Left | KeyCode::Char('h') => app.tips.prev_chart(),
        _ => {}
    }
}
