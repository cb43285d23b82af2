use aide_core::{Rendered, ViewState};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use crate::app::{App, InputMode};
use crate::tui::AppEvent;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Paste(text) => {
            if app.input_mode == InputMode::Editing {
                insert_text(app, &text.replace(['\r', '\n'], " "));
            }
        }
        // Next draw picks up the new size
        AppEvent::Resize => {}
        AppEvent::Tick => app.tick_animation(),
    }
    app.clamp_cursor();
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => {
                app.should_quit = true;
                return;
            }
            // Voice works while typing too
            KeyCode::Char('r') => {
                app.toggle_voice();
                return;
            }
            _ => {}
        }
    }

    if picker_open(app) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
            app.assistant.close_file_picker();
        }
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_editing_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        // View switching
        KeyCode::Char('1') => app.switch_view(ViewState::Chat),
        KeyCode::Char('2') => app.switch_view(ViewState::Tasks),
        KeyCode::Char('3') => app.switch_view(ViewState::Settings),
        KeyCode::Char('4') => app.switch_view(ViewState::FileUpload),
        KeyCode::Tab => {
            let next = app.view().next();
            app.switch_view(next);
        }

        KeyCode::Char('v') => app.toggle_voice(),

        _ => match app.view() {
            ViewState::Chat => handle_chat_normal(app, key),
            ViewState::Tasks => handle_list_normal(app, key),
            ViewState::Settings => {
                if matches!(key.code, KeyCode::Char(' ') | KeyCode::Enter) {
                    app.toggle_selected_setting();
                } else {
                    handle_list_normal(app, key);
                }
            }
            ViewState::FileUpload => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Char('o')) {
                    app.assistant.open_file_picker();
                }
            }
        },
    }
}

fn handle_chat_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('i') | KeyCode::Enter => {
            app.input_mode = InputMode::Editing;
            app.input_cursor = app.assistant.input().chars().count();
        }
        KeyCode::Char('j') | KeyCode::Down => app.scroll_chat_down(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_chat_up(1),
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_chat_down(app.chat_height / 2);
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_chat_up(app.chat_height / 2);
        }
        KeyCode::Char('g') => app.chat_scroll = 0,
        KeyCode::Char('G') => app.scroll_chat_to_bottom(),
        _ => {}
    }
}

fn handle_list_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.list_nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.list_nav_up(),
        _ => {}
    }
}

fn handle_editing_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            app.assistant.submit_input();
            app.clamp_cursor();
            // Keep "Thinking..." visible
            app.scroll_chat_to_bottom();
        }
        KeyCode::Backspace => {
            if app.input_cursor > 0 {
                app.input_cursor -= 1;
                let input = app.assistant.input_mut();
                let byte_pos = char_to_byte_index(input, app.input_cursor);
                input.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            let input = app.assistant.input_mut();
            if app.input_cursor < input.chars().count() {
                let byte_pos = char_to_byte_index(input, app.input_cursor);
                input.remove(byte_pos);
            }
        }
        KeyCode::Left => {
            app.input_cursor = app.input_cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let char_count = app.assistant.input().chars().count();
            app.input_cursor = (app.input_cursor + 1).min(char_count);
        }
        KeyCode::Home => {
            app.input_cursor = 0;
        }
        KeyCode::End => {
            app.input_cursor = app.assistant.input().chars().count();
        }
        KeyCode::Tab => {
            app.input_mode = InputMode::Normal;
            let next = app.view().next();
            app.switch_view(next);
        }
        KeyCode::Char(c) => insert_text(app, c.encode_utf8(&mut [0; 4])),
        _ => {}
    }
}

fn insert_text(app: &mut App, text: &str) {
    let input = app.assistant.input_mut();
    let byte_pos = char_to_byte_index(input, app.input_cursor);
    input.insert_str(byte_pos, text);
    app.input_cursor += text.chars().count();
}

fn picker_open(app: &App) -> bool {
    matches!(app.assistant.render(), Rendered::FileUpload { picker_open: true, .. })
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let x = mouse.column;
    let y = mouse.row;
    let in_main = app.main_area.map(|r| point_in_rect(x, y, r)).unwrap_or(false);

    match mouse.kind {
        MouseEventKind::ScrollDown if in_main => match app.view() {
            ViewState::Chat => app.scroll_chat_down(3),
            _ => app.list_nav_down(),
        },
        MouseEventKind::ScrollUp if in_main => match app.view() {
            ViewState::Chat => app.scroll_chat_up(3),
            _ => app.list_nav_up(),
        },
        MouseEventKind::Down(MouseButton::Left) => {
            let on_drop_target = app
                .drop_target_area
                .map(|r| point_in_rect(x, y, r))
                .unwrap_or(false);
            if app.view() == ViewState::FileUpload && on_drop_target {
                app.assistant.open_file_picker();
            }
        }
        _ => {}
    }
}
