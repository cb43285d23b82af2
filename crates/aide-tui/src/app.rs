use aide_core::{Assistant, Rendered, ViewState};
use ratatui::layout::Rect;
use ratatui::widgets::ListState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Terminal-side state layered over the core assistant
pub struct App {
    pub should_quit: bool,
    pub assistant: Assistant,
    pub input_mode: InputMode,

    // Chat panel
    pub input_cursor: usize, // in chars, not bytes
    pub chat_scroll: u16,
    pub chat_height: u16, // inner size, for scroll calculations
    pub chat_width: u16,

    // List panels
    pub tasks_state: ListState,
    pub settings_state: ListState,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Areas for mouse hit-testing (updated during render)
    pub main_area: Option<Rect>,
    pub drop_target_area: Option<Rect>,
}

impl App {
    pub fn new(assistant: Assistant) -> Self {
        Self {
            should_quit: false,
            assistant,
            input_mode: InputMode::Editing,
            input_cursor: 0,
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            tasks_state: ListState::default(),
            settings_state: ListState::default(),
            animation_frame: 0,
            main_area: None,
            drop_target_area: None,
        }
    }

    pub fn view(&self) -> ViewState {
        self.assistant.current_view()
    }

    /// Swap the main panel. Every view starts from a clean panel state.
    pub fn switch_view(&mut self, view: ViewState) {
        self.assistant.activate(view);
        self.chat_scroll = 0;
        self.drop_target_area = None;
        self.tasks_state = ListState::default();
        self.settings_state = ListState::default();

        match view {
            ViewState::Chat => self.input_mode = InputMode::Editing,
            ViewState::Tasks => {
                self.input_mode = InputMode::Normal;
                if !self.assistant.tasks().is_empty() {
                    self.tasks_state.select(Some(0));
                }
            }
            ViewState::Settings => {
                self.input_mode = InputMode::Normal;
                self.settings_state.select(Some(0));
            }
            ViewState::FileUpload => self.input_mode = InputMode::Normal,
        }
    }

    /// Fire elapsed timers and follow any delivered reply
    pub fn run_timers(&mut self) {
        if self.assistant.run_due() > 0 {
            self.clamp_cursor();
        }
        if self.assistant.take_scroll_request() {
            self.scroll_chat_to_bottom();
        }
    }

    pub fn toggle_voice(&mut self) {
        self.assistant.start_listening();
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.assistant.pending_responses() > 0 || self.assistant.is_listening() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    pub fn clamp_cursor(&mut self) {
        let char_count = self.assistant.input().chars().count();
        self.input_cursor = self.input_cursor.min(char_count);
    }

    // Chat scrolling

    fn chat_line_count(&self) -> usize {
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        let Rendered::Chat { messages } = self.assistant.render() else {
            return 0;
        };

        let mut total_lines: usize = 0;
        for msg in messages {
            total_lines = total_lines.saturating_add(1); // "You:" / "AI:" label
            for line in msg.text.lines() {
                let char_count = line.chars().count();
                total_lines = total_lines.saturating_add(char_count / wrap_width + 1);
            }
            total_lines = total_lines.saturating_add(1); // blank line after message
        }

        if self.assistant.pending_responses() > 0 {
            total_lines = total_lines.saturating_add(2); // "AI:" + "Thinking..."
        }
        total_lines
    }

    /// Largest offset that still fills the panel, clamped to what the widget can scroll
    fn max_chat_scroll(&self, visible_height: u16) -> u16 {
        let max = self.chat_line_count().saturating_sub(visible_height as usize);
        u16::try_from(max).unwrap_or(u16::MAX)
    }

    pub fn scroll_chat_to_bottom(&mut self) {
        let visible_height = if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        };
        self.chat_scroll = self.max_chat_scroll(visible_height);
    }

    pub fn scroll_chat_down(&mut self, lines: u16) {
        let max_scroll = self.max_chat_scroll(self.chat_height);
        self.chat_scroll = self.chat_scroll.saturating_add(lines).min(max_scroll);
    }

    pub fn scroll_chat_up(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_sub(lines);
    }

    // List navigation

    pub fn list_nav_down(&mut self) {
        let (state, len) = match self.view() {
            ViewState::Tasks => (&mut self.tasks_state, self.assistant.tasks().len()),
            ViewState::Settings => (&mut self.settings_state, settings_len(&self.assistant)),
            _ => return,
        };
        if len > 0 {
            let i = state.selected().unwrap_or(0);
            state.select(Some((i + 1).min(len - 1)));
        }
    }

    pub fn list_nav_up(&mut self) {
        let state = match self.view() {
            ViewState::Tasks => &mut self.tasks_state,
            ViewState::Settings => &mut self.settings_state,
            _ => return,
        };
        let i = state.selected().unwrap_or(0);
        state.select(Some(i.saturating_sub(1)));
    }

    pub fn toggle_selected_setting(&mut self) {
        if let Some(i) = self.settings_state.selected() {
            if let Some(control) = self.assistant.toggle_setting(i) {
                tracing::debug!(label = control.label, value = %control.display_value(), "setting changed");
            }
        }
    }
}

fn settings_len(assistant: &Assistant) -> usize {
    match assistant.render() {
        Rendered::Settings { controls } => controls.len(),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aide_core::{Config, DelayRange, SettingValue};
    use std::time::Duration;

    fn app() -> App {
        let mut config = Config::new();
        config.thinking_delay_ms = DelayRange::new(1000, 1000);
        App::new(Assistant::new(config).with_seed(4))
    }

    #[test]
    fn test_starts_editing_chat() {
        let app = app();
        assert_eq!(app.view(), ViewState::Chat);
        assert_eq!(app.input_mode, InputMode::Editing);
    }

    #[test]
    fn test_switch_view_resets_panel_state() {
        let mut app = app();
        app.chat_scroll = 7;
        app.switch_view(ViewState::Settings);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.settings_state.selected(), Some(0));
        assert_eq!(app.chat_scroll, 0);
    }

    #[test]
    fn test_list_nav_clamps() {
        let mut app = app();
        app.switch_view(ViewState::Tasks);
        for _ in 0..10 {
            app.list_nav_down();
        }
        assert_eq!(app.tasks_state.selected(), Some(app.assistant.tasks().len() - 1));
        for _ in 0..10 {
            app.list_nav_up();
        }
        assert_eq!(app.tasks_state.selected(), Some(0));
    }

    #[test]
    fn test_toggle_selected_setting() {
        let mut app = app();
        app.switch_view(ViewState::Settings);
        app.toggle_selected_setting();
        match app.assistant.render() {
            Rendered::Settings { controls } => {
                assert_eq!(controls[0].value, SettingValue::Toggle(false));
            }
            _ => panic!("expected settings"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_scrolls_to_bottom() {
        let mut app = app();
        app.chat_height = 3;
        app.chat_width = 40;
        for text in ["hello", "help", "open calculator"] {
            app.assistant.submit(text);
        }

        tokio::time::advance(Duration::from_millis(1000)).await;
        app.run_timers();
        assert!(app.chat_scroll > 0);
        assert_eq!(app.chat_scroll as usize, app.chat_line_count() - 3);
    }

    #[test]
    fn test_scroll_survives_transcript_taller_than_u16() {
        let mut app = app();
        app.chat_height = 10;
        app.chat_width = 40;
        let tall = "line\n".repeat(u16::MAX as usize + 100);
        app.assistant.submit(&tall);

        assert!(app.chat_line_count() > u16::MAX as usize);
        app.scroll_chat_to_bottom();
        assert_eq!(app.chat_scroll, u16::MAX);

        app.scroll_chat_down(5);
        assert_eq!(app.chat_scroll, u16::MAX);
        app.scroll_chat_up(5);
        assert_eq!(app.chat_scroll, u16::MAX - 5);
    }
}
