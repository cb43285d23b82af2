use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};
use aide_core::{Message, Rendered, SettingControl, Speaker, StatusIcon, Task, TaskStatus, ViewState};
use crate::app::{App, InputMode};

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, status line, footer
    let [header_area, body_area, status_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    app.main_area = Some(body_area);

    render_header(app, frame, header_area);

    match app.view() {
        ViewState::Chat => render_chat(app, frame, body_area),
        ViewState::Tasks => render_tasks(app, frame, body_area),
        ViewState::Settings => render_settings(app, frame, body_area),
        ViewState::FileUpload => render_file_upload(app, frame, body_area),
    }

    render_status(app, frame, status_area);
    render_footer(app, frame, footer_area);

    if matches!(app.assistant.render(), Rendered::FileUpload { picker_open: true, .. }) {
        render_file_picker(frame, area);
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let current = app.view();

    let mut spans = vec![
        Span::styled(
            format!(" {} ", app.assistant.config().assistant_name),
            Style::default().fg(Color::Cyan).bold(),
        ),
        Span::styled(
            format!("v{} ", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
    ];

    for (i, view) in ViewState::all().into_iter().enumerate() {
        let style = if view == current {
            Style::default().fg(Color::Black).bg(Color::Cyan).bold()
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::raw(" "));
        spans.push(Span::styled(format!(" {} {} ", i + 1, view.display_name()), style));
    }

    if app.assistant.is_listening() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(" ● REC ", Style::default().fg(Color::White).bg(Color::Red).bold()));
    }

    let header = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn status_glyph(icon: StatusIcon) -> (&'static str, Color) {
    match icon {
        StatusIcon::Processing => ("⟳", Color::Yellow),
        StatusIcon::Received => ("✓", Color::Green),
        StatusIcon::Listening => ("◉", Color::Red),
        StatusIcon::Stopped => ("■", Color::Magenta),
        StatusIcon::Info => ("ℹ", Color::Cyan),
    }
}

fn render_status(app: &App, frame: &mut Frame, area: Rect) {
    let line = match app.assistant.status() {
        Some(status) => {
            let (glyph, color) = status_glyph(status.icon);
            Line::from(vec![
                Span::styled(format!(" {} ", glyph), Style::default().fg(color).bold()),
                Span::raw(status.text.as_str()),
            ])
        }
        None => Line::default(),
    };

    frame.render_widget(Paragraph::new(line), area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let mode_style = match app.input_mode {
        InputMode::Normal => Style::default().bg(Color::Blue).fg(Color::White),
        InputMode::Editing => Style::default().bg(Color::Yellow).fg(Color::Black),
    };

    let mode_text = match app.input_mode {
        InputMode::Normal => " NORMAL ",
        InputMode::Editing => " INSERT ",
    };

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let hint = |key: &'static str, label: &'static str| {
        [
            Span::styled(format!(" {} ", key), key_style),
            Span::styled(format!(" {} ", label), label_style),
        ]
    };

    let picker_open = matches!(app.assistant.render(), Rendered::FileUpload { picker_open: true, .. });

    let hints: Vec<[Span; 2]> = if picker_open {
        vec![hint("Esc", "close picker")]
    } else {
        match (app.view(), app.input_mode) {
            (ViewState::Chat, InputMode::Editing) => vec![
                hint("Enter", "send"),
                hint("^R", "voice"),
                hint("Esc", "normal"),
                hint("Tab", "next view"),
            ],
            (ViewState::Chat, InputMode::Normal) => vec![
                hint("i", "type"),
                hint("j/k", "scroll"),
                hint("v", "voice"),
                hint("1-4", "views"),
                hint("q", "quit"),
            ],
            (ViewState::Tasks, _) => vec![
                hint("j/k", "nav"),
                hint("v", "voice"),
                hint("1-4", "views"),
                hint("q", "quit"),
            ],
            (ViewState::Settings, _) => vec![
                hint("j/k", "nav"),
                hint("Space", "toggle"),
                hint("1-4", "views"),
                hint("q", "quit"),
            ],
            (ViewState::FileUpload, _) => vec![
                hint("Enter", "browse"),
                hint("1-4", "views"),
                hint("q", "quit"),
            ],
        }
    };

    let mut spans = vec![Span::styled(mode_text, mode_style), Span::raw(" ")];
    for pair in hints {
        spans.extend(pair);
        spans.push(Span::raw(" "));
    }

    let footer = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(footer, area);
}

fn chat_text(messages: &[Message], thinking: bool, animation_frame: u8) -> Text<'_> {
    let mut lines: Vec<Line> = Vec::new();

    for msg in messages {
        let label_style = match msg.speaker {
            Speaker::User => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            Speaker::Assistant => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        };
        lines.push(Line::from(Span::styled(format!("{}:", msg.speaker.label()), label_style)));
        for line in msg.text.lines() {
            lines.push(Line::from(line));
        }
        lines.push(Line::default());
    }

    if thinking {
        lines.push(Line::from(Span::styled(
            "AI:",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((animation_frame as usize) + 1);
        lines.push(Line::from(Span::styled(
            format!("Thinking{}", dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    Text::from(lines)
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    let [chat_area, input_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(3),
    ])
    .areas(area);

    // Store chat area dimensions for scroll calculations (inner size minus borders)
    app.chat_height = chat_area.height.saturating_sub(2);
    app.chat_width = chat_area.width.saturating_sub(2);

    let thinking = app.assistant.pending_responses() > 0;
    let text = match app.assistant.render() {
        Rendered::Chat { messages } => chat_text(messages, thinking, app.animation_frame),
        _ => Text::default(),
    };

    let chat_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Chat ");

    let chat = Paragraph::new(text)
        .block(chat_block)
        .wrap(Wrap { trim: true })
        .scroll((app.chat_scroll, 0));

    frame.render_widget(chat, chat_area);

    let editing = app.input_mode == InputMode::Editing;
    let (title, border_color) = if app.assistant.is_listening() {
        (" Listening... ", Color::Red)
    } else if editing {
        (" Message ", Color::Yellow)
    } else {
        (" Message (i to type) ", Color::DarkGray)
    };

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);

    // Calculate visible portion of input with horizontal scrolling
    let inner_width = input_area.width.saturating_sub(2) as usize;
    let cursor_pos = app.input_cursor;

    let scroll_offset = if inner_width == 0 {
        0
    } else if cursor_pos >= inner_width {
        cursor_pos - inner_width + 1
    } else {
        0
    };

    let visible_text: String = app
        .assistant
        .input()
        .chars()
        .skip(scroll_offset)
        .take(inner_width)
        .collect();

    let input = Paragraph::new(visible_text)
        .style(Style::default().fg(Color::Cyan))
        .block(input_block);

    frame.render_widget(input, input_area);

    // Show cursor when editing
    if editing {
        let cursor_x = (cursor_pos - scroll_offset) as u16;
        frame.set_cursor_position((input_area.x + cursor_x + 1, input_area.y + 1));
    }
}

fn task_item(task: &Task) -> ListItem<'static> {
    let (marker, color) = match task.status {
        TaskStatus::Pending => ("[ ]", Color::White),
        TaskStatus::InProgress => ("[~]", Color::Yellow),
        TaskStatus::Completed => ("[x]", Color::Green),
    };

    let name_style = if task.status == TaskStatus::Completed {
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default()
    };

    ListItem::new(Line::from(vec![
        Span::styled(format!(" {} ", marker), Style::default().fg(color)),
        Span::styled(task.name.clone(), name_style),
        Span::styled(
            format!("  {}", task.status.display_name()),
            Style::default().fg(Color::DarkGray),
        ),
    ]))
}

fn render_tasks(app: &mut App, frame: &mut Frame, area: Rect) {
    let Rendered::Tasks { tasks, add_label } = app.assistant.render() else {
        return;
    };

    let [list_area, add_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" Tasks ({}) ", tasks.len()));

    let items: Vec<ListItem> = tasks.iter().map(task_item).collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, list_area, &mut app.tasks_state);

    let add = Paragraph::new(Line::from(vec![
        Span::styled(format!(" {} ", add_label), Style::default().fg(Color::Green).bold()),
        Span::styled("say \"add task: ...\" in chat", Style::default().fg(Color::DarkGray)),
    ]));
    frame.render_widget(add, add_area);
}

fn setting_item(control: &SettingControl) -> ListItem<'static> {
    ListItem::new(Line::from(vec![
        Span::raw(format!(" {:<24}", control.label)),
        Span::styled(control.display_value(), Style::default().fg(Color::Yellow).bold()),
    ]))
}

fn render_settings(app: &mut App, frame: &mut Frame, area: Rect) {
    let Rendered::Settings { controls } = app.assistant.render() else {
        return;
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Settings ");

    let items: Vec<ListItem> = controls.iter().map(setting_item).collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.settings_state);
}

fn render_file_upload(app: &mut App, frame: &mut Frame, area: Rect) {
    let Rendered::FileUpload { prompt, hint, .. } = app.assistant.render() else {
        return;
    };

    let outer = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" File Upload ");
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    // Drop target centered in the panel
    let width = 50.min(inner.width.saturating_sub(4));
    let height = 7.min(inner.height);
    let target = Rect::new(
        inner.x + (inner.width.saturating_sub(width)) / 2,
        inner.y + (inner.height.saturating_sub(height)) / 2,
        width,
        height,
    );
    app.drop_target_area = Some(target);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let text = Text::from(vec![
        Line::default(),
        Line::from(Span::styled(prompt, Style::default().fg(Color::White).bold())),
        Line::default(),
        Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))),
    ]);

    let drop_target = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(drop_target, target);
}

fn render_file_picker(frame: &mut Frame, area: Rect) {
    // Calculate popup size and position (centered)
    let popup_width = 44.min(area.width.saturating_sub(4));
    let popup_height = 5.min(area.height.saturating_sub(4));

    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Select Files (Esc to close) ");

    let body = Paragraph::new(vec![
        Line::default(),
        Line::from(Span::styled(
            "No files are read in this session",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .alignment(Alignment::Center)
    .block(block);

    frame.render_widget(body, popup_area);
}
