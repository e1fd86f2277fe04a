use crate::quote::view::QuoteView;
use crate::sync::SyncState;
use crate::ui::app::{
    AddForm, App, DisplayMode, FocusPane, FormField, InputMode, NotificationLevel, PathAction,
    PathPrompt,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

pub fn render(frame: &mut Frame, app: &App) {
    // Main layout: Header + Body + Footer
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Body
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    render_header(frame, app, main_chunks[0]);

    // Split body into left (category pickers) and right (quote display)
    let body_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(main_chunks[1]);

    let picker_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(body_chunks[0]);

    render_picker(frame, app, FocusPane::RandomPicker, picker_chunks[0]);
    render_picker(frame, app, FocusPane::FilterPicker, picker_chunks[1]);

    match app.mode {
        DisplayMode::Random => render_random(frame, app, body_chunks[1]),
        DisplayMode::List => render_list(frame, app, body_chunks[1]),
    }

    render_footer(frame, app, main_chunks[2]);

    match &app.input {
        InputMode::AddQuote(form) => render_add_form(frame, form),
        InputMode::Path(prompt) => render_path_prompt(frame, prompt),
        InputMode::Normal => {}
    }

    if app.show_help {
        render_help(frame);
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let sync = match app.sync_state {
        SyncState::Idle => Span::styled("● idle", Style::default().fg(Color::Gray)),
        SyncState::Syncing => Span::styled("⟳ syncing", Style::default().fg(Color::Yellow)),
    };

    let header_text = vec![Line::from(vec![
        Span::styled(
            "  QUOTEBOOK  ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("{} quotes  ", app.store.len())),
        sync,
    ])];

    let header = Paragraph::new(header_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().bg(Color::Black));

    frame.render_widget(header, area);
}

fn render_picker(frame: &mut Frame, app: &App, pane: FocusPane, area: Rect) {
    let (selector, title) = match pane {
        FocusPane::RandomPicker => (&app.random_selector, "🎲 Random from"),
        FocusPane::FilterPicker => (&app.filter_selector, "🔎 Filter list"),
    };
    let selected = selector.position(&app.index);
    let focused = app.focus == pane;

    let items: Vec<ListItem> = app
        .index
        .options()
        .iter()
        .enumerate()
        .map(|(i, category)| {
            let style = if i == selected && focused {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else if i == selected {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::White)
            };
            let marker = if i == selected { "▶" } else { " " };
            ListItem::new(format!("{marker} {category}")).style(style)
        })
        .collect();

    let border_color = if focused { Color::Cyan } else { Color::Gray };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(border_color)),
    );

    frame.render_widget(list, area);
}

fn render_random(frame: &mut Frame, app: &App, area: Rect) {
    let text = match &app.current {
        QuoteView::Quote(quote) => vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("“{}”", quote.text),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Category: ", Style::default().fg(Color::Gray)),
                Span::raw(quote.category.clone()),
            ]),
        ],
        QuoteView::Empty { category, message } => vec![
            Line::from(""),
            Line::from(Span::styled(message.clone(), Style::default().fg(Color::Gray))),
            Line::from(vec![
                Span::styled("Category: ", Style::default().fg(Color::Gray)),
                Span::raw(category.clone()),
            ]),
        ],
        QuoteView::Placeholder => vec![Line::from("Press Enter to show a quote")],
    };

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("💬 Quote")
                .border_style(Style::default().fg(Color::Magenta)),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let view = app.list_view();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("📜 {}", view.title()))
        .border_style(Style::default().fg(Color::Magenta));

    if let Some(message) = &view.empty_message {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Gray),
        )))
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = view
        .quotes
        .iter()
        .map(|quote| {
            ListItem::new(vec![
                Line::from(format!("“{}”", quote.text)),
                Line::from(Span::styled(
                    format!("    — {}", quote.category),
                    Style::default().fg(Color::Gray),
                )),
            ])
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let footer = match app.latest_notification() {
        Some(notification) => {
            let color = match notification.level {
                NotificationLevel::Info => Color::Cyan,
                NotificationLevel::Success => Color::Green,
                NotificationLevel::Error => Color::Red,
            };
            Paragraph::new(format!(
                "[{}] {}",
                notification
                    .created_at
                    .with_timezone(&chrono::Local)
                    .format("%H:%M:%S"),
                notification.message
            ))
            .style(Style::default().fg(color))
        }
        None => Paragraph::new(
            "[↑↓/jk] Select  [Tab] Switch  [Enter] Show  [a] Add  [e/i] Export/Import  [s] Sync  [?] Help  [q] Quit",
        )
        .style(Style::default().fg(Color::Gray)),
    };

    frame.render_widget(footer, area);
}

fn render_add_form(frame: &mut Frame, form: &AddForm) {
    let area = centered_rect(60, 9, frame.area());
    let field_style = |field: FormField| {
        if form.field == field {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        }
    };

    let text = vec![
        Line::from(vec![
            Span::styled("Quote:    ", field_style(FormField::Text)),
            Span::raw(form.text.clone()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Category: ", field_style(FormField::Category)),
            Span::raw(form.category.clone()),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "[Tab] Next field  [Enter] Save  [Esc] Cancel",
            Style::default().fg(Color::Gray),
        )),
    ];

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("➕ Add Quote")
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn render_path_prompt(frame: &mut Frame, prompt: &PathPrompt) {
    let area = centered_rect(60, 5, frame.area());
    let title = match prompt.action {
        PathAction::Export => "💾 Export to file",
        PathAction::Import => "📂 Import from file",
    };

    let text = vec![
        Line::from(format!("{}█", prompt.buffer)),
        Line::from(Span::styled(
            "[Enter] Confirm  [Esc] Cancel",
            Style::default().fg(Color::Gray),
        )),
    ];

    let paragraph = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn render_help(frame: &mut Frame) {
    let area = centered_rect(60, 16, frame.area());
    let bindings = [
        ("q", "Quit"),
        ("Tab", "Switch between pickers"),
        ("↑↓ / jk", "Change category"),
        ("Enter", "Show random quote / list"),
        ("n", "New random quote"),
        ("l", "Show filtered list"),
        ("a", "Add a quote"),
        ("e", "Export quotes to a file"),
        ("i", "Import quotes from a file"),
        ("s", "Sync with server now"),
        ("R", "Reload from storage"),
        ("?", "Close this help"),
    ];

    let text: Vec<Line> = bindings
        .iter()
        .map(|(key, action)| {
            Line::from(vec![
                Span::styled(format!("{key:>10}  "), Style::default().fg(Color::Yellow)),
                Span::raw(*action),
            ])
        })
        .collect();

    let paragraph = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .title("❓ Help")
            .border_style(Style::default().fg(Color::Cyan)),
    );

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

/// A rectangle of `percent_x` width and `height` rows, centered in `area`
fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let height = height.min(area.height);
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(area.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
