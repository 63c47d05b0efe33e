//! UI rendering

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Tabs, Wrap},
    Frame,
};

use super::app::{App, Dialog, EntryForm, InputMode, CATEGORIES};

/// Main UI rendering function
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_category_bar(frame, app, chunks[0]);
    draw_table(frame, app, chunks[1]);

    match app.input_mode {
        InputMode::Search => draw_search_input(frame, app, chunks[2]),
        _ => draw_status_bar(frame, app, chunks[2]),
    }

    match app.input_mode {
        InputMode::Form => draw_form(frame, &app.form),
        InputMode::ConfirmDelete => draw_confirm_delete(frame, app),
        _ => {}
    }

    if let Some(dialog) = &app.dialog {
        draw_dialog(frame, dialog);
    }

    if app.show_help {
        draw_help_overlay(frame);
    }
}

/// Draw the category selector
fn draw_category_bar(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(format!(" Media Catalog ({}) ", app.server_url))
        .borders(Borders::ALL);

    let tabs = Tabs::new(CATEGORIES.to_vec())
        .block(block)
        .select(app.category_index)
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .add_modifier(Modifier::REVERSED),
        );

    frame.render_widget(tabs, area);
}

/// Draw the entry table
fn draw_table(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(["Name", "Author", "Date", "Category"].map(|h| {
        Cell::from(h).style(Style::default().add_modifier(Modifier::BOLD))
    }));

    let rows = app.entries.iter().map(|entry| {
        Row::new(vec![
            Cell::from(entry.name.as_str()),
            Cell::from(entry.author.as_str()),
            Cell::from(entry.date.as_str()),
            Cell::from(entry.category.as_str()),
        ])
    });

    let block = Block::default()
        .title(format!(" Entries ({}) ", app.entries.len()))
        .borders(Borders::ALL);

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(35),
            Constraint::Percentage(30),
            Constraint::Length(12),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(
        Style::default()
            .add_modifier(Modifier::BOLD)
            .add_modifier(Modifier::REVERSED),
    );

    let mut state = TableState::default();
    if !app.entries.is_empty() {
        state.select(Some(app.selected));
    }

    frame.render_stateful_widget(table, area, &mut state);
}

/// Draw the status bar at the bottom
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let content = if app.is_loading {
        "Loading...".to_string()
    } else if let Some(msg) = &app.status_message {
        msg.clone()
    } else {
        "a:add  d:del  enter:details  /:search  tab:category  r:reload  ?:help  q:quit"
            .to_string()
    };

    let paragraph = Paragraph::new(content).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Draw search input at the bottom
fn draw_search_input(frame: &mut Frame, app: &App, area: Rect) {
    let prefix = "Search: ";

    let line = Line::from(vec![
        Span::styled(prefix, Style::default().fg(Color::Cyan)),
        Span::raw(app.search_input.as_str()),
    ]);

    frame.render_widget(Paragraph::new(line), area);

    let cursor_x = area.x + (prefix.len() + app.search_input.chars().count()) as u16;
    frame.set_cursor_position((cursor_x, area.y));
}

/// Draw the new entry form
fn draw_form(frame: &mut Frame, form: &EntryForm) {
    let popup_area = centered(frame.area(), 60, 12);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" New Entry ")
        .borders(Borders::ALL)
        .border_style(Style::default().add_modifier(Modifier::BOLD));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let label_width = EntryForm::LABELS
        .iter()
        .map(|l| l.len())
        .max()
        .unwrap_or(0)
        + 2;

    let mut lines = Vec::new();
    for (i, (label, value)) in EntryForm::LABELS.iter().zip(&form.fields).enumerate() {
        let style = if i == form.focus {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{:<width$}", label, width = label_width), style),
            Span::raw(value.as_str()),
        ]));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        "tab:next field  enter:save  esc:cancel",
        Style::default().add_modifier(Modifier::DIM),
    )));

    frame.render_widget(Paragraph::new(lines), inner);

    let focused = &form.fields[form.focus];
    let cursor_x = inner.x + (label_width + focused.chars().count()) as u16;
    let cursor_y = inner.y + (form.focus * 2) as u16;
    if cursor_x < inner.right() && cursor_y < inner.bottom() {
        frame.set_cursor_position((cursor_x, cursor_y));
    }
}

/// Draw the delete confirmation
fn draw_confirm_delete(frame: &mut Frame, app: &App) {
    let name = app
        .pending_delete
        .as_ref()
        .map(|e| e.name.as_str())
        .unwrap_or_default();

    let popup_area = centered(frame.area(), 50, 6);
    frame.render_widget(Clear, popup_area);

    let text = vec![
        Line::from(format!("Delete '{}'?", name)),
        Line::from(""),
        Line::from(Span::styled(
            "y:yes  n:no",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let block = Block::default()
        .title(" Delete ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    frame.render_widget(
        Paragraph::new(text).block(block).wrap(Wrap { trim: true }),
        popup_area,
    );
}

/// Draw a modal dialog
fn draw_dialog(frame: &mut Frame, dialog: &Dialog) {
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let (title, color, mut lines) = match dialog {
        Dialog::Info(msg) => (" Info ", Color::Cyan, vec![Line::from(msg.as_str())]),
        Dialog::Warning(msg) => (" Warning ", Color::Yellow, vec![Line::from(msg.as_str())]),
        Dialog::Error(msg) => (" Error ", Color::Red, vec![Line::from(msg.as_str())]),
        Dialog::Details(entry) => (
            " Details ",
            Color::Cyan,
            vec![
                Line::from(vec![Span::styled("Name:     ", bold), Span::raw(&entry.name)]),
                Line::from(vec![Span::styled("Author:   ", bold), Span::raw(&entry.author)]),
                Line::from(vec![Span::styled("Date:     ", bold), Span::raw(&entry.date)]),
                Line::from(vec![
                    Span::styled("Category: ", bold),
                    Span::raw(&entry.category),
                ]),
                Line::from(vec![
                    Span::styled("ID:       ", bold),
                    Span::styled(&entry.id, Style::default().add_modifier(Modifier::DIM)),
                ]),
            ],
        ),
    };

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().add_modifier(Modifier::DIM),
    )));

    let popup_area = centered(frame.area(), 60, lines.len() as u16 + 2);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        popup_area,
    );
}

/// Draw help overlay
fn draw_help_overlay(frame: &mut Frame) {
    let popup_area = centered(frame.area(), 50, 20);
    frame.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from("Navigation:"),
        Line::from("  j/k, ↑/↓    Move up/down"),
        Line::from("  g/G         Jump to first/last entry"),
        Line::from("  Tab, h/l    Cycle category"),
        Line::from("  Enter       Show details"),
        Line::from(""),
        Line::from("Commands:"),
        Line::from("  a           Add entry"),
        Line::from("  d           Delete entry"),
        Line::from("  /           Search by name"),
        Line::from("  r           Reload all entries"),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().add_modifier(Modifier::BOLD));

    frame.render_widget(Paragraph::new(help_text).block(block), popup_area);
}

/// Centered popup area, clamped to the frame
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let popup_width = width.min(area.width.saturating_sub(4));
    let popup_height = height.min(area.height.saturating_sub(4));
    let popup_x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(popup_height)) / 2;
    Rect::new(popup_x, popup_y, popup_width, popup_height)
}
