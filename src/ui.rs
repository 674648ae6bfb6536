//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).  Rendering only reads what the app
//! has already derived: the current page of query output, the facet lists,
//! and the resolved source links of the selected message.
//!
//! ## For contributors
//!
//! * The layout is a filter bar on top, the message list and a detail pane
//!   side by side, and a one-line status bar at the bottom.
//! * Colours and styles are defined inline.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, InputMode};
use crate::query::SortOrder;
use crate::source::FeedItem;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Draw the complete UI for one frame.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let [filter_area, main_area, status_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let [list_area, detail_area] = Layout::horizontal([
        Constraint::Percentage(55),
        Constraint::Percentage(45),
    ])
    .areas(main_area);

    draw_filter_bar(app, frame, filter_area);
    draw_message_list(app, frame, list_area);
    draw_detail(app, frame, detail_area);
    draw_status_bar(app, frame, status_area);
}

fn label_span(label: &str) -> Span<'_> {
    Span::styled(label, Style::default().fg(Color::DarkGray))
}

/// Search text, active filters, and sort order.
fn draw_filter_bar(app: &App, frame: &mut Frame, area: Rect) {
    let spec = app.spec();
    let searching = app.input_mode == InputMode::Search;
    let search_style = if searching {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    let arrow = match spec.sort_order {
        SortOrder::Asc => "↑",
        SortOrder::Desc => "↓",
    };

    let line = Line::from(vec![
        label_span("Search: "),
        Span::styled(
            format!("{}{}", spec.search, if searching { "▏" } else { "" }),
            search_style,
        ),
        Span::raw("   "),
        label_span("Category: "),
        Span::styled(&spec.category, Style::default().fg(Color::Cyan)),
        Span::raw("   "),
        label_span("Priority: "),
        Span::styled(&spec.priority, Style::default().fg(Color::Magenta)),
        Span::raw("   "),
        label_span("Sort: "),
        Span::styled(
            format!("{} {arrow}", spec.sort_key),
            Style::default().fg(Color::Green),
        ),
    ]);

    let bar = Paragraph::new(line).block(
        Block::default()
            .title(" InfoSphere ")
            .borders(Borders::ALL),
    );
    frame.render_widget(bar, area);
}

fn priority_color(priority: Option<&str>) -> Color {
    match priority {
        Some("high") => Color::Red,
        Some("medium") => Color::Yellow,
        _ => Color::Green,
    }
}

fn format_date(item: &FeedItem) -> String {
    item.effective_date()
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| "no date".into())
}

/// Render the current page of messages.
fn draw_message_list(app: &mut App, frame: &mut Frame, area: Rect) {
    let list_items: Vec<ListItem> = app
        .page_items()
        .into_iter()
        .map(|item| {
            let marker = if item.is_read { " " } else { "●" };
            let mut spans = vec![
                Span::styled(marker, Style::default().fg(Color::Blue)),
                Span::raw(" "),
                Span::styled(
                    format!("{:<11}", format_date(item)),
                    Style::default().fg(Color::DarkGray),
                ),
            ];
            if let Some(priority) = item.priority.as_deref() {
                spans.push(Span::styled(
                    format!("{priority:<7}"),
                    Style::default().fg(priority_color(Some(priority))),
                ));
            }
            spans.push(Span::styled(
                item.title.clone().unwrap_or_else(|| "(untitled)".into()),
                Style::default().fg(Color::White),
            ));
            if let Some(category) = item.category.as_deref().filter(|c| !c.is_empty()) {
                spans.push(Span::raw("  "));
                spans.push(Span::styled(
                    format!("[{category}]"),
                    Style::default().fg(Color::Cyan),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let title = if app.is_loading() && list_items.is_empty() {
        " Messages (loading…) ".to_string()
    } else if list_items.is_empty() {
        " No messages found ".to_string()
    } else {
        format!(" Messages ({}) ", app.visible_count())
    };

    let list = List::new(list_items)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

/// Render the selected message with its resolved sources.
fn draw_detail(app: &App, frame: &mut Frame, area: Rect) {
    let block = Block::default().title(" Detail ").borders(Borders::ALL);
    let Some(item) = app.selected_item() else {
        let hint = Paragraph::new("Try adjusting your search criteria or filters")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(hint, area);
        return;
    };

    let mut lines = vec![Line::from(Span::styled(
        item.title.clone().unwrap_or_else(|| "(untitled)".into()),
        Style::default().add_modifier(Modifier::BOLD),
    ))];

    if let Some(author) = item.author.as_deref() {
        lines.push(Line::from(vec![label_span("By "), Span::raw(author)]));
    }
    lines.push(Line::from(vec![label_span("Date: "), Span::raw(format_date(item))]));
    if let Some(updated) = item.updated_date() {
        lines.push(Line::from(vec![
            label_span("Updated: "),
            Span::raw(updated.format(DATE_FORMAT).to_string()),
        ]));
    }
    if let Some(priority) = item.priority.as_deref() {
        lines.push(Line::from(vec![
            label_span("Priority: "),
            Span::styled(priority, Style::default().fg(priority_color(Some(priority)))),
        ]));
    }
    if !item.tags.is_empty() {
        lines.push(Line::from(vec![
            label_span("Tags: "),
            Span::styled(item.tags.join(", "), Style::default().fg(Color::Blue)),
        ]));
    }
    if let Some(image) = item.image_url.as_deref() {
        lines.push(Line::from(vec![label_span("Image: "), Span::raw(image)]));
    }
    if let Some(content) = item.content.as_deref() {
        lines.push(Line::raw(""));
        lines.push(Line::raw(content));
    }

    let sources = app.selected_sources();
    if !sources.is_empty() {
        lines.push(Line::raw(""));
        lines.push(Line::from(label_span("Sources")));
        for source in sources {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {}: ", source.label),
                    Style::default().fg(Color::Cyan),
                ),
                Span::raw(source.url),
            ]));
        }
    }

    let detail = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(block);
    frame.render_widget(detail, area);
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let pagination = app.pagination();
    let status_style = if app.error.is_some() {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Yellow)
    };
    let mut spans = vec![Span::raw(" ")];
    if !app.source_name.is_empty() {
        spans.push(Span::styled(
            app.source_name.as_str(),
            Style::default().fg(Color::Cyan),
        ));
        spans.push(Span::raw("  "));
    }
    spans.extend([
        Span::styled(&app.status, status_style),
        Span::raw("  "),
        Span::styled(
            format!(
                "page {}/{}",
                pagination.page(),
                pagination.total_pages().max(1)
            ),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  /: search  c/p: filter  s/o: sort  n/b: page  r: reload  q: quit"),
    ]);
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
