// File: src/tui/view.rs
use crate::color_utils;
use crate::controller::{TreeNode, TreeRow};
use crate::model::{ConferenceDisplay, ConferenceInstance};
use crate::tui::state::{AppState, Focus, InputMode};
use chrono::{DateTime, Utc};

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

pub fn draw(f: &mut Frame, state: &mut AppState) {
    let full_help_text = vec![
        Line::from(vec![
            Span::styled(
                " GLOBAL ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" Tab:Switch Focus  ?:Toggle Help  q:Quit"),
        ]),
        Line::from(vec![
            Span::styled(
                " NAVIGATION ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" j/k:Up/Down  PgUp/PgDn:Scroll"),
        ]),
        Line::from(vec![
            Span::styled(
                " AREAS ",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" Space:Check/Uncheck  Enter:Expand/Collapse  Right/Left:Open/Close"),
        ]),
        Line::from(vec![
            Span::styled("        ", Style::default()), // Indent alignment
            Span::raw("*:Select All/Clear All"),
        ]),
        Line::from(vec![
            Span::styled(
                " VIEW & FILTER ",
                Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" /:Search  t:Next Taxonomy  n:Hide/Show Next Tier"),
        ]),
    ];

    let footer_height = if state.show_full_help {
        Constraint::Length(full_help_text.len() as u16 + 2)
    } else {
        Constraint::Length(3)
    };

    let v_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), footer_height])
        .split(f.area());

    let h_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(v_chunks[0]);

    // --- Details ---
    let details = state
        .get_selected_conference()
        .map(details_lines)
        .unwrap_or_else(|| vec![Line::from("No details.")]);
    let max_details = (v_chunks[0].height / 2).max(3);
    let details_height = (details.len() as u16 + 2).clamp(3, max_details);

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(details_height)])
        .split(h_chunks[1]);

    // --- Sidebar ---
    let sidebar_style = if state.active_focus == Focus::Sidebar {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let sidebar_items: Vec<ListItem> = state.tree.iter().map(tree_item).collect();
    let sidebar_title = match state.controller.taxonomy_name() {
        Some(name) => format!(" Areas ({}) ", name),
        None => " Areas ".to_string(),
    };

    let sidebar = List::new(sidebar_items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(sidebar_title)
                .border_style(sidebar_style),
        )
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::Blue),
        );
    f.render_stateful_widget(sidebar, h_chunks[0], &mut state.tree_state);

    // --- Conference List ---
    let list_inner_width = main_chunks[0].width.saturating_sub(2) as usize;
    let now = state.now;
    let urgent_days = state.urgent_days;

    let items: Vec<ListItem> = if state.loading() {
        vec![ListItem::new(Line::from(Span::styled(
            "Loading conferences...",
            Style::default().fg(Color::DarkGray),
        )))]
    } else {
        state
            .conferences
            .iter()
            .map(|c| card_item(c, now, urgent_days, list_inner_width))
            .collect()
    };

    let main_style = if state.active_focus == Focus::Main {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let mut main_title = format!(" Deadlines ({}) ", state.conferences.len());
    if !state.controller.search_query().is_empty() {
        main_title = format!(
            " Deadlines ({}) matching '{}' ",
            state.conferences.len(),
            state.controller.search_query()
        );
    }
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(main_title)
                .border_style(main_style),
        )
        .highlight_style(Style::default().bg(Color::DarkGray));
    f.render_stateful_widget(list, main_chunks[0], &mut state.list_state);

    let details_widget = Paragraph::new(details)
        .block(Block::default().borders(Borders::ALL).title(" Details "))
        .wrap(Wrap { trim: true });
    f.render_widget(details_widget, main_chunks[1]);

    // --- Footer ---
    let footer_area = v_chunks[1];
    match state.mode {
        InputMode::Searching => {
            let prefix = "/";
            let input = Paragraph::new(Line::from(vec![
                Span::styled(prefix, Style::default().fg(Color::Yellow)),
                Span::raw(state.input_buffer.as_str()),
            ]))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Search (Enter:Keep  Esc:Clear) "),
            );
            f.render_widget(input, footer_area);

            let typed: String = state
                .input_buffer
                .chars()
                .take(state.cursor_position)
                .collect();
            let cursor_x = footer_area.x + 1 + prefix.width() as u16 + typed.width() as u16;
            f.set_cursor_position((
                cursor_x.min(footer_area.x + footer_area.width.saturating_sub(2)),
                footer_area.y + 1,
            ));
        }
        InputMode::Normal => {
            if state.show_full_help {
                let p = Paragraph::new(full_help_text)
                    .block(Block::default().borders(Borders::ALL).title(" Help "))
                    .wrap(Wrap { trim: false });
                f.render_widget(p, footer_area);
            } else {
                let status = Paragraph::new(state.message.clone())
                    .style(Style::default().fg(Color::Cyan))
                    .block(
                        Block::default()
                            .borders(Borders::LEFT | Borders::TOP | Borders::BOTTOM)
                            .title(" Status "),
                    );
                let help_str = match state.active_focus {
                    Focus::Sidebar => "?:Help q:Quit Tab:List Spc:Check ↵:Expand *:All t:Taxonomy",
                    Focus::Main => "?:Help q:Quit Tab:Areas /:Find t:Taxonomy n:Next Tier",
                };
                let help = Paragraph::new(help_str).alignment(Alignment::Right).block(
                    Block::default()
                        .borders(Borders::RIGHT | Borders::TOP | Borders::BOTTOM)
                        .title(" Actions "),
                );

                let chunks = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
                    .split(footer_area);
                f.render_widget(status, chunks[0]);
                f.render_widget(help, chunks[1]);
            }
        }
    }
}

fn tree_item(row: &TreeRow) -> ListItem<'static> {
    let indent = "  ".repeat(row.depth);
    let arrow = match row.expanded {
        Some(true) => "▾ ",
        Some(false) => "▸ ",
        None => "  ",
    };
    let label_style = match &row.node {
        TreeNode::ParentArea { color_index, .. } => {
            let (r, g, b) = color_utils::parent_area_rgb(*color_index);
            Style::default()
                .fg(Color::Rgb(r, g, b))
                .add_modifier(Modifier::BOLD)
        }
        TreeNode::Area { .. } => Style::default(),
        TreeNode::Conference { .. } => Style::default().fg(Color::Gray),
    };

    ListItem::new(Line::from(vec![
        Span::raw(format!("{}{}", indent, arrow)),
        Span::raw(format!("{} ", row.check.symbol())),
        Span::styled(row.label().to_string(), label_style),
    ]))
}

fn card_item(
    conf: &ConferenceInstance,
    now: DateTime<Utc>,
    urgent_days: i64,
    width: usize,
) -> ListItem<'static> {
    let title = conf.title();
    let countdown = conf.countdown_label(now);
    let days_left = conf
        .deadline_instant()
        .filter(|d| *d > now)
        .map(|d| (d - now).num_days());
    let (r, g, b) = color_utils::urgency_rgb(days_left, urgent_days);

    // Right-align the countdown
    let used = title.width() + countdown.width();
    let pad = width.saturating_sub(used).max(1);

    let mut lines = vec![Line::from(vec![
        Span::styled(title, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" ".repeat(pad)),
        Span::styled(countdown, Style::default().fg(Color::Rgb(r, g, b))),
    ])];

    let mut meta = vec![
        Span::styled("  Deadline ", Style::default().fg(Color::DarkGray)),
        Span::raw(conf.deadline_label()),
        Span::styled("  Notification ", Style::default().fg(Color::DarkGray)),
        Span::raw(conf.notification_label()),
    ];
    if let Some(place) = &conf.place {
        meta.push(Span::raw("  "));
        meta.push(Span::styled(place.clone(), Style::default().fg(Color::Blue)));
    }
    lines.push(Line::from(meta));

    ListItem::new(lines)
}

fn details_lines(conf: &ConferenceInstance) -> Vec<Line<'static>> {
    let label = Style::default().fg(Color::DarkGray);
    let mut lines = Vec::new();

    if let Some(desc) = &conf.description {
        lines.push(Line::from(desc.clone()));
    }
    lines.push(Line::from(vec![
        Span::styled("Conference: ", label),
        Span::raw(conf.date_label()),
        Span::styled("  Deadline: ", label),
        Span::raw(conf.deadline_label()),
        Span::styled("  Notification: ", label),
        Span::raw(conf.notification_label()),
    ]));
    if let Some(place) = &conf.place {
        lines.push(Line::from(vec![
            Span::styled("Place: ", label),
            Span::raw(place.clone()),
        ]));
    }
    if let Some(link) = &conf.link {
        lines.push(Line::from(vec![
            Span::styled("Link: ", label),
            Span::styled(link.clone(), Style::default().fg(Color::LightBlue)),
        ]));
    }
    if let Some(note) = &conf.note {
        lines.push(Line::from(vec![
            Span::styled("Note: ", label),
            Span::raw(note.clone()),
        ]));
    }
    lines
}
