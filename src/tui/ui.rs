use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::api::Backend;
use crate::core::{format, DashboardState, Severity, Symbol, UiStatus};
use crate::tui::app::{App, FormField};

pub fn draw<B: Backend>(frame: &mut Frame<'_>, app: &App<B>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(5),
            Constraint::Min(10),
            Constraint::Length(3),
        ])
        .split(frame.area());

    render_header(frame, chunks[0], &app.state);
    render_price_cards(frame, chunks[1], &app.state);
    render_mnav_cards(frame, chunks[2], &app.state);
    render_config_forms(frame, chunks[3], app);
    render_footer(frame, chunks[4], &app.state);
    render_notifications(frame, &app.state);
}

fn status_style(status: UiStatus) -> Style {
    match status {
        UiStatus::Loading => Style::default().fg(Color::Yellow),
        UiStatus::Online => Style::default().fg(Color::Green),
        UiStatus::Error => Style::default().fg(Color::Red),
    }
}

fn render_header(frame: &mut Frame<'_>, area: Rect, state: &DashboardState) {
    let last_update = state
        .last_update
        .as_deref()
        .unwrap_or(format::PLACEHOLDER);
    let line = Line::from(vec![
        Span::styled(
            "mNAV Tracker",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(
            state.status_message.clone(),
            status_style(state.status).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("  |  Last update: {last_update}")),
    ]);
    let header = Paragraph::new(line)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
    frame.render_widget(header, area);
}

fn price_card(title: &str, value: String, present: bool) -> Paragraph<'static> {
    let border = if present { Color::Green } else { Color::Red };
    Paragraph::new(Line::from(Span::styled(
        value,
        Style::default().add_modifier(Modifier::BOLD),
    )))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(title.to_string())
            .border_style(Style::default().fg(border)),
    )
    .alignment(Alignment::Center)
}

fn render_price_cards(frame: &mut Frame<'_>, area: Rect, state: &DashboardState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(area);

    let prices = state.prices;
    frame.render_widget(
        price_card("SBET", format::price(prices.sbet), prices.sbet.is_some()),
        columns[0],
    );
    frame.render_widget(
        price_card("BMNR", format::price(prices.bmnr), prices.bmnr.is_some()),
        columns[1],
    );
    frame.render_widget(
        price_card("ETH", format::price(prices.eth), prices.eth.is_some()),
        columns[2],
    );
}

fn render_mnav_cards(frame: &mut Frame<'_>, area: Rect, state: &DashboardState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let mnavs = state.mnavs;
    frame.render_widget(
        price_card("SBET mNAV", format::ratio(mnavs.sbet), mnavs.sbet.is_some()),
        columns[0],
    );
    frame.render_widget(
        price_card("BMNR mNAV", format::ratio(mnavs.bmnr), mnavs.bmnr.is_some()),
        columns[1],
    );
}

fn render_config_forms<B: Backend>(frame: &mut Frame<'_>, area: Rect, app: &App<B>) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    for (i, symbol) in Symbol::ALL.into_iter().enumerate() {
        render_form(frame, columns[i], app, symbol);
    }
}

fn input_line(label: &str, value: &str, selected: bool) -> Line<'static> {
    let style = if selected {
        Style::default().fg(Color::Black).bg(Color::Cyan)
    } else {
        Style::default()
    };
    let cursor = if selected { "_" } else { "" };
    Line::from(vec![
        Span::raw(format!("{label:<18}")),
        Span::styled(format!("{value}{cursor}"), style),
    ])
}

fn render_form<B: Backend>(frame: &mut Frame<'_>, area: Rect, app: &App<B>, symbol: Symbol) {
    let state = &app.state;
    let entry = state.holdings.get(&symbol);
    let form = state.form(symbol);

    let shares_selected = app.cursor == (symbol, FormField::Shares);
    let eth_selected = app.cursor == (symbol, FormField::Eth);

    let mut lines = vec![
        Line::from(format!(
            "Shares outstanding: {}",
            format::count_opt(entry.map(|e| e.shares_outstanding))
        )),
        Line::from(format!(
            "ETH holdings:       {}",
            format::count_opt(entry.map(|e| e.eth_holdings))
        )),
        Line::from(""),
        input_line("New shares:", &form.shares, shares_selected),
        input_line("New ETH:", &form.eth, eth_selected),
        Line::from(""),
    ];
    if form.submitting {
        lines.push(Line::from(Span::styled(
            "Saving...",
            Style::default().fg(Color::Yellow),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "Enter to save, d for defaults",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("{symbol} configuration"));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_footer(frame: &mut Frame<'_>, area: Rect, state: &DashboardState) {
    let last_saved = state.last_saved.as_deref().unwrap_or(format::PLACEHOLDER);
    let mut spans = vec![Span::raw(format!(
        "Config: {}  |  Last saved: {last_saved}",
        state.config_note
    ))];
    if state.updating {
        spans.push(Span::styled(
            "  |  Updating...",
            Style::default().fg(Color::Yellow),
        ));
    }
    spans.push(Span::styled(
        "  |  Tab: field  Enter: save  u: update  r: refresh  q: quit",
        Style::default().fg(Color::DarkGray),
    ));

    let footer = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Left);
    frame.render_widget(footer, area);
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Success => Color::Green,
        Severity::Error => Color::Red,
        Severity::Info => Color::Cyan,
        Severity::Warning => Color::Yellow,
    }
}

/// Stack transient notifications above the footer, newest at the bottom.
fn render_notifications(frame: &mut Frame<'_>, state: &DashboardState) {
    let area = frame.area();
    let height = 3u16;

    for (i, notification) in state.notifications.iter().rev().enumerate() {
        let width = (notification.message.len() as u16 + 4).min(area.width.saturating_sub(2));
        let x = area.width.saturating_sub(width + 1);
        let y_offset = (i as u16 + 1) * height + 1;
        if y_offset + height > area.height {
            break;
        }
        let y = area.height.saturating_sub(y_offset);
        let rect = Rect::new(x, y, width, height);

        let color = severity_color(notification.severity);
        let widget = Paragraph::new(notification.message.clone())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color))
                    .style(Style::default().bg(Color::Black)),
            )
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center);
        frame.render_widget(widget, rect);
    }
}
