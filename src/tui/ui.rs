use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::modal::ControlId;
use crate::session::controls;
use crate::session::{
    Fragment, MainView, ModalView, NavView, ResultsView, SearchView, SuggestionView,
    VerticalResultsView,
};
use crate::teaser::Teaser;
use crate::tui::app::SearchTui;
use crate::vertical::vertical_title;

const ACCENT: Color = Color::Cyan;
const MATCH: Color = Color::Yellow;

pub fn draw<S, T>(frame: &mut Frame, app: &SearchTui<S, T>) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search form
            Constraint::Length(3), // Vertical navigation
            Constraint::Min(5),    // Results
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_form(frame, app, chunks[0]);
    if let Some(view) = app.view.as_ref() {
        if view.is_visible {
            draw_nav(frame, app, view, chunks[1]);
            draw_results(frame, app, view, chunks[2]);
        }
        if let Some(modal) = view.modal.as_ref() {
            draw_modal(frame, app, view, modal, area);
        }
        if let Some(form) = view.form.as_ref() {
            if form.suggestions_open && !form.suggestions.is_empty() {
                draw_suggestions(frame, app, &form.suggestions, chunks[0]);
            }
        }
    }
    draw_status_bar(frame, app, chunks[3]);

    if app.focus.as_str() == controls::INPUT && !app.scroll.is_locked() {
        let cursor_pos = u16::try_from(app.input.cursor_pos).unwrap_or(u16::MAX);
        let cursor_x = chunks[0].x.saturating_add(1).saturating_add(cursor_pos);
        frame.set_cursor_position(Position::new(cursor_x, chunks[0].y + 1));
    }
}

fn focused(app: &SearchTui<impl Sized, impl Sized>, id: &str) -> bool {
    app.focus.as_str() == id
}

fn control_style(is_focused: bool) -> Style {
    if is_focused {
        Style::default()
            .fg(Color::Black)
            .bg(ACCENT)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    }
}

fn border_style(is_focused: bool) -> Style {
    if is_focused {
        Style::default().fg(ACCENT)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn draw_form<S, T>(frame: &mut Frame, app: &SearchTui<S, T>, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(10),
            Constraint::Length(10),
            Constraint::Length(9),
        ])
        .split(area);

    let input = Paragraph::new(app.input.text.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style(focused(app, controls::INPUT)))
            .title(" Search "),
    );
    frame.render_widget(input, columns[0]);

    for (id, label, column) in [
        (controls::SUBMIT, "Search", columns[1]),
        (controls::RESET, "Reset", columns[2]),
    ] {
        let is_focused = focused(app, id);
        let button = Paragraph::new(label)
            .alignment(Alignment::Center)
            .style(control_style(is_focused))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border_style(is_focused)),
            );
        frame.render_widget(button, column);
    }
}

fn suggestion_line(suggestion: &SuggestionView, selected: bool) -> Line<'_> {
    let base = if selected {
        Style::default().bg(Color::DarkGray)
    } else {
        Style::default()
    };
    if suggestion.segments.is_empty() {
        return Line::from(Span::styled(suggestion.value.as_str(), base));
    }
    let spans: Vec<Span<'_>> = suggestion
        .segments
        .iter()
        .map(|segment| {
            let style = if segment.highlighted {
                base.fg(MATCH).add_modifier(Modifier::BOLD)
            } else {
                base
            };
            Span::styled(segment.text.as_str(), style)
        })
        .collect();
    Line::from(spans)
}

fn draw_suggestions<S, T>(
    frame: &mut Frame,
    app: &SearchTui<S, T>,
    suggestions: &[SuggestionView],
    form_area: Rect,
) {
    let height = u16::try_from(suggestions.len()).unwrap_or(u16::MAX).saturating_add(2);
    let popup_area = Rect::new(
        form_area.x,
        form_area.y + form_area.height,
        form_area.width.saturating_sub(19).max(10),
        height,
    )
    .intersection(frame.area());

    frame.render_widget(Clear, popup_area);
    let lines: Vec<Line<'_>> = suggestions
        .iter()
        .enumerate()
        .map(|(idx, suggestion)| suggestion_line(suggestion, app.suggestion_index == Some(idx)))
        .collect();
    let list = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ACCENT)),
    );
    frame.render_widget(list, popup_area);
}

fn draw_nav<S, T>(frame: &mut Frame, app: &SearchTui<S, T>, view: &SearchView, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let line = match &view.nav {
        Fragment::Content(nav) => nav_line(app, nav),
        Fragment::Pending => Line::from(Span::styled("Loading...", Style::default().fg(Color::DarkGray))),
        Fragment::Error(message) => Line::from(Span::styled(message.as_str(), Style::default().fg(Color::Red))),
        Fragment::NoChange | Fragment::Empty => Line::default(),
    };
    let title = match &view.nav {
        Fragment::Content(nav) => format!(" {} ", nav.heading),
        _ => String::new(),
    };
    frame.render_widget(Paragraph::new(line).block(block.title(title)), area);
}

fn nav_line<'a, S, T>(app: &SearchTui<S, T>, nav: &'a NavView) -> Line<'a> {
    if nav.layout.is_mobile() {
        let button = Span::styled(
            " Filters ",
            control_style(focused(app, controls::OPEN_MODAL)),
        );
        return Line::from(vec![
            button,
            Span::raw("  "),
            Span::styled(nav.current_title.as_str(), Style::default().fg(ACCENT)),
        ]);
    }

    let mut spans = Vec::new();
    for entry in &nav.entries {
        let id = controls::nav(&entry.id);
        let mut style = control_style(app.focus == id);
        if entry.active && app.focus != id {
            style = style.fg(ACCENT).add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        }
        spans.push(Span::styled(format!(" {} ", entry.title), style));
        spans.push(Span::raw("│"));
    }
    spans.pop();
    Line::from(spans)
}

fn teaser_lines(teaser: &Teaser) -> Vec<Line<'_>> {
    let mut lines = vec![Line::from(Span::styled(
        format!("• {}", teaser.title),
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    if let Some(subtitle) = &teaser.subtitle {
        lines.push(Line::from(format!("  {subtitle}")));
    }
    if let Some(url) = &teaser.url {
        lines.push(Line::from(Span::styled(
            format!("  {url}"),
            Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
        )));
    }
    lines
}

fn universal_lines<'a, S, T>(app: &SearchTui<S, T>, results: &'a ResultsView) -> Vec<Line<'a>> {
    match results {
        ResultsView::NoResults { heading, copy } => vec![
            Line::from(Span::styled(*heading, Style::default().add_modifier(Modifier::BOLD))),
            Line::from(*copy),
        ],
        ResultsView::Sections { sections } => {
            let mut lines = Vec::new();
            for section in sections {
                lines.push(Line::from(Span::styled(
                    section.title.as_str(),
                    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
                )));
                for teaser in &section.results {
                    lines.extend(teaser_lines(teaser));
                }
                let view_all = controls::view_all(&section.vertical_id);
                lines.push(Line::from(Span::styled(
                    " View All › ",
                    control_style(app.focus == view_all),
                )));
                lines.push(Line::default());
            }
            lines
        }
    }
}

fn vertical_lines(results: &VerticalResultsView) -> Vec<Line<'_>> {
    let mut lines = vec![Line::from(Span::styled(
        format!("{} ({} results)", results.title, results.results_count),
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
    ))];
    for teaser in &results.results {
        lines.extend(teaser_lines(teaser));
    }
    lines
}

fn fragment_lines<'a, R>(
    fragment: &'a Fragment<R>,
    content: impl FnOnce(&'a R) -> Vec<Line<'a>>,
) -> Vec<Line<'a>> {
    match fragment {
        Fragment::Content(value) => content(value),
        Fragment::Pending => vec![Line::from(Span::styled(
            "Loading...",
            Style::default().fg(Color::DarkGray),
        ))],
        Fragment::Error(message) => vec![Line::from(Span::styled(
            message.as_str(),
            Style::default().fg(Color::Red),
        ))],
        Fragment::NoChange | Fragment::Empty => Vec::new(),
    }
}

fn draw_results<S, T>(frame: &mut Frame, app: &SearchTui<S, T>, view: &SearchView, area: Rect) {
    let (title, lines) = match &view.main {
        MainView::All { results } => (
            " All ".to_string(),
            fragment_lines(results, |results| universal_lines(app, results)),
        ),
        MainView::Vertical { key, results } => (
            format!(" {} ", vertical_title(key)),
            fragment_lines(results, vertical_lines),
        ),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(title);
    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.results_scroll, 0));
    frame.render_widget(paragraph, area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

fn draw_modal<S, T>(
    frame: &mut Frame,
    app: &SearchTui<S, T>,
    view: &SearchView,
    modal: &ModalView,
    area: Rect,
) {
    let control = |id: &ControlId, label: String| {
        Line::from(Span::styled(label, control_style(app.focus == *id)))
    };

    let mut lines = vec![control(&ControlId::from(controls::CLOSE_MODAL), " ✕ Close ".to_string())];
    if let Fragment::Content(nav) = &view.nav {
        let arrow = if nav.dropdown_open { "▴" } else { "▾" };
        lines.push(control(
            &ControlId::from(controls::DROPDOWN),
            format!(" {} {arrow} ", nav.current_title),
        ));
        if nav.dropdown_open {
            for entry in &nav.entries {
                let marker = if entry.active { "●" } else { "○" };
                lines.push(control(
                    &controls::nav(&entry.id),
                    format!("   {marker} {} ", entry.title),
                ));
            }
        }
    }
    lines.push(Line::default());
    lines.push(control(
        &ControlId::from(controls::RESET),
        format!(" {} ", modal.reset_label),
    ));
    lines.push(control(
        &ControlId::from(controls::CLOSE_MODAL_MOBILE),
        format!(" {} ", modal.show_results_label),
    ));

    let height = u16::try_from(lines.len()).unwrap_or(u16::MAX).saturating_add(2);
    let popup_area = centered_rect(36, height, area);
    frame.render_widget(Clear, popup_area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT))
        .title(" Filters ");
    frame.render_widget(Paragraph::new(lines).block(block), popup_area);
}

fn draw_status_bar<S, T>(frame: &mut Frame, app: &SearchTui<S, T>, area: Rect) {
    let layout = app
        .view
        .as_ref()
        .map_or("", |view| view.layout.class_name());
    let hints = "Tab: move  Enter: select  ←/→: page  Esc: back  Ctrl+C: quit";
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", app.status_message),
            Style::default().fg(Color::Black).bg(ACCENT),
        ),
        Span::styled(format!(" {layout} "), Style::default().fg(Color::DarkGray)),
        Span::styled(hints, Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
