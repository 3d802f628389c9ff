//! Drawing - one function per panel

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Tabs, Wrap},
};

use super::{App, Pane, View};
use crate::analytics::{Analytics, bar};
use crate::coach::{QUICK_PROMPTS, Role, format_prompt};
use crate::config::Theme;
use crate::exercises::filter_exercises;
use crate::form::{Field, Mode};

const BAR_WIDTH: usize = 24;

struct Palette {
    bg: Color,
    fg: Color,
    accent: Color,
    muted: Color,
    done: Color,
    alert: Color,
}

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Light => Palette {
            bg: Color::White,
            fg: Color::Black,
            accent: Color::Blue,
            muted: Color::Gray,
            done: Color::Green,
            alert: Color::Red,
        },
        Theme::Dark => Palette {
            bg: Color::Black,
            fg: Color::White,
            accent: Color::Cyan,
            muted: Color::DarkGray,
            done: Color::LightGreen,
            alert: Color::LightRed,
        },
    }
}

pub(super) fn draw(app: &App, frame: &mut Frame) {
    let p = palette(app.theme);
    let area = frame.area();
    frame.render_widget(Block::default().style(Style::default().bg(p.bg).fg(p.fg)), area);

    if app.splash_active() {
        draw_splash(&p, frame, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(3),
        ])
        .split(area);

    draw_tabs(app, &p, frame, chunks[0]);
    match app.view {
        View::Tracker => draw_tracker(app, &p, frame, chunks[1]),
        View::Coach => draw_coach(app, &p, frame, chunks[1]),
        View::Search => draw_search(app, &p, frame, chunks[1]),
        View::Analytics => draw_analytics(app, &p, frame, chunks[1]),
        View::Library => draw_library(app, &p, frame, chunks[1]),
    }
    draw_footer(app, &p, frame, chunks[2]);

    if app.feedback.is_some() {
        draw_feedback(app, &p, frame, area);
    }
}

fn draw_splash(p: &Palette, frame: &mut Frame, area: Rect) {
    let [_, middle, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(3),
        Constraint::Fill(1),
    ])
    .areas(area);
    let splash = Paragraph::new(vec![
        Line::from("Hey buddy lite weight").style(Style::default().fg(p.accent).bold()),
        Line::from("MygymTracky is warming up...").style(Style::default().fg(p.muted)),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(splash, middle);
}

fn draw_tabs(app: &App, p: &Palette, frame: &mut Frame, area: Rect) {
    let titles: Vec<_> = View::all()
        .iter()
        .enumerate()
        .map(|(i, v)| format!("F{} {}", i + 1, v.title()))
        .collect();
    let selected = View::all().iter().position(|v| *v == app.view).unwrap_or(0);
    let theme_icon = match app.theme {
        Theme::Light => "☀ light",
        Theme::Dark => "☾ dark",
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(p.muted))
        .highlight_style(Style::default().fg(p.accent).bold())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" MygymTracky ")
                .title_bottom(Line::from(format!(" {theme_icon} ")).right_aligned()),
        );
    frame.render_widget(tabs, area);
}

fn draw_footer(app: &App, p: &Palette, frame: &mut Frame, area: Rect) {
    let (text, style) = match &app.status {
        Some(status) => (status.clone(), Style::default().fg(p.alert)),
        None => (footer_hint(app).to_string(), Style::default().fg(p.muted)),
    };
    let footer = Paragraph::new(text)
        .style(style)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

fn footer_hint(app: &App) -> &'static str {
    if app.feedback.is_some() {
        return "type image path | Enter: analyze | Esc: close";
    }
    match (app.view, app.pane) {
        (View::Tracker, Pane::Form) => {
            "↑↓ field | ←→ day | Enter: save | ^S: AI suggest | Alt+1-5: pick | Tab: routine | ^T theme | ^Q quit"
        }
        (View::Tracker, Pane::Routine) => {
            "↑↓ select | Space: done | e: edit | f: form feedback | c: clear | Tab: form | q: quit"
        }
        (View::Coach, _) => "Enter: send | Alt+1-3: quick prompt | F1-F5: views | ^Q quit",
        (View::Search, _) => "Enter: search | F1-F5: views | ^Q quit",
        (View::Analytics, _) => "F1-F5: views | q: quit",
        (View::Library, _) => "m: muscle | d: difficulty | e: equipment | r: reset | q: quit",
    }
}

fn draw_tracker(app: &App, p: &Palette, frame: &mut Frame, area: Rect) {
    let [left, right] = Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
        .areas(area);
    draw_form(app, p, frame, left);

    let stats = Analytics::new(&app.snapshot).completion_stats();
    let routine_area = if stats.total > 0 {
        let [gauge_area, rest] =
            Layout::vertical([Constraint::Length(3), Constraint::Min(3)]).areas(right);
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title(" Weekly Progress "))
            .gauge_style(Style::default().fg(p.done))
            .ratio(stats.percentage / 100.0)
            .label(format!(
                "{:.0}% ({}/{} exercises)",
                stats.percentage, stats.completed, stats.total
            ));
        frame.render_widget(gauge, gauge_area);
        rest
    } else {
        right
    };
    draw_routine(app, p, frame, routine_area);
}

fn draw_form(app: &App, p: &Palette, frame: &mut Frame, area: Rect) {
    let form = &app.form;
    let active = app.pane == Pane::Form;
    let mut lines = Vec::new();

    let day_lock = if form.is_editing() { " (locked)" } else { "" };
    lines.push(Line::from(vec![
        Span::styled("Day: ", Style::default().fg(p.muted)),
        Span::styled(format!("◀ {} ▶{}", form.day(), day_lock), Style::default().bold()),
    ]));

    for field in Field::all() {
        let marker = if active && *field == app.active_field { "▸ " } else { "  " };
        let value = form.field(*field);
        let locked = *field == Field::Focus && form.focus_locked(&app.snapshot);
        let shown = if value.is_empty() {
            Span::styled(placeholder(*field), Style::default().fg(p.muted).italic())
        } else {
            Span::raw(value.to_string())
        };
        let mut spans = vec![
            Span::styled(marker, Style::default().fg(p.accent)),
            Span::styled(format!("{}: ", field.label()), Style::default().fg(p.muted)),
            shown,
        ];
        if locked {
            spans.push(Span::styled(" 🔒", Style::default().fg(p.muted)));
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::default());
    if app.suggesting {
        lines.push(Line::styled("Thinking...", Style::default().fg(p.accent)));
    }
    for (i, suggestion) in app.suggestions.iter().enumerate() {
        lines.push(Line::styled(
            format!("  Alt+{} {}", i + 1, suggestion),
            Style::default().fg(p.accent),
        ));
    }

    let action = match form.mode() {
        Mode::Editing { .. } => "[Enter] Update Exercise   [Esc] Cancel".to_string(),
        Mode::Append if app.media_pending > 0 => "[Enter] Adding...".to_string(),
        Mode::Append => "[Enter] Add Exercise".to_string(),
    };
    lines.push(Line::styled(action, Style::default().fg(p.fg).bold()));

    let border = if active { p.accent } else { p.muted };
    let title = if form.is_editing() { " Edit Exercise " } else { " Gym Routine Tracker " };
    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .title(title),
        );
    frame.render_widget(widget, area);
}

fn placeholder(field: Field) -> &'static str {
    match field {
        Field::Focus => "e.g., Legs",
        Field::Exercise => "e.g., Squats",
        Field::Sets => "e.g., 3",
        Field::Reps => "e.g., 12",
        Field::Weight => "e.g., 50 lbs",
        Field::Duration => "e.g., 45 mins",
        Field::Intensity => "←→ Low / Medium / High",
    }
}

fn draw_routine(app: &App, p: &Palette, frame: &mut Frame, area: Rect) {
    let active = app.pane == Pane::Routine;
    let mut lines = Vec::new();
    let mut selected_line = 0;
    let mut row = 0;

    for (day, plan) in app.snapshot.days() {
        lines.push(Line::from(vec![
            Span::styled(day.name(), Style::default().fg(p.accent).bold()),
            Span::styled(format!("  {}", plan.focus), Style::default().fg(p.muted)),
        ]));
        for entry in &plan.exercises {
            let is_selected = active && row == app.selected;
            if is_selected {
                selected_line = lines.len();
            }
            let check = if entry.completed { "[x]" } else { "[ ]" };
            let celebrate = match app.celebration {
                Some((id, _)) if id == entry.id => " 🎉",
                _ => "",
            };
            let media = entry.media_url.as_deref().unwrap_or("loading image…");
            let mut style = if entry.completed {
                Style::default().fg(p.done)
            } else {
                Style::default().fg(p.fg)
            };
            if is_selected {
                style = style.reversed();
            }
            lines.push(Line::styled(
                format!(
                    "  {check} {} - {} | {} | {}{celebrate}",
                    entry.name,
                    entry.summary(),
                    entry.duration,
                    entry.intensity
                ),
                style,
            ));
            lines.push(Line::styled(format!("      {media}"), Style::default().fg(p.muted)));
            row += 1;
        }
    }

    if lines.is_empty() {
        lines.push(Line::styled(
            "Your weekly routine is empty. Add an exercise to get started!",
            Style::default().fg(p.muted),
        ));
    }
    if app.confirm_clear {
        lines.push(Line::default());
        lines.push(Line::styled(
            "Clear the whole routine? y to confirm",
            Style::default().fg(p.alert).bold(),
        ));
    }

    let height = area.height.saturating_sub(2) as usize;
    let scroll = (selected_line + 2).saturating_sub(height) as u16;
    let border = if active { p.accent } else { p.muted };
    let widget = Paragraph::new(lines).scroll((scroll, 0)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(" Weekly Routine "),
    );
    frame.render_widget(widget, area);
}

fn draw_coach(app: &App, p: &Palette, frame: &mut Frame, area: Rect) {
    let [log_area, input_area] =
        Layout::vertical([Constraint::Min(5), Constraint::Length(3)]).areas(area);

    let mut lines = Vec::new();
    for message in app.chat_log.messages() {
        let (who, color) = match message.role {
            Role::User => ("You", p.accent),
            Role::Model => ("Coach", p.done),
        };
        lines.push(Line::styled(format!("{who}:"), Style::default().fg(color).bold()));
        lines.extend(message.text.lines().map(|l| Line::raw(format!("  {l}"))));
        lines.push(Line::default());
    }
    if app.chat_loading {
        lines.push(Line::styled("Coach is typing...", Style::default().fg(p.muted).italic()));
    }
    if app.chat_log.is_empty() && !app.chat_loading {
        lines.push(Line::styled("Try asking:", Style::default().fg(p.muted)));
        for (i, prompt) in QUICK_PROMPTS.iter().enumerate() {
            lines.push(Line::raw(format!("  Alt+{}", format_prompt(i, prompt))));
        }
    }

    let height = log_area.height.saturating_sub(2) as usize;
    let scroll = lines.len().saturating_sub(height) as u16;
    let log = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(Block::default().borders(Borders::ALL).title(" AI Fitness Coach "));
    frame.render_widget(log, log_area);

    draw_input(
        p,
        frame,
        input_area,
        &app.chat_input,
        "Ask your AI coach anything...",
        app.chat_loading,
    );
}

fn draw_search(app: &App, p: &Palette, frame: &mut Frame, area: Rect) {
    let [input_area, result_area] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(5)]).areas(area);
    draw_input(p, frame, input_area, &app.search_input, "Ask anything...", app.search_loading);

    let mut lines = Vec::new();
    if app.search_loading {
        lines.push(Line::styled("Searching the web...", Style::default().fg(p.muted).italic()));
    }
    if let Some(result) = &app.search_result {
        lines.extend(result.text.lines().map(Line::raw));
        if !result.sources.is_empty() {
            lines.push(Line::default());
            lines.push(Line::styled("Sources:", Style::default().fg(p.accent).bold()));
            for (i, source) in result.sources.iter().enumerate() {
                lines.push(Line::raw(format!("  {}. {}", i + 1, source.label())));
                lines.push(Line::styled(format!("     {}", source.uri), Style::default().fg(p.muted)));
            }
        }
    }

    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" AI Web Search "));
    frame.render_widget(widget, result_area);
}

fn draw_input(p: &Palette, frame: &mut Frame, area: Rect, value: &str, hint: &str, busy: bool) {
    let line = if value.is_empty() {
        Line::styled(hint.to_string(), Style::default().fg(p.muted).italic())
    } else {
        Line::raw(format!("{value}▏"))
    };
    let border = if busy { p.muted } else { p.accent };
    let widget = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    frame.render_widget(widget, area);
}

fn draw_analytics(app: &App, p: &Palette, frame: &mut Frame, area: Rect) {
    let analytics = Analytics::new(&app.snapshot);
    let stats = analytics.completion_stats();
    let block = Block::default().borders(Borders::ALL).title(" Workout Analytics ");

    if stats.total == 0 {
        let empty = Paragraph::new("No workouts logged yet. Add some exercises to see your stats!")
            .style(Style::default().fg(p.muted))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let totals = analytics.aggregates();
    let label = Style::default().fg(p.muted);
    let value = Style::default().fg(p.accent).bold();
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Completed: ", label),
            Span::styled(stats.completed.to_string(), value),
            Span::styled("   Total Sets: ", label),
            Span::styled(totals.total_sets.to_string(), value),
            Span::styled("   Total Reps: ", label),
            Span::styled(totals.total_reps.to_string(), value),
            Span::styled("   Most Frequent Focus: ", label),
            Span::styled(analytics.most_frequent_focus().unwrap_or("None").to_string(), value),
        ]),
        Line::default(),
        Line::styled("Weekly Distribution", Style::default().bold()),
    ];
    for row in analytics.daily_chart() {
        lines.push(Line::raw(format!(
            "  {:<4} {} {}",
            row.label,
            bar(row.ratio, BAR_WIDTH),
            row.count
        )));
    }
    lines.push(Line::default());
    lines.push(Line::styled("Focus Area Breakdown", Style::default().bold()));
    for row in analytics.focus_breakdown() {
        lines.push(Line::raw(format!(
            "  {:<12} {} {}",
            row.label,
            bar(row.ratio, BAR_WIDTH),
            row.count
        )));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_library(app: &App, p: &Palette, frame: &mut Frame, area: Rect) {
    let filter = &app.library_filter;
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Muscle: ", Style::default().fg(p.muted)),
            Span::raw(filter.muscle_group.map_or("All", |g| g.name())),
            Span::styled("   Difficulty: ", Style::default().fg(p.muted)),
            Span::raw(filter.difficulty.map_or("All", |d| d.name())),
            Span::styled("   Equipment: ", Style::default().fg(p.muted)),
            Span::raw(filter.equipment.map_or("All", |e| e.name())),
        ]),
        Line::default(),
    ];

    let exercises = filter_exercises(filter);
    if exercises.is_empty() {
        lines.push(Line::styled(
            "No exercises match your filters.",
            Style::default().fg(p.muted),
        ));
    }
    for ex in exercises {
        lines.push(Line::from(vec![
            Span::raw(format!("{} ", ex.muscle_group.emoji())),
            Span::styled(format!("{:<18}", ex.name), Style::default().bold()),
            Span::styled(
                format!(
                    " {} · {} · {}",
                    ex.muscle_group.name(),
                    ex.difficulty.name(),
                    ex.equipment.name()
                ),
                Style::default().fg(p.muted),
            ),
        ]));
    }

    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Exercise Library "));
    frame.render_widget(widget, area);
}

fn draw_feedback(app: &App, p: &Palette, frame: &mut Frame, area: Rect) {
    let Some(modal) = &app.feedback else {
        return;
    };
    let popup = centered(area, 70, 60);
    frame.render_widget(Clear, popup);

    let mut lines = vec![Line::styled(
        "Enter the path of a photo of your form for AI analysis.",
        Style::default().fg(p.muted),
    )];
    lines.push(Line::raw(format!("Photo: {}▏", modal.image_path)));
    lines.push(Line::default());
    if modal.loading {
        lines.push(Line::styled("Analyzing...", Style::default().fg(p.accent).italic()));
    }
    if let Some(feedback) = &modal.feedback {
        lines.extend(feedback.lines().map(Line::raw));
    }

    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .style(Style::default().bg(p.bg).fg(p.fg))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(p.accent))
                .title(format!(" Form Feedback for: {} ", modal.exercise)),
        );
    frame.render_widget(widget, popup);
}

fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let [_, middle, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(area);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(middle);
    center
}
