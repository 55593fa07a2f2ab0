use crate::application::{App, AppMode, FieldView, SettingsItem};
use crate::domain::{FieldKind, FieldValue, FormKind, NotificationLevel};
use crate::presentation::Theme;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub fn render_ui(f: &mut Frame, app: &App, theme: &Theme) {
    f.render_widget(Block::default().style(theme.base()), f.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    match app.screen_mode() {
        AppMode::SelectForm => {
            render_title(f, "BilimCert applications", theme, chunks[0]);
            render_form_selection(f, app, theme, chunks[2]);
        }
        AppMode::Success { location, id } => {
            render_title(f, app.session.kind().title(), theme, chunks[0]);
            render_success(f, app, theme, location, id, chunks[2]);
        }
        _ => {
            render_header(f, app, theme, chunks[0]);
            render_progress(f, app, theme, chunks[1]);
            render_step(f, app, theme, chunks[2]);
        }
    }
    render_status_bar(f, app, theme, chunks[3]);

    match app.mode {
        AppMode::Help => render_help_popup(f, app.help_scroll, theme),
        AppMode::Settings => render_settings_popup(f, app, theme),
        _ => {}
    }
}

fn render_title(f: &mut Frame, title: &str, theme: &Theme, area: Rect) {
    let header = Paragraph::new(format!("bilimforms - {}", title)).style(theme.accent_style());
    f.render_widget(header, area);
}

fn render_header(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let session = &app.session;
    let step = session.current_step();
    let step_title = session.steps().get(step - 1).map(|s| s.title).unwrap_or_default();
    let header = Paragraph::new(format!(
        "bilimforms - {} | Step {} of {}: {}",
        session.kind().title(),
        step,
        session.total_steps(),
        step_title
    ))
    .style(theme.accent_style());
    f.render_widget(header, area);
}

fn render_progress(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let session = &app.session;
    let current = session.current_step();
    let mut spans = Vec::new();
    for (index, step) in session.steps().iter().enumerate() {
        let number = index + 1;
        if index > 0 {
            spans.push(Span::styled(" > ", theme.muted_style()));
        }
        let (marker, style) = if !session.is_step_active(number) {
            ("-", theme.muted_style().add_modifier(Modifier::CROSSED_OUT))
        } else if number < current {
            ("✓", theme.success_style())
        } else if number == current {
            ("●", theme.accent_style().add_modifier(Modifier::BOLD))
        } else {
            ("○", theme.base())
        };
        spans.push(Span::styled(format!("{} {}", marker, step.title), style));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_step(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let session = &app.session;
    let mut lines: Vec<Line> = Vec::new();
    let mut selected_line = 0;

    if session.current_step() == session.total_steps() {
        lines.push(Line::styled("Please review your application:", theme.label()));
        let mut section = "";
        for entry in session.summary() {
            if entry.section != section {
                section = entry.section;
                lines.push(Line::styled(format!("  {}", section), theme.accent_style()));
            }
            lines.push(Line::from(vec![
                Span::styled(format!("    {}: ", entry.label), theme.muted_style()),
                Span::styled(entry.value, theme.base()),
            ]));
        }
        lines.push(Line::default());
    }

    for index in 0..session.field_count() {
        let Some(field) = session.field_view(index) else {
            continue;
        };
        let selected = index == app.selected_field;
        if selected {
            selected_line = lines.len();
        }
        field_lines(app, theme, &field, selected, &mut lines);
        for _ in 0..theme.field_spacing {
            lines.push(Line::default());
        }
    }

    let title = session
        .steps()
        .get(session.current_step() - 1)
        .map(|s| s.title)
        .unwrap_or_default();
    let visible = area.height.saturating_sub(2) as usize;
    let offset = (selected_line + 3).saturating_sub(visible);

    let step = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .style(theme.base())
        .wrap(Wrap { trim: false })
        .scroll((offset as u16, 0));
    f.render_widget(step, area);
}

fn field_lines<'a>(app: &App, theme: &Theme, field: &FieldView, selected: bool, lines: &mut Vec<Line<'a>>) {
    let marker = if selected { "> " } else { "  " };
    let required = if field.required { " *" } else { "" };
    let label_style = if selected { theme.highlight() } else { theme.label() };

    match field.kind {
        FieldKind::Checkbox => {
            let checked = matches!(field.value, Some(FieldValue::Flag(true)));
            lines.push(Line::styled(
                format!("{}[{}] {}{}", marker, if checked { "x" } else { " " }, field.label, required),
                label_style,
            ));
        }
        FieldKind::MultiSelect(choices) if selected => {
            lines.push(Line::styled(format!("{}{}{}", marker, field.label, required), label_style));
            let members = match &field.value {
                Some(FieldValue::Members(members)) => members.clone(),
                _ => Default::default(),
            };
            for (index, choice) in choices.iter().enumerate() {
                let checked = if members.contains(choice.value) { "x" } else { " " };
                let style = if index == app.option_cursor { theme.accent_style() } else { theme.base() };
                lines.push(Line::styled(format!("    [{}] {}", checked, choice.label), style));
            }
        }
        FieldKind::Documents => {
            lines.push(Line::styled(format!("{}{}{}", marker, field.label, required), label_style));
            let documents = app.session.documents();
            if documents.is_empty() {
                lines.push(Line::styled("    No documents attached (.pdf, .jpg, .jpeg, .png)", theme.muted_style()));
            }
            for (index, document) in documents.iter().enumerate() {
                let style = if selected && index == app.option_cursor { theme.accent_style() } else { theme.base() };
                lines.push(Line::styled(
                    format!("    {} ({})", document.file_name(), document.size_label()),
                    style,
                ));
            }
        }
        _ => {
            let value = if selected && app.mode == AppMode::Editing {
                format!("{}_", app.input)
            } else if field.display.is_empty() {
                placeholder(field.kind).to_string()
            } else {
                field.display.clone()
            };
            let value_style = if field.display.is_empty() && app.mode != AppMode::Editing {
                theme.muted_style()
            } else {
                theme.base()
            };
            lines.push(Line::from(vec![
                Span::styled(format!("{}{}{}: ", marker, field.label, required), label_style),
                Span::styled(value, value_style),
            ]));
        }
    }

    if let Some(error) = &field.error {
        lines.push(Line::styled(format!("    {}", error), theme.error_style()));
    }
}

fn placeholder(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Select(_) => "(choose with ←/→)",
        FieldKind::MultiSelect(_) => "(none selected)",
        FieldKind::Year => "YYYY",
        _ => "",
    }
}

fn render_form_selection(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let mut lines = vec![Line::styled("Which application would you like to submit?", theme.label()), Line::default()];
    for (index, kind) in FormKind::ALL.iter().enumerate() {
        let style = if index == app.form_cursor { theme.highlight() } else { theme.base() };
        lines.push(Line::styled(format!("  {}  ", kind.title()), style));
    }
    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Applications"))
        .style(theme.base());
    f.render_widget(widget, area);
}

fn render_success(f: &mut Frame, app: &App, theme: &Theme, location: &str, id: &str, area: Rect) {
    let message = app
        .notification
        .as_ref()
        .map(|n| n.message.clone())
        .unwrap_or_default();
    let lines = vec![
        Line::styled("Application submitted", theme.success_style().add_modifier(Modifier::BOLD)),
        Line::default(),
        Line::styled(message, theme.base()),
        Line::default(),
        Line::from(vec![
            Span::styled("Application id: ", theme.muted_style()),
            Span::styled(id.to_string(), theme.label().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("Status page:    ", theme.muted_style()),
            Span::styled(location.to_string(), theme.accent_style()),
        ]),
    ];
    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Success"))
        .style(theme.base())
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}

fn render_status_bar(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let last_step = app.session.current_step() == app.session.total_steps();
    let mut style = theme.base();
    let text = match &app.mode {
        AppMode::Normal if app.is_submitting() => {
            format!("{} Submitting application...", theme.spinner(app.tick))
        }
        AppMode::Normal => {
            if let Some(notification) = &app.notification {
                style = match notification.level {
                    NotificationLevel::Success => theme.success_style(),
                    NotificationLevel::Error => theme.error_style(),
                };
                notification.message.clone()
            } else if let Some(status) = &app.status_message {
                status.clone()
            } else {
                format!(
                    "↑↓: field | Enter/Space: edit | n: {} | p: back | Ctrl+E: export | a: accessibility | ?: help | q: quit",
                    if last_step { "submit" } else { "next" }
                )
            }
        }
        AppMode::Editing => {
            style = theme.success_style();
            format!("Editing: {} (Enter to save, Esc to cancel)", app.input)
        }
        AppMode::AttachFile => format!("Attach document: {} (Enter to attach, Esc to cancel)", app.filename_input),
        AppMode::ExportCsv => format!("Export summary as: {} (Enter to export, Esc to cancel)", app.filename_input),
        AppMode::Help => "↑↓/jk: scroll | PgUp/PgDn: fast scroll | Home: top | Esc/q: close help".to_string(),
        AppMode::Settings => "↑↓: choose | Enter/→: change | ←: decrease | r: reset font | Esc: close".to_string(),
        AppMode::SelectForm => "↑↓: choose | Enter: start | a: accessibility | q: quit".to_string(),
        AppMode::Success { .. } => app
            .status_message
            .clone()
            .unwrap_or_else(|| "c: copy id | n: new application | q: quit".to_string()),
    };

    let status = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(style);
    f.render_widget(status, area);
}

fn popup_area(area: Rect) -> Rect {
    Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    }
}

fn render_settings_popup(f: &mut Frame, app: &App, theme: &Theme) {
    let area = popup_area(f.area());
    f.render_widget(Clear, area);

    let lines: Vec<Line> = SettingsItem::ALL
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let style = if index == app.settings_cursor { theme.highlight() } else { theme.base() };
            Line::styled(format!(" {:<18} {}", item.label(), item.value(&app.settings)), style)
        })
        .collect();

    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Accessibility")
                .style(theme.accent_style()),
        )
        .style(theme.base());
    f.render_widget(widget, area);
}

fn render_help_popup(f: &mut Frame, scroll: usize, theme: &Theme) {
    let popup_area = popup_area(f.area());
    f.render_widget(Clear, popup_area);

    let help_text = get_help_text();
    let help_lines: Vec<&str> = help_text.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;

    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());

    let visible_text = help_lines[start_line..end_line].join("\n");

    let help_widget = Paragraph::new(visible_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("bilimforms Help (Line {}/{})", start_line + 1, help_lines.len()))
                .style(theme.accent_style()),
        )
        .style(Style::default().fg(theme.foreground));

    f.render_widget(help_widget, popup_area);
}

fn get_help_text() -> &'static str {
    r#"BILIMFORMS APPLICATION WIZARD

=== FILLING IN A STEP ===
↑↓ or j/k       Move between fields
Enter/Space     Edit a text field, toggle a checkbox or option
←/→             Choose a select option, move inside option lists
Del or x        Remove the highlighted document
Fields marked * are required. Number and year fields accept digits only.

=== MOVING BETWEEN STEPS ===
n / PgDn        Next step (validates the current step first)
p / PgUp        Previous step (keeps everything you entered)
On the review step, n submits the application.

=== VALIDATION ===
Errors are listed under each field when you try to continue.
Editing a field clears its error until you continue again.

=== DOCUMENTS ===
Enter on the documents field asks for a file path.
Accepted formats: .pdf, .jpg, .jpeg, .png

=== SUBMISSION ===
Only one submission runs at a time. If it fails, nothing you entered
is lost: fix the problem or try again.
After success the application id is shown; press c to copy it.

=== OTHER SHORTCUTS ===
Ctrl+E          Export the application summary to CSV
a               Accessibility settings (contrast, font, motion,
                spacing, color blind palettes, dark theme)
F1 or ?         Show this help
q               Quit

=== HELP NAVIGATION ===
↑↓ or j/k       Scroll help text up/down one line
Page Up/Down    Scroll help text up/down 5 lines
Home            Jump to top of help text
Esc/F1/?/q      Close this help window"#
}
