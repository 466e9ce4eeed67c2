use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use super::app::{Outcome, Screen, SignerApp};
use super::input::TextField;
use super::picker::FilePicker;

const ACCENT: Color = Color::Indexed(205);
const SUBTLE: Color = Color::Indexed(241);
const BLURRED: Color = Color::Indexed(240);
const SUCCESS: Color = Color::Indexed(82);
const ERROR: Color = Color::Indexed(196);

pub fn draw(f: &mut Frame<'_>, app: &SignerApp) {
    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(f.area());
    f.render_widget(block, f.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(inner);

    f.render_widget(Paragraph::new(title_line(app)), chunks[0]);
    match app.screen {
        Screen::SetupWelcome => draw_welcome(f, chunks[1], app),
        Screen::SetupSignature | Screen::SetupEmployee | Screen::SetupManager => {
            draw_setup_field(f, chunks[1], app)
        }
        Screen::SetupConfirm => draw_confirm(f, chunks[1], app),
        Screen::Main => draw_main(f, chunks[1], app),
        Screen::FilePicker => {
            if let Some(picker) = &app.picker {
                draw_picker(f, chunks[1], picker);
            }
        }
        Screen::Signing => draw_signing(f, chunks[1], app),
        Screen::Result => draw_result(f, chunks[1], app),
    }
    let help = Paragraph::new(Line::from(Span::styled(
        help_text(app.screen),
        Style::default().fg(SUBTLE),
    )));
    f.render_widget(help, chunks[2]);
}

fn title_line(app: &SignerApp) -> Line<'static> {
    let text = match app.screen {
        Screen::SetupWelcome => "Hours Signer - Setup".to_string(),
        Screen::SetupSignature | Screen::SetupEmployee | Screen::SetupManager => format!(
            "Hours Signer - Setup ({}/3)",
            app.screen.setup_step().unwrap_or(1)
        ),
        Screen::SetupConfirm => "Hours Signer - Confirm Setup".to_string(),
        Screen::Main => "Hours Signer".to_string(),
        Screen::FilePicker => "Select PDF File".to_string(),
        Screen::Signing => "Signing PDF...".to_string(),
        Screen::Result => match app.outcome {
            Some(Outcome::Failed(_)) => {
                return Line::from(Span::styled(
                    "Error",
                    Style::default().fg(ERROR).add_modifier(Modifier::BOLD),
                ))
            }
            _ => {
                return Line::from(Span::styled(
                    "✓ PDF Signed Successfully!",
                    Style::default().fg(SUCCESS).add_modifier(Modifier::BOLD),
                ))
            }
        },
    };
    Line::from(Span::styled(
        text,
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
    ))
}

fn help_text(screen: Screen) -> &'static str {
    match screen {
        Screen::SetupWelcome => "Press Enter to continue • q to quit",
        Screen::SetupSignature | Screen::SetupEmployee | Screen::SetupManager => {
            "Press Enter to continue"
        }
        Screen::SetupConfirm => "Press y/Enter to save • n to edit again",
        Screen::Main => "Press s to sign • c to configure • q to quit",
        Screen::FilePicker => "Enter to select • Esc to cancel",
        Screen::Signing => "",
        Screen::Result => "Press Enter to continue",
    }
}

fn draw_welcome(f: &mut Frame<'_>, area: Rect, app: &SignerApp) {
    let mut lines = vec![
        Line::from("Welcome! No configuration file found."),
        Line::from("Let's set up your signature settings."),
        Line::from(""),
    ];
    if let Some(path) = app.config_location() {
        lines.push(Line::from(Span::styled(
            format!("Config will be saved to: {}", path.display()),
            Style::default().fg(SUBTLE),
        )));
    }
    render_text(f, area, lines);
}

fn draw_setup_field(f: &mut Frame<'_>, area: Rect, app: &SignerApp) {
    let (prompt, label) = match app.screen {
        Screen::SetupSignature => (
            "Enter the path to your signature image (PNG/JPG).",
            "Signature path:",
        ),
        Screen::SetupEmployee => ("Enter the employee name.", "Employee name:"),
        _ => ("Enter the manager name.", "Manager name:"),
    };
    let mut lines = vec![Line::from(prompt)];
    if app.screen == Screen::SetupSignature {
        lines.push(Line::from(Span::styled(
            "Example: ~/.config/hours-signer/signature.png",
            Style::default().fg(SUBTLE),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(label));
    let input_row = lines.len() as u16;
    if let Some(field) = app.field(app.screen) {
        lines.push(field_line(field));
    }
    if let Some(notice) = &app.notice {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            notice.clone(),
            Style::default().fg(ERROR),
        )));
    }
    render_text(f, area, lines);

    if let Some(field) = app.field(app.screen) {
        if field.focused && input_row < area.height {
            let col = field.value()[..field.cursor()].chars().count() as u16;
            f.set_cursor_position((area.x + 2 + col, area.y + input_row));
        }
    }
}

fn field_line(field: &TextField) -> Line<'static> {
    let prompt_style = if field.focused {
        Style::default().fg(ACCENT)
    } else {
        Style::default().fg(BLURRED)
    };
    let body = if field.value().is_empty() {
        Span::styled(field.placeholder.clone(), Style::default().fg(BLURRED))
    } else {
        Span::raw(field.value().to_string())
    };
    Line::from(vec![Span::styled("> ", prompt_style), body])
}

fn draw_confirm(f: &mut Frame<'_>, area: Rect, app: &SignerApp) {
    let lines = vec![
        Line::from("Please confirm your settings:"),
        Line::from(""),
        Line::from(format!("  Signature:  {}", app.draft.signature_path)),
        Line::from(format!("  Employee:   {}", app.draft.employee_name)),
        Line::from(format!("  Manager:    {}", app.draft.manager_name)),
    ];
    render_text(f, area, lines);
}

fn draw_main(f: &mut Frame<'_>, area: Rect, app: &SignerApp) {
    let signature = if app.config.has_signature() {
        Span::raw(app.config.signature_path.clone())
    } else {
        Span::styled("(not configured)", Style::default().fg(ERROR))
    };
    let mut lines = vec![
        Line::from(Span::styled(
            "Current configuration:",
            Style::default().fg(SUBTLE),
        )),
        Line::from(format!("  Employee:   {}", app.config.employee_name)),
        Line::from(format!("  Manager:    {}", app.config.manager_name)),
        Line::from(vec![Span::raw("  Signature:  "), signature]),
        Line::from(""),
    ];
    if !app.config.has_signature() {
        lines.push(Line::from(Span::styled(
            "⚠ Signature not configured - press c to configure",
            Style::default().fg(ERROR).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
    }
    lines.push(Line::from("What would you like to do?"));
    lines.push(Line::from(""));
    lines.push(Line::from("  [s] Sign a PDF"));
    lines.push(Line::from("  [c] Configure settings"));
    render_text(f, area, lines);
}

fn draw_picker(f: &mut Frame<'_>, area: Rect, picker: &FilePicker) {
    let mut lines = vec![Line::from(Span::styled(
        picker.current_dir.display().to_string(),
        Style::default().fg(SUBTLE),
    ))];
    if let Some(err) = &picker.error {
        lines.push(Line::from(Span::styled(
            err.clone(),
            Style::default().fg(ERROR),
        )));
    }
    let header = lines.len();
    if picker.entries.is_empty() {
        lines.push(Line::from(Span::styled(
            "  (no PDF files here)",
            Style::default().fg(BLURRED),
        )));
    }
    for (idx, entry) in picker.entries.iter().enumerate() {
        let name = if entry.is_dir {
            format!("{}/", entry.name)
        } else {
            entry.name.clone()
        };
        let line = if idx == picker.selected {
            Line::from(vec![
                Span::styled("> ", Style::default().fg(ACCENT)),
                Span::styled(name, Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
            ])
        } else {
            Line::from(vec![Span::raw("  "), Span::raw(name)])
        };
        lines.push(line);
    }

    let offset = (header + picker.selected + 1).saturating_sub(area.height as usize);
    let widget = Paragraph::new(lines).scroll((offset as u16, 0));
    f.render_widget(widget, area);
}

fn draw_signing(f: &mut Frame<'_>, area: Rect, app: &SignerApp) {
    let file = app
        .selected_file
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    render_text(f, area, vec![Line::from(format!("Processing: {file}"))]);
}

fn draw_result(f: &mut Frame<'_>, area: Rect, app: &SignerApp) {
    let lines = match &app.outcome {
        Some(Outcome::Signed(path)) => vec![Line::from(format!("Output: {}", path.display()))],
        Some(Outcome::Failed(err)) => vec![Line::from(Span::styled(
            err.clone(),
            Style::default().fg(ERROR),
        ))],
        None => Vec::new(),
    };
    render_text(f, area, lines);
}

fn render_text(f: &mut Frame<'_>, area: Rect, lines: Vec<Line<'_>>) {
    let widget = Paragraph::new(lines)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}
