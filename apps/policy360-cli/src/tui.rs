//! Terminal User Interface for the interactive tracker.
//!
//! Shows the stage stepper, the current stage card and its tasks. Keys drive
//! the same tracker operations as the CLI subcommands.

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use policy360_core::stage::CompletionTone;
use policy360_core::{STAGES, WorkflowTracker};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
};
use std::io;

const DEFAULT_STATUS: &str = "←/→ move, s save, c complete, m mark success, h help, q quit";

struct TrackerApp<'a> {
    tracker: &'a mut WorkflowTracker,
    view_mode: ViewMode,
    status: String,
    should_quit: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ViewMode {
    Stage,
    Help,
}

impl<'a> TrackerApp<'a> {
    fn new(tracker: &'a mut WorkflowTracker) -> Self {
        Self {
            tracker,
            view_mode: ViewMode::Stage,
            status: DEFAULT_STATUS.to_string(),
            should_quit: false,
        }
    }

    fn handle_input(&mut self, key: KeyCode) {
        if self.view_mode == ViewMode::Help {
            if matches!(key, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('h')) {
                self.view_mode = ViewMode::Stage;
                self.status = DEFAULT_STATUS.to_string();
            }
            return;
        }

        match key {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('h') => {
                self.view_mode = ViewMode::Help;
                self.status = "Viewing help - press Esc to go back".to_string();
            }
            KeyCode::Right => {
                self.status = if self.tracker.advance() {
                    format!("Moved to {}", self.label())
                } else {
                    "Already at the final stage".to_string()
                };
            }
            KeyCode::Left => {
                self.status = if self.tracker.retreat() {
                    format!("Moved back to {}", self.label())
                } else {
                    "Already at the first stage".to_string()
                };
            }
            KeyCode::Char('s') => {
                self.tracker.mark_current_in_progress();
                self.status = format!("Saved progress on {}", self.label());
            }
            KeyCode::Char('c') => {
                let label = self.label();
                self.tracker.complete_current_and_advance();
                self.status = format!("Completed {label}");
            }
            KeyCode::Char('m') => {
                self.status = if self.tracker.mark_final_success() {
                    "Policy marked as successful".to_string()
                } else {
                    "Success can only be marked at the final stage".to_string()
                };
            }
            _ => {}
        }
    }

    fn label(&self) -> &'static str {
        self.tracker.current_stage().info.label
    }
}

/// Run the interactive tracker until the user quits.
pub async fn run_tracker_tui(tracker: &mut WorkflowTracker) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let mut app = TrackerApp::new(tracker);
    let result = run_app(&mut terminal, &mut app).await;

    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut TrackerApp<'_>,
) -> Result<()> {
    loop {
        terminal
            .draw(|f| ui(f, app))
            .map_err(|e| anyhow::anyhow!("Failed to draw UI: {}", e))?;

        if event::poll(std::time::Duration::from_millis(100)).context("Failed to poll events")?
            && let Event::Key(key) = event::read().context("Failed to read event")?
            && key.kind == KeyEventKind::Press
        {
            app.handle_input(key.code);
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn ui(frame: &mut Frame, app: &TrackerApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Stepper
            Constraint::Min(10),   // Stage card
            Constraint::Length(3), // Status bar
        ])
        .split(frame.area());

    render_stepper(frame, &*app.tracker, chunks[0]);

    match app.view_mode {
        ViewMode::Stage => render_stage_view(frame, &*app.tracker, chunks[1]),
        ViewMode::Help => render_help_view(frame, chunks[1]),
    }

    let status = Paragraph::new(app.status.as_str())
        .style(Style::default().fg(Color::Green))
        .block(Block::default().borders(Borders::ALL).title("Status"));
    frame.render_widget(status, chunks[2]);
}

fn render_stepper(frame: &mut Frame, tracker: &WorkflowTracker, area: Rect) {
    let mut spans = Vec::with_capacity(STAGES.len() * 2);
    for (index, info) in STAGES.iter().enumerate() {
        if index > 0 {
            spans.push(Span::raw(" ─ "));
        }
        let style = if index == tracker.active_index() {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else if tracker.is_visually_done(info.stage) {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let mark = if tracker.is_visually_done(info.stage) {
            "✓"
        } else {
            info.icon
        };
        spans.push(Span::styled(format!("{mark} {}", info.label), style));
    }

    let stepper = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Policy360 Lifecycle"),
    );
    frame.render_widget(stepper, area);
}

fn render_stage_view(frame: &mut Frame, tracker: &WorkflowTracker, area: Rect) {
    let current = tracker.current_stage();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(area);

    let color = match current.display.tone() {
        CompletionTone::Success => Color::Green,
        CompletionTone::Warning => Color::Yellow,
        CompletionTone::Neutral => Color::Blue,
    };
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(format!(
            "{} {} ({}/{})",
            current.info.icon, current.info.label, current.position, current.total
        )))
        .gauge_style(Style::default().fg(color))
        .percent(u16::from(current.display.completion.min(100)));
    frame.render_widget(gauge, chunks[0]);

    let highlighted = current.display.highlighted_tasks();
    let mut lines = vec![
        Line::from(Span::styled(
            current.display.title,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(current.info.description),
        Line::from(format!("Stakeholders: {}", current.display.stakeholders)),
        Line::from(""),
    ];
    for (i, task) in current.display.tasks.iter().enumerate() {
        let (mark, style) = if i < highlighted {
            ("[x]", Style::default().fg(Color::Green))
        } else {
            ("[ ]", Style::default())
        };
        lines.push(Line::from(Span::styled(format!("  {mark} {task}"), style)));
    }

    let card = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title("Key Tasks"))
        .wrap(Wrap { trim: false });
    frame.render_widget(card, chunks[1]);
}

fn render_help_view(frame: &mut Frame, area: Rect) {
    let help_text = Text::from(vec![
        Line::from(""),
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts:",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from("  →          - Complete the stage locally and move forward"),
        Line::from("  ←          - Move back one stage"),
        Line::from("  s          - Save progress (in-progress notification)"),
        Line::from("  c          - Complete the stage, notify and move forward"),
        Line::from("  m          - Mark the policy successful (final stage)"),
        Line::from("  h          - Show this help screen"),
        Line::from("  Esc        - Return to the stage view"),
        Line::from("  q          - Quit and save the workflow position"),
    ]);

    let help = Paragraph::new(help_text)
        .block(Block::default().borders(Borders::ALL).title("Help"))
        .wrap(Wrap { trim: false });
    frame.render_widget(help, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use policy360_core::{RecordingObserver, Stage};

    #[test]
    fn test_should_drive_tracker_from_keys() {
        let recorder = RecordingObserver::new();
        let mut tracker = WorkflowTracker::new(Box::new(recorder.clone()));
        let mut app = TrackerApp::new(&mut tracker);

        app.handle_input(KeyCode::Right);
        app.handle_input(KeyCode::Char('s'));
        app.handle_input(KeyCode::Char('c'));
        app.handle_input(KeyCode::Left);
        assert_eq!(app.status, "Moved back to Analysis");

        app.handle_input(KeyCode::Char('m'));
        assert!(app.status.contains("final stage"));

        app.handle_input(KeyCode::Char('q'));
        assert!(app.should_quit);

        assert_eq!(tracker.active_stage(), Stage::Analysis);
        assert_eq!(recorder.len(), 2);
    }

    #[test]
    fn test_should_ignore_operations_in_help_view() {
        let mut tracker = WorkflowTracker::detached();
        let mut app = TrackerApp::new(&mut tracker);

        app.handle_input(KeyCode::Char('h'));
        app.handle_input(KeyCode::Right);
        assert_eq!(app.view_mode, ViewMode::Help);

        app.handle_input(KeyCode::Esc);
        assert_eq!(app.view_mode, ViewMode::Stage);
        assert_eq!(tracker.active_index(), 0);
    }
}
