#[cfg(test)]
#[path = "ui_test.rs"]
mod tests;

use std::io;
use std::path;

use anyhow::Result;
use crossterm::cursor;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::*;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Gauge;
use ratatui::widgets::Padding;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Wrap;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tokio::sync::watch;
use tui_textarea::Input;
use tui_textarea::Key;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::models::Loading;
use crate::domain::models::MachineState;
use crate::domain::models::MenuImage;
use crate::domain::models::Snapshot;
use crate::domain::models::TextArea;
use crate::domain::services::events::EventsService;
use crate::domain::services::Gallery;
use crate::domain::services::GalleryView;

/// What a key press means given where the session is.
pub enum Intent {
    Quit,
    Select(String),
    Analyze,
    Finish,
    Reset,
    Edit(Input),
    ScrollUp,
    ScrollDown,
    Ignore,
}

pub fn intent(event: Event, state: MachineState, typed: &str, selected: Option<&str>) -> Intent {
    let typed = typed.trim();

    match event {
        Event::KeyboardCTRLC() => return Intent::Quit,
        Event::KeyboardCTRLR() => return Intent::Reset,
        Event::KeyboardEnter() => match state {
            MachineState::Idle => {
                if typed.is_empty() {
                    return Intent::Ignore;
                }
                return Intent::Select(typed.to_string());
            }
            MachineState::ImageSelected => {
                if !typed.is_empty() && Some(typed) != selected {
                    return Intent::Select(typed.to_string());
                }
                return Intent::Analyze;
            }
            MachineState::Results => return Intent::Finish,
            MachineState::Finished | MachineState::Error => return Intent::Reset,
            _ => return Intent::Ignore,
        },
        Event::KeyboardCharInput(input) => {
            if state == MachineState::Idle || state == MachineState::ImageSelected {
                return Intent::Edit(input);
            }

            match input.key {
                Key::Char('f') if state == MachineState::Results => return Intent::Finish,
                Key::Char('r') if state.is_terminal() || state == MachineState::Results => {
                    return Intent::Reset;
                }
                Key::Up => return Intent::ScrollUp,
                Key::Down => return Intent::ScrollDown,
                _ => return Intent::Ignore,
            }
        }
        _ => return Intent::Ignore,
    }
}

fn hint(state: MachineState) -> &'static str {
    match state {
        MachineState::Idle => {
            return "Type the path to a menu photo and press Enter. CTRL+C to exit.";
        }
        MachineState::ImageSelected => {
            return "Press Enter to read the menu, or type another path. CTRL+R to start over.";
        }
        MachineState::Analyzing | MachineState::GeneratingImages => {
            return "CTRL+R to start over. CTRL+C to exit.";
        }
        MachineState::Results => {
            return "Enter or f to finish, r to start over, Up/Down to scroll.";
        }
        MachineState::Finished => {
            return "Enter or r to visualize another menu. CTRL+C to exit.";
        }
        MachineState::Error => return "Enter or r to start over. CTRL+C to exit.",
    }
}

struct App<'a> {
    snapshot: Snapshot,
    textarea: tui_textarea::TextArea<'a>,
    loading: Loading,
    scroll: u16,
    selected_path: Option<String>,
    pending_path: Option<String>,
    notice: Option<(String, Color)>,
    exported_session: Option<String>,
}

impl<'a> App<'a> {
    fn new() -> App<'a> {
        return App {
            snapshot: Snapshot::default(),
            textarea: TextArea::default(),
            loading: Loading::default(),
            scroll: 0,
            selected_path: None,
            pending_path: None,
            notice: None,
            exported_session: None,
        };
    }

    fn typed(&self) -> String {
        return self.textarea.lines().join("");
    }

    fn clear(&mut self) {
        self.textarea = TextArea::default();
        self.selected_path = None;
        self.pending_path = None;
        self.notice = None;
        self.scroll = 0;
    }

    /// A path only counts as selected once the orchestrator has accepted it.
    fn apply_snapshot(&mut self, snapshot: Snapshot) {
        let previous = self.snapshot.state;
        self.snapshot = snapshot;
        if self.snapshot.state == MachineState::Idle && previous != MachineState::Idle {
            self.clear();
        }

        if let Some(file_path) = self.pending_path.take() {
            if self.snapshot.validation.is_some() {
                self.selected_path = None;
            } else if self.snapshot.menu_image.is_some() {
                self.selected_path = Some(file_path);
            } else {
                self.pending_path = Some(file_path);
            }
        }
    }

    async fn select(
        &mut self,
        tx: &mpsc::UnboundedSender<Action>,
        file_path: &str,
    ) -> Result<()> {
        match MenuImage::load(path::Path::new(file_path)).await {
            Ok(image) => {
                self.pending_path = Some(file_path.to_string());
                self.notice = None;
                tx.send(Action::SelectImage(image))?;
            }
            Err(err) => {
                tracing::warn!(error = ?err, path = file_path, "Could not load menu photo");
                self.notice = Some((err.to_string(), Color::Red));
            }
        }

        return Ok(());
    }

    async fn export_if_finished(&mut self) {
        let output_dir = Config::get(ConfigKey::OutputDir);
        if output_dir.is_empty()
            || self.snapshot.state != MachineState::Finished
            || self.exported_session == self.snapshot.session_id
        {
            return;
        }

        self.exported_session = self.snapshot.session_id.clone();
        match Gallery::export(path::Path::new(&output_dir), &self.snapshot).await {
            Ok(written) => {
                self.notice = Some((
                    format!("Saved {} dish images to {output_dir}", written.len()),
                    Color::Green,
                ));
            }
            Err(err) => {
                tracing::error!(error = ?err, "Failed to export gallery");
                self.notice = Some((format!("Could not save images: {err}"), Color::Red));
            }
        }
    }

    fn render(&self, frame: &mut Frame) {
        let footer_height = match self.snapshot.state {
            MachineState::Idle | MachineState::ImageSelected => 4,
            _ => 3,
        };
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(footer_height),
            ])
            .split(frame.size());

        self.render_header(frame, layout[0]);
        self.render_body(frame, layout[1]);

        match self.snapshot.state {
            MachineState::Idle | MachineState::ImageSelected => {
                frame.render_widget(self.textarea.widget(), layout[2]);
            }
            state if state.is_busy() => {
                self.loading.render(frame, layout[2], hint(state));
            }
            _ => {
                let mut spans = vec![Span::raw(hint(self.snapshot.state))];
                if let Some((notice, color)) = &self.notice {
                    spans.insert(
                        0,
                        Span::styled(format!("{notice}. "), Style::default().fg(*color)),
                    );
                }
                frame.render_widget(
                    Paragraph::new(Line::from(spans))
                        .block(
                            Block::default()
                                .borders(Borders::TOP)
                                .padding(Padding::new(1, 1, 0, 0)),
                        )
                        .wrap(Wrap { trim: true }),
                    layout[2],
                );
            }
        }
    }

    fn render_header(&self, frame: &mut Frame, rect: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(" menuviz ");

        let progress = self.snapshot.progress;
        if progress.total > 0 {
            frame.render_widget(
                Gauge::default()
                    .block(block)
                    .gauge_style(Style::default().fg(Color::Green))
                    .ratio(progress.ratio())
                    .label(format!(
                        "{} {}/{}",
                        self.snapshot.status_message(),
                        progress.current,
                        progress.total
                    )),
                rect,
            );
            return;
        }

        frame.render_widget(
            Paragraph::new(self.snapshot.status_message()).block(block),
            rect,
        );
    }

    fn render_body(&self, frame: &mut Frame, rect: Rect) {
        let block = Block::default().padding(Padding::new(2, 2, 1, 0));

        match self.snapshot.state {
            MachineState::Idle | MachineState::ImageSelected => {
                let mut lines = vec![Line::from(hint(self.snapshot.state))];
                if let Some(image) = &self.snapshot.menu_image {
                    lines.push(Line::from(""));
                    lines.push(Line::from(Span::styled(
                        format!(
                            "Selected {} ({}, {} bytes)",
                            image.file_name, image.mime_type, image.size
                        ),
                        Style::default().fg(Color::Green),
                    )));
                }
                if let Some(validation) = &self.snapshot.validation {
                    lines.push(Line::from(""));
                    lines.push(Line::from(Span::styled(
                        validation.to_string(),
                        Style::default().fg(Color::Red),
                    )));
                }
                if let Some((notice, color)) = &self.notice {
                    lines.push(Line::from(""));
                    lines.push(Line::from(Span::styled(
                        notice.to_string(),
                        Style::default().fg(*color),
                    )));
                }

                frame.render_widget(
                    Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
                    rect,
                );
            }
            MachineState::Analyzing => {
                let file_name = self
                    .snapshot
                    .menu_image
                    .as_ref()
                    .map(|e| return e.file_name.to_string())
                    .unwrap_or_default();
                frame.render_widget(
                    Paragraph::new(format!("Looking for dishes in {file_name}"))
                        .block(block)
                        .wrap(Wrap { trim: false }),
                    rect,
                );
            }
            MachineState::Error => {
                let error = self
                    .snapshot
                    .error
                    .clone()
                    .unwrap_or_else(|| return "Unknown error".to_string());
                frame.render_widget(
                    Paragraph::new(vec![
                        Line::from(Span::styled(
                            self.snapshot.status_message(),
                            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                        )),
                        Line::from(""),
                        Line::from(error),
                    ])
                    .block(block)
                    .wrap(Wrap { trim: false }),
                    rect,
                );
            }
            MachineState::GeneratingImages | MachineState::Results | MachineState::Finished => {
                frame.render_widget(
                    Paragraph::new(GalleryView::lines(&self.snapshot))
                        .block(block)
                        .wrap(Wrap { trim: false })
                        .scroll((self.scroll, 0)),
                    rect,
                );
            }
        }
    }
}

async fn start_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    tx: mpsc::UnboundedSender<Action>,
    snapshots: watch::Receiver<Snapshot>,
) -> Result<()> {
    let mut app = App::new();
    let mut events = EventsService::new(snapshots.clone());

    let initial_path = Config::get(ConfigKey::ImagePath);
    if !initial_path.is_empty() {
        app.textarea.insert_str(&initial_path);
        app.select(&tx, &initial_path).await?;
    }

    #[cfg(feature = "dev")]
    {
        if initial_path.is_empty() {
            app.textarea.insert_str("./menu.jpg");
        }
    }

    loop {
        terminal.draw(|frame| return app.render(frame))?;

        let state = app.snapshot.state;
        let typed = app.typed();
        match events.next().await? {
            Event::OrchestratorStopped() => {
                tracing::error!("Orchestrator stopped, exiting UI");
                break;
            }
            Event::SnapshotUpdated() => {
                app.apply_snapshot(snapshots.borrow().clone());
                app.export_if_finished().await;
            }
            Event::UITick() => {
                app.loading.tick();
            }
            Event::UIResize() => {}
            event => match intent(event, state, &typed, app.selected_path.as_deref()) {
                Intent::Quit => break,
                Intent::Select(file_path) => app.select(&tx, &file_path).await?,
                Intent::Analyze => tx.send(Action::ConfirmAnalyze())?,
                Intent::Finish => tx.send(Action::Finish())?,
                Intent::Reset => {
                    app.clear();
                    tx.send(Action::Reset())?;
                }
                Intent::Edit(input) => {
                    app.textarea.input(input);
                }
                Intent::ScrollUp => app.scroll = app.scroll.saturating_sub(1),
                Intent::ScrollDown => app.scroll = app.scroll.saturating_add(1),
                Intent::Ignore => {}
            },
        }
    }

    return Ok(());
}

pub fn destruct_terminal_for_panic() {
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(io::stdout(), LeaveAlternateScreen, cursor::Show);
}

pub async fn start(
    tx: mpsc::UnboundedSender<Action>,
    snapshots: watch::Receiver<Snapshot>,
) -> Result<()> {
    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    enable_raw_mode()?;
    crossterm::execute!(stdout, EnterAlternateScreen)?;
    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;

    let res = start_loop(&mut terminal, tx, snapshots).await;

    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    return res;
}
