#[cfg(test)]
#[path = "headless_test.rs"]
mod tests;

use std::collections::HashSet;
use std::path;

use anyhow::bail;
use anyhow::Result;
use owo_colors::OwoColorize;
use owo_colors::Stream;
use tokio::sync::mpsc;
use tokio::sync::watch;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Action;
use crate::domain::models::ItemStatus;
use crate::domain::models::MachineState;
use crate::domain::models::MenuImage;
use crate::domain::models::Snapshot;
use crate::domain::services::Gallery;

pub enum Step {
    Continue(Option<Action>),
    Done(bool),
}

/// Drives a single menu through the flow without a terminal UI and turns
/// every snapshot into progress lines.
#[derive(Default)]
pub struct HeadlessRun {
    last_state: Option<MachineState>,
    printed: HashSet<usize>,
}

impl HeadlessRun {
    /// Lines worth printing for a snapshot that have not been printed yet.
    pub fn lines(&mut self, snapshot: &Snapshot) -> Vec<String> {
        let mut lines = vec![];

        let entered = self.last_state != Some(snapshot.state);
        if entered {
            self.last_state = Some(snapshot.state);
            lines.push(format!(
                "==> {}",
                snapshot
                    .status_message()
                    .if_supports_color(Stream::Stdout, |e| return e.bold())
            ));

            if snapshot.state == MachineState::GeneratingImages {
                lines.push(format!("Found {} dishes", snapshot.progress.total));
            }
        }

        for (idx, view) in snapshot.items.iter().enumerate() {
            if !view.status.is_terminal() || self.printed.contains(&idx) {
                continue;
            }
            self.printed.insert(idx);

            let headline = format!("{}. {}", idx + 1, view.item.headline());
            match &view.status {
                ItemStatus::Succeeded(image) => lines.push(format!(
                    "{} {headline} [{}]",
                    "✓".if_supports_color(Stream::Stdout, |e| return e.green()),
                    image.mime_type
                )),
                ItemStatus::Failed(message) => lines.push(format!(
                    "{} {headline}: {}",
                    "✗".if_supports_color(Stream::Stdout, |e| return e.red()),
                    message
                )),
                ItemStatus::Pending => {}
            }
        }

        if entered && snapshot.state == MachineState::Results {
            let failed = snapshot.failed_count();
            lines.push(format!(
                "{} of {} dishes visualized",
                snapshot.items.len() - failed,
                snapshot.items.len()
            ));
        }

        if let Some(validation) = &snapshot.validation {
            lines.push(format!(
                "{}",
                validation.if_supports_color(Stream::Stderr, |e| return e.red())
            ));
        }
        if let Some(error) = &snapshot.error {
            lines.push(format!(
                "{}",
                error.if_supports_color(Stream::Stderr, |e| return e.red())
            ));
        }

        return lines;
    }

    /// Next intent for the orchestrator, or the final outcome once the menu
    /// is done.
    pub fn step(&self, snapshot: &Snapshot) -> Step {
        match snapshot.state {
            MachineState::Idle => {
                if snapshot.validation.is_some() {
                    return Step::Done(false);
                }
                return Step::Continue(None);
            }
            MachineState::ImageSelected => return Step::Continue(Some(Action::ConfirmAnalyze())),
            MachineState::Analyzing | MachineState::GeneratingImages => {
                return Step::Continue(None);
            }
            MachineState::Results => return Step::Continue(Some(Action::Finish())),
            MachineState::Finished => return Step::Done(true),
            MachineState::Error => return Step::Done(false),
        }
    }
}

async fn export(snapshot: &Snapshot) -> Result<()> {
    let output_dir = Config::get(ConfigKey::OutputDir);
    if output_dir.is_empty() {
        return Ok(());
    }

    let written = Gallery::export(path::Path::new(&output_dir), snapshot).await?;
    println!("Saved {} dish images to {output_dir}", written.len());
    return Ok(());
}

/// Returns whether the menu was fully visualized. Dishes that failed on their
/// own still count as a finished menu.
pub async fn start(
    tx: mpsc::UnboundedSender<Action>,
    mut snapshots: watch::Receiver<Snapshot>,
) -> Result<bool> {
    let image_path = Config::get(ConfigKey::ImagePath);
    let image = MenuImage::load(path::Path::new(&image_path)).await?;

    let mut run = HeadlessRun::default();
    tx.send(Action::SelectImage(image))?;

    loop {
        if snapshots.changed().await.is_err() {
            bail!("Orchestrator stopped before the menu was finished");
        }

        let snapshot = snapshots.borrow_and_update().clone();
        for line in run.lines(&snapshot) {
            if snapshot.state == MachineState::Error || snapshot.validation.is_some() {
                eprintln!("{line}");
            } else {
                println!("{line}");
            }
        }

        match run.step(&snapshot) {
            Step::Continue(Some(action)) => tx.send(action)?,
            Step::Continue(None) => {}
            Step::Done(finished) => {
                if finished {
                    export(&snapshot).await?;
                }
                return Ok(finished);
            }
        }
    }
}
