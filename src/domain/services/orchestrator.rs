#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;

use std::sync::Arc;
use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use tokio::sync::mpsc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time;
use uuid::Uuid;

use super::dedupe_items;
use super::Accumulator;
use crate::domain::models::Action;
use crate::domain::models::Completion;
use crate::domain::models::ExtractorBox;
use crate::domain::models::GenerationOutcome;
use crate::domain::models::GenerationPolicy;
use crate::domain::models::GenerationResult;
use crate::domain::models::ImageGeneratorBox;
use crate::domain::models::MachineState;
use crate::domain::models::MenuError;
use crate::domain::models::MenuImage;
use crate::domain::models::MenuItem;
use crate::domain::models::Progress;
use crate::domain::models::Snapshot;

#[derive(Clone, Copy, Debug)]
pub struct OrchestratorOptions {
    pub policy: GenerationPolicy,
    /// Upper bound for every single remote call.
    pub timeout: Duration,
}

impl Default for OrchestratorOptions {
    fn default() -> OrchestratorOptions {
        return OrchestratorOptions {
            policy: GenerationPolicy::Parallel,
            timeout: Duration::from_secs(60),
        };
    }
}

/// One pass through the flow, from image selection to reset.
struct Session {
    id: String,
    epoch: u64,
    menu_image: MenuImage,
    accumulator: Option<Arc<Accumulator>>,
}

fn create_session_id() -> String {
    return Uuid::new_v4()
        .to_string()
        .split('-')
        .take(2)
        .collect::<Vec<&str>>()
        .join("-");
}

async fn extract(
    extractor: ExtractorBox,
    image: MenuImage,
    timeout: Duration,
) -> Result<Vec<MenuItem>, MenuError> {
    match time::timeout(timeout, extractor.extract(&image)).await {
        Ok(Ok(items)) => return Ok(items),
        Ok(Err(err)) => return Err(MenuError::from_extraction(err)),
        Err(_) => {
            tracing::error!(timeout_ms = timeout.as_millis() as u64, "Menu extraction timed out");
            return Err(MenuError::ExtractionTimedOut);
        }
    }
}

async fn generate(
    generator: &ImageGeneratorBox,
    item: &MenuItem,
    timeout: Duration,
) -> GenerationOutcome {
    match time::timeout(timeout, generator.generate(item)).await {
        Ok(Ok(image)) => return GenerationOutcome::Succeeded(image),
        Ok(Err(err)) => {
            let menu_err = MenuError::from_generation(&item.name, err);
            return GenerationOutcome::Failed(menu_err.to_string());
        }
        Err(_) => {
            tracing::error!(dish = item.name, "Image generation timed out");
            let menu_err = MenuError::GenerationTimedOut {
                dish: item.name.to_string(),
            };
            return GenerationOutcome::Failed(menu_err.to_string());
        }
    }
}

/// Owns the single active session and drives it through
/// `Idle -> ImageSelected -> Analyzing -> GeneratingImages -> Results -> Finished`.
///
/// Remote calls run on spawned tasks that report back through a
/// `Completion` channel. Every completion carries the epoch of the session
/// that started it, and anything from an older epoch is dropped, so a reset
/// can never be undone by a response that was already in flight.
pub struct Orchestrator {
    extractor: ExtractorBox,
    generator: ImageGeneratorBox,
    options: OrchestratorOptions,
    epoch: u64,
    state: MachineState,
    session: Option<Session>,
    error: Option<MenuError>,
    validation: Option<MenuError>,
    workers: Vec<JoinHandle<Result<()>>>,
    completion_tx: mpsc::UnboundedSender<Completion>,
    snapshot_tx: watch::Sender<Snapshot>,
}

impl Orchestrator {
    pub fn new(
        extractor: ExtractorBox,
        generator: ImageGeneratorBox,
        options: OrchestratorOptions,
    ) -> (Orchestrator, mpsc::UnboundedReceiver<Completion>) {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel::<Completion>();
        let (snapshot_tx, _) = watch::channel(Snapshot::default());

        let orchestrator = Orchestrator {
            extractor,
            generator,
            options,
            epoch: 0,
            state: MachineState::Idle,
            session: None,
            error: None,
            validation: None,
            workers: vec![],
            completion_tx,
            snapshot_tx,
        };

        return (orchestrator, completion_rx);
    }

    pub fn state(&self) -> MachineState {
        return self.state;
    }

    /// Epoch of the active session, if there is one.
    pub fn epoch(&self) -> Option<u64> {
        return self.session.as_ref().map(|e| return e.epoch);
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        return self.snapshot_tx.subscribe();
    }

    pub fn snapshot(&self) -> Snapshot {
        let mut snapshot = Snapshot {
            state: self.state,
            error: self.error.as_ref().map(|e| return e.to_string()),
            validation: self.validation.as_ref().map(|e| return e.to_string()),
            ..Snapshot::default()
        };

        if let Some(session) = &self.session {
            snapshot.session_id = Some(session.id.to_string());
            snapshot.menu_image = Some(session.menu_image.preview());

            if let Some(accumulator) = &session.accumulator {
                snapshot.items = accumulator.snapshot();
                snapshot.progress = Progress {
                    current: accumulator.completed(),
                    total: accumulator.len(),
                };
            }
        }

        return snapshot;
    }

    fn publish(&self) {
        self.snapshot_tx.send_replace(self.snapshot());
    }

    fn ensure_state(&self, action: &str, allowed: &[MachineState]) -> Result<()> {
        if !allowed.contains(&self.state) {
            bail!(format!("Cannot {action} while {}", self.state));
        }

        return Ok(());
    }

    /// Applies a user intent. Intents that make no sense in the current state
    /// fail and leave everything untouched.
    pub fn handle_action(&mut self, action: Action) -> Result<()> {
        let action_name = action.name();
        tracing::debug!(action = action_name, state = %self.state, "Handling action");

        match action {
            Action::SelectImage(image) => {
                self.ensure_state(
                    action_name,
                    &[MachineState::Idle, MachineState::ImageSelected],
                )?;
                self.select_image(image);
            }
            Action::ConfirmAnalyze() => {
                self.ensure_state(action_name, &[MachineState::ImageSelected])?;
                self.confirm_analyze()?;
            }
            Action::Reset() => {
                self.reset();
            }
            Action::Finish() => {
                self.ensure_state(action_name, &[MachineState::Results])?;
                self.state = MachineState::Finished;
            }
        }

        self.publish();
        return Ok(());
    }

    /// Applies a result reported by a worker task.
    pub fn handle_completion(&mut self, completion: Completion) {
        let epoch = completion.epoch();
        if self.epoch() != Some(epoch) {
            tracing::debug!(epoch = epoch, current = ?self.epoch(), "Discarding stale completion");
            return;
        }

        match completion {
            Completion::Extraction(_, res) => self.finish_extraction(res),
            Completion::Generation(res) => self.finish_generation(res),
        }

        self.publish();
    }

    fn select_image(&mut self, image: MenuImage) {
        if !image.is_image() {
            tracing::warn!(mime_type = image.mime_type, "Rejected non image file");
            self.validation = Some(MenuError::InvalidImage {
                mime: image.mime_type,
            });
            return;
        }

        self.epoch += 1;
        let session = Session {
            id: create_session_id(),
            epoch: self.epoch,
            menu_image: image,
            accumulator: None,
        };
        tracing::info!(session_id = session.id, image = ?session.menu_image, "Selected menu image");

        self.session = Some(session);
        self.validation = None;
        self.state = MachineState::ImageSelected;
    }

    fn confirm_analyze(&mut self) -> Result<()> {
        let session = match &self.session {
            Some(session) => session,
            None => bail!("There is no menu image to analyze"),
        };

        let epoch = session.epoch;
        let image = session.menu_image.clone();
        let extractor = self.extractor.clone();
        let tx = self.completion_tx.clone();
        let timeout = self.options.timeout;

        tracing::info!(session_id = session.id, "Reading menu");
        self.workers.push(tokio::spawn(async move {
            let res = extract(extractor, image, timeout).await;
            tx.send(Completion::Extraction(epoch, res))?;
            return Ok(());
        }));

        self.validation = None;
        self.state = MachineState::Analyzing;
        return Ok(());
    }

    fn finish_extraction(&mut self, res: Result<Vec<MenuItem>, MenuError>) {
        if self.state != MachineState::Analyzing {
            tracing::debug!(state = %self.state, "Ignoring extraction outside of analysis");
            return;
        }

        let items = match res {
            Ok(items) => dedupe_items(items),
            Err(err) => {
                self.fail(err);
                return;
            }
        };

        if items.is_empty() {
            self.fail(MenuError::NoItemsFound);
            return;
        }

        let accumulator = Arc::new(Accumulator::new(items.clone()));
        let epoch = match &mut self.session {
            Some(session) => {
                tracing::info!(session_id = session.id, total = items.len(), "Menu read");
                session.accumulator = Some(accumulator);
                session.epoch
            }
            None => return,
        };

        self.state = MachineState::GeneratingImages;
        self.spawn_generation(epoch, items);
    }

    fn spawn_generation(&mut self, epoch: u64, items: Vec<MenuItem>) {
        let timeout = self.options.timeout;

        match self.options.policy {
            GenerationPolicy::Parallel => {
                for item in items {
                    let generator = self.generator.clone();
                    let tx = self.completion_tx.clone();

                    self.workers.push(tokio::spawn(async move {
                        let outcome = generate(&generator, &item, timeout).await;
                        tx.send(Completion::Generation(GenerationResult {
                            epoch,
                            name: item.name,
                            outcome,
                        }))?;

                        return Ok(());
                    }));
                }
            }
            GenerationPolicy::Sequential => {
                let generator = self.generator.clone();
                let tx = self.completion_tx.clone();

                self.workers.push(tokio::spawn(async move {
                    for item in items {
                        let outcome = generate(&generator, &item, timeout).await;
                        tx.send(Completion::Generation(GenerationResult {
                            epoch,
                            name: item.name,
                            outcome,
                        }))?;
                    }

                    return Ok(());
                }));
            }
        }
    }

    fn finish_generation(&mut self, res: GenerationResult) {
        if self.state != MachineState::GeneratingImages {
            tracing::debug!(state = %self.state, dish = res.name, "Ignoring generation outside of generating");
            return;
        }

        let accumulator = match self.session.as_ref().and_then(|e| return e.accumulator.clone()) {
            Some(accumulator) => accumulator,
            None => return,
        };

        let succeeded = matches!(res.outcome, GenerationOutcome::Succeeded(_));
        if !accumulator.merge(&res.name, res.outcome) {
            return;
        }

        tracing::info!(
            dish = res.name,
            succeeded = succeeded,
            current = accumulator.completed(),
            total = accumulator.len(),
            "Dish generation finished"
        );

        if accumulator.is_complete() {
            self.workers.clear();
            self.state = MachineState::Results;
        }
    }

    fn fail(&mut self, err: MenuError) {
        tracing::warn!(error = %err, kind = %err.kind(), "Session failed");
        self.error = Some(err);
        self.state = MachineState::Error;
    }

    fn reset(&mut self) {
        for worker in self.workers.drain(..) {
            worker.abort();
        }

        if let Some(session) = &self.session {
            tracing::info!(session_id = session.id, "Discarding session");
        }

        self.session = None;
        self.error = None;
        self.validation = None;
        self.state = MachineState::Idle;
    }

    /// Service loop. Applies actions and worker completions in arrival order
    /// until the action channel closes.
    pub async fn start(
        mut self,
        rx: &mut mpsc::UnboundedReceiver<Action>,
        completions: &mut mpsc::UnboundedReceiver<Completion>,
    ) -> Result<()> {
        loop {
            tokio::select! {
                action = rx.recv() => {
                    match action {
                        Some(action) => {
                            if let Err(err) = self.handle_action(action) {
                                tracing::warn!(error = %err, "Ignoring action");
                            }
                        }
                        None => {
                            self.reset();
                            return Ok(());
                        }
                    }
                }
                Some(completion) = completions.recv() => {
                    self.handle_completion(completion);
                }
            }
        }
    }
}
