use std::path::{
    Path,
    PathBuf,
};

use color_eyre::eyre::{
    Result,
    WrapErr,
};
use tracing::error;

use crate::{
    archive::ArchiveStore,
    game_client::GameClient,
    game_service::GameService,
    hand::{
        HandRecord,
        HandUpdate,
        PlayerAction,
    },
    transcript::TranscriptReconciler,
    ui,
    wager::{
        WagerControl,
        WagerKind,
    },
};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";
pub const DEFAULT_NUM_PLAYERS: u32 = 6;
pub const DEFAULT_TABLE_UNIT: u64 = 20;
pub const DEFAULT_STARTING_STACK: u64 = 10_000;
pub const DEFAULT_LOG_DIR: &str = "~/.holdem-client/logs";
const MAX_VISIBLE_ERRORS: usize = 5;

#[cfg(test)]
mod tests;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server_url: String,
    pub num_players: u32,
    pub dealer_index: u32,
    pub table_unit: u64,
    pub log_dir: PathBuf,
}

/// Where the client sits in the hand cycle. InProgress carries the
/// server-assigned hand id so action, state, and result requests can be
/// routed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SessionState {
    Idle,
    InProgress { hand_id: String },
}

/// Everything the renderer needs for one frame.
#[derive(Clone, Debug)]
pub struct TableSnapshot {
    pub session: SessionState,
    pub transcript: Vec<String>,
    pub records: Vec<HandRecord>,
    pub bet: u64,
    pub raise: u64,
    pub status: String,
    pub errors: Vec<String>,
    pub anomalies: u64,
}

/// Owns the session state machine and every piece of client-side state:
/// the transcript reconciler, the wager counters, and the archive. All
/// server round-trips go through the `GameService` collaborator and are
/// awaited inline, so no two requests ever overlap.
pub struct SessionController<S> {
    service: S,
    state: SessionState,
    reconciler: TranscriptReconciler,
    wagers: WagerControl,
    archive: ArchiveStore,
    num_players: u32,
    dealer_index: u32,
    status: String,
    errors: Vec<String>,
}

impl<S> SessionController<S> {
    pub fn new(service: S, config: &AppConfig) -> Self {
        Self {
            service,
            state: SessionState::Idle,
            reconciler: TranscriptReconciler::new(),
            wagers: WagerControl::new(config.table_unit),
            archive: ArchiveStore::new(),
            num_players: config.num_players,
            dealer_index: config.dealer_index,
            status: String::from("Ready"),
            errors: Vec::new(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    pub fn push_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
        if self.errors.len() > MAX_VISIBLE_ERRORS {
            let excess = self.errors.len() - MAX_VISIBLE_ERRORS;
            self.errors.drain(..excess);
        }
    }

    pub fn wager_amount(&self, kind: WagerKind) -> u64 {
        self.wagers.amount(kind)
    }

    pub fn increment_wager(&mut self, kind: WagerKind) {
        self.wagers.increment(kind);
    }

    pub fn decrement_wager(&mut self, kind: WagerKind) {
        self.wagers.decrement(kind);
    }

    pub fn snapshot(&self) -> TableSnapshot {
        TableSnapshot {
            session: self.state.clone(),
            transcript: self.reconciler.entries().to_vec(),
            records: self.archive.records().to_vec(),
            bet: self.wagers.amount(WagerKind::Bet),
            raise: self.wagers.amount(WagerKind::Raise),
            status: self.status.clone(),
            errors: self.errors.clone(),
            anomalies: self.reconciler.anomalies(),
        }
    }
}

impl<S: GameService> SessionController<S> {
    /// Deal a new hand. Valid only while idle; the transcript and cursor
    /// are cleared before the opening log is merged.
    pub async fn start(&mut self) -> Result<()> {
        if let SessionState::InProgress { .. } = self.state {
            self.set_status("Hand already in progress");
            return Ok(());
        }
        let start = self
            .service
            .start_hand(self.num_players, self.dealer_index)
            .await?;
        self.reconciler.reset();
        self.reconciler.merge(&start.log);
        self.set_status(format!("Hand {} dealt", start.id));
        self.state = SessionState::InProgress { hand_id: start.id };
        Ok(())
    }

    /// Submit one player action for the in-flight hand and absorb the
    /// server's cumulative log. On a transport error nothing is mutated.
    pub async fn submit_action(&mut self, action: PlayerAction) -> Result<()> {
        let SessionState::InProgress { hand_id } = self.state.clone() else {
            self.set_status("No hand in progress; press n to deal");
            return Ok(());
        };
        let update = self.service.submit_action(&hand_id, &action).await?;
        self.absorb_update(&hand_id, update).await
    }

    /// Re-fetch the in-flight hand's state and merge its cumulative log,
    /// recovering any entries lost to a dropped response.
    pub async fn sync(&mut self) -> Result<()> {
        let SessionState::InProgress { hand_id } = self.state.clone() else {
            self.set_status("No hand in progress; nothing to sync");
            return Ok(());
        };
        let update = self.service.hand_state(&hand_id).await?;
        self.absorb_update(&hand_id, update).await
    }

    async fn absorb_update(&mut self, hand_id: &str, update: HandUpdate) -> Result<()> {
        let appended = self.reconciler.merge(&update.actions).len();
        if update.finished {
            let summaries = if update.summaries.is_empty() {
                // Older servers omit summary lines and only persist the
                // record; fall back to fetching it.
                match self.service.hand_result(hand_id).await {
                    Ok(record) => record.lines(),
                    Err(err) => {
                        error!(%err, "result fetch after hand completion failed");
                        Vec::new()
                    }
                }
            } else {
                update.summaries
            };
            for line in summaries {
                self.reconciler.append(line);
            }
            self.state = SessionState::Idle;
            self.refresh_history().await?;
            self.set_status(format!(
                "Hand finished; archive holds {} hands",
                self.archive.len()
            ));
        } else if appended > 0 {
            self.set_status(format!("{appended} new log entries"));
        }
        Ok(())
    }

    /// Reset the table with a fresh starting stack. Valid from any state.
    /// The archive is deliberately left untouched.
    pub async fn reset(&mut self, starting_stack: u64) -> Result<()> {
        let message = self.service.reset_table(starting_stack).await?;
        self.state = SessionState::Idle;
        self.reconciler.reset();
        self.wagers.reset();
        self.set_status(format!("Table reset: {message}"));
        Ok(())
    }

    /// Push a stack configuration to the server. Session state is never
    /// touched; the transcript is this operation's only feedback channel,
    /// so both outcomes land there.
    pub async fn apply_stacks(&mut self, stack: u64) -> Result<()> {
        match self.service.apply_stacks(stack).await {
            Ok(message) => {
                self.reconciler.append(format!("Stacks updated: {message}"));
            }
            Err(err) => {
                error!(%err, "stack update failed");
                self.reconciler
                    .append(format!("Stack update failed: {err}"));
            }
        }
        Ok(())
    }

    /// Replace the archive with the server's full history collection.
    pub async fn refresh_history(&mut self) -> Result<()> {
        let records = self.service.hand_history().await?;
        self.archive.replace(records);
        Ok(())
    }
}

pub fn init_tracing(log_dir: &Path) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    std::fs::create_dir_all(log_dir).wrap_err_with(|| {
        format!("failed to create log directory {}", log_dir.display())
    })?;
    let appender = tracing_appender::rolling::daily(log_dir, "holdem-client.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init();
    Ok(guard)
}

pub async fn run_app(config: AppConfig) -> Result<()> {
    let service = GameClient::new(config.server_url.clone())?;
    let mut controller = SessionController::new(service, &config);
    let mut ui_state = ui::UiState::default();
    let mut input_events = ui::input_event_stream();

    tracing::info!(server = %config.server_url, "starting UI");
    ui::terminal_enter(&mut ui_state)?;
    let res = run_loop(&mut controller, &mut ui_state, &mut input_events).await;
    ui::terminal_exit()?;
    res
}

fn show_processing<S: GameService>(
    controller: &mut SessionController<S>,
    ui_state: &mut ui::UiState,
    message: impl Into<String>,
    context: &'static str,
) -> Result<()> {
    controller.set_status(message);
    ui::draw(ui_state, &controller.snapshot()).wrap_err(context)
}

async fn run_loop<S: GameService>(
    controller: &mut SessionController<S>,
    ui_state: &mut ui::UiState,
    input_events: &mut ui::InputEvents,
) -> Result<()> {
    tracing::info!("running app loop");
    if let Err(err) = controller.refresh_history().await {
        error!(%err, "initial history fetch failed");
        controller.push_error(format!("History fetch failed: {err}"));
    }
    ui::draw(ui_state, &controller.snapshot())?;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            raw = ui::next_raw_event(input_events) => {
                let event = raw?;
                let Some(ev) = ui::interpret_event(ui_state, event) else {
                    continue;
                };
                match ev {
                    ui::UserEvent::Quit => break,
                    ui::UserEvent::Redraw => {}
                    ui::UserEvent::StartHand => {
                        show_processing(
                            controller,
                            ui_state,
                            "Dealing new hand...",
                            "draw while dealing failed",
                        )?;
                        if let Err(err) = controller.start().await {
                            error!(%err, "start failed");
                            controller.push_error(format!("Start failed: {err}"));
                        }
                    }
                    ui::UserEvent::Fold
                    | ui::UserEvent::Check
                    | ui::UserEvent::Call
                    | ui::UserEvent::Bet
                    | ui::UserEvent::Raise
                    | ui::UserEvent::AllIn => {
                        let action = match ev {
                            ui::UserEvent::Fold => PlayerAction::Fold,
                            ui::UserEvent::Check => PlayerAction::Check,
                            ui::UserEvent::Call => PlayerAction::Call,
                            ui::UserEvent::Bet => {
                                PlayerAction::Bet(controller.wager_amount(WagerKind::Bet))
                            }
                            ui::UserEvent::Raise => {
                                PlayerAction::Raise(
                                    controller.wager_amount(WagerKind::Raise),
                                )
                            }
                            _ => PlayerAction::AllIn,
                        };
                        show_processing(
                            controller,
                            ui_state,
                            format!("Submitting {action}..."),
                            "draw while submitting action failed",
                        )?;
                        if let Err(err) = controller.submit_action(action).await {
                            error!(%err, "action failed");
                            controller.push_error(format!("Action failed: {err}"));
                        }
                    }
                    ui::UserEvent::IncBet => controller.increment_wager(WagerKind::Bet),
                    ui::UserEvent::DecBet => controller.decrement_wager(WagerKind::Bet),
                    ui::UserEvent::IncRaise => {
                        controller.increment_wager(WagerKind::Raise)
                    }
                    ui::UserEvent::DecRaise => {
                        controller.decrement_wager(WagerKind::Raise)
                    }
                    ui::UserEvent::SyncState => {
                        show_processing(
                            controller,
                            ui_state,
                            "Syncing hand state...",
                            "draw while syncing failed",
                        )?;
                        if let Err(err) = controller.sync().await {
                            error!(%err, "sync failed");
                            controller.push_error(format!("Sync failed: {err}"));
                        }
                    }
                    ui::UserEvent::RefreshHistory => {
                        show_processing(
                            controller,
                            ui_state,
                            "Fetching hand history...",
                            "draw while fetching history failed",
                        )?;
                        match controller.refresh_history().await {
                            Ok(()) => {
                                let count = controller.snapshot().records.len();
                                controller.set_status(format!("History: {count} hands"));
                            }
                            Err(err) => {
                                error!(%err, "history fetch failed");
                                controller
                                    .push_error(format!("History fetch failed: {err}"));
                            }
                        }
                    }
                    ui::UserEvent::ConfirmReset { starting_stack } => {
                        show_processing(
                            controller,
                            ui_state,
                            format!("Resetting table to {starting_stack}..."),
                            "draw while resetting failed",
                        )?;
                        if let Err(err) = controller.reset(starting_stack).await {
                            error!(%err, "table reset failed");
                            controller.push_error(format!("Reset failed: {err}"));
                        }
                    }
                    ui::UserEvent::ConfirmStacks { stack } => {
                        show_processing(
                            controller,
                            ui_state,
                            format!("Applying stacks of {stack}..."),
                            "draw while applying stacks failed",
                        )?;
                        controller.apply_stacks(stack).await?;
                        controller.set_status("Ready");
                    }
                }
                ui::draw(ui_state, &controller.snapshot())?;
            }
        }
    }
    Ok(())
}
