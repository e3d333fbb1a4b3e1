use super::*;
use color_eyre::eyre::eyre;
use std::collections::VecDeque;

use crate::hand::HandStart;

fn record(id: &str) -> HandRecord {
    HandRecord {
        id: id.to_string(),
        main_info: "Stack (10000, 10000), Blinds: 20/40".to_string(),
        dealt: "Player 0: AhKh".to_string(),
        actions: "c\nf".to_string(),
        result: "Player 0: +$40".to_string(),
    }
}

fn config() -> AppConfig {
    AppConfig {
        server_url: "http://localhost:8000".to_string(),
        num_players: 6,
        dealer_index: 0,
        table_unit: 20,
        log_dir: PathBuf::from("/tmp"),
    }
}

fn lines(entries: &[&str]) -> Vec<String> {
    entries.iter().map(|l| l.to_string()).collect()
}

#[derive(Default)]
struct FakeGameService {
    start_responses: VecDeque<Result<HandStart>>,
    action_responses: VecDeque<Result<HandUpdate>>,
    state_responses: VecDeque<Result<HandUpdate>>,
    result_responses: VecDeque<Result<HandRecord>>,
    history_responses: VecDeque<Result<Vec<HandRecord>>>,
    reset_responses: VecDeque<Result<String>>,
    stacks_responses: VecDeque<Result<String>>,
    history_calls: usize,
    actions_sent: Vec<String>,
}

impl GameService for FakeGameService {
    async fn start_hand(&mut self, _num_players: u32, _dealer_index: u32) -> Result<HandStart> {
        self.start_responses
            .pop_front()
            .unwrap_or_else(|| Err(eyre!("unscripted start_hand")))
    }

    async fn submit_action(
        &mut self,
        _hand_id: &str,
        action: &PlayerAction,
    ) -> Result<HandUpdate> {
        self.actions_sent.push(action.wire());
        self.action_responses
            .pop_front()
            .unwrap_or_else(|| Err(eyre!("unscripted submit_action")))
    }

    async fn hand_state(&mut self, _hand_id: &str) -> Result<HandUpdate> {
        self.state_responses
            .pop_front()
            .unwrap_or_else(|| Err(eyre!("unscripted hand_state")))
    }

    async fn hand_result(&mut self, _hand_id: &str) -> Result<HandRecord> {
        self.result_responses
            .pop_front()
            .unwrap_or_else(|| Err(eyre!("unscripted hand_result")))
    }

    async fn hand_history(&mut self) -> Result<Vec<HandRecord>> {
        self.history_calls += 1;
        self.history_responses
            .pop_front()
            .unwrap_or_else(|| Err(eyre!("unscripted hand_history")))
    }

    async fn reset_table(&mut self, _starting_stack: u64) -> Result<String> {
        self.reset_responses
            .pop_front()
            .unwrap_or_else(|| Err(eyre!("unscripted reset_table")))
    }

    async fn apply_stacks(&mut self, _stack: u64) -> Result<String> {
        self.stacks_responses
            .pop_front()
            .unwrap_or_else(|| Err(eyre!("unscripted apply_stacks")))
    }
}

#[tokio::test]
async fn completion_handoff_refreshes_archive_exactly_once() {
    let mut service = FakeGameService::default();
    service.start_responses.push_back(Ok(HandStart {
        id: "hand-1".to_string(),
        log: lines(&["Blinds posted"]),
    }));
    service.action_responses.push_back(Ok(HandUpdate {
        actions: lines(&["Blinds posted", "P1 folds"]),
        finished: true,
        summaries: lines(&["Hand #7 summary..."]),
    }));
    service
        .history_responses
        .push_back(Ok(vec![record("hand-1")]));
    service.start_responses.push_back(Ok(HandStart {
        id: "hand-2".to_string(),
        log: Vec::new(),
    }));

    let mut controller = SessionController::new(service, &config());
    controller.start().await.unwrap();
    controller.submit_action(PlayerAction::Fold).await.unwrap();

    assert_eq!(controller.state(), &SessionState::Idle);
    assert_eq!(
        controller.reconciler.entries(),
        lines(&["Blinds posted", "P1 folds", "Hand #7 summary..."]).as_slice()
    );
    assert_eq!(controller.archive.len(), 1);
    assert_eq!(controller.service.history_calls, 1);
    assert_eq!(controller.service.actions_sent, lines(&["f"]));

    // a fresh hand re-enters InProgress with a cleared transcript
    controller.start().await.unwrap();
    assert!(matches!(
        controller.state(),
        SessionState::InProgress { hand_id } if hand_id == "hand-2"
    ));
    assert!(controller.reconciler.entries().is_empty());
    assert_eq!(controller.reconciler.cursor(), 0);
}

#[tokio::test]
async fn completion_without_summaries_fetches_the_result_record() {
    let mut service = FakeGameService::default();
    service.start_responses.push_back(Ok(HandStart {
        id: "hand-1".to_string(),
        log: Vec::new(),
    }));
    service.action_responses.push_back(Ok(HandUpdate {
        actions: lines(&["P1 folds"]),
        finished: true,
        summaries: Vec::new(),
    }));
    service.result_responses.push_back(Ok(record("hand-1")));
    service.history_responses.push_back(Ok(Vec::new()));

    let mut controller = SessionController::new(service, &config());
    controller.start().await.unwrap();
    controller.submit_action(PlayerAction::Fold).await.unwrap();

    assert_eq!(controller.state(), &SessionState::Idle);
    let entries = controller.reconciler.entries();
    assert_eq!(entries[0], "P1 folds");
    assert_eq!(entries[1], "Hand hand-1");
    assert!(controller.service.result_responses.is_empty());
}

#[tokio::test]
async fn reset_clears_transcript_and_wagers_but_not_archive() {
    let mut service = FakeGameService::default();
    service.start_responses.push_back(Ok(HandStart {
        id: "hand-1".to_string(),
        log: lines(&["Blinds posted"]),
    }));
    service
        .reset_responses
        .push_back(Ok("table reset".to_string()));

    let mut controller = SessionController::new(service, &config());
    controller.archive.replace(vec![record("old")]);
    controller.start().await.unwrap();
    controller.increment_wager(WagerKind::Bet);
    controller.increment_wager(WagerKind::Raise);

    controller.reset(10_000).await.unwrap();

    assert_eq!(controller.state(), &SessionState::Idle);
    assert!(controller.reconciler.entries().is_empty());
    assert_eq!(controller.reconciler.cursor(), 0);
    assert_eq!(controller.wager_amount(WagerKind::Bet), 20);
    assert_eq!(controller.wager_amount(WagerKind::Raise), 40);
    assert_eq!(controller.archive.len(), 1);
}

#[tokio::test]
async fn apply_stacks_reports_through_the_transcript() {
    let mut service = FakeGameService::default();
    service
        .stacks_responses
        .push_back(Ok("stacks set to 5000".to_string()));
    service.stacks_responses.push_back(Err(eyre!("boom")));

    let mut controller = SessionController::new(service, &config());
    controller.apply_stacks(5_000).await.unwrap();
    assert_eq!(
        controller.reconciler.entries().last().unwrap(),
        "Stacks updated: stacks set to 5000"
    );

    controller.apply_stacks(5_000).await.unwrap();
    assert!(
        controller
            .reconciler
            .entries()
            .last()
            .unwrap()
            .starts_with("Stack update failed:")
    );
    assert_eq!(controller.state(), &SessionState::Idle);
}

#[tokio::test]
async fn failed_action_leaves_everything_unchanged() {
    let mut service = FakeGameService::default();
    service.start_responses.push_back(Ok(HandStart {
        id: "hand-1".to_string(),
        log: lines(&["Blinds posted"]),
    }));
    service
        .action_responses
        .push_back(Err(eyre!("connection refused")));

    let mut controller = SessionController::new(service, &config());
    controller.start().await.unwrap();

    let res = controller.submit_action(PlayerAction::Call).await;
    assert!(res.is_err());
    assert!(matches!(
        controller.state(),
        SessionState::InProgress { .. }
    ));
    assert_eq!(controller.reconciler.entries(), lines(&["Blinds posted"]).as_slice());
    assert_eq!(controller.reconciler.cursor(), 1);
}

#[tokio::test]
async fn start_is_ignored_while_a_hand_is_running() {
    let mut service = FakeGameService::default();
    service.start_responses.push_back(Ok(HandStart {
        id: "hand-1".to_string(),
        log: Vec::new(),
    }));
    service.start_responses.push_back(Ok(HandStart {
        id: "hand-2".to_string(),
        log: Vec::new(),
    }));

    let mut controller = SessionController::new(service, &config());
    controller.start().await.unwrap();
    controller.start().await.unwrap();

    assert!(matches!(
        controller.state(),
        SessionState::InProgress { hand_id } if hand_id == "hand-1"
    ));
    // the second scripted response was never consumed
    assert_eq!(controller.service.start_responses.len(), 1);
}

#[tokio::test]
async fn actions_while_idle_send_nothing() {
    let service = FakeGameService::default();
    let mut controller = SessionController::new(service, &config());

    controller.submit_action(PlayerAction::Fold).await.unwrap();

    assert!(controller.service.actions_sent.is_empty());
    assert_eq!(controller.state(), &SessionState::Idle);
}

#[tokio::test]
async fn sync_merges_the_cumulative_state_log() {
    let mut service = FakeGameService::default();
    service.start_responses.push_back(Ok(HandStart {
        id: "hand-1".to_string(),
        log: lines(&["a"]),
    }));
    service.state_responses.push_back(Ok(HandUpdate {
        actions: lines(&["a", "b"]),
        finished: false,
        summaries: Vec::new(),
    }));

    let mut controller = SessionController::new(service, &config());
    controller.start().await.unwrap();
    controller.sync().await.unwrap();

    assert_eq!(controller.reconciler.entries(), lines(&["a", "b"]).as_slice());
    assert_eq!(controller.reconciler.cursor(), 2);
    assert!(matches!(
        controller.state(),
        SessionState::InProgress { .. }
    ));
}
