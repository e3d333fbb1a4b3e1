use crate::hand::{
    HandRecord,
    HandStart,
    HandUpdate,
    PlayerAction,
};
use color_eyre::eyre::Result;

/// The round-trips the session controller performs against the game
/// authority. The `actions`/`log` sequences in the responses are
/// cumulative from the deal; the cursor-based transcript merge depends
/// on that and must never be fed deltas.
pub trait GameService {
    fn start_hand(
        &mut self,
        num_players: u32,
        dealer_index: u32,
    ) -> impl Future<Output = Result<HandStart>>;

    fn submit_action(
        &mut self,
        hand_id: &str,
        action: &PlayerAction,
    ) -> impl Future<Output = Result<HandUpdate>>;

    fn hand_state(&mut self, hand_id: &str) -> impl Future<Output = Result<HandUpdate>>;

    fn hand_result(&mut self, hand_id: &str) -> impl Future<Output = Result<HandRecord>>;

    fn hand_history(&mut self) -> impl Future<Output = Result<Vec<HandRecord>>>;

    fn reset_table(&mut self, starting_stack: u64) -> impl Future<Output = Result<String>>;

    fn apply_stacks(&mut self, stack: u64) -> impl Future<Output = Result<String>>;
}
