use std::fmt;

/// One discrete player decision, sized where the kind calls for it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PlayerAction {
    Fold,
    Check,
    Call,
    Bet(u64),
    Raise(u64),
    AllIn,
}

impl PlayerAction {
    /// Wire encoding understood by the dealer server.
    pub fn wire(&self) -> String {
        match self {
            PlayerAction::Fold => "f".to_string(),
            PlayerAction::Check => "x".to_string(),
            PlayerAction::Call => "c".to_string(),
            PlayerAction::Bet(amount) => format!("b{amount}"),
            PlayerAction::Raise(amount) => format!("r{amount}"),
            PlayerAction::AllIn => "allin".to_string(),
        }
    }
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerAction::Fold => write!(f, "fold"),
            PlayerAction::Check => write!(f, "check"),
            PlayerAction::Call => write!(f, "call"),
            PlayerAction::Bet(amount) => write!(f, "bet {amount}"),
            PlayerAction::Raise(amount) => write!(f, "raise {amount}"),
            PlayerAction::AllIn => write!(f, "all-in"),
        }
    }
}

/// A freshly dealt hand: its server-assigned id plus the opening log.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HandStart {
    pub id: String,
    pub log: Vec<String>,
}

/// Server view of an in-flight hand after an action or a state fetch.
/// `actions` is cumulative from the deal, never a delta.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct HandUpdate {
    pub actions: Vec<String>,
    pub finished: bool,
    pub summaries: Vec<String>,
}

/// Archived record of one completed hand. Every field except `id` is
/// opaque, possibly multi-line text owned by the server.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HandRecord {
    pub id: String,
    pub main_info: String,
    pub dealt: String,
    pub actions: String,
    pub result: String,
}

impl HandRecord {
    /// Flatten the record into displayable lines, splitting multi-line fields.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![format!("Hand {}", self.id)];
        for field in [&self.main_info, &self.dealt, &self.actions, &self.result] {
            lines.extend(field.lines().map(str::to_string));
        }
        lines
    }
}
