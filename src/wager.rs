use std::fmt;

/// The two independently sized action amounts.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WagerKind {
    Bet,
    Raise,
}

impl fmt::Display for WagerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WagerKind::Bet => write!(f, "bet"),
            WagerKind::Raise => write!(f, "raise"),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Counter {
    value: u64,
    floor: u64,
    step: u64,
}

impl Counter {
    fn new(floor: u64, step: u64) -> Self {
        Counter {
            value: floor,
            floor,
            step,
        }
    }

    fn increment(&mut self) {
        self.value = self.value.saturating_add(self.step);
    }

    // Never below the floor; the server is the arbiter of the upper bound.
    fn decrement(&mut self) {
        self.value = self.value.saturating_sub(self.step).max(self.floor);
    }
}

/// Two independent wager counters: the bet floor is one table unit, the
/// raise floor two units, both stepping by one unit. No cross-validation
/// between the kinds happens client-side.
#[derive(Clone, Copy, Debug)]
pub struct WagerControl {
    bet: Counter,
    raise: Counter,
}

impl WagerControl {
    pub fn new(unit: u64) -> Self {
        WagerControl {
            bet: Counter::new(unit, unit),
            raise: Counter::new(unit.saturating_mul(2), unit),
        }
    }

    fn counter(&mut self, kind: WagerKind) -> &mut Counter {
        match kind {
            WagerKind::Bet => &mut self.bet,
            WagerKind::Raise => &mut self.raise,
        }
    }

    pub fn increment(&mut self, kind: WagerKind) {
        self.counter(kind).increment();
    }

    pub fn decrement(&mut self, kind: WagerKind) {
        self.counter(kind).decrement();
    }

    pub fn amount(&self, kind: WagerKind) -> u64 {
        match kind {
            WagerKind::Bet => self.bet.value,
            WagerKind::Raise => self.raise.value,
        }
    }

    pub fn floor(&self, kind: WagerKind) -> u64 {
        match kind {
            WagerKind::Bet => self.bet.floor,
            WagerKind::Raise => self.raise.floor,
        }
    }

    /// Return both counters to their floors.
    pub fn reset(&mut self) {
        self.bet.value = self.bet.floor;
        self.raise.value = self.raise.floor;
    }
}
