//! Polling state machine

use drugledger_domain::BatchStatus;

/// Where the runner is in a job's lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    /// Job created, no status observed yet
    Submitted,
    /// Non-terminal status observed; keep waiting
    Polling,
    /// Terminal: completed
    Completed,
    /// Terminal: failed
    Failed,
    /// Terminal: cancelled
    Cancelled,
    /// Terminal: expired
    Expired,
}

impl PollState {
    /// Transition on an observed status
    ///
    /// Terminal states absorb every further observation.
    pub fn advance(self, status: &BatchStatus) -> PollState {
        if self.is_terminal() {
            return self;
        }
        match status {
            BatchStatus::Completed => PollState::Completed,
            BatchStatus::Failed => PollState::Failed,
            BatchStatus::Cancelled => PollState::Cancelled,
            BatchStatus::Expired => PollState::Expired,
            _ => PollState::Polling,
        }
    }

    /// Whether the wait loop should stop
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PollState::Submitted | PollState::Polling)
    }
}
