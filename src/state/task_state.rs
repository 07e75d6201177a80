/// Lifecycle of a single crawl task
///
/// A task walks Pending → CheckingDepth → Claiming → Fetching → Spawning →
/// Finished, leaving early for Finished when the depth budget is spent, the
/// address was already claimed, or the crawl was cancelled.
use std::fmt;

/// Represents where one crawl task currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskState {
    /// Spawned and registered, not yet running
    Pending,

    /// Checking the remaining depth budget
    CheckingDepth,

    /// Attempting to claim the address in the visited set
    Claiming,

    /// Waiting on the fetcher
    Fetching,

    /// Spawning one child per discovered address
    Spawning,

    /// Done; the completion signal has fired or is about to
    Finished,
}

impl TaskState {
    /// Returns true if this is the terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished)
    }

    /// Returns whether `next` is a legal successor of this state
    pub fn can_transition_to(&self, next: TaskState) -> bool {
        use TaskState::*;
        matches!(
            (self, next),
            (Pending, CheckingDepth)
                | (Pending, Finished)
                | (CheckingDepth, Claiming)
                | (CheckingDepth, Finished)
                | (Claiming, Fetching)
                | (Claiming, Finished)
                | (Fetching, Spawning)
                | (Fetching, Finished)
                | (Spawning, Finished)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::CheckingDepth => "checking_depth",
            Self::Claiming => "claiming",
            Self::Fetching => "fetching",
            Self::Spawning => "spawning",
            Self::Finished => "finished",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
