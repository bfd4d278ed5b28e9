//! Per-conversation turn counter.

/// How many user messages a conversation has seen.
///
/// Owned by whoever owns the conversation (a CLI session, or an HTTP client
/// that sends the count back with each request), never by the loop itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TurnState {
    pub user_turns: u32,
}

impl TurnState {
    pub fn new(user_turns: u32) -> Self {
        Self { user_turns }
    }

    /// State after one more user message.
    pub fn advance(self) -> Self {
        Self {
            user_turns: self.user_turns.saturating_add(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero() {
        assert_eq!(TurnState::default().user_turns, 0);
    }

    #[test]
    fn advance_counts_up() {
        let state = TurnState::default().advance().advance();
        assert_eq!(state, TurnState::new(2));
    }

    #[test]
    fn advance_saturates() {
        assert_eq!(TurnState::new(u32::MAX).advance().user_turns, u32::MAX);
    }
}
