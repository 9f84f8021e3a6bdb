bitflags::bitflags! {
    /// Conflict handling policy for a mutation.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Strategy: u8 {
        /// Drop conflicting actions and keep applying the rest.
        const KEEP_RUNNING = 0b001;
        /// Abort the whole call on the first detected conflict.
        const THROW_ERROR = 0b010;
        /// Zero-width insertions at one offset do not conflict with each other.
        const ALLOW_INSERT_AT_SAME_POSITION = 0b100;
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::KEEP_RUNNING
    }
}

impl Strategy {
    /// Parse a single flag from its config name (`keep-running`, `throw-error`,
    /// `allow-insert-at-same-position`).
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "keep-running" => Some(Strategy::KEEP_RUNNING),
            "throw-error" => Some(Strategy::THROW_ERROR),
            "allow-insert-at-same-position" => Some(Strategy::ALLOW_INSERT_AT_SAME_POSITION),
            _ => None,
        }
    }

    /// Whether a conflict aborts the call.
    pub fn throws_on_conflict(&self) -> bool {
        self.contains(Strategy::THROW_ERROR)
    }

    pub fn allows_insert_at_same_position(&self) -> bool {
        self.contains(Strategy::ALLOW_INSERT_AT_SAME_POSITION)
    }
}
