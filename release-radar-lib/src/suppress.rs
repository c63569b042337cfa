//! Query suppressor: tells user title edits apart from the coordinator's own
//! title writes, so a prefill never re-opens the search it just closed.

/// Single-writer register. The merger arms it right before overwriting the
/// title; the title-change handler disarms it on the echo of that write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Suppression {
    /// Title changes are user edits.
    #[default]
    Listening,
    /// The next title change is the echo of a programmatic write.
    SwallowNext,
}

#[derive(Debug, Default)]
pub struct QuerySuppressor {
    state: Suppression,
}

impl QuerySuppressor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the register. Called immediately before a programmatic title write.
    pub fn mark_programmatic(&mut self) {
        if self.state == Suppression::SwallowNext {
            log::debug!("suppressor already armed; previous programmatic write was never echoed");
        }
        self.state = Suppression::SwallowNext;
    }

    /// Returns `true` exactly once after each [`mark_programmatic`](Self::mark_programmatic),
    /// resetting the register to listening.
    pub fn consume_suppression(&mut self) -> bool {
        match std::mem::take(&mut self.state) {
            Suppression::SwallowNext => true,
            Suppression::Listening => false,
        }
    }

    pub fn state(&self) -> Suppression {
        self.state
    }
}
