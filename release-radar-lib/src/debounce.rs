//! Debounce gate: turns a burst of title edits into one trailing search
//! trigger per quiet period.
//!
//! The gate does not own a timer. It records a deadline and the event loop
//! sleeps until [`DebounceGate::deadline`], then calls [`DebounceGate::poll`].
//! This keeps the gate a pure state machine over `Instant`s.

use tokio::time::{Duration, Instant};

/// Default quiet period before a search fires.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(400);

/// Inputs shorter than this (after trimming) never reach the catalog.
pub const MIN_QUERY_CHARS: usize = 2;

/// What the gate tells its owner to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateSignal {
    /// The quiet period elapsed; search for this text (the last text seen).
    Trigger(String),
    /// Input became too short; hide any visible results.
    Clear,
}

#[derive(Debug)]
struct PendingTrigger {
    text: String,
    deadline: Instant,
}

#[derive(Debug)]
pub struct DebounceGate {
    quiet_period: Duration,
    min_chars: usize,
    pending: Option<PendingTrigger>,
}

impl Default for DebounceGate {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD, MIN_QUERY_CHARS)
    }
}

impl DebounceGate {
    pub fn new(quiet_period: Duration, min_chars: usize) -> Self {
        Self {
            quiet_period,
            min_chars,
            pending: None,
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// Record a text change at `now`.
    ///
    /// Too-short input cancels any pending trigger and returns
    /// [`GateSignal::Clear`] immediately. Otherwise the quiet-period timer is
    /// (re)started and `None` is returned.
    pub fn on_text_changed(&mut self, text: &str, now: Instant) -> Option<GateSignal> {
        if text.trim().chars().count() < self.min_chars {
            self.pending = None;
            return Some(GateSignal::Clear);
        }

        self.pending = Some(PendingTrigger {
            text: text.to_string(),
            deadline: now + self.quiet_period,
        });
        None
    }

    /// When the pending trigger fires, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Emit the trigger if its deadline has passed. Fires at most once per
    /// quiet period.
    pub fn poll(&mut self, now: Instant) -> Option<GateSignal> {
        match &self.pending {
            Some(p) if now >= p.deadline => self.pending.take().map(|p| GateSignal::Trigger(p.text)),
            _ => None,
        }
    }

    /// Cancel any pending trigger without emitting.
    pub fn reset(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> (DebounceGate, Instant) {
        (DebounceGate::default(), Instant::now())
    }

    #[test]
    fn short_input_clears_immediately() {
        let (mut gate, t0) = gate();
        assert_eq!(gate.on_text_changed("E", t0), Some(GateSignal::Clear));
        assert_eq!(gate.on_text_changed("   x  ", t0), Some(GateSignal::Clear));
        assert_eq!(gate.on_text_changed("", t0), Some(GateSignal::Clear));
        assert!(!gate.is_pending());
        assert_eq!(gate.poll(t0 + Duration::from_secs(10)), None);
    }

    #[test]
    fn short_input_cancels_pending_trigger() {
        let (mut gate, t0) = gate();
        assert_eq!(gate.on_text_changed("Elden", t0), None);
        assert_eq!(gate.on_text_changed("E", t0 + Duration::from_millis(100)), Some(GateSignal::Clear));
        assert_eq!(gate.poll(t0 + Duration::from_secs(1)), None);
    }

    #[test]
    fn trigger_waits_for_quiet_period() {
        let (mut gate, t0) = gate();
        gate.on_text_changed("Hades", t0);
        assert_eq!(gate.poll(t0 + Duration::from_millis(399)), None);
        assert_eq!(
            gate.poll(t0 + Duration::from_millis(400)),
            Some(GateSignal::Trigger("Hades".to_string()))
        );
        // Fires once.
        assert_eq!(gate.poll(t0 + Duration::from_millis(800)), None);
    }

    #[test]
    fn rapid_edits_restart_the_timer_and_keep_last_text() {
        let (mut gate, t0) = gate();
        let burst = ["El", "Eld", "Elde", "Elden"];
        for (i, text) in burst.iter().enumerate() {
            gate.on_text_changed(text, t0 + Duration::from_millis(100 * i as u64));
        }
        let last = t0 + Duration::from_millis(300);
        assert_eq!(gate.deadline(), Some(last + DEFAULT_QUIET_PERIOD));
        assert_eq!(gate.poll(last + Duration::from_millis(399)), None);
        assert_eq!(
            gate.poll(last + DEFAULT_QUIET_PERIOD),
            Some(GateSignal::Trigger("Elden".to_string()))
        );
    }

    #[test]
    fn reset_cancels_without_emitting() {
        let (mut gate, t0) = gate();
        gate.on_text_changed("Silksong", t0);
        gate.reset();
        assert_eq!(gate.deadline(), None);
        assert_eq!(gate.poll(t0 + Duration::from_secs(5)), None);
    }

    #[test]
    fn trimmed_length_counts_characters_not_bytes() {
        let (mut gate, t0) = gate();
        // Two multi-byte characters are long enough.
        assert_eq!(gate.on_text_changed(" ÅÖ ", t0), None);
        assert!(gate.is_pending());
    }
}
