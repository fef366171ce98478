//! Wall-clock publish deadlines.

use std::collections::HashMap;

use crate::{bridge_call_data::BridgeCallData, tx::Timestamp};

/// A single deadline: the wall-clock instant it falls at, and the rollup-number it aligns with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeout {
    time: Timestamp,
    rollup_number: u64,
}

impl Timeout {
    pub fn new(time: Timestamp, rollup_number: u64) -> Self {
        Self { time, rollup_number }
    }

    pub fn time(&self) -> Timestamp {
        self.time
    }

    pub fn rollup_number(&self) -> u64 {
        self.rollup_number
    }
}

/// The set of deadlines in force for one coordinator tick.
///
/// `base_timeout` is absent when the base publish interval is configured below one second —
/// deadline-based publication is then disabled entirely, and so is per-bridge deadline tracking.
#[derive(Debug, Clone, Default)]
pub struct RollupTimeouts {
    base_timeout: Option<Timeout>,
    bridge_timeouts: HashMap<BridgeCallData, Timeout>,
}

impl RollupTimeouts {
    pub fn new(base_timeout: Option<Timeout>, bridge_timeouts: HashMap<BridgeCallData, Timeout>) -> Self {
        Self {
            base_timeout,
            bridge_timeouts,
        }
    }

    /// No deadlines at all: base interval disabled and no bridges tracked.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn base_timeout(&self) -> Option<Timeout> {
        self.base_timeout
    }

    pub fn bridge_timeout(&self, bcd: &BridgeCallData) -> Option<Timeout> {
        self.bridge_timeouts.get(bcd).copied()
    }

    pub fn bridge_timeouts(&self) -> &HashMap<BridgeCallData, Timeout> {
        &self.bridge_timeouts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_has_no_base_and_no_bridges() {
        let timeouts = RollupTimeouts::disabled();
        assert!(timeouts.base_timeout().is_none());
        assert!(timeouts.bridge_timeouts().is_empty());
    }
}
