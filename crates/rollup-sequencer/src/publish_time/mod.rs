//! Computes rollup-number-aligned wall-clock publish deadlines.

use std::sync::Arc;

use rollup_types::{BridgeResolver, BridgeResolverError, Clock, RollupTimeouts, Timeout};

/// Computes the most recent past and nearest future publish deadlines from wall-clock time and
/// the currently configured bridges.
///
/// Never reads the system clock directly: time comes from the injected [`Clock`], so tests can
/// exercise deadline boundaries with a fixed or stepped time source.
pub struct PublishTimeManager<R, C> {
    base_interval_secs: f64,
    resolver: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> PublishTimeManager<R, C>
where
    R: BridgeResolver,
    C: Clock,
{
    pub fn new(base_interval_secs: f64, resolver: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            base_interval_secs,
            resolver,
            clock,
        }
    }

    /// The most recent past deadline boundary.
    pub async fn last_timeouts(&self) -> Result<RollupTimeouts, BridgeResolverError> {
        self.timeouts(false).await
    }

    /// The next future deadline boundary.
    pub async fn next_timeouts(&self) -> Result<RollupTimeouts, BridgeResolverError> {
        self.timeouts(true).await
    }

    async fn timeouts(&self, next: bool) -> Result<RollupTimeouts, BridgeResolverError> {
        let bridge_configs = self.resolver.get_bridge_configs().await?;
        let now_secs = self.clock.now_secs();
        Ok(compute_timeouts(now_secs, self.base_interval_secs, &bridge_configs, next))
    }
}

/// Pure core of the deadline computation, free of the resolver/clock collaborators so it can be
/// exercised directly and with `proptest`.
fn compute_timeouts(
    now_secs: f64,
    base_interval_secs: f64,
    bridge_configs: &[rollup_types::BridgeConfig],
    next: bool,
) -> RollupTimeouts {
    if base_interval_secs < 1.0 {
        return RollupTimeouts::disabled();
    }

    let base_rollup_number = (now_secs / base_interval_secs).floor() as u64;
    let base_timeout = boundary(base_rollup_number, base_interval_secs, next);

    let mut bridge_timeouts = std::collections::HashMap::new();
    for config in bridge_configs {
        if !config.has_deadline() {
            continue;
        }
        let bridge_interval_secs = base_interval_secs * f64::from(config.rollup_frequency());
        let bridge_rollup_number = (now_secs / bridge_interval_secs).floor() as u64;
        let timeout = boundary(bridge_rollup_number, bridge_interval_secs, next);
        bridge_timeouts.insert(config.bridge_call_data(), timeout);
    }

    RollupTimeouts::new(Some(base_timeout), bridge_timeouts)
}

/// The `last` or `next` deadline for a rollup number computed at `interval_secs` granularity.
fn boundary(rollup_number: u64, interval_secs: f64, next: bool) -> Timeout {
    let (number, time_secs) = if next {
        (rollup_number + 1, (rollup_number + 1) as f64 * interval_secs)
    } else {
        (rollup_number, rollup_number as f64 * interval_secs)
    };
    Timeout::new((time_secs * 1000.0) as u64, number)
}
