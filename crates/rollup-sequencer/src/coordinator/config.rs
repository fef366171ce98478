//! Configuration for the rollup coordinator.

/// Deployment constants the coordinator needs that are not sourced from a collaborator.
///
/// Constructed once at startup and handed to the coordinator; mirrors the shape of
/// `BatchBuilderConfig` elsewhere in this workspace — a `Default` with documented values, plus a
/// constructor for the field callers most often need to change.
#[derive(Debug, Clone)]
pub struct RollupCoordinatorConfig {
    /// Transactions per inner rollup proof.
    pub num_inner_rollup_txs: usize,
    /// Inner proofs aggregated into one outer (published) rollup.
    pub num_outer_rollup_proofs: usize,
    /// Distinct bridges a single rollup may reference.
    pub num_bridge_calls_per_block: usize,
    /// Distinct fee-paying assets a single rollup may reference.
    pub number_of_assets: usize,
    /// Base publish interval, in seconds. Values below 1 disable deadline-based publication
    /// entirely.
    pub base_interval_secs: f64,
}

impl Default for RollupCoordinatorConfig {
    fn default() -> Self {
        Self {
            num_inner_rollup_txs: 32,
            num_outer_rollup_proofs: 1,
            num_bridge_calls_per_block: 4,
            number_of_assets: 5,
            base_interval_secs: 3_600.0,
        }
    }
}

impl RollupCoordinatorConfig {
    /// Total tx slots in a single published rollup.
    pub fn total_slots(&self) -> usize {
        self.num_inner_rollup_txs * self.num_outer_rollup_proofs
    }

    /// Override just the slot shape, keeping the rest at their defaults.
    pub fn with_slots(num_inner_rollup_txs: usize, num_outer_rollup_proofs: usize) -> Self {
        Self {
            num_inner_rollup_txs,
            num_outer_rollup_proofs,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_slots_is_the_product_of_inner_and_outer() {
        let config = RollupCoordinatorConfig::with_slots(32, 3);
        assert_eq!(config.total_slots(), 96);
    }
}
