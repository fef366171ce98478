//! Summary of a selected (published or discarded) batch.

use std::collections::HashMap;

use crate::{bridge_call_data::BridgeCallData, tx::Timestamp, TxType};

/// Per-bridge summary within a [`RollupProfile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeProfile {
    bridge_call_data: BridgeCallData,
    num_txs: u32,
    /// Earliest `created` timestamp among the batch's DEFI_DEPOSIT txs for this bridge.
    earliest_tx: Timestamp,
}

impl BridgeProfile {
    pub fn new(bridge_call_data: BridgeCallData, num_txs: u32, earliest_tx: Timestamp) -> Self {
        Self {
            bridge_call_data,
            num_txs,
            earliest_tx,
        }
    }

    pub fn bridge_call_data(&self) -> BridgeCallData {
        self.bridge_call_data
    }

    pub fn num_txs(&self) -> u32 {
        self.num_txs
    }

    pub fn earliest_tx(&self) -> Timestamp {
        self.earliest_tx
    }
}

/// Summary of a selection outcome, computed whether or not the batch is ultimately published.
#[derive(Debug, Clone)]
pub struct RollupProfile {
    total_txs: u32,
    rollup_size: u32,
    total_gas: u64,
    total_call_data: u64,
    /// Σ(feePaid − minFee) over selected txs, minus Σ outstanding bridge gas. Non-negative means
    /// the batch is profitable on its own.
    gas_balance: i128,
    bridge_profiles: Vec<BridgeProfile>,
    num_txs_per_type: HashMap<TxType, u32>,
    inner_chains: u32,
    outer_chains: u32,
    published: bool,
}

impl RollupProfile {
    #[expect(clippy::too_many_arguments, reason = "profile fields are independent inputs")]
    pub fn new(
        total_txs: u32,
        rollup_size: u32,
        total_gas: u64,
        total_call_data: u64,
        gas_balance: i128,
        bridge_profiles: Vec<BridgeProfile>,
        num_txs_per_type: HashMap<TxType, u32>,
        inner_chains: u32,
        outer_chains: u32,
        published: bool,
    ) -> Self {
        Self {
            total_txs,
            rollup_size,
            total_gas,
            total_call_data,
            gas_balance,
            bridge_profiles,
            num_txs_per_type,
            inner_chains,
            outer_chains,
            published,
        }
    }

    pub fn total_txs(&self) -> u32 {
        self.total_txs
    }

    pub fn rollup_size(&self) -> u32 {
        self.rollup_size
    }

    pub fn total_gas(&self) -> u64 {
        self.total_gas
    }

    pub fn total_call_data(&self) -> u64 {
        self.total_call_data
    }

    pub fn gas_balance(&self) -> i128 {
        self.gas_balance
    }

    pub fn is_profitable(&self) -> bool {
        self.gas_balance >= 0
    }

    pub fn bridge_profiles(&self) -> &[BridgeProfile] {
        &self.bridge_profiles
    }

    pub fn num_txs_per_type(&self) -> &HashMap<TxType, u32> {
        &self.num_txs_per_type
    }

    pub fn inner_chains(&self) -> u32 {
        self.inner_chains
    }

    pub fn outer_chains(&self) -> u32 {
        self.outer_chains
    }

    pub fn published(&self) -> bool {
        self.published
    }

    pub fn with_published(mut self, published: bool) -> Self {
        self.published = published;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profitable_iff_gas_balance_non_negative() {
        let profile = RollupProfile::new(1, 1, 0, 0, -1, vec![], HashMap::new(), 1, 1, false);
        assert!(!profile.is_profitable());
        let profile = RollupProfile::new(1, 1, 0, 0, 0, vec![], HashMap::new(), 1, 1, false);
        assert!(profile.is_profitable());
    }
}
