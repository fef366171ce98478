//! DeFi bridge configuration, as published by the bridge registry.

use crate::bridge_call_data::BridgeCallData;

/// Configuration for a single DeFi bridge, as returned by [`crate::BridgeResolver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeConfig {
    bridge_call_data: BridgeCallData,
    num_txs: u32,
    gas: u64,
    rollup_frequency: i32,
}

impl BridgeConfig {
    pub fn new(bridge_call_data: BridgeCallData, num_txs: u32, gas: u64, rollup_frequency: i32) -> Self {
        Self {
            bridge_call_data,
            num_txs,
            gas,
            rollup_frequency,
        }
    }

    pub fn bridge_call_data(&self) -> BridgeCallData {
        self.bridge_call_data
    }

    pub fn num_txs(&self) -> u32 {
        self.num_txs
    }

    pub fn gas(&self) -> u64 {
        self.gas
    }

    pub fn rollup_frequency(&self) -> i32 {
        self.rollup_frequency
    }

    /// Whether this bridge participates in deadline tracking.
    ///
    /// Bridges with `rollup_frequency < 1` are excluded from deadline tracking but remain
    /// eligible for admission via profitability.
    pub fn has_deadline(&self) -> bool {
        self.rollup_frequency >= 1
    }
}
