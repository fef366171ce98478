//! Per-bridge holding queue for DeFi deposit transactions.

use rollup_types::{
    AssetId, AssetSet, BridgeCallData, RollupTx, Timeout, TxFeeResolver, TxFeeResolverError,
};

/// Outcome of [`BridgeTxQueue::txs_to_rollup`]: the txs admitted into the current batch and the
/// resources they consumed.
#[derive(Debug, Clone)]
pub struct QueueSelection {
    pub txs: Vec<RollupTx>,
    pub gas_consumed: u64,
    pub call_data_consumed: u64,
    /// The caller's asset set, updated with any assets newly introduced by this selection.
    pub asset_ids: AssetSet,
}

impl QueueSelection {
    fn empty(asset_ids: AssetSet) -> Self {
        Self {
            txs: Vec::new(),
            gas_consumed: 0,
            call_data_consumed: 0,
            asset_ids,
        }
    }
}

/// Holds the pending `DEFI_DEPOSIT` txs for a single bridge, rebuilt fresh every tick from the
/// freshly-read pending list and the current [`rollup_types::RollupTimeouts`] (it is not durable
/// state; see the design note on per-bridge queue lifecycle).
#[derive(Debug, Clone)]
pub struct BridgeTxQueue {
    bridge_call_data: BridgeCallData,
    txs: Vec<RollupTx>,
    timeout: Option<Timeout>,
    /// Σ `excess_gas` over queued txs. Compared against the bridge's full contract gas to decide
    /// profitability: the amortized per-tx share of `bridgeGas` only matters once a tx is
    /// actually selected into the resource accounting, not for the profitability test itself.
    gas_accrued: i64,
}

impl BridgeTxQueue {
    pub fn new(bridge_call_data: BridgeCallData, timeout: Option<Timeout>) -> Self {
        Self {
            bridge_call_data,
            txs: Vec::new(),
            timeout,
            gas_accrued: 0,
        }
    }

    pub fn bridge_call_data(&self) -> BridgeCallData {
        self.bridge_call_data
    }

    pub fn is_empty(&self) -> bool {
        self.txs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.txs.len()
    }

    /// Append `tx` and fold its excess gas into the accrual.
    pub fn add(&mut self, tx: RollupTx) {
        self.gas_accrued += tx.excess_gas();
        self.txs.push(tx);
    }

    /// Whether `tx` was submitted before the queue's deadline, if one is set.
    pub fn transaction_has_timed_out(&self, tx: &RollupTx) -> bool {
        self.timeout.is_some_and(|t| tx.created() < t.time())
    }

    /// Whether the queue's accrued excess gas already covers the bridge's full on-chain gas cost.
    pub fn is_profitable(&self, bridge_gas: u64) -> bool {
        self.gas_accrued >= 0 && self.gas_accrued as u64 >= bridge_gas
    }

    /// Whether the head of the queue (the earliest-submitted tx) has timed out.
    pub fn is_deadlined(&self) -> bool {
        self.txs.first().is_some_and(|tx| self.transaction_has_timed_out(tx))
    }

    /// Decide which queued txs, if any, may enter the current rollup.
    ///
    /// Only called once the bridge is known to be either profitable or deadlined. Greedily takes
    /// queued txs in insertion order, stopping at (not skipping) the first candidate that would
    /// breach a slot, asset-set, gas, or call-data limit. The bridge's one-shot `bridgeGas` is
    /// charged once, on the first tx actually admitted.
    pub async fn txs_to_rollup<F: TxFeeResolver>(
        &self,
        fee_resolver: &F,
        slots_remaining: usize,
        current_asset_ids: &AssetSet,
        gas_remaining: u64,
        call_data_remaining: u64,
    ) -> Result<QueueSelection, TxFeeResolverError> {
        let bridge_gas = fee_resolver.full_bridge_gas_from_contract(&self.bridge_call_data).await?;
        if !(self.is_profitable(bridge_gas) || self.is_deadlined()) {
            return Ok(QueueSelection::empty(current_asset_ids.clone()));
        }

        let mut assets = current_asset_ids.clone();
        let mut selected = Vec::new();
        let mut gas_left = gas_remaining;
        let mut call_data_left = call_data_remaining;
        let mut slots_left = slots_remaining;
        let mut bridge_gas_charged = false;

        for tx in &self.txs {
            if slots_left == 0 {
                break;
            }
            let asset_id: AssetId = tx.fee_asset_id();
            let is_fee_paying = fee_resolver.is_fee_paying_asset(asset_id).await?;
            if is_fee_paying && assets.would_saturate(asset_id) {
                break;
            }

            let per_tx_gas = fee_resolver.single_bridge_tx_gas(&self.bridge_call_data).await?;
            let gas_delta = per_tx_gas + if bridge_gas_charged { 0 } else { bridge_gas };
            let call_data_delta = fee_resolver.tx_call_data(tx.tx_type()).await?;

            if gas_delta > gas_left || call_data_delta > call_data_left {
                break;
            }

            gas_left -= gas_delta;
            call_data_left -= call_data_delta;
            slots_left -= 1;
            bridge_gas_charged = true;
            if is_fee_paying {
                assets.insert(asset_id);
            }
            selected.push(tx.clone());
        }

        Ok(QueueSelection {
            txs: selected,
            gas_consumed: gas_remaining - gas_left,
            call_data_consumed: call_data_remaining - call_data_left,
            asset_ids: assets,
        })
    }
}
