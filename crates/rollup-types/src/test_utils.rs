//! Shared test builders, available to other workspace crates under the `test-utils` feature.
//!
//! Mirrors the minimal-builder style used elsewhere in this workspace's own `test_utils`
//! modules: plain functions returning sensible defaults, not a fluent builder type.

use crate::{
    bridge::BridgeConfig, bridge_call_data::AssetRef, tx::AssetId, BridgeCallData, Commitment,
    RollupTx, RollupTxId, Timestamp, TxType, ZERO_COMMITMENT,
};

/// A commitment with its last byte set to `n`, never the zero commitment.
pub fn commitment(n: u8) -> Commitment {
    let mut c = ZERO_COMMITMENT;
    c[31] = n;
    c
}

/// A simple single-sided bridge call, addressed to bridge `bridge_address_id`.
pub fn bridge_call_data(bridge_address_id: u32) -> BridgeCallData {
    BridgeCallData::new(bridge_address_id, AssetRef::Real(0), None, AssetRef::Real(1), None, 0)
}

/// A `DEFI_DEPOSIT` tx routed through `bridge_call_data`, with otherwise-default fields.
pub fn defi_deposit_tx(id: u64, bridge_call_data: BridgeCallData, created: Timestamp) -> RollupTx {
    RollupTx::new(
        RollupTxId(id),
        TxType::DefiDeposit,
        0,
        0,
        Some(bridge_call_data),
        commitment(1),
        commitment(2),
        ZERO_COMMITMENT,
        created,
        [0u8; 32],
        [0u8; 32],
        0,
        None,
        None,
    )
}

/// A `DEFI_CLAIM` tx referencing the deposit that routed through `bridge_call_data`.
///
/// The linkage is informational only — unlike a `DEFI_DEPOSIT`, a claim never consumes a bridge
/// slot or contributes to its gas accounting.
pub fn defi_claim_tx(id: u64, bridge_call_data: BridgeCallData, created: Timestamp) -> RollupTx {
    RollupTx::new(
        RollupTxId(id),
        TxType::DefiClaim,
        0,
        0,
        Some(bridge_call_data),
        commitment(1),
        commitment(2),
        ZERO_COMMITMENT,
        created,
        [0u8; 32],
        [0u8; 32],
        0,
        None,
        None,
    )
}

/// A plain fee-paying tx (transfer), with otherwise-default fields.
pub fn transfer_tx(id: u64, fee_asset_id: AssetId, fee_value: u128, created: Timestamp) -> RollupTx {
    RollupTx::new(
        RollupTxId(id),
        TxType::Transfer,
        fee_asset_id,
        fee_value,
        None,
        commitment(1),
        commitment(2),
        ZERO_COMMITMENT,
        created,
        [0u8; 32],
        [0u8; 32],
        0,
        None,
        None,
    )
}

/// A `DEPOSIT` tx crediting `public_value` to `public_owner`.
pub fn deposit_tx(id: u64, public_owner: [u8; 20], public_value: u128, created: Timestamp) -> RollupTx {
    RollupTx::new(
        RollupTxId(id),
        TxType::Deposit,
        0,
        0,
        None,
        commitment(1),
        commitment(2),
        ZERO_COMMITMENT,
        created,
        [0u8; 32],
        [0u8; 32],
        0,
        Some(public_owner),
        Some(public_value),
    )
}

/// A bridge config with a fixed batch size and no rollup-frequency deadline.
pub fn bridge_config(bridge_call_data: BridgeCallData, num_txs: u32, gas: u64) -> BridgeConfig {
    BridgeConfig::new(bridge_call_data, num_txs, gas, 0)
}
