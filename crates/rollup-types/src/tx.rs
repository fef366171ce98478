//! Pending transaction representation.

use crate::bridge_call_data::BridgeCallData;

/// Note commitment or nullifier: a 32-byte opaque value.
pub type Commitment = [u8; 32];

/// Alias for commitments used as nullifiers, kept distinct for readability at call sites.
pub type Nullifier = [u8; 32];

/// Fee-paying asset identifier.
pub type AssetId = u32;

/// Milliseconds since the Unix epoch, as returned by [`crate::Clock::now_ms`].
pub type Timestamp = u64;

/// 32 zero bytes, meaning "no backward link" / "no predecessor".
pub const ZERO_COMMITMENT: Commitment = [0u8; 32];

/// Identifier the coordinator uses to address a tx in [`crate::RollupDb::delete_txs`].
///
/// Opaque from the coordinator's point of view; the database assigns and interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RollupTxId(pub u64);

/// The kind of a pending transaction, as decoded from its proof data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TxType {
    Deposit,
    Transfer,
    WithdrawLowGas,
    WithdrawHighGas,
    Account,
    DefiDeposit,
    DefiClaim,
}

impl TxType {
    /// Whether this tx type consumes a DeFi bridge slot.
    pub fn is_defi_deposit(self) -> bool {
        matches!(self, TxType::DefiDeposit)
    }

    /// Whether this tx type is a claim, which is admitted ahead of everything else.
    pub fn is_defi_claim(self) -> bool {
        matches!(self, TxType::DefiClaim)
    }

    /// Whether this tx type pays no fee and has no bridge dependency.
    pub fn is_account(self) -> bool {
        matches!(self, TxType::Account)
    }

    /// Whether this tx type is subject to the block-level deposit-cap check.
    pub fn is_deposit(self) -> bool {
        matches!(self, TxType::Deposit)
    }
}

/// A pending transaction, decoded from its raw proof data.
///
/// Immutable once constructed: instances are created fresh on entry to selection and discarded
/// afterwards (see the data model's lifecycle note), never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollupTx {
    id: RollupTxId,
    tx_type: TxType,
    fee_asset_id: AssetId,
    fee_value: u128,
    bridge_call_data: Option<BridgeCallData>,
    note_commitment_1: Commitment,
    note_commitment_2: Commitment,
    backward_link: Commitment,
    created: Timestamp,
    nullifier_1: Nullifier,
    nullifier_2: Nullifier,
    excess_gas: i64,
    /// Present only for [`TxType::Deposit`]: the L1 address crediting the deposit.
    public_owner: Option<[u8; 20]>,
    /// Present only for [`TxType::Deposit`]: the claimed deposit value.
    public_value: Option<u128>,
}

impl RollupTx {
    /// Construct a tx. Callers are expected to have already validated that `bridge_call_data` is
    /// `Some` for [`TxType::DefiDeposit`] (a live bridge-slot consumption) and may also be `Some`
    /// for [`TxType::DefiClaim`] (a reference to the deposit it redeems, not a slot consumption),
    /// `None` otherwise; and that `public_owner`/`public_value` are `Some` iff `tx_type` is
    /// [`TxType::Deposit`]. This constructor does not re-check any of that, it simply stores what
    /// it is given.
    #[expect(clippy::too_many_arguments, reason = "mirrors the wire fields 1:1")]
    pub fn new(
        id: RollupTxId,
        tx_type: TxType,
        fee_asset_id: AssetId,
        fee_value: u128,
        bridge_call_data: Option<BridgeCallData>,
        note_commitment_1: Commitment,
        note_commitment_2: Commitment,
        backward_link: Commitment,
        created: Timestamp,
        nullifier_1: Nullifier,
        nullifier_2: Nullifier,
        excess_gas: i64,
        public_owner: Option<[u8; 20]>,
        public_value: Option<u128>,
    ) -> Self {
        Self {
            id,
            tx_type,
            fee_asset_id,
            fee_value,
            bridge_call_data,
            note_commitment_1,
            note_commitment_2,
            backward_link,
            created,
            nullifier_1,
            nullifier_2,
            excess_gas,
            public_owner,
            public_value,
        }
    }

    pub fn id(&self) -> RollupTxId {
        self.id
    }

    pub fn tx_type(&self) -> TxType {
        self.tx_type
    }

    pub fn fee_asset_id(&self) -> AssetId {
        self.fee_asset_id
    }

    pub fn fee_value(&self) -> u128 {
        self.fee_value
    }

    pub fn bridge_call_data(&self) -> Option<&BridgeCallData> {
        self.bridge_call_data.as_ref()
    }

    pub fn note_commitment_1(&self) -> Commitment {
        self.note_commitment_1
    }

    pub fn note_commitment_2(&self) -> Commitment {
        self.note_commitment_2
    }

    pub fn backward_link(&self) -> Commitment {
        self.backward_link
    }

    /// Whether this tx chains off a predecessor.
    pub fn has_backward_link(&self) -> bool {
        self.backward_link != ZERO_COMMITMENT
    }

    pub fn created(&self) -> Timestamp {
        self.created
    }

    pub fn nullifier_1(&self) -> Nullifier {
        self.nullifier_1
    }

    pub fn nullifier_2(&self) -> Nullifier {
        self.nullifier_2
    }

    pub fn excess_gas(&self) -> i64 {
        self.excess_gas
    }

    pub fn public_owner(&self) -> Option<[u8; 20]> {
        self.public_owner
    }

    pub fn public_value(&self) -> Option<u128> {
        self.public_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commitment(b: u8) -> Commitment {
        let mut c = [0u8; 32];
        c[31] = b;
        c
    }

    fn sample(tx_type: TxType, backward_link: Commitment) -> RollupTx {
        RollupTx::new(
            RollupTxId(1),
            tx_type,
            0,
            0,
            None,
            commitment(1),
            commitment(2),
            backward_link,
            0,
            [0u8; 32],
            [0u8; 32],
            0,
            None,
            None,
        )
    }

    #[test]
    fn zero_backward_link_means_no_predecessor() {
        let tx = sample(TxType::Transfer, ZERO_COMMITMENT);
        assert!(!tx.has_backward_link());
    }

    #[test]
    fn nonzero_backward_link_is_detected() {
        let tx = sample(TxType::Transfer, commitment(9));
        assert!(tx.has_backward_link());
    }

    #[test]
    fn defi_claim_sorts_before_everything_else() {
        assert!(TxType::DefiClaim.is_defi_claim());
        assert!(!TxType::Transfer.is_defi_claim());
    }
}
