//! Block-level transaction validator: re-checks the pending set against freshly settled
//! chain state and drops anything it no longer admits.
//!
//! Runs outside a coordinator tick, triggered by block arrival rather than the tick driver, so it
//! takes its own `ChainView`/`RollupDb` handles rather than a
//! [`crate::coordinator::ctx::CoordinatorCtx`].

use std::collections::{HashMap, HashSet};

use rollup_types::{
    AssetId, ChainView, Commitment, CoordinatorError, RollupDb, RollupTx, RollupTxId,
};

/// Re-validates `pending` against `chain` and deletes everything no longer admissible from `db`.
///
/// Processes `pending` in the order given — callers should pass it in insertion order so the
/// deposit-cap running sum and the backward-link cascade both see earlier txs first.
/// Returns the ids actually deleted.
pub async fn validate_block<C: ChainView, D: RollupDb>(
    chain: &C,
    db: &D,
    pending: &[RollupTx],
) -> Result<Vec<RollupTxId>, CoordinatorError> {
    let mut rejected_ids = Vec::new();
    let mut rejected_commitments: HashSet<Commitment> = HashSet::new();
    let mut consumed_deposits: HashMap<(AssetId, [u8; 20]), u128> = HashMap::new();

    for tx in pending {
        let mut reject = chain.is_nullifier_spent(tx.nullifier_1()).await?
            || chain.is_nullifier_spent(tx.nullifier_2()).await?;

        if !reject && tx.tx_type().is_deposit() {
            let owner = tx.public_owner().ok_or_else(|| {
                CoordinatorError::invariant_violated("DEPOSIT tx missing public_owner")
            })?;
            let value = tx.public_value().ok_or_else(|| {
                CoordinatorError::invariant_violated("DEPOSIT tx missing public_value")
            })?;
            let key = (tx.fee_asset_id(), owner);
            let pending_on_chain = chain.user_pending_deposit(tx.fee_asset_id(), owner).await?;
            let consumed = *consumed_deposits.get(&key).unwrap_or(&0);
            if consumed + value > pending_on_chain {
                reject = true;
            } else {
                consumed_deposits.insert(key, consumed + value);
            }
        }

        if !reject && tx.has_backward_link() && rejected_commitments.contains(&tx.backward_link()) {
            reject = true;
        }

        if reject {
            rejected_commitments.insert(tx.note_commitment_1());
            rejected_commitments.insert(tx.note_commitment_2());
            rejected_ids.push(tx.id());
        }
    }

    if !rejected_ids.is_empty() {
        db.delete_txs(&rejected_ids).await?;
    }
    Ok(rejected_ids)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use rollup_types::{
        test_utils::commitment, ChainViewError, MockRollupDb, RollupTx, RollupTxId, TxType,
        ZERO_COMMITMENT,
    };

    use super::*;

    /// A hand-implemented [`ChainView`] instead of [`rollup_types::MockChainView`] — validator
    /// tests drive it through several txs in sequence and a plain lookup table reads better than
    /// a chain of `.returning()` closures keyed by call order.
    struct FakeChain {
        spent_nullifiers: HashSet<[u8; 32]>,
        pending_deposits: HashMap<(AssetId, [u8; 20]), u128>,
    }

    impl FakeChain {
        fn new() -> Self {
            Self {
                spent_nullifiers: HashSet::new(),
                pending_deposits: HashMap::new(),
            }
        }

        fn with_spent(mut self, nullifier: [u8; 32]) -> Self {
            self.spent_nullifiers.insert(nullifier);
            self
        }

        fn with_pending_deposit(mut self, asset_id: AssetId, owner: [u8; 20], value: u128) -> Self {
            self.pending_deposits.insert((asset_id, owner), value);
            self
        }
    }

    #[async_trait]
    impl ChainView for FakeChain {
        async fn is_nullifier_spent(&self, nullifier: Commitment) -> Result<bool, ChainViewError> {
            Ok(self.spent_nullifiers.contains(&nullifier))
        }

        async fn user_pending_deposit(
            &self,
            asset_id: AssetId,
            owner: [u8; 20],
        ) -> Result<u128, ChainViewError> {
            Ok(*self.pending_deposits.get(&(asset_id, owner)).unwrap_or(&0))
        }
    }

    fn owner(b: u8) -> [u8; 20] {
        [b; 20]
    }

    fn nullifier(b: u8) -> [u8; 32] {
        let mut n = [0u8; 32];
        n[31] = b;
        n
    }

    #[expect(clippy::too_many_arguments, reason = "mirrors RollupTx::new 1:1")]
    fn tx(
        id: u64,
        tx_type: TxType,
        fee_asset_id: AssetId,
        note_commitment_1: Commitment,
        backward_link: Commitment,
        nullifier_1: [u8; 32],
        public_owner: Option<[u8; 20]>,
        public_value: Option<u128>,
    ) -> RollupTx {
        RollupTx::new(
            RollupTxId(id),
            tx_type,
            fee_asset_id,
            0,
            None,
            note_commitment_1,
            commitment(id as u8 + 100),
            backward_link,
            0,
            nullifier_1,
            [0u8; 32],
            0,
            public_owner,
            public_value,
        )
    }

    fn transfer(id: u64) -> RollupTx {
        tx(
            id, TxType::Transfer, 0, commitment(id as u8), ZERO_COMMITMENT, [0u8; 32], None, None,
        )
    }

    fn deposit(id: u64, asset_id: AssetId, owner: [u8; 20], value: u128) -> RollupTx {
        tx(
            id,
            TxType::Deposit,
            asset_id,
            commitment(id as u8),
            ZERO_COMMITMENT,
            [0u8; 32],
            Some(owner),
            Some(value),
        )
    }

    #[tokio::test]
    async fn a_tx_with_a_spent_nullifier_is_rejected() {
        let spent = nullifier(7);
        let t = tx(1, TxType::Transfer, 0, commitment(1), ZERO_COMMITMENT, spent, None, None);
        let chain = FakeChain::new().with_spent(spent);

        let mut db = MockRollupDb::new();
        db.expect_delete_txs().returning(|ids| {
            assert_eq!(ids, &[RollupTxId(1)]);
            Ok(())
        });

        let rejected = validate_block(&chain, &db, &[t]).await.unwrap();
        assert_eq!(rejected, vec![RollupTxId(1)]);
    }

    #[tokio::test]
    async fn an_untouched_tx_is_left_pending() {
        let t = transfer(1);
        let chain = FakeChain::new();
        let mut db = MockRollupDb::new();
        db.expect_delete_txs().times(0);

        let rejected = validate_block(&chain, &db, &[t]).await.unwrap();
        assert!(rejected.is_empty());
    }

    /// Deposit-cap cascade: a per-`(asset, owner)` pending balance of 25,000 against three
    /// 10,000-value deposits admits the first two (running sum 20,000 ≤ 25,000) and rejects the
    /// third (running sum would hit 30,000); a fourth tx chained off the third's note commitment
    /// is rejected transitively even though its own nullifier is unspent and it carries no
    /// deposit of its own.
    #[tokio::test]
    async fn deposit_cap_breach_cascades_through_backward_link() {
        let asset_id = 3;
        let o = owner(9);
        let t1 = deposit(1, asset_id, o, 10_000);
        let t2 = deposit(2, asset_id, o, 10_000);
        let t3 = deposit(3, asset_id, o, 10_000);
        let t4 = tx(
            4, TxType::Transfer, 0, commitment(4), t3.note_commitment_1(), [0u8; 32], None, None,
        );

        let chain = FakeChain::new().with_pending_deposit(asset_id, o, 25_000);

        let mut db = MockRollupDb::new();
        db.expect_delete_txs().returning(|ids| {
            assert_eq!(ids, &[RollupTxId(3), RollupTxId(4)]);
            Ok(())
        });

        let rejected = validate_block(&chain, &db, &[t1, t2, t3, t4]).await.unwrap();
        assert_eq!(rejected, vec![RollupTxId(3), RollupTxId(4)]);
    }

    /// Combines a spent-nullifier rejection with an independent deposit-cap rejection in the
    /// same pass, confirming the two checks don't interfere with each other's bookkeeping.
    #[tokio::test]
    async fn independent_rejections_in_the_same_pass_do_not_interfere() {
        let spent = nullifier(5);
        let asset_id = 1;
        let o = owner(1);
        let t1 = tx(1, TxType::Transfer, 0, commitment(1), ZERO_COMMITMENT, spent, None, None);
        let t2 = deposit(2, asset_id, o, 10_000);
        let t3 = deposit(3, asset_id, o, 10_000);

        let chain = FakeChain::new().with_spent(spent).with_pending_deposit(asset_id, o, 10_000);

        let mut db = MockRollupDb::new();
        db.expect_delete_txs().returning(|ids| {
            assert_eq!(ids, &[RollupTxId(1), RollupTxId(3)]);
            Ok(())
        });

        let rejected = validate_block(&chain, &db, &[t1, t2, t3]).await.unwrap();
        assert_eq!(rejected, vec![RollupTxId(1), RollupTxId(3)]);
    }

    #[tokio::test]
    async fn no_rejections_means_no_delete_call_at_all() {
        let chain = FakeChain::new();
        let mut db = MockRollupDb::new();
        db.expect_delete_txs().times(0);

        let rejected = validate_block(&chain, &db, &[transfer(1), transfer(2)]).await.unwrap();
        assert!(rejected.is_empty());
    }
}
