//! Accumulators that track resource consumption while a batch is being assembled.

use std::collections::HashSet;

use crate::{bridge_call_data::BridgeCallData, tx::AssetId};

/// A capacity-bounded, insertion-ordered set of bridge call data.
///
/// Ordered because the published rollup carries the bridge-call-data vector in the order bridges
/// were admitted, right-padded with zeros to its fixed capacity. Bounded because a rollup
/// can only reference `NUM_BRIDGE_CALLS_PER_BLOCK` distinct bridges.
#[derive(Debug, Clone)]
pub struct BridgeCallDataSet {
    order: Vec<BridgeCallData>,
    members: HashSet<BridgeCallData>,
    cap: usize,
}

impl BridgeCallDataSet {
    pub fn new(cap: usize) -> Self {
        Self {
            order: Vec::new(),
            members: HashSet::new(),
            cap,
        }
    }

    pub fn contains(&self, bcd: &BridgeCallData) -> bool {
        self.members.contains(bcd)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.order.len() >= self.cap
    }

    /// Insert `bcd` if there is room and it isn't already present.
    ///
    /// Returns `true` if the set now contains it (whether newly inserted or already present),
    /// `false` if it is new but the set is at capacity.
    pub fn insert(&mut self, bcd: BridgeCallData) -> bool {
        if self.members.contains(&bcd) {
            return true;
        }
        if self.is_full() {
            return false;
        }
        self.order.push(bcd);
        self.members.insert(bcd);
        true
    }

    pub fn as_slice(&self) -> &[BridgeCallData] {
        &self.order
    }

    /// The admitted bridges, right-padded with [`BridgeCallData::default`] (all zeros) up to
    /// `cap` — the exact shape the published rollup expects.
    pub fn padded(&self) -> Vec<BridgeCallData> {
        let mut padded = self.order.clone();
        padded.resize(self.cap, BridgeCallData::default());
        padded
    }
}

/// A capacity-bounded set of fee-paying asset ids.
#[derive(Debug, Clone)]
pub struct AssetSet {
    members: HashSet<AssetId>,
    cap: usize,
}

impl AssetSet {
    pub fn new(cap: usize) -> Self {
        Self {
            members: HashSet::new(),
            cap,
        }
    }

    pub fn contains(&self, asset_id: AssetId) -> bool {
        self.members.contains(&asset_id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= self.cap
    }

    /// Insert `asset_id` if there is room and it isn't already present.
    pub fn insert(&mut self, asset_id: AssetId) -> bool {
        if self.members.contains(&asset_id) {
            return true;
        }
        if self.is_full() {
            return false;
        }
        self.members.insert(asset_id);
        true
    }

    /// Whether admitting `asset_id` would breach the cap, assuming it is not already present.
    pub fn would_saturate(&self, asset_id: AssetId) -> bool {
        !self.members.contains(&asset_id) && self.is_full()
    }

    /// The admitted asset ids, in arbitrary order — the shape
    /// [`crate::RollupAggregator::aggregate_rollup_proofs`] and
    /// [`crate::RollupCreator::create_rollup`] expect for the batch's asset-id vector.
    pub fn as_vec(&self) -> Vec<AssetId> {
        self.members.iter().copied().collect()
    }
}

/// Resources consumed so far while assembling a batch.
#[derive(Debug, Clone)]
pub struct RollupResources {
    gas_used: u64,
    call_data_used: u64,
    bridge_call_datas: BridgeCallDataSet,
    asset_ids: AssetSet,
}

impl RollupResources {
    pub fn new(initial_gas_used: u64, num_bridge_calls_per_block: usize, number_of_assets: usize) -> Self {
        Self {
            gas_used: initial_gas_used,
            call_data_used: 0,
            bridge_call_datas: BridgeCallDataSet::new(num_bridge_calls_per_block),
            asset_ids: AssetSet::new(number_of_assets),
        }
    }

    pub fn gas_used(&self) -> u64 {
        self.gas_used
    }

    pub fn call_data_used(&self) -> u64 {
        self.call_data_used
    }

    pub fn bridge_call_datas(&self) -> &BridgeCallDataSet {
        &self.bridge_call_datas
    }

    pub fn bridge_call_datas_mut(&mut self) -> &mut BridgeCallDataSet {
        &mut self.bridge_call_datas
    }

    pub fn asset_ids(&self) -> &AssetSet {
        &self.asset_ids
    }

    pub fn asset_ids_mut(&mut self) -> &mut AssetSet {
        &mut self.asset_ids
    }

    /// Whether `gas_delta` and `call_data_delta` can be added without breaching the given caps
    /// Does not mutate; callers apply [`Self::reserve`] once they've decided to commit.
    pub fn fits(&self, gas_delta: u64, call_data_delta: u64, max_gas: u64, max_call_data: u64) -> bool {
        self.gas_used.saturating_add(gas_delta) <= max_gas
            && self.call_data_used.saturating_add(call_data_delta) <= max_call_data
    }

    /// Commit a gas/calldata reservation. Callers must have already checked [`Self::fits`].
    pub fn reserve(&mut self, gas_delta: u64, call_data_delta: u64) {
        self.gas_used += gas_delta;
        self.call_data_used += call_data_delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge_call_data::AssetRef;

    fn bcd(id: u32) -> BridgeCallData {
        BridgeCallData::new(id, AssetRef::Real(1), None, AssetRef::Real(2), None, 0)
    }

    #[test]
    fn bridge_call_data_set_respects_cap() {
        let mut set = BridgeCallDataSet::new(2);
        assert!(set.insert(bcd(1)));
        assert!(set.insert(bcd(2)));
        assert!(!set.insert(bcd(3)));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn bridge_call_data_set_insert_is_idempotent() {
        let mut set = BridgeCallDataSet::new(1);
        assert!(set.insert(bcd(1)));
        assert!(set.insert(bcd(1)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn padded_right_pads_with_zero_bridge_call_data() {
        let mut set = BridgeCallDataSet::new(4);
        set.insert(bcd(1));
        set.insert(bcd(2));
        let padded = set.padded();
        assert_eq!(padded.len(), 4);
        assert_eq!(padded[0], bcd(1));
        assert_eq!(padded[1], bcd(2));
        assert_eq!(padded[2], BridgeCallData::default());
        assert_eq!(padded[3], BridgeCallData::default());
    }

    #[test]
    fn asset_set_would_saturate_only_for_new_members_at_cap() {
        let mut set = AssetSet::new(1);
        assert!(set.insert(7));
        assert!(!set.would_saturate(7)); // already a member
        assert!(set.would_saturate(8)); // new member, no room
    }

    #[test]
    fn resources_fits_respects_both_caps() {
        let resources = RollupResources::new(100, 4, 4);
        assert!(resources.fits(50, 50, 200, 200));
        assert!(!resources.fits(200, 0, 200, 200));
        assert!(!resources.fits(0, 300, 200, 200));
    }
}
