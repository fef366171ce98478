//! Structured 256-bit bridge call data identifier.
//!
//! Layout (lowest bit first): `bridgeAddressId` (32 bits) · `inputAssetIdA` (30 bits) ·
//! `inputAssetIdB` (30 bits) · `outputAssetIdA` (30 bits) · `outputAssetIdB` (30 bits) ·
//! `bitConfig` (32 bits: bit 0 = second input in use, bit 1 = second output in use) · `auxData`
//! (64 bits). Within each 30-bit asset-id subfield, bit 29 (the subfield's own top bit) flags a
//! virtual asset: the remaining 29 bits are then an interaction nonce rather than a real
//! fee-paying asset id.

use alloy_primitives::U256;

const BRIDGE_ADDRESS_ID_BITS: u32 = 32;
const ASSET_ID_BITS: u32 = 30;
const BIT_CONFIG_BITS: u32 = 32;
const AUX_DATA_BITS: u32 = 64;

/// Position, within a 30-bit asset-id subfield, of the virtual-asset flag.
pub const VIRTUAL_ASSET_FLAG_BIT: u32 = 29;

const ASSET_ID_MASK: u64 = (1u64 << ASSET_ID_BITS) - 1;
const VIRTUAL_FLAG_MASK: u32 = 1 << VIRTUAL_ASSET_FLAG_BIT;
const NONCE_MASK: u32 = VIRTUAL_FLAG_MASK - 1;

/// A decoded asset reference: either a real fee-paying asset, or a virtual asset identified by
/// the interaction nonce of the DeFi call that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetRef {
    Real(u32),
    Virtual { interaction_nonce: u32 },
}

impl AssetRef {
    fn decode(field: u32) -> Self {
        if field & VIRTUAL_FLAG_MASK != 0 {
            AssetRef::Virtual {
                interaction_nonce: field & NONCE_MASK,
            }
        } else {
            AssetRef::Real(field & NONCE_MASK)
        }
    }

    fn encode(self) -> u32 {
        match self {
            AssetRef::Real(id) => id & NONCE_MASK,
            AssetRef::Virtual { interaction_nonce } => (interaction_nonce & NONCE_MASK) | VIRTUAL_FLAG_MASK,
        }
    }
}

/// Structured identifier of a single DeFi bridge invocation.
///
/// Equality and hashing are derived from the full 256-bit value, so two `BridgeCallData`s
/// compare equal iff their wire encodings are identical — this is what lets it key
/// `RollupResources::bridge_call_datas` and the per-bridge queue map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BridgeCallData {
    bridge_address_id: u32,
    input_asset_a: AssetRef,
    input_asset_b: Option<AssetRef>,
    output_asset_a: AssetRef,
    output_asset_b: Option<AssetRef>,
    aux_data: u64,
}

impl Default for BridgeCallData {
    /// The all-zero encoding, used to right-pad the published bridge-call-data vector.
    fn default() -> Self {
        Self {
            bridge_address_id: 0,
            input_asset_a: AssetRef::Real(0),
            input_asset_b: None,
            output_asset_a: AssetRef::Real(0),
            output_asset_b: None,
            aux_data: 0,
        }
    }
}

impl BridgeCallData {
    #[expect(clippy::too_many_arguments, reason = "mirrors the wire fields 1:1")]
    pub fn new(
        bridge_address_id: u32,
        input_asset_a: AssetRef,
        input_asset_b: Option<AssetRef>,
        output_asset_a: AssetRef,
        output_asset_b: Option<AssetRef>,
        aux_data: u64,
    ) -> Self {
        Self {
            bridge_address_id,
            input_asset_a,
            input_asset_b,
            output_asset_a,
            output_asset_b,
            aux_data,
        }
    }

    pub fn bridge_address_id(&self) -> u32 {
        self.bridge_address_id
    }

    pub fn input_asset_a(&self) -> AssetRef {
        self.input_asset_a
    }

    pub fn input_asset_b(&self) -> Option<AssetRef> {
        self.input_asset_b
    }

    pub fn output_asset_a(&self) -> AssetRef {
        self.output_asset_a
    }

    pub fn output_asset_b(&self) -> Option<AssetRef> {
        self.output_asset_b
    }

    pub fn aux_data(&self) -> u64 {
        self.aux_data
    }

    /// Decode from the on-chain 256-bit encoding.
    ///
    /// Each field is pulled out by shifting the whole 256-bit value down and masking to its
    /// width, rather than hand-splitting across 64-bit limbs — the fields don't fall on limb
    /// boundaries (e.g. `inputAssetIdB` spans bits 62-91), so limb-local extraction would have to
    /// special-case every crossing.
    pub fn from_u256(value: U256) -> Self {
        let mut shift = 0u32;
        let bridge_address_id = take_field(value, &mut shift, BRIDGE_ADDRESS_ID_BITS) as u32;
        let input_a_field = take_field(value, &mut shift, ASSET_ID_BITS) as u32;
        let input_b_field = take_field(value, &mut shift, ASSET_ID_BITS) as u32;
        let output_a_field = take_field(value, &mut shift, ASSET_ID_BITS) as u32;
        let output_b_field = take_field(value, &mut shift, ASSET_ID_BITS) as u32;
        let bit_config = take_field(value, &mut shift, BIT_CONFIG_BITS) as u32;
        let aux_data = take_field(value, &mut shift, AUX_DATA_BITS);

        let second_input_in_use = bit_config & 0b01 != 0;
        let second_output_in_use = bit_config & 0b10 != 0;

        Self {
            bridge_address_id,
            input_asset_a: AssetRef::decode(input_a_field),
            input_asset_b: second_input_in_use.then(|| AssetRef::decode(input_b_field)),
            output_asset_a: AssetRef::decode(output_a_field),
            output_asset_b: second_output_in_use.then(|| AssetRef::decode(output_b_field)),
            aux_data,
        }
    }

    /// Encode to the on-chain 256-bit representation.
    pub fn to_u256(self) -> U256 {
        let mut value = U256::ZERO;
        let mut shift = 0u32;

        value |= U256::from(self.bridge_address_id) << (shift as usize);
        shift += BRIDGE_ADDRESS_ID_BITS;
        value |= U256::from(self.input_asset_a.encode()) << (shift as usize);
        shift += ASSET_ID_BITS;
        value |= U256::from(self.input_asset_b.map(AssetRef::encode).unwrap_or(0)) << (shift as usize);
        shift += ASSET_ID_BITS;
        value |= U256::from(self.output_asset_a.encode()) << (shift as usize);
        shift += ASSET_ID_BITS;
        value |= U256::from(self.output_asset_b.map(AssetRef::encode).unwrap_or(0)) << (shift as usize);
        shift += ASSET_ID_BITS;

        let mut bit_config = 0u32;
        if self.input_asset_b.is_some() {
            bit_config |= 0b01;
        }
        if self.output_asset_b.is_some() {
            bit_config |= 0b10;
        }
        value |= U256::from(bit_config) << (shift as usize);
        shift += BIT_CONFIG_BITS;

        value |= U256::from(self.aux_data) << (shift as usize);

        value
    }
}

/// Read the next `width` bits of `value` starting at `*shift`, advancing `*shift` past them.
fn take_field(value: U256, shift: &mut u32, width: u32) -> u64 {
    let mask = U256::from((1u128 << width) - 1);
    let field = (value >> (*shift as usize)) & mask;
    *shift += width;
    // `field` is masked to at most 64 bits, so it always fits in the low limb.
    field.as_limbs()[0]
}
