//! Plutus Data binary encoding.
//!
//! Terms are converted to `uplc::PlutusData` and written with uplc's canonical
//! encoder, the same bytes the `serialiseData` builtin produces:
//! - constructors use tags 121..=127, 1280..=1400, or 102 `[alt, fields]`
//! - non-empty lists are indefinite (`0x9f .. 0xff`), empty lists are `0x80`
//! - maps are definite
//! - byte strings over 64 bytes are split into indefinite 64-byte chunks
//! - integers outside the 64-bit CBOR range become bignums (tags 2 and 3)
//!
//! Decoding goes through the pallas decoder, so definite and indefinite forms
//! are both accepted. Map entries are kept in wire order until conversion, so
//! duplicate keys are reported instead of collapsed.

use std::collections::BTreeMap;

use pallas_codec::minicbor::{Decoder, Encoder};
use pallas_codec::utils::Int;
use uplc::{BigInt, BoundedBytes, Constr, KeyValuePairs, MaybeIndefArray};

use crate::program::constants::{CONSTR_TAG_BASE, CONSTR_TAG_EXTENDED_BASE, CONSTR_TAG_GENERAL};
use crate::program::data::PlutusData;
use crate::program::error::{CodecError, SdkResult};

/// Alternatives with a compact tag in 121..=127
const COMPACT_ALTERNATIVES: u64 = 7;
/// Alternatives with a tag in 121..=127 or 1280..=1400
const TAGGED_ALTERNATIVES: u64 = 128;

/// Wrap bytes in a single definite CBOR byte string.
pub(crate) fn wrap_bytes(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len() + 9);
    // Writing into a Vec cannot fail.
    let _ = Encoder::new(&mut out).bytes(bytes);
    out
}

/// Read exactly one CBOR byte string from `bytes`.
pub(crate) fn unwrap_bytes(bytes: &[u8]) -> Option<&[u8]> {
    let mut decoder = Decoder::new(bytes);
    let inner = decoder.bytes().ok()?;
    (decoder.position() == bytes.len()).then_some(inner)
}

// ============================================================================
// Conversion to the ledger representation
// ============================================================================

fn constr_to_wire(index: u64, fields: &[PlutusData]) -> Constr<uplc::PlutusData> {
    let (tag, any_constructor) = if index < COMPACT_ALTERNATIVES {
        (CONSTR_TAG_BASE + index, None)
    } else if index < TAGGED_ALTERNATIVES {
        (CONSTR_TAG_EXTENDED_BASE + index - COMPACT_ALTERNATIVES, None)
    } else {
        (CONSTR_TAG_GENERAL, Some(index))
    };
    Constr {
        tag,
        any_constructor,
        fields: MaybeIndefArray::Indef(fields.iter().map(to_wire).collect()),
    }
}

fn magnitude_bytes(magnitude: u128) -> BoundedBytes {
    let be = magnitude.to_be_bytes();
    let start = be.iter().position(|b| *b != 0).unwrap_or(be.len() - 1);
    BoundedBytes::from(be[start..].to_vec())
}

fn integer_to_wire(value: i128) -> BigInt {
    match Int::try_from(value) {
        Ok(int) => BigInt::Int(int),
        Err(_) if value >= 0 => BigInt::BigUInt(magnitude_bytes(value as u128)),
        // Negative bignums carry -1 - n.
        Err(_) => BigInt::BigNInt(magnitude_bytes((-1 - value) as u128)),
    }
}

/// Convert to the `uplc` term used for encoding and script application.
pub fn to_wire(data: &PlutusData) -> uplc::PlutusData {
    match data {
        PlutusData::Constr { tag, fields } => uplc::PlutusData::Constr(constr_to_wire(*tag, fields)),
        PlutusData::Map(entries) => uplc::PlutusData::Map(KeyValuePairs::Def(
            entries.iter().map(|(k, v)| (to_wire(k), to_wire(v))).collect(),
        )),
        PlutusData::List(items) => {
            uplc::PlutusData::Array(MaybeIndefArray::Indef(items.iter().map(to_wire).collect()))
        }
        PlutusData::Integer(i) => uplc::PlutusData::BigInt(integer_to_wire(*i)),
        PlutusData::Bytes(b) => uplc::PlutusData::BoundedBytes(BoundedBytes::from(b.clone())),
    }
}

// ============================================================================
// Conversion from the ledger representation
// ============================================================================

fn constr_index(tag: u64, any_constructor: Option<u64>) -> Result<u64, CodecError> {
    match tag {
        t if (CONSTR_TAG_BASE..CONSTR_TAG_BASE + COMPACT_ALTERNATIVES).contains(&t) => {
            Ok(t - CONSTR_TAG_BASE)
        }
        t if (CONSTR_TAG_EXTENDED_BASE
            ..CONSTR_TAG_EXTENDED_BASE + TAGGED_ALTERNATIVES - COMPACT_ALTERNATIVES)
            .contains(&t) =>
        {
            Ok(t - CONSTR_TAG_EXTENDED_BASE + COMPACT_ALTERNATIVES)
        }
        CONSTR_TAG_GENERAL => any_constructor.ok_or(CodecError::UnknownTag(tag)),
        other => Err(CodecError::UnknownTag(other)),
    }
}

fn magnitude(bytes: &[u8]) -> Result<u128, CodecError> {
    let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    let digits = &bytes[start..];
    if digits.len() > 16 {
        return Err(CodecError::IntegerOverflow);
    }
    Ok(digits.iter().fold(0u128, |acc, b| (acc << 8) | *b as u128))
}

fn integer_from_wire(value: BigInt) -> Result<i128, CodecError> {
    match value {
        BigInt::Int(int) => Ok(i128::from(int)),
        BigInt::BigUInt(bytes) => {
            i128::try_from(magnitude(&bytes)?).map_err(|_| CodecError::IntegerOverflow)
        }
        BigInt::BigNInt(bytes) => i128::try_from(magnitude(&bytes)?)
            .map(|n| -1 - n)
            .map_err(|_| CodecError::IntegerOverflow),
    }
}

fn array_items(array: MaybeIndefArray<uplc::PlutusData>) -> Vec<uplc::PlutusData> {
    match array {
        MaybeIndefArray::Def(items) | MaybeIndefArray::Indef(items) => items,
    }
}

/// Convert from the `uplc` term. Fails on duplicate map keys and integers
/// outside 128 bits.
pub fn from_wire(data: uplc::PlutusData) -> Result<PlutusData, CodecError> {
    match data {
        uplc::PlutusData::Constr(constr) => Ok(PlutusData::Constr {
            tag: constr_index(constr.tag, constr.any_constructor)?,
            fields: array_items(constr.fields)
                .into_iter()
                .map(from_wire)
                .collect::<Result<_, _>>()?,
        }),
        uplc::PlutusData::Map(pairs) => {
            let pairs = match pairs {
                KeyValuePairs::Def(pairs) | KeyValuePairs::Indef(pairs) => pairs,
            };
            let mut map = BTreeMap::new();
            for (k, v) in pairs {
                let key = from_wire(k)?;
                if map.contains_key(&key) {
                    return Err(CodecError::DuplicateKey(key.to_cbor_hex()));
                }
                map.insert(key, from_wire(v)?);
            }
            Ok(PlutusData::Map(map))
        }
        uplc::PlutusData::Array(items) => Ok(PlutusData::List(
            array_items(items)
                .into_iter()
                .map(from_wire)
                .collect::<Result<_, _>>()?,
        )),
        uplc::PlutusData::BigInt(i) => Ok(PlutusData::Integer(integer_from_wire(i)?)),
        uplc::PlutusData::BoundedBytes(b) => Ok(PlutusData::Bytes(b.into())),
    }
}

impl From<&PlutusData> for uplc::PlutusData {
    fn from(data: &PlutusData) -> Self {
        to_wire(data)
    }
}

impl TryFrom<uplc::PlutusData> for PlutusData {
    type Error = CodecError;

    fn try_from(data: uplc::PlutusData) -> Result<Self, Self::Error> {
        from_wire(data)
    }
}

impl PlutusData {
    /// Encode to CBOR bytes.
    pub fn to_cbor(&self) -> Vec<u8> {
        uplc::plutus_data_to_bytes(&to_wire(self))
    }

    /// Encode to a CBOR hex string.
    pub fn to_cbor_hex(&self) -> String {
        hex::encode(self.to_cbor())
    }

    /// Decode from CBOR bytes. Trailing bytes are rejected.
    pub fn from_cbor(bytes: &[u8]) -> SdkResult<Self> {
        let mut decoder = Decoder::new(bytes);
        let wire: uplc::PlutusData = decoder.decode().map_err(CodecError::from)?;
        if decoder.position() != bytes.len() {
            return Err(CodecError::TrailingBytes(bytes.len() - decoder.position()).into());
        }
        Ok(from_wire(wire)?)
    }

    /// Decode from a CBOR hex string.
    pub fn from_cbor_hex(s: &str) -> SdkResult<Self> {
        Self::from_cbor(&hex::decode(s)?)
    }
}
