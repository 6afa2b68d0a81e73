//! CIP-68 metadata datum.
//!
//! Layout: `Constr 0 [metadata: Map Data Data, version: Int, extra: Bytes]`.
//! The datum is replaced as a whole on update; there are no partial writes.

use std::collections::BTreeMap;

use crate::program::constants::{METADATUM_CONSTRUCTOR, METADATUM_DEFAULT_VERSION};
use crate::program::data::PlutusData;
use crate::program::error::{SchemaMismatch, SdkResult};

/// Metadata datum attached to a CIP-68 reference token.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MetaDatum {
    /// Free-form attributes
    pub metadata: BTreeMap<PlutusData, PlutusData>,
    /// Metadata format version
    pub version: u64,
    /// Opaque extension payload
    pub extra: Vec<u8>,
}

impl MetaDatum {
    pub fn new(metadata: BTreeMap<PlutusData, PlutusData>, version: u64, extra: Vec<u8>) -> Self {
        Self {
            metadata,
            version,
            extra,
        }
    }

    /// Start building a datum with the default version.
    pub fn builder() -> MetaDatumBuilder {
        MetaDatumBuilder::default()
    }

    /// Look up a UTF-8 text attribute stored under a UTF-8 key.
    pub fn get_text(&self, key: &str) -> Option<&str> {
        self.metadata
            .get(&PlutusData::text(key))
            .and_then(PlutusData::as_bytes)
            .and_then(|b| std::str::from_utf8(b).ok())
    }

    /// Encode as a Plutus Data term.
    pub fn to_data(&self) -> PlutusData {
        PlutusData::Constr {
            tag: METADATUM_CONSTRUCTOR,
            fields: vec![
                PlutusData::Map(self.metadata.clone()),
                PlutusData::Integer(self.version.into()),
                PlutusData::Bytes(self.extra.clone()),
            ],
        }
    }

    /// Decode from a Plutus Data term.
    pub fn from_data(data: &PlutusData) -> Result<Self, SchemaMismatch> {
        let fields = match data {
            PlutusData::Constr { tag, fields } if *tag == METADATUM_CONSTRUCTOR => fields,
            PlutusData::Constr { tag, .. } => {
                return Err(SchemaMismatch::new(
                    "datum",
                    format!("constructor {}", METADATUM_CONSTRUCTOR),
                    format!("constructor {}", tag),
                ))
            }
            other => {
                return Err(SchemaMismatch::new(
                    "datum",
                    "constr",
                    other.kind(),
                ))
            }
        };

        let [metadata, version, extra] = fields.as_slice() else {
            return Err(SchemaMismatch::new(
                "datum",
                "3 fields",
                format!("{} fields", fields.len()),
            ));
        };

        let metadata = match metadata {
            PlutusData::Map(map) => map.clone(),
            other => return Err(SchemaMismatch::new("metadata", "map", other.kind())),
        };

        let version = match version {
            PlutusData::Integer(v) => u64::try_from(*v).map_err(|_| {
                SchemaMismatch::new("version", "non-negative 64-bit integer", v.to_string())
            })?,
            other => return Err(SchemaMismatch::new("version", "integer", other.kind())),
        };

        let extra = match extra {
            PlutusData::Bytes(b) => b.clone(),
            other => return Err(SchemaMismatch::new("extra", "bytes", other.kind())),
        };

        Ok(Self {
            metadata,
            version,
            extra,
        })
    }

    /// Encode to CBOR bytes.
    pub fn to_cbor(&self) -> Vec<u8> {
        self.to_data().to_cbor()
    }

    pub fn to_cbor_hex(&self) -> String {
        hex::encode(self.to_cbor())
    }

    /// Decode from CBOR bytes.
    pub fn from_cbor(bytes: &[u8]) -> SdkResult<Self> {
        Ok(Self::from_data(&PlutusData::from_cbor(bytes)?)?)
    }

    pub fn from_cbor_hex(s: &str) -> SdkResult<Self> {
        Self::from_cbor(&hex::decode(s)?)
    }
}

impl From<&MetaDatum> for PlutusData {
    fn from(datum: &MetaDatum) -> Self {
        datum.to_data()
    }
}

impl TryFrom<&PlutusData> for MetaDatum {
    type Error = SchemaMismatch;

    fn try_from(data: &PlutusData) -> Result<Self, Self::Error> {
        MetaDatum::from_data(data)
    }
}

/// Builder for [`MetaDatum`].
#[derive(Debug, Clone)]
pub struct MetaDatumBuilder {
    datum: MetaDatum,
}

impl Default for MetaDatumBuilder {
    fn default() -> Self {
        Self {
            datum: MetaDatum {
                version: METADATUM_DEFAULT_VERSION,
                ..Default::default()
            },
        }
    }
}

impl MetaDatumBuilder {
    /// Set a text attribute. Keys and values are stored as UTF-8 bytes.
    pub fn text(self, key: &str, value: &str) -> Self {
        self.field(PlutusData::text(key), PlutusData::text(value))
    }

    /// Set an arbitrary attribute.
    pub fn field(mut self, key: PlutusData, value: PlutusData) -> Self {
        self.datum.metadata.insert(key, value);
        self
    }

    pub fn version(mut self, version: u64) -> Self {
        self.datum.version = version;
        self
    }

    pub fn extra(mut self, extra: Vec<u8>) -> Self {
        self.datum.extra = extra;
        self
    }

    pub fn build(self) -> MetaDatum {
        self.datum
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::error::{CodecError, SdkError};

    fn token_datum() -> MetaDatum {
        MetaDatum::builder().text("name", "Token").build()
    }

    #[test]
    fn test_example_datum_round_trip() {
        let datum = token_datum();
        assert_eq!(datum.version, 1);
        assert!(datum.extra.is_empty());
        assert_eq!(MetaDatum::from_cbor(&datum.to_cbor()).unwrap(), datum);
    }

    #[test]
    fn test_example_datum_bytes() {
        // 121([{h'6e616d65': h'546f6b656e'}, 1, h''])
        assert_eq!(
            token_datum().to_cbor_hex(),
            "d8799fa1446e616d6545546f6b656e0140ff"
        );
    }

    #[test]
    fn test_decodes_definite_encoding() {
        let datum = MetaDatum::from_cbor_hex("d87983a1446e616d6545546f6b656e0140").unwrap();
        assert_eq!(datum, token_datum());
    }

    #[test]
    fn test_get_text() {
        let datum = token_datum();
        assert_eq!(datum.get_text("name"), Some("Token"));
        assert_eq!(datum.get_text("image"), None);
    }

    #[test]
    fn test_wrong_constructor() {
        let data = PlutusData::constr(1, vec![]);
        let err = MetaDatum::from_data(&data).unwrap_err();
        assert_eq!(err.context, "datum");
        assert_eq!(err.found, "constructor 1");
    }

    #[test]
    fn test_wrong_field_count() {
        let data = PlutusData::constr(0, vec![PlutusData::Map(BTreeMap::new())]);
        assert_eq!(MetaDatum::from_data(&data).unwrap_err().found, "1 fields");
    }

    #[test]
    fn test_wrong_field_kinds() {
        let data = PlutusData::constr(
            0,
            vec![
                PlutusData::List(vec![]),
                PlutusData::Integer(1),
                PlutusData::Bytes(vec![]),
            ],
        );
        assert_eq!(MetaDatum::from_data(&data).unwrap_err().context, "metadata");

        let data = PlutusData::constr(
            0,
            vec![
                PlutusData::Map(BTreeMap::new()),
                PlutusData::Integer(1),
                PlutusData::text("x"),
            ],
        );
        assert!(MetaDatum::from_data(&data).is_ok());

        let data = PlutusData::constr(
            0,
            vec![
                PlutusData::Map(BTreeMap::new()),
                PlutusData::Integer(1),
                PlutusData::Integer(0),
            ],
        );
        assert_eq!(MetaDatum::from_data(&data).unwrap_err().context, "extra");
    }

    #[test]
    fn test_negative_version_rejected() {
        let data = PlutusData::constr(
            0,
            vec![
                PlutusData::Map(BTreeMap::new()),
                PlutusData::Integer(-1),
                PlutusData::Bytes(vec![]),
            ],
        );
        let err = MetaDatum::from_data(&data).unwrap_err();
        assert_eq!(err.context, "version");
    }

    #[test]
    fn test_schema_mismatch_through_cbor() {
        let err = MetaDatum::from_cbor_hex("d87a80").unwrap_err();
        assert!(matches!(err, SdkError::SchemaMismatch(_)));
    }

    #[test]
    fn test_duplicate_metadata_key_rejected() {
        // 121([{h'6e616d65': h'41', h'6e616d65': h'42'}, 1, h''])
        let err = MetaDatum::from_cbor_hex("d8799fa2446e616d654141446e616d6541420140ff")
            .unwrap_err();
        assert!(matches!(
            err,
            SdkError::Codec(CodecError::DuplicateKey(_))
        ));
    }

    #[test]
    fn test_non_text_metadata_round_trips() {
        let datum = MetaDatum::builder()
            .field(
                PlutusData::Integer(5),
                PlutusData::List(vec![PlutusData::constr(3, vec![])]),
            )
            .field(
                PlutusData::text("files"),
                PlutusData::map([(PlutusData::text("src"), PlutusData::Bytes(vec![0; 90]))]),
            )
            .version(2)
            .extra(vec![0xff; 3])
            .build();
        let data = PlutusData::from(&datum);
        assert_eq!(MetaDatum::try_from(&data).unwrap(), datum);
        assert_eq!(MetaDatum::from_cbor(&datum.to_cbor()).unwrap(), datum);
    }
}
