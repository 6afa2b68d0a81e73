//! Error types for the MedRec on-chain program module.

use thiserror::Error;

/// SDK-specific errors
#[derive(Debug, Error)]
pub enum SdkError {
    /// Parameters could not be applied to a script template
    #[error("Application error: {0}")]
    Application(#[from] ApplicationError),

    /// Decoded data does not have the expected shape
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(#[from] SchemaMismatch),

    /// Plutus Data binary encoding error
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// Address encoding or decoding error
    #[error("Address error: {0}")]
    Address(#[from] AddressError),

    /// Invalid hex string
    #[error("Invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    /// JSON error (blueprints, detailed data JSON)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error while reading a blueprint
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Blueprint has no validator with this title
    #[error("Validator not found in blueprint: {0}")]
    ValidatorNotFound(String),

    /// Blueprint hash does not match the compiled code
    #[error("Script hash mismatch: blueprint declares {expected}, computed {actual}")]
    HashMismatch {
        expected: String,
        actual: String,
    },

    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Unknown Plutus language version
    #[error("Unsupported Plutus version: {0}")]
    UnsupportedPlutusVersion(String),

    /// Unknown network name
    #[error("Invalid network: {0}")]
    InvalidNetwork(String),

    /// Malformed detailed-schema JSON
    #[error("Invalid data JSON: {0}")]
    InvalidDataJson(String),
}

/// Result type alias for SDK operations
pub type SdkResult<T> = Result<T, SdkError>;

/// Errors raised while applying parameters to a script template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplicationError {
    /// The template declares a different number of parameters
    #[error("Parameter count mismatch: template expects {expected}, got {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    /// Native scripts take no parameters
    #[error("Cannot apply parameters to a native script")]
    NativeScript,

    /// The flat program could not be decoded or re-encoded
    #[error("Malformed program: {0}")]
    MalformedProgram(String),
}

/// Errors raised by the Plutus Data CBOR codec.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Bytes are not valid Plutus Data CBOR
    #[error("Invalid CBOR: {0}")]
    Cbor(#[from] pallas_codec::minicbor::decode::Error),

    /// Input continues after the first complete item
    #[error("{0} trailing bytes after CBOR item")]
    TrailingBytes(usize),

    /// A map repeats a key (hex CBOR of the key)
    #[error("Duplicate map key: {0}")]
    DuplicateKey(String),

    /// Compiled code is not wrapped in a CBOR byte string
    #[error("Compiled code is not a CBOR byte string")]
    NotByteString,

    /// A CBOR tag that is not a constructor or bignum tag
    #[error("Unknown CBOR tag: {0}")]
    UnknownTag(u64),

    /// Integer does not fit in 128 bits
    #[error("Integer overflow")]
    IntegerOverflow,
}

/// A decoded term does not match the expected schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{context}: expected {expected}, found {found}")]
pub struct SchemaMismatch {
    /// Where in the schema the mismatch occurred
    pub context: String,
    /// What the schema requires
    pub expected: String,
    /// What was found instead
    pub found: String,
}

impl SchemaMismatch {
    pub fn new(
        context: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self {
            context: context.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }
}

/// Address errors.
#[derive(Debug, Error)]
pub enum AddressError {
    /// Invalid bech32 string
    #[error("Bech32 error: {0}")]
    Bech32(#[from] bech32::Error),

    /// Address uses bech32m instead of bech32
    #[error("Address must use bech32, not bech32m")]
    UnexpectedVariant,

    /// Address payload has an unexpected length
    #[error("Invalid address length: {0}")]
    InvalidLength(usize),

    /// Header byte is not a script address type
    #[error("Not a script address (header {0:#04x})")]
    NotScriptAddress(u8),

    /// Human-readable part does not match the network id
    #[error("Prefix {hrp} does not match network id {network_id}")]
    PrefixMismatch { hrp: String, network_id: u8 },
}
