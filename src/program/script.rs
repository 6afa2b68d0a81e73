//! Script handles and script hashing.
//!
//! A Plutus [`Script`] holds the raw flat-encoded UPLC program. The ledger
//! hashes the language tag followed by the program wrapped in one CBOR byte
//! string; that hash is the policy id and the address payment credential.

use std::fmt;
use std::str::FromStr;

use pallas_crypto::hash::Hasher;
use serde::{Deserialize, Serialize};
use uplc::ast::{DeBruijn, Program};

use crate::program::codec::{unwrap_bytes, wrap_bytes};
use crate::program::constants::{
    HASH_SIZE, NATIVE_SCRIPT_TAG, PLUTUS_V1_TAG, PLUTUS_V2_TAG, PLUTUS_V3_TAG,
};
use crate::program::error::{ApplicationError, CodecError, SdkError, SdkResult};

// ============================================================================
// Language Versions
// ============================================================================

/// Plutus language version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlutusVersion {
    #[serde(rename = "v1")]
    V1,
    #[serde(rename = "v2")]
    V2,
    #[serde(rename = "v3")]
    V3,
}

impl PlutusVersion {
    /// Tag byte prefixed to the script when hashing.
    pub fn hash_tag(&self) -> u8 {
        match self {
            PlutusVersion::V1 => PLUTUS_V1_TAG,
            PlutusVersion::V2 => PLUTUS_V2_TAG,
            PlutusVersion::V3 => PLUTUS_V3_TAG,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlutusVersion::V1 => "PlutusV1",
            PlutusVersion::V2 => "PlutusV2",
            PlutusVersion::V3 => "PlutusV3",
        }
    }
}

impl fmt::Display for PlutusVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlutusVersion {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "v1" | "plutusv1" => Ok(PlutusVersion::V1),
            "v2" | "plutusv2" => Ok(PlutusVersion::V2),
            "v3" | "plutusv3" => Ok(PlutusVersion::V3),
            _ => Err(SdkError::UnsupportedPlutusVersion(s.to_string())),
        }
    }
}

/// Script language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptKind {
    Native,
    Plutus(PlutusVersion),
}

// ============================================================================
// Script
// ============================================================================

/// A compiled script.
///
/// For Plutus scripts `bytes` is the flat-encoded program; for native scripts
/// it is the native script CBOR.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Script {
    kind: ScriptKind,
    bytes: Vec<u8>,
}

impl Script {
    /// Create a Plutus script from flat program bytes.
    pub fn plutus(version: PlutusVersion, flat: Vec<u8>) -> Self {
        Self {
            kind: ScriptKind::Plutus(version),
            bytes: flat,
        }
    }

    /// Create a native script from its CBOR encoding.
    pub fn native(cbor: Vec<u8>) -> Self {
        Self {
            kind: ScriptKind::Native,
            bytes: cbor,
        }
    }

    /// Create a Plutus script from CBOR hex, as found in blueprints
    /// (`compiledCode`) or wallets (double wrapped).
    pub fn from_cbor_hex(version: PlutusVersion, s: &str) -> SdkResult<Self> {
        let bytes = hex::decode(s)?;
        let outer = unwrap_bytes(&bytes).ok_or(CodecError::NotByteString)?;
        let flat = unwrap_bytes(outer).unwrap_or(outer);
        Ok(Self::plutus(version, flat.to_vec()))
    }

    /// Create a Plutus script by flat-encoding `program`.
    pub fn from_program(
        version: PlutusVersion,
        program: &Program<DeBruijn>,
    ) -> Result<Self, ApplicationError> {
        let flat = program
            .to_flat()
            .map_err(|e| ApplicationError::MalformedProgram(e.to_string()))?;
        Ok(Self::plutus(version, flat))
    }

    /// Decode the flat program. Native scripts have none.
    pub fn program(&self) -> Result<Program<DeBruijn>, ApplicationError> {
        match self.kind {
            ScriptKind::Native => Err(ApplicationError::NativeScript),
            ScriptKind::Plutus(_) => Program::<DeBruijn>::from_flat(&self.bytes)
                .map_err(|e| ApplicationError::MalformedProgram(e.to_string())),
        }
    }

    pub fn kind(&self) -> ScriptKind {
        self.kind
    }

    /// Raw script bytes (flat program or native CBOR).
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Serialized script as stored by the ledger: the flat program in one CBOR
    /// byte string, or the native script CBOR as-is.
    pub fn cbor(&self) -> Vec<u8> {
        match self.kind {
            ScriptKind::Native => self.bytes.clone(),
            ScriptKind::Plutus(_) => wrap_bytes(&self.bytes),
        }
    }

    pub fn cbor_hex(&self) -> String {
        hex::encode(self.cbor())
    }

    /// Plutus program wrapped in two CBOR byte strings, the form most wallets
    /// and transaction builders expect.
    pub fn double_cbor_hex(&self) -> String {
        match self.kind {
            ScriptKind::Native => self.cbor_hex(),
            ScriptKind::Plutus(_) => hex::encode(wrap_bytes(&self.cbor())),
        }
    }

    /// The blake2b-224 script hash.
    pub fn hash(&self) -> [u8; HASH_SIZE] {
        let tag = match self.kind {
            ScriptKind::Native => NATIVE_SCRIPT_TAG,
            ScriptKind::Plutus(version) => version.hash_tag(),
        };
        *Hasher::<224>::hash_tagged(&self.cbor(), tag)
    }

    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash())
    }
}
