//! On-chain program interaction module for MedRec.
//!
//! This module provides the data model, codecs and derivations needed to work
//! with the MedRec validators on Cardano: Plutus Data, script hashing,
//! parameter application, script addresses and the CIP-68 metadata datum.

pub mod address;
pub mod blueprint;
pub mod builder;
pub mod codec;
pub mod constants;
pub mod data;
pub mod error;
pub mod labels;
pub mod metadatum;
pub mod script;
pub mod validator;

// Re-export commonly used items
pub use address::{policy_id, ScriptAddress, StakeCredential};
pub use blueprint::{Blueprint, BlueprintParameter, BlueprintValidator, Compiler, Preamble};
pub use builder::AppliedValidatorBuilder;
pub use codec::{from_wire, to_wire};
pub use constants::*;
pub use data::PlutusData;
pub use error::{AddressError, ApplicationError, CodecError, SchemaMismatch, SdkError, SdkResult};
pub use labels::{
    from_label, labeled_name, reference_token_name, split_label, to_label, user_token_name,
    LABEL_SIZE,
};
pub use metadatum::{MetaDatum, MetaDatumBuilder};
pub use script::{PlutusVersion, Script, ScriptKind};
pub use validator::{AppliedValidator, FlatApplicator, ParamApplicator, ScriptTemplate};
