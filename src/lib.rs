//! # MedRec Rust SDK
//!
//! A Rust SDK for the MedRec CIP-68 medical record minting project on Cardano.
//!
//! ## Modules
//!
//! This SDK provides two main modules:
//! - [`program`]: Validators, Plutus Data, script addresses and the metadata datum
//! - [`page`]: Page shell with a deferred child component (feature `page`)
//!
//! Plus a configuration module:
//! - [`network`]: Network selection and address prefixes
//!
//! ## Quick Start - Applied Validator
//!
//! ```rust,ignore
//! use medrec_sdk::prelude::*;
//!
//! fn main() -> SdkResult<()> {
//!     let blueprint = Blueprint::from_file("plutus.json")?;
//!
//!     let validator = AppliedValidatorBuilder::new()
//!         .template(blueprint.template("medrec.mint")?)
//!         .param(PlutusData::text("clinic-01"))
//!         .network(Network::from_env()?)
//!         .build()?;
//!
//!     println!("policy id: {}", validator.policy_id());
//!     println!("lock address: {}", validator.lock_address());
//!     Ok(())
//! }
//! ```
//!
//! ## Quick Start - Metadata Datum
//!
//! ```rust,ignore
//! use medrec_sdk::prelude::*;
//!
//! let datum = MetaDatum::builder().text("name", "Record 01").build();
//! let cbor = datum.to_cbor_hex();
//! assert_eq!(MetaDatum::from_cbor_hex(&cbor)?, datum);
//! ```

// ============================================================================
// MODULES
// ============================================================================

/// On-chain program interaction module.
/// Contains validators, data codecs and address derivation.
pub mod program;

/// Network selection (network id, address prefix, env configuration).
pub mod network;

/// Page shell with a deferred child component.
#[cfg(feature = "page")]
pub mod page;

// ============================================================================
// PRELUDE
// ============================================================================

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use medrec_sdk::prelude::*;
/// ```
pub mod prelude {
    // Program module exports
    pub use crate::program::{
        // Validators
        AppliedValidator, AppliedValidatorBuilder, FlatApplicator, ParamApplicator,
        ScriptTemplate,
        // Blueprints
        Blueprint,
        // Scripts and addresses
        policy_id, PlutusVersion, Script, ScriptAddress, ScriptKind, StakeCredential,
        // Data
        MetaDatum, PlutusData,
        // Labels
        reference_token_name, user_token_name,
        // Errors
        ApplicationError, SchemaMismatch, SdkError, SdkResult,
    };

    // Network
    pub use crate::network::{Network, NetworkId, DEFAULT_NETWORK};

    // Page shell
    #[cfg(feature = "page")]
    pub use crate::page::{home_page, Component, LazyComponent, LoadError, PageShell, RenderedPage};
}
