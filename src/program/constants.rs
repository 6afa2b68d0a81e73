//! Constants for the MedRec on-chain program.
//!
//! This module contains script language tags, address header types, Plutus Data
//! CBOR tags and CIP-67 labels matching the ledger exactly.

// ============================================================================
// Script Language Tags
// ============================================================================

/// Prefix byte hashed in front of a native script
pub const NATIVE_SCRIPT_TAG: u8 = 0x00;
/// Prefix byte hashed in front of a Plutus V1 script
pub const PLUTUS_V1_TAG: u8 = 0x01;
/// Prefix byte hashed in front of a Plutus V2 script
pub const PLUTUS_V2_TAG: u8 = 0x02;
/// Prefix byte hashed in front of a Plutus V3 script
pub const PLUTUS_V3_TAG: u8 = 0x03;

/// Script and key hash size in bytes (blake2b-224)
pub const HASH_SIZE: usize = 28;

// ============================================================================
// Address Header Types (high nibble)
// ============================================================================

/// Base address: script payment, key stake
pub const ADDRESS_SCRIPT_KEY: u8 = 0b0001;
/// Base address: script payment, script stake
pub const ADDRESS_SCRIPT_SCRIPT: u8 = 0b0011;
/// Enterprise address: script payment, no stake
pub const ADDRESS_SCRIPT_ENTERPRISE: u8 = 0b0111;

/// Human-readable part for mainnet addresses
pub const MAINNET_ADDRESS_HRP: &str = "addr";
/// Human-readable part for testnet addresses
pub const TESTNET_ADDRESS_HRP: &str = "addr_test";

/// Mainnet network id
pub const MAINNET_NETWORK_ID: u8 = 1;
/// Testnet network id (preprod, preview)
pub const TESTNET_NETWORK_ID: u8 = 0;

// ============================================================================
// Plutus Data CBOR Tags
// ============================================================================

/// Tag of constructor alternative 0
pub const CONSTR_TAG_BASE: u64 = 121;
/// Tag of constructor alternative 7
pub const CONSTR_TAG_EXTENDED_BASE: u64 = 1280;
/// General constructor tag: `[alternative, fields]`
pub const CONSTR_TAG_GENERAL: u64 = 102;

// ============================================================================
// CIP-67 / CIP-68 Labels
// ============================================================================

/// Reference NFT carrying the metadata datum
pub const LABEL_REFERENCE_NFT: u16 = 100;
/// User-held NFT
pub const LABEL_USER_NFT: u16 = 222;
/// User-held fungible token
pub const LABEL_USER_FT: u16 = 333;
/// User-held rich fungible token
pub const LABEL_USER_RFT: u16 = 444;

/// Constructor alternative of the CIP-68 datum
pub const METADATUM_CONSTRUCTOR: u64 = 0;
/// Default metadata version for NFTs
pub const METADATUM_DEFAULT_VERSION: u64 = 1;
