//! Policy id and script address derivation.
//!
//! Shelley address layout:
//! - [0]      header: address type (high nibble) | network id (low nibble)
//! - [1..29]  payment credential hash (the script hash)
//! - [29..57] stake credential hash (base addresses only)

use bech32::{FromBase32, ToBase32, Variant};

use crate::network::{hrp_for_network_id, Network};
use crate::program::constants::{
    ADDRESS_SCRIPT_ENTERPRISE, ADDRESS_SCRIPT_KEY, ADDRESS_SCRIPT_SCRIPT, HASH_SIZE,
};
use crate::program::error::{AddressError, SdkResult};
use crate::program::script::Script;

/// Policy id of a minting script: the hex script hash.
pub fn policy_id(script: &Script) -> String {
    script.hash_hex()
}

/// Delegation part of a base address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StakeCredential {
    /// Stake key hash
    Key([u8; HASH_SIZE]),
    /// Stake script hash
    Script([u8; HASH_SIZE]),
}

impl StakeCredential {
    /// Stake key credential from a hex key hash.
    pub fn key_from_hex(s: &str) -> SdkResult<Self> {
        Ok(StakeCredential::Key(parse_hash(s)?))
    }

    /// Stake script credential from a hex script hash.
    pub fn script_from_hex(s: &str) -> SdkResult<Self> {
        Ok(StakeCredential::Script(parse_hash(s)?))
    }

    pub fn hash(&self) -> &[u8; HASH_SIZE] {
        match self {
            StakeCredential::Key(h) | StakeCredential::Script(h) => h,
        }
    }
}

fn parse_hash(s: &str) -> SdkResult<[u8; HASH_SIZE]> {
    let bytes = hex::decode(s)?;
    <[u8; HASH_SIZE]>::try_from(bytes.as_slice())
        .map_err(|_| AddressError::InvalidLength(bytes.len()).into())
}

/// An address whose payment credential is a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScriptAddress {
    network_id: u8,
    payment: [u8; HASH_SIZE],
    stake: Option<StakeCredential>,
}

impl ScriptAddress {
    /// Enterprise address (no stake credential) for a script hash.
    pub fn new(payment: [u8; HASH_SIZE], network: Network) -> Self {
        Self {
            network_id: network.network_id(),
            payment,
            stake: None,
        }
    }

    /// Address locking funds under `script`.
    pub fn from_script(script: &Script, network: Network) -> Self {
        Self::new(script.hash(), network)
    }

    /// Attach a stake credential, producing a base address.
    pub fn with_stake(mut self, stake: StakeCredential) -> Self {
        self.stake = Some(stake);
        self
    }

    pub fn network_id(&self) -> u8 {
        self.network_id
    }

    pub fn payment_hash(&self) -> &[u8; HASH_SIZE] {
        &self.payment
    }

    pub fn stake(&self) -> Option<&StakeCredential> {
        self.stake.as_ref()
    }

    /// Header byte.
    pub fn header(&self) -> u8 {
        let kind = match self.stake {
            None => ADDRESS_SCRIPT_ENTERPRISE,
            Some(StakeCredential::Key(_)) => ADDRESS_SCRIPT_KEY,
            Some(StakeCredential::Script(_)) => ADDRESS_SCRIPT_SCRIPT,
        };
        (kind << 4) | self.network_id
    }

    /// Raw address bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + 2 * HASH_SIZE);
        out.push(self.header());
        out.extend_from_slice(&self.payment);
        if let Some(stake) = &self.stake {
            out.extend_from_slice(stake.hash());
        }
        out
    }

    /// Parse raw address bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AddressError> {
        let header = *bytes.first().ok_or(AddressError::InvalidLength(0))?;
        let kind = header >> 4;
        let expected_len = match kind {
            ADDRESS_SCRIPT_ENTERPRISE => 1 + HASH_SIZE,
            ADDRESS_SCRIPT_KEY | ADDRESS_SCRIPT_SCRIPT => 1 + 2 * HASH_SIZE,
            _ => return Err(AddressError::NotScriptAddress(header)),
        };
        if bytes.len() != expected_len {
            return Err(AddressError::InvalidLength(bytes.len()));
        }

        let mut payment = [0u8; HASH_SIZE];
        payment.copy_from_slice(&bytes[1..1 + HASH_SIZE]);

        let stake = if kind == ADDRESS_SCRIPT_ENTERPRISE {
            None
        } else {
            let mut hash = [0u8; HASH_SIZE];
            hash.copy_from_slice(&bytes[1 + HASH_SIZE..]);
            Some(if kind == ADDRESS_SCRIPT_KEY {
                StakeCredential::Key(hash)
            } else {
                StakeCredential::Script(hash)
            })
        };

        Ok(Self {
            network_id: header & 0x0f,
            payment,
            stake,
        })
    }

    /// Bech32 encoding (`addr1...` / `addr_test1...`).
    pub fn to_bech32(&self) -> Result<String, AddressError> {
        let hrp = hrp_for_network_id(self.network_id);
        Ok(bech32::encode(hrp, self.to_bytes().to_base32(), Variant::Bech32)?)
    }

    /// Parse a bech32 script address, checking the prefix against the
    /// header's network id.
    pub fn from_bech32(s: &str) -> Result<Self, AddressError> {
        let (hrp, data, variant) = bech32::decode(s)?;
        if variant != Variant::Bech32 {
            return Err(AddressError::UnexpectedVariant);
        }
        let bytes = Vec::<u8>::from_base32(&data)?;
        let address = Self::from_bytes(&bytes)?;
        if hrp != hrp_for_network_id(address.network_id) {
            return Err(AddressError::PrefixMismatch {
                hrp,
                network_id: address.network_id,
            });
        }
        Ok(address)
    }
}
