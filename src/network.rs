//! Network selection for address derivation.

use std::fmt;
use std::str::FromStr;

use crate::program::constants::{
    MAINNET_ADDRESS_HRP, MAINNET_NETWORK_ID, TESTNET_ADDRESS_HRP, TESTNET_NETWORK_ID,
};
use crate::program::error::{SdkError, SdkResult};

/// Environment variable consulted by [`Network::from_env`].
pub const NETWORK_ENV_VAR: &str = "MEDREC_NETWORK";

/// Network used when nothing is configured.
pub const DEFAULT_NETWORK: Network = Network::Preprod;

/// Largest id that fits the address header nibble.
pub const MAX_NETWORK_ID: u8 = 0x0f;

/// A network id checked to fit in an address header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NetworkId(u8);

impl NetworkId {
    pub fn new(id: u8) -> SdkResult<Self> {
        if id > MAX_NETWORK_ID {
            return Err(SdkError::InvalidNetwork(format!(
                "network id {} exceeds {}",
                id, MAX_NETWORK_ID
            )));
        }
        Ok(Self(id))
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

/// A Cardano network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Network {
    Mainnet,
    #[default]
    Preprod,
    Preview,
    /// Private or local network with an explicit network id
    Custom(NetworkId),
}

impl Network {
    /// A private network. Ids above [`MAX_NETWORK_ID`] are rejected.
    pub fn custom(id: u8) -> SdkResult<Self> {
        Ok(Network::Custom(NetworkId::new(id)?))
    }

    /// Network id carried in the low nibble of an address header.
    pub fn network_id(&self) -> u8 {
        match self {
            Network::Mainnet => MAINNET_NETWORK_ID,
            Network::Preprod | Network::Preview => TESTNET_NETWORK_ID,
            Network::Custom(id) => id.get(),
        }
    }

    /// Bech32 prefix for addresses on this network.
    pub fn address_hrp(&self) -> &'static str {
        hrp_for_network_id(self.network_id())
    }

    /// Read the network from `MEDREC_NETWORK`, falling back to
    /// [`DEFAULT_NETWORK`] when the variable is unset.
    pub fn from_env() -> SdkResult<Self> {
        match std::env::var(NETWORK_ENV_VAR) {
            Ok(value) => value.parse(),
            Err(_) => Ok(DEFAULT_NETWORK),
        }
    }
}

pub(crate) fn hrp_for_network_id(network_id: u8) -> &'static str {
    if network_id == MAINNET_NETWORK_ID {
        MAINNET_ADDRESS_HRP
    } else {
        TESTNET_ADDRESS_HRP
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Mainnet => f.write_str("mainnet"),
            Network::Preprod => f.write_str("preprod"),
            Network::Preview => f.write_str("preview"),
            Network::Custom(id) => write!(f, "custom:{}", id.get()),
        }
    }
}

impl FromStr for Network {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "preprod" => Ok(Network::Preprod),
            "preview" => Ok(Network::Preview),
            _ => {
                let id = lower
                    .strip_prefix("custom:")
                    .and_then(|id| id.parse::<u8>().ok())
                    .ok_or_else(|| SdkError::InvalidNetwork(s.to_string()))?;
                Network::custom(id)
            }
        }
    }
}
