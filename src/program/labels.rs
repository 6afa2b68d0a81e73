//! CIP-67 asset name labels.
//!
//! A label prefix is 4 bytes: a zero nibble, the 16-bit label, a CRC-8 of the
//! label bytes, and a closing zero nibble. CIP-68 token pairs share a name and
//! differ only in their label.

use crate::program::constants::{LABEL_REFERENCE_NFT, LABEL_USER_NFT};

/// Label prefix length in bytes
pub const LABEL_SIZE: usize = 4;

/// CRC-8 (polynomial 0x07, initial value 0).
fn crc8(data: &[u8]) -> u8 {
    let mut crc = 0u8;
    for byte in data {
        crc ^= byte;
        for _ in 0..8 {
            crc = if crc & 0x80 != 0 {
                (crc << 1) ^ 0x07
            } else {
                crc << 1
            };
        }
    }
    crc
}

/// Encode a label as its 4-byte asset name prefix.
pub fn to_label(label: u16) -> [u8; LABEL_SIZE] {
    let [hi, lo] = label.to_be_bytes();
    let checksum = crc8(&[hi, lo]);
    [
        hi >> 4,
        (hi << 4) | (lo >> 4),
        (lo << 4) | (checksum >> 4),
        checksum << 4,
    ]
}

/// Decode a 4-byte label prefix. Returns `None` when the nibble framing or
/// checksum is wrong.
pub fn from_label(prefix: &[u8]) -> Option<u16> {
    let prefix: [u8; LABEL_SIZE] = prefix.try_into().ok()?;
    if prefix[0] >> 4 != 0 || prefix[3] & 0x0f != 0 {
        return None;
    }
    let hi = (prefix[0] << 4) | (prefix[1] >> 4);
    let lo = (prefix[1] << 4) | (prefix[2] >> 4);
    let checksum = (prefix[2] << 4) | (prefix[3] >> 4);
    (crc8(&[hi, lo]) == checksum).then(|| u16::from_be_bytes([hi, lo]))
}

/// Split an asset name into its label and the remaining name bytes.
pub fn split_label(asset_name: &[u8]) -> Option<(u16, &[u8])> {
    if asset_name.len() < LABEL_SIZE {
        return None;
    }
    let (prefix, name) = asset_name.split_at(LABEL_SIZE);
    from_label(prefix).map(|label| (label, name))
}

/// Asset name `label ++ name`.
pub fn labeled_name(label: u16, name: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(LABEL_SIZE + name.len());
    out.extend_from_slice(&to_label(label));
    out.extend_from_slice(name);
    out
}

/// Reference token name (label 100), the token holding the metadata datum.
pub fn reference_token_name(name: &[u8]) -> Vec<u8> {
    labeled_name(LABEL_REFERENCE_NFT, name)
}

/// User token name (label 222), the NFT held by the owner.
pub fn user_token_name(name: &[u8]) -> Vec<u8> {
    labeled_name(LABEL_USER_NFT, name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::constants::{LABEL_USER_FT, LABEL_USER_RFT};

    #[test]
    fn test_known_labels() {
        assert_eq!(hex::encode(to_label(LABEL_REFERENCE_NFT)), "000643b0");
        assert_eq!(hex::encode(to_label(LABEL_USER_NFT)), "000de140");
        assert_eq!(hex::encode(to_label(LABEL_USER_FT)), "0014df10");
        assert_eq!(hex::encode(to_label(LABEL_USER_RFT)), "001bc280");
    }

    #[test]
    fn test_from_label() {
        assert_eq!(from_label(&hex::decode("000de140").unwrap()), Some(222));
        assert_eq!(from_label(&to_label(u16::MAX)), Some(u16::MAX));
        assert_eq!(from_label(&to_label(0)), Some(0));
    }

    #[test]
    fn test_bad_checksum_rejected() {
        assert_eq!(from_label(&hex::decode("000de150").unwrap()), None);
        assert_eq!(from_label(&hex::decode("100de140").unwrap()), None);
        assert_eq!(from_label(&[0, 1, 2]), None);
    }

    #[test]
    fn test_token_pair_names() {
        let reference = reference_token_name(b"Record01");
        let user = user_token_name(b"Record01");
        assert_eq!(hex::encode(&reference[..4]), "000643b0");
        assert_eq!(split_label(&user), Some((222, &b"Record01"[..])));
        assert_eq!(&reference[4..], &user[4..]);
    }
}
