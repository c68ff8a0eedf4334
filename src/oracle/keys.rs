//! Header + nonce to siphash keys.

use super::siphash::SipKeys;
use crate::error::MinerError;
use crate::store::HEADERLEN;
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

type Blake2b256 = Blake2b<U32>;

/// Zero-pads `header` to `HEADERLEN` bytes.
pub fn pad_header(header: &[u8]) -> Result<[u8; HEADERLEN], MinerError> {
    if header.len() > HEADERLEN {
        return Err(MinerError::HeaderTooLong { len: header.len(), max: HEADERLEN });
    }
    let mut buf = [0u8; HEADERLEN];
    buf[..header.len()].copy_from_slice(header);
    Ok(buf)
}

/// Keys for one nonce: the nonce overwrites the last four header bytes
/// (little-endian) and the whole buffer goes through BLAKE2b-256.
pub fn derive_keys(header: &[u8], nonce: u32) -> Result<SipKeys, MinerError> {
    let mut buf = pad_header(header)?;
    buf[HEADERLEN - 4..].copy_from_slice(&nonce.to_le_bytes());

    let digest = Blake2b256::digest(buf);
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&digest);
    Ok(SipKeys::from_bytes(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_keys_for_test_header() {
        let keys = derive_keys(b"test", 0).unwrap();
        assert_eq!(keys.k0, 0xb1fc229ad21e492a);
        assert_eq!(keys.k1, 0x1f991e44712e60f8);
        assert_eq!(keys.k2, 0x61a172f3f0cb259c);
        assert_eq!(keys.k3, 0x553163d45ad240da);
    }

    #[test]
    fn test_keys_depend_on_nonce() {
        let a = derive_keys(b"test", 0).unwrap();
        let b = derive_keys(b"test", 1).unwrap();
        assert_ne!(a, b);
        assert_eq!(a, derive_keys(b"test", 0).unwrap());
    }

    #[test]
    fn test_trailing_zero_padding_is_implicit() {
        // Explicit zero padding hashes to the same keys as the short header.
        let short = derive_keys(b"abc", 5).unwrap();
        let padded = derive_keys(b"abc\0\0\0\0", 5).unwrap();
        assert_eq!(short, padded);
    }

    #[test]
    fn test_header_length_limit() {
        assert!(derive_keys(&[7u8; HEADERLEN], 0).is_ok());
        let err = derive_keys(&[7u8; HEADERLEN + 1], 0).unwrap_err();
        assert!(matches!(err, MinerError::HeaderTooLong { len: 81, max: 80 }));
    }
}
