//! SipHash-2-4 specialised to a precomputed 256-bit key and 8-byte inputs.
//!
//! There is no standard IV xor: the keys already hold the initial state.
//! The standard function is recovered by xoring the keys with
//! "somepseudorandomlygeneratedbytes".

use wide::u64x4;

/// The four initial state words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SipKeys {
    pub k0: u64,
    pub k1: u64,
    pub k2: u64,
    pub k3: u64,
}

impl SipKeys {
    /// Reads four little-endian words.
    pub fn from_bytes(bytes: &[u8; 32]) -> Self {
        let word = |i: usize| {
            let mut w = [0u8; 8];
            w.copy_from_slice(&bytes[i * 8..i * 8 + 8]);
            u64::from_le_bytes(w)
        };
        Self { k0: word(0), k1: word(1), k2: word(2), k3: word(3) }
    }
}

#[inline(always)]
fn sip_round(v: &mut [u64; 4]) {
    v[0] = v[0].wrapping_add(v[1]);
    v[2] = v[2].wrapping_add(v[3]);
    v[1] = v[1].rotate_left(13);
    v[3] = v[3].rotate_left(16);
    v[1] ^= v[0];
    v[3] ^= v[2];
    v[0] = v[0].rotate_left(32);
    v[2] = v[2].wrapping_add(v[1]);
    v[0] = v[0].wrapping_add(v[3]);
    v[1] = v[1].rotate_left(17);
    v[3] = v[3].rotate_left(21);
    v[1] ^= v[2];
    v[3] ^= v[0];
    v[2] = v[2].rotate_left(32);
}

#[inline(always)]
pub fn siphash24(keys: &SipKeys, nonce: u64) -> u64 {
    let mut v = [keys.k0, keys.k1, keys.k2, keys.k3 ^ nonce];
    sip_round(&mut v);
    sip_round(&mut v);
    v[0] ^= nonce;
    v[2] ^= 0xff;
    for _ in 0..4 {
        sip_round(&mut v);
    }
    (v[0] ^ v[1]) ^ (v[2] ^ v[3])
}

#[inline(always)]
fn rotl(x: u64x4, b: u32) -> u64x4 {
    (x << b) | (x >> (64 - b))
}

#[inline(always)]
fn sip_round_x4(v: &mut [u64x4; 4]) {
    v[0] = v[0] + v[1];
    v[2] = v[2] + v[3];
    v[1] = rotl(v[1], 13);
    v[3] = rotl(v[3], 16);
    v[1] = v[1] ^ v[0];
    v[3] = v[3] ^ v[2];
    v[0] = rotl(v[0], 32);
    v[2] = v[2] + v[1];
    v[0] = v[0] + v[3];
    v[1] = rotl(v[1], 17);
    v[3] = rotl(v[3], 21);
    v[1] = v[1] ^ v[2];
    v[3] = v[3] ^ v[0];
    v[2] = rotl(v[2], 32);
}

/// Four independent `siphash24` evaluations in SIMD lanes.
#[inline(always)]
pub fn siphash24_x4(keys: &SipKeys, nonces: [u64; 4]) -> [u64; 4] {
    let n = u64x4::from(nonces);
    let mut v = [
        u64x4::splat(keys.k0),
        u64x4::splat(keys.k1),
        u64x4::splat(keys.k2),
        u64x4::splat(keys.k3) ^ n,
    ];
    sip_round_x4(&mut v);
    sip_round_x4(&mut v);
    v[0] = v[0] ^ n;
    v[2] = v[2] ^ u64x4::splat(0xff);
    for _ in 0..4 {
        sip_round_x4(&mut v);
    }
    ((v[0] ^ v[1]) ^ (v[2] ^ v[3])).to_array()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // Standard SipHash-2-4 key 00 01 02 .. 0f, in the pre-xored form.
    fn reference_keys() -> SipKeys {
        let k0 = 0x0706050403020100u64;
        let k1 = 0x0f0e0d0c0b0a0908u64;
        SipKeys {
            k0: k0 ^ 0x736f6d6570736575,
            k1: k1 ^ 0x646f72616e646f6d,
            k2: k0 ^ 0x6c7967656e657261,
            k3: k1 ^ 0x7465646279746573,
        }
    }

    #[test]
    fn test_scalar_is_deterministic_and_input_sensitive() {
        let keys = reference_keys();
        assert_eq!(siphash24(&keys, 0), siphash24(&keys, 0));
        assert_ne!(siphash24(&keys, 0), siphash24(&keys, 1));

        let mut other = keys;
        other.k2 ^= 1;
        assert_ne!(siphash24(&keys, 7), siphash24(&other, 7));
    }

    #[test]
    fn test_keys_read_little_endian() {
        let mut bytes = [0u8; 32];
        bytes[0] = 1;
        bytes[8] = 2;
        bytes[23] = 0x80;
        bytes[24] = 0xff;
        let keys = SipKeys::from_bytes(&bytes);
        assert_eq!(keys.k0, 1);
        assert_eq!(keys.k1, 2);
        assert_eq!(keys.k2, 0x80u64 << 56);
        assert_eq!(keys.k3, 0xff);
    }

    proptest! {
        #[test]
        fn prop_simd_lanes_match_scalar(
            k in any::<[u64; 4]>(),
            nonces in any::<[u64; 4]>(),
        ) {
            let keys = SipKeys { k0: k[0], k1: k[1], k2: k[2], k3: k[3] };
            let lanes = siphash24_x4(&keys, nonces);
            for i in 0..4 {
                prop_assert_eq!(lanes[i], siphash24(&keys, nonces[i]));
            }
        }
    }
}
