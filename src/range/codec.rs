//! Integer and byte encodings for IPv4 addresses.
//!
//! Numeric index keys are `start || end`, each a 4-byte big-endian `u32`.
//! Fixed-width big-endian keys sort lexicographically in the same order as
//! their numeric values, so iterating the index yields ranges ascending by
//! `start`.

use std::net::Ipv4Addr;

use crate::error::{Error, Result};

/// Size of a numeric index key in bytes.
pub const RANGE_KEY_SIZE: usize = 8;

/// Parse dotted IPv4 text into its big-endian `u32` value.
pub fn address_to_int(ip: &str) -> Result<u32> {
    ip.parse::<Ipv4Addr>()
        .map(u32::from)
        .map_err(|_| Error::InvalidIpAddress(ip.to_string()))
}

/// Render a `u32` back into an IPv4 address.
pub fn int_to_address(value: u32) -> Ipv4Addr {
    Ipv4Addr::from(value)
}

/// Encode a `u32` as 4 big-endian bytes.
#[inline]
pub fn encode_be(value: u32) -> [u8; 4] {
    value.to_be_bytes()
}

/// Decode 4 big-endian bytes into a `u32`.
#[inline]
pub fn decode_be(bytes: [u8; 4]) -> u32 {
    u32::from_be_bytes(bytes)
}

/// Build the numeric index key for an inclusive range.
pub fn range_key(start: u32, end: u32) -> [u8; RANGE_KEY_SIZE] {
    let mut key = [0u8; RANGE_KEY_SIZE];
    key[0..4].copy_from_slice(&encode_be(start));
    key[4..8].copy_from_slice(&encode_be(end));
    key
}

/// Decode a numeric index key into `(start, end)`.
///
/// Returns `None` for keys shorter than [`RANGE_KEY_SIZE`].
pub fn decode_range_key(key: &[u8]) -> Option<(u32, u32)> {
    if key.len() < RANGE_KEY_SIZE {
        return None;
    }
    let start = decode_be([key[0], key[1], key[2], key[3]]);
    let end = decode_be([key[4], key[5], key[6], key[7]]);
    Some((start, end))
}
