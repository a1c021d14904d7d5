//! Range codec: textual range expressions to inclusive numeric bounds.
//!
//! Two textual forms are accepted:
//! - CIDR: `A.B.C.D/N`
//! - Bounds: `A.B.C.D-E.F.G.H` (both ends inclusive)

mod classify;
mod codec;

pub use classify::is_private_or_local;
pub use codec::{
    address_to_int, decode_be, decode_range_key, encode_be, int_to_address, range_key,
    RANGE_KEY_SIZE,
};

use ipnet::Ipv4Net;
use std::fmt;
use std::net::Ipv4Addr;

use crate::error::{Error, Result};

/// A parsed range expression.
///
/// Parsing once and matching many times keeps the textual fallback scan from
/// re-detecting the form on every membership test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeSpec {
    /// `address/prefix` network
    Cidr(Ipv4Net),
    /// `start-end` inclusive bounds
    Bounds { start: u32, end: u32 },
}

impl RangeSpec {
    /// Parse a CIDR or `start-end` expression.
    ///
    /// Inverted bounds (`start > end`) are rejected.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();

        if text.contains('/') {
            return text
                .parse::<Ipv4Net>()
                .map(RangeSpec::Cidr)
                .map_err(|_| Error::InvalidRange(text.to_string()));
        }

        let parts: Vec<&str> = text.split('-').collect();
        if parts.len() != 2 {
            return Err(Error::InvalidRange(text.to_string()));
        }

        let start = parse_bound(parts[0], text)?;
        let end = parse_bound(parts[1], text)?;
        if start > end {
            return Err(Error::InvalidRange(format!(
                "{} (start is after end)",
                text
            )));
        }

        Ok(RangeSpec::Bounds { start, end })
    }

    /// First address of the range.
    pub fn start(&self) -> u32 {
        match self {
            RangeSpec::Cidr(net) => u32::from(net.network()),
            RangeSpec::Bounds { start, .. } => *start,
        }
    }

    /// Last address of the range (inclusive).
    pub fn end(&self) -> u32 {
        match self {
            RangeSpec::Cidr(net) => u32::from(net.broadcast()),
            RangeSpec::Bounds { end, .. } => *end,
        }
    }

    /// Inclusive `(start, end)` bounds.
    pub fn bounds(&self) -> (u32, u32) {
        (self.start(), self.end())
    }

    /// Check whether an address falls inside the range.
    pub fn contains(&self, addr: u32) -> bool {
        match self {
            RangeSpec::Cidr(net) => net.contains(&Ipv4Addr::from(addr)),
            RangeSpec::Bounds { start, end } => *start <= addr && addr <= *end,
        }
    }
}

fn parse_bound(part: &str, text: &str) -> Result<u32> {
    part.trim()
        .parse::<Ipv4Addr>()
        .map(u32::from)
        .map_err(|_| Error::InvalidRange(text.to_string()))
}

/// An inclusive numeric range tagged with a country code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericRange {
    pub start: u32,
    pub end: u32,
    pub country: String,
}

impl NumericRange {
    /// Create a range from explicit bounds.
    pub fn new(start: u32, end: u32, country: impl Into<String>) -> Self {
        Self {
            start,
            end,
            country: country.into(),
        }
    }

    /// Parse a range expression and tag it with a country.
    pub fn parse(text: &str, country: impl Into<String>) -> Result<Self> {
        let (start, end) = parse_range(text)?;
        Ok(Self::new(start, end, country))
    }

    /// Numeric index key for this range.
    pub fn key(&self) -> [u8; RANGE_KEY_SIZE] {
        range_key(self.start, self.end)
    }

    /// Check whether an address falls inside the range.
    pub fn contains(&self, addr: u32) -> bool {
        self.start <= addr && addr <= self.end
    }
}

impl fmt::Display for NumericRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{} {}",
            int_to_address(self.start),
            int_to_address(self.end),
            self.country
        )
    }
}

/// Parse a range expression into inclusive `(start, end)` bounds.
pub fn parse_range(text: &str) -> Result<(u32, u32)> {
    RangeSpec::parse(text).map(|spec| spec.bounds())
}

/// Check whether `ip` lies within `range`.
///
/// Never fails: malformed input on either side yields `false`.
pub fn contains_address(ip: &str, range: &str) -> bool {
    let addr = match address_to_int(ip) {
        Ok(addr) => addr,
        Err(_) => return false,
    };
    RangeSpec::parse(range)
        .map(|spec| spec.contains(addr))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cidr_bounds() {
        assert_eq!(
            parse_range("192.168.1.0/24").unwrap(),
            (3_232_235_776, 3_232_236_031)
        );
        assert_eq!(
            parse_range("10.0.0.0/8").unwrap(),
            (167_772_160, 184_549_375)
        );
    }

    #[test]
    fn test_parse_cidr_masks_host_bits() {
        assert_eq!(
            parse_range("127.0.0.1/8").unwrap(),
            parse_range("127.0.0.0/8").unwrap()
        );
    }

    #[test]
    fn test_parse_cidr_extremes() {
        assert_eq!(parse_range("0.0.0.0/0").unwrap(), (0, u32::MAX));
        assert_eq!(parse_range("8.8.8.8/32").unwrap(), (0x0808_0808, 0x0808_0808));
    }

    #[test]
    fn test_parse_bounds() {
        assert_eq!(
            parse_range("192.168.1.1-192.168.1.10").unwrap(),
            (3_232_235_777, 3_232_235_786)
        );
        assert_eq!(
            parse_range(" 1.0.0.0 - 1.0.0.255 ").unwrap(),
            (16_777_216, 16_777_471)
        );
    }

    #[test]
    fn test_parse_single_address_bounds() {
        assert_eq!(parse_range("8.8.8.8-8.8.8.8").unwrap(), (0x0808_0808, 0x0808_0808));
    }

    #[test]
    fn test_parse_malformed() {
        assert!(parse_range("invalid").is_err());
        assert!(parse_range("192.168.1.1").is_err());
        assert!(parse_range("192.168.1.0/abc").is_err());
        assert!(parse_range("192.168.1.0/33").is_err());
        assert!(parse_range("1.2.3.4-").is_err());
        assert!(parse_range("1.2.3.4-5.6.7.8-9.9.9.9").is_err());
        assert!(parse_range("1.2.3.256-1.2.4.0").is_err());
        assert!(parse_range("").is_err());
    }

    #[test]
    fn test_parse_rejects_inverted_bounds() {
        let err = parse_range("1.0.0.10-1.0.0.1").unwrap_err();
        assert!(matches!(err, Error::InvalidRange(_)));
    }

    #[test]
    fn test_contains_bounds_inclusive() {
        let range = "192.168.1.1-192.168.1.10";
        assert!(contains_address("192.168.1.1", range));
        assert!(contains_address("192.168.1.10", range));
        assert!(contains_address("192.168.1.5", range));
        assert!(!contains_address("192.168.1.0", range));
        assert!(!contains_address("192.168.1.11", range));
    }

    #[test]
    fn test_contains_cidr_inclusive() {
        let cidr = "192.168.1.0/24";
        assert!(contains_address("192.168.1.0", cidr));
        assert!(contains_address("192.168.1.255", cidr));
        assert!(!contains_address("192.168.0.255", cidr));
        assert!(!contains_address("192.168.2.0", cidr));
    }

    #[test]
    fn test_contains_malformed_is_false() {
        assert!(!contains_address("not-an-ip", "1.0.0.0/8"));
        assert!(!contains_address("1.0.0.1", "garbage"));
        assert!(!contains_address("1.0.0.1", "1.0.0.0/xx"));
        assert!(!contains_address("", ""));
    }

    #[test]
    fn test_range_spec_dispatch() {
        let cidr = RangeSpec::parse("10.0.0.0/8").unwrap();
        assert!(matches!(cidr, RangeSpec::Cidr(_)));
        assert!(cidr.contains(address_to_int("10.255.255.255").unwrap()));

        let bounds = RangeSpec::parse("1.0.0.0-1.0.0.255").unwrap();
        assert!(matches!(bounds, RangeSpec::Bounds { .. }));
        assert!(!bounds.contains(address_to_int("1.0.1.0").unwrap()));
    }

    #[test]
    fn test_numeric_range() {
        let range = NumericRange::parse("8.8.8.0/24", "US").unwrap();
        assert_eq!(range.start, 0x0808_0800);
        assert_eq!(range.end, 0x0808_08FF);
        assert_eq!(range.country, "US");
        assert!(range.contains(0x0808_0808));
        assert_eq!(decode_range_key(&range.key()), Some((range.start, range.end)));
        assert_eq!(range.to_string(), "8.8.8.0-8.8.8.255 US");
    }
}
