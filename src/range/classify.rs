//! Private and local range classification.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Check whether a CIDR expression names a private or local network.
///
/// Only the address before `/` is inspected. Text that is not of the form
/// `address/prefix`, or whose address does not parse, is reported as not
/// private so that it flows on to range parsing.
pub fn is_private_or_local(cidr: &str) -> bool {
    let parts: Vec<&str> = cidr.split('/').collect();
    if parts.len() != 2 {
        return false;
    }

    match parts[0].parse::<IpAddr>() {
        Ok(IpAddr::V4(v4)) => is_private_v4(v4),
        Ok(IpAddr::V6(v6)) => is_private_v6(v6),
        Err(_) => false,
    }
}

fn is_private_v4(ip: Ipv4Addr) -> bool {
    let octets = ip.octets();
    ip.is_loopback()
        || ip.is_private()
        || ip.is_link_local()
        // 224.0.0.0/24 link-local multicast
        || (octets[0] == 224 && octets[1] == 0 && octets[2] == 0)
}

fn is_private_v6(ip: Ipv6Addr) -> bool {
    let first = ip.segments()[0];
    ip.is_loopback()
        // fc00::/7 unique local
        || (first & 0xfe00) == 0xfc00
        // fe80::/10 link-local unicast
        || (first & 0xffc0) == 0xfe80
        // ffx2::/16 link-local multicast
        || (first & 0xff0f) == 0xff02
}
