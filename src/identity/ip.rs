//! IP address validation and canonical forms.
//!
//! Anonymous edits are attributed to the IP address in the form MediaWiki
//! stores it: IPv4 without leading zeros, IPv6 as eight uppercase hex groups
//! without `::` compression.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Parses an IPv4 address, accepting zero-padded octets (`010.000.000.001`).
fn parse_ipv4(input: &str) -> Option<Ipv4Addr> {
    let mut octets = [0u8; 4];
    let mut parts = input.split('.');
    for octet in octets.iter_mut() {
        let part = parts.next()?;
        if part.is_empty() || part.len() > 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        *octet = part.parse().ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(Ipv4Addr::from(octets))
}

/// Parses an IPv4 or IPv6 address in compact or expanded form.
pub fn parse_ip(input: &str) -> Option<IpAddr> {
    let input = input.trim();
    if let Some(v4) = parse_ipv4(input) {
        return Some(IpAddr::V4(v4));
    }
    input.parse::<Ipv6Addr>().ok().map(IpAddr::V6)
}

/// Whether `input` is a single valid IP address.
pub fn is_valid_ip(input: &str) -> bool {
    parse_ip(input).is_some()
}

/// Renders an address in MediaWiki's canonical expanded form.
pub fn canonical_ip(ip: &IpAddr) -> String {
    match ip {
        IpAddr::V4(v4) => v4.to_string(),
        IpAddr::V6(v6) => v6
            .segments()
            .iter()
            .map(|segment| format!("{segment:X}"))
            .collect::<Vec<_>>()
            .join(":"),
    }
}

/// Parses and canonicalizes in one step.
pub fn normalize_ip(input: &str) -> Option<String> {
    parse_ip(input).map(|ip| canonical_ip(&ip))
}
