//! Team Cymru IP-to-ASN DNS interface.
//!
//! `<reversed ip>.origin.asn.cymru.com` (`origin6` for IPv6) answers with
//! `"ASN | range | country | registry | date"`, and `AS<n>.asn.cymru.com` with
//! `"ASN | country | registry | date | description"`.

use std::net::IpAddr;

const ORIGIN_ZONE: &str = "origin.asn.cymru.com";
const ORIGIN6_ZONE: &str = "origin6.asn.cymru.com";
const ASN_ZONE: &str = "asn.cymru.com";

/// Name to query for the origin AS of `ip`.
pub fn origin_query_name(ip: &IpAddr) -> String {
    match ip {
        IpAddr::V4(v4) => {
            let octets = v4.octets();
            format!(
                "{}.{}.{}.{}.{ORIGIN_ZONE}",
                octets[3], octets[2], octets[1], octets[0]
            )
        }
        IpAddr::V6(v6) => {
            let nibbles: Vec<String> = v6
                .octets()
                .iter()
                .rev()
                .flat_map(|byte| [byte & 0x0f, byte >> 4])
                .map(|nibble| format!("{nibble:x}"))
                .collect();
            format!("{}.{ORIGIN6_ZONE}", nibbles.join("."))
        }
    }
}

/// Name to query for the description of an AS.
pub fn asn_query_name(asn: u32) -> String {
    format!("AS{asn}.{ASN_ZONE}")
}

/// Extracts the AS number and announced range from an origin answer.
///
/// Answers listing several origin ASes yield the first one.
pub fn parse_origin(answer: &str) -> Option<(u32, Option<String>)> {
    let mut fields = answer.split('|').map(str::trim);
    let asn = fields.next()?.split_whitespace().next()?.parse().ok()?;
    let range = fields
        .next()
        .filter(|range| !range.is_empty())
        .map(str::to_string);
    Some((asn, range))
}

/// Extracts the AS description (the last field) from an AS answer.
pub fn parse_description(answer: &str) -> Option<String> {
    let description = answer.rsplit('|').next()?.trim();
    if description.is_empty() || !answer.contains('|') {
        None
    } else {
        Some(description.to_string())
    }
}
