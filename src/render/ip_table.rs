//! Table of enriched IP addresses.

use super::escape;
use crate::config::IP_HARVEST_LIMIT;
use crate::ipinfo::IpInfo;

/// Renders the IP table, or nothing when no address has any information.
pub fn render_ip_table(infos: &[IpInfo]) -> String {
    let rows: Vec<String> = infos
        .iter()
        .filter(|info| info.host.is_some() || info.asn.is_some() || info.range.is_some())
        .map(render_row)
        .collect();
    if rows.is_empty() {
        return String::new();
    }

    let mut html = String::from("<table class=\"ipinfo\">");
    for row in &rows {
        html.push_str(row);
    }
    if rows.len() >= IP_HARVEST_LIMIT {
        html.push_str("<tr><td colspan=\"3\"><em>(Limited hostname lookups)</em></td></tr>");
    }
    html.push_str("</table>");
    html
}

fn render_row(info: &IpInfo) -> String {
    let host = info.host.as_deref().map(escape).unwrap_or_default();
    let range = info.range.as_deref().map(escape).unwrap_or_default();
    let asn = match info.asn {
        Some(asn) => format!(
            " <a href=\"http://bgp.he.net/AS{asn}#_whois\" target=\"_blank\" rel=\"noopener noreferrer\">AS{asn}</a> \
             <a href=\"https://ipinfo.io/AS{asn}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
            escape(info.description.as_deref().unwrap_or(""))
        ),
        None => String::new(),
    };
    format!(
        "<tr><td><span class=\"hostname\"></span>{}</td><td> <tt>{host}</tt></td><td>{asn}</td><td> <tt>{range}</tt></td></tr>",
        escape(&info.ip)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(ip: &str) -> IpInfo {
        IpInfo {
            host: Some(format!("host-{ip}.example.net")),
            asn: Some(64500),
            description: Some("EXAMPLE-AS, ZZ".to_string()),
            range: Some("192.0.2.0/24".to_string()),
            ..IpInfo::empty(ip)
        }
    }

    #[test]
    fn test_empty_infos_are_skipped() {
        assert_eq!(render_ip_table(&[IpInfo::empty("192.0.2.1")]), "");
        assert_eq!(render_ip_table(&[]), "");
    }

    #[test]
    fn test_row_contents() {
        let html = render_ip_table(&[info("192.0.2.1")]);
        assert!(html.starts_with("<table class=\"ipinfo\"><tr><td><span class=\"hostname\"></span>192.0.2.1</td>"));
        assert!(html.contains("<td> <tt>host-192.0.2.1.example.net</tt></td>"));
        assert!(html.contains("http://bgp.he.net/AS64500#_whois"));
        assert!(html.contains(">EXAMPLE-AS, ZZ</a>"));
        assert!(html.contains("<td> <tt>192.0.2.0/24</tt></td>"));
        assert!(!html.contains("Limited hostname lookups"));
    }

    #[test]
    fn test_limit_note_at_cap() {
        let infos: Vec<IpInfo> = (0..10).map(|i| info(&format!("192.0.2.{i}"))).collect();
        let html = render_ip_table(&infos);
        assert_eq!(html.matches("<tr>").count(), 11);
        assert!(html.contains("<em>(Limited hostname lookups)</em>"));
    }
}
