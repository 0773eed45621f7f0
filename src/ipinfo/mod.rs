//! IP address enrichment.
//!
//! Addresses found by a search are annotated with their reverse DNS name and
//! the AS announcing them. Lookups are best effort: any failure or timeout
//! leaves the corresponding field empty.

mod cymru;
mod records;
mod resolution;

pub use cymru::{asn_query_name, origin_query_name, parse_description, parse_origin};
pub use records::lookup_txt_records;
pub use resolution::{resolve_host_to_ip, reverse_dns_lookup};

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use hickory_resolver::TokioAsyncResolver;
use serde::Serialize;

use crate::config::IP_LOOKUP_TIMEOUT;
use crate::identity::parse_ip;

/// What is known about one address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IpInfo {
    pub ip: String,
    /// Reverse DNS name
    pub host: Option<String>,
    pub asn: Option<u32>,
    /// AS name and country
    pub description: Option<String>,
    /// Announced prefix (CIDR)
    pub range: Option<String>,
}

impl IpInfo {
    pub fn empty(ip: &str) -> Self {
        Self {
            ip: ip.to_string(),
            ..Self::default()
        }
    }
}

/// Source of IP information. Never fails; unknown fields stay `None`.
#[async_trait]
pub trait IpLookup: Send + Sync {
    async fn lookup(&self, ip: &str) -> IpInfo;
}

/// Looks up addresses through DNS.
pub struct DnsIpLookup {
    resolver: Arc<TokioAsyncResolver>,
    timeout: Duration,
}

impl DnsIpLookup {
    pub fn new(resolver: Arc<TokioAsyncResolver>) -> Self {
        Self {
            resolver,
            timeout: IP_LOOKUP_TIMEOUT,
        }
    }

    async fn host(&self, ip: &str) -> Option<String> {
        reverse_dns_lookup(ip, &self.resolver).await.ok().flatten()
    }

    async fn origin(&self, name: &str) -> Option<(u32, Option<String>)> {
        let answers = lookup_txt_records(name, &self.resolver).await.ok()?;
        answers.iter().find_map(|answer| parse_origin(answer))
    }

    async fn description(&self, asn: u32) -> Option<String> {
        let answers = lookup_txt_records(&asn_query_name(asn), &self.resolver)
            .await
            .ok()?;
        answers.iter().find_map(|answer| parse_description(answer))
    }
}

#[async_trait]
impl IpLookup for DnsIpLookup {
    async fn lookup(&self, ip: &str) -> IpInfo {
        let mut info = IpInfo::empty(ip);
        let Some(address) = parse_ip(ip) else {
            return info;
        };

        let work = async {
            let origin_name = origin_query_name(&address);
            let (host, origin) = tokio::join!(self.host(ip), self.origin(&origin_name));
            info.host = host;
            if let Some((asn, range)) = origin {
                info.asn = Some(asn);
                info.range = range;
                info.description = self.description(asn).await;
            }
        };
        if tokio::time::timeout(self.timeout, work).await.is_err() {
            log::debug!("IP lookup for {ip} timed out");
        }
        info
    }
}

/// Looks up all addresses concurrently, keeping their order.
pub async fn enrich_ips(lookup: &dyn IpLookup, ips: &[String]) -> Vec<IpInfo> {
    join_all(ips.iter().map(|ip| lookup.lookup(ip))).await
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoLookup;

    #[async_trait]
    impl IpLookup for EchoLookup {
        async fn lookup(&self, ip: &str) -> IpInfo {
            IpInfo {
                host: Some(format!("host-{ip}")),
                ..IpInfo::empty(ip)
            }
        }
    }

    #[tokio::test]
    async fn test_enrich_keeps_order() {
        let ips = vec!["192.0.2.2".to_string(), "192.0.2.1".to_string()];
        let infos = enrich_ips(&EchoLookup, &ips).await;
        let hosts: Vec<_> = infos.iter().filter_map(|i| i.host.as_deref()).collect();
        assert_eq!(hosts, vec!["host-192.0.2.2", "host-192.0.2.1"]);
    }

    #[tokio::test]
    async fn test_dns_lookup_of_invalid_address_is_empty() {
        let lookup = DnsIpLookup::new(crate::initialization::init_resolver());
        let info = lookup.lookup("not an ip").await;
        assert_eq!(info, IpInfo::empty("not an ip"));
    }
}
