//! Forward and reverse address resolution.

use anyhow::{Error, Result};
use hickory_resolver::TokioAsyncResolver;

/// Resolves a hostname to an IP address using DNS.
///
/// # Arguments
///
/// * `host` - The hostname to resolve
/// * `resolver` - The DNS resolver instance
///
/// # Returns
///
/// The first IP address found.
///
/// # Errors
///
/// Returns an error if DNS resolution fails or no IP addresses are found.
pub async fn resolve_host_to_ip(
    host: &str,
    resolver: &TokioAsyncResolver,
) -> Result<String, Error> {
    let response = resolver.lookup_ip(host).await.map_err(Error::new)?;
    let ip = response
        .iter()
        .next()
        .ok_or_else(|| Error::msg("No IP addresses found"))?
        .to_string();
    Ok(ip)
}

/// Performs a reverse DNS lookup (PTR record) for an IP address.
///
/// # Returns
///
/// The host name without its trailing dot, or `None` if there is no PTR
/// record or it just repeats the address.
///
/// # Errors
///
/// Returns an error only if `ip` is not an IP address.
pub async fn reverse_dns_lookup(
    ip: &str,
    resolver: &TokioAsyncResolver,
) -> Result<Option<String>, Error> {
    match resolver.reverse_lookup(ip.parse()?).await {
        Ok(response) => {
            let name = response
                .iter()
                .next()
                .map(|name| name.to_utf8().trim_end_matches('.').to_string())
                .filter(|name| !name.is_empty() && !name.eq_ignore_ascii_case(ip));
            Ok(name)
        }
        Err(e) => {
            log::debug!("No reverse DNS for {ip}: {e}");
            Ok(None)
        }
    }
}
