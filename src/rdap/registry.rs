//! Static RDAP server table.
//!
//! Suffixes missing here are probed over WHOIS only.

/// `(suffix, base URL)`; every URL ends with `/`
const RDAP_SERVERS: &[(&str, &str)] = &[
    ("com", "https://rdap.verisign.com/com/v1/"),
    ("net", "https://rdap.verisign.com/net/v1/"),
    ("org", "https://rdap.org.org/"),
    ("io", "https://rdap.nic.io/"),
    ("ai", "https://rdap.nic.ai/"),
    ("co", "https://rdap.nic.co/"),
    ("me", "https://rdap.nic.me/"),
    ("app", "https://rdap.nic.google/"),
    ("dev", "https://rdap.nic.google/"),
    ("xyz", "https://rdap.nic.xyz/"),
    ("tech", "https://rdap.nic.tech/"),
];

/// RDAP base URL for a suffix (lowercase, no leading dot)
pub fn rdap_base_url(suffix: &str) -> Option<&'static str> {
    RDAP_SERVERS
        .iter()
        .find(|(s, _)| *s == suffix)
        .map(|(_, url)| *url)
}

/// RDAP domain query URL for a fully-qualified domain
pub fn rdap_domain_url(domain: &str) -> Option<String> {
    let (_, suffix) = domain.rsplit_once('.')?;
    let base = rdap_base_url(suffix)?;
    Some(format!("{base}domain/{domain}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_suffixes() {
        assert!(rdap_base_url("com").is_some());
        assert!(rdap_base_url("app").is_some());
        assert!(rdap_base_url("to").is_none());
        assert!(RDAP_SERVERS.iter().all(|(_, url)| url.ends_with('/')));
    }

    #[test]
    fn test_domain_url() {
        assert_eq!(
            rdap_domain_url("mealmind.com").as_deref(),
            Some("https://rdap.verisign.com/com/v1/domain/mealmind.com")
        );
        assert!(rdap_domain_url("mealmind").is_none());
    }
}
