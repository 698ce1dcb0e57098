//! Availability probing: registry lookups plus the retry / fallback policy

use crate::domain::AvailabilityProbe;
use crate::error::{BrandForgeError, ProbeErrorKind, Result};
#[cfg(feature = "rdap")]
use crate::rdap::registry::rdap_domain_url;
use crate::types::{Availability, CheckConfig, Confidence};
use async_trait::async_trait;
#[cfg(feature = "rdap")]
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

/// Retry, backoff and timeout rules applied around a single probe
#[derive(Debug, Clone)]
pub struct ProbePolicy {
    /// Additional attempts after the first transient failure
    pub retry_attempts: usize,
    /// Attempt `n` waits `n * backoff` before retrying
    pub backoff: Duration,
    /// Upper bound on one attempt
    pub timeout: Duration,
}

impl Default for ProbePolicy {
    fn default() -> Self {
        Self::from_config(&CheckConfig::default())
    }
}

/// Final state of one variant after retries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub availability: Availability,
    pub confidence: Confidence,
    /// Probe calls made, retries included
    pub attempts: usize,
    pub error_message: Option<String>,
}

impl ProbeOutcome {
    /// Outcome for a probe abandoned through cancellation
    pub fn cancelled(attempts: usize) -> Self {
        Self {
            availability: Availability::Unknown,
            confidence: Confidence::Cancelled,
            attempts,
            error_message: Some("cancelled".to_string()),
        }
    }

    /// Whether the outcome is an observation worth caching
    pub fn is_observed(&self) -> bool {
        matches!(self.confidence, Confidence::Confirmed | Confidence::Unresolved)
    }
}

impl ProbePolicy {
    pub fn from_config(config: &CheckConfig) -> Self {
        Self {
            retry_attempts: config.retry_attempts,
            backoff: config.retry_backoff,
            timeout: config.timeout,
        }
    }

    /// Probe a domain until it resolves, retries run out, or `cancel` fires.
    ///
    /// Never fails. Exhausted transient errors resolve to available with
    /// [`Confidence::AssumedAvailable`]; permanent errors resolve to
    /// [`Availability::Unknown`] without a retry.
    pub async fn resolve(
        &self,
        probe: &dyn AvailabilityProbe,
        domain: &str,
        cancel: &CancellationToken,
    ) -> ProbeOutcome {
        let mut attempts = 0usize;
        let mut last_error: Option<BrandForgeError> = None;

        while attempts <= self.retry_attempts {
            if attempts > 0 {
                let delay = self.backoff * attempts as u32;
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return ProbeOutcome::cancelled(attempts),
                    _ = tokio::time::sleep(delay) => {}
                }
            }

            attempts += 1;
            let attempt = async {
                timeout(self.timeout, probe.probe(domain))
                    .await
                    .map_err(|_| BrandForgeError::timeout("availability probe", self.timeout.as_secs()))?
            };

            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => return ProbeOutcome::cancelled(attempts),
                result = attempt => result,
            };

            match result {
                Ok(available) => {
                    return ProbeOutcome {
                        availability: Availability::from_bool(available),
                        confidence: Confidence::Confirmed,
                        attempts,
                        error_message: None,
                    };
                }
                Err(e) if e.probe_kind() == ProbeErrorKind::Permanent => {
                    tracing::debug!(domain = %domain, probe = probe.name(), error = %e, "Permanent probe failure");
                    return ProbeOutcome {
                        availability: Availability::Unknown,
                        confidence: Confidence::Unresolved,
                        attempts,
                        error_message: Some(e.to_string()),
                    };
                }
                Err(e) => {
                    tracing::debug!(
                        domain = %domain,
                        probe = probe.name(),
                        attempt = attempts,
                        error = %e,
                        "Transient probe failure"
                    );
                    last_error = Some(e);
                }
            }
        }

        tracing::warn!(
            domain = %domain,
            attempts = attempts,
            "Retries exhausted, assuming domain is available"
        );

        ProbeOutcome {
            availability: Availability::Available,
            confidence: Confidence::AssumedAvailable,
            attempts,
            error_message: last_error.map(|e| e.to_string()),
        }
    }
}

/// Registry-backed probe: RDAP first, WHOIS as fallback
pub struct RegistryProbe {
    #[cfg(feature = "rdap")]
    rdap_client: Option<RdapClient>,
    #[cfg(feature = "whois")]
    whois_client: Option<WhoisClient>,
}

impl RegistryProbe {
    pub fn new() -> Self {
        Self::with_config(&CheckConfig::default())
    }

    pub fn with_config(config: &CheckConfig) -> Self {
        #[cfg(feature = "rdap")]
        let rdap_client = if config.enable_rdap {
            let client = Client::builder()
                .timeout(config.timeout)
                .user_agent("brand-forge/0.1.0")
                .pool_max_idle_per_host(config.concurrent_checks)
                .pool_idle_timeout(Duration::from_secs(90))
                .build()
                .unwrap_or_else(|e| {
                    tracing::warn!("Failed to create optimized HTTP client: {}. Using default.", e);
                    Client::new()
                });
            Some(RdapClient::new(client))
        } else {
            None
        };

        #[cfg(feature = "whois")]
        let whois_client = if config.enable_whois {
            Some(WhoisClient::new(config.timeout))
        } else {
            None
        };

        Self {
            #[cfg(feature = "rdap")]
            rdap_client,
            #[cfg(feature = "whois")]
            whois_client,
        }
    }

    /// Check if at least one lookup protocol is enabled
    pub fn is_configured(&self) -> bool {
        let has_rdap = {
            #[cfg(feature = "rdap")]
            {
                self.rdap_client.is_some()
            }
            #[cfg(not(feature = "rdap"))]
            {
                false
            }
        };
        let has_whois = {
            #[cfg(feature = "whois")]
            {
                self.whois_client.is_some()
            }
            #[cfg(not(feature = "whois"))]
            {
                false
            }
        };

        has_rdap || has_whois
    }
}

#[cfg(all(test, feature = "rdap"))]
impl RegistryProbe {
    /// RDAP only, every query sent to `endpoint`
    fn rdap_only(endpoint: &str, timeout: Duration) -> Self {
        let client = Client::builder().timeout(timeout).build().unwrap();
        Self {
            rdap_client: Some(RdapClient {
                client,
                endpoint: Some(endpoint.to_string()),
            }),
            #[cfg(feature = "whois")]
            whois_client: None,
        }
    }
}

impl Default for RegistryProbe {
    fn default() -> Self {
        Self::new()
    }
}

/// Keep the error that is most worth retrying
fn prefer_transient(current: Option<BrandForgeError>, next: BrandForgeError) -> Option<BrandForgeError> {
    match current {
        Some(existing) if existing.is_transient() && !next.is_transient() => Some(existing),
        _ => Some(next),
    }
}

#[async_trait]
impl AvailabilityProbe for RegistryProbe {
    async fn probe(&self, domain: &str) -> Result<bool> {
        #[allow(unused_mut)]
        let mut last_error: Option<BrandForgeError> = None;

        #[cfg(feature = "rdap")]
        if let Some(rdap_client) = &self.rdap_client {
            match rdap_client.check_domain(domain).await {
                Ok(available) => {
                    tracing::debug!(domain = %domain, method = "rdap", available, "Domain probe completed");
                    return Ok(available);
                }
                Err(e) => {
                    tracing::debug!(domain = %domain, method = "rdap", error = %e, "RDAP check failed");
                    last_error = prefer_transient(last_error, e);
                }
            }
        }

        #[cfg(feature = "whois")]
        if let Some(whois_client) = &self.whois_client {
            match whois_client.check_domain(domain).await {
                Ok(available) => {
                    tracing::debug!(domain = %domain, method = "whois", available, "Domain probe completed");
                    return Ok(available);
                }
                Err(e) => {
                    tracing::debug!(domain = %domain, method = "whois", error = %e, "WHOIS check failed");
                    last_error = prefer_transient(last_error, e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            BrandForgeError::permanent_probe(domain, "No domain checking method enabled")
        }))
    }

    fn name(&self) -> &'static str {
        "registry"
    }
}

fn tld_of(domain: &str) -> Result<String> {
    domain
        .rsplit_once('.')
        .map(|(_, tld)| tld.to_lowercase())
        .filter(|tld| !tld.is_empty())
        .ok_or_else(|| BrandForgeError::permanent_probe(domain, "Invalid domain format - no TLD found"))
}

/// RDAP client for domain checking
#[cfg(feature = "rdap")]
struct RdapClient {
    client: Client,
    /// Single server used for every suffix instead of the static table
    endpoint: Option<String>,
}

#[cfg(feature = "rdap")]
impl RdapClient {
    fn new(client: Client) -> Self {
        Self { client, endpoint: None }
    }

    fn domain_url(&self, domain: &str) -> Option<String> {
        match &self.endpoint {
            Some(base) => Some(format!("{}/domain/{}", base.trim_end_matches('/'), domain)),
            None => rdap_domain_url(domain),
        }
    }

    async fn check_domain(&self, domain: &str) -> Result<bool> {
        let tld = tld_of(domain)?;
        let url = self.domain_url(domain).ok_or_else(|| {
            BrandForgeError::permanent_probe(domain, format!("No RDAP server found for TLD: {}", tld))
        })?;

        let response = self.client.get(&url).send().await.map_err(|e| {
            BrandForgeError::transient_probe(domain, format!("RDAP request failed: {}", e))
        })?;

        let status = response.status().as_u16();
        match status {
            404 => return Ok(true),
            200..=299 => {}
            429 | 500..=599 => {
                return Err(BrandForgeError::transient_probe(
                    domain,
                    format!("RDAP server answered {}", status),
                ))
            }
            _ => {
                return Err(BrandForgeError::network(
                    format!("RDAP request failed with status {}", status),
                    Some(status),
                    Some(url),
                ))
            }
        }

        let text = response.text().await.map_err(|e| {
            BrandForgeError::transient_probe(domain, format!("RDAP body read failed: {}", e))
        })?;

        let rdap_response: RdapResponse = serde_json::from_str(&text).map_err(|e| {
            BrandForgeError::transient_probe(domain, format!("Malformed RDAP reply: {}", e))
        })?;

        Ok(!rdap_response.is_registered())
    }
}

/// WHOIS client for domain checking (optional feature)
#[cfg(feature = "whois")]
struct WhoisClient {
    timeout: Duration,
}

#[cfg(feature = "whois")]
impl WhoisClient {
    fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    async fn check_domain(&self, domain: &str) -> Result<bool> {
        let tld = tld_of(domain)?;

        let raw = match whois_server_for_tld(&tld) {
            Some(server) => self.query_whois(server, domain).await?,
            None => {
                // Unknown TLD: ask IANA for the authoritative server.
                let iana = self.query_whois("whois.iana.org", &tld).await?;
                let discovered = parse_iana_whois_server(&iana)
                    .or_else(|| parse_iana_refer_server(&iana))
                    .ok_or_else(|| {
                        BrandForgeError::permanent_probe(
                            domain,
                            format!("No WHOIS server found for TLD: {}", tld),
                        )
                    })?;
                self.query_whois(&discovered, domain).await?
            }
        };

        parse_whois_response(&raw, domain)
    }

    async fn query_whois(&self, server: &str, query: &str) -> Result<String> {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpStream;

        let secs = self.timeout.as_secs();
        let addr = format!("{}:43", server);
        let mut stream = timeout(self.timeout, TcpStream::connect(&addr))
            .await
            .map_err(|_| BrandForgeError::timeout("WHOIS connect", secs))?
            .map_err(|e| BrandForgeError::transient_probe(query, format!("WHOIS connect failed: {}", e)))?;

        timeout(self.timeout, stream.write_all(format!("{}\r\n", query).as_bytes()))
            .await
            .map_err(|_| BrandForgeError::timeout("WHOIS write", secs))?
            .map_err(|e| BrandForgeError::transient_probe(query, format!("WHOIS write failed: {}", e)))?;

        let mut buf = Vec::new();
        timeout(self.timeout, stream.read_to_end(&mut buf))
            .await
            .map_err(|_| BrandForgeError::timeout("WHOIS read", secs))?
            .map_err(|e| BrandForgeError::transient_probe(query, format!("WHOIS read failed: {}", e)))?;

        Ok(String::from_utf8_lossy(&buf).to_string())
    }
}

#[cfg(feature = "whois")]
fn whois_server_for_tld(tld: &str) -> Option<&'static str> {
    match tld {
        "com" | "net" => Some("whois.verisign-grs.com"),
        "org" => Some("whois.pir.org"),
        "io" => Some("whois.nic.io"),
        "ai" => Some("whois.nic.ai"),
        "co" => Some("whois.nic.co"),
        "me" => Some("whois.nic.me"),
        "so" => Some("whois.nic.so"),
        "is" => Some("whois.isnic.is"),
        "to" => Some("whois.tonic.to"),
        "app" | "dev" => Some("whois.nic.google"),
        "xyz" => Some("whois.nic.xyz"),
        _ => None,
    }
}

/// Classify a raw WHOIS reply
#[cfg(feature = "whois")]
fn parse_whois_response(output: &str, domain: &str) -> Result<bool> {
    let output_lower = output.to_lowercase();

    if output_lower.trim().is_empty() {
        return Err(BrandForgeError::transient_probe(domain, "Empty WHOIS response"));
    }

    let throttled_patterns = ["limit exceeded", "quota exceeded", "too many requests", "try again later"];
    if throttled_patterns.iter().any(|p| output_lower.contains(p)) {
        return Err(BrandForgeError::transient_probe(domain, "WHOIS server is rate limiting"));
    }

    let available_patterns = [
        "no match",
        "not found",
        "no entries found",
        "no data found",
        "domain not found",
        "not registered",
        "available for registration",
    ];

    let taken_patterns = [
        "registrar:",
        "creation date:",
        "created:",
        "registered:",
        "name server:",
        "nameserver:",
        "domain status:",
    ];

    let is_available = available_patterns.iter().any(|p| output_lower.contains(p));
    let is_taken = taken_patterns.iter().any(|p| output_lower.contains(p));

    if is_available && !is_taken {
        Ok(true)
    } else if is_taken {
        Ok(false)
    } else {
        Err(BrandForgeError::transient_probe(domain, "Ambiguous WHOIS response"))
    }
}

#[cfg(feature = "whois")]
fn parse_iana_whois_server(iana: &str) -> Option<String> {
    iana_field(iana, "whois:")
}

#[cfg(feature = "whois")]
fn parse_iana_refer_server(iana: &str) -> Option<String> {
    iana_field(iana, "refer:")
}

#[cfg(feature = "whois")]
fn iana_field(iana: &str, key: &str) -> Option<String> {
    iana.lines()
        .map(str::trim)
        .find_map(|line| {
            if line.to_lowercase().starts_with(key) {
                Some(line.splitn(2, ':').nth(1)?.trim().to_string())
            } else {
                None
            }
        })
        .filter(|s| !s.is_empty())
}

/// RDAP response structures
#[derive(Debug, Deserialize)]
struct RdapResponse {
    #[serde(default)]
    status: Vec<String>,
    #[serde(default)]
    entities: Vec<serde_json::Value>,
    #[serde(default)]
    events: Vec<serde_json::Value>,
    #[serde(default)]
    nameservers: Vec<serde_json::Value>,
}

impl RdapResponse {
    /// A successful reply carrying registration data means the domain is taken
    fn is_registered(&self) -> bool {
        !self.status.is_empty()
            || !self.entities.is_empty()
            || !self.events.is_empty()
            || !self.nameservers.is_empty()
    }
}
