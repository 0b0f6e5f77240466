//! Runtime configuration for the directory service.

use std::str::FromStr;
use std::time::Duration;

/// Default upstream listing page.
pub const DEFAULT_BASE_URL: &str = "https://quixada.ce.gov.br/unidadesaude.php";

const DEFAULT_TTL_SECS: u64 = 21_600;
const DEFAULT_TIMEOUT_SECS: u64 = 20;
const DEFAULT_PACING_MS: u64 = 400;
const DEFAULT_MIN_RECORDS: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// What the cache serves when a refresh fails.
///
/// The mode is fixed at construction time and uniform for a deployment;
/// callers depend on predictable availability semantics.
pub enum FallbackMode {
    /// Serve stale or static data without surfacing an error.
    #[default]
    Silent,
    /// Propagate a `ServiceUnavailable` error; never serve stale data.
    Strict,
}

impl FromStr for FallbackMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "silent" => Ok(FallbackMode::Silent),
            "strict" => Ok(FallbackMode::Strict),
            other => Err(format!("unknown fallback mode: {other}")),
        }
    }
}

#[derive(Debug, Clone)]
/// Recognized options for the extraction pipeline and cache.
pub struct DirectoryConfig {
    /// Upstream listing page; detail pages live at `{base_url}?id={id}`.
    pub base_url: String,
    /// Timeout applied to every upstream request.
    pub request_timeout: Duration,
    /// Pause between consecutive detail-page fetches.
    pub detail_pacing: Duration,
    /// How long a snapshot is served before a refresh is attempted.
    pub ttl: Duration,
    /// Plausibility floor: refreshes yielding fewer records are failures.
    pub min_records: usize,
    /// Behavior when a refresh fails.
    pub fallback_mode: FallbackMode,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            detail_pacing: Duration::from_millis(DEFAULT_PACING_MS),
            ttl: Duration::from_secs(DEFAULT_TTL_SECS),
            min_records: DEFAULT_MIN_RECORDS,
            fallback_mode: FallbackMode::Silent,
        }
    }
}

impl DirectoryConfig {
    /// Build a configuration from `GUIASAUDE_*` environment variables,
    /// falling back to defaults for anything unset or unparseable.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("GUIASAUDE_BASE_URL").unwrap_or(defaults.base_url),
            request_timeout: env_secs("GUIASAUDE_TIMEOUT_SECS")
                .unwrap_or(defaults.request_timeout),
            detail_pacing: env_millis("GUIASAUDE_PACING_MS").unwrap_or(defaults.detail_pacing),
            ttl: env_secs("GUIASAUDE_TTL_SECS").unwrap_or(defaults.ttl),
            min_records: env_parse("GUIASAUDE_MIN_RECORDS").unwrap_or(defaults.min_records),
            fallback_mode: env_parse("GUIASAUDE_FALLBACK_MODE").unwrap_or(defaults.fallback_mode),
        }
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    let parsed = raw.trim().parse().ok();
    if parsed.is_none() {
        tracing::warn!(key, value = %raw, "ignoring unparseable environment variable");
    }
    parsed
}

fn env_secs(key: &str) -> Option<Duration> {
    env_parse(key).map(Duration::from_secs)
}

fn env_millis(key: &str) -> Option<Duration> {
    env_parse(key).map(Duration::from_millis)
}
