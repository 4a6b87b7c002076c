use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_aux::prelude::deserialize_vec_from_string_or_vec;

/// Conventional upstream key variables accepted alongside `CR_API_KEYS__*`.
const RAW_KEY_VARS: &[(&str, &str)] = &[
    ("CONGRESS_API_KEY", "api_keys.congress"),
    ("OPENSTATES_API_KEY", "api_keys.openstates"),
    ("FEC_API_KEY", "api_keys.fec"),
    ("GOVINFO_API_KEY", "api_keys.govinfo"),
    ("GEOCODIO_API_KEY", "api_keys.geocoder"),
    ("LLM_API_KEY", "api_keys.llm"),
];

/// Application configuration loaded from multiple sources.
///
/// Configuration is loaded in priority order (lowest to highest):
/// 1. Struct defaults
/// 2. config.yaml file (if exists)
/// 3. Raw upstream key variables (`CONGRESS_API_KEY`, ...)
/// 4. Environment variables with CR_ prefix (always wins)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub security_headers: SecurityHeadersConfig,
    #[serde(default)]
    pub swagger: SwaggerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub api_keys: ApiKeysConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// HTTP server bind address.
    #[serde(default = "default_host")]
    pub host: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level filter (debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorsConfig {
    /// Allowed origins for CORS requests.
    /// The directory is public, so the default is `"*"`.
    /// Accepts either an array or comma-separated string.
    #[serde(
        default = "default_allowed_origins",
        deserialize_with = "deserialize_origins"
    )]
    pub allowed_origins: Vec<String>,
}

/// Deserialize origins from comma-separated string or array, filtering empty values.
fn deserialize_origins<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let origins: Vec<String> = deserialize_vec_from_string_or_vec(deserializer)?;
    Ok(origins.into_iter().filter(|s| !s.is_empty()).collect())
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SecurityHeadersConfig {
    /// Enable security headers (default: true).
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Enable HSTS header (default: false, enable in production with HTTPS).
    #[serde(default)]
    pub hsts_enabled: bool,

    /// HSTS max-age in seconds (default: 31536000 = 1 year).
    #[serde(default = "default_hsts_max_age")]
    pub hsts_max_age: u64,

    /// Include subdomains in HSTS (default: true).
    #[serde(default = "default_true")]
    pub hsts_include_subdomains: bool,

    /// X-Frame-Options value: "DENY" or "SAMEORIGIN" (default: "DENY").
    #[serde(default = "default_frame_options")]
    pub frame_options: String,

    /// Content-Security-Policy header value.
    #[serde(default = "default_csp")]
    pub content_security_policy: String,

    /// Referrer-Policy header value (default: "strict-origin-when-cross-origin").
    #[serde(default = "default_referrer_policy")]
    pub referrer_policy: String,
}

impl Default for SecurityHeadersConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            hsts_enabled: false,
            hsts_max_age: default_hsts_max_age(),
            hsts_include_subdomains: default_true(),
            frame_options: default_frame_options(),
            content_security_policy: default_csp(),
            referrer_policy: default_referrer_policy(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SwaggerConfig {
    /// Enable Swagger UI at /swagger-ui.
    /// Enable in development via `CR_SWAGGER__ENABLED=true`
    #[serde(default)]
    pub enabled: bool,
}

/// Base URLs of the upstream data APIs.
///
/// Overridable so integration tests and staging can point at stubs.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_congress_url")]
    pub congress_url: String,
    #[serde(default = "default_openstates_url")]
    pub openstates_url: String,
    #[serde(default = "default_fec_url")]
    pub fec_url: String,
    #[serde(default = "default_govinfo_url")]
    pub govinfo_url: String,
    #[serde(default = "default_geocoder_url")]
    pub geocoder_url: String,
    #[serde(default = "default_llm_url")]
    pub llm_url: String,
    /// Per-request timeout applied to every upstream call, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            congress_url: default_congress_url(),
            openstates_url: default_openstates_url(),
            fec_url: default_fec_url(),
            govinfo_url: default_govinfo_url(),
            geocoder_url: default_geocoder_url(),
            llm_url: default_llm_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl UpstreamConfig {
    fn urls(&self) -> [(&'static str, &str); 6] {
        [
            ("upstream.congress_url", &self.congress_url),
            ("upstream.openstates_url", &self.openstates_url),
            ("upstream.fec_url", &self.fec_url),
            ("upstream.govinfo_url", &self.govinfo_url),
            ("upstream.geocoder_url", &self.geocoder_url),
            ("upstream.llm_url", &self.llm_url),
        ]
    }
}

/// Upstream credentials. Every key is optional at load time; handlers
/// decide whether a missing key is fatal or degrades a field.
#[derive(Clone, Default, Deserialize, Serialize)]
pub struct ApiKeysConfig {
    pub congress: Option<String>,
    pub openstates: Option<String>,
    pub fec: Option<String>,
    pub govinfo: Option<String>,
    pub geocoder: Option<String>,
    pub llm: Option<String>,
}

impl ApiKeysConfig {
    /// Treat blank values the same as unset.
    fn present(key: Option<&String>) -> Option<&str> {
        key.map(|k| k.trim()).filter(|k| !k.is_empty())
    }

    #[must_use]
    pub fn congress(&self) -> Option<&str> {
        Self::present(self.congress.as_ref())
    }

    #[must_use]
    pub fn openstates(&self) -> Option<&str> {
        Self::present(self.openstates.as_ref())
    }

    #[must_use]
    pub fn fec(&self) -> Option<&str> {
        Self::present(self.fec.as_ref())
    }

    #[must_use]
    pub fn govinfo(&self) -> Option<&str> {
        Self::present(self.govinfo.as_ref())
    }

    #[must_use]
    pub fn geocoder(&self) -> Option<&str> {
        Self::present(self.geocoder.as_ref())
    }

    #[must_use]
    pub fn llm(&self) -> Option<&str> {
        Self::present(self.llm.as_ref())
    }
}

// Never print secrets, only whether they are set.
impl std::fmt::Debug for ApiKeysConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeysConfig")
            .field("congress", &self.congress().is_some())
            .field("openstates", &self.openstates().is_some())
            .field("fec", &self.fec().is_some())
            .field("govinfo", &self.govinfo().is_some())
            .field("geocoder", &self.geocoder().is_some())
            .field("llm", &self.llm().is_some())
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    /// Model identifier passed to the gateway.
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// Completion budget per answer.
    #[serde(default = "default_llm_max_tokens")]
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_llm_model(),
            max_tokens: default_llm_max_tokens(),
        }
    }
}

// These functions cannot be const because serde uses function pointers for defaults
#[allow(clippy::missing_const_for_fn)]
fn default_port() -> u16 {
    8080
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

#[allow(clippy::missing_const_for_fn)]
fn default_true() -> bool {
    true
}

#[allow(clippy::missing_const_for_fn)]
fn default_hsts_max_age() -> u64 {
    31_536_000 // 1 year
}

fn default_frame_options() -> String {
    "DENY".to_string()
}

fn default_csp() -> String {
    "default-src 'self'".to_string()
}

fn default_referrer_policy() -> String {
    "strict-origin-when-cross-origin".to_string()
}

fn default_congress_url() -> String {
    "https://api.congress.gov/v3".to_string()
}

fn default_openstates_url() -> String {
    "https://v3.openstates.org".to_string()
}

fn default_fec_url() -> String {
    "https://api.open.fec.gov/v1".to_string()
}

fn default_govinfo_url() -> String {
    "https://api.govinfo.gov".to_string()
}

fn default_geocoder_url() -> String {
    "https://api.geocod.io/v1.7".to_string()
}

fn default_llm_url() -> String {
    "https://api.openai.com/v1".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_timeout_secs() -> u64 {
    15
}

fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_llm_max_tokens() -> u32 {
    600
}

/// Configuration loading and validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    /// Returns an error if configuration cannot be loaded or is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config.yaml")
    }

    /// Load configuration with a custom YAML file path.
    ///
    /// # Errors
    /// Returns an error if configuration cannot be loaded or is invalid.
    pub fn load_from(yaml_path: &str) -> Result<Self, ConfigError> {
        let config: Self = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Yaml::file(yaml_path))
            .merge(raw_key_vars())
            .merge(Env::prefixed("CR_").split("__"))
            .extract()?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    /// Returns an error if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("server.port cannot be 0".into()));
        }

        // CORS origins must be valid URLs or "*"
        for origin in &self.cors.allowed_origins {
            if origin != "*" && !is_http_url(origin) {
                return Err(ConfigError::Validation(format!(
                    "cors.allowed_origins contains invalid origin '{origin}'. Must be '*' or start with http:// or https://"
                )));
            }
        }

        let frame_opts = self.security_headers.frame_options.to_uppercase();
        if frame_opts != "DENY" && frame_opts != "SAMEORIGIN" {
            return Err(ConfigError::Validation(format!(
                "security_headers.frame_options must be 'DENY' or 'SAMEORIGIN', got: '{}'",
                self.security_headers.frame_options
            )));
        }

        for (field, url) in self.upstream.urls() {
            if !is_http_url(url) {
                return Err(ConfigError::Validation(format!(
                    "{field} must start with http:// or https://, got: '{url}'"
                )));
            }
        }

        if self.upstream.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "upstream.timeout_secs cannot be 0".into(),
            ));
        }

        if self.llm.max_tokens == 0 {
            return Err(ConfigError::Validation("llm.max_tokens cannot be 0".into()));
        }

        Ok(())
    }
}

fn raw_key_vars() -> Env {
    Env::raw().filter_map(|key| {
        RAW_KEY_VARS
            .iter()
            .find(|(var, _)| key.as_str().eq_ignore_ascii_case(var))
            .map(|(_, path)| (*path).into())
    })
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.cors.allowed_origins, vec!["*".to_string()]);
        assert_eq!(config.upstream.congress_url, "https://api.congress.gov/v3");
        assert_eq!(config.upstream.timeout_secs, 15);
        assert!(config.api_keys.congress().is_none());
        assert!(!config.swagger.enabled);
    }

    #[test]
    fn test_validation_accepts_default_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        let mut config = Config::default();
        config.api_keys.fec = Some("   ".into());
        config.api_keys.congress = Some("abc".into());
        assert!(config.api_keys.fec().is_none());
        assert_eq!(config.api_keys.congress(), Some("abc"));
    }

    #[test]
    fn test_api_keys_debug_hides_values() {
        let keys = ApiKeysConfig {
            congress: Some("super-secret".into()),
            ..ApiKeysConfig::default()
        };
        let rendered = format!("{keys:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("congress: true"));
    }

    #[test]
    fn test_cors_deserialize_comma_separated_string() {
        let json = r#"{"allowed_origins": "http://localhost:5173,https://app.example.com"}"#;
        let config: CorsConfig = serde_json::from_str(json).expect("should parse");
        assert_eq!(config.allowed_origins.len(), 2);
        assert_eq!(config.allowed_origins[0], "http://localhost:5173");
        assert_eq!(config.allowed_origins[1], "https://app.example.com");
    }

    #[test]
    fn test_cors_deserialize_empty_string() {
        let json = r#"{"allowed_origins": ""}"#;
        let config: CorsConfig = serde_json::from_str(json).expect("should parse");
        assert!(config.allowed_origins.is_empty());
    }

    #[test]
    fn test_validation_rejects_non_http_upstream() {
        let mut config = Config::default();
        config.upstream.geocoder_url = "ftp://geo.example.com".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("upstream.geocoder_url"));
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let mut config = Config::default();
        config.upstream.timeout_secs = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn test_load_reads_raw_and_prefixed_keys() {
        Jail::expect_with(|jail| {
            jail.set_env("CONGRESS_API_KEY", "raw-congress");
            jail.set_env("FEC_API_KEY", "raw-fec");
            jail.set_env("CR_API_KEYS__FEC", "prefixed-fec");
            jail.set_env("CR_SERVER__PORT", "9090");

            let config = Config::load_from("missing.yaml").expect("config loads");
            assert_eq!(config.api_keys.congress(), Some("raw-congress"));
            // CR_ prefix wins over the raw variable
            assert_eq!(config.api_keys.fec(), Some("prefixed-fec"));
            assert!(config.api_keys.openstates().is_none());
            assert_eq!(config.server.port, 9090);
            Ok(())
        });
    }

    #[test]
    fn test_load_reads_yaml_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "roster.yaml",
                r"
logging:
  level: debug
cors:
  allowed_origins:
    - https://roster.example.org
llm:
  model: small-model
",
            )?;

            let config = Config::load_from("roster.yaml").expect("config loads");
            assert_eq!(config.logging.level, "debug");
            assert_eq!(
                config.cors.allowed_origins,
                vec!["https://roster.example.org".to_string()]
            );
            assert_eq!(config.llm.model, "small-model");
            assert_eq!(config.llm.max_tokens, 600);
            Ok(())
        });
    }

    // Table-driven boundary tests for validation rules

    #[test]
    fn port_boundaries() {
        let cases = [
            (0u16, false, "zero port"),
            (1, true, "minimum valid port"),
            (8080, true, "default port"),
            (65535, true, "maximum port"),
        ];

        for (port, should_pass, desc) in cases {
            let mut config = Config::default();
            config.server.port = port;
            let result = config.validate();
            assert_eq!(result.is_ok(), should_pass, "case '{}': {:?}", desc, result);
        }
    }

    #[test]
    fn cors_origin_boundaries() {
        let cases = [
            (vec!["*"], true, "wildcard"),
            (vec!["http://localhost"], true, "http localhost"),
            (vec!["https://example.com"], true, "https domain"),
            (vec![], true, "empty list"),
            (vec!["ftp://files.com"], false, "ftp scheme"),
            (vec!["localhost"], false, "no scheme"),
        ];

        for (origins, should_pass, desc) in cases {
            let mut config = Config::default();
            config.cors.allowed_origins = origins.into_iter().map(String::from).collect();
            let result = config.validate();
            assert_eq!(result.is_ok(), should_pass, "case '{}': {:?}", desc, result);
        }
    }

    #[test]
    fn frame_options_boundaries() {
        let cases = [
            ("DENY", true, "uppercase DENY"),
            ("sameorigin", true, "lowercase sameorigin"),
            ("ALLOW-FROM", false, "deprecated ALLOW-FROM"),
            ("", false, "empty string"),
        ];

        for (value, should_pass, desc) in cases {
            let mut config = Config::default();
            config.security_headers.frame_options = value.into();
            let result = config.validate();
            assert_eq!(result.is_ok(), should_pass, "case '{}': {:?}", desc, result);
        }
    }
}
