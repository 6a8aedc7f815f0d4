//! Application configuration loaded from environment variables.
//!
//! Signing keys for the session cookie and the OAuth `state` parameter are
//! derived once at startup from `SECRET_KEY`.

use hkdf::Hkdf;
use sha2::Sha256;
use std::env;

const DEFAULT_SUAP_BASE_URL: &str = "https://suap.ifrn.edu.br";
const DEFAULT_OAUTH_SCOPE: &str = "identificacao email documentos_pessoais";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_SESSION_TTL_HOURS: i64 = 12;

const SESSION_KEY_INFO: &[u8] = b"suap-boletim session cookie v1";
const OAUTH_STATE_KEY_INFO: &[u8] = b"suap-boletim oauth state v1";

/// How the grade-report endpoint takes its period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoletimEndpointStyle {
    /// `minhas-informacoes/boletim/{year}/{term}/`
    Path,
    /// `minhas-informacoes/boletim/?ano_letivo={year}&periodo_letivo={term}`
    Query,
}

impl std::str::FromStr for BoletimEndpointStyle {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "path" => Ok(Self::Path),
            "query" => Ok(Self::Query),
            _ => Err(ConfigError::Invalid("BOLETIM_ENDPOINT_STYLE")),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// SUAP OAuth client ID
    pub suap_client_id: String,
    /// SUAP host, without trailing slash
    pub suap_base_url: String,
    /// Space-separated OAuth scopes
    pub oauth_scope: String,
    /// Externally visible origin of this app. Derived from `Host` when unset.
    pub public_url: Option<String>,
    /// Server port
    pub port: u16,
    /// Lifetime of a login session
    pub session_ttl_hours: i64,
    pub boletim_endpoint_style: BoletimEndpointStyle,

    // --- Secrets ---
    /// SUAP OAuth client secret
    pub suap_client_secret: String,
    /// HS256 key for session cookies (derived from SECRET_KEY)
    pub jwt_signing_key: Vec<u8>,
    /// HMAC key for the OAuth state parameter (derived from SECRET_KEY)
    pub oauth_state_key: Vec<u8>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let secret_key = env::var("SECRET_KEY").map_err(|_| ConfigError::Missing("SECRET_KEY"))?;
        if secret_key.trim().is_empty() {
            return Err(ConfigError::Invalid("SECRET_KEY"));
        }

        Ok(Self {
            suap_client_id: env::var("SUAP_CLIENT_ID")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("SUAP_CLIENT_ID"))?,
            suap_base_url: env::var("SUAP_BASE_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_SUAP_BASE_URL.to_string()),
            oauth_scope: env::var("OAUTH_SCOPE").unwrap_or_else(|_| DEFAULT_OAUTH_SCOPE.to_string()),
            public_url: env::var("PUBLIC_URL")
                .ok()
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .filter(|v| !v.is_empty()),
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .unwrap_or(DEFAULT_PORT),
            session_ttl_hours: env::var("SESSION_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|h: &i64| *h > 0)
                .unwrap_or(DEFAULT_SESSION_TTL_HOURS),
            boletim_endpoint_style: match env::var("BOLETIM_ENDPOINT_STYLE") {
                Ok(v) => v.parse()?,
                Err(_) => BoletimEndpointStyle::Path,
            },

            suap_client_secret: env::var("SUAP_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("SUAP_CLIENT_SECRET"))?,
            jwt_signing_key: derive_key(secret_key.as_bytes(), SESSION_KEY_INFO)?,
            oauth_state_key: derive_key(secret_key.as_bytes(), OAUTH_STATE_KEY_INFO)?,
        })
    }

    /// Config for tests, pointing at the real SUAP host.
    pub fn test_default() -> Self {
        let secret = b"test_secret_key_32_bytes_minimum";
        Self {
            suap_client_id: "test_client_id".to_string(),
            suap_base_url: DEFAULT_SUAP_BASE_URL.to_string(),
            oauth_scope: DEFAULT_OAUTH_SCOPE.to_string(),
            public_url: None,
            port: DEFAULT_PORT,
            session_ttl_hours: DEFAULT_SESSION_TTL_HOURS,
            boletim_endpoint_style: BoletimEndpointStyle::Path,
            suap_client_secret: "test_secret".to_string(),
            jwt_signing_key: derive_key(secret, SESSION_KEY_INFO).expect("32-byte HKDF output"),
            oauth_state_key: derive_key(secret, OAUTH_STATE_KEY_INFO).expect("32-byte HKDF output"),
        }
    }

    /// Point the config at another SUAP host (e.g. a mock server).
    pub fn with_suap_base_url(mut self, base_url: &str) -> Self {
        self.suap_base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// REST API root, with trailing slash.
    pub fn api_base_url(&self) -> String {
        format!("{}/api/v2/", self.suap_base_url)
    }

    pub fn authorize_url(&self) -> String {
        format!("{}/o/authorize/", self.suap_base_url)
    }

    pub fn token_url(&self) -> String {
        format!("{}/o/token/", self.suap_base_url)
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.session_ttl_hours)
    }
}

/// HKDF-SHA256 a 32-byte purpose-specific key out of the app secret.
fn derive_key(secret: &[u8], info: &[u8]) -> Result<Vec<u8>, ConfigError> {
    let mut okm = [0u8; 32];
    Hkdf::<Sha256>::new(None, secret)
        .expand(info, &mut okm)
        .map_err(|_| ConfigError::KeyDerivation)?;
    Ok(okm.to_vec())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),

    #[error("Failed to derive signing keys")]
    KeyDerivation,
}
