use shared::KeyScheme;

/// Mock endpoint configuration
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | ROSTER_MOCK_PORT | 4001 | HTTP port |
/// | ROSTER_MOCK_KEY_SCHEME | id | `id` or `user_name` |
/// | ROSTER_MOCK_TOKEN | (none) | Require this bearer token |
#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub key_scheme: KeyScheme,
    pub token: Option<String>,
}

impl Config {
    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            http_port: std::env::var("ROSTER_MOCK_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(4001),
            key_scheme: std::env::var("ROSTER_MOCK_KEY_SCHEME")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
            token: std::env::var("ROSTER_MOCK_TOKEN")
                .ok()
                .filter(|t| !t.is_empty()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_port: 4001,
            key_scheme: KeyScheme::Id,
            token: None,
        }
    }
}
