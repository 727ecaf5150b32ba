use ink_core::guard::DEFAULT_SESSION_TIMEOUT_SECS;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development. In production,
/// override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub session: SessionConfig,
    /// Bound of the activity log channel (default: `1024`).
    pub activity_channel_capacity: usize,
    /// Initial admin account, created at startup when no admin exists.
    pub admin: Option<AdminBootstrap>,
}

/// Session timeout and cookie settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Sliding idle timeout in seconds (default: `7200`).
    pub timeout_secs: i64,
    /// Name of the session cookie (default: `ink_session`).
    pub cookie_name: String,
    /// Add the `Secure` attribute to the cookie (default: `false`).
    pub cookie_secure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_SESSION_TIMEOUT_SECS,
            cookie_name: "ink_session".to_string(),
            cookie_secure: false,
        }
    }
}

#[derive(Clone)]
pub struct AdminBootstrap {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for AdminBootstrap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminBootstrap")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default       |
    /// |-----------------------------|---------------|
    /// | `HOST`                      | `0.0.0.0`     |
    /// | `PORT`                      | `3000`        |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`          |
    /// | `SESSION_TIMEOUT_SECS`      | `7200`        |
    /// | `SESSION_COOKIE_NAME`       | `ink_session` |
    /// | `SESSION_COOKIE_SECURE`     | `false`       |
    /// | `ACTIVITY_CHANNEL_CAPACITY` | `1024`        |
    /// | `ADMIN_NAME`                | unset         |
    /// | `ADMIN_EMAIL`               | unset         |
    /// | `ADMIN_PASSWORD`            | unset         |
    ///
    /// Panics on malformed values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let timeout_secs: i64 = std::env::var("SESSION_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_SESSION_TIMEOUT_SECS.to_string())
            .parse()
            .expect("SESSION_TIMEOUT_SECS must be a valid i64");
        assert!(timeout_secs > 0, "SESSION_TIMEOUT_SECS must be positive");

        let cookie_name =
            std::env::var("SESSION_COOKIE_NAME").unwrap_or_else(|_| "ink_session".into());

        let cookie_secure: bool = std::env::var("SESSION_COOKIE_SECURE")
            .unwrap_or_else(|_| "false".into())
            .parse()
            .expect("SESSION_COOKIE_SECURE must be true or false");

        let activity_channel_capacity: usize = std::env::var("ACTIVITY_CHANNEL_CAPACITY")
            .unwrap_or_else(|_| "1024".into())
            .parse()
            .expect("ACTIVITY_CHANNEL_CAPACITY must be a valid usize");
        assert!(
            activity_channel_capacity > 0,
            "ACTIVITY_CHANNEL_CAPACITY must be positive"
        );

        let admin = match (
            std::env::var("ADMIN_NAME"),
            std::env::var("ADMIN_EMAIL"),
            std::env::var("ADMIN_PASSWORD"),
        ) {
            (Ok(name), Ok(email), Ok(password)) => Some(AdminBootstrap {
                name,
                email,
                password,
            }),
            _ => None,
        };

        Self {
            host,
            port,
            request_timeout_secs,
            session: SessionConfig {
                timeout_secs,
                cookie_name,
                cookie_secure,
            },
            activity_channel_capacity,
            admin,
        }
    }
}
