use std::fmt;

use actix_web::cookie::Key;
use jsonwebtoken::Algorithm;

use crate::auth::ttl::TokenTtl;
use crate::error::AppError;

/// Default name of the signed cookie carrying the session token.
pub const DEFAULT_COOKIE_NAME: &str = "auth_token";

/// Minimum length of the cookie secret; the signing key is derived from it.
pub const MIN_COOKIE_SECRET_LEN: usize = 32;

/// Token and cookie signing settings shared by the issuer and the gate.
///
/// Built once at startup and read-only afterwards. Both secrets are checked
/// at construction, so a value of this type always holds usable keys.
#[derive(Clone)]
pub struct SecurityConfig {
    jwt_secret: Vec<u8>,
    algorithm: Algorithm,
    cookie_key: Key,
    cookie_name: String,
    cookie_domain: Option<String>,
    token_ttl: TokenTtl,
}

impl SecurityConfig {
    /// Cookie secret for tests; long enough for key derivation.
    pub const TEST_COOKIE_SECRET: &'static [u8] =
        b"test-cookie-secret-0123456789abcdef0123456789abcdef";

    /// Create a SecurityConfig from the token secret and the cookie secret.
    ///
    /// Fails with `AppError::Config` when the token secret is empty or the
    /// cookie secret is shorter than `MIN_COOKIE_SECRET_LEN` bytes.
    pub fn new(
        jwt_secret: impl Into<Vec<u8>>,
        cookie_secret: impl AsRef<[u8]>,
    ) -> Result<Self, AppError> {
        let jwt_secret = jwt_secret.into();
        if jwt_secret.iter().all(u8::is_ascii_whitespace) {
            return Err(AppError::config("JWT signing secret is missing or empty"));
        }

        let cookie_secret = cookie_secret.as_ref();
        if cookie_secret.len() < MIN_COOKIE_SECRET_LEN {
            return Err(AppError::config(format!(
                "cookie secret must be at least {MIN_COOKIE_SECRET_LEN} bytes"
            )));
        }

        Ok(Self {
            jwt_secret,
            algorithm: Algorithm::HS256,
            cookie_key: Key::derive_from(cookie_secret),
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            cookie_domain: None,
            token_ttl: TokenTtl::default(),
        })
    }

    /// Config with a fixed token secret and the test cookie secret.
    pub fn for_tests(jwt_secret: &str) -> Self {
        match Self::new(jwt_secret.as_bytes(), Self::TEST_COOKIE_SECRET) {
            Ok(config) => config,
            Err(e) => panic!("invalid test security config: {e}"),
        }
    }

    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }

    pub fn with_cookie_domain(mut self, domain: Option<String>) -> Self {
        self.cookie_domain = domain;
        self
    }

    pub fn with_token_ttl(mut self, ttl: TokenTtl) -> Self {
        self.token_ttl = ttl;
        self
    }

    pub fn jwt_secret(&self) -> &[u8] {
        &self.jwt_secret
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn cookie_key(&self) -> &Key {
        &self.cookie_key
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn cookie_domain(&self) -> Option<&str> {
        self.cookie_domain.as_deref()
    }

    pub fn token_ttl(&self) -> TokenTtl {
        self.token_ttl
    }
}

impl fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("algorithm", &self.algorithm)
            .field("cookie_key", &"[REDACTED]")
            .field("cookie_name", &self.cookie_name)
            .field("cookie_domain", &self.cookie_domain)
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}
