//! Token lifetime parsing.
//!
//! Accepts either a bare number of seconds (`"900"`) or a number followed by
//! a unit: `ms`, `s`, `m`, `h`, `d`, `w` (`"15m"`, `"7d"`). Whitespace between
//! the number and the unit is allowed.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::AppError;
use crate::errors::ErrorCode;

/// Longest lifetime the service will issue tokens with.
pub const MAX_TOKEN_TTL: TokenTtl = TokenTtl::from_secs(365 * 24 * 60 * 60);

/// Validity window embedded into issued tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenTtl(Duration);

impl TokenTtl {
    pub const fn from_secs(secs: u64) -> Self {
        Self(Duration::from_secs(secs))
    }

    pub const fn as_duration(&self) -> Duration {
        self.0
    }

    /// Whole seconds; sub-second remainders are dropped.
    pub const fn as_secs(&self) -> u64 {
        self.0.as_secs()
    }
}

impl Default for TokenTtl {
    fn default() -> Self {
        Self::from_secs(7 * 24 * 60 * 60)
    }
}

impl From<Duration> for TokenTtl {
    fn from(d: Duration) -> Self {
        Self(d)
    }
}

impl fmt::Display for TokenTtl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.as_secs())
    }
}

impl FromStr for TokenTtl {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AppError::bad_request(ErrorCode::BadRequest, format!("invalid ttl '{s}'"));

        let trimmed = s.trim();
        let split = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        let (digits, unit) = trimmed.split_at(split);
        if digits.is_empty() {
            return Err(invalid());
        }
        let amount: u64 = digits.parse().map_err(|_| invalid())?;

        let millis_per_unit: u64 = match unit.trim_start() {
            "" | "s" => 1_000,
            "ms" => 1,
            "m" => 60 * 1_000,
            "h" => 60 * 60 * 1_000,
            "d" => 24 * 60 * 60 * 1_000,
            "w" => 7 * 24 * 60 * 60 * 1_000,
            _ => return Err(invalid()),
        };

        let millis = amount.checked_mul(millis_per_unit).ok_or_else(invalid)?;
        Ok(Self(Duration::from_millis(millis)))
    }
}
