use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{1,}\b").unwrap()
});

// JWT segments and cookie signatures are base64url runs.
static TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"[A-Za-z0-9_\-+/=]{16,}").unwrap()
});

/// Masks emails (first character of the local part is kept) and replaces
/// opaque token runs of 16+ characters with `[REDACTED_TOKEN]`.
pub fn redact(input: &str) -> String {
    let emails = EMAIL_REGEX.replace_all(input, |caps: &regex::Captures| {
        let full = &caps[0];
        match full.find('@') {
            Some(0) | None => full.to_string(),
            Some(at) => {
                let first = &full[..1];
                format!("{first}***{}", &full[at..])
            }
        }
    });

    TOKEN_REGEX
        .replace_all(&emails, "[REDACTED_TOKEN]")
        .to_string()
}

/// Redacts its contents when formatted, for use in log fields.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", redact(self.0))
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", redact(self.0))
    }
}
