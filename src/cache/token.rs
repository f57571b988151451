use crate::helpers::time::now_i64;

/// Bearer token and the absolute instant (unix seconds) after which it is
/// no longer handed out.
#[derive(Debug, Clone)]
pub struct Token {
    access_token: String,
    expires_at: i64,
}

impl Token {
    /// `expires_in` is the lifetime reported by the token endpoint.
    ///
    /// The safety margin is subtracted so a token is refreshed before a slow
    /// request could reach the server with it already expired. The margin never
    /// exceeds half of a positive lifetime: a freshly issued token is valid.
    pub fn new(access_token: String, expires_in: i64, safety_margin_seconds: u64) -> Self {
        let margin = if expires_in > 0 {
            (safety_margin_seconds as i64).min(expires_in / 2)
        } else {
            0
        };
        Self {
            access_token,
            expires_at: now_i64() + expires_in - margin,
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Unix timestamp (seconds)
    pub fn expires_at(&self) -> i64 {
        self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        now_i64() >= self.expires_at
    }
}
