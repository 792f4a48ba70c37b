//! JWT issuing and verification

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id, stringified
    pub sub: String,
    pub username: String,
    /// Expiry, seconds since epoch
    pub exp: i64,
    /// Issued at, seconds since epoch
    pub iat: i64,
}

pub struct JwtUtil {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expires_in: i64,
}

impl JwtUtil {
    /// `expires_in` accepts "24h", "30m", "7d" or a plain number of
    /// seconds; anything unparseable falls back to 24 hours.
    pub fn new(secret: &str, expires_in: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expires_in: parse_expires_in(expires_in),
        }
    }

    pub fn generate_token(
        &self,
        user_id: i64,
        username: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            exp: now + self.expires_in,
            iat: now,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())?;
        Ok(data.claims)
    }
}

fn parse_expires_in(value: &str) -> i64 {
    const DEFAULT_SECS: i64 = 24 * 3600;

    let value = value.trim();
    if let Ok(secs) = value.parse::<i64>() {
        return secs;
    }

    let (number, unit) = value.split_at(value.len().saturating_sub(1));
    let Ok(number) = number.parse::<i64>() else {
        return DEFAULT_SECS;
    };

    match unit {
        "s" => number,
        "m" => number * 60,
        "h" => number * 3600,
        "d" => number * 24 * 3600,
        _ => DEFAULT_SECS,
    }
}
