use jiff::{SignedDuration, Timestamp};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Purpose tag bound into every session token.
pub const TOKEN_PURPOSE: &str = "api_auth";

/// Signed payload of a session token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,
    /// Issued at (epoch seconds)
    pub iat: i64,
    /// Expiration time (epoch seconds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    /// What the token may be used for
    pub purpose: String,
}

impl Claims {
    /// Creates claims issued at `issued_at` and valid for `ttl`.
    pub fn new(
        subject: impl Into<String>,
        issued_at: Timestamp,
        ttl: SignedDuration,
        purpose: impl Into<String>,
    ) -> Self {
        let iat = issued_at.as_second();
        Self {
            sub: subject.into(),
            iat,
            exp: Some(iat.saturating_add(ttl.as_secs())),
            purpose: purpose.into(),
        }
    }

    /// Whether the claims have expired at `now`.
    ///
    /// A token is still valid at the exact second of `exp`. Claims without an
    /// expiration are treated as expired.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        match self.exp {
            Some(exp) => now.as_second() > exp,
            None => true,
        }
    }
}

/// HMAC-SHA256 signing keys derived from the server secret.
#[derive(Clone)]
pub struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKeys {
    pub fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

impl std::fmt::Debug for SigningKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningKeys(..)")
    }
}

/// Signs the claims into a compact token string.
pub fn encode_claims(
    claims: &Claims,
    keys: &SigningKeys,
) -> Result<String, jsonwebtoken::errors::Error> {
    encode(&Header::new(Algorithm::HS256), claims, &keys.encoding)
}

/// Verifies the signature and decodes the claims.
///
/// Expiry is not checked here. Callers compare `exp` against
/// their own clock so that "expired" and "invalid" stay distinguishable.
pub fn decode_claims(
    token: &str,
    keys: &SigningKeys,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    decode::<Claims>(token, &keys.decoding, &validation).map(|data| data.claims)
}
