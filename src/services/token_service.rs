//! Stateless session tokens.
//!
//! A token is an HS256-signed JWT carrying the subject, issue time, expiry and
//! a purpose tag. Nothing is stored server-side: expiry is the only way a
//! token stops being valid.

use jiff::SignedDuration;
use thiserror::Error;

use crate::config::settings::TokenConfig;
use crate::utils::clock::SharedClock;
use crate::utils::jwt::{Claims, SigningKeys, decode_claims, encode_claims};

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token subject must not be empty")]
    EmptySubject,

    #[error("Token is invalid")]
    InvalidToken,

    #[error("Token has expired")]
    Expired,

    #[error("Failed to sign token")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

#[derive(Clone)]
pub struct TokenService {
    keys: SigningKeys,
    ttl: SignedDuration,
    purpose: String,
    clock: SharedClock,
}

impl TokenService {
    pub fn new(config: &TokenConfig, clock: SharedClock) -> Self {
        Self {
            keys: SigningKeys::from_secret(&config.secret),
            ttl: config.ttl(),
            purpose: config.purpose.clone(),
            clock,
        }
    }

    /// Lifetime of newly issued tokens.
    pub fn ttl(&self) -> SignedDuration {
        self.ttl
    }

    /// Mint a token for `subject`, valid from now until now + ttl.
    pub fn issue(&self, subject: &str) -> Result<String, TokenError> {
        if subject.trim().is_empty() {
            return Err(TokenError::EmptySubject);
        }

        let claims = Claims::new(subject, self.clock.now(), self.ttl, self.purpose.as_str());
        encode_claims(&claims, &self.keys).map_err(TokenError::Signing)
    }

    /// Check signature, purpose and expiry, returning the claims if all pass.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let claims = self.decode(token)?;
        if claims.is_expired_at(self.clock.now()) {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }

    /// Whether an authentic token has passed its expiry.
    ///
    /// Returns `Err(InvalidToken)` when authenticity cannot be established,
    /// so callers can tell "expired" apart from "forged or garbled".
    pub fn is_expired(&self, token: &str) -> Result<bool, TokenError> {
        let claims = self.decode(token)?;
        Ok(claims.is_expired_at(self.clock.now()))
    }

    fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        if token.is_empty() {
            return Err(TokenError::InvalidToken);
        }

        let claims = decode_claims(token, &self.keys).map_err(|_| TokenError::InvalidToken)?;
        if claims.purpose != self.purpose {
            return Err(TokenError::InvalidToken);
        }
        Ok(claims)
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl", &self.ttl)
            .field("purpose", &self.purpose)
            .finish_non_exhaustive()
    }
}
