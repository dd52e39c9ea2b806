use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use crate::accounts::repo_types::Account;
use crate::config::JwtConfig;
use crate::state::AppState;

#[derive(Debug, Error)]
pub enum TokenError {
    /// Bad signature, malformed token, expired, or wrong issuer/audience.
    #[error("invalid or expired token")]
    Invalid,

    /// Signature and expiry were fine but the subject is not an account id.
    #[error("token subject is not an account id")]
    MalformedSubject,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(_: jsonwebtoken::errors::Error) -> Self {
        TokenError::Invalid
    }
}

/// JWT payload. `sub` carries the account id as a string per JWT
/// convention; `username` and `email` ride along as extra claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
    pub iss: String,
    pub aud: String,
    pub username: String,
    pub email: Option<String>,
}

#[derive(Debug)]
pub struct DecodedToken {
    pub account_id: i64,
    pub claims: Claims,
}

/// Holds JWT signing and verification keys with config data.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
    pub ttl: Duration,
}

impl JwtKeys {
    pub fn new(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            ttl: Duration::from_secs((cfg.ttl_minutes as u64) * 60),
        }
    }

    pub fn issue(&self, account: &Account) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = Claims {
            sub: account.id.to_string(),
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            username: account.username.clone(),
            email: account.email.clone(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(account_id = account.id, "jwt signed");
        Ok(token)
    }

    pub fn decode(&self, token: &str) -> Result<DecodedToken, TokenError> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        let account_id = data
            .claims
            .sub
            .parse::<i64>()
            .map_err(|_| TokenError::MalformedSubject)?;
        debug!(account_id, "jwt verified");
        Ok(DecodedToken {
            account_id,
            claims: data.claims,
        })
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        Self::new(&state.config.jwt)
    }
}
