//! Sign-up, login and session token service

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};
use thiserror::Error;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{session::IssuedToken, Author, SessionClaims, SignUp},
    repository::{
        credentials::hash_secret,
        keys::{normalize, Identity},
        Repository,
    },
};

/// Why a token was refused. Never shown to clients.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("token expired")]
    Expired,
    #[error("invalid token signature")]
    SignatureInvalid,
    #[error("token is missing a required claim")]
    MissingClaim,
    #[error("session revoked or unknown")]
    Revoked,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;
        match e.kind() {
            ErrorKind::InvalidSignature => TokenError::SignatureInvalid,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::MissingRequiredClaim(_) => TokenError::MissingClaim,
            _ => TokenError::Malformed,
        }
    }
}

struct LiveSession {
    author: Identity,
    exp: i64,
}

/// Sessions issued by this process. A token whose id is not listed here is
/// refused even when its signature and expiry are fine.
#[derive(Default)]
struct SessionLedger {
    sessions: HashMap<String, LiveSession>,
    by_author: HashMap<Identity, HashSet<String>>,
}

impl SessionLedger {
    fn insert(&mut self, jti: String, author: Identity, exp: i64) {
        self.by_author
            .entry(author.clone())
            .or_default()
            .insert(jti.clone());
        self.sessions.insert(jti, LiveSession { author, exp });
    }

    fn is_live(&self, jti: &str, author: &Identity) -> bool {
        self.sessions
            .get(jti)
            .map(|session| &session.author == author)
            .unwrap_or(false)
    }

    fn remove(&mut self, jti: &str) -> bool {
        let Some(session) = self.sessions.remove(jti) else {
            return false;
        };
        if let Some(ids) = self.by_author.get_mut(&session.author) {
            ids.remove(jti);
            if ids.is_empty() {
                self.by_author.remove(&session.author);
            }
        }
        true
    }

    fn remove_author(&mut self, author: &Identity) -> usize {
        let ids = self.by_author.remove(author).unwrap_or_default();
        for jti in &ids {
            self.sessions.remove(jti);
        }
        ids.len()
    }

    fn prune(&mut self, now: i64) {
        let expired: Vec<String> = self
            .sessions
            .iter()
            .filter(|(_, session)| session.exp <= now)
            .map(|(jti, _)| jti.clone())
            .collect();
        for jti in expired {
            self.remove(&jti);
        }
    }
}

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
    ledger: Arc<Mutex<SessionLedger>>,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self {
            repository,
            config,
            ledger: Arc::new(Mutex::new(SessionLedger::default())),
        }
    }

    /// Register a new author with a hashed secret
    pub fn sign_up(&self, request: SignUp) -> AppResult<Author> {
        request.validate()?;
        let (author, password) = request.into_parts();
        let secret_hash = hash_secret(&password)?;

        let identity = self.repository.register_author(author.clone(), secret_hash)?;
        tracing::info!(author = %identity, "Author registered");
        Ok(author)
    }

    /// Check credentials and issue a session token
    pub fn authenticate(&self, username: &str, password: &str) -> AppResult<IssuedToken> {
        let identity = self
            .repository
            .verify_credentials(username, password)
            .map_err(|e| {
                tracing::info!(username = %normalize(username), "Login refused");
                e
            })?;

        let issued = self.issue(&identity)?;
        tracing::info!(author = %identity, "Login succeeded");
        Ok(issued)
    }

    pub fn issue(&self, identity: &Identity) -> AppResult<IssuedToken> {
        self.issue_at(identity, Utc::now())
    }

    /// Issue a token as if the current time were `now`
    pub fn issue_at(&self, identity: &Identity, now: DateTime<Utc>) -> AppResult<IssuedToken> {
        let expires_at = now + Duration::minutes(self.config.token_ttl_minutes);
        let claims = SessionClaims {
            sub: identity.to_string(),
            jti: uuid::Uuid::new_v4().to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        let mut ledger = self.ledger.lock();
        ledger.prune(now.timestamp());
        ledger.insert(claims.jti, identity.clone(), claims.exp);

        Ok(IssuedToken { token, expires_at })
    }

    pub fn verify(&self, token: &str) -> Result<Identity, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Validate signature, claims, expiry and revocation as of `now`
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Identity, TokenError> {
        let claims = self.decode_at(token, now)?;
        let identity = normalize(&claims.sub);
        if !self.ledger.lock().is_live(&claims.jti, &identity) {
            return Err(TokenError::Revoked);
        }
        Ok(identity)
    }

    /// End the session a still-valid token belongs to
    pub fn revoke(&self, token: &str) -> Result<(), TokenError> {
        let claims = self.decode_at(token, Utc::now())?;
        if !self.ledger.lock().remove(&claims.jti) {
            return Err(TokenError::Revoked);
        }
        tracing::info!(author = %claims.sub, "Session revoked");
        Ok(())
    }

    /// End every session of `identity`. Returns how many were live.
    pub fn revoke_author(&self, identity: &Identity) -> usize {
        let revoked = self.ledger.lock().remove_author(identity);
        tracing::info!(author = %identity, sessions = revoked, "Sessions revoked");
        revoked
    }

    fn decode_at(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, TokenError> {
        let claims = SessionClaims::from_token(token, &self.config.jwt_secret)?;
        if claims.sub.is_empty() || claims.jti.is_empty() {
            return Err(TokenError::MissingClaim);
        }
        if claims.is_expired_at(now) {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }
}
