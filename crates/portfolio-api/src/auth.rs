use std::sync::Arc;

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tracing::{debug, info, warn};

use portfolio_db::Database;
use portfolio_types::api::{Claims, LoginRequest, LoginResponse};
use portfolio_types::envelope::Envelope;

use crate::contacts::ContactStore;
use crate::error::ApiError;
use crate::leaderboard::LeaderboardStore;

/// Admin tokens are valid for 24 hours after issue.
pub const TOKEN_TTL_HOURS: i64 = 24;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Arc<Database>,
    pub contacts: ContactStore,
    pub leaderboard: LeaderboardStore,
    pub tokens: TokenIssuer,
}

impl AppStateInner {
    pub fn new(db: Arc<Database>, tokens: TokenIssuer) -> AppState {
        Arc::new(Self {
            contacts: ContactStore::new(db.clone()),
            leaderboard: LeaderboardStore::new(db.clone()),
            db,
            tokens,
        })
    }
}

/// Issues and verifies admin tokens.
///
/// There is a single admin password and no user registry: any username is
/// accepted as the token subject once the password matches.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    password_digest: Option<Vec<u8>>,
}

impl TokenIssuer {
    /// An empty `admin_password` disables login entirely.
    pub fn new(secret: &str, admin_password: &str) -> Self {
        let password_digest =
            (!admin_password.is_empty()).then(|| Sha256::digest(admin_password.as_bytes()).to_vec());

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            password_digest,
        }
    }

    pub fn password_configured(&self) -> bool {
        self.password_digest.is_some()
    }

    pub fn issue(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        self.issue_at(username, password, Utc::now())
    }

    pub fn issue_at(
        &self,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<LoginResponse, ApiError> {
        if !self.password_matches(password) {
            return Err(ApiError::InvalidCredentials);
        }

        let expires_at = now + Duration::hours(TOKEN_TTL_HOURS);
        let claims = Claims {
            sub: username.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| ApiError::store("Failed to sign token", e.into()))?;

        Ok(LoginResponse {
            token,
            username: username.to_string(),
            expires_at: Utc.timestamp_opt(claims.exp, 0).single().unwrap_or(expires_at),
        })
    }

    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        self.verify_at(token, Utc::now())
    }

    /// Valid iff the signature checks out and `now` is strictly before `exp`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, ApiError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked below against `now`, without leeway.
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            debug!("Rejected token: {}", e);
            match e.kind() {
                ErrorKind::ExpiredSignature => ApiError::TokenExpired,
                _ => ApiError::TokenInvalid,
            }
        })?;

        if now.timestamp() >= data.claims.exp {
            return Err(ApiError::TokenExpired);
        }

        Ok(data.claims)
    }

    fn password_matches(&self, supplied: &str) -> bool {
        let Some(expected) = &self.password_digest else {
            return false;
        };
        // Compare fixed-length digests so timing does not depend on where the
        // inputs differ or on their lengths.
        let supplied = Sha256::digest(supplied.as_bytes());
        bool::from(supplied.as_slice().ct_eq(expected.as_slice()))
    }
}

/// POST /api/admin/login
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<Envelope<LoginResponse>>, ApiError> {
    let Json(req) = payload?;

    info!("Admin login attempt for '{}'", req.username);

    let issued = state.tokens.issue(&req.username, &req.password).map_err(|e| {
        if matches!(e, ApiError::InvalidCredentials) {
            warn!("Admin login rejected for '{}'", req.username);
        }
        e
    })?;

    info!("Issued admin token for '{}' (expires {})", issued.username, issued.expires_at);
    Ok(Json(Envelope::ok("Login successful", issued)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";
    const PASSWORD: &str = "correct horse";

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(SECRET, PASSWORD)
    }

    #[test]
    fn issued_token_verifies_with_subject() {
        let issuer = issuer();
        let issued = issuer.issue("admin", PASSWORD).unwrap();
        let claims = issuer.verify(&issued.token).unwrap();

        assert_eq!(claims.sub, "admin");
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_HOURS * 3600);
        assert_eq!(issued.expires_at.timestamp(), claims.exp);
    }

    #[test]
    fn wrong_password_is_invalid_credentials() {
        let issuer = issuer();
        assert!(matches!(issuer.issue("admin", "nope"), Err(ApiError::InvalidCredentials)));
        assert!(matches!(issuer.issue("admin", ""), Err(ApiError::InvalidCredentials)));
        assert!(matches!(
            issuer.issue("admin", "correct horse "),
            Err(ApiError::InvalidCredentials)
        ));
    }

    #[test]
    fn any_username_is_accepted() {
        let issuer = issuer();
        let issued = issuer.issue("visitor", PASSWORD).unwrap();
        assert_eq!(issuer.verify(&issued.token).unwrap().sub, "visitor");
    }

    #[test]
    fn unconfigured_password_rejects_everything() {
        let issuer = TokenIssuer::new(SECRET, "");
        assert!(!issuer.password_configured());
        assert!(matches!(issuer.issue("admin", ""), Err(ApiError::InvalidCredentials)));
    }

    #[test]
    fn past_expiry_is_token_expired() {
        let issuer = issuer();
        let issued_at = Utc::now() - Duration::hours(25);
        let issued = issuer.issue_at("admin", PASSWORD, issued_at).unwrap();

        assert!(matches!(issuer.verify(&issued.token), Err(ApiError::TokenExpired)));
    }

    #[test]
    fn expiry_boundary_is_exclusive() {
        let issuer = issuer();
        let now = Utc::now();
        let issued = issuer.issue_at("admin", PASSWORD, now).unwrap();
        let exp = Utc.timestamp_opt(now.timestamp(), 0).unwrap() + Duration::hours(TOKEN_TTL_HOURS);

        assert!(issuer.verify_at(&issued.token, exp - Duration::seconds(1)).is_ok());
        assert!(matches!(issuer.verify_at(&issued.token, exp), Err(ApiError::TokenExpired)));
    }

    #[test]
    fn foreign_signature_is_token_invalid() {
        let other = TokenIssuer::new("another-secret", PASSWORD);
        let issued = other.issue("admin", PASSWORD).unwrap();

        assert!(matches!(issuer().verify(&issued.token), Err(ApiError::TokenInvalid)));
    }

    #[test]
    fn garbage_is_token_invalid() {
        let issuer = issuer();
        assert!(matches!(issuer.verify("not.a.jwt"), Err(ApiError::TokenInvalid)));
        assert!(matches!(issuer.verify(""), Err(ApiError::TokenInvalid)));
    }
}
