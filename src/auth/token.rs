//! Token issuance and verification.
//!
//! Tokens are HS256-signed JWTs carrying an identity claim and a fixed
//! 1-hour expiry. Nothing is persisted server-side; a token is valid
//! exactly as long as its signature checks out and its expiry has not
//! passed.

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::AppError;

/// Identity payload embedded in a bearer token. The email is the unique
/// key the role check consults; whatever else the client supplied at
/// sign-in rides along untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
    pub email: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TokenClaims {
    #[serde(flatten)]
    claim: Claim,
    iat: i64,
    exp: i64,
}

const TOKEN_TTL_SECS: i64 = 3600;

#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Sign a claim with a 1-hour expiry. Claim contents are accepted
    /// as-is; nothing about them is validated here.
    pub fn issue(&self, claim: Claim) -> Result<String, AppError> {
        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            claim,
            iat: now,
            exp: now + TOKEN_TTL_SECS,
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("token signing failed: {e}")))
    }

    /// Decode and validate a token. Bad signature, expiry, and malformed
    /// input all collapse to `Unauthorized`; callers never retry.
    pub fn verify(&self, token: &str) -> Result<Claim, AppError> {
        decode::<TokenClaims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims.claim)
            .map_err(|_| AppError::Unauthorized)
    }
}

// ── Tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn claim(email: &str) -> Claim {
        Claim {
            email: email.to_string(),
            extra: Map::new(),
        }
    }

    #[test]
    fn issue_then_verify_returns_the_claim() {
        let svc = TokenService::new("test-secret");
        let mut c = claim("a@x.com");
        c.extra
            .insert("name".into(), Value::String("Alice".into()));

        let token = svc.issue(c).unwrap();
        let decoded = svc.verify(&token).unwrap();

        assert_eq!(decoded.email, "a@x.com");
        assert_eq!(decoded.extra["name"], "Alice");
    }

    #[test]
    fn expiry_and_issuance_claims_do_not_leak_into_extra() {
        let svc = TokenService::new("test-secret");
        let token = svc.issue(claim("a@x.com")).unwrap();
        let decoded = svc.verify(&token).unwrap();
        assert!(!decoded.extra.contains_key("exp"));
        assert!(!decoded.extra.contains_key("iat"));
    }

    #[test]
    fn expired_token_is_unauthorized() {
        let svc = TokenService::new("test-secret");
        // Back-date the expiry past the default validation leeway.
        let now = Utc::now().timestamp();
        let stale = TokenClaims {
            claim: claim("a@x.com"),
            iat: now - 7200,
            exp: now - 120,
        };
        let token = encode(
            &Header::default(),
            &stale,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(matches!(svc.verify(&token), Err(AppError::Unauthorized)));
    }

    #[test]
    fn token_signed_with_other_secret_is_unauthorized() {
        let issuer = TokenService::new("secret-a");
        let verifier = TokenService::new("secret-b");
        let token = issuer.issue(claim("a@x.com")).unwrap();
        assert!(matches!(
            verifier.verify(&token),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn garbage_input_is_unauthorized() {
        let svc = TokenService::new("test-secret");
        assert!(matches!(
            svc.verify("not-a-jwt"),
            Err(AppError::Unauthorized)
        ));
    }
}
