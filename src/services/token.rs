//! HS256 session tokens.
//!
//! Tokens are stateless: nothing is persisted and there is no revocation.
//! Verification never touches the store.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Signed token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Username.
    pub sub: String,
    /// User id.
    pub uid: i32,
    pub iat: i64,
    pub exp: i64,
}

/// A freshly signed token and its expiry.
#[derive(Debug, Clone)]
pub struct SignedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies session tokens with one process-wide secret.
#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenSigner {
    #[must_use]
    pub fn new(secret: &str, ttl_hours: u32) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl: Duration::hours(i64::from(ttl_hours)),
        }
    }

    pub fn sign(&self, username: &str, user_id: i32) -> jsonwebtoken::errors::Result<SignedToken> {
        self.sign_at(username, user_id, Utc::now())
    }

    /// Signs a token as if issued at `issued_at`.
    pub fn sign_at(
        &self,
        username: &str,
        user_id: i32,
        issued_at: DateTime<Utc>,
    ) -> jsonwebtoken::errors::Result<SignedToken> {
        let expires_at = issued_at + self.ttl;
        let claims = Claims {
            sub: username.to_string(),
            uid: user_id,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        Ok(SignedToken { token, expires_at })
    }

    /// Checks signature, algorithm and expiry with zero leeway.
    pub fn verify(&self, token: &str) -> jsonwebtoken::errors::Result<Claims> {
        decode::<Claims>(token, &self.decoding, &self.validation).map(|data| data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::errors::ErrorKind;

    #[test]
    fn sign_then_verify() {
        let signer = TokenSigner::new("test-secret", 24);
        let signed = signer.sign("alice", 7).unwrap();

        let claims = signer.verify(&signed.token).unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.uid, 7);
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
        assert_eq!(claims.exp, signed.expires_at.timestamp());
    }

    #[test]
    fn expired_token_is_rejected() {
        let signer = TokenSigner::new("test-secret", 24);
        let issued = Utc::now() - Duration::hours(25);
        let signed = signer.sign_at("alice", 1, issued).unwrap();

        let err = signer.verify(&signed.token).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::ExpiredSignature));
    }

    #[test]
    fn just_expired_token_is_rejected_without_leeway() {
        let signer = TokenSigner::new("test-secret", 1);
        let issued = Utc::now() - Duration::hours(1) - Duration::seconds(5);
        let signed = signer.sign_at("alice", 1, issued).unwrap();

        assert!(signer.verify(&signed.token).is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let signed = TokenSigner::new("one", 24).sign("alice", 1).unwrap();
        let err = TokenSigner::new("two", 24).verify(&signed.token).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidSignature));
    }

    #[test]
    fn garbage_is_rejected() {
        let signer = TokenSigner::new("test-secret", 24);
        assert!(signer.verify("not.a.jwt").is_err());
        assert!(signer.verify("").is_err());
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let signer = TokenSigner::new("test-secret", 24);
        let signed = signer.sign("alice", 1).unwrap();
        let other = signer.sign("mallory", 2).unwrap();

        let mut parts: Vec<&str> = signed.token.split('.').collect();
        let other_parts: Vec<&str> = other.token.split('.').collect();
        parts[1] = other_parts[1];

        assert!(signer.verify(&parts.join(".")).is_err());
    }
}
