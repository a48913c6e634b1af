//! Session tokens
//!
//! Stateless HS256 JSON Web Tokens. A token is
//! `base64url(header).base64url(claims).base64url(signature)` where the
//! signature is HMAC-SHA256 over the first two segments. Nothing is stored
//! server side; a token dies when its `exp` passes.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::fmt;
use std::time::Duration;

use crate::error::AuthError;
use crate::utils::unix_now;

type HmacSha256 = Hmac<Sha256>;

/// How long an issued token stays valid.
pub const TOKEN_TTL: Duration = Duration::from_secs(8 * 60 * 60);

const ALGORITHM: &str = "HS256";

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    typ: String,
}

/// Payload carried by a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    /// Expiry as Unix seconds
    pub exp: u64,
}

impl Claims {
    pub fn subject(&self) -> &str {
        &self.username
    }
}

/// Issues and validates session tokens with a shared secret
#[derive(Clone)]
pub struct TokenIssuer {
    secret: Vec<u8>,
}

impl TokenIssuer {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
        }
    }

    pub fn issue(&self, username: &str) -> Result<String, AuthError> {
        self.issue_at(username, unix_now())
    }

    /// Issues a token as if the current time were `now` (Unix seconds).
    pub fn issue_at(&self, username: &str, now: u64) -> Result<String, AuthError> {
        let header = Header {
            alg: ALGORITHM.to_string(),
            typ: "JWT".to_string(),
        };
        let claims = Claims {
            username: username.to_string(),
            exp: now + TOKEN_TTL.as_secs(),
        };

        let signing_input = format!("{}.{}", encode_segment(&header)?, encode_segment(&claims)?);
        let mut mac = self.mac()?;
        mac.update(signing_input.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!("{signing_input}.{signature}"))
    }

    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        self.validate_at(token, unix_now())
    }

    /// Validates `token` as if the current time were `now` (Unix seconds).
    ///
    /// The signature is checked before anything in the token is trusted.
    pub fn validate_at(&self, token: &str, now: u64) -> Result<Claims, AuthError> {
        let mut segments = token.split('.');
        let (Some(header), Some(payload), Some(signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(invalid("wrong number of segments"));
        };

        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| invalid("signature is not base64url"))?;

        let mut mac = self.mac()?;
        mac.update(header.as_bytes());
        mac.update(b".");
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| invalid("signature mismatch"))?;

        let header: Header = decode_segment(header)?;
        if header.alg != ALGORITHM {
            return Err(invalid("unexpected algorithm"));
        }

        let claims: Claims = decode_segment(payload)?;
        if now >= claims.exp {
            return Err(invalid("token expired"));
        }

        Ok(claims)
    }

    fn mac(&self) -> Result<HmacSha256, AuthError> {
        HmacSha256::new_from_slice(&self.secret).map_err(|e| AuthError::Signing(e.to_string()))
    }
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("secret", &"<redacted>")
            .finish()
    }
}

fn invalid(reason: &str) -> AuthError {
    AuthError::InvalidToken(reason.to_string())
}

fn encode_segment<T: Serialize>(value: &T) -> Result<String, AuthError> {
    let json = serde_json::to_vec(value).map_err(|e| AuthError::Signing(e.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

fn decode_segment<T: DeserializeOwned>(segment: &str) -> Result<T, AuthError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| invalid("segment is not base64url"))?;
    serde_json::from_slice(&bytes).map_err(|_| invalid("segment is not valid JSON"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: u64 = 1_700_000_000;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new("test-secret")
    }

    #[test]
    fn issued_token_validates_until_expiry() {
        let issuer = issuer();
        let token = issuer.issue_at("admin", NOW).expect("issue");
        let ttl = TOKEN_TTL.as_secs();

        let claims = issuer.validate_at(&token, NOW).expect("fresh");
        assert_eq!(claims.subject(), "admin");
        assert_eq!(claims.exp, NOW + ttl);

        assert!(issuer.validate_at(&token, NOW + ttl - 1).is_ok());
        assert!(matches!(
            issuer.validate_at(&token, NOW + ttl),
            Err(AuthError::InvalidToken(_))
        ));
        assert!(issuer.validate_at(&token, NOW + ttl + 3600).is_err());
    }

    #[test]
    fn ttl_is_eight_hours() {
        assert_eq!(TOKEN_TTL.as_secs(), 28_800);
    }

    #[test]
    fn rejects_token_from_other_secret() {
        let token = TokenIssuer::new("other-secret")
            .issue_at("admin", NOW)
            .expect("issue");
        assert!(matches!(
            issuer().validate_at(&token, NOW),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn rejects_tampered_payload() {
        let issuer = issuer();
        let token = issuer.issue_at("admin", NOW).expect("issue");
        let parts: Vec<&str> = token.split('.').collect();

        let forged_claims = Claims {
            username: "admin".into(),
            exp: NOW + 10 * TOKEN_TTL.as_secs(),
        };
        let forged_payload = encode_segment(&forged_claims).expect("encode");
        let forged = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

        assert!(matches!(
            issuer.validate_at(&forged, NOW),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn rejects_malformed_tokens() {
        let issuer = issuer();
        for token in ["", "abc", "a.b", "a.b.c.d", "!!!.@@@.###"] {
            assert!(
                matches!(issuer.validate_at(token, NOW), Err(AuthError::InvalidToken(_))),
                "{token:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_signed_garbage_payload() {
        let issuer = issuer();
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(b"not json");
        let signing_input = format!("{header}.{payload}");
        let mut mac = issuer.mac().expect("mac");
        mac.update(signing_input.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        let token = format!("{signing_input}.{signature}");
        assert!(matches!(
            issuer.validate_at(&token, NOW),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn rejects_unexpected_algorithm() {
        let issuer = issuer();
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let payload = encode_segment(&Claims {
            username: "admin".into(),
            exp: NOW + 60,
        })
        .expect("encode");
        let signing_input = format!("{header}.{payload}");
        let mut mac = issuer.mac().expect("mac");
        mac.update(signing_input.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        let token = format!("{signing_input}.{signature}");
        assert!(issuer.validate_at(&token, NOW).is_err());
    }

    #[test]
    fn debug_output_redacts_secret() {
        assert!(!format!("{:?}", issuer()).contains("test-secret"));
    }
}
