use super::config::JwtConfig;
use chrono::Utc;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Claims carried by every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Employee id
    pub sub: String,
    pub email: String,
    /// Display name
    pub name: String,
    /// Role name
    pub role: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

impl JwtClaims {
    /// Numeric employee id, when `sub` holds one.
    pub fn subject_id(&self) -> Option<i32> {
        self.sub.parse().ok()
    }

    fn subject(&self) -> TokenSubject {
        TokenSubject {
            id: self.sub.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role.clone(),
        }
    }
}

/// Identity a token is issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSubject {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("failed to sign token: {0}")]
    Sign(#[from] jsonwebtoken::errors::Error),
}

/// Why a presented token was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// No `Authorization` header
    Missing,
    /// Header present but not `Bearer <token>`
    Malformed,
    /// Bad signature, wrong algorithm or undecodable claims
    Invalid,
    Expired,
}

impl RejectReason {
    pub fn message(&self) -> &'static str {
        match self {
            RejectReason::Missing => "Authentication token is missing",
            RejectReason::Malformed => "Authorization header must be 'Bearer <token>'",
            RejectReason::Invalid => "Authentication token is invalid",
            RejectReason::Expired => "Authentication token has expired",
        }
    }
}

/// Outcome of presenting a token on a protected route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionDecision {
    /// Token accepted. `token` is a freshly signed replacement for the caller
    /// to hand back to the client.
    Proceed { claims: JwtClaims, token: String },
    Reject(RejectReason),
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

/// Signs and verifies HS256 tokens with a server-held secret.
///
/// Stateless: no session storage. Each accepted token is exchanged for a new
/// one through [`TokenService::renew`], so an active client keeps sliding its
/// expiry forward while an idle one expires after the configured TTL.
#[derive(Clone)]
pub struct TokenService {
    keys: Arc<Keys>,
}

impl TokenService {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let ttl_secs = i64::try_from(config.ttl_secs).unwrap_or(i64::MAX / 2);

        Self {
            keys: Arc::new(Keys {
                encoding: EncodingKey::from_secret(config.secret.as_bytes()),
                decoding: DecodingKey::from_secret(config.secret.as_bytes()),
                validation,
                ttl_secs,
            }),
        }
    }

    /// Token lifetime in seconds.
    pub fn ttl_secs(&self) -> i64 {
        self.keys.ttl_secs
    }

    /// Sign a new token for `subject`, expiring one TTL from now.
    pub fn issue(&self, subject: &TokenSubject) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let claims = JwtClaims {
            sub: subject.id.clone(),
            email: subject.email.clone(),
            name: subject.name.clone(),
            role: subject.role.clone(),
            iat: now,
            exp: now.saturating_add(self.keys.ttl_secs),
            jti: Uuid::new_v4().to_string(),
        };
        self.sign(&claims)
    }

    /// Claims of a valid token found in an `Authorization` header value.
    ///
    /// Never fails loudly: every problem with the input is `None`.
    pub fn validate(&self, header: Option<&str>) -> Option<JwtClaims> {
        parse_bearer(header).and_then(|t| self.verify(t)).ok()
    }

    /// Validate the presented header and, on success, re-issue a token from
    /// its claims.
    pub fn renew(&self, header: Option<&str>) -> SessionDecision {
        let claims = match parse_bearer(header).and_then(|t| self.verify(t)) {
            Ok(claims) => claims,
            Err(reason) => return SessionDecision::Reject(reason),
        };

        match self.issue(&claims.subject()) {
            Ok(token) => SessionDecision::Proceed { claims, token },
            Err(e) => {
                tracing::error!(error = %e, "failed to re-issue session token");
                SessionDecision::Reject(RejectReason::Invalid)
            }
        }
    }

    fn verify(&self, token: &str) -> Result<JwtClaims, RejectReason> {
        decode::<JwtClaims>(token, &self.keys.decoding, &self.keys.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => RejectReason::Expired,
                _ => RejectReason::Invalid,
            })
    }

    fn sign(&self, claims: &JwtClaims) -> Result<String, TokenError> {
        Ok(encode(&Header::new(Algorithm::HS256), claims, &self.keys.encoding)?)
    }
}

/// Accepts `Bearer <token>` with any casing of the scheme.
fn parse_bearer(header: Option<&str>) -> Result<&str, RejectReason> {
    let value = header.ok_or(RejectReason::Missing)?.trim();
    if value.is_empty() {
        return Err(RejectReason::Missing);
    }

    let (scheme, token) = value.split_once(' ').ok_or(RejectReason::Malformed)?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() || token.contains(' ') {
        return Err(RejectReason::Malformed);
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret-that-is-long-enough-0001";

    fn service(secret: &str, ttl: u64) -> TokenService {
        TokenService::new(&JwtConfig::new(secret, ttl).unwrap())
    }

    fn subject() -> TokenSubject {
        TokenSubject {
            id: "7".into(),
            email: "john@x.com".into(),
            name: "John Smith".into(),
            role: "Developer".into(),
        }
    }

    fn bearer(token: &str) -> String {
        format!("Bearer {token}")
    }

    #[test]
    fn issue_then_validate_round_trips_claims() {
        let tokens = service(SECRET, 3600);
        let token = tokens.issue(&subject()).unwrap();

        let claims = tokens.validate(Some(&bearer(&token))).unwrap();
        assert_eq!(claims.sub, "7");
        assert_eq!(claims.subject_id(), Some(7));
        assert_eq!(claims.email, "john@x.com");
        assert_eq!(claims.name, "John Smith");
        assert_eq!(claims.role, "Developer");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn token_from_other_secret_is_invalid() {
        let issuer = service("another-secret-that-is-also-long-enough!", 3600);
        let token = issuer.issue(&subject()).unwrap();

        let tokens = service(SECRET, 3600);
        assert_eq!(tokens.validate(Some(&bearer(&token))), None);
        assert_eq!(
            tokens.renew(Some(&bearer(&token))),
            SessionDecision::Reject(RejectReason::Invalid)
        );
    }

    #[test]
    fn expired_token_is_rejected() {
        let tokens = service(SECRET, 3600);
        let now = Utc::now().timestamp();
        let stale = JwtClaims {
            sub: "7".into(),
            email: "john@x.com".into(),
            name: "John Smith".into(),
            role: "Developer".into(),
            iat: now - 7200,
            exp: now - 10,
            jti: Uuid::new_v4().to_string(),
        };
        let token = tokens.sign(&stale).unwrap();

        assert_eq!(tokens.validate(Some(&bearer(&token))), None);
        assert_eq!(
            tokens.renew(Some(&bearer(&token))),
            SessionDecision::Reject(RejectReason::Expired)
        );
    }

    #[test]
    fn missing_and_malformed_headers_never_panic() {
        let tokens = service(SECRET, 3600);
        let token = tokens.issue(&subject()).unwrap();

        assert_eq!(
            tokens.renew(None),
            SessionDecision::Reject(RejectReason::Missing)
        );
        assert_eq!(
            tokens.renew(Some("   ")),
            SessionDecision::Reject(RejectReason::Missing)
        );
        for header in ["Bearer", "Bearer ", "Basic abc", "Token x y", token.as_str()] {
            assert_eq!(
                tokens.renew(Some(header)),
                SessionDecision::Reject(RejectReason::Malformed),
                "{header}"
            );
        }
        assert_eq!(
            tokens.renew(Some("Bearer not.a.jwt")),
            SessionDecision::Reject(RejectReason::Invalid)
        );
    }

    #[test]
    fn scheme_is_case_insensitive() {
        let tokens = service(SECRET, 3600);
        let token = tokens.issue(&subject()).unwrap();
        assert!(tokens.validate(Some(&format!("bearer {token}"))).is_some());
        assert!(tokens.validate(Some(&format!("BEARER  {token}"))).is_some());
    }

    #[test]
    fn renew_issues_a_fresh_token_with_same_identity() {
        let tokens = service(SECRET, 3600);
        let original = tokens.issue(&subject()).unwrap();
        let first = tokens.validate(Some(&bearer(&original))).unwrap();

        let SessionDecision::Proceed { claims, token } = tokens.renew(Some(&bearer(&original)))
        else {
            panic!("expected the session to be renewed");
        };
        assert_eq!(claims, first);
        assert_ne!(token, original);

        let renewed = tokens.validate(Some(&bearer(&token))).unwrap();
        assert_eq!(renewed.sub, first.sub);
        assert_eq!(renewed.email, first.email);
        assert_eq!(renewed.role, first.role);
        assert_ne!(renewed.jti, first.jti);
        assert!(renewed.exp >= first.exp);
    }
}
