//! Verification of identity-provider session tokens.
//!
//! Sessions are issued elsewhere (Clerk); this module only checks them. A
//! token is read from the `Authorization: Bearer` header, falling back to the
//! `__session` cookie the provider's frontend SDK sets. Production keys are
//! RS256 public keys in PEM form; an HS256 shared secret is accepted for
//! local development and tests.

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Cookie carrying the session token for same-site browser requests.
pub const SESSION_COOKIE: &str = "__session";

/// Claims read from a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject -- the provider's user id.
    pub sub: String,
    /// Provider session id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    #[serde(default)]
    pub iat: i64,
    /// Authorized party -- the origin the token was minted for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azp: Option<String>,
}

/// Session context the access gate attaches to every gated request.
///
/// `None` means the caller has no valid session.
#[derive(Debug, Clone, Default)]
pub struct Session(pub Option<SessionClaims>);

impl Session {
    pub fn claims(&self) -> Option<&SessionClaims> {
        self.0.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.0.is_some()
    }
}

/// Key material used to check token signatures.
#[derive(Debug, Clone)]
pub enum SessionKey {
    /// RS256 public key, PEM encoded.
    Rs256Pem(String),
    /// HS256 shared secret.
    Hs256Secret(String),
}

/// Session verification settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub key: SessionKey,
    /// Allowed `azp` values. Empty disables the check.
    pub authorized_parties: Vec<String>,
}

impl SessionConfig {
    /// Load session settings from environment variables.
    ///
    /// | Env Var                    | Required          | Default |
    /// |----------------------------|-------------------|---------|
    /// | `CLERK_JWT_KEY`            | one of these two  | --      |
    /// | `SESSION_JWT_SECRET`       | one of these two  | --      |
    /// | `CLERK_AUTHORIZED_PARTIES` | no                | unset   |
    ///
    /// `CLERK_JWT_KEY` wins when both are set. Literal `\n` sequences in the
    /// PEM are expanded so the key fits on one line in a `.env` file.
    ///
    /// # Panics
    ///
    /// Panics if neither key variable is set to a non-empty value.
    pub fn from_env() -> Self {
        let pem = std::env::var("CLERK_JWT_KEY")
            .ok()
            .filter(|v| !v.trim().is_empty());
        let secret = std::env::var("SESSION_JWT_SECRET")
            .ok()
            .filter(|v| !v.is_empty());

        let key = match (pem, secret) {
            (Some(pem), _) => SessionKey::Rs256Pem(pem.replace("\\n", "\n")),
            (None, Some(secret)) => SessionKey::Hs256Secret(secret),
            (None, None) => panic!("CLERK_JWT_KEY or SESSION_JWT_SECRET must be set"),
        };

        let authorized_parties = std::env::var("CLERK_AUTHORIZED_PARTIES")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            key,
            authorized_parties,
        }
    }
}

/// Why a presented token was rejected.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Invalid session token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),

    #[error("Session token was issued for an unauthorized party: {0}")]
    UnauthorizedParty(String),
}

/// Checks session tokens against the configured key.
pub struct SessionVerifier {
    key: DecodingKey,
    validation: Validation,
    authorized_parties: Vec<String>,
}

impl SessionVerifier {
    /// Build a verifier. Fails if the PEM key cannot be parsed.
    pub fn new(config: &SessionConfig) -> Result<Self, jsonwebtoken::errors::Error> {
        let (key, algorithm) = match &config.key {
            SessionKey::Rs256Pem(pem) => (DecodingKey::from_rsa_pem(pem.as_bytes())?, Algorithm::RS256),
            SessionKey::Hs256Secret(secret) => {
                (DecodingKey::from_secret(secret.as_bytes()), Algorithm::HS256)
            }
        };

        let mut validation = Validation::new(algorithm);
        validation.validate_nbf = true;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            key,
            validation,
            authorized_parties: config.authorized_parties.clone(),
        })
    }

    /// Validate a token's signature, expiry and authorized party.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, SessionError> {
        let claims = decode::<SessionClaims>(token, &self.key, &self.validation)?.claims;

        if let Some(azp) = &claims.azp {
            if !self.authorized_parties.is_empty() && !self.authorized_parties.contains(azp) {
                return Err(SessionError::UnauthorizedParty(azp.clone()));
            }
        }
        Ok(claims)
    }

    /// Resolve the session carried by a request, if any.
    ///
    /// A missing token and an invalid one both yield an anonymous session;
    /// the latter is logged at debug level.
    pub fn resolve(&self, headers: &HeaderMap) -> Session {
        let Some(token) = token_from_headers(headers) else {
            return Session(None);
        };
        match self.verify(&token) {
            Ok(claims) => Session(Some(claims)),
            Err(e) => {
                tracing::debug!(error = %e, "Rejected session token");
                Session(None)
            }
        }
    }
}

/// Extract the raw session token: Bearer header first, then the session cookie.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    CookieJar::from_headers(headers)
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

    fn config(parties: &[&str]) -> SessionConfig {
        SessionConfig {
            key: SessionKey::Hs256Secret(SECRET.to_string()),
            authorized_parties: parties.iter().map(|p| p.to_string()).collect(),
        }
    }

    fn token(exp_offset: i64, azp: Option<&str>) -> String {
        let now = chrono::Utc::now().timestamp();
        let claims = SessionClaims {
            sub: "user_2abc".to_string(),
            sid: Some("sess_1".to_string()),
            exp: now + exp_offset,
            iat: now,
            azp: azp.map(str::to_string),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn valid_token_verifies() {
        let verifier = SessionVerifier::new(&config(&[])).unwrap();
        let claims = verifier.verify(&token(600, None)).unwrap();
        assert_eq!(claims.sub, "user_2abc");
        assert_eq!(claims.sid.as_deref(), Some("sess_1"));
    }

    #[test]
    fn expired_token_fails() {
        let verifier = SessionVerifier::new(&config(&[])).unwrap();
        // Well past the default 60-second leeway.
        assert!(verifier.verify(&token(-300, None)).is_err());
    }

    #[test]
    fn wrong_secret_fails() {
        let verifier = SessionVerifier::new(&SessionConfig {
            key: SessionKey::Hs256Secret("another-secret".to_string()),
            authorized_parties: vec![],
        })
        .unwrap();
        assert!(verifier.verify(&token(600, None)).is_err());
    }

    #[test]
    fn authorized_party_check() {
        let verifier = SessionVerifier::new(&config(&["http://localhost:3000"])).unwrap();
        assert!(verifier
            .verify(&token(600, Some("http://localhost:3000")))
            .is_ok());
        assert!(matches!(
            verifier.verify(&token(600, Some("https://evil.example"))),
            Err(SessionError::UnauthorizedParty(_))
        ));
        // No azp claim: nothing to check.
        assert!(verifier.verify(&token(600, None)).is_ok());
    }

    #[test]
    fn malformed_pem_is_rejected() {
        let result = SessionVerifier::new(&SessionConfig {
            key: SessionKey::Rs256Pem("not a pem".to_string()),
            authorized_parties: vec![],
        });
        assert!(result.is_err());
    }

    #[test]
    fn token_from_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(token_from_headers(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn token_from_session_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::COOKIE,
            HeaderValue::from_static("theme=dark; __session=abc.def.ghi"),
        );
        assert_eq!(token_from_headers(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn no_token_is_anonymous() {
        let verifier = SessionVerifier::new(&config(&[])).unwrap();
        assert!(!verifier.resolve(&HeaderMap::new()).is_authenticated());

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer garbage"));
        assert!(!verifier.resolve(&headers).is_authenticated());
    }
}
