use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::sync::Mutex;

use crate::domain::{DomainError, Result};

pub const SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/drive",
    "https://www.googleapis.com/auth/documents",
];

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
const REFRESH_MARGIN_SECS: i64 = 60;

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

/// The subset of a Google service-account key file needed to mint tokens.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl ServiceAccountKey {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DomainError::not_found(format!(
                "Service account file '{}' not found",
                path.display()
            )));
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|e| DomainError::auth(format!("read {}: {e}", path.display())))?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw)
            .map_err(|e| DomainError::auth(format!("invalid service account key: {e}")))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Claims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at - Duration::seconds(REFRESH_MARGIN_SECS) > now
    }
}

/// Exchanges signed JWT assertions for OAuth2 access tokens and caches the
/// result until shortly before it expires.
pub struct TokenProvider {
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    http: reqwest::Client,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenProvider {
    pub fn new(key: ServiceAccountKey, http: reqwest::Client) -> Result<Self> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| DomainError::auth(format!("invalid private key: {e}")))?;

        Ok(Self {
            key,
            encoding_key,
            http,
            cached: Mutex::new(None),
        })
    }

    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    pub async fn access_token(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(Utc::now())) {
            return Ok(token.value.clone());
        }

        let token = self.fetch().await?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    pub(crate) fn assertion(&self, issued_at: i64) -> Result<String> {
        let claims = Claims {
            iss: self.key.client_email.clone(),
            scope: SCOPES.join(" "),
            aud: self.key.token_uri.clone(),
            iat: issued_at,
            exp: issued_at + ASSERTION_LIFETIME_SECS,
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| DomainError::auth(format!("failed to sign assertion: {e}")))
    }

    async fn fetch(&self) -> Result<CachedToken> {
        let now = Utc::now();
        let assertion = self.assertion(now.timestamp())?;

        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| DomainError::auth(format!("token request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::auth(format!(
                "token endpoint returned {status}: {body}"
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| DomainError::auth(format!("invalid token response: {e}")))?;

        tracing::debug!(client_email = %self.key.client_email, expires_in = token.expires_in, "Access token refreshed");

        Ok(CachedToken {
            value: token.access_token,
            expires_at: now + Duration::seconds(token.expires_in),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::google::testing;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_missing_key_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = ServiceAccountKey::from_file(dir.path().join("credentials.json")).unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn test_token_uri_defaults_to_google() {
        let key = ServiceAccountKey::from_json(
            r#"{"client_email":"svc@example.iam.gserviceaccount.com","private_key":"x"}"#,
        )
        .unwrap();
        assert_eq!(key.token_uri, "https://oauth2.googleapis.com/token");
    }

    #[test]
    fn test_invalid_private_key_is_rejected() {
        let key = ServiceAccountKey::from_json(
            r#"{"client_email":"svc@example.com","private_key":"not a pem"}"#,
        )
        .unwrap();
        let err = TokenProvider::new(key, reqwest::Client::new()).err().unwrap();
        assert!(matches!(err, DomainError::Auth(_)));
    }

    #[test]
    fn test_assertion_claims() {
        let key = testing::service_account_key("https://oauth2.example.com/token");
        let provider = TokenProvider::new(key, reqwest::Client::new()).unwrap();

        let jwt = provider.assertion(1_700_000_000).unwrap();
        let header = jsonwebtoken::decode_header(&jwt).unwrap();
        assert_eq!(header.alg, Algorithm::RS256);
        assert_eq!(header.kid.as_deref(), Some("test-key-id"));

        let mut validation = jsonwebtoken::Validation::new(Algorithm::RS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.set_audience(&["https://oauth2.example.com/token"]);
        let claims = jsonwebtoken::decode::<Claims>(
            &jwt,
            &jsonwebtoken::DecodingKey::from_secret(b""),
            &validation,
        )
        .unwrap()
        .claims;

        assert_eq!(claims.iss, testing::CLIENT_EMAIL);
        assert_eq!(claims.exp - claims.iat, 3600);
        assert!(claims.scope.contains("auth/drive"));
        assert!(claims.scope.contains("auth/documents"));
    }

    #[tokio::test]
    async fn test_token_is_cached() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "ya29.cached",
                "expires_in": 3599,
                "token_type": "Bearer"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let key = testing::service_account_key(&format!("{}/token", server.uri()));
        let provider = TokenProvider::new(key, reqwest::Client::new()).unwrap();

        assert_eq!(provider.access_token().await.unwrap(), "ya29.cached");
        assert_eq!(provider.access_token().await.unwrap(), "ya29.cached");
    }

    #[tokio::test]
    async fn test_token_near_expiry_is_refreshed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "ya29.short-lived",
                "expires_in": 30,
                "token_type": "Bearer"
            })))
            .expect(2)
            .mount(&server)
            .await;

        let key = testing::service_account_key(&format!("{}/token", server.uri()));
        let provider = TokenProvider::new(key, reqwest::Client::new()).unwrap();

        assert_eq!(provider.access_token().await.unwrap(), "ya29.short-lived");
        assert_eq!(provider.access_token().await.unwrap(), "ya29.short-lived");
    }

    #[test]
    fn test_freshness_respects_refresh_margin() {
        let now = Utc::now();
        let expiring = CachedToken {
            value: "t".into(),
            expires_at: now + Duration::seconds(REFRESH_MARGIN_SECS - 1),
        };
        let valid = CachedToken {
            value: "t".into(),
            expires_at: now + Duration::seconds(REFRESH_MARGIN_SECS + 60),
        };
        assert!(!expiring.is_fresh(now));
        assert!(valid.is_fresh(now));
    }

    #[tokio::test]
    async fn test_rejected_grant_is_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(
                ResponseTemplate::new(400).set_body_string(r#"{"error":"invalid_grant"}"#),
            )
            .mount(&server)
            .await;

        let key = testing::service_account_key(&format!("{}/token", server.uri()));
        let provider = TokenProvider::new(key, reqwest::Client::new()).unwrap();

        let err = provider.access_token().await.unwrap_err();
        assert!(matches!(err, DomainError::Auth(msg) if msg.contains("invalid_grant")));
    }
}
