use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::models::user::User;

const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub name: String,
    pub iss: String,
    pub aud: String,
    pub iat: usize,
    pub nbf: usize,
    pub exp: usize,
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// Signs and verifies the bearer tokens handed out at login.
#[derive(Clone)]
pub struct JwtService {
    keys: Arc<Keys>,
    issuer: String,
    audience: String,
    lifetime: Duration,
}

impl JwtService {
    pub fn new(config: &Config) -> Self {
        Self {
            keys: Arc::new(Keys {
                encoding: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
                decoding: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            }),
            issuer: config.jwt_issuer.clone(),
            audience: config.jwt_audience.clone(),
            lifetime: Duration::minutes(config.jwt_expires_in_minutes),
        }
    }

    pub fn issue(&self, user: &User) -> Result<IssuedToken> {
        let now = Utc::now();
        let expires_at = now + self.lifetime;

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            name: user.name.clone(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp() as usize,
            nbf: now.timestamp() as usize,
            exp: expires_at.timestamp() as usize,
        };

        let token = encode(&Header::new(JWT_ALGORITHM), &claims, &self.keys.encoding)?;
        Ok(IssuedToken { token, expires_at })
    }

    pub fn verify(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);

        let data = decode::<Claims>(token, &self.keys.decoding, &validation)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogFormat;

    fn config(secret: &str, audience: &str) -> Config {
        Config {
            server_address: "127.0.0.1:0".into(),
            database_url: "postgres://localhost/ecolesson".into(),
            database_max_connections: 1,
            jwt_secret: secret.into(),
            jwt_issuer: "EcoLessonAPI".into(),
            jwt_audience: audience.into(),
            jwt_expires_in_minutes: 60,
            log_format: LogFormat::Pretty,
        }
    }

    fn user() -> User {
        User {
            id: 42,
            name: "Ana".into(),
            email: "ana@example.com".into(),
            password_hash: String::new(),
            registered_at: Utc::now(),
            tax_id: "12345678900".into(),
        }
    }

    #[test]
    fn issued_token_round_trips() {
        let service = JwtService::new(&config("an-adequately-long-signing-secret!!", "EcoLessonAPI"));
        let issued = service.issue(&user()).unwrap();
        let claims = service.verify(&issued.token).unwrap();

        assert_eq!(claims.user_id(), Some(42));
        assert_eq!(claims.email, "ana@example.com");
        assert!(issued.expires_at > Utc::now() + Duration::minutes(59));
    }

    #[test]
    fn rejects_tokens_signed_with_another_key() {
        let issuer = JwtService::new(&config("an-adequately-long-signing-secret!!", "EcoLessonAPI"));
        let verifier = JwtService::new(&config("a-completely-different-signing-key!!", "EcoLessonAPI"));
        let issued = issuer.issue(&user()).unwrap();
        assert!(verifier.verify(&issued.token).is_err());
    }

    #[test]
    fn rejects_tokens_for_another_audience() {
        let issuer = JwtService::new(&config("an-adequately-long-signing-secret!!", "OtherAPI"));
        let verifier = JwtService::new(&config("an-adequately-long-signing-secret!!", "EcoLessonAPI"));
        let issued = issuer.issue(&user()).unwrap();
        assert!(verifier.verify(&issued.token).is_err());
    }
}
