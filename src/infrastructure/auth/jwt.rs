use jsonwebtoken::{encode, Header, decode, Validation, TokenData, Algorithm};
use chrono::{Utc, Duration};

use crate::entities::token::{Claims, SessionToken};
use crate::entities::user::User;
use crate::repositories::token::TokenServiceRepository;
use crate::settings::{AppConfig, JwtKeys, MAX_SESSION_TTL_MINUTES};
use crate::errors::AuthError;

const JWT_ALGORITHM: Algorithm = Algorithm::HS512;

/// Signs and verifies the session cookie token.
#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    session_expiration: Duration,
}

impl JwtService {
    pub fn new(config: &AppConfig) -> Self {
        JwtService {
            keys: JwtKeys::from(config),
            session_expiration: Duration::minutes(config.session_ttl_minutes.min(MAX_SESSION_TTL_MINUTES)),
        }
    }

    pub fn create_session_token(&self, user: &User) -> Result<SessionToken, AuthError> {
        let now = Utc::now();
        let exp = (now + self.session_expiration).timestamp() as usize;

        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            exp,
            iat: now.timestamp() as usize,
        };

        let token = encode(&Header::new(JWT_ALGORITHM), &claims, &self.keys.encoding)
            .map_err(|e| {
                tracing::warn!("Failed to sign session token: {}", e);
                AuthError::TokenCreation
            })?;

        Ok(SessionToken {
            token,
            max_age_seconds: self.session_expiration.num_seconds(),
        })
    }

    pub fn decode_session_token(&self, token: &str) -> Result<TokenData<Claims>, AuthError> {
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = true;
        validation.leeway = 0;

        decode::<Claims>(token, &self.keys.decoding, &validation).map_err(AuthError::from)
    }
}

impl TokenServiceRepository for JwtService {
    fn create_session_token(&self, user: &User) -> Result<SessionToken, AuthError> {
        self.create_session_token(user)
    }

    fn decode_session_token(&self, token: &str) -> Result<TokenData<Claims>, AuthError> {
        self.decode_session_token(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{AppEnvironment, SiteConfig, StorageBackend};

    fn service(secret: &str, ttl_minutes: i64) -> JwtService {
        let config = AppConfig {
            env: AppEnvironment::Testing,
            name: "test".into(),
            port: 0,
            host: "127.0.0.1".into(),
            worker_count: 1,
            storage: StorageBackend::Memory,
            database_url: String::new(),
            redis_url: None,
            session_secret: secret.into(),
            session_ttl_minutes: ttl_minutes,
            session_cookie_name: "sessionid".into(),
            throttle_burst: 1,
            throttle_per_minute: 1,
            trust_forwarded_for: false,
            owner_username: None,
            owner_password: None,
            site: SiteConfig::default(),
        };
        JwtService::new(&config)
    }

    fn user() -> User {
        User {
            id: 7,
            username: "will".into(),
            password_hash: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn issued_token_decodes_to_the_same_user() {
        let jwt = service("0123456789abcdef0123456789abcdef", 30);
        let issued = jwt.create_session_token(&user()).unwrap();
        assert_eq!(issued.max_age_seconds, 30 * 60);

        let claims = jwt.decode_session_token(&issued.token).unwrap().claims;
        assert_eq!(claims.user_id().unwrap(), 7);
        assert_eq!(claims.username, "will");
    }

    #[test]
    fn oversized_ttl_is_capped_at_one_year() {
        let jwt = service("0123456789abcdef0123456789abcdef", i64::MAX);
        let issued = jwt.create_session_token(&user()).unwrap();
        assert_eq!(issued.max_age_seconds, MAX_SESSION_TTL_MINUTES * 60);
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let issuer = service("0123456789abcdef0123456789abcdef", 30);
        let verifier = service("fedcba9876543210fedcba9876543210", 30);
        let issued = issuer.create_session_token(&user()).unwrap();

        assert!(matches!(
            verifier.decode_session_token(&issued.token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let jwt = service("0123456789abcdef0123456789abcdef", -5);
        let issued = jwt.create_session_token(&user()).unwrap();

        assert!(matches!(
            jwt.decode_session_token(&issued.token),
            Err(AuthError::TokenExpired)
        ));
    }
}
