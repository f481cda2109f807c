use actix_web::HttpRequest;
use deadpool_redis::{Config as RedisConfig, Pool as RedisPool, Runtime};
use redis::AsyncCommands;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod graceful_shutdown;
pub mod shared_repos;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, repositories, middlewares, routes, templates};
pub use infrastructure::{auth, db, limiter, utils};

use auth::jwt::JwtService;
use errors::{AppError, AuthError};
use limiter::rate_limiter::ThrottleStore;
use settings::{AppConfig, SessionSettings, SiteConfig};
use shared_repos::SharedRepositories;
use entities::user::NewUser;
use use_cases::{auth::AuthHandler, blog::BlogHandler, cv::CvHandler};
use utils::get_client_ip::get_client_ip;

const REVOKED_PREFIX: &str = "session_deny:";

pub struct AppState {
    pub site: SiteConfig,
    pub session: SessionSettings,
    pub auth_handler: AppAuthHandler,
    pub blog_handler: BlogHandler,
    pub cv_handler: CvHandler,
    pub throttle: ThrottleStore,
    pub redis_pool: Option<RedisPool>,
}

pub type AppAuthHandler = AuthHandler<JwtService>;

impl AppState {
    pub fn new(config: &AppConfig, repos: SharedRepositories) -> Self {
        let auth_handler = AuthHandler::new(repos.users, JwtService::new(config));
        let blog_handler = BlogHandler::new(repos.posts, repos.comments);
        let cv_handler = CvHandler::new(repos.cv);

        let redis_pool = config.redis_url.as_ref().and_then(|url| {
            RedisConfig::from_url(url.as_str())
                .create_pool(Some(Runtime::Tokio1))
                .map_err(|e| tracing::error!("Redis pool creation error: {}", e))
                .ok()
        });

        AppState {
            site: config.site.clone(),
            session: config.session_settings(),
            auth_handler,
            blog_handler,
            cv_handler,
            throttle: ThrottleStore::new(config.throttle_burst, config.throttle_per_minute),
            redis_pool,
        }
    }

    /// Spends one throttle token for this client under `scope`.
    pub fn throttle(&self, req: &HttpRequest, scope: &str) -> Result<(), AppError> {
        let key = format!("{}:{}", scope, get_client_ip(req, self.session.trust_forwarded_for));

        self.throttle.check(&key).map_err(|retry_after| {
            tracing::warn!(key = %key, retry_after, "Request throttled");
            AppError::TooManyRequests(retry_after)
        })
    }

    /// Deny-lists a session token for `ttl_seconds`. A no-op without Redis.
    pub async fn revoke_session(&self, token: &str, ttl_seconds: u64) -> Result<(), AuthError> {
        let Some(pool) = &self.redis_pool else {
            return Ok(());
        };

        let mut conn = pool.get().await?;
        let _: () = conn
            .set_ex(format!("{}{}", REVOKED_PREFIX, token), 1, ttl_seconds)
            .await?;
        Ok(())
    }

    /// Fails with `TokenRevoked` when the token was logged out.
    /// An unreachable Redis is logged and treated as "not revoked".
    pub async fn ensure_session_active(&self, token: &str) -> Result<(), AuthError> {
        let Some(pool) = &self.redis_pool else {
            return Ok(());
        };

        let lookup = async {
            let mut conn = pool.get().await?;
            let revoked: bool = conn.exists(format!("{}{}", REVOKED_PREFIX, token)).await?;
            Ok::<_, AuthError>(revoked)
        };

        match lookup.await {
            Ok(true) => Err(AuthError::TokenRevoked),
            Ok(false) => Ok(()),
            Err(e) => {
                tracing::warn!("Session deny-list unavailable: {}", e);
                Ok(())
            }
        }
    }

    /// Creates the owner account named in the config unless it already exists.
    pub async fn bootstrap_owner(&self, config: &AppConfig) -> Result<Option<i64>, AppError> {
        let (Some(username), Some(password)) = (&config.owner_username, &config.owner_password) else {
            return Ok(None);
        };

        if let Some(user) = self.auth_handler.user_repo.get_user_by_username(username).await? {
            return Ok(Some(user.id));
        }

        let id = self
            .auth_handler
            .create_user(NewUser {
                username: username.clone(),
                password: password.to_string(),
            })
            .await?;
        tracing::info!(user_id = id, "Owner account created from configuration");
        Ok(Some(id))
    }
}
