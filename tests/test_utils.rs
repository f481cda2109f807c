#![allow(dead_code)]

use std::sync::Arc;

use actix_web::{
    cookie::Cookie,
    dev::ServiceResponse,
    http::header,
    middleware::{NormalizePath, TrailingSlash},
    test, web, App,
};
use chrono::Utc;
use zenith_portfolio::{
    entities::user::{User, UserInsert},
    handlers::responses::not_found,
    middlewares::auth::SessionMiddleware,
    repositories::{memory::MemoryStore, user::UserRepository},
    routes::configure_routes,
    settings::{AppConfig, AppEnvironment, SiteConfig, StorageBackend},
    shared_repos::SharedRepositories,
    AppState,
};

pub const OWNER_PASSWORD: &str = "violet-harbour-lantern-42";

/// The whole site over an in-memory store. Every `call` builds a fresh
/// service around the same state, so data persists across requests.
pub struct TestApp {
    pub state: web::Data<AppState>,
    pub store: Arc<MemoryStore>,
    pub config: AppConfig,
}

impl TestApp {
    pub fn spawn() -> Self {
        Self::with_config(|_| {})
    }

    pub fn with_config(customize: impl FnOnce(&mut AppConfig)) -> Self {
        let mut config = test_config();
        customize(&mut config);

        let store = Arc::new(MemoryStore::new());
        let state = web::Data::new(AppState::new(
            &config,
            SharedRepositories::from_store(store.clone()),
        ));

        TestApp { state, store, config }
    }

    pub async fn call(&self, req: test::TestRequest) -> ServiceResponse {
        let app = test::init_service(
            App::new()
                .app_data(self.state.clone())
                .wrap(SessionMiddleware)
                .wrap(NormalizePath::new(TrailingSlash::Always))
                .configure(configure_routes)
                .default_service(web::to(not_found)),
        )
        .await;

        test::call_service(&app, req.to_request()).await
    }

    pub async fn get(&self, path: &str, session: Option<&Cookie<'static>>) -> ServiceResponse {
        let mut req = test::TestRequest::get().uri(path);
        if let Some(cookie) = session {
            req = req.cookie(cookie.clone());
        }
        self.call(req).await
    }

    pub async fn post_form(
        &self,
        path: &str,
        form: &[(&str, &str)],
        session: Option<&Cookie<'static>>,
    ) -> ServiceResponse {
        let mut req = test::TestRequest::post().uri(path).set_form(form);
        if let Some(cookie) = session {
            req = req.cookie(cookie.clone());
        }
        self.call(req).await
    }

    /// Stores a user without hashing; enough for cookie-based sessions.
    pub async fn create_user(&self, username: &str) -> User {
        let id = self
            .store
            .create_user(&UserInsert {
                username: username.to_string(),
                password_hash: "not-a-real-hash".to_string(),
                created_at: Utc::now(),
            })
            .await
            .expect("Failed to insert user");

        self.store
            .get_user_by_id(id)
            .await
            .expect("Failed to load user")
            .expect("User missing after insert")
    }

    /// A user that can log in through the form with `OWNER_PASSWORD`.
    pub async fn create_owner(&self, username: &str) -> i64 {
        self.state
            .auth_handler
            .create_user(zenith_portfolio::entities::user::NewUser {
                username: username.to_string(),
                password: OWNER_PASSWORD.to_string(),
            })
            .await
            .expect("Failed to create owner")
    }

    pub fn session_cookie(&self, user: &User) -> Cookie<'static> {
        let session = self
            .state
            .auth_handler
            .issue_session(user)
            .expect("Failed to issue session");
        Cookie::new(self.config.session_cookie_name.clone(), session.token)
    }

    /// A logged-in owner and their cookie.
    pub async fn logged_in(&self) -> (User, Cookie<'static>) {
        let user = self.create_user("will").await;
        let cookie = self.session_cookie(&user);
        (user, cookie)
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        env: AppEnvironment::Testing,
        name: "Zenith-Portfolio-Test".to_string(),
        port: 0,
        host: "127.0.0.1".to_string(),
        worker_count: 1,
        storage: StorageBackend::Memory,
        database_url: String::new(),
        redis_url: None,
        session_secret: "test-session-secret-that-is-long-enough-for-hs512-signing".to_string(),
        session_ttl_minutes: 60,
        session_cookie_name: "sessionid".to_string(),
        throttle_burst: 50,
        throttle_per_minute: 60,
        trust_forwarded_for: false,
        owner_username: None,
        owner_password: None,
        site: SiteConfig::default(),
    }
}

pub async fn body_string(resp: ServiceResponse) -> String {
    let bytes = test::read_body(resp).await;
    String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8")
}

pub fn location(resp: &ServiceResponse) -> String {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
