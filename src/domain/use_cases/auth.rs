use std::sync::Arc;

use validator::Validate;

use crate::auth::password::{hash_password, verify_against_dummy, verify_password};
use crate::domain::password::check_password_strength;
use crate::entities::token::{Claims, SessionToken};
use crate::entities::user::{LoginForm, NewUser, User};
use crate::errors::{AppError, AuthError, FieldError};
use crate::interfaces::repositories::user::UserRepository;
use crate::repositories::token::TokenServiceRepository;

pub struct AuthHandler<T>
where
    T: TokenServiceRepository,
{
    pub user_repo: Arc<dyn UserRepository>,
    pub token_service: T,
}

impl<T> AuthHandler<T>
where
    T: TokenServiceRepository,
{
    pub fn new(user_repo: Arc<dyn UserRepository>, token_service: T) -> Self {
        AuthHandler {
            user_repo,
            token_service,
        }
    }

    /// Creates a user after validation, a strength check and password hashing
    pub async fn create_user(&self, request: NewUser) -> Result<i64, AppError> {
        request.validate()?;
        check_password_strength(&request.username, &request.password).map_err(|e| {
            AppError::ValidationError(vec![FieldError {
                field: "password".into(),
                message: e.message.map(|m| m.to_string()).unwrap_or_else(|| e.code.to_string()),
            }])
        })?;

        let hashed_password = hash_password(&request.password)?;
        let id = self
            .user_repo
            .create_user(&request.prepare_for_insert(hashed_password))
            .await?;

        tracing::info!(user_id = id, "User created");
        Ok(id)
    }

    /// Checks credentials and issues a session token
    pub async fn login(&self, form: &LoginForm) -> Result<SessionToken, AuthError> {
        let username = form.username.trim();
        if username.is_empty() || form.password.is_empty() {
            return Err(AuthError::WrongCredentials);
        }

        let Some(user) = self.user_repo.get_user_by_username(username).await? else {
            verify_against_dummy(&form.password);
            return Err(AuthError::WrongCredentials);
        };

        let is_password_valid = verify_password(&form.password, &user.password_hash)
            .map_err(|e| {
                tracing::warn!("Stored password hash is unusable: {}", e);
                AuthError::WrongCredentials
            })?;
        if !is_password_valid {
            return Err(AuthError::WrongCredentials);
        }

        let session = self.token_service.create_session_token(&user)?;

        tracing::info!(user_id = user.id, "User logged in successfully");
        Ok(session)
    }

    /// Decodes a session cookie value into claims
    pub fn verify_session(&self, token: &str) -> Result<Claims, AuthError> {
        Ok(self.token_service.decode_session_token(token)?.claims)
    }

    /// Issues a session for an existing user without checking a password
    pub fn issue_session(&self, user: &User) -> Result<SessionToken, AuthError> {
        self.token_service.create_session_token(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::TokenData;

    use crate::repositories::user::MockUserRepository;

    struct FakeTokens;

    impl TokenServiceRepository for FakeTokens {
        fn create_session_token(&self, user: &User) -> Result<SessionToken, AuthError> {
            Ok(SessionToken { token: format!("token-{}", user.id), max_age_seconds: 60 })
        }

        fn decode_session_token(&self, _token: &str) -> Result<TokenData<Claims>, AuthError> {
            Err(AuthError::InvalidToken)
        }
    }

    fn stored_user(password: &str) -> User {
        User {
            id: 3,
            username: "will".into(),
            password_hash: hash_password(password).unwrap(),
            created_at: Utc::now(),
        }
    }

    fn login_form(username: &str, password: &str) -> LoginForm {
        LoginForm { username: username.into(), password: password.into(), next: String::new() }
    }

    #[tokio::test]
    async fn correct_password_issues_a_session() {
        let user = stored_user("Cr1mson-Tide-Rolls");
        let mut repo = MockUserRepository::new();
        repo.expect_get_user_by_username()
            .returning(move |_| Ok(Some(user.clone())));

        let handler = AuthHandler::new(Arc::new(repo), FakeTokens);
        let session = handler.login(&login_form("will", "Cr1mson-Tide-Rolls")).await.unwrap();
        assert_eq!(session.token, "token-3");
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let user = stored_user("Cr1mson-Tide-Rolls");
        let mut repo = MockUserRepository::new();
        repo.expect_get_user_by_username()
            .returning(move |_| Ok(Some(user.clone())));

        let handler = AuthHandler::new(Arc::new(repo), FakeTokens);
        let err = handler.login(&login_form("will", "guess")).await.unwrap_err();
        assert!(matches!(err, AuthError::WrongCredentials));
    }

    #[tokio::test]
    async fn unknown_user_is_rejected() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_user_by_username().returning(|_| Ok(None));

        let handler = AuthHandler::new(Arc::new(repo), FakeTokens);
        let err = handler.login(&login_form("ghost", "whatever")).await.unwrap_err();
        assert!(matches!(err, AuthError::WrongCredentials));
    }

    #[tokio::test]
    async fn blank_credentials_skip_the_lookup() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_user_by_username().never();

        let handler = AuthHandler::new(Arc::new(repo), FakeTokens);
        assert!(handler.login(&login_form("  ", "x")).await.is_err());
    }

    #[tokio::test]
    async fn weak_password_never_reaches_storage() {
        let mut repo = MockUserRepository::new();
        repo.expect_create_user().never();

        let handler = AuthHandler::new(Arc::new(repo), FakeTokens);
        let err = handler
            .create_user(NewUser { username: "will".into(), password: "password".into() })
            .await
            .unwrap_err();

        let AppError::ValidationError(fields) = err else {
            panic!("expected a validation error");
        };
        assert_eq!(fields[0].field, "password");
    }
}
