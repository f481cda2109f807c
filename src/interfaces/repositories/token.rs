use jsonwebtoken::TokenData;

use crate::{entities::{token::{Claims, SessionToken}, user::User}, errors::AuthError};

pub trait TokenServiceRepository: Send + Sync {
    /// Signs a session token for the user
    fn create_session_token(&self, user: &User) -> Result<SessionToken, AuthError>;

    /// Verifies a session token and returns its claims
    fn decode_session_token(&self, token: &str) -> Result<TokenData<Claims>, AuthError>;
}
