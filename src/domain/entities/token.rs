use serde::{Serialize, Deserialize};

use crate::errors::AuthError;

/// Payload of the signed session cookie.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> Result<i64, AuthError> {
        self.sub.parse().map_err(|_| AuthError::InvalidToken)
    }
}

/// A freshly issued session token and how long the cookie should live.
#[derive(Debug, Clone)]
pub struct SessionToken {
    pub token: String,
    pub max_age_seconds: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_parses_subject() {
        let claims = Claims { sub: "42".into(), username: "will".into(), exp: 0, iat: 0 };
        assert_eq!(claims.user_id().unwrap(), 42);

        let broken = Claims { sub: "abc".into(), ..claims };
        assert!(matches!(broken.user_id(), Err(AuthError::InvalidToken)));
    }
}
