use validator::ValidationError;
use zxcvbn::zxcvbn;

const MIN_LENGTH: usize = 8;
const MIN_STRENGTH_SCORE: u8 = 3;

/// Rejects passwords a guesser would find quickly, using the username as context.
pub fn check_password_strength(username: &str, password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_LENGTH {
        let mut error = ValidationError::new("password_length");
        error.message = Some(format!("Must be at least {} characters", MIN_LENGTH).into());
        return Err(error);
    }

    let estimate = zxcvbn(password, &[username]);

    if (estimate.score() as u8) < MIN_STRENGTH_SCORE {
        let feedback = estimate
            .feedback()
            .and_then(|f| {
                f.warning()
                    .map(|w| w.to_string())
                    .or_else(|| f.suggestions().first().map(|s| s.to_string()))
            })
            .unwrap_or_else(|| "Password is too easy to guess".to_string());

        let mut error = ValidationError::new("password_strength");
        error.message = Some(feedback.into());
        return Err(error);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_password_is_rejected() {
        let err = check_password_strength("will", "Ab1!").unwrap_err();
        assert_eq!(err.code, "password_length");
    }

    #[test]
    fn common_password_is_rejected() {
        let err = check_password_strength("will", "password123").unwrap_err();
        assert_eq!(err.code, "password_strength");
    }

    #[test]
    fn password_containing_username_is_weaker() {
        assert!(check_password_strength("matsypie", "matsypie1").is_err());
    }

    #[test]
    fn long_random_password_is_accepted() {
        assert!(check_password_strength("will", "correct-horse-battery-staple-91").is_ok());
    }
}
