use thiserror::Error;

/// Failures of login and token resolution.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email, missing credentials, wrong password or a token whose user is gone.
    #[error("invalid credentials")]
    Unauthorized,
    #[error("hashing error: {0}")]
    HashError(String),
    /// Token could not be issued or decoded.
    #[error("token error: {0}")]
    TokenError(String),
    #[error("repository error: {0}")]
    Repository(String),
}

impl AuthError {
    /// Stable numeric code, logged by the owner-resolution middleware.
    pub fn code(&self) -> u16 {
        match self {
            AuthError::Unauthorized => 1004,
            AuthError::HashError(_) => 1101,
            AuthError::TokenError(_) => 1102,
            AuthError::Repository(_) => 1200,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct() {
        let codes = [
            AuthError::Unauthorized.code(),
            AuthError::HashError(String::new()).code(),
            AuthError::TokenError(String::new()).code(),
            AuthError::Repository(String::new()).code(),
        ];
        for (i, a) in codes.iter().enumerate() {
            assert!(codes[i + 1..].iter().all(|b| a != b));
        }
    }
}
