use std::sync::Arc;

use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use rand::rngs::OsRng;
use tracing::{debug, info, instrument};

use super::domain::{AuthSession, AuthUser, Claims, LoginInput};
use super::errors::AuthError;
use super::repository::AuthRepository;

pub const PASSWORD_ALGORITHM: &str = "argon2";

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}

impl From<&configs::AuthConfig> for AuthConfig {
    fn from(cfg: &configs::AuthConfig) -> Self {
        Self { jwt_secret: cfg.jwt_secret.clone(), token_ttl_hours: cfg.token_ttl_hours }
    }
}

/// Argon2 PHC string for `password`.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::HashError(e.to_string()))?
        .to_string())
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|e| AuthError::HashError(e.to_string()))?;
    Ok(Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self { Self { repo, cfg } }

    /// Authenticate a user and issue a token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::LoginInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// repo.insert_user("u@e.com", "N", "Passw0rd").unwrap();
    /// let svc = AuthService::new(repo, AuthConfig { jwt_secret: "secret".into(), token_ttl_hours: 12 });
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "u@e.com".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.user.email, "u@e.com");
    /// assert!(!session.token.is_empty());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let user = self.repo
            .find_user_by_email(&input.email)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let cred = self.repo
            .get_credentials(user.id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        if !verify_password(&input.password, &cred.password_hash)? {
            debug!(user_id = user.id, "password mismatch");
            return Err(AuthError::Unauthorized);
        }

        let token = self.issue_token(&user)?;
        info!(user_id = user.id, email = %user.email, "user_logged_in");
        Ok(AuthSession { user, token })
    }

    /// Signed HS256 token carrying the user id in `uid`.
    pub fn issue_token(&self, user: &AuthUser) -> Result<String, AuthError> {
        let exp = chrono::Duration::try_hours(self.cfg.token_ttl_hours)
            .and_then(|ttl| chrono::Utc::now().checked_add_signed(ttl))
            .and_then(|at| usize::try_from(at.timestamp()).ok())
            .ok_or_else(|| AuthError::TokenError(format!("token ttl of {}h is out of range", self.cfg.token_ttl_hours)))?;
        let claims = Claims { sub: user.email.clone(), uid: user.id, exp };
        encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(self.cfg.jwt_secret.as_bytes()))
            .map_err(|e| AuthError::TokenError(e.to_string()))
    }

    /// Resolve a token to a user that still exists.
    #[instrument(skip_all)]
    pub async fn authenticate(&self, token: &str) -> Result<AuthUser, AuthError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.cfg.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| AuthError::TokenError(e.to_string()))?;
        self.repo
            .find_user_by_id(data.claims.uid)
            .await?
            .ok_or(AuthError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repository::mock::MockAuthRepository;

    fn svc() -> (AuthService<MockAuthRepository>, Arc<MockAuthRepository>) {
        let repo = Arc::new(MockAuthRepository::default());
        let svc = AuthService::new(repo.clone(), AuthConfig { jwt_secret: "test-secret".into(), token_ttl_hours: 1 });
        (svc, repo)
    }

    #[test]
    fn hash_roundtrip() {
        let hash = hash_password("password").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("password", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[tokio::test]
    async fn login_rejects_bad_password_and_unknown_email() {
        let (svc, repo) = svc();
        repo.insert_user("a@b.c", "A", "secret1").unwrap();

        let err = svc.login(LoginInput { email: "a@b.c".into(), password: "nope".into() }).await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
        assert_eq!(err.code(), 1004);

        let err = svc.login(LoginInput { email: "x@b.c".into(), password: "secret1".into() }).await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
    }

    #[tokio::test]
    async fn token_resolves_back_to_user() {
        let (svc, repo) = svc();
        let user = repo.insert_user("a@b.c", "A", "secret1").unwrap();
        let session = svc.login(LoginInput { email: "a@b.c".into(), password: "secret1".into() }).await.unwrap();

        let resolved = svc.authenticate(&session.token).await.unwrap();
        assert_eq!(resolved, user);
    }

    #[tokio::test]
    async fn token_of_deleted_user_is_rejected() {
        let (svc, repo) = svc();
        let user = repo.insert_user("a@b.c", "A", "secret1").unwrap();
        let token = svc.issue_token(&user).unwrap();
        repo.remove_user("a@b.c");
        assert!(matches!(svc.authenticate(&token).await, Err(AuthError::Unauthorized)));
    }

    #[tokio::test]
    async fn garbage_and_foreign_tokens_fail() {
        let (svc, repo) = svc();
        let user = repo.insert_user("a@b.c", "A", "secret1").unwrap();
        assert!(matches!(svc.authenticate("not-a-jwt").await, Err(AuthError::TokenError(_))));

        let other = AuthService::new(repo.clone(), AuthConfig { jwt_secret: "other".into(), token_ttl_hours: 1 });
        let foreign = other.issue_token(&user).unwrap();
        assert!(matches!(svc.authenticate(&foreign).await, Err(AuthError::TokenError(_))));
    }

    #[tokio::test]
    async fn out_of_range_ttl_fails_login_without_panicking() {
        let repo = Arc::new(MockAuthRepository::default());
        repo.insert_user("a@b.c", "A", "secret1").unwrap();
        let svc = AuthService::new(repo, AuthConfig { jwt_secret: "test-secret".into(), token_ttl_hours: i64::MAX / 2 });
        let res = svc.login(LoginInput { email: "a@b.c".into(), password: "secret1".into() }).await;
        assert!(matches!(res, Err(AuthError::TokenError(_))));
    }
}
