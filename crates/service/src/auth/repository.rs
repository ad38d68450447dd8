use async_trait::async_trait;

use super::domain::{AuthUser, Credentials};
use super::errors::AuthError;

/// Read side of user persistence needed to log in and to resolve token owners.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError>;
    async fn find_user_by_id(&self, id: i32) -> Result<Option<AuthUser>, AuthError>;
    async fn get_credentials(&self, user_id: i32) -> Result<Option<Credentials>, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::auth::service::hash_password;

    #[derive(Default)]
    pub struct MockAuthRepository {
        users: Mutex<HashMap<String, AuthUser>>, // key: email
        creds: Mutex<HashMap<i32, Credentials>>, // key: user_id
    }

    impl MockAuthRepository {
        /// Register a user with an argon2 hash of `password`.
        pub fn insert_user(&self, email: &str, name: &str, password: &str) -> Result<AuthUser, AuthError> {
            let mut users = self.users.lock().unwrap();
            let user = AuthUser { id: users.len() as i32 + 1, email: email.to_string(), name: name.to_string() };
            let hash = hash_password(password)?;
            self.creds.lock().unwrap().insert(
                user.id,
                Credentials { user_id: user.id, password_hash: hash, password_algorithm: "argon2".into() },
            );
            users.insert(email.to_string(), user.clone());
            Ok(user)
        }

        pub fn remove_user(&self, email: &str) {
            if let Some(user) = self.users.lock().unwrap().remove(email) {
                self.creds.lock().unwrap().remove(&user.id);
            }
        }
    }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
            let users = self.users.lock().unwrap();
            Ok(users.get(email).cloned())
        }

        async fn find_user_by_id(&self, id: i32) -> Result<Option<AuthUser>, AuthError> {
            let users = self.users.lock().unwrap();
            Ok(users.values().find(|u| u.id == id).cloned())
        }

        async fn get_credentials(&self, user_id: i32) -> Result<Option<Credentials>, AuthError> {
            let creds = self.creds.lock().unwrap();
            Ok(creds.get(&user_id).cloned())
        }
    }
}
