use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{Credentials, PublicUser};
use crate::errors::ServiceError;

/// Repository abstraction for user persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<PublicUser>, ServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<PublicUser>, ServiceError>;
    async fn create(&self, email: &str, name: &str) -> Result<PublicUser, ServiceError>;
    /// Applies only the supplied fields; `updated_at` is bumped either way.
    async fn update(&self, id: Uuid, email: Option<&str>, name: Option<&str>) -> Result<PublicUser, ServiceError>;
    /// Returns whether a record existed.
    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError>;

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, ServiceError>;
    async fn upsert_password(&self, user_id: Uuid, password_hash: String, password_algorithm: String) -> Result<Credentials, ServiceError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockUserRepository {
        users: Mutex<HashMap<Uuid, PublicUser>>,
        creds: Mutex<HashMap<Uuid, Credentials>>,
    }

    #[async_trait]
    impl UserRepository for MockUserRepository {
        async fn find_by_email(&self, email: &str) -> Result<Option<PublicUser>, ServiceError> {
            let users = self.users.lock().unwrap();
            Ok(users.values().find(|u| u.email == email).cloned())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<PublicUser>, ServiceError> {
            let users = self.users.lock().unwrap();
            Ok(users.get(&id).cloned())
        }

        async fn create(&self, email: &str, name: &str) -> Result<PublicUser, ServiceError> {
            let mut users = self.users.lock().unwrap();
            if users.values().any(|u| u.email == email) {
                return Err(ServiceError::Conflict("email already in use".into()));
            }
            let user = PublicUser { id: Uuid::new_v4(), email: email.to_string(), name: name.to_string() };
            users.insert(user.id, user.clone());
            Ok(user)
        }

        async fn update(&self, id: Uuid, email: Option<&str>, name: Option<&str>) -> Result<PublicUser, ServiceError> {
            let mut users = self.users.lock().unwrap();
            let user = users.get_mut(&id).ok_or_else(|| ServiceError::not_found("user"))?;
            if let Some(email) = email {
                user.email = email.to_string();
            }
            if let Some(name) = name {
                user.name = name.to_string();
            }
            Ok(user.clone())
        }

        async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
            let existed = self.users.lock().unwrap().remove(&id).is_some();
            self.creds.lock().unwrap().remove(&id);
            Ok(existed)
        }

        async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, ServiceError> {
            let creds = self.creds.lock().unwrap();
            Ok(creds.get(&user_id).cloned())
        }

        async fn upsert_password(&self, user_id: Uuid, password_hash: String, password_algorithm: String) -> Result<Credentials, ServiceError> {
            let mut creds = self.creds.lock().unwrap();
            let c = Credentials { user_id, password_hash, password_algorithm };
            creds.insert(user_id, c.clone());
            Ok(c)
        }
    }
}
