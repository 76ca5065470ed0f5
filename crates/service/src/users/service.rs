use std::sync::Arc;

use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use jsonwebtoken::{encode, Header as JwtHeader, EncodingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use tracing::{info, debug, instrument};
use uuid::Uuid;

use super::domain::{RegisterInput, LoginInput, UpdateUserInput, PublicUser, AuthSession};
use super::repository::UserRepository;
use crate::errors::ServiceError;

/// User service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub password_algorithm: String,
}

/// Bearer token claims. `sub` carries the user id; expiry is validated by
/// the verifying side.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub iat: usize,
    pub exp: usize,
}

/// User business service independent of web framework
pub struct UserService<R: UserRepository> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self { Self { repo, cfg } }

    /// Register a new user with a hashed password and issue a token.
    ///
    /// # Examples
    /// ```
    /// use service::users::{service::{UserService, AuthConfig}, repository::mock::MockUserRepository};
    /// use service::users::domain::RegisterInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockUserRepository::default());
    /// let svc = UserService::new(repo, AuthConfig { jwt_secret: "secret".into(), token_ttl_hours: 24, password_algorithm: "argon2".into() });
    /// let input = RegisterInput { email: "user@example.com".into(), name: "Test".into(), password: "Secret123".into() };
    /// let session = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(session.user.email, "user@example.com");
    /// assert!(!session.token.is_empty());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthSession, ServiceError> {
        models::user::validate_email(&input.email)?;
        models::user::validate_name(&input.name)?;
        validate_password(&input.password)?;

        if let Some(existing) = self.repo.find_by_email(&input.email).await? {
            debug!("user exists: {}", existing.email);
            return Err(ServiceError::Conflict("email already in use".into()));
        }

        let user = self.repo.create(&input.email, &input.name).await?;
        let hash = hash_password(&input.password)?;
        let _cred = self.repo.upsert_password(user.id, hash, self.cfg.password_algorithm.clone()).await?;

        let token = self.issue_token(&user)?;
        info!(user_id = %user.id, email = %user.email, "user_registered");
        Ok(AuthSession { user, token })
    }

    /// Authenticate a user and issue a token.
    ///
    /// A missing account and a wrong password both map to the same
    /// `Unauthorized` error so the caller cannot tell which one failed.
    ///
    /// # Examples
    /// ```
    /// use service::users::{service::{UserService, AuthConfig}, repository::mock::MockUserRepository};
    /// use service::users::domain::{RegisterInput, LoginInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockUserRepository::default());
    /// let svc = UserService::new(repo.clone(), AuthConfig { jwt_secret: "secret".into(), token_ttl_hours: 24, password_algorithm: "argon2".into() });
    /// let _ = tokio_test::block_on(svc.register(RegisterInput { email: "u@e.com".into(), name: "N".into(), password: "Passw0rd".into() }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "u@e.com".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.user.email, "u@e.com");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, ServiceError> {
        let user = self.repo
            .find_by_email(&input.email)
            .await?
            .ok_or(ServiceError::Unauthorized)?;

        let cred = self.repo
            .get_credentials(user.id)
            .await?
            .ok_or(ServiceError::Unauthorized)?;

        let parsed = PasswordHash::new(&cred.password_hash).map_err(|e| ServiceError::Hash(e.to_string()))?;
        if Argon2::default().verify_password(input.password.as_bytes(), &parsed).is_err() {
            return Err(ServiceError::Unauthorized);
        }

        let token = self.issue_token(&user)?;
        info!(user_id = %user.id, "user_logged_in");
        Ok(AuthSession { user, token })
    }

    pub async fn profile(&self, id: Uuid) -> Result<Option<PublicUser>, ServiceError> {
        self.repo.find_by_id(id).await
    }

    /// Apply a partial profile update. An email change re-checks uniqueness
    /// excluding the caller's own record; a password change is re-hashed
    /// before it is stored.
    #[instrument(skip(self, input), fields(user_id = %id))]
    pub async fn update_profile(&self, id: Uuid, input: UpdateUserInput) -> Result<PublicUser, ServiceError> {
        if let Some(email) = &input.email {
            models::user::validate_email(email)?;
            if let Some(existing) = self.repo.find_by_email(email).await? {
                if existing.id != id {
                    return Err(ServiceError::Conflict("email already in use".into()));
                }
            }
        }
        if let Some(name) = &input.name {
            models::user::validate_name(name)?;
        }
        if let Some(password) = &input.password {
            validate_password(password)?;
            let hash = hash_password(password)?;
            self.repo.upsert_password(id, hash, self.cfg.password_algorithm.clone()).await?;
        }

        let updated = self.repo.update(id, input.email.as_deref(), input.name.as_deref()).await?;
        info!(user_id = %updated.id, "user_profile_updated");
        Ok(updated)
    }

    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn delete_account(&self, id: Uuid) -> Result<(), ServiceError> {
        if !self.repo.delete(id).await? {
            return Err(ServiceError::not_found("user"));
        }
        info!(user_id = %id, "user_deleted");
        Ok(())
    }

    fn issue_token(&self, user: &PublicUser) -> Result<String, ServiceError> {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            iat: now.timestamp() as usize,
            exp: (now + chrono::Duration::hours(self.cfg.token_ttl_hours)).timestamp() as usize,
        };
        encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(self.cfg.jwt_secret.as_bytes()))
            .map_err(|e| ServiceError::Token(e.to_string()))
    }
}

fn validate_password(password: &str) -> Result<(), ServiceError> {
    if password.len() < 8 {
        return Err(ServiceError::Validation("password too short (>=8)".into()));
    }
    Ok(())
}

fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ServiceError::Hash(e.to_string()))?
        .to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::repository::mock::MockUserRepository;
    use jsonwebtoken::{decode, DecodingKey, Validation, Algorithm};

    fn svc() -> UserService<MockUserRepository> {
        UserService::new(
            Arc::new(MockUserRepository::default()),
            AuthConfig { jwt_secret: "test-secret".into(), token_ttl_hours: 12, password_algorithm: "argon2".into() },
        )
    }

    fn register_input(email: &str) -> RegisterInput {
        RegisterInput { email: email.into(), name: "Tester".into(), password: "S3curePass!".into() }
    }

    #[tokio::test]
    async fn register_then_login_round_trip() {
        let svc = svc();
        let session = svc.register(register_input("a@example.com")).await.unwrap();
        assert_eq!(session.user.email, "a@example.com");
        assert!(!session.token.is_empty());

        let again = svc
            .login(LoginInput { email: "a@example.com".into(), password: "S3curePass!".into() })
            .await
            .unwrap();
        assert_eq!(again.user.id, session.user.id);
    }

    #[tokio::test]
    async fn duplicate_email_is_conflict() {
        let svc = svc();
        svc.register(register_input("dup@example.com")).await.unwrap();
        let err = svc.register(register_input("dup@example.com")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn short_password_is_rejected() {
        let svc = svc();
        let err = svc
            .register(RegisterInput { email: "p@example.com".into(), name: "P".into(), password: "short".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let svc = svc();
        svc.register(register_input("who@example.com")).await.unwrap();

        let wrong_pass = svc
            .login(LoginInput { email: "who@example.com".into(), password: "WrongPass1".into() })
            .await
            .unwrap_err();
        let unknown = svc
            .login(LoginInput { email: "nobody@example.com".into(), password: "S3curePass!".into() })
            .await
            .unwrap_err();
        assert!(matches!(wrong_pass, ServiceError::Unauthorized));
        assert!(matches!(unknown, ServiceError::Unauthorized));
        assert_eq!(wrong_pass.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn stored_credentials_are_hashed() {
        let repo = Arc::new(MockUserRepository::default());
        let svc = UserService::new(
            repo.clone(),
            AuthConfig { jwt_secret: "test-secret".into(), token_ttl_hours: 12, password_algorithm: "argon2".into() },
        );
        let session = svc.register(register_input("hash@example.com")).await.unwrap();

        let cred = repo.get_credentials(session.user.id).await.unwrap().unwrap();
        assert_ne!(cred.password_hash, "S3curePass!");
        assert!(cred.password_hash.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn update_applies_only_supplied_fields() {
        let svc = svc();
        let session = svc.register(register_input("partial@example.com")).await.unwrap();

        let updated = svc
            .update_profile(session.user.id, UpdateUserInput { name: Some("Renamed".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.email, "partial@example.com");
    }

    #[tokio::test]
    async fn update_email_collision_is_conflict() {
        let svc = svc();
        svc.register(register_input("taken@example.com")).await.unwrap();
        let session = svc.register(register_input("mine@example.com")).await.unwrap();

        let err = svc
            .update_profile(session.user.id, UpdateUserInput { email: Some("taken@example.com".into()), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        // Re-submitting one's own email is not a collision
        let ok = svc
            .update_profile(session.user.id, UpdateUserInput { email: Some("mine@example.com".into()), ..Default::default() })
            .await;
        assert!(ok.is_ok());
    }

    #[tokio::test]
    async fn password_change_invalidates_old_password() {
        let svc = svc();
        let session = svc.register(register_input("rotate@example.com")).await.unwrap();

        svc.update_profile(session.user.id, UpdateUserInput { password: Some("N3wPassword".into()), ..Default::default() })
            .await
            .unwrap();

        let old = svc
            .login(LoginInput { email: "rotate@example.com".into(), password: "S3curePass!".into() })
            .await;
        assert!(matches!(old.unwrap_err(), ServiceError::Unauthorized));

        let new = svc
            .login(LoginInput { email: "rotate@example.com".into(), password: "N3wPassword".into() })
            .await;
        assert!(new.is_ok());
    }

    #[tokio::test]
    async fn deleted_account_cannot_login() {
        let svc = svc();
        let session = svc.register(register_input("gone@example.com")).await.unwrap();

        svc.delete_account(session.user.id).await.unwrap();
        let err = svc.delete_account(session.user.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        let login = svc
            .login(LoginInput { email: "gone@example.com".into(), password: "S3curePass!".into() })
            .await;
        assert!(matches!(login.unwrap_err(), ServiceError::Unauthorized));
    }

    #[tokio::test]
    async fn issued_token_carries_subject_and_expiry() {
        let svc = svc();
        let session = svc.register(register_input("claims@example.com")).await.unwrap();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        let data = decode::<Claims>(
            &session.token,
            &DecodingKey::from_secret("test-secret".as_bytes()),
            &validation,
        )
        .unwrap();
        assert_eq!(data.claims.sub, session.user.id.to_string());
        assert_eq!(data.claims.email, "claims@example.com");
        assert!(data.claims.exp > data.claims.iat);
    }
}
