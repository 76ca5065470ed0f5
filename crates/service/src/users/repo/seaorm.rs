use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::users::domain::{Credentials, PublicUser};
use crate::users::repository::UserRepository;

pub struct SeaOrmUserRepository {
    pub db: DatabaseConnection,
}

fn to_public(u: models::user::Model) -> PublicUser {
    PublicUser { id: u.id, email: u.email, name: u.name }
}

#[async_trait::async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<PublicUser>, ServiceError> {
        let res = models::user::find_by_email(&self.db, email).await?;
        Ok(res.map(to_public))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PublicUser>, ServiceError> {
        let res = models::user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(res.map(to_public))
    }

    async fn create(&self, email: &str, name: &str) -> Result<PublicUser, ServiceError> {
        let created = models::user::create(&self.db, email, name).await?;
        Ok(to_public(created))
    }

    async fn update(&self, id: Uuid, email: Option<&str>, name: Option<&str>) -> Result<PublicUser, ServiceError> {
        let mut am: models::user::ActiveModel = models::user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?
            .ok_or_else(|| ServiceError::not_found("user"))?
            .into();
        if let Some(email) = email {
            am.email = Set(email.to_string());
        }
        if let Some(name) = name {
            am.name = Set(name.to_string());
        }
        am.updated_at = Set(Utc::now().into());
        let updated = am
            .update(&self.db)
            .await
            .map_err(|e| ServiceError::from(models::errors::ModelError::Db(e.to_string())))?;
        Ok(to_public(updated))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        Ok(models::user::hard_delete(&self.db, id).await?)
    }

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, ServiceError> {
        let res = models::user_credentials::find_by_user(&self.db, user_id).await?;
        Ok(res.map(|c| Credentials {
            user_id: c.user_id,
            password_hash: c.password_hash,
            password_algorithm: c.password_algorithm,
        }))
    }

    async fn upsert_password(&self, user_id: Uuid, password_hash: String, password_algorithm: String) -> Result<Credentials, ServiceError> {
        let c = models::user_credentials::upsert_password(&self.db, user_id, password_hash, &password_algorithm).await?;
        Ok(Credentials {
            user_id: c.user_id,
            password_hash: c.password_hash,
            password_algorithm: c.password_algorithm,
        })
    }
}
