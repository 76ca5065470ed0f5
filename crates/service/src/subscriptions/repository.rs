use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use super::domain::{NewSubscription, SubscriptionUpdate};
use crate::errors::ServiceError;

#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    async fn create(&self, owner_id: Uuid, input: &NewSubscription) -> Result<models::subscription::Model, ServiceError>;
    /// All records of one owner, ascending by billing date.
    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<models::subscription::Model>, ServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<models::subscription::Model>, ServiceError>;
    /// Applies only the supplied fields; errors with NotFound on a missing id.
    async fn update(&self, id: Uuid, changes: &SubscriptionUpdate) -> Result<models::subscription::Model, ServiceError>;
    /// Returns whether a record existed.
    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmSubscriptionRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl SubscriptionRepository for SeaOrmSubscriptionRepository {
    async fn create(&self, owner_id: Uuid, input: &NewSubscription) -> Result<models::subscription::Model, ServiceError> {
        let created = models::subscription::create(
            &self.db,
            owner_id,
            &input.name,
            input.price,
            input.billing_date.into(),
            input.description.clone(),
        )
        .await?;
        Ok(created)
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<models::subscription::Model>, ServiceError> {
        Ok(models::subscription::list_by_user(&self.db, owner_id).await?)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<models::subscription::Model>, ServiceError> {
        models::subscription::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn update(&self, id: Uuid, changes: &SubscriptionUpdate) -> Result<models::subscription::Model, ServiceError> {
        let mut am: models::subscription::ActiveModel = models::subscription::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?
            .ok_or_else(|| ServiceError::not_found("subscription"))?
            .into();
        if let Some(name) = &changes.name {
            am.name = Set(name.clone());
        }
        if let Some(price) = changes.price {
            am.price = Set(price);
        }
        if let Some(date) = changes.billing_date {
            am.billing_date = Set(date.into());
        }
        if let Some(description) = &changes.description {
            am.description = Set(Some(description.clone()));
        }
        am.updated_at = Set(Utc::now().into());
        am.update(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        Ok(models::subscription::hard_delete(&self.db, id).await?)
    }
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockSubscriptionRepository {
        rows: Mutex<HashMap<Uuid, models::subscription::Model>>,
    }

    #[async_trait]
    impl SubscriptionRepository for MockSubscriptionRepository {
        async fn create(&self, owner_id: Uuid, input: &NewSubscription) -> Result<models::subscription::Model, ServiceError> {
            let now = Utc::now().into();
            let row = models::subscription::Model {
                id: Uuid::new_v4(),
                user_id: owner_id,
                name: input.name.clone(),
                price: input.price,
                billing_date: input.billing_date.into(),
                description: input.description.clone(),
                created_at: now,
                updated_at: now,
            };
            self.rows.lock().unwrap().insert(row.id, row.clone());
            Ok(row)
        }

        async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<models::subscription::Model>, ServiceError> {
            let rows = self.rows.lock().unwrap();
            let mut out: Vec<_> = rows.values().filter(|s| s.user_id == owner_id).cloned().collect();
            out.sort_by_key(|s| s.billing_date);
            Ok(out)
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<models::subscription::Model>, ServiceError> {
            Ok(self.rows.lock().unwrap().get(&id).cloned())
        }

        async fn update(&self, id: Uuid, changes: &SubscriptionUpdate) -> Result<models::subscription::Model, ServiceError> {
            let mut rows = self.rows.lock().unwrap();
            let row = rows.get_mut(&id).ok_or_else(|| ServiceError::not_found("subscription"))?;
            if let Some(name) = &changes.name {
                row.name = name.clone();
            }
            if let Some(price) = changes.price {
                row.price = price;
            }
            if let Some(date) = changes.billing_date {
                row.billing_date = date.into();
            }
            if let Some(description) = &changes.description {
                row.description = Some(description.clone());
            }
            row.updated_at = Utc::now().into();
            Ok(row.clone())
        }

        async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
            Ok(self.rows.lock().unwrap().remove(&id).is_some())
        }
    }
}
