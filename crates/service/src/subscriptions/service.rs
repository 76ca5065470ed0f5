use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use super::domain::{NewSubscription, SubscriptionUpdate};
use super::repository::SubscriptionRepository;
use crate::errors::ServiceError;

/// Application service encapsulating subscription business rules.
///
/// Note: `get` deliberately does not check ownership; the read-side
/// ownership decision (404 vs 403) belongs to the HTTP handler.
pub struct SubscriptionService<R: SubscriptionRepository> {
    repo: Arc<R>,
}

impl<R: SubscriptionRepository> SubscriptionService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Create a record owned by `owner_id` (the authenticated caller).
    #[instrument(skip(self, input), fields(owner_id = %owner_id, name = %input.name))]
    pub async fn create(&self, owner_id: Uuid, input: NewSubscription) -> Result<models::subscription::Model, ServiceError> {
        models::subscription::validate_name(&input.name)?;
        models::subscription::validate_price(input.price)?;
        let created = self.repo.create(owner_id, &input).await?;
        info!(subscription_id = %created.id, owner_id = %owner_id, "subscription_created");
        Ok(created)
    }

    pub async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<models::subscription::Model>, ServiceError> {
        self.repo.list_by_owner(owner_id).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<models::subscription::Model>, ServiceError> {
        self.repo.find_by_id(id).await
    }

    #[instrument(skip(self, changes), fields(subscription_id = %id))]
    pub async fn update(&self, id: Uuid, changes: SubscriptionUpdate) -> Result<models::subscription::Model, ServiceError> {
        if let Some(name) = &changes.name {
            models::subscription::validate_name(name)?;
        }
        if let Some(price) = changes.price {
            models::subscription::validate_price(price)?;
        }
        let updated = self.repo.update(id, &changes).await?;
        info!(subscription_id = %updated.id, "subscription_updated");
        Ok(updated)
    }

    #[instrument(skip(self), fields(subscription_id = %id))]
    pub async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        let existed = self.repo.delete(id).await?;
        if existed {
            info!(subscription_id = %id, "subscription_deleted");
        }
        Ok(existed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscriptions::repository::mock::MockSubscriptionRepository;
    use chrono::{TimeZone, Utc};

    fn svc() -> SubscriptionService<MockSubscriptionRepository> {
        SubscriptionService::new(Arc::new(MockSubscriptionRepository::default()))
    }

    fn input(name: &str, price: f64, y: i32, m: u32, d: u32) -> NewSubscription {
        NewSubscription {
            name: name.into(),
            price,
            billing_date: Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap(),
            description: None,
        }
    }

    #[tokio::test]
    async fn create_fixes_owner_to_caller() {
        let svc = svc();
        let owner = Uuid::new_v4();
        let created = svc.create(owner, input("Netflix", 15.99, 2024, 6, 1)).await.unwrap();
        assert_eq!(created.user_id, owner);
        assert_eq!(created.name, "Netflix");
    }

    #[tokio::test]
    async fn negative_price_is_rejected() {
        let svc = svc();
        let err = svc.create(Uuid::new_v4(), input("Bad", -1.0, 2024, 6, 1)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn listing_is_ordered_by_ascending_billing_date() {
        let svc = svc();
        let owner = Uuid::new_v4();
        let march = svc.create(owner, input("March", 1.0, 2024, 3, 1)).await.unwrap();
        let january = svc.create(owner, input("January", 1.0, 2024, 1, 1)).await.unwrap();
        let february = svc.create(owner, input("February", 1.0, 2024, 2, 1)).await.unwrap();

        let listed = svc.list_by_owner(owner).await.unwrap();
        let ids: Vec<_> = listed.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![january.id, february.id, march.id]);
    }

    #[tokio::test]
    async fn listing_is_scoped_to_the_owner() {
        let svc = svc();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        svc.create(alice, input("Hers", 1.0, 2024, 1, 1)).await.unwrap();
        svc.create(bob, input("His", 1.0, 2024, 1, 1)).await.unwrap();

        let hers = svc.list_by_owner(alice).await.unwrap();
        assert_eq!(hers.len(), 1);
        assert!(hers.iter().all(|s| s.user_id == alice));
    }

    #[tokio::test]
    async fn partial_update_preserves_unspecified_fields() {
        let svc = svc();
        let owner = Uuid::new_v4();
        let mut seed = input("Spotify", 9.99, 2024, 5, 10);
        seed.description = Some("student plan".into());
        let created = svc.create(owner, seed).await.unwrap();

        let updated = svc
            .update(created.id, SubscriptionUpdate { name: Some("Spotify Duo".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(updated.name, "Spotify Duo");
        assert_eq!(updated.price, 9.99);
        assert_eq!(updated.billing_date, created.billing_date);
        assert_eq!(updated.description.as_deref(), Some("student plan"));
    }

    #[tokio::test]
    async fn update_of_missing_record_is_not_found() {
        let svc = svc();
        let err = svc
            .update(Uuid::new_v4(), SubscriptionUpdate { name: Some("X".into()), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_reports_whether_a_record_existed() {
        let svc = svc();
        let owner = Uuid::new_v4();
        let created = svc.create(owner, input("Gone", 1.0, 2024, 4, 1)).await.unwrap();

        assert!(svc.delete(created.id).await.unwrap());
        assert!(!svc.delete(created.id).await.unwrap());
        assert!(svc.get(created.id).await.unwrap().is_none());
    }
}
