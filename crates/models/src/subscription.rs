use sea_orm::entity::prelude::*;
use sea_orm::{DatabaseConnection, QueryOrder, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::user;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subscription")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub price: f64,
    pub billing_date: DateTimeWithTimeZone,
    pub description: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { User }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() {
        return Err(errors::ModelError::Validation("name required".into()));
    }
    Ok(())
}

pub fn validate_price(price: f64) -> Result<(), errors::ModelError> {
    if !price.is_finite() || price < 0.0 {
        return Err(errors::ModelError::Validation("price must be a non-negative number".into()));
    }
    Ok(())
}

pub async fn create(
    db: &DatabaseConnection,
    user_id: Uuid,
    name: &str,
    price: f64,
    billing_date: DateTimeWithTimeZone,
    description: Option<String>,
) -> Result<Model, errors::ModelError> {
    validate_name(name)?;
    validate_price(price)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        name: Set(name.to_string()),
        price: Set(price),
        billing_date: Set(billing_date),
        description: Set(description),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// All subscriptions of one owner, ascending by billing date.
pub async fn list_by_user(db: &DatabaseConnection, user_id: Uuid) -> Result<Vec<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::UserId.eq(user_id))
        .order_by_asc(Column::BillingDate)
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn hard_delete(db: &DatabaseConnection, id: Uuid) -> Result<bool, errors::ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(res.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_price_rejects_negative_and_nan() {
        assert!(validate_price(-0.01).is_err());
        assert!(validate_price(f64::NAN).is_err());
        assert!(validate_price(0.0).is_ok());
        assert!(validate_price(9.99).is_ok());
    }

    #[test]
    fn model_serializes_camel_case() {
        let now: DateTimeWithTimeZone = Utc::now().into();
        let m = Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "Netflix".into(),
            price: 15.99,
            billing_date: now,
            description: None,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&m).unwrap();
        assert!(json.get("billingDate").is_some());
        assert!(json.get("userId").is_some());
        assert!(json.get("billing_date").is_none());
    }
}
