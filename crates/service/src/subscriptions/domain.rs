use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Creation input. The owner id is never taken from the request body; it is
/// supplied separately from the authenticated caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubscription {
    pub name: String,
    pub price: f64,
    pub billing_date: DateTime<Utc>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Partial update; absent fields stay untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionUpdate {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub billing_date: Option<DateTime<Utc>>,
    pub description: Option<String>,
}
