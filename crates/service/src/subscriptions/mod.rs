//! Subscription module: repository seam plus an application service.
//!
//! Ownership of a record is fixed at creation time; handlers are responsible
//! for the read-side ownership check.

pub mod domain;
pub mod repository;
pub mod service;

pub use service::SubscriptionService;
