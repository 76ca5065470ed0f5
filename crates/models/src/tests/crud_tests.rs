use crate::db::connect;
use crate::{subscription, user, user_credentials};
use sea_orm::{DatabaseConnection, EntityTrait};
use anyhow::Result;
use migration::MigratorTrait;
use uuid::Uuid;
use chrono::{TimeZone, Utc};

/// Tests in this module talk to a real database. They no-op unless
/// DATABASE_URL is set, and can be silenced explicitly via SKIP_DB_TESTS.
fn skip_db_tests() -> bool {
    std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err()
}

/// Setup test database with migrations
async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = connect().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::test]
async fn test_user_crud() -> Result<()> {
    if skip_db_tests() {
        return Ok(());
    }

    let db = setup_test_db().await?;

    let email = format!("test_{}@example.com", Uuid::new_v4());
    let name = "Test User";
    let created = user::create(&db, &email, name).await?;
    assert_eq!(created.email, email);
    assert_eq!(created.name, name);

    let found = user::Entity::find_by_id(created.id).one(&db).await?;
    assert!(found.is_some());
    assert_eq!(found.unwrap().email, email);

    let by_email = user::find_by_email(&db, &email).await?;
    assert_eq!(by_email.unwrap().id, created.id);

    let deleted = user::hard_delete(&db, created.id).await?;
    assert!(deleted);
    let after = user::Entity::find_by_id(created.id).one(&db).await?;
    assert!(after.is_none());
    Ok(())
}

#[tokio::test]
async fn test_duplicate_email_rejected_by_unique_constraint() -> Result<()> {
    if skip_db_tests() {
        return Ok(());
    }

    let db = setup_test_db().await?;

    let email = format!("dup_{}@example.com", Uuid::new_v4());
    let first = user::create(&db, &email, "First").await?;

    // Second insert bypasses any service-level pre-check; the UNIQUE index
    // on user.email must reject it.
    let second = user::create(&db, &email, "Second").await;
    assert!(second.is_err());

    user::hard_delete(&db, first.id).await?;
    Ok(())
}

#[tokio::test]
async fn test_credentials_upsert_replaces_hash() -> Result<()> {
    if skip_db_tests() {
        return Ok(());
    }

    let db = setup_test_db().await?;

    let email = format!("cred_{}@example.com", Uuid::new_v4());
    let u = user::create(&db, &email, "Cred User").await?;

    let c1 = user_credentials::upsert_password(&db, u.id, "hash-one".into(), "argon2").await?;
    assert_eq!(c1.password_hash, "hash-one");

    let c2 = user_credentials::upsert_password(&db, u.id, "hash-two".into(), "argon2").await?;
    assert_eq!(c2.id, c1.id);
    assert_eq!(c2.password_hash, "hash-two");

    let found = user_credentials::find_by_user(&db, u.id).await?;
    assert_eq!(found.unwrap().password_hash, "hash-two");

    user::hard_delete(&db, u.id).await?;
    Ok(())
}

#[tokio::test]
async fn test_subscription_crud_and_ordering() -> Result<()> {
    if skip_db_tests() {
        return Ok(());
    }

    let db = setup_test_db().await?;

    let email = format!("sub_{}@example.com", Uuid::new_v4());
    let owner = user::create(&db, &email, "Sub Owner").await?;

    let march = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    let january = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let february = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();

    let s1 = subscription::create(&db, owner.id, "Spotify", 9.99, march.into(), None).await?;
    let s2 = subscription::create(&db, owner.id, "Netflix", 15.99, january.into(), Some("family plan".into())).await?;
    let s3 = subscription::create(&db, owner.id, "iCloud", 2.99, february.into(), None).await?;

    let listed = subscription::list_by_user(&db, owner.id).await?;
    assert_eq!(listed.len(), 3);
    assert_eq!(listed[0].id, s2.id);
    assert_eq!(listed[1].id, s3.id);
    assert_eq!(listed[2].id, s1.id);

    assert!(subscription::hard_delete(&db, s1.id).await?);
    assert!(!subscription::hard_delete(&db, s1.id).await?);

    // Owner deletion cascades the remaining rows via the FK
    user::hard_delete(&db, owner.id).await?;
    let after = subscription::Entity::find_by_id(s2.id).one(&db).await?;
    assert!(after.is_none());
    Ok(())
}
