use engine::{DEFAULT_CATEGORIES, EngineError, SeedReport, TransactionFilter};

mod common;

use common::{at, engine_with_db, record};

#[tokio::test]
async fn registration_seeds_default_categories() {
    let (engine, _db) = engine_with_db().await;

    let categories = engine.list_categories("alice").await.unwrap();
    assert_eq!(categories.len(), DEFAULT_CATEGORIES.len());
    assert!(
        categories
            .iter()
            .any(|c| c.name == "Food & Dining" && c.color == "#FF5733")
    );
    let mut names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
    let listed = names.clone();
    names.sort_unstable();
    assert_eq!(listed, names, "categories are listed by name");
}

#[tokio::test]
async fn seeding_twice_creates_nothing() {
    let (engine, _db) = engine_with_db().await;

    let report = engine.seed_default_categories("alice").await.unwrap();
    assert_eq!(
        report,
        SeedReport {
            created: 0,
            existing: 13
        }
    );
    assert_eq!(engine.list_categories("alice").await.unwrap().len(), 13);
}

#[tokio::test]
async fn seeding_restores_deleted_defaults_only() {
    let (engine, _db) = engine_with_db().await;
    let gifts = common::category_named(&engine, "alice", "Gifts").await;
    engine.delete_category("alice", gifts.id).await.unwrap();

    let report = engine.seed_default_categories("alice").await.unwrap();
    assert_eq!(report.created, 1);
    assert_eq!(report.existing, 12);
}

#[tokio::test]
async fn seeding_unknown_user_fails() {
    let (engine, _db) = engine_with_db().await;
    let err = engine.seed_default_categories("carol").await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    let err = engine
        .register_user("alice", "another-password")
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("alice".to_string()));
}

#[tokio::test]
async fn registration_validates_input() {
    let (engine, _db) = engine_with_db().await;

    let err = engine.register_user("x", "long-enough").await.unwrap_err();
    assert_eq!(err.field(), Some("username"));
    let err = engine.register_user("carol", "short").await.unwrap_err();
    assert_eq!(err.field(), Some("password"));
    let err = engine
        .register_user("carol smith", "long-enough")
        .await
        .unwrap_err();
    assert_eq!(err.field(), Some("username"));
}

#[tokio::test]
async fn authenticate_checks_password() {
    let (engine, _db) = engine_with_db().await;

    let user = engine.authenticate("alice", "password-a").await.unwrap();
    assert_eq!(user.map(|u| u.username), Some("alice".to_string()));
    assert!(
        engine
            .authenticate("alice", "password-b")
            .await
            .unwrap()
            .is_none()
    );
    assert!(
        engine
            .authenticate("nobody", "password-a")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn delete_user_removes_owned_data() {
    let (engine, _db) = engine_with_db().await;
    record(&engine, "alice", "Coffee", -350, None, at(2024, 5, 2, 9)).await;
    record(&engine, "bob", "Tea", -200, None, at(2024, 5, 2, 9)).await;

    engine.delete_user("alice").await.unwrap();

    assert!(engine.list_categories("alice").await.unwrap().is_empty());
    assert!(
        engine
            .list_transactions("alice", &TransactionFilter::default())
            .await
            .unwrap()
            .is_empty()
    );
    assert!(
        engine
            .authenticate("alice", "password-a")
            .await
            .unwrap()
            .is_none()
    );
    assert_eq!(
        engine
            .list_transactions("bob", &TransactionFilter::default())
            .await
            .unwrap()
            .len(),
        1
    );

    let err = engine.delete_user("alice").await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}
