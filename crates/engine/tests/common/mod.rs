#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use sea_orm::{Database, DatabaseConnection};

use engine::{Category, Engine, Money, NewTransaction, Transaction};
use migration::MigratorTrait;

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    engine.register_user("alice", "password-a").await.unwrap();
    engine.register_user("bob", "password-b").await.unwrap();
    (engine, db)
}

pub fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

pub async fn category_named(engine: &Engine, user: &str, name: &str) -> Category {
    engine
        .list_categories(user)
        .await
        .unwrap()
        .into_iter()
        .find(|c| c.name == name)
        .expect("category missing")
}

pub async fn record(
    engine: &Engine,
    user: &str,
    title: &str,
    cents: i64,
    category: Option<&Category>,
    created_at: DateTime<Utc>,
) -> Transaction {
    let mut cmd = NewTransaction::new(title, Money::new(cents));
    if let Some(category) = category {
        cmd = cmd.category(category.id);
    }
    engine.create_transaction(user, cmd, created_at).await.unwrap()
}
