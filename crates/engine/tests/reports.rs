use engine::{Money, RawTransactionQuery, TransactionFilter};

mod common;

use common::{at, category_named, engine_with_db, record};

#[tokio::test]
async fn balance_sums_the_filtered_view() {
    let (engine, _db) = engine_with_db().await;
    record(&engine, "alice", "pay", 10_000, None, at(2024, 5, 1, 9)).await;
    record(&engine, "alice", "food", -3_000, None, at(2024, 5, 3, 9)).await;
    record(&engine, "bob", "pay", 99_999, None, at(2024, 5, 3, 9)).await;

    let all = engine
        .balance("alice", &TransactionFilter::default())
        .await
        .unwrap();
    assert_eq!(all, Money::new(7_000));

    let expenses = RawTransactionQuery {
        kind: Some("expense".to_string()),
        ..RawTransactionQuery::default()
    }
    .parse()
    .unwrap();
    assert_eq!(
        engine.balance("alice", &expenses).await.unwrap(),
        Money::new(-3_000)
    );
}

#[tokio::test]
async fn balance_of_nothing_is_zero() {
    let (engine, _db) = engine_with_db().await;
    let balance = engine
        .balance("alice", &TransactionFilter::default())
        .await
        .unwrap();
    assert_eq!(balance, Money::ZERO);
}

#[tokio::test]
async fn history_follows_the_running_total() {
    let (engine, _db) = engine_with_db().await;
    record(&engine, "alice", "pay", 10_000, None, at(2024, 5, 1, 9)).await;
    record(&engine, "alice", "food", -3_000, None, at(2024, 5, 3, 9)).await;

    let history = engine
        .balance_history("alice", &TransactionFilter::default(), at(2024, 5, 3, 20))
        .await
        .unwrap();
    let balances: Vec<i64> = history.iter().map(|d| d.balance.cents()).collect();
    assert_eq!(balances, vec![10_000, 10_000, 7_000]);
}

#[tokio::test]
async fn fixed_window_ignores_caller_dates() {
    let (engine, _db) = engine_with_db().await;
    let food = category_named(&engine, "alice", "Food & Dining").await;
    record(&engine, "alice", "lunch", -4_500, Some(&food), at(2024, 5, 2, 12)).await;
    record(&engine, "alice", "april", -9_999, Some(&food), at(2024, 4, 20, 12)).await;

    let filter = RawTransactionQuery {
        start_date: Some("2020-01-01".to_string()),
        end_date: Some("2020-01-31".to_string()),
        ..RawTransactionQuery::default()
    }
    .parse()
    .unwrap();
    let now = at(2024, 5, 4, 10);

    let summary = engine.category_summary("alice", &filter, now).await.unwrap();
    assert_eq!(summary.len(), 1);
    assert_eq!(summary[0].id, food.id);
    assert_eq!(summary[0].amount, Money::new(4_500));

    let history = engine.balance_history("alice", &filter, now).await.unwrap();
    assert_eq!(history.len(), 4);
    assert_eq!(history[3].balance, Money::new(-4_500));
}

#[tokio::test]
async fn summary_keeps_non_date_filters() {
    let (engine, _db) = engine_with_db().await;
    let food = category_named(&engine, "alice", "Food & Dining").await;
    let gifts = category_named(&engine, "alice", "Gifts").await;
    record(&engine, "alice", "lunch", -4_500, Some(&food), at(2024, 5, 2, 12)).await;
    record(&engine, "alice", "present", -2_000, Some(&gifts), at(2024, 5, 2, 12)).await;
    record(&engine, "alice", "gift back", 2_000, Some(&gifts), at(2024, 5, 3, 12)).await;

    let now = at(2024, 5, 4, 10);
    let summary = engine
        .category_summary("alice", &TransactionFilter::default(), now)
        .await
        .unwrap();
    let names: Vec<&str> = summary.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Food & Dining", "Gifts"]);
    assert!(summary.iter().all(|s| s.amount.is_positive()));

    let only_lunch = RawTransactionQuery {
        search: Some("lunch".to_string()),
        ..RawTransactionQuery::default()
    }
    .parse()
    .unwrap();
    let summary = engine
        .category_summary("alice", &only_lunch, now)
        .await
        .unwrap();
    assert_eq!(summary.len(), 1);
    assert_eq!(summary[0].name, "Food & Dining");
}

#[tokio::test]
async fn csv_export_resolves_category_names() {
    let (engine, _db) = engine_with_db().await;
    let food = category_named(&engine, "alice", "Food & Dining").await;
    record(&engine, "alice", "Lunch", -1_250, Some(&food), at(2024, 5, 2, 12)).await;
    record(&engine, "alice", "Misc", 300, None, at(2024, 5, 1, 8)).await;

    let bytes = engine
        .export_csv("alice", &TransactionFilter::default())
        .await
        .unwrap();
    let text = String::from_utf8(bytes).unwrap();
    assert_eq!(
        text.lines().collect::<Vec<_>>(),
        vec![
            "Title,Description,Category,Amount,Date",
            "Lunch,,Food & Dining,-12.50,2024-05-02 12:00",
            "Misc,,Uncategorized,3.00,2024-05-01 08:00",
        ]
    );
}

#[tokio::test]
async fn exports_of_an_empty_view_have_a_header() {
    let (engine, _db) = engine_with_db().await;
    let csv = engine
        .export_csv("bob", &TransactionFilter::default())
        .await
        .unwrap();
    assert_eq!(csv, b"Title,Description,Category,Amount,Date\n");

    let xls = engine
        .export_xls("bob", &TransactionFilter::default())
        .await
        .unwrap();
    // OLE2 compound file signature
    assert_eq!(&xls[..8], &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1]);
}
