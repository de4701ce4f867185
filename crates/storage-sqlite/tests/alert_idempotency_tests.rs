//! Integration tests for the alert store's conditional insert, run against
//! a real on-disk SQLite database. The at-most-one-unresolved-alert rule is
//! enforced by the partial unique index, so it has to be proven here rather
//! than against mocks.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use spendguard_core::alerts::{
    AlertKind, AlertRepositoryTrait, AlertSeverity, AlertStatus, NewAlert,
};
use spendguard_storage_sqlite::alerts::AlertRepository;
use spendguard_storage_sqlite::db::{self, spawn_writer, DbPool, WriteHandle};

fn new_alert(budget_id: &str, period_start: NaiveDate) -> NewAlert {
    NewAlert {
        user_id: "user-1".to_string(),
        kind: AlertKind::Budget,
        budget_id: Some(budget_id.to_string()),
        period_start: Some(period_start),
        severity: AlertSeverity::Warn,
        title: "Budget exceeded: dining".to_string(),
        message: None,
    }
}

fn january() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn setup() -> (tempfile::TempDir, Arc<DbPool>, WriteHandle) {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test.db");
    let db_path = db::init(db_path.to_str().unwrap()).unwrap();
    let pool = db::create_pool(&db_path).unwrap();
    db::run_migrations(&pool).unwrap();
    let writer = spawn_writer(pool.as_ref().clone());
    (dir, pool, writer)
}

#[tokio::test]
async fn duplicate_insert_is_swallowed() {
    let (_dir, pool, writer) = setup();
    let repo = AlertRepository::new(pool, writer);

    let created = repo.create_if_absent(new_alert("bgt_1", january())).await.unwrap();
    assert!(created);

    let created_again = repo.create_if_absent(new_alert("bgt_1", january())).await.unwrap();
    assert!(!created_again);

    let alerts = repo.list_alerts("user-1", None).unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].status, AlertStatus::New);
}

#[tokio::test]
async fn distinct_periods_and_budgets_do_not_conflict() {
    let (_dir, pool, writer) = setup();
    let repo = AlertRepository::new(pool, writer);

    assert!(repo.create_if_absent(new_alert("bgt_1", january())).await.unwrap());
    assert!(repo
        .create_if_absent(new_alert("bgt_1", NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()))
        .await
        .unwrap());
    assert!(repo.create_if_absent(new_alert("bgt_2", january())).await.unwrap());

    assert_eq!(repo.list_alerts("user-1", None).unwrap().len(), 3);
}

#[tokio::test]
async fn acknowledged_alert_still_blocks_a_second_insert() {
    let (_dir, pool, writer) = setup();
    let repo = AlertRepository::new(pool, writer);

    assert!(repo.create_if_absent(new_alert("bgt_1", january())).await.unwrap());
    let alert = repo.list_alerts("user-1", None).unwrap().remove(0);
    repo.set_status(&alert.id, AlertStatus::Acknowledged, None)
        .await
        .unwrap();

    // Acknowledged is still unresolved, so the key is still held.
    assert!(!repo.create_if_absent(new_alert("bgt_1", january())).await.unwrap());
}

#[tokio::test]
async fn resolving_frees_the_period_for_a_new_alert() {
    let (_dir, pool, writer) = setup();
    let repo = AlertRepository::new(pool, writer);

    assert!(repo.create_if_absent(new_alert("bgt_1", january())).await.unwrap());
    let alert = repo.list_alerts("user-1", None).unwrap().remove(0);
    repo.set_status(&alert.id, AlertStatus::Resolved, Some(Utc::now()))
        .await
        .unwrap();

    // Re-exceeding the same period after a resolve may raise a fresh alert.
    assert!(repo.create_if_absent(new_alert("bgt_1", january())).await.unwrap());

    let open = repo
        .list_alerts("user-1", Some(AlertStatus::New))
        .unwrap();
    assert_eq!(open.len(), 1);
}

#[tokio::test]
async fn concurrent_inserts_create_exactly_one() {
    let (_dir, pool, writer) = setup();
    let repo = Arc::new(AlertRepository::new(pool, writer));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let repo = repo.clone();
        handles.push(tokio::spawn(async move {
            repo.create_if_absent(new_alert("bgt_1", january())).await
        }));
    }

    let mut created = 0;
    for handle in handles {
        if handle.await.unwrap().unwrap() {
            created += 1;
        }
    }
    assert_eq!(created, 1);
    assert_eq!(repo.list_alerts("user-1", None).unwrap().len(), 1);
}
