//! Postgres-backed store tests. Run with
//! `DATABASE_URL=postgres://... cargo test -- --ignored`.

use std::sync::Arc;

use authsvc::{
    auth::{
        repo::{PgUserStore, StoreError, UserStore},
        repo_types::NewUser,
    },
    db,
};
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

async fn test_pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for db tests");
    let pool = PgPoolOptions::new()
        .max_connections(8)
        .connect(&url)
        .await
        .expect("connect to test database");
    db::migrate(&pool).await.expect("migrations apply");
    pool
}

fn unique_email(tag: &str) -> String {
    format!("{tag}_{}@example.com", Uuid::new_v4())
}

fn new_user(email: &str) -> NewUser {
    NewUser {
        email: email.to_string(),
        name: "Test User".into(),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$placeholder".into(),
    }
}

#[tokio::test]
#[ignore = "requires database"]
async fn insert_then_lookup() {
    let store = PgUserStore::new(test_pool().await);
    let email = unique_email("lookup");

    let user = store.insert_if_absent(new_user(&email)).await.unwrap();
    assert_eq!(user.email, email);

    let by_email = store.find_by_email(&email).await.unwrap().unwrap();
    assert_eq!(by_email.id, user.id);
    assert_eq!(by_email.password_hash, user.password_hash);

    let profile = store.find_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(profile.email, email);
    assert_eq!(profile.name, "Test User");

    assert!(store.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires database"]
async fn duplicate_email_conflicts() {
    let pool = test_pool().await;
    let store = PgUserStore::new(pool.clone());
    let email = unique_email("duplicate");

    store.insert_if_absent(new_user(&email)).await.unwrap();
    let err = store.insert_if_absent(new_user(&email)).await.unwrap_err();
    assert!(matches!(err, StoreError::Conflict));

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE email = $1")
        .bind(&email)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "requires database"]
async fn concurrent_inserts_admit_one_winner() {
    let store = Arc::new(PgUserStore::new(test_pool().await));
    let email = unique_email("race");

    let mut handles = Vec::new();
    for _ in 0..8 {
        let store = Arc::clone(&store);
        let email = email.clone();
        handles.push(tokio::spawn(async move {
            store.insert_if_absent(new_user(&email)).await
        }));
    }

    let mut wins = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => wins += 1,
            Err(StoreError::Conflict) => {}
            Err(e) => panic!("unexpected store error: {e}"),
        }
    }
    assert_eq!(wins, 1);
}
