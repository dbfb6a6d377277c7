//! Integration tests for the MySQL token repository
//!
//! These tests require a running MySQL instance with the `refresh_tokens`
//! table and a `DATABASE_URL` environment variable pointing at it.
//! Run with: cargo test -p tk_infra --test token_repository_integration -- --ignored

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use tk_core::domain::entities::token::RefreshToken;
use tk_core::repositories::TokenRepository;
use tk_infra::database::{DatabasePool, MySqlTokenRepository};
use tk_shared::config::DatabaseConfig;

async fn create_repository() -> MySqlTokenRepository {
    dotenvy::dotenv().ok();
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let config = DatabaseConfig::from_env();
    let pool = DatabasePool::new(config)
        .await
        .expect("Failed to connect to MySQL");

    MySqlTokenRepository::new(pool.get_pool().clone())
}

fn test_token(user_id: Uuid) -> RefreshToken {
    // Unique per test run so reruns do not collide on the hash key
    RefreshToken::new(
        user_id,
        format!("test-hash-{}", Uuid::new_v4()),
        Uuid::new_v4().to_string(),
        Duration::days(7),
    )
}

#[tokio::test]
#[ignore] // Requires MySQL server
async fn test_save_and_find_roundtrip() {
    let repo = create_repository().await;
    let token = test_token(Uuid::new_v4());

    let saved = repo.save_refresh_token(token.clone()).await.unwrap();
    assert_eq!(saved.id, token.id);

    let found = repo
        .find_refresh_token(&token.token_hash)
        .await
        .unwrap()
        .expect("saved token not found");

    assert_eq!(found.id, token.id);
    assert_eq!(found.user_id, token.user_id);
    assert_eq!(found.jwt_id, token.jwt_id);
    assert!(!found.is_used);
    assert!(!found.is_revoked);
}

#[tokio::test]
#[ignore] // Requires MySQL server
async fn test_duplicate_hash_is_rejected() {
    let repo = create_repository().await;
    let token = test_token(Uuid::new_v4());

    repo.save_refresh_token(token.clone()).await.unwrap();

    let mut duplicate = test_token(token.user_id);
    duplicate.token_hash = token.token_hash.clone();

    let result = repo.save_refresh_token(duplicate).await;
    assert!(result.is_err());
}

#[tokio::test]
#[ignore] // Requires MySQL server
async fn test_claim_consumes_token_exactly_once() {
    let repo = create_repository().await;
    let token = test_token(Uuid::new_v4());
    repo.save_refresh_token(token.clone()).await.unwrap();

    assert!(repo.claim_refresh_token(&token.token_hash).await.unwrap());
    assert!(!repo.claim_refresh_token(&token.token_hash).await.unwrap());

    let stored = repo
        .find_refresh_token(&token.token_hash)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.is_used);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore] // Requires MySQL server
async fn test_concurrent_claims_have_single_winner() {
    let repo = Arc::new(create_repository().await);
    let token = test_token(Uuid::new_v4());
    repo.save_refresh_token(token.clone()).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let repo = Arc::clone(&repo);
        let hash = token.token_hash.clone();
        handles.push(tokio::spawn(
            async move { repo.claim_refresh_token(&hash).await },
        ));
    }

    let mut winners = 0;
    for handle in handles {
        if handle.await.unwrap().unwrap() {
            winners += 1;
        }
    }

    assert_eq!(winners, 1);
}

#[tokio::test]
#[ignore] // Requires MySQL server
async fn test_claim_refuses_revoked_token() {
    let repo = create_repository().await;
    let token = test_token(Uuid::new_v4());
    repo.save_refresh_token(token.clone()).await.unwrap();

    assert!(repo.revoke_token(&token.token_hash).await.unwrap());
    assert!(!repo.claim_refresh_token(&token.token_hash).await.unwrap());
}

#[tokio::test]
#[ignore] // Requires MySQL server
async fn test_revoke_reports_absent_and_repeated_rows() {
    let repo = create_repository().await;
    let token = test_token(Uuid::new_v4());
    repo.save_refresh_token(token.clone()).await.unwrap();

    assert!(repo.revoke_token(&token.token_hash).await.unwrap());
    assert!(!repo.revoke_token(&token.token_hash).await.unwrap());
    assert!(!repo.revoke_token("never-stored-hash").await.unwrap());
}

#[tokio::test]
#[ignore] // Requires MySQL server
async fn test_find_active_filters_dead_rows() {
    let repo = create_repository().await;
    let user_id = Uuid::new_v4();

    let active = test_token(user_id);
    repo.save_refresh_token(active.clone()).await.unwrap();

    let used = test_token(user_id);
    repo.save_refresh_token(used.clone()).await.unwrap();
    repo.claim_refresh_token(&used.token_hash).await.unwrap();

    let revoked = test_token(user_id);
    repo.save_refresh_token(revoked.clone()).await.unwrap();
    repo.revoke_token(&revoked.token_hash).await.unwrap();

    let mut expired = test_token(user_id);
    expired.expires_at = Utc::now() - Duration::days(1);
    repo.save_refresh_token(expired).await.unwrap();

    let found = repo.find_active_by_user(user_id).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, active.id);
}

#[tokio::test]
#[ignore] // Requires MySQL server
async fn test_revoke_all_user_tokens_counts_rows() {
    let repo = create_repository().await;
    let user_id = Uuid::new_v4();

    repo.save_refresh_token(test_token(user_id)).await.unwrap();
    repo.save_refresh_token(test_token(user_id)).await.unwrap();

    let already_revoked = test_token(user_id);
    repo.save_refresh_token(already_revoked.clone())
        .await
        .unwrap();
    repo.revoke_token(&already_revoked.token_hash).await.unwrap();

    let revoked = repo.revoke_all_user_tokens(user_id).await.unwrap();
    assert_eq!(revoked, 2);

    assert!(repo.find_active_by_user(user_id).await.unwrap().is_empty());
}
