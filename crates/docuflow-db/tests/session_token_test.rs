//! Session lifecycle: token digests resolve to users until expiry, and
//! the sweep removes only expired rows.

use chrono::{Duration, Utc};
use docuflow_auth::{generate_token, hash_token};
use docuflow_db::test_fixtures::{create_test_user, TestDatabase};
use docuflow_db::SessionRepository;

#[tokio::test]
#[ignore] // Requires database connection with migrations applied
async fn test_valid_token_resolves_to_user() {
    let test_db = TestDatabase::new().await;
    let user = create_test_user(&test_db).await;

    let token = generate_token();
    test_db
        .db
        .sessions
        .create(user.id, &hash_token(&token), Utc::now() + Duration::hours(24))
        .await
        .unwrap();

    let resolved = test_db
        .db
        .sessions
        .find_user_by_token_hash(&hash_token(&token))
        .await
        .unwrap()
        .expect("token should resolve");
    assert_eq!(resolved.id, user.id);

    // The cleartext token is never a lookup key.
    assert!(test_db
        .db
        .sessions
        .find_user_by_token_hash(&token)
        .await
        .unwrap()
        .is_none());

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires database connection with migrations applied
async fn test_expired_token_is_rejected() {
    let test_db = TestDatabase::new().await;
    let user = create_test_user(&test_db).await;

    let token = generate_token();
    test_db
        .db
        .sessions
        .create(
            user.id,
            &hash_token(&token),
            Utc::now() - Duration::minutes(1),
        )
        .await
        .unwrap();

    assert!(test_db
        .db
        .sessions
        .find_user_by_token_hash(&hash_token(&token))
        .await
        .unwrap()
        .is_none());

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires database connection with migrations applied
async fn test_sweep_removes_only_expired_sessions() {
    let test_db = TestDatabase::new().await;
    let user = create_test_user(&test_db).await;

    let live = generate_token();
    let dead = generate_token();
    test_db
        .db
        .sessions
        .create(user.id, &hash_token(&live), Utc::now() + Duration::hours(1))
        .await
        .unwrap();
    test_db
        .db
        .sessions
        .create(user.id, &hash_token(&dead), Utc::now() - Duration::hours(1))
        .await
        .unwrap();

    let removed = test_db.db.sessions.delete_expired().await.unwrap();
    assert!(removed >= 1);

    assert!(test_db
        .db
        .sessions
        .find_user_by_token_hash(&hash_token(&live))
        .await
        .unwrap()
        .is_some());
    assert!(test_db
        .db
        .sessions
        .find_user_by_token_hash(&hash_token(&dead))
        .await
        .unwrap()
        .is_none());

    test_db.cleanup().await;
}
