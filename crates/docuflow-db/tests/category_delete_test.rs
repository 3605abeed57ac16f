//! Category lifecycle: deletion demotes referencing documents to
//! uncategorized instead of being blocked, and per-user name uniqueness
//! is enforced at the database.

use docuflow_db::test_fixtures::{create_test_user, TestDatabase};
use docuflow_db::{
    CategoryRepository, CreateDocumentRequest, DocumentRepository, Error,
};
use uuid::Uuid;

#[tokio::test]
#[ignore] // Requires database connection with migrations applied
async fn test_delete_category_demotes_documents_to_uncategorized() {
    let test_db = TestDatabase::new().await;
    let user = create_test_user(&test_db).await;

    let category = test_db
        .db
        .categories
        .insert(user.id, "Receipts")
        .await
        .unwrap();

    let doc = test_db
        .db
        .documents
        .insert(CreateDocumentRequest {
            user_id: user.id,
            title: "Lunch receipt".to_string(),
            file_name: "lunch.jpg".to_string(),
            file_type: "image/jpeg".to_string(),
            file_size: 12345,
            content_hash: "blake3:test".to_string(),
            storage_path: format!("files/te/st/{}.bin", Uuid::now_v7()),
            category_id: Some(category.id),
            tags: vec![],
        })
        .await
        .unwrap();
    assert_eq!(doc.category_id, Some(category.id));

    // Never blocked by the referencing document.
    test_db
        .db
        .categories
        .delete(user.id, category.id)
        .await
        .unwrap();

    let reloaded = test_db
        .db
        .documents
        .find(user.id, doc.id)
        .await
        .unwrap()
        .expect("document survives category deletion");
    assert_eq!(reloaded.category_id, None);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires database connection with migrations applied
async fn test_delete_missing_category_is_not_found() {
    let test_db = TestDatabase::new().await;
    let user = create_test_user(&test_db).await;

    let missing = Uuid::now_v7();
    let err = test_db
        .db
        .categories
        .delete(user.id, missing)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::CategoryNotFound(id) if id == missing));

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires database connection with migrations applied
async fn test_duplicate_category_name_conflicts_per_user() {
    let test_db = TestDatabase::new().await;
    let alice = create_test_user(&test_db).await;
    let bob = create_test_user(&test_db).await;

    test_db
        .db
        .categories
        .insert(alice.id, "Taxes")
        .await
        .unwrap();

    // Same name again for the same user conflicts, case-insensitively.
    assert!(matches!(
        test_db.db.categories.insert(alice.id, "taxes").await,
        Err(Error::Conflict(_))
    ));

    // A different user may reuse the name.
    test_db.db.categories.insert(bob.id, "Taxes").await.unwrap();

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires database connection with migrations applied
async fn test_category_delete_is_owner_scoped() {
    let test_db = TestDatabase::new().await;
    let alice = create_test_user(&test_db).await;
    let bob = create_test_user(&test_db).await;

    let category = test_db
        .db
        .categories
        .insert(alice.id, "Contracts")
        .await
        .unwrap();

    // Bob cannot delete Alice's category.
    assert!(matches!(
        test_db.db.categories.delete(bob.id, category.id).await,
        Err(Error::CategoryNotFound(_))
    ));

    // Still present for Alice.
    assert!(test_db
        .db
        .categories
        .find(alice.id, category.id)
        .await
        .unwrap()
        .is_some());

    test_db.cleanup().await;
}
