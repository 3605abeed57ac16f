//! List-filter semantics: category and search combine with AND, search
//! matches title, file name, and tags case-insensitively, and wildcard
//! characters in the search term are treated literally.

use docuflow_db::test_fixtures::{create_test_user, TestDatabase};
use docuflow_db::{
    CategoryRepository, CreateDocumentRequest, DocumentRepository, ListDocumentsRequest,
};
use uuid::Uuid;

async fn insert_doc(
    test_db: &TestDatabase,
    user_id: Uuid,
    title: &str,
    file_name: &str,
    category_id: Option<Uuid>,
    tags: &[&str],
) -> Uuid {
    let doc = test_db
        .db
        .documents
        .insert(CreateDocumentRequest {
            user_id,
            title: title.to_string(),
            file_name: file_name.to_string(),
            file_type: "application/pdf".to_string(),
            file_size: 42,
            content_hash: "blake3:test".to_string(),
            storage_path: format!("files/te/st/{}.bin", Uuid::now_v7()),
            category_id,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        })
        .await
        .expect("insert document");
    doc.id
}

#[tokio::test]
#[ignore] // Requires database connection with migrations applied
async fn test_search_and_category_filters_combine_with_and() {
    let test_db = TestDatabase::new().await;
    let user = create_test_user(&test_db).await;

    let invoices = test_db
        .db
        .categories
        .insert(user.id, "Invoices")
        .await
        .unwrap();
    let reports = test_db
        .db
        .categories
        .insert(user.id, "Reports")
        .await
        .unwrap();

    let in_both = insert_doc(
        &test_db,
        user.id,
        "Annual tax invoice",
        "tax.pdf",
        Some(invoices.id),
        &[],
    )
    .await;
    // Matches search but not category
    insert_doc(
        &test_db,
        user.id,
        "Tax summary",
        "summary.pdf",
        Some(reports.id),
        &[],
    )
    .await;
    // Matches category but not search
    insert_doc(
        &test_db,
        user.id,
        "Office supplies",
        "supplies.pdf",
        Some(invoices.id),
        &[],
    )
    .await;

    let hits = test_db
        .db
        .documents
        .list(
            user.id,
            ListDocumentsRequest {
                category_id: Some(invoices.id),
                search: Some("tax".to_string()),
            },
        )
        .await
        .unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, in_both);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires database connection with migrations applied
async fn test_search_matches_title_filename_and_tags() {
    let test_db = TestDatabase::new().await;
    let user = create_test_user(&test_db).await;

    let by_title = insert_doc(&test_db, user.id, "Budget 2026", "b.pdf", None, &[]).await;
    let by_name = insert_doc(&test_db, user.id, "Untitled", "budget-final.xlsx", None, &[]).await;
    let by_tag = insert_doc(
        &test_db,
        user.id,
        "Meeting notes",
        "notes.txt",
        None,
        &["budget", "q3"],
    )
    .await;
    insert_doc(&test_db, user.id, "Unrelated", "photo.png", None, &["holiday"]).await;

    let hits = test_db
        .db
        .documents
        .list(
            user.id,
            ListDocumentsRequest {
                category_id: None,
                // Case-insensitive
                search: Some("BUDGET".to_string()),
            },
        )
        .await
        .unwrap();

    let ids: Vec<Uuid> = hits.iter().map(|d| d.id).collect();
    assert_eq!(ids.len(), 3);
    assert!(ids.contains(&by_title));
    assert!(ids.contains(&by_name));
    assert!(ids.contains(&by_tag));

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires database connection with migrations applied
async fn test_search_wildcards_are_literal() {
    let test_db = TestDatabase::new().await;
    let user = create_test_user(&test_db).await;

    let with_percent = insert_doc(&test_db, user.id, "50% off", "deal.pdf", None, &[]).await;
    insert_doc(&test_db, user.id, "500 units", "units.pdf", None, &[]).await;

    let hits = test_db
        .db
        .documents
        .list(
            user.id,
            ListDocumentsRequest {
                category_id: None,
                search: Some("50%".to_string()),
            },
        )
        .await
        .unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, with_percent);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires database connection with migrations applied
async fn test_documents_are_scoped_to_owner() {
    let test_db = TestDatabase::new().await;
    let alice = create_test_user(&test_db).await;
    let bob = create_test_user(&test_db).await;

    let alices_doc = insert_doc(&test_db, alice.id, "Private", "p.pdf", None, &[]).await;

    let bob_sees = test_db
        .db
        .documents
        .list(bob.id, ListDocumentsRequest::default())
        .await
        .unwrap();
    assert!(bob_sees.iter().all(|d| d.id != alices_doc));

    assert!(test_db
        .db
        .documents
        .find(bob.id, alices_doc)
        .await
        .unwrap()
        .is_none());

    test_db.cleanup().await;
}
