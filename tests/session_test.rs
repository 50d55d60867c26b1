use catalog_admin::config::AppConfig;
use catalog_admin::forms::{FormError, FormState};
use catalog_admin::model::{Product, ProductId};
use catalog_admin::product_actor::{sample_products, seeded};
use catalog_admin::session::{
    CatalogSystem, FetchStatus, NotificationKind, SessionError, SessionSnapshot,
};
use catalog_admin::table::{BodyState, SortDirection};
use catalog_admin::CatalogError;
use catalog_framework::mock::{create_mock_client, expect_list, MockClient};
use catalog_framework::{Page, RemoteError, WriteMode};
use std::sync::Arc;

fn ids(snapshot: &SessionSnapshot) -> Vec<u32> {
    snapshot.visible_ids().iter().map(|id| id.0).collect()
}

/// Starts a session over a local collection that keeps its writes.
fn persistent(count: u32) -> CatalogSystem {
    let (actor, client) = seeded(16, count, WriteMode::Persist);
    tokio::spawn(actor.run());
    CatalogSystem::start(&AppConfig::default(), Arc::new(client))
}

async fn fill_add_form(system: &CatalogSystem) {
    let session = &system.session;
    session.open_add_form().await.expect("Failed to open form");
    for (field, value) in [
        ("title", "Desk Lamp"),
        ("description", "Warm light for late nights"),
        ("category", "home-decoration"),
        ("brand", "Lumen"),
        ("sku", "LMP-001"),
        ("price", "24.50"),
        ("stock", "12"),
        ("minimumOrderQuantity", "1"),
    ] {
        session
            .set_add_field(field, value)
            .await
            .expect("Failed to set field");
    }
}

/// Paging through the 194-product catalog: next page, then a larger page size.
#[tokio::test]
async fn test_paging_walkthrough() {
    let system = CatalogSystem::offline(&AppConfig::default());
    let session = &system.session;

    let first = session.settled().await.expect("Session closed");
    assert_eq!(first.footer.label, "1-10 of 194");
    assert_eq!(first.total, Some(194));
    assert_eq!(ids(&first), (1..=10).collect::<Vec<_>>());
    assert!(!first.footer.can_previous);
    assert!(first.footer.can_next);
    assert_eq!(first.body, BodyState::Rows);

    session.next_page().await.expect("Failed to page");
    let second = session.settled().await.expect("Session closed");
    assert_eq!(second.page_index, 1);
    assert_eq!(second.footer.label, "11-20 of 194");
    assert_eq!(ids(&second), (11..=20).collect::<Vec<_>>());

    session.set_page_size(50).await.expect("Failed to resize");
    let resized = session.settled().await.expect("Session closed");
    assert_eq!(resized.page_index, 0);
    assert_eq!(resized.page_size, 50);
    assert_eq!(resized.footer.label, "1-50 of 194");
    assert_eq!(resized.rows.len(), 50);

    // Jumping past the end lands on the last page
    session.set_page(99).await.expect("Failed to jump");
    let last = session.settled().await.expect("Session closed");
    assert_eq!(last.page_index, 3);
    assert_eq!(last.footer.label, "151-194 of 194");
    assert!(!last.footer.can_next);

    system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_rejected_page_size_changes_nothing() {
    let system = CatalogSystem::offline(&AppConfig::default());
    let session = &system.session;
    session.settled().await.expect("Session closed");
    session.next_page().await.expect("Failed to page");
    let before = session.settled().await.expect("Session closed");

    let result = session.set_page_size(15).await;
    assert!(matches!(result, Err(SessionError::Rejected(_))));

    let after = session.snapshot();
    assert_eq!(after.page_index, before.page_index);
    assert_eq!(after.page_size, 10);
    assert_eq!(after.status, FetchStatus::Idle);

    system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_create_prepends_and_counts() {
    let system = CatalogSystem::offline(&AppConfig::default());
    let session = &system.session;
    session.settled().await.expect("Session closed");

    fill_add_form(&system).await;
    session.submit_add().await.expect("Submit rejected");
    assert!(session.snapshot().add_form.is_submitting());

    let after = session.settled().await.expect("Session closed");
    assert_eq!(after.total, Some(195));
    assert_eq!(after.rows[0].id, ProductId(195));
    assert_eq!(after.rows[0].title, "Desk Lamp");
    assert_eq!(after.rows.len(), 11);
    assert_eq!(after.footer.label, "1-11 of 195");
    assert_eq!(after.add_form, FormState::Closed);

    let toast = after.last_notification().expect("No notification");
    assert_eq!(toast.kind, NotificationKind::Success);
    assert_eq!(toast.message, "Product added");

    system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_invalid_form_is_not_sent() {
    let system = CatalogSystem::offline(&AppConfig::default());
    let session = &system.session;
    session.settled().await.expect("Session closed");

    session.open_add_form().await.expect("Failed to open form");
    session.set_add_field("title", "Desk Lamp").await.expect("Failed to set title");
    session.set_add_field("price", "-3").await.expect("Failed to set price");

    let errors = match session.submit_add().await {
        Err(SessionError::Form(FormError::Invalid(errors))) => errors,
        other => panic!("Expected validation errors, got {other:?}"),
    };
    assert!(errors.field("title").is_empty());
    assert_eq!(errors.field("brand"), ["is required"]);
    assert_eq!(errors.field("price"), ["must be at least 0"]);

    let snapshot = session.snapshot();
    assert_eq!(snapshot.pending_writes, 0);
    assert_eq!(snapshot.total, Some(194));
    match &snapshot.add_form {
        FormState::Open { draft, field_errors, .. } => {
            assert_eq!(draft.title, "Desk Lamp");
            assert_eq!(field_errors, &errors);
        }
        other => panic!("Form should stay open, was {other:?}"),
    }

    system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_failed_create_keeps_input() {
    let mut mock = MockClient::<Product>::new();
    mock.expect_list()
        .return_ok(Page::new(sample_products(10), 194, 0, 10));
    mock.expect_create().return_err(RemoteError::Http {
        status: 500,
        message: "boom".into(),
    });

    let system = CatalogSystem::start(&AppConfig::default(), Arc::new(mock.client()));
    system.session.settled().await.expect("Session closed");
    fill_add_form(&system).await;
    system.session.submit_add().await.expect("Submit rejected");

    let after = system.session.settled().await.expect("Session closed");
    assert_eq!(after.total, Some(194));
    assert_eq!(after.rows.len(), 10);
    assert_eq!(after.add_form.error(), Some("boom"));
    assert_eq!(
        after.add_form.draft().map(|d| d.sku.as_str()),
        Some("LMP-001")
    );
    let toast = after.last_notification().expect("No notification");
    assert_eq!(toast.kind, NotificationKind::Error);
    assert!(toast.message.starts_with("Error adding product"));

    mock.verify();
    system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_delete_removes_row() {
    let system = CatalogSystem::offline(&AppConfig::default());
    let session = &system.session;
    session.settled().await.expect("Session closed");

    session.toggle_row(ProductId(3)).await.expect("Failed to select");
    session.delete(ProductId(3)).await.expect("Failed to delete");

    let after = session.settled().await.expect("Session closed");
    assert!(!ids(&after).contains(&3));
    assert_eq!(after.rows.len(), 9);
    assert_eq!(after.total, Some(193));
    assert_eq!(after.footer.label, "1-9 of 193");
    assert!(after.view.row_selection.is_empty());
    assert_eq!(
        after.last_notification().map(|n| n.message.as_str()),
        Some("Product deleted")
    );

    system.shutdown().await.expect("Shutdown failed");
}

/// Deleting the only row on the last page steps back a page and refetches.
#[tokio::test]
async fn test_delete_last_row_steps_back() {
    let system = persistent(11);
    let session = &system.session;
    session.settled().await.expect("Session closed");

    session.next_page().await.expect("Failed to page");
    let last = session.settled().await.expect("Session closed");
    assert_eq!(last.footer.label, "11-11 of 11");

    session.delete(ProductId(11)).await.expect("Failed to delete");
    let after = session.settled().await.expect("Session closed");
    assert_eq!(after.page_index, 0);
    assert_eq!(after.total, Some(10));
    assert_eq!(after.footer.label, "1-10 of 10");
    assert!(!after.footer.can_next);

    system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_edit_merges_into_page() {
    let system = persistent(30);
    let session = &system.session;
    session.settled().await.expect("Session closed");

    // Only rows on the current page can be edited
    let result = session.open_edit(ProductId(25)).await;
    assert!(matches!(result, Err(SessionError::NotOnPage(ProductId(25)))));

    session.open_edit(ProductId(4)).await.expect("Failed to open edit");
    assert_eq!(session.snapshot().editing, Some(ProductId(4)));
    session.set_edit_field("price", "11.25").await.expect("Failed to set price");
    session.submit_edit().await.expect("Submit rejected");

    let after = session.settled().await.expect("Session closed");
    let edited = after
        .rows
        .iter()
        .find(|p| p.id == ProductId(4))
        .expect("Edited row missing");
    assert_eq!(edited.price, 11.25);
    assert_eq!(after.editing, None);
    assert_eq!(after.edit_form, FormState::Closed);
    assert_eq!(after.rows[3].id, ProductId(4));

    // The collection kept the change
    let stored = session.show(ProductId(4)).await.expect("Lookup failed");
    assert_eq!(stored.price, 11.25);

    system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_sort_and_search_stay_on_page() {
    let system = CatalogSystem::offline(&AppConfig::default());
    let session = &system.session;
    session.settled().await.expect("Session closed");

    session
        .add_sort("stock", SortDirection::Desc)
        .await
        .expect("Failed to sort");
    let sorted = session.snapshot();
    let stocks: Vec<u32> = sorted.visible_rows().map(|p| p.stock).collect();
    let mut expected = stocks.clone();
    expected.sort_by(|a, b| b.cmp(a));
    assert_eq!(stocks, expected);
    assert_eq!(sorted.rows.len(), 10);
    assert_eq!(sorted.status, FetchStatus::Idle);

    session.set_search("galaxy").await.expect("Failed to search");
    let searched = session.snapshot();
    assert_eq!(ids(&searched), vec![8]);
    assert_eq!(searched.footer.label, "1-10 of 194");

    session.set_search("no such product").await.expect("Failed to search");
    assert_eq!(session.snapshot().body, BodyState::Empty);

    let result = session.toggle_sort("sku").await;
    assert!(matches!(result, Err(SessionError::Rejected(_))));

    system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_selection_cleared_on_navigation() {
    let system = CatalogSystem::offline(&AppConfig::default());
    let session = &system.session;
    session.settled().await.expect("Session closed");

    session.select_all().await.expect("Failed to select");
    let selected = session.snapshot();
    assert_eq!(selected.model.selection.selected, 10);
    assert!(selected.model.selection.all_selected);

    session.next_page().await.expect("Failed to page");
    assert!(session.snapshot().view.row_selection.is_empty());

    system.shutdown().await.expect("Shutdown failed");
}

/// A late answer for a page the user already left must not replace the current rows.
#[tokio::test]
async fn test_stale_response_is_ignored() {
    let (client, mut requests) = create_mock_client::<Product>(8);
    let system = CatalogSystem::start(&AppConfig::default(), Arc::new(client));
    let session = &system.session;

    let (skip, _, first_page) = expect_list(&mut requests).await.expect("No initial fetch");
    assert_eq!(skip, 0);

    session.set_page(1).await.expect("Failed to page");
    let (skip, limit, second_page) = expect_list(&mut requests).await.expect("No second fetch");
    assert_eq!((skip, limit), (10, 10));

    // Answer out of order
    let products = sample_products(20);
    second_page
        .send(Ok(Page::new(products[10..].to_vec(), 194, 10, 10)))
        .expect("Session dropped the fetch");
    let shown = session.settled().await.expect("Session closed");
    assert_eq!(ids(&shown), (11..=20).collect::<Vec<_>>());

    let revision = shown.revision;
    first_page
        .send(Ok(Page::new(products[..10].to_vec(), 194, 0, 10)))
        .expect("Session dropped the fetch");
    let after = session
        .wait_until(|s| s.revision > revision)
        .await
        .expect("Session closed");
    assert_eq!(after.page_index, 1);
    assert_eq!(ids(&after), (11..=20).collect::<Vec<_>>());
    assert_eq!(after.status, FetchStatus::Idle);

    // The late page was kept for later: going back shows it while it refetches
    session.previous_page().await.expect("Failed to page");
    let back = session.snapshot();
    assert_eq!(back.status, FetchStatus::Loading);
    assert_eq!(back.body, BodyState::Rows);
    assert_eq!(ids(&back), (1..=10).collect::<Vec<_>>());

    let (skip, _, refetch) = expect_list(&mut requests).await.expect("No refetch");
    assert_eq!(skip, 0);
    refetch
        .send(Ok(Page::new(products[..10].to_vec(), 194, 0, 10)))
        .expect("Session dropped the fetch");
    session.settled().await.expect("Session closed");

    system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_fetch_error_then_retry() {
    let mut mock = MockClient::<Product>::new();
    mock.expect_list()
        .return_err(RemoteError::Network("connection refused".into()));
    mock.expect_list()
        .return_ok(Page::new(sample_products(10), 194, 0, 10));

    let system = CatalogSystem::start(&AppConfig::default(), Arc::new(mock.client()));
    let session = &system.session;

    let failed = session.settled().await.expect("Session closed");
    assert!(matches!(failed.status, FetchStatus::Failed(RemoteError::Network(_))));
    assert!(matches!(failed.body, BodyState::Error { .. }));
    assert_eq!(failed.total, None);
    assert_eq!(failed.footer.label, "0-0 of 0");

    session.refresh().await.expect("Failed to refresh");
    let loaded = session.settled().await.expect("Session closed");
    assert_eq!(loaded.body, BodyState::Rows);
    assert_eq!(loaded.footer.label, "1-10 of 194");

    mock.verify();
    system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_shutdown_after_spare_handles_drop() {
    let system = CatalogSystem::offline(&AppConfig::default());
    let spare = system.session.clone();
    spare.settled().await.expect("Session closed");
    drop(spare);

    let result: Result<(), CatalogError> = system.shutdown().await;
    assert!(result.is_ok());
}
