//! Category operations against the in-memory gateway

mod common;

use catalog_client::models::{
    Availability, AvailabilityFields, CategoryDraft, CategoryPatch, FilePayload, ImageSource,
};
use catalog_client::{CatalogAction, EntityKind, ErrorCode, StoreEvent};
use common::{loaded_store, raw_category, seeded_gateway, MockGateway};

fn ids<T>(items: &[T], id: impl Fn(&T) -> &str) -> Vec<String> {
    items.iter().map(|i| id(i).to_string()).collect()
}

#[tokio::test]
async fn test_load_categories_formats_records() {
    let (_, store) = loaded_store(seeded_gateway()).await;

    let categories = store.categories();
    assert_eq!(ids(&categories, |c| &c.id), vec!["C1", "C2"]);
    assert!(categories.iter().all(|c| !c.archived && c.product_count == 0));
    assert!(store.selected_category_id().is_none());
}

#[tokio::test]
async fn test_load_failure_is_structured() {
    let gateway = seeded_gateway();
    gateway.fail("list_categories");
    let store = catalog_client::CatalogStore::new(std::sync::Arc::new(gateway), common::MERCHANT);

    let err = store.load_categories().await.unwrap_err();
    assert_eq!(err.entity, EntityKind::Category);
    assert_eq!(err.action, CatalogAction::Load);
    assert_eq!(err.code, ErrorCode::ServiceUnavailable);
    assert!(store.categories().is_empty());
}

#[tokio::test]
async fn test_create_category_appends_and_selects() {
    let (gateway, store) = loaded_store(seeded_gateway()).await;

    let draft = CategoryDraft::new("  Desserts ")
        .with_availability(AvailabilityFields::time_range("14:00", "23:00"))
        .with_image(FilePayload::new("cake.png", vec![1, 2, 3]));
    let created = store.create_category(draft).await.unwrap();

    assert_eq!(created.name, "Desserts");
    assert_eq!(created.images, vec!["uploads/cake.png"]);
    assert_eq!(
        created.availability,
        Availability::TimeRange {
            from: "14:00".into(),
            to: "23:00".into()
        }
    );
    assert_eq!(ids(&store.categories(), |c| &c.id), vec!["C1", "C2", created.id.as_str()]);
    assert_eq!(store.selected_category_id(), Some(created.id.clone()));
    assert!(store.products().is_empty());
    assert_eq!(gateway.call_count("create_category"), 1);
}

#[tokio::test]
async fn test_create_category_failure_leaves_list_untouched() {
    let (gateway, store) = loaded_store(seeded_gateway()).await;
    let before = store.snapshot();
    gateway.fail("create_category");

    let err = store.create_category(CategoryDraft::new("Desserts")).await.unwrap_err();

    assert_eq!(err.action, CatalogAction::Create);
    assert_eq!(err.to_string(), "Failed to create category Desserts: create_category unavailable");
    assert_eq!(store.snapshot(), before);
}

#[tokio::test]
async fn test_invalid_draft_never_reaches_gateway() {
    let (gateway, store) = loaded_store(seeded_gateway()).await;

    let err = store
        .create_category(CategoryDraft::new("Late").with_availability(AvailabilityFields::time_based("25:99")))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationFailed);

    let err = store.create_category(CategoryDraft::new("   ")).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationFailed);
    assert_eq!(gateway.call_count("create_category"), 0);
}

#[tokio::test]
async fn test_edit_category_sends_image_diff() {
    let mut c1 = raw_category("C1", "Starters");
    c1.images = Some(vec!["img/a.jpg".into(), "img/b.jpg".into(), "img/c.jpg".into()]);
    let (gateway, store) = loaded_store(MockGateway::new().with_categories(vec![c1])).await;
    let _ = store.select_category("C1").await;

    let mut images = store.category("C1").unwrap().image_sources();
    images.push(FilePayload::new("new.webp", vec![9]).into());
    let patch = CategoryPatch {
        name: Some("Small plates".into()),
        images: Some(images),
        images_to_remove: vec!["img/b.jpg".into()],
        ..Default::default()
    };
    let edited = store.edit_category("C1", patch).await.unwrap();

    let (id, update, uploads) = gateway.last_category_update().unwrap();
    assert_eq!(id, "C1");
    assert_eq!(update.images.existing_images, vec!["img/a.jpg", "img/c.jpg"]);
    assert_eq!(update.images.images_to_remove, vec!["img/b.jpg"]);
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].file_name, "new.webp");

    assert_eq!(edited.images, vec!["img/a.jpg", "img/c.jpg", "uploads/new.webp"]);
    assert_eq!(store.category("C1").unwrap().name, "Small plates");
    assert_eq!(store.selected_category_id(), Some("C1".to_string()));
}

#[tokio::test]
async fn test_edit_removal_wins_over_kept_reference() {
    let mut c1 = raw_category("C1", "Starters");
    c1.images = Some(vec!["img/a.jpg".into()]);
    let (gateway, store) = loaded_store(MockGateway::new().with_categories(vec![c1])).await;

    let patch = CategoryPatch {
        images: Some(vec![ImageSource::reference("img/a.jpg")]),
        images_to_remove: vec!["img/a.jpg".into()],
        ..Default::default()
    };
    store.edit_category("C1", patch).await.unwrap();

    let (_, update, _) = gateway.last_category_update().unwrap();
    assert!(update.images.existing_images.is_empty());
    assert_eq!(update.images.images_to_remove, vec!["img/a.jpg"]);
}

#[tokio::test]
async fn test_edit_category_failure_keeps_local_entity() {
    let (gateway, store) = loaded_store(seeded_gateway()).await;
    let before = store.category("C1").unwrap();
    gateway.fail("update_category");

    let err = store
        .edit_category(
            "C1",
            CategoryPatch {
                name: Some("Renamed".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert_eq!(err.target.as_deref(), Some("C1"));
    assert_eq!(err.action, CatalogAction::Update);
    assert_eq!(store.category("C1").unwrap(), before);
}

#[tokio::test]
async fn test_edit_unknown_category() {
    let (gateway, store) = loaded_store(seeded_gateway()).await;
    let err = store.edit_category("nope", CategoryPatch::default()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::CategoryNotFound);
    assert_eq!(gateway.call_count("update_category"), 0);
}

#[tokio::test]
async fn test_delete_category_cascades_and_clears_selection() {
    let (_, store) = loaded_store(seeded_gateway()).await;
    store.select_category("C1").await.unwrap();
    assert_eq!(store.products().len(), 2);

    store.delete_category("C1").await.unwrap();

    assert_eq!(ids(&store.categories(), |c| &c.id), vec!["C2"]);
    assert!(store.products().is_empty());
    assert!(store.selected_category_id().is_none());
}

#[tokio::test]
async fn test_delete_category_failure_restores_everything() {
    let (gateway, store) = loaded_store(seeded_gateway()).await;
    store.select_category("C1").await.unwrap();
    let before = store.snapshot();
    assert_eq!(ids(&before.products, |p| &p.id), vec!["P1", "P2"]);
    gateway.fail("delete_category");

    let mut events = store.subscribe();
    let err = store.delete_category("C1").await.unwrap_err();

    assert_eq!(err.to_string(), "Failed to delete category C1: delete_category unavailable");
    let after = store.snapshot();
    assert_eq!(after, before);
    assert_eq!(ids(&after.categories, |c| &c.id), vec!["C1", "C2"]);
    assert_eq!(ids(&after.products, |p| &p.id), vec!["P1", "P2"]);

    // applied, then rolled back
    let mut seen = Vec::new();
    while let Ok(event) = events.try_recv() {
        seen.push(event);
    }
    assert_eq!(seen.iter().filter(|e| **e == StoreEvent::CategoriesChanged).count(), 2);
}

#[tokio::test]
async fn test_delete_category_applies_before_gateway_answers() {
    let (gateway, store) = loaded_store(seeded_gateway()).await;
    store.select_category("C1").await.unwrap();
    let before = store.snapshot();
    let gate = gateway.gate_call("delete_category");
    gateway.fail("delete_category");

    let (result, ()) = tokio::join!(store.delete_category("C1"), async {
        assert_eq!(ids(&store.categories(), |c| &c.id), vec!["C2"]);
        assert!(store.products().is_empty());
        assert_eq!(gateway.call_count("delete_category"), 0);
        gate.notify_one();
    });

    assert!(result.is_err());
    assert_eq!(store.snapshot(), before);
}

#[tokio::test]
async fn test_delete_unselected_category_keeps_selection() {
    let (_, store) = loaded_store(seeded_gateway()).await;
    store.select_category("C1").await.unwrap();

    store.delete_category("C2").await.unwrap();

    assert_eq!(store.selected_category_id(), Some("C1".to_string()));
    assert_eq!(store.products().len(), 2);
}

#[tokio::test]
async fn test_toggle_category_is_optimistic() {
    let (gateway, store) = loaded_store(seeded_gateway()).await;

    let active = store.toggle_category_active("C1").await.unwrap();
    assert!(!active);
    assert!(!store.category("C1").unwrap().active);
    assert_eq!(store.category("C1").unwrap().status().label(), "Inactive");

    gateway.fail("toggle_category_active");
    let gate = gateway.gate_call("toggle_category_active");
    let (result, ()) = tokio::join!(store.toggle_category_active("C1"), async {
        // flipped while the call is in flight
        assert!(store.category("C1").unwrap().active);
        gate.notify_one();
    });
    let err = result.unwrap_err();
    assert_eq!(err.action, CatalogAction::ToggleActive);
    assert!(!store.category("C1").unwrap().active);
}

#[tokio::test]
async fn test_archive_and_unarchive_refetch_categories() {
    let (gateway, store) = loaded_store(seeded_gateway()).await;

    let remaining = store.archive_category("C2").await.unwrap();
    assert_eq!(remaining, 1);
    assert_eq!(ids(&store.categories(), |c| &c.id), vec!["C1"]);

    let remaining = store.unarchive_category("C2").await.unwrap();
    assert_eq!(remaining, 2);
    assert_eq!(gateway.call_count("list_categories"), 3);
}

#[tokio::test]
async fn test_archive_failure_and_refetch_failure() {
    let (gateway, store) = loaded_store(seeded_gateway()).await;

    gateway.fail("archive_category");
    let err = store.archive_category("C2").await.unwrap_err();
    assert_eq!(err.action, CatalogAction::Archive);
    assert_eq!(store.categories().len(), 2);
    gateway.recover("archive_category");

    gateway.fail("list_categories");
    let err = store.archive_category("C2").await.unwrap_err();
    assert_eq!(err.action, CatalogAction::Refresh);
    assert_eq!(err.target.as_deref(), Some("C2"));
    gateway.recover("list_categories");

    gateway.fail("unarchive_category");
    let err = store.unarchive_category("C2").await.unwrap_err();
    assert_eq!(err.action, CatalogAction::Unarchive);
    assert_eq!(gateway.call_count("archive_category"), 2);
}
