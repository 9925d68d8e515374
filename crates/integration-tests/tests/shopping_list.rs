//! Database-backed shopping list tests.
//!
//! Skipped unless `SPOONIT_TEST_DATABASE_URL` is set.

#![allow(clippy::unwrap_used)]

use spoonit_integration_tests::TestContext;
use spoonit_server::services::shopping_list::{MAX_ITEMS, ShoppingListError, ShoppingListService};

#[tokio::test]
async fn test_add_and_list() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };
    let user = ctx.create_user().await;
    let service = ShoppingListService::new(&ctx.pool);

    let item = service.add(user.id, "  Olive Oil ").await.unwrap();
    assert_eq!(item.text, "Olive Oil");

    let items = service.list(user.id).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, item.id);
}

#[tokio::test]
async fn test_normalized_duplicates_rejected() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };
    let user = ctx.create_user().await;
    let service = ShoppingListService::new(&ctx.pool);

    service.add(user.id, "Olive Oil").await.unwrap();

    // Same ingredient, different case and spacing.
    let err = service.add(user.id, " olive   OIL ").await;
    assert!(matches!(err, Err(ShoppingListError::Duplicate)));

    // A different user may hold the same item.
    let other = ctx.create_user().await;
    service.add(other.id, "olive oil").await.unwrap();
}

#[tokio::test]
async fn test_capacity_is_enforced() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };
    let user = ctx.create_user().await;
    let service = ShoppingListService::new(&ctx.pool);

    for i in 0..MAX_ITEMS {
        service.add(user.id, &format!("item {i}")).await.unwrap();
    }

    let err = service.add(user.id, "one too many").await;
    assert!(matches!(err, Err(ShoppingListError::ListFull)));
}

#[tokio::test]
async fn test_concurrent_adds_cannot_overfill() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };
    let user = ctx.create_user().await;
    let service = ShoppingListService::new(&ctx.pool);

    for i in 0..MAX_ITEMS - 1 {
        service.add(user.id, &format!("item {i}")).await.unwrap();
    }

    // One slot left, two simultaneous adds: exactly one lands.
    let results = {
        let (a, b) = tokio::join!(
            service.add(user.id, "almonds"),
            service.add(user.id, "basil")
        );
        [a, b]
    };
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(
        results
            .iter()
            .any(|r| matches!(r, Err(ShoppingListError::ListFull)))
    );

    let count = service.list(user.id).await.unwrap().len();
    assert_eq!(i64::try_from(count).unwrap(), MAX_ITEMS);
}

#[tokio::test]
async fn test_remove_and_clear() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };
    let user = ctx.create_user().await;
    let service = ShoppingListService::new(&ctx.pool);

    let flour = service.add(user.id, "Flour").await.unwrap();
    service.add(user.id, "Sugar").await.unwrap();

    service.remove(user.id, flour.id).await.unwrap();
    let err = service.remove(user.id, flour.id).await;
    assert!(matches!(err, Err(ShoppingListError::NotFound)));

    assert_eq!(service.clear(user.id).await.unwrap(), 1);
    assert!(service.list(user.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_text_rejected() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };
    let user = ctx.create_user().await;
    let service = ShoppingListService::new(&ctx.pool);

    let err = service.add(user.id, "   ").await;
    assert!(matches!(err, Err(ShoppingListError::InvalidItem(_))));
}
