//! Database-backed recipe lifecycle tests.
//!
//! Skipped unless `SPOONIT_TEST_DATABASE_URL` is set.

#![allow(clippy::unwrap_used)]

use spoonit_core::{RecipeFilter, RecipePatch};
use spoonit_integration_tests::{TestContext, draft};
use spoonit_server::db::RepositoryError;
use spoonit_server::db::categories::CategoryRepository;
use spoonit_server::db::recipes::RecipeRepository;

#[tokio::test]
async fn test_create_list_delete_round_trip() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };
    let user = ctx.create_user().await;
    let recipes = RecipeRepository::new(&ctx.pool);

    let soup = recipes
        .create(user.id, &draft("Soup").validate().unwrap())
        .await
        .unwrap();

    let listed = recipes.list_for_user(user.id).await.unwrap();
    assert!(listed.iter().any(|r| r.id == soup.id));

    recipes.delete(user.id, soup.id).await.unwrap();

    let listed = recipes.list_for_user(user.id).await.unwrap();
    assert!(!listed.iter().any(|r| r.id == soup.id));
}

#[tokio::test]
async fn test_get_by_id_reflects_last_update() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };
    let user = ctx.create_user().await;
    let recipes = RecipeRepository::new(&ctx.pool);

    let created = recipes
        .create(user.id, &draft("Stew").validate().unwrap())
        .await
        .unwrap();
    assert_eq!(
        recipes.get_by_id(created.id).await.unwrap().unwrap(),
        created
    );

    let patch: RecipePatch =
        serde_json::from_str(r#"{"title": "Hearty Stew", "servings": 4}"#).unwrap();
    let updated = recipes.update(user.id, created.id, patch).await.unwrap();

    let fetched = recipes.get_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(fetched, updated);
    assert_eq!(fetched.title, "Hearty Stew");
    assert_eq!(fetched.servings, Some(4));
}

#[tokio::test]
async fn test_update_by_non_owner_is_not_found() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };
    let owner = ctx.create_user().await;
    let other = ctx.create_user().await;
    let recipes = RecipeRepository::new(&ctx.pool);

    let recipe = recipes
        .create(owner.id, &draft("Secret Sauce").validate().unwrap())
        .await
        .unwrap();

    let patch: RecipePatch = serde_json::from_str(r#"{"title": "Stolen"}"#).unwrap();
    let err = recipes.update(other.id, recipe.id, patch).await;
    assert!(matches!(err, Err(RepositoryError::NotFound)));

    let err = recipes.delete(other.id, recipe.id).await;
    assert!(matches!(err, Err(RepositoryError::NotFound)));
}

#[tokio::test]
async fn test_favorite_toggle_round_trip() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };
    let user = ctx.create_user().await;
    let recipes = RecipeRepository::new(&ctx.pool);

    let recipe = recipes
        .create(user.id, &draft("Pancakes").validate().unwrap())
        .await
        .unwrap();

    assert!(!recipes.is_favorite(user.id, recipe.id).await.unwrap());
    assert!(recipes.toggle_favorite(user.id, recipe.id).await.unwrap());
    assert!(recipes.is_favorite(user.id, recipe.id).await.unwrap());
    assert!(!recipes.toggle_favorite(user.id, recipe.id).await.unwrap());
    assert!(!recipes.is_favorite(user.id, recipe.id).await.unwrap());
}

#[tokio::test]
async fn test_concurrent_favorite_toggles_settle_cleanly() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };
    let user = ctx.create_user().await;
    let recipes = RecipeRepository::new(&ctx.pool);

    let recipe = recipes
        .create(user.id, &draft("Waffles").validate().unwrap())
        .await
        .unwrap();

    // Two simultaneous toggles from the same starting state: neither may
    // error, one lands the favorite and the other takes it back out.
    let (a, b) = tokio::join!(
        recipes.toggle_favorite(user.id, recipe.id),
        recipes.toggle_favorite(user.id, recipe.id)
    );
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_ne!(a, b);
    assert!(!recipes.is_favorite(user.id, recipe.id).await.unwrap());
}

#[tokio::test]
async fn test_category_filter_only_matches_category() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };
    let user = ctx.create_user().await;
    let recipes = RecipeRepository::new(&ctx.pool);
    let categories = CategoryRepository::new(&ctx.pool);

    let dinner = categories
        .create(user.id, "Dinner", spoonit_core::CategoryIcon::Dinner)
        .await
        .unwrap();

    let mut categorized = draft("Roast").validate().unwrap();
    categorized.category_id = Some(dinner.id);
    let roast = recipes.create(user.id, &categorized).await.unwrap();
    recipes
        .create(user.id, &draft("Smoothie").validate().unwrap())
        .await
        .unwrap();

    let all = recipes.list_for_user(user.id).await.unwrap();
    let filtered = RecipeFilter::Category(dinner.id).apply(all);

    assert!(filtered.iter().all(|r| r.category_id == Some(dinner.id)));
    assert!(filtered.iter().any(|r| r.id == roast.id));
}

#[tokio::test]
async fn test_category_delete_uncategorizes_recipes() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };
    let user = ctx.create_user().await;
    let recipes = RecipeRepository::new(&ctx.pool);
    let categories = CategoryRepository::new(&ctx.pool);

    let brunch = categories
        .create(user.id, "Brunch", spoonit_core::CategoryIcon::Breakfast)
        .await
        .unwrap();

    let mut d = draft("Eggs Benedict").validate().unwrap();
    d.category_id = Some(brunch.id);
    let recipe = recipes.create(user.id, &d).await.unwrap();
    assert_eq!(recipe.category_id, Some(brunch.id));

    categories.delete(user.id, brunch.id).await.unwrap();

    // The recipe survives, uncategorized.
    let fetched = recipes.get_by_id(recipe.id).await.unwrap().unwrap();
    assert_eq!(fetched.category_id, None);
}

#[tokio::test]
async fn test_duplicate_category_name_conflicts() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };
    let user = ctx.create_user().await;
    let categories = CategoryRepository::new(&ctx.pool);

    categories
        .create(user.id, "Desserts", spoonit_core::CategoryIcon::Dessert)
        .await
        .unwrap();
    let err = categories
        .create(user.id, "desserts", spoonit_core::CategoryIcon::Dessert)
        .await;
    assert!(matches!(err, Err(RepositoryError::Conflict(_))));
}
