mod common;

use common::*;
use food_delivery::error::ApiError;
use food_delivery::model::Role;

#[tokio::test]
async fn test_item_from_another_restaurant_clears_cart() {
    let platform = platform();
    let owner = sign_up(&platform, "Marco", Role::RestaurantOwner).await;
    let alice = sign_up(&platform, "Alice", Role::Customer).await;
    let roma = open_restaurant(&platform, &owner, "Roma", &[("Margherita", 9.5), ("Tiramisu", 5.0)]).await;
    let tokyo = open_restaurant(&platform, &owner, "Tokyo", &[("Ramen", 13.0)]).await;

    platform.carts.add_item(&alice, roma.id, roma.menu[0].id, 2).await.unwrap();
    let cart = platform.carts.add_item(&alice, roma.id, roma.menu[1].id, 1).await.unwrap();
    assert_eq!(cart.items.len(), 2);
    assert_eq!(cart.total, 24.0);

    let cart = platform.carts.add_item(&alice, tokyo.id, tokyo.menu[0].id, 1).await.unwrap();
    assert_eq!(cart.restaurant_id, Some(tokyo.id));
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].name, "Ramen");
    assert_eq!(cart.total, 13.0);

    platform.shutdown().await;
}

#[tokio::test]
async fn test_adding_same_item_merges_and_zero_quantity_removes() {
    let platform = platform();
    let owner = sign_up(&platform, "Marco", Role::RestaurantOwner).await;
    let alice = sign_up(&platform, "Alice", Role::Customer).await;
    let roma = open_restaurant(&platform, &owner, "Roma", &[("Margherita", 9.5), ("Tiramisu", 5.0)]).await;
    let pizza = roma.menu[0].id;
    let dessert = roma.menu[1].id;

    platform.carts.add_item(&alice, roma.id, pizza, 1).await.unwrap();
    platform.carts.add_item(&alice, roma.id, dessert, 1).await.unwrap();
    let cart = platform.carts.add_item(&alice, roma.id, pizza, 2).await.unwrap();
    assert_eq!(cart.item(pizza).map(|i| i.quantity), Some(3));

    let cart = platform.carts.update_item_quantity(&alice, pizza, 0).await.unwrap();
    assert!(cart.item(pizza).is_none());
    let cart = platform.carts.update_item_quantity(&alice, dessert, -4).await.unwrap();
    assert!(cart.is_empty());
    assert_eq!(cart.total, 0.0);
    assert_eq!(cart.restaurant_id, None);

    let err = platform.carts.update_item_quantity(&alice, pizza, 2).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)), "{:?}", err);

    platform.shutdown().await;
}

#[tokio::test]
async fn test_closed_restaurant_and_unavailable_items_are_refused() {
    let platform = platform();
    let owner = sign_up(&platform, "Marco", Role::RestaurantOwner).await;
    let alice = sign_up(&platform, "Alice", Role::Customer).await;
    let roma = open_restaurant(&platform, &owner, "Roma", &[("Margherita", 9.5), ("Tiramisu", 5.0)]).await;

    platform
        .restaurants
        .set_item_availability(&owner, roma.id, roma.menu[1].id, false)
        .await
        .unwrap();
    let err = platform.carts.add_item(&alice, roma.id, roma.menu[1].id, 1).await.unwrap_err();
    assert_eq!(err.status(), 400);

    platform.restaurants.set_open(&owner, roma.id, false).await.unwrap();
    let err = platform.carts.add_item(&alice, roma.id, roma.menu[0].id, 1).await.unwrap_err();
    assert_eq!(err.status(), 400);

    let err = platform.carts.add_item(&alice, roma.id, roma.menu[0].id, 0).await.unwrap_err();
    assert_eq!(err.status(), 400);

    platform.shutdown().await;
}

#[tokio::test]
async fn test_quantity_overflow_is_refused_and_other_carts_keep_working() {
    let platform = platform();
    let owner = sign_up(&platform, "Marco", Role::RestaurantOwner).await;
    let alice = sign_up(&platform, "Alice", Role::Customer).await;
    let bob = sign_up(&platform, "Bob", Role::Customer).await;
    let roma = open_restaurant(&platform, &owner, "Roma", &[("Margherita", 9.5)]).await;
    let pizza = roma.menu[0].id;

    platform.carts.add_item(&alice, roma.id, pizza, u32::MAX).await.unwrap();
    let err = platform.carts.add_item(&alice, roma.id, pizza, 1).await.unwrap_err();
    assert_eq!(err.status(), 400);

    // The cart actor is still serving everyone.
    let cart = platform.carts.get_or_create_cart(&alice).await.unwrap();
    assert_eq!(cart.item(pizza).map(|i| i.quantity), Some(u32::MAX));
    let cart = platform.carts.add_item(&bob, roma.id, pizza, 2).await.unwrap();
    assert_eq!(cart.item_count(), 2);
    assert_eq!(cart.total, 19.0);

    platform.settle().await;
    platform.shutdown().await;
}
