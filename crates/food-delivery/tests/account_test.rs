mod common;

use actor_framework::Topic;
use common::*;
use food_delivery::auth::LoginRequest;
use food_delivery::error::ApiError;
use food_delivery::model::{ProfilePatch, ProfileReplace, RestaurantCreate, Role};

#[tokio::test]
async fn test_profile_is_cached_until_an_update_evicts_it() {
    let platform = platform();
    let alice = sign_up(&platform, "Alice", Role::Customer).await;
    let cache = platform.users.cache();

    let first = platform.users.get_profile(alice.user_id).await.unwrap();
    let second = platform.users.get_profile(alice.user_id).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(cache.stats().misses, 1);
    assert_eq!(cache.stats().hits, 1);

    platform
        .users
        .patch_profile(
            &alice,
            alice.user_id,
            ProfilePatch {
                phone: Some("555-0199".to_string()),
                ..ProfilePatch::default()
            },
        )
        .await
        .unwrap();
    let patched = platform.users.get_profile(alice.user_id).await.unwrap();
    assert_eq!(patched.phone.as_deref(), Some("555-0199"));
    assert_eq!(patched.name, "Alice");
    assert_eq!(cache.stats().misses, 2);

    platform
        .users
        .update_profile(
            &alice,
            alice.user_id,
            ProfileReplace {
                name: "Alice Liddell".to_string(),
                phone: None,
                address: None,
            },
        )
        .await
        .unwrap();
    let replaced = platform.users.get_profile(alice.user_id).await.unwrap();
    assert_eq!(replaced.name, "Alice Liddell");
    assert_eq!(replaced.phone, None);
    assert_eq!(replaced.address, None);
    assert_eq!(cache.stats().misses, 3);

    platform.settle().await;
    platform.shutdown().await;
}

#[tokio::test]
async fn test_profiles_are_guarded() {
    let platform = platform();
    let alice = sign_up(&platform, "Alice", Role::Customer).await;
    let bob = sign_up(&platform, "Bob", Role::Customer).await;

    let err = platform
        .users
        .patch_profile(&bob, alice.user_id, ProfilePatch::default())
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::forbidden());
    assert_eq!(
        platform.users.change_role(&alice, bob.user_id, Role::Admin).await,
        Err(ApiError::forbidden())
    );

    let promoted = platform
        .users
        .change_role(&admin(), bob.user_id, Role::RestaurantOwner)
        .await
        .unwrap();
    assert_eq!(promoted.role, Role::RestaurantOwner);

    platform.users.deactivate(&admin(), alice.user_id).await.unwrap();
    let err = platform
        .auth
        .login(LoginRequest {
            email: "alice@example.com".to_string(),
            password: "long-enough-password".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.status(), 403);

    platform.settle().await;
    platform.shutdown().await;
}

#[tokio::test]
async fn test_roles_gate_restaurant_and_driver_operations() {
    let platform = platform();
    let alice = sign_up(&platform, "Alice", Role::Customer).await;

    let err = platform
        .restaurants
        .create_restaurant(
            &alice,
            RestaurantCreate {
                owner_id: alice.user_id,
                name: "Pop-up".to_string(),
                cuisine: "Street".to_string(),
                address: "1 Market Square".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::forbidden());

    let owner = sign_up(&platform, "Marco", Role::RestaurantOwner).await;
    let other = sign_up(&platform, "Luigi", Role::RestaurantOwner).await;
    let roma = open_restaurant(&platform, &owner, "Roma", &[("Margherita", 9.5)]).await;
    assert_eq!(roma.owner_id, owner.user_id);
    assert_eq!(
        platform.restaurants.set_open(&other, roma.id, false).await,
        Err(ApiError::forbidden())
    );

    let err = platform
        .deliveries
        .register_driver(
            &alice,
            food_delivery::model::DriverCreate {
                user_id: alice.user_id,
                name: "Alice".to_string(),
                phone: "555-0100".to_string(),
                vehicle: "bike".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::forbidden());

    // One USER_REGISTERED per sign-up.
    assert_eq!(platform.bus.history(Topic::UserEvents).len(), 3);

    platform.settle().await;
    platform.shutdown().await;
}

#[tokio::test]
async fn test_tampered_and_refresh_tokens_are_not_access_tokens() {
    let platform = platform();
    let alice = sign_up(&platform, "Alice", Role::Customer).await;
    let session = platform
        .auth
        .login(LoginRequest {
            email: "alice@example.com".to_string(),
            password: "long-enough-password".to_string(),
        })
        .await
        .unwrap();

    let principal = platform.auth.authenticate(&session.access_token).unwrap();
    assert_eq!(principal, alice);

    let mut tampered = session.access_token.clone();
    tampered.push('x');
    assert!(matches!(
        platform.auth.authenticate(&tampered),
        Err(ApiError::Unauthorized(_))
    ));
    assert!(matches!(
        platform.auth.authenticate(&session.refresh_token),
        Err(ApiError::Unauthorized(_))
    ));

    platform.settle().await;
    platform.shutdown().await;
}
