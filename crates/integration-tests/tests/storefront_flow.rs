//! Full shopper journey over HTTP: signup, browse, cart, wishlist, checkout.

use secrecy::SecretString;
use serde_json::json;

use ecru_core::{OrderStatus, Price, ProductId, UserId};
use ecru_integration_tests::TestContext;
use ecru_store::{PRODUCTS, USERS, users::Users};
use ecru_storefront::{
    AuthService, CartAddOutcome, CartMutator, CartSync, Catalog, CheckoutForm, CheckoutService,
    ContactDetails, PaymentDetails, ProductFilter, Session, SortOrder, WishlistSync,
};

async fn seeded_catalog(ctx: &TestContext) {
    for (id, name, price, category) in [
        ("p1", "Boxy Tee", "32", "Tops"),
        ("p2", "Slip Dress", "84", "Dresses"),
        ("p3", "Canvas Tote", "24", "Accessories"),
    ] {
        ctx.seed(
            PRODUCTS,
            json!({"id": id, "name": name, "price": price, "category": category,
                   "images": ["x.jpg"], "stock": 10}),
        )
        .await;
    }
}

fn token_path(tag: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("ecru-it-{tag}-{}", uuid::Uuid::new_v4()))
}

#[tokio::test]
async fn test_signup_then_login_over_http() {
    let ctx = TestContext::spawn().await;
    let password = SecretString::from("hunter2");
    let auth = AuthService::new(&ctx.store);

    let created = auth
        .signup("Ada Lovelace", "ada@example.com", &password)
        .await
        .expect("signup");
    assert!(!created.is_admin());

    let logged_in = auth
        .login("ada@example.com", &password)
        .await
        .expect("login");
    assert_eq!(logged_in.id, created.id);

    // Wrong password surfaces as invalid credentials, not a transport error.
    let err = auth
        .login("ada@example.com", &SecretString::from("wrong"))
        .await
        .expect_err("bad password");
    assert!(matches!(
        err,
        ecru_storefront::AuthError::InvalidCredentials
    ));
}

#[tokio::test]
async fn test_catalog_browse_with_filters() {
    let ctx = TestContext::spawn().await;
    seeded_catalog(&ctx).await;
    // Hidden products never reach browse results.
    ctx.seed(
        PRODUCTS,
        json!({"id": "p4", "name": "Retired Coat", "price": "10", "category": "Outerwear",
               "isActive": false}),
    )
    .await;

    let catalog = Catalog::new(ctx.store.clone());
    let cheap_first = catalog
        .browse(&ProductFilter {
            search: None,
            category: None,
            sort: SortOrder::PriceLowToHigh,
        })
        .await
        .expect("browse");

    assert_eq!(cheap_first.len(), 3);
    assert_eq!(cheap_first[0].price, Price::from(24));
    assert!(cheap_first.iter().all(|p| p.name != "Retired Coat"));

    let dresses = catalog
        .browse(&ProductFilter {
            search: Some("slip".to_owned()),
            category: Some(ecru_core::Category::Dresses),
            sort: SortOrder::Unsorted,
        })
        .await
        .expect("browse");
    assert_eq!(dresses.len(), 1);
    assert_eq!(dresses[0].id.as_str(), "p2");
}

#[tokio::test]
async fn test_cart_survives_a_new_sync_instance() {
    let ctx = TestContext::spawn().await;
    seeded_catalog(&ctx).await;
    ctx.seed(
        USERS,
        json!({"id": "u1", "name": "Ada", "email": "ada@example.com", "password": "pw"}),
    )
    .await;

    let catalog = Catalog::new(ctx.store.clone());
    let mut cart = CartSync::new(ctx.store.clone());
    cart.bind(Some(UserId::new("u1")));
    cart.load().await.expect("load");

    let tee = catalog.product(&ProductId::new("p1")).await.expect("p1");
    assert_eq!(
        cart.add_to_cart(tee.clone()).await.expect("add"),
        CartAddOutcome::Added
    );
    assert_eq!(
        cart.add_to_cart(tee).await.expect("re-add"),
        CartAddOutcome::AlreadyInCart
    );
    cart.increment_qty(&ProductId::new("p1")).await.expect("inc");

    // A fresh synchronizer sees what the first one persisted.
    let mut reloaded = CartSync::new(ctx.store.clone());
    reloaded.bind(Some(UserId::new("u1")));
    reloaded.load().await.expect("reload");
    assert_eq!(reloaded.lines().len(), 1);
    assert_eq!(reloaded.lines()[0].quantity, 2);
    assert_eq!(reloaded.total_price(), Price::from(64));
}

#[tokio::test]
async fn test_wishlist_move_and_checkout_end_to_end() {
    let ctx = TestContext::spawn().await;
    seeded_catalog(&ctx).await;

    let password = SecretString::from("hunter2");
    let auth = AuthService::new(&ctx.store);
    let user = auth
        .signup("Ada Lovelace", "ada@example.com", &password)
        .await
        .expect("signup");
    let user_id = user.id.clone();

    let mut session = Session::new(token_path("checkout"));
    session.login(user);

    let catalog = Catalog::new(ctx.store.clone());
    let mut cart = CartSync::new(ctx.store.clone());
    cart.bind(Some(user_id.clone()));
    cart.load().await.expect("load cart");
    let mut wishlist = WishlistSync::new(ctx.store.clone());
    wishlist.bind(Some(user_id.clone()));
    wishlist.load().await.expect("load wishlist");

    let dress = catalog.product(&ProductId::new("p2")).await.expect("p2");
    wishlist.add(dress).await.expect("save");
    wishlist
        .move_to_cart(&ProductId::new("p2"), &mut cart)
        .await
        .expect("move");
    assert!(wishlist.products().is_empty());

    let tote = catalog.product(&ProductId::new("p3")).await.expect("p3");
    cart.add_to_cart(tote).await.expect("add");
    let expected_total = cart.total_price();

    let form = CheckoutForm {
        shipping: ecru_core::ShippingAddress {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            address: "12 Analytical Row".into(),
            city: "London".into(),
            state: String::new(),
            zip: "E1 6AN".into(),
            country: "UK".into(),
        },
        payment: PaymentDetails {
            card_number: "4242424242424242".into(),
            expiry: "12/30".into(),
            cvv: "123".into(),
            name_on_card: "Ada Lovelace".into(),
        },
        contact: ContactDetails {
            email: "ada@example.com".into(),
            phone: String::new(),
        },
    };
    let order = CheckoutService::new(&ctx.store)
        .place_order(&session, &mut cart, &form)
        .await
        .expect("checkout");

    assert_eq!(order.status, OrderStatus::Processing);
    assert_eq!(order.total, expected_total);
    assert!(cart.lines().is_empty());

    let stored = Users::new(&ctx.store).get(&user_id).await.expect("user");
    assert_eq!(stored.orders.len(), 1);
    assert!(stored.cart.is_empty());
}

#[tokio::test]
async fn test_session_restores_from_token_file() {
    let ctx = TestContext::spawn().await;
    ctx.seed(
        USERS,
        json!({"id": "u1", "name": "Ada", "email": "ada@example.com", "password": "pw"}),
    )
    .await;

    let path = token_path("restore");
    let user = Users::new(&ctx.store).get(&UserId::new("u1")).await.expect("user");
    Session::new(&path).login(user);

    let restored = Session::restore(&path, &ctx.store).await.expect("restore");
    assert!(restored.is_logged_in());
    assert_eq!(restored.user_id(), Some(&UserId::new("u1")));
}
