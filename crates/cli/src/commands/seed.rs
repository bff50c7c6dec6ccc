//! Demo data seeding.
//!
//! Idempotent: records are looked up by email or name before insertion, so
//! running `ecru seed` twice leaves one copy of everything.

use tracing::info;

use ecru_core::{Category, Email, Price, Product, ProductId, Role, User, UserId};
use ecru_store::{products::Products, users::Users};

use super::Context;

const ADMIN_EMAIL: &str = "admin@ecru.dev";
const ADMIN_PASSWORD: &str = "admin";

/// Seed demo products and an admin account.
///
/// # Errors
///
/// Returns the first store error encountered.
#[allow(clippy::print_stdout)]
pub async fn run(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let users = Users::new(&ctx.store);
    if users.find_by_email(ADMIN_EMAIL).await?.is_none() {
        let admin = User {
            id: UserId::generate(),
            name: "Store Admin".to_owned(),
            email: Email::parse(ADMIN_EMAIL)?,
            password: ADMIN_PASSWORD.to_owned(),
            role: Role::Admin,
            is_block: false,
            cart: Vec::new(),
            wishlist: Vec::new(),
            orders: Vec::new(),
            created_at: Some(chrono::Utc::now()),
        };
        users.create(&admin).await?;
        info!(email = ADMIN_EMAIL, "admin account created");
    }

    let products = Products::new(&ctx.store);
    let existing = products.list().await?;
    let mut created = 0usize;
    for product in demo_products() {
        if existing.iter().any(|p| p.name == product.name) {
            continue;
        }
        products.create(&product).await?;
        created += 1;
    }

    println!("Seeded {created} product(s); admin login is {ADMIN_EMAIL} / {ADMIN_PASSWORD}");
    Ok(())
}

fn demo_products() -> Vec<Product> {
    let entry = |name: &str, price: u32, category: Category, image: &str| Product {
        id: ProductId::generate(),
        name: name.to_owned(),
        description: format!("{name}, from the Ecru demo catalog."),
        price: Price::from(price),
        stock: 25,
        category,
        images: vec![image.to_owned()],
        is_active: true,
        original_price: None,
        is_sale: None,
        material: None,
        care: None,
        fit: None,
    };

    vec![
        entry("Boxy Linen Tee", 32, Category::Tops, "https://cdn.ecru.dev/linen-tee.jpg"),
        entry("Camp Collar Shirt", 58, Category::Shirts, "https://cdn.ecru.dev/camp-shirt.jpg"),
        entry("Slip Midi Dress", 84, Category::Dresses, "https://cdn.ecru.dev/slip-dress.jpg"),
        entry("Wide-Leg Trouser", 72, Category::Bottoms, "https://cdn.ecru.dev/trouser.jpg"),
        entry("Wool Overshirt", 128, Category::Outerwear, "https://cdn.ecru.dev/overshirt.jpg"),
        entry("Canvas Tote", 24, Category::Accessories, "https://cdn.ecru.dev/tote.jpg"),
    ]
}
