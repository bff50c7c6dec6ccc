//! Shopper-facing commands.
//!
//! Every command restores the persisted session, performs one storefront
//! operation, and prints a plain-text result. Cart and wishlist state lives
//! in the store; the CLI holds nothing between invocations.

use clap::Args;
use secrecy::SecretString;

use ecru_core::{CartLine, Category, ProductId, ShippingAddress};
use ecru_store::RestStore;
use ecru_storefront::{
    AuthService, CartAddOutcome, CartMutator, CartSync, Catalog, CheckoutForm, CheckoutService,
    ContactDetails, PaymentDetails, ProductFilter, Session, SortOrder, WishlistAddOutcome,
    WishlistSync,
};

use super::Context;

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Shipping, payment, and contact fields for `ecru shop checkout`.
#[derive(Args)]
pub struct CheckoutArgs {
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub last_name: String,
    #[arg(long)]
    pub address: String,
    #[arg(long)]
    pub city: String,
    #[arg(long, default_value = "")]
    pub state: String,
    #[arg(long)]
    pub zip: String,
    #[arg(long)]
    pub country: String,
    #[arg(long)]
    pub card_number: String,
    #[arg(long)]
    pub expiry: String,
    #[arg(long)]
    pub cvv: String,
    #[arg(long, default_value = "")]
    pub name_on_card: String,
    /// Contact email for order updates
    #[arg(long)]
    pub email: String,
    #[arg(long, default_value = "")]
    pub phone: String,
}

#[allow(clippy::print_stdout)]
pub async fn signup(ctx: &Context, name: &str, email: &str, password: String) -> CommandResult {
    let password = SecretString::from(password);
    let user = AuthService::new(&ctx.store)
        .signup(name, email, &password)
        .await?;

    let mut session = Session::new(&ctx.config.session_file);
    println!("Account created: {} <{}>", user.name, user.email);
    session.login(user);
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn login(ctx: &Context, email: &str, password: String) -> CommandResult {
    let password = SecretString::from(password);
    let user = AuthService::new(&ctx.store).login(email, &password).await?;

    let mut session = Session::new(&ctx.config.session_file);
    println!("Logged in as {} <{}>", user.name, user.email);
    session.login(user);
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn logout(ctx: &Context) -> CommandResult {
    let mut session = ctx.session().await?;
    session.logout();
    println!("Logged out");
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn products(
    ctx: &Context,
    search: Option<String>,
    category: Option<Category>,
    sort: SortOrder,
) -> CommandResult {
    let filter = ProductFilter {
        search,
        category,
        sort,
    };
    let products = Catalog::new(ctx.store.clone()).browse(&filter).await?;

    if products.is_empty() {
        println!("No products match");
        return Ok(());
    }
    for p in products {
        println!("{}  {:<30} {:>10}  {}", p.id, p.name, p.price.to_string(), p.category);
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn cart_show(ctx: &Context) -> CommandResult {
    let (_, cart) = load_cart(ctx).await?;
    print_lines(cart.lines());
    println!("Total: {}", cart.total_price());
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn cart_add(ctx: &Context, product_id: &str, size: Option<String>) -> CommandResult {
    let (_, mut cart) = load_cart(ctx).await?;
    let id = ProductId::new(product_id);
    let product = Catalog::new(ctx.store.clone()).product(&id).await?;
    let name = product.name.clone();

    match cart.add_to_cart(product).await? {
        CartAddOutcome::Added => {
            if size.is_some() {
                cart.set_size(&id, size).await?;
            }
            println!("Added {name} to the cart");
        }
        CartAddOutcome::AlreadyInCart => println!("{name} is already in the cart"),
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn cart_remove(ctx: &Context, product_id: &str) -> CommandResult {
    let (_, mut cart) = load_cart(ctx).await?;
    cart.remove(&ProductId::new(product_id)).await?;
    println!("Removed; total is now {}", cart.total_price());
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn cart_inc(ctx: &Context, product_id: &str) -> CommandResult {
    let (_, mut cart) = load_cart(ctx).await?;
    cart.increment_qty(&ProductId::new(product_id)).await?;
    println!("Total: {}", cart.total_price());
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn cart_dec(ctx: &Context, product_id: &str, remove_on_zero: bool) -> CommandResult {
    let (_, mut cart) = load_cart(ctx).await?;
    cart.set_remove_on_zero(remove_on_zero);
    cart.decrement_qty(&ProductId::new(product_id)).await?;
    println!("Total: {}", cart.total_price());
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn cart_clear(ctx: &Context) -> CommandResult {
    let (_, mut cart) = load_cart(ctx).await?;
    cart.clear().await?;
    println!("Cart emptied");
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn wishlist_show(ctx: &Context) -> CommandResult {
    let (_, wishlist) = load_wishlist(ctx).await?;
    if wishlist.products().is_empty() {
        println!("Wishlist is empty");
        return Ok(());
    }
    for p in wishlist.products() {
        println!("{}  {:<30} {}", p.id, p.name, p.price);
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn wishlist_add(ctx: &Context, product_id: &str) -> CommandResult {
    let (_, mut wishlist) = load_wishlist(ctx).await?;
    let product = Catalog::new(ctx.store.clone())
        .product(&ProductId::new(product_id))
        .await?;
    let name = product.name.clone();

    match wishlist.add(product).await? {
        WishlistAddOutcome::Added => println!("Saved {name} to the wishlist"),
        WishlistAddOutcome::AlreadyInWishlist => println!("{name} is already saved"),
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn wishlist_remove(ctx: &Context, product_id: &str) -> CommandResult {
    let (_, mut wishlist) = load_wishlist(ctx).await?;
    wishlist.remove(&ProductId::new(product_id)).await?;
    println!("Removed from the wishlist");
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn wishlist_move(ctx: &Context, product_id: &str) -> CommandResult {
    let session = ctx.logged_in_session().await?;
    let mut cart = bound_cart(ctx, &session).await?;
    let mut wishlist = bound_wishlist(ctx, &session).await?;

    wishlist
        .move_to_cart(&ProductId::new(product_id), &mut cart)
        .await?;
    println!("Moved to the cart; total is now {}", cart.total_price());
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn checkout(ctx: &Context, args: CheckoutArgs) -> CommandResult {
    let session = ctx.logged_in_session().await?;
    let mut cart = bound_cart(ctx, &session).await?;

    let form = CheckoutForm {
        shipping: ShippingAddress {
            first_name: args.first_name,
            last_name: args.last_name,
            address: args.address,
            city: args.city,
            state: args.state,
            zip: args.zip,
            country: args.country,
        },
        payment: PaymentDetails {
            card_number: args.card_number,
            expiry: args.expiry,
            cvv: args.cvv,
            name_on_card: args.name_on_card,
        },
        contact: ContactDetails {
            email: args.email,
            phone: args.phone,
        },
    };

    let order = CheckoutService::new(&ctx.store)
        .place_order(&session, &mut cart, &form)
        .await?;
    println!("Order {} placed: {} ({})", order.id, order.total, order.status);
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn orders(ctx: &Context) -> CommandResult {
    let session = ctx.logged_in_session().await?;
    let Some(user) = session.current_user() else {
        return Ok(());
    };

    if user.orders.is_empty() {
        println!("No orders yet");
        return Ok(());
    }
    for order in &user.orders {
        let date = order.date.as_deref().unwrap_or("-");
        println!(
            "{}  {:<10} {:>10}  {} item(s)  {}",
            order.id,
            order.status.to_string(),
            order.total.to_string(),
            order.items.len(),
            date
        );
    }
    Ok(())
}

async fn load_cart(ctx: &Context) -> Result<(Session, CartSync<RestStore>), Box<dyn std::error::Error>> {
    let session = ctx.logged_in_session().await?;
    let cart = bound_cart(ctx, &session).await?;
    Ok((session, cart))
}

async fn load_wishlist(
    ctx: &Context,
) -> Result<(Session, WishlistSync<RestStore>), Box<dyn std::error::Error>> {
    let session = ctx.logged_in_session().await?;
    let wishlist = bound_wishlist(ctx, &session).await?;
    Ok((session, wishlist))
}

async fn bound_cart(
    ctx: &Context,
    session: &Session,
) -> Result<CartSync<RestStore>, Box<dyn std::error::Error>> {
    let mut cart = CartSync::new(ctx.store.clone());
    cart.bind(session.user_id().cloned());
    cart.load().await?;
    Ok(cart)
}

async fn bound_wishlist(
    ctx: &Context,
    session: &Session,
) -> Result<WishlistSync<RestStore>, Box<dyn std::error::Error>> {
    let mut wishlist = WishlistSync::new(ctx.store.clone());
    wishlist.bind(session.user_id().cloned());
    wishlist.load().await?;
    Ok(wishlist)
}

#[allow(clippy::print_stdout)]
fn print_lines(lines: &[CartLine]) {
    if lines.is_empty() {
        println!("Cart is empty");
        return;
    }
    for line in lines {
        let size = line.size.as_deref().unwrap_or("-");
        println!(
            "{}  {:<30} x{:<3} size {:<4} {}",
            line.product.id,
            line.product.name,
            line.quantity,
            size,
            line.line_total()
        );
    }
}
