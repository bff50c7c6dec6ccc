//! Admin console commands.
//!
//! Every command restores the persisted session and verifies the admin role
//! before touching the store; a shopper login gets the same refusal whether
//! or not the target exists.

use clap::Args;
use rust_decimal::Decimal;

use ecru_admin::{
    AdminGuard, DashboardPoller, DashboardSnapshot, OrderAdmin, ProductAdmin, ProductForm,
    UserAdmin, filter_by_status,
};
use ecru_core::{Category, OrderId, OrderStatus, Price, ProductId, UserId};

use super::Context;

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Product fields for `ecru admin product add` / `update`.
#[derive(Args)]
pub struct ProductArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub description: String,
    /// Decimal price, e.g. 49.99
    #[arg(long)]
    pub price: Decimal,
    #[arg(long, default_value_t = 0)]
    pub stock: u32,
    #[arg(long)]
    pub category: Category,
    /// Image URL; repeat for more than one
    #[arg(long = "image", required = true)]
    pub images: Vec<String>,
    /// Pre-discount price; marks the product as on sale when higher
    #[arg(long)]
    pub original_price: Option<Decimal>,
    #[arg(long)]
    pub material: Option<String>,
    #[arg(long)]
    pub care: Option<String>,
    #[arg(long)]
    pub fit: Option<String>,
}

impl ProductArgs {
    fn into_form(self) -> Result<ProductForm, Box<dyn std::error::Error>> {
        let original_price = self.original_price.map(Price::new).transpose()?;
        Ok(ProductForm {
            name: self.name,
            description: self.description,
            price: Price::new(self.price)?,
            stock: self.stock,
            category: self.category,
            images: self.images,
            original_price,
            material: self.material,
            care: self.care,
            fit: self.fit,
        })
    }
}

#[allow(clippy::print_stdout)]
pub async fn orders(ctx: &Context, status: Option<OrderStatus>) -> CommandResult {
    let guard = verified_guard(ctx).await?;
    let mut all = OrderAdmin::new(&ctx.store).all_orders(&guard).await?;
    if let Some(status) = status {
        all = filter_by_status(&all, status);
    }

    if all.is_empty() {
        println!("No orders");
        return Ok(());
    }
    for entry in all {
        println!(
            "{}  {:<10} {:>10}  {} <{}>",
            entry.order.id,
            entry.order.status.to_string(),
            entry.order.total.to_string(),
            entry.user_name,
            entry.user_email
        );
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn set_status(ctx: &Context, order_id: &str, status: OrderStatus) -> CommandResult {
    let guard = verified_guard(ctx).await?;
    OrderAdmin::new(&ctx.store)
        .update_order_status(&guard, &OrderId::new(order_id), status)
        .await?;
    println!("Order {order_id} is now {status}");
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn users(ctx: &Context) -> CommandResult {
    let guard = verified_guard(ctx).await?;
    let users = UserAdmin::new(&ctx.store).list(&guard).await?;

    for user in users {
        let flag = if user.is_block { " [blocked]" } else { "" };
        println!(
            "{}  {:<20} <{}>  {} order(s){}",
            user.id,
            user.name,
            user.email,
            user.orders.len(),
            flag
        );
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn block(ctx: &Context, user_id: &str) -> CommandResult {
    let guard = verified_guard(ctx).await?;
    let blocked = UserAdmin::new(&ctx.store)
        .toggle_block(&guard, &UserId::new(user_id))
        .await?;
    if blocked {
        println!("User {user_id} is now blocked");
    } else {
        println!("User {user_id} is no longer blocked");
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn delete_user(ctx: &Context, user_id: &str) -> CommandResult {
    let guard = verified_guard(ctx).await?;
    UserAdmin::new(&ctx.store)
        .delete(&guard, &UserId::new(user_id))
        .await?;
    println!("User {user_id} deleted");
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn products_list(ctx: &Context) -> CommandResult {
    let _guard = verified_guard(ctx).await?;
    let products = ecru_store::products::Products::new(&ctx.store).list().await?;

    for product in products {
        let flag = if product.is_active { "" } else { " [hidden]" };
        println!(
            "{}  {:<30} {:>10}  {}{}",
            product.id,
            product.name,
            product.price.to_string(),
            product.category,
            flag
        );
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn product_add(ctx: &Context, args: ProductArgs) -> CommandResult {
    let guard = verified_guard(ctx).await?;
    let created = ProductAdmin::new(&ctx.store)
        .create(&guard, args.into_form()?)
        .await?;
    println!("Product {} created: {} at {}", created.id, created.name, created.price);
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn product_update(ctx: &Context, product_id: &str, args: ProductArgs) -> CommandResult {
    let guard = verified_guard(ctx).await?;
    let updated = ProductAdmin::new(&ctx.store)
        .update(&guard, &ProductId::new(product_id), args.into_form()?)
        .await?;
    println!("Product {} updated: {} at {}", updated.id, updated.name, updated.price);
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn product_set_active(ctx: &Context, product_id: &str, active: bool) -> CommandResult {
    let guard = verified_guard(ctx).await?;
    ProductAdmin::new(&ctx.store)
        .set_active(&guard, &ProductId::new(product_id), active)
        .await?;
    if active {
        println!("Product {product_id} is browsable again");
    } else {
        println!("Product {product_id} is hidden from browsing");
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn product_delete(ctx: &Context, product_id: &str) -> CommandResult {
    let guard = verified_guard(ctx).await?;
    ProductAdmin::new(&ctx.store)
        .delete(&guard, &ProductId::new(product_id))
        .await?;
    println!("Product {product_id} deleted");
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn dashboard(ctx: &Context, watch: bool) -> CommandResult {
    let guard = verified_guard(ctx).await?;

    if !watch {
        let snapshot = DashboardSnapshot::fetch(&ctx.store, &guard).await?;
        print_snapshot(&snapshot);
        return Ok(());
    }

    let poller = DashboardPoller::spawn(ctx.store.clone(), guard, ctx.config.poll_interval);
    let mut rx = poller.subscribe();
    loop {
        rx.changed().await?;
        let snapshot = rx.borrow().clone();
        if let Some(snapshot) = snapshot {
            print_snapshot(&snapshot);
        }
    }
}

#[allow(clippy::print_stdout)]
fn print_snapshot(snapshot: &DashboardSnapshot) {
    println!("Users:    {}", snapshot.total_users);
    println!("Products: {}", snapshot.total_products);
    println!("Orders:   {}", snapshot.total_orders);
    println!("Revenue:  {}", snapshot.total_revenue);
    const MONTHS: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];
    for (name, revenue) in MONTHS.iter().zip(snapshot.monthly_revenue.iter()) {
        if *revenue != Price::ZERO {
            println!("  {name}: {revenue}");
        }
    }
}

async fn verified_guard(ctx: &Context) -> Result<AdminGuard, Box<dyn std::error::Error>> {
    let session = ctx.logged_in_session().await?;
    let user = session
        .current_user()
        .ok_or("not logged in (run `ecru shop login` first)")?;
    Ok(AdminGuard::verify(user)?)
}
