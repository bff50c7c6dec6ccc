//! Checkout: validation and order placement.
//!
//! The payment form is decorative - no processor is ever contacted and only
//! a display label ("Card •••• 1234") is persisted. What checkout does do:
//! validate required fields before any network call, recompute the order
//! total from the cart lines instead of trusting a caller-supplied number,
//! append the order to the freshly fetched remote order list, and clear the
//! cart. The wishlist is untouched.

use chrono::Utc;
use tracing::info;

use ecru_core::{Order, OrderId, OrderStatus, ShippingAddress};
use ecru_store::{RecordStore, StoreError, users::Users};

use crate::cart::CartMutator;
use crate::session::Session;

/// Contact details captured at checkout.
#[derive(Debug, Clone, Default)]
pub struct ContactDetails {
    pub email: String,
    pub phone: String,
}

/// Card fields captured at checkout. Never persisted, never transmitted;
/// only the derived label leaves this struct.
#[derive(Clone, Default)]
pub struct PaymentDetails {
    pub card_number: String,
    pub expiry: String,
    pub cvv: String,
    pub name_on_card: String,
}

impl PaymentDetails {
    /// Display label for the order record.
    #[must_use]
    pub fn label(&self) -> String {
        let digits: String = self.card_number.chars().filter(char::is_ascii_digit).collect();
        let last4 = digits.get(digits.len().saturating_sub(4)..).unwrap_or("");
        format!("Card •••• {last4}")
    }
}

impl std::fmt::Debug for PaymentDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentDetails")
            .field("card_number", &"[REDACTED]")
            .field("cvv", &"[REDACTED]")
            .field("name_on_card", &self.name_on_card)
            .finish_non_exhaustive()
    }
}

/// The full checkout form.
#[derive(Debug, Clone, Default)]
pub struct CheckoutForm {
    pub shipping: ShippingAddress,
    pub payment: PaymentDetails,
    pub contact: ContactDetails,
}

/// Errors that can occur while placing an order.
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("login required to checkout")]
    NotLoggedIn,

    #[error("the cart is empty")]
    EmptyCart,

    /// A required form field was left empty. Caught before any network call.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Order placement against the `users` collection.
pub struct CheckoutService<'a, S> {
    store: &'a S,
}

impl<'a, S: RecordStore> CheckoutService<'a, S> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Validate the form and place an order from the current cart.
    ///
    /// On success the returned order has status `Processing`, a total equal
    /// to the pre-checkout cart total, and has been appended to the user's
    /// remote order list in the same patch that empties the remote cart.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::NotLoggedIn`], [`CheckoutError::EmptyCart`],
    /// or [`CheckoutError::MissingField`] before any network call, and
    /// [`CheckoutError::Store`] when a store call fails. The order list and
    /// emptied cart are written in one patch and nothing is written after
    /// it, so an error always means no order was recorded and the cart is
    /// untouched; a retry can never duplicate an order.
    pub async fn place_order<M: CartMutator>(
        &self,
        session: &Session,
        cart: &mut M,
        form: &CheckoutForm,
    ) -> Result<Order, CheckoutError> {
        let user = session.current_user().ok_or(CheckoutError::NotLoggedIn)?;
        if cart.lines().is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        validate(form)?;

        // Total is recomputed from the lines; a caller-supplied total is
        // never trusted.
        let items = cart.lines().to_vec();
        let total = crate::cart::total_price(&items);

        let order = Order {
            id: OrderId::generate(),
            items,
            total,
            shipping: Some(form.shipping.clone()),
            payment_method: Some(form.payment.label()),
            status: OrderStatus::Processing,
            date: Some(Utc::now().to_rfc3339()),
        };

        // Refetch before appending so a concurrent order placed elsewhere is
        // kept; the order list and the emptied cart persist in one patch.
        let users = Users::new(self.store);
        let current = users.get(&user.id).await?;
        let mut orders = current.orders;
        orders.push(order.clone());

        users
            .patch(
                &user.id,
                serde_json::json!({ "orders": orders, "cart": [] }),
            )
            .await?;

        // The order is durably recorded at this point. Reconcile the local
        // cart without another remote write: a second persist that failed
        // would surface an error for an order that already exists.
        cart.reset_local();

        info!(order_id = %order.id, total = %order.total, "order placed");
        Ok(order)
    }
}

fn validate(form: &CheckoutForm) -> Result<(), CheckoutError> {
    let required: [(&'static str, &str); 10] = [
        ("firstName", &form.shipping.first_name),
        ("lastName", &form.shipping.last_name),
        ("address", &form.shipping.address),
        ("city", &form.shipping.city),
        ("zip", &form.shipping.zip),
        ("country", &form.shipping.country),
        ("cardNumber", &form.payment.card_number),
        ("expiry", &form.payment.expiry),
        ("cvv", &form.payment.cvv),
        ("email", &form.contact.email),
    ];
    for (name, value) in required {
        if value.trim().is_empty() {
            return Err(CheckoutError::MissingField(name));
        }
    }
    Ok(())
}
