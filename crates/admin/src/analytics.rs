//! Pure revenue aggregation over order lists.
//!
//! Everything here takes a slice and returns a value; fetching is the
//! caller's job (see [`crate::dashboard`]). Cancelled and returned orders
//! still count as revenue, matching what the store recorded at checkout.

use chrono::Datelike;
use tracing::warn;

use ecru_core::{Order, Price};

/// Revenue bucketed by calendar month, January first. Years are collapsed:
/// a January 2024 order and a January 2026 order land in the same bucket.
///
/// Orders with a missing or unparseable date are skipped. Legacy records
/// hold free-form date strings, so skipping is routine, not exceptional.
#[must_use]
pub fn revenue_by_month(orders: &[Order]) -> [Price; 12] {
    let mut months = [Price::ZERO; 12];
    for order in orders {
        let Some(placed) = order.placed_at() else {
            continue;
        };
        let index = placed.month0() as usize;
        months[index] += order.total;
    }
    months
}

/// Sum of every order's recorded total.
#[must_use]
pub fn total_revenue(orders: &[Order]) -> Price {
    orders.iter().map(|o| o.total).sum()
}

/// Number of orders.
#[must_use]
pub fn order_count(orders: &[Order]) -> usize {
    orders.len()
}

/// Count orders whose recorded total disagrees with the sum of their lines,
/// warning for each. The recorded total stays authoritative; a mismatch is
/// reported, never repaired.
#[must_use]
pub fn total_mismatches(orders: &[Order]) -> usize {
    let mut mismatches = 0;
    for order in orders {
        if order.items.is_empty() {
            continue;
        }
        let computed = order.computed_total();
        if computed != order.total {
            warn!(
                order_id = %order.id,
                recorded = %order.total,
                computed = %computed,
                "order total disagrees with its lines"
            );
            mismatches += 1;
        }
    }
    mismatches
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn order(id: &str, total: &str, date: Option<&str>) -> Order {
        serde_json::from_value(json!({
            "id": id, "total": total, "date": date
        }))
        .expect("order")
    }

    #[test]
    fn test_revenue_buckets_by_month_and_skips_bad_dates() {
        let orders = vec![
            order("o1", "100", Some("2026-01-05T10:00:00Z")),
            order("o2", "50", Some("2026-01-20T09:30:00+00:00")),
            order("o3", "75", Some("2026-03-01T00:00:00Z")),
            order("o4", "999", Some("last tuesday")),
            order("o5", "10", None),
        ];
        let months = revenue_by_month(&orders);
        assert_eq!(months[0], Price::from(150));
        assert_eq!(months[1], Price::ZERO);
        assert_eq!(months[2], Price::from(75));
        assert_eq!(months.iter().copied().sum::<Price>(), Price::from(225));
    }

    #[test]
    fn test_revenue_buckets_collapse_years() {
        let orders = vec![
            order("o1", "100", Some("2024-01-15T10:00:00Z")),
            order("o2", "50", Some("2026-01-20T09:30:00Z")),
        ];
        let months = revenue_by_month(&orders);
        assert_eq!(months[0], Price::from(150), "January sums across years");
        assert_eq!(
            months.iter().copied().sum::<Price>(),
            total_revenue(&orders),
            "bucketed and overall revenue agree for dated orders"
        );
    }

    #[test]
    fn test_total_revenue_counts_every_order() {
        let orders = vec![
            order("o1", "100", None),
            order("o2", "25", Some("garbage")),
        ];
        assert_eq!(total_revenue(&orders), Price::from(125));
        assert_eq!(order_count(&orders), 2);
    }

    #[test]
    fn test_mismatch_detection_leaves_totals_alone() {
        let consistent = serde_json::from_value::<Order>(json!({
            "id": "o1", "total": "20",
            "items": [{"id": "p1", "name": "Tee", "price": "10",
                       "category": "Tops", "quantity": 2}]
        }))
        .expect("order");
        let drifted = serde_json::from_value::<Order>(json!({
            "id": "o2", "total": "99",
            "items": [{"id": "p1", "name": "Tee", "price": "10",
                       "category": "Tops", "quantity": 2}]
        }))
        .expect("order");
        let legacy_no_items = order("o3", "5", None);

        let orders = vec![consistent, drifted, legacy_no_items];
        assert_eq!(total_mismatches(&orders), 1);
        assert_eq!(orders[1].total, Price::from(99), "recorded total untouched");
    }
}
