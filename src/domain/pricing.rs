//! Server-side price derivation. Totals are computed from authoritative
//! catalog prices, never taken from the client, and use decimal arithmetic
//! throughout.

use bigdecimal::BigDecimal;
use uuid::Uuid;

use super::errors::DomainError;

/// A line-item request whose product has been resolved against the catalog.
#[derive(Debug, Clone)]
pub struct ResolvedItem {
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

/// A line item ready to be materialized: unit-price snapshot plus the
/// derived subtotal.
#[derive(Debug, Clone)]
pub struct PricedItem {
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub subtotal: BigDecimal,
}

/// Derive each item's subtotal and the order total.
///
/// Fails with `InvalidQuantity` on any non-positive quantity; nothing about
/// the input is trusted beyond the resolved catalog price.
pub fn price_items(items: &[ResolvedItem]) -> Result<(Vec<PricedItem>, BigDecimal), DomainError> {
    let mut priced = Vec::with_capacity(items.len());
    let mut total = BigDecimal::from(0);

    for item in items {
        if item.quantity < 1 {
            return Err(DomainError::InvalidQuantity(item.quantity));
        }
        let subtotal = &item.unit_price * BigDecimal::from(item.quantity);
        total += &subtotal;
        priced.push(PricedItem {
            product_id: item.product_id,
            quantity: item.quantity,
            unit_price: item.unit_price.clone(),
            subtotal,
        });
    }

    Ok((priced, total))
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn item(price: &str, quantity: i32) -> ResolvedItem {
        ResolvedItem {
            product_id: Uuid::new_v4(),
            quantity,
            unit_price: BigDecimal::from_str(price).expect("valid decimal"),
        }
    }

    #[test]
    fn totals_price_times_quantity_across_items() {
        let items = vec![item("20", 2), item("5", 3)];

        let (priced, total) = price_items(&items).expect("pricing failed");

        assert_eq!(priced.len(), 2);
        assert_eq!(priced[0].subtotal, BigDecimal::from(40));
        assert_eq!(priced[1].subtotal, BigDecimal::from(15));
        assert_eq!(total, BigDecimal::from(55));
    }

    #[test]
    fn total_is_independent_of_submission_order() {
        let a = item("9.99", 1);
        let b = item("0.01", 3);

        let (_, forward) = price_items(&[a.clone(), b.clone()]).expect("pricing failed");
        let (_, reverse) = price_items(&[b, a]).expect("pricing failed");

        assert_eq!(forward, reverse);
        assert_eq!(forward, BigDecimal::from_str("10.02").unwrap());
    }

    #[test]
    fn decimal_subtotals_do_not_drift() {
        let items = vec![item("0.10", 3)];

        let (priced, total) = price_items(&items).expect("pricing failed");

        assert_eq!(priced[0].subtotal, BigDecimal::from_str("0.30").unwrap());
        assert_eq!(total, BigDecimal::from_str("0.30").unwrap());
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let err = price_items(&[item("5", 0)]).unwrap_err();
        assert!(matches!(err, DomainError::InvalidQuantity(0)));
    }

    #[test]
    fn negative_quantity_is_rejected() {
        let err = price_items(&[item("5", -2)]).unwrap_err();
        assert!(matches!(err, DomainError::InvalidQuantity(-2)));
    }

    #[test]
    fn empty_input_prices_to_zero() {
        let (priced, total) = price_items(&[]).expect("pricing failed");
        assert!(priced.is_empty());
        assert_eq!(total, BigDecimal::from(0));
    }
}
