//! Cart ledger operations.
//!
//! The ledger maps product id to quantity; quantities are always positive for
//! present keys. Views are derived from it on every read, so a stale entry
//! (product no longer in the catalog) simply contributes nothing.

use super::catalog::Catalog;
use super::errors::ShopError;
use super::models::{
    format_minor, AddToCartInput, CartLine, CartSnapshot, RemoveFromCartInput,
};
use super::state::ShopState;

/// Adds quantity to the existing line for the product (default 0) and returns
/// a fresh snapshot.
pub fn add_to_cart(
    catalog: &Catalog,
    shop: &mut ShopState,
    input: &AddToCartInput,
) -> Result<CartSnapshot, ShopError> {
    if input.product_id.is_empty() {
        return Err(ShopError::validation("productId is required"));
    }
    let quantity = parse_quantity(input.quantity)?;
    if catalog.find(&input.product_id).is_none() {
        return Err(ShopError::not_found(format!(
            "Unknown productId: {}",
            input.product_id
        )));
    }

    *shop.cart.entry(input.product_id.clone()).or_insert(0) += quantity;
    Ok(snapshot(catalog, shop))
}

/// Deletes the whole line for the product regardless of its quantity and
/// returns a fresh snapshot. Removing an absent id is not an error.
pub fn remove_from_cart(
    catalog: &Catalog,
    shop: &mut ShopState,
    input: &RemoveFromCartInput,
) -> Result<CartSnapshot, ShopError> {
    if input.product_id.is_empty() {
        return Err(ShopError::validation("productId is required"));
    }
    shop.cart.remove(&input.product_id);
    Ok(snapshot(catalog, shop))
}

/// Derives the cart view. Entries whose product no longer resolves, or whose
/// quantity is not positive, are skipped rather than failing the whole read.
pub fn snapshot(catalog: &Catalog, shop: &ShopState) -> CartSnapshot {
    let mut items = Vec::new();
    let mut total = 0u64;

    for (product_id, &quantity) in &shop.cart {
        let Some(product) = catalog.find(product_id) else {
            continue;
        };
        if quantity == 0 {
            continue;
        }
        let line_total = product.price_minor * quantity;
        total += line_total;
        items.push(CartLine {
            product_id: product.id.to_string(),
            name: product.name.to_string(),
            quantity,
            unit_price: format_minor(product.price_minor),
            line_total: format_minor(line_total),
            line_total_pence: line_total,
        });
    }

    CartSnapshot {
        item_count: items.iter().map(|line| line.quantity).sum(),
        total: format_minor(total),
        total_pence: total,
        items,
    }
}

/// The wire carries quantities as JSON numbers; the ledger stores whole,
/// positive counts. Anything else is rejected before it can touch state.
fn parse_quantity(raw: Option<f64>) -> Result<u64, ShopError> {
    let quantity = raw.unwrap_or(1.0);
    if !quantity.is_finite() || quantity <= 0.0 || quantity.fract() != 0.0 {
        return Err(ShopError::validation("quantity must be a positive number"));
    }
    Ok(quantity as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(
        catalog: &Catalog,
        shop: &mut ShopState,
        product_id: &str,
        quantity: f64,
    ) -> Result<CartSnapshot, ShopError> {
        add_to_cart(
            catalog,
            shop,
            &AddToCartInput {
                product_id: product_id.to_string(),
                quantity: Some(quantity),
            },
        )
    }

    #[test]
    fn adding_twice_aggregates_into_one_line() {
        let catalog = Catalog::seeded();
        let mut shop = ShopState::default();

        add(&catalog, &mut shop, "p1", 2.0).unwrap();
        let view = add(&catalog, &mut shop, "p1", 3.0).unwrap();

        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].quantity, 5);
        assert_eq!(view.item_count, 5);
        assert_eq!(view.total_pence, 5 * 899);
    }

    #[test]
    fn quantity_defaults_to_one() {
        let catalog = Catalog::seeded();
        let mut shop = ShopState::default();
        let view = add_to_cart(
            &catalog,
            &mut shop,
            &AddToCartInput {
                product_id: "p2".to_string(),
                quantity: None,
            },
        )
        .unwrap();
        assert_eq!(view.item_count, 1);
    }

    #[test]
    fn empty_product_id_is_a_validation_error() {
        let catalog = Catalog::seeded();
        let mut shop = ShopState::default();
        let err = add(&catalog, &mut shop, "", 1.0).unwrap_err();
        assert_eq!(err, ShopError::validation("productId is required"));
    }

    #[test]
    fn non_positive_and_fractional_quantities_are_rejected() {
        let catalog = Catalog::seeded();
        let mut shop = ShopState::default();
        for bad in [0.0, -1.0, 1.5, f64::NAN, f64::INFINITY] {
            let err = add(&catalog, &mut shop, "p1", bad).unwrap_err();
            assert!(matches!(err, ShopError::Validation(_)), "accepted {bad}");
        }
        assert!(shop.cart.is_empty());
    }

    #[test]
    fn unknown_product_is_a_not_found_error() {
        let catalog = Catalog::seeded();
        let mut shop = ShopState::default();
        let err = add(&catalog, &mut shop, "p99", 1.0).unwrap_err();
        assert_eq!(err, ShopError::not_found("Unknown productId: p99"));
    }

    #[test]
    fn remove_deletes_the_line_regardless_of_quantity() {
        let catalog = Catalog::seeded();
        let mut shop = ShopState::default();
        add(&catalog, &mut shop, "p1", 7.0).unwrap();

        let view = remove_from_cart(
            &catalog,
            &mut shop,
            &RemoveFromCartInput {
                product_id: "p1".to_string(),
            },
        )
        .unwrap();

        assert!(view.items.is_empty());
        assert_eq!(view.total_pence, 0);
    }

    #[test]
    fn stale_ledger_entries_contribute_nothing() {
        let catalog = Catalog::seeded();
        let mut shop = ShopState::default();
        add(&catalog, &mut shop, "p3", 2.0).unwrap();
        // A reference to a product that never existed in the catalog.
        shop.cart.insert("ghost".to_string(), 4);

        let view = snapshot(&catalog, &shop);
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.total_pence, 2 * 349);
    }

    #[test]
    fn snapshot_totals_sum_unit_price_times_quantity() {
        let catalog = Catalog::seeded();
        let mut shop = ShopState::default();
        add(&catalog, &mut shop, "p1", 2.0).unwrap();
        let view = add(&catalog, &mut shop, "p4", 1.0).unwrap();

        assert_eq!(view.total_pence, 2 * 899 + 1899);
        assert_eq!(view.total, format_minor(2 * 899 + 1899));
    }
}
