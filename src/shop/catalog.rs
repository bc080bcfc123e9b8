//! Product catalog and search.
//!
//! The catalog is seeded once at startup and never changes. Search filters it
//! by case-insensitive text containment and exact category match, in catalog
//! order.

use super::models::{Category, Product, ProductView, SearchInput, SearchResult};
use super::state::ShopState;

/// The immutable product list. Lookup is by id.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn seeded() -> Self {
        Self {
            products: vec![
                Product {
                    id: "p1",
                    name: "Ceramic Mug",
                    category: Category::Home,
                    price_minor: 899,
                    description: "Dishwasher safe mug",
                },
                Product {
                    id: "p2",
                    name: "USB-C Cable 1m",
                    category: Category::Electronics,
                    price_minor: 599,
                    description: "USB-C to USB-C",
                },
                Product {
                    id: "p3",
                    name: "Notebook A5",
                    category: Category::Office,
                    price_minor: 349,
                    description: "Ruled paper notebook",
                },
                Product {
                    id: "p4",
                    name: "Desk Lamp",
                    category: Category::Office,
                    price_minor: 1899,
                    description: "LED lamp with dimmer",
                },
                Product {
                    id: "p5",
                    name: "Wireless Mouse",
                    category: Category::Electronics,
                    price_minor: 1499,
                    description: "2.4GHz mouse",
                },
                Product {
                    id: "p6",
                    name: "Coffee Grinder",
                    category: Category::Home,
                    price_minor: 2999,
                    description: "Burr grinder",
                },
            ],
        }
    }

    pub fn find(&self, product_id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == product_id)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }
}

/// Filters the catalog by text and category. Both dimensions are trimmed and
/// lower-cased; the empty string is a wildcard. A product matches on text when
/// the query is contained in its name or description.
///
/// Side effect: replaces the ordered "last results" id list, which gives
/// "first visible result" a meaning for the demo helper.
pub fn search_products(
    catalog: &Catalog,
    shop: &mut ShopState,
    input: &SearchInput,
) -> SearchResult {
    let query = input.q.trim().to_lowercase();
    let category = input.category.trim().to_lowercase();

    let matches: Vec<&Product> = catalog
        .products()
        .iter()
        .filter(|p| {
            let by_text = query.is_empty()
                || p.name.to_lowercase().contains(&query)
                || p.description.to_lowercase().contains(&query);
            let by_category = category.is_empty() || p.category.as_str() == category;
            by_text && by_category
        })
        .collect();

    shop.last_results = matches.iter().map(|p| p.id.to_string()).collect();

    SearchResult {
        count: matches.len(),
        products: matches.into_iter().map(ProductView::from).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search(q: &str, category: &str) -> (SearchResult, ShopState) {
        let catalog = Catalog::seeded();
        let mut shop = ShopState::default();
        let result = search_products(
            &catalog,
            &mut shop,
            &SearchInput {
                q: q.to_string(),
                category: category.to_string(),
            },
        );
        (result, shop)
    }

    #[test]
    fn empty_query_and_category_match_everything() {
        let (result, _) = search("", "");
        assert_eq!(result.count, 6);
    }

    #[test]
    fn every_product_is_found_by_its_own_name() {
        let catalog = Catalog::seeded();
        for product in catalog.products() {
            let (result, _) = search(product.name, "");
            assert!(
                result.products.iter().any(|p| p.id == product.id),
                "{} not found by name",
                product.id
            );
        }
    }

    #[test]
    fn category_filter_excludes_other_categories() {
        let (result, _) = search("", "office");
        assert_eq!(result.count, 2);
        assert!(result.products.iter().all(|p| p.category == "office"));
    }

    #[test]
    fn text_matches_description_case_insensitively() {
        let (result, _) = search("BURR", "");
        assert_eq!(result.count, 1);
        assert_eq!(result.products[0].id, "p6");
    }

    #[test]
    fn query_and_category_are_trimmed() {
        let (result, _) = search("  mug  ", "  HOME ");
        assert_eq!(result.count, 1);
        assert_eq!(result.products[0].id, "p1");
    }

    #[test]
    fn search_records_last_results_in_catalog_order() {
        let (_, shop) = search("", "electronics");
        assert_eq!(shop.last_results, vec!["p2".to_string(), "p5".to_string()]);
    }

    #[test]
    fn no_match_leaves_an_empty_last_results_list() {
        let (result, shop) = search("zeppelin", "");
        assert_eq!(result.count, 0);
        assert!(shop.last_results.is_empty());
    }
}
