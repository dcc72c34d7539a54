use std::collections::BTreeMap;

use crate::domain::product::{normalize_tag, Product};

/// Product catalog with a lowercase tag index built once at load time.
///
/// Each index entry lists products in catalog order. A product appears under
/// every one of its tags, so the same product can be reached from several
/// keys.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    products: Vec<Product>,
    tag_index: BTreeMap<String, Vec<usize>>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        let mut tag_index: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (position, product) in products.iter().enumerate() {
            for tag in &product.tags {
                tag_index.entry(normalize_tag(tag)).or_default().push(position);
            }
        }

        Self { products, tag_index }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Known tags in sorted order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tag_index.keys().map(String::as_str)
    }

    pub fn tag_count(&self) -> usize {
        self.tag_index.len()
    }

    /// Exact key lookup; callers normalize before asking.
    pub fn contains_tag(&self, tag: &str) -> bool {
        self.tag_index.contains_key(tag)
    }

    pub fn products_for_tag(&self, tag: &str) -> Vec<&Product> {
        self.tag_index
            .get(tag)
            .map(|positions| positions.iter().map(|position| &self.products[*position]).collect())
            .unwrap_or_default()
    }

    /// Concatenates the product lists of every tag, in the order given.
    /// Duplicates are kept when a product sits under more than one tag.
    pub fn products_for_tags<'a, I>(&self, tags: I) -> Vec<&Product>
    where
        I: IntoIterator<Item = &'a str>,
    {
        tags.into_iter().flat_map(|tag| self.products_for_tag(tag)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::Catalog;
    use crate::domain::product::{normalize_tag, Product};

    fn product(name: &str, tags: &[&str]) -> Product {
        Product {
            name: name.to_string(),
            description: format!("{name} description"),
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
        }
    }

    fn sample_catalog() -> Catalog {
        Catalog::new(vec![
            product("Summit Pack", &["Backpack", "Hiking"]),
            product("Ridge Tent", &["Camping", "Shelter"]),
            product("Trail Runner", &["Hiking", "Footwear", "Running"]),
        ])
    }

    #[test]
    fn every_product_is_indexed_under_each_normalized_tag() {
        let catalog = sample_catalog();

        for product in catalog.products() {
            for tag in &product.tags {
                let listed = catalog.products_for_tag(&normalize_tag(tag));
                assert!(
                    listed.iter().any(|candidate| candidate.name == product.name),
                    "{} missing from tag {tag}",
                    product.name
                );
            }
        }
    }

    #[test]
    fn index_keys_are_the_lowercased_union_of_tags_in_sorted_order() {
        let catalog = sample_catalog();
        let tags = catalog.tags().collect::<Vec<_>>();

        assert_eq!(
            tags,
            vec!["backpack", "camping", "footwear", "hiking", "running", "shelter"]
        );
        assert_eq!(catalog.tag_count(), 6);
        assert!(catalog.contains_tag("hiking"));
        assert!(!catalog.contains_tag("Hiking"));
    }

    #[test]
    fn every_indexed_product_carries_the_tag() {
        let catalog = sample_catalog();
        for tag in catalog.tags() {
            for product in catalog.products_for_tag(tag) {
                assert!(
                    product.tags.iter().any(|candidate| normalize_tag(candidate) == tag),
                    "{} listed under {tag} without carrying it",
                    product.name
                );
            }
        }
    }

    #[test]
    fn tag_lists_preserve_catalog_order() {
        let catalog = sample_catalog();
        let names = catalog
            .products_for_tag("hiking")
            .into_iter()
            .map(|product| product.name.as_str())
            .collect::<Vec<_>>();

        assert_eq!(names, vec!["Summit Pack", "Trail Runner"]);
    }

    #[test]
    fn union_over_tags_keeps_duplicates_and_tag_order() {
        let catalog = sample_catalog();
        let names = catalog
            .products_for_tags(["running", "hiking", "unknown"])
            .into_iter()
            .map(|product| product.name.as_str())
            .collect::<Vec<_>>();

        assert_eq!(names, vec!["Trail Runner", "Summit Pack", "Trail Runner"]);
    }
}
