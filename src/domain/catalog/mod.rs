//! Catalog queries: category/promotion/search filtering, sorting and
//! pagination over an in-memory product list.
//!
//! Every function here is pure. Callers fetch products from a
//! [`ProductSource`](crate::repository::ProductSource) and hand the slice in.

use crate::domain::aggregates::Product;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

pub const DEFAULT_PAGE_SIZE: usize = 12;

/// Label of the catch-all category.
pub const ALL_CATEGORIES: &str = "All";

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum CategoryFilter {
    #[default]
    All,
    Named(String),
}

impl CategoryFilter {
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Named(name) => product.category == *name,
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(raw: &str) -> Self {
        if raw.is_empty() || raw == ALL_CATEGORIES { Self::All } else { Self::Named(raw.to_string()) }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL_CATEGORIES),
            Self::Named(name) => f.write_str(name),
        }
    }
}

impl Serialize for CategoryFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CategoryFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from(raw.as_str()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Name,
    Price,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// UI-held catalog view state. Changing the search term or the category sends
/// the view back to page 1.
#[derive(Clone, Debug, PartialEq)]
pub struct CatalogQuery {
    pub search_term: String,
    pub category: CategoryFilter,
    pub promotions_only: bool,
    /// `None` keeps the source order.
    pub sort_key: Option<SortKey>,
    pub sort_direction: SortDirection,
    pub page: u32,
    /// Deep link: when set and visible, overrides `page`.
    pub target_product_id: Option<i64>,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self {
            search_term: String::new(), category: CategoryFilter::All, promotions_only: false,
            sort_key: None, sort_direction: SortDirection::Asc, page: 1, target_product_id: None,
        }
    }
}

impl CatalogQuery {
    pub fn new() -> Self { Self::default() }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.page = 1;
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        self.category = category;
        self.page = 1;
    }

    pub fn set_sort(&mut self, key: SortKey, direction: SortDirection) {
        self.sort_key = Some(key);
        self.sort_direction = direction;
    }

    pub fn set_page(&mut self, page: u32) { self.page = page; }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Page {
    pub items: Vec<Product>,
    pub total_pages: u32,
}

/// Result of running a full query.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CatalogPage {
    pub items: Vec<Product>,
    pub page: u32,
    pub total_pages: u32,
    pub total_items: usize,
}

/// `All` followed by each distinct category in first-seen order.
pub fn list_categories(products: &[Product]) -> Vec<CategoryFilter> {
    let mut categories = vec![CategoryFilter::All];
    for product in products {
        let candidate = CategoryFilter::Named(product.category.clone());
        if !categories.contains(&candidate) {
            categories.push(candidate);
        }
    }
    categories
}

/// Applies category, promotion and search filters, in that order.
pub fn filter(products: &[Product], query: &CatalogQuery) -> Vec<Product> {
    let term = query.search_term.trim();
    let needle = term.to_lowercase();
    products
        .iter()
        .filter(|p| query.category.matches(p))
        .filter(|p| !query.promotions_only || p.is_promotion)
        .filter(|p| term.is_empty() || p.name.to_lowercase().contains(&needle) || p.id.to_string() == term)
        .cloned()
        .collect()
}

/// Stable sort into a new vector.
pub fn sort(products: &[Product], key: SortKey, direction: SortDirection) -> Vec<Product> {
    let mut sorted = products.to_vec();
    sorted.sort_by(|a, b| {
        let ord = match key {
            SortKey::Name => compare_names(&a.name, &b.name),
            SortKey::Price => a.price.cmp(&b.price),
        };
        match direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
    sorted
}

/// Slices out one 1-based page. An empty list still reports one page; pages
/// outside the range come back empty.
pub fn paginate(products: &[Product], page: u32, page_size: usize) -> Page {
    let page_size = page_size.max(1);
    let total_pages = products.len().div_ceil(page_size).max(1);
    let items = match (page as usize).checked_sub(1).and_then(|p| p.checked_mul(page_size)) {
        Some(start) if start < products.len() => {
            let end = (start + page_size).min(products.len());
            products[start..end].to_vec()
        }
        _ => vec![],
    };
    Page { items, total_pages: u32::try_from(total_pages).unwrap_or(u32::MAX) }
}

/// Page on which `target_id` appears in an already filtered list.
pub fn resolve_target_page(filtered: &[Product], target_id: i64, page_size: usize) -> Option<u32> {
    let index = filtered.iter().position(|p| p.id == target_id)?;
    u32::try_from(index / page_size.max(1) + 1).ok()
}

/// Filter, sort and paginate in one pass.
pub fn run(products: &[Product], query: &CatalogQuery, page_size: usize) -> CatalogPage {
    let filtered = filter(products, query);
    let ordered = match query.sort_key {
        Some(key) => sort(&filtered, key, query.sort_direction),
        None => filtered,
    };
    let page = query
        .target_product_id
        .and_then(|id| resolve_target_page(&ordered, id, page_size))
        .unwrap_or(query.page);
    let Page { items, total_pages } = paginate(&ordered, page, page_size);
    CatalogPage { items, page, total_pages, total_items: ordered.len() }
}

fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a).cmp(&collation_key(b)).then_with(|| a.cmp(b))
}

/// Case- and accent-folded form used for alphabetical ordering.
fn collation_key(s: &str) -> String {
    s.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}
