use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Catalog filters. They are mutually exclusive and applied in the order
/// search, category, featured; blank values count as absent.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ProductFilter {
    Search(String),
    Category(String),
    Featured,
    All,
}

impl ProductQuery {
    pub fn filter(&self) -> ProductFilter {
        fn present(value: &Option<String>) -> Option<&str> {
            value.as_deref().map(str::trim).filter(|v| !v.is_empty())
        }

        if let Some(term) = present(&self.search) {
            ProductFilter::Search(term.to_string())
        } else if let Some(category) = present(&self.category) {
            ProductFilter::Category(category.to_string())
        } else if present(&self.featured).is_some_and(|f| f.eq_ignore_ascii_case("true") || f == "1") {
            ProductFilter::Featured
        } else {
            ProductFilter::All
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(search: Option<&str>, category: Option<&str>, featured: Option<&str>) -> ProductQuery {
        ProductQuery {
            search: search.map(str::to_string),
            category: category.map(str::to_string),
            featured: featured.map(str::to_string),
        }
    }

    #[test]
    fn search_wins_over_everything() {
        assert_eq!(
            query(Some("mac"), Some("Laptops"), Some("true")).filter(),
            ProductFilter::Search("mac".into())
        );
    }

    #[test]
    fn category_wins_over_featured() {
        assert_eq!(
            query(None, Some("Audio"), Some("true")).filter(),
            ProductFilter::Category("Audio".into())
        );
    }

    #[test]
    fn blank_and_false_values_fall_through() {
        assert_eq!(query(Some("  "), Some(""), Some("true")).filter(), ProductFilter::Featured);
        assert_eq!(query(None, None, Some("false")).filter(), ProductFilter::All);
        assert_eq!(query(None, None, None).filter(), ProductFilter::All);
    }
}
