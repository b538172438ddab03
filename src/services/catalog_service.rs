use uuid::Uuid;

use crate::{
    dto::products::{CategoryList, ProductList},
    error::{AppError, AppResult},
    models::{Category, Product},
    response::{ApiResponse, Meta},
    routes::params::{ProductFilter, ProductQuery},
    state::AppState,
};

pub async fn list_categories(state: &AppState) -> ApiResponse<CategoryList> {
    let items = state.storage.get_categories().await;
    let meta = Meta::count(items.len());
    ApiResponse::success("Categories", CategoryList { items }, Some(meta))
}

pub async fn get_category(state: &AppState, id: &str) -> AppResult<ApiResponse<Category>> {
    let category = match parse_id(id) {
        Some(id) => state.storage.get_category_by_id(id).await,
        None => None,
    };
    let category = category.ok_or_else(|| AppError::not_found("Category"))?;
    Ok(ApiResponse::success("Category", category, None))
}

pub async fn list_products(state: &AppState, query: &ProductQuery) -> ApiResponse<ProductList> {
    let filter = query.filter();
    tracing::debug!(?filter, "listing products");

    let items = match filter {
        ProductFilter::Search(term) => state.storage.search_products(&term).await,
        ProductFilter::Category(name) => state.storage.get_products_by_category(&name).await,
        ProductFilter::Featured => state.storage.get_featured_products().await,
        ProductFilter::All => state.storage.get_products().await,
    };

    let meta = Meta::count(items.len());
    ApiResponse::success("Products", ProductList { items }, Some(meta))
}

pub async fn get_product(state: &AppState, id: &str) -> AppResult<ApiResponse<Product>> {
    let product = match parse_id(id) {
        Some(id) => state.storage.get_product_by_id(id).await,
        None => None,
    };
    let product = product.ok_or_else(|| AppError::not_found("Product"))?;
    Ok(ApiResponse::success("Product", product, None))
}

/// Ids arrive as free-form path segments; anything that is not a UUID simply
/// matches nothing.
pub(crate) fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}
