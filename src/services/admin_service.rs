use rust_decimal::Decimal;

use crate::{
    audit::log_audit,
    dto::{
        admin::DashboardStats,
        products::{CreateCategoryRequest, CreateProductRequest},
    },
    error::{AppError, AppResult},
    middleware::auth::{Action, AdminUser, Resource, authorize},
    models::{Category, NewCategory, NewProduct, Product},
    response::{ApiResponse, Meta},
    services::catalog_service::parse_id,
    state::AppState,
};

pub async fn dashboard(state: &AppState, admin: &AdminUser) -> ApiResponse<DashboardStats> {
    let counts = state.storage.counts().await;
    tracing::debug!(user_id = %admin.0.user_id, ?counts, "dashboard requested");

    let stats = DashboardStats {
        total_users: counts.users,
        total_products: counts.products,
        total_categories: counts.categories,
        total_cart_items: counts.cart_items,
    };
    ApiResponse::success("Dashboard", stats, Some(Meta::empty()))
}

pub async fn create_product(
    state: &AppState,
    admin: &AdminUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    authorize(&admin.0, Resource::Catalog, Action::Write)?;

    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".into()));
    }
    if payload.category.trim().is_empty() {
        return Err(AppError::BadRequest("category is required".into()));
    }
    if payload.price < Decimal::ZERO {
        return Err(AppError::BadRequest("price must not be negative".into()));
    }
    if payload.original_price.is_some_and(|p| p < Decimal::ZERO) {
        return Err(AppError::BadRequest("originalPrice must not be negative".into()));
    }
    let rating = payload.rating.unwrap_or(Decimal::ZERO);
    if rating < Decimal::ZERO || rating > Decimal::from(5) {
        return Err(AppError::BadRequest("rating must be between 0 and 5".into()));
    }
    if payload.discount.is_some_and(|d| !(0..=100).contains(&d)) {
        return Err(AppError::BadRequest("discount must be between 0 and 100".into()));
    }

    let product = state
        .storage
        .create_product(NewProduct {
            name: payload.name.trim().to_string(),
            description: payload.description,
            price: payload.price,
            original_price: payload.original_price,
            image: payload.image,
            category: payload.category.trim().to_string(),
            rating,
            in_stock: payload.in_stock,
            featured: payload.featured,
            discount: payload.discount,
            badge: payload.badge,
        })
        .await;

    log_audit(
        Some(admin.0.user_id),
        "product_create",
        Some("products"),
        Some(serde_json::json!({ "product_id": product.id })),
    );

    Ok(ApiResponse::success("Product created", product, Some(Meta::empty())))
}

pub async fn delete_product(
    state: &AppState,
    admin: &AdminUser,
    id: &str,
) -> AppResult<()> {
    authorize(&admin.0, Resource::Catalog, Action::Write)?;

    let deleted = match parse_id(id) {
        Some(id) => state.storage.delete_product(id).await,
        None => false,
    };
    if !deleted {
        return Err(AppError::not_found("Product"));
    }

    log_audit(
        Some(admin.0.user_id),
        "product_delete",
        Some("products"),
        Some(serde_json::json!({ "product_id": id })),
    );
    Ok(())
}

pub async fn create_category(
    state: &AppState,
    admin: &AdminUser,
    payload: CreateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    authorize(&admin.0, Resource::Catalog, Action::Write)?;

    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::BadRequest("name is required".into()));
    }
    let category = state
        .storage
        .create_category(NewCategory {
            name,
            icon: payload.icon,
        })
        .await?;

    log_audit(
        Some(admin.0.user_id),
        "category_create",
        Some("categories"),
        Some(serde_json::json!({ "category_id": category.id })),
    );

    Ok(ApiResponse::success("Category created", category, Some(Meta::empty())))
}
