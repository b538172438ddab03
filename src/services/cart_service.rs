use crate::{
    audit::log_audit,
    dto::cart::{AddToCartRequest, CartList, UpdateQuantityRequest},
    error::{AppError, AppResult},
    middleware::cart_session::CartSession,
    models::{CartItem, NewCartItem},
    pricing::{self, CartSummary},
    response::{ApiResponse, Meta},
    services::catalog_service::parse_id,
    state::AppState,
};

pub async fn list_cart(state: &AppState, session: &CartSession) -> ApiResponse<CartList> {
    let items = state.storage.get_cart_items(&session.0).await;
    let meta = Meta::count(items.len());
    ApiResponse::success("OK", CartList { items }, Some(meta))
}

pub async fn cart_summary(state: &AppState, session: &CartSession) -> ApiResponse<CartSummary> {
    let items = state.storage.get_cart_items(&session.0).await;
    ApiResponse::success("OK", pricing::summarize(&items), None)
}

pub async fn add_to_cart(
    state: &AppState,
    session: &CartSession,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartItem>> {
    if payload.quantity <= 0 {
        return Err(AppError::BadRequest(
            "quantity must be greater than 0".to_string(),
        ));
    }
    if state
        .storage
        .get_product_by_id(payload.product_id)
        .await
        .is_none()
    {
        return Err(AppError::BadRequest("product not found".to_string()));
    }

    let cart_item = state
        .storage
        .add_to_cart(NewCartItem {
            session_id: session.0.clone(),
            product_id: payload.product_id,
            quantity: payload.quantity,
        })
        .await;

    log_audit(
        None,
        "cart_add",
        Some("cart_items"),
        Some(serde_json::json!({
            "session_id": session.0,
            "product_id": payload.product_id,
            "quantity": cart_item.quantity,
        })),
    );

    Ok(ApiResponse::success("Added to cart", cart_item, None))
}

/// Sets a line's quantity. Zero or less removes it; a missing line is only an
/// error when the caller asked for a positive quantity.
pub async fn update_quantity(
    state: &AppState,
    session: &CartSession,
    product_id: &str,
    payload: UpdateQuantityRequest,
) -> AppResult<ApiResponse<CartItem>> {
    let updated = match parse_id(product_id) {
        Some(id) => {
            state
                .storage
                .update_cart_item_quantity(&session.0, id, payload.quantity)
                .await
        }
        None => None,
    };

    log_audit(
        None,
        "cart_update",
        Some("cart_items"),
        Some(serde_json::json!({
            "session_id": session.0,
            "product_id": product_id,
            "quantity": payload.quantity,
        })),
    );

    match updated {
        Some(item) => Ok(ApiResponse::success("Cart updated", item, None)),
        None if payload.quantity > 0 => Err(AppError::not_found("Cart item")),
        None => Ok(ApiResponse::empty("Removed from cart")),
    }
}

pub async fn remove_from_cart(state: &AppState, session: &CartSession, product_id: &str) {
    if let Some(id) = parse_id(product_id) {
        state.storage.remove_from_cart(&session.0, id).await;
    }

    log_audit(
        None,
        "cart_remove",
        Some("cart_items"),
        Some(serde_json::json!({ "session_id": session.0, "product_id": product_id })),
    );
}

pub async fn clear_cart(state: &AppState, session: &CartSession) {
    state.storage.clear_cart(&session.0).await;
    log_audit(
        None,
        "cart_clear",
        Some("cart_items"),
        Some(serde_json::json!({ "session_id": session.0 })),
    );
}
