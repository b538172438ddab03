use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};

use crate::{
    dto::cart::{AddToCartRequest, CartList, UpdateQuantityRequest},
    error::AppResult,
    middleware::{cart_session::CartSession, json::AppJson},
    models::CartItem,
    pricing::CartSummary,
    response::ApiResponse,
    services::cart_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(cart_list).post(add_to_cart).delete(clear_cart))
        .route("/summary", get(cart_summary))
        .route("/{product_id}", put(update_quantity).delete(remove_from_cart))
}

#[utoipa::path(
    get,
    path = "/api/cart",
    params(
        ("session-id" = Option<String>, Header, description = "Cart session; defaults to \"anonymous\"")
    ),
    responses(
        (status = 200, description = "Cart lines joined with their products", body = ApiResponse<CartList>)
    ),
    tag = "Cart"
)]
pub async fn cart_list(
    State(state): State<AppState>,
    session: CartSession,
) -> Json<ApiResponse<CartList>> {
    Json(cart_service::list_cart(&state, &session).await)
}

#[utoipa::path(
    get,
    path = "/api/cart/summary",
    params(
        ("session-id" = Option<String>, Header, description = "Cart session; defaults to \"anonymous\"")
    ),
    responses(
        (status = 200, description = "Item count, subtotal, shipping, tax and total", body = ApiResponse<CartSummary>)
    ),
    tag = "Cart"
)]
pub async fn cart_summary(
    State(state): State<AppState>,
    session: CartSession,
) -> Json<ApiResponse<CartSummary>> {
    Json(cart_service::cart_summary(&state, &session).await)
}

#[utoipa::path(
    post,
    path = "/api/cart",
    params(
        ("session-id" = Option<String>, Header, description = "Cart session; defaults to \"anonymous\"")
    ),
    request_body = AddToCartRequest,
    responses(
        (status = 201, description = "Line created or its quantity increased", body = ApiResponse<CartItem>),
        (status = 400, description = "Bad request"),
    ),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    session: CartSession,
    AppJson(payload): AppJson<AddToCartRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<CartItem>>)> {
    let resp = cart_service::add_to_cart(&state, &session, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/cart/{product_id}",
    params(
        ("product_id" = String, Path, description = "Product ID"),
        ("session-id" = Option<String>, Header, description = "Cart session; defaults to \"anonymous\"")
    ),
    request_body = UpdateQuantityRequest,
    responses(
        (status = 200, description = "Updated line, or no data when the quantity removed it", body = ApiResponse<CartItem>),
        (status = 404, description = "Cart item not found"),
    ),
    tag = "Cart"
)]
pub async fn update_quantity(
    State(state): State<AppState>,
    session: CartSession,
    Path(product_id): Path<String>,
    AppJson(payload): AppJson<UpdateQuantityRequest>,
) -> AppResult<Json<ApiResponse<CartItem>>> {
    let resp = cart_service::update_quantity(&state, &session, &product_id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/cart/{product_id}",
    params(
        ("product_id" = String, Path, description = "Product ID"),
        ("session-id" = Option<String>, Header, description = "Cart session; defaults to \"anonymous\"")
    ),
    responses(
        (status = 204, description = "Removed (or was not there)"),
    ),
    tag = "Cart"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    session: CartSession,
    Path(product_id): Path<String>,
) -> StatusCode {
    cart_service::remove_from_cart(&state, &session, &product_id).await;
    StatusCode::NO_CONTENT
}

#[utoipa::path(
    delete,
    path = "/api/cart",
    params(
        ("session-id" = Option<String>, Header, description = "Cart session; defaults to \"anonymous\"")
    ),
    responses(
        (status = 204, description = "Cart emptied"),
    ),
    tag = "Cart"
)]
pub async fn clear_cart(State(state): State<AppState>, session: CartSession) -> StatusCode {
    cart_service::clear_cart(&state, &session).await;
    StatusCode::NO_CONTENT
}
