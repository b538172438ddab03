use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        admin::DashboardStats,
        auth::{AuthSession, LoginRequest, RegisterRequest, UserLoginRequest},
        cart::{AddToCartRequest, CartList, UpdateQuantityRequest},
        products::{CategoryList, CreateCategoryRequest, CreateProductRequest, ProductList},
        users::UpdateProfileRequest,
    },
    models::{CartItem, CartItemWithProduct, Category, Product, Role, UserProfile},
    pricing::CartSummary,
    response::{ApiResponse, Meta},
    routes::{admin, auth, cart, categories, health, params, products, users},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("opaque session token")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        categories::list_categories,
        categories::get_category,
        products::list_products,
        products::get_product,
        cart::cart_list,
        cart::cart_summary,
        cart::add_to_cart,
        cart::update_quantity,
        cart::remove_from_cart,
        cart::clear_cart,
        auth::register,
        auth::login,
        auth::user_login,
        auth::logout,
        auth::me,
        users::update_profile,
        admin::dashboard,
        admin::create_product,
        admin::delete_product,
        admin::create_category
    ),
    components(
        schemas(
            Category,
            Product,
            CartItem,
            CartItemWithProduct,
            Role,
            UserProfile,
            CartSummary,
            CategoryList,
            ProductList,
            CartList,
            AddToCartRequest,
            UpdateQuantityRequest,
            RegisterRequest,
            LoginRequest,
            UserLoginRequest,
            AuthSession,
            UpdateProfileRequest,
            CreateProductRequest,
            CreateCategoryRequest,
            DashboardStats,
            params::ProductQuery,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<CartList>,
            ApiResponse<AuthSession>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Catalog", description = "Category and product browsing"),
        (name = "Cart", description = "Session-scoped cart, keyed by the session-id header"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Users", description = "Profile management"),
        (name = "Admin", description = "Admin endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
