//! Typed HTTP client for the storefront API.
//!
//! The client owns two independent identifiers: the cart session id, sent as
//! the `session-id` header on every cart call, and the auth token returned by
//! a login, sent as a bearer token. Cart reads are cached; every cart mutation
//! drops the cache so the next read refetches from the server instead of
//! patching local state.

use chrono::Utc;
use rand::Rng;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    dto::{
        auth::{AuthSession, LoginRequest, RegisterRequest, UserLoginRequest},
        cart::{AddToCartRequest, CartList, UpdateQuantityRequest},
        products::{CategoryList, ProductList},
        users::UpdateProfileRequest,
    },
    middleware::cart_session::SESSION_ID_HEADER,
    models::{CartItem, CartItemWithProduct, Category, Product, UserProfile},
    pricing::{self, CartSummary},
    response::ApiResponse,
    routes::params::ProductQuery,
};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{status}: {message}")]
    Api { status: u16, message: String },

    #[error("response carried no data")]
    MissingData,
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

/// A new cart session id: `session-<unix millis>-<9 base36 chars>`.
pub fn generate_cart_session_id() -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    let suffix: String = (0..9)
        .map(|_| char::from(ALPHABET[rng.gen_range(0..ALPHABET.len())]))
        .collect();
    format!("session-{}-{suffix}", Utc::now().timestamp_millis())
}

pub struct StorefrontClient {
    http: reqwest::Client,
    base_url: String,
    cart_session: String,
    auth_token: Option<String>,
    cart_cache: Option<Vec<CartItemWithProduct>>,
}

impl StorefrontClient {
    /// Client with a freshly generated cart session. Callers that want the
    /// cart to survive restarts should persist [`Self::cart_session_id`] and
    /// use [`Self::with_cart_session`] next time.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_cart_session(base_url, generate_cart_session_id())
    }

    pub fn with_cart_session(base_url: impl Into<String>, cart_session: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cart_session: cart_session.into(),
            auth_token: None,
            cart_cache: None,
        }
    }

    pub fn cart_session_id(&self) -> &str {
        &self.cart_session
    }

    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    pub fn set_auth_token(&mut self, token: Option<String>) {
        self.auth_token = token;
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth_token.is_some()
    }

    // Catalog

    pub async fn categories(&self) -> ClientResult<Vec<Category>> {
        let list: CategoryList = data(self.request(Method::GET, "/categories").send().await?).await?;
        Ok(list.items)
    }

    pub async fn products(&self, query: &ProductQuery) -> ClientResult<Vec<Product>> {
        let response = self
            .request(Method::GET, "/products")
            .query(query)
            .send()
            .await?;
        let list: ProductList = data(response).await?;
        Ok(list.items)
    }

    pub async fn product(&self, id: Uuid) -> ClientResult<Product> {
        data(self.request(Method::GET, &format!("/products/{id}")).send().await?).await
    }

    // Cart

    /// Cart lines, served from cache when nothing has changed since the last
    /// fetch.
    pub async fn cart(&mut self) -> ClientResult<&[CartItemWithProduct]> {
        if self.cart_cache.is_none() {
            let response = self.cart_request(Method::GET, "/cart").send().await?;
            let list: CartList = data(response).await?;
            self.cart_cache = Some(list.items);
        }
        Ok(self.cart_cache.as_deref().unwrap_or_default())
    }

    pub async fn cart_summary(&mut self) -> ClientResult<CartSummary> {
        Ok(pricing::summarize(self.cart().await?))
    }

    pub async fn item_count(&mut self) -> ClientResult<i64> {
        Ok(self.cart_summary().await?.item_count)
    }

    pub fn invalidate_cart(&mut self) {
        self.cart_cache = None;
    }

    pub async fn add_to_cart(&mut self, product_id: Uuid, quantity: i32) -> ClientResult<CartItem> {
        let sent = self
            .cart_request(Method::POST, "/cart")
            .json(&AddToCartRequest {
                product_id,
                quantity,
            })
            .send()
            .await;
        self.invalidate_cart();
        data(sent?).await
    }

    /// Returns `None` when the update removed the line.
    pub async fn update_quantity(
        &mut self,
        product_id: Uuid,
        quantity: i32,
    ) -> ClientResult<Option<CartItem>> {
        let sent = self
            .cart_request(Method::PUT, &format!("/cart/{product_id}"))
            .json(&UpdateQuantityRequest { quantity })
            .send()
            .await;
        self.invalidate_cart();
        Ok(envelope::<CartItem>(sent?).await?.data)
    }

    pub async fn remove_from_cart(&mut self, product_id: Uuid) -> ClientResult<()> {
        let sent = self
            .cart_request(Method::DELETE, &format!("/cart/{product_id}"))
            .send()
            .await;
        self.invalidate_cart();
        no_content(sent?).await
    }

    pub async fn clear_cart(&mut self) -> ClientResult<()> {
        let sent = self.cart_request(Method::DELETE, "/cart").send().await;
        self.invalidate_cart();
        no_content(sent?).await
    }

    // Auth

    pub async fn login(&mut self, username: &str, password: &str) -> ClientResult<UserProfile> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response = self.request(Method::POST, "/auth/login").json(&body).send().await?;
        self.adopt_session(response).await
    }

    pub async fn user_login(&mut self, email: &str, password: &str) -> ClientResult<UserProfile> {
        let body = UserLoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self
            .request(Method::POST, "/auth/user-login")
            .json(&body)
            .send()
            .await?;
        self.adopt_session(response).await
    }

    pub async fn register(&mut self, request: &RegisterRequest) -> ClientResult<UserProfile> {
        let response = self
            .request(Method::POST, "/auth/register")
            .json(request)
            .send()
            .await?;
        self.adopt_session(response).await
    }

    /// Ends the auth session. Local state is dropped even if the server call
    /// fails.
    pub async fn logout(&mut self) -> ClientResult<()> {
        let sent = self.request(Method::POST, "/auth/logout").send().await;
        self.auth_token = None;
        self.invalidate_cart();
        envelope::<serde_json::Value>(sent?).await.map(|_| ())
    }

    pub async fn me(&self) -> ClientResult<UserProfile> {
        data(self.request(Method::GET, "/auth/me").send().await?).await
    }

    pub async fn update_profile(
        &self,
        id: Uuid,
        changes: &UpdateProfileRequest,
    ) -> ClientResult<UserProfile> {
        let response = self
            .request(Method::PUT, &format!("/users/{id}"))
            .json(changes)
            .send()
            .await?;
        data(response).await
    }

    async fn adopt_session(&mut self, response: Response) -> ClientResult<UserProfile> {
        let session: AuthSession = data(response).await?;
        self.auth_token = Some(session.session_id);
        Ok(session.user)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .http
            .request(method, format!("{}/api{path}", self.base_url));
        match &self.auth_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn cart_request(&self, method: Method, path: &str) -> RequestBuilder {
        self.request(method, path)
            .header(SESSION_ID_HEADER, &self.cart_session)
    }
}

async fn envelope<T: DeserializeOwned>(response: Response) -> ClientResult<ApiResponse<T>> {
    let response = error_for_status(response).await?;
    Ok(response.json::<ApiResponse<T>>().await?)
}

async fn data<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    envelope(response).await?.data.ok_or(ClientError::MissingData)
}

async fn no_content(response: Response) -> ClientResult<()> {
    error_for_status(response).await.map(|_| ())
}

async fn error_for_status(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = match response.json::<ApiResponse<serde_json::Value>>().await {
        Ok(body) => body.message,
        Err(_) => status.to_string(),
    };
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}
