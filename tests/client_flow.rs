use storefront_api::{
    client::{ClientError, StorefrontClient},
    config::AppConfig,
    routes::{create_app, params::ProductQuery},
    state::AppState,
};
use tokio::net::TcpListener;

async fn serve() -> String {
    let state = AppState::seeded(&AppConfig::default())
        .await
        .expect("seed state");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, create_app(state)).await.expect("serve");
    });
    format!("http://{addr}")
}

fn search(term: &str) -> ProductQuery {
    ProductQuery {
        search: Some(term.to_string()),
        ..ProductQuery::default()
    }
}

#[tokio::test]
async fn shopping_through_the_client() {
    let base = serve().await;
    let mut client = StorefrontClient::new(&base);

    let categories = client.categories().await.unwrap();
    assert_eq!(categories.len(), 4);

    let macbook = client.products(&search("macbook")).await.unwrap().remove(0);
    assert_eq!(client.product(macbook.id).await.unwrap().name, macbook.name);

    let line = client.add_to_cart(macbook.id, 2).await.unwrap();
    assert_eq!(line.quantity, 2);
    assert_eq!(line.session_id, client.cart_session_id());

    let cart = client.cart().await.unwrap();
    assert_eq!(cart.len(), 1);
    assert_eq!(cart[0].product.id, macbook.id);

    let summary = client.cart_summary().await.unwrap();
    assert_eq!(summary.item_count, 2);
    assert_eq!(summary.subtotal.to_string(), "3998.00");
    assert_eq!(summary.tax.to_string(), "319.84");
    assert_eq!(summary.total.to_string(), "4317.84");

    assert!(client.update_quantity(macbook.id, 0).await.unwrap().is_none());
    assert_eq!(client.item_count().await.unwrap(), 0);

    let err = client.add_to_cart(macbook.id, 0).await.unwrap_err();
    assert_eq!(err.status(), Some(400));
}

#[tokio::test]
async fn cart_reads_are_cached_until_invalidated() {
    let base = serve().await;
    let mut first = StorefrontClient::with_cart_session(&base, "shared-cart");
    let mut second = StorefrontClient::with_cart_session(&base, "shared-cart");

    let sony = first.products(&search("sony")).await.unwrap().remove(0);
    let ps5 = first.products(&search("playstation")).await.unwrap().remove(0);

    first.add_to_cart(sony.id, 1).await.unwrap();
    assert_eq!(first.cart().await.unwrap().len(), 1);

    // Another writer on the same cart session is invisible to the cache.
    second.add_to_cart(ps5.id, 1).await.unwrap();
    assert_eq!(first.cart().await.unwrap().len(), 1);

    first.invalidate_cart();
    assert_eq!(first.cart().await.unwrap().len(), 2);

    // A mutation through the client refetches on the next read.
    second.add_to_cart(ps5.id, 3).await.unwrap();
    first.remove_from_cart(sony.id).await.unwrap();
    let cart = first.cart().await.unwrap();
    assert_eq!(cart.len(), 1);
    assert_eq!(cart[0].item.quantity, 4);

    first.clear_cart().await.unwrap();
    assert!(second.cart().await.unwrap().is_empty());
}

#[tokio::test]
async fn auth_session_through_the_client() {
    let base = serve().await;
    let mut client = StorefrontClient::new(&base);

    let err = client.me().await.unwrap_err();
    assert_eq!(err.status(), Some(401));

    let err = client.login("admin", "nope").await.unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 401, .. }));
    assert!(!client.is_authenticated());

    let admin = client.login("admin", "admin123").await.unwrap();
    assert!(client.is_authenticated());
    assert_eq!(client.me().await.unwrap().id, admin.id);

    let stale_token = client.auth_token().map(str::to_string);
    client.logout().await.unwrap();
    assert!(!client.is_authenticated());

    client.set_auth_token(stale_token);
    let err = client.me().await.unwrap_err();
    assert_eq!(err.status(), Some(401));
}
