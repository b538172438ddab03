use rust_decimal::Decimal;

use crate::{
    config::AppConfig,
    models::{NewCategory, NewProduct, NewUser, Role},
    services::auth_service::hash_password,
    storage::MemStorage,
};

const IMAGE_PARAMS: &str = "?ixlib=rb-4.0.3&auto=format&fit=crop&w=800&h=600";

pub async fn seed_catalog(storage: &MemStorage) -> anyhow::Result<()> {
    let categories = [
        ("Laptops", "fas fa-laptop"),
        ("Smartphones", "fas fa-mobile-alt"),
        ("Audio", "fas fa-headphones"),
        ("Gaming", "fas fa-gamepad"),
    ];
    for (name, icon) in categories {
        storage
            .create_category(NewCategory {
                name: name.to_string(),
                icon: icon.to_string(),
            })
            .await?;
    }

    // (name, description, price cents, original price cents, photo, category, rating tenths, featured, discount, badge)
    let products = [
        (
            "MacBook Pro 14\" M2 Chip",
            "Supercharged by M2 Pro or M2 Max chip. Up to 22 hours of battery life.",
            199900,
            Some(234900),
            "photo-1496181133206-80ce9b88a853",
            "Laptops",
            48,
            true,
            15,
            Some("15% OFF"),
        ),
        (
            "iPhone 15 Pro Max",
            "Titanium. So strong. So light. So Pro. A17 Pro chip with advanced features.",
            119900,
            None,
            "photo-1556656793-08538906a9f8",
            "Smartphones",
            49,
            true,
            0,
            Some("NEW"),
        ),
        (
            "Sony WH-1000XM5",
            "Industry-leading noise cancellation with premium sound quality.",
            39900,
            Some(44900),
            "photo-1505740420928-5e560c06d30e",
            "Audio",
            47,
            true,
            11,
            None,
        ),
        (
            "PlayStation 5 Console",
            "Experience lightning-fast loading with an ultra-high speed SSD.",
            49900,
            None,
            "photo-1606144042614-b2417e99c4e3",
            "Gaming",
            48,
            true,
            0,
            Some("HOT"),
        ),
        (
            "Dell XPS 13 Plus",
            "Ultra-thin laptop with stunning 13.4-inch display and 12th Gen Intel processors.",
            129900,
            None,
            "photo-1588872657578-7efd1f1555ed",
            "Laptops",
            46,
            false,
            0,
            None,
        ),
        (
            "Samsung Galaxy S24 Ultra",
            "Most advanced Galaxy phone with S Pen and professional-grade cameras.",
            109900,
            None,
            "photo-1610945265064-0e34e5519bbf",
            "Smartphones",
            47,
            false,
            0,
            None,
        ),
    ];

    for (name, description, price, original, photo, category, rating, featured, discount, badge) in
        products
    {
        storage
            .create_product(NewProduct {
                name: name.to_string(),
                description: description.to_string(),
                price: Decimal::new(price, 2),
                original_price: original.map(|cents| Decimal::new(cents, 2)),
                image: format!("https://images.unsplash.com/{photo}{IMAGE_PARAMS}"),
                category: category.to_string(),
                rating: Decimal::new(rating, 1),
                in_stock: Some(true),
                featured: Some(featured),
                discount: Some(discount),
                badge: badge.map(str::to_string),
            })
            .await;
    }

    tracing::info!(
        categories = categories.len(),
        products = products.len(),
        "seeded catalog"
    );
    Ok(())
}

pub async fn ensure_admin(storage: &MemStorage, config: &AppConfig) -> anyhow::Result<()> {
    if storage
        .get_user_by_username(&config.admin_username)
        .await
        .is_some()
    {
        return Ok(());
    }

    let password_hash =
        hash_password(&config.admin_password).map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let admin = storage
        .create_user(NewUser {
            username: Some(config.admin_username.clone()),
            name: "Administrator".to_string(),
            email: config.admin_email.clone(),
            password_hash,
            role: Some(Role::Admin),
            ..NewUser::default()
        })
        .await?;

    tracing::info!(user_id = %admin.id, username = %config.admin_username, "ensured admin user");
    Ok(())
}
