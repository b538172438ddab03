//! In-memory repository for the catalog, carts and accounts.
//!
//! All tables sit behind a single lock, so each operation (including the
//! read-modify-write ones such as [`MemStorage::add_to_cart`]) is atomic with
//! respect to concurrent requests. Uniqueness of usernames, emails and
//! category names is checked under the same write guard as the insert.
//! Nothing is persisted; a restart reseeds.

use std::{collections::HashMap, sync::Arc};

use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    clock::Clock,
    models::{
        CartItem, CartItemWithProduct, Category, NewCartItem, NewCategory, NewProduct, NewUser,
        Product, User, UserChanges,
    },
};

#[derive(Default)]
struct Tables {
    categories: Vec<Category>,
    products: Vec<Product>,
    cart_items: Vec<CartItem>,
    users: HashMap<Uuid, User>,
}

impl Tables {
    fn email_taken(&self, email: &str, except: Option<Uuid>) -> bool {
        self.users
            .values()
            .any(|u| Some(u.id) != except && u.email.eq_ignore_ascii_case(email))
    }

    fn username_taken(&self, username: &str) -> bool {
        self.users.values().any(|u| {
            u.username
                .as_deref()
                .is_some_and(|name| name.eq_ignore_ascii_case(username))
        })
    }
}

/// A write that would break a uniqueness rule.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Conflict {
    #[error("Email is already taken")]
    Email,
    #[error("Username is already taken")]
    Username,
    #[error("Category already exists")]
    CategoryName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreCounts {
    pub users: usize,
    pub products: usize,
    pub categories: usize,
    pub cart_items: usize,
}

pub struct MemStorage {
    tables: RwLock<Tables>,
    clock: Arc<dyn Clock>,
}

impl MemStorage {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            clock,
        }
    }

    // Categories

    pub async fn get_categories(&self) -> Vec<Category> {
        let tables = self.tables.read().await;
        tables
            .categories
            .iter()
            .map(|c| with_live_count(c, &tables.products))
            .collect()
    }

    pub async fn get_category_by_id(&self, id: Uuid) -> Option<Category> {
        let tables = self.tables.read().await;
        tables
            .categories
            .iter()
            .find(|c| c.id == id)
            .map(|c| with_live_count(c, &tables.products))
    }

    /// Category names are unique, compared case-insensitively.
    pub async fn create_category(&self, new: NewCategory) -> Result<Category, Conflict> {
        let mut tables = self.tables.write().await;
        if tables
            .categories
            .iter()
            .any(|c| c.name.eq_ignore_ascii_case(&new.name))
        {
            return Err(Conflict::CategoryName);
        }

        let category = Category {
            id: Uuid::new_v4(),
            name: new.name,
            icon: new.icon,
            product_count: 0,
        };
        tables.categories.push(category.clone());
        Ok(with_live_count(&category, &tables.products))
    }

    // Products

    pub async fn get_products(&self) -> Vec<Product> {
        self.tables.read().await.products.clone()
    }

    pub async fn get_products_by_category(&self, category: &str) -> Vec<Product> {
        let tables = self.tables.read().await;
        tables
            .products
            .iter()
            .filter(|p| in_category(p, category))
            .cloned()
            .collect()
    }

    pub async fn get_featured_products(&self) -> Vec<Product> {
        let tables = self.tables.read().await;
        tables.products.iter().filter(|p| p.featured).cloned().collect()
    }

    pub async fn search_products(&self, query: &str) -> Vec<Product> {
        let term = query.to_lowercase();
        let tables = self.tables.read().await;
        tables
            .products
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&term)
                    || p.description.to_lowercase().contains(&term)
                    || p.category.to_lowercase().contains(&term)
            })
            .cloned()
            .collect()
    }

    pub async fn get_product_by_id(&self, id: Uuid) -> Option<Product> {
        let tables = self.tables.read().await;
        tables.products.iter().find(|p| p.id == id).cloned()
    }

    pub async fn create_product(&self, new: NewProduct) -> Product {
        let product = Product {
            id: Uuid::new_v4(),
            name: new.name,
            description: new.description,
            price: new.price,
            original_price: new.original_price,
            image: new.image,
            category: new.category,
            rating: new.rating,
            in_stock: new.in_stock.unwrap_or(true),
            featured: new.featured.unwrap_or(false),
            discount: new.discount.unwrap_or(0),
            badge: new.badge,
        };
        self.tables.write().await.products.push(product.clone());
        product
    }

    /// Removes a product from the catalog. Cart rows pointing at it are kept
    /// but no longer surface through [`MemStorage::get_cart_items`].
    pub async fn delete_product(&self, id: Uuid) -> bool {
        let mut tables = self.tables.write().await;
        let before = tables.products.len();
        tables.products.retain(|p| p.id != id);
        tables.products.len() != before
    }

    // Cart

    pub async fn get_cart_items(&self, session_id: &str) -> Vec<CartItemWithProduct> {
        let tables = self.tables.read().await;
        tables
            .cart_items
            .iter()
            .filter(|item| item.session_id == session_id)
            .filter_map(|item| {
                let product = tables.products.iter().find(|p| p.id == item.product_id)?;
                Some(CartItemWithProduct {
                    item: item.clone(),
                    product: product.clone(),
                })
            })
            .collect()
    }

    /// Adds to the session's line for the product, creating it if needed.
    /// Repeated adds accumulate quantity.
    pub async fn add_to_cart(&self, new: NewCartItem) -> CartItem {
        let mut tables = self.tables.write().await;
        if let Some(existing) = tables
            .cart_items
            .iter_mut()
            .find(|item| item.session_id == new.session_id && item.product_id == new.product_id)
        {
            existing.quantity = existing.quantity.saturating_add(new.quantity);
            return existing.clone();
        }

        let item = CartItem {
            id: Uuid::new_v4(),
            session_id: new.session_id,
            product_id: new.product_id,
            quantity: new.quantity,
            created_at: self.clock.now(),
        };
        tables.cart_items.push(item.clone());
        item
    }

    /// Sets the quantity of an existing line. A quantity of zero or less
    /// deletes the line. Returns `None` when the line was removed or never
    /// existed.
    pub async fn update_cart_item_quantity(
        &self,
        session_id: &str,
        product_id: Uuid,
        quantity: i32,
    ) -> Option<CartItem> {
        let mut tables = self.tables.write().await;
        let idx = tables
            .cart_items
            .iter()
            .position(|item| item.session_id == session_id && item.product_id == product_id)?;

        if quantity <= 0 {
            tables.cart_items.remove(idx);
            return None;
        }

        let item = &mut tables.cart_items[idx];
        item.quantity = quantity;
        Some(item.clone())
    }

    pub async fn remove_from_cart(&self, session_id: &str, product_id: Uuid) {
        self.tables
            .write()
            .await
            .cart_items
            .retain(|item| !(item.session_id == session_id && item.product_id == product_id));
    }

    pub async fn clear_cart(&self, session_id: &str) {
        self.tables
            .write()
            .await
            .cart_items
            .retain(|item| item.session_id != session_id);
    }

    // Users

    /// Inserts a user unless the email, or the username when one is given, is
    /// already registered (case-insensitively).
    pub async fn create_user(&self, new: NewUser) -> Result<User, Conflict> {
        let now = self.clock.now();
        let mut tables = self.tables.write().await;
        if tables.email_taken(&new.email, None) {
            return Err(Conflict::Email);
        }
        if new
            .username
            .as_deref()
            .is_some_and(|username| tables.username_taken(username))
        {
            return Err(Conflict::Username);
        }

        let user = User {
            id: Uuid::new_v4(),
            username: new.username,
            name: new.name,
            email: new.email,
            password_hash: new.password_hash,
            role: new.role.unwrap_or_default(),
            phone: new.phone,
            address: new.address,
            city: new.city,
            country: new.country,
            zip_code: new.zip_code,
            avatar: new.avatar,
            is_active: new.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    pub async fn get_user_by_id(&self, id: Uuid) -> Option<User> {
        self.tables.read().await.users.get(&id).cloned()
    }

    pub async fn get_user_by_username(&self, username: &str) -> Option<User> {
        let tables = self.tables.read().await;
        tables
            .users
            .values()
            .find(|u| {
                u.username
                    .as_deref()
                    .is_some_and(|name| name.eq_ignore_ascii_case(username))
            })
            .cloned()
    }

    pub async fn get_user_by_email(&self, email: &str) -> Option<User> {
        let tables = self.tables.read().await;
        tables
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned()
    }

    /// Applies the given changes and refreshes `updated_at`. `Ok(None)` means
    /// no such user; a new email that belongs to someone else is a conflict.
    pub async fn update_user(
        &self,
        id: Uuid,
        changes: UserChanges,
    ) -> Result<Option<User>, Conflict> {
        let now = self.clock.now();
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&id) {
            return Ok(None);
        }
        if changes
            .email
            .as_deref()
            .is_some_and(|email| tables.email_taken(email, Some(id)))
        {
            return Err(Conflict::Email);
        }
        let Some(user) = tables.users.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        if changes.phone.is_some() {
            user.phone = changes.phone;
        }
        if changes.address.is_some() {
            user.address = changes.address;
        }
        if changes.city.is_some() {
            user.city = changes.city;
        }
        if changes.country.is_some() {
            user.country = changes.country;
        }
        if changes.zip_code.is_some() {
            user.zip_code = changes.zip_code;
        }
        if changes.avatar.is_some() {
            user.avatar = changes.avatar;
        }
        if let Some(active) = changes.is_active {
            user.is_active = active;
        }
        user.updated_at = now;

        Ok(Some(user.clone()))
    }

    pub async fn counts(&self) -> StoreCounts {
        let tables = self.tables.read().await;
        StoreCounts {
            users: tables.users.len(),
            products: tables.products.len(),
            categories: tables.categories.len(),
            cart_items: tables.cart_items.len(),
        }
    }
}

fn in_category(product: &Product, category: &str) -> bool {
    product.category.to_lowercase() == category.to_lowercase()
}

fn with_live_count(category: &Category, products: &[Product]) -> Category {
    let product_count = products
        .iter()
        .filter(|p| in_category(p, &category.name))
        .count() as i64;
    Category {
        product_count,
        ..category.clone()
    }
}
