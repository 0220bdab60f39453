//! Store handle: pool lifecycle, schema creation, seed data.

use std::path::Path;
use std::str::FromStr;

use chrono::Utc;
use serde::Deserialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::instrument;

use crate::catalog::Catalog;
use crate::composer::Composer;
use crate::error::StoreResult;
use crate::orders::Orders;
use crate::users::Users;

/// Schema for the ordering system.
///
/// `CHECK (in_stock >= 0)` backs the stock invariant at the storage level;
/// topping rows cascade with their line item, line items with their order.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS user (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    email         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    first_name    TEXT NOT NULL,
    last_name     TEXT NOT NULL,
    is_admin      INTEGER NOT NULL DEFAULT 0,
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS ingredient (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    name       TEXT NOT NULL,
    in_stock   INTEGER NOT NULL CHECK (in_stock >= 0),
    is_topping INTEGER NOT NULL DEFAULT 0,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS product (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    price       INTEGER NOT NULL,
    description TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS product_ingredient (
    product_id    INTEGER NOT NULL REFERENCES product(id),
    ingredient_id INTEGER NOT NULL REFERENCES ingredient(id),
    amount        INTEGER NOT NULL CHECK (amount > 0),
    PRIMARY KEY (product_id, ingredient_id)
);

CREATE TABLE IF NOT EXISTS "order" (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id    INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
    status     INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS order_item (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    order_id   INTEGER NOT NULL REFERENCES "order"(id) ON DELETE CASCADE,
    product_id INTEGER NOT NULL REFERENCES product(id),
    amount     INTEGER NOT NULL CHECK (amount > 0),
    comment    TEXT,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS order_item_topping (
    order_item_id INTEGER NOT NULL REFERENCES order_item(id) ON DELETE CASCADE,
    ingredient_id INTEGER NOT NULL REFERENCES ingredient(id),
    amount        INTEGER NOT NULL CHECK (amount > 0),
    PRIMARY KEY (order_item_id, ingredient_id)
);
"#;

/// Bundled catalog seed data (ingredients, products, recipes).
const SEED_DATA: &str = include_str!("../assets/test_data.json");

#[derive(Debug, Deserialize)]
struct SeedIngredient {
    id: i64,
    name: String,
    in_stock: i64,
    is_topping: bool,
}

#[derive(Debug, Deserialize)]
struct SeedRecipeEntry {
    id: i64,
    amount: i64,
}

#[derive(Debug, Deserialize)]
struct SeedProduct {
    id: i64,
    name: String,
    price: i64,
    description: String,
    ingredients: Vec<SeedRecipeEntry>,
}

#[derive(Debug, Deserialize)]
struct SeedData {
    ingredients: Vec<SeedIngredient>,
    products: Vec<SeedProduct>,
}

/// Handle to the SQLite database.
///
/// Owns the connection pool; components borrow a cheap clone of the pool.
/// Open at process start, [`Store::close`] at the end — no global state.
#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Open (creating if missing) the database at `path`, apply the schema
    /// and seed the catalog on first use.
    #[instrument(skip(path), fields(path = %path.as_ref().display()), err)]
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        let store = Self { pool };
        store.initialize().await?;
        Ok(store)
    }

    /// Open a fresh in-memory database (tests, dry runs).
    ///
    /// Pinned to a single connection: every `sqlite::memory:` connection is
    /// its own database, so a larger pool would hand out empty databases.
    pub async fn open_in_memory() -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(sqlx::Error::from)?
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        let store = Self { pool };
        store.initialize().await?;
        Ok(store)
    }

    async fn initialize(&self) -> StoreResult<()> {
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
        self.seed_catalog_if_empty().await?;
        Ok(())
    }

    /// Populate ingredients, products and recipes from the bundled seed file
    /// if the catalog is empty. Idempotent across re-opens.
    async fn seed_catalog_if_empty(&self) -> StoreResult<()> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM ingredient")
            .fetch_one(&self.pool)
            .await?;
        if count > 0 {
            return Ok(());
        }

        let data: SeedData = serde_json::from_str(SEED_DATA)?;
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        for ingredient in &data.ingredients {
            sqlx::query(
                "INSERT INTO ingredient (id, name, in_stock, is_topping, updated_at) \
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(ingredient.id)
            .bind(&ingredient.name)
            .bind(ingredient.in_stock)
            .bind(ingredient.is_topping)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        for product in &data.products {
            sqlx::query(
                "INSERT INTO product (id, name, price, description, updated_at) \
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(product.id)
            .bind(&product.name)
            .bind(product.price)
            .bind(&product.description)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            for entry in &product.ingredients {
                sqlx::query(
                    "INSERT INTO product_ingredient (product_id, ingredient_id, amount) \
                     VALUES (?, ?, ?)",
                )
                .bind(product.id)
                .bind(entry.id)
                .bind(entry.amount)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        tracing::info!(
            ingredients = data.ingredients.len(),
            products = data.products.len(),
            "seeded catalog"
        );
        Ok(())
    }

    /// Read access to products, ingredients and recipes.
    pub fn catalog(&self) -> Catalog {
        Catalog::new(self.pool.clone())
    }

    /// The order aggregate: open-order lifecycle and line-item operations.
    pub fn orders(&self) -> Orders {
        Orders::new(self.pool.clone())
    }

    /// User lookup and mutation (auth collaborator).
    pub fn users(&self) -> Users {
        Users::new(self.pool.clone())
    }

    /// The order composition engine.
    pub fn composer(&self) -> Composer {
        Composer::new(self.pool.clone())
    }

    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the pool, releasing the database file.
    pub async fn close(self) {
        self.pool.close().await;
    }
}
