//! # stride-db: Database Layer for Stride Cart
//!
//! SQLite-backed catalog, stock and cart snapshot storage, using sqlx for
//! async operations. Each repository implements one stride-core port, so a
//! `CartManager` can run entirely on a local database.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stride Cart Data Flow                            │
//! │                                                                         │
//! │  CartManager (stride-core)                                             │
//! │       │  StockOracle · ProductCatalog · DurableStore                   │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     stride-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐   ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │   │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │◄───│ ProductRepo    │   │ 001_initial  │  │   │
//! │  │   │  SqlitePool   │    │ StockRepo      │   │  _schema.sql │  │   │
//! │  │   │               │    │ CartRepo       │   │              │  │   │
//! │  │   └───────────────┘    └────────────────┘   └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (stride.db, WAL mode)                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stride_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("stride.db")).await?;
//! let deps = Collaborators {
//!     stock: Arc::new(db.stock()),
//!     catalog: Arc::new(db.products()),
//!     store: Arc::new(db.carts(DEFAULT_CART_KEY)),
//!     notifier,
//! };
//! let cart = CartManager::load(deps).await;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig, DB_PATH_ENV};

pub use repository::cart::CartRepository;
pub use repository::product::ProductRepository;
pub use repository::stock::StockRepository;
