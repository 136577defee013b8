//! # Seed Data Generator
//!
//! Populates the database with a small shoe catalog and stock levels for
//! local development.
//!
//! ## Usage
//! ```bash
//! # Seed the database `stride` reads (STRIDE_DB_PATH or the app data dir)
//! cargo run -p stride-db --bin seed
//!
//! # Specify database path
//! cargo run -p stride-db --bin seed -- --db ./data/stride.db
//! ```
//!
//! Products get ids 1..=N in catalog order. Stock cycles through a few
//! levels, including one product with zero stock so the out-of-stock path
//! is reachable from the CLI.

use std::env;
use std::path::PathBuf;

use stride_core::{Money, Product, ProductId};
use stride_db::{Database, DbConfig, DB_PATH_ENV};

/// (title, price in reais, image file)
const CATALOG: &[(&str, f64, &str)] = &[
    ("Tênis de Caminhada Leve Confortável", 179.90, "modulo-redux/tenis1.jpg"),
    ("Tênis VR Caminhada Confortável Detalhes Couro Masculino", 139.90, "modulo-redux/tenis2.jpg"),
    ("Tênis Adidas Duramo Lite 2.0", 219.90, "modulo-redux/tenis3.jpg"),
    ("Tênis Nike Revolution 5 Masculino", 199.90, "modulo-redux/tenis4.jpg"),
    ("Tênis Olympikus Corre 1 Feminino", 249.90, "modulo-redux/tenis5.jpg"),
    ("Tênis Mizuno Wave Prophecy 9", 899.90, "modulo-redux/tenis6.jpg"),
];

/// Stock levels, assigned round-robin.
const STOCK_LEVELS: &[i64] = &[3, 5, 2, 1, 5, 0];

const IMAGE_BASE: &str = "https://rocketseat-cdn.s3-sa-east-1.amazonaws.com";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path: Option<PathBuf> = env::var_os(DB_PATH_ENV).map(PathBuf::from);

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Stride Cart Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path");
                println!("  -h, --help         Show this help message");
                println!();
                println!("Without --db, seeds ${} if set, otherwise the same", DB_PATH_ENV);
                println!("app data file the `stride` CLI opens.");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let db_path = match db_path {
        Some(path) => path,
        None => {
            let path = DbConfig::default_path().ok_or("could not determine app data directory")?;
            if let Some(dir) = path.parent() {
                std::fs::create_dir_all(dir)?;
            }
            path
        }
    };

    println!("🌱 Stride Cart Seed Data Generator");
    println!("==================================");
    println!("Database: {}", db_path.display());
    println!();

    let db = Database::new(DbConfig::new(db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Seeding catalog...");

    let products = db.products();
    let stock = db.stock();

    for (idx, (title, price, image)) in CATALOG.iter().enumerate() {
        let product = Product {
            id: ProductId(idx as i64 + 1),
            title: title.to_string(),
            price_cents: Money::from_decimal(*price).cents(),
            image: format!("{}/{}", IMAGE_BASE, image),
        };
        let amount = STOCK_LEVELS[idx % STOCK_LEVELS.len()];

        products.upsert(&product).await?;
        stock.set(product.id, amount).await?;

        println!(
            "  #{:<2} {:<58} {:>10}  stock {}",
            product.id,
            product.title,
            product.price().format("R$"),
            amount
        );
    }

    println!();
    println!("✓ Seeded {} products", CATALOG.len());

    Ok(())
}
