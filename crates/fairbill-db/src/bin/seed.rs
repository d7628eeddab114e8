//! # Seed Data Loader
//!
//! Populates the catalog tables with the sample government price list.
//!
//! ## Usage
//! ```bash
//! # Seed ./fairbill_dev.db
//! cargo run -p fairbill-db --bin seed
//!
//! # Specify database path
//! cargo run -p fairbill-db --bin seed -- --db ./data/fairbill.db
//! ```
//!
//! Tables that already have rows are left alone.

use std::env;

use fairbill_core::{CurrencyFormat, ItemType};
use fairbill_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let mut db_path = "./fairbill_dev.db".to_string();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Fairbill Catalog Seeder");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./fairbill_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => {
                eprintln!("Ignoring unknown argument: {}", other);
            }
        }
        i += 1;
    }

    println!("Fairbill Catalog Seeder");
    println!("=======================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected, migrations applied");

    let (medicines, procedures) = db.catalog().seed_defaults().await?;
    if medicines == 0 && procedures == 0 {
        println!("⚠ Catalog already populated, nothing inserted");
    } else {
        println!("✓ Inserted {} medicines, {} procedures", medicines, procedures);
    }

    let format = CurrencyFormat::default();
    for item_type in [ItemType::Medicine, ItemType::Procedure] {
        println!();
        println!("{}:", item_type.table_name());
        for item in db.catalog().list(item_type).await? {
            println!(
                "  {:<28} {:>10} - {:<10}",
                item.name,
                format.format(item.govt_min_price),
                format.format(item.govt_max_price)
            );
        }
    }

    db.close().await;
    Ok(())
}
