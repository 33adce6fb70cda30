//! Fake data for local development.
//!
//! Seeded rows are recognisable afterwards: usernames start with
//! [`SEED_USERNAME_PREFIX`] and isbn13 values with [`SEED_ISBN_PREFIX`].
//! [`clear_all`] removes exactly those rows.

pub mod catalog;
pub mod models;
pub mod users;

use std::time::Instant;

use bookshelf_core::hash_password;
use sqlx::PgPool;

pub use models::{SEED_ISBN_PREFIX, SEED_PASSWORD, SEED_USERNAME_PREFIX, SeedConfig};

pub async fn seed_all(db: &PgPool, config: SeedConfig) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🌱 Seeding database...\n");

    let password_hash =
        hash_password(SEED_PASSWORD).map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let categories = catalog::seed_categories(db, config.categories).await?;
    let book_ids = catalog::seed_books(db, &categories, config.books_per_category).await?;
    let user_ids = users::seed_users(db, config.users, &password_hash).await?;
    users::seed_reads(db, &user_ids, &book_ids, config.reads_per_user).await?;

    println!("\n✅ Seeding complete in {:?}", start_time.elapsed());
    println!("   Seeded users log in with password: {}", SEED_PASSWORD);

    Ok(())
}

pub async fn clear_all(db: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🧹 Clearing seeded data...\n");

    users::clear_users(db).await?;
    catalog::clear_catalog(db).await?;

    println!("\n✅ Cleared seeded data in {:?}", start_time.elapsed());

    Ok(())
}
