//! Category and book seeding.

use fake::Fake;
use fake::faker::lorem::en::{Paragraph, Words};
use fake::faker::name::en::Name;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;

use bookshelf_models::BookId;

use super::models::{BookSeed, SEED_CATEGORIES, SEED_ISBN_PREFIX};

/// Inserts the first `count` seed categories, skipping any that exist.
pub async fn seed_categories(
    db: &PgPool,
    count: usize,
) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let names: Vec<String> = SEED_CATEGORIES
        .iter()
        .take(count)
        .map(|name| name.to_string())
        .collect();

    println!("🏷️  Seeding {} categories...", names.len());

    sqlx::query("INSERT INTO categories (id) SELECT * FROM UNNEST($1::text[]) ON CONFLICT DO NOTHING")
        .bind(&names)
        .execute(db)
        .await?;

    Ok(names)
}

/// Generates books for every category in parallel using Rayon.
///
/// Isbn13 values are `999` followed by the zero-padded book index, so they
/// are unique within one run.
pub fn generate_books(categories: &[String], per_category: usize) -> Vec<BookSeed> {
    categories
        .par_iter()
        .enumerate()
        .flat_map(|(category_idx, category)| {
            (0..per_category)
                .map(|book_idx| {
                    let index = category_idx * per_category + book_idx;
                    let words: Vec<String> = Words(2..5).fake();

                    BookSeed {
                        title: format!("{} {}", title_case(&words), index + 1),
                        author: Name().fake(),
                        description: Paragraph(1..3).fake(),
                        isbn13: format!("{}{:010}", SEED_ISBN_PREFIX, index),
                        published: (1900..2025).fake::<i32>().to_string(),
                        pagecount: (60..1200).fake(),
                        language: "en".to_string(),
                        category: category.clone(),
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

fn title_case(words: &[String]) -> String {
    words
        .iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

pub async fn seed_books(
    db: &PgPool,
    categories: &[String],
    per_category: usize,
) -> Result<Vec<BookId>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!(
        "📚 Seeding {} books ({} per category)...",
        categories.len() * per_category,
        per_category
    );

    let books = generate_books(categories, per_category);
    let ids = insert_books_batch(db, &books).await?;

    println!(
        "   ✓ Inserted {} books in {:?}",
        ids.len(),
        start_time.elapsed()
    );

    Ok(ids)
}

/// Inserts books in batches. Titles that already exist are skipped.
pub async fn insert_books_batch(
    db: &PgPool,
    books: &[BookSeed],
) -> Result<Vec<BookId>, Box<dyn std::error::Error>> {
    let mut tx = db.begin().await?;

    // 8 params per book
    const BATCH_SIZE: usize = 1000;

    let mut ids = Vec::with_capacity(books.len());
    for chunk in books.chunks(BATCH_SIZE) {
        ids.extend(insert_books_chunk(&mut tx, chunk).await?);
    }

    tx.commit().await?;
    Ok(ids)
}

async fn insert_books_chunk(
    tx: &mut Transaction<'_, Postgres>,
    books: &[BookSeed],
) -> Result<Vec<BookId>, Box<dyn std::error::Error>> {
    if books.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = String::from(
        "INSERT INTO books (title, author, description, isbn13, published, pagecount, language, category) VALUES ",
    );

    for i in 0..books.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let p = i * 8;
        query.push_str(&format!(
            "(${}, ${}, ${}, ${}, ${}, ${}, ${}, ${})",
            p + 1,
            p + 2,
            p + 3,
            p + 4,
            p + 5,
            p + 6,
            p + 7,
            p + 8
        ));
    }

    query.push_str(" ON CONFLICT (title) DO NOTHING RETURNING id");

    let mut q = sqlx::query_scalar(&query);
    for book in books {
        q = q
            .bind(&book.title)
            .bind(&book.author)
            .bind(&book.description)
            .bind(&book.isbn13)
            .bind(&book.published)
            .bind(book.pagecount)
            .bind(&book.language)
            .bind(&book.category);
    }

    let ids: Vec<BookId> = q.fetch_all(&mut **tx).await?;
    Ok(ids)
}

/// Deletes seeded books and then every seed category left without books.
pub async fn clear_catalog(db: &PgPool) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded books...");

    let pattern = format!("{}%", SEED_ISBN_PREFIX);

    sqlx::query(
        "DELETE FROM books_read WHERE book_id IN (SELECT id FROM books WHERE isbn13 LIKE $1)",
    )
    .bind(&pattern)
    .execute(db)
    .await?;

    let deleted = sqlx::query("DELETE FROM books WHERE isbn13 LIKE $1")
        .bind(&pattern)
        .execute(db)
        .await?
        .rows_affected();

    let names: Vec<String> = SEED_CATEGORIES.iter().map(|c| c.to_string()).collect();
    sqlx::query(
        "DELETE FROM categories c WHERE c.id = ANY($1)
         AND NOT EXISTS (SELECT 1 FROM books b WHERE b.category = c.id)",
    )
    .bind(&names)
    .execute(db)
    .await?;

    println!(
        "   ✓ Deleted {} books in {:?}",
        deleted,
        start_time.elapsed()
    );

    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_books_have_unique_titles_and_isbns() {
        let categories = vec!["Fantasy".to_string(), "Poetry".to_string()];

        let books = generate_books(&categories, 30);

        let mut titles: Vec<_> = books.iter().map(|b| b.title.clone()).collect();
        titles.sort();
        titles.dedup();
        assert_eq!(titles.len(), 60);

        for book in &books {
            assert_eq!(book.isbn13.len(), 13);
            assert!(book.isbn13.starts_with(SEED_ISBN_PREFIX));
            assert!(book.isbn13.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_title_case() {
        assert_eq!(
            title_case(&["dolor".to_string(), "sit".to_string()]),
            "Dolor Sit"
        );
    }
}
