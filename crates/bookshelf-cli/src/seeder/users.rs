//! User and reading-log seeding.

use fake::Fake;
use fake::faker::internet::en::Username;
use fake::faker::lorem::en::Sentence;
use fake::faker::name::en::Name;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;

use bookshelf_models::{BookId, UserId};

use super::models::{ReadSeed, SEED_USERNAME_PREFIX, UserSeed};

/// Generates users in parallel. Usernames carry the seed prefix and the
/// index, so they are unique within one run.
pub fn generate_users(count: usize, password_hash: &str) -> Vec<UserSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let handle: String = Username().fake();
            UserSeed {
                username: format!("{}{}_{}", SEED_USERNAME_PREFIX, handle.to_lowercase(), idx),
                name: Name().fake(),
                password_hash: password_hash.to_string(),
            }
        })
        .collect()
}

/// Picks `per_user` distinct books for every user by striding through the
/// catalog from a per-user starting point.
pub fn generate_reads(user_ids: &[UserId], book_ids: &[BookId], per_user: usize) -> Vec<ReadSeed> {
    if book_ids.is_empty() {
        return Vec::new();
    }
    let per_user = per_user.min(book_ids.len());

    user_ids
        .par_iter()
        .enumerate()
        .flat_map(|(user_idx, &user_id)| {
            let start = user_idx * 7;
            (0..per_user)
                .map(|k| {
                    let with_review = k % 3 == 0;
                    ReadSeed {
                        user_id,
                        book_id: book_ids[(start + k) % book_ids.len()],
                        rating: (1..6).fake(),
                        review: with_review.then(|| Sentence(4..12).fake()),
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

pub async fn seed_users(
    db: &PgPool,
    count: usize,
    password_hash: &str,
) -> Result<Vec<UserId>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("👥 Seeding {} users...", count);

    let users = generate_users(count, password_hash);
    let ids = insert_users_batch(db, &users).await?;

    println!(
        "   ✓ Inserted {} users in {:?}",
        ids.len(),
        start_time.elapsed()
    );

    Ok(ids)
}

/// Inserts users in batches. Usernames that already exist are skipped.
pub async fn insert_users_batch(
    db: &PgPool,
    users: &[UserSeed],
) -> Result<Vec<UserId>, Box<dyn std::error::Error>> {
    let mut tx = db.begin().await?;

    // 3 params per user
    const BATCH_SIZE: usize = 2000;

    let mut ids = Vec::with_capacity(users.len());
    for chunk in users.chunks(BATCH_SIZE) {
        ids.extend(insert_users_chunk(&mut tx, chunk).await?);
    }

    tx.commit().await?;
    Ok(ids)
}

async fn insert_users_chunk(
    tx: &mut Transaction<'_, Postgres>,
    users: &[UserSeed],
) -> Result<Vec<UserId>, Box<dyn std::error::Error>> {
    if users.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = String::from("INSERT INTO users (username, name, password) VALUES ");
    for i in 0..users.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let p = i * 3;
        query.push_str(&format!("(${}, ${}, ${})", p + 1, p + 2, p + 3));
    }
    query.push_str(" ON CONFLICT (username) DO NOTHING RETURNING id");

    let mut q = sqlx::query_scalar(&query);
    for user in users {
        q = q
            .bind(&user.username)
            .bind(&user.name)
            .bind(&user.password_hash);
    }

    let ids: Vec<UserId> = q.fetch_all(&mut **tx).await?;
    Ok(ids)
}

pub async fn seed_reads(
    db: &PgPool,
    user_ids: &[UserId],
    book_ids: &[BookId],
    per_user: usize,
) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    let reads = generate_reads(user_ids, book_ids, per_user);
    println!("📖 Seeding {} reading-log entries...", reads.len());

    let mut tx = db.begin().await?;

    // 4 params per entry
    const BATCH_SIZE: usize = 2000;

    let mut inserted = 0;
    for chunk in reads.chunks(BATCH_SIZE) {
        inserted += insert_reads_chunk(&mut tx, chunk).await?;
    }

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} entries in {:?}",
        inserted,
        start_time.elapsed()
    );

    Ok(inserted)
}

async fn insert_reads_chunk(
    tx: &mut Transaction<'_, Postgres>,
    reads: &[ReadSeed],
) -> Result<u64, Box<dyn std::error::Error>> {
    if reads.is_empty() {
        return Ok(0);
    }

    let mut query = String::from("INSERT INTO books_read (user_id, book_id, rating, review) VALUES ");
    for i in 0..reads.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let p = i * 4;
        query.push_str(&format!(
            "(${}, ${}, ${}, ${})",
            p + 1,
            p + 2,
            p + 3,
            p + 4
        ));
    }
    query.push_str(" ON CONFLICT (user_id, book_id) DO NOTHING");

    let mut q = sqlx::query(&query);
    for read in reads {
        q = q
            .bind(read.user_id)
            .bind(read.book_id)
            .bind(read.rating)
            .bind(&read.review);
    }

    Ok(q.execute(&mut **tx).await?.rows_affected())
}

/// Deletes seeded users; their reading-log entries go with them.
pub async fn clear_users(db: &PgPool) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded users...");

    let deleted = sqlx::query("DELETE FROM users WHERE username LIKE $1")
        .bind(format!("{}%", SEED_USERNAME_PREFIX.replace('_', "\\_")))
        .execute(db)
        .await?
        .rows_affected();

    println!(
        "   ✓ Deleted {} users in {:?}",
        deleted,
        start_time.elapsed()
    );

    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_usernames_are_prefixed_and_unique() {
        let users = generate_users(50, "hash");

        let mut names: Vec<_> = users.iter().map(|u| u.username.clone()).collect();
        names.sort();
        names.dedup();

        assert_eq!(names.len(), 50);
        assert!(users.iter().all(|u| u.username.starts_with(SEED_USERNAME_PREFIX)));
        assert!(users.iter().all(|u| u.username.len() >= 3));
    }

    #[test]
    fn test_reads_do_not_repeat_a_book_per_user() {
        let users: Vec<UserId> = (1..=10).map(UserId).collect();
        let books: Vec<BookId> = (1..=5).map(BookId).collect();

        let reads = generate_reads(&users, &books, 8);

        assert_eq!(reads.len(), 50);
        for user in &users {
            let mut seen: Vec<_> = reads
                .iter()
                .filter(|r| r.user_id == *user)
                .map(|r| r.book_id)
                .collect();
            seen.sort();
            seen.dedup();
            assert_eq!(seen.len(), 5);
        }
        assert!(reads.iter().all(|r| (1..=5).contains(&r.rating)));
    }

    #[test]
    fn test_no_books_means_no_reads() {
        assert!(generate_reads(&[UserId(1)], &[], 3).is_empty());
    }
}
