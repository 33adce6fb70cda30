//! Seed rows and seeding configuration.

use bookshelf_models::{BookId, UserId};

/// Seeded usernames start with this, so `clear-seed` can find them.
pub const SEED_USERNAME_PREFIX: &str = "seed_";

/// Seeded books get isbn13 values under this prefix, which no real ISBN uses.
pub const SEED_ISBN_PREFIX: &str = "999";

/// Password every seeded user can log in with.
pub const SEED_PASSWORD: &str = "password123";

pub const SEED_CATEGORIES: &[&str] = &[
    "Fantasy",
    "Science Fiction",
    "Mystery",
    "Thriller",
    "Romance",
    "Horror",
    "History",
    "Biography",
    "Poetry",
    "Philosophy",
    "Travel",
    "Cooking",
];

pub struct BookSeed {
    pub title: String,
    pub author: String,
    pub description: String,
    pub isbn13: String,
    pub published: String,
    pub pagecount: i32,
    pub language: String,
    pub category: String,
}

pub struct UserSeed {
    pub username: String,
    pub name: String,
    pub password_hash: String,
}

pub struct ReadSeed {
    pub user_id: UserId,
    pub book_id: BookId,
    pub rating: i32,
    pub review: Option<String>,
}

#[derive(Clone)]
pub struct SeedConfig {
    /// Taken from the front of [`SEED_CATEGORIES`].
    pub categories: usize,
    pub books_per_category: usize,
    pub users: usize,
    pub reads_per_user: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            categories: 6,
            books_per_category: 20,
            users: 25,
            reads_per_user: 8,
        }
    }
}

impl SeedConfig {
    pub fn with_categories(mut self, categories: usize) -> Self {
        self.categories = categories.min(SEED_CATEGORIES.len());
        self
    }

    pub fn with_books_per_category(mut self, books: usize) -> Self {
        self.books_per_category = books;
        self
    }

    pub fn with_users(mut self, users: usize) -> Self {
        self.users = users;
        self
    }

    pub fn with_reads_per_user(mut self, reads: usize) -> Self {
        self.reads_per_user = reads;
        self
    }
}
