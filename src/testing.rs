//! In-memory store and avatar storage for exercising the HTTP layer without
//! PostgreSQL. Enabled for unit tests and by the `test-utils` feature.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use bookshelf_core::Window;
use bookshelf_core::file_storage::{AvatarImage, AvatarStorage, StorageError};
use bookshelf_core::hash_password;
use bookshelf_db::{BookStore, CategoryStore, ReadingStore, StoreError, UserStore};
use bookshelf_models::{
    Book, BookChanges, BookId, Category, NewBook, NewReadingEntry, NewUser, ReadingEntry,
    ReadingEntryId, ReadingHistoryItem, User, UserChanges, UserCredentials, UserId,
};

#[derive(Default)]
struct Tables {
    users: Vec<(User, String)>,
    categories: Vec<Category>,
    books: Vec<Book>,
    reads: Vec<ReadingEntry>,
}

/// Ids are assigned sequentially from 1, like `SERIAL` columns. Unique
/// constraints are enforced with the same names the migration uses.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

fn page<T: Clone>(rows: impl Iterator<Item = T>, window: Window) -> Vec<T> {
    rows.skip(window.offset as usize)
        .take(window.limit as usize)
        .collect()
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub async fn insert_user(&self, username: &str, password: &str) -> User {
        let password_hash = hash_password(password).expect("hash test password");
        self.create_user(NewUser {
            username: username.to_string(),
            password_hash,
            name: String::new(),
            img_path: None,
        })
        .await
        .expect("insert test user")
    }

    pub async fn insert_category(&self, name: &str) -> Category {
        self.create_category(name).await.expect("insert test category")
    }

    /// Creates the category too when it does not exist yet.
    pub async fn insert_book(&self, title: &str, category: &str) -> Book {
        if !self.category_exists(category).await.unwrap_or(false) {
            self.insert_category(category).await;
        }

        self.create_book(NewBook {
            title: title.to_string(),
            author: None,
            description: None,
            isbn10: None,
            isbn13: Some("9780441013593".to_string()),
            published: None,
            pagecount: None,
            language: None,
            category: category.to_string(),
        })
        .await
        .expect("insert test book")
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn username_exists(&self, username: &str) -> Result<bool, StoreError> {
        Ok(self.tables().users.iter().any(|(u, _)| u.username == username))
    }

    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables();
        if tables.users.iter().any(|(u, _)| u.username == user.username) {
            return Err(StoreError::Conflict("users_username_key".into()));
        }

        let created = User {
            id: UserId(tables.users.len() as i32 + 1),
            username: user.username,
            name: user.name,
            img_path: user.img_path,
        };
        tables.users.push((created.clone(), user.password_hash));
        Ok(created)
    }

    async fn find_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self
            .tables()
            .users
            .iter()
            .find(|(u, _)| u.id == id)
            .map(|(u, _)| u.clone()))
    }

    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<UserCredentials>, StoreError> {
        Ok(self
            .tables()
            .users
            .iter()
            .find(|(u, _)| u.username == username)
            .map(|(u, hash)| UserCredentials {
                id: u.id,
                username: u.username.clone(),
                password_hash: hash.clone(),
            }))
    }

    async fn list_users(&self, window: Window) -> Result<Vec<User>, StoreError> {
        Ok(page(self.tables().users.iter().map(|(u, _)| u.clone()), window))
    }

    async fn update_user(
        &self,
        id: UserId,
        changes: UserChanges,
    ) -> Result<Option<User>, StoreError> {
        let mut tables = self.tables();
        let Some((user, hash)) = tables.users.iter_mut().find(|(u, _)| u.id == id) else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(password_hash) = changes.password_hash {
            *hash = password_hash;
        }
        Ok(Some(user.clone()))
    }

    async fn set_avatar(&self, id: UserId, img_path: &str) -> Result<Option<User>, StoreError> {
        let mut tables = self.tables();
        Ok(tables
            .users
            .iter_mut()
            .find(|(u, _)| u.id == id)
            .map(|(user, _)| {
                user.img_path = Some(img_path.to_string());
                user.clone()
            }))
    }
}

#[async_trait]
impl CategoryStore for MemoryStore {
    async fn category_exists(&self, name: &str) -> Result<bool, StoreError> {
        Ok(self.tables().categories.iter().any(|c| c.id == name))
    }

    async fn create_category(&self, name: &str) -> Result<Category, StoreError> {
        let mut tables = self.tables();
        if tables.categories.iter().any(|c| c.id == name) {
            return Err(StoreError::Conflict("categories_pkey".into()));
        }

        let category = Category { id: name.to_string() };
        tables.categories.push(category.clone());
        Ok(category)
    }

    async fn list_categories(&self, window: Window) -> Result<Vec<Category>, StoreError> {
        let mut categories = self.tables().categories.clone();
        categories.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(page(categories.into_iter(), window))
    }
}

#[async_trait]
impl BookStore for MemoryStore {
    async fn title_taken(&self, title: &str, except: Option<BookId>) -> Result<bool, StoreError> {
        Ok(self
            .tables()
            .books
            .iter()
            .any(|b| b.title == title && Some(b.id) != except))
    }

    async fn create_book(&self, book: NewBook) -> Result<Book, StoreError> {
        let mut tables = self.tables();
        if tables.books.iter().any(|b| b.title == book.title) {
            return Err(StoreError::Conflict("books_title_key".into()));
        }

        let created = Book {
            id: BookId(tables.books.len() as i32 + 1),
            title: book.title,
            author: book.author,
            description: book.description,
            isbn10: book.isbn10,
            isbn13: book.isbn13,
            published: book.published,
            pagecount: book.pagecount,
            language: book.language,
            category: book.category,
        };
        tables.books.push(created.clone());
        Ok(created)
    }

    async fn find_book(&self, id: BookId) -> Result<Option<Book>, StoreError> {
        Ok(self.tables().books.iter().find(|b| b.id == id).cloned())
    }

    async fn list_books(&self, window: Window) -> Result<Vec<Book>, StoreError> {
        Ok(page(self.tables().books.iter().cloned(), window))
    }

    /// Every word of `query` has to occur in the title or description,
    /// ignoring case.
    async fn search_books(&self, query: &str, window: Window) -> Result<Vec<Book>, StoreError> {
        let terms: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();

        let tables = self.tables();
        let matches = tables.books.iter().filter(|b| {
            let text = format!(
                "{} {}",
                b.title.to_lowercase(),
                b.description.as_deref().unwrap_or_default().to_lowercase()
            );
            !terms.is_empty() && terms.iter().all(|t| text.contains(t.as_str()))
        });

        Ok(page(matches.cloned(), window))
    }

    async fn update_book(
        &self,
        id: BookId,
        changes: BookChanges,
    ) -> Result<Option<Book>, StoreError> {
        let mut tables = self.tables();

        if let Some(title) = changes.title.as_deref()
            && tables.books.iter().any(|b| b.title == title && b.id != id)
        {
            return Err(StoreError::Conflict("books_title_key".into()));
        }

        let Some(slot) = tables.books.iter_mut().find(|b| b.id == id) else {
            return Ok(None);
        };
        *slot = slot.clone().apply(changes);
        Ok(Some(slot.clone()))
    }
}

#[async_trait]
impl ReadingStore for MemoryStore {
    async fn has_read(&self, user_id: UserId, book_id: BookId) -> Result<bool, StoreError> {
        Ok(self
            .tables()
            .reads
            .iter()
            .any(|r| r.user_id == user_id && r.book_id == book_id))
    }

    async fn create_entry(&self, entry: NewReadingEntry) -> Result<ReadingEntry, StoreError> {
        let mut tables = self.tables();
        if tables
            .reads
            .iter()
            .any(|r| r.user_id == entry.user_id && r.book_id == entry.book_id)
        {
            return Err(StoreError::Conflict("books_read_user_book_key".into()));
        }

        let next_id = tables.reads.iter().map(|r| r.id.0).max().unwrap_or(0) + 1;
        let created = ReadingEntry {
            id: ReadingEntryId(next_id),
            user_id: entry.user_id,
            book_id: entry.book_id,
            rating: entry.rating,
            review: entry.review,
        };
        tables.reads.push(created.clone());
        Ok(created)
    }

    async fn list_history(
        &self,
        user_id: UserId,
        window: Window,
    ) -> Result<Vec<ReadingHistoryItem>, StoreError> {
        let tables = self.tables();
        let items = tables
            .reads
            .iter()
            .filter(|r| r.user_id == user_id)
            .filter_map(|r| {
                let book = tables.books.iter().find(|b| b.id == r.book_id)?;
                Some(ReadingHistoryItem {
                    id: r.id,
                    book_id: r.book_id,
                    title: book.title.clone(),
                    author: book.author.clone(),
                    rating: r.rating,
                    review: r.review.clone(),
                })
            });

        Ok(page(items, window))
    }

    async fn delete_entry(&self, user_id: UserId, id: ReadingEntryId) -> Result<bool, StoreError> {
        let mut tables = self.tables();
        let before = tables.reads.len();
        tables.reads.retain(|r| !(r.id == id && r.user_id == user_id));
        Ok(tables.reads.len() < before)
    }
}

/// Keeps uploads in memory and hands out `http://localhost/avatars/<n>.<ext>`.
pub struct MemoryAvatarStorage {
    uploads: Mutex<Vec<AvatarImage>>,
    max_bytes: usize,
    failing: bool,
}

impl Default for MemoryAvatarStorage {
    fn default() -> Self {
        Self::with_max_size(bookshelf_core::file_storage::DEFAULT_MAX_AVATAR_BYTES)
    }
}

impl MemoryAvatarStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_size(max_bytes: usize) -> Self {
        Self {
            uploads: Mutex::new(Vec::new()),
            max_bytes,
            failing: false,
        }
    }

    /// Every upload fails with an I/O error.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn upload_count(&self) -> usize {
        self.uploads
            .lock()
            .map(|uploads| uploads.len())
            .unwrap_or_default()
    }
}

#[async_trait]
impl AvatarStorage for MemoryAvatarStorage {
    async fn upload(&self, image: AvatarImage) -> Result<String, StorageError> {
        if self.failing {
            return Err(StorageError::Io(std::io::Error::other("disk unavailable")));
        }
        if image.bytes.is_empty() {
            return Err(StorageError::Empty);
        }
        if image.bytes.len() > self.max_bytes {
            return Err(StorageError::TooLarge {
                max_bytes: self.max_bytes,
            });
        }

        let mut uploads = self
            .uploads
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let extension = image.kind.extension();
        uploads.push(image);

        Ok(format!(
            "http://localhost/avatars/{}.{}",
            uploads.len(),
            extension
        ))
    }
}
