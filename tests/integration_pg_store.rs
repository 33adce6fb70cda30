//! Runs the storage layer against a real PostgreSQL database.
//!
//! `#[sqlx::test]` creates a fresh database per test from `DATABASE_URL`,
//! so these are ignored by default: `cargo test -- --ignored`.

use bookshelf::bookshelf_core::Window;
use bookshelf::bookshelf_db::{BookStore, CategoryStore, PgStore, ReadingStore, StoreError, UserStore};
use bookshelf::bookshelf_models::{
    BookChanges, BookId, NewBook, NewReadingEntry, NewUser, UserChanges, UserId,
};
use sqlx::PgPool;

fn new_user(username: &str) -> NewUser {
    NewUser {
        username: username.to_string(),
        password_hash: "$2b$11$notarealhash".to_string(),
        name: String::new(),
        img_path: None,
    }
}

fn new_book(title: &str, description: &str) -> NewBook {
    NewBook {
        title: title.to_string(),
        author: Some("Test Author".to_string()),
        description: Some(description.to_string()),
        isbn10: None,
        isbn13: Some("9780441013593".to_string()),
        published: None,
        pagecount: Some(100),
        language: Some("en".to_string()),
        category: "Fantasy".to_string(),
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_duplicate_username_is_conflict(pool: PgPool) {
    let store = PgStore::new(pool);
    store.create_user(new_user("alice123")).await.unwrap();

    let err = store.create_user(new_user("alice123")).await.unwrap_err();

    assert!(matches!(err, StoreError::Conflict(ref c) if c == "users_username_key"));
    assert!(store.username_exists("alice123").await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_update_user_keeps_absent_columns(pool: PgPool) {
    let store = PgStore::new(pool);
    let user = store.create_user(new_user("alice123")).await.unwrap();

    let updated = store
        .update_user(
            user.id,
            UserChanges {
                name: Some("Alice".to_string()),
                password_hash: None,
            },
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.name, "Alice");
    let creds = store.find_credentials("alice123").await.unwrap().unwrap();
    assert_eq!(creds.password_hash, "$2b$11$notarealhash");
    assert!(
        store
            .update_user(UserId(999), UserChanges::default())
            .await
            .unwrap()
            .is_none()
    );
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_title_uniqueness_and_search(pool: PgPool) {
    let store = PgStore::new(pool);
    store.create_category("Fantasy").await.unwrap();
    let hobbit = store
        .create_book(new_book("The Hobbit", "A dragon guards its gold"))
        .await
        .unwrap();
    store
        .create_book(new_book("Emma", "A comedy of manners"))
        .await
        .unwrap();

    assert!(store.title_taken("The Hobbit", None).await.unwrap());
    assert!(!store.title_taken("The Hobbit", Some(hobbit.id)).await.unwrap());
    assert!(matches!(
        store.create_book(new_book("Emma", "again")).await,
        Err(StoreError::Conflict(_))
    ));

    let found = store.search_books("dragons", Window::default()).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, hobbit.id);

    let updated = store
        .update_book(
            hobbit.id,
            BookChanges {
                pagecount: Some(310),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.pagecount, Some(310));
    assert_eq!(updated.title, "The Hobbit");
    assert!(
        store
            .update_book(BookId(999), BookChanges::default())
            .await
            .unwrap()
            .is_none()
    );
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_reading_log_is_per_user(pool: PgPool) {
    let store = PgStore::new(pool);
    let alice = store.create_user(new_user("alice123")).await.unwrap();
    let bob = store.create_user(new_user("bob")).await.unwrap();
    store.create_category("Fantasy").await.unwrap();
    let book = store
        .create_book(new_book("The Hobbit", "There and back again"))
        .await
        .unwrap();

    let entry = store
        .create_entry(NewReadingEntry {
            user_id: alice.id,
            book_id: book.id,
            rating: 5,
            review: None,
        })
        .await
        .unwrap();

    assert!(store.has_read(alice.id, book.id).await.unwrap());
    assert!(matches!(
        store
            .create_entry(NewReadingEntry {
                user_id: alice.id,
                book_id: book.id,
                rating: 3,
                review: None,
            })
            .await,
        Err(StoreError::Conflict(_))
    ));

    let history = store.list_history(alice.id, Window::default()).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].title, "The Hobbit");

    assert!(!store.delete_entry(bob.id, entry.id).await.unwrap());
    assert!(store.delete_entry(alice.id, entry.id).await.unwrap());
    assert!(!store.has_read(alice.id, book.id).await.unwrap());
}
