pub mod auth;
pub mod books;
pub mod categories;
pub mod reading;
pub mod users;
