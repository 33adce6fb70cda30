use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{BookId, ReadingEntryId, UserId};

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReadingEntry {
    pub id: ReadingEntryId,
    pub user_id: UserId,
    pub book_id: BookId,
    #[schema(minimum = 1, maximum = 5)]
    pub rating: i32,
    pub review: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewReadingEntry {
    pub user_id: UserId,
    pub book_id: BookId,
    pub rating: i32,
    pub review: Option<String>,
}

/// One line of a user's reading history, joined with the book it refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReadingHistoryItem {
    pub id: ReadingEntryId,
    pub book_id: BookId,
    pub title: String,
    pub author: Option<String>,
    pub rating: i32,
    pub review: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LogReadRequest {
    #[serde(rename = "bookId")]
    #[validate(
        required(message = "Book id is required"),
        range(min = 1, message = "Book id has to be a number bigger than 0")
    )]
    #[schema(example = 1)]
    pub book_id: Option<i32>,
    #[serde(alias = "bookRating")]
    #[validate(
        required(message = "Rating has to be a number between 1 and 5"),
        range(min = 1, max = 5, message = "Rating has to be a number between 1 and 5")
    )]
    #[schema(example = 5, minimum = 1, maximum = 5)]
    pub rating: Option<i32>,
    pub review: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rating_bounds_are_inclusive() {
        for (rating, ok) in [(0, false), (1, true), (5, true), (6, false)] {
            let dto: LogReadRequest =
                serde_json::from_value(json!({ "bookId": 1, "rating": rating })).unwrap();
            assert_eq!(dto.validate().is_ok(), ok, "rating {}", rating);
        }
    }

    #[test]
    fn test_accepts_book_rating_alias() {
        let dto: LogReadRequest =
            serde_json::from_value(json!({ "bookId": 3, "bookRating": 4, "review": "Great" }))
                .unwrap();

        assert_eq!(dto.rating, Some(4));
        assert_eq!(dto.book_id, Some(3));
    }

    #[test]
    fn test_history_item_field_names() {
        let item = ReadingHistoryItem {
            id: ReadingEntryId(1),
            book_id: BookId(2),
            title: "Dune".into(),
            author: None,
            rating: 5,
            review: None,
        };

        let json = serde_json::to_value(&item).unwrap();

        assert_eq!(json["bookId"], 2);
        assert_eq!(json["rating"], 5);
    }
}
