use bookshelf_core::PaginationParams;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::ids::BookId;
use crate::validators::{validate_isbn13, validate_not_blank};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: BookId,
    #[schema(example = "Dune")]
    pub title: String,
    pub author: Option<String>,
    pub description: Option<String>,
    pub isbn10: Option<String>,
    #[schema(example = "9780441013593")]
    pub isbn13: Option<String>,
    pub published: Option<String>,
    pub pagecount: Option<i32>,
    #[schema(example = "en")]
    pub language: Option<String>,
    #[schema(example = "Science Fiction")]
    pub category: String,
}

/// A fully validated book ready for insertion.
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub author: Option<String>,
    pub description: Option<String>,
    pub isbn10: Option<String>,
    pub isbn13: Option<String>,
    pub published: Option<String>,
    pub pagecount: Option<i32>,
    pub language: Option<String>,
    pub category: String,
}

/// Partial book update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct BookChanges {
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub isbn10: Option<String>,
    pub isbn13: Option<String>,
    pub published: Option<String>,
    pub pagecount: Option<i32>,
    pub language: Option<String>,
    pub category: Option<String>,
}

impl Book {
    pub fn apply(mut self, changes: BookChanges) -> Self {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(category) = changes.category {
            self.category = category;
        }
        self.author = changes.author.or(self.author);
        self.description = changes.description.or(self.description);
        self.isbn10 = changes.isbn10.or(self.isbn10);
        self.isbn13 = changes.isbn13.or(self.isbn13);
        self.published = changes.published.or(self.published);
        self.pagecount = changes.pagecount.or(self.pagecount);
        self.language = changes.language.or(self.language);
        self
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookRequest {
    #[validate(
        required(message = "Title is required"),
        custom(function = "validate_not_blank")
    )]
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub isbn10: Option<String>,
    #[validate(
        required(message = "isbn13 is required"),
        custom(function = "validate_isbn13")
    )]
    pub isbn13: Option<String>,
    pub published: Option<String>,
    #[validate(range(min = 0, message = "pagecount has to be a number of 0 or more"))]
    pub pagecount: Option<i32>,
    #[validate(length(equal = 2, message = "language has to be exactly 2 characters"))]
    pub language: Option<String>,
    #[validate(
        required(message = "Category is required"),
        custom(function = "validate_not_blank")
    )]
    pub category: Option<String>,
}

impl CreateBookRequest {
    /// Call only after validation passed; required fields are then present.
    pub fn into_new_book(self) -> NewBook {
        NewBook {
            title: self.title.unwrap_or_default(),
            author: self.author,
            description: self.description,
            isbn10: self.isbn10,
            isbn13: self.isbn13,
            published: self.published,
            pagecount: self.pagecount,
            language: self.language,
            category: self.category.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateBookRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub isbn10: Option<String>,
    #[validate(custom(function = "validate_isbn13"))]
    pub isbn13: Option<String>,
    pub published: Option<String>,
    #[validate(range(min = 0, message = "pagecount has to be a number of 0 or more"))]
    pub pagecount: Option<i32>,
    #[validate(length(equal = 2, message = "language has to be exactly 2 characters"))]
    pub language: Option<String>,
    #[validate(custom(function = "validate_not_blank"))]
    pub category: Option<String>,
}

impl From<UpdateBookRequest> for BookChanges {
    fn from(dto: UpdateBookRequest) -> Self {
        Self {
            title: dto.title,
            author: dto.author,
            description: dto.description,
            isbn10: dto.isbn10,
            isbn13: dto.isbn13,
            published: dto.published,
            pagecount: dto.pagecount,
            language: dto.language,
            category: dto.category,
        }
    }
}

/// Query string of `GET /books`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookListQuery {
    /// Number of items to skip (integer >= 0, default: 0)
    pub offset: Option<String>,
    /// Maximum number of items to return (integer > 0, default: 10)
    pub limit: Option<String>,
    /// Full-text search over title and description
    pub search: Option<String>,
}

impl BookListQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            offset: self.offset.clone(),
            limit: self.limit.clone(),
        }
    }

    /// The search term, if one with content was given.
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookshelf_core::FieldErrors;
    use serde_json::json;

    fn failing_fields<T: Validate>(dto: &T) -> Vec<String> {
        FieldErrors::from_validation(dto.validate())
            .iter()
            .map(|e| e.field.clone())
            .collect()
    }

    #[test]
    fn test_create_requires_title_isbn13_and_category() {
        let dto: CreateBookRequest = serde_json::from_value(json!({})).unwrap();

        assert_eq!(failing_fields(&dto), vec!["category", "isbn13", "title"]);
    }

    #[test]
    fn test_create_rejects_short_isbn13() {
        let dto: CreateBookRequest = serde_json::from_value(json!({
            "title": "Dune",
            "isbn13": "978044101359",
            "category": "Science Fiction"
        }))
        .unwrap();

        let errors = FieldErrors::from_validation(dto.validate()).into_inner();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "isbn13");
        assert_eq!(errors[0].message, "isbn13 has to be exactly 13 digits");
    }

    #[test]
    fn test_create_checks_optional_metadata() {
        let dto: CreateBookRequest = serde_json::from_value(json!({
            "title": "Dune",
            "isbn13": "9780441013593",
            "category": "Science Fiction",
            "pagecount": -1,
            "language": "eng"
        }))
        .unwrap();

        assert_eq!(failing_fields(&dto), vec!["language", "pagecount"]);
    }

    #[test]
    fn test_update_only_validates_present_fields() {
        assert!(UpdateBookRequest::default().validate().is_ok());

        let dto = UpdateBookRequest {
            isbn13: Some("123".into()),
            ..Default::default()
        };
        assert_eq!(failing_fields(&dto), vec!["isbn13"]);
    }

    #[test]
    fn test_apply_keeps_absent_fields() {
        let book = Book {
            id: BookId(1),
            title: "Dune".into(),
            author: Some("Frank Herbert".into()),
            description: None,
            isbn10: None,
            isbn13: Some("9780441013593".into()),
            published: Some("1965".into()),
            pagecount: Some(412),
            language: Some("en".into()),
            category: "Science Fiction".into(),
        };

        let updated = book.clone().apply(BookChanges {
            pagecount: Some(604),
            ..Default::default()
        });

        assert_eq!(updated.pagecount, Some(604));
        assert_eq!(updated.title, book.title);
        assert_eq!(updated.author, book.author);
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let query = BookListQuery {
            search: Some("   ".into()),
            ..Default::default()
        };

        assert_eq!(query.search_term(), None);
    }
}
