//! Strongly-typed ID newtypes for domain entities.
//!
//! Every table uses a serial integer key. Wrapping them keeps a `BookId`
//! from being passed where a `UserId` is expected.
//!
//! ```ignore
//! fn get_user(id: UserId) { /* ... */ }
//!
//! get_user(UserId(1));    // OK
//! // get_user(BookId(1)); // Compile error! Type mismatch.
//! ```

use serde::{Deserialize, Serialize};
use sqlx::{
    Database, Decode, Encode, Type,
    postgres::{PgHasArrayType, PgTypeInfo},
};
use std::fmt;
use utoipa::ToSchema;

/// Generates a newtype around `i32` with the database, serde and OpenAPI
/// impls an entity key needs.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
        #[serde(transparent)]
        #[schema(value_type = i32)]
        pub struct $name(pub i32);

        impl $name {
            #[inline]
            pub const fn into_inner(self) -> i32 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $name {
            #[inline]
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            #[inline]
            fn from(id: $name) -> i32 {
                id.0
            }
        }

        impl Type<sqlx::Postgres> for $name {
            fn type_info() -> PgTypeInfo {
                <i32 as Type<sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &PgTypeInfo) -> bool {
                <i32 as Type<sqlx::Postgres>>::compatible(ty)
            }
        }

        impl<'q> Encode<'q, sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut <sqlx::Postgres as Database>::ArgumentBuffer<'q>,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <i32 as Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }

        impl<'r> Decode<'r, sqlx::Postgres> for $name {
            fn decode(
                value: <sqlx::Postgres as Database>::ValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                <i32 as Decode<'r, sqlx::Postgres>>::decode(value).map(Self)
            }
        }

        impl PgHasArrayType for $name {
            fn array_type_info() -> PgTypeInfo {
                <i32 as PgHasArrayType>::array_type_info()
            }
        }
    };
}

define_id!(
    /// Key of a registered user.
    UserId
);

define_id!(
    /// Key of a catalogue book.
    BookId
);

define_id!(
    /// Key of a reading-log entry.
    ReadingEntryId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_plain_number() {
        assert_eq!(serde_json::to_string(&UserId(7)).unwrap(), "7");
        assert_eq!(serde_json::from_str::<BookId>("12").unwrap(), BookId(12));
    }

    #[test]
    fn test_display_and_debug() {
        assert_eq!(ReadingEntryId(3).to_string(), "3");
        assert_eq!(format!("{:?}", BookId(3)), "BookId(3)");
    }
}
