//! Newtype IDs for type-safe entity references.
//!
//! Recipe and category IDs travel as URL path segments (`/recipe/{id}`,
//! `/category/{name}/{id}`), so every ID type also implements `FromStr`.

/// Define one or more type-safe ID wrappers around `i32`.
///
/// Each generated type gets:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `Ord`
/// - `new()` / `as_i32()` accessors and `From` conversions
/// - `Display` and `FromStr` (for path-segment parsing)
/// - `sqlx` Postgres support (with the `postgres` feature)
///
/// # Example
///
/// ```rust
/// # use spoonit_core::define_id;
/// define_id!(PantryId, JarId);
///
/// let pantry = PantryId::new(1);
/// let jar: JarId = "7".parse().unwrap();
///
/// // Different types, so this won't compile:
/// // let _: PantryId = jar;
/// ```
#[macro_export]
macro_rules! define_id {
    ($($name:ident),+ $(,)?) => {
        $(
            #[derive(
                Debug,
                Clone,
                Copy,
                PartialEq,
                Eq,
                PartialOrd,
                Ord,
                Hash,
                ::serde::Serialize,
                ::serde::Deserialize
            )]
            #[serde(transparent)]
            pub struct $name(i32);

            impl $name {
                /// Create an ID from a raw database value.
                #[must_use]
                pub const fn new(id: i32) -> Self {
                    Self(id)
                }

                /// The underlying i32 value.
                #[must_use]
                pub const fn as_i32(self) -> i32 {
                    self.0
                }
            }

            impl ::core::fmt::Display for $name {
                fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                    ::core::fmt::Display::fmt(&self.0, f)
                }
            }

            impl ::core::str::FromStr for $name {
                type Err = ::core::num::ParseIntError;

                fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                    s.parse::<i32>().map(Self)
                }
            }

            impl From<i32> for $name {
                fn from(id: i32) -> Self {
                    Self(id)
                }
            }

            impl From<$name> for i32 {
                fn from(id: $name) -> Self {
                    id.0
                }
            }

            #[cfg(feature = "postgres")]
            impl ::sqlx::Type<::sqlx::Postgres> for $name {
                fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                    <i32 as ::sqlx::Type<::sqlx::Postgres>>::type_info()
                }

                fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                    <i32 as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
                }
            }

            #[cfg(feature = "postgres")]
            impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
                fn decode(
                    value: ::sqlx::postgres::PgValueRef<'r>,
                ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
                    <i32 as ::sqlx::Decode<::sqlx::Postgres>>::decode(value).map(Self)
                }
            }

            #[cfg(feature = "postgres")]
            impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $name {
                fn encode_by_ref(
                    &self,
                    buf: &mut ::sqlx::postgres::PgArgumentBuffer,
                ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                    <i32 as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.0, buf)
                }
            }
        )+
    };
}

define_id!(UserId, RecipeId, CategoryId, ShoppingItemId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_from_path_segment() {
        let id: RecipeId = "42".parse().unwrap();
        assert_eq!(id, RecipeId::new(42));
        assert!("not-a-number".parse::<RecipeId>().is_err());
    }

    #[test]
    fn test_display_roundtrip() {
        let id = CategoryId::new(7);
        assert_eq!(id.to_string(), "7");
        assert_eq!(id.to_string().parse::<CategoryId>().unwrap(), id);
    }

    #[test]
    fn test_serde_transparent() {
        let id = UserId::new(3);
        assert_eq!(serde_json::to_string(&id).unwrap(), "3");
        let back: UserId = serde_json::from_str("3").unwrap();
        assert_eq!(back, id);
    }
}
