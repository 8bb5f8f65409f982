//! Identifiers

use std::{
    fmt::{Debug, Display, Formatter, Result as FmtResult},
    marker::PhantomData,
};

use uuid::Uuid;

/// A UUID tagged with the type it identifies, so an order id can't be passed
/// where some other id is expected.
pub struct TypedUuid<T>(Uuid, PhantomData<T>);

impl<T> TypedUuid<T> {
    /// Generate a fresh, time-ordered (v7) id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7(), PhantomData)
    }

    /// The plain UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

// Derives would put bounds on `T`, which is only a marker.
impl<T> Clone for TypedUuid<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TypedUuid<T> {}

impl<T> PartialEq for TypedUuid<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T> Debug for TypedUuid<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "TypedUuid({})", self.0)
    }
}

impl<T> Display for TypedUuid<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

/// Product identifier.
///
/// Catalog ids are free-form strings (`"laptop"`, a SKU, ...); when none is
/// supplied one is generated from a v7 UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProductId(String);

impl ProductId {
    /// Generate a fresh, unique product id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ProductId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Marker;

    #[test]
    fn generated_product_ids_are_unique() {
        let a = ProductId::generate();
        let b = ProductId::generate();

        assert_ne!(a, b, "two generated ids should differ");
        assert!(!a.as_str().is_empty(), "generated id should not be empty");
    }

    #[test]
    fn supplied_product_id_is_kept_verbatim() {
        let id = ProductId::from("laptop");

        assert_eq!(id.as_str(), "laptop");
        assert_eq!(id.to_string(), "laptop");
    }

    #[test]
    fn typed_uuid_displays_as_the_plain_uuid() {
        let typed = TypedUuid::<Marker>::generate();

        assert_eq!(typed.to_string(), typed.as_uuid().to_string());
        assert_ne!(typed, TypedUuid::<Marker>::generate());
    }

    #[test]
    fn generated_typed_uuids_are_version_7() {
        let typed = TypedUuid::<Marker>::generate();

        assert_eq!(typed.as_uuid().get_version_num(), 7);
    }
}
