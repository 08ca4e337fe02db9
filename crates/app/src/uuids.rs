//! Typed Uuids
//!
//! Entity ids are tagged with the record type they identify, so a product id
//! cannot be handed to a query expecting a cart item id. The tag is erased at
//! the storage boundary: repositories bind and read plain [`Uuid`]s.

use std::{cmp::Ordering, fmt, marker::PhantomData, str::FromStr};

use uuid::Uuid;

pub struct TypedUuid<T> {
    uuid: Uuid,
    record: PhantomData<fn() -> T>,
}

impl<T> TypedUuid<T> {
    /// Generates a fresh, time-ordered (v7) id.
    #[must_use]
    pub fn new() -> Self {
        Self::from_uuid(Uuid::now_v7())
    }

    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self {
            uuid,
            record: PhantomData,
        }
    }

    #[must_use]
    pub const fn into_uuid(self) -> Uuid {
        self.uuid
    }
}

impl<T> Default for TypedUuid<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for TypedUuid<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TypedUuid<T> {}

impl<T> PartialEq for TypedUuid<T> {
    fn eq(&self, other: &Self) -> bool {
        self.uuid == other.uuid
    }
}

impl<T> Eq for TypedUuid<T> {}

impl<T> PartialOrd for TypedUuid<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for TypedUuid<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.uuid.cmp(&other.uuid)
    }
}

impl<T> fmt::Debug for TypedUuid<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.uuid, f)
    }
}

impl<T> fmt::Display for TypedUuid<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.uuid, f)
    }
}

/// Parses the usual hyphenated or simple textual forms, e.g. from CLI flags.
impl<T> FromStr for TypedUuid<T> {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self::from_uuid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Widget;

    #[test]
    fn new_ids_sort_in_creation_order() {
        let first = TypedUuid::<Widget>::new();
        let second = TypedUuid::<Widget>::new();

        assert!(first < second);
        assert_ne!(first, second);
    }

    #[test]
    fn parses_and_displays_the_plain_uuid() -> Result<(), uuid::Error> {
        let id: TypedUuid<Widget> = "0190b7c4-8a1e-7d3c-9f00-00000000ab0c".parse()?;

        assert_eq!(id.to_string(), "0190b7c4-8a1e-7d3c-9f00-00000000ab0c");
        assert_eq!(id.into_uuid().get_version_num(), 7);

        Ok(())
    }
}
