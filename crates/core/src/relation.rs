//! Eager-loaded relation wrapper.
//!
//! A quest's duration, patron, pack, location and XP rewards may or may not
//! have been fetched alongside it. [`Loaded`] keeps "not requested" apart
//! from "requested and empty": a to-one relation is `Loaded<Option<T>>`, so
//! `Loaded(None)` means the foreign key is null while `NotLoaded` means
//! nobody looked.

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Loaded<T> {
    #[default]
    NotLoaded,
    Loaded(T),
}

impl<T> Loaded<T> {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Loaded::Loaded(_))
    }

    /// Used as a serde `skip_serializing_if` predicate.
    pub fn is_not_loaded(&self) -> bool {
        !self.is_loaded()
    }

    pub fn as_loaded(&self) -> Option<&T> {
        match self {
            Loaded::Loaded(value) => Some(value),
            Loaded::NotLoaded => None,
        }
    }

    pub fn as_ref(&self) -> Loaded<&T> {
        match self {
            Loaded::Loaded(value) => Loaded::Loaded(value),
            Loaded::NotLoaded => Loaded::NotLoaded,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Loaded<U> {
        match self {
            Loaded::Loaded(value) => Loaded::Loaded(f(value)),
            Loaded::NotLoaded => Loaded::NotLoaded,
        }
    }
}

impl<T> Loaded<Option<T>> {
    /// The related record, if it was loaded and the reference is set.
    pub fn present(&self) -> Option<&T> {
        self.as_loaded().and_then(Option::as_ref)
    }
}

impl<T: Serialize> Serialize for Loaded<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Loaded::Loaded(value) => value.serialize(serializer),
            Loaded::NotLoaded => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Holder {
        #[serde(skip_serializing_if = "Loaded::is_not_loaded")]
        patron: Loaded<Option<&'static str>>,
    }

    #[test]
    fn not_loaded_is_omitted() {
        let json = serde_json::to_value(Holder {
            patron: Loaded::NotLoaded,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({}));
    }

    #[test]
    fn loaded_empty_serializes_as_null() {
        let json = serde_json::to_value(Holder {
            patron: Loaded::Loaded(None),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "patron": null }));
    }

    #[test]
    fn loaded_value_serializes_inline() {
        let json = serde_json::to_value(Holder {
            patron: Loaded::Loaded(Some("The Coin Lords")),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "patron": "The Coin Lords" }));
    }

    #[test]
    fn present_requires_loaded_and_set() {
        assert_eq!(Loaded::<Option<i32>>::NotLoaded.present(), None);
        assert_eq!(Loaded::Loaded(None::<i32>).present(), None);
        assert_eq!(Loaded::Loaded(Some(3)).present(), Some(&3));
    }
}
