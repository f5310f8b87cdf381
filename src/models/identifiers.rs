use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! impl_id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

impl_id_type!(
    /// Playable resource reference (URI or path); also the progress ledger key
    MediaRef
);
impl_id_type!(SessionId);

impl SessionId {
    /// Fresh random id for a newly opened playback session
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_id_type {
        ($module:ident, $name:ty) => {
            mod $module {
                use super::*;

                #[test]
                fn creation_and_display() {
                    let id = <$name>::new("test_id");
                    assert_eq!(id.as_str(), "test_id");
                    assert_eq!(id.to_string(), "test_id");
                }

                #[test]
                fn converts_from_str_and_string() {
                    assert_eq!(<$name>::from("test_id"), <$name>::new("test_id"));
                    assert_eq!(<$name>::from(String::from("test_id")).as_str(), "test_id");
                }

                #[test]
                fn equality_and_hashing() {
                    use std::collections::HashSet;

                    let mut set = HashSet::new();
                    set.insert(<$name>::new("test_id"));
                    assert!(set.contains(&<$name>::new("test_id")));
                    assert!(!set.contains(&<$name>::new("other_id")));
                }

                #[test]
                fn serializes_as_plain_string() {
                    let id = <$name>::new("test_id");
                    let json = serde_json::to_string(&id).unwrap();
                    assert_eq!(json, "\"test_id\"");

                    let deserialized: $name = serde_json::from_str(&json).unwrap();
                    assert_eq!(deserialized, id);
                }
            }
        };
    }

    test_id_type!(media_ref, MediaRef);
    test_id_type!(session_id, SessionId);

    #[test]
    fn generated_session_ids_are_unique() {
        assert_ne!(SessionId::generate(), SessionId::generate());
    }
}
