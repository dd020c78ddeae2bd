use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id!(
    /// Stable identifier of a published lesson.
    LessonId
);

string_id!(
    /// Stable identifier of an uploaded map asset.
    AssetId
);

string_id!(
    /// Owner reference carried by map assets; compared against the current user.
    UserId
);

#[cfg(test)]
mod tests {
    use super::{AssetId, UserId};

    #[test]
    fn ids_compare_by_value() {
        assert_eq!(AssetId::from("ma1"), AssetId::new("ma1".to_string()));
        assert_ne!(AssetId::from("ma1"), AssetId::from("ma2"));
        assert!(AssetId::from("ma1") < AssetId::from("ma2"));
    }

    #[test]
    fn serializes_as_bare_string() {
        let json = serde_json::to_string(&UserId::from("user_01")).unwrap();
        assert_eq!(json, "\"user_01\"");
        let back: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(back.as_str(), "user_01");
    }
}
