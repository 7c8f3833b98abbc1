use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Number of bytes in the binary storage form of an identifier.
pub const ID_BYTES: usize = 16;

/// Errors produced when converting identifiers from text or binary form.
#[derive(Debug, Error)]
pub enum IdentifierError {
    /// The text is not a valid UUID.
    #[error("Invalid identifier '{value}': {source}")]
    Malformed {
        value: String,
        #[source]
        source: uuid::Error,
    },

    /// The binary value does not have exactly 16 bytes.
    #[error("Invalid binary identifier length: expected 16 bytes, got {length}")]
    InvalidLength { length: usize },
}

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates an identifier from an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the underlying UUID.
            pub fn as_uuid(&self) -> Uuid {
                self.0
            }

            /// Parses the text form of an identifier.
            pub fn parse(value: &str) -> Result<Self, IdentifierError> {
                Uuid::parse_str(value)
                    .map(Self)
                    .map_err(|source| IdentifierError::Malformed {
                        value: value.to_string(),
                        source,
                    })
            }

            /// Decodes the 16-byte storage form.
            pub fn from_bytes(bytes: &[u8]) -> Result<Self, IdentifierError> {
                let bytes: [u8; ID_BYTES] = bytes
                    .try_into()
                    .map_err(|_| IdentifierError::InvalidLength {
                        length: bytes.len(),
                    })?;
                Ok(Self(Uuid::from_bytes(bytes)))
            }

            /// Encodes the identifier into its 16-byte storage form.
            pub fn to_bytes(&self) -> [u8; ID_BYTES] {
                *self.0.as_bytes()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0.hyphenated())
            }
        }

        impl std::str::FromStr for $name {
            type Err = IdentifierError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

identifier! {
    /// Identifier of an order aggregate.
    ///
    /// Always minted by the service on creation, never supplied by clients.
    OrderId
}

identifier! {
    /// Identifier of a catalog menu item referenced by an order line.
    MenuItemId
}

impl OrderId {
    /// Mints a new random order ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

    #[test]
    fn order_id_new_creates_unique_ids() {
        let id1 = OrderId::new();
        let id2 = OrderId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn parse_and_display_use_canonical_form() {
        let id = OrderId::parse(SAMPLE).unwrap();
        assert_eq!(id.to_string(), SAMPLE);

        let upper = MenuItemId::parse(&SAMPLE.to_uppercase()).unwrap();
        assert_eq!(upper.to_string(), SAMPLE);
    }

    #[test]
    fn parse_rejects_malformed_text() {
        let err = OrderId::parse("not-a-uuid").unwrap_err();
        assert!(matches!(err, IdentifierError::Malformed { ref value, .. } if value == "not-a-uuid"));

        assert!(OrderId::parse("").is_err());
        assert!("3fa85f64-5717-4562-b3fc".parse::<MenuItemId>().is_err());
    }

    #[test]
    fn binary_form_is_sixteen_bytes_in_uuid_order() {
        let id = MenuItemId::parse(SAMPLE).unwrap();
        let bytes = id.to_bytes();
        assert_eq!(bytes.len(), ID_BYTES);
        assert_eq!(bytes[0], 0x3f);
        assert_eq!(bytes[15], 0xa6);
        assert_eq!(MenuItemId::from_bytes(&bytes).unwrap(), id);
    }

    #[test]
    fn from_bytes_rejects_wrong_length() {
        let err = OrderId::from_bytes(&[0u8; 15]).unwrap_err();
        assert!(matches!(err, IdentifierError::InvalidLength { length: 15 }));

        assert!(OrderId::from_bytes(&[0u8; 17]).is_err());
        assert!(OrderId::from_bytes(&[]).is_err());
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = OrderId::parse(SAMPLE).unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{SAMPLE}\""));
    }
}
