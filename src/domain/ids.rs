//! Identifiers for catalog records.
//!
//! IDs look like `B-7QX2K` (books) or `M-04ZTA` (members): a fixed prefix, a
//! dash, then five random uppercase-alphanumeric characters. Collisions are
//! not checked.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

const ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const SUFFIX_LEN: usize = 5;

/// Draw a random suffix, using the v4 UUID bytes as the entropy source
fn random_suffix() -> String {
    Uuid::new_v4().as_bytes()[..SUFFIX_LEN]
        .iter()
        .map(|b| ALPHABET[*b as usize % ALPHABET.len()] as char)
        .collect()
}

/// Check that `id` is `<prefix>-XXXXX` with an uppercase-alphanumeric suffix
fn is_well_formed(id: &str, prefix: &str) -> bool {
    match id.split_once('-') {
        Some((head, suffix)) => {
            head == prefix
                && suffix.len() == SUFFIX_LEN
                && suffix
                    .bytes()
                    .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        }
        None => false,
    }
}

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Prefix placed before the dash
            pub const PREFIX: &'static str = $prefix;

            /// Generate a fresh random ID
            pub fn generate() -> Self {
                Self(format!("{}-{}", Self::PREFIX, random_suffix()))
            }

            /// Get the raw string value
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Whether the ID follows the `<prefix>-XXXXX` shape
            pub fn is_well_formed(&self) -> bool {
                is_well_formed(&self.0, Self::PREFIX)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.trim().to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::from(s.as_str())
            }
        }
    };
}

record_id!(
    /// Book identifier (`B-XXXXX`)
    BookId,
    "B"
);

record_id!(
    /// Member identifier (`M-XXXXX`)
    MemberId,
    "M"
);
