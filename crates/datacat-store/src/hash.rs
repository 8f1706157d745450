//! Hash addresses.
//!
//! A hash address is the SHA-256 of the record's key fields joined with
//! `|`, missing values counting as empty strings. It is case and order
//! sensitive and doubles as the record's primary key.

use sha2::{Digest, Sha256};

/// Separator placed between fields before hashing.
pub const FIELD_SEPARATOR: &str = "|";

/// Lowercase hex SHA-256 of the joined fields.
pub fn hash_address(fields: &[Option<&str>]) -> String {
    let joined = fields
        .iter()
        .map(|field| field.unwrap_or(""))
        .collect::<Vec<_>>()
        .join(FIELD_SEPARATOR);

    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hex::encode(hasher.finalize())
}
