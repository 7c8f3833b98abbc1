//! Decoding of the aggregated item column produced by the order read queries.
//!
//! The read path groups item rows per order and folds them into one text
//! field with `string_agg`. The field follows a strict grammar:
//!
//! ```text
//! items    := "" | item ("," item)*
//! item     := uuid "=" quantity
//! uuid     := hex{8} "-" hex{4} "-" hex{4} "-" hex{4} "-" hex{12}   (lowercase)
//! quantity := ["-"] digit+            (fits in i32)
//! ```
//!
//! This is the text Postgres renders for a `uuid` value. Braced, `urn:uuid:`,
//! simple and uppercase spellings are rejected even though the uuid crate
//! would parse them. Canonical UUID text contains neither `,` nor `=`, so no
//! escaping exists.
//! An empty field means the order has no items.

use std::num::ParseIntError;

use thiserror::Error;

use crate::{IdentifierError, MenuItem, MenuItemId};

/// Separator between item tokens.
pub const ITEM_SEPARATOR: char = ',';

/// Separator between the identifier and the quantity inside a token.
pub const PAIR_SEPARATOR: char = '=';

/// Errors raised while decoding an aggregated order row.
#[derive(Debug, Error)]
pub enum RowDecodeError {
    /// The token is not of the form `<id>=<quantity>`.
    #[error("Malformed item token '{token}': expected '<id>=<quantity>'")]
    MalformedToken { token: String },

    /// The identifier part of a token is not canonical hyphenated UUID text.
    #[error("Invalid item identifier in token '{token}'")]
    InvalidItemId {
        token: String,
        #[source]
        source: Option<IdentifierError>,
    },

    /// The quantity part of a token is not `["-"] digit+` or overflows `i32`.
    #[error("Invalid quantity in token '{token}'")]
    InvalidQuantity {
        token: String,
        #[source]
        source: Option<ParseIntError>,
    },

    /// The stored order identifier is not 16 bytes.
    #[error("Invalid stored order identifier: {0}")]
    InvalidOrderId(#[source] IdentifierError),
}

/// Decodes the aggregated `id=quantity,...` field into the order's items.
///
/// Items come back in the order the aggregation emitted them.
pub fn decode_menu_items(field: &str) -> Result<Vec<MenuItem>, RowDecodeError> {
    if field.is_empty() {
        return Ok(Vec::new());
    }

    field.split(ITEM_SEPARATOR).map(decode_menu_item).collect()
}

fn decode_menu_item(token: &str) -> Result<MenuItem, RowDecodeError> {
    let malformed = || RowDecodeError::MalformedToken {
        token: token.to_string(),
    };

    let (id, quantity) = token.split_once(PAIR_SEPARATOR).ok_or_else(malformed)?;
    if id.is_empty() || quantity.contains(PAIR_SEPARATOR) {
        return Err(malformed());
    }

    if !is_canonical_uuid(id) {
        return Err(RowDecodeError::InvalidItemId {
            token: token.to_string(),
            source: None,
        });
    }
    let id = MenuItemId::parse(id).map_err(|source| RowDecodeError::InvalidItemId {
        token: token.to_string(),
        source: Some(source),
    })?;

    let digits = quantity.strip_prefix('-').unwrap_or(quantity);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RowDecodeError::InvalidQuantity {
            token: token.to_string(),
            source: None,
        });
    }
    let quantity = quantity
        .parse::<i32>()
        .map_err(|source| RowDecodeError::InvalidQuantity {
            token: token.to_string(),
            source: Some(source),
        })?;

    Ok(MenuItem::new(id, quantity))
}

const HYPHEN_POSITIONS: [usize; 4] = [8, 13, 18, 23];

fn is_canonical_uuid(text: &str) -> bool {
    text.len() == 36
        && text.bytes().enumerate().all(|(i, b)| {
            if HYPHEN_POSITIONS.contains(&i) {
                b == b'-'
            } else {
                matches!(b, b'0'..=b'9' | b'a'..=b'f')
            }
        })
}
