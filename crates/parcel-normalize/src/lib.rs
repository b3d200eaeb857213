//! Property record normalization.
//!
//! Everything here is a pure function of its inputs: the same address fields
//! always produce the same canonical string, across calls and across
//! processes. Fuzzy comparisons downstream rely on that for reproducible
//! results.

mod address;
mod street;
mod text;

pub use address::{
    AddressParts, COMPONENT_SEPARATOR, ZIP_LENGTH, normalize_address, normalize_record_address,
    truncate_zip,
};
pub use street::{standardize_street, street_number};
pub use text::{is_punctuation, normalize_string};
