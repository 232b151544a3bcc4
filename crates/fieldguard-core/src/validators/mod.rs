//! # Built-in Validators
//!
//! One constructor per rule. Every constructor returns a [`Validator`]
//! whose messages start with the field name it is given.
//!
//! ## Absent values
//!
//! | Group | Absent / `null` | Present, wrong type |
//! |-------|-----------------|---------------------|
//! | type ([`types`]), format ([`format`]), [`is_date`], composites | failure | failure |
//! | bounds ([`bounds`]) and date comparisons | skipped | failure |
//!
//! Bounds only constrain values that are there; presence is the job of
//! [`is_required`]. A schema such as `[is_required(), is_string(), min_length(3)]`
//! therefore reports the most specific problem first.
//!
//! [`Validator`]: crate::Validator

pub mod bounds;
pub mod composite;
pub mod country;
pub mod format;
pub mod temporal;
pub mod types;

pub use bounds::{
    array_max_length, array_min_length, is_integer, is_length, is_negative, is_positive,
    max_length, max_value, min_length, min_value,
};
pub use composite::{array_elements, custom, is_key_in_object, object_keys};
pub use format::{
    is_alpha, is_alphanumeric, is_country_code, is_email, is_lowercase, is_mongo_id,
    is_uppercase, matches_pattern,
};
pub use temporal::{
    is_before_date, is_date, is_date_in_range, is_future_date, is_past_date, parse_date,
};
pub use types::{is_array, is_boolean, is_number, is_object, is_required, is_string};
