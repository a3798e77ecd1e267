//! Stateless helpers for shaping objects, arrays, strings and calls.
//!
//! Nothing here touches [`crate::state`].

pub mod arrays;
pub mod functions;
pub mod objects;
pub mod strings;

pub use arrays::{arr_if, get_by, get_by_key};
pub use functions::{call_on, safe_call, switch_on, Switch};
pub use objects::{
    filter_entries, filter_keys, filter_values, is_non_null_object, map_entries, map_keys,
    map_values, obj_if, on_entries, on_keys, on_values, safe_parse, safe_parse_or,
    transform_entries, Object,
};
pub use strings::{camel_case_to_capital, camel_case_to_snake, capitalize_words};
