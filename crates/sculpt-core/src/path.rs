//! # Error Paths
//!
//! A path string names one location in the input tree:
//!
//! ```text
//! name            top-level field
//! 0.name          field of the first item in many mode
//! address.city    field of a nested object
//! tags[2]         third element of a scalar array
//! items[1].sku    field of the second element of an object array
//! ```

/// Path of a schema field on a top-level item, index-prefixed in many mode.
pub fn item_path(index: Option<usize>, key: &str) -> String {
    match index {
        Some(i) => format!("{i}.{key}"),
        None => key.to_string(),
    }
}

/// Path of a nested serializer's field beneath `parent`.
pub fn nested_path(parent: &str, child: &str) -> String {
    format!("{parent}.{child}")
}

/// Path of the array element at `index` beneath `parent`.
pub fn element_path(parent: &str, index: usize) -> String {
    format!("{parent}[{index}]")
}
