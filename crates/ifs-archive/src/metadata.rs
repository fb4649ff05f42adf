//! Flattening multi-valued metadata into a single searchable field.

use crate::record::Metadata;

/// Concatenates the values of `key_a` then `key_b`, space-separated.
///
/// Returns `None` if there is no metadata or neither key is present.
pub fn merge_list_field(metadata: Option<&Metadata>, key_a: &str, key_b: &str) -> Option<String> {
    merge_list_fields(metadata, &[key_a, key_b])
}

/// Concatenates the values of each key in order, space-separated.
///
/// Values are not deduplicated. Returns `None` if there is no metadata or none
/// of the keys is present.
pub fn merge_list_fields(metadata: Option<&Metadata>, keys: &[&str]) -> Option<String> {
    let metadata = metadata?;
    let mut found = false;
    let mut values: Vec<&str> = Vec::new();

    for key in keys {
        if let Some(list) = metadata.get(*key) {
            found = true;
            values.extend(list.iter().map(String::as_str));
        }
    }

    found.then(|| values.join(" "))
}
