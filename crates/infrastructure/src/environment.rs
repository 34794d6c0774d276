//! Process environment as an external variable source.

use indexmap::IndexMap;

/// Captures the process environment, sorted by name.
///
/// Variables whose name or value is not valid Unicode are skipped.
#[must_use]
pub fn process_variables() -> IndexMap<String, String> {
    let mut variables: IndexMap<String, String> = std::env::vars_os()
        .filter_map(|(name, value)| Some((name.into_string().ok()?, value.into_string().ok()?)))
        .collect();
    variables.sort_keys();
    variables
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_by_name() {
        let variables = process_variables();
        let names: Vec<&String> = variables.keys().collect();
        let mut sorted = names.clone();
        sorted.sort();

        assert_eq!(names, sorted);
    }
}
