//! Column naming for shingled tables.
//!
//! Output columns are named `{base}_t-{offset}`. Offsets never contain `_`,
//! so the last `_t-` in a name always separates base from offset.

use crate::window::WindowLength;

const LAG_SEPARATOR: &str = "_t-";

/// Name of the column holding `base` lagged by `offset` rows.
pub fn column_name(base: &str, offset: usize) -> String {
    format!("{}{}{}", base, LAG_SEPARATOR, offset)
}

/// Full output header: every base in order, each followed by offsets
/// `0..window` (most recent first).
pub fn shingled_names<S: AsRef<str>>(bases: &[S], window: WindowLength) -> Vec<String> {
    bases
        .iter()
        .flat_map(|base| (0..window.get()).map(move |offset| column_name(base.as_ref(), offset)))
        .collect()
}

/// Splits a shingled column name into its base name and lag offset.
pub fn parse_column_name(name: &str) -> Option<(&str, usize)> {
    let split = name.rfind(LAG_SEPARATOR)?;
    let base = &name[..split];
    let digits = &name[split + LAG_SEPARATOR.len()..];
    if base.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().map(|offset| (base, offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_name_format() {
        assert_eq!(column_name("x", 0), "x_t-0");
        assert_eq!(column_name("flow cfs", 12), "flow cfs_t-12");
    }

    #[test]
    fn test_shingled_names_order() {
        let window = WindowLength::new(2).unwrap();
        assert_eq!(
            shingled_names(&["A", "B"], window),
            vec!["A_t-0", "A_t-1", "B_t-0", "B_t-1"]
        );
    }

    #[test]
    fn test_parse_round_trip_with_nested_suffix() {
        assert_eq!(parse_column_name("x_t-3"), Some(("x", 3)));
        assert_eq!(parse_column_name("x_t-1_t-0"), Some(("x_t-1", 0)));
    }

    #[test]
    fn test_parse_rejects_plain_names() {
        assert_eq!(parse_column_name("x"), None);
        assert_eq!(parse_column_name("x_t-"), None);
        assert_eq!(parse_column_name("_t-1"), None);
        assert_eq!(parse_column_name("x_t-+1"), None);
        assert_eq!(parse_column_name("x_t-1a"), None);
    }
}
