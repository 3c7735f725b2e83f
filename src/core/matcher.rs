//! Case-insensitive name matching over sheet rows.

use crate::{core::sheet::Cell, types::{ColIndex, RowIndex}};

/// Lookup key for a participant name: lowercased, whitespace kept as-is.
pub fn normalize(name: &str) -> String {
    name.to_lowercase()
}

/// First data row at or after `data_start` whose `name_col` cell matches `name`.
pub fn find(rows: &[Vec<Cell>], name_col: ColIndex, data_start: RowIndex, name: &str) -> Option<RowIndex> {
    if name.is_empty() {
        return None;
    }
    let key = normalize(name);
    rows.iter()
        .enumerate()
        .skip(data_start)
        .find(|(_, cells)| {
            cells
                .get(name_col)
                .is_some_and(|cell| !cell.is_blank() && normalize(&cell.as_text()) == key)
        })
        .map(|(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(names: &[&str]) -> Vec<Vec<Cell>> {
        names.iter().map(|n| vec![Cell::text(*n)]).collect()
    }

    #[test]
    fn matches_case_insensitively_after_caption() {
        let sheet = rows(&["Name", "alice", "Bob", "ALICE", "alice"]);
        assert_eq!(find(&sheet, 0, 2, "Alice"), Some(3));
        assert_eq!(find(&sheet, 0, 2, "bob"), Some(2));
    }

    #[test]
    fn whitespace_is_significant() {
        let sheet = rows(&["Name", "", "Alice "]);
        assert_eq!(find(&sheet, 0, 2, "alice"), None);
        assert_eq!(find(&sheet, 0, 2, "alice "), Some(2));
    }

    #[test]
    fn empty_name_never_matches() {
        let sheet = rows(&["Name", "", "", "x"]);
        assert_eq!(find(&sheet, 0, 2, ""), None);
    }
}
