pub const DEFAULT_SORT: &str = "-_score";

/// Flips the direction when `field` is already the sort key, otherwise sorts
/// by `field` descending.
pub fn toggle_sort_field(current_sort: &str, field: &str) -> String {
    let (descending, current_field) = split_sort(current_sort);
    if current_field == field {
        if descending {
            field.to_string()
        } else {
            format!("-{field}")
        }
    } else {
        format!("-{field}")
    }
}

/// Splits `-field` into `(true, "field")` and `field` into `(false, "field")`.
pub fn split_sort(sort: &str) -> (bool, &str) {
    match sort.strip_prefix('-') {
        Some(field) => (true, field),
        None => (false, sort),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_field_flips_direction() {
        assert_eq!(toggle_sort_field("-_score", "_score"), "_score");
        assert_eq!(toggle_sort_field("_score", "_score"), "-_score");
    }

    #[test]
    fn new_field_defaults_to_descending() {
        assert_eq!(toggle_sort_field("-_score", "modified_at"), "-modified_at");
        assert_eq!(toggle_sort_field("title", "modified_at"), "-modified_at");
    }

    #[test]
    fn double_toggle_on_same_field_restores_sort() {
        for sort in ["-_score", "_score", "title", "-title"] {
            let (_, field) = split_sort(sort);
            assert_eq!(toggle_sort_field(&toggle_sort_field(sort, field), field), sort);
        }
    }
}
