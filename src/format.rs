//! Display Formatting
//!
//! Helpers for turning backend metric keys into labels.

/// Convert a snake_case metric key into a title-cased label.
///
/// Each `_`-separated segment gets its first character uppercased and the
/// rest left as-is; segments are rejoined with single spaces.
///
/// ```
/// use insights_hub::format::format_key;
///
/// assert_eq!(format_key("mtd_total_orders"), "Mtd Total Orders");
/// ```
///
/// Consecutive underscores produce empty segments, which are kept, so
/// `"a__b"` becomes `"A  B"`.
pub fn format_key(key: &str) -> String {
    key.split('_')
        .map(capitalize_first)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize_first(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_case_key() {
        assert_eq!(format_key("mtd_total_orders"), "Mtd Total Orders");
        assert_eq!(
            format_key("prediction_today_on_time_rate"),
            "Prediction Today On Time Rate"
        );
    }

    #[test]
    fn test_empty_key() {
        assert_eq!(format_key(""), "");
    }

    #[test]
    fn test_single_word() {
        assert_eq!(format_key("orders"), "Orders");
    }

    #[test]
    fn test_rest_of_segment_keeps_case() {
        assert_eq!(format_key("mtd_SLA_hITS"), "Mtd SLA HITS");
        assert_eq!(format_key("eTA"), "ETA");
    }

    #[test]
    fn test_repeated_underscores_keep_empty_segments() {
        assert_eq!(format_key("a__b"), "A  B");
        assert_eq!(format_key("_orders"), " Orders");
        assert_eq!(format_key("orders_"), "Orders ");
    }

    #[test]
    fn test_non_alphabetic_first_char() {
        assert_eq!(format_key("7_day_total"), "7 Day Total");
    }
}
