//! Helpers shared by the command modules: optional argument parsing and embed text.

use crate::{
    core::{Category, Period},
    errors::Result,
};
use std::str::FromStr;

/// Discord's limit on the length of one embed field value.
pub const EMBED_FIELD_LIMIT: usize = 1024;

/// Discord's limit on the length of an embed description.
pub const EMBED_DESCRIPTION_LIMIT: usize = 4096;

/// Parses an optional `YYYY-MM` argument.
pub fn parse_period_arg(value: Option<&str>) -> Result<Option<Period>> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(Period::from_str)
        .transpose()
}

/// Parses an optional category argument.
pub fn parse_category_arg(value: Option<&str>) -> Result<Option<Category>> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(Category::from_str)
        .transpose()
}

/// Joins lines with newlines, stopping before `limit` characters.
///
/// Lines that do not fit are summarised as a trailing "…and N more". An empty input
/// yields `empty`.
#[must_use]
pub fn join_limited(lines: &[String], limit: usize, empty: &str) -> String {
    if lines.is_empty() {
        return empty.to_string();
    }

    let mut text = String::new();
    for (i, line) in lines.iter().enumerate() {
        let remaining = lines.len() - i;
        let footer = format!("\n…and {remaining} more");
        let separator = usize::from(!text.is_empty());
        let needed = text.chars().count() + separator + line.chars().count();
        // Room for the footer is kept unless this is the last line
        let reserve = if remaining > 1 {
            footer.chars().count()
        } else {
            0
        };
        if needed + reserve > limit {
            if text.is_empty() {
                return format!("…and {remaining} more");
            }
            text.push_str(&footer);
            return text;
        }
        if separator == 1 {
            text.push('\n');
        }
        text.push_str(line);
    }
    text
}

/// `"1 expense"` / `"3 expenses"`
#[must_use]
pub fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::errors::Error;

    fn lines(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("line {i}")).collect()
    }

    #[test]
    fn test_parse_optional_args() {
        assert_eq!(parse_period_arg(None).unwrap(), None);
        assert_eq!(parse_period_arg(Some("  ")).unwrap(), None);
        assert_eq!(
            parse_period_arg(Some("2024-02")).unwrap().unwrap().as_str(),
            "2024-02"
        );
        assert!(matches!(
            parse_period_arg(Some("Feb")),
            Err(Error::InvalidPeriod { .. })
        ));
        assert_eq!(
            parse_category_arg(Some("travel")).unwrap(),
            Some(Category::Travel)
        );
        assert!(matches!(
            parse_category_arg(Some("Pets")),
            Err(Error::UnknownCategory { .. })
        ));
    }

    #[test]
    fn test_join_limited_fits() {
        assert_eq!(join_limited(&lines(3), 100, "-"), "line 1\nline 2\nline 3");
    }

    #[test]
    fn test_join_limited_empty() {
        assert_eq!(join_limited(&[], 100, "Nothing yet"), "Nothing yet");
    }

    #[test]
    fn test_join_limited_truncates() {
        let text = join_limited(&lines(10), 40, "-");
        assert!(text.chars().count() <= 40);
        assert!(text.starts_with("line 1\n"));
        assert!(text.ends_with("more"));
    }

    #[test]
    fn test_join_limited_last_line_needs_no_footer_room() {
        assert_eq!(join_limited(&lines(2), 18, "-"), "line 1\nline 2");
        assert_eq!(join_limited(&lines(2), 12, "-"), "…and 2 more");
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural(1, "expense"), "1 expense");
        assert_eq!(plural(0, "expense"), "0 expenses");
        assert_eq!(plural(4, "budget"), "4 budgets");
    }
}
