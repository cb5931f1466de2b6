//! Output column naming

use once_cell::sync::Lazy;
use regex::Regex;

static PARENS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[()]").expect("Invalid regex"));

/// Turn a source header into an output column name.
///
/// Keeps the text before the first `/`, lowercases it, replaces spaces with
/// underscores and strips parentheses.
///
/// # Examples
///
/// ```
/// use star_schema::schema::prettify_column_name;
///
/// assert_eq!(prettify_column_name("Invoice/Item Number"), "invoice");
/// assert_eq!(prettify_column_name("Bottle Volume (ml)"), "bottle_volume_ml");
/// assert_eq!(prettify_column_name("Store Number"), "store_number");
/// ```
pub fn prettify_column_name(name: &str) -> String {
    let head = name.split('/').next().unwrap_or(name);
    let snake = head.to_lowercase().replace(' ', "_");
    PARENS.replace_all(&snake, "").into_owned()
}
