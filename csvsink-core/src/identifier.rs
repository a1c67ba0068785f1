//! Identifier sanitization for user-supplied table and column names.
//!
//! MySQL identifiers built from untrusted input are restricted to a safe
//! character set rather than escaped. Sanitization is a non-fatal
//! normalization: callers compare input and output and warn when they differ.

/// Strips every character that is not alphanumeric, `_`, `-`, or `$`.
///
/// Pure and deterministic. Kept characters retain their relative order, and
/// the function is idempotent: `sanitize(sanitize(x)) == sanitize(x)`.
///
/// # Example
///
/// ```rust
/// use csvsink_core::identifier::sanitize;
///
/// assert_eq!(sanitize("steam; DROP TABLE users"), "steamDROPTABLEusers");
/// assert_eq!(sanitize("price_2024-q1$"), "price_2024-q1$");
/// ```
#[must_use]
pub fn sanitize(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '$'))
        .collect()
}

/// Backtick-quotes a column name so reserved words survive DDL.
///
/// Embedded backticks are doubled, which is the MySQL escape for a literal
/// backtick inside a quoted identifier.
#[must_use]
pub fn quote(ident: &str) -> String {
    format!("`{}`", ident.replace('`', "``"))
}
