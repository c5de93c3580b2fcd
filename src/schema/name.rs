//! Case-insensitive object names.
//!
//! Every table, view, column and index name comparison goes through these two
//! functions so that one folding rule (Unicode upper case) applies everywhere.

/// The key a name is stored and looked up under.
///
/// ```
/// use schemalens::schema::name_key;
///
/// assert_eq!(name_key("Straße"), "STRASSE");
/// ```
pub fn name_key(name: &str) -> String {
    name.to_uppercase()
}

/// Whether two names refer to the same object.
pub fn names_match(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_uppercase)
        .eq(b.chars().flat_map(char::to_uppercase))
}
