use serde_json::Value;

/// Result of looking up a user's favourite genres
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreferencesLookup {
    /// The user has no preferences record
    NotFound,
    /// Favourite genre names, in stored order
    Found(Vec<String>),
    /// A record exists but its favourite genres cannot be read
    Malformed,
}

impl PreferencesLookup {
    /// Builds a lookup from a stored `favourite_genres` field.
    ///
    /// `None` means the record exists but the field is absent.
    pub fn from_stored(field: Option<&Value>) -> Self {
        match field.and_then(favourite_genre_names) {
            Some(names) => PreferencesLookup::Found(names),
            None => PreferencesLookup::Malformed,
        }
    }
}

/// Extracts genre names from a stored `favourite_genres` array.
///
/// Returns `None` when the value is not an array. Entries without a string
/// `genre_name` are skipped.
pub fn favourite_genre_names(value: &Value) -> Option<Vec<String>> {
    let entries = value.as_array()?;

    Some(
        entries
            .iter()
            .filter_map(|entry| entry.get("genre_name").and_then(Value::as_str))
            .map(str::to_string)
            .collect(),
    )
}
