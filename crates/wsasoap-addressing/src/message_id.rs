use uuid::Uuid;

/// Default prefix of generated ids.
///
/// A misspelling of `uuid:` that deployed receivers may match on, so it stays
/// the default. Use [`URN_UUID_PREFIX`] for standard ids.
pub const LEGACY_MESSAGE_ID_PREFIX: &str = "uudi:";
pub const URN_UUID_PREFIX: &str = "urn:uuid:";

/// Generates a fresh message id: `prefix` followed by 32 random hex digits
/// grouped `8-4-4-4-12`.
pub fn generate(prefix: &str) -> String {
    format!("{prefix}{}", Uuid::new_v4().hyphenated())
}
