use std::borrow::Cow;

use validator::ValidationError;

/// Required text fields are stored trimmed, so whitespace alone counts as empty.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some(Cow::Borrowed("must not be blank"));
        return Err(err);
    }
    Ok(())
}
