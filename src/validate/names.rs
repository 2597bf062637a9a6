//! Person-name checks.

/// Longest accepted person name, in characters.
pub const MAX_NAME_LEN: usize = 100;

/// Rejects empty, whitespace-only and overlong names.
pub fn validate_person_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("person names cannot be empty or whitespace-only".into());
    }
    if name.chars().count() > MAX_NAME_LEN {
        let head: String = name.chars().take(50).collect();
        return Err(format!(
            "person name too long (max {MAX_NAME_LEN} chars): '{head}...'"
        ));
    }
    Ok(())
}
