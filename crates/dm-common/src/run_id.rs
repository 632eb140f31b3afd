//! Process-level run ID for tracking scoring executions.
//!
//! Each process gets a unique ULID at startup. All scoring and training
//! operations within the same process share this ID, enabling:
//! - Traceability of which run produced each score table
//! - Separate records for different runs (even on the same day)

use once_cell::sync::Lazy;
use ulid::Ulid;

/// Process-level run ID, generated once at first access.
static RUN_ID: Lazy<String> = Lazy::new(|| Ulid::new().to_string());

/// Returns the process-level run ID.
///
/// This ID is:
/// - Generated once per process (at first call)
/// - Time-ordered (ULIDs sort lexicographically by creation time)
/// - 26 characters, URL-safe
#[inline]
pub fn get() -> &'static str {
    &RUN_ID
}

/// Generates a fresh ULID for sub-operations (e.g., one scoring request).
#[inline]
pub fn generate() -> String {
    Ulid::new().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_same_value() {
        let first = get();
        let second = get();
        assert_eq!(first, second);
        assert_eq!(first.len(), 26);
    }

    #[test]
    fn generate_returns_unique_values() {
        let a = generate();
        let b = generate();
        assert_ne!(a, b);
        assert_eq!(a.len(), 26);
        assert_eq!(b.len(), 26);
    }
}
