//! Configurable limits for bounded directory decoding.

/// Archive-level limits.
///
/// Directory sizes come straight from the file header, so they are checked
/// before anything is allocated for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum number of directory entries.
    pub max_entries: usize,

    /// Maximum size of a single entry's data in bytes.
    pub max_entry_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            // The retail pak0.pak holds a few hundred files
            max_entries: 64 * 1024,
            max_entry_bytes: 256 * 1024 * 1024,
        }
    }
}

impl Limits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_entries: 64,
            max_entry_bytes: 64 * 1024,
        }
    }

    /// Creates limits with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_entries: usize::MAX,
            max_entry_bytes: usize::MAX,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn testing_limits_smaller() {
        let test_limits = Limits::for_testing();
        let default_limits = Limits::default();

        assert!(test_limits.max_entries < default_limits.max_entries);
        assert!(test_limits.max_entry_bytes < default_limits.max_entry_bytes);
    }

    #[test]
    fn unlimited_limits() {
        let limits = Limits::unlimited();
        assert_eq!(limits.max_entries, usize::MAX);
        assert_eq!(limits.max_entry_bytes, usize::MAX);
    }

    #[test]
    fn limits_const_constructible() {
        const LIMITS: Limits = Limits::for_testing();
        assert_eq!(LIMITS.max_entries, 64);
    }
}
