//! Process identity as seen by lookups.

/// OS process identifier.
pub type Pid = i32;

/// Native window handle; `0` means "no handle".
pub type WindowHandle = u64;

/// One running process.
///
/// Records are rebuilt on every enumeration; holding one does not keep the
/// process alive or its name current.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProcessRecord {
    pub pid: Pid,
    pub name: String,
}

impl ProcessRecord {
    pub fn new(pid: Pid, name: impl Into<String>) -> Self {
        Self {
            pid,
            name: name.into(),
        }
    }

    /// Case-insensitive substring match on the process name.
    pub fn name_contains(&self, needle: &str) -> bool {
        name_matches(&self.name, needle)
    }
}

/// Case-insensitive substring test used by name-based lookups.
pub fn name_matches(name: &str, needle: &str) -> bool {
    name.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_match_ignores_case() {
        assert!(name_matches("Finder", "find"));
        assert!(name_matches("finder", "FIND"));
        assert!(!name_matches("Dock", "find"));
    }

    #[test]
    fn test_empty_needle_matches_everything() {
        assert!(ProcessRecord::new(1, "init").name_contains(""));
    }
}
