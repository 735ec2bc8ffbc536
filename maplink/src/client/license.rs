//! License id accessor seam.

use parking_lot::RwLock;

/// Source of truth for the currently active license id.
///
/// The client cache reads this on every acquisition and re-applies the
/// value to the client's query parameters only when it changed.
pub trait LicenseSource: Send + Sync {
    /// The currently active license id, if any.
    fn current(&self) -> Option<String>;
}

/// Settable, shareable license source.
///
/// Host applications update it when their licensing state changes; tests
/// use it to drive license transitions.
#[derive(Debug, Default)]
pub struct SharedLicense {
    id: RwLock<Option<String>>,
}

impl SharedLicense {
    /// Creates a source with no active license.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a source with the given license id.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: RwLock::new(Some(id.into())),
        }
    }

    /// Replaces the active license id.
    pub fn set(&self, id: Option<String>) {
        *self.id.write() = id;
    }
}

impl LicenseSource for SharedLicense {
    fn current(&self) -> Option<String> {
        self.id.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_license_starts_unset() {
        let license = SharedLicense::new();
        assert_eq!(license.current(), None);
    }

    #[test]
    fn test_shared_license_set_and_clear() {
        let license = SharedLicense::with_id("gold");
        assert_eq!(license.current(), Some("gold".to_string()));

        license.set(Some("platinum".to_string()));
        assert_eq!(license.current(), Some("platinum".to_string()));

        license.set(None);
        assert_eq!(license.current(), None);
    }
}
