//! Journal configuration.

/// Configuration for a [`crate::Journal`].
#[derive(Debug, Clone)]
pub struct JournalConfig {
    /// Whether to drop an object's state once it holds nothing observable
    /// (no pending entries, empty caches, no pending deletes).
    pub reclaim_idle_objects: bool,

    /// Pending-queue length at which appends start logging a warning
    /// (0 = never warn).
    pub pending_warn_threshold: usize,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            reclaim_idle_objects: true,
            pending_warn_threshold: 1024,
        }
    }
}

impl JournalConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether idle per-object state is reclaimed.
    #[must_use]
    pub const fn reclaim_idle_objects(mut self, value: bool) -> Self {
        self.reclaim_idle_objects = value;
        self
    }

    /// Sets the pending-queue warning threshold.
    #[must_use]
    pub const fn pending_warn_threshold(mut self, value: usize) -> Self {
        self.pending_warn_threshold = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = JournalConfig::default();
        assert!(config.reclaim_idle_objects);
        assert_eq!(config.pending_warn_threshold, 1024);
    }

    #[test]
    fn builder_pattern() {
        let config = JournalConfig::new()
            .reclaim_idle_objects(false)
            .pending_warn_threshold(0);

        assert!(!config.reclaim_idle_objects);
        assert_eq!(config.pending_warn_threshold, 0);
    }
}
