//! Monitored-file predicate

use regex::Regex;

/// Default pattern: only files named like `scratch_test_record.py` are
/// tracked, so ordinary editing never hits the recorder.
pub const DEFAULT_MONITOR_PATTERN: &str = "_test_record";

/// Decides which files are monitored for change capture.
///
/// Files that do not match produce no records at all — they are rejected
/// before normalization, not filtered out of the log afterwards.
#[derive(Debug, Clone)]
pub struct MonitorSpec {
    pattern: Regex,
}

impl MonitorSpec {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    pub fn is_monitored(&self, file_name: &str) -> bool {
        self.pattern.is_match(file_name)
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl Default for MonitorSpec {
    fn default() -> Self {
        Self::new(DEFAULT_MONITOR_PATTERN).expect("default monitor pattern is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_spec_matches_test_record_files() {
        let spec = MonitorSpec::default();
        assert!(spec.is_monitored("/tmp/scratch_test_record.py"));
        assert!(spec.is_monitored("fib_test_record.py"));
        assert!(!spec.is_monitored("/tmp/main.py"));
    }

    #[test]
    fn custom_pattern() {
        let spec = MonitorSpec::new(r"\.scratch\.py$").unwrap();
        assert!(spec.is_monitored("demo.scratch.py"));
        assert!(!spec.is_monitored("demo_test_record.py"));
    }
}
