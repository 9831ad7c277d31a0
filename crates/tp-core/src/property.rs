//! Property verification types.
//!
//! Every property names the pipeline stage whose invariant it checks, so a
//! failed run points straight at the stage that broke it.

/// Pipeline stage a property belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Assignment,
    Quota,
    Search,
    Gather,
}

impl Stage {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Assignment => "assignment",
            Stage::Quota => "quota",
            Stage::Search => "search",
            Stage::Gather => "gather",
        }
    }
}

/// Result of checking a single property.
#[derive(Debug, Clone)]
pub struct PropertyResult {
    /// Property name (e.g., "ShardCoverage")
    pub name: &'static str,

    /// Stage the property belongs to
    pub stage: Stage,

    /// Whether the property holds
    pub holds: bool,

    /// Description of violation if property doesn't hold
    pub violation: Option<String>,
}

impl PropertyResult {
    /// Create a passing property result.
    #[must_use]
    pub fn pass(name: &'static str, stage: Stage) -> Self {
        debug_assert!(!name.is_empty(), "Property name must not be empty");

        Self {
            name,
            stage,
            holds: true,
            violation: None,
        }
    }

    /// Create a failing property result.
    #[must_use]
    pub fn fail(name: &'static str, stage: Stage, violation: String) -> Self {
        debug_assert!(!name.is_empty(), "Property name must not be empty");
        debug_assert!(!violation.is_empty(), "Violation description must not be empty");

        Self {
            name,
            stage,
            holds: false,
            violation: Some(violation),
        }
    }

    /// Format as a single-line status for logging.
    #[must_use]
    pub fn format_status(&self) -> String {
        if self.holds {
            format!("[PASS] {} ({})", self.name, self.stage.name())
        } else {
            format!(
                "[FAIL] {} ({}): {}",
                self.name,
                self.stage.name(),
                self.violation.as_deref().unwrap_or("unknown")
            )
        }
    }
}

/// Trait for verifying properties of a finished run.
pub trait PropertyChecker {
    /// Check all properties. Passing properties are included.
    fn check_all(&self) -> Vec<PropertyResult>;

    /// Verify all properties, returning the first failure.
    fn verify_all(&self) -> Result<(), PropertyResult> {
        for result in self.check_all() {
            if !result.holds {
                return Err(result);
            }
        }
        Ok(())
    }

    fn all_hold(&self) -> bool {
        self.check_all().iter().all(|r| r.holds)
    }

    fn summary(&self) -> PropertySummary {
        let results = self.check_all();
        let passed = results.iter().filter(|r| r.holds).count() as u64;
        let failed = results.iter().filter(|r| !r.holds).count() as u64;
        let total = results.len() as u64;

        debug_assert!(passed + failed == total);

        PropertySummary {
            passed,
            failed,
            total,
            results,
        }
    }
}

/// Summary of property check results.
#[derive(Debug, Clone)]
pub struct PropertySummary {
    pub passed: u64,
    pub failed: u64,
    pub total: u64,
    pub results: Vec<PropertyResult>,
}

impl PropertySummary {
    /// Format as a report string.
    #[must_use]
    pub fn format_report(&self) -> String {
        let mut report = format!(
            "Property Check Summary: {}/{} passed\n",
            self.passed, self.total
        );

        for result in &self.results {
            report.push_str(&result.format_status());
            report.push('\n');
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_result_pass() {
        let result = PropertyResult::pass("ShardCoverage", Stage::Assignment);
        assert!(result.holds);
        assert!(result.violation.is_none());
    }

    #[test]
    fn test_property_result_fail() {
        let result = PropertyResult::fail(
            "GlobalOrder",
            Stage::Gather,
            "pair 17 follows 29".to_string(),
        );
        assert!(!result.holds);
        assert_eq!(result.violation.as_deref(), Some("pair 17 follows 29"));
    }

    #[test]
    fn test_format_status() {
        let pass = PropertyResult::pass("Test", Stage::Quota);
        assert_eq!(pass.format_status(), "[PASS] Test (quota)");

        let fail = PropertyResult::fail("Test", Stage::Search, "error".to_string());
        assert!(fail.format_status().starts_with("[FAIL] Test (search)"));
    }

    struct Fixed(Vec<PropertyResult>);

    impl PropertyChecker for Fixed {
        fn check_all(&self) -> Vec<PropertyResult> {
            self.0.clone()
        }
    }

    #[test]
    fn test_summary_and_verify() {
        let checker = Fixed(vec![
            PropertyResult::pass("A", Stage::Quota),
            PropertyResult::fail("B", Stage::Gather, "broken".to_string()),
        ]);
        let summary = checker.summary();
        assert_eq!((summary.passed, summary.failed, summary.total), (1, 1, 2));
        assert!(summary.format_report().contains("1/2 passed"));
        assert_eq!(checker.verify_all().unwrap_err().name, "B");
        assert!(!checker.all_hold());
    }
}
