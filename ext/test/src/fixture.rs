//! Conformance test fixture runner
//!
//! Loads YAML fixtures and runs every case through both evaluation paths:
//!
//! - **Operation path**: [`CheckConfig::evaluate`] → `match_*_element`
//!   (resource resolved before the pattern is parsed)
//! - **Check path**: [`CheckConfig::into_check`] → [`Check::check`](flatmatch::Check::check)
//!   (pattern and criteria validated at construction)
//!
//! A case passes when the operation path yields the expected outcome and the
//! check path agrees with it.
//!
//! ```yaml
//! name: scalar_membership
//! description: A scalar set contains a value
//! state:
//!   modules:
//!     - path: [root]
//!       resources:
//!         aws_instance.web:
//!           primary:
//!             attributes:
//!               tags.0: prod
//! cases:
//!   - name: present
//!     check: { type: scalar, resource: aws_instance.web, pattern: tags.*, value: prod }
//!   - name: absent
//!     check: { type: scalar, resource: aws_instance.web, pattern: tags.*, value: dev }
//!     expect: element_not_found
//! ```

use flatmatch::{CheckConfig, CheckError, ErrorKind, State};
use serde::Deserialize;

/// A complete test fixture
#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub state: State,
    pub cases: Vec<TestCase>,
}

/// Test case
#[derive(Debug, Deserialize)]
pub struct TestCase {
    pub name: String,
    pub check: CheckConfig,
    /// Omitted for success, otherwise the expected error kind.
    #[serde(default)]
    pub expect: Option<ErrorKind>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Runner
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of running a single test case
#[derive(Debug)]
pub struct CaseResult {
    pub case_name: String,
    pub passed: bool,
    pub expected: Option<ErrorKind>,
    pub actual: Option<ErrorKind>,
    /// Outcome of the check path, when it disagreed with the operation path.
    pub divergence: Option<Option<ErrorKind>>,
    /// Rendered error from the operation path, for failure messages.
    pub message: Option<String>,
}

fn outcome(result: &Result<(), CheckError>) -> Option<ErrorKind> {
    result.as_ref().err().map(CheckError::kind)
}

impl TestCase {
    /// Evaluate via the prebuilt [`Check`](flatmatch::Check) path.
    ///
    /// Construction errors count as the check's outcome, so an invalid
    /// pattern surfaces as `invalid_pattern` on both paths. The exception is
    /// precedence: the operation path reports a missing resource before a
    /// bad pattern, so resolution errors from the operation are not compared.
    fn check_path(&self, state: &State) -> Option<ErrorKind> {
        match self.check.clone().into_check() {
            Ok(check) => outcome(&check.check(state)),
            Err(e) => Some(e.kind()),
        }
    }
}

impl Fixture {
    /// Parse a fixture from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Parse multiple fixtures from a YAML file with `---` separators
    pub fn from_yaml_multi(yaml: &str) -> Result<Vec<Self>, serde_yaml::Error> {
        let mut fixtures = Vec::new();
        for doc in serde_yaml::Deserializer::from_str(yaml) {
            fixtures.push(Self::deserialize(doc)?);
        }
        Ok(fixtures)
    }

    /// Run all test cases and return results
    pub fn run(&self) -> Vec<CaseResult> {
        self.cases
            .iter()
            .map(|case| {
                let result = case.check.evaluate(&self.state);
                let actual = outcome(&result);

                let resolution_error = matches!(
                    actual,
                    Some(ErrorKind::ResourceNotFound | ErrorKind::InstanceNotFound)
                );
                let via_check = case.check_path(&self.state);
                let divergence = (!resolution_error && via_check != actual).then_some(via_check);

                CaseResult {
                    case_name: case.name.clone(),
                    passed: actual == case.expect && divergence.is_none(),
                    expected: case.expect,
                    actual,
                    divergence,
                    message: result.err().map(|e| e.to_string()),
                }
            })
            .collect()
    }

    /// Run all test cases and panic on first failure
    pub fn run_and_assert(&self) {
        for result in self.run() {
            assert!(
                result.passed,
                "Fixture '{}' case '{}' failed: expected {:?}, got {:?} (check path: {:?}){}",
                self.name,
                result.case_name,
                result.expected,
                result.actual,
                result.divergence,
                result
                    .message
                    .map(|m| format!("\n  error: {m}"))
                    .unwrap_or_default()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"
name: inline
description: inline fixture
state:
  modules:
    - path: [root]
      resources:
        aws_instance.web:
          type: aws_instance
          primary:
            id: i-1
            attributes:
              tags.0: prod
              ebs.3.size: "20"
              ebs.3.type: gp3
        aws_instance.pending:
          type: aws_instance
cases:
  - name: scalar_present
    check: { type: scalar, resource: aws_instance.web, pattern: tags.*, value: prod }
  - name: nested_present
    check:
      type: nested
      resource: aws_instance.web
      pattern: ebs.*
      criteria: { size: "20", type: gp3 }
  - name: no_instance
    check: { type: scalar, resource: aws_instance.pending, pattern: tags, value: x }
    expect: instance_not_found
"#;

    #[test]
    fn parses_and_runs_inline_fixture() {
        let fixture = Fixture::from_yaml(FIXTURE).unwrap();
        assert_eq!(fixture.cases.len(), 3);
        fixture.run_and_assert();
    }

    #[test]
    fn wrong_expectation_fails() {
        let mut fixture = Fixture::from_yaml(FIXTURE).unwrap();
        fixture.cases[0].expect = Some(ErrorKind::ElementNotFound);
        let results = fixture.run();
        assert!(!results[0].passed);
        assert_eq!(results[0].actual, None);
    }

    #[test]
    fn multi_document() {
        let yaml = format!("{FIXTURE}\n---\n{FIXTURE}");
        let fixtures = Fixture::from_yaml_multi(&yaml).unwrap();
        assert_eq!(fixtures.len(), 2);
    }
}
