//! Structured collection of soft validation issues.
//!
//! Invariant violations abort a mutation; everything here is informational.
//! Issues are keyed by the field they concern, or by `None` for problems with
//! the record overall.

use serde::{Deserialize, Serialize};

use crate::ledger::Budget;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub severity: Severity,
    pub field: Option<String>,
    pub message: String,
}

/// Ordered list of issues collected during one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    pub fn push(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    /// All issues in insertion order.
    pub fn all_issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(|issue| issue.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(|issue| issue.severity == Severity::Warning)
    }

    /// Issues recorded against a specific field name.
    pub fn field_issues<'a>(
        &'a self,
        field: Option<&'a str>,
    ) -> impl Iterator<Item = &'a ValidationIssue> {
        self.issues
            .iter()
            .filter(move |issue| issue.field.as_deref() == field)
    }

    /// Issues not tied to any single field.
    pub fn overall_issues(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.field_issues(None)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn merge(&mut self, other: ValidationResult) {
        self.issues.extend(other.issues);
    }
}

/// Read-only view of a budget plus the result being accumulated.
pub struct ValidationContext<'a> {
    budget: &'a Budget,
    result: ValidationResult,
}

impl<'a> ValidationContext<'a> {
    pub fn new(budget: &'a Budget) -> Self {
        Self {
            budget,
            result: ValidationResult::default(),
        }
    }

    pub fn budget(&self) -> &'a Budget {
        self.budget
    }

    pub fn add_error(&mut self, field: Option<&str>, message: impl Into<String>) {
        self.result.push(ValidationIssue {
            severity: Severity::Error,
            field: field.map(str::to_owned),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: Option<&str>, message: impl Into<String>) {
        self.result.push(ValidationIssue {
            severity: Severity::Warning,
            field: field.map(str::to_owned),
            message: message.into(),
        });
    }

    pub fn finish(self) -> ValidationResult {
        self.result
    }
}
