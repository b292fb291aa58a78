//! Capability set shared by every typed value record.
//!
//! Records are plain serde structs; this trait adds the invariant hook, the
//! batched update protocol, contextual validation entry points, and the
//! object-tree round trip.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::{BudgetError, Result};
use crate::ledger::Budget;
use crate::validation::{ValidationContext, ValidationResult};

pub trait Record: Clone + Serialize + DeserializeOwned {
    /// Asserts local invariants. Runs on construction and after every edit;
    /// failure discards the attempted change.
    fn check_invariants(&self) -> Result<()>;

    /// Reports non-fatal issues against the containing budget. Default: none.
    fn validate(&self, _ctx: &mut ValidationContext<'_>) {}

    /// Batched update: applies `mutate` to a scratch copy, then re-checks
    /// invariants once. Intermediate states inside the closure may violate
    /// invariants; the finalized record must not.
    fn edit(mut self, mutate: impl FnOnce(&mut Self)) -> Result<Self> {
        mutate(&mut self);
        self.check_invariants()?;
        Ok(self)
    }

    /// Collects soft issues for this record in the context of `budget`.
    fn validate_for_budget(&self, budget: &Budget) -> ValidationResult {
        let mut ctx = ValidationContext::new(budget);
        self.validate(&mut ctx);
        ctx.finish()
    }

    /// Like [`Record::validate_for_budget`], but promotes errors to a hard
    /// failure. Warnings never fail.
    fn assert_valid_for_budget(&self, budget: &Budget) -> Result<()> {
        let result = self.validate_for_budget(budget);
        if result.has_errors() {
            let messages: Vec<_> = result
                .errors()
                .map(|issue| issue.message.clone())
                .collect();
            return Err(BudgetError::Validation(messages.join("; ")));
        }
        Ok(())
    }

    /// Serializes to a plain JSON object tree.
    fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Rehydrates a record from its object-tree form and re-checks invariants.
    fn from_json(value: serde_json::Value) -> Result<Self> {
        let record: Self = serde_json::from_value(value)?;
        record.check_invariants()?;
        Ok(record)
    }
}
