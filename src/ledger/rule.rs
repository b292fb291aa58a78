use serde::{Deserialize, Serialize};

use crate::dates::PDate;
use crate::errors::{BudgetError, Result};
use crate::record::Record;

/// Repeat cadence for a spending rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RulePeriod {
    Day,
    Week,
    Month,
    Year,
}

/// A repeating spending rule attached to a category.
///
/// `period: None` marks a one-shot rule: it occurs once if the query window
/// intersects `[start_date, end_date]`. Both bounds are inclusive and `None`
/// means unbounded on that side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryRule {
    /// Signed amount in minor units of the owning category's currency.
    pub amount: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<PDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<PDate>,
    /// Skip factor; fire every `repeat_n` periods. Meaningless for one-shots.
    pub repeat_n: u32,
    pub period: Option<RulePeriod>,
}

impl Default for CategoryRule {
    fn default() -> Self {
        Self {
            amount: 0,
            start_date: None,
            end_date: None,
            repeat_n: 1,
            period: Some(RulePeriod::Month),
        }
    }
}

impl Record for CategoryRule {
    fn check_invariants(&self) -> Result<()> {
        if self.repeat_n == 0 {
            return Err(BudgetError::InvariantViolation(
                "rule repeat_n must be a positive integer".into(),
            ));
        }
        Ok(())
    }
}

impl CategoryRule {
    /// How many times this rule fires within the inclusive window
    /// `[date_begin, date_end]`.
    ///
    /// Periodic occurrences are anchored to the rule's own `start_date`, not
    /// to the query window: when the rule starts before the window, the count
    /// over `[start, date_begin - 1]` is subtracted so only occurrences
    /// inside the window remain.
    pub fn count_occurrences_between(&self, date_begin: PDate, date_end: PDate) -> i64 {
        if date_end < date_begin {
            return 0;
        }
        if let Some(start) = self.start_date {
            if date_end < start {
                return 0;
            }
        }
        if let Some(end) = self.end_date {
            if date_begin > end {
                return 0;
            }
        }
        let Some(period) = self.period else {
            return 1;
        };

        let first_day = self.start_date.unwrap_or(date_begin);
        let last_day = match self.end_date {
            Some(end) => end.min(date_end),
            None => date_end,
        };

        let n = i64::from(self.repeat_n);
        let mut count = match period {
            RulePeriod::Day => {
                let days = (last_day.value() - first_day.value()).max(0);
                days / n + 1
            }
            RulePeriod::Week => {
                let days = (last_day.value() - first_day.value()).max(0);
                days / (n * 7) + 1
            }
            RulePeriod::Month => {
                let months = 12 * i64::from(last_day.year() - first_day.year())
                    + (i64::from(last_day.month()) - i64::from(first_day.month()))
                    + i64::from(last_day.day() >= first_day.day());
                (months - 1).div_euclid(n) + 1
            }
            RulePeriod::Year => {
                let rollover = last_day.month() > first_day.month()
                    || (last_day.month() == first_day.month()
                        && last_day.day() >= first_day.day());
                i64::from(last_day.year() - first_day.year()) + i64::from(rollover)
            }
        };

        if first_day < date_begin {
            if let Ok(before_window) = date_begin.pred() {
                count -= self.count_occurrences_between(first_day, before_window);
            }
        }
        count
    }

    /// Display label for the cadence.
    pub fn label(&self) -> String {
        match (self.repeat_n, self.period) {
            (_, None) => "One-shot".into(),
            (1, Some(RulePeriod::Day)) => "Daily".into(),
            (1, Some(RulePeriod::Week)) => "Weekly".into(),
            (1, Some(RulePeriod::Month)) => "Monthly".into(),
            (1, Some(RulePeriod::Year)) => "Yearly".into(),
            (n, Some(period)) => {
                let unit = match period {
                    RulePeriod::Day => "days",
                    RulePeriod::Week => "weeks",
                    RulePeriod::Month => "months",
                    RulePeriod::Year => "years",
                };
                format!("Every {n} {unit}")
            }
        }
    }
}
