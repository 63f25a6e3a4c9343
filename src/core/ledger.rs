//! Ledger snapshot - all stored expenses and budgets, loaded together.
//!
//! Each interaction loads a fresh [`Ledger`] and works on it without touching the
//! database again, so summaries and alerts for one reply always agree.

use crate::{
    core::{Period, alerts, budget, budget::BudgetMap, expense},
    entities::{budget as budget_entity, expense as expense_entity},
    errors::Result,
};
use sea_orm::ConnectionTrait;
use std::collections::BTreeSet;
use tracing::debug;

/// Every stored expense and budget at one point in time
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    /// All expenses, oldest date first
    pub expenses: Vec<expense_entity::Model>,
    /// All budgets, oldest period first
    pub budgets: Vec<budget_entity::Model>,
}

/// Alerts for one period, split by kind
#[derive(Debug, Clone, Default)]
pub struct AlertReport {
    /// Period the budget check ran for
    pub period: Option<Period>,
    /// Whether a budget was saved for that period
    pub has_budget: bool,
    /// Categories over budget in the period
    pub budget_alerts: Vec<alerts::Alert>,
    /// Month-over-month increases across the whole history
    pub spending_alerts: Vec<alerts::Alert>,
}

/// Loads every expense and budget.
pub async fn load_ledger<C>(db: &C) -> Result<Ledger>
where
    C: ConnectionTrait,
{
    let expenses = expense::get_all_expenses(db).await?;
    let budgets = budget::get_all_budgets(db).await?;
    debug!(
        expenses = expenses.len(),
        budgets = budgets.len(),
        "Loaded ledger snapshot"
    );
    Ok(Ledger { expenses, budgets })
}

impl Ledger {
    /// Whether nothing has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty() && self.budgets.is_empty()
    }

    /// Periods with at least one expense, most recent first.
    #[must_use]
    pub fn periods(&self) -> Vec<Period> {
        let distinct: BTreeSet<Period> = self
            .expenses
            .iter()
            .map(|expense| Period::from_date(expense.date))
            .collect();
        distinct.into_iter().rev().collect()
    }

    /// The period to show: the requested one, else the most recent with expenses.
    #[must_use]
    pub fn selected_period(&self, requested: Option<Period>) -> Option<Period> {
        requested.or_else(|| self.periods().into_iter().next())
    }

    /// Expenses of one period, oldest first.
    #[must_use]
    pub fn expenses_for(&self, period: &Period) -> Vec<&expense_entity::Model> {
        self.expenses
            .iter()
            .filter(|expense| expense.period == period.as_str())
            .collect()
    }

    /// The budget saved for a period, if any.
    #[must_use]
    pub fn budget_for(&self, period: &Period) -> Option<BudgetMap> {
        self.budgets
            .iter()
            .find(|row| row.period == period.as_str())
            .map(budget_entity::Model::to_budget_map)
    }

    /// Runs both alert checks: budgets for `period`, spikes over all expenses.
    #[must_use]
    pub fn alert_report(&self, period: Option<&Period>) -> AlertReport {
        let spending_alerts = alerts::compare_monthly_spending(&self.expenses);

        let Some(period) = period else {
            return AlertReport {
                spending_alerts,
                ..AlertReport::default()
            };
        };

        let budget = self.budget_for(period);
        let budget_alerts = budget.as_ref().map_or_else(Vec::new, |limits| {
            alerts::check_budget_exceedance(&self.expenses_for(period), limits)
        });

        AlertReport {
            period: Some(period.clone()),
            has_budget: budget.is_some(),
            budget_alerts,
            spending_alerts,
        }
    }
}
