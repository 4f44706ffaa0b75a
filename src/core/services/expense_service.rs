//! Business logic helpers for managing expenses.

use tracing::info;

use crate::core::services::{ServiceError, ServiceResult};
use crate::domain::{Expense, Ledger};

pub struct ExpenseService;

impl ExpenseService {
    pub fn add(ledger: &Ledger, expense: Expense) -> ServiceResult<Ledger> {
        validate(&expense)?;
        if ledger.expense(&expense.id).is_some() {
            return Err(ServiceError::Invalid(format!(
                "Expense id {} already exists",
                expense.id
            )));
        }
        info!(category = %expense.category, amount = expense.amount, "expense added");
        let mut next = ledger.clone();
        next.expenses.push(expense);
        Ok(next)
    }

    /// Replaces the expense identified by `id`, keeping its identifier.
    pub fn update(ledger: &Ledger, id: &str, mut expense: Expense) -> ServiceResult<Ledger> {
        validate(&expense)?;
        let mut next = ledger.clone();
        let slot = next
            .expenses
            .iter_mut()
            .find(|existing| existing.id == id)
            .ok_or_else(|| ServiceError::NotFound(format!("Expense {id}")))?;
        expense.id = slot.id.clone();
        *slot = expense;
        Ok(next)
    }

    pub fn remove(ledger: &Ledger, id: &str) -> ServiceResult<Ledger> {
        if ledger.expense(id).is_none() {
            return Err(ServiceError::NotFound(format!("Expense {id}")));
        }
        let mut next = ledger.clone();
        next.expenses.retain(|expense| expense.id != id);
        Ok(next)
    }
}

fn validate(expense: &Expense) -> ServiceResult<()> {
    if expense.description.trim().is_empty() {
        return Err(ServiceError::Invalid("Description is required".into()));
    }
    if expense.amount.is_nan() || expense.amount < 0.0 {
        return Err(ServiceError::Invalid("Amount must be zero or greater".into()));
    }
    Ok(())
}
