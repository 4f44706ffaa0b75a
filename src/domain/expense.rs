use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::common::*;

/// Closed set of business expense categories.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ExpenseCategory {
    HomeOffice,
    Utilities,
    Phone,
    Internet,
    Supplies,
    Vehicle,
    ProfessionalDevelopment,
    Marketing,
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 9] = [
        ExpenseCategory::HomeOffice,
        ExpenseCategory::Utilities,
        ExpenseCategory::Phone,
        ExpenseCategory::Internet,
        ExpenseCategory::Supplies,
        ExpenseCategory::Vehicle,
        ExpenseCategory::ProfessionalDevelopment,
        ExpenseCategory::Marketing,
        ExpenseCategory::Other,
    ];

    /// Wire form, e.g. `professional-development`.
    pub fn as_str(self) -> &'static str {
        match self {
            ExpenseCategory::HomeOffice => "home-office",
            ExpenseCategory::Utilities => "utilities",
            ExpenseCategory::Phone => "phone",
            ExpenseCategory::Internet => "internet",
            ExpenseCategory::Supplies => "supplies",
            ExpenseCategory::Vehicle => "vehicle",
            ExpenseCategory::ProfessionalDevelopment => "professional-development",
            ExpenseCategory::Marketing => "marketing",
            ExpenseCategory::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExpenseCategory::HomeOffice => "Home Office",
            ExpenseCategory::Utilities => "Utilities",
            ExpenseCategory::Phone => "Phone",
            ExpenseCategory::Internet => "Internet",
            ExpenseCategory::Supplies => "Supplies",
            ExpenseCategory::Vehicle => "Vehicle",
            ExpenseCategory::ProfessionalDevelopment => "Professional Development",
            ExpenseCategory::Marketing => "Marketing",
            ExpenseCategory::Other => "Other",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ExpenseCategory::HomeOffice => "Rent, mortgage interest (business portion)",
            ExpenseCategory::Utilities => "Electricity, heating, internet (business portion)",
            ExpenseCategory::Phone => "Business phone expenses",
            ExpenseCategory::Internet => "Internet service for business",
            ExpenseCategory::Supplies => "Teaching materials, books, stationery",
            ExpenseCategory::Vehicle => "Gas, maintenance, repairs (business use)",
            ExpenseCategory::ProfessionalDevelopment => "Training, courses, conferences",
            ExpenseCategory::Marketing => "Advertising, website, business cards",
            ExpenseCategory::Other => "Other business expenses",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let needle = value.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(needle))
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A business expense. Expenses carry no derived fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub date: NaiveDate,
    pub category: ExpenseCategory,
    pub description: String,
    pub amount: f64,
    pub deductible: bool,
    #[serde(default)]
    pub receipts_attached: bool,
    #[serde(default)]
    pub notes: String,
}

impl Expense {
    /// Creates a deductible expense without receipts.
    pub fn new(
        date: NaiveDate,
        category: ExpenseCategory,
        description: impl Into<String>,
        amount: f64,
    ) -> Self {
        Self {
            id: new_id(),
            date,
            category,
            description: description.into(),
            amount,
            deductible: true,
            receipts_attached: false,
            notes: String::new(),
        }
    }

    pub fn non_deductible(mut self) -> Self {
        self.deductible = false;
        self
    }
}

impl Identifiable for Expense {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Displayable for Expense {
    fn display_label(&self) -> String {
        format!(
            "{} • {} • {} • ${:.2}",
            self.date,
            self.category.label(),
            self.description,
            self.amount
        )
    }
}
