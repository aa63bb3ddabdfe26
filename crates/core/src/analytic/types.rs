//! Analytic line domain types.

use std::fmt;

use centra_shared::types::{AnalyticAccountId, AnalyticLineId, CurrencyCode, MoveLineId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// State of an analytic line.
///
/// A line is valid when it is linked to a move line and the lines of its
/// root group on that move line balance with the move line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyticLineState {
    /// Not reconciled with its move line (or not linked at all).
    #[default]
    Draft,
    /// Reconciled with its move line.
    Valid,
}

impl AnalyticLineState {
    /// Returns the string representation of the state.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Valid => "valid",
        }
    }

    /// Parses a state from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "valid" => Some(Self::Valid),
            _ => None,
        }
    }
}

impl fmt::Display for AnalyticLineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cost-center entry mirroring part of a move line amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticLine {
    /// Unique identifier.
    pub id: AnalyticLineId,
    /// Line name.
    pub name: String,
    /// Analytic account booked on.
    pub account: AnalyticAccountId,
    /// Linked move line, if any.
    pub move_line: Option<MoveLineId>,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Line currency.
    pub currency: CurrencyCode,
    /// Accounting date.
    pub date: NaiveDate,
    /// Current state.
    pub state: AnalyticLineState,
}

impl AnalyticLine {
    /// Returns debit minus credit.
    #[must_use]
    pub fn balance(&self) -> Decimal {
        self.debit - self.credit
    }

    /// Returns true if the line is linked to a move line.
    #[must_use]
    pub const fn is_linked(&self) -> bool {
        self.move_line.is_some()
    }
}

/// Input for a new analytic line.
///
/// Unset fields are defaulted from the linked move line when there is one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAnalyticLine {
    /// Line name.
    pub name: Option<String>,
    /// Analytic account to book on.
    pub account: AnalyticAccountId,
    /// Move line to link to.
    pub move_line: Option<MoveLineId>,
    /// Debit amount.
    pub debit: Option<Decimal>,
    /// Credit amount.
    pub credit: Option<Decimal>,
    /// Line currency.
    pub currency: Option<CurrencyCode>,
    /// Accounting date.
    pub date: Option<NaiveDate>,
}

impl NewAnalyticLine {
    /// Creates an input booking on `account` with every other field unset.
    #[must_use]
    pub const fn new(account: AnalyticAccountId) -> Self {
        Self {
            name: None,
            account,
            move_line: None,
            debit: None,
            credit: None,
            currency: None,
            date: None,
        }
    }

    /// Sets the line name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Links the line to a move line.
    #[must_use]
    pub const fn linked_to(mut self, move_line: MoveLineId) -> Self {
        self.move_line = Some(move_line);
        self
    }

    /// Sets the debit amount.
    #[must_use]
    pub const fn debit(mut self, amount: Decimal) -> Self {
        self.debit = Some(amount);
        self
    }

    /// Sets the credit amount.
    #[must_use]
    pub const fn credit(mut self, amount: Decimal) -> Self {
        self.credit = Some(amount);
        self
    }

    /// Sets the currency.
    #[must_use]
    pub fn currency(mut self, currency: CurrencyCode) -> Self {
        self.currency = Some(currency);
        self
    }

    /// Sets the accounting date.
    #[must_use]
    pub const fn dated(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }
}

/// Field changes for existing analytic lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalyticLinePatch {
    /// New name.
    pub name: Option<String>,
    /// New analytic account.
    pub account: Option<AnalyticAccountId>,
    /// New link; `Some(None)` unlinks the line.
    pub move_line: Option<Option<MoveLineId>>,
    /// New debit.
    pub debit: Option<Decimal>,
    /// New credit.
    pub credit: Option<Decimal>,
    /// New currency.
    pub currency: Option<CurrencyCode>,
    /// New date.
    pub date: Option<NaiveDate>,
    /// Forced state.
    pub state: Option<AnalyticLineState>,
}

impl AnalyticLinePatch {
    /// Returns true if the patch only sets `state`.
    ///
    /// State-only writes skip modification checks and recomputation.
    #[must_use]
    pub fn is_state_only(&self) -> bool {
        self.state.is_some()
            && self.name.is_none()
            && self.account.is_none()
            && self.move_line.is_none()
            && self.debit.is_none()
            && self.credit.is_none()
            && self.currency.is_none()
            && self.date.is_none()
    }

    /// Returns true if the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Applies the patch to a copy of `line`.
    #[must_use]
    pub fn apply_to(&self, line: &AnalyticLine) -> AnalyticLine {
        let mut updated = line.clone();
        if let Some(name) = &self.name {
            updated.name.clone_from(name);
        }
        if let Some(account) = self.account {
            updated.account = account;
        }
        if let Some(move_line) = self.move_line {
            updated.move_line = move_line;
        }
        if let Some(debit) = self.debit {
            updated.debit = debit;
        }
        if let Some(credit) = self.credit {
            updated.credit = credit;
        }
        if let Some(currency) = &self.currency {
            updated.currency = currency.clone();
        }
        if let Some(date) = self.date {
            updated.date = date;
        }
        if let Some(state) = self.state {
            updated.state = state;
        }
        updated
    }
}

/// A state transition applied to one analytic line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateChange {
    /// The analytic line.
    pub line: AnalyticLineId,
    /// State before the transition.
    pub from: AnalyticLineState,
    /// State after the transition.
    pub to: AnalyticLineState,
}
