//! Analytic error types.
//!
//! Every failure raised while saving analytic configuration, saving lines or
//! posting moves is a variant of [`AnalyticError`]. Variants carry the ids and
//! display names of the records involved; the `Display` impl renders the
//! user-facing message.

use centra_shared::AppError;
use centra_shared::types::{
    AccountId, AnalyticAccountId, AnalyticLineId, AnalyticRootId, CompanyId, CurrencyCode, MoveId,
    MoveLineId,
};
use thiserror::Error;

use crate::chart::AnalyticConstraint;
use crate::posting::MoveOrigin;

/// Errors that can occur while enforcing analytic rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalyticError {
    // ========== Configuration Errors ==========
    /// The same analytic roots are classified twice for one account.
    #[error(
        "Account \"{account}\" has analytic hierarchies configured as both {first} and {second}: {}",
        .roots.join(", ")
    )]
    ConstraintConflict {
        /// The account being configured.
        account_id: AccountId,
        /// Display label of the account.
        account: String,
        /// First classification involved.
        first: AnalyticConstraint,
        /// Second classification involved.
        second: AnalyticConstraint,
        /// Names of the overlapping roots.
        roots: Vec<String>,
    },

    /// An analytic root from another company was assigned to an account.
    #[error("Analytic hierarchy \"{root}\" does not belong to the company of account \"{account}\"")]
    CompanyMismatch {
        /// Display label of the account.
        account: String,
        /// Name of the root.
        root: String,
    },

    /// A move line books on an account of another company than its move.
    #[error("Account \"{account}\" does not belong to the company of move \"{move_name}\"")]
    MoveCompanyMismatch {
        /// Name of the move.
        move_name: String,
        /// Display label of the account.
        account: String,
    },

    /// An analytic account sits below a parent of another hierarchy.
    #[error("Analytic account \"{account}\" cannot have parent \"{parent}\" from hierarchy \"{parent_root}\"")]
    ParentRootMismatch {
        /// Name of the analytic account.
        account: String,
        /// Name of the parent account.
        parent: String,
        /// Name of the parent's root.
        parent_root: String,
    },

    /// A record with the same id is already registered.
    #[error("Duplicate {kind}: {id}")]
    Duplicate {
        /// Kind of record.
        kind: &'static str,
        /// The id already in use.
        id: String,
    },

    /// View accounts cannot carry analytic constraints.
    #[error("Account \"{account}\" is a view account and cannot have analytic constraints")]
    ViewAccountConstraint {
        /// Display label of the account.
        account: String,
    },

    /// Analytic lines must be booked on normal analytic accounts.
    #[error("Analytic line \"{line}\" cannot use the view analytic account \"{account}\"")]
    ViewAnalyticAccount {
        /// Name of the analytic line.
        line: String,
        /// Name of the analytic account.
        account: String,
    },

    /// Strict configuration is enabled and the account has unclassified roots.
    #[error(
        "Move line {line_id} uses account \"{account}\" which has analytic hierarchies pending configuration: {}",
        .pending.join(", ")
    )]
    AccountAnalyticNotConfigured {
        /// The move line being saved.
        line_id: MoveLineId,
        /// Display label of the account.
        account: String,
        /// Names of the unclassified roots.
        pending: Vec<String>,
    },

    // ========== Analytic Line Errors ==========
    /// An analytic line uses a root that its move line account forbids.
    #[error(
        "Analytic line \"{line}\" is related to a move line of account \"{account}\" which forbids the analytic hierarchy \"{root}\""
    )]
    ForbiddenAnalyticUsed {
        /// The analytic line.
        line_id: AnalyticLineId,
        /// Name of the analytic line.
        line: String,
        /// Display label of the move line account.
        account: String,
        /// Name of the forbidden root.
        root: String,
    },

    /// An analytic line currency differs from its move line account currency.
    #[error(
        "Currency of analytic line \"{line}\" ({actual}) is different from the one of the related move line ({expected})"
    )]
    CurrencyMismatch {
        /// The analytic line.
        line_id: AnalyticLineId,
        /// Name of the analytic line.
        line: String,
        /// Currency of the move line account.
        expected: CurrencyCode,
        /// Currency of the analytic line.
        actual: CurrencyCode,
    },

    /// Lines of a posted move cannot be changed.
    #[error("Move \"{move_name}\" is posted, its line {line_id} and analytic lines cannot be modified")]
    PostedMoveModification {
        /// The posted move.
        move_id: MoveId,
        /// Name of the posted move.
        move_name: String,
        /// The move line being touched.
        line_id: MoveLineId,
    },

    // ========== Posting Errors ==========
    /// A move line lacks analytic lines for required roots.
    #[error(
        "Move \"{move_name}\" cannot be posted: the line of account \"{account}\" has no analytic lines for the required hierarchies {}{}",
        .roots.join(", "),
        origin_suffix(.origin.as_ref())
    )]
    MissingAnalyticLines {
        /// The move being posted.
        move_id: MoveId,
        /// Name of the move.
        move_name: String,
        /// The offending move line.
        line_id: MoveLineId,
        /// Display label of the move line account.
        account: String,
        /// Names of the unsatisfied required roots.
        roots: Vec<String>,
        /// Document the move was generated from, if any.
        origin: Option<MoveOrigin>,
    },

    /// A required analytic line is still in draft.
    #[error(
        "Move \"{move_name}\" cannot be posted: the analytic lines of \"{line}\" for hierarchy \"{root}\" are not valid"
    )]
    InvalidAnalyticToPost {
        /// The move being posted.
        move_id: MoveId,
        /// Name of the move.
        move_name: String,
        /// The offending move line.
        line_id: MoveLineId,
        /// Display label of the move line.
        line: String,
        /// Name of the root whose lines are not valid.
        root: String,
    },

    // ========== Rule Errors ==========
    /// An asset lacks analytic accounts for roots required by a depreciation account.
    #[error(
        "Asset \"{asset}\" has no analytic account for the hierarchies {} required by account {account}",
        .roots.join(", ")
    )]
    MissingRootOnAsset {
        /// Asset number.
        asset: String,
        /// Code of the account requiring the roots.
        account: String,
        /// Names of the missing roots.
        roots: Vec<String>,
    },

    // ========== Lookup Errors ==========
    /// Company not found.
    #[error("Company not found: {0}")]
    UnknownCompany(CompanyId),

    /// Account not found.
    #[error("Account not found: {0}")]
    UnknownAccount(AccountId),

    /// Analytic root not found.
    #[error("Analytic hierarchy not found: {0}")]
    UnknownAnalyticRoot(AnalyticRootId),

    /// Analytic account not found.
    #[error("Analytic account not found: {0}")]
    UnknownAnalyticAccount(AnalyticAccountId),

    /// Move not found.
    #[error("Move not found: {0}")]
    UnknownMove(MoveId),

    /// Move line not found.
    #[error("Move line not found: {0}")]
    UnknownMoveLine(MoveLineId),

    /// Analytic line not found.
    #[error("Analytic line not found: {0}")]
    UnknownAnalyticLine(AnalyticLineId),
}

fn origin_suffix(origin: Option<&MoveOrigin>) -> String {
    origin.map_or_else(String::new, |o| format!(" (origin: {o})"))
}

impl AnalyticError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ConstraintConflict { .. } => "CONSTRAINT_CONFLICT",
            Self::CompanyMismatch { .. } => "COMPANY_MISMATCH",
            Self::MoveCompanyMismatch { .. } => "MOVE_COMPANY_MISMATCH",
            Self::ParentRootMismatch { .. } => "PARENT_ROOT_MISMATCH",
            Self::Duplicate { .. } => "DUPLICATE",
            Self::ViewAccountConstraint { .. } => "VIEW_ACCOUNT_CONSTRAINT",
            Self::ViewAnalyticAccount { .. } => "VIEW_ANALYTIC_ACCOUNT",
            Self::AccountAnalyticNotConfigured { .. } => "ACCOUNT_ANALYTIC_NOT_CONFIGURED",
            Self::ForbiddenAnalyticUsed { .. } => "FORBIDDEN_ANALYTIC_USED",
            Self::CurrencyMismatch { .. } => "CURRENCY_MISMATCH",
            Self::PostedMoveModification { .. } => "POSTED_MOVE_MODIFICATION",
            Self::MissingAnalyticLines { .. } => "MISSING_ANALYTIC_LINES",
            Self::InvalidAnalyticToPost { .. } => "INVALID_ANALYTIC_TO_POST",
            Self::MissingRootOnAsset { .. } => "MISSING_ROOT_ON_ASSET",
            Self::UnknownCompany(_) => "COMPANY_NOT_FOUND",
            Self::UnknownAccount(_) => "ACCOUNT_NOT_FOUND",
            Self::UnknownAnalyticRoot(_) => "ANALYTIC_ROOT_NOT_FOUND",
            Self::UnknownAnalyticAccount(_) => "ANALYTIC_ACCOUNT_NOT_FOUND",
            Self::UnknownMove(_) => "MOVE_NOT_FOUND",
            Self::UnknownMoveLine(_) => "MOVE_LINE_NOT_FOUND",
            Self::UnknownAnalyticLine(_) => "ANALYTIC_LINE_NOT_FOUND",
        }
    }
}

impl From<AnalyticError> for AppError {
    fn from(err: AnalyticError) -> Self {
        let message = err.to_string();
        match err {
            AnalyticError::ConstraintConflict { .. }
            | AnalyticError::CompanyMismatch { .. }
            | AnalyticError::MoveCompanyMismatch { .. }
            | AnalyticError::ParentRootMismatch { .. }
            | AnalyticError::Duplicate { .. }
            | AnalyticError::ViewAccountConstraint { .. }
            | AnalyticError::ViewAnalyticAccount { .. }
            | AnalyticError::AccountAnalyticNotConfigured { .. }
            | AnalyticError::CurrencyMismatch { .. } => Self::Validation(message),

            AnalyticError::ForbiddenAnalyticUsed { .. }
            | AnalyticError::MissingAnalyticLines { .. }
            | AnalyticError::InvalidAnalyticToPost { .. }
            | AnalyticError::MissingRootOnAsset { .. } => Self::BusinessRule(message),

            AnalyticError::PostedMoveModification { .. } => Self::Forbidden(message),

            AnalyticError::UnknownCompany(_)
            | AnalyticError::UnknownAccount(_)
            | AnalyticError::UnknownAnalyticRoot(_)
            | AnalyticError::UnknownAnalyticAccount(_)
            | AnalyticError::UnknownMove(_)
            | AnalyticError::UnknownMoveLine(_)
            | AnalyticError::UnknownAnalyticLine(_) => Self::NotFound(message),
        }
    }
}
