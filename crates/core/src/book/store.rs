//! Lifecycle manager for moves, move lines and analytic lines.
//!
//! Every mutating operation validates its whole batch before applying any
//! change, then recomputes analytic line states once for the set of affected
//! move lines.

use std::collections::{BTreeMap, BTreeSet};

use centra_shared::AnalyticConfig;
use centra_shared::types::{
    AccountId, AnalyticAccountId, AnalyticLineId, AnalyticRootId, CurrencyCode, MoveId, MoveLineId,
};
use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use super::types::{MoveLinePatch, MutationResult, NewMove, NewMoveLine};
use crate::analytic::{
    AnalyticLine, AnalyticLinePatch, AnalyticLineState, AnalyticStateMachine, NewAnalyticLine,
    StateChange, check_analytic_account, check_linked_line,
};
use crate::chart::AnalyticChart;
use crate::error::AnalyticError;
use crate::posting::{Move, MoveLine, MoveState, PostingLine, PostingValidator};
use crate::rules::{AnalyticEntry, must_have_analytic};

/// In-memory book of moves and analytic lines over an analytic chart.
#[derive(Debug, Clone, Default)]
pub struct AnalyticBook {
    chart: AnalyticChart,
    config: AnalyticConfig,
    moves: BTreeMap<MoveId, Move>,
    move_lines: BTreeMap<MoveLineId, MoveLine>,
    analytic_lines: BTreeMap<AnalyticLineId, AnalyticLine>,
}

fn log_rejection(err: &AnalyticError) {
    warn!(code = err.error_code(), error = %err, "analytic operation rejected");
}

impl AnalyticBook {
    /// Creates an empty book over `chart`.
    #[must_use]
    pub fn new(chart: AnalyticChart, config: AnalyticConfig) -> Self {
        Self {
            chart,
            config,
            ..Self::default()
        }
    }

    // ========== Accessors ==========

    /// Returns the analytic chart.
    #[must_use]
    pub const fn chart(&self) -> &AnalyticChart {
        &self.chart
    }

    /// Returns the analytic chart for configuration changes.
    pub const fn chart_mut(&mut self) -> &mut AnalyticChart {
        &mut self.chart
    }

    /// Returns the analytic configuration.
    #[must_use]
    pub const fn config(&self) -> &AnalyticConfig {
        &self.config
    }

    /// Replaces the analytic configuration.
    pub fn set_config(&mut self, config: AnalyticConfig) {
        self.config = config;
    }

    /// Returns every move.
    pub fn moves(&self) -> impl Iterator<Item = &Move> + '_ {
        self.moves.values()
    }

    /// Returns a move.
    pub fn move_(&self, id: MoveId) -> Result<&Move, AnalyticError> {
        self.moves.get(&id).ok_or(AnalyticError::UnknownMove(id))
    }

    /// Returns a move line.
    pub fn move_line(&self, id: MoveLineId) -> Result<&MoveLine, AnalyticError> {
        self.move_lines
            .get(&id)
            .ok_or(AnalyticError::UnknownMoveLine(id))
    }

    /// Returns an analytic line.
    pub fn analytic_line(&self, id: AnalyticLineId) -> Result<&AnalyticLine, AnalyticError> {
        self.analytic_lines
            .get(&id)
            .ok_or(AnalyticError::UnknownAnalyticLine(id))
    }

    /// Returns the lines of a move.
    pub fn lines_of(&self, move_id: MoveId) -> Result<Vec<&MoveLine>, AnalyticError> {
        self.move_(move_id)?;
        Ok(self
            .move_lines
            .values()
            .filter(|line| line.move_id == move_id)
            .collect())
    }

    /// Returns the analytic lines linked to a move line.
    pub fn analytic_lines_of(
        &self,
        move_line: MoveLineId,
    ) -> Result<Vec<&AnalyticLine>, AnalyticError> {
        self.move_line(move_line)?;
        Ok(self
            .analytic_lines
            .values()
            .filter(|line| line.move_line == Some(move_line))
            .collect())
    }

    /// Returns the lines of a move that must carry analytic lines.
    pub fn lines_requiring_analytic(
        &self,
        move_id: MoveId,
    ) -> Result<Vec<MoveLineId>, AnalyticError> {
        let move_ = self.move_(move_id)?;
        let mut ids = Vec::new();
        for line in self.lines_of(move_id)? {
            if must_have_analytic(self.chart.account(line.account)?, move_) {
                ids.push(line.id);
            }
        }
        Ok(ids)
    }

    // ========== Moves ==========

    /// Creates a move with its lines and their analytic lines.
    ///
    /// # Errors
    ///
    /// Fails if a line breaks the strict configuration policy or a nested
    /// analytic line fails its save checks. Nothing is created then.
    pub fn create_move(
        &mut self,
        input: NewMove,
    ) -> Result<MutationResult<MoveId>, AnalyticError> {
        self.try_create_move(input).inspect_err(log_rejection)
    }

    fn try_create_move(
        &mut self,
        input: NewMove,
    ) -> Result<MutationResult<MoveId>, AnalyticError> {
        self.chart.company(input.company)?;
        let move_ = Move {
            id: MoveId::new(),
            company: input.company,
            name: input.name,
            date: input.date,
            description: input.description,
            journal: input.journal,
            period: input.period,
            origin: input.origin,
            state: MoveState::Draft,
        };

        let (lines, analytic) = self.prepare_move_lines(&move_, input.lines)?;
        let affected: BTreeSet<MoveLineId> = lines.iter().map(|line| line.id).collect();

        let id = move_.id;
        self.moves.insert(id, move_);
        self.insert_lines(lines, analytic);
        let state_changes = self.recompute(&affected)?;
        Ok(MutationResult::new(id, state_changes))
    }

    /// Adds lines to a draft move.
    ///
    /// # Errors
    ///
    /// Fails with `PostedMoveModification` on posted moves, or for the same
    /// reasons as [`Self::create_move`].
    pub fn create_move_lines(
        &mut self,
        move_id: MoveId,
        lines: Vec<NewMoveLine>,
    ) -> Result<MutationResult<Vec<MoveLineId>>, AnalyticError> {
        self.try_create_move_lines(move_id, lines)
            .inspect_err(log_rejection)
    }

    fn try_create_move_lines(
        &mut self,
        move_id: MoveId,
        lines: Vec<NewMoveLine>,
    ) -> Result<MutationResult<Vec<MoveLineId>>, AnalyticError> {
        let move_ = self.move_(move_id)?;
        let (lines, analytic) = self.prepare_move_lines(move_, lines)?;
        if move_.is_posted() {
            if let Some(line) = lines.first() {
                return Err(Self::posted(move_, line.id));
            }
        }

        let ids: Vec<MoveLineId> = lines.iter().map(|line| line.id).collect();
        let affected: BTreeSet<MoveLineId> = ids.iter().copied().collect();
        self.insert_lines(lines, analytic);
        let state_changes = self.recompute(&affected)?;
        Ok(MutationResult::new(ids, state_changes))
    }

    fn prepare_move_lines(
        &self,
        move_: &Move,
        inputs: Vec<NewMoveLine>,
    ) -> Result<(Vec<MoveLine>, Vec<AnalyticLine>), AnalyticError> {
        let mut lines = Vec::with_capacity(inputs.len());
        let mut analytic = Vec::new();
        for input in inputs {
            let line = MoveLine {
                id: MoveLineId::new(),
                move_id: move_.id,
                account: input.account,
                debit: input.debit,
                credit: input.credit,
                description: input.description,
            };
            self.check_move_company(move_, line.account)?;
            PostingValidator::check_line_configuration(&self.chart, &self.config, &line)?;

            for mut new_line in input.analytic_lines {
                new_line.move_line = Some(line.id);
                analytic.push(self.prepare_analytic_line(new_line, Some((move_, &line)))?);
            }
            lines.push(line);
        }
        Ok((lines, analytic))
    }

    fn check_move_company(&self, move_: &Move, account: AccountId) -> Result<(), AnalyticError> {
        let account = self.chart.account(account)?;
        if account.company != move_.company {
            return Err(AnalyticError::MoveCompanyMismatch {
                move_name: move_.name.clone(),
                account: account.label(),
            });
        }
        Ok(())
    }

    fn insert_lines(&mut self, lines: Vec<MoveLine>, analytic: Vec<AnalyticLine>) {
        self.move_lines
            .extend(lines.into_iter().map(|line| (line.id, line)));
        self.analytic_lines
            .extend(analytic.into_iter().map(|line| (line.id, line)));
    }

    /// Posts a move.
    ///
    /// Posting an already posted move re-runs the checks and keeps it posted.
    ///
    /// # Errors
    ///
    /// Returns `MissingAnalyticLines` or `InvalidAnalyticToPost` when a line
    /// does not satisfy its account's required roots. The move stays draft.
    pub fn post_move(&mut self, move_id: MoveId) -> Result<(), AnalyticError> {
        self.check_post(move_id).inspect_err(log_rejection)?;

        let move_ = self
            .moves
            .get_mut(&move_id)
            .ok_or(AnalyticError::UnknownMove(move_id))?;
        move_.state = MoveState::Posted;
        info!(move_id = %move_id, name = %move_.name, "posted move");
        Ok(())
    }

    fn check_post(&self, move_id: MoveId) -> Result<(), AnalyticError> {
        let move_ = self.move_(move_id)?;
        let lines: Vec<PostingLine<'_>> = self
            .lines_of(move_id)?
            .into_iter()
            .map(|line| PostingLine {
                line,
                analytic_lines: self
                    .analytic_lines
                    .values()
                    .filter(|analytic| analytic.move_line == Some(line.id))
                    .collect(),
            })
            .collect();
        PostingValidator::validate_post(&self.chart, move_, &lines)
    }

    // ========== Move Lines ==========

    /// Writes the same changes to several move lines.
    ///
    /// # Errors
    ///
    /// Fails with `PostedMoveModification` if a line belongs to a posted move,
    /// or `AccountAnalyticNotConfigured` under the strict policy.
    pub fn write_move_lines(
        &mut self,
        ids: &[MoveLineId],
        patch: &MoveLinePatch,
    ) -> Result<MutationResult<()>, AnalyticError> {
        self.try_write_move_lines(ids, patch)
            .inspect_err(log_rejection)
    }

    fn try_write_move_lines(
        &mut self,
        ids: &[MoveLineId],
        patch: &MoveLinePatch,
    ) -> Result<MutationResult<()>, AnalyticError> {
        // 1. Validate every updated line
        let mut updated = Vec::with_capacity(ids.len());
        for id in ids {
            let line = self.move_line(*id)?;
            let move_ = self.move_(line.move_id)?;
            if move_.is_posted() {
                return Err(Self::posted(move_, line.id));
            }

            let mut new_line = line.clone();
            if let Some(account) = patch.account {
                self.check_move_company(move_, account)?;
                new_line.account = account;
            }
            if let Some(debit) = patch.debit {
                new_line.debit = debit;
            }
            if let Some(credit) = patch.credit {
                new_line.credit = credit;
            }
            if let Some(description) = &patch.description {
                new_line.description = Some(description.clone());
            }
            PostingValidator::check_line_configuration(&self.chart, &self.config, &new_line)?;
            updated.push(new_line);
        }

        // 2. Apply and recompute
        let affected: BTreeSet<MoveLineId> = updated.iter().map(|line| line.id).collect();
        self.move_lines
            .extend(updated.into_iter().map(|line| (line.id, line)));
        let state_changes = self.recompute(&affected)?;
        Ok(MutationResult::new((), state_changes))
    }

    /// Deletes move lines.
    ///
    /// Their analytic lines stay persisted, unlinked and in draft.
    ///
    /// # Errors
    ///
    /// Fails with `PostedMoveModification` when a line belongs to a posted
    /// move, unless the deletion comes from a bank statement.
    pub fn delete_move_lines(
        &mut self,
        ids: &[MoveLineId],
        from_bank_statement: bool,
    ) -> Result<MutationResult<()>, AnalyticError> {
        self.try_delete_move_lines(ids, from_bank_statement)
            .inspect_err(log_rejection)
    }

    fn try_delete_move_lines(
        &mut self,
        ids: &[MoveLineId],
        from_bank_statement: bool,
    ) -> Result<MutationResult<()>, AnalyticError> {
        for id in ids {
            let line = self.move_line(*id)?;
            let move_ = self.move_(line.move_id)?;
            if move_.is_posted() && !from_bank_statement {
                return Err(Self::posted(move_, line.id));
            }
        }

        let deleted: BTreeSet<MoveLineId> = ids.iter().copied().collect();
        let orphans: Vec<AnalyticLineId> = self
            .analytic_lines
            .values()
            .filter(|line| line.move_line.is_some_and(|ml| deleted.contains(&ml)))
            .map(|line| line.id)
            .collect();

        let mut state_changes = Vec::new();
        for id in orphans {
            if let Some(line) = self.analytic_lines.get_mut(&id) {
                line.move_line = None;
                state_changes.extend(AnalyticStateMachine::unlinked_transitions([&*line]));
                line.state = AnalyticLineState::Draft;
            }
        }
        for id in &deleted {
            self.move_lines.remove(id);
        }
        debug!(
            deleted = deleted.len(),
            drafted = state_changes.len(),
            "deleted move lines"
        );
        Ok(MutationResult::new((), state_changes))
    }

    // ========== Analytic Lines ==========

    /// Creates analytic lines.
    ///
    /// Lines linked to a move line take their unset fields from it.
    ///
    /// # Errors
    ///
    /// Fails if a line uses a view analytic account, a forbidden root or a
    /// currency other than the move line account's, or is linked to a line
    /// of a posted move. Nothing is created then.
    pub fn create_analytic_lines(
        &mut self,
        inputs: Vec<NewAnalyticLine>,
    ) -> Result<MutationResult<Vec<AnalyticLineId>>, AnalyticError> {
        self.try_create_analytic_lines(inputs)
            .inspect_err(log_rejection)
    }

    fn try_create_analytic_lines(
        &mut self,
        inputs: Vec<NewAnalyticLine>,
    ) -> Result<MutationResult<Vec<AnalyticLineId>>, AnalyticError> {
        let mut prepared = Vec::with_capacity(inputs.len());
        for input in inputs {
            let link = match input.move_line {
                Some(id) => {
                    let line = self.move_line(id)?;
                    let move_ = self.move_(line.move_id)?;
                    if move_.is_posted() {
                        return Err(Self::posted(move_, line.id));
                    }
                    Some((move_, line))
                }
                None => None,
            };
            prepared.push(self.prepare_analytic_line(input, link)?);
        }

        let ids: Vec<AnalyticLineId> = prepared.iter().map(|line| line.id).collect();
        let affected: BTreeSet<MoveLineId> =
            prepared.iter().filter_map(|line| line.move_line).collect();
        self.analytic_lines
            .extend(prepared.into_iter().map(|line| (line.id, line)));
        let state_changes = self.recompute(&affected)?;
        Ok(MutationResult::new(ids, state_changes))
    }

    /// Builds and checks an analytic line, defaulting unset fields.
    fn prepare_analytic_line(
        &self,
        input: NewAnalyticLine,
        link: Option<(&Move, &MoveLine)>,
    ) -> Result<AnalyticLine, AnalyticError> {
        let root = self.chart.root_of(input.account)?;

        let line = match link {
            Some((move_, move_line)) => {
                let account = self.chart.account(move_line.account)?;
                let line = AnalyticLine {
                    id: AnalyticLineId::new(),
                    name: input
                        .name
                        .or_else(|| move_line.description.clone())
                        .or_else(|| move_.description.clone())
                        .unwrap_or_default(),
                    account: input.account,
                    move_line: Some(move_line.id),
                    debit: input.debit.unwrap_or(move_line.debit),
                    credit: input.credit.unwrap_or(move_line.credit),
                    currency: input.currency.unwrap_or_else(|| account.currency.clone()),
                    date: input.date.unwrap_or(move_.date),
                    state: AnalyticLineState::Draft,
                };
                check_linked_line(&self.chart, &line, account)?;
                line
            }
            None => {
                let company = self.chart.company(root.company)?;
                let line = AnalyticLine {
                    id: AnalyticLineId::new(),
                    name: input.name.unwrap_or_default(),
                    account: input.account,
                    move_line: None,
                    debit: input.debit.unwrap_or_default(),
                    credit: input.credit.unwrap_or_default(),
                    currency: input.currency.unwrap_or_else(|| company.currency.clone()),
                    date: input.date.unwrap_or_else(|| Utc::now().date_naive()),
                    state: AnalyticLineState::Draft,
                };
                check_analytic_account(&self.chart, &line)?;
                line
            }
        };
        Ok(line)
    }

    /// Writes the same changes to several analytic lines.
    ///
    /// A patch that only sets `state` is stored as is, without checks or
    /// recomputation.
    ///
    /// # Errors
    ///
    /// Fails with `PostedMoveModification` when a line is, or would become,
    /// linked to a line of a posted move, and with the creation checks for
    /// the updated values.
    pub fn write_analytic_lines(
        &mut self,
        ids: &[AnalyticLineId],
        patch: &AnalyticLinePatch,
    ) -> Result<MutationResult<()>, AnalyticError> {
        self.try_write_analytic_lines(ids, patch)
            .inspect_err(log_rejection)
    }

    fn try_write_analytic_lines(
        &mut self,
        ids: &[AnalyticLineId],
        patch: &AnalyticLinePatch,
    ) -> Result<MutationResult<()>, AnalyticError> {
        if patch.is_state_only() {
            for id in ids {
                self.analytic_line(*id)?;
            }
            for id in ids {
                if let (Some(line), Some(state)) = (self.analytic_lines.get_mut(id), patch.state) {
                    line.state = state;
                }
            }
            return Ok(MutationResult::new((), Vec::new()));
        }

        // 1. Validate every updated line
        let mut updated = Vec::with_capacity(ids.len());
        let mut affected = BTreeSet::new();
        for id in ids {
            let current = self.analytic_line(*id)?;
            let new_line = patch.apply_to(current);

            for link in [current.move_line, new_line.move_line].into_iter().flatten() {
                let move_line = self.move_line(link)?;
                let move_ = self.move_(move_line.move_id)?;
                if move_.is_posted() {
                    return Err(Self::posted(move_, move_line.id));
                }
                affected.insert(link);
            }

            match new_line.move_line {
                Some(link) => {
                    let account = self.chart.account(self.move_line(link)?.account)?;
                    check_linked_line(&self.chart, &new_line, account)?;
                }
                None => check_analytic_account(&self.chart, &new_line)?,
            }
            updated.push(new_line);
        }

        // 2. Apply, drafting unlinked lines
        let mut state_changes =
            AnalyticStateMachine::unlinked_transitions(updated.iter().filter(|l| !l.is_linked()));
        for mut line in updated {
            if !line.is_linked() {
                line.state = AnalyticLineState::Draft;
            }
            self.analytic_lines.insert(line.id, line);
        }

        // 3. Recompute affected move lines
        state_changes.extend(self.recompute(&affected)?);
        Ok(MutationResult::new((), state_changes))
    }

    /// Deletes analytic lines.
    ///
    /// # Errors
    ///
    /// Fails with `PostedMoveModification` when a line is linked to a line of
    /// a posted move.
    pub fn delete_analytic_lines(
        &mut self,
        ids: &[AnalyticLineId],
    ) -> Result<MutationResult<()>, AnalyticError> {
        self.try_delete_analytic_lines(ids)
            .inspect_err(log_rejection)
    }

    fn try_delete_analytic_lines(
        &mut self,
        ids: &[AnalyticLineId],
    ) -> Result<MutationResult<()>, AnalyticError> {
        let mut affected = BTreeSet::new();
        for id in ids {
            if let Some(link) = self.analytic_line(*id)?.move_line {
                let move_line = self.move_line(link)?;
                let move_ = self.move_(move_line.move_id)?;
                if move_.is_posted() {
                    return Err(Self::posted(move_, move_line.id));
                }
                affected.insert(link);
            }
        }

        for id in ids {
            self.analytic_lines.remove(id);
        }
        let state_changes = self.recompute(&affected)?;
        Ok(MutationResult::new((), state_changes))
    }

    /// Creates one analytic line per entry on a move line, mirroring its
    /// debit and credit.
    ///
    /// # Errors
    ///
    /// Same as [`Self::create_analytic_lines`].
    pub fn apply_analytic_entries(
        &mut self,
        move_line: MoveLineId,
        entries: &[AnalyticEntry],
    ) -> Result<MutationResult<Vec<AnalyticLineId>>, AnalyticError> {
        let line = self
            .move_line(move_line)
            .inspect_err(log_rejection)?;
        let inputs = entries
            .iter()
            .map(|entry| {
                entry
                    .analytic_line(line.debit, line.credit, None)
                    .linked_to(move_line)
            })
            .collect();
        self.create_analytic_lines(inputs)
    }

    // ========== State Recomputation ==========

    /// Recomputes the analytic line states of the given move lines.
    ///
    /// Lines are grouped per move line and root in one pass. Unknown move
    /// lines are skipped.
    ///
    /// # Errors
    ///
    /// Fails if a linked analytic line references an unknown analytic
    /// account. No state changes then.
    pub fn recompute(
        &mut self,
        affected: &BTreeSet<MoveLineId>,
    ) -> Result<Vec<StateChange>, AnalyticError> {
        let mut grouped: BTreeMap<MoveLineId, Vec<(&AnalyticLine, AnalyticRootId)>> =
            BTreeMap::new();
        for line in self.analytic_lines.values() {
            if let Some(link) = line.move_line.filter(|link| affected.contains(link)) {
                let root = self.chart.analytic_account(line.account)?.root;
                grouped.entry(link).or_default().push((line, root));
            }
        }

        let mut changes = Vec::new();
        for (id, linked) in grouped {
            let Some(move_line) = self.move_lines.get(&id) else {
                continue;
            };
            let line_changes = AnalyticStateMachine::transitions(move_line.balance(), linked);
            if !line_changes.is_empty() {
                debug!(
                    move_line = %id,
                    valid = line_changes.iter().filter(|c| c.to == AnalyticLineState::Valid).count(),
                    draft = line_changes.iter().filter(|c| c.to == AnalyticLineState::Draft).count(),
                    "recomputed analytic line states"
                );
            }
            changes.extend(line_changes);
        }

        for change in &changes {
            if let Some(line) = self.analytic_lines.get_mut(&change.line) {
                line.state = change.to;
            }
        }
        Ok(changes)
    }

    // ========== Reporting ==========

    /// Returns the balance of an analytic account per currency.
    ///
    /// With `valid_only`, draft lines are ignored.
    pub fn analytic_balance(
        &self,
        account: AnalyticAccountId,
        valid_only: bool,
    ) -> Result<BTreeMap<CurrencyCode, Decimal>, AnalyticError> {
        self.chart.analytic_account(account)?;
        let mut balances: BTreeMap<CurrencyCode, Decimal> = BTreeMap::new();
        for line in self.analytic_lines.values() {
            if line.account != account
                || (valid_only && line.state != AnalyticLineState::Valid)
            {
                continue;
            }
            *balances.entry(line.currency.clone()).or_default() += line.balance();
        }
        Ok(balances)
    }

    fn posted(move_: &Move, line_id: MoveLineId) -> AnalyticError {
        AnalyticError::PostedMoveModification {
            move_id: move_.id,
            move_name: move_.name.clone(),
            line_id,
        }
    }
}
