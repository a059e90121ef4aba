use crate::{
    error::{LedgerError, RecordViolation, ViolationKind},
    model::{ExpenseDraft, ExpenseRecord, Money, ParticipantId, SplitPolicy},
};
use fxhash::FxHashSet;

/// Normalizes and validates a batch of expense drafts.
///
/// Acceptance is all-or-nothing: one bad draft rejects the batch, and the
/// error lists every bad draft rather than the first. An unknown split policy
/// is reported only once the batch has no invalid records left.
pub struct LedgerValidator;

impl LedgerValidator {
    pub fn validate(&self, drafts: &[ExpenseDraft]) -> Result<Vec<ExpenseRecord>, LedgerError> {
        let mut records = Vec::with_capacity(drafts.len());
        let mut violations = Vec::new();
        let mut unknown_policy = None;

        for (index, draft) in drafts.iter().enumerate() {
            let policy = match draft.split_policy.as_deref() {
                None => Some(SplitPolicy::default()),
                Some(name) => {
                    let policy = SplitPolicy::from_name(name);
                    if policy.is_none() && unknown_policy.is_none() {
                        unknown_policy = Some(LedgerError::UnknownPolicy {
                            index,
                            policy: name.to_owned(),
                        });
                    }
                    policy
                }
            };

            match Self::normalize(draft, policy.unwrap_or_default()) {
                Ok(record) if policy.is_some() => records.push(record),
                Ok(_) => {}
                Err(kinds) => violations.push(RecordViolation {
                    index,
                    expense_id: draft.expense_id.clone(),
                    kinds,
                }),
            }
        }

        if !violations.is_empty() {
            tracing::warn!(
                record_count = drafts.len(),
                invalid_count = violations.len(),
                "Expense batch rejected"
            );
            return Err(LedgerError::InvalidRecords(violations));
        }
        if let Some(err) = unknown_policy {
            tracing::warn!(record_count = drafts.len(), error = %err, "Expense batch rejected");
            return Err(err);
        }

        tracing::debug!(record_count = records.len(), "Expense batch accepted");
        Ok(records)
    }

    fn normalize(
        draft: &ExpenseDraft,
        policy: SplitPolicy,
    ) -> Result<ExpenseRecord, Vec<ViolationKind>> {
        let mut kinds = Vec::new();

        let payer = draft.payer_id.trim();
        if payer.is_empty() {
            kinds.push(ViolationKind::EmptyPayer);
        }
        if draft.amount_minor <= 0 {
            kinds.push(ViolationKind::NonPositiveAmount {
                amount: draft.amount_minor,
            });
        }
        if draft.participant_ids.is_empty() {
            kinds.push(ViolationKind::NoParticipants);
        }

        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let mut participants = Vec::with_capacity(draft.participant_ids.len());
        for (position, raw) in draft.participant_ids.iter().enumerate() {
            let id = raw.trim();
            if id.is_empty() {
                kinds.push(ViolationKind::EmptyParticipant { position });
                continue;
            }
            if seen.insert(id) {
                participants.push(ParticipantId::new(id));
            }
        }

        if !payer.is_empty() && !draft.participant_ids.is_empty() && !seen.contains(payer) {
            kinds.push(ViolationKind::PayerNotParticipant);
        }

        if !kinds.is_empty() {
            return Err(kinds);
        }

        participants.sort_unstable();
        Ok(ExpenseRecord::new_unchecked(
            draft.expense_id.clone(),
            ParticipantId::new(payer),
            Money::from_i64(draft.amount_minor),
            participants,
            policy,
        ))
    }
}
