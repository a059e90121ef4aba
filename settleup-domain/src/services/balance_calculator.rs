use crate::{
    error::LedgerError,
    model::{Balances, ExpenseRecord, Money, ParticipantId, SplitPolicy},
};

/// Reduces validated expense records into one net balance per participant.
pub struct BalanceCalculator;

impl BalanceCalculator {
    /// Every participant seen in `records` gets an entry, zero balances included.
    ///
    /// The returned balances always sum to exactly zero.
    pub fn calculate(&self, records: &[ExpenseRecord]) -> Result<Balances, LedgerError> {
        let mut balances = Balances::new();

        for record in records {
            let shares = match record.policy() {
                SplitPolicy::Equal => split_equally(record.amount(), record.participants()),
            };

            credit(&mut balances, record.payer(), record.amount())?;
            for (participant, share) in shares {
                debit(&mut balances, participant, share)?;
            }
        }

        debug_assert_eq!(
            Money::checked_sum(balances.values().copied()),
            Some(Money::ZERO)
        );
        tracing::debug!(
            record_count = records.len(),
            participant_count = balances.len(),
            "Balances calculated"
        );

        Ok(balances)
    }
}

/// Splits a positive `amount` into equal shares, one per participant, in the
/// given order.
///
/// The first `amount mod n` participants receive one extra minor unit, so the
/// shares always add up to `amount`. Callers pass participants sorted
/// ascending to make the remainder assignment independent of input order.
pub fn split_equally(
    amount: Money,
    participants: &[ParticipantId],
) -> Vec<(&ParticipantId, Money)> {
    if participants.is_empty() {
        return Vec::new();
    }

    debug_assert!(!amount.is_negative());
    let count = participants.len() as i64;
    let base = amount.amount() / count;
    let remainder = (amount.amount() % count) as usize;

    participants
        .iter()
        .enumerate()
        .map(|(idx, participant)| {
            let mut share = base;
            if idx < remainder {
                share += 1;
            }
            (participant, Money::from_i64(share))
        })
        .collect()
}

/// Adds every balance of `from` into `into`.
pub fn merge_balances(into: &mut Balances, from: &Balances) -> Result<(), LedgerError> {
    for (participant, amount) in from {
        credit(into, participant, *amount)?;
    }
    Ok(())
}

fn credit(
    balances: &mut Balances,
    participant: &ParticipantId,
    amount: Money,
) -> Result<(), LedgerError> {
    let entry = balances.entry(participant.clone()).or_insert(Money::ZERO);
    *entry = entry
        .checked_add(amount)
        .ok_or_else(|| LedgerError::Overflow {
            participant: participant.clone(),
        })?;
    Ok(())
}

fn debit(
    balances: &mut Balances,
    participant: &ParticipantId,
    amount: Money,
) -> Result<(), LedgerError> {
    let entry = balances.entry(participant.clone()).or_insert(Money::ZERO);
    *entry = entry
        .checked_sub(amount)
        .ok_or_else(|| LedgerError::Overflow {
            participant: participant.clone(),
        })?;
    Ok(())
}
