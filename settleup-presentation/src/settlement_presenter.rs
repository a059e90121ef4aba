use crate::text_table::{Alignment, TextTableBuilder};
use settleup_application::{CurrencyContext, MemberDirectory, PersonBalance, SettlementResult};
use settleup_domain::{ParticipantId, Transfer};
use std::{borrow::Cow, collections::HashMap};

pub const MEMBER: &str = "Member";
pub const BALANCE: &str = "Balance";
pub const FROM: &str = "From";
pub const TO: &str = "To";
pub const AMOUNT: &str = "Amount";
pub const ALL_SETTLED: &str = "All settled up.";

pub struct SettlementPresenter;

pub struct SettlementView {
    pub balance_table: String,
    pub transfer_table: Option<String>,
    /// One "`<from> pays <amount> to <to>`" line per transfer, in plan order.
    pub instructions: Vec<String>,
}

impl SettlementView {
    pub fn to_text(&self, title: &str) -> String {
        let mut text = format!("== {title} ==\n{}", self.balance_table);
        match &self.transfer_table {
            Some(table) => {
                text.push('\n');
                text.push_str(table);
                for line in &self.instructions {
                    text.push_str(line);
                    text.push('\n');
                }
            }
            None => {
                text.push_str(ALL_SETTLED);
                text.push('\n');
            }
        }
        text
    }
}

impl SettlementPresenter {
    pub fn render(result: &SettlementResult, currency: &CurrencyContext) -> SettlementView {
        let empty_directory: HashMap<ParticipantId, String> = HashMap::new();
        Self::render_with_members(result, &empty_directory, currency)
    }

    pub fn render_with_members(
        result: &SettlementResult,
        member_directory: &dyn MemberDirectory,
        currency: &CurrencyContext,
    ) -> SettlementView {
        let balance_table = Self::build_balance_table(&result.balances, member_directory, currency);

        if result.transfers.is_empty() {
            return SettlementView {
                balance_table,
                transfer_table: None,
                instructions: Vec::new(),
            };
        }

        SettlementView {
            balance_table,
            transfer_table: Some(Self::build_transfer_table(
                &result.transfers,
                member_directory,
                currency,
            )),
            instructions: result
                .transfers
                .iter()
                .map(|transfer| Self::transfer_instruction(transfer, member_directory, currency))
                .collect(),
        }
    }

    pub fn build_balance_table(
        person_balances: &[PersonBalance],
        member_directory: &dyn MemberDirectory,
        currency: &CurrencyContext,
    ) -> String {
        let headers = [Cow::Borrowed(MEMBER), Cow::Borrowed(BALANCE)];
        let mut builder = TextTableBuilder::new()
            .alignments(&[Alignment::Left, Alignment::Right])
            .headers(&headers);

        for person in person_balances {
            let sign = if person.balance.is_negative() { "" } else { "+" };
            builder = builder.row([
                format_member_label(&person.id, member_directory),
                Cow::Owned(format!("{sign}{}", currency.display(person.balance))),
            ]);
        }

        builder.build()
    }

    pub fn build_transfer_table(
        transfers: &[Transfer],
        member_directory: &dyn MemberDirectory,
        currency: &CurrencyContext,
    ) -> String {
        let headers = [Cow::Borrowed(FROM), Cow::Borrowed(TO), Cow::Borrowed(AMOUNT)];
        TextTableBuilder::new()
            .alignments(&[Alignment::Left, Alignment::Left, Alignment::Right])
            .headers(&headers)
            .rows(transfers.iter().map(|transfer| {
                [
                    format_member_label(&transfer.from, member_directory),
                    format_member_label(&transfer.to, member_directory),
                    Cow::Owned(currency.display(transfer.amount)),
                ]
            }))
            .build()
    }

    pub fn transfer_instruction(
        transfer: &Transfer,
        member_directory: &dyn MemberDirectory,
        currency: &CurrencyContext,
    ) -> String {
        format!(
            "{} pays {} to {}",
            format_member_label(&transfer.from, member_directory),
            currency.display(transfer.amount),
            format_member_label(&transfer.to, member_directory)
        )
    }
}

fn format_member_label<'a>(
    member_id: &'a ParticipantId,
    member_directory: &'a dyn MemberDirectory,
) -> Cow<'a, str> {
    match member_directory.display_name(member_id) {
        Some(name) => Cow::Borrowed(name),
        None => Cow::Borrowed(member_id.as_str()),
    }
}
