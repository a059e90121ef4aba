#![warn(clippy::uninlined_format_args)]

//! Line-oriented ledger format.
//!
//! ```text
//! # comments run to the end of the line
//! group trip
//! member alice "Alice Smith"
//! alice paid 100.00 for alice bob carol
//! bob paid 12 for alice bob split equal
//! ```

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_till, take_while1},
    character::complete::{char, digit1, space0, space1},
    combinator::{all_consuming, opt, recognize, verify},
    multi::many1,
    sequence::{delimited, preceded},
};
use rust_decimal::Decimal;

const SPLIT_KEYWORD: &str = "split";
const EXPECTED_STATEMENT: &str =
    "expected `group <name>`, `member <id> \"<name>\"` or `<payer> paid <amount> for <ids...>`";

#[derive(Debug, Clone, PartialEq)]
pub struct Expense<'a> {
    pub payer: &'a str,
    pub amount: Decimal,
    pub participants: Vec<&'a str>,
    pub split_policy: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement<'a> {
    Group(&'a str),
    Member { id: &'a str, display_name: &'a str },
    Expense(Expense<'a>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatementWithLine<'a> {
    pub line: usize,
    pub statement: Statement<'a>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ledger<'a> {
    pub statements: Vec<StatementWithLine<'a>>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("Syntax error at line {line}: {detail}")]
    SyntaxError { line: usize, detail: String },
    #[error("Invalid amount '{literal}' at line {line}")]
    InvalidAmount { line: usize, literal: String },
}

enum RawStatement<'a> {
    Group(&'a str),
    Member { id: &'a str, display_name: &'a str },
    Expense {
        payer: &'a str,
        amount: &'a str,
        participants: Vec<&'a str>,
        split_policy: Option<&'a str>,
    },
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | '@')
}

fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(is_identifier_char).parse(input)
}

fn amount_literal(input: &str) -> IResult<&str, &str> {
    recognize((digit1, opt((char('.'), digit1)))).parse(input)
}

fn participant(input: &str) -> IResult<&str, &str> {
    preceded(space1, verify(identifier, |id: &str| id != SPLIT_KEYWORD)).parse(input)
}

fn group_statement(input: &str) -> IResult<&str, RawStatement<'_>> {
    let (input, _) = (tag("group"), space1).parse(input)?;
    let (input, name) = identifier(input)?;
    let (input, _) = space0(input)?;
    Ok((input, RawStatement::Group(name)))
}

fn member_statement(input: &str) -> IResult<&str, RawStatement<'_>> {
    let (input, _) = (tag("member"), space1).parse(input)?;
    let (input, id) = identifier(input)?;
    let (input, _) = space1(input)?;
    let (input, display_name) =
        delimited(char('"'), take_till(|c: char| c == '"'), char('"')).parse(input)?;
    let (input, _) = space0(input)?;
    Ok((input, RawStatement::Member { id, display_name }))
}

fn expense_statement(input: &str) -> IResult<&str, RawStatement<'_>> {
    let (input, payer) = identifier(input)?;
    let (input, _) = (space1, tag("paid"), space1).parse(input)?;
    let (input, amount) = amount_literal(input)?;
    let (input, _) = (space1, tag("for")).parse(input)?;
    let (input, participants) = many1(participant).parse(input)?;
    let (input, split_policy) =
        opt(preceded((space1, tag(SPLIT_KEYWORD), space1), identifier)).parse(input)?;
    let (input, _) = space0(input)?;
    Ok((
        input,
        RawStatement::Expense {
            payer,
            amount,
            participants,
            split_policy,
        },
    ))
}

fn statement(input: &str) -> IResult<&str, RawStatement<'_>> {
    alt((
        all_consuming(group_statement),
        all_consuming(member_statement),
        all_consuming(expense_statement),
    ))
    .parse(input)
}

/// Cuts the line at the first `#` outside a quoted display name.
fn strip_comment(line: &str) -> &str {
    let mut quoted = false;
    for (idx, c) in line.char_indices() {
        match c {
            '"' => quoted = !quoted,
            '#' if !quoted => return &line[..idx],
            _ => {}
        }
    }
    line
}

pub fn parse_ledger(input: &str) -> Result<Ledger<'_>, ParseError> {
    let mut statements = Vec::new();

    for (idx, raw_line) in input.lines().enumerate() {
        let line = idx + 1;
        let content = strip_comment(raw_line).trim();
        if content.is_empty() {
            continue;
        }

        let (_, raw) = statement(content).map_err(|_| ParseError::SyntaxError {
            line,
            detail: EXPECTED_STATEMENT.to_owned(),
        })?;

        let statement = match raw {
            RawStatement::Group(name) => Statement::Group(name),
            RawStatement::Member { id, display_name } => Statement::Member { id, display_name },
            RawStatement::Expense {
                payer,
                amount,
                participants,
                split_policy,
            } => {
                let amount = amount
                    .parse::<Decimal>()
                    .map_err(|_| ParseError::InvalidAmount {
                        line,
                        literal: amount.to_owned(),
                    })?;
                Statement::Expense(Expense {
                    payer,
                    amount,
                    participants,
                    split_policy,
                })
            }
        };

        statements.push(StatementWithLine { line, statement });
    }

    Ok(Ledger { statements })
}
