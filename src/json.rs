//! JSON wire layer: one event in, one result out, per line.
//!
//! Input lines are externally-tagged objects, either
//! `{"account": {"active": bool, "limit": int}}` or
//! `{"transaction": {"merchant": str, "amount": int, "time": iso8601}}`.
//! Results are rendered as
//! `{"account": {"active": bool, "availableLimit": int}, "violations": [..]}`.
//!
//! Classification and schema checking happen entirely here; the engine only
//! ever sees well-formed [`Event`]s.

use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Write};
use thiserror::Error;

use crate::clock::{self, TimestampError};
use crate::engine::Authorization;
use crate::model::{Event, Transaction, Violation};

/// Errors that can occur while reading event lines.
#[derive(Debug, Error)]
pub enum WireError {
    #[error("line {line}: read failed: {source}")]
    Io { line: usize, source: io::Error },

    #[error("line {line}: not a recognizable event: {source}")]
    Parse {
        line: usize,
        source: serde_json::Error,
    },

    #[error("line {line}: bad timestamp: {source}")]
    Timestamp {
        line: usize,
        source: TimestampError,
    },
}

#[derive(Debug, Deserialize)]
enum EventRow {
    #[serde(rename = "account")]
    Account { active: bool, limit: i64 },
    #[serde(rename = "transaction")]
    Transaction {
        merchant: String,
        amount: i64,
        time: String,
    },
}

#[derive(Debug, Serialize)]
struct AccountRow {
    active: bool,
    #[serde(rename = "availableLimit")]
    available_limit: i64,
}

#[derive(Debug, Serialize)]
struct OutcomeRow<'a> {
    account: AccountRow,
    violations: &'a [Violation],
}

/// Read events line by line from a buffered reader.
///
/// Blank lines yield nothing. Unparseable or unclassifiable lines, and
/// transactions with malformed timestamps, yield an error item; callers are
/// expected to log it and keep going.
pub fn read_events(reader: impl BufRead) -> impl Iterator<Item = Result<Event, WireError>> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(idx, result)| {
            let line = idx + 1;
            let text = match result {
                Ok(text) => text,
                Err(source) => return Some(Err(WireError::Io { line, source })),
            };
            if text.trim().is_empty() {
                return None;
            }
            Some(parse_event(line, text.trim()))
        })
}

fn parse_event(line: usize, text: &str) -> Result<Event, WireError> {
    let row: EventRow =
        serde_json::from_str(text).map_err(|source| WireError::Parse { line, source })?;

    match row {
        EventRow::Account { active, limit } => Ok(Event::Account { active, limit }),
        EventRow::Transaction {
            merchant,
            amount,
            time,
        } => {
            let timestamp_millis = clock::parse_epoch_millis(&time)
                .map_err(|source| WireError::Timestamp { line, source })?;
            Ok(Event::Transaction(Transaction {
                amount,
                merchant,
                timestamp_millis,
            }))
        }
    }
}

/// Render one outcome as a JSON line.
pub fn write_outcome(out: &mut impl Write, outcome: &Authorization) -> io::Result<()> {
    let row = OutcomeRow {
        account: AccountRow {
            active: outcome.account.active,
            available_limit: outcome.account.available_limit,
        },
        violations: &outcome.violations,
    };
    serde_json::to_writer(&mut *out, &row)?;
    out.write_all(b"\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Account;

    fn parse_all(input: &str) -> Vec<Result<Event, WireError>> {
        read_events(input.as_bytes()).collect()
    }

    #[test]
    fn reads_account_event() {
        let results = parse_all(r#"{"account":{"active":true,"limit":100}}"#);
        assert_eq!(results.len(), 1);
        match results.into_iter().next().unwrap().unwrap() {
            Event::Account { active, limit } => {
                assert!(active);
                assert_eq!(limit, 100);
            }
            other => panic!("expected account event, got {other:?}"),
        }
    }

    #[test]
    fn reads_transaction_event_with_millis() {
        let results = parse_all(
            r#"{"transaction":{"merchant":"Burger King","amount":20,"time":"2019-02-13T10:00:00.911Z"}}"#,
        );
        match results.into_iter().next().unwrap().unwrap() {
            Event::Transaction(tx) => {
                assert_eq!(tx.merchant, "Burger King");
                assert_eq!(tx.amount, 20);
                assert_eq!(tx.timestamp_millis % 1000, 911);
            }
            other => panic!("expected transaction event, got {other:?}"),
        }
    }

    #[test]
    fn blank_lines_are_skipped() {
        let results = parse_all("\n   \n{\"account\":{\"active\":true,\"limit\":1}}\n\n");
        assert_eq!(results.len(), 1);
        assert!(results[0].is_ok());
    }

    #[test]
    fn leading_whitespace_is_tolerated() {
        let results = parse_all("   {\"account\":{\"active\":true,\"limit\":1}}");
        assert_eq!(results.len(), 1);
        assert!(results[0].is_ok());
    }

    #[test]
    fn invalid_json_is_a_parse_error_with_line_number() {
        let results = parse_all("{\"account\":{\"active\":true,\"limit\":1}}\nnot json\n");
        assert_eq!(results.len(), 2);
        assert!(matches!(
            results[1],
            Err(WireError::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn unclassifiable_object_is_a_parse_error() {
        let results = parse_all(r#"{"something":{"weird":true}}"#);
        assert!(matches!(results[0], Err(WireError::Parse { line: 1, .. })));
    }

    #[test]
    fn non_integer_amount_is_a_parse_error() {
        let results =
            parse_all(r#"{"transaction":{"merchant":"BK","amount":"20","time":"2019-02-13T10:00:00Z"}}"#);
        assert!(matches!(results[0], Err(WireError::Parse { .. })));
    }

    #[test]
    fn bad_timestamp_is_a_timestamp_error() {
        let results =
            parse_all(r#"{"transaction":{"merchant":"BK","amount":20,"time":"yesterday"}}"#);
        assert!(matches!(
            results[0],
            Err(WireError::Timestamp { line: 1, .. })
        ));
    }

    #[test]
    fn outcome_renders_expected_shape() {
        let outcome = Authorization {
            account: Account::new(true, 100),
            violations: vec![Violation::InsufficientLimit, Violation::DoubledTransaction],
        };

        let mut buf = Vec::new();
        write_outcome(&mut buf, &outcome).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "{\"account\":{\"active\":true,\"availableLimit\":100},\"violations\":[\"insufficient-limit\",\"doubled-transaction\"]}\n"
        );
    }

    #[test]
    fn clean_outcome_renders_empty_violations() {
        let outcome = Authorization {
            account: Account::new(false, 0),
            violations: Vec::new(),
        };

        let mut buf = Vec::new();
        write_outcome(&mut buf, &outcome).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "{\"account\":{\"active\":false,\"availableLimit\":0},\"violations\":[]}\n"
        );
    }
}
