//! The wallet history API envelope and its records.
//!
//! Records arrive with string-encoded numbers (`"123.45"`, occasionally in
//! scientific notation). [`HistoryRecord`] keeps them as received;
//! [`Position`] is the parsed form used for statistics.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::HistoryError;

/// The JSON envelope returned by the history endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    /// Zero on success.
    pub code: i64,
    /// Human-readable status.
    #[serde(default)]
    pub msg: String,
    /// One record per traded token.
    #[serde(default)]
    pub data: Vec<HistoryRecord>,
}

/// One traded token, exactly as the API reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Token ticker.
    pub symbol: String,
    /// Realized profit or loss in USD.
    pub usd_pnl: String,
    /// Total bought, in USD.
    pub bamt: String,
    /// Total sold, in USD.
    pub samt: String,
    /// Return on investment, in percent.
    pub roi: String,
    /// Token icon URL, if the API has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// A [`HistoryRecord`] with its numbers parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Position {
    /// Token ticker.
    pub symbol: String,
    /// Realized profit or loss in USD.
    pub pnl: Decimal,
    /// Total bought, in USD.
    pub bought: Decimal,
    /// Total sold, in USD.
    pub sold: Decimal,
    /// Return on investment, in percent.
    pub roi: Decimal,
    /// Token icon URL.
    pub icon: Option<String>,
}

impl Position {
    /// Bought plus sold.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::Overflow`] if the sum is not representable.
    pub fn volume(&self) -> Result<Decimal, HistoryError> {
        self.bought
            .checked_add(self.sold)
            .ok_or(HistoryError::Overflow { field: "volume" })
    }

    /// Whether the trade closed with a positive return.
    pub fn is_win(&self) -> bool {
        self.roi > Decimal::ZERO
    }
}

impl TryFrom<&HistoryRecord> for Position {
    type Error = HistoryError;

    fn try_from(record: &HistoryRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            symbol: record.symbol.clone(),
            pnl: parse_decimal("usd_pnl", &record.usd_pnl)?,
            bought: parse_decimal("bamt", &record.bamt)?,
            sold: parse_decimal("samt", &record.samt)?,
            roi: parse_decimal("roi", &record.roi)?,
            icon: record.icon.clone(),
        })
    }
}

/// Parse a history endpoint response body and return its records.
///
/// # Errors
///
/// Returns [`HistoryError::Json`] for malformed payloads and
/// [`HistoryError::Api`] when the envelope carries a non-zero `code`.
pub fn parse_response(body: &str) -> Result<Vec<HistoryRecord>, HistoryError> {
    let response: ApiResponse = serde_json::from_str(body)?;
    if response.code != 0 {
        let msg = if response.msg.is_empty() {
            String::from("unknown API error")
        } else {
            response.msg
        };
        return Err(HistoryError::Api {
            code: response.code,
            msg,
        });
    }
    debug!(records = response.data.len(), "History response parsed");
    Ok(response.data)
}

/// Parse a string-encoded decimal, accepting plain and scientific notation.
fn parse_decimal(field: &'static str, raw: &str) -> Result<Decimal, HistoryError> {
    let trimmed = raw.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
        .ok_or_else(|| HistoryError::InvalidNumber {
            field,
            value: raw.to_owned(),
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn record(symbol: &str, pnl: &str, bamt: &str, samt: &str, roi: &str) -> HistoryRecord {
        HistoryRecord {
            symbol: symbol.to_owned(),
            usd_pnl: pnl.to_owned(),
            bamt: bamt.to_owned(),
            samt: samt.to_owned(),
            roi: roi.to_owned(),
            icon: None,
        }
    }

    // -----------------------------------------------------------------------
    // Envelope
    // -----------------------------------------------------------------------

    #[test]
    fn parses_successful_envelope() {
        let body = r#"{
            "code": 0,
            "msg": "success",
            "data": [
                {"symbol": "BONK", "usd_pnl": "12.5", "bamt": "100", "samt": "112.5", "roi": "12.5", "icon": "https://x/bonk.png"},
                {"symbol": "WIF", "usd_pnl": "-3", "bamt": "10", "samt": "7", "roi": "-30"}
            ]
        }"#;
        let records = parse_response(body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].icon.as_deref(), Some("https://x/bonk.png"));
        assert_eq!(records[1].icon, None);
    }

    #[test]
    fn non_zero_code_is_an_api_error() {
        let body = r#"{"code": 1001, "msg": "wallet not found", "data": []}"#;
        match parse_response(body) {
            Err(HistoryError::Api { code, msg }) => {
                assert_eq!(code, 1001);
                assert_eq!(msg, "wallet not found");
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[test]
    fn empty_message_gets_a_fallback() {
        let body = r#"{"code": 5}"#;
        match parse_response(body) {
            Err(HistoryError::Api { msg, .. }) => assert_eq!(msg, "unknown API error"),
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(
            parse_response("{\"code\": 0, \"data\": [1, 2]"),
            Err(HistoryError::Json { .. })
        ));
    }

    #[test]
    fn missing_data_is_empty() {
        assert!(parse_response(r#"{"code": 0, "msg": "ok"}"#).unwrap().is_empty());
    }

    // -----------------------------------------------------------------------
    // Number parsing
    // -----------------------------------------------------------------------

    #[test]
    fn position_parses_plain_and_scientific_numbers() {
        let position = Position::try_from(&record("PEPE", " 1.5e3 ", "2000", "3500", "75")).unwrap();
        assert_eq!(position.pnl, Decimal::new(1500, 0));
        assert_eq!(position.volume().unwrap(), Decimal::new(5500, 0));
        assert!(position.is_win());
    }

    #[test]
    fn zero_roi_is_not_a_win() {
        let position = Position::try_from(&record("X", "0", "1", "1", "0")).unwrap();
        assert!(!position.is_win());
    }

    #[test]
    fn invalid_number_names_the_field() {
        let err = Position::try_from(&record("X", "1", "abc", "1", "0")).unwrap_err();
        match err {
            HistoryError::InvalidNumber { field, value } => {
                assert_eq!(field, "bamt");
                assert_eq!(value, "abc");
            }
            other => panic!("expected InvalidNumber, got {other:?}"),
        }
    }
}
