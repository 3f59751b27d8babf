//! Wallet trade history for the `AuraPnL` blob battle.
//!
//! The history API returns one record per traded token with every numeric
//! field encoded as a string. This crate parses that envelope, converts
//! the numbers to [`Decimal`], and derives the headline statistics shown
//! next to the battle.
//!
//! - [`record`] -- The API envelope, raw records, and parsed positions.
//! - [`stats`] -- [`HistoryStats`] and ranking by absolute `PnL`.
//!
//! All arithmetic uses [`Decimal`] with checked operations. Nothing in this
//! crate panics; malformed input is reported through [`HistoryError`].
//!
//! # Usage
//!
//! ```
//! use aurapnl_history::{compute_stats, parse_response};
//!
//! let body = r#"{
//!     "code": 0,
//!     "msg": "ok",
//!     "data": [
//!         { "symbol": "BONK", "usd_pnl": "120.5", "bamt": "300", "samt": "420.5", "roi": "40.1" },
//!         { "symbol": "WIF", "usd_pnl": "-20", "bamt": "100", "samt": "80", "roi": "-20" }
//!     ]
//! }"#;
//!
//! let records = parse_response(body).unwrap_or_default();
//! let stats = compute_stats(&records).ok();
//! assert_eq!(stats.map(|s| s.count), Some(2));
//! ```
//!
//! [`Decimal`]: rust_decimal::Decimal

pub mod record;
pub mod stats;

pub use record::{ApiResponse, HistoryRecord, Position, parse_response};
pub use stats::{HistoryStats, compute_stats, ranked_by_abs_pnl};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when reading wallet history.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    /// The payload is not valid JSON or does not match the envelope.
    #[error("history payload is not valid JSON: {source}")]
    Json {
        /// The underlying `serde_json` error.
        #[from]
        source: serde_json::Error,
    },

    /// The API answered with a non-zero status code.
    #[error("history API error {code}: {msg}")]
    Api {
        /// Status code reported by the API.
        code: i64,
        /// Message reported by the API.
        msg: String,
    },

    /// A numeric field could not be parsed as a decimal.
    #[error("field {field} has non-numeric value {value:?}")]
    InvalidNumber {
        /// Name of the offending field.
        field: &'static str,
        /// The raw string.
        value: String,
    },

    /// A running total left the representable decimal range.
    #[error("overflow while summing {field}")]
    Overflow {
        /// Name of the total that overflowed.
        field: &'static str,
    },
}
