//! Headline statistics over a wallet's trade history.

use std::cmp::Reverse;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::HistoryError;
use crate::record::{HistoryRecord, Position};

/// Summary numbers for a wallet's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryStats {
    /// Sum of realized `PnL` across all records.
    pub total_pnl: Decimal,
    /// Sum of bought plus sold across all records.
    pub total_volume: Decimal,
    /// Percentage of records with a positive ROI, `0` when empty.
    pub win_rate: Decimal,
    /// Ticker of the record with the highest ROI. The first one wins ties.
    pub best_token: Option<String>,
    /// The highest ROI seen.
    pub max_roi: Option<Decimal>,
    /// Number of records.
    pub count: usize,
}

/// Compute [`HistoryStats`] for `records`.
///
/// # Errors
///
/// Returns [`HistoryError::InvalidNumber`] if any numeric field does not
/// parse, or [`HistoryError::Overflow`] if a total leaves the decimal range.
pub fn compute_stats(records: &[HistoryRecord]) -> Result<HistoryStats, HistoryError> {
    let mut total_pnl = Decimal::ZERO;
    let mut total_volume = Decimal::ZERO;
    let mut wins: usize = 0;
    let mut best: Option<(Decimal, &str)> = None;

    for record in records {
        let position = Position::try_from(record)?;
        total_pnl = total_pnl
            .checked_add(position.pnl)
            .ok_or(HistoryError::Overflow { field: "total_pnl" })?;
        total_volume = total_volume
            .checked_add(position.volume()?)
            .ok_or(HistoryError::Overflow {
                field: "total_volume",
            })?;
        if position.is_win() {
            wins = wins.saturating_add(1);
        }
        match best {
            Some((max_roi, _)) if position.roi <= max_roi => {}
            _ => best = Some((position.roi, record.symbol.as_str())),
        }
    }

    let win_rate = if records.is_empty() {
        Decimal::ZERO
    } else {
        Decimal::from(wins)
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|scaled| scaled.checked_div(Decimal::from(records.len())))
            .ok_or(HistoryError::Overflow { field: "win_rate" })?
    };

    let stats = HistoryStats {
        total_pnl,
        total_volume,
        win_rate,
        best_token: best.map(|(_, symbol)| symbol.to_owned()),
        max_roi: best.map(|(roi, _)| roi),
        count: records.len(),
    };
    debug!(
        count = stats.count,
        total_pnl = %stats.total_pnl,
        win_rate = %stats.win_rate,
        "History stats computed"
    );
    Ok(stats)
}

/// Parse `records` and order them by absolute `PnL`, largest first.
///
/// The sort is stable: records with equal magnitude keep their input order.
///
/// # Errors
///
/// Returns [`HistoryError::InvalidNumber`] if any numeric field does not
/// parse.
pub fn ranked_by_abs_pnl(records: &[HistoryRecord]) -> Result<Vec<Position>, HistoryError> {
    let mut positions = records
        .iter()
        .map(Position::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    positions.sort_by_key(|position| Reverse(position.pnl.abs()));
    Ok(positions)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
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

    fn sample() -> Vec<HistoryRecord> {
        vec![
            record("BONK", "120.50", "300", "420.50", "40.1"),
            record("WIF", "-20", "100", "80", "-20"),
            record("POPCAT", "5", "10", "15", "50"),
            record("MEW", "0", "50", "50", "0"),
        ]
    }

    // -----------------------------------------------------------------------
    // Stats
    // -----------------------------------------------------------------------

    #[test]
    fn totals_are_exact_decimals() {
        let stats = compute_stats(&sample()).unwrap();
        assert_eq!(stats.total_pnl, Decimal::new(10550, 2));
        assert_eq!(stats.total_volume, Decimal::new(102_550, 2));
        assert_eq!(stats.count, 4);
    }

    #[test]
    fn win_rate_counts_positive_roi_only() {
        let stats = compute_stats(&sample()).unwrap();
        // BONK and POPCAT win, MEW at zero does not.
        assert_eq!(stats.win_rate, Decimal::new(50, 0));
    }

    #[test]
    fn best_token_has_highest_roi() {
        let stats = compute_stats(&sample()).unwrap();
        assert_eq!(stats.best_token.as_deref(), Some("POPCAT"));
        assert_eq!(stats.max_roi, Some(Decimal::new(50, 0)));
    }

    #[test]
    fn best_token_tie_keeps_first() {
        let records = vec![
            record("FIRST", "1", "1", "1", "10"),
            record("SECOND", "1", "1", "1", "10"),
        ];
        let stats = compute_stats(&records).unwrap();
        assert_eq!(stats.best_token.as_deref(), Some("FIRST"));
    }

    #[test]
    fn all_losses_still_report_best_token() {
        let records = vec![
            record("A", "-5", "10", "5", "-50"),
            record("B", "-1", "10", "9", "-10"),
        ];
        let stats = compute_stats(&records).unwrap();
        assert_eq!(stats.best_token.as_deref(), Some("B"));
        assert_eq!(stats.win_rate, Decimal::ZERO);
    }

    #[test]
    fn empty_history() {
        let stats = compute_stats(&[]).unwrap();
        assert_eq!(stats.count, 0);
        assert_eq!(stats.win_rate, Decimal::ZERO);
        assert_eq!(stats.total_pnl, Decimal::ZERO);
        assert_eq!(stats.best_token, None);
        assert_eq!(stats.max_roi, None);
    }

    #[test]
    fn bad_number_fails_stats() {
        let records = vec![record("A", "NaN-ish", "1", "1", "1")];
        assert!(matches!(
            compute_stats(&records),
            Err(HistoryError::InvalidNumber { field: "usd_pnl", .. })
        ));
    }

    // -----------------------------------------------------------------------
    // Ranking
    // -----------------------------------------------------------------------

    #[test]
    fn ranking_orders_by_magnitude() {
        let ranked = ranked_by_abs_pnl(&sample()).unwrap();
        let order: Vec<&str> = ranked.iter().map(|p| p.symbol.as_str()).collect();
        assert_eq!(order, vec!["BONK", "WIF", "POPCAT", "MEW"]);
    }

    #[test]
    fn ranking_is_stable_for_equal_magnitude() {
        let records = vec![
            record("LOSS", "-7", "1", "1", "-1"),
            record("GAIN", "7", "1", "1", "1"),
        ];
        let ranked = ranked_by_abs_pnl(&records).unwrap();
        assert_eq!(ranked[0].symbol, "LOSS");
        assert_eq!(ranked[1].symbol, "GAIN");
    }
}
