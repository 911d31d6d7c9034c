//! Aggregate statistics over a set of closed trades.

use crate::domain::TradeRecord;
use serde::{Deserialize, Serialize};

/// Summary of one backtest run.
///
/// PnL figures are per-unit, in quote currency. Breakeven trades count
/// toward the total but are neither winners nor losers. `max_drawdown` and
/// `avg_loss` are reported as positive magnitudes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestResult {
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub win_rate: f64,
    pub net_profit: f64,
    pub gross_profit: f64,
    pub gross_loss: f64,
    /// Gross profit over gross loss; 0 when there are no losses.
    pub profit_factor: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    /// Largest peak-to-trough decline of the cumulative PnL curve.
    pub max_drawdown: f64,
    /// Mean per-trade PnL over its population standard deviation; 0 with
    /// fewer than two trades or zero variance.
    pub sharpe_ratio: f64,
}

impl BacktestResult {
    pub fn from_trades(trades: &[TradeRecord]) -> Self {
        let total_trades = trades.len();
        let mut winning_trades = 0;
        let mut losing_trades = 0;
        let mut gross_profit = 0.0;
        let mut gross_loss = 0.0;

        for trade in trades {
            if trade.pnl > 0.0 {
                winning_trades += 1;
                gross_profit += trade.pnl;
            } else if trade.pnl < 0.0 {
                losing_trades += 1;
                gross_loss += -trade.pnl;
            }
        }

        let win_rate = if total_trades > 0 {
            winning_trades as f64 / total_trades as f64
        } else {
            0.0
        };
        let profit_factor = if gross_loss > 0.0 {
            gross_profit / gross_loss
        } else {
            0.0
        };
        let avg_win = if winning_trades > 0 {
            gross_profit / winning_trades as f64
        } else {
            0.0
        };
        let avg_loss = if losing_trades > 0 {
            gross_loss / losing_trades as f64
        } else {
            0.0
        };

        let mut peak = 0.0_f64;
        let mut cumulative = 0.0_f64;
        let mut max_drawdown = 0.0_f64;
        for trade in trades {
            cumulative += trade.pnl;
            peak = peak.max(cumulative);
            max_drawdown = max_drawdown.max(peak - cumulative);
        }

        let sharpe_ratio = if total_trades >= 2 {
            let mean = trades.iter().map(|t| t.pnl).sum::<f64>() / total_trades as f64;
            let variance = trades
                .iter()
                .map(|t| (t.pnl - mean).powi(2))
                .sum::<f64>()
                / total_trades as f64;
            let stdev = variance.sqrt();
            if stdev > 0.0 {
                mean / stdev
            } else {
                0.0
            }
        } else {
            0.0
        };

        BacktestResult {
            total_trades,
            winning_trades,
            losing_trades,
            win_rate,
            net_profit: gross_profit - gross_loss,
            gross_profit,
            gross_loss,
            profit_factor,
            avg_win,
            avg_loss,
            max_drawdown,
            sharpe_ratio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ExitReason, Side};
    use chrono::{TimeZone, Utc};

    fn make_trade(pnl: f64) -> TradeRecord {
        let entry_time = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        TradeRecord {
            symbol: "BTCUSDT".into(),
            side: Side::Long,
            entry_price: 100.0,
            entry_time,
            exit_price: 100.0 + pnl,
            exit_time: entry_time + chrono::Duration::minutes(30),
            exit_reason: ExitReason::TakeProfit,
            pnl,
            duration_ms: 30 * 60 * 1000,
        }
    }

    #[test]
    fn empty_run_is_all_zeros() {
        let r = BacktestResult::from_trades(&[]);
        assert_eq!(r.total_trades, 0);
        assert_eq!(r.win_rate, 0.0);
        assert_eq!(r.profit_factor, 0.0);
        assert_eq!(r.sharpe_ratio, 0.0);
        assert_eq!(r.max_drawdown, 0.0);
    }

    #[test]
    fn mixed_run_aggregates() {
        let trades: Vec<_> = [5.0, -2.0, 3.0, -1.0].iter().map(|&p| make_trade(p)).collect();
        let r = BacktestResult::from_trades(&trades);
        assert_eq!(r.total_trades, 4);
        assert_eq!(r.winning_trades, 2);
        assert_eq!(r.losing_trades, 2);
        assert!((r.win_rate - 0.5).abs() < 1e-12);
        assert!((r.net_profit - 5.0).abs() < 1e-12);
        assert!((r.gross_profit - 8.0).abs() < 1e-12);
        assert!((r.gross_loss - 3.0).abs() < 1e-12);
        assert!((r.profit_factor - 8.0 / 3.0).abs() < 1e-12);
        assert!((r.avg_win - 4.0).abs() < 1e-12);
        assert!((r.avg_loss - 1.5).abs() < 1e-12);
        // Cumulative walk: 5, 3, 6, 5 → worst decline is 5 → 3.
        assert!((r.max_drawdown - 2.0).abs() < 1e-12);
        let expected_sharpe = 1.25 / (32.75_f64 / 4.0).sqrt();
        assert!((r.sharpe_ratio - expected_sharpe).abs() < 1e-12);
    }

    #[test]
    fn no_losses_zeroes_profit_factor() {
        let trades: Vec<_> = [2.0, 4.0].iter().map(|&p| make_trade(p)).collect();
        let r = BacktestResult::from_trades(&trades);
        assert_eq!(r.profit_factor, 0.0);
        assert_eq!(r.avg_loss, 0.0);
        assert_eq!(r.max_drawdown, 0.0);
    }

    #[test]
    fn breakeven_trade_is_neither_win_nor_loss() {
        let trades: Vec<_> = [1.0, 0.0, -1.0].iter().map(|&p| make_trade(p)).collect();
        let r = BacktestResult::from_trades(&trades);
        assert_eq!(r.total_trades, 3);
        assert_eq!(r.winning_trades, 1);
        assert_eq!(r.losing_trades, 1);
        assert!((r.win_rate - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn identical_pnls_zero_sharpe() {
        let trades: Vec<_> = [2.0, 2.0, 2.0].iter().map(|&p| make_trade(p)).collect();
        let r = BacktestResult::from_trades(&trades);
        assert_eq!(r.sharpe_ratio, 0.0);
    }

    #[test]
    fn single_trade_zero_sharpe() {
        let r = BacktestResult::from_trades(&[make_trade(3.0)]);
        assert_eq!(r.sharpe_ratio, 0.0);
        assert_eq!(r.total_trades, 1);
    }
}
