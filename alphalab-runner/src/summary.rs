//! Plain-text rendering of a backtest result.

use std::fmt::{self, Write};

use crate::runner::BacktestResult;
use crate::sweep::SweepRow;

/// Render the summary block printed by the CLI.
pub fn render_summary(result: &BacktestResult) -> String {
    let mut out = String::new();
    // fmt::Write for String is infallible
    let _ = write_summary(&mut out, result);
    out
}

fn write_summary(out: &mut String, result: &BacktestResult) -> fmt::Result {
    let report = &result.report;
    writeln!(out)?;
    writeln!(out, "=== Backtest Result ===")?;
    writeln!(
        out,
        "Instruments:    {} (primary: {}, scope: {:?})",
        result.symbols.len(),
        result.primary_symbol().unwrap_or("-"),
        result.config.signal_scope
    )?;
    if let (Some(start), Some(end)) = (result.start, result.end) {
        writeln!(out, "Period:         {start} to {end}")?;
    }
    writeln!(
        out,
        "Bars:           {} steps ({} lookback)",
        result.steps, result.config.lookback_period
    )?;
    writeln!(out, "Signals:        {}", result.signal_count)?;
    writeln!(out, "Trades:         {}", report.trade_count)?;
    writeln!(out, "Open Positions: {}", result.open_positions.len())?;
    writeln!(out)?;
    writeln!(out, "--- Performance ---")?;
    writeln!(out, "Starting Value: {:.2}", report.initial_value)?;
    writeln!(out, "Final Value:    {:.2}", report.final_value)?;
    writeln!(out, "Total Return:   {:.4}%", report.total_return_pct)?;
    writeln!(out, "Sharpe:         {:.3}", report.sharpe)?;
    writeln!(out, "Sortino:        {:.3}", report.sortino)?;
    writeln!(out, "Max Drawdown:   {:.2}% (trade-level)", report.max_drawdown_pct)?;
    writeln!(out, "Equity DD:      {:.2}%", report.equity_drawdown_pct)?;
    writeln!(out, "Hit Ratio:      {:.1}%", report.hit_ratio_pct)?;
    writeln!(out, "Commission:     {:.2}", result.total_commission)?;
    writeln!(out, "Slippage:       {:.2}", result.total_slippage)?;
    let short_hash = result.dataset_hash.get(..12).unwrap_or(&result.dataset_hash);
    writeln!(out, "Dataset:        {short_hash}")?;
    for skipped in &result.skipped {
        writeln!(out, "SKIPPED: {} ({})", skipped.symbol, skipped.reason)?;
    }
    Ok(())
}

/// Render sweep rows as an aligned table.
pub fn render_sweep(rows: &[SweepRow]) -> String {
    let mut out = String::new();
    let _ = write_sweep(&mut out, rows);
    out
}

fn write_sweep(out: &mut String, rows: &[SweepRow]) -> fmt::Result {
    writeln!(
        out,
        "{:>8} {:>7} {:>12} {:>8} {:>8} {:>10} {:>8}",
        "lookback", "trades", "return %", "sharpe", "sortino", "maxdd %", "hit %"
    )?;
    for row in rows {
        let r = &row.report;
        writeln!(
            out,
            "{:>8} {:>7} {:>12.4} {:>8.3} {:>8.3} {:>10.2} {:>8.1}",
            row.lookback_period,
            r.trade_count,
            r.total_return_pct,
            r.sharpe,
            r.sortino,
            r.max_drawdown_pct,
            r.hit_ratio_pct
        )?;
    }
    Ok(())
}
