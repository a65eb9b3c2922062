//! Property tests for signal and engine invariants.
//!
//! Uses proptest to verify:
//! 1. Signal range — every defined signal lies in [-1, 1]
//! 2. Dead band — signals strictly inside (-0.5, 0.5) never act
//! 3. Long-only alternation — fills per symbol alternate BUY, SELL, BUY, ...
//! 4. Cash identity — final cash reconciles with trades and open positions
//! 5. P&L sign — frictionless trade P&L has the sign of the price move
//! 6. Cost-adjusted prices — with costs on, `pnl > 0` iff exit > entry

use alphalab_core::domain::{Bar, InstrumentSeries, OrderSide, PositionState};
use alphalab_core::engine::{decide, run_backtest, Action, CostModel, EngineConfig, SignalScope};
use alphalab_core::signal::signal_at;
use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_price() -> impl Strategy<Value = f64> {
    (10.0..500.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

fn arb_volume() -> impl Strategy<Value = f64> {
    (0.0..10_000.0_f64).prop_map(|v| v.round())
}

fn arb_bars(max_len: usize) -> impl Strategy<Value = Vec<Bar>> {
    prop::collection::vec((arb_price(), arb_volume()), 2..max_len).prop_map(|rows| {
        let base = NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        rows.into_iter()
            .enumerate()
            .map(|(i, (open, volume))| Bar {
                timestamp: base + Duration::days(i as i64),
                open,
                high: open * 1.01,
                low: open * 0.99,
                close: open,
                volume,
            })
            .collect()
    })
}

fn arb_state() -> impl Strategy<Value = PositionState> {
    prop_oneof![Just(PositionState::Flat), Just(PositionState::Long)]
}

// ── 1. Signal range ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn signal_is_nan_or_bounded(bars in arb_bars(60), lookback in 2usize..15) {
        for i in 0..bars.len() {
            let s = signal_at(&bars, i, lookback);
            prop_assert!(s.is_nan() || (-1.0..=1.0).contains(&s));
            if i + 1 < lookback {
                prop_assert!(s.is_nan());
            }
        }
    }
}

// ── 2. Dead band ─────────────────────────────────────────────────────

proptest! {
    #[test]
    fn dead_band_holds(signal in -0.5..0.5_f64, state in arb_state()) {
        prop_assert_eq!(decide(signal, state), Action::Hold);
    }

    #[test]
    fn nan_always_holds(state in arb_state()) {
        prop_assert_eq!(decide(f64::NAN, state), Action::Hold);
    }
}

// ── 3-5. Engine invariants ───────────────────────────────────────────

proptest! {
    #[test]
    fn fills_alternate_per_symbol(
        a in arb_bars(80),
        b in arb_bars(80),
        lookback in 2usize..8,
    ) {
        let series = vec![
            InstrumentSeries::new("AAA", a).unwrap(),
            InstrumentSeries::new("BBB", b).unwrap(),
        ];
        let config = EngineConfig::new(1_000_000.0, lookback)
            .with_scope(SignalScope::PerInstrument);
        let result = run_backtest(series, &config).unwrap();

        for symbol in ["AAA", "BBB"] {
            let sides: Vec<OrderSide> = result
                .fills
                .iter()
                .filter(|f| f.symbol == symbol)
                .map(|f| f.side)
                .collect();
            for (k, side) in sides.iter().enumerate() {
                let expected = if k % 2 == 0 { OrderSide::Buy } else { OrderSide::Sell };
                prop_assert_eq!(*side, expected);
            }
        }
        let sells = result.fills.iter().filter(|f| f.side == OrderSide::Sell).count();
        prop_assert_eq!(result.trades.len(), sells);
    }

    #[test]
    fn cash_reconciles(bars in arb_bars(80), lookback in 2usize..8) {
        let series = vec![InstrumentSeries::new("AAA", bars).unwrap()];
        let config = EngineConfig::new(100_000.0, lookback);
        let result = run_backtest(series, &config).unwrap();

        let realized: f64 = result.trades.iter().map(|t| t.pnl).sum();
        let committed: f64 = result
            .open_positions
            .iter()
            .map(|p| p.quantity * p.entry_price + p.entry_costs())
            .sum();
        let expected = result.starting_cash + realized - committed;
        prop_assert!((result.final_cash - expected).abs() < 1e-6);
    }

    #[test]
    fn frictionless_pnl_follows_price_move(bars in arb_bars(80), lookback in 2usize..8) {
        let series = vec![InstrumentSeries::new("AAA", bars).unwrap()];
        let config = EngineConfig::new(100_000.0, lookback)
            .with_costs(CostModel::frictionless());
        let result = run_backtest(series, &config).unwrap();
        for trade in &result.trades {
            let delta = trade.exit_price - trade.entry_price;
            prop_assert!((trade.pnl - delta * trade.quantity).abs() < 1e-9);
            prop_assert_eq!(trade.entry_price, trade.entry_fill_price);
            prop_assert!(trade.exit_index > trade.entry_index);
        }
    }

    #[test]
    fn pnl_sign_matches_cost_adjusted_prices(bars in arb_bars(80), lookback in 2usize..8) {
        let series = vec![InstrumentSeries::new("AAA", bars).unwrap()];
        let result = run_backtest(series, &EngineConfig::new(100_000.0, lookback)).unwrap();
        for trade in &result.trades {
            prop_assert_eq!(trade.pnl > 0.0, trade.exit_price > trade.entry_price);
            prop_assert!(trade.entry_price > trade.entry_fill_price);
            prop_assert!(trade.exit_price < trade.exit_fill_price);
            let net = trade.gross_pnl() - trade.total_costs();
            prop_assert!((trade.pnl - net).abs() < 1e-6);
        }
    }
}

// Opens drift up by less than the round-trip costs: the trade loses money
// even though the raw exit fill is above the raw entry fill.
#[test]
fn small_gain_below_costs_has_consistent_sign() {
    let base = NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let bars = [(99.0, 1.0), (100.0, 2.0), (100.05, 3.0), (100.10, 1.0)]
        .iter()
        .enumerate()
        .map(|(i, &(open, volume))| Bar {
            timestamp: base + Duration::days(i as i64),
            open,
            high: open,
            low: open,
            close: open,
            volume,
        })
        .collect();
    let series = InstrumentSeries::new("AAA", bars).unwrap();
    let result = run_backtest(vec![series], &EngineConfig::new(1_000.0, 2)).unwrap();

    assert_eq!(result.trades.len(), 1);
    let trade = &result.trades[0];
    assert!(trade.exit_fill_price > trade.entry_fill_price);
    assert!(trade.pnl < 0.0);
    assert!(trade.exit_price < trade.entry_price);
}
