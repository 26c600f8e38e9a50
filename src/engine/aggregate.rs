//! Folding enriched positions into the summary report.

use crate::domain::{EnrichedPosition, PRICE_PRECISION};
use alloy::primitives::{uint, I256, U256};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// PRICE_PRECISION * 1000: closing fees are estimated at 0.1% of notional.
const CLOSING_FEE_DIVISOR: U256 = uint!(1_000_000_000_000_000_000_000_000_000_000_000_U256);

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReportError {
    #[error("aggregate {0} overflowed")]
    Overflow(&'static str),
    #[error("aggregate {0} does not fit a 64-bit report field")]
    OutOfRange(&'static str),
}

/// Explicit fold state over enriched positions.
///
/// All USD totals are fixed-point at PRICE_PRECISION scale; the count is
/// tracked explicitly so an empty input yields a zero report rather than
/// an undefined one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Totals {
    count: u64,
    size: U256,
    fee: U256,
    realised_pnl: I256,
    funding_fee: I256,
    unrealized_delta: U256,
}

impl Totals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one position's contributions to every running total.
    pub fn accumulate(&mut self, enriched: &EnrichedPosition) -> Result<(), ReportError> {
        self.count += 1;
        self.size = add_unsigned(self.size, enriched.position.size, "size")?;
        self.fee = add_unsigned(self.fee, enriched.position.fee, "paid fees")?;
        self.realised_pnl = add_signed(
            self.realised_pnl,
            enriched.position.realised_pnl,
            "realised pnl",
        )?;
        self.funding_fee = add_signed(self.funding_fee, enriched.funding_fee, "funding fees")?;
        self.unrealized_delta = add_unsigned(
            self.unrealized_delta,
            enriched.unrealized_delta,
            "unrealized delta",
        )?;
        Ok(())
    }

    /// Collapse the totals into whole-dollar report fields.
    ///
    /// Each total is divided by PRICE_PRECISION and rounded half away from
    /// zero; closing fees divide by a further 1000.
    pub fn into_report(self) -> Result<SummaryReport, ReportError> {
        Ok(SummaryReport {
            open_positions_count: self.count,
            total_open_interest: round_unsigned(self.size, PRICE_PRECISION, "open interest")?,
            realised_pnl: round_signed(self.realised_pnl, PRICE_PRECISION, "realised pnl")?,
            unrealized_pnl: round_unsigned(
                self.unrealized_delta,
                PRICE_PRECISION,
                "unrealized pnl",
            )?,
            paid_fees: round_unsigned(self.fee, PRICE_PRECISION, "paid fees")?,
            outstanding_borrow_fees: round_signed(
                self.funding_fee,
                PRICE_PRECISION,
                "borrow fees",
            )?,
            closing_fees: round_unsigned(self.size, CLOSING_FEE_DIVISOR, "closing fees")?,
        })
    }
}

/// Fold a full position list into its report.
pub fn aggregate(positions: &[EnrichedPosition]) -> Result<SummaryReport, ReportError> {
    let mut totals = Totals::new();
    for enriched in positions {
        totals.accumulate(enriched)?;
    }
    totals.into_report()
}

/// The snapshot's sole output: whole-dollar totals over all open positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SummaryReport {
    pub open_positions_count: u64,
    pub total_open_interest: i64,
    pub realised_pnl: i64,
    pub unrealized_pnl: i64,
    pub paid_fees: i64,
    pub outstanding_borrow_fees: i64,
    pub closing_fees: i64,
}

impl fmt::Display for SummaryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Stats for open 10k+ positions")?;
        writeln!(
            f,
            "Open positions count: {}",
            group_thousands(self.open_positions_count as i64)
        )?;
        writeln!(
            f,
            "Total positions size: {}",
            group_thousands(self.total_open_interest)
        )?;
        writeln!(f, "Realized PnL: {}", group_thousands(self.realised_pnl))?;
        writeln!(f, "Unrealized PnL: {}", group_thousands(self.unrealized_pnl))?;
        writeln!(f, "Paid fees: {}", group_thousands(self.paid_fees))?;
        writeln!(
            f,
            "Outstanding borrow fees: {}",
            group_thousands(self.outstanding_borrow_fees)
        )?;
        write!(f, "Closing fees: {}", group_thousands(self.closing_fees))
    }
}

fn add_unsigned(total: U256, value: U256, field: &'static str) -> Result<U256, ReportError> {
    total.checked_add(value).ok_or(ReportError::Overflow(field))
}

fn add_signed(total: I256, value: I256, field: &'static str) -> Result<I256, ReportError> {
    total.checked_add(value).ok_or(ReportError::Overflow(field))
}

/// `round(total / divisor)` to the nearest integer, half rounding up.
fn round_unsigned(total: U256, divisor: U256, field: &'static str) -> Result<i64, ReportError> {
    let adjusted = total
        .checked_add(divisor / U256::from(2u64))
        .ok_or(ReportError::Overflow(field))?;
    i64::try_from(adjusted / divisor).map_err(|_| ReportError::OutOfRange(field))
}

/// `round(total / divisor)` to the nearest integer, half away from zero.
fn round_signed(total: I256, divisor: U256, field: &'static str) -> Result<i64, ReportError> {
    let divisor = I256::try_from(divisor).map_err(|_| ReportError::OutOfRange(field))?;
    let half = divisor.asr(1);
    let adjusted = if total.is_negative() {
        total.checked_sub(half)
    } else {
        total.checked_add(half)
    }
    .ok_or(ReportError::Overflow(field))?;
    i64::try_from(adjusted / divisor).map_err(|_| ReportError::OutOfRange(field))
}

fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}
