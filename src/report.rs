use chrono::{Duration, Local, NaiveDate, TimeZone};
use std::collections::{BTreeMap, HashMap};

use crate::error::{AppError, Result};
use crate::models::{
    Aggregation, DailyBucket, MethodBucket, PaymentRecord, PaymentReport, PaymentStatus,
    PaymentSummary,
};

/// Chart colors for payment methods, cycled in order of first appearance
pub const METHOD_PALETTE: &[&str] = &[
    "#ec4899", // pink
    "#8b5cf6", // violet
    "#3b82f6", // blue
    "#10b981", // emerald
    "#f59e0b", // amber
    "#ef4444", // red
    "#14b8a6", // teal
    "#6366f1", // indigo
];

/// Which records a report covers, relative to "today"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFilter {
    Today,
    Week,
    Month,
    Quarter,
    Year,
    All,
    Range { from: NaiveDate, to: NaiveDate },
}

impl DateFilter {
    pub fn parse(period: &str) -> Result<Self> {
        match period.trim().to_lowercase().as_str() {
            "today" => Ok(DateFilter::Today),
            "week" | "7d" => Ok(DateFilter::Week),
            "month" | "30d" => Ok(DateFilter::Month),
            "quarter" | "90d" => Ok(DateFilter::Quarter),
            "year" | "365d" => Ok(DateFilter::Year),
            "all" => Ok(DateFilter::All),
            other => Err(AppError::InvalidDate(format!(
                "Unknown period: {}. Use today, week, month, quarter, year or all",
                other
            ))),
        }
    }

    pub fn range(from: NaiveDate, to: NaiveDate) -> Result<Self> {
        if from > to {
            return Err(AppError::InvalidDate(
                "Start date must be before or equal to end date".to_string(),
            ));
        }
        Ok(DateFilter::Range { from, to })
    }

    /// Inclusive date bounds, `None` for an unbounded filter
    pub fn bounds(&self, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        let last_days = |n: i64| Some((today - Duration::days(n - 1), today));
        match *self {
            DateFilter::Today => Some((today, today)),
            DateFilter::Week => last_days(7),
            DateFilter::Month => last_days(30),
            DateFilter::Quarter => last_days(90),
            DateFilter::Year => last_days(365),
            DateFilter::All => None,
            DateFilter::Range { from, to } => Some((from, to)),
        }
    }

    pub fn label(&self) -> String {
        match self {
            DateFilter::Today => "today".to_string(),
            DateFilter::Week => "week".to_string(),
            DateFilter::Month => "month".to_string(),
            DateFilter::Quarter => "quarter".to_string(),
            DateFilter::Year => "year".to_string(),
            DateFilter::All => "all".to_string(),
            DateFilter::Range { from, to } => format!("{}..{}", from, to),
        }
    }
}

/// Calendar day of a record in the given time zone
fn day_key<Tz: TimeZone>(record: &PaymentRecord, tz: &Tz) -> NaiveDate {
    record.created_at.with_timezone(tz).date_naive()
}

fn percent(part: f64, whole: f64) -> f64 {
    if whole == 0.0 { 0.0 } else { part / whole * 100.0 }
}

fn mean(total: f64, count: u64) -> f64 {
    if count == 0 { 0.0 } else { total / count as f64 }
}

/// Keep only the records whose day falls inside the filter
pub fn filter_records<Tz: TimeZone>(
    records: &[PaymentRecord],
    filter: &DateFilter,
    today: NaiveDate,
    tz: &Tz,
) -> Vec<PaymentRecord> {
    match filter.bounds(today) {
        None => records.to_vec(),
        Some((from, to)) => records
            .iter()
            .filter(|r| {
                let day = day_key(r, tz);
                day >= from && day <= to
            })
            .cloned()
            .collect(),
    }
}

#[derive(Default)]
struct DayAccumulator {
    total_amount: f64,
    total_transactions: u64,
    completed: u64,
    refunded_amount: f64,
    fees: f64,
}

struct MethodAccumulator {
    method: String,
    count: u64,
    amount: f64,
}

/// Group records by day and by payment method, using the local time zone
pub fn aggregate(records: &[PaymentRecord]) -> Aggregation {
    aggregate_in(records, &Local)
}

/// Group records by day (in `tz`) and by payment method.
///
/// Daily buckets come out in ascending date order. Method buckets come out by
/// descending amount; equal amounts keep the order in which the method first
/// appeared, which is also the order colors are assigned in.
pub fn aggregate_in<Tz: TimeZone>(records: &[PaymentRecord], tz: &Tz) -> Aggregation {
    let mut days: BTreeMap<NaiveDate, DayAccumulator> = BTreeMap::new();
    let mut methods: Vec<MethodAccumulator> = Vec::new();
    let mut method_index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let day = days.entry(day_key(record, tz)).or_default();
        day.total_amount += record.amount;
        day.total_transactions += 1;
        day.refunded_amount += record.refunded_amount;
        day.fees += record.fees.total_fees;
        if record.status == PaymentStatus::Completed {
            day.completed += 1;
        }

        let idx = *method_index
            .entry(record.payment_method.as_str())
            .or_insert_with(|| {
                methods.push(MethodAccumulator {
                    method: record.payment_method.clone(),
                    count: 0,
                    amount: 0.0,
                });
                methods.len() - 1
            });
        methods[idx].count += 1;
        methods[idx].amount += record.amount;
    }

    // Rates and averages only once every record of the day has been seen
    let daily: Vec<DailyBucket> = days
        .into_iter()
        .map(|(date, acc)| DailyBucket {
            date,
            total_amount: acc.total_amount,
            total_transactions: acc.total_transactions,
            success_rate: percent(acc.completed as f64, acc.total_transactions as f64),
            average_amount: mean(acc.total_amount, acc.total_transactions),
            refunded_amount: acc.refunded_amount,
            fees: acc.fees,
        })
        .collect();

    let grand_total: f64 = methods.iter().map(|m| m.amount).sum();

    let mut methods: Vec<MethodBucket> = methods
        .into_iter()
        .enumerate()
        .map(|(i, acc)| MethodBucket {
            percentage: percent(acc.amount, grand_total),
            color: METHOD_PALETTE[i % METHOD_PALETTE.len()].to_string(),
            method: acc.method,
            count: acc.count,
            amount: acc.amount,
        })
        .collect();

    // sort_by is stable, so ties keep first-appearance order
    methods.sort_by(|a, b| b.amount.total_cmp(&a.amount));

    Aggregation { daily, methods }
}

/// Headline totals over a set of records
pub fn summarize(records: &[PaymentRecord]) -> PaymentSummary {
    let mut summary = PaymentSummary::default();

    for record in records {
        summary.total_amount += record.amount;
        summary.total_transactions += 1;
        summary.refunded_amount += record.refunded_amount;
        summary.total_fees += record.fees.total_fees;
        match record.status {
            PaymentStatus::Completed => summary.completed += 1,
            PaymentStatus::Pending => summary.pending += 1,
            PaymentStatus::Failed | PaymentStatus::Cancelled => summary.failed += 1,
            PaymentStatus::Refunded | PaymentStatus::PartiallyRefunded => summary.refunded += 1,
            PaymentStatus::Other => {}
        }
    }

    summary.net_amount = summary.total_amount - summary.refunded_amount - summary.total_fees;
    summary.success_rate = percent(
        summary.completed as f64,
        summary.total_transactions as f64,
    );
    summary.average_amount = mean(summary.total_amount, summary.total_transactions);
    summary
}

/// Filter, summarize and aggregate in one go
pub fn build_report<Tz: TimeZone>(
    records: &[PaymentRecord],
    filter: &DateFilter,
    today: NaiveDate,
    tz: &Tz,
) -> PaymentReport {
    let selected = filter_records(records, filter, today, tz);
    let Aggregation { daily, methods } = aggregate_in(&selected, tz);

    tracing::debug!(
        "Report {}: {} of {} records, {} days, {} methods",
        filter.label(),
        selected.len(),
        records.len(),
        daily.len(),
        methods.len()
    );

    PaymentReport {
        filter: filter.label(),
        summary: summarize(&selected),
        daily,
        methods,
    }
}
