use super::{Aggregate, DayBucket};
use crate::model::AnalysisResult;
use chrono::{DateTime, Days, Local, NaiveDate, TimeZone, Utc};

pub const DEFAULT_TREND_WINDOW_DAYS: usize = 30;

/// Daily trend over a fixed window in the local timezone
pub struct TrendAggregator {
    pub window_days: usize,
    pub now_ms: i64,
}

impl TrendAggregator {
    pub fn new(window_days: usize, now_ms: i64) -> Self {
        Self { window_days, now_ms }
    }
}

impl Aggregate for TrendAggregator {
    type Output = Vec<DayBucket>;

    fn aggregate(&self, records: &[AnalysisResult]) -> Vec<DayBucket> {
        daily_trend(records, self.window_days, self.now_ms)
    }
}

/// [`daily_trend_in`] using the local timezone
pub fn daily_trend(records: &[AnalysisResult], window_days: usize, now_ms: i64) -> Vec<DayBucket> {
    daily_trend_in(records, window_days, now_ms, &Local)
}

/// Bucket records into `window_days` calendar days ending with the day
/// containing `now_ms`, oldest first.
///
/// A record belongs to a bucket when its submission time falls on that
/// calendar day in `tz`. Records outside the window are ignored.
pub fn daily_trend_in<Tz: TimeZone>(
    records: &[AnalysisResult],
    window_days: usize,
    now_ms: i64,
    tz: &Tz,
) -> Vec<DayBucket> {
    tracing::debug!("Building {}-day trend over {} records", window_days, records.len());

    if window_days == 0 {
        return Vec::new();
    }

    let today = local_date(now_ms, tz);
    let first = today
        .checked_sub_days(Days::new(window_days as u64 - 1))
        .unwrap_or(NaiveDate::MIN);

    let mut buckets: Vec<DayBucket> = (0..window_days)
        .map(|offset| {
            let date = first
                .checked_add_days(Days::new(offset as u64))
                .unwrap_or(NaiveDate::MAX);
            DayBucket {
                date_label: date.format("%Y-%m-%d").to_string(),
                biased_count: 0,
                clean_count: 0,
                total_count: 0,
            }
        })
        .collect();

    for record in records {
        let day = local_date(record.submitted_at_ms, tz);
        if day < first || day > today {
            continue;
        }

        let index = (day - first).num_days() as usize;
        if let Some(bucket) = buckets.get_mut(index) {
            bucket.total_count += 1;
            if record.bias_detected() {
                bucket.biased_count += 1;
            } else {
                bucket.clean_count += 1;
            }
        }
    }

    buckets
}

fn local_date<Tz: TimeZone>(epoch_ms: i64, tz: &Tz) -> NaiveDate {
    DateTime::<Utc>::from_timestamp_millis(epoch_ms)
        .unwrap_or_default()
        .with_timezone(tz)
        .date_naive()
}
