use chrono::{Months, NaiveDate};
use market_data_ingestor::models::bar_series::BarSeries;
use serde::{Deserialize, Serialize};

/// One bar of the charting window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Bars dated on or after `months` calendar months before the last bar.
///
/// Anchored on the series itself rather than today's date, so the same input
/// always yields the same window.
pub fn recent_history(series: &BarSeries, months: u32) -> Vec<HistoryPoint> {
    let Some(last) = series.last() else {
        return Vec::new();
    };
    let cutoff = last.date.checked_sub_months(Months::new(months));

    series
        .bars
        .iter()
        .filter(|bar| cutoff.is_none_or(|c| bar.date >= c))
        .map(|bar| HistoryPoint {
            date: bar.date,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Days;
    use market_data_ingestor::models::bar::Bar;

    use super::*;

    fn daily(start: NaiveDate, n: u64) -> BarSeries {
        let bars = (0..n)
            .map(|i| Bar::flat(start + Days::new(i), 50.0 + i as f64, 10))
            .collect();
        BarSeries::new("TEST", bars)
    }

    #[test]
    fn keeps_last_six_months_inclusive() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        // through 2024-12-31
        let series = daily(start, 366);
        let history = recent_history(&series, 6);

        assert_eq!(
            history.first().unwrap().date,
            NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
        );
        assert_eq!(
            history.last().unwrap().date,
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
        );
        assert_eq!(history.last().unwrap().close, series.latest_close().unwrap());
    }

    #[test]
    fn short_series_is_returned_whole() {
        let series = daily(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), 20);
        assert_eq!(recent_history(&series, 6).len(), 20);
    }

    #[test]
    fn empty_series_has_no_history() {
        assert!(recent_history(&BarSeries::new("TEST", vec![]), 6).is_empty());
    }
}
