//! Moving averages and per-bar factors computed over a fetched series.
//!
//! Everything here works on the in-memory table. Cells that are missing or
//! not numeric count as zero and are reported once per column.

use tushare_core::{Factor, Scalar, Table, log::LogSink};

/// Minimum number of bars for a volume ratio.
pub const VOLUME_RATIO_MIN_BARS: usize = 6;

/// Number of preceding bars averaged by the volume ratio.
pub const VOLUME_RATIO_LOOKBACK: usize = 5;

fn coerced(table: &Table, field: &str, sink: &dyn LogSink) -> Vec<f64> {
    let mut unusable = 0;
    let values = table
        .column(field)
        .into_iter()
        .map(|v| {
            v.and_then(Scalar::as_f64).unwrap_or_else(|| {
                unusable += 1;
                0.0
            })
        })
        .collect();

    if unusable > 0 {
        sink.warn(&format!(
            "{unusable} of {} {field} values are missing or not numeric, counted as zero",
            table.len()
        ));
    }
    values
}

fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            if i + 1 >= window {
                values[i + 1 - window..=i].iter().sum::<f64>() / window as f64
            } else {
                *value
            }
        })
        .collect()
}

/// Appends `ma<w>` and `vol_ma<w>` for each window `w`.
///
/// Rows with fewer than `w` bars of history take their own `close` / `vol`.
/// Non-positive windows are ignored.
pub fn with_moving_averages(table: &mut Table, windows: &[i64], sink: &dyn LogSink) {
    if table.is_empty() || windows.is_empty() {
        return;
    }

    sink.debug(&format!("calculating moving averages, windows: {windows:?}"));

    let closes = coerced(table, "close", sink);
    let volumes = coerced(table, "vol", sink);

    for &window in windows {
        let Ok(w) = usize::try_from(window) else {
            continue;
        };
        if w == 0 {
            continue;
        }
        if table.len() < w {
            sink.warn(&format!(
                "ma{w} needs {w} bars, got {}; short rows keep their own values",
                table.len()
            ));
        }

        let ma_field = format!("ma{w}");
        let vol_ma_field = format!("vol_ma{w}");
        let ma = moving_average(&closes, w);
        let vol_ma = moving_average(&volumes, w);

        for ((row, price), volume) in table.rows_mut().iter_mut().zip(ma).zip(vol_ma) {
            row.insert(ma_field.clone(), Scalar::Float(price));
            row.insert(vol_ma_field.clone(), Scalar::Float(volume));
        }
        table.add_column(ma_field);
        table.add_column(vol_ma_field);
    }
}

/// Appends `volume_ratio`: each bar's `vol` over the mean of the previous five.
///
/// The first five bars get no value. A non-positive mean yields `0`. Series
/// shorter than six bars are left untouched.
pub fn with_volume_ratio(table: &mut Table, sink: &dyn LogSink) {
    if table.len() < VOLUME_RATIO_MIN_BARS {
        sink.warn(&format!(
            "volume ratio needs at least {VOLUME_RATIO_MIN_BARS} bars, got {}",
            table.len()
        ));
        return;
    }

    let volumes = coerced(table, "vol", sink);
    for (i, row) in table
        .rows_mut()
        .iter_mut()
        .enumerate()
        .skip(VOLUME_RATIO_LOOKBACK)
    {
        let mean = volumes[i - VOLUME_RATIO_LOOKBACK..i].iter().sum::<f64>()
            / VOLUME_RATIO_LOOKBACK as f64;
        let ratio = if mean > 0.0 { volumes[i] / mean } else { 0.0 };
        row.insert("volume_ratio".to_string(), Scalar::Float(ratio));
    }
    table.add_column("volume_ratio");
}

/// Turnover rate needs share capital data that bar endpoints do not carry.
///
/// Leaves the series untouched.
pub fn with_turnover_rate(_table: &mut Table, sink: &dyn LogSink) {
    sink.warn("turnover rate requires share capital data and is not computed");
}

/// Applies each requested factor in order.
pub fn add_factors(table: &mut Table, factors: &[Factor], sink: &dyn LogSink) {
    if table.is_empty() || factors.is_empty() {
        return;
    }

    sink.debug(&format!("calculating factors: {factors:?}"));
    for factor in factors {
        match factor {
            Factor::VolumeRatio => with_volume_ratio(table, sink),
            Factor::TurnoverRate => with_turnover_rate(table, sink),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{bars, floats, table};
    use tushare_core::{Level, MemorySink};

    fn ten_bars() -> Table {
        bars(&[
            ("20240102", 10.0, 100.0),
            ("20240103", 11.0, 110.0),
            ("20240104", 12.0, 120.0),
            ("20240105", 13.0, 130.0),
            ("20240108", 14.0, 140.0),
            ("20240109", 15.0, 150.0),
            ("20240110", 16.0, 160.0),
            ("20240111", 17.0, 170.0),
            ("20240112", 18.0, 180.0),
            ("20240115", 19.0, 190.0),
        ])
    }

    #[test]
    fn test_moving_average_window_semantics() {
        let sink = MemorySink::default();
        let mut series = ten_bars();
        with_moving_averages(&mut series, &[5], &sink);

        let ma5 = floats(&series, "ma5");
        assert_eq!(&ma5[..4], &[10.0, 11.0, 12.0, 13.0]);
        assert_eq!(ma5[4], 12.0);
        assert_eq!(ma5[9], 17.0);

        let vol_ma5 = floats(&series, "vol_ma5");
        assert_eq!(vol_ma5[0], 100.0);
        assert_eq!(vol_ma5[4], 120.0);

        assert!(series.columns().ends_with(&["ma5".to_string(), "vol_ma5".to_string()]));
    }

    #[test]
    fn test_non_positive_windows_ignored() {
        let sink = MemorySink::default();
        let mut series = ten_bars();
        let before = series.columns().to_vec();
        with_moving_averages(&mut series, &[0, -3], &sink);

        assert_eq!(series.columns(), before.as_slice());
        assert!(series.rows()[0].get("ma0").is_none());
    }

    #[test]
    fn test_unparsable_close_counts_as_zero() {
        let sink = MemorySink::default();
        let mut series = table(
            &["close", "vol"],
            vec![
                vec![Scalar::from("4.0"), Scalar::Int(10)],
                vec![Scalar::from("bad"), Scalar::Null],
            ],
        );
        with_moving_averages(&mut series, &[2], &sink);

        assert_eq!(floats(&series, "ma2"), vec![4.0, 2.0]);
        assert_eq!(floats(&series, "vol_ma2"), vec![10.0, 5.0]);
        assert!(sink.contains(Level::Warn, "1 of 2 close values"));
        assert!(sink.contains(Level::Warn, "1 of 2 vol values"));
    }

    #[test]
    fn test_clean_series_logs_no_warning() {
        let sink = MemorySink::default();
        let mut series = ten_bars();
        with_moving_averages(&mut series, &[5], &sink);
        with_volume_ratio(&mut series, &sink);

        assert!(!sink.entries().iter().any(|e| e.level == Level::Warn));
    }

    #[test]
    fn test_window_longer_than_series_warns() {
        let sink = MemorySink::default();
        let mut series = bars(&[("1", 1.0, 1.0), ("2", 3.0, 1.0)]);
        with_moving_averages(&mut series, &[5], &sink);

        assert_eq!(floats(&series, "ma5"), vec![1.0, 3.0]);
        assert!(sink.contains(Level::Warn, "ma5 needs 5 bars, got 2"));
    }

    #[test]
    fn test_volume_ratio_starts_at_sixth_bar() {
        let sink = MemorySink::default();
        let mut series = ten_bars();
        with_volume_ratio(&mut series, &sink);

        for i in 0..5 {
            assert!(series.get(i, "volume_ratio").is_none());
        }
        // 150 / mean(100..=140)
        assert_eq!(series.get(5, "volume_ratio"), Some(&Scalar::Float(1.25)));
        assert_eq!(series.columns().last().map(String::as_str), Some("volume_ratio"));
    }

    #[test]
    fn test_volume_ratio_zero_mean() {
        let sink = MemorySink::default();
        let mut series = bars(&[
            ("1", 1.0, 0.0),
            ("2", 1.0, 0.0),
            ("3", 1.0, 0.0),
            ("4", 1.0, 0.0),
            ("5", 1.0, 0.0),
            ("6", 1.0, 50.0),
        ]);
        with_volume_ratio(&mut series, &sink);

        assert_eq!(series.get(5, "volume_ratio"), Some(&Scalar::Float(0.0)));
    }

    #[test]
    fn test_volume_ratio_short_series() {
        let sink = MemorySink::default();
        let mut series = bars(&[("1", 1.0, 1.0), ("2", 1.0, 2.0)]);
        let before = series.clone();
        with_volume_ratio(&mut series, &sink);

        assert_eq!(series, before);
        assert!(sink.contains(Level::Warn, "at least 6 bars"));
    }

    #[test]
    fn test_turnover_rate_is_noop() {
        let sink = MemorySink::default();
        let mut series = ten_bars();
        let before = series.clone();
        add_factors(&mut series, &[Factor::TurnoverRate], &sink);

        assert_eq!(series, before);
        assert!(sink.contains(Level::Warn, "turnover rate"));
    }
}
