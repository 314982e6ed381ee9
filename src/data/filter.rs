use super::model::{Reading, TimeWindow};

// ---------------------------------------------------------------------------
// Time-window filter
// ---------------------------------------------------------------------------

/// Return the readings whose encoded key lies in `[window.start, window.end]`,
/// preserving their order.
///
/// The loader applies the same predicate while reading, so this is only
/// needed to narrow readings that are already in memory.
pub fn filter_readings(readings: &[Reading], window: &TimeWindow) -> Vec<Reading> {
    readings
        .iter()
        .filter(|r| window.contains(r.key()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Dataset, Timestamp};

    fn reading(hour: u32, minute: u32, active: i64) -> Reading {
        Reading {
            timestamp: Timestamp::new(2017, 11, 20, hour, minute).unwrap(),
            active_power: active,
            complex_power: 0,
            apparent_power: 0,
            total_power: 0,
        }
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let readings = vec![reading(0, 59, 1), reading(1, 0, 2), reading(2, 0, 3), reading(2, 1, 4)];
        let start = readings[1].key();
        let end = readings[2].key();

        let kept = filter_readings(&readings, &TimeWindow::new(start, end));
        let values: Vec<i64> = kept.iter().map(|r| r.active_power).collect();
        assert_eq!(values, vec![2, 3]);

        let kept = filter_readings(&readings, &TimeWindow::new(start + 1, end - 1));
        assert!(kept.is_empty());
    }

    #[test]
    fn test_preserves_file_order() {
        // Out of chronological order on purpose: the filter must not sort.
        let readings = vec![reading(5, 0, 1), reading(1, 0, 2), reading(3, 0, 3)];
        let kept = filter_readings(&readings, &TimeWindow::unbounded());
        assert_eq!(kept, readings);
    }

    #[test]
    fn test_inverted_window_matches_nothing() {
        let readings = vec![reading(1, 0, 1)];
        let key = readings[0].key();
        assert!(filter_readings(&readings, &TimeWindow::new(key + 1, key - 1)).is_empty());
    }

    #[test]
    fn test_dataset_refilter() {
        let dataset = Dataset::new(
            vec![reading(1, 0, 1), reading(2, 0, 2), reading(3, 0, 3)],
            TimeWindow::unbounded(),
        );
        let window = TimeWindow::new(dataset.readings()[1].key(), i64::MAX);
        let narrowed = dataset.refilter(&window);
        assert_eq!(narrowed.len(), 2);
        assert_eq!(narrowed.window(), window);
        // The source dataset is untouched.
        assert_eq!(dataset.len(), 3);
    }
}
