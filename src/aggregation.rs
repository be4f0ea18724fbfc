use std::collections::BTreeMap;

use crate::round_to;
use crate::simulator::ReadEvent;

/// Decimal places applied to the derived means.
pub const SUMMARY_DECIMALS: i32 = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct LocationPerformance {
    pub location: String,
    pub success_rate: f64,
    pub avg_signal_strength: f64,
    pub event_count: u64,
}

#[derive(Debug, Default, Clone, Copy)]
struct Totals {
    successes: u64,
    signal_sum: f64,
    count: u64,
}

impl Totals {
    fn add(&mut self, read_success: bool, signal_strength: f64) {
        self.successes += u64::from(read_success);
        self.signal_sum += signal_strength;
        self.count += 1;
    }
}

/// Streaming group-by over `location`.
#[derive(Debug, Default, Clone)]
pub struct LocationAggregator {
    groups: BTreeMap<String, Totals>,
}

impl LocationAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: &ReadEvent) {
        self.observe(&event.location, event.read_success, event.signal_strength);
    }

    /// Fold a single observation given by its raw fields.
    pub fn observe(&mut self, location: &str, read_success: bool, signal_strength: f64) {
        if let Some(totals) = self.groups.get_mut(location) {
            totals.add(read_success, signal_strength);
            return;
        }
        let mut totals = Totals::default();
        totals.add(read_success, signal_strength);
        self.groups.insert(location.to_string(), totals);
    }

    /// Number of events folded so far.
    pub fn event_count(&self) -> u64 {
        self.groups.values().map(|t| t.count).sum()
    }

    /// One row per location seen, sorted by location.
    pub fn finish(&self) -> Vec<LocationPerformance> {
        self.groups
            .iter()
            .map(|(location, t)| {
                let n = t.count as f64;
                LocationPerformance {
                    location: location.clone(),
                    success_rate: round_to(t.successes as f64 / n, SUMMARY_DECIMALS),
                    avg_signal_strength: round_to(t.signal_sum / n, SUMMARY_DECIMALS),
                    event_count: t.count,
                }
            })
            .collect()
    }
}

impl<'a> Extend<&'a ReadEvent> for LocationAggregator {
    fn extend<I: IntoIterator<Item = &'a ReadEvent>>(&mut self, iter: I) {
        for event in iter {
            self.push(event);
        }
    }
}

/// Pure reduction of an event collection.
pub fn aggregate<'a, I>(events: I) -> Vec<LocationPerformance>
where
    I: IntoIterator<Item = &'a ReadEvent>,
{
    let mut agg = LocationAggregator::new();
    agg.extend(events);
    agg.finish()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use uuid::Uuid;

    use super::*;

    fn event(location: &str, read_success: bool, signal_strength: f64) -> ReadEvent {
        ReadEvent {
            event_id: Uuid::nil(),
            tag_id: "TAG_0000-0000-0000".into(),
            product_id: "PROD_0000".into(),
            reader_id: "READER_01".into(),
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            read_success,
            signal_strength,
            location: location.into(),
            temperature: 20.0,
            humidity: 50.0,
        }
    }

    #[test]
    fn empty_input_yields_empty_result() {
        assert!(aggregate(&Vec::<ReadEvent>::new()).is_empty());
    }

    #[test]
    fn groups_by_location_with_rounded_means() {
        let events = vec![
            event("Zone_B", true, -40.0),
            event("Zone_A", true, -50.0),
            event("Zone_A", false, -90.0),
            event("Zone_A", true, -60.0),
            event("Zone_B", true, -41.0),
        ];
        let rows = aggregate(&events);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].location, "Zone_A");
        assert_eq!(rows[0].event_count, 3);
        assert_eq!(rows[0].success_rate, 0.667);
        assert_eq!(rows[0].avg_signal_strength, -66.667);

        assert_eq!(rows[1].location, "Zone_B");
        assert_eq!(rows[1].event_count, 2);
        assert_eq!(rows[1].success_rate, 1.0);
        assert_eq!(rows[1].avg_signal_strength, -40.5);
    }

    #[test]
    fn absent_locations_have_no_row() {
        let rows = aggregate(&[event("Zone_C", false, -95.0)]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].location, "Zone_C");
        assert_eq!(rows[0].success_rate, 0.0);
    }

    #[test]
    fn incremental_fold_matches_batch() {
        let events: Vec<ReadEvent> = (0..50)
            .map(|i| {
                let zone = ["Zone_A", "Zone_B", "Zone_C"][i % 3];
                event(zone, i % 4 != 0, -30.0 - i as f64)
            })
            .collect();

        let mut agg = LocationAggregator::new();
        for chunk in events.chunks(7) {
            agg.extend(chunk);
        }
        assert_eq!(agg.event_count(), 50);
        assert_eq!(agg.finish(), aggregate(&events));

        let total: u64 = agg.finish().iter().map(|r| r.event_count).sum();
        assert_eq!(total, 50);
    }
}
