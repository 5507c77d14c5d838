//! Tide extremes and the selection of the next high and low water

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TideKind {
    High,
    Low,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TideEvent {
    pub kind: TideKind,
    pub time: DateTime<Utc>,
    /// Height in metres relative to the provider's datum, if reported
    pub height_m: Option<f64>,
}

impl TideEvent {
    /// Format height with unit, `N/A` when unknown
    #[must_use]
    pub fn format_height(&self) -> String {
        match self.height_m {
            Some(h) => format!("{h:.2}m"),
            None => "N/A".to_string(),
        }
    }
}

/// The next high and low tide after a reference time
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct TideOutlook {
    pub next_high: Option<TideEvent>,
    pub next_low: Option<TideEvent>,
}

impl TideOutlook {
    /// Pick the earliest high and the earliest low that are not before `now`.
    ///
    /// Highs and lows are chosen independently; input order is irrelevant.
    #[must_use]
    pub fn select_next(events: impl IntoIterator<Item = TideEvent>, now: DateTime<Utc>) -> Self {
        let mut outlook = TideOutlook::default();

        for event in events {
            if event.time < now {
                continue;
            }

            let slot = match event.kind {
                TideKind::High => &mut outlook.next_high,
                TideKind::Low => &mut outlook.next_low,
            };

            if slot.as_ref().is_none_or(|current| event.time < current.time) {
                *slot = Some(event);
            }
        }

        outlook
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.next_high.is_none() && self.next_low.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, hour, 0, 0).unwrap()
    }

    fn event(kind: TideKind, hour: u32, height: Option<f64>) -> TideEvent {
        TideEvent {
            kind,
            time: at(hour),
            height_m: height,
        }
    }

    #[test]
    fn test_past_events_are_ignored() {
        let events = vec![
            event(TideKind::High, 2, Some(1.1)),
            event(TideKind::Low, 8, Some(0.2)),
            event(TideKind::High, 14, Some(1.3)),
        ];

        let outlook = TideOutlook::select_next(events, at(10));
        assert_eq!(outlook.next_high.unwrap().time, at(14));
        assert!(outlook.next_low.is_none());
    }

    #[test]
    fn test_earliest_future_event_wins_regardless_of_order() {
        let events = vec![
            event(TideKind::Low, 22, Some(0.1)),
            event(TideKind::High, 20, Some(1.4)),
            event(TideKind::Low, 16, Some(0.3)),
            event(TideKind::High, 13, None),
        ];

        let outlook = TideOutlook::select_next(events, at(12));
        let high = outlook.next_high.unwrap();
        let low = outlook.next_low.unwrap();
        assert_eq!(high.time, at(13));
        assert_eq!(high.format_height(), "N/A");
        assert_eq!(low.time, at(16));
        assert_eq!(low.format_height(), "0.30m");
    }

    #[test]
    fn test_event_at_reference_time_counts_as_upcoming() {
        let outlook = TideOutlook::select_next(vec![event(TideKind::Low, 9, None)], at(9));
        assert!(outlook.next_low.is_some());
    }

    #[test]
    fn test_no_events() {
        let outlook = TideOutlook::select_next(Vec::new(), at(0));
        assert!(outlook.is_empty());
    }
}
