//! Occupancy arithmetic over plain stays.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::range::{Stay, StayRange};

/// The highest number of rooms held on any single night of `window`.
///
/// Sweeps the start and end events of every stay clipped to the window.
/// Ends sort before starts on the same day, so a departure frees its rooms
/// for an arrival on that day.
pub fn peak_occupancy(stays: &[Stay], window: &StayRange) -> u32 {
    let mut events: Vec<(NaiveDate, i64)> = Vec::with_capacity(stays.len() * 2);
    for stay in stays.iter().filter(|s| s.range.overlaps(window)) {
        let start = stay.range.check_in().max(window.check_in());
        let end = stay.range.check_out().min(window.check_out());
        let rooms = i64::from(stay.rooms);
        events.push((start, rooms));
        events.push((end, -rooms));
    }
    events.sort_unstable();

    let mut current = 0i64;
    let mut peak = 0i64;
    for (_, delta) in events {
        current += delta;
        peak = peak.max(current);
    }
    u32::try_from(peak).unwrap_or(u32::MAX)
}

/// Rooms free on every night of `window`.
pub fn rooms_free(total_rooms: u32, stays: &[Stay], window: &StayRange) -> u32 {
    total_rooms.saturating_sub(peak_occupancy(stays, window))
}

/// Whether `requested` rooms are free on every night of `window`.
pub fn is_available(total_rooms: u32, stays: &[Stay], window: &StayRange, requested: u32) -> bool {
    rooms_free(total_rooms, stays, window) >= requested
}

/// Days of `window` on which a one-night stay of `requested` rooms fits.
pub fn available_dates(
    total_rooms: u32,
    stays: &[Stay],
    window: &StayRange,
    requested: u32,
) -> BTreeSet<NaiveDate> {
    window
        .dates()
        .filter(|day| {
            let held: u32 = stays
                .iter()
                .filter(|s| s.range.contains(*day))
                .map(|s| s.rooms)
                .sum();
            total_rooms.saturating_sub(held) >= requested
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, day).unwrap()
    }

    fn stay(from: u32, to: u32, rooms: u32) -> Stay {
        Stay::new(StayRange::new(d(from), d(to)).unwrap(), rooms)
    }

    fn window(from: u32, to: u32) -> StayRange {
        StayRange::new(d(from), d(to)).unwrap()
    }

    #[test]
    fn test_peak_is_max_over_nights_not_sum() {
        // 1-3 and 3-5 never share a night.
        let stays = [stay(1, 3, 2), stay(3, 5, 2)];
        assert_eq!(peak_occupancy(&stays, &window(1, 5)), 2);

        let stays = [stay(1, 4, 2), stay(3, 5, 1), stay(4, 6, 1)];
        assert_eq!(peak_occupancy(&stays, &window(1, 6)), 3);
    }

    #[test]
    fn test_stays_outside_window_are_ignored() {
        let stays = [stay(1, 3, 3), stay(10, 12, 3)];
        assert_eq!(peak_occupancy(&stays, &window(3, 10)), 0);
        assert_eq!(rooms_free(3, &stays, &window(3, 10)), 3);
    }

    #[test]
    fn test_is_available() {
        let stays = [stay(1, 4, 2)];
        assert!(is_available(3, &stays, &window(2, 5), 1));
        assert!(!is_available(3, &stays, &window(2, 5), 2));
        assert!(is_available(3, &stays, &window(4, 6), 3));
    }

    #[test]
    fn test_overbooked_history_never_underflows() {
        let stays = [stay(1, 3, 2), stay(1, 3, 2)];
        assert_eq!(rooms_free(3, &stays, &window(1, 3)), 0);
    }

    #[test]
    fn test_available_dates() {
        let stays = [stay(3, 5, 1), stay(4, 6, 1)];
        let dates = available_dates(2, &stays, &window(1, 8), 1);
        assert!(dates.contains(&d(3)));
        assert!(!dates.contains(&d(4)));
        assert!(dates.contains(&d(5)));
        assert_eq!(dates.len(), 6);
    }
}
