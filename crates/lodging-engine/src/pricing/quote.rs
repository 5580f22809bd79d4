//! Price quotes as a pure function of rates, dates and room count.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use lodging_core::config::PricingConfig;
use lodging_core::types::id::RoomTypeId;
use lodging_entity::room_type::RoomType;

use crate::error::BookingError;
use crate::ledger::StayRange;

/// Which rate applied to a night.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateKind {
    Base,
    Weekend,
    Holiday,
}

/// The per-room price of one night.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightlyRate {
    pub date: NaiveDate,
    pub kind: RateKind,
    pub price: Decimal,
}

/// Length-of-stay discount tiers. Only the highest reached tier applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthOfStayDiscount {
    Weekly,
    Monthly,
}

/// A priced stay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub room_type_id: RoomTypeId,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: u32,
    pub rooms_count: u32,
    /// Per-room rate of each night.
    pub nightly_breakdown: Vec<NightlyRate>,
    /// Sum of nightly rates times rooms, before discounts.
    pub subtotal: Decimal,
    pub discount: Option<LengthOfStayDiscount>,
    pub discount_percent: Decimal,
    /// `subtotal - total`.
    pub discount_amount: Decimal,
    /// Room price total, rounded to the currency's minor unit.
    pub total: Decimal,
    pub currency: String,
}

/// Round half away from zero to `digits` decimal places.
pub fn round_money(amount: Decimal, digits: u32) -> Decimal {
    amount.round_dp_with_strategy(digits, RoundingStrategy::MidpointAwayFromZero)
}

/// Rate of one night: weekend price on Saturday and Sunday nights when set,
/// otherwise holiday price on holidays when set, otherwise base price.
pub fn nightly_rate(room_type: &RoomType, date: NaiveDate, holidays: &BTreeSet<NaiveDate>) -> NightlyRate {
    let weekend = matches!(date.weekday(), Weekday::Sat | Weekday::Sun);
    let (kind, price) = match (weekend, room_type.weekend_price, room_type.holiday_price) {
        (true, Some(price), _) => (RateKind::Weekend, price),
        (_, _, Some(price)) if holidays.contains(&date) => (RateKind::Holiday, price),
        _ => (RateKind::Base, room_type.base_price),
    };
    NightlyRate { date, kind, price }
}

/// Price `rooms` rooms of `room_type` for `range`.
///
/// Rounding happens once, on the final total, so per-night fractions never
/// accumulate drift.
pub fn quote(
    room_type: &RoomType,
    range: &StayRange,
    rooms: u32,
    holidays: &BTreeSet<NaiveDate>,
    config: &PricingConfig,
) -> Result<Quote, BookingError> {
    if rooms < 1 {
        return Err(BookingError::InvalidRoomsCount);
    }
    if rooms > room_type.capacity() {
        return Err(BookingError::ExceedsCapacity {
            requested: rooms,
            total_rooms: room_type.capacity(),
        });
    }

    let nightly_breakdown: Vec<NightlyRate> = range
        .dates()
        .map(|date| nightly_rate(room_type, date, holidays))
        .collect();
    let per_room: Decimal = nightly_breakdown.iter().map(|n| n.price).sum();
    let subtotal = per_room * Decimal::from(rooms);

    let nights = range.nights();
    let (discount, discount_percent) = if nights >= config.monthly_threshold_nights {
        (Some(LengthOfStayDiscount::Monthly), room_type.monthly_discount_percent)
    } else if nights >= config.weekly_threshold_nights {
        (Some(LengthOfStayDiscount::Weekly), room_type.weekly_discount_percent)
    } else {
        (None, Decimal::ZERO)
    };

    let raw_total = subtotal - subtotal * discount_percent / Decimal::ONE_HUNDRED;
    let total = round_money(raw_total.max(Decimal::ZERO), config.minor_unit_digits);
    let subtotal = round_money(subtotal, config.minor_unit_digits);

    Ok(Quote {
        room_type_id: room_type.id,
        check_in: range.check_in(),
        check_out: range.check_out(),
        nights,
        rooms_count: rooms,
        nightly_breakdown,
        subtotal,
        discount: discount.filter(|_| discount_percent > Decimal::ZERO),
        discount_percent,
        discount_amount: subtotal - total,
        total,
        currency: config.currency.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use lodging_core::types::id::PropertyId;
    use rust_decimal_macros::dec;

    fn room_type() -> RoomType {
        RoomType {
            id: RoomTypeId::new(),
            property_id: PropertyId::new(),
            name: "Garden Double".to_string(),
            total_rooms: 3,
            base_price: dec!(1000000),
            weekend_price: Some(dec!(1200000)),
            holiday_price: Some(dec!(1500000)),
            weekly_discount_percent: dec!(10),
            monthly_discount_percent: dec!(25),
            max_adults: 2,
            max_children: 1,
            max_guests: 3,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, day).unwrap()
    }

    fn range(from: NaiveDate, to: NaiveDate) -> StayRange {
        StayRange::new(from, to).unwrap()
    }

    #[test]
    fn test_friday_to_monday() {
        // 2026-01-02 is a Friday.
        let q = quote(
            &room_type(),
            &range(d(1, 2), d(1, 5)),
            1,
            &BTreeSet::new(),
            &PricingConfig::default(),
        )
        .unwrap();
        let prices: Vec<_> = q.nightly_breakdown.iter().map(|n| n.price).collect();
        assert_eq!(prices, vec![dec!(1000000), dec!(1200000), dec!(1200000)]);
        assert_eq!(q.total, dec!(3400000));
        assert_eq!(q.discount, None);
        assert_eq!(q.discount_amount, Decimal::ZERO);
    }

    #[test]
    fn test_weekend_beats_holiday() {
        let holidays = BTreeSet::from([d(1, 3), d(1, 5)]);
        let q = quote(
            &room_type(),
            &range(d(1, 2), d(1, 6)),
            1,
            &holidays,
            &PricingConfig::default(),
        )
        .unwrap();
        let kinds: Vec<_> = q.nightly_breakdown.iter().map(|n| n.kind).collect();
        assert_eq!(
            kinds,
            vec![RateKind::Base, RateKind::Weekend, RateKind::Weekend, RateKind::Holiday]
        );
    }

    #[test]
    fn test_holiday_without_price_falls_back_to_base() {
        let mut rt = room_type();
        rt.holiday_price = None;
        let q = quote(
            &rt,
            &range(d(1, 5), d(1, 6)),
            1,
            &BTreeSet::from([d(1, 5)]),
            &PricingConfig::default(),
        )
        .unwrap();
        assert_eq!(q.nightly_breakdown[0].kind, RateKind::Base);
    }

    #[test]
    fn test_rooms_multiply_and_weekly_discount() {
        let mut rt = room_type();
        rt.weekend_price = None;
        // 7 nights at 1,000,000 for 2 rooms, 10% off.
        let q = quote(
            &rt,
            &range(d(3, 2), d(3, 9)),
            2,
            &BTreeSet::new(),
            &PricingConfig::default(),
        )
        .unwrap();
        assert_eq!(q.subtotal, dec!(14000000));
        assert_eq!(q.discount, Some(LengthOfStayDiscount::Weekly));
        assert_eq!(q.total, dec!(12600000));
        assert_eq!(q.discount_amount, dec!(1400000));
    }

    #[test]
    fn test_monthly_takes_precedence() {
        let mut rt = room_type();
        rt.weekend_price = None;
        let q = quote(
            &rt,
            &range(d(3, 1), d(3, 29)),
            1,
            &BTreeSet::new(),
            &PricingConfig::default(),
        )
        .unwrap();
        assert_eq!(q.nights, 28);
        assert_eq!(q.discount, Some(LengthOfStayDiscount::Monthly));
        assert_eq!(q.total, dec!(21000000));
    }

    #[test]
    fn test_rounds_once_half_up() {
        let mut rt = room_type();
        rt.weekend_price = None;
        rt.base_price = dec!(10.005);
        rt.weekly_discount_percent = Decimal::ZERO;
        let config = PricingConfig {
            minor_unit_digits: 2,
            ..PricingConfig::default()
        };
        // Per-night rounding would give 3 x 10.01 = 30.03.
        let q = quote(&rt, &range(d(3, 2), d(3, 5)), 1, &BTreeSet::new(), &config).unwrap();
        assert_eq!(q.total, dec!(30.02));

        rt.base_price = dec!(0.125);
        let q = quote(&rt, &range(d(3, 2), d(3, 3)), 1, &BTreeSet::new(), &config).unwrap();
        assert_eq!(q.total, dec!(0.13));
    }

    #[test]
    fn test_room_count_errors() {
        let rt = room_type();
        let r = range(d(3, 2), d(3, 3));
        let config = PricingConfig::default();
        assert!(matches!(
            quote(&rt, &r, 0, &BTreeSet::new(), &config),
            Err(BookingError::InvalidRoomsCount)
        ));
        assert!(matches!(
            quote(&rt, &r, 4, &BTreeSet::new(), &config),
            Err(BookingError::ExceedsCapacity { requested: 4, total_rooms: 3 })
        ));
    }

    #[test]
    fn test_deterministic() {
        let rt = room_type();
        let r = range(d(4, 10), d(4, 20));
        let holidays = BTreeSet::from([d(4, 14)]);
        let config = PricingConfig::default();
        assert_eq!(
            quote(&rt, &r, 2, &holidays, &config).unwrap(),
            quote(&rt, &r, 2, &holidays, &config).unwrap()
        );
    }
}
