//! Discount amount of a coupon.

use rust_decimal::Decimal;

use lodging_entity::coupon::{Coupon, DiscountType};

use crate::pricing::round_money;

/// Discount granted by `coupon`.
///
/// - percentage: `room_price * value / 100`, capped at `max_discount_amount`
/// - fixed amount: `value`
/// - free night: `value` nights at the average nightly room price
///
/// Only percentage coupons honour `max_discount_amount`. The result is
/// rounded to the currency's minor unit and always lies in `[0, total_amount]`.
pub fn calculate_discount(
    coupon: &Coupon,
    total_amount: Decimal,
    room_price: Decimal,
    nights: u32,
    minor_unit_digits: u32,
) -> Decimal {
    let total = total_amount.max(Decimal::ZERO);
    let raw = match coupon.discount_type {
        DiscountType::Percentage => {
            let amount = room_price * coupon.discount_value / Decimal::ONE_HUNDRED;
            match coupon.max_discount_amount {
                Some(max) => amount.min(max),
                None => amount,
            }
        }
        DiscountType::FixedAmount => coupon.discount_value,
        DiscountType::FreeNight if nights == 0 => Decimal::ZERO,
        DiscountType::FreeNight => coupon.discount_value * room_price / Decimal::from(nights),
    };
    round_money(raw.clamp(Decimal::ZERO, total), minor_unit_digits).min(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use lodging_core::types::id::CouponId;
    use lodging_entity::coupon::CouponScope;
    use rust_decimal_macros::dec;

    fn coupon(discount_type: DiscountType, value: Decimal, max: Option<Decimal>) -> Coupon {
        Coupon {
            id: CouponId::new(),
            code: "X".to_string(),
            description: None,
            discount_type,
            discount_value: value,
            max_discount_amount: max,
            min_order_amount: None,
            min_nights: None,
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
            max_total_uses: None,
            max_uses_per_customer: None,
            used_count: 0,
            is_active: true,
            applicable_to: CouponScope::All,
            applicable_target: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_percentage_is_capped() {
        let c = coupon(DiscountType::Percentage, dec!(10), Some(dec!(100000)));
        let discount = calculate_discount(&c, dec!(2000000), dec!(2000000), 2, 0);
        assert_eq!(discount, dec!(100000));
        assert_eq!(dec!(2000000) - discount, dec!(1900000));
    }

    #[test]
    fn test_percentage_under_cap() {
        let c = coupon(DiscountType::Percentage, dec!(10), Some(dec!(500000)));
        assert_eq!(
            calculate_discount(&c, dec!(2000000), dec!(2000000), 2, 0),
            dec!(200000)
        );
    }

    #[test]
    fn test_fixed_never_exceeds_total() {
        let c = coupon(DiscountType::FixedAmount, dec!(300000), None);
        assert_eq!(calculate_discount(&c, dec!(1000000), dec!(1000000), 1, 0), dec!(300000));
        assert_eq!(calculate_discount(&c, dec!(250000), dec!(250000), 1, 0), dec!(250000));
    }

    #[test]
    fn test_cap_only_limits_percentage() {
        let fixed = coupon(DiscountType::FixedAmount, dec!(300000), Some(dec!(100000)));
        assert_eq!(
            calculate_discount(&fixed, dec!(2000000), dec!(2000000), 2, 0),
            dec!(300000)
        );

        let free_night = coupon(DiscountType::FreeNight, dec!(1), Some(dec!(100000)));
        assert_eq!(
            calculate_discount(&free_night, dec!(2000000), dec!(2000000), 2, 0),
            dec!(1000000)
        );
    }

    #[test]
    fn test_free_night_uses_average_rate() {
        let c = coupon(DiscountType::FreeNight, dec!(1), None);
        // 3 nights totalling 3,400,000.
        assert_eq!(
            calculate_discount(&c, dec!(3400000), dec!(3400000), 3, 0),
            dec!(1133333)
        );
        let many = coupon(DiscountType::FreeNight, dec!(5), None);
        assert_eq!(
            calculate_discount(&many, dec!(3400000), dec!(3400000), 3, 0),
            dec!(3400000)
        );
        assert_eq!(calculate_discount(&c, dec!(100), dec!(100), 0, 0), Decimal::ZERO);
    }

    #[test]
    fn test_never_negative() {
        let c = coupon(DiscountType::FixedAmount, dec!(-50), None);
        assert_eq!(calculate_discount(&c, dec!(1000), dec!(1000), 1, 0), Decimal::ZERO);
        let c = coupon(DiscountType::FixedAmount, dec!(50), None);
        assert_eq!(calculate_discount(&c, dec!(-10), dec!(0), 1, 0), Decimal::ZERO);
    }
}
