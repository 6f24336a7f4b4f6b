//! Coupon model and discount arithmetic

use serde::{Deserialize, Serialize};

/// How a coupon reduces a price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum DiscountType {
    /// `price * value / 100`, integer division
    Percentage,
    /// `min(value, price)`
    Fixed,
}

/// Coupon entity
///
/// `product_id == None` makes the coupon store-wide (order level);
/// otherwise it only applies to lines of that exact product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Coupon {
    pub id: i64,
    pub store_id: i64,
    pub code: String,
    pub product_id: Option<i64>,
    pub discount_type: DiscountType,
    /// Percent points for `Percentage`, cents for `Fixed`
    pub discount_value: i64,
    pub max_uses: i64,
    pub used: i64,
    /// Validity window in epoch millis; either bound may be open
    pub start_date: Option<i64>,
    pub end_date: Option<i64>,
    pub is_active: bool,
}

impl Coupon {
    pub fn has_uses_left(&self) -> bool {
        self.used < self.max_uses
    }

    /// Whether `now` (epoch millis) falls inside the validity window.
    /// Open bounds pass.
    pub fn is_within_window(&self, now: i64) -> bool {
        if let Some(start) = self.start_date {
            if now < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if now > end {
                return false;
            }
        }
        true
    }

    /// Whether this coupon is usable at all right now.
    pub fn is_usable(&self, now: i64) -> bool {
        self.is_active && self.has_uses_left() && self.is_within_window(now)
    }

    /// Discount amount in cents for the given price.
    ///
    /// Percentage floors via integer division; fixed is capped at the
    /// price. Never negative, never exceeds `price`.
    pub fn discount_on(&self, price: i64) -> i64 {
        if price <= 0 {
            return 0;
        }
        let raw = match self.discount_type {
            DiscountType::Percentage => price * self.discount_value / 100,
            DiscountType::Fixed => self.discount_value.min(price),
        };
        raw.clamp(0, price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coupon(discount_type: DiscountType, value: i64) -> Coupon {
        Coupon {
            id: 1,
            store_id: 1,
            code: "SAVE".into(),
            product_id: None,
            discount_type,
            discount_value: value,
            max_uses: 10,
            used: 0,
            start_date: None,
            end_date: None,
            is_active: true,
        }
    }

    #[test]
    fn test_percentage_floors() {
        let c = coupon(DiscountType::Percentage, 15);
        // 15% of 999 = 149.85, floors to 149
        assert_eq!(c.discount_on(999), 149);
    }

    #[test]
    fn test_fixed_capped_at_price() {
        let c = coupon(DiscountType::Fixed, 500);
        assert_eq!(c.discount_on(300), 300);
        assert_eq!(c.discount_on(800), 500);
    }

    #[test]
    fn test_discount_never_negative() {
        let c = coupon(DiscountType::Fixed, 500);
        assert_eq!(c.discount_on(0), 0);
        assert_eq!(c.discount_on(-100), 0);
    }

    #[test]
    fn test_window_open_bounds() {
        let mut c = coupon(DiscountType::Fixed, 100);
        assert!(c.is_within_window(1_000));

        c.start_date = Some(2_000);
        assert!(!c.is_within_window(1_000));
        assert!(c.is_within_window(2_000));

        c.end_date = Some(3_000);
        assert!(c.is_within_window(2_500));
        assert!(!c.is_within_window(3_001));
    }

    #[test]
    fn test_uses_left() {
        let mut c = coupon(DiscountType::Fixed, 100);
        c.used = 9;
        assert!(c.has_uses_left());
        c.used = 10;
        assert!(!c.has_uses_left());
        assert!(!c.is_usable(0));
    }
}
