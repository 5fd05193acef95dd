//! Exact money arithmetic
//!
//! `Decimal`'s checked operations only fail on overflow. A result that needs
//! more than 96 bits of mantissa is silently rounded to a smaller scale
//! instead. These helpers treat that rounding as a failure too, so a total
//! built from them is always the exact sum.

use rust_decimal::Decimal;

/// `a + b`, or `None` if the sum overflows or would be rounded
pub fn exact_add(a: Decimal, b: Decimal) -> Option<Decimal> {
    let sum = a.checked_add(b)?;
    (sum.scale() >= a.scale().max(b.scale())).then_some(sum)
}

/// `a - b`, or `None` if the difference overflows or would be rounded
pub fn exact_sub(a: Decimal, b: Decimal) -> Option<Decimal> {
    let diff = a.checked_sub(b)?;
    (diff.scale() >= a.scale().max(b.scale())).then_some(diff)
}

/// `a * b`, or `None` if the product overflows or would be rounded
pub fn exact_mul(a: Decimal, b: Decimal) -> Option<Decimal> {
    let product = a.checked_mul(b)?;
    (product.scale() >= a.scale() + b.scale()).then_some(product)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_add_keeps_scale() {
        let sum = exact_add(Decimal::new(150, 2), Decimal::new(5, 1)).unwrap();
        assert_eq!(sum, Decimal::from(2));
        assert_eq!(sum.scale(), 2);
    }

    #[test]
    fn test_exact_add_refuses_rounding() {
        let big = Decimal::from(10_000_000_000i64);
        let tiny = Decimal::new(5, 19);
        assert!(big.checked_add(tiny).is_some());
        assert_eq!(exact_add(big, tiny), None);
    }

    #[test]
    fn test_exact_add_overflow() {
        assert_eq!(exact_add(Decimal::MAX, Decimal::ONE), None);
    }

    #[test]
    fn test_exact_sub() {
        assert_eq!(
            exact_sub(Decimal::new(1000, 2), Decimal::new(250, 2)),
            Some(Decimal::new(750, 2))
        );
    }

    #[test]
    fn test_exact_mul_by_quantity() {
        assert_eq!(
            exact_mul(Decimal::new(255, 2), Decimal::from(4)),
            Some(Decimal::new(1020, 2))
        );
        assert_eq!(exact_mul(Decimal::MAX, Decimal::from(2)), None);
    }

    #[test]
    fn test_exact_mul_refuses_rounding() {
        // 70.000000000000000000000000001, a full 96-bit mantissa at scale 27
        let price = Decimal::from_i128_with_scale(70_000_000_000_000_000_000_000_000_001, 27);
        assert!(price.checked_mul(Decimal::from(2)).is_some());
        assert_eq!(exact_mul(price, Decimal::from(2)), None);
    }
}
