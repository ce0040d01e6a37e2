use apnum_arith::{Apfloat, Apint, Aprational};
use apnum_core::precision::INFINITE;
use apnum_core::RoundingMode;
use proptest::prelude::*;
use std::cmp::Ordering;

fn int(v: i64) -> Apint {
    Apint::from_i64(v, 10).unwrap()
}

/// `v · 10^-shift`, exact.
fn fixed(v: i64, shift: i64) -> Apfloat {
    Apfloat::from_i64(v, 10).unwrap().scale_by(-shift).unwrap()
}

fn gcd(mut a: i128, mut b: i128) -> i128 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a.abs()
}

// Property 1: exact integer arithmetic agrees with i128
proptest! {
    #[test]
    fn prop_integer_ring_matches_i128(a in -1_000_000_000i64..1_000_000_000, b in -1_000_000_000i64..1_000_000_000) {
        let (x, y) = (int(a), int(b));
        prop_assert_eq!(x.add(&y).unwrap().to_i64().unwrap() as i128, a as i128 + b as i128);
        prop_assert_eq!(x.subtract(&y).unwrap().to_i64().unwrap() as i128, a as i128 - b as i128);
        prop_assert_eq!(x.multiply(&y).unwrap().to_i64().unwrap() as i128, a as i128 * b as i128);
        prop_assert_eq!(x.compare(&y).unwrap(), a.cmp(&b));
    }
}

// Property 2: truncating division and its remainder agree with i64 `/` and `%`
proptest! {
    #[test]
    fn prop_div_rem_matches_i64(a in any::<i64>(), b in any::<i64>()) {
        prop_assume!(b != 0 && a != i64::MIN);
        let (q, r) = int(a).div_rem(&int(b)).unwrap();
        prop_assert_eq!(q.to_i64().unwrap(), a / b);
        prop_assert_eq!(r.to_i64().unwrap(), a % b);
    }
}

// Property 3: gcd agrees with Euclid on i128
proptest! {
    #[test]
    fn prop_gcd_matches(a in -1_000_000_000_000i64..1_000_000_000_000, b in -1_000_000_000_000i64..1_000_000_000_000) {
        let g = int(a).gcd(&int(b)).unwrap();
        prop_assert_eq!(g.to_i64().unwrap() as i128, gcd(a as i128, b as i128));
    }
}

// Property 4: exact fixed-point values add and multiply without loss
proptest! {
    #[test]
    fn prop_exact_fixed_point(a in -10_000_000i64..10_000_000, b in -10_000_000i64..10_000_000) {
        let (x, y) = (fixed(a, 3), fixed(b, 5));
        let sum = x.add(&y).unwrap();
        prop_assert_eq!(&sum, &fixed(a * 100 + b, 5));
        prop_assert_eq!(sum.precision(), INFINITE);
        prop_assert_eq!(x.multiply(&y).unwrap(), fixed(a * b, 8));
    }
}

// Property 5: x + (-x) is zero and negation is an involution
proptest! {
    #[test]
    fn prop_additive_inverse(a in any::<i64>(), shift in -40i64..40, p in 1u64..30) {
        let x = fixed(a, shift).with_precision(p).unwrap();
        prop_assert!(x.add(&x.negate()).unwrap().is_zero());
        prop_assert_eq!(x.negate().negate(), x);
    }
}

// Property 6: an exact quotient times the divisor gives back the dividend
proptest! {
    #[test]
    fn prop_exact_division(a in -1_000_000i64..1_000_000, k in 0u32..12) {
        let divisor = Apfloat::from_i64(2i64.pow(k) * if k % 2 == 0 { 1 } else { 5 }, 10).unwrap();
        let x = Apfloat::from_i64(a, 10).unwrap();
        let q = x.divide(&divisor).unwrap();
        prop_assert_eq!(q.precision(), INFINITE);
        prop_assert_eq!(q.multiply(&divisor).unwrap(), x);
    }
}

// Property 7: finite-precision division is accurate to the requested digits
proptest! {
    #[test]
    fn prop_finite_division_close(a in 1i64..1_000_000_000, b in 1i64..1_000_000_000, p in 5u64..40) {
        let x = Apfloat::from_i64(a, 10).unwrap().with_precision(p).unwrap();
        let y = Apfloat::from_i64(b, 10).unwrap().with_precision(p).unwrap();
        let q = x.divide(&y).unwrap();
        prop_assert!(q.precision() <= p);
        let exact = Aprational::new(int(a), int(b)).unwrap().to_apfloat(p).unwrap();
        prop_assert!(q.equal_digits(&exact).unwrap().saturating_add(1) >= p);
    }
}

// Property 8: exact integers survive a round trip through any radix
proptest! {
    #[test]
    fn prop_integer_radix_round_trip(a in any::<i64>(), radix in 2u32..=36) {
        let x = Apfloat::from_i64(a, 10).unwrap();
        let there = x.to_radix(radix).unwrap();
        prop_assert_eq!(there.precision(), INFINITE);
        prop_assert_eq!(there.to_radix(10).unwrap(), x);
    }
}

// Property 9: dyadic fractions convert exactly between radix 10 and radix 2
proptest! {
    #[test]
    fn prop_dyadic_radix_round_trip(a in -1_000_000i64..1_000_000, k in 0u32..20) {
        let x = Apfloat::from_i64(a, 10).unwrap()
            .divide(&Apfloat::from_i64(1 << k, 10).unwrap())
            .unwrap();
        let binary = x.to_radix(2).unwrap();
        prop_assert_eq!(binary.precision(), INFINITE);
        prop_assert_eq!(binary.to_radix(10).unwrap(), x);
    }
}

// Property 10: floor and ceiling rounding bracket the value
proptest! {
    #[test]
    fn prop_rounding_brackets(a in any::<i64>(), shift in -20i64..20, p in 1u64..18) {
        let x = fixed(a, shift);
        let down = x.round(p, RoundingMode::Floor).unwrap();
        let up = x.round(p, RoundingMode::Ceiling).unwrap();
        prop_assert_ne!(down.compare(&x).unwrap(), Ordering::Greater);
        prop_assert_ne!(up.compare(&x).unwrap(), Ordering::Less);
        prop_assert!(down.size() <= p && up.size() <= p);
        let toward_zero = x.round(p, RoundingMode::Down).unwrap();
        prop_assert_ne!(toward_zero.abs().compare(&x.abs()).unwrap(), Ordering::Greater);
    }
}

// Property 11: pretty formatting of integers matches i64 Display and parses back
proptest! {
    #[test]
    fn prop_integer_text_round_trip(a in any::<i64>()) {
        let text = int(a).to_string();
        prop_assert_eq!(&text, &a.to_string());
        prop_assert_eq!(Apint::parse(&text, 10).unwrap(), int(a));
    }
}
