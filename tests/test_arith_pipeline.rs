// Integration tests across parsing, the precision model, the multiplication
// engine and formatting, driven through the `apnum` facade.
use apnum::{Apcomplex, Apfloat, Apint, ApnumError, Aprational, RoundingMode, INFINITE};

fn real(s: &str) -> Apfloat {
    Apfloat::parse(s, 10).unwrap()
}

fn complex(s: &str) -> Apcomplex {
    Apcomplex::parse(s, 10).unwrap()
}

fn int(v: i64) -> Apint {
    Apint::from_i64(v, 10).unwrap()
}

/// Deterministic `len`-digit integer literal with leading digit 1.
fn digit_string(len: usize, seed: u64) -> String {
    let mut state = seed;
    let mut s = String::with_capacity(len);
    for i in 0..len {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let d = (state >> 33) % 10;
        s.push(char::from(b'0' + if i == 0 { 1 } else { d as u8 }));
    }
    s
}

#[test]
fn test_parse_and_pretty_print_complex() {
    let z = complex("(5,7)");
    assert_eq!(z.real(), &real("5"));
    assert_eq!(z.imag(), &real("7"));
    assert_eq!(z.precision(), INFINITE);
    assert_eq!(z.to_string_with(true).unwrap(), "(5, 7)");
    assert_eq!(format!("{:#}", z), "(5, 7)");
}

#[test]
fn test_complex_add_at_precision_one() {
    let a = complex("(2,3)").with_precision(1).unwrap();
    let b = complex("(4,5)").with_precision(1).unwrap();
    let sum = a.add(&b).unwrap();
    assert_eq!(sum, complex("(6,8)"));
    assert_eq!(sum.precision(), 1);
}

#[test]
fn test_complex_precision_laws() {
    let sum = complex("(1,5)").with_precision(5).unwrap().add(&complex("(1,5)").with_precision(5).unwrap()).unwrap();
    assert_eq!(sum.precision(), 5);

    let sum = complex("(1,10)").with_precision(6).unwrap().add(&complex("(1,6)").with_precision(6).unwrap()).unwrap();
    assert_eq!(sum.precision(), 6);
    assert_eq!(sum.real().precision(), 5);
    assert_eq!(sum.imag().precision(), 6);
}

#[test]
fn test_complex_divide_at_precision_two() {
    let q = complex("(-7,22)").with_precision(2).unwrap().divide(&complex("(2,3)").with_precision(2).unwrap()).unwrap();
    assert_eq!(q, complex("(4,5)"));
    assert_eq!(q.precision(), 2);
}

#[test]
fn test_gcd_scenarios() {
    assert_eq!(int(12).gcd(&int(18)).unwrap(), int(6));
    assert_eq!(int(0).gcd(&int(3)).unwrap(), int(3));
    assert!(int(0).gcd(&int(0)).unwrap().is_zero());
}

#[test]
fn test_large_integer_division() {
    // 300 digits by 150 digits: multi-limb long division
    let divisor = Apint::parse(&digit_string(150, 1), 10).unwrap();
    let quotient = Apint::parse(&digit_string(151, 2), 10).unwrap();
    let remainder = Apint::parse(&digit_string(149, 3), 10).unwrap();
    let dividend = divisor.multiply(&quotient).unwrap().add(&remainder).unwrap();
    assert_eq!(dividend.to_string().len(), 300);

    let (q, r) = dividend.div_rem(&divisor).unwrap();
    assert_eq!(q, quotient);
    assert_eq!(r, remainder);
}

#[test]
fn test_large_integer_division_newton_path() {
    // a divisor of well over 64 limbs goes through the Newton reciprocal
    let divisor = Apint::parse(&digit_string(1200, 4), 10).unwrap();
    let quotient = Apint::parse(&digit_string(1800, 5), 10).unwrap();
    let remainder = Apint::parse(&digit_string(1100, 6), 10).unwrap();
    let dividend = divisor.multiply(&quotient).unwrap().add(&remainder).unwrap();

    let (q, r) = dividend.div_rem(&divisor).unwrap();
    assert_eq!(q, quotient);
    assert_eq!(r, remainder);
    assert_eq!(dividend.negate().rem(&divisor).unwrap(), remainder.negate());
}

#[test]
fn test_asymmetric_precision_split() {
    let z = complex("(10,1)").with_precision(6).unwrap();
    assert_eq!(z, complex("(10,1)"));
    assert_eq!(z.precision(), 6);
    assert_eq!(z.real().precision(), 6);
    assert_eq!(z.imag().precision(), 5);
}

#[test]
fn test_zero_laws() {
    let zero = Apfloat::zero(10);
    assert_eq!(zero.scale(), apnum::core::SCALE_ZERO);
    assert_eq!(zero.size(), 0);
    assert_eq!(zero.equal_digits(&zero).unwrap(), INFINITE);
    assert_eq!(zero.equal_digits(&real("3")).unwrap(), 0);
}

#[test]
fn test_division_by_zero_and_of_zero() {
    for s in ["1", "-2.5", "1e-40"] {
        let x = real(s);
        assert!(matches!(x.divide(&Apfloat::zero(10)), Err(ApnumError::Arithmetic(_))));
        assert!(Apfloat::zero(10).divide(&x).unwrap().is_zero());
    }
    assert!(matches!(int(4).divide(&int(0)), Err(ApnumError::Arithmetic(_))));
    assert!(matches!(Aprational::new(int(1), int(0)), Err(ApnumError::InvalidArgument(_))));
}

#[test]
fn test_sign_identities() {
    for s in ["3.25", "-1e10", "0.000017"] {
        let x = real(s);
        assert!(x.add(&x.negate()).unwrap().is_zero());
        assert_eq!(x.negate().negate(), x);
    }
    let q = Aprational::parse("-3/8", 10).unwrap();
    assert!(q.add(&q.negate()).unwrap().is_zero());
}

#[test]
fn test_text_round_trip() {
    for s in ["1.5e3", "-5e-1", "123456789", "0.000123", "7"] {
        let x = real(s);
        assert_eq!(real(&x.to_string()), x);
        assert_eq!(real(&format!("{:#}", x)), x);
    }
    assert_eq!(real("1500").to_string(), "1.5e3");
    assert_eq!(format!("{:#}", real("-0.5")), "-0.5");
}

#[test]
fn test_radix_round_trip() {
    let x = real("98765.4321").with_precision(9).unwrap();
    for radix in [2, 3, 7, 16, 36] {
        let back = x.to_radix(radix).unwrap().to_radix(10).unwrap();
        assert_eq!(back.round(x.precision(), RoundingMode::HalfUp).unwrap(), x, "radix {}", radix);
    }
    let exact = real("-1234567890123");
    for radix in 2..=36 {
        assert_eq!(exact.to_radix(radix).unwrap().to_radix(10).unwrap(), exact);
    }
}

#[test]
fn test_rational_pipeline() {
    let h: Aprational = (1..=10)
        .map(|k| Aprational::new(int(1), int(k)).unwrap())
        .try_fold(Aprational::parse("0", 10).unwrap(), |acc, t| acc.add(&t))
        .unwrap();
    assert_eq!(h.to_string(), "7381/2520");
    assert_eq!(h.to_apfloat(8).unwrap(), real("2.9289682"));
}

#[test]
fn test_sqrt_and_rounding() {
    let two = real("2").with_precision(30).unwrap();
    let root = two.sqrt().unwrap();
    let square = root.multiply(&root).unwrap();
    assert!(square.equal_digits(&two).unwrap() >= 28);
    assert_eq!(root.round(5, RoundingMode::HalfEven).unwrap(), real("1.4142"));
}
