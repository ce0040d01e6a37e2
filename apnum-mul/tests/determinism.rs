use apnum_core::ContextConfig;
use apnum_exec::Context;
use apnum_mul::{Algorithm, Limb, MultiplicationEngine};

// The engine must return bit-identical limbs regardless of how many worker
// threads take part. Operands are generated deterministically so a failure
// is reproducible.

fn operand(len: usize, seed: u64, base: u64) -> Vec<Limb> {
    let mut x = seed;
    (0..len)
        .map(|_| {
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            (x % base) as Limb
        })
        .collect()
}

fn context(processors: usize) -> Context {
    Context::new(ContextConfig {
        number_of_processors: processors,
        shared_memory_threshold: 1,
        ..Default::default()
    })
    .unwrap()
}

#[test]
fn test_transform_product_independent_of_threads() {
    let serial = context(1);
    let parallel = context(4);
    let e1 = MultiplicationEngine::new(&serial, 10);
    let e4 = MultiplicationEngine::new(&parallel, 10);
    let base = e1.base().base;

    let a = operand(5_000, 0x9E37_79B9_7F4A_7C15, base);
    let b = operand(3_000, 0xD1B5_4A32_D192_ED03, base);

    assert!(matches!(e1.algorithm_for(a.len(), b.len()), Algorithm::Ntt { parallel: false, .. }));
    assert!(matches!(e4.algorithm_for(a.len(), b.len()), Algorithm::Ntt { parallel: true, .. }));
    assert_eq!(e1.multiply(&a, &b).unwrap(), e4.multiply(&a, &b).unwrap(), "parallel NTT product diverged");
    assert_eq!(e1.square(&a).unwrap(), e4.square(&a).unwrap(), "parallel NTT square diverged");
}

#[test]
fn test_karatsuba_product_independent_of_threads() {
    let serial = context(1);
    let parallel = context(3);
    let e1 = MultiplicationEngine::new(&serial, 16);
    let e3 = MultiplicationEngine::new(&parallel, 16);
    let base = e1.base().base;

    let a = operand(200, 7, base);
    let b = operand(180, 11, base);
    assert!(matches!(e3.algorithm_for(a.len(), b.len()), Algorithm::Karatsuba { parallel: true }));
    assert_eq!(e1.multiply(&a, &b).unwrap(), e3.multiply(&a, &b).unwrap());
}

#[test]
fn test_newton_division_independent_of_threads() {
    let serial = context(1);
    let parallel = context(4);
    let e1 = MultiplicationEngine::new(&serial, 10);
    let e4 = MultiplicationEngine::new(&parallel, 10);
    let base = e1.base().base;

    let a = operand(2_400, 42, base);
    let b = operand(700, 43, base);
    assert_eq!(e1.div_rem(&a, &b).unwrap(), e4.div_rem(&a, &b).unwrap());
}

#[test]
fn test_known_square_of_nines() {
    // (10^450 - 1)^2 = 10^900 - 2·10^450 + 1: 449 nines, an eight, 449 zeros, a one
    let ctx = context(2);
    let engine = MultiplicationEngine::new(&ctx, 10);
    let nines = vec![9u8; 450];
    let square = engine.square_digits(&nines).unwrap();

    let mut expected = vec![9u8; 449];
    expected.push(8);
    expected.extend(std::iter::repeat(0).take(449));
    expected.push(1);
    assert_eq!(square, expected);
}
