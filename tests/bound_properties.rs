use num_bigint::BigInt;
use num_rational::BigRational;
use proptest::prelude::*;
use taylor_verify::{Constant, FixedPointBound};

const BITS: u32 = 64;

fn rational() -> impl Strategy<Value = BigRational> {
    (0i64..1_000_000, 1i64..1_000_000)
        .prop_map(|(n, d)| BigRational::new(BigInt::from(n), BigInt::from(d)))
}

fn bound() -> impl Strategy<Value = FixedPointBound> {
    (rational(), rational()).prop_map(|(mid, rad)| {
        FixedPointBound::new(BITS, mid, rad).expect("non-negative radius")
    })
}

fn constant() -> impl Strategy<Value = Constant> {
    (0u64..u64::MAX).prop_map(Constant::from)
}

proptest! {
    #[test]
    fn prop_add_commutes(a in bound(), b in bound()) {
        prop_assert_eq!(a.add(&b).expect("same width"), b.add(&a).expect("same width"));
    }

    #[test]
    fn prop_mul_commutes(a in bound(), b in bound()) {
        prop_assert_eq!(a.mul(&b).expect("same width"), b.mul(&a).expect("same width"));
    }

    #[test]
    fn prop_fused_addmul_never_wider(s in bound(), t in bound(), c in constant()) {
        let fused = s.addmul(&t, &c).expect("same width");
        let unfused = s.add(&t.mul_int(&c)).expect("same width");
        prop_assert_eq!(fused.mid(), unfused.mid());
        prop_assert!(fused.rad() <= unfused.rad());
    }

    #[test]
    fn prop_div_then_mul_keeps_mid_and_grows_radius(b in bound(), c in 1u64..u64::MAX) {
        let c = Constant::from(c);
        let divided = b.div_int(&c).expect("nonzero divisor");
        let back = divided.mul_int(&c);
        let slack = b.rad() / c.to_ratio();
        let diff = back.mid() - b.mid();
        prop_assert!(diff <= slack.clone() && -diff <= slack);
        prop_assert!(back.rad() >= b.rad());
    }

    #[test]
    fn prop_add_int_keeps_radius(b in bound(), c in constant()) {
        let added = b.add_int(&c);
        prop_assert_eq!(added.rad(), b.rad());
    }

    #[test]
    fn prop_fractional_constants_rejected(n in 1i64..1000, d in 2i64..1000) {
        let value = BigRational::new(BigInt::from(n * d + 1), BigInt::from(d));
        prop_assert!(Constant::try_from_ratio(&value).is_err());
    }
}
