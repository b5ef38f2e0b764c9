//! Property-based round-trip / idempotence laws for the accumulator.

use proptest::prelude::*;
use vsa_accumulator::{Accumulator, AccumulatorOptions};

proptest! {
    #[test]
    fn update_plus_then_minus_is_a_no_op(initial in 0i64..1_000_000, k in -10_000i64..10_000) {
        let acc = Accumulator::new(initial, AccumulatorOptions::default());
        let before = acc.state();
        acc.update(k);
        acc.update(-k);
        prop_assert_eq!(acc.state(), before);
    }

    #[test]
    fn consume_then_refund_restores_state(initial in 100i64..1_000_000, n in 1i64..100) {
        let acc = Accumulator::new(initial, AccumulatorOptions::default());
        let before = acc.state();
        if acc.try_consume(n) {
            prop_assert!(acc.try_refund(n));
            prop_assert_eq!(acc.state(), before);
        }
    }

    #[test]
    fn accepted_consume_never_drives_availability_negative(initial in 0i64..10_000, n in 1i64..5_000) {
        let acc = Accumulator::new(initial, AccumulatorOptions::default());
        let before = acc.available();
        if acc.try_consume(n) {
            prop_assert_eq!(acc.available(), before - n);
            prop_assert!(acc.available() >= 0);
        } else {
            prop_assert_eq!(acc.available(), before);
        }
    }

    #[test]
    fn refund_never_overshoots_zero(initial in 0i64..10_000, push in 1i64..5_000, refund in 1i64..10_000) {
        let acc = Accumulator::new(initial, AccumulatorOptions::default());
        acc.update(push);
        let v_before = acc.state().1;
        acc.try_refund(refund);
        let v_after = acc.state().1;
        prop_assert!(v_after >= 0);
        prop_assert_eq!(v_after, (v_before - refund.min(v_before)).max(0));
    }

    #[test]
    fn commit_preserves_availability(initial in 0i64..1_000_000, delta in -10_000i64..10_000) {
        let acc = Accumulator::new(initial, AccumulatorOptions::default());
        acc.update(delta);
        let before = acc.available();
        acc.commit(delta);
        prop_assert_eq!(acc.available(), before);
    }
}
