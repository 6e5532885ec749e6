use keycard_core::tokens::{from_smallest_unit, to_smallest_unit};
use keycard_core::tx::builder::buffer_gas_limit;
use proptest::prelude::*;

proptest! {
    #[test]
    fn scaling_roundtrips_integral_values(
        value in 0u128..1_000_000_000_000_000_000_000_000u128,
        decimals in 0u8..=18,
    ) {
        let human = from_smallest_unit(value, decimals);
        let back = to_smallest_unit(&human, decimals).expect("formatted amount parses");
        prop_assert_eq!(back, value);
    }

    #[test]
    fn excess_fractional_digits_never_round_up(
        whole in 0u64..1_000_000u64,
        frac in 0u32..1_000_000u32,
        extra in 1u8..=9,
    ) {
        // 6-decimal token with a 7th digit appended: truncation means the
        // scaled value equals the 6-digit amount exactly.
        let base = format!("{}.{:06}", whole, frac);
        let extended = format!("{}{}", base, extra);

        let base_scaled = to_smallest_unit(&base, 6).unwrap();
        let extended_scaled = to_smallest_unit(&extended, 6).unwrap();
        prop_assert_eq!(extended_scaled, base_scaled);
    }

    #[test]
    fn gas_buffer_is_exact_ceiling_of_twenty_percent(estimate in 0u64..10_000_000_000u64) {
        let buffered = buffer_gas_limit(estimate);
        let buffered = buffered as u128;
        let estimate = estimate as u128;

        // buffered == ceil(estimate * 1.2)
        prop_assert!(buffered * 5 >= estimate * 6);
        prop_assert!(buffered == 0 || (buffered - 1) * 5 < estimate * 6);
    }
}
