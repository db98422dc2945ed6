use age_rs::{decode, Decoder, DecoderConfig};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn does_not_crash_on_random_text(s in "\\PC*") {
        // Almost every input is an error; it must never panic.
        let _ = decode(&s);
    }

    #[test]
    fn does_not_crash_on_agtype_shaped_text(s in "[\\[\\]{}:,\" a-z0-9.eE+\\-]{0,64}(::(vertex|edge|path|numeric|x))?") {
        let _ = decode(&s);
    }

    #[test]
    fn errors_always_carry_diagnostics(s in "[\\[{]{1,8}[0-9,]{0,8}") {
        if let Err(err) = decode(&s) {
            prop_assert!(!err.diagnostics.is_empty());
            prop_assert_eq!(err.input, s);
        }
    }
}

#[test]
fn test_deep_nesting_is_rejected_without_overflow() {
    let text = format!("{}1{}", "[".repeat(100_000), "]".repeat(100_000));
    assert!(decode(&text).is_err());

    let mut decoder = Decoder::with_config(DecoderConfig { max_depth: 4, ..Default::default() });
    assert!(decoder.decode("[[[[1]]]]").is_ok());
    assert!(decoder.decode("[[[[[1]]]]]").is_err());
}
