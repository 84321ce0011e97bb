//! Property tests for name generation: uniqueness, ordering of suffixes and
//! determinism of a registration pass.

use std::collections::HashSet;

use prove_core::{Location, Naming, Operand, Shape, Suite, SuiteOptions, TestUnit};
use proptest::prelude::*;

fn declaration() -> impl Strategy<Value = (Option<String>, u8)> {
    (
        prop_oneof![Just(None), "[a-c]{0,2}".prop_map(Some)],
        0u8..3,
    )
}

fn naming() -> impl Strategy<Value = Naming> {
    prop_oneof![Just(Naming::PerExpression), Just(Naming::PerDescription)]
}

fn register(naming: Naming, declarations: &[(Option<String>, u8)]) -> Vec<TestUnit> {
    let mut suite = Suite::with_options("props", SuiteOptions { naming });
    for (description, right) in declarations {
        let shape = Shape::binary(
            "x",
            "==",
            &right.to_string(),
            Operand::value(*right),
            Operand::value(*right),
        );
        suite
            .prove(description.as_deref(), shape, Location::caller())
            .expect("valid declaration");
    }
    suite.finish()
}

proptest! {
    #[test]
    fn names_are_unique_within_a_suite(
        naming in naming(),
        declarations in prop::collection::vec(declaration(), 0..40),
    ) {
        let units = register(naming, &declarations);
        let unique: HashSet<&str> = units.iter().map(TestUnit::name).collect();
        prop_assert_eq!(unique.len(), units.len());
    }

    #[test]
    fn identical_declarations_count_up_from_one(
        naming in naming(),
        description in prop_oneof![Just(None), "[a-z]{1,8}".prop_map(Some)],
        repeats in 1usize..20,
    ) {
        let declarations = vec![(description, 0u8); repeats];
        let units = register(naming, &declarations);
        for (index, unit) in units.iter().enumerate() {
            let suffix = format!("({})", index + 1);
            prop_assert!(unit.name().ends_with(&suffix), "{} lacks {}", unit.name(), suffix);
        }
    }

    #[test]
    fn registration_is_deterministic(
        naming in naming(),
        declarations in prop::collection::vec(declaration(), 0..40),
    ) {
        let first: Vec<String> = register(naming, &declarations)
            .iter()
            .map(|unit| unit.name().to_string())
            .collect();
        let second: Vec<String> = register(naming, &declarations)
            .iter()
            .map(|unit| unit.name().to_string())
            .collect();
        prop_assert_eq!(first, second);
    }
}
