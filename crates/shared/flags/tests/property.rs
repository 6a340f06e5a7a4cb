use folio_flags::{
    FlagError, FlagMap, FlagValue, apply_defaults, normalize, to_args, validate_required,
};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn flag_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,11}"
}

fn segment() -> impl Strategy<Value = String> {
    "[A-Za-z0-9./_-]{1,12}"
}

fn flag_value() -> impl Strategy<Value = FlagValue> {
    prop_oneof![
        Just(FlagValue::Bool(true)),
        "[A-Za-z0-9 ./:_\"'=-]{0,16}".prop_map(FlagValue::Text),
        proptest::collection::vec(segment(), 0..5).prop_map(FlagValue::List),
    ]
}

fn flag_map() -> impl Strategy<Value = FlagMap> {
    proptest::collection::btree_map(flag_name(), flag_value(), 0..6)
        .prop_map(|entries| entries.into_iter().collect())
}

proptest! {
    #[test]
    fn serialized_maps_parse_back_identically(flags in flag_map()) {
        let args = to_args(&flags);
        let reparsed = normalize(&args).unwrap();
        prop_assert_eq!(&reparsed, &flags);
        prop_assert_eq!(to_args(&reparsed), args);
    }

    #[test]
    fn pipe_lists_rejoin_to_the_original(segments in proptest::collection::vec(segment(), 2..6)) {
        let raw = segments.join("|");
        let flags = normalize([format!("--files=  {raw} ")]).unwrap();
        let items = flags.list("files").unwrap();
        prop_assert_eq!(items.join("|"), raw);
    }

    #[test]
    fn missing_keys_are_reported_exactly(
        flags in flag_map(),
        required in proptest::collection::btree_set(flag_name(), 0..6),
    ) {
        let expected: Vec<String> =
            required.iter().filter(|key| !flags.contains(key)).cloned().collect();

        match validate_required(&flags, &required) {
            Ok(()) => prop_assert!(expected.is_empty()),
            Err(FlagError::Missing { flags: missing }) => prop_assert_eq!(missing, expected),
            Err(other) => prop_assert!(false, "unexpected error {other}"),
        }
    }

    #[test]
    fn defaults_never_overwrite(flags in flag_map(), defaults in flag_map()) {
        let merged = apply_defaults(&flags, &defaults);

        for (name, value) in &flags {
            prop_assert_eq!(merged.get(name), Some(value));
        }
        let keys: BTreeSet<&str> = flags.keys().chain(defaults.keys()).collect();
        prop_assert_eq!(merged.len(), keys.len());
    }
}
