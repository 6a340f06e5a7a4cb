use folio_flags::{
    FlagError, FlagKind, FlagMap, FlagSpec, FlagValue, exactly_one_of, normalize,
};

#[test]
fn switches_and_pipe_lists_normalize_together() {
    let flags = normalize(["--verbose", "--languages=py|js"]).expect("well-formed tokens");

    let expected: FlagMap = [
        ("verbose", FlagValue::Bool(true)),
        ("languages", FlagValue::List(vec!["py".to_owned(), "js".to_owned()])),
    ]
    .into_iter()
    .collect();

    assert_eq!(flags, expected);
}

#[test]
fn mode_and_files_together_are_rejected_by_handler_rule() {
    let spec = FlagSpec::new().flag("mode", FlagKind::Text).flag("files", FlagKind::List);
    let flags = spec.validate(normalize(["--mode=all", "--files=a.py"]).unwrap()).unwrap();

    let err = exactly_one_of(&flags, &["mode", "files"]).expect_err("both selectors given");
    assert!(matches!(err, FlagError::MutuallyExclusive { .. }));
    assert!(err.to_string().contains("mutually exclusive"));
}

#[test]
fn order_of_tokens_does_not_matter() {
    let a = normalize(["--mode=all", "--fix", "--languages=py|ts"]).unwrap();
    let b = normalize(["--languages=py|ts", "--mode=all", "--fix"]).unwrap();
    assert_eq!(a, b);
}
