use super::*;

#[test]
fn test_parse_version_simple() {
    assert_eq!(parse_version("1_init.ddl.up.sql", Track::Schema).unwrap(), 1);
    assert_eq!(
        parse_version("0042_add_index.ddl.up.sql", Track::Schema).unwrap(),
        42
    );
}

#[test]
fn test_parse_version_splits_on_first_underscore() {
    let version = parse_version("20240101_backfill_user_status.all.dml.sql", Track::Data).unwrap();
    assert_eq!(version, 20240101);
}

#[test]
fn test_parse_version_without_underscore_fails() {
    let err = parse_version("init.ddl.up.sql", Track::Schema).unwrap_err();
    assert!(matches!(err, CoreError::InvalidVersion { .. }));
    assert!(err.to_string().contains("init.ddl.up.sql"));
}

#[test]
fn test_parse_version_non_numeric_prefix_fails() {
    let err = parse_version("v1_init.all.dml.sql", Track::Data).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("[C006]"));
    assert!(msg.contains("DML"));
    assert!(msg.contains("v1_init.all.dml.sql"));
}

#[test]
fn test_parse_version_rejects_zero_and_negative() {
    assert!(parse_version("0_zero.ddl.up.sql", Track::Schema).is_err());
    assert!(parse_version("-3_neg.ddl.up.sql", Track::Schema).is_err());
}

#[test]
fn test_parse_version_overflow_fails() {
    assert!(parse_version("99999999999999999999_big.ddl.up.sql", Track::Schema).is_err());
}

#[test]
fn test_ordering_is_numeric_not_lexicographic() {
    let mut files = vec![
        MigrationFile::parse("10_ten.ddl.up.sql", Track::Schema).unwrap(),
        MigrationFile::parse("9_nine.all.dml.sql", Track::Data).unwrap(),
        MigrationFile::parse("2_two.ddl.up.sql", Track::Schema).unwrap(),
    ];
    files.sort();
    let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["2_two.ddl.up.sql", "9_nine.all.dml.sql", "10_ten.ddl.up.sql"]
    );
}

#[test]
fn test_ordering_ties_break_on_name() {
    let ddl = MigrationFile::parse("3_a.ddl.up.sql", Track::Schema).unwrap();
    let dml = MigrationFile::parse("3_b.all.dml.sql", Track::Data).unwrap();
    assert!(ddl < dml);
}
