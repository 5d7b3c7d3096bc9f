//! Grammar coverage for the pbxproj dialect: the three assignment shapes,
//! delimited sections, sequence entries with labels, quoting retention and
//! parse failures with positions.

use rstest::rstest;

use pbxproj::parser::parse;
use pbxproj::Value;

mod helpers;

#[rstest]
#[case("{}", "empty mapping")]
#[case("{ }", "whitespace-only mapping")]
#[case("{ a = 1; }", "simple integer assignment")]
#[case("{ a = foo; }", "simple literal assignment")]
#[case("{ a = \"two words\"; }", "quoted value")]
#[case("{ \"a.b[sdk=*]\" = x; }", "quoted key")]
#[case("{ a /* label */ = 1; }", "commented key")]
#[case("{ a = 1 /* label */; }", "commented value")]
#[case("{ a = { b = 2; }; }", "nested mapping")]
#[case("{ a = (); }", "empty sequence")]
#[case("{ a = (\n1,\n2,\n); }", "sequence of integers")]
#[case("{ a = (x, y); }", "sequence without trailing comma")]
#[case("{ a = (\nAAA /* one */,\nBBB /* two */,\n); }", "sequence with labels")]
#[case("{ a = (\n{\nvalue = 1;\n},\n); }", "sequence of mappings")]
#[case("// head\n{ a = 1; }", "head comment")]
#[case("{ objects = {\n/* Begin X section */\n/* End X section */\n}; }", "empty section")]
fn test_accepts(#[case] source: &str, #[case] description: &str) {
    assert!(parse(source).is_ok(), "failed to parse {description}: {source}");
}

#[rstest]
#[case("", "end of input at start")]
#[case("{", "unterminated mapping")]
#[case("{ a = ; }", "missing value")]
#[case("{ a = 1 }", "missing semicolon")]
#[case("{ a 1; }", "missing equals")]
#[case("{ a = \"unterminated; }", "unterminated string")]
#[case("{ a = (1; }", "unterminated sequence")]
#[case("{ a = 1; } trailing", "trailing input")]
#[case("{ objects = {\n/* Begin A section */\n/* End B section */\n}; }", "section mismatch")]
fn test_rejects(#[case] source: &str, #[case] description: &str) {
    assert!(parse(source).is_err(), "parsed {description}: {source}");
}

#[test]
fn test_error_carries_position_and_rule() {
    let err = parse("{\n\ta = ;\n}").unwrap_err();
    assert_eq!(err.line, 2);
    assert_eq!(err.rule, "value");
    assert!(!err.snippet.is_empty());
}

#[test]
fn test_section_mismatch_names_the_rule() {
    let err = parse("{ objects = {\n/* Begin A section */\n/* End B section */\n}; }").unwrap_err();
    assert_eq!(err.rule, "matching section name");
}

#[test]
fn test_quoting_is_preserved_both_ways() {
    let root = parse("{ a = Debug; b = \"Debug\"; }").unwrap();
    let body = root.mapping("project").unwrap();
    assert_eq!(body.string("a"), "Debug");
    assert_eq!(body.string("b"), "\"Debug\"");
}

#[test]
fn test_commented_key_and_value_produce_paired_entries() {
    let root = parse("{ AAA /* one */ = 1; b = 2 /* two */; }").unwrap();
    let body = root.mapping("project").unwrap();
    let keys: Vec<_> = body.keys().collect();
    assert_eq!(keys, ["AAA", "AAA_comment", "b", "b_comment"]);
    assert_eq!(body.comment_for("AAA"), Some("one"));
    assert_eq!(body.comment_for("b"), Some("two"));
}

#[test]
fn test_sequence_label_becomes_value_comment_pair() {
    let root = parse("{ files = (\nAAA /* main.m in Sources */,\n); }").unwrap();
    let files = root.mapping("project").unwrap().sequence("files").unwrap();
    let entry = files[0].as_mapping().unwrap();
    assert_eq!(entry.string("value"), "AAA");
    assert_eq!(entry.string("comment"), "main.m in Sources");
}

#[test]
fn test_section_contents_are_keyed_by_section_name() {
    let source = "{ objects = {\n/* Begin PBXBuildFile section */\nAAA /* x */ = {isa = PBXBuildFile; };\nBBB /* y */ = {isa = PBXBuildFile; };\n/* End PBXBuildFile section */\n/* Begin PBXGroup section */\nCCC /* g */ = {isa = PBXGroup; };\n/* End PBXGroup section */\n}; }";
    let root = parse(source).unwrap();
    let objects = root.mapping("project").unwrap().mapping("objects").unwrap();
    let build_files = objects.mapping("PBXBuildFile").unwrap();
    assert_eq!(build_files.non_comment_entries().count(), 2);
    assert!(objects.mapping("PBXGroup").unwrap().has("CCC"));
}

#[test]
fn test_head_comment_is_trimmed() {
    let root = parse("//   !$*UTF8*$!  \n{}").unwrap();
    assert_eq!(root.string("headComment"), "!$*UTF8*$!");
}

#[test]
fn test_integers_and_uuid_like_digit_runs() {
    let root = parse("{ mask = 2147483647; huge = 123456789012345678901234; }").unwrap();
    let body = root.mapping("project").unwrap();
    assert_eq!(body.get("mask"), Some(&Value::Integer(2147483647)));
    assert_eq!(body.string("huge"), "123456789012345678901234");
}

#[test]
fn test_numeric_looking_token_with_suffix_stays_string() {
    let root = parse("{ v = 1.0; build = 12beta; }").unwrap();
    let body = root.mapping("project").unwrap();
    assert_eq!(body.string("v"), "1.0");
    assert_eq!(body.string("build"), "12beta");
}

#[test]
fn test_duplicate_keys_keep_first_value() {
    let root = parse("{ a = 1; a = 2; }").unwrap();
    assert_eq!(root.mapping("project").unwrap().integer("a"), 1);
}

#[test]
fn test_base_fixture_parses() {
    let root = parse(helpers::BASE_PROJECT).unwrap();
    let body = root.mapping("project").unwrap();
    assert_eq!(root.string("headComment"), "!$*UTF8*$!");
    assert_eq!(body.string("rootObject"), "2A0000000000000000000001");
    assert_eq!(body.comment_for("rootObject"), Some("Project object"));
    let objects = body.mapping("objects").unwrap();
    for bucket in [
        "PBXBuildFile",
        "PBXCopyFilesBuildPhase",
        "PBXFileReference",
        "PBXFrameworksBuildPhase",
        "PBXGroup",
        "PBXNativeTarget",
        "PBXProject",
        "PBXResourcesBuildPhase",
        "PBXSourcesBuildPhase",
        "XCBuildConfiguration",
        "XCConfigurationList",
    ] {
        assert!(objects.mapping(bucket).is_some(), "missing bucket {bucket}");
    }
}
