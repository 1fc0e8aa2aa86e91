//! Tests for the filter parser.

use super::*;
use regex::Regex;

fn value(key: &str, entry: TestEntry) -> FilterTreeNode {
    FilterTreeNode::value(Some(key), entry)
}

fn bare(entry: TestEntry) -> FilterTreeNode {
    FilterTreeNode::value(None, entry)
}

fn contains(text: &str) -> TestEntry {
    TestEntry::string(text, false, false)
}

fn num(comparison: Comparison, n: f64) -> TestEntry {
    TestEntry::number(comparison, n)
}

fn and(left: FilterTreeNode, right: FilterTreeNode) -> FilterTreeNode {
    FilterTreeNode::And(Box::new(left), Box::new(right))
}

fn or(left: FilterTreeNode, right: FilterTreeNode) -> FilterTreeNode {
    FilterTreeNode::Or(Box::new(left), Box::new(right))
}

fn not(inner: FilterTreeNode) -> FilterTreeNode {
    FilterTreeNode::Not(Box::new(inner))
}

fn root(query: &str) -> FilterTreeNode {
    parse(query).root().clone()
}

// ==================== Empty Input Tests ====================

#[test]
fn test_parse_empty() {
    let filter = parse("");
    assert_eq!(filter.root(), &FilterTreeNode::Empty);
    assert!(filter.properties().is_empty());
    assert!(filter.is_empty());
}

#[test]
fn test_parse_whitespace_only() {
    assert!(parse("   ").is_empty());
    assert!(parse("\t\n").is_empty());
}

// ==================== Plain Value Tests ====================

#[test]
fn test_parse_plain_word() {
    assert_eq!(root("ferrari"), bare(contains("ferrari")));
}

#[test]
fn test_parse_plain_number_is_text() {
    assert_eq!(root("2010"), bare(contains("2010")));
}

#[test]
fn test_parse_trims_surrounding_whitespace() {
    assert_eq!(root("  ferrari  "), bare(contains("ferrari")));
}

#[test]
fn test_parse_escaped_control_char() {
    assert_eq!(root(r"a\&b"), bare(contains("a&b")));
    assert_eq!(root(r"rock\ n\ roll"), bare(contains("rock n roll")));
}

#[test]
fn test_parse_dangling_backslash() {
    assert_eq!(root("ab\\"), bare(contains("ab\\")));
}

// ==================== Property Tests ====================

#[test]
fn test_parse_property_contains() {
    let filter = parse("brand:ferrari");
    assert_eq!(filter.root(), &value("brand", contains("ferrari")));
    assert_eq!(filter.properties(), ["brand"]);
}

#[test]
fn test_parse_property_equals() {
    assert_eq!(
        root("brand=Ferrari"),
        value("brand", TestEntry::string("Ferrari", true, false))
    );
}

#[test]
fn test_parse_key_is_lowercased() {
    let filter = parse("Brand:Ferrari");
    assert_eq!(filter.root(), &value("brand", contains("ferrari")));
    assert_eq!(filter.properties(), ["brand"]);
}

#[test]
fn test_parse_numeric_comparisons() {
    assert_eq!(root("year>2000"), value("year", num(Comparison::More, 2000.0)));
    assert_eq!(root("year<2000"), value("year", num(Comparison::Less, 2000.0)));
    assert_eq!(
        root("year>=2000"),
        value("year", num(Comparison::MoreEqual, 2000.0))
    );
    assert_eq!(
        root("year=<2000"),
        value("year", num(Comparison::LessEqual, 2000.0))
    );
    assert_eq!(
        root("year≥2000"),
        value("year", num(Comparison::MoreEqual, 2000.0))
    );
    assert_eq!(root("year:2000"), value("year", num(Comparison::Equal, 2000.0)));
    assert_eq!(
        root("year=2000.0"),
        value("year", num(Comparison::Equal, 2000.0))
    );
}

#[test]
fn test_parse_spaces_around_operator() {
    assert_eq!(root("year > 2000"), root("year>2000"));
    assert_eq!(root("year >= 2000"), root("year>=2000"));
    assert_eq!(root("brand : ferrari"), root("brand:ferrari"));
}

#[test]
fn test_parse_missing_value_matches_nothing() {
    assert_eq!(root("brand:"), value("brand", TestEntry::Const(false)));
    assert_eq!(root("brand: "), value("brand", TestEntry::Const(false)));
    assert_eq!(root("brand="), value("brand", TestEntry::Const(false)));
    assert_eq!(
        root("brand: | ferrari"),
        or(value("brand", TestEntry::Const(false)), bare(contains("ferrari")))
    );
}

#[test]
fn test_parse_spaced_unit_joins_number() {
    assert_eq!(root("len>5 km"), root("len>5km"));
    assert_eq!(root("len>5 km"), value("len", num(Comparison::More, 5000.0)));
    assert_eq!(root("len > 5 km"), root("len>5km"));
    assert_eq!(root("size>2 mb"), root("size>2mb"));
    assert_eq!(root("time<90 min & a"), and(root("time<90min"), bare(contains("a"))));
}

#[test]
fn test_parse_spaced_word_after_number_stays_separate() {
    assert!(matches!(root("year>2000 ferrari"), FilterTreeNode::And(_, _)));
    assert!(matches!(root("len>5 km2"), FilterTreeNode::And(_, _)));
}

#[test]
fn test_parse_ordering_on_text_matches_nothing() {
    assert_eq!(root("brand>ferrari"), value("brand", TestEntry::Const(false)));
    assert_eq!(root("year>"), value("year", TestEntry::Const(false)));
}

#[test]
fn test_parse_flags() {
    assert_eq!(root("active+"), value("active", TestEntry::Bool(true)));
    assert_eq!(root("active-"), value("active", TestEntry::Bool(false)));
    assert_eq!(root("active−"), value("active", TestEntry::Bool(false)));
}

#[test]
fn test_parse_dash_inside_word_is_text() {
    assert_eq!(root("ks-ferrari"), bare(contains("ks ferrari")));
}

#[test]
fn test_parse_tag_shorthand() {
    let filter = parse("#favorite");
    assert_eq!(filter.root(), &value("tag", contains("favorite")));
    assert_eq!(filter.properties(), ["tag"]);
    assert_eq!(parse("#favorite | rating>4"), parse("tag:favorite | rating>4"));
}

// ==================== Quoting Tests ====================

#[test]
fn test_parse_double_quotes_whole_strict() {
    assert_eq!(root("\"ks_*\""), bare(TestEntry::string("ks_*", true, true)));
}

#[test]
fn test_parse_single_quotes_substring_strict() {
    assert_eq!(root("'Ferr'"), bare(TestEntry::string("Ferr", false, true)));
}

#[test]
fn test_parse_quoted_value_keeps_spaces_and_controls() {
    assert_eq!(
        root("name:\"Ferrari 458\""),
        value("name", TestEntry::string("Ferrari 458", true, true))
    );
    assert_eq!(root("\"a|b & c\""), bare(TestEntry::string("a|b & c", true, true)));
}

#[test]
fn test_parse_backtick_regex() {
    let expected = TestEntry::Regex(Regex::new(r"^ks_\d+").unwrap());
    assert_eq!(root(r"`^ks_\d+`"), bare(expected));
}

#[test]
fn test_parse_invalid_regex_matches_nothing() {
    assert_eq!(root("`(`"), bare(TestEntry::Const(false)));
}

#[test]
fn test_parse_escaped_quotes_are_literal() {
    let expected = TestEntry::Regex(Regex::new(r#"^"ks_.*"$"#).unwrap());
    assert_eq!(root(r#"\"ks_*\""#), bare(expected));
    assert_eq!(root(r"\'Ferr\'"), bare(contains("'Ferr'")));
    assert_eq!(
        root(r#"name:\"458\""#),
        value("name", contains("\"458\""))
    );
}

#[test]
fn test_escaped_quotes_match_quote_characters() {
    let FilterTreeNode::Value { entry, .. } = root(r#"\"ks_*\""#) else {
        panic!("expected a single value");
    };
    assert!(entry.test(&Value::Str("\"ks_x\"")));
    assert!(!entry.test(&Value::Str("ks_x")));
}

#[test]
fn test_parse_unterminated_quote() {
    let filter = parse("name:\"Ferrari 458");
    assert!(matches!(filter.root(), FilterTreeNode::Value { .. }));
    assert_eq!(filter.properties(), ["name"]);
}

// ==================== Wildcard Tests ====================

#[test]
fn test_parse_glob() {
    let expected = TestEntry::Regex(Regex::new("^ks_.*$").unwrap());
    assert_eq!(root("ks_*"), bare(expected));
}

#[test]
fn test_parse_escaped_glob_is_literal() {
    assert_eq!(root(r"ks_\*"), bare(TestEntry::string("ks_*", false, false)));
}

#[test]
fn test_parse_keyed_glob() {
    let expected = TestEntry::Regex(Regex::new("^f.rrari$").unwrap());
    assert_eq!(root("brand:f?rrari"), value("brand", expected));
}

// ==================== Boolean Operator Tests ====================

#[test]
fn test_parse_explicit_and() {
    assert_eq!(
        root("a & b"),
        and(bare(contains("a")), bare(contains("b")))
    );
}

#[test]
fn test_parse_implicit_and() {
    assert_eq!(root("a b"), root("a & b"));
    assert_eq!(root("a !b"), and(bare(contains("a")), not(bare(contains("b")))));
    assert_eq!(
        root("a (b | c)"),
        and(
            bare(contains("a")),
            or(bare(contains("b")), bare(contains("c")))
        )
    );
}

#[test]
fn test_parse_or() {
    let expected = or(bare(contains("a")), bare(contains("b")));
    assert_eq!(root("a | b"), expected);
    assert_eq!(root("a,b"), expected);
    assert_eq!(root("a , b"), expected);
}

#[test]
fn test_parse_xor() {
    assert_eq!(
        root("a ^ b"),
        FilterTreeNode::Nor(Box::new(bare(contains("a"))), Box::new(bare(contains("b"))))
    );
}

#[test]
fn test_parse_not() {
    assert_eq!(root("!a"), not(bare(contains("a"))));
    assert_eq!(root("!!a"), bare(contains("a")));
    assert_eq!(root("!!!a"), not(bare(contains("a"))));
    assert_eq!(
        root("!(a | b)"),
        not(or(bare(contains("a")), bare(contains("b"))))
    );
}

#[test]
fn test_parse_and_binds_tighter_than_or() {
    assert_eq!(
        root("a | b & c"),
        or(
            bare(contains("a")),
            and(bare(contains("b")), bare(contains("c")))
        )
    );
}

#[test]
fn test_parse_xor_between_and_and_or() {
    let a = || bare(contains("a"));
    let b = || bare(contains("b"));
    let c = || bare(contains("c"));
    assert_eq!(
        root("a ^ b | c"),
        or(FilterTreeNode::Nor(Box::new(a()), Box::new(b())), c())
    );
    assert_eq!(
        root("a & b ^ c"),
        FilterTreeNode::Nor(Box::new(and(a(), b())), Box::new(c()))
    );
}

#[test]
fn test_parse_grouping_overrides_precedence() {
    assert_eq!(
        root("(a | b) & c"),
        and(
            or(bare(contains("a")), bare(contains("b"))),
            bare(contains("c"))
        )
    );
}

#[test]
fn test_parse_missing_operands() {
    assert_eq!(root("a &"), bare(contains("a")));
    assert_eq!(root("| b"), bare(contains("b")));
    assert_eq!(root("a | | b"), root("a | b"));
    assert_eq!(root("!"), FilterTreeNode::Empty);
    assert_eq!(root("()"), FilterTreeNode::Empty);
}

// ==================== Key Inheritance Tests ====================

#[test]
fn test_parse_comma_inherits_key() {
    assert_eq!(
        root("year>2000,2010"),
        or(
            value("year", num(Comparison::More, 2000.0)),
            value("year", num(Comparison::Equal, 2010.0))
        )
    );
}

#[test]
fn test_parse_inheritance_chains() {
    assert_eq!(
        root("brand:ferrari,porsche,audi"),
        or(
            or(
                value("brand", contains("ferrari")),
                value("brand", contains("porsche"))
            ),
            value("brand", contains("audi"))
        )
    );
}

#[test]
fn test_parse_whitespace_inherits_key() {
    assert_eq!(
        root("brand:ferrari porsche"),
        and(
            value("brand", contains("ferrari")),
            value("brand", contains("porsche"))
        )
    );
}

#[test]
fn test_parse_explicit_and_does_not_inherit() {
    assert_eq!(
        root("brand:ferrari & porsche"),
        and(value("brand", contains("ferrari")), bare(contains("porsche")))
    );
}

#[test]
fn test_parse_negated_key_is_inherited() {
    assert_eq!(
        root("!brand:bmw,audi"),
        or(
            not(value("brand", contains("bmw"))),
            not(value("brand", contains("audi")))
        )
    );
}

#[test]
fn test_parse_quoted_value_is_not_inherited() {
    assert_eq!(
        root("brand:ferrari,'porsche'"),
        or(
            value("brand", contains("ferrari")),
            bare(TestEntry::string("porsche", false, true))
        )
    );
}

#[test]
fn test_parse_new_key_resets_context() {
    assert_eq!(
        root("brand:ferrari,year>2000,2010"),
        or(
            or(
                value("brand", contains("ferrari")),
                value("year", num(Comparison::More, 2000.0))
            ),
            value("year", num(Comparison::Equal, 2010.0))
        )
    );
}

// ==================== Unit Tests ====================

#[test]
fn test_parse_distance() {
    assert_eq!(root("len>5km"), root("len>5000"));
    assert_eq!(root("len>5km"), value("len", num(Comparison::More, 5000.0)));
}

#[test]
fn test_parse_file_size() {
    assert_eq!(
        root("size>2mb"),
        value("size", num(Comparison::More, 2_000_000.0))
    );
}

#[test]
fn test_parse_duration() {
    assert_eq!(
        root("time<1:30"),
        value(
            "time",
            TestEntry::Duration {
                comparison: Comparison::Less,
                value: chrono::TimeDelta::seconds(90),
            }
        )
    );
}

#[test]
fn test_parse_date() {
    let expected = chrono::NaiveDate::from_ymd_opt(2015, 3, 12)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    assert_eq!(
        root("date>2015-03-12"),
        value(
            "date",
            TestEntry::DateTime {
                comparison: Comparison::More,
                value: expected,
                exact: false,
            }
        )
    );
}

#[test]
fn test_parse_unparsable_date_matches_nothing() {
    assert_eq!(root("date:2015-13-45"), value("date", TestEntry::Const(false)));
}

#[test]
fn test_parse_custom_recognizers() {
    let parser = FilterParser::new(Recognizers::empty());
    assert_eq!(
        parser.parse("len>5km").root(),
        &value("len", TestEntry::Const(false))
    );
    assert_eq!(
        parser.parse("len>5").root(),
        &value("len", num(Comparison::More, 5.0))
    );
}

// ==================== Grouping and Child Tests ====================

#[test]
fn test_parse_child_group() {
    let filter = parse("skins(active+)");
    assert_eq!(
        filter.root(),
        &FilterTreeNode::child("skins", parse("active+"))
    );
    assert_eq!(filter.properties(), ["skins"]);
}

#[test]
fn test_parse_child_dot_shorthand() {
    assert_eq!(root("skins.active+"), root("skins(active+)"));
}

#[test]
fn test_parse_child_key_is_lowercased() {
    assert_eq!(root("Skins(active+)"), root("skins(active+)"));
}

#[test]
fn test_parse_child_properties_are_scoped() {
    let filter = parse("skins(name:red & active+) & year>2000");
    assert_eq!(filter.properties(), ["skins", "year"]);
    match filter.root() {
        FilterTreeNode::And(left, _) => match left.as_ref() {
            FilterTreeNode::Child { key, filter } => {
                assert_eq!(key, "skins");
                assert_eq!(filter.properties(), ["name", "active"]);
            }
            other => panic!("expected a child node, got {other:?}"),
        },
        other => panic!("expected an AND node, got {other:?}"),
    }
}

#[test]
fn test_parse_plain_group_merges_properties() {
    let filter = parse("(brand:ferrari | brand:porsche) & year>2000");
    assert_eq!(filter.properties(), ["brand", "year"]);
}

#[test]
fn test_parse_properties_are_distinct_and_ordered() {
    let filter = parse("year>2000 & brand:ferrari | year<1970");
    assert_eq!(filter.properties(), ["year", "brand"]);
}

// ==================== Malformed Input Tests ====================

#[test]
fn test_parse_unclosed_group() {
    assert_eq!(root("(a | b"), FilterTreeNode::never());
    assert_eq!(root("a & (b"), and(bare(contains("a")), FilterTreeNode::never()));
}

#[test]
fn test_parse_stray_close_paren() {
    assert_eq!(root("a) b"), root("a & b"));
    assert_eq!(root(")a"), bare(contains("a")));
}

#[test]
fn test_parse_depth_limit() {
    let deep = |n: usize| format!("{}a{}", "(".repeat(n), ")".repeat(n));
    assert_eq!(root(&deep(MAX_DEPTH)), bare(contains("a")));
    assert_eq!(root(&deep(MAX_DEPTH + 1)), FilterTreeNode::never());
}

#[test]
fn test_parse_depth_limit_keeps_siblings() {
    let query = format!("{}a{} | b", "(".repeat(MAX_DEPTH + 1), ")".repeat(MAX_DEPTH + 1));
    assert_eq!(root(&query), or(FilterTreeNode::never(), bare(contains("b"))));
}

#[test]
fn test_parse_never_fails() {
    let inputs = [
        ")", "(((", ")))", "!!!", "&|^,", "\\", "\"", "'", "`", "a:", ":", "year>", "#", "##",
        "a.b.c:d", "é:ü", "year >", "year > ", "skins(", "skins.", "🚗>5km", "((a)", "a))",
        "!(", "(!)", "a & | ^ b", "date>2015-", "time<1:", "size>mb", "len>km", "`\\`",
    ];
    for input in inputs {
        let filter = parse(input);
        let _ = filter.to_string();
    }
    let deep = "(".repeat(10_000);
    assert_eq!(root(&deep), FilterTreeNode::never());
}

// ==================== Size Limit Tests ====================

#[test]
fn test_parse_term_limit() {
    let at_limit = parse(&"a ".repeat(MAX_TERMS));
    assert!(matches!(at_limit.root(), FilterTreeNode::And(_, _)));

    let over = parse(&"a ".repeat(MAX_TERMS + 1));
    assert_eq!(over.root(), &FilterTreeNode::never());
}

#[test]
fn test_parse_huge_flat_query() {
    for separator in [" ", " | ", ",", " ^ ", " & "] {
        let query = vec!["brand:a"; 50_000].join(separator);
        let filter = parse(&query);
        assert_eq!(filter.root(), &FilterTreeNode::never());
        assert_eq!(filter.properties(), ["brand"]);
        let _ = filter.to_string();
    }
}

#[test]
fn test_parse_huge_query_of_groups() {
    let query = "(a) skins(b) ".repeat(30_000);
    assert_eq!(root(&query), FilterTreeNode::never());
}

// ==================== Misc Tests ====================

#[test]
fn test_parse_from_str() {
    let filter: Filter = "brand:ferrari".parse().unwrap();
    assert_eq!(filter, parse("brand:ferrari"));
}

#[test]
fn test_display() {
    assert_eq!(
        parse("brand:ferrari & year>=2015").to_string(),
        "(brand contains(\"ferrari\") & year >= 2015)"
    );
    assert_eq!(parse("!active+").to_string(), "!active +");
    assert_eq!(parse("").to_string(), "*");
    assert_eq!(parse("skins(active-)").to_string(), "skins(active -)");
}
