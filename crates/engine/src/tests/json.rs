use super::{assert_bool, assert_string};

#[test]
fn stringify_and_parse_round_trip_a_nested_structure() {
    assert_bool(
        "
        let original = { a: 1, b: [2, 3, 'x'], c: { d: true, e: null } };
        let parsed = JSON.parse(JSON.stringify(original));
        parsed.a === 1 &&
            parsed.b.length === 3 && parsed.b[2] === 'x' &&
            parsed.c.d === true && parsed.c.e === null
        ",
        true,
    );
}

#[test]
fn stringify_omits_undefined_valued_object_properties() {
    assert_string("JSON.stringify({ a: undefined, b: 1 })", "{\"b\":1}");
}

#[test]
fn stringify_with_indent_pretty_prints() {
    assert_string(
        "JSON.stringify({ a: 1 }, null, 2)",
        "{\n  \"a\": 1\n}",
    );
}

#[test]
fn parse_rejects_malformed_input_with_a_syntax_error() {
    super::assert_throws("JSON.parse('{not valid json')", "SyntaxError");
}

#[test]
fn stringify_escapes_control_characters_and_quotes() {
    assert_string("JSON.stringify('a\"b\\nc')", "\"a\\\"b\\nc\"");
}
