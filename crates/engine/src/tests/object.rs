use super::{assert_bool, assert_number, assert_throws};

#[test]
fn plain_object_literal_properties_are_enumerable_own_keys() {
    assert_bool(
        "
        let o = { a: 1, b: 2 };
        Object.keys(o).length === 2 && o.a === 1 && o.b === 2
        ",
        true,
    );
}

#[test]
fn non_writable_data_property_assignment_is_silently_ignored_in_sloppy_mode() {
    assert_number(
        "
        let o = {};
        Object.defineProperty(o, 'x', { value: 1, writable: false });
        o.x = 2;
        o.x
        ",
        1.0,
    );
}

#[test]
fn redefining_a_non_configurable_property_throws_type_error() {
    assert_throws(
        "
        let o = {};
        Object.defineProperty(o, 'x', { value: 1, configurable: false });
        Object.defineProperty(o, 'x', { value: 2 });
        ",
        "TypeError",
    );
}

#[test]
fn accessor_property_getter_and_setter_round_trip() {
    assert_number(
        "
        let store = 0;
        let o = {
            get value() { return store; },
            set value(v) { store = v * 2; },
        };
        o.value = 10;
        o.value
        ",
        20.0,
    );
}

#[test]
fn strict_equality_treats_nan_as_unequal_to_itself_but_zero_signs_as_equal() {
    assert_bool("NaN !== NaN", true);
    assert_bool("0 === -0", true);
}

#[test]
fn prototype_chain_property_lookup_reaches_inherited_members() {
    assert_number(
        "
        let base = { greet() { return 1; } };
        let derived = Object.create(base);
        derived.greet()
        ",
        1.0,
    );
}

#[test]
fn delete_removes_a_configurable_own_property() {
    assert_bool(
        "
        let o = { a: 1 };
        delete o.a;
        !('a' in o)
        ",
        true,
    );
}

#[test]
fn delete_of_a_non_configurable_property_fails_and_leaves_it_in_place() {
    assert_bool(
        "
        let o = {};
        Object.defineProperty(o, 'a', { value: 1, configurable: false });
        let deleted = delete o.a;
        !deleted && o.a === 1
        ",
        true,
    );
}
