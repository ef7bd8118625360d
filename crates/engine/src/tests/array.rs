use super::{assert_bool, assert_number, assert_throws};

#[test]
fn push_returns_new_length_and_appends() {
    assert_number(
        "
        let a = [1, 2];
        let n = a.push(3, 4);
        n === 4 && a.length === 4 && a[2] === 3 && a[3] === 4 ? 1 : 0
        ",
        1.0,
    );
}

#[test]
fn pop_shrinks_length_and_returns_last_element() {
    assert_number(
        "
        let a = [1, 2, 3];
        let popped = a.pop();
        popped === 3 && a.length === 2 ? 1 : 0
        ",
        1.0,
    );
}

#[test]
fn pop_on_empty_array_returns_undefined_and_leaves_length_zero() {
    assert_bool("[].pop() === undefined", true);
}

#[test]
fn flat_defaults_to_depth_one() {
    assert_bool(
        "
        let flattened = [[1, 2], [3, [4]]].flat();
        flattened.length === 3 &&
            flattened[0] === 1 && flattened[1] === 2 &&
            Array.isArray(flattened[2]) && flattened[2].length === 1
        ",
        true,
    );
}

#[test]
fn flat_infinity_flattens_every_level() {
    assert_bool(
        "
        let flattened = [[1, 2], [3, [4]]].flat(Infinity);
        flattened.length === 4 &&
            flattened[0] === 1 && flattened[1] === 2 &&
            flattened[2] === 3 && flattened[3] === 4
        ",
        true,
    );
}

#[test]
fn length_setter_truncates_and_deletes_trailing_indices() {
    assert_bool(
        "
        let a = [1, 2, 3, 4, 5];
        a.length = 2;
        a.length === 2 && a[2] === undefined && a[4] === undefined
        ",
        true,
    );
}

#[test]
fn defining_non_configurable_index_blocks_length_truncation_past_it() {
    assert_throws(
        "
        let a = [1, 2, 3];
        Object.defineProperty(a, 1, { configurable: false });
        Object.defineProperty(a, 'length', { value: 0 });
        ",
        "TypeError",
    );
}

#[test]
fn assigning_an_integer_index_past_length_extends_length() {
    assert_number(
        "
        let a = [1, 2];
        a[5] = 'x';
        a.length
        ",
        6.0,
    );
}
