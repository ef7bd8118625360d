use super::{assert_bool, assert_number, assert_throws};

#[test]
fn try_catch_recovers_from_a_thrown_type_error() {
    assert_bool(
        "
        let caught = false;
        try {
            null.x;
        } catch (e) {
            caught = e instanceof TypeError;
        }
        caught
        ",
        true,
    );
}

#[test]
fn property_access_on_null_throws_type_error() {
    assert_throws("null.x", "TypeError");
}

#[test]
fn property_access_on_undefined_throws_type_error() {
    assert_throws("undefined.x", "TypeError");
}

#[test]
fn finally_runs_even_when_try_throws() {
    assert_bool(
        "
        let ran = false;
        try {
            try {
                throw new Error('boom');
            } finally {
                ran = true;
            }
        } catch (e) {}
        ran
        ",
        true,
    );
}

#[test]
fn finally_block_replaces_an_in_flight_return_completion() {
    assert_number(
        "
        function f() {
            try {
                return 1;
            } finally {
                return 2;
            }
        }
        f()
        ",
        2.0,
    );
}

#[test]
fn labelled_continue_skips_to_the_next_outer_iteration() {
    assert_number(
        "
        let sum = 0;
        outer: for (let i = 0; i < 3; i++) {
            for (let j = 0; j < 3; j++) {
                if (j === 1) continue outer;
                sum += 1;
            }
        }
        sum
        ",
        3.0,
    );
}

#[test]
fn labelled_break_exits_the_named_loop_only() {
    assert_number(
        "
        let hits = 0;
        outer: for (let i = 0; i < 3; i++) {
            for (let j = 0; j < 3; j++) {
                if (i === 1) break outer;
                hits += 1;
            }
        }
        hits
        ",
        3.0,
    );
}

#[test]
fn reference_before_temporal_dead_zone_initialization_throws() {
    assert_throws(
        "
        {
            x;
            let x = 1;
        }
        ",
        "ReferenceError",
    );
}

#[test]
fn accessing_an_undeclared_identifier_throws_reference_error() {
    assert_throws("thisIsNotDeclaredAnywhere", "ReferenceError");
}
