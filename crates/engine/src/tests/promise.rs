//! `evaluate` drains the job queue before returning, so the completion
//! value of the script that *sets up* a `.then` chain is captured
//! before any reaction callback has run. These tests run the setup in
//! one `evaluate` call and read the resulting state back in a second
//! one against the same `Context`, by which point every microtask
//! enqueued by the first has already drained.

use crate::value::JsValue;
use crate::Context;

fn run_then_read(setup: &str, read: &str) -> JsValue {
    let mut ctx = Context::new();
    crate::evaluate(setup, &mut ctx).expect("setup script should not throw");
    crate::evaluate(read, &mut ctx).expect("read-back script should not throw")
}

#[test]
fn then_callback_does_not_run_synchronously() {
    let mut ctx = Context::new();
    let result = crate::evaluate(
        "
        var order = [];
        Promise.resolve(1).then(() => order.push('then'));
        order.push('sync');
        order.length
        ",
        &mut ctx,
    )
    .unwrap();
    // Only 'sync' has run by the time the script's own completion
    // value is captured; the reaction job hasn't drained yet.
    assert!(matches!(result, JsValue::Number(n) if n == 1.0));
}

#[test]
fn chained_then_callbacks_run_in_registration_order() {
    let result = run_then_read(
        "
        var order = [];
        var p = Promise.resolve();
        p.then(() => order.push('a'));
        p.then(() => order.push('b'));
        ",
        "order.join(',')",
    );
    match result {
        JsValue::String(s) => assert_eq!(s.to_std_string_lossy(), "a,b"),
        other => panic!("expected a string, got {other:?}"),
    }
}

#[test]
fn then_return_value_flows_into_the_next_link_of_the_chain() {
    let result = run_then_read(
        "
        var result = '';
        Promise.resolve(1)
            .then((v) => v + 1)
            .then((v) => { result = 'value:' + v; });
        ",
        "result",
    );
    match result {
        JsValue::String(s) => assert_eq!(s.to_std_string_lossy(), "value:2"),
        other => panic!("expected a string, got {other:?}"),
    }
}

#[test]
fn a_rejected_promise_is_caught_by_the_nearest_rejection_handler() {
    let result = run_then_read(
        "
        var caught = false;
        Promise.reject(new Error('boom')).then(
            () => {},
            (e) => { caught = e.message === 'boom'; }
        );
        ",
        "caught",
    );
    assert!(matches!(result, JsValue::Boolean(true)));
}

#[test]
fn resolving_a_promise_with_a_thenable_adopts_its_eventual_state() {
    let result = run_then_read(
        "
        var result = '';
        var thenable = { then(resolve) { resolve('adopted'); } };
        Promise.resolve(thenable).then((v) => { result = v; });
        ",
        "result",
    );
    match result {
        JsValue::String(s) => assert_eq!(s.to_std_string_lossy(), "adopted"),
        other => panic!("expected a string, got {other:?}"),
    }
}
