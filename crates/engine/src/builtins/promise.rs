//! `Promise`: the constructor, `.then`/`.catch`/`.finally`,
//! the `resolve`/`reject`/`all`/`race`/`allSettled`/`any` statics, and
//! the two job kinds ([`crate::job::Job::PromiseReaction`],
//! [`crate::job::Job::PromiseResolveThenable`]) that actually run
//! reaction handlers once the synchronous call stack has unwound.

use super::{arg, data_property, method, native_constructor, symbol_method};
use crate::context::Context;
use crate::error::{JsResult, NativeError};
use crate::job::Job;
use crate::object::native_closure::NativeClosureData;
use crate::object::{JsObject, ObjectKind, PromiseData, PromiseReaction, PromiseState};
use crate::property::{PropertyDescriptor, PropertyKey};
use crate::value::{JsValue, WellKnownSymbols};
use vesper_gc::{Finalize, Trace};

/// A `PromiseCapability` Record: a promise plus its own
/// `resolve`/`reject` functions, created together so code that
/// produces a promise (`Promise.all`, `.then`) can settle it without
/// going back through the constructor's executor protocol.
#[derive(Clone)]
pub struct PromiseCapability {
    pub promise: JsObject,
    pub resolve: JsObject,
    pub reject: JsObject,
}

impl Finalize for PromiseCapability {
    fn finalize(&self) {
        self.promise.finalize();
        self.resolve.finalize();
        self.reject.finalize();
    }
}
unsafe impl Trace for PromiseCapability {
    fn trace(&self) {
        self.promise.trace();
        self.resolve.trace();
        self.reject.trace();
    }
}

pub fn init_prototype(proto: &JsObject, function_prototype: &JsObject, wks: &WellKnownSymbols) {
    method(proto, function_prototype, "then", 2, then);
    method(proto, function_prototype, "catch", 1, catch);
    method(proto, function_prototype, "finally", 1, finally);
    let _ = proto.define_own_property(
        PropertyKey::Symbol(wks.to_string_tag.clone()),
        PropertyDescriptor::data(JsValue::from("Promise"), false, false, true),
    );
}

pub fn constructor(function_prototype: &JsObject, promise_prototype: &JsObject) -> JsObject {
    let ctor = native_constructor(function_prototype, "Promise", 1, call, construct);
    data_property(&ctor, "prototype", JsValue::Object(promise_prototype.clone()));
    data_property(promise_prototype, "constructor", JsValue::Object(ctor.clone()));

    method(&ctor, function_prototype, "resolve", 1, resolve_static);
    method(&ctor, function_prototype, "reject", 1, reject_static);
    method(&ctor, function_prototype, "all", 1, all);
    method(&ctor, function_prototype, "race", 1, race);
    method(&ctor, function_prototype, "allSettled", 1, all_settled);
    method(&ctor, function_prototype, "any", 1, any);
    ctor
}

fn call(_this: &JsValue, _args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    Err(ctx.throw_native(NativeError::typ("Constructor Promise requires 'new'")))
}

fn construct(args: &[JsValue], new_target: &JsValue, ctx: &mut Context) -> JsResult<JsValue> {
    let executor = arg(args, 0);
    if !executor.is_callable() {
        return Err(ctx.throw_native(NativeError::typ("Promise resolver is not a function")));
    }
    let obj = crate::evaluator::function_call::ordinary_create_from_constructor(
        new_target.as_object().ok_or_else(|| ctx.throw_native(NativeError::typ("new.target must be an object")))?,
        ctx,
    )?;
    obj.data_mut().kind = ObjectKind::Promise(PromiseData {
        state: PromiseState::Pending,
        fulfill_reactions: Vec::new(),
        reject_reactions: Vec::new(),
        is_handled: false,
    });
    let capability = capability_for(obj.clone(), ctx);
    let call_result = executor.call(
        &JsValue::Undefined,
        &[JsValue::Object(capability.resolve.clone()), JsValue::Object(capability.reject.clone())],
        ctx,
    );
    if let Err(e) = call_result {
        capability.reject.call(&JsValue::Undefined, &[e.into_value()], ctx)?;
    }
    Ok(JsValue::Object(obj))
}

/// Builds the resolve/reject pair for an already-constructed pending
/// promise (`CreateResolvingFunctions`), without running through
/// `[[Construct]]` — used both by the constructor and by every
/// internal algorithm that needs a fresh `PromiseCapability`.
fn capability_for(promise: JsObject, ctx: &mut Context) -> PromiseCapability {
    let function_prototype = ctx.realm().intrinsics.function_prototype.clone();
    let resolve = JsObject::new(
        Some(function_prototype.clone()),
        ObjectKind::NativeClosure(NativeClosureData {
            call: resolve_closure,
            captures: vec![JsValue::Object(promise.clone())],
            name: "",
            length: 1,
        }),
    );
    let reject = JsObject::new(
        Some(function_prototype),
        ObjectKind::NativeClosure(NativeClosureData {
            call: reject_closure,
            captures: vec![JsValue::Object(promise.clone())],
            name: "",
            length: 1,
        }),
    );
    PromiseCapability { promise, resolve, reject }
}

pub fn new_promise_capability(ctx: &mut Context) -> PromiseCapability {
    let promise = JsObject::new(
        Some(ctx.realm().intrinsics.promise_prototype.clone()),
        ObjectKind::Promise(PromiseData {
            state: PromiseState::Pending,
            fulfill_reactions: Vec::new(),
            reject_reactions: Vec::new(),
            is_handled: false,
        }),
    );
    capability_for(promise, ctx)
}

fn is_pending(promise: &JsObject) -> bool {
    matches!(promise.data().kind, ObjectKind::Promise(PromiseData { state: PromiseState::Pending, .. }))
}

fn resolve_closure(_this: &JsValue, args: &[JsValue], captures: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let JsValue::Object(promise) = &captures[0] else { unreachable!() };
    if !is_pending(promise) {
        return Ok(JsValue::Undefined);
    }
    let value = arg(args, 0);
    if let JsValue::Object(o) = &value {
        if o == promise {
            let err = ctx.throw_native(NativeError::typ("Chaining cycle detected for promise"));
            return reject_promise(promise, err.into_value(), ctx);
        }
    }
    if let JsValue::Object(thenable) = &value {
        let then = thenable.get(&PropertyKey::from("then"), &value, ctx)?;
        if then.is_callable() {
            let JsValue::Object(then_fn) = then else { unreachable!() };
            ctx.enqueue_job(Job::PromiseResolveThenable { promise: promise.clone(), thenable: value, then: then_fn });
            return Ok(JsValue::Undefined);
        }
    }
    fulfill_promise(promise, value, ctx)
}

fn reject_closure(_this: &JsValue, args: &[JsValue], captures: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let JsValue::Object(promise) = &captures[0] else { unreachable!() };
    if !is_pending(promise) {
        return Ok(JsValue::Undefined);
    }
    reject_promise(promise, arg(args, 0), ctx)
}

fn fulfill_promise(promise: &JsObject, value: JsValue, ctx: &mut Context) -> JsResult<JsValue> {
    let reactions = {
        let mut data = promise.data_mut();
        let ObjectKind::Promise(p) = &mut data.kind else { unreachable!() };
        p.state = PromiseState::Fulfilled(value.clone());
        p.reject_reactions.clear();
        std::mem::take(&mut p.fulfill_reactions)
    };
    for reaction in reactions {
        trigger_reaction(reaction, value.clone(), ctx);
    }
    Ok(JsValue::Undefined)
}

fn reject_promise(promise: &JsObject, reason: JsValue, ctx: &mut Context) -> JsResult<JsValue> {
    let reactions = {
        let mut data = promise.data_mut();
        let ObjectKind::Promise(p) = &mut data.kind else { unreachable!() };
        p.state = PromiseState::Rejected(reason.clone());
        let reactions = std::mem::take(&mut p.reject_reactions);
        p.fulfill_reactions.clear();
        reactions
    };
    for reaction in reactions {
        trigger_reaction(reaction, reason.clone(), ctx);
    }
    Ok(JsValue::Undefined)
}

fn trigger_reaction(reaction: PromiseReaction, argument: JsValue, ctx: &mut Context) {
    ctx.enqueue_job(Job::PromiseReaction { handler: reaction.handler, argument, capability: reaction.capability });
}

/// Drains one `Job` (a `PromiseReactionJob`/`PromiseResolveThenableJob`).
pub fn run_job(job: Job, ctx: &mut Context) -> JsResult<()> {
    match job {
        Job::PromiseReaction { handler, argument, capability } => {
            let result = match &handler {
                Some(h) => h.call(&JsValue::Undefined, &[argument], ctx),
                None => Ok(argument),
            };
            if let Some(capability) = capability {
                match result {
                    Ok(v) => {
                        capability.resolve.call(&JsValue::Undefined, &[v], ctx)?;
                    }
                    Err(e) => {
                        capability.reject.call(&JsValue::Undefined, &[e.into_value()], ctx)?;
                    }
                }
            } else if let Err(e) = result {
                log::debug!("unhandled promise rejection: {e}");
            }
            Ok(())
        }
        Job::PromiseResolveThenable { promise, thenable, then } => {
            let capability = capability_for(promise, ctx);
            let call_result = then.call(&thenable, &[JsValue::Object(capability.resolve.clone()), JsValue::Object(capability.reject.clone())], ctx);
            if let Err(e) = call_result {
                capability.reject.call(&JsValue::Undefined, &[e.into_value()], ctx)?;
            }
            Ok(())
        }
    }
}

/// `PerformPromiseThen`: registers reactions if the
/// promise is still pending, or enqueues a job immediately if it has
/// already settled. Returns the chained promise (or `undefined` when
/// `result_capability` is `None`, the shape `.then` never actually
/// uses but internal callers like `.finally`'s plumbing sometimes do).
pub fn perform_promise_then(
    promise: &JsObject,
    on_fulfilled: Option<JsObject>,
    on_rejected: Option<JsObject>,
    result_capability: Option<PromiseCapability>,
    ctx: &mut Context,
) -> JsValue {
    let fulfill_reaction = PromiseReaction { capability: result_capability.clone(), handler: on_fulfilled, is_fulfill: true };
    let reject_reaction = PromiseReaction { capability: result_capability.clone(), handler: on_rejected, is_fulfill: false };

    let settled = {
        let mut data = promise.data_mut();
        let ObjectKind::Promise(p) = &mut data.kind else {
            return result_capability.map(|c| JsValue::Object(c.promise)).unwrap_or(JsValue::Undefined);
        };
        p.is_handled = true;
        match &p.state {
            PromiseState::Pending => {
                p.fulfill_reactions.push(fulfill_reaction);
                p.reject_reactions.push(reject_reaction);
                None
            }
            PromiseState::Fulfilled(v) => Some((true, v.clone())),
            PromiseState::Rejected(v) => Some((false, v.clone())),
        }
    };
    if let Some((is_fulfill, value)) = settled {
        let reaction = if is_fulfill { fulfill_reaction } else { reject_reaction };
        ctx.enqueue_job(Job::PromiseReaction { handler: reaction.handler, argument: value, capability: reaction.capability });
    }
    result_capability.map(|c| JsValue::Object(c.promise)).unwrap_or(JsValue::Undefined)
}

fn callable_or_none(value: JsValue) -> Option<JsObject> {
    match value {
        JsValue::Object(o) if o.is_callable() => Some(o),
        _ => None,
    }
}

fn then(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let JsValue::Object(promise) = this else {
        return Err(ctx.throw_native(NativeError::typ("Promise.prototype.then called on non-Promise")));
    };
    if !matches!(promise.data().kind, ObjectKind::Promise(_)) {
        return Err(ctx.throw_native(NativeError::typ("Promise.prototype.then called on non-Promise")));
    }
    let on_fulfilled = callable_or_none(arg(args, 0));
    let on_rejected = callable_or_none(arg(args, 1));
    let capability = new_promise_capability(ctx);
    Ok(perform_promise_then(promise, on_fulfilled, on_rejected, Some(capability), ctx))
}

fn catch(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    then(this, &[JsValue::Undefined, arg(args, 0)], ctx)
}

fn finally(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let on_finally = arg(args, 0);
    if !on_finally.is_callable() {
        return then(this, &[on_finally.clone(), on_finally], ctx);
    }
    let function_prototype = ctx.realm().intrinsics.function_prototype.clone();
    let then_finally = JsObject::new(
        Some(function_prototype.clone()),
        ObjectKind::NativeClosure(NativeClosureData { call: finally_wrapper, captures: vec![on_finally.clone(), JsValue::from(true)], name: "", length: 1 }),
    );
    let catch_finally = JsObject::new(
        Some(function_prototype),
        ObjectKind::NativeClosure(NativeClosureData { call: finally_wrapper, captures: vec![on_finally, JsValue::from(false)], name: "", length: 1 }),
    );
    then(this, &[JsValue::Object(then_finally), JsValue::Object(catch_finally)], ctx)
}

fn finally_wrapper(_this: &JsValue, args: &[JsValue], captures: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let on_finally = captures[0].clone();
    let is_fulfill = captures[1].to_boolean();
    let value = arg(args, 0);
    crate::operations::call(&on_finally, &JsValue::Undefined, &[], ctx)?;
    if is_fulfill {
        Ok(value)
    } else {
        Err(crate::error::JsError::from_value(value))
    }
}

pub(crate) fn resolve_static(this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let value = arg(args, 0);
    if let JsValue::Object(o) = &value {
        if matches!(o.data().kind, ObjectKind::Promise(_)) {
            return Ok(value);
        }
    }
    let _ = this;
    let capability = new_promise_capability(ctx);
    capability.resolve.call(&JsValue::Undefined, &[value], ctx)?;
    Ok(JsValue::Object(capability.promise))
}

fn reject_static(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let capability = new_promise_capability(ctx);
    capability.reject.call(&JsValue::Undefined, &[arg(args, 0)], ctx)?;
    Ok(JsValue::Object(capability.promise))
}

fn all(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let items = crate::operations::iterator_to_list(&arg(args, 0), ctx)?;
    let capability = new_promise_capability(ctx);
    if items.is_empty() {
        let empty = crate::operations::array_from_values(&[], ctx);
        capability.resolve.call(&JsValue::Undefined, &[JsValue::Object(empty)], ctx)?;
        return Ok(JsValue::Object(capability.promise));
    }
    let results = crate::operations::array_from_values(&vec![JsValue::Undefined; items.len()], ctx);
    let remaining = JsObject::new(Some(ctx.realm().intrinsics.object_prototype.clone()), ObjectKind::Ordinary);
    data_property(&remaining, "count", JsValue::from(items.len() as f64));

    let function_prototype = ctx.realm().intrinsics.function_prototype.clone();
    for (index, item) in items.into_iter().enumerate() {
        let item_promise = resolve_static(&JsValue::Undefined, &[item], ctx)?;
        let JsValue::Object(item_promise) = item_promise else { unreachable!() };
        let on_fulfilled = JsObject::new(
            Some(function_prototype.clone()),
            ObjectKind::NativeClosure(NativeClosureData {
                call: all_fulfilled,
                captures: vec![
                    JsValue::Object(results.clone()),
                    JsValue::Object(remaining.clone()),
                    JsValue::from(index as f64),
                    JsValue::Object(capability.resolve.clone()),
                ],
                name: "",
                length: 1,
            }),
        );
        perform_promise_then(&item_promise, Some(on_fulfilled), Some(capability.reject.clone()), None, ctx);
    }
    Ok(JsValue::Object(capability.promise))
}

fn all_fulfilled(_this: &JsValue, args: &[JsValue], captures: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let JsValue::Object(results) = &captures[0] else { unreachable!() };
    let JsValue::Object(remaining) = &captures[1] else { unreachable!() };
    let JsValue::Number(index) = captures[2] else { unreachable!() };
    let resolve = &captures[3];
    results.set(PropertyKey::from(index as u32), arg(args, 0), &JsValue::Object(results.clone()), ctx)?;
    let left = remaining.get(&PropertyKey::from("count"), &JsValue::Object(remaining.clone()), ctx)?;
    let left = crate::operations::to_number(&left, ctx)? - 1.0;
    data_property(remaining, "count", JsValue::from(left));
    if left <= 0.0 {
        crate::operations::call(resolve, &JsValue::Undefined, &[JsValue::Object(results.clone())], ctx)?;
    }
    Ok(JsValue::Undefined)
}

fn race(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let items = crate::operations::iterator_to_list(&arg(args, 0), ctx)?;
    let capability = new_promise_capability(ctx);
    for item in items {
        let item_promise = resolve_static(&JsValue::Undefined, &[item], ctx)?;
        let JsValue::Object(item_promise) = item_promise else { unreachable!() };
        perform_promise_then(&item_promise, Some(capability.resolve.clone()), Some(capability.reject.clone()), None, ctx);
    }
    Ok(JsValue::Object(capability.promise))
}

fn all_settled(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let items = crate::operations::iterator_to_list(&arg(args, 0), ctx)?;
    let capability = new_promise_capability(ctx);
    if items.is_empty() {
        let empty = crate::operations::array_from_values(&[], ctx);
        capability.resolve.call(&JsValue::Undefined, &[JsValue::Object(empty)], ctx)?;
        return Ok(JsValue::Object(capability.promise));
    }
    let results = crate::operations::array_from_values(&vec![JsValue::Undefined; items.len()], ctx);
    let remaining = JsObject::new(Some(ctx.realm().intrinsics.object_prototype.clone()), ObjectKind::Ordinary);
    data_property(&remaining, "count", JsValue::from(items.len() as f64));

    let function_prototype = ctx.realm().intrinsics.function_prototype.clone();
    for (index, item) in items.into_iter().enumerate() {
        let item_promise = resolve_static(&JsValue::Undefined, &[item], ctx)?;
        let JsValue::Object(item_promise) = item_promise else { unreachable!() };
        let on_fulfilled = JsObject::new(
            Some(function_prototype.clone()),
            ObjectKind::NativeClosure(NativeClosureData {
                call: settled_recorder,
                captures: vec![
                    JsValue::Object(results.clone()),
                    JsValue::Object(remaining.clone()),
                    JsValue::from(index as f64),
                    JsValue::Object(capability.resolve.clone()),
                    JsValue::from(true),
                ],
                name: "",
                length: 1,
            }),
        );
        let on_rejected = JsObject::new(
            Some(function_prototype.clone()),
            ObjectKind::NativeClosure(NativeClosureData {
                call: settled_recorder,
                captures: vec![
                    JsValue::Object(results.clone()),
                    JsValue::Object(remaining.clone()),
                    JsValue::from(index as f64),
                    JsValue::Object(capability.resolve.clone()),
                    JsValue::from(false),
                ],
                name: "",
                length: 1,
            }),
        );
        perform_promise_then(&item_promise, Some(on_fulfilled), Some(on_rejected), None, ctx);
    }
    Ok(JsValue::Object(capability.promise))
}

fn settled_recorder(_this: &JsValue, args: &[JsValue], captures: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let JsValue::Object(results) = &captures[0] else { unreachable!() };
    let JsValue::Object(remaining) = &captures[1] else { unreachable!() };
    let JsValue::Number(index) = captures[2] else { unreachable!() };
    let resolve = &captures[3];
    let is_fulfilled = captures[4].to_boolean();

    let entry = JsObject::new(Some(ctx.realm().intrinsics.object_prototype.clone()), ObjectKind::Ordinary);
    if is_fulfilled {
        data_property(&entry, "status", JsValue::from("fulfilled"));
        data_property(&entry, "value", arg(args, 0));
    } else {
        data_property(&entry, "status", JsValue::from("rejected"));
        data_property(&entry, "reason", arg(args, 0));
    }
    results.set(PropertyKey::from(index as u32), JsValue::Object(entry), &JsValue::Object(results.clone()), ctx)?;

    let left = remaining.get(&PropertyKey::from("count"), &JsValue::Object(remaining.clone()), ctx)?;
    let left = crate::operations::to_number(&left, ctx)? - 1.0;
    data_property(remaining, "count", JsValue::from(left));
    if left <= 0.0 {
        crate::operations::call(resolve, &JsValue::Undefined, &[JsValue::Object(results.clone())], ctx)?;
    }
    Ok(JsValue::Undefined)
}

/// Simplified `Promise.any`: no `AggregateError` intrinsic exists in
/// this engine's smaller error taxonomy, so an all-rejected outcome
/// rejects with a plain `Error` instead of an `AggregateError`
/// carrying the individual reasons.
fn any(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let items = crate::operations::iterator_to_list(&arg(args, 0), ctx)?;
    let capability = new_promise_capability(ctx);
    if items.is_empty() {
        let err = ctx.throw_native(NativeError::new(crate::error::NativeErrorKind::Error, "All promises were rejected"));
        capability.reject.call(&JsValue::Undefined, &[err.into_value()], ctx)?;
        return Ok(JsValue::Object(capability.promise));
    }
    let remaining = JsObject::new(Some(ctx.realm().intrinsics.object_prototype.clone()), ObjectKind::Ordinary);
    data_property(&remaining, "count", JsValue::from(items.len() as f64));

    let function_prototype = ctx.realm().intrinsics.function_prototype.clone();
    for item in items {
        let item_promise = resolve_static(&JsValue::Undefined, &[item], ctx)?;
        let JsValue::Object(item_promise) = item_promise else { unreachable!() };
        let on_rejected = JsObject::new(
            Some(function_prototype.clone()),
            ObjectKind::NativeClosure(NativeClosureData {
                call: any_rejected,
                captures: vec![JsValue::Object(remaining.clone()), JsValue::Object(capability.reject.clone())],
                name: "",
                length: 1,
            }),
        );
        perform_promise_then(&item_promise, Some(capability.resolve.clone()), Some(on_rejected), None, ctx);
    }
    Ok(JsValue::Object(capability.promise))
}

fn any_rejected(_this: &JsValue, _args: &[JsValue], captures: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let JsValue::Object(remaining) = &captures[0] else { unreachable!() };
    let reject = &captures[1];
    let left = remaining.get(&PropertyKey::from("count"), &JsValue::Object(remaining.clone()), ctx)?;
    let left = crate::operations::to_number(&left, ctx)? - 1.0;
    data_property(remaining, "count", JsValue::from(left));
    if left <= 0.0 {
        let err = ctx.throw_native(NativeError::new(crate::error::NativeErrorKind::Error, "All promises were rejected"));
        crate::operations::call(reject, &JsValue::Undefined, &[err.into_value()], ctx)?;
    }
    Ok(JsValue::Undefined)
}
