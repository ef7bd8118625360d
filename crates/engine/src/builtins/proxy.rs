//! The `Proxy` constructor. `Proxy` is construct-only —
//! calling it without `new` is a `TypeError` — and has no `.prototype`
//! own property of its own (trap dispatch lives in
//! [`crate::object::proxy`]).

use super::{arg, native_constructor};
use crate::context::Context;
use crate::error::{JsResult, NativeError};
use crate::object::{JsObject, ObjectKind};
use crate::property::PropertyKey;
use crate::value::JsValue;

pub fn constructor(function_prototype: &JsObject) -> JsObject {
    native_constructor(function_prototype, "Proxy", 2, call, construct)
}

fn call(_this: &JsValue, _args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    Err(ctx.throw_native(NativeError::typ("Constructor Proxy requires 'new'")))
}

fn construct(args: &[JsValue], _new_target: &JsValue, ctx: &mut Context) -> JsResult<JsValue> {
    let target = match arg(args, 0) {
        JsValue::Object(o) => o,
        _ => return Err(ctx.throw_native(NativeError::typ("Cannot create proxy with a non-object as target"))),
    };
    let handler = match arg(args, 1) {
        JsValue::Object(o) => o,
        _ => return Err(ctx.throw_native(NativeError::typ("Cannot create proxy with a non-object as handler"))),
    };
    let proto = if target.is_callable() { None } else { target.get_prototype_of()? };
    let _ = proto;
    let obj = JsObject::new(
        None,
        ObjectKind::Proxy(crate::object::ProxyData { target: Some(target), handler: Some(handler) }),
    );
    Ok(JsValue::Object(obj))
}

/// `Proxy.revocable(target, handler)` — included alongside the plain
/// constructor since both are part of the same intrinsic surface.
pub fn install_revocable(proxy_ctor: &JsObject, function_prototype: &JsObject) {
    super::method(proxy_ctor, function_prototype, "revocable", 2, revocable);
}

fn revocable(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let proxy = construct(args, &JsValue::Undefined, ctx)?;
    let JsValue::Object(proxy_obj) = proxy.clone() else { unreachable!() };
    let revoke_target = proxy_obj.clone();
    let revoke = JsObject::new(
        Some(ctx.realm().intrinsics.function_prototype.clone()),
        ObjectKind::NativeClosure(crate::object::native_closure::NativeClosureData {
            call: revoke_call,
            captures: vec![JsValue::Object(revoke_target)],
            name: "",
            length: 0,
        }),
    );

    let result = JsObject::new(Some(ctx.realm().intrinsics.object_prototype.clone()), ObjectKind::Ordinary);
    let _ = result.define_own_property(PropertyKey::from("proxy"), crate::property::PropertyDescriptor::builtin(proxy));
    let _ = result.define_own_property(PropertyKey::from("revoke"), crate::property::PropertyDescriptor::builtin(JsValue::Object(revoke)));
    Ok(JsValue::Object(result))
}

fn revoke_call(_this: &JsValue, _args: &[JsValue], captures: &[JsValue], _ctx: &mut Context) -> JsResult<JsValue> {
    if let JsValue::Object(proxy) = &captures[0] {
        let mut data = proxy.data_mut();
        if let ObjectKind::Proxy(p) = &mut data.kind {
            p.target = None;
            p.handler = None;
        }
    }
    Ok(JsValue::Undefined)
}
