//! Intrinsic bootstrapping: builds every
//! prototype and constructor in topological order (prototypes before
//! the constructors wired to them, parents before the children that
//! extend them) and wires up the global object/environment.
//!
//! Each submodule owns one intrinsic's surface and exposes an `init`
//! (installs prototype methods) and, for constructible intrinsics, a
//! `constructor` function building the `NativeFunction` object itself.
//! This module only sequences those calls and hosts the handful of
//! helpers every submodule needs (building a native function object,
//! `ToPropertyDescriptor`/`FromPropertyDescriptor`).

pub mod array;
pub mod boolean;
pub mod error;
pub mod function;
pub mod globals;
pub mod iteration;
pub mod json;
pub mod math;
pub mod number;
pub mod object;
pub mod promise;
pub mod proxy;
pub mod reflect;
pub mod string;
pub mod symbol;
pub mod typed_array;

use crate::context::Context;
use crate::environment::global::GlobalEnvironmentData;
use crate::environment::{Environment, EnvironmentKind};
use crate::error::{JsResult, NativeError};
use crate::object::{JsObject, NativeConstructFn, NativeFn, NativeFunctionData, ObjectKind};
use crate::property::{PropertyDescriptor, PropertyKey};
use crate::realm::{Intrinsics, Realm};
use crate::value::{JsValue, WellKnownSymbols};

pub(crate) fn arg(args: &[JsValue], i: usize) -> JsValue {
    args.get(i).cloned().unwrap_or(JsValue::Undefined)
}

pub(crate) fn this_object(this: &JsValue, ctx: &mut Context) -> JsResult<JsObject> {
    crate::operations::to_object(this, ctx)
}

/// Builds a plain (non-constructible) native function, installing the
/// mandated non-enumerable `name`/`length` own properties.
pub(crate) fn native_function(function_prototype: &JsObject, name: &'static str, length: usize, call: NativeFn) -> JsObject {
    let obj = JsObject::new(
        Some(function_prototype.clone()),
        ObjectKind::NativeFunction(NativeFunctionData { call, construct: None, length, name }),
    );
    install_name_length(&obj, name, length);
    obj
}

pub(crate) fn native_constructor(
    function_prototype: &JsObject,
    name: &'static str,
    length: usize,
    call: NativeFn,
    construct: NativeConstructFn,
) -> JsObject {
    let obj = JsObject::new(
        Some(function_prototype.clone()),
        ObjectKind::NativeFunction(NativeFunctionData { call, construct: Some(construct), length, name }),
    );
    install_name_length(&obj, name, length);
    obj
}

fn install_name_length(obj: &JsObject, name: &str, length: usize) {
    let _ = obj.define_own_property(PropertyKey::from("name"), PropertyDescriptor::data(JsValue::from(name), false, false, true));
    let _ = obj.define_own_property(
        PropertyKey::from("length"),
        PropertyDescriptor::data(JsValue::from(length as i32), false, false, true),
    );
}

/// Installs a method under a string key (the common case for
/// `prototype.foo = function foo() {...}`).
pub(crate) fn method(target: &JsObject, function_prototype: &JsObject, name: &'static str, length: usize, call: NativeFn) {
    let f = native_function(function_prototype, name, length, call);
    let _ = target.define_own_property(PropertyKey::from(name), PropertyDescriptor::builtin(JsValue::Object(f)));
}

/// Installs a method under a well-known symbol key (`Symbol.iterator`
/// and friends).
pub(crate) fn symbol_method(
    target: &JsObject,
    function_prototype: &JsObject,
    sym: crate::value::JsSymbol,
    name: &'static str,
    length: usize,
    call: NativeFn,
) {
    let f = native_function(function_prototype, name, length, call);
    let _ = target.define_own_property(PropertyKey::Symbol(sym), PropertyDescriptor::builtin(JsValue::Object(f)));
}

pub(crate) fn accessor(target: &JsObject, function_prototype: &JsObject, name: &'static str, getter: NativeFn) {
    let g = native_function(function_prototype, name, 0, getter);
    let _ = target.define_own_property(PropertyKey::from(name), PropertyDescriptor::accessor(Some(JsValue::Object(g)), None, false, true));
}

pub(crate) fn data_property(target: &JsObject, name: &str, value: JsValue) {
    let _ = target.define_own_property(PropertyKey::from(name), PropertyDescriptor::data(value, false, false, false));
}

/// `ToPropertyDescriptor`: reads the `value`/`writable`/`get`/`set`/
/// `enumerable`/`configurable` own properties of a descriptor-shaped
/// argument object, used by `Object.defineProperty(s)` and
/// `Reflect.defineProperty`.
pub(crate) fn to_property_descriptor(value: &JsValue, ctx: &mut Context) -> JsResult<PropertyDescriptor> {
    let JsValue::Object(obj) = value else {
        return Err(ctx.throw_native(NativeError::typ("property description must be an object")));
    };
    let mut desc = PropertyDescriptor::default();
    if obj.has_property(&PropertyKey::from("enumerable"))? {
        let v = obj.get(&PropertyKey::from("enumerable"), value, ctx)?;
        desc.enumerable = Some(v.to_boolean());
    }
    if obj.has_property(&PropertyKey::from("configurable"))? {
        let v = obj.get(&PropertyKey::from("configurable"), value, ctx)?;
        desc.configurable = Some(v.to_boolean());
    }
    if obj.has_property(&PropertyKey::from("value"))? {
        desc.value = Some(obj.get(&PropertyKey::from("value"), value, ctx)?);
    }
    if obj.has_property(&PropertyKey::from("writable"))? {
        let v = obj.get(&PropertyKey::from("writable"), value, ctx)?;
        desc.writable = Some(v.to_boolean());
    }
    if obj.has_property(&PropertyKey::from("get"))? {
        let g = obj.get(&PropertyKey::from("get"), value, ctx)?;
        if !g.is_undefined() && !g.is_callable() {
            return Err(ctx.throw_native(NativeError::typ("getter must be a function")));
        }
        desc.get = Some(g);
    }
    if obj.has_property(&PropertyKey::from("set"))? {
        let s = obj.get(&PropertyKey::from("set"), value, ctx)?;
        if !s.is_undefined() && !s.is_callable() {
            return Err(ctx.throw_native(NativeError::typ("setter must be a function")));
        }
        desc.set = Some(s);
    }
    if (desc.get.is_some() || desc.set.is_some()) && (desc.value.is_some() || desc.writable.is_some()) {
        return Err(ctx.throw_native(NativeError::typ("property descriptor cannot be both a data and an accessor descriptor")));
    }
    Ok(desc)
}

/// `FromPropertyDescriptor`: the plain-object mirror `Object`/`Reflect`
/// `getOwnPropertyDescriptor` return.
pub(crate) fn from_property_descriptor(desc: &PropertyDescriptor, ctx: &mut Context) -> JsObject {
    let obj = JsObject::new(Some(ctx.realm().intrinsics.object_prototype.clone()), ObjectKind::Ordinary);
    let set = |obj: &JsObject, name: &str, value: JsValue| {
        let _ = obj.define_own_property(PropertyKey::from(name), PropertyDescriptor::data(value, true, true, true));
    };
    if let Some(v) = &desc.value {
        set(&obj, "value", v.clone());
    }
    if let Some(w) = desc.writable {
        set(&obj, "writable", JsValue::from(w));
    }
    if let Some(g) = &desc.get {
        set(&obj, "get", g.clone());
    }
    if let Some(s) = &desc.set {
        set(&obj, "set", s.clone());
    }
    if let Some(e) = desc.enumerable {
        set(&obj, "enumerable", JsValue::from(e));
    }
    if let Some(c) = desc.configurable {
        set(&obj, "configurable", JsValue::from(c));
    }
    let _ = ctx;
    obj
}

/// Builds every intrinsic in dependency order and wires up the global
/// object/environment (`SetRealmGlobalObject`/`SetDefaultGlobalBindings`).
pub fn create_realm() -> Realm {
    let object_prototype = JsObject::new(None, ObjectKind::Ordinary);
    let function_prototype = JsObject::new(
        Some(object_prototype.clone()),
        ObjectKind::NativeFunction(NativeFunctionData { call: function::noop_call, construct: None, length: 0, name: "" }),
    );
    let array_prototype = crate::object::array::array_create(Some(object_prototype.clone()), 0);
    let string_prototype = JsObject::new(Some(object_prototype.clone()), ObjectKind::StringObject(vesper_string::JsString::from("")));
    let number_prototype = JsObject::new(Some(object_prototype.clone()), ObjectKind::NumberObject(0.0));
    let boolean_prototype = JsObject::new(Some(object_prototype.clone()), ObjectKind::BooleanObject(false));
    let symbol_prototype = JsObject::new(Some(object_prototype.clone()), ObjectKind::Ordinary);
    let error_prototype = JsObject::new(Some(object_prototype.clone()), ObjectKind::Error);
    let type_error_prototype = JsObject::new(Some(error_prototype.clone()), ObjectKind::Error);
    let range_error_prototype = JsObject::new(Some(error_prototype.clone()), ObjectKind::Error);
    let reference_error_prototype = JsObject::new(Some(error_prototype.clone()), ObjectKind::Error);
    let syntax_error_prototype = JsObject::new(Some(error_prototype.clone()), ObjectKind::Error);
    let eval_error_prototype = JsObject::new(Some(error_prototype.clone()), ObjectKind::Error);
    let uri_error_prototype = JsObject::new(Some(error_prototype.clone()), ObjectKind::Error);
    let promise_prototype = JsObject::new(Some(object_prototype.clone()), ObjectKind::Ordinary);
    let iterator_prototype = JsObject::new(Some(object_prototype.clone()), ObjectKind::Ordinary);
    let array_iterator_prototype = JsObject::new(Some(iterator_prototype.clone()), ObjectKind::Ordinary);
    let string_iterator_prototype = JsObject::new(Some(iterator_prototype.clone()), ObjectKind::Ordinary);
    let generator_function_prototype = JsObject::new(Some(function_prototype.clone()), ObjectKind::Ordinary);
    let generator_prototype = JsObject::new(Some(iterator_prototype.clone()), ObjectKind::Ordinary);

    let well_known_symbols = WellKnownSymbols::new();

    iteration::init_iterator_prototype(&iterator_prototype, &function_prototype, &well_known_symbols);
    iteration::init_array_iterator_prototype(&array_iterator_prototype, &function_prototype, &well_known_symbols);
    iteration::init_string_iterator_prototype(&string_iterator_prototype, &function_prototype, &well_known_symbols);
    iteration::init_generator_prototype(&generator_prototype, &function_prototype);

    object::init_prototype(&object_prototype, &function_prototype);
    function::init_prototype(&function_prototype);
    array::init_prototype(&array_prototype, &function_prototype, &well_known_symbols, &array_iterator_prototype);
    string::init_prototype(&string_prototype, &function_prototype, &well_known_symbols, &string_iterator_prototype);
    number::init_prototype(&number_prototype, &function_prototype);
    boolean::init_prototype(&boolean_prototype, &function_prototype);
    symbol::init_prototype(&symbol_prototype, &function_prototype, &well_known_symbols);
    error::init_prototype(&error_prototype, &function_prototype, "Error");
    error::init_prototype(&type_error_prototype, &function_prototype, "TypeError");
    error::init_prototype(&range_error_prototype, &function_prototype, "RangeError");
    error::init_prototype(&reference_error_prototype, &function_prototype, "ReferenceError");
    error::init_prototype(&syntax_error_prototype, &function_prototype, "SyntaxError");
    error::init_prototype(&eval_error_prototype, &function_prototype, "EvalError");
    error::init_prototype(&uri_error_prototype, &function_prototype, "URIError");
    promise::init_prototype(&promise_prototype, &function_prototype, &well_known_symbols);

    let object_constructor = object::constructor(&function_prototype, &object_prototype);
    let function_constructor = function::constructor(&function_prototype);
    let array_constructor = array::constructor(&function_prototype, &array_prototype, &well_known_symbols);
    let string_constructor = string::constructor(&function_prototype, &string_prototype);
    let number_constructor = number::constructor(&function_prototype, &number_prototype);
    let boolean_constructor = boolean::constructor(&function_prototype, &boolean_prototype);
    let symbol_constructor = symbol::constructor(&function_prototype, &symbol_prototype, &well_known_symbols);
    let error_constructor = error::constructor(&function_prototype, &error_prototype, "Error", None);
    let type_error_constructor = error::constructor(&function_prototype, &type_error_prototype, "TypeError", Some(error_constructor.clone()));
    let range_error_constructor = error::constructor(&function_prototype, &range_error_prototype, "RangeError", Some(error_constructor.clone()));
    let reference_error_constructor =
        error::constructor(&function_prototype, &reference_error_prototype, "ReferenceError", Some(error_constructor.clone()));
    let syntax_error_constructor = error::constructor(&function_prototype, &syntax_error_prototype, "SyntaxError", Some(error_constructor.clone()));
    let eval_error_constructor = error::constructor(&function_prototype, &eval_error_prototype, "EvalError", Some(error_constructor.clone()));
    let uri_error_constructor = error::constructor(&function_prototype, &uri_error_prototype, "URIError", Some(error_constructor.clone()));
    let promise_constructor = promise::constructor(&function_prototype, &promise_prototype);
    let proxy_constructor = proxy::constructor(&function_prototype);
    proxy::install_revocable(&proxy_constructor, &function_prototype);

    let math = math::build(&function_prototype, &object_prototype);
    let json = json::build(&function_prototype, &object_prototype);
    let reflect = reflect::build(&function_prototype, &object_prototype);

    let uint8array_constructor = typed_array::install(&object_prototype, &function_prototype);

    let intrinsics = Intrinsics {
        object_prototype,
        function_prototype,
        array_prototype,
        string_prototype,
        number_prototype,
        boolean_prototype,
        symbol_prototype,
        error_prototype,
        type_error_prototype,
        range_error_prototype,
        reference_error_prototype,
        syntax_error_prototype,
        eval_error_prototype,
        uri_error_prototype,
        promise_prototype,
        iterator_prototype,
        array_iterator_prototype,
        string_iterator_prototype,
        generator_function_prototype,
        generator_prototype,

        object_constructor,
        function_constructor,
        array_constructor,
        string_constructor,
        number_constructor,
        boolean_constructor,
        symbol_constructor,
        error_constructor,
        type_error_constructor,
        range_error_constructor,
        reference_error_constructor,
        syntax_error_constructor,
        eval_error_constructor,
        uri_error_constructor,
        promise_constructor,
        proxy_constructor,
        uint8array_constructor,

        math,
        json,
        reflect,

        well_known_symbols,
    };

    let global_object = JsObject::new(Some(intrinsics.object_prototype.clone()), ObjectKind::Ordinary);
    let global_env = Environment::new(None, EnvironmentKind::Global(GlobalEnvironmentData::new(global_object.clone())));

    let mut realm = Realm { intrinsics, global_object, global_env };
    globals::install(&mut realm);
    realm
}
