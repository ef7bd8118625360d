//! Object kinds and the uniform internal-method dispatch table.
//!
//! An object is modelled as a record (`ObjectData`) holding the shared
//! slots every kind has (prototype, extensibility, own-property map)
//! plus an `ObjectKind` that carries kind-specific state and overrides
//! the handful of internal methods that differ from the ordinary
//! algorithm — a method table *per kind*, not subclassing.

pub mod array;
pub mod array_iterator;
pub mod arguments;
pub mod bound_function;
pub mod function;
pub mod generator;
pub mod integer_indexed;
pub mod native_closure;
pub mod ordinary;
pub mod proxy;
pub mod string_exotic;
pub mod string_iterator;

pub use array::ArrayData;
pub use array_iterator::{ArrayIterKind, ArrayIteratorData};
pub use arguments::ArgumentsData;
pub use bound_function::BoundFunctionData;
pub use function::FunctionData;
pub use generator::{GeneratorData, GeneratorOutcome};
pub use native_closure::{NativeClosureData, NativeClosureFn};
pub use proxy::ProxyData;
pub use string_iterator::StringIteratorData;

use crate::context::Context;
use crate::error::{JsResult, NativeError};
use crate::property::{PropertyDescriptor, PropertyKey};
use crate::value::JsValue;
use indexmap::IndexMap;
use std::cell::Cell;
use vesper_gc::{Gc, GcRefCell, Finalize, Trace};

/// Which exotic behaviour (if any) an object has, plus its
/// kind-specific payload. Each variant here documents which internal
/// methods it overrides versus `ordinary.rs`'s default algorithms.
pub enum ObjectKind {
    /// Default algorithms throughout.
    Ordinary,
    /// Overrides `[[DefineOwnProperty]]` for `length` coherence and
    /// integer-index updates.
    Array,
    /// Overrides `[[GetOwnProperty]]`, `[[OwnPropertyKeys]]`,
    /// `[[HasProperty]]` to expose UTF-16 code-unit indices.
    StringExotic(vesper_string::JsString),
    /// Parameter-map aliasing (unmapped for strict callers).
    Arguments(ArgumentsData),
    /// `[[Call]]` (and `[[Construct]]` for constructible kinds) run a
    /// function body under a fresh execution context.
    Function(FunctionData),
    /// `[[Call]]`/`[[Construct]]` prepend bound-this/bound-args.
    BoundFunction(BoundFunctionData),
    /// Every internal method forwards through a trap, with invariants
    /// checked afterwards.
    Proxy(ProxyData),
    /// A native (Rust-implemented) callable intrinsic method/constructor.
    NativeFunction(NativeFunctionData),
    /// A native callable that captures state (builtins created by
    /// `CreateBuiltinFunction` over an Abstract Closure, e.g. a
    /// `Promise`'s per-instance resolve/reject pair).
    NativeClosure(NativeClosureData),
    /// Boxed-primitive wrapper objects (`new Boolean(true)`, etc.) —
    /// ordinary internal methods, but `[[BooleanData]]`/`[[NumberData]]`
    /// /`[[StringData]]`/`[[SymbolData]]` back `valueOf`.
    BooleanObject(bool),
    NumberObject(f64),
    StringObject(vesper_string::JsString),
    /// Error objects: ordinary internal methods; the kind only marks
    /// identity for `instanceof`-independent introspection.
    Error,
    /// The single `Uint8Array`-shaped integer-indexed exotic instance
    /// — proof the kind works without
    /// building out the full typed-array element-type matrix.
    IntegerIndexed(IntegerIndexedData),
    /// Ordinary internal methods; the kind carries `[[PromiseState]]`,
    /// `[[PromiseResult]]`, and the pending reaction lists.
    Promise(PromiseData),
    /// `%ArrayIteratorPrototype%.next`'s `[[IteratedArrayLike]]`/
    /// `[[ArrayIteratorNextIndex]]` slots.
    ArrayIterator(ArrayIteratorData),
    /// `%StringIteratorPrototype%.next`'s `[[IteratedString]]`/
    /// `[[StringIteratorNextIndex]]` slots (code-point stepping).
    StringIterator(StringIteratorData),
    /// A generator/async-generator instance, eagerly run to completion
    /// at call time (see `object::generator`).
    Generator(GeneratorData),
}

/// `[[PromiseState]]`/`[[PromiseResult]]` plus the two reaction lists a
/// pending promise accumulates before it settles.
pub struct PromiseData {
    pub state: PromiseState,
    pub fulfill_reactions: Vec<PromiseReaction>,
    pub reject_reactions: Vec<PromiseReaction>,
    pub is_handled: bool,
}

pub enum PromiseState {
    Pending,
    Fulfilled(JsValue),
    Rejected(JsValue),
}

/// A `PromiseReaction` Record: either a `.then` handler to
/// call with the settled value, or (when `handler` is `None`) the
/// identity/thrower passthrough used by `.then()` called with no
/// corresponding argument.
pub struct PromiseReaction {
    pub capability: Option<crate::builtins::promise::PromiseCapability>,
    pub handler: Option<JsObject>,
    pub is_fulfill: bool,
}

impl Finalize for PromiseData {
    fn finalize(&self) {
        self.state.finalize();
        for r in self.fulfill_reactions.iter().chain(&self.reject_reactions) {
            r.capability.finalize();
            r.handler.finalize();
        }
    }
}
unsafe impl Trace for PromiseData {
    fn trace(&self) {
        self.state.trace();
        for r in self.fulfill_reactions.iter().chain(&self.reject_reactions) {
            r.capability.trace();
            r.handler.trace();
        }
    }
}

impl Finalize for PromiseState {
    fn finalize(&self) {
        if let PromiseState::Fulfilled(v) | PromiseState::Rejected(v) = self {
            v.finalize();
        }
    }
}
unsafe impl Trace for PromiseState {
    fn trace(&self) {
        if let PromiseState::Fulfilled(v) | PromiseState::Rejected(v) = self {
            v.trace();
        }
    }
}

pub struct IntegerIndexedData {
    pub buffer: GcRefCell<Vec<u8>>,
    pub length: usize,
}

pub type NativeFn = fn(&JsValue, &[JsValue], &mut Context) -> JsResult<JsValue>;
pub type NativeConstructFn = fn(&[JsValue], &JsValue, &mut Context) -> JsResult<JsValue>;

#[derive(Clone, Copy)]
pub struct NativeFunctionData {
    pub call: NativeFn,
    pub construct: Option<NativeConstructFn>,
    pub length: usize,
    pub name: &'static str,
}

/// The record every `JsObject` points at: shared slots plus the
/// kind-specific payload. Own-property enumeration order:
/// integer-index keys ascending, then string keys in insertion order,
/// then symbol keys in insertion order — `properties` is an
/// `IndexMap`, which already preserves insertion order; integer-index
/// ordering is produced on demand by `[[OwnPropertyKeys]]`, not by the
/// map's native order, so that inserting `"b"` then `"0"` still yields
/// `["0", "b"]`.
pub struct ObjectData {
    pub prototype: Option<JsObject>,
    pub extensible: Cell<bool>,
    pub properties: IndexMap<PropertyKey, PropertyDescriptor>,
    pub kind: ObjectKind,
}

impl Finalize for ObjectData {
    fn finalize(&self) {
        self.prototype.finalize();
        for (k, v) in &self.properties {
            k.finalize();
            v.finalize();
        }
    }
}
unsafe impl Trace for ObjectData {
    fn trace(&self) {
        self.prototype.trace();
        for (k, v) in &self.properties {
            k.trace();
            v.trace();
        }
        match &self.kind {
            ObjectKind::Function(f) => f.trace(),
            ObjectKind::BoundFunction(b) => b.trace(),
            ObjectKind::Proxy(p) => p.trace(),
            ObjectKind::Arguments(a) => a.trace(),
            ObjectKind::Promise(p) => p.trace(),
            ObjectKind::NativeClosure(n) => n.trace(),
            ObjectKind::ArrayIterator(a) => a.trace(),
            ObjectKind::StringIterator(s) => s.trace(),
            ObjectKind::Generator(g) => g.trace(),
            _ => {}
        }
    }
}

/// A heap reference to an object.
/// Cloning is a `Gc` clone — cheap, and every clone refers to the same
/// identity, which is what object-identity comparison (`===` on
/// objects, `Gc::ptr_eq`) relies on.
#[derive(Clone)]
pub struct JsObject(Gc<GcRefCell<ObjectData>>);

impl JsObject {
    pub fn new(prototype: Option<JsObject>, kind: ObjectKind) -> Self {
        JsObject(Gc::new(GcRefCell::new(ObjectData {
            prototype,
            extensible: Cell::new(true),
            properties: IndexMap::new(),
            kind,
        })))
    }

    pub fn ptr_eq(a: &JsObject, b: &JsObject) -> bool {
        Gc::ptr_eq(&a.0, &b.0)
    }

    pub fn data(&self) -> std::cell::Ref<'_, ObjectData> {
        self.0.borrow()
    }
    pub fn data_mut(&self) -> std::cell::RefMut<'_, ObjectData> {
        self.0.borrow_mut()
    }

    pub fn is_callable(&self) -> bool {
        matches!(
            self.data().kind,
            ObjectKind::Function(_) | ObjectKind::BoundFunction(_) | ObjectKind::NativeFunction(_)
        ) || matches!(&self.data().kind, ObjectKind::Proxy(p) if p.is_callable())
    }

    pub fn is_constructor(&self) -> bool {
        match &self.data().kind {
            ObjectKind::Function(f) => f.is_constructable(),
            ObjectKind::BoundFunction(b) => b.target.is_constructor(),
            ObjectKind::NativeFunction(n) => n.construct.is_some(),
            ObjectKind::Proxy(p) => p.is_constructor(),
            _ => false,
        }
    }

    // ---- internal methods ----
    // Each dispatches on `ObjectKind`; the default path is the ordinary
    // algorithm in `ordinary.rs`. Proxy forwards through traps.

    pub fn get_prototype_of(&self) -> JsResult<Option<JsObject>> {
        if let ObjectKind::Proxy(_) = &self.data().kind {
            return proxy::get_prototype_of(self);
        }
        Ok(ordinary::get_prototype_of(self))
    }

    pub fn set_prototype_of(&self, proto: Option<JsObject>) -> JsResult<bool> {
        if let ObjectKind::Proxy(_) = &self.data().kind {
            return proxy::set_prototype_of(self, proto);
        }
        Ok(ordinary::set_prototype_of(self, proto))
    }

    pub fn is_extensible(&self) -> JsResult<bool> {
        if let ObjectKind::Proxy(_) = &self.data().kind {
            return proxy::is_extensible(self);
        }
        Ok(self.data().extensible.get())
    }

    pub fn prevent_extensions(&self) -> JsResult<bool> {
        if let ObjectKind::Proxy(_) = &self.data().kind {
            return proxy::prevent_extensions(self);
        }
        self.data().extensible.set(false);
        Ok(true)
    }

    pub fn get_own_property(&self, key: &PropertyKey) -> JsResult<Option<PropertyDescriptor>> {
        let is_proxy = matches!(self.data().kind, ObjectKind::Proxy(_));
        if is_proxy {
            return proxy::get_own_property(self, key);
        }
        if let ObjectKind::StringExotic(s) = &self.data().kind {
            if let Some(d) = string_exotic::get_own_property(s, key) {
                return Ok(Some(d));
            }
        }
        if let ObjectKind::IntegerIndexed(data) = &self.data().kind {
            if let Some(d) = integer_indexed::get_own_property(data, key) {
                return Ok(Some(d));
            }
        }
        Ok(ordinary::get_own_property(self, key))
    }

    pub fn define_own_property(&self, key: PropertyKey, desc: PropertyDescriptor) -> JsResult<bool> {
        let is_proxy = matches!(self.data().kind, ObjectKind::Proxy(_));
        if is_proxy {
            return proxy::define_own_property(self, key, desc);
        }
        let is_array = matches!(self.data().kind, ObjectKind::Array);
        if is_array {
            return array::define_own_property(self, key, desc);
        }
        Ok(ordinary::define_own_property(self, key, desc))
    }

    pub fn has_property(&self, key: &PropertyKey) -> JsResult<bool> {
        let is_proxy = matches!(self.data().kind, ObjectKind::Proxy(_));
        if is_proxy {
            return proxy::has_property(self, key);
        }
        ordinary::has_property(self, key)
    }

    pub fn get(&self, key: &PropertyKey, receiver: &JsValue, ctx: &mut Context) -> JsResult<JsValue> {
        let is_proxy = matches!(self.data().kind, ObjectKind::Proxy(_));
        if is_proxy {
            return proxy::get(self, key, receiver, ctx);
        }
        if let ObjectKind::Arguments(data) = &self.data().kind {
            if let Some(mapped) = arguments::mapped_get(data, key, ctx)? {
                return Ok(mapped);
            }
        }
        if let ObjectKind::IntegerIndexed(data) = &self.data().kind {
            if let Some(desc) = integer_indexed::get_own_property(data, key) {
                return Ok(desc.value.unwrap_or(JsValue::Undefined));
            }
        }
        ordinary::get(self, key, receiver, ctx)
    }

    pub fn set(&self, key: PropertyKey, value: JsValue, receiver: &JsValue, ctx: &mut Context) -> JsResult<bool> {
        let is_proxy = matches!(self.data().kind, ObjectKind::Proxy(_));
        if is_proxy {
            return proxy::set(self, key, value, receiver, ctx);
        }
        if let ObjectKind::Arguments(data) = &self.data().kind {
            if arguments::mapped_set(data, &key, &value, ctx)? {
                // fallthrough still writes the own data property below
            }
        }
        if let ObjectKind::IntegerIndexed(data) = &self.data().kind {
            if key.as_array_index().is_some() {
                let n = crate::operations::to_number(&value, ctx)?;
                return Ok(integer_indexed::set(data, &key, n));
            }
        }
        ordinary::set(self, key, value, receiver, ctx)
    }

    pub fn delete(&self, key: &PropertyKey) -> JsResult<bool> {
        let is_proxy = matches!(self.data().kind, ObjectKind::Proxy(_));
        if is_proxy {
            return proxy::delete(self, key);
        }
        Ok(ordinary::delete(self, key))
    }

    pub fn own_property_keys(&self) -> JsResult<Vec<PropertyKey>> {
        let is_proxy = matches!(self.data().kind, ObjectKind::Proxy(_));
        if is_proxy {
            return proxy::own_property_keys(self);
        }
        if let ObjectKind::StringExotic(s) = &self.data().kind {
            return Ok(string_exotic::own_property_keys(s, self));
        }
        if let ObjectKind::IntegerIndexed(data) = &self.data().kind {
            return Ok(integer_indexed::own_property_keys(data, self));
        }
        Ok(ordinary::own_property_keys(self))
    }

    /// `[[Call]]`. `TypeError`s if this object is not
    /// callable.
    pub fn call(&self, this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
        let kind_call = {
            let data = self.data();
            match &data.kind {
                ObjectKind::NativeFunction(n) => Some(CallDispatch::Native(n.call)),
                ObjectKind::NativeClosure(_) => Some(CallDispatch::Closure),
                ObjectKind::Function(_) => Some(CallDispatch::Ordinary),
                ObjectKind::BoundFunction(_) => Some(CallDispatch::Bound),
                ObjectKind::Proxy(_) => Some(CallDispatch::Proxy),
                _ => None,
            }
        };
        match kind_call {
            Some(CallDispatch::Native(f)) => f(this, args, ctx),
            Some(CallDispatch::Closure) => {
                let (f, captures) = {
                    let data = self.data();
                    let ObjectKind::NativeClosure(n) = &data.kind else {
                        unreachable!("dispatched only for NativeClosure kind")
                    };
                    (n.call, n.captures.clone())
                };
                f(this, args, &captures, ctx)
            }
            Some(CallDispatch::Ordinary) => crate::evaluator::function_call::ordinary_call(self, this, args, None, ctx),
            Some(CallDispatch::Bound) => bound_function::call(self, args, ctx),
            Some(CallDispatch::Proxy) => proxy::call(self, this, args, ctx),
            None => Err(ctx.throw_native(NativeError::typ("value is not callable"))),
        }
    }

    /// `[[Construct]]`. `new_target` is the original
    /// constructor `new` resolved against (relevant for `super()` and
    /// subclassing through `Reflect.construct`).
    pub fn construct(&self, args: &[JsValue], new_target: &JsValue, ctx: &mut Context) -> JsResult<JsValue> {
        let kind_call = {
            let data = self.data();
            match &data.kind {
                ObjectKind::NativeFunction(n) if n.construct.is_some() => Some(CallDispatch::Native(n.call)),
                ObjectKind::Function(f) if f.is_constructable() => Some(CallDispatch::Ordinary),
                ObjectKind::BoundFunction(_) => Some(CallDispatch::Bound),
                ObjectKind::Proxy(_) => Some(CallDispatch::Proxy),
                _ => None,
            }
        };
        match kind_call {
            Some(CallDispatch::Native(_)) => {
                let construct = self.data().kind_native_construct();
                construct.unwrap()(args, new_target, ctx)
            }
            Some(CallDispatch::Ordinary) => {
                crate::evaluator::function_call::ordinary_construct(self, args, new_target, ctx)
            }
            Some(CallDispatch::Bound) => bound_function::construct(self, args, new_target, ctx),
            Some(CallDispatch::Proxy) => proxy::construct(self, args, new_target, ctx),
            None => Err(ctx.throw_native(NativeError::typ("value is not a constructor"))),
        }
    }
}

impl ObjectData {
    fn kind_native_construct(&self) -> Option<NativeConstructFn> {
        match &self.kind {
            ObjectKind::NativeFunction(n) => n.construct,
            _ => None,
        }
    }
}

enum CallDispatch {
    Native(NativeFn),
    Closure,
    Ordinary,
    Bound,
    Proxy,
}

impl Finalize for JsObject {}
unsafe impl Trace for JsObject {
    fn trace(&self) {
        self.0.trace();
    }
}

impl std::fmt::Debug for JsObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[object]")
    }
}

impl PartialEq for JsObject {
    fn eq(&self, other: &Self) -> bool {
        JsObject::ptr_eq(self, other)
    }
}
impl Eq for JsObject {}

impl std::hash::Hash for JsObject {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        (self.0.as_ptr() as usize).hash(state);
    }
}
