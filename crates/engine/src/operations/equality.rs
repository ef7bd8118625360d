//! Equality abstract operations: strict (`===`), abstract
//! (`==`) and the `SameValue`/`SameValueZero` family already live on
//! `crate::value`.

use super::conversion::to_primitive;
use crate::context::Context;
use crate::error::JsResult;
use crate::value::JsValue;

/// `IsStrictlyEqual` (`===`). Never throws: no conversions are
/// performed.
pub fn strict_equals(a: &JsValue, b: &JsValue) -> bool {
    match (a, b) {
        (JsValue::Undefined, JsValue::Undefined) => true,
        (JsValue::Null, JsValue::Null) => true,
        (JsValue::Number(a), JsValue::Number(b)) => a == b,
        (JsValue::String(a), JsValue::String(b)) => a == b,
        (JsValue::Boolean(a), JsValue::Boolean(b)) => a == b,
        (JsValue::BigInt(a), JsValue::BigInt(b)) => a == b,
        (JsValue::Symbol(a), JsValue::Symbol(b)) => a == b,
        (JsValue::Object(a), JsValue::Object(b)) => crate::object::JsObject::ptr_eq(a, b),
        _ => false,
    }
}

/// `IsLooselyEqual` (`==`), the abstract equality algorithm.
pub fn abstract_equals(a: &JsValue, b: &JsValue, ctx: &mut Context) -> JsResult<bool> {
    if std::mem::discriminant(a) == std::mem::discriminant(b) {
        return Ok(strict_equals(a, b));
    }
    match (a, b) {
        (JsValue::Null, JsValue::Undefined) | (JsValue::Undefined, JsValue::Null) => Ok(true),
        (JsValue::Number(_), JsValue::String(_)) => {
            let bn = super::conversion::to_number(b, ctx)?;
            Ok(strict_equals(a, &JsValue::Number(bn)))
        }
        (JsValue::String(_), JsValue::Number(_)) => {
            let an = super::conversion::to_number(a, ctx)?;
            Ok(strict_equals(&JsValue::Number(an), b))
        }
        (JsValue::BigInt(x), JsValue::String(s)) | (JsValue::String(s), JsValue::BigInt(x)) => {
            Ok(crate::value::JsBigInt::parse(&s.to_std_string_lossy()).map_or(false, |y| x == &y))
        }
        (JsValue::Boolean(_), _) => {
            let an = super::conversion::to_number(a, ctx)?;
            abstract_equals(&JsValue::Number(an), b, ctx)
        }
        (_, JsValue::Boolean(_)) => {
            let bn = super::conversion::to_number(b, ctx)?;
            abstract_equals(a, &JsValue::Number(bn), ctx)
        }
        (JsValue::Number(_) | JsValue::String(_) | JsValue::BigInt(_) | JsValue::Symbol(_), JsValue::Object(_)) => {
            let bp = to_primitive(b, super::conversion::PreferredType::Default, ctx)?;
            abstract_equals(a, &bp, ctx)
        }
        (JsValue::Object(_), JsValue::Number(_) | JsValue::String(_) | JsValue::BigInt(_) | JsValue::Symbol(_)) => {
            let ap = to_primitive(a, super::conversion::PreferredType::Default, ctx)?;
            abstract_equals(&ap, b, ctx)
        }
        (JsValue::BigInt(x), JsValue::Number(n)) | (JsValue::Number(n), JsValue::BigInt(x)) => {
            if !n.is_finite() {
                return Ok(false);
            }
            Ok(big_int_equals_number(x, *n))
        }
        _ => Ok(false),
    }
}

fn big_int_equals_number(b: &crate::value::JsBigInt, n: f64) -> bool {
    if n.fract() != 0.0 {
        return false;
    }
    crate::value::JsBigInt::parse(&format!("{n:.0}")).map_or(false, |n_as_big| &n_as_big == b)
}
