//! The `Math` namespace object. Not a constructor —
//! `Math.prototype` does not exist and `Math` is never called or
//! constructed, so `build` returns a plain `Ordinary` object rather
//! than going through `native_constructor`.

use super::{arg, data_property, method};
use crate::context::Context;
use crate::error::JsResult;
use crate::object::{JsObject, ObjectKind};
use crate::value::JsValue;

pub fn build(function_prototype: &JsObject, object_prototype: &JsObject) -> JsObject {
    let math = JsObject::new(Some(object_prototype.clone()), ObjectKind::Ordinary);

    data_property(&math, "E", JsValue::from(std::f64::consts::E));
    data_property(&math, "PI", JsValue::from(std::f64::consts::PI));
    data_property(&math, "LN2", JsValue::from(std::f64::consts::LN_2));
    data_property(&math, "LN10", JsValue::from(std::f64::consts::LN_10));
    data_property(&math, "LOG2E", JsValue::from(std::f64::consts::LOG2_E));
    data_property(&math, "LOG10E", JsValue::from(std::f64::consts::LOG10_E));
    data_property(&math, "SQRT2", JsValue::from(std::f64::consts::SQRT_2));
    data_property(&math, "SQRT1_2", JsValue::from(std::f64::consts::FRAC_1_SQRT_2));

    macro_rules! unary {
        ($name:literal, $f:expr) => {
            method(&math, function_prototype, $name, 1, |_this, args, ctx| {
                let n = crate::operations::to_number(&arg(args, 0), ctx)?;
                let f: fn(f64) -> f64 = $f;
                Ok(JsValue::Number(f(n)))
            });
        };
    }

    unary!("abs", f64::abs);
    unary!("floor", f64::floor);
    unary!("ceil", f64::ceil);
    unary!("trunc", f64::trunc);
    unary!("sqrt", f64::sqrt);
    unary!("cbrt", f64::cbrt);
    unary!("sign", f64::signum_js);
    unary!("exp", f64::exp);
    unary!("log", f64::ln);
    unary!("log2", f64::log2);
    unary!("log10", f64::log10);
    unary!("sin", f64::sin);
    unary!("cos", f64::cos);
    unary!("tan", f64::tan);
    unary!("asin", f64::asin);
    unary!("acos", f64::acos);
    unary!("atan", f64::atan);
    unary!("sinh", f64::sinh);
    unary!("cosh", f64::cosh);
    unary!("tanh", f64::tanh);

    method(&math, function_prototype, "round", 1, round);
    method(&math, function_prototype, "pow", 2, pow);
    method(&math, function_prototype, "atan2", 2, atan2);
    method(&math, function_prototype, "max", 2, max);
    method(&math, function_prototype, "min", 2, min);
    method(&math, function_prototype, "hypot", 2, hypot);
    method(&math, function_prototype, "random", 0, random);

    math
}

/// `Math.sign` has its own zero/NaN-preserving rule, distinct from
/// `f64::signum` (which returns 1.0 for +0.0/-0.0 alike).
trait SignumJs {
    fn signum_js(self) -> f64;
}
impl SignumJs for f64 {
    fn signum_js(self) -> f64 {
        if self.is_nan() || self == 0.0 {
            self
        } else if self > 0.0 {
            1.0
        } else {
            -1.0
        }
    }
}

fn round(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let n = crate::operations::to_number(&arg(args, 0), ctx)?;
    if n.is_nan() || n.is_infinite() {
        return Ok(JsValue::Number(n));
    }
    // `Math.round` rounds half towards +Infinity, unlike Rust's
    // round-half-away-from-zero.
    Ok(JsValue::Number((n + 0.5).floor()))
}

fn pow(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let base = crate::operations::to_number(&arg(args, 0), ctx)?;
    let exp = crate::operations::to_number(&arg(args, 1), ctx)?;
    Ok(JsValue::Number(base.powf(exp)))
}

fn atan2(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let y = crate::operations::to_number(&arg(args, 0), ctx)?;
    let x = crate::operations::to_number(&arg(args, 1), ctx)?;
    Ok(JsValue::Number(y.atan2(x)))
}

fn max(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let mut result = f64::NEG_INFINITY;
    for a in args {
        let n = crate::operations::to_number(a, ctx)?;
        if n.is_nan() {
            return Ok(JsValue::Number(f64::NAN));
        }
        if n > result || (n == 0.0 && result == 0.0 && n.is_sign_positive()) {
            result = n;
        }
    }
    Ok(JsValue::Number(result))
}

fn min(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let mut result = f64::INFINITY;
    for a in args {
        let n = crate::operations::to_number(a, ctx)?;
        if n.is_nan() {
            return Ok(JsValue::Number(f64::NAN));
        }
        if n < result || (n == 0.0 && result == 0.0 && n.is_sign_negative()) {
            result = n;
        }
    }
    Ok(JsValue::Number(result))
}

fn hypot(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let mut sum = 0.0;
    for a in args {
        let n = crate::operations::to_number(a, ctx)?;
        sum += n * n;
    }
    Ok(JsValue::Number(sum.sqrt()))
}

fn random(_this: &JsValue, _args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    Ok(JsValue::Number(ctx.agent().random_f64()))
}
