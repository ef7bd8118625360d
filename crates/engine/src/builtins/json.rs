//! The `JSON` namespace object: `JSON.parse`/`JSON.stringify`.
//! No `reviver`/`replacer` support — mechanical once the core
//! algorithm exists, the same carve-out as the typed-array element
//! matrix.

use super::{arg, method};
use crate::context::Context;
use crate::error::{JsResult, NativeError};
use crate::object::{JsObject, ObjectKind};
use crate::property::PropertyKey;
use crate::value::JsValue;

pub fn build(function_prototype: &JsObject, object_prototype: &JsObject) -> JsObject {
    let json = JsObject::new(Some(object_prototype.clone()), ObjectKind::Ordinary);
    method(&json, function_prototype, "stringify", 3, stringify);
    method(&json, function_prototype, "parse", 2, parse);
    json
}

fn stringify(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let value = arg(args, 0);
    let indent = match arg(args, 2) {
        JsValue::Number(n) => " ".repeat((n.max(0.0) as usize).min(10)),
        JsValue::String(s) => s.to_std_string_lossy(),
        _ => String::new(),
    };
    match stringify_value(&value, ctx, &indent, 0)? {
        Some(s) => Ok(JsValue::from(s.as_str())),
        None => Ok(JsValue::Undefined),
    }
}

fn stringify_value(value: &JsValue, ctx: &mut Context, indent: &str, depth: usize) -> JsResult<Option<String>> {
    let value = to_json_value(value, ctx)?;
    match value {
        JsValue::Undefined => Ok(None),
        JsValue::Object(o) if o.is_callable() && !matches!(o.data().kind, ObjectKind::Array) => Ok(None),
        JsValue::Null => Ok(Some("null".to_string())),
        JsValue::Boolean(b) => Ok(Some(b.to_string())),
        JsValue::Number(n) => Ok(Some(if n.is_finite() { number_literal(n) } else { "null".to_string() })),
        JsValue::String(s) => Ok(Some(quote(&s.to_std_string_lossy()))),
        JsValue::BigInt(_) => Err(ctx.throw_native(NativeError::typ("Do not know how to serialize a BigInt"))),
        JsValue::Symbol(_) => Ok(None),
        JsValue::Object(o) => {
            if matches!(o.data().kind, ObjectKind::Array) {
                stringify_array(&o, ctx, indent, depth)
            } else {
                stringify_object(&o, ctx, indent, depth)
            }
        }
    }
}

/// `ToJSON`: calls `value.toJSON(key)` if present (the
/// `SerializeJSONProperty` step invoking a `toJSON` method).
fn to_json_value(value: &JsValue, ctx: &mut Context) -> JsResult<JsValue> {
    if let JsValue::Object(o) = value {
        let to_json = o.get(&PropertyKey::from("toJSON"), value, ctx)?;
        if to_json.is_callable() {
            return crate::operations::call(&to_json, value, &[], ctx);
        }
    }
    Ok(value.clone())
}

fn number_literal(n: f64) -> String {
    if n == n.trunc() && n.abs() < 1e21 {
        format!("{n}")
    } else {
        format!("{n}")
    }
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn stringify_array(arr: &JsObject, ctx: &mut Context, indent: &str, depth: usize) -> JsResult<Option<String>> {
    let len = crate::object::array::current_length(arr);
    let mut items = Vec::with_capacity(len as usize);
    for i in 0..len {
        let v = arr.get(&PropertyKey::from(i), &JsValue::Object(arr.clone()), ctx)?;
        items.push(stringify_value(&v, ctx, indent, depth + 1)?.unwrap_or_else(|| "null".to_string()));
    }
    Ok(Some(wrap("[", "]", items, indent, depth)))
}

fn stringify_object(obj: &JsObject, ctx: &mut Context, indent: &str, depth: usize) -> JsResult<Option<String>> {
    let mut items = Vec::new();
    for key in obj.own_property_keys()? {
        let PropertyKey::String(name) = &key else { continue };
        let Some(desc) = obj.get_own_property(&key)? else { continue };
        if !desc.enumerable() {
            continue;
        }
        let v = obj.get(&key, &JsValue::Object(obj.clone()), ctx)?;
        if let Some(serialized) = stringify_value(&v, ctx, indent, depth + 1)? {
            items.push(format!("{}:{}{}", quote(&name.to_std_string_lossy()), if indent.is_empty() { "" } else { " " }, serialized));
        }
    }
    Ok(Some(wrap("{", "}", items, indent, depth)))
}

fn wrap(open: &str, close: &str, items: Vec<String>, indent: &str, depth: usize) -> String {
    if items.is_empty() {
        return format!("{open}{close}");
    }
    if indent.is_empty() {
        return format!("{open}{}{close}", items.join(","));
    }
    let inner_pad = indent.repeat(depth + 1);
    let outer_pad = indent.repeat(depth);
    format!("{open}\n{inner_pad}{}\n{outer_pad}{close}", items.join(&format!(",\n{inner_pad}")))
}

fn parse(_this: &JsValue, args: &[JsValue], ctx: &mut Context) -> JsResult<JsValue> {
    let text = crate::operations::to_js_string(&arg(args, 0), ctx)?.to_std_string_lossy();
    let mut parser = JsonParser { input: text.as_bytes(), pos: 0 };
    parser.skip_ws();
    let value = parser.parse_value(ctx)?;
    parser.skip_ws();
    if parser.pos != parser.input.len() {
        return Err(ctx.throw_native(NativeError::syntax("Unexpected non-whitespace character after JSON data")));
    }
    Ok(value)
}

struct JsonParser<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> JsonParser<'a> {
    fn skip_ws(&mut self) {
        while self.pos < self.input.len() && matches!(self.input[self.pos], b' ' | b'\t' | b'\n' | b'\r') {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn expect(&mut self, b: u8, ctx: &mut Context) -> JsResult<()> {
        if self.peek() == Some(b) {
            self.pos += 1;
            Ok(())
        } else {
            Err(ctx.throw_native(NativeError::syntax(format!("Expected '{}' in JSON at position {}", b as char, self.pos))))
        }
    }

    fn literal(&mut self, lit: &str, ctx: &mut Context) -> JsResult<()> {
        if self.input[self.pos..].starts_with(lit.as_bytes()) {
            self.pos += lit.len();
            Ok(())
        } else {
            Err(ctx.throw_native(NativeError::syntax(format!("Unexpected token in JSON at position {}", self.pos))))
        }
    }

    fn parse_value(&mut self, ctx: &mut Context) -> JsResult<JsValue> {
        self.skip_ws();
        match self.peek() {
            Some(b'{') => self.parse_object(ctx),
            Some(b'[') => self.parse_array(ctx),
            Some(b'"') => Ok(JsValue::from(self.parse_string(ctx)?.as_str())),
            Some(b't') => {
                self.literal("true", ctx)?;
                Ok(JsValue::from(true))
            }
            Some(b'f') => {
                self.literal("false", ctx)?;
                Ok(JsValue::from(false))
            }
            Some(b'n') => {
                self.literal("null", ctx)?;
                Ok(JsValue::Null)
            }
            Some(c) if c == b'-' || c.is_ascii_digit() => self.parse_number(ctx),
            _ => Err(ctx.throw_native(NativeError::syntax(format!("Unexpected end of JSON input at position {}", self.pos)))),
        }
    }

    fn parse_object(&mut self, ctx: &mut Context) -> JsResult<JsValue> {
        self.expect(b'{', ctx)?;
        let obj = JsObject::new(Some(ctx.realm().intrinsics.object_prototype.clone()), ObjectKind::Ordinary);
        self.skip_ws();
        if self.peek() == Some(b'}') {
            self.pos += 1;
            return Ok(JsValue::Object(obj));
        }
        loop {
            self.skip_ws();
            let key = self.parse_string(ctx)?;
            self.skip_ws();
            self.expect(b':', ctx)?;
            let value = self.parse_value(ctx)?;
            let _ = obj.define_own_property(PropertyKey::from(key.as_str()), crate::property::PropertyDescriptor::builtin(value));
            self.skip_ws();
            match self.peek() {
                Some(b',') => {
                    self.pos += 1;
                }
                Some(b'}') => {
                    self.pos += 1;
                    break;
                }
                _ => return Err(ctx.throw_native(NativeError::syntax(format!("Unexpected token in JSON at position {}", self.pos)))),
            }
        }
        Ok(JsValue::Object(obj))
    }

    fn parse_array(&mut self, ctx: &mut Context) -> JsResult<JsValue> {
        self.expect(b'[', ctx)?;
        let mut items = Vec::new();
        self.skip_ws();
        if self.peek() == Some(b']') {
            self.pos += 1;
            return Ok(JsValue::Object(crate::operations::array_from_values(&items, ctx)));
        }
        loop {
            items.push(self.parse_value(ctx)?);
            self.skip_ws();
            match self.peek() {
                Some(b',') => {
                    self.pos += 1;
                }
                Some(b']') => {
                    self.pos += 1;
                    break;
                }
                _ => return Err(ctx.throw_native(NativeError::syntax(format!("Unexpected token in JSON at position {}", self.pos)))),
            }
        }
        Ok(JsValue::Object(crate::operations::array_from_values(&items, ctx)))
    }

    fn parse_string(&mut self, ctx: &mut Context) -> JsResult<String> {
        self.expect(b'"', ctx)?;
        let mut out = String::new();
        loop {
            match self.peek() {
                None => return Err(ctx.throw_native(NativeError::syntax("Unterminated string in JSON"))),
                Some(b'"') => {
                    self.pos += 1;
                    break;
                }
                Some(b'\\') => {
                    self.pos += 1;
                    match self.peek() {
                        Some(b'"') => {
                            out.push('"');
                            self.pos += 1;
                        }
                        Some(b'\\') => {
                            out.push('\\');
                            self.pos += 1;
                        }
                        Some(b'/') => {
                            out.push('/');
                            self.pos += 1;
                        }
                        Some(b'n') => {
                            out.push('\n');
                            self.pos += 1;
                        }
                        Some(b't') => {
                            out.push('\t');
                            self.pos += 1;
                        }
                        Some(b'r') => {
                            out.push('\r');
                            self.pos += 1;
                        }
                        Some(b'b') => {
                            out.push('\u{8}');
                            self.pos += 1;
                        }
                        Some(b'f') => {
                            out.push('\u{c}');
                            self.pos += 1;
                        }
                        Some(b'u') => {
                            self.pos += 1;
                            let hex = std::str::from_utf8(&self.input[self.pos..self.pos + 4])
                                .map_err(|_| ctx.throw_native(NativeError::syntax("bad unicode escape in JSON")))?;
                            let code = u32::from_str_radix(hex, 16).map_err(|_| ctx.throw_native(NativeError::syntax("bad unicode escape in JSON")))?;
                            out.push(char::from_u32(code).unwrap_or('\u{fffd}'));
                            self.pos += 4;
                        }
                        _ => return Err(ctx.throw_native(NativeError::syntax("bad escape in JSON string"))),
                    }
                }
                Some(b) => {
                    let ch_len = utf8_char_len(b);
                    let slice = std::str::from_utf8(&self.input[self.pos..self.pos + ch_len])
                        .map_err(|_| ctx.throw_native(NativeError::syntax("invalid UTF-8 in JSON")))?;
                    out.push_str(slice);
                    self.pos += ch_len;
                }
            }
        }
        Ok(out)
    }

    fn parse_number(&mut self, ctx: &mut Context) -> JsResult<JsValue> {
        let start = self.pos;
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.peek() == Some(b'.') {
            self.pos += 1;
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.pos += 1;
            }
        }
        if matches!(self.peek(), Some(b'e') | Some(b'E')) {
            self.pos += 1;
            if matches!(self.peek(), Some(b'+') | Some(b'-')) {
                self.pos += 1;
            }
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.pos += 1;
            }
        }
        let text = std::str::from_utf8(&self.input[start..self.pos]).unwrap();
        text.parse::<f64>()
            .map(JsValue::from)
            .map_err(|_| ctx.throw_native(NativeError::syntax("invalid number in JSON")))
    }
}

fn utf8_char_len(first_byte: u8) -> usize {
    if first_byte & 0x80 == 0 {
        1
    } else if first_byte & 0xE0 == 0xC0 {
        2
    } else if first_byte & 0xF0 == 0xE0 {
        3
    } else {
        4
    }
}
