use num_bigint::BigInt;
use std::fmt;
use std::rc::Rc;
use vesper_gc::{Finalize, Trace};

/// Arbitrary-precision integer value. Wrapped in an
/// `Rc` rather than allocated on the GC heap: a `BigInt` value can never
/// reach an `Object`, so it never participates in a reference cycle and
/// refcounting it is sufficient and cheaper.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct JsBigInt(Rc<BigInt>);

impl Finalize for JsBigInt {}
unsafe impl Trace for JsBigInt {
    fn trace(&self) {}
}

impl JsBigInt {
    pub fn from_i64(n: i64) -> Self {
        JsBigInt(Rc::new(BigInt::from(n)))
    }

    pub fn zero() -> Self {
        Self::from_i64(0)
    }

    pub fn is_zero(&self) -> bool {
        self.0.as_ref() == &BigInt::from(0)
    }

    pub fn as_inner(&self) -> &BigInt {
        &self.0
    }

    pub fn parse(s: &str) -> Option<Self> {
        s.trim().parse::<BigInt>().ok().map(|b| JsBigInt(Rc::new(b)))
    }

    pub fn add(&self, other: &Self) -> Self {
        JsBigInt(Rc::new(&*self.0 + &*other.0))
    }
    pub fn sub(&self, other: &Self) -> Self {
        JsBigInt(Rc::new(&*self.0 - &*other.0))
    }
    pub fn mul(&self, other: &Self) -> Self {
        JsBigInt(Rc::new(&*self.0 * &*other.0))
    }
    pub fn neg(&self) -> Self {
        JsBigInt(Rc::new(-&*self.0))
    }
}

impl fmt::Display for JsBigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl fmt::Debug for JsBigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}n", self.0)
    }
}
