//! Canonical keys and value equality.
//!
//! `to_key` must agree with `==`: objects that compare equal produce the
//! same key. Integers (and integral floats, which compare equal to them) are
//! encoded as fixed-width offset hex so that string order matches numeric
//! order. Container keys length-prefix every element key so that no two
//! distinct element sequences share a key.
//!
//! NaN is the one value whose key does not follow `==`: every NaN maps to
//! the same key even though `NaN != NaN`, so a NaN dictionary key can be
//! found again after it is stored.

use std::fmt::Write as _;

use super::Object;

const SIGN_BIT: u64 = 1 << 63;

/// Smallest `f64` outside the `i64` range.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

impl Object {
    /// Canonical key string used for dictionary ordering and lookup.
    ///
    /// All NaN floats share one key, regardless of sign or payload.
    pub fn to_key(&self) -> String {
        let mut out = String::new();
        self.write_key(&mut out, &mut Vec::new());
        out
    }

    fn write_key(&self, out: &mut String, seen: &mut Vec<usize>) {
        match self {
            Object::None => out.push_str("none"),
            Object::Bool(b) => {
                out.push_str(if *b { "b:true" } else { "b:false" });
            }
            Object::Int(n) => write_int_key(out, *n),
            Object::Float(x) => match integral(*x) {
                Some(n) => write_int_key(out, n),
                None => write_float_key(out, *x),
            },
            Object::Str(s) => {
                out.push_str("s:");
                out.push_str(s);
            }
            Object::List(list) => {
                if seen.contains(&list.id()) {
                    let _ = write!(out, "@cycle:{:x}", list.id());
                    return;
                }
                seen.push(list.id());
                let _ = write!(out, "l{}:", list.len());
                for item in list.items().iter() {
                    write_element(out, &item.get(), seen);
                }
                seen.pop();
            }
            Object::Dict(dict) => {
                if seen.contains(&dict.id()) {
                    let _ = write!(out, "@cycle:{:x}", dict.id());
                    return;
                }
                seen.push(dict.id());
                let _ = write!(out, "d{}:", dict.len());
                for (key, entry) in dict.entries().iter() {
                    let _ = write!(out, "{}#{key}", key.len());
                    write_element(out, &entry.value.get(), seen);
                }
                seen.pop();
            }
            Object::Builtin(builtin) => {
                out.push_str("@builtin:");
                out.push_str(builtin.name);
            }
            Object::Function(_)
            | Object::Class(_)
            | Object::Instance(_)
            | Object::Method(_)
            | Object::Enum(_)
            | Object::Native(_) => {
                let id = self.heap_id().unwrap_or_default();
                let _ = write!(out, "@{}:{id:x}", self.type_name());
            }
        }
    }
}

fn write_element(out: &mut String, element: &Object, seen: &mut Vec<usize>) {
    let mut key = String::new();
    element.write_key(&mut key, seen);
    let _ = write!(out, "{}#{key}", key.len());
}

/// Offset binary: flipping the sign bit maps `i64::MIN..=i64::MAX` onto
/// `0..=u64::MAX` monotonically.
fn write_int_key(out: &mut String, n: i64) {
    #[allow(clippy::cast_sign_loss, reason = "bit reinterpretation")]
    let biased = (n as u64) ^ SIGN_BIT;
    let _ = write!(out, "n:{biased:016x}");
}

/// Total-order bit encoding for non-integral floats.
fn write_float_key(out: &mut String, x: f64) {
    if x.is_nan() {
        out.push_str("f:nan");
        return;
    }
    let bits = x.to_bits();
    let ordered = if bits & SIGN_BIT == 0 {
        bits | SIGN_BIT
    } else {
        !bits
    };
    let _ = write!(out, "f:{ordered:016x}");
}

/// The integer an integral, in-range float equals.
#[allow(
    clippy::cast_possible_truncation,
    reason = "range and fraction checked first"
)]
fn integral(x: f64) -> Option<i64> {
    if x.fract() == 0.0 && (-I64_BOUND..I64_BOUND).contains(&x) {
        Some(x as i64)
    } else {
        None
    }
}

impl PartialEq for Object {
    /// Structural equality. Integers and floats compare numerically;
    /// functions, classes and other identity types compare by allocation.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Object::None, Object::None) => true,
            (Object::Int(a), Object::Int(b)) => a == b,
            (Object::Float(a), Object::Float(b)) => a == b,
            (Object::Int(a), Object::Float(b)) | (Object::Float(b), Object::Int(a)) => {
                integral(*b) == Some(*a)
            }
            (Object::Bool(a), Object::Bool(b)) => a == b,
            (Object::Str(a), Object::Str(b)) => a.as_str() == b.as_str(),
            (Object::List(a), Object::List(b)) => {
                if a.ptr_eq(b) {
                    return true;
                }
                let left = a.snapshot();
                let right = b.snapshot();
                left.len() == right.len()
                    && left.iter().zip(&right).all(|(x, y)| x.get() == y.get())
            }
            (Object::Dict(a), Object::Dict(b)) => {
                if a.ptr_eq(b) {
                    return true;
                }
                let left = a.entries();
                let right = b.entries();
                left.len() == right.len()
                    && left.iter().zip(right.iter()).all(|((ka, ea), (kb, eb))| {
                        ka == kb && ea.value.get() == eb.value.get()
                    })
            }
            (Object::Builtin(a), Object::Builtin(b)) => a.name == b.name,
            (Object::Function(a), Object::Function(b)) => a.ptr_eq(b),
            (Object::Class(a), Object::Class(b)) => a.ptr_eq(b),
            (Object::Instance(a), Object::Instance(b)) => a.ptr_eq(b),
            (Object::Method(a), Object::Method(b)) => a.ptr_eq(b),
            (Object::Enum(a), Object::Enum(b)) => a.ptr_eq(b),
            (Object::Native(a), Object::Native(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}
