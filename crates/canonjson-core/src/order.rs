use serde_json::{Map, Number, Value};
use std::cmp::Ordering;

/// Total order over JSON values, used to sort array elements.
///
/// Values of different types order by type rank:
/// `null < boolean < number < string < array < object`.
/// Within a type:
/// - booleans: `false < true`
/// - numbers: exact decimal value of the literal, then its text (`1 < 1.0`)
/// - strings: Unicode scalar order
/// - arrays: element-wise, a proper prefix first
/// - objects: entry-wise in iteration order (key, then value), a proper prefix first
///
/// Returns `Equal` only for structurally identical values.
pub fn compare(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => compare_numbers(x, y),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => compare_arrays(x, y),
        (Value::Object(x), Value::Object(y)) => compare_objects(x, y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

fn compare_arrays(a: &[Value], b: &[Value]) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        let ord = compare(x, y);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.len().cmp(&b.len())
}

fn compare_objects(a: &Map<String, Value>, b: &Map<String, Value>) -> Ordering {
    for ((ka, va), (kb, vb)) in a.iter().zip(b) {
        let ord = ka.cmp(kb).then_with(|| compare(va, vb));
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.len().cmp(&b.len())
}

fn compare_numbers(a: &Number, b: &Number) -> Ordering {
    let (x, y) = (a.to_string(), b.to_string());
    Decimal::parse(&x)
        .cmp(&Decimal::parse(&y))
        .then_with(|| x.cmp(&y))
}

/// Exact value of a JSON number literal: `0.d1d2d3... * 10^point`.
///
/// `digits` has no leading or trailing zeros; an empty `digits` is zero,
/// whatever its sign. Exponents saturate at the `i128` range.
#[derive(Debug, PartialEq, Eq)]
struct Decimal {
    negative: bool,
    digits: Vec<u8>,
    point: i128,
}

impl Decimal {
    fn parse(text: &str) -> Self {
        let mut negative = false;
        let mut digits = Vec::with_capacity(text.len());
        let mut int_len: i128 = 0;
        let mut in_fraction = false;
        let mut exponent: i128 = 0;
        let mut exponent_negative = false;
        let mut in_exponent = false;

        for c in text.bytes() {
            match c {
                b'-' if in_exponent => exponent_negative = true,
                b'-' => negative = true,
                b'.' => in_fraction = true,
                b'e' | b'E' => in_exponent = true,
                b'0'..=b'9' if in_exponent => {
                    exponent = exponent
                        .saturating_mul(10)
                        .saturating_add(i128::from(c - b'0'));
                }
                b'0'..=b'9' => {
                    digits.push(c - b'0');
                    if !in_fraction {
                        int_len += 1;
                    }
                }
                _ => {}
            }
        }
        if exponent_negative {
            exponent = -exponent;
        }

        let leading = digits.iter().take_while(|d| **d == 0).count();
        digits.drain(..leading);
        while digits.last() == Some(&0) {
            digits.pop();
        }
        let point = int_len
            .saturating_add(exponent)
            .saturating_sub(leading as i128);

        Self {
            negative: negative && !digits.is_empty(),
            digits,
            point,
        }
    }

    fn sign(&self) -> i8 {
        match (self.digits.is_empty(), self.negative) {
            (true, _) => 0,
            (false, true) => -1,
            (false, false) => 1,
        }
    }

    fn cmp_magnitude(&self, other: &Self) -> Ordering {
        self.point
            .cmp(&other.point)
            .then_with(|| self.digits.cmp(&other.digits))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.sign().cmp(&other.sign()) {
            Ordering::Equal => match self.sign() {
                0 => Ordering::Equal,
                1 => self.cmp_magnitude(other),
                _ => other.cmp_magnitude(self),
            },
            ord => ord,
        }
    }
}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
