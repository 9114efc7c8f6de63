use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// In-memory representation of any JSON value.
///
/// Numbers normalize to f64 on construction, integer input included.
/// Object key order is not significant in the source, so keys are kept
/// sorted; consumers get stable iteration for free.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
  Null,
  Bool(bool),
  Number(f64),
  String(String),
  Array(Vec<Value>),
  Object(BTreeMap<String, Value>),
}

impl Value {
  pub fn is_null(&self) -> bool {
    matches!(self, Value::Null)
  }

  pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
    match self {
      Value::Object(map) => Some(map),
      _ => None,
    }
  }

  pub fn as_array(&self) -> Option<&[Value]> {
    match self {
      Value::Array(items) => Some(items),
      _ => None,
    }
  }
}

/// The one textual form of a number shared by search and display.
///
/// Integral values print without a fraction ("3", not "3.0"); everything
/// else rounds to 4 significant digits.
pub fn format_number(n: f64) -> String {
  if !n.is_finite() {
    return n.to_string();
  }
  // f64 holds integers exactly up to 2^53.
  if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
    return format!("{}", n as i64);
  }
  format_significant(n, 4)
}

fn format_significant(n: f64, digits: usize) -> String {
  let exp = n.abs().log10().floor() as i32;
  if exp < -4 || exp >= digits as i32 {
    let s = format!("{:.*e}", digits - 1, n);
    trim_exponent_zeros(&s)
  } else {
    let decimals = (digits as i32 - 1 - exp).max(0) as usize;
    let s = format!("{:.*}", decimals, n);
    trim_fraction_zeros(&s)
  }
}

fn trim_fraction_zeros(s: &str) -> String {
  if !s.contains('.') {
    return s.to_string();
  }
  s.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn trim_exponent_zeros(s: &str) -> String {
  match s.split_once('e') {
    Some((mantissa, exp)) => {
      let mantissa = trim_fraction_zeros(mantissa);
      format!("{mantissa}e{exp}")
    }
    None => s.to_string(),
  }
}
