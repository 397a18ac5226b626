//! JSON text rendering of [`Value`]s.
//!
//! Used by `Display for Value` (`{:#}` selects the indented form) and by the
//! `+` string coercion of arrays and objects. Object keys are written in
//! insertion order.
//!
//! ```
//! use mexpr::Value;
//! use mexpr::output::{to_json, to_json_pretty};
//!
//! let value = Value::Array(vec![Value::Number(1.0), Value::from("a")]);
//! assert_eq!(to_json(&value), r#"[1,"a"]"#);
//! assert_eq!(to_json_pretty(&value), "[\n  1,\n  \"a\"\n]");
//! ```

use std::fmt::Write;

use crate::value::Value;

struct JsonWriter {
    pretty: bool,
    out: String,
}

impl JsonWriter {
    fn new(pretty: bool) -> Self {
        JsonWriter {
            pretty,
            out: String::new(),
        }
    }

    fn write_value(&mut self, value: &Value, depth: usize) {
        match value {
            Value::Null => self.out.push_str("null"),
            Value::Boolean(b) => self.out.push_str(if *b { "true" } else { "false" }),
            Value::Number(n) => self.write_number(*n),
            Value::String(s) => self.write_string(s),
            Value::Array(items) => {
                if items.is_empty() {
                    self.out.push_str("[]");
                    return;
                }
                self.out.push('[');
                for (i, item) in items.iter().enumerate() {
                    self.separator(i, depth + 1);
                    self.write_value(item, depth + 1);
                }
                self.newline(depth);
                self.out.push(']');
            }
            Value::Object(map) => {
                if map.is_empty() {
                    self.out.push_str("{}");
                    return;
                }
                self.out.push('{');
                for (i, (key, item)) in map.iter().enumerate() {
                    self.separator(i, depth + 1);
                    self.write_string(key);
                    self.out.push_str(if self.pretty { ": " } else { ":" });
                    self.write_value(item, depth + 1);
                }
                self.newline(depth);
                self.out.push('}');
            }
        }
    }

    fn separator(&mut self, index: usize, depth: usize) {
        if index > 0 {
            self.out.push(',');
        }
        self.newline(depth);
    }

    fn newline(&mut self, depth: usize) {
        if self.pretty {
            self.out.push('\n');
            self.out.push_str(&"  ".repeat(depth));
        }
    }

    // JSON has no representation for NaN or infinities.
    fn write_number(&mut self, n: f64) {
        if n.is_finite() {
            let _ = write!(self.out, "{}", n);
        } else {
            self.out.push_str("null");
        }
    }

    fn write_string(&mut self, s: &str) {
        self.out.push('"');
        for c in s.chars() {
            match c {
                '"' => self.out.push_str("\\\""),
                '\\' => self.out.push_str("\\\\"),
                '\n' => self.out.push_str("\\n"),
                '\r' => self.out.push_str("\\r"),
                '\t' => self.out.push_str("\\t"),
                c if c.is_control() => {
                    let _ = write!(self.out, "\\u{:04x}", c as u32);
                }
                c => self.out.push(c),
            }
        }
        self.out.push('"');
    }
}

/// Compact JSON text, no whitespace.
pub fn to_json(value: &Value) -> String {
    let mut writer = JsonWriter::new(false);
    writer.write_value(value, 0);
    writer.out
}

/// JSON text with 2-space indentation, one element per line.
pub fn to_json_pretty(value: &Value) -> String {
    let mut writer = JsonWriter::new(true);
    writer.write_value(value, 0);
    writer.out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Map;

    #[test]
    fn keeps_insertion_order() {
        let mut map = Map::new();
        map.insert("z".into(), Value::Number(1.0));
        map.insert("a".into(), Value::from("x\"y"));
        assert_eq!(to_json(&Value::Object(map)), r#"{"z":1,"a":"x\"y"}"#);
    }

    #[test]
    fn pretty_nested() {
        let mut map = Map::new();
        map.insert("items".into(), Value::Array(vec![Value::Boolean(true)]));
        map.insert("empty".into(), Value::Array(vec![]));
        assert_eq!(
            to_json_pretty(&Value::Object(map)),
            "{\n  \"items\": [\n    true\n  ],\n  \"empty\": []\n}"
        );
    }

    #[test]
    fn non_finite_numbers_render_as_null() {
        assert_eq!(to_json(&Value::Number(f64::INFINITY)), "null");
        assert_eq!(to_json(&Value::Number(2.5)), "2.5");
    }
}
