use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in page (or window-adjusted) coordinates.
///
/// Field order matches the wire order: top, left, bottom, right.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl Rect {
    /// The degenerate rectangle recorded for collapsed or hidden nodes.
    pub const ZERO: Rect = Rect {
        top: 0.0,
        left: 0.0,
        bottom: 0.0,
        right: 0.0,
    };

    pub fn new(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// `(x, y)` of the center point.
    pub fn center(&self) -> (f64, f64) {
        (
            self.left + self.width() / 2.0,
            self.top + self.height() / 2.0,
        )
    }

    pub fn coordinates(&self) -> [f64; 4] {
        [self.top, self.left, self.bottom, self.right]
    }
}

impl From<[f64; 4]> for Rect {
    fn from([top, left, bottom, right]: [f64; 4]) -> Self {
        Rect::new(top, left, bottom, right)
    }
}

/// A rectangle exactly as the browser reports it, before any scroll or
/// zoom adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ClientRect {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl ClientRect {
    pub fn new(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }
}

impl From<ClientRect> for Rect {
    fn from(r: ClientRect) -> Self {
        Rect::new(r.top, r.left, r.bottom, r.right)
    }
}

/// A typed attribute value as returned by a node getter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AttributeValue {
    Text(String),
    Integer(i64),
    Number(f64),
    Bool(bool),
    List(Vec<String>),
    Rects(Vec<Rect>),
}

impl AttributeValue {
    /// A list of numbers, rendered the way the page would print them.
    pub fn numbers<I: IntoIterator<Item = f64>>(values: I) -> Self {
        AttributeValue::List(values.into_iter().map(format_number).collect())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AttributeValue::Text(_) => "text",
            AttributeValue::Integer(_) => "integer",
            AttributeValue::Number(_) => "number",
            AttributeValue::Bool(_) => "bool",
            AttributeValue::List(_) => "list",
            AttributeValue::Rects(_) => "rects",
        }
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::Text(s)
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::Text(s.to_string())
    }
}

impl From<i64> for AttributeValue {
    fn from(v: i64) -> Self {
        AttributeValue::Integer(v)
    }
}

impl From<bool> for AttributeValue {
    fn from(v: bool) -> Self {
        AttributeValue::Bool(v)
    }
}

impl From<Vec<Rect>> for AttributeValue {
    fn from(rects: Vec<Rect>) -> Self {
        AttributeValue::Rects(rects)
    }
}

/// Render a number the way the page prints it: shortest round-trip
/// digits, no trailing `.0` (`10`, `2.5`, `-3`), and exponent form below
/// `1e-6` or from `1e21` up (`1.5e-7`, `1e+21`).
pub(crate) fn format_number(v: f64) -> String {
    if v == 0.0 {
        // Also folds -0 into 0.
        return "0".into();
    }
    if v.is_infinite() {
        return if v > 0.0 { "Infinity" } else { "-Infinity" }.into();
    }
    let magnitude = v.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let exp = format!("{v:e}");
        return match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
            _ => exp,
        };
    }
    v.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_drops_integral_fraction() {
        assert_eq!(format_number(10.0), "10");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
    }

    #[test]
    fn format_switches_to_exponent_at_the_edges() {
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(-2.5e22), "-2.5e+22");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(1.5e-7), "1.5e-7");
        // Just inside the plain range on both sides.
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(0.000001), "0.000001");
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
    }

    #[test]
    fn rect_metrics() {
        let r = Rect::new(10.0, 20.0, 30.0, 60.0);
        assert_eq!(r.width(), 40.0);
        assert_eq!(r.height(), 20.0);
        assert_eq!(r.center(), (40.0, 20.0));
        assert_eq!(r.coordinates(), [10.0, 20.0, 30.0, 60.0]);
    }

    #[test]
    fn numbers_helper_formats_each_element() {
        assert_eq!(
            AttributeValue::numbers([0.0, 120.5]),
            AttributeValue::List(vec!["0".into(), "120.5".into()])
        );
    }

    #[test]
    fn value_serializes_with_kind_tag() {
        let json = serde_json::to_value(AttributeValue::Bool(true)).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "bool", "value": true}));
    }
}
