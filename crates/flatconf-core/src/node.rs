//! Parsed document tree.
//!
//! Every supported input format is converted into this closed set of variants
//! before flattening, so the rest of the pipeline never inspects parser types.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::fmt;

/// A node of a parsed configuration document.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Named children in declaration order.
    Mapping(Vec<(String, Node)>),
    /// Children in index order.
    Sequence(Vec<Node>),
    /// A leaf value.
    Scalar(Scalar),
}

/// A leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Integer(i128),
    Float(f64),
    Bool(bool),
    Null,
}

impl Node {
    pub fn string(value: impl Into<String>) -> Self {
        Node::Scalar(Scalar::String(value.into()))
    }

    pub fn null() -> Self {
        Node::Scalar(Scalar::Null)
    }

    /// Truthiness used when deciding whether a referenced value is defined.
    /// Containers are always truthy, even when empty.
    pub fn is_truthy(&self) -> bool {
        match self {
            Node::Scalar(scalar) => scalar.is_truthy(),
            Node::Mapping(_) | Node::Sequence(_) => true,
        }
    }

    /// Compact JSON rendering, used for container values.
    pub fn to_json(&self) -> String {
        // Serializing this tree into a String cannot fail: keys are always strings.
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl Scalar {
    /// Empty strings, zero, NaN, `false` and null are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Scalar::String(s) => !s.is_empty(),
            Scalar::Integer(n) => *n != 0,
            Scalar::Float(f) => *f != 0.0 && !f.is_nan(),
            Scalar::Bool(b) => *b,
            Scalar::Null => false,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::String(s) => f.write_str(s),
            Scalar::Integer(n) => write!(f, "{}", n),
            Scalar::Float(x) if x.is_nan() => f.write_str("NaN"),
            Scalar::Float(x) if x.is_infinite() => {
                f.write_str(if *x > 0.0 { "Infinity" } else { "-Infinity" })
            }
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Null => f.write_str("null"),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Scalar(scalar) => fmt::Display::fmt(scalar, f),
            Node::Mapping(_) | Node::Sequence(_) => f.write_str(&self.to_json()),
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Mapping(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (key, value) in fields {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Node::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Node::Scalar(scalar) => scalar.serialize(serializer),
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::String(s) => serializer.serialize_str(s),
            Scalar::Integer(n) => serializer.serialize_i128(*n),
            Scalar::Float(x) => serializer.serialize_f64(*x),
            Scalar::Bool(b) => serializer.serialize_bool(*b),
            Scalar::Null => serializer.serialize_unit(),
        }
    }
}

impl From<Scalar> for Node {
    fn from(scalar: Scalar) -> Self {
        Node::Scalar(scalar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_falsy_scalars() {
        assert!(!Scalar::String(String::new()).is_truthy());
        assert!(!Scalar::Integer(0).is_truthy());
        assert!(!Scalar::Float(0.0).is_truthy());
        assert!(!Scalar::Float(f64::NAN).is_truthy());
        assert!(!Scalar::Bool(false).is_truthy());
        assert!(!Scalar::Null.is_truthy());
    }

    #[test]
    fn test_truthy_values() {
        assert!(Scalar::String("0".to_string()).is_truthy());
        assert!(Scalar::Integer(-1).is_truthy());
        assert!(Scalar::Bool(true).is_truthy());
        assert!(Node::Sequence(vec![]).is_truthy());
        assert!(Node::Mapping(vec![]).is_truthy());
    }

    #[test]
    fn test_scalar_display() {
        assert_eq!(Scalar::Integer(8080).to_string(), "8080");
        assert_eq!(Scalar::Float(1.0).to_string(), "1");
        assert_eq!(Scalar::Float(2.5).to_string(), "2.5");
        assert_eq!(Scalar::Float(f64::INFINITY).to_string(), "Infinity");
        assert_eq!(Scalar::Bool(true).to_string(), "true");
        assert_eq!(Scalar::Null.to_string(), "null");
    }

    #[test]
    fn test_container_display_is_compact_json() {
        let node = Node::Sequence(vec![
            Node::string("a"),
            Node::Scalar(Scalar::Integer(1)),
            Node::Mapping(vec![("k".to_string(), Node::Scalar(Scalar::Bool(false)))]),
        ]);
        assert_eq!(node.to_string(), r#"["a",1,{"k":false}]"#);
    }

    #[test]
    fn test_mapping_json_keeps_declaration_order() {
        let node = Node::Mapping(vec![
            ("zeta".to_string(), Node::null()),
            ("alpha".to_string(), Node::string("x")),
        ]);
        assert_eq!(node.to_json(), r#"{"zeta":null,"alpha":"x"}"#);
    }
}
