//! Document loading.
//!
//! Converts YAML, JSON and KDL input into a `Node` tree, keeping mapping keys
//! in declaration order.

use crate::{ConfigError, ConfigResult};
use derive_more::Display;
use flatconf_core::{Node, Scalar};
use kdl::{KdlDocument, KdlNode, KdlValue};
use std::io::ErrorKind;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum Format {
    #[default]
    #[display("YAML")]
    Yaml,
    #[display("JSON")]
    Json,
    #[display("KDL")]
    Kdl,
}

impl Format {
    /// Infer the format from a file extension, falling back to YAML.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => Format::Json,
            Some("kdl") => Format::Kdl,
            _ => Format::Yaml,
        }
    }
}

impl FromStr for Format {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(Format::Yaml),
            "json" => Ok(Format::Json),
            "kdl" => Ok(Format::Kdl),
            _ => Err(ConfigError::UnknownFormat(s.to_string())),
        }
    }
}

/// Read and parse a document. The format is inferred from the extension when not given.
pub fn load(path: &Path, format: Option<Format>) -> ConfigResult<Node> {
    let format = format.unwrap_or_else(|| Format::from_path(path));
    let text = std::fs::read_to_string(path).map_err(|source| match source.kind() {
        // The file was read but is not UTF-8: a malformed document, not a read failure
        ErrorKind::InvalidData => ConfigError::Parse {
            format,
            message: source.to_string(),
        },
        _ => ConfigError::Read {
            path: path.to_path_buf(),
            source,
        },
    })?;
    debug!(path = %path.display(), %format, bytes = text.len(), "loaded document");
    parse(&text, format)
}

/// Parse document text in the given format.
pub fn parse(text: &str, format: Format) -> ConfigResult<Node> {
    match format {
        Format::Yaml => {
            let mut value: serde_yaml::Value = serde_yaml::from_str(text)?;
            value.apply_merge()?;
            from_yaml(value)
        }
        Format::Json => {
            let value: serde_json::Value = serde_json::from_str(text)?;
            Ok(from_json(value))
        }
        Format::Kdl => {
            let doc: KdlDocument = text.parse()?;
            from_kdl_document(&doc)
        }
    }
}

fn from_yaml(value: serde_yaml::Value) -> ConfigResult<Node> {
    use serde_yaml::Value;

    let node = match value {
        Value::Null => Node::null(),
        Value::Bool(b) => Scalar::Bool(b).into(),
        Value::Number(n) => yaml_number(&n).into(),
        Value::String(s) => Node::string(s),
        Value::Sequence(items) => Node::Sequence(
            items
                .into_iter()
                .map(from_yaml)
                .collect::<ConfigResult<_>>()?,
        ),
        Value::Mapping(map) => Node::Mapping(
            map.into_iter()
                .map(|(k, v)| Ok((yaml_key(k)?, from_yaml(v)?)))
                .collect::<ConfigResult<_>>()?,
        ),
        Value::Tagged(tagged) => from_yaml(tagged.value)?,
    };
    Ok(node)
}

fn yaml_number(n: &serde_yaml::Number) -> Scalar {
    if let Some(i) = n.as_i64() {
        Scalar::Integer(i.into())
    } else if let Some(u) = n.as_u64() {
        Scalar::Integer(u.into())
    } else {
        Scalar::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}

fn yaml_key(key: serde_yaml::Value) -> ConfigResult<String> {
    use serde_yaml::Value;

    match key {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok("null".to_string()),
        Value::Tagged(tagged) => yaml_key(tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => Err(ConfigError::InvalidDocument(
            "mapping keys must be scalars".to_string(),
        )),
    }
}

fn from_json(value: serde_json::Value) -> Node {
    use serde_json::Value;

    match value {
        Value::Null => Node::null(),
        Value::Bool(b) => Scalar::Bool(b).into(),
        Value::Number(n) => {
            let scalar = if let Some(i) = n.as_i64() {
                Scalar::Integer(i.into())
            } else if let Some(u) = n.as_u64() {
                Scalar::Integer(u.into())
            } else {
                Scalar::Float(n.as_f64().unwrap_or(f64::NAN))
            };
            scalar.into()
        }
        Value::String(s) => Node::string(s),
        Value::Array(items) => Node::Sequence(items.into_iter().map(from_json).collect()),
        Value::Object(map) => {
            Node::Mapping(map.into_iter().map(|(k, v)| (k, from_json(v))).collect())
        }
    }
}

// KDL mapping rules:
// - a node with properties or children becomes a mapping (properties first)
// - a node with a single argument becomes that scalar
// - a node with several arguments becomes a sequence
// - a bare node becomes null

fn from_kdl_document(doc: &KdlDocument) -> ConfigResult<Node> {
    let mut fields: Vec<(String, Node)> = Vec::new();
    for node in doc.nodes() {
        let name = node.name().value();
        push_unique(&mut fields, name, from_kdl_node(node)?)?;
    }
    Ok(Node::Mapping(fields))
}

fn from_kdl_node(node: &KdlNode) -> ConfigResult<Node> {
    let mut args = Vec::new();
    let mut fields = Vec::new();

    for entry in node.entries() {
        let value = Node::Scalar(from_kdl_value(entry.value()));
        match entry.name() {
            Some(name) => push_unique(&mut fields, name.value(), value)?,
            None => args.push(value),
        }
    }

    if let Some(children) = node.children() {
        if let Node::Mapping(child_fields) = from_kdl_document(children)? {
            for (name, value) in child_fields {
                push_unique(&mut fields, &name, value)?;
            }
        }
    }

    let has_mapping = !fields.is_empty() || node.children().is_some();
    match (has_mapping, args.len()) {
        (true, 0) => Ok(Node::Mapping(fields)),
        (true, _) => Err(ConfigError::InvalidDocument(format!(
            "node '{}' mixes arguments with properties or children",
            node.name().value()
        ))),
        (false, 0) => Ok(Node::null()),
        (false, 1) => Ok(args.remove(0)),
        (false, _) => Ok(Node::Sequence(args)),
    }
}

fn from_kdl_value(value: &KdlValue) -> Scalar {
    match value {
        KdlValue::String(s) => Scalar::String(s.clone()),
        KdlValue::Integer(i) => Scalar::Integer(*i),
        KdlValue::Float(f) => Scalar::Float(*f),
        KdlValue::Bool(b) => Scalar::Bool(*b),
        KdlValue::Null => Scalar::Null,
    }
}

fn push_unique(fields: &mut Vec<(String, Node)>, name: &str, value: Node) -> ConfigResult<()> {
    if fields.iter().any(|(k, _)| k == name) {
        return Err(ConfigError::Duplicate(name.to_string()));
    }
    fields.push((name.to_string(), value));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn keys(node: &Node) -> Vec<&str> {
        match node {
            Node::Mapping(fields) => fields.iter().map(|(k, _)| k.as_str()).collect(),
            _ => panic!("expected mapping, got {:?}", node),
        }
    }

    #[test]
    fn test_yaml_keeps_declaration_order() {
        let node = parse("zeta: 1\nalpha: two\nmid: true\n", Format::Yaml).unwrap();
        assert_eq!(keys(&node), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_yaml_scalar_types() {
        let node = parse("int: 3\nfloat: 1.5\nflag: false\nnothing: ~\n", Format::Yaml).unwrap();
        let Node::Mapping(fields) = node else {
            panic!("expected mapping");
        };
        assert_eq!(fields[0].1, Node::from(Scalar::Integer(3)));
        assert_eq!(fields[1].1, Node::from(Scalar::Float(1.5)));
        assert_eq!(fields[2].1, Node::from(Scalar::Bool(false)));
        assert_eq!(fields[3].1, Node::null());
    }

    #[test]
    fn test_yaml_merge_keys() {
        let yaml = "base: &base\n  region: us-east\nprod:\n  <<: *base\n  tier: gold\n";
        let node = parse(yaml, Format::Yaml).unwrap();
        let Node::Mapping(fields) = node else {
            panic!("expected mapping");
        };
        let mut merged = keys(&fields[1].1);
        merged.sort();
        assert_eq!(merged, vec!["region", "tier"]);
    }

    #[test]
    fn test_empty_yaml_is_null() {
        assert_eq!(parse("", Format::Yaml).unwrap(), Node::null());
    }

    #[test]
    fn test_malformed_yaml() {
        let err = parse("a: [1, 2\n", Format::Yaml).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Parse {
                format: Format::Yaml,
                ..
            }
        ));
    }

    #[test]
    fn test_json_keeps_declaration_order() {
        let node = parse(r#"{"b": "$(a)2", "a": "1", "list": [1, 2]}"#, Format::Json).unwrap();
        assert_eq!(keys(&node), vec!["b", "a", "list"]);
    }

    #[test]
    fn test_kdl_nodes() {
        let kdl = r#"
            name "demo"
            service port=8080 {
                host "localhost"
            }
            tags "a" "b"
            marker
        "#;
        let node = parse(kdl, Format::Kdl).unwrap();
        let Node::Mapping(fields) = node else {
            panic!("expected mapping");
        };
        assert_eq!(fields[0], ("name".to_string(), Node::string("demo")));
        assert_eq!(keys(&fields[1].1), vec!["port", "host"]);
        assert_eq!(
            fields[2].1,
            Node::Sequence(vec![Node::string("a"), Node::string("b")])
        );
        assert_eq!(fields[3].1, Node::null());
    }

    #[test]
    fn test_kdl_duplicate_node() {
        let err = parse("a 1\na 2\n", Format::Kdl).unwrap_err();
        assert!(matches!(err, ConfigError::Duplicate(name) if name == "a"));
    }

    #[test]
    fn test_kdl_mixed_arguments_rejected() {
        let err = parse("svc \"x\" port=1\n", Format::Kdl).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDocument(_)));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("conf.JSON")), Format::Json);
        assert_eq!(Format::from_path(Path::new("conf.kdl")), Format::Kdl);
        assert_eq!(Format::from_path(Path::new("conf.yml")), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("conf")), Format::Yaml);
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("yml".parse::<Format>().unwrap(), Format::Yaml);
        assert_eq!("KDL".parse::<Format>().unwrap(), Format::Kdl);
        assert!(matches!(
            "toml".parse::<Format>(),
            Err(ConfigError::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("missing.yaml"), None).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_load_non_utf8_is_parse_error() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(&[b'a', b':', b' ', 0xff, 0xfe, b'\n']).unwrap();

        let err = load(file.path(), None).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Parse {
                format: Format::Yaml,
                ..
            }
        ));
    }

    #[test]
    fn test_load_infers_format() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"key": "value"}}"#).unwrap();

        let node = load(file.path(), None).unwrap();
        assert_eq!(
            node,
            Node::Mapping(vec![("key".to_string(), Node::string("value"))])
        );
    }
}
