//! Depth-first flattening of a document into dotted keys.

use crate::{ConfigError, ConfigResult};
use flatconf_core::{Node, Scalar};

/// Suffix of the marker key emitted for every sequence.
pub const ARRAY_MARKER: &str = "array";

/// One flattened entry.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatEntry<'a> {
    pub key: String,
    pub value: FlatValue<'a>,
}

/// Value of a flattened entry.
#[derive(Debug, Clone, PartialEq)]
pub enum FlatValue<'a> {
    /// A scalar leaf.
    Leaf(&'a Scalar),
    /// The raw elements of a sequence, emitted under `<path>.array`.
    Array(&'a [Node]),
}

enum Frame<'a> {
    Mapping {
        prefix: String,
        fields: std::slice::Iter<'a, (String, Node)>,
    },
    Sequence {
        prefix: String,
        items: std::iter::Enumerate<std::slice::Iter<'a, Node>>,
    },
}

/// Lazy depth-first iterator over a document's leaves and array markers.
///
/// Mapping children are visited in declaration order, sequence children in index
/// order. A sequence's marker is yielded before its elements.
pub struct Flatten<'a> {
    stack: Vec<Frame<'a>>,
    pending: Option<FlatEntry<'a>>,
}

/// Start flattening `root`. A null root yields nothing; a scalar root is rejected.
pub fn flatten(root: &Node) -> ConfigResult<Flatten<'_>> {
    let mut iter = Flatten {
        stack: Vec::new(),
        pending: None,
    };

    match root {
        Node::Mapping(fields) => iter.stack.push(Frame::Mapping {
            prefix: String::new(),
            fields: fields.iter(),
        }),
        Node::Sequence(items) => {
            iter.pending = Some(FlatEntry {
                key: ARRAY_MARKER.to_string(),
                value: FlatValue::Array(items),
            });
            iter.stack.push(Frame::Sequence {
                prefix: String::new(),
                items: items.iter().enumerate(),
            });
        }
        Node::Scalar(Scalar::Null) => {}
        Node::Scalar(other) => {
            return Err(ConfigError::InvalidDocument(format!(
                "document root must be a mapping or sequence, found scalar {:?}",
                other.to_string()
            )));
        }
    }

    Ok(iter)
}

fn join(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", prefix, segment)
    }
}

impl<'a> Iterator for Flatten<'a> {
    type Item = FlatEntry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(entry) = self.pending.take() {
            return Some(entry);
        }

        loop {
            let next = match self.stack.last_mut()? {
                Frame::Mapping { prefix, fields } => fields
                    .next()
                    .map(|(name, node)| (join(prefix, name), node)),
                Frame::Sequence { prefix, items } => items
                    .next()
                    .map(|(index, node)| (join(prefix, &index.to_string()), node)),
            };

            let Some((key, node)) = next else {
                self.stack.pop();
                continue;
            };

            match node {
                Node::Scalar(scalar) => {
                    return Some(FlatEntry {
                        key,
                        value: FlatValue::Leaf(scalar),
                    });
                }
                Node::Mapping(fields) => self.stack.push(Frame::Mapping {
                    prefix: key,
                    fields: fields.iter(),
                }),
                Node::Sequence(items) => {
                    let marker = join(&key, ARRAY_MARKER);
                    self.stack.push(Frame::Sequence {
                        prefix: key,
                        items: items.iter().enumerate(),
                    });
                    return Some(FlatEntry {
                        key: marker,
                        value: FlatValue::Array(items),
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse;
    use crate::Format;

    fn flat_keys(yaml: &str) -> Vec<String> {
        let root = parse(yaml, Format::Yaml).unwrap();
        flatten(&root).unwrap().map(|e| e.key).collect()
    }

    #[test]
    fn test_flat_document_keeps_top_level_names() {
        let root = parse("name: demo\nport: 80\nenabled: true\n", Format::Yaml).unwrap();
        let entries: Vec<_> = flatten(&root).unwrap().collect();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].key, "name");
        assert_eq!(
            entries[0].value,
            FlatValue::Leaf(&Scalar::String("demo".to_string()))
        );
        assert_eq!(entries[1].value, FlatValue::Leaf(&Scalar::Integer(80)));
        assert_eq!(entries[2].value, FlatValue::Leaf(&Scalar::Bool(true)));
    }

    #[test]
    fn test_nested_mappings() {
        assert_eq!(
            flat_keys("application:\n  config:\n    port: 80\n    host: x\nregion: eu\n"),
            vec![
                "application.config.port",
                "application.config.host",
                "region"
            ]
        );
    }

    #[test]
    fn test_sequence_emits_marker_and_indexed_entries() {
        let yaml = "servers:\n  - name: a\n    port: 1\n  - name: b\n    port: 2\n";
        assert_eq!(
            flat_keys(yaml),
            vec![
                "servers.array",
                "servers.0.name",
                "servers.0.port",
                "servers.1.name",
                "servers.1.port",
            ]
        );
    }

    #[test]
    fn test_array_marker_carries_raw_list() {
        let root = parse("tags: [x, y]\n", Format::Yaml).unwrap();
        let first = flatten(&root).unwrap().next().unwrap();
        assert_eq!(first.key, "tags.array");
        match first.value {
            FlatValue::Array(items) => {
                assert_eq!(items, &[Node::string("x"), Node::string("y")][..])
            }
            other => panic!("expected array marker, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_sequences() {
        assert_eq!(
            flat_keys("matrix:\n  - [1, 2]\n"),
            vec!["matrix.array", "matrix.0.array", "matrix.0.0", "matrix.0.1"]
        );
    }

    #[test]
    fn test_empty_containers() {
        assert_eq!(flat_keys("empty_map: {}\nempty_list: []\n"), vec!["empty_list.array"]);
    }

    #[test]
    fn test_sequence_root() {
        assert_eq!(flat_keys("- a\n- b\n"), vec!["array", "0", "1"]);
    }

    #[test]
    fn test_null_root_is_empty() {
        assert!(flat_keys("").is_empty());
    }

    #[test]
    fn test_scalar_root_rejected() {
        let root = Node::string("just text");
        assert!(matches!(
            flatten(&root),
            Err(ConfigError::InvalidDocument(_))
        ));
    }
}
