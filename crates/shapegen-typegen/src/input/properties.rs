//! Flat key-path files (`a.b.c=value`) into a property tree.

use super::{PROPERTIES, ParsedSource, Parser, utf8};
use crate::error::ParseError;
use crate::model::{PathInsert, PropertyTree, PropertyValue, Scalar};
use crate::options::ParseOptions;
use shapegen_core::read_entries;

/// Parser for `.properties` files.
pub struct PropertiesParser;

impl Parser for PropertiesParser {
    fn media_type(&self) -> &'static str {
        PROPERTIES
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".properties"]
    }

    fn parse(&self, input: &[u8], options: &ParseOptions) -> Result<ParsedSource, ParseError> {
        let text = utf8(input, "properties")?;
        parse_properties(text, options).map(ParsedSource::Tree)
    }
}

/// Build a tree from flat `key=value` lines, splitting keys on `.`.
///
/// A key that is both a value and a prefix of other keys becomes a nested
/// container; its own value is dropped with a warning. Repeating a key
/// overwrites the earlier value without moving it.
pub fn parse_properties(text: &str, options: &ParseOptions) -> Result<PropertyTree, ParseError> {
    let entries = read_entries(text).map_err(|e| ParseError::format("properties", e))?;
    let mut tree = PropertyTree::new();

    for entry in &entries {
        let segments: Vec<&str> = entry.key.split('.').map(str::trim).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(ParseError::format(
                "properties",
                format!("line {}: key `{}` has an empty segment", entry.line, entry.key),
            ));
        }

        match tree.insert_path(&segments, convert_value(&entry.value, options)) {
            PathInsert::Inserted => {}
            PathInsert::Replaced(_) => {
                tracing::debug!(line = entry.line, key = %entry.key, "duplicate key overrides earlier value");
            }
            PathInsert::Conflict { path, discarded } => {
                tracing::warn!(
                    line = entry.line,
                    key = %path,
                    ?discarded,
                    "key is both a value and a prefix; keeping the nested keys"
                );
            }
        }
    }

    tracing::debug!(entries = entries.len(), depth = tree.depth(), "parsed properties");
    Ok(tree)
}

fn convert_value(raw: &str, options: &ParseOptions) -> PropertyValue {
    if let Some(delimiter) = options.list_delimiter {
        if raw.contains(delimiter) {
            return PropertyValue::List(
                raw.split(delimiter)
                    .map(|item| scalar(item.trim(), options))
                    .collect(),
            );
        }
    }
    scalar(raw, options)
}

fn scalar(raw: &str, options: &ParseOptions) -> PropertyValue {
    if options.auto_convert {
        Scalar::convert(raw).into()
    } else {
        Scalar::String(raw.to_string()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> PropertyTree {
        parse_properties(text, &ParseOptions::default()).unwrap()
    }

    fn scalar_at<'a>(tree: &'a PropertyTree, path: &[&str]) -> &'a PropertyValue {
        tree.get_path(path).unwrap()
    }

    #[test]
    fn nests_dotted_keys_with_types() {
        let tree = parse("app.name=Demo\napp.port=8080\napp.debug=true\n");
        assert_eq!(tree.keys().collect::<Vec<_>>(), vec!["app"]);
        let app = tree.get("app").and_then(PropertyValue::as_tree).unwrap();
        assert_eq!(app.keys().collect::<Vec<_>>(), vec!["name", "port", "debug"]);
        assert_eq!(
            scalar_at(&tree, &["app", "name"]),
            &PropertyValue::Scalar(Scalar::String("Demo".into()))
        );
        assert_eq!(
            scalar_at(&tree, &["app", "port"]),
            &PropertyValue::Scalar(Scalar::Integer(8080))
        );
        assert_eq!(
            scalar_at(&tree, &["app", "debug"]),
            &PropertyValue::Scalar(Scalar::Boolean(true))
        );
    }

    #[test]
    fn empty_input_is_an_empty_tree() {
        assert!(parse("").is_empty());
        assert!(parse("# only a comment\n\n").is_empty());
    }

    #[test]
    fn conversion_can_be_disabled() {
        let options = ParseOptions {
            auto_convert: false,
            ..Default::default()
        };
        let tree = parse_properties("port=8080", &options).unwrap();
        assert_eq!(
            tree.get("port"),
            Some(&PropertyValue::Scalar(Scalar::String("8080".into())))
        );
    }

    #[test]
    fn splits_lists_on_the_delimiter() {
        let options = ParseOptions {
            list_delimiter: Some(','),
            ..Default::default()
        };
        let tree = parse_properties("ports=80, 443\nname=web", &options).unwrap();
        assert_eq!(
            tree.get("ports"),
            Some(&PropertyValue::List(vec![
                Scalar::Integer(80).into(),
                Scalar::Integer(443).into()
            ]))
        );
        assert_eq!(
            tree.get("name"),
            Some(&PropertyValue::Scalar(Scalar::String("web".into())))
        );
    }

    #[test]
    fn prefix_conflict_keeps_the_container() {
        let tree = parse("a=1\na.b=2");
        assert_eq!(
            scalar_at(&tree, &["a", "b"]),
            &PropertyValue::Scalar(Scalar::Integer(2))
        );
        assert_eq!(tree, parse("a.b=2\na=1"));
    }

    #[test]
    fn empty_segments_are_rejected() {
        let err = parse_properties("a..b=1", &ParseOptions::default()).unwrap_err();
        assert!(err.to_string().contains("empty segment"));
    }

    #[test]
    fn truncated_continuation_is_an_error() {
        let err = parse_properties("a=1\nb=2 \\", &ParseOptions::default()).unwrap_err();
        assert!(matches!(err, ParseError::Format { .. }));
    }

    #[test]
    fn flatten_rebuilds_the_same_tree() {
        let text = "db.host=localhost\ndb.pool.size=4\ndb.pool.fair=false\nname=x\n";
        let tree = parse(text);
        let rebuilt: String = tree
            .flatten(".")
            .into_iter()
            .map(|(key, value)| match value {
                PropertyValue::Scalar(Scalar::String(s)) => format!("{key}={s}\n"),
                PropertyValue::Scalar(Scalar::Integer(i)) => format!("{key}={i}\n"),
                PropertyValue::Scalar(Scalar::Boolean(b)) => format!("{key}={b}\n"),
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(rebuilt, text);
        assert_eq!(parse(&rebuilt), tree);
    }
}
