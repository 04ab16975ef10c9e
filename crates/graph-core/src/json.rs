//! Whole-document JSON entry points.

use serde_json::Value;

use crate::error::{Result, SerializationError};
use crate::parsable::{Parsable, ParsableFactory, downcast, edited_additional_keys};
use crate::parse::{JsonParseNode, ParseNode, json_kind};
use crate::write::{JsonSerializationWriter, SerializationWriter};

/// Decodes a JSON document into a model chosen by `factory`.
pub fn from_json_str(input: &str, factory: ParsableFactory) -> Result<Box<dyn Parsable>> {
    let value: Value = serde_json::from_str(input)?;
    from_json_value(&value, factory)
}

/// Decodes an already parsed JSON value.
pub fn from_json_value(value: &Value, factory: ParsableFactory) -> Result<Box<dyn Parsable>> {
    match JsonParseNode::new(value).get_object_value(factory)? {
        Some(model) => Ok(model),
        None => Err(SerializationError::NotAnObject(json_kind(value))),
    }
}

/// Decodes a JSON document and recovers the concrete type `T`.
///
/// Fails with [`SerializationError::Downcast`] when the discriminator
/// selected a different type.
pub fn from_json_as<T: Parsable>(input: &str, factory: ParsableFactory) -> Result<T> {
    downcast(from_json_str(input, factory)?)
}

/// Encodes a model to a JSON value.
pub fn to_json_value(model: &dyn Parsable) -> Result<Value> {
    let mut writer = JsonSerializationWriter::new();
    writer.write_object_value(None, Some(model))?;
    Ok(writer.into_value())
}

/// Encodes only the properties changed since the model was decoded, with
/// cleared properties as explicit `null`s. Suitable as a PATCH body.
///
/// Of the additional data, only keys edited after decoding are written;
/// edited keys that were removed are written as `null`.
pub fn to_changes_value(model: &mut dyn Parsable) -> Result<Value> {
    let edits = edited_additional_keys(model.backing_store_mut());
    let untouched: Vec<String> = model
        .additional_data()
        .map(|data| data.keys().filter(|k| !edits.contains(k)).cloned().collect())
        .unwrap_or_default();

    let store = model.backing_store_mut();
    let previous = store.return_only_changed_values();
    store.set_return_only_changed_values(true);
    let encoded = to_json_value(model);
    model
        .backing_store_mut()
        .set_return_only_changed_values(previous);

    let mut encoded = encoded?;
    if let Value::Object(map) = &mut encoded {
        for key in &untouched {
            map.remove(key);
        }
        for key in edits {
            map.entry(key).or_insert(Value::Null);
        }
    }
    Ok(encoded)
}

/// Encodes a model to a JSON string.
pub fn to_json_string(model: &dyn Parsable, pretty: bool) -> Result<String> {
    let value = to_json_value(model)?;
    Ok(if pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Note;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn decodes_known_fields_and_keeps_the_rest() {
        let model = from_json_str(
            r#"{"title":"Standup","tags":["daily"],"color":"blue"}"#,
            Note::create,
        )
        .unwrap();
        let note = model.downcast_ref::<Note>().unwrap();
        assert_eq!(note.title(), Some("Standup"));
        assert_eq!(note.tags(), Some(vec!["daily".to_string()]));
        assert_eq!(
            note.additional_data().and_then(|d| d.get("color")),
            Some(&json!("blue"))
        );
    }

    #[test]
    fn encodes_back_to_the_same_document() {
        let input = json!({"title":"Standup","pinned":true,"color":"blue"});
        let model = from_json_value(&input, Note::create).unwrap();
        assert_eq!(to_json_value(model.as_ref()).unwrap(), input);
    }

    #[test]
    fn scalar_documents_are_rejected() {
        let err = from_json_str("[1,2]", Note::create).unwrap_err();
        assert!(matches!(err, SerializationError::NotAnObject("array")));
        let err = from_json_str("null", Note::create).unwrap_err();
        assert!(matches!(err, SerializationError::NotAnObject("null")));
    }

    #[test]
    fn field_errors_carry_the_wire_name() {
        let err = from_json_str(r#"{"pinned":"yes"}"#, Note::create).unwrap_err();
        assert_eq!(err.field_path(), "pinned");
    }

    #[test]
    fn typed_decode() {
        let note: Note = from_json_as(r#"{"title":"x"}"#, Note::create).unwrap();
        assert_eq!(note.title(), Some("x"));
    }

    #[test]
    fn changes_only_include_edits_and_clears() {
        let mut model = from_json_str(
            r#"{"title":"Standup","pinned":true,"color":"blue"}"#,
            Note::create,
        )
        .unwrap();
        assert_eq!(to_changes_value(model.as_mut()).unwrap(), json!({}));

        let note = model.downcast_mut::<Note>().unwrap();
        note.set_title(Some("Retro".into()));
        note.set_pinned(None);
        assert_eq!(
            to_changes_value(model.as_mut()).unwrap(),
            json!({"title": "Retro", "pinned": null})
        );
        assert!(!model.backing_store().return_only_changed_values());
        assert_eq!(
            to_json_value(model.as_ref()).unwrap(),
            json!({"title": "Retro", "color": "blue"})
        );
    }

    #[test]
    fn changes_hold_only_edited_additional_keys() {
        let mut model = from_json_str(
            r#"{"@odata.context":"https://example.test/$metadata","color":"blue","mood":"calm"}"#,
            Note::create,
        )
        .unwrap();
        let mut data = model.additional_data().cloned().unwrap();
        data.insert("color".into(), json!("red"));
        data.remove("mood");
        model.set_additional_data(data);

        assert_eq!(
            to_changes_value(model.as_mut()).unwrap(),
            json!({"color": "red", "mood": null})
        );
        assert_eq!(
            to_json_value(model.as_ref()).unwrap(),
            json!({"@odata.context": "https://example.test/$metadata", "color": "red"})
        );
    }

    #[test]
    fn pretty_output_is_indented() {
        let mut note = Note::new();
        note.set_title(Some("x".into()));
        let text = to_json_string(&note, true).unwrap();
        assert!(text.contains("\n  \"title\": \"x\""));
    }
}
