//! JavaScript literal writer - the single serialization boundary.
//!
//! Payload types are plain data with `serde::Serialize` derives; this module
//! turns them into the object-literal text the analytics library consumes.
//! Keys that are valid JS identifiers are written bare (`{order_id: "1001"}`),
//! matching the wire format the backend has always parsed. Click-time
//! expressions are a distinct variant and render verbatim - they are
//! integration-owned code, never user data.

use serde::Serialize;

use crate::escape;

/// A JavaScript value to be rendered into emitted script text.
#[derive(Debug, Clone, PartialEq)]
pub enum JsValue {
    /// `null`.
    Null,
    /// A boolean literal.
    Bool(bool),
    /// A numeric literal, kept as its decimal text.
    Number(String),
    /// A string literal; escaped for script context when rendered.
    Str(String),
    /// A raw expression evaluated at click time in the browser. Rendered
    /// verbatim - must never carry user-controlled text.
    Expr(String),
    /// An array literal.
    Array(Vec<JsValue>),
    /// An object literal with insertion-ordered fields.
    Object(Vec<(String, JsValue)>),
}

impl JsValue {
    /// Convert any serializable payload into a [`JsValue`] tree.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error when the payload cannot be
    /// serialized (non-string map keys and the like).
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        Ok(Self::from_json(serde_json::to_value(value)?))
    }

    fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n.to_string()),
            serde_json::Value::String(s) => Self::Str(s),
            serde_json::Value::Array(items) => {
                Self::Array(items.into_iter().map(Self::from_json).collect())
            }
            serde_json::Value::Object(fields) => Self::Object(
                fields
                    .into_iter()
                    .map(|(key, value)| (key, Self::from_json(value)))
                    .collect(),
            ),
        }
    }

    /// Render to JavaScript literal text.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.write(&mut out);
        out
    }

    fn write(&self, out: &mut String) {
        match self {
            Self::Null => out.push_str("null"),
            Self::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            Self::Number(n) | Self::Expr(n) => out.push_str(n),
            Self::Str(s) => {
                out.push('"');
                out.push_str(&escape::js_string(s));
                out.push('"');
            }
            Self::Array(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    item.write(out);
                }
                out.push(']');
            }
            Self::Object(fields) => {
                out.push('{');
                for (i, (key, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    if is_identifier(key) {
                        out.push_str(key);
                    } else {
                        out.push('"');
                        out.push_str(&escape::js_string(key));
                        out.push('"');
                    }
                    out.push_str(": ");
                    value.write(out);
                }
                out.push('}');
            }
        }
    }
}

/// Whether a key can be written bare in an object literal.
fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[test]
    fn test_object_renders_bare_identifier_keys() {
        let value = JsValue::Object(vec![
            ("username".to_string(), JsValue::Str("alice".to_string())),
            ("email".to_string(), JsValue::Str("a@x.com".to_string())),
        ]);
        assert_eq!(value.render(), r#"{username: "alice", email: "a@x.com"}"#);
    }

    #[test]
    fn test_object_quotes_non_identifier_keys() {
        let value = JsValue::Object(vec![(
            "data-product_sku".to_string(),
            JsValue::Str("x".to_string()),
        )]);
        assert_eq!(value.render(), r#"{"data-product_sku": "x"}"#);
    }

    #[test]
    fn test_expr_renders_verbatim() {
        let value = JsValue::Object(vec![(
            "id".to_string(),
            JsValue::Expr("button.dataset.product_id".to_string()),
        )]);
        assert_eq!(value.render(), "{id: button.dataset.product_id}");
    }

    #[test]
    fn test_str_values_are_escaped() {
        let value = JsValue::Str("</script>".to_string());
        assert_eq!(value.render(), "\"\\u003C/script\\u003E\"");
    }

    #[test]
    fn test_from_serialize_preserves_field_order() {
        #[derive(Serialize)]
        struct Payload {
            order_id: String,
            total: String,
            items: String,
        }
        let payload = Payload {
            order_id: "1001".to_string(),
            total: "29.00".to_string(),
            items: "3".to_string(),
        };
        let rendered = JsValue::from_serialize(&payload).unwrap().render();
        assert_eq!(
            rendered,
            r#"{order_id: "1001", total: "29.00", items: "3"}"#
        );
    }

    #[test]
    fn test_array_of_objects() {
        let value = JsValue::Array(vec![
            JsValue::Object(vec![("id".to_string(), JsValue::Str("a".to_string()))]),
            JsValue::Object(vec![("id".to_string(), JsValue::Str("b".to_string()))]),
        ]);
        assert_eq!(value.render(), r#"[{id: "a"}, {id: "b"}]"#);
    }
}
