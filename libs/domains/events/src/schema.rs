//! Declarative event-document schema.
//!
//! Incoming creation payloads are checked against this schema before
//! they are deserialized into typed models. Running the whole document
//! through the schema first means a client gets every violation back in
//! one response instead of only the first field serde happens to reject.
//!
//! The schema is closed: properties it does not declare are violations.

use chrono::DateTime;
use serde_json::Value;

pub struct Schema {
    fields: &'static [Field],
}

pub struct Field {
    name: &'static str,
    required: bool,
    kind: FieldKind,
}

enum FieldKind {
    /// RFC 3339 date-time string.
    DateTime,
    /// JSON string, optionally required to be non-blank.
    Text { non_empty: bool },
    /// Nested object validated against its own schema.
    Object(&'static Schema),
}

static DETAILS_SCHEMA: Schema = Schema {
    fields: &[
        Field {
            name: "name",
            required: true,
            kind: FieldKind::Text { non_empty: false },
        },
        Field {
            name: "description",
            required: false,
            kind: FieldKind::Text { non_empty: false },
        },
    ],
};

static CREATOR_SCHEMA: Schema = Schema {
    fields: &[
        Field {
            name: "name",
            required: true,
            kind: FieldKind::Text { non_empty: false },
        },
        Field {
            name: "email",
            required: false,
            kind: FieldKind::Text { non_empty: false },
        },
    ],
};

/// Schema for the event creation payload.
pub static EVENT_SCHEMA: Schema = Schema {
    fields: &[
        Field {
            name: "start_date",
            required: true,
            kind: FieldKind::DateTime,
        },
        Field {
            name: "end_date",
            required: false,
            kind: FieldKind::DateTime,
        },
        Field {
            name: "type",
            required: true,
            kind: FieldKind::Text { non_empty: true },
        },
        Field {
            name: "details",
            required: false,
            kind: FieldKind::Object(&DETAILS_SCHEMA),
        },
        Field {
            name: "creator",
            required: false,
            kind: FieldKind::Object(&CREATOR_SCHEMA),
        },
    ],
};

impl Schema {
    /// Validates a JSON document, returning every violation found. An
    /// empty vector means the document conforms.
    pub fn validate(&self, document: &Value) -> Vec<String> {
        let mut violations = Vec::new();
        match document.as_object() {
            Some(object) => self.check_object(object, "", &mut violations),
            None => violations.push("document must be a JSON object".to_string()),
        }
        violations
    }

    fn check_object(
        &self,
        object: &serde_json::Map<String, Value>,
        path: &str,
        out: &mut Vec<String>,
    ) {
        for field in self.fields {
            let field_path = qualify(path, field.name);
            match object.get(field.name) {
                // JSON null counts as absent.
                None | Some(Value::Null) => {
                    if field.required {
                        out.push(format!("{field_path}: required property is missing"));
                    }
                }
                Some(value) => field.kind.check(value, &field_path, out),
            }
        }

        for name in object.keys() {
            if !self.fields.iter().any(|field| field.name == name) {
                out.push(format!("{}: property is not allowed", qualify(path, name)));
            }
        }
    }
}

impl FieldKind {
    fn check(&self, value: &Value, path: &str, out: &mut Vec<String>) {
        match self {
            FieldKind::DateTime => match value.as_str() {
                Some(raw) if DateTime::parse_from_rfc3339(raw).is_ok() => {}
                Some(_) => out.push(format!("{path}: expected an ISO-8601 date-time string")),
                None => out.push(format!("{path}: expected a string")),
            },
            FieldKind::Text { non_empty } => match value.as_str() {
                Some(raw) => {
                    if *non_empty && raw.trim().is_empty() {
                        out.push(format!("{path}: must not be blank"));
                    }
                }
                None => out.push(format!("{path}: expected a string")),
            },
            FieldKind::Object(schema) => match value.as_object() {
                Some(object) => schema.check_object(object, path, out),
                None => out.push(format!("{path}: expected an object")),
            },
        }
    }
}

fn qualify(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}.{name}")
    }
}
