//! Parsed document tree
//!
//! A [`Document`] is an ordered list of fields. Field names repeat freely
//! (that is how an object lists several `components` blocks) and order is
//! preserved exactly as written, so a parse/write pass never reshuffles a
//! file.

/// Ordered list of fields, the content of a file or of one `{ ... }` block
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub fields: Vec<Field>,
}

/// One `name: value` or `name { ... }` entry
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub value: Value,
}

/// A field value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Bare identifier, e.g. `BLEND_MODE_ALPHA`
    Enum(String),
    /// Nested `{ ... }` block
    Message(Document),
}

impl Document {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Append a field
    pub fn push(&mut self, name: impl Into<String>, value: Value) {
        self.fields.push(Field {
            name: name.into(),
            value,
        });
    }

    /// First value with the given name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| &f.value)
    }

    /// All values with the given name, in file order
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Value> {
        self.fields
            .iter()
            .filter(move |f| f.name == name)
            .map(|f| &f.value)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }
}

impl Value {
    /// Short kind name for error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Str(_) => "string",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Bool(_) => "boolean",
            Value::Enum(_) => "enum",
            Value::Message(_) => "message",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric value narrowed to f32, accepting both int and float literals
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Value::Int(n) => Some(*n as f32),
            Value::Float(v) => Some(*v as f32),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&str> {
        match self {
            Value::Enum(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_message(&self) -> Option<&Document> {
        match self {
            Value::Message(d) => Some(d),
            _ => None,
        }
    }
}
