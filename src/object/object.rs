//! Game object definition
//!
//! A game object is pure composition: an ordered list of component
//! declarations and nothing else. It has no name or id of its own, the
//! containing file is its identity, which is why [`GameObject`] is little
//! more than a `Vec` with a schema around it.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::format::{parse_document, write_document, Document, ParseError, Value};

use super::component::{ComponentRef, EmbeddedComponent, ObjectComponent};

/// File extension for game object files
pub const OBJECT_EXTENSION: &str = "go";

/// Error type for object operations
#[derive(Debug)]
pub enum ObjectError {
    /// File I/O error
    Io(String),
    /// Text format error with source position
    Parse(ParseError),
    /// Required field absent
    MissingField { field: String },
    /// Field the schema does not know
    UnexpectedField { field: String },
    /// Singular field written more than once
    DuplicateField { field: String },
    /// Field present with the wrong value kind
    WrongKind {
        field: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl ObjectError {
    pub(crate) fn missing(context: &str, name: &str) -> Self {
        ObjectError::MissingField {
            field: format!("{}.{}", context, name),
        }
    }
}

impl std::fmt::Display for ObjectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectError::Io(msg) => write!(f, "I/O error: {}", msg),
            ObjectError::Parse(e) => write!(f, "{}", e),
            ObjectError::MissingField { field } => write!(f, "missing field '{}'", field),
            ObjectError::UnexpectedField { field } => write!(f, "unexpected field '{}'", field),
            ObjectError::DuplicateField { field } => write!(f, "duplicate field '{}'", field),
            ObjectError::WrongKind {
                field,
                expected,
                found,
            } => write!(f, "field '{}': expected {}, found {}", field, expected, found),
        }
    }
}

impl std::error::Error for ObjectError {}

impl From<std::io::Error> for ObjectError {
    fn from(e: std::io::Error) -> Self {
        ObjectError::Io(e.to_string())
    }
}

impl From<ParseError> for ObjectError {
    fn from(e: ParseError) -> Self {
        ObjectError::Parse(e)
    }
}

/// A game object - pure composition of component declarations
///
/// Declarations keep the order they were written in, so a load/save pass
/// reproduces the file instead of reshuffling it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameObject {
    pub components: Vec<ObjectComponent>,
}

impl GameObject {
    /// Create an empty object with no components
    pub fn new() -> Self {
        Self {
            components: Vec::new(),
        }
    }

    /// Parse object text into a typed object
    pub fn from_text(src: &str) -> Result<Self, ObjectError> {
        Self::from_document(&parse_document(src)?)
    }

    /// Render the object as canonical text
    pub fn to_text(&self) -> String {
        write_document(&self.to_document())
    }

    /// Load an object from a file
    pub fn load(path: &Path) -> Result<Self, ObjectError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_text(&text)
    }

    /// Save the object to a file in canonical form
    pub fn save(&self, path: &Path) -> Result<(), ObjectError> {
        std::fs::write(path, self.to_text())?;
        Ok(())
    }

    /// Build the typed object from a parsed document
    ///
    /// Strict: every top-level field must be a `components` or
    /// `embedded_components` block, and every block must match its schema
    /// exactly.
    pub fn from_document(doc: &Document) -> Result<Self, ObjectError> {
        let mut components = Vec::new();
        let mut referenced_seen = 0;
        let mut embedded_seen = 0;
        for field in doc.iter() {
            match field.name.as_str() {
                "components" => {
                    let context = format!("components[{}]", referenced_seen);
                    referenced_seen += 1;
                    let inner = expect_block(&field.value, &context)?;
                    components.push(ObjectComponent::Referenced(ComponentRef::from_document(
                        inner, &context,
                    )?));
                }
                "embedded_components" => {
                    let context = format!("embedded_components[{}]", embedded_seen);
                    embedded_seen += 1;
                    let inner = expect_block(&field.value, &context)?;
                    components.push(ObjectComponent::Embedded(EmbeddedComponent::from_document(
                        inner, &context,
                    )?));
                }
                other => {
                    return Err(ObjectError::UnexpectedField {
                        field: other.to_string(),
                    })
                }
            }
        }
        Ok(Self { components })
    }

    /// Render the typed object into a document
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        for component in &self.components {
            match component {
                ObjectComponent::Referenced(c) => {
                    doc.push("components", Value::Message(c.to_document()));
                }
                ObjectComponent::Embedded(c) => {
                    doc.push("embedded_components", Value::Message(c.to_document()));
                }
            }
        }
        doc
    }

    /// Append a component declaration
    pub fn add_component(&mut self, component: ObjectComponent) {
        self.components.push(component);
    }

    /// Remove a component by id
    pub fn remove_component(&mut self, id: &str) -> Option<ObjectComponent> {
        let index = self.components.iter().position(|c| c.id() == id)?;
        Some(self.components.remove(index))
    }

    /// Get a component by id
    pub fn component(&self, id: &str) -> Option<&ObjectComponent> {
        self.components.iter().find(|c| c.id() == id)
    }

    /// Get a mutable reference to a component by id
    pub fn component_mut(&mut self, id: &str) -> Option<&mut ObjectComponent> {
        self.components.iter_mut().find(|c| c.id() == id)
    }

    /// Check if a component with the given id exists
    pub fn has_component(&self, id: &str) -> bool {
        self.components.iter().any(|c| c.id() == id)
    }

    /// All referenced components, in declaration order
    pub fn referenced(&self) -> impl Iterator<Item = &ComponentRef> {
        self.components.iter().filter_map(|c| c.as_referenced())
    }

    /// All embedded components, in declaration order
    pub fn embedded(&self) -> impl Iterator<Item = &EmbeddedComponent> {
        self.components.iter().filter_map(|c| c.as_embedded())
    }

    /// Generate an id not yet used in this object
    ///
    /// Returns `base` itself when free, otherwise `base1`, `base2`, ...
    pub fn unique_id(&self, base: &str) -> String {
        if !self.has_component(base) {
            return base.to_string();
        }
        let mut n = 1;
        loop {
            let candidate = format!("{}{}", base, n);
            if !self.has_component(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}

fn expect_block<'a>(value: &'a Value, context: &str) -> Result<&'a Document, ObjectError> {
    value.as_message().ok_or_else(|| ObjectError::WrongKind {
        field: context.to_string(),
        expected: "message",
        found: value.kind_name(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;

    /// Canonical object file, as the engine itself writes one
    const FIREFLY_GARDEN: &str = "\
components {
  id: \"glow\"
  component: \"/gardens/fx/firefly.particlefx\"
  position {
    x: 0.0
    y: 0.0
    z: 0.0
  }
  rotation {
    x: 0.0
    y: 0.0
    z: 0.0
    w: 1.0
  }
}
components {
  id: \"script\"
  component: \"/gardens/lantern.script\"
  position {
    x: 0.0
    y: 0.0
    z: 0.0
  }
  rotation {
    x: 0.0
    y: 0.0
    z: 0.0
    w: 1.0
  }
}
embedded_components {
  id: \"sprite\"
  type: \"sprite\"
  data: \"tile_set: \\\"/gardens/atlas/props.atlas\\\"\\n\"
  \"default_animation: \\\"lantern-lit\\\"\\n\"
  \"material: \\\"/builtins/materials/sprite.material\\\"\\n\"
  \"blend_mode: BLEND_MODE_ALPHA\\n\"
  \"\"
  position {
    x: 0.0
    y: 0.0
    z: 0.0
  }
  rotation {
    x: 0.0
    y: 0.0
    z: 0.0
    w: 1.0
  }
}
embedded_components {
  id: \"sprite-halo\"
  type: \"sprite\"
  data: \"tile_set: \\\"/gardens/atlas/props.atlas\\\"\\n\"
  \"default_animation: \\\"halo\\\"\\n\"
  \"material: \\\"/builtins/materials/sprite.material\\\"\\n\"
  \"blend_mode: BLEND_MODE_ADD\\n\"
  \"\"
  position {
    x: 0.0
    y: 0.0
    z: 0.1
  }
  rotation {
    x: 0.0
    y: 0.0
    z: 0.0
    w: 1.0
  }
}
";

    #[test]
    fn test_full_file_round_trip() {
        let obj = GameObject::from_text(FIREFLY_GARDEN).unwrap();
        assert_eq!(obj.components.len(), 4);
        assert_eq!(obj.referenced().count(), 2);
        assert_eq!(obj.embedded().count(), 2);
        // Canonical in, byte-identical out
        assert_eq!(obj.to_text(), FIREFLY_GARDEN);
    }

    #[test]
    fn test_typed_content() {
        let obj = GameObject::from_text(FIREFLY_GARDEN).unwrap();

        let glow = obj.component("glow").and_then(|c| c.as_referenced()).unwrap();
        assert_eq!(glow.component, "/gardens/fx/firefly.particlefx");
        assert_eq!(glow.transform.position, Vec3::ZERO);

        let halo = obj
            .component("sprite-halo")
            .and_then(|c| c.as_embedded())
            .unwrap();
        assert_eq!(halo.kind, "sprite");
        assert_eq!(halo.transform.position.z, 0.1);
        assert!(halo.data.contains("BLEND_MODE_ADD"));
    }

    #[test]
    fn test_declaration_order_survives_interleaving() {
        let src = "\
embedded_components {
  id: \"a\"
  type: \"sprite\"
  data: \"\"
}
components {
  id: \"b\"
  component: \"/x.script\"
}
embedded_components {
  id: \"c\"
  type: \"label\"
  data: \"\"
}
";
        let obj = GameObject::from_text(src).unwrap();
        let ids: Vec<_> = obj.components.iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        // The writer groups nothing: interleaved declarations stay interleaved
        let back = GameObject::from_text(&obj.to_text()).unwrap();
        assert_eq!(back, obj);
        assert!(obj.to_text().starts_with("embedded_components {"));
    }

    #[test]
    fn test_empty_object() {
        let obj = GameObject::from_text("").unwrap();
        assert!(obj.components.is_empty());
        assert_eq!(obj.to_text(), "");
    }

    #[test]
    fn test_unknown_top_level_field() {
        let err = GameObject::from_text("scale: 2.0\n").unwrap_err();
        assert!(matches!(err, ObjectError::UnexpectedField { ref field } if field == "scale"));
    }

    #[test]
    fn test_scalar_where_block_expected() {
        let err = GameObject::from_text("components: \"oops\"\n").unwrap_err();
        match err {
            ObjectError::WrongKind { field, found, .. } => {
                assert_eq!(field, "components[0]");
                assert_eq!(found, "string");
            }
            e => panic!("unexpected error {:?}", e),
        }
    }

    #[test]
    fn test_error_context_counts_per_kind() {
        // The broken block is the second embedded_components, not the third
        // block overall
        let src = "\
components {
  id: \"a\"
  component: \"/x.script\"
}
embedded_components {
  id: \"b\"
  type: \"sprite\"
  data: \"\"
}
embedded_components {
  id: \"c\"
  type: \"sprite\"
}
";
        let err = GameObject::from_text(src).unwrap_err();
        assert_eq!(err.to_string(), "missing field 'embedded_components[1].data'");
    }

    #[test]
    fn test_add_remove_and_lookup() {
        let mut obj = GameObject::new();
        obj.add_component(ObjectComponent::Referenced(ComponentRef::new(
            "glow",
            "/gardens/fx/firefly.particlefx",
        )));
        obj.add_component(ObjectComponent::Embedded(EmbeddedComponent::new(
            "sprite", "sprite", "",
        )));

        assert!(obj.has_component("glow"));
        assert_eq!(obj.component("sprite").map(|c| c.kind_name()), Some("embedded"));

        let removed = obj.remove_component("glow").unwrap();
        assert_eq!(removed.id(), "glow");
        assert!(!obj.has_component("glow"));
        assert!(obj.remove_component("glow").is_none());
    }

    #[test]
    fn test_unique_id() {
        let mut obj = GameObject::new();
        assert_eq!(obj.unique_id("sprite"), "sprite");
        obj.add_component(ObjectComponent::Embedded(EmbeddedComponent::new(
            "sprite", "sprite", "",
        )));
        assert_eq!(obj.unique_id("sprite"), "sprite1");
        obj.add_component(ObjectComponent::Embedded(EmbeddedComponent::new(
            "sprite1", "sprite", "",
        )));
        assert_eq!(obj.unique_id("sprite"), "sprite2");
    }

    #[test]
    fn test_load_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lantern.go");
        let obj = GameObject::from_text(FIREFLY_GARDEN).unwrap();
        obj.save(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), FIREFLY_GARDEN);
        let back = GameObject::load(&path).unwrap();
        assert_eq!(back, obj);
    }

    #[test]
    fn test_load_missing_file() {
        let err = GameObject::load(Path::new("/no/such/file.go")).unwrap_err();
        assert!(matches!(err, ObjectError::Io(_)));
    }
}
