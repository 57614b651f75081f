//! Component declarations
//!
//! The two declaration kinds a game object is built from. Referenced
//! components point at an asset file elsewhere in the project; embedded
//! components inline their configuration as an opaque text blob. Both carry
//! a spatial transform relative to the owning object.
//!
//! Conversion to and from [`Document`] is strict: unknown fields are
//! rejected rather than dropped, so typos surface instead of silently
//! vanishing on the next write.

use serde::{Deserialize, Serialize};

use crate::format::{parse_document, write_document, Document, ParseError, Value};
use crate::math::{Quat, Vec3};

use super::object::ObjectError;

/// Position and orientation relative to the parent object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Transform {
    /// Origin, no rotation
    pub const IDENTITY: Transform = Transform {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A component declaration, either kind
///
/// One object holds both kinds in a single ordered list, so the file order
/// of declarations survives a load/save pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObjectComponent {
    /// References a component asset elsewhere in the project
    Referenced(ComponentRef),
    /// Carries its configuration inline
    Embedded(EmbeddedComponent),
}

impl ObjectComponent {
    /// The component's id, unique within the owning object
    pub fn id(&self) -> &str {
        match self {
            ObjectComponent::Referenced(c) => &c.id,
            ObjectComponent::Embedded(c) => &c.id,
        }
    }

    pub fn transform(&self) -> &Transform {
        match self {
            ObjectComponent::Referenced(c) => &c.transform,
            ObjectComponent::Embedded(c) => &c.transform,
        }
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        match self {
            ObjectComponent::Referenced(c) => &mut c.transform,
            ObjectComponent::Embedded(c) => &mut c.transform,
        }
    }

    /// Human-readable declaration kind, for messages and listings
    pub fn kind_name(&self) -> &'static str {
        match self {
            ObjectComponent::Referenced(_) => "referenced",
            ObjectComponent::Embedded(_) => "embedded",
        }
    }

    pub fn is_embedded(&self) -> bool {
        matches!(self, ObjectComponent::Embedded(_))
    }

    pub fn as_referenced(&self) -> Option<&ComponentRef> {
        match self {
            ObjectComponent::Referenced(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_embedded(&self) -> Option<&EmbeddedComponent> {
        match self {
            ObjectComponent::Embedded(c) => Some(c),
            _ => None,
        }
    }
}

/// Component referencing an external asset file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentRef {
    /// Unique within the owning object
    pub id: String,
    /// Absolute project path of the referenced asset, e.g.
    /// `/gardens/lantern.script`
    pub component: String,
    pub transform: Transform,
}

impl ComponentRef {
    pub fn new(id: impl Into<String>, component: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            component: component.into(),
            transform: Transform::IDENTITY,
        }
    }

    pub(crate) fn from_document(doc: &Document, context: &str) -> Result<Self, ObjectError> {
        let mut fields = FieldReader::new(doc, context);
        let id = fields.take_str("id")?;
        let component = fields.take_str("component")?;
        let transform = fields.take_transform()?;
        fields.finish()?;
        Ok(Self {
            id: id.ok_or_else(|| ObjectError::missing(context, "id"))?,
            component: component.ok_or_else(|| ObjectError::missing(context, "component"))?,
            transform,
        })
    }

    pub(crate) fn to_document(&self) -> Document {
        let mut doc = Document::new();
        doc.push("id", Value::Str(self.id.clone()));
        doc.push("component", Value::Str(self.component.clone()));
        push_transform(&mut doc, &self.transform);
        doc
    }
}

/// Component with inline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedComponent {
    /// Unique within the owning object
    pub id: String,
    /// Built-in component kind tag, e.g. `sprite` (wire name `type`)
    #[serde(rename = "type")]
    pub kind: String,
    /// Opaque configuration text, itself nested key:value text
    pub data: String,
    pub transform: Transform,
}

impl EmbeddedComponent {
    pub fn new(id: impl Into<String>, kind: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            data: data.into(),
            transform: Transform::IDENTITY,
        }
    }

    /// Parse the `data` blob as nested key:value text
    pub fn data_document(&self) -> Result<Document, ParseError> {
        parse_document(&self.data)
    }

    /// Replace the `data` blob with the canonical rendering of a document
    pub fn set_data_document(&mut self, doc: &Document) {
        self.data = write_document(doc);
    }

    pub(crate) fn from_document(doc: &Document, context: &str) -> Result<Self, ObjectError> {
        let mut fields = FieldReader::new(doc, context);
        let id = fields.take_str("id")?;
        let kind = fields.take_str("type")?;
        let data = fields.take_str("data")?;
        let transform = fields.take_transform()?;
        fields.finish()?;
        Ok(Self {
            id: id.ok_or_else(|| ObjectError::missing(context, "id"))?,
            kind: kind.ok_or_else(|| ObjectError::missing(context, "type"))?,
            data: data.ok_or_else(|| ObjectError::missing(context, "data"))?,
            transform,
        })
    }

    pub(crate) fn to_document(&self) -> Document {
        let mut doc = Document::new();
        doc.push("id", Value::Str(self.id.clone()));
        doc.push("type", Value::Str(self.kind.clone()));
        doc.push("data", Value::Str(self.data.clone()));
        push_transform(&mut doc, &self.transform);
        doc
    }
}

/// Strict single-pass reader over a component block's fields
struct FieldReader<'a> {
    doc: &'a Document,
    context: &'a str,
    taken: Vec<&'static str>,
}

impl<'a> FieldReader<'a> {
    fn new(doc: &'a Document, context: &'a str) -> Self {
        Self {
            doc,
            context,
            taken: Vec::new(),
        }
    }

    fn path(&self, name: &str) -> String {
        format!("{}.{}", self.context, name)
    }

    fn take(&mut self, name: &'static str) -> Result<Option<&'a Value>, ObjectError> {
        self.taken.push(name);
        let mut found = None;
        for value in self.doc.get_all(name) {
            if found.is_some() {
                return Err(ObjectError::DuplicateField {
                    field: self.path(name),
                });
            }
            found = Some(value);
        }
        Ok(found)
    }

    fn take_str(&mut self, name: &'static str) -> Result<Option<String>, ObjectError> {
        match self.take(name)? {
            None => Ok(None),
            Some(Value::Str(s)) => Ok(Some(s.clone())),
            Some(other) => Err(ObjectError::WrongKind {
                field: self.path(name),
                expected: "string",
                found: other.kind_name(),
            }),
        }
    }

    /// `position` and `rotation` blocks, with engine defaults when absent
    fn take_transform(&mut self) -> Result<Transform, ObjectError> {
        let position = match self.take("position")? {
            None => Vec3::ZERO,
            Some(value) => {
                let msg = self.expect_message("position", value)?;
                vec3_from_document(msg, &self.path("position"))?
            }
        };
        let rotation = match self.take("rotation")? {
            None => Quat::IDENTITY,
            Some(value) => {
                let msg = self.expect_message("rotation", value)?;
                quat_from_document(msg, &self.path("rotation"))?
            }
        };
        Ok(Transform { position, rotation })
    }

    fn expect_message(
        &self,
        name: &str,
        value: &'a Value,
    ) -> Result<&'a Document, ObjectError> {
        value.as_message().ok_or_else(|| ObjectError::WrongKind {
            field: self.path(name),
            expected: "message",
            found: value.kind_name(),
        })
    }

    /// Reject any field not taken above
    fn finish(self) -> Result<(), ObjectError> {
        for field in self.doc.iter() {
            if !self.taken.contains(&field.name.as_str()) {
                return Err(ObjectError::UnexpectedField {
                    field: self.path(&field.name),
                });
            }
        }
        Ok(())
    }
}

fn scalar_f32(doc: &Document, context: &str, name: &str, default: f32) -> Result<f32, ObjectError> {
    match doc.get(name) {
        None => Ok(default),
        Some(value) => value.as_f32().ok_or_else(|| ObjectError::WrongKind {
            field: format!("{}.{}", context, name),
            expected: "number",
            found: value.kind_name(),
        }),
    }
}

fn check_members(doc: &Document, context: &str, allowed: &[&str]) -> Result<(), ObjectError> {
    for field in doc.iter() {
        if !allowed.contains(&field.name.as_str()) {
            return Err(ObjectError::UnexpectedField {
                field: format!("{}.{}", context, field.name),
            });
        }
    }
    Ok(())
}

fn vec3_from_document(doc: &Document, context: &str) -> Result<Vec3, ObjectError> {
    check_members(doc, context, &["x", "y", "z"])?;
    Ok(Vec3 {
        x: scalar_f32(doc, context, "x", 0.0)?,
        y: scalar_f32(doc, context, "y", 0.0)?,
        z: scalar_f32(doc, context, "z", 0.0)?,
    })
}

fn quat_from_document(doc: &Document, context: &str) -> Result<Quat, ObjectError> {
    check_members(doc, context, &["x", "y", "z", "w"])?;
    Ok(Quat {
        x: scalar_f32(doc, context, "x", 0.0)?,
        y: scalar_f32(doc, context, "y", 0.0)?,
        z: scalar_f32(doc, context, "z", 0.0)?,
        // A sparse rotation stays a rotation: w defaults to 1, not 0
        w: scalar_f32(doc, context, "w", 1.0)?,
    })
}

fn push_transform(doc: &mut Document, transform: &Transform) {
    let mut position = Document::new();
    position.push("x", Value::Float(widen(transform.position.x)));
    position.push("y", Value::Float(widen(transform.position.y)));
    position.push("z", Value::Float(widen(transform.position.z)));
    doc.push("position", Value::Message(position));

    let mut rotation = Document::new();
    rotation.push("x", Value::Float(widen(transform.rotation.x)));
    rotation.push("y", Value::Float(widen(transform.rotation.y)));
    rotation.push("z", Value::Float(widen(transform.rotation.z)));
    rotation.push("w", Value::Float(widen(transform.rotation.w)));
    doc.push("rotation", Value::Message(rotation));
}

/// Widen f32 to f64 through its shortest decimal form. A plain `as f64`
/// cast would turn `0.1` into `0.10000000149011612` on the next write.
fn widen(v: f32) -> f64 {
    if !v.is_finite() {
        return v as f64;
    }
    format!("{}", v).parse().unwrap_or(v as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ref_doc(src: &str) -> Result<ComponentRef, ObjectError> {
        let doc = parse_document(src).unwrap();
        ComponentRef::from_document(&doc, "components[0]")
    }

    #[test]
    fn test_referenced_round_trip() {
        let mut c = ComponentRef::new("glow", "/gardens/fx/firefly.particlefx");
        c.transform.position = Vec3::new(0.0, 12.5, 0.0);
        let back = ComponentRef::from_document(&c.to_document(), "components[0]").unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn test_embedded_round_trip() {
        let mut c = EmbeddedComponent::new("body", "sprite", "tile_set: \"/a.atlas\"\n");
        c.transform.rotation = Quat::new(0.0, 0.0, 0.38268343, 0.92387953);
        let back =
            EmbeddedComponent::from_document(&c.to_document(), "embedded_components[0]").unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn test_decimal_stability_through_f32() {
        // 0.1 must come back out as the text "0.1", not the widened f64
        let mut c = ComponentRef::new("glow", "/a.particlefx");
        c.transform.position.z = 0.1;
        let text = write_document(&c.to_document());
        assert!(text.contains("z: 0.1\n"), "got:\n{}", text);
    }

    #[test]
    fn test_missing_transform_defaults() {
        let c = ref_doc("id: \"glow\"\ncomponent: \"/a.particlefx\"\n").unwrap();
        assert_eq!(c.transform, Transform::IDENTITY);
    }

    #[test]
    fn test_sparse_rotation_defaults_to_identity_w() {
        let c = ref_doc(
            "id: \"glow\"\ncomponent: \"/a.particlefx\"\nrotation {\n  x: 0.0\n}\n",
        )
        .unwrap();
        assert_eq!(c.transform.rotation, Quat::IDENTITY);
    }

    #[test]
    fn test_missing_required_field() {
        let err = ref_doc("component: \"/a.particlefx\"\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing field 'components[0].id'"
        );
    }

    #[test]
    fn test_unexpected_field() {
        let err = ref_doc(
            "id: \"glow\"\ncomponent: \"/a.particlefx\"\nvolume: 1.0\n",
        )
        .unwrap_err();
        assert!(matches!(err, ObjectError::UnexpectedField { ref field } if field == "components[0].volume"));
    }

    #[test]
    fn test_unexpected_transform_member() {
        let err = ref_doc(
            "id: \"glow\"\ncomponent: \"/a.particlefx\"\nposition {\n  w: 1.0\n}\n",
        )
        .unwrap_err();
        assert!(matches!(err, ObjectError::UnexpectedField { ref field } if field == "components[0].position.w"));
    }

    #[test]
    fn test_wrong_kind() {
        let err = ref_doc("id: 7\ncomponent: \"/a.particlefx\"\n").unwrap_err();
        match err {
            ObjectError::WrongKind {
                field,
                expected,
                found,
            } => {
                assert_eq!(field, "components[0].id");
                assert_eq!(expected, "string");
                assert_eq!(found, "integer");
            }
            e => panic!("unexpected error {:?}", e),
        }
    }

    #[test]
    fn test_duplicate_field() {
        let err = ref_doc("id: \"a\"\nid: \"b\"\ncomponent: \"/a.particlefx\"\n").unwrap_err();
        assert!(matches!(err, ObjectError::DuplicateField { ref field } if field == "components[0].id"));
    }

    #[test]
    fn test_data_document_round_trip() {
        let mut c = EmbeddedComponent::new("body", "sprite", "");
        let mut doc = Document::new();
        doc.push("tile_set", Value::Str("/gardens/atlas/props.atlas".to_string()));
        doc.push("blend_mode", Value::Enum("BLEND_MODE_ADD".to_string()));
        c.set_data_document(&doc);
        assert_eq!(
            c.data,
            "tile_set: \"/gardens/atlas/props.atlas\"\nblend_mode: BLEND_MODE_ADD\n"
        );
        assert_eq!(c.data_document().unwrap(), doc);
    }

    #[test]
    fn test_int_scalars_accepted_in_transforms() {
        // Hand-edited files sometimes write "1" for "1.0"
        let c = ref_doc(
            "id: \"glow\"\ncomponent: \"/a.particlefx\"\nposition {\n  x: 1\n  y: 2\n}\n",
        )
        .unwrap();
        assert_eq!(c.transform.position, Vec3::new(1.0, 2.0, 0.0));
    }
}
