//! Typed view of sprite component data
//!
//! Embedded components carry their configuration as an opaque text blob;
//! for sprites that blob is well known, so this module gives it a real
//! type. Other component kinds stay opaque strings.

use serde::{Deserialize, Serialize};

use crate::format::{parse_document, Document, Value};

use super::component::EmbeddedComponent;
use super::object::ObjectError;

/// How a sprite is composited over what is behind it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlendMode {
    #[default]
    Alpha,
    Add,
    Multiply,
    Screen,
}

impl BlendMode {
    /// Wire token, e.g. `BLEND_MODE_ALPHA`
    pub fn token(self) -> &'static str {
        match self {
            BlendMode::Alpha => "BLEND_MODE_ALPHA",
            BlendMode::Add => "BLEND_MODE_ADD",
            BlendMode::Multiply => "BLEND_MODE_MULT",
            BlendMode::Screen => "BLEND_MODE_SCREEN",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "BLEND_MODE_ALPHA" => Some(BlendMode::Alpha),
            "BLEND_MODE_ADD" => Some(BlendMode::Add),
            "BLEND_MODE_MULT" => Some(BlendMode::Multiply),
            "BLEND_MODE_SCREEN" => Some(BlendMode::Screen),
            _ => None,
        }
    }
}

/// Configuration carried by a sprite embedded component
///
/// Every field the engine defaults is optional here too: a sparse blob
/// fills in with empty strings and alpha blending.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpriteDesc {
    /// Atlas the sprite's animations come from
    pub tile_set: String,
    /// Animation played when the sprite spawns
    pub default_animation: String,
    /// Material asset used to render the sprite
    pub material: String,
    pub blend_mode: BlendMode,
}

impl SpriteDesc {
    /// Parse a sprite `data` blob
    pub fn from_data(data: &str) -> Result<Self, ObjectError> {
        let doc = parse_document(data)?;
        let mut sprite = SpriteDesc::default();
        for field in doc.iter() {
            match field.name.as_str() {
                "tile_set" => sprite.tile_set = take_str(&field.value, "tile_set")?,
                "default_animation" => {
                    sprite.default_animation = take_str(&field.value, "default_animation")?
                }
                "material" => sprite.material = take_str(&field.value, "material")?,
                "blend_mode" => {
                    let token = field.value.as_enum().ok_or(ObjectError::WrongKind {
                        field: "blend_mode".to_string(),
                        expected: "enum",
                        found: field.value.kind_name(),
                    })?;
                    sprite.blend_mode =
                        BlendMode::from_token(token).ok_or_else(|| ObjectError::WrongKind {
                            field: "blend_mode".to_string(),
                            expected: "a blend mode token",
                            found: "enum",
                        })?;
                }
                other => {
                    return Err(ObjectError::UnexpectedField {
                        field: other.to_string(),
                    })
                }
            }
        }
        Ok(sprite)
    }

    /// Typed view of an embedded component, if it is a sprite
    pub fn from_embedded(component: &EmbeddedComponent) -> Option<Result<Self, ObjectError>> {
        if component.kind != "sprite" {
            return None;
        }
        Some(Self::from_data(&component.data))
    }

    /// Render back to `data` blob text in canonical form
    pub fn to_data(&self) -> String {
        let mut doc = Document::new();
        doc.push("tile_set", Value::Str(self.tile_set.clone()));
        doc.push("default_animation", Value::Str(self.default_animation.clone()));
        doc.push("material", Value::Str(self.material.clone()));
        doc.push("blend_mode", Value::Enum(self.blend_mode.token().to_string()));
        crate::format::write_document(&doc)
    }
}

fn take_str(value: &Value, name: &'static str) -> Result<String, ObjectError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or(ObjectError::WrongKind {
            field: name.to_string(),
            expected: "string",
            found: value.kind_name(),
        })
}
