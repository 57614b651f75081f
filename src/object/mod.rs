//! Typed game object layer
//!
//! A game object is an ordered list of component declarations, parsed from
//! and written to the schema-free [`format`](crate::format) layer. Unlike
//! that layer this one knows the schema: it enforces required fields,
//! rejects unknown ones, and exposes the declarations as real types.

mod component;
mod library;
mod object;
mod sprite;

pub use component::{ComponentRef, EmbeddedComponent, ObjectComponent, Transform};
pub use library::ObjectLibrary;
pub use object::{GameObject, ObjectError, OBJECT_EXTENSION};
pub use sprite::{BlendMode, SpriteDesc};
