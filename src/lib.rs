//! gobj - tooling for declarative game object files
//!
//! Game objects are plain-text assets: an ordered list of component
//! declarations, each referencing an external asset or embedding its
//! configuration inline, with a position and rotation relative to the
//! object. The engine reads them wholesale at scene load; this crate reads,
//! checks, and writes them so tools can too.
//!
//! Three layers, lowest first:
//!
//! - [`format`]: the text format itself, schema-free. Parse any well-formed
//!   file into a [`format::Document`], write it back canonically.
//! - [`object`]: the typed model. [`object::GameObject`] and friends, with
//!   strict conversion from and to documents, file load/save, and an
//!   [`object::ObjectLibrary`] over a whole project tree.
//! - [`validate`]: invariant checks a tool can run before the engine ever
//!   sees the file (duplicate ids, malformed paths, drifted quaternions,
//!   unresolvable references).

pub mod format;
pub mod math;
pub mod object;
pub mod validate;

pub use math::{Quat, Vec3};
pub use object::{
    ComponentRef, EmbeddedComponent, GameObject, ObjectComponent, ObjectError, ObjectLibrary,
    Transform,
};
pub use validate::{Severity, ValidationReport, Validator};
