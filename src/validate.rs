//! Object validation
//!
//! The engine's loader is the final authority on these files; this checks
//! everything a tool can check before the engine ever sees them. Findings
//! that would break loading are errors, findings the engine tolerates or
//! that depend on engine state are warnings. Strict mode promotes warnings
//! to errors.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::format::parse_document;
use crate::object::{GameObject, Transform};

/// How bad a finding is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

/// One validation finding
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub severity: Severity,
    /// Component id the finding belongs to, empty for object-level findings
    pub context: String,
    pub message: String,
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        if self.context.is_empty() {
            write!(f, "{}: {}", label, self.message)
        } else {
            write!(f, "{}: [{}] {}", label, self.context, self.message)
        }
    }
}

/// All findings for one object, in component order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Error)
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for issue in &self.issues {
            writeln!(f, "{}", issue)?;
        }
        Ok(())
    }
}

/// Checks a [`GameObject`] against the format's invariants
#[derive(Debug, Default)]
pub struct Validator {
    project_root: Option<PathBuf>,
    strict: bool,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check referenced component paths against a project tree on disk
    pub fn with_project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.project_root = Some(root.into());
        self
    }

    /// Promote warnings to errors
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn validate(&self, object: &GameObject) -> ValidationReport {
        let mut report = ValidationReport::default();

        let mut seen = HashSet::new();
        for component in &object.components {
            let id = component.id();
            self.check_id(&mut report, id);
            if !seen.insert(id) {
                self.push(&mut report, Severity::Error, id, "duplicate component id");
            }
            self.check_transform(&mut report, id, component.transform());
        }

        for reference in object.referenced() {
            self.check_reference(&mut report, &reference.id, &reference.component);
        }

        for embedded in object.embedded() {
            if embedded.kind.is_empty() {
                self.push(
                    &mut report,
                    Severity::Warning,
                    &embedded.id,
                    "embedded component has an empty type",
                );
            }
            if let Err(e) = parse_document(&embedded.data) {
                self.push(
                    &mut report,
                    Severity::Warning,
                    &embedded.id,
                    format!("data blob does not parse: {}", e),
                );
            }
        }

        report
    }

    fn push(
        &self,
        report: &mut ValidationReport,
        severity: Severity,
        context: &str,
        message: impl Into<String>,
    ) {
        let severity = if self.strict { Severity::Error } else { severity };
        report.issues.push(Issue {
            severity,
            context: context.to_string(),
            message: message.into(),
        });
    }

    /// Ids feed the engine's addressing syntax, which reserves `/`, `#`,
    /// and whitespace
    fn check_id(&self, report: &mut ValidationReport, id: &str) {
        if id.is_empty() {
            self.push(report, Severity::Error, id, "empty component id");
            return;
        }
        if id.contains(['/', '#']) || id.contains(char::is_whitespace) {
            self.push(
                report,
                Severity::Error,
                id,
                "id contains a reserved character ('/', '#', or whitespace)",
            );
        }
    }

    fn check_transform(&self, report: &mut ValidationReport, id: &str, transform: &Transform) {
        if !transform.position.is_finite() || !transform.rotation.is_finite() {
            self.push(
                report,
                Severity::Error,
                id,
                "transform contains a non-finite value",
            );
            return;
        }
        if !transform.rotation.is_normalized() {
            self.push(
                report,
                Severity::Warning,
                id,
                format!(
                    "rotation is not a unit quaternion (length {:.4})",
                    transform.rotation.length()
                ),
            );
        }
    }

    fn check_reference(&self, report: &mut ValidationReport, id: &str, path: &str) {
        if path.is_empty() {
            self.push(report, Severity::Error, id, "empty component path");
            return;
        }
        if !path.starts_with('/') {
            self.push(
                report,
                Severity::Error,
                id,
                format!("component path '{}' is not absolute", path),
            );
            return;
        }
        if Path::new(path).extension().is_none() {
            self.push(
                report,
                Severity::Warning,
                id,
                format!("component path '{}' has no file extension", path),
            );
        }
        if let Some(root) = &self.project_root {
            let on_disk = root.join(&path[1..]);
            if !on_disk.is_file() {
                self.push(
                    report,
                    Severity::Error,
                    id,
                    format!("component path '{}' does not exist in the project", path),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Quat, Vec3};
    use crate::object::{ComponentRef, EmbeddedComponent, ObjectComponent};

    fn reference(id: &str, path: &str) -> ObjectComponent {
        ObjectComponent::Referenced(ComponentRef::new(id, path))
    }

    fn sprite(id: &str, data: &str) -> ObjectComponent {
        ObjectComponent::Embedded(EmbeddedComponent::new(id, "sprite", data))
    }

    #[test]
    fn test_clean_object() {
        let mut obj = GameObject::new();
        obj.add_component(reference("glow", "/gardens/fx/firefly.particlefx"));
        obj.add_component(sprite("body", "tile_set: \"/a.atlas\"\n"));
        let report = Validator::new().validate(&obj);
        assert!(report.is_clean(), "unexpected findings:\n{}", report);
    }

    #[test]
    fn test_duplicate_ids_across_kinds() {
        let mut obj = GameObject::new();
        obj.add_component(reference("body", "/a.script"));
        obj.add_component(sprite("body", ""));
        let report = Validator::new().validate(&obj);
        assert_eq!(report.error_count(), 1);
        assert!(report.issues[0].message.contains("duplicate"));
        assert_eq!(report.issues[0].context, "body");
    }

    #[test]
    fn test_bad_ids() {
        let mut obj = GameObject::new();
        obj.add_component(reference("", "/a.script"));
        obj.add_component(reference("fx/glow", "/b.script"));
        obj.add_component(reference("two words", "/c.script"));
        // '-' is fine, plenty of real files use it
        obj.add_component(reference("sprite-eyes", "/d.script"));
        let report = Validator::new().validate(&obj);
        assert_eq!(report.error_count(), 3);
    }

    #[test]
    fn test_reference_paths() {
        let mut obj = GameObject::new();
        obj.add_component(reference("a", ""));
        obj.add_component(reference("b", "relative/path.script"));
        obj.add_component(reference("c", "/no-extension"));
        let report = Validator::new().validate(&obj);
        assert_eq!(report.error_count(), 2);
        assert_eq!(report.warning_count(), 1);
    }

    #[test]
    fn test_rotation_findings() {
        let mut obj = GameObject::new();
        obj.add_component(reference("drifted", "/a.script"));
        obj.component_mut("drifted").unwrap().transform_mut().rotation =
            Quat::new(0.0, 0.0, 0.0, 1.1);
        obj.add_component(reference("broken", "/b.script"));
        obj.component_mut("broken").unwrap().transform_mut().position =
            Vec3::new(f32::NAN, 0.0, 0.0);

        let report = Validator::new().validate(&obj);
        assert_eq!(report.warning_count(), 1);
        assert_eq!(report.error_count(), 1);
        assert!(report.issues[0].message.contains("unit quaternion"));
        assert!(report.issues[1].message.contains("non-finite"));
    }

    #[test]
    fn test_embedded_findings() {
        let mut obj = GameObject::new();
        obj.add_component(ObjectComponent::Embedded(EmbeddedComponent::new(
            "anon", "", "",
        )));
        obj.add_component(sprite("garbled", "tile_set: \"unclosed\n"));
        let report = Validator::new().validate(&obj);
        assert_eq!(report.warning_count(), 2);
        assert_eq!(report.error_count(), 0);
    }

    #[test]
    fn test_strict_promotes_warnings() {
        let mut obj = GameObject::new();
        obj.add_component(reference("c", "/no-extension"));
        let lenient = Validator::new().validate(&obj);
        assert_eq!(lenient.warning_count(), 1);
        let strict = Validator::new().strict(true).validate(&obj);
        assert_eq!(strict.error_count(), 1);
        assert_eq!(strict.warning_count(), 0);
    }

    #[test]
    fn test_project_root_resolution() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("gardens/fx")).unwrap();
        std::fs::write(dir.path().join("gardens/fx/firefly.particlefx"), "").unwrap();

        let mut obj = GameObject::new();
        obj.add_component(reference("glow", "/gardens/fx/firefly.particlefx"));
        obj.add_component(reference("ghost", "/gardens/fx/missing.particlefx"));

        // Without a root the paths are only checked for shape
        assert!(Validator::new().validate(&obj).is_clean());

        let report = Validator::new()
            .with_project_root(dir.path())
            .validate(&obj);
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.issues[0].context, "ghost");
    }

    #[test]
    fn test_report_rendering() {
        let mut obj = GameObject::new();
        obj.add_component(reference("a", "relative.script"));
        let report = Validator::new().validate(&obj);
        assert_eq!(
            report.to_string(),
            "error: [a] component path 'relative.script' is not absolute\n"
        );
    }
}
