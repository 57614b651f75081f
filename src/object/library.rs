//! Object library - discovery and caching of game object files
//!
//! Scans a project tree for object files and keeps them loaded, keyed by
//! the engine's absolute resource path (`/gardens/lantern.go`). The
//! library root doubles as the project root when validating, so referenced
//! component paths are checked against the same tree the objects came from.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::validate::{ValidationReport, Validator};

use super::object::{GameObject, ObjectError, OBJECT_EXTENSION};

/// A library of game objects under one project root
#[derive(Debug)]
pub struct ObjectLibrary {
    /// Project root directory on disk
    root: PathBuf,
    /// Loaded objects keyed by resource path
    objects: HashMap<String, GameObject>,
    /// Resource paths in discovery order
    paths: Vec<String>,
}

impl ObjectLibrary {
    /// Create an empty library rooted at a project directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            objects: HashMap::new(),
            paths: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Discover and load all object files under the root
    ///
    /// Files that fail to parse are reported and skipped; the rest of the
    /// library still loads. Scan order is sorted, so two scans of the same
    /// tree produce the same library.
    pub fn discover(&mut self) -> Result<usize, ObjectError> {
        self.objects.clear();
        self.paths.clear();

        let mut files = Vec::new();
        collect_object_files(&self.root, &mut files)?;
        files.sort();

        for path in files {
            match GameObject::load(&path) {
                Ok(object) => {
                    let resource = self.resource_path(&path);
                    self.paths.push(resource.clone());
                    self.objects.insert(resource, object);
                }
                Err(e) => {
                    eprintln!("Failed to load object {:?}: {}", path, e);
                }
            }
        }

        Ok(self.objects.len())
    }

    /// Engine resource path for a file under the root
    fn resource_path(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let mut resource = String::new();
        for part in relative.components() {
            resource.push('/');
            resource.push_str(&part.as_os_str().to_string_lossy());
        }
        resource
    }

    /// File path on disk for a resource path
    fn disk_path(&self, resource: &str) -> PathBuf {
        self.root.join(resource.trim_start_matches('/'))
    }

    /// Get an object by resource path
    pub fn get(&self, resource: &str) -> Option<&GameObject> {
        self.objects.get(resource)
    }

    /// Get a mutable reference to an object by resource path
    pub fn get_mut(&mut self, resource: &str) -> Option<&mut GameObject> {
        self.objects.get_mut(resource)
    }

    pub fn contains(&self, resource: &str) -> bool {
        self.objects.contains_key(resource)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Iterate objects in discovery order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &GameObject)> {
        self.paths
            .iter()
            .filter_map(|p| self.objects.get(p).map(|o| (p.as_str(), o)))
    }

    /// Add or replace an object at a resource path
    pub fn add(&mut self, resource: impl Into<String>, object: GameObject) {
        let resource = resource.into();
        if !self.objects.contains_key(&resource) {
            self.paths.push(resource.clone());
        }
        self.objects.insert(resource, object);
    }

    /// Remove an object from the library (the file on disk is untouched)
    pub fn remove(&mut self, resource: &str) -> Option<GameObject> {
        self.paths.retain(|p| p != resource);
        self.objects.remove(resource)
    }

    /// Save one object back to its file in canonical form
    pub fn save(&self, resource: &str) -> Result<(), ObjectError> {
        let object = self
            .objects
            .get(resource)
            .ok_or_else(|| ObjectError::Io(format!("no object at '{}'", resource)))?;
        let path = self.disk_path(resource);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        object.save(&path)
    }

    /// Save every object back to its file
    pub fn save_all(&self) -> Result<(), ObjectError> {
        for resource in &self.paths {
            self.save(resource)?;
        }
        Ok(())
    }

    /// Validate every object against the library root
    ///
    /// Returns one report per object in discovery order, clean ones
    /// included.
    pub fn validate_all(&self, strict: bool) -> Vec<(String, ValidationReport)> {
        let validator = Validator::new()
            .with_project_root(&self.root)
            .strict(strict);
        self.iter()
            .map(|(resource, object)| (resource.to_string(), validator.validate(object)))
            .collect()
    }
}

/// Recursively collect `*.go` files under a directory
fn collect_object_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), ObjectError> {
    if !dir.is_dir() {
        return Ok(());
    }
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_object_files(&path, out)?;
        } else if path
            .extension()
            .map(|ext| ext == OBJECT_EXTENSION)
            .unwrap_or(false)
        {
            out.push(path);
        }
    }
    Ok(())
}
