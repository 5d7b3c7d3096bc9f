//! The project model: a typed, mutable view over the parsed tree.
//!
//! A [`PbxProject`] owns the root mapping produced by the parser and exposes
//! the domain edits — file additions and removals, groups, targets, build
//! phases, build settings, attributes and regions. Every edit keeps the
//! object graph's cross-references consistent: records are inserted together
//! with their `_comment` companions, build files point at file references by
//! UUID string, and the live UUID set never collides.
//!
//! Graph edges stay UUID strings resolved through the isa buckets under
//! `objects`; records never hold pointers to each other. The two buckets
//! Xcode tolerates missing (`XCVersionGroup`, `XCConfigurationList`) are
//! materialized empty at load; buckets that only exist once something is
//! inserted into them are materialized on first insertion.

mod files;
mod groups;
mod pbx_file;
mod phases;
mod settings;
pub mod tables;
mod targets;

pub use pbx_file::{PbxFile, PbxFileOptions};
pub use phases::{BuildPhaseOptions, ShellScriptPhase};

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, trace};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::parser;
use crate::tree::{strip_comment_key, unquoted, OrderedMap, Value};
use crate::writer::PbxWriter;

/// A loaded pbxproj document and its edit surface.
///
/// A value of this type only exists once parsing succeeded; there is no
/// unloaded or failed state to check for.
pub struct PbxProject {
    file_path: Option<PathBuf>,
    contents: OrderedMap,
    uuids: HashSet<String>,
}

impl PbxProject {
    /// Read and parse a `project.pbxproj` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)?;
        let mut project = Self::from_source(&source)?;
        project.file_path = Some(path.to_path_buf());
        Ok(project)
    }

    /// Parse a document from memory.
    pub fn from_source(source: &str) -> Result<Self> {
        let contents = parser::parse(source)?;
        let mut project = Self {
            file_path: None,
            contents,
            uuids: HashSet::new(),
        };
        project.init_sections();
        project.build_exist_uuids();
        debug!(uuids = project.uuids.len(), "project loaded");
        Ok(project)
    }

    /// The raw tree. Edits go through the typed operations, not this.
    pub fn contents(&self) -> &OrderedMap {
        &self.contents
    }

    /// Serialize to the canonical text shape.
    pub fn to_pbxproj_string(&self) -> String {
        PbxWriter::new(&self.contents).render()
    }

    /// Serialize and write to `path`.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_pbxproj_string())?;
        Ok(())
    }

    /// Serialize and write back to the path the project was loaded from.
    pub fn save(&self) -> Result<()> {
        match &self.file_path {
            Some(path) => self.write_to(path),
            None => Err(Error::not_found("project file path")),
        }
    }

    /// Pretty-printed JSON dump of the raw tree, for debugging. Mapping
    /// order in the output mirrors file order.
    pub fn dump<W: io::Write>(&self, writer: W) -> Result<()> {
        let mut serializer = serde_json::Serializer::pretty(writer);
        self.contents
            .serialize(&mut serializer)
            .map_err(|err| Error::Io(io::Error::new(io::ErrorKind::Other, err)))
    }

    /// One isa bucket under `objects`, if present.
    pub fn get_pbx_object(&self, isa: &str) -> Option<&OrderedMap> {
        self.section(isa)
    }

    // =========================================================================
    // Tree navigation
    // =========================================================================

    pub(crate) fn project(&self) -> Option<&OrderedMap> {
        self.contents.mapping("project")
    }

    pub(crate) fn project_mut(&mut self) -> &mut OrderedMap {
        self.contents.ensure_mapping("project")
    }

    pub(crate) fn objects(&self) -> Option<&OrderedMap> {
        self.project()?.mapping("objects")
    }

    pub(crate) fn objects_mut(&mut self) -> &mut OrderedMap {
        self.project_mut().ensure_mapping("objects")
    }

    pub(crate) fn section(&self, isa: &str) -> Option<&OrderedMap> {
        self.objects()?.mapping(isa)
    }

    /// The bucket for `isa`, created empty when missing.
    pub(crate) fn section_mut(&mut self, isa: &str) -> &mut OrderedMap {
        self.objects_mut().ensure_mapping(isa)
    }

    fn init_sections(&mut self) {
        let objects = self.objects_mut();
        objects.ensure_mapping("XCVersionGroup");
        objects.ensure_mapping("XCConfigurationList");
    }

    // =========================================================================
    // UUIDs
    // =========================================================================

    fn build_exist_uuids(&mut self) {
        let mut uuids = HashSet::new();
        if let Some(objects) = self.objects() {
            for (_, bucket) in objects.non_comment_entries() {
                let Some(bucket) = bucket.as_mapping() else {
                    continue;
                };
                for (key, _) in bucket.non_comment_entries() {
                    if is_uuid(key) {
                        uuids.insert(key.to_string());
                    }
                }
            }
        }
        self.uuids = uuids;
    }

    /// Mint a fresh 24-hex-char UUID, retrying on collision with the live
    /// set, and register it.
    pub(crate) fn generate_uuid(&mut self) -> String {
        loop {
            let hex = Uuid::new_v4().simple().to_string().to_uppercase();
            let candidate = hex[..24].to_string();
            if self.uuids.insert(candidate.clone()) {
                return candidate;
            }
            trace!(uuid = %candidate, "uuid collision, retrying");
        }
    }

    /// Whether `uuid` is registered in the live set.
    pub fn has_uuid(&self, uuid: &str) -> bool {
        self.uuids.contains(uuid)
    }

    // =========================================================================
    // Project / target lookup
    // =========================================================================

    pub(crate) fn first_project_uuid(&self) -> Option<String> {
        let section = self.section("PBXProject")?;
        section
            .non_comment_entries()
            .next()
            .map(|(key, _)| key.to_string())
    }

    /// The first `PBXProject` record, with its UUID.
    pub fn get_first_project(&self) -> Result<(String, &OrderedMap)> {
        let uuid = self
            .first_project_uuid()
            .ok_or_else(|| Error::not_found("PBXProject record"))?;
        let record = self
            .section("PBXProject")
            .and_then(|section| section.mapping(&uuid))
            .ok_or_else(|| Error::not_found("PBXProject record"))?;
        Ok((uuid, record))
    }

    pub(crate) fn first_project_mut(&mut self) -> Option<&mut OrderedMap> {
        let uuid = self.first_project_uuid()?;
        self.section_mut("PBXProject").mapping_mut(&uuid)
    }

    /// The first target listed by the first project, with its UUID.
    pub fn get_first_target(&self) -> Result<(String, &OrderedMap)> {
        let (_, project) = self.get_first_project()?;
        let targets = project
            .sequence("targets")
            .ok_or_else(|| Error::not_found("project targets"))?;
        let first = targets
            .first()
            .and_then(Value::as_mapping)
            .map(|entry| entry.string("value").to_string())
            .ok_or_else(|| Error::not_found("first target"))?;
        let record = self
            .section("PBXNativeTarget")
            .and_then(|section| section.mapping(&first))
            .ok_or_else(|| Error::not_found(format!("target {first}")))?;
        Ok((first, record))
    }

    /// The first target whose `productType` matches (quoted or not).
    pub fn get_target(&self, product_type: &str) -> Option<(String, &OrderedMap)> {
        let (_, project) = self.get_first_project().ok()?;
        let targets = project.sequence("targets")?;
        let native = self.section("PBXNativeTarget")?;
        for entry in targets {
            let Some(entry) = entry.as_mapping() else {
                continue;
            };
            let uuid = entry.string("value");
            let Some(target) = native.mapping(uuid) else {
                continue;
            };
            if unquoted(target.string("productType")) == product_type {
                return Some((uuid.to_string(), target));
            }
        }
        None
    }

    /// The first record in `section_name` whose `_comment` equals `name`.
    pub(crate) fn item_key_by_comment(&self, name: &str, section_name: &str) -> Option<String> {
        let section = self.section(section_name)?;
        for (key, value) in section.comment_entries() {
            if value.as_str() == Some(name) {
                return Some(strip_comment_key(key).to_string());
            }
        }
        None
    }

    /// Look up a native target by its section comment (the target name).
    pub fn pbx_target_by_name(&self, name: &str) -> Option<(String, &OrderedMap)> {
        let key = self.item_key_by_comment(name, "PBXNativeTarget")?;
        let record = self.section("PBXNativeTarget")?.mapping(&key)?;
        Some((key, record))
    }

    /// The project's product name: the first non-empty `PRODUCT_NAME` among
    /// build configurations, unquoted.
    pub fn product_name(&self) -> String {
        let Some(section) = self.section("XCBuildConfiguration") else {
            return String::new();
        };
        for (_, value) in section.non_comment_entries() {
            let Some(config) = value.as_mapping() else {
                continue;
            };
            let Some(settings) = config.mapping("buildSettings") else {
                continue;
            };
            let product = settings.string("PRODUCT_NAME");
            if !product.is_empty() {
                return unquoted(product).to_string();
            }
        }
        String::new()
    }
}

/// A 24-character hex object identifier.
pub(crate) fn is_uuid(key: &str) -> bool {
    key.len() == 24 && key.bytes().all(|b| b.is_ascii_hexdigit())
}

// =============================================================================
// Sequence editing shared by the mutators
// =============================================================================

/// Append to the sequence at `key`, creating it when missing.
pub(crate) fn add_to_list(obj: &mut OrderedMap, key: &str, value: Value) {
    obj.ensure_sequence(key).push(value);
}

/// Append unless an equal entry is already present.
pub(crate) fn add_to_list_if_absent(obj: &mut OrderedMap, key: &str, value: Value) {
    let seq = obj.ensure_sequence(key);
    if !seq.contains(&value) {
        seq.push(value);
    }
}

/// Remove entries matching `predicate` from the sequence at `key`; only the
/// first match unless `all`.
pub(crate) fn remove_from_list(
    obj: &mut OrderedMap,
    key: &str,
    predicate: impl Fn(&Value) -> bool,
    all: bool,
) {
    let Some(seq) = obj.sequence_mut(key) else {
        return;
    };
    if all {
        seq.retain(|value| !predicate(value));
    } else if let Some(index) = seq.iter().position(predicate) {
        seq.remove(index);
    }
}
