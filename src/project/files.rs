//! File-level edit operations: sources, headers, resources, frameworks,
//! libraries, plugins, products and copy files.
//!
//! Additions materialize a `PBXFileReference` record (plus `_comment`), a
//! `PBXBuildFile` record when the kind participates in a build phase, the
//! group membership, and the build-phase membership. Removals mirror each
//! addition and capture the matched UUIDs back into the transient
//! [`PbxFile`] so later steps can match group children by reference.

use tracing::debug;

use crate::error::{Error, Result};
use crate::tree::{comment_key, quoted, CommentedEntry, OrderedMap, Value};

use super::pbx_file::{basename_of, to_slash, PbxFile, PbxFileOptions};
use super::PbxProject;

// =============================================================================
// Record constructors and canonical comments
// =============================================================================

/// The "long comment" a build file carries: `<basename> in <group>`.
pub(crate) fn long_comment(file: &PbxFile) -> String {
    format!("{} in {}", file.basename, file.group)
}

/// The comment paired with a file reference: its basename.
pub(crate) fn file_reference_comment(file: &PbxFile) -> String {
    if !file.basename.is_empty() {
        file.basename.clone()
    } else {
        basename_of(&file.path)
    }
}

pub(crate) fn build_file_obj(file: &PbxFile) -> OrderedMap {
    let mut obj = OrderedMap::new();
    obj.set("isa", "PBXBuildFile");
    obj.set("fileRef", file.file_ref.clone());
    obj.set(comment_key("fileRef"), file.basename.clone());
    if let Some(settings) = &file.settings {
        if !settings.is_empty() {
            obj.set("settings", Value::Mapping(settings.clone()));
        }
    }
    obj
}

pub(crate) fn file_reference_obj(file: &PbxFile) -> OrderedMap {
    OrderedMap::from_entries([
        ("isa", Value::from("PBXFileReference")),
        ("name", Value::from(quoted(&file.basename))),
        ("fileEncoding", Value::from(file.file_encoding)),
        ("lastKnownFileType", Value::from(file.last_known_file_type.clone())),
        ("path", Value::from(quoted(&to_slash(&file.path)))),
        ("sourceTree", Value::from(file.source_tree.clone())),
        ("explicitFileType", Value::from(file.explicit_file_type.clone())),
        ("includeInIndex", Value::from(file.include_in_index)),
    ])
}

/// A group `children` entry for the file.
pub(crate) fn group_child(file: &PbxFile) -> CommentedEntry {
    CommentedEntry::new(file.file_ref.clone(), file.basename.clone())
}

/// A build phase `files` entry for the file.
pub(crate) fn build_phase_entry(file: &PbxFile) -> Value {
    CommentedEntry::new(file.uuid.clone(), long_comment(file)).into_value()
}

impl PbxProject {
    // =========================================================================
    // Duplicate detection
    // =========================================================================

    /// Whether any `PBXFileReference` record points at `path` (quoted or
    /// not).
    pub(crate) fn has_file(&self, path: &str) -> bool {
        let Some(section) = self.section("PBXFileReference") else {
            return false;
        };
        let quoted_path = quoted(path);
        section.non_comment_entries().any(|(_, value)| {
            value.as_mapping().is_some_and(|record| {
                let record_path = record.string("path");
                record_path == path || record_path == quoted_path
            })
        })
    }

    // =========================================================================
    // Source files
    // =========================================================================

    /// Add a compiled source file: file reference, build file, group
    /// membership (the `Plugins` group when no group key is given) and the
    /// `Sources` build phase of the owning target.
    pub fn add_source_file(
        &mut self,
        path: &str,
        group: Option<&str>,
        options: PbxFileOptions,
    ) -> Result<()> {
        let mut file = match group {
            Some(group) => self.add_file_impl(path, group, &options)?,
            None => self.add_plugin_file_impl(path, &options)?,
        };
        file.target = options.target.clone().unwrap_or_default();
        file.uuid = self.generate_uuid();
        self.add_to_pbx_build_file_section(&file);
        self.add_to_pbx_sources_build_phase(&file);
        debug!(path = %file.path, "source file added");
        Ok(())
    }

    pub fn remove_source_file(
        &mut self,
        path: &str,
        group: Option<&str>,
        options: PbxFileOptions,
    ) -> Result<()> {
        let mut file = match group {
            Some(group) => self.remove_file_impl(path, group, &options)?,
            None => self.remove_plugin_file_impl(path, &options)?,
        };
        file.target = options.target.clone().unwrap_or_default();
        self.remove_from_pbx_build_file_section(&mut file);
        self.remove_from_pbx_sources_build_phase(&file);
        Ok(())
    }

    // =========================================================================
    // Header files
    // =========================================================================

    pub fn add_header_file(
        &mut self,
        path: &str,
        group: Option<&str>,
        options: PbxFileOptions,
    ) -> Result<()> {
        match group {
            Some(group) => self.add_file_impl(path, group, &options).map(|_| ()),
            None => self.add_plugin_file(path, options),
        }
    }

    pub fn remove_header_file(
        &mut self,
        path: &str,
        group: Option<&str>,
        options: PbxFileOptions,
    ) -> Result<()> {
        match group {
            Some(group) => self.remove_file_impl(path, group, &options).map(|_| ()),
            None => self.remove_plugin_file(path, options),
        }
    }

    // =========================================================================
    // Resource files
    // =========================================================================

    pub fn add_resource_file(
        &mut self,
        path: &str,
        group: Option<&str>,
        options: PbxFileOptions,
    ) -> Result<()> {
        let mut file = if options.plugin {
            self.add_plugin_file_impl(path, &options)?
        } else {
            let file = PbxFile::new(path, &options)?;
            if self.has_file(&file.path) {
                return Err(Error::already_exists(&file.path));
            }
            file
        };

        file.uuid = self.generate_uuid();
        file.target = options.target.clone().unwrap_or_default();
        if !options.plugin {
            self.correct_for_resources_path(&mut file);
            file.file_ref = self.generate_uuid();
        }

        if !options.variant_group {
            self.add_to_pbx_build_file_section(&file);
            self.add_to_pbx_resources_build_phase(&file);
        }

        if !options.plugin {
            self.add_to_pbx_file_reference_section(&file);
            match group {
                Some(group_key) => {
                    if self.group_by_key_and_type(group_key, "PBXGroup").is_some() {
                        self.add_to_pbx_group_by_key(&file, group_key);
                    } else if self
                        .group_by_key_and_type(group_key, "PBXVariantGroup")
                        .is_some()
                    {
                        self.add_to_pbx_variant_group(&file, group_key);
                    }
                }
                None => self.add_to_resources_pbx_group(&file)?,
            }
        }
        Ok(())
    }

    pub fn remove_resource_file(
        &mut self,
        path: &str,
        group: Option<&str>,
        options: PbxFileOptions,
    ) -> Result<()> {
        let mut file = PbxFile::new(path, &options)?;
        file.target = options.target.clone().unwrap_or_default();

        if options.plugin {
            self.correct_for_resources_path(&mut file);
            self.remove_from_plugins_pbx_group(&file);
        }
        self.correct_for_resources_path(&mut file);
        self.remove_from_pbx_build_file_section(&mut file);
        self.remove_from_pbx_file_reference_section(&mut file);
        match group {
            Some(group_key) => {
                if self.group_by_key_and_type(group_key, "PBXGroup").is_some() {
                    self.remove_from_pbx_group_by_key(&file, group_key);
                } else if self
                    .group_by_key_and_type(group_key, "PBXVariantGroup")
                    .is_some()
                {
                    self.remove_from_pbx_variant_group(&file, group_key);
                }
            }
            None => self.remove_from_resources_pbx_group(&file),
        }
        self.remove_from_pbx_resources_build_phase(&file);
        Ok(())
    }

    // =========================================================================
    // Frameworks and libraries
    // =========================================================================

    /// Add a framework. Linked into the `Frameworks` phase when
    /// `options.link`; custom frameworks also land in the framework search
    /// paths, and with `options.embed` a second build file (same file
    /// reference, fresh UUID) goes into the `Embed Frameworks` copy phase.
    pub fn add_framework(&mut self, path: &str, options: PbxFileOptions) -> Result<()> {
        let mut main_options = options.clone();
        main_options.embed = false;
        let mut file = PbxFile::new(path, &main_options)?;
        if self.has_file(&file.path) {
            return Err(Error::already_exists(&file.path));
        }
        file.uuid = self.generate_uuid();
        file.file_ref = self.generate_uuid();
        file.target = options.target.clone().unwrap_or_default();

        self.add_to_pbx_build_file_section(&file);
        self.add_to_pbx_file_reference_section(&file);
        self.add_to_frameworks_pbx_group(&file)?;

        if options.link {
            self.add_to_pbx_frameworks_build_phase(&file);
        }

        if options.custom_framework {
            self.add_to_framework_search_paths(&file);
            if options.embed {
                let mut embed_options = options.clone();
                embed_options.embed = true;
                let mut embedded = PbxFile::new(path, &embed_options)?;
                embedded.uuid = self.generate_uuid();
                embedded.file_ref = file.file_ref.clone();
                // a separate PBXBuildFile entry for Embed Frameworks
                self.add_to_pbx_build_file_section(&embedded);
                self.add_to_pbx_embed_frameworks_build_phase(&embedded);
            }
        }
        Ok(())
    }

    pub fn remove_framework(&mut self, path: &str, options: PbxFileOptions) -> Result<()> {
        let mut main_options = options.clone();
        main_options.embed = false;
        let mut file = PbxFile::new(path, &main_options)?;
        file.target = options.target.clone().unwrap_or_default();

        self.remove_from_pbx_build_file_section(&mut file);
        self.remove_from_pbx_file_reference_section(&mut file);
        self.remove_from_frameworks_pbx_group(&file);
        self.remove_from_pbx_frameworks_build_phase(&file);

        if options.custom_framework {
            self.remove_from_framework_search_paths(&file);
        }

        let mut embed_options = options.clone();
        embed_options.embed = true;
        let mut embedded = PbxFile::new(path, &embed_options)?;
        embedded.file_ref = file.file_ref.clone();
        self.remove_from_pbx_build_file_section(&mut embedded);
        self.remove_from_pbx_embed_frameworks_build_phase(&embedded);
        Ok(())
    }

    /// Add a static library: build file, `Frameworks` phase membership and
    /// the library search paths.
    pub fn add_static_library(&mut self, path: &str, options: PbxFileOptions) -> Result<()> {
        let mut file = if options.plugin {
            self.add_plugin_file_impl(path, &options)?
        } else {
            let file = PbxFile::new(path, &options)?;
            if self.has_file(&file.path) {
                return Err(Error::already_exists(&file.path));
            }
            file
        };

        file.uuid = self.generate_uuid();
        file.target = options.target.clone().unwrap_or_default();
        if !options.plugin {
            file.file_ref = self.generate_uuid();
            self.add_to_pbx_file_reference_section(&file);
        }
        self.add_to_pbx_build_file_section(&file);
        self.add_to_pbx_frameworks_build_phase(&file);
        self.add_to_library_search_paths(&file);
        Ok(())
    }

    // =========================================================================
    // Plugin files
    // =========================================================================

    pub fn add_plugin_file(&mut self, path: &str, options: PbxFileOptions) -> Result<()> {
        self.add_plugin_file_impl(path, &options).map(|_| ())
    }

    pub fn remove_plugin_file(&mut self, path: &str, options: PbxFileOptions) -> Result<()> {
        self.remove_plugin_file_impl(path, &options).map(|_| ())
    }

    pub(crate) fn add_plugin_file_impl(
        &mut self,
        path: &str,
        options: &PbxFileOptions,
    ) -> Result<PbxFile> {
        let mut file = PbxFile::new(path, options)?;
        file.plugin = true;
        self.correct_for_plugins_path(&mut file);
        if self.has_file(&file.path) {
            return Err(Error::already_exists(&file.path));
        }
        file.file_ref = self.generate_uuid();
        self.add_to_pbx_file_reference_section(&file);
        self.add_to_plugins_pbx_group(&file)?;
        Ok(file)
    }

    pub(crate) fn remove_plugin_file_impl(
        &mut self,
        path: &str,
        options: &PbxFileOptions,
    ) -> Result<PbxFile> {
        let mut file = PbxFile::new(path, options)?;
        file.plugin = true;
        self.correct_for_plugins_path(&mut file);
        self.remove_from_pbx_file_reference_section(&mut file);
        self.remove_from_plugins_pbx_group(&file);
        Ok(file)
    }

    // =========================================================================
    // Product files
    // =========================================================================

    pub fn add_product_file(&mut self, path: &str, options: PbxFileOptions) -> Result<()> {
        self.add_product_file_impl(path, &options).map(|_| ())
    }

    pub(crate) fn add_product_file_impl(
        &mut self,
        path: &str,
        options: &PbxFileOptions,
    ) -> Result<PbxFile> {
        let mut file = PbxFile::new(path, options)?;
        file.include_in_index = 0;
        file.file_ref = self.generate_uuid();
        file.target = options.target.clone().unwrap_or_default();
        file.group = options.group.clone().unwrap_or_default();
        file.uuid = self.generate_uuid();
        file.path = file.basename.clone();
        self.add_to_pbx_file_reference_section(&file);
        self.add_to_products_pbx_group(&file)?;
        Ok(file)
    }

    pub fn remove_product_file(&mut self, path: &str, options: PbxFileOptions) -> Result<()> {
        let mut file = PbxFile::new(path, &options)?;
        self.remove_from_pbx_file_reference_section(&mut file);
        self.remove_from_products_pbx_group(&file);
        Ok(())
    }

    // =========================================================================
    // Copy files
    // =========================================================================

    pub fn add_copy_file(&mut self, path: &str, options: PbxFileOptions) -> Result<()> {
        let mut file = PbxFile::new(path, &options)?;
        if self.has_file(&file.path) {
            return Err(Error::already_exists(&file.path));
        }
        file.uuid = self.generate_uuid();
        file.file_ref = file.uuid.clone();
        file.target = options.target.clone().unwrap_or_default();
        self.add_to_pbx_build_file_section(&file);
        self.add_to_pbx_file_reference_section(&file);
        self.add_to_pbx_copy_files_build_phase(&file);
        Ok(())
    }

    pub fn remove_copy_file(&mut self, path: &str, options: PbxFileOptions) -> Result<()> {
        let mut file = PbxFile::new(path, &options)?;
        file.target = options.target.clone().unwrap_or_default();
        self.remove_from_pbx_build_file_section(&mut file);
        self.remove_from_pbx_file_reference_section(&mut file);
        self.remove_from_pbx_copy_files_build_phase(&file);
        Ok(())
    }

    // =========================================================================
    // Generic file add/remove
    // =========================================================================

    /// Add a bare file reference and attach it to the group (or variant
    /// group) with key `group`.
    pub fn add_file(&mut self, path: &str, group: Option<&str>, options: PbxFileOptions) -> Result<()> {
        self.add_file_impl(path, group.unwrap_or_default(), &options)
            .map(|_| ())
    }

    pub fn remove_file(
        &mut self,
        path: &str,
        group: Option<&str>,
        options: PbxFileOptions,
    ) -> Result<()> {
        self.remove_file_impl(path, group.unwrap_or_default(), &options)
            .map(|_| ())
    }

    pub(crate) fn add_file_impl(
        &mut self,
        path: &str,
        group: &str,
        options: &PbxFileOptions,
    ) -> Result<PbxFile> {
        let mut file = PbxFile::new(path, options)?;
        if self.has_file(&file.path) {
            return Err(Error::already_exists(&file.path));
        }
        file.file_ref = self.generate_uuid();
        self.add_to_pbx_file_reference_section(&file);
        if self.group_by_key_and_type(group, "PBXGroup").is_some() {
            self.add_to_pbx_group_by_key(&file, group);
        } else if self.group_by_key_and_type(group, "PBXVariantGroup").is_some() {
            self.add_to_pbx_variant_group(&file, group);
        }
        Ok(file)
    }

    pub(crate) fn remove_file_impl(
        &mut self,
        path: &str,
        group: &str,
        options: &PbxFileOptions,
    ) -> Result<PbxFile> {
        let mut file = PbxFile::new(path, options)?;
        self.remove_from_pbx_file_reference_section(&mut file);
        if self.group_by_key_and_type(group, "PBXGroup").is_some() {
            self.remove_from_pbx_group_by_key(&file, group);
        } else if self.group_by_key_and_type(group, "PBXVariantGroup").is_some() {
            self.remove_from_pbx_variant_group(&file, group);
        }
        Ok(file)
    }

    // =========================================================================
    // Section maintenance
    // =========================================================================

    pub(crate) fn add_to_pbx_build_file_section(&mut self, file: &PbxFile) {
        let obj = build_file_obj(file);
        let comment = long_comment(file);
        let section = self.section_mut("PBXBuildFile");
        section.set(file.uuid.clone(), Value::Mapping(obj));
        section.set(comment_key(&file.uuid), comment);
    }

    /// Delete every build-file record whose `fileRef_comment` names this
    /// file's basename, together with its `_comment` companion. Captures
    /// the last deleted key into `file.uuid`.
    pub(crate) fn remove_from_pbx_build_file_section(&mut self, file: &mut PbxFile) {
        let section = self.section_mut("PBXBuildFile");
        let mut keys = Vec::new();
        for (key, value) in section.non_comment_entries() {
            let Some(record) = value.as_mapping() else {
                continue;
            };
            if record.comment_for("fileRef") == Some(file.basename.as_str()) {
                keys.push(key.to_string());
            }
        }
        for key in keys {
            file.uuid = key.clone();
            section.delete(&key);
            section.delete(&comment_key(&key));
        }
    }

    pub(crate) fn add_to_pbx_file_reference_section(&mut self, file: &PbxFile) {
        let obj = file_reference_obj(file);
        let comment = file_reference_comment(file);
        let section = self.section_mut("PBXFileReference");
        section.set(file.file_ref.clone(), Value::Mapping(obj));
        section.set(comment_key(&file.file_ref), comment);
    }

    /// Delete the first file-reference record matching this file by name or
    /// path (quoted or not), with its `_comment`. Captures the deleted key
    /// into `file.file_ref` so group children can be matched afterwards.
    pub(crate) fn remove_from_pbx_file_reference_section(&mut self, file: &mut PbxFile) {
        let ref_obj = file_reference_obj(file);
        let ref_name = ref_obj.string("name").to_string();
        let ref_path = ref_obj.string("path").to_string();
        let section = self.section_mut("PBXFileReference");
        let mut found = None;
        for (key, value) in section.non_comment_entries() {
            let Some(record) = value.as_mapping() else {
                continue;
            };
            let name = record.string("name");
            let path = record.string("path");
            if name == ref_name
                || quoted(name) == ref_name
                || path == ref_path
                || quoted(path) == ref_path
            {
                found = Some(key.to_string());
                break;
            }
        }
        if let Some(key) = found {
            file.file_ref = key.clone();
            section.delete(&key);
            section.delete(&comment_key(&key));
        }
    }

    /// Materialize the `XCVersionGroup` record for an `.xcdatamodeld`
    /// bundle carrying versioned models.
    pub fn add_to_xc_version_group_section(&mut self, file: &PbxFile) -> Result<()> {
        let current_model = file.current_model.as_deref();
        if file.models.is_empty() || current_model.is_none() {
            return Err(Error::invalid_argument(
                "cannot create an XCVersionGroup from a file that is not a data model document",
            ));
        }
        let current_ref = current_model.map(|m| m.file_ref.clone()).unwrap_or_default();
        let children: Vec<Value> = file
            .models
            .iter()
            .map(|model| Value::from(model.file_ref.clone()))
            .collect();
        let name = basename_of(&file.path);
        let section = self.section_mut("XCVersionGroup");
        if !section.has(&file.file_ref) {
            let record = OrderedMap::from_entries([
                ("isa", Value::from("XCVersionGroup")),
                ("children", Value::Sequence(children)),
                ("currentVersion", Value::from(current_ref)),
                ("name", Value::from(name.clone())),
                ("path", Value::from(file.path.clone())),
                ("sourceTree", Value::from("\"<group>\"")),
                ("versionGroupType", Value::from("wrapper.xcdatamodel")),
            ]);
            section.set(file.file_ref.clone(), Value::Mapping(record));
            section.set(comment_key(&file.file_ref), name);
        }
        Ok(())
    }

    // =========================================================================
    // Group-relative path correction
    // =========================================================================

    pub(crate) fn correct_for_plugins_path(&self, file: &mut PbxFile) {
        self.correct_for_path(file, "Plugins");
    }

    pub(crate) fn correct_for_resources_path(&self, file: &mut PbxFile) {
        self.correct_for_path(file, "Resources");
    }

    /// When the named group has its own `path`, file paths are stored
    /// relative to it: strip the leading `<group>/` component.
    fn correct_for_path(&self, file: &mut PbxFile, group_name: &str) {
        let Some(group) = self.pbx_group_by_name(group_name) else {
            return;
        };
        if group.string("path").is_empty() {
            return;
        }
        let slash = format!("{group_name}/");
        let backslash = format!("{group_name}\\");
        if let Some(rest) = file
            .path
            .strip_prefix(&slash)
            .or_else(|| file.path.strip_prefix(&backslash))
        {
            file.path = rest.to_string();
        }
    }
}
