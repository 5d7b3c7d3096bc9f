//! Group edits: the named navigator groups (`Plugins`, `Resources`,
//! `Frameworks`, `Products`), caller-created groups, variant groups and the
//! localization variant group.
//!
//! Named-group membership resolves through the `PBXGroup` bucket's
//! `_comment` entries; keyed membership goes straight to the record. A file
//! added to a group that does not exist yet creates the group around it.

use std::collections::HashMap;

use crate::error::Result;
use crate::tree::{comment_key, quoted, strip_comment_key, CommentedEntry, OrderedMap, Value};

use super::files::group_child;
use super::pbx_file::{PbxFile, PbxFileOptions};
use super::{add_to_list, remove_from_list, tables, PbxProject};

impl PbxProject {
    // =========================================================================
    // Lookup
    // =========================================================================

    /// The key of the first `PBXGroup` whose comment equals `name`.
    pub(crate) fn pbx_group_key_by_name(&self, name: &str) -> Option<String> {
        self.item_key_by_comment(name, "PBXGroup")
    }

    /// The first `PBXGroup` record whose comment equals `name`.
    pub fn pbx_group_by_name(&self, name: &str) -> Option<&OrderedMap> {
        let key = self.pbx_group_key_by_name(name)?;
        self.section("PBXGroup")?.mapping(&key)
    }

    /// A group record by key within the `PBXGroup` or `PBXVariantGroup`
    /// bucket.
    pub(crate) fn group_by_key_and_type(&self, key: &str, group_type: &str) -> Option<&OrderedMap> {
        if key.is_empty() {
            return None;
        }
        self.section(group_type)?.mapping(key)
    }

    /// Find a group key by name and/or path; both criteria must match when
    /// both are given. Comparisons tolerate the quoted form.
    pub fn find_pbx_group_key(&self, name: Option<&str>, path: Option<&str>) -> Option<String> {
        self.find_group_key_and_type(name, path, "PBXGroup")
    }

    pub fn find_pbx_variant_group_key(
        &self,
        name: Option<&str>,
        path: Option<&str>,
    ) -> Option<String> {
        self.find_group_key_and_type(name, path, "PBXVariantGroup")
    }

    fn find_group_key_and_type(
        &self,
        name: Option<&str>,
        path: Option<&str>,
        group_type: &str,
    ) -> Option<String> {
        if name.is_none() && path.is_none() {
            return None;
        }
        let section = self.section(group_type)?;
        for (key, value) in section.non_comment_entries() {
            let Some(group) = value.as_mapping() else {
                continue;
            };
            if let Some(name) = name {
                let have = group.string("name");
                if have != name && have != quoted(name) {
                    continue;
                }
            }
            if let Some(path) = path {
                let have = group.string("path");
                if have != path && have != quoted(path) {
                    continue;
                }
            }
            return Some(key.to_string());
        }
        None
    }

    // =========================================================================
    // Creation and removal
    // =========================================================================

    /// Create a `PBXGroup` whose `children` cover `file_paths`: paths
    /// already referenced reuse their file reference (matching the stored
    /// path quoted or not), unknown paths get fresh file-reference and
    /// build-file records. Returns the new group's UUID.
    pub fn add_pbx_group(
        &mut self,
        file_paths: &[&str],
        name: &str,
        path: &str,
        source_tree: &str,
    ) -> Result<String> {
        let group_uuid = self.generate_uuid();
        let mut group = OrderedMap::from_entries([
            ("isa", Value::from("PBXGroup")),
            ("children", Value::Sequence(Vec::new())),
            ("name", Value::from(name)),
            ("sourceTree", Value::from(source_tree)),
        ]);
        if !path.is_empty() {
            group.set("path", path);
        }
        if source_tree.is_empty() {
            group.set("sourceTree", tables::DEFAULT_SOURCE_TREE);
        }

        // Stored path -> (file reference key, basename).
        let mut references: HashMap<String, (String, String)> = HashMap::new();
        if let Some(section) = self.section("PBXFileReference") {
            for (key, value) in section.comment_entries() {
                let Some(basename) = value.as_str() else {
                    continue;
                };
                if basename.is_empty() {
                    continue;
                }
                let file_ref = strip_comment_key(key);
                let Some(record) = section.mapping(file_ref) else {
                    continue;
                };
                let record_path = record.string("path");
                if record_path.is_empty() {
                    continue;
                }
                references.insert(
                    record_path.to_string(),
                    (file_ref.to_string(), basename.to_string()),
                );
            }
        }

        for file_path in file_paths {
            let reference = references
                .get(*file_path)
                .or_else(|| references.get(&quoted(file_path)));
            if let Some((file_ref, basename)) = reference {
                add_to_list(
                    &mut group,
                    "children",
                    CommentedEntry::new(file_ref.clone(), basename.clone()).into_value(),
                );
                continue;
            }

            let mut file = PbxFile::new(file_path, &PbxFileOptions::default())?;
            file.uuid = self.generate_uuid();
            file.file_ref = self.generate_uuid();
            self.add_to_pbx_file_reference_section(&file);
            self.add_to_pbx_build_file_section(&file);
            add_to_list(&mut group, "children", group_child(&file).into_value());
        }

        let section = self.section_mut("PBXGroup");
        section.set(group_uuid.clone(), Value::Mapping(group));
        section.set(comment_key(&group_uuid), name);
        Ok(group_uuid)
    }

    /// Remove the first `PBXGroup` whose comment equals `name`, with its
    /// `_comment` companion.
    pub fn remove_pbx_group(&mut self, name: &str) {
        let Some(key) = self.pbx_group_key_by_name(name) else {
            return;
        };
        let section = self.section_mut("PBXGroup");
        section.delete(&key);
        section.delete(&comment_key(&key));
    }

    /// Create an empty named group, returning its UUID.
    pub fn pbx_create_group(&mut self, name: &str, path: &str) -> String {
        self.pbx_create_group_with_type(name, path, "PBXGroup")
    }

    /// Create an empty variant group, returning its UUID.
    pub fn pbx_create_variant_group(&mut self, name: &str) -> String {
        self.pbx_create_group_with_type(name, "", "PBXVariantGroup")
    }

    fn pbx_create_group_with_type(&mut self, name: &str, path: &str, group_type: &str) -> String {
        let mut model = OrderedMap::from_entries([
            ("isa", Value::from(group_type)),
            ("children", Value::Sequence(Vec::new())),
            ("name", Value::from(name)),
            ("sourceTree", Value::from(tables::DEFAULT_SOURCE_TREE)),
        ]);
        if !path.is_empty() {
            model.set("path", path);
        }
        let key = self.generate_uuid();
        let section = self.section_mut(group_type);
        section.set(key.clone(), Value::Mapping(model));
        section.set(comment_key(&key), name);
        key
    }

    // =========================================================================
    // Membership by name
    // =========================================================================

    /// Attach the file to the group named `group_name`, creating the group
    /// (with the file as its only child) when it does not exist.
    pub(crate) fn add_to_pbx_group(&mut self, file: &PbxFile, group_name: &str) -> Result<()> {
        match self.pbx_group_key_by_name(group_name) {
            None => {
                self.add_pbx_group(&[file.path.as_str()], group_name, "", "")?;
            }
            Some(key) => {
                let child = group_child(file).into_value();
                if let Some(group) = self.section_mut("PBXGroup").mapping_mut(&key) {
                    add_to_list(group, "children", child);
                }
            }
        }
        Ok(())
    }

    /// Detach the file from the group named `group_name`, matching children
    /// by file reference and basename.
    pub(crate) fn remove_from_pbx_group(&mut self, file: &PbxFile, group_name: &str) {
        let Some(key) = self.pbx_group_key_by_name(group_name) else {
            return;
        };
        let child = group_child(file);
        if let Some(group) = self.section_mut("PBXGroup").mapping_mut(&key) {
            remove_from_list(
                group,
                "children",
                |entry| {
                    entry.as_mapping().is_some_and(|map| {
                        map.string("value") == child.value && map.string("comment") == child.comment
                    })
                },
                false,
            );
        }
    }

    pub(crate) fn add_to_plugins_pbx_group(&mut self, file: &PbxFile) -> Result<()> {
        self.add_to_pbx_group(file, "Plugins")
    }

    pub(crate) fn remove_from_plugins_pbx_group(&mut self, file: &PbxFile) {
        self.remove_from_pbx_group(file, "Plugins");
    }

    pub(crate) fn add_to_resources_pbx_group(&mut self, file: &PbxFile) -> Result<()> {
        self.add_to_pbx_group(file, "Resources")
    }

    pub(crate) fn remove_from_resources_pbx_group(&mut self, file: &PbxFile) {
        self.remove_from_pbx_group(file, "Resources");
    }

    pub(crate) fn add_to_frameworks_pbx_group(&mut self, file: &PbxFile) -> Result<()> {
        self.add_to_pbx_group(file, "Frameworks")
    }

    pub(crate) fn remove_from_frameworks_pbx_group(&mut self, file: &PbxFile) {
        self.remove_from_pbx_group(file, "Frameworks");
    }

    pub(crate) fn add_to_products_pbx_group(&mut self, file: &PbxFile) -> Result<()> {
        self.add_to_pbx_group(file, "Products")
    }

    pub(crate) fn remove_from_products_pbx_group(&mut self, file: &PbxFile) {
        self.remove_from_pbx_group(file, "Products");
    }

    // =========================================================================
    // Membership by key
    // =========================================================================

    /// Append a child entry to the group with `group_key` in the bucket for
    /// `group_type`. Groups without a `children` sequence are left alone.
    pub(crate) fn add_to_group_by_key_and_type(
        &mut self,
        child: Value,
        group_key: &str,
        group_type: &str,
    ) {
        let Some(group) = self.section_mut(group_type).mapping_mut(group_key) else {
            return;
        };
        if let Some(children) = group.sequence_mut("children") {
            children.push(child);
        }
    }

    pub(crate) fn add_to_pbx_group_by_key(&mut self, file: &PbxFile, group_key: &str) {
        self.add_to_group_by_key_and_type(group_child(file).into_value(), group_key, "PBXGroup");
    }

    pub(crate) fn add_to_pbx_variant_group(&mut self, file: &PbxFile, group_key: &str) {
        self.add_to_group_by_key_and_type(
            group_child(file).into_value(),
            group_key,
            "PBXVariantGroup",
        );
    }

    fn remove_from_group_by_key_and_type(
        &mut self,
        file: &PbxFile,
        group_key: &str,
        group_type: &str,
    ) {
        let child = group_child(file);
        let Some(group) = self.section_mut(group_type).mapping_mut(group_key) else {
            return;
        };
        remove_from_list(
            group,
            "children",
            |entry| {
                entry.as_mapping().is_some_and(|map| {
                    map.string("value") == child.value && map.string("comment") == child.comment
                })
            },
            false,
        );
    }

    pub(crate) fn remove_from_pbx_group_by_key(&mut self, file: &PbxFile, group_key: &str) {
        self.remove_from_group_by_key_and_type(file, group_key, "PBXGroup");
    }

    pub(crate) fn remove_from_pbx_variant_group(&mut self, file: &PbxFile, group_key: &str) {
        self.remove_from_group_by_key_and_type(file, group_key, "PBXVariantGroup");
    }

    // =========================================================================
    // Localization
    // =========================================================================

    /// Create a `PBXVariantGroup` for localized counterparts of `name`, put
    /// it under the `Resources` group, and bind it into the resources build
    /// phase through a fresh build file.
    pub fn add_localization_variant_group(&mut self, name: &str) -> Result<PbxFile> {
        let group_key = self.pbx_create_variant_group(name);
        let resources_key = self.find_pbx_group_key(Some("Resources"), None);

        let mut comment = String::new();
        if let Some(group) = self.group_by_key_and_type(&group_key, "PBXGroup") {
            comment = group.string("name").to_string();
        } else if let Some(group) = self.group_by_key_and_type(&group_key, "PBXVariantGroup") {
            comment = group.string("name").to_string();
        }
        if let Some(resources_key) = resources_key {
            self.add_to_group_by_key_and_type(
                CommentedEntry::new(group_key.clone(), comment).into_value(),
                &resources_key,
                "PBXGroup",
            );
        }

        let file = PbxFile {
            uuid: self.generate_uuid(),
            file_ref: group_key,
            basename: name.to_string(),
            group: "Resources".to_string(),
            ..PbxFile::default()
        };
        self.add_to_pbx_build_file_section(&file);
        self.add_to_pbx_resources_build_phase(&file);
        Ok(file)
    }
}
