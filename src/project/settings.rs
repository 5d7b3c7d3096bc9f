//! Build settings, search paths, target attributes and known regions.

use std::collections::HashSet;

use tracing::debug;

use crate::error::{Error, Result};
use crate::tree::{is_comment_key, quoted, unquoted, OrderedMap, Value};

use super::pbx_file::{dirname_of, PbxFile};
use super::{add_to_list, remove_from_list, PbxProject};

impl PbxProject {
    // =========================================================================
    // Build properties
    // =========================================================================

    /// Set `prop` in the `buildSettings` of every build configuration, or
    /// only those named `build_name`.
    pub fn add_build_property(
        &mut self,
        prop: &str,
        value: impl Into<Value>,
        build_name: Option<&str>,
    ) {
        let value = value.into();
        let section = self.section_mut("XCBuildConfiguration");
        for (key, entry) in section.iter_mut() {
            if is_comment_key(key) {
                continue;
            }
            let Some(configuration) = entry.as_mapping_mut() else {
                continue;
            };
            if build_name.is_none_or(|name| configuration.string("name") == name) {
                configuration
                    .ensure_mapping("buildSettings")
                    .set(prop, value.clone());
            }
        }
    }

    /// Delete `prop` from the matching build configurations.
    pub fn remove_build_property(&mut self, prop: &str, build_name: Option<&str>) {
        let section = self.section_mut("XCBuildConfiguration");
        for (key, entry) in section.iter_mut() {
            if is_comment_key(key) {
                continue;
            }
            let Some(configuration) = entry.as_mapping_mut() else {
                continue;
            };
            if build_name.is_none_or(|name| configuration.string("name") == name) {
                if let Some(settings) = configuration.mapping_mut("buildSettings") {
                    settings.delete(prop);
                }
            }
        }
    }

    /// Set `prop` in the build configurations selected by configuration
    /// name and/or owning target (resolved through the target's
    /// configuration list).
    pub fn update_build_property(
        &mut self,
        prop: &str,
        value: impl Into<Value>,
        build: Option<&str>,
        target_name: Option<&str>,
    ) {
        let value = value.into();
        let valid = target_name.map(|name| self.valid_configs_for_target(name));
        let section = self.section_mut("XCBuildConfiguration");
        for (key, entry) in section.iter_mut() {
            if is_comment_key(key) {
                continue;
            }
            if let Some(valid) = &valid {
                if !valid.contains(key) {
                    continue;
                }
            }
            let Some(configuration) = entry.as_mapping_mut() else {
                continue;
            };
            if build.is_none_or(|name| configuration.string("name") == name) {
                configuration
                    .ensure_mapping("buildSettings")
                    .set(prop, value.clone());
            }
        }
    }

    /// The first matching configuration's value for `prop`, as a string
    /// list (a scalar yields one element).
    pub fn get_build_property(
        &self,
        prop: &str,
        build: Option<&str>,
        target_name: Option<&str>,
    ) -> Vec<String> {
        let valid = target_name.map(|name| self.valid_configs_for_target(name));
        let Some(section) = self.section("XCBuildConfiguration") else {
            return Vec::new();
        };
        for (key, entry) in section.non_comment_entries() {
            if let Some(valid) = &valid {
                if !valid.contains(key) {
                    continue;
                }
            }
            let Some(configuration) = entry.as_mapping() else {
                continue;
            };
            if build.is_none_or(|name| configuration.string("name") == name) {
                let Some(settings) = configuration.mapping("buildSettings") else {
                    return Vec::new();
                };
                return match settings.get(prop) {
                    Some(Value::String(s)) => vec![s.clone()],
                    Some(Value::Sequence(seq)) => seq
                        .iter()
                        .filter_map(|item| item.as_str().map(String::from))
                        .collect(),
                    _ => Vec::new(),
                };
            }
        }
        Vec::new()
    }

    /// All build configurations named `name`, keyed by UUID.
    pub fn get_build_config_by_name(&self, name: &str) -> Vec<(String, &OrderedMap)> {
        let Some(section) = self.section("XCBuildConfiguration") else {
            return Vec::new();
        };
        section
            .non_comment_entries()
            .filter_map(|(key, entry)| {
                let configuration = entry.as_mapping()?;
                (configuration.string("name") == name).then(|| (key.to_string(), configuration))
            })
            .collect()
    }

    /// Quote and set `PRODUCT_NAME` across every configuration.
    pub fn update_product_name(&mut self, name: &str) {
        self.update_build_property("PRODUCT_NAME", quoted(name), None, None);
    }

    /// The build-configuration UUIDs reachable from the named target's
    /// `buildConfigurationList`.
    fn valid_configs_for_target(&self, target_name: &str) -> HashSet<String> {
        let mut valid = HashSet::new();
        let Some((_, target)) = self.pbx_target_by_name(target_name) else {
            return valid;
        };
        let list_key = target.string("buildConfigurationList").to_string();
        let Some(list) = self
            .section("XCConfigurationList")
            .and_then(|section| section.mapping(&list_key))
        else {
            return valid;
        };
        if let Some(configurations) = list.sequence("buildConfigurations") {
            for entry in configurations {
                if let Some(entry) = entry.as_mapping() {
                    valid.insert(entry.string("value").to_string());
                }
            }
        }
        valid
    }

    // =========================================================================
    // Search paths
    // =========================================================================

    pub fn add_to_framework_search_paths(&mut self, file: &PbxFile) {
        self.add_to_search_paths("FRAMEWORK_SEARCH_PATHS", file);
    }

    pub fn remove_from_framework_search_paths(&mut self, file: &PbxFile) {
        self.remove_from_search_paths("FRAMEWORK_SEARCH_PATHS", file);
    }

    pub fn add_to_library_search_paths(&mut self, file: &PbxFile) {
        self.add_to_search_paths("LIBRARY_SEARCH_PATHS", file);
    }

    pub fn remove_from_library_search_paths(&mut self, file: &PbxFile) {
        self.remove_from_search_paths("LIBRARY_SEARCH_PATHS", file);
    }

    pub fn add_to_header_search_paths(&mut self, file: &PbxFile) {
        self.add_to_search_paths("HEADER_SEARCH_PATHS", file);
    }

    pub fn remove_from_header_search_paths(&mut self, file: &PbxFile) {
        self.remove_from_search_paths("HEADER_SEARCH_PATHS", file);
    }

    pub fn add_to_other_linker_flags(&mut self, file: &PbxFile) {
        self.add_to_search_paths("OTHER_LDFLAGS", file);
    }

    pub fn remove_from_other_linker_flags(&mut self, file: &PbxFile) {
        self.remove_from_search_paths("OTHER_LDFLAGS", file);
    }

    /// Append the file's computed search-path entry to `search_path_key` in
    /// every build configuration whose `PRODUCT_NAME` (unquoted) equals the
    /// project's product name. A scalar value — the `"$(inherited)"`
    /// sentinel in particular — is promoted to a one-element sequence
    /// first.
    pub(crate) fn add_to_search_paths(&mut self, search_path_key: &str, file: &PbxFile) {
        let product_name = self.product_name();
        let new_entry = self.search_path_for_file(file);
        debug!(key = search_path_key, entry = %new_entry, "extending search paths");
        let section = self.section_mut("XCBuildConfiguration");
        for (key, entry) in section.iter_mut() {
            if is_comment_key(key) {
                continue;
            }
            let Some(configuration) = entry.as_mapping_mut() else {
                continue;
            };
            let Some(settings) = configuration.mapping_mut("buildSettings") else {
                continue;
            };
            if unquoted(settings.string("PRODUCT_NAME")) != product_name {
                continue;
            }
            if let Some(Value::String(current)) = settings.get(search_path_key) {
                let current = current.clone();
                settings.set(search_path_key, Value::Sequence(vec![Value::from(current)]));
            }
            add_to_list(settings, search_path_key, Value::from(new_entry.clone()));
        }
    }

    /// Remove the file's computed search-path entry from every gated build
    /// configuration.
    pub(crate) fn remove_from_search_paths(&mut self, search_path_key: &str, file: &PbxFile) {
        let product_name = self.product_name();
        let target_entry = self.search_path_for_file(file);
        let section = self.section_mut("XCBuildConfiguration");
        for (key, entry) in section.iter_mut() {
            if is_comment_key(key) {
                continue;
            }
            let Some(configuration) = entry.as_mapping_mut() else {
                continue;
            };
            let Some(settings) = configuration.mapping_mut("buildSettings") else {
                continue;
            };
            if unquoted(settings.string("PRODUCT_NAME")) != product_name {
                continue;
            }
            remove_from_list(
                settings,
                search_path_key,
                |value| value.as_str() == Some(target_entry.as_str()),
                true,
            );
        }
    }

    /// The search-path entry contributed by one file: the plugins path for
    /// plugin files, the framework's own directory for custom frameworks,
    /// and `$(SRCROOT)/<productName>/<dir>` otherwise. The result is a
    /// quoted string containing an escaped quoted path, as Xcode stores it.
    pub(crate) fn search_path_for_file(&self, file: &PbxFile) -> String {
        let plugins_path = self
            .pbx_group_by_name("Plugins")
            .map(|group| group.string("path").to_string())
            .unwrap_or_default();

        let file_dir = dirname_of(&file.path);
        let file_dir = if file_dir == "." {
            String::new()
        } else {
            format!("/{file_dir}")
        };

        if file.plugin && !plugins_path.is_empty() {
            format!("\"\\\"$(SRCROOT)/{}\\\"\"", unquoted(&plugins_path))
        } else if file.custom_framework && !file.dirname.is_empty() {
            format!("\"\\\"{}\\\"\"", file.dirname)
        } else {
            format!("\"\\\"$(SRCROOT)/{}{}\\\"\"", self.product_name(), file_dir)
        }
    }

    // =========================================================================
    // Target attributes
    // =========================================================================

    /// Set `attributes.TargetAttributes.<target>.<prop>` on the first
    /// project, creating the `TargetAttributes` and per-target mappings on
    /// demand. Defaults to the first target.
    pub fn add_target_attribute(
        &mut self,
        prop: &str,
        value: impl Into<Value>,
        target: Option<&str>,
    ) -> Result<()> {
        let target_uuid = match target {
            Some(target) if !target.is_empty() => target.to_string(),
            _ => self.get_first_target()?.0,
        };
        let project = self
            .first_project_mut()
            .ok_or_else(|| Error::not_found("project"))?;
        let attributes = project
            .mapping_mut("attributes")
            .ok_or_else(|| Error::not_found("project attributes"))?;
        attributes
            .ensure_mapping("TargetAttributes")
            .ensure_mapping(&target_uuid)
            .set(prop, value.into());
        Ok(())
    }

    /// Delete `attributes.TargetAttributes.<target>.<prop>`.
    pub fn remove_target_attribute(&mut self, prop: &str, target: Option<&str>) -> Result<()> {
        let target_uuid = match target {
            Some(target) if !target.is_empty() => target.to_string(),
            _ => self.get_first_target()?.0,
        };
        let project = self
            .first_project_mut()
            .ok_or_else(|| Error::not_found("project"))?;
        let attributes = project
            .mapping_mut("attributes")
            .ok_or_else(|| Error::not_found("project attributes"))?;
        let target_attributes = attributes
            .mapping_mut("TargetAttributes")
            .ok_or_else(|| Error::not_found("target attributes"))?;
        if let Some(attrs) = target_attributes.mapping_mut(&target_uuid) {
            attrs.delete(prop);
        }
        Ok(())
    }

    // =========================================================================
    // Known regions
    // =========================================================================

    /// Add `name` to the first project's `knownRegions`, creating the
    /// sequence when missing. Already-present regions are left alone.
    pub fn add_known_region(&mut self, name: &str) {
        let present = self.has_known_region(name);
        let Some(project) = self.first_project_mut() else {
            return;
        };
        if !project.has("knownRegions") {
            project.set("knownRegions", Value::Sequence(vec![Value::from(name)]));
        } else if !present {
            add_to_list(project, "knownRegions", Value::from(name));
        }
    }

    /// Remove `name` from `knownRegions`; a missing region is a no-op.
    pub fn remove_known_region(&mut self, name: &str) {
        let Some(project) = self.first_project_mut() else {
            return;
        };
        remove_from_list(
            project,
            "knownRegions",
            |value| value.as_str() == Some(name),
            false,
        );
    }

    pub fn has_known_region(&self, name: &str) -> bool {
        let Ok((_, project)) = self.get_first_project() else {
            return false;
        };
        project
            .sequence("knownRegions")
            .is_some_and(|regions| regions.iter().any(|value| value.as_str() == Some(name)))
    }
}
