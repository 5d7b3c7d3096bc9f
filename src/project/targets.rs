//! Native targets: creation with their configuration lists and product
//! files, and target-to-target dependencies through container item proxies.

use tracing::debug;

use crate::error::{Error, Result};
use crate::tree::{comment_key, quoted, unquoted, CommentedEntry, OrderedMap, Value};

use super::pbx_file::PbxFileOptions;
use super::{add_to_list, tables, PbxProject};

impl PbxProject {
    /// Wrap freshly minted `XCBuildConfiguration` records into an
    /// `XCConfigurationList`, registering everything with comments.
    /// Returns the list's UUID.
    pub(crate) fn add_xc_configuration_list(
        &mut self,
        configurations: Vec<OrderedMap>,
        default_configuration_name: &str,
        comment: &str,
    ) -> String {
        let list_uuid = self.generate_uuid();
        let mut list = OrderedMap::from_entries([
            ("isa", Value::from("XCConfigurationList")),
            ("defaultConfigurationIsVisible", Value::from(0i64)),
            (
                "defaultConfigurationName",
                Value::from(default_configuration_name),
            ),
        ]);

        let mut build_configurations = Vec::new();
        for configuration in configurations {
            let configuration_uuid = self.generate_uuid();
            let configuration_name = configuration.string("name").to_string();
            let section = self.section_mut("XCBuildConfiguration");
            section.set(configuration_uuid.clone(), Value::Mapping(configuration));
            section.set(comment_key(&configuration_uuid), configuration_name.clone());
            build_configurations
                .push(CommentedEntry::new(configuration_uuid, configuration_name).into_value());
        }
        list.set("buildConfigurations", Value::Sequence(build_configurations));

        let section = self.section_mut("XCConfigurationList");
        section.set(list_uuid.clone(), Value::Mapping(list));
        section.set(comment_key(&list_uuid), comment);
        list_uuid
    }

    /// Create a native target of one of the twelve known kinds: Debug and
    /// Release configurations, a configuration list, a product file in the
    /// `Products` group, the `PBXNativeTarget` record, registration with
    /// the first project, and the embed/dependency wiring the kind calls
    /// for. Returns the new target's UUID.
    pub fn add_target(
        &mut self,
        name: &str,
        target_type: &str,
        subfolder: &str,
        bundle_id: &str,
    ) -> Result<String> {
        let target_name = name.trim().to_string();
        if target_name.is_empty() {
            return Err(Error::invalid_argument("target name missing"));
        }
        if target_type.is_empty() {
            return Err(Error::invalid_argument("target type missing"));
        }
        let product_type = tables::product_type_for_target_type(target_type)
            .ok_or_else(|| Error::invalid_argument(format!("invalid target type: {target_type}")))?;
        let product_file_type = tables::file_type_for_product_type(product_type)
            .ok_or_else(|| Error::invalid_argument(format!("invalid product type: {product_type}")))?;

        let target_uuid = self.generate_uuid();
        let target_subfolder = if subfolder.is_empty() {
            target_name.clone()
        } else {
            subfolder.to_string()
        };

        let info_plist = quoted(&format!(
            "{target_subfolder}/{target_subfolder}-Info.plist"
        ));
        let runpath = "\"$(inherited) @executable_path/Frameworks @executable_path/../../Frameworks\"";
        let debug_settings = OrderedMap::from_entries([
            (
                "GCC_PREPROCESSOR_DEFINITIONS",
                Value::Sequence(vec![
                    Value::from("\"DEBUG=1\""),
                    Value::from("\"$(inherited)\""),
                ]),
            ),
            ("INFOPLIST_FILE", Value::from(info_plist.clone())),
            ("LD_RUNPATH_SEARCH_PATHS", Value::from(runpath)),
            ("PRODUCT_NAME", Value::from(quoted(&target_name))),
            ("SKIP_INSTALL", Value::from("YES")),
        ]);
        let release_settings = OrderedMap::from_entries([
            ("INFOPLIST_FILE", Value::from(info_plist)),
            ("LD_RUNPATH_SEARCH_PATHS", Value::from(runpath)),
            ("PRODUCT_NAME", Value::from(quoted(&target_name))),
            ("SKIP_INSTALL", Value::from("YES")),
        ]);
        let mut configurations = vec![
            OrderedMap::from_entries([
                ("name", Value::from("Debug")),
                ("isa", Value::from("XCBuildConfiguration")),
                ("buildSettings", Value::Mapping(debug_settings)),
            ]),
            OrderedMap::from_entries([
                ("name", Value::from("Release")),
                ("isa", Value::from("XCBuildConfiguration")),
                ("buildSettings", Value::Mapping(release_settings)),
            ]),
        ];
        if !bundle_id.is_empty() {
            for configuration in &mut configurations {
                configuration
                    .ensure_mapping("buildSettings")
                    .set("PRODUCT_BUNDLE_IDENTIFIER", quoted(bundle_id));
            }
        }
        let configuration_list_uuid = self.add_xc_configuration_list(
            configurations,
            "Release",
            &format!("Build configuration list for PBXNativeTarget \"{target_name}\""),
        );

        let product_file = self.add_product_file_impl(
            &target_name,
            &PbxFileOptions {
                group: Some("Copy Files".to_string()),
                target: Some(target_uuid.clone()),
                explicit_file_type: Some(product_file_type.to_string()),
                ..PbxFileOptions::default()
            },
        )?;
        self.add_to_pbx_build_file_section(&product_file);

        let target = OrderedMap::from_entries([
            ("isa", Value::from("PBXNativeTarget")),
            ("name", Value::from(quoted(&target_name))),
            ("productName", Value::from(quoted(&target_name))),
            ("productReference", Value::from(product_file.file_ref.clone())),
            ("productType", Value::from(quoted(product_type))),
            (
                "buildConfigurationList",
                Value::from(configuration_list_uuid),
            ),
            ("buildPhases", Value::Sequence(Vec::new())),
            ("buildRules", Value::Sequence(Vec::new())),
            ("dependencies", Value::Sequence(Vec::new())),
        ]);
        self.add_to_pbx_native_target_section(&target_uuid, target);

        // Extension-style products get embedded into a parent target.
        match target_type {
            "app_extension" => {
                let first_target = self.get_first_target()?.0;
                self.add_build_phase(
                    &[],
                    "PBXCopyFilesBuildPhase",
                    "Copy Files",
                    Some(&first_target),
                    super::BuildPhaseOptions::CopyFiles {
                        target_type: target_type.to_string(),
                    },
                    None,
                )?;
                self.add_to_pbx_copy_files_build_phase(&product_file);
            }
            "watch2_app" => {
                let first_target = self.get_first_target()?.0;
                let bundle = format!("{target_name}.app");
                self.add_build_phase(
                    &[bundle.as_str()],
                    "PBXCopyFilesBuildPhase",
                    "Embed Watch Content",
                    Some(&first_target),
                    super::BuildPhaseOptions::CopyFiles {
                        target_type: target_type.to_string(),
                    },
                    Some("\"$(CONTENTS_FOLDER_PATH)/Watch\""),
                )?;
            }
            "watch2_extension" => {
                let watch_app_type =
                    tables::product_type_for_target_type("watch2_app").unwrap_or_default();
                if let Some((watch_uuid, _)) = self.get_target(watch_app_type) {
                    let bundle = format!("{target_name}.appex");
                    self.add_build_phase(
                        &[bundle.as_str()],
                        "PBXCopyFilesBuildPhase",
                        "Embed App Extensions",
                        Some(&watch_uuid),
                        super::BuildPhaseOptions::CopyFiles {
                            target_type: target_type.to_string(),
                        },
                        None,
                    )?;
                }
            }
            _ => {}
        }

        self.add_to_pbx_project_section(&target_uuid, &target_name);

        // The new target becomes a dependency of its parent: the watch app
        // for watch extensions, the first target otherwise.
        if target_type == "watch2_extension" {
            let watch_app_type =
                tables::product_type_for_target_type("watch2_app").unwrap_or_default();
            if let Some((watch_uuid, _)) = self.get_target(watch_app_type) {
                self.add_target_dependency(&watch_uuid, &[&target_uuid])?;
            }
        } else if let Ok((first_target, _)) = self.get_first_target() {
            if first_target != target_uuid {
                self.add_target_dependency(&first_target, &[&target_uuid])?;
            }
        }

        debug!(target = %target_name, uuid = %target_uuid, "target added");
        Ok(target_uuid)
    }

    /// Wire `dependency_targets` as dependencies of `target`: one
    /// `PBXContainerItemProxy` and one `PBXTargetDependency` per
    /// dependency, and an entry in the target's `dependencies` sequence.
    pub fn add_target_dependency(
        &mut self,
        target: &str,
        dependency_targets: &[&str],
    ) -> Result<()> {
        if target.is_empty() {
            return Err(Error::invalid_argument("target uuid missing"));
        }
        let native_has = |project: &Self, uuid: &str| {
            project
                .section("PBXNativeTarget")
                .is_some_and(|section| section.has(uuid))
        };
        if !native_has(self, target) {
            return Err(Error::not_found(format!("target {target}")));
        }
        for dependency in dependency_targets {
            if !native_has(self, dependency) {
                return Err(Error::not_found(format!("dependency target {dependency}")));
            }
        }

        let (root_object, root_comment) = match self.project() {
            Some(project) => (
                project.string("rootObject").to_string(),
                project.comment_for("rootObject").map(String::from),
            ),
            None => (String::new(), None),
        };

        for dependency in dependency_targets {
            let dependency = dependency.to_string();
            let (dependency_name, dependency_comment) = {
                let section = self.section("PBXNativeTarget");
                let name = section
                    .and_then(|s| s.mapping(&dependency))
                    .map(|t| unquoted(t.string("name")).to_string())
                    .unwrap_or_default();
                let comment = section
                    .and_then(|s| s.comment_for(&dependency))
                    .map(String::from)
                    .unwrap_or_default();
                (name, comment)
            };

            let dependency_uuid = self.generate_uuid();
            let proxy_uuid = self.generate_uuid();

            let mut proxy = OrderedMap::from_entries([
                ("isa", Value::from("PBXContainerItemProxy")),
                ("containerPortal", Value::from(root_object.clone())),
            ]);
            if let Some(root_comment) = &root_comment {
                proxy.set(comment_key("containerPortal"), root_comment.clone());
            }
            proxy.set("proxyType", 1i64);
            proxy.set("remoteGlobalIDString", dependency.clone());
            proxy.set("remoteInfo", dependency_name);

            let mut target_dependency = OrderedMap::from_entries([
                ("isa", Value::from("PBXTargetDependency")),
                ("target", Value::from(dependency.clone())),
            ]);
            if !dependency_comment.is_empty() {
                target_dependency.set(comment_key("target"), dependency_comment);
            }
            target_dependency.set("targetProxy", proxy_uuid.clone());
            target_dependency.set(comment_key("targetProxy"), "PBXContainerItemProxy");

            let proxies = self.section_mut("PBXContainerItemProxy");
            proxies.set(proxy_uuid.clone(), Value::Mapping(proxy));
            proxies.set(comment_key(&proxy_uuid), "pbxContainerItemProxy");

            let dependencies = self.section_mut("PBXTargetDependency");
            dependencies.set(dependency_uuid.clone(), Value::Mapping(target_dependency));
            dependencies.set(comment_key(&dependency_uuid), "pbxTargetDependency");

            if let Some(target_obj) = self.section_mut("PBXNativeTarget").mapping_mut(target) {
                add_to_list(
                    target_obj,
                    "dependencies",
                    CommentedEntry::new(dependency_uuid, "pbxTargetDependency").into_value(),
                );
            }
        }
        Ok(())
    }

    fn add_to_pbx_project_section(&mut self, target_uuid: &str, target_name: &str) {
        let entry = CommentedEntry::new(target_uuid, target_name).into_value();
        if let Some(project) = self.first_project_mut() {
            add_to_list(project, "targets", entry);
        }
    }

    fn add_to_pbx_native_target_section(&mut self, uuid: &str, target: OrderedMap) {
        let comment = unquoted(target.string("name")).to_string();
        let section = self.section_mut("PBXNativeTarget");
        section.set(uuid.to_string(), Value::Mapping(target));
        section.set(comment_key(uuid), comment);
    }
}
