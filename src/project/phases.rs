//! Build phases: membership of files in the standard phases, phase lookup
//! through a target's `buildPhases` list, and `add_build_phase` with its
//! copy-files and shell-script payloads.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::tree::{comment_key, quoted, strip_comment_key, CommentedEntry, OrderedMap, Value};

use super::files::build_phase_entry;
use super::pbx_file::{PbxFile, PbxFileOptions};
use super::{add_to_list, remove_from_list, tables, PbxProject};

/// Kind-specific payload for [`PbxProject::add_build_phase`].
///
/// The payload must match the phase isa: copy-files phases need a target
/// type to pick their destination code, shell-script phases need the script
/// and its input/output paths, and the plain compile/link/resource phases
/// take no payload.
#[derive(Debug, Clone, Default)]
pub enum BuildPhaseOptions {
    #[default]
    None,
    CopyFiles {
        target_type: String,
    },
    ShellScript(ShellScriptPhase),
}

/// Payload of a `PBXShellScriptBuildPhase`.
#[derive(Debug, Clone, Default)]
pub struct ShellScriptPhase {
    pub input_paths: Vec<String>,
    pub output_paths: Vec<String>,
    pub shell_script: String,
}

impl PbxProject {
    // =========================================================================
    // Phase lookup
    // =========================================================================

    /// The UUID of the phase labelled `group` in `target`'s `buildPhases`.
    pub fn build_phase(&self, group: &str, target: &str) -> Option<String> {
        if target.is_empty() {
            return None;
        }
        let native = self.section("PBXNativeTarget")?.mapping(target)?;
        for entry in native.sequence("buildPhases")? {
            let Some(entry) = entry.as_mapping() else {
                continue;
            };
            if entry.string("comment") == group {
                return Some(entry.string("value").to_string());
            }
        }
        None
    }

    /// The record of the phase with isa `isa` labelled `group`, scoped to
    /// `target` when the target lists such a phase.
    pub fn build_phase_object(&self, isa: &str, group: &str, target: &str) -> Option<&OrderedMap> {
        let key = self.build_phase_object_key(isa, group, target)?;
        self.section(isa)?.mapping(&key)
    }

    pub(crate) fn build_phase_object_key(
        &self,
        isa: &str,
        group: &str,
        target: &str,
    ) -> Option<String> {
        let section = self.section(isa)?;
        let scoped = self.build_phase(group, target);
        for (key, value) in section.comment_entries() {
            let base = strip_comment_key(key);
            if let Some(required) = &scoped {
                if required != base {
                    continue;
                }
            }
            if value.as_str() == Some(group) {
                return Some(base.to_string());
            }
        }
        None
    }

    // =========================================================================
    // Phase membership
    // =========================================================================

    fn add_to_build_phase_files(&mut self, isa: &str, group: &str, file: &PbxFile) {
        let Some(key) = self.build_phase_object_key(isa, group, &file.target) else {
            return;
        };
        let entry = build_phase_entry(file);
        if let Some(phase) = self.section_mut(isa).mapping_mut(&key) {
            add_to_list(phase, "files", entry);
        }
    }

    fn remove_from_build_phase_files(&mut self, isa: &str, group: &str, file: &PbxFile) {
        let Some(key) = self.build_phase_object_key(isa, group, &file.target) else {
            return;
        };
        let comment = super::files::long_comment(file);
        if let Some(phase) = self.section_mut(isa).mapping_mut(&key) {
            remove_from_list(
                phase,
                "files",
                |entry| {
                    entry
                        .as_mapping()
                        .is_some_and(|map| map.string("comment") == comment)
                },
                false,
            );
        }
    }

    pub(crate) fn add_to_pbx_sources_build_phase(&mut self, file: &PbxFile) {
        self.add_to_build_phase_files("PBXSourcesBuildPhase", "Sources", file);
    }

    pub(crate) fn remove_from_pbx_sources_build_phase(&mut self, file: &PbxFile) {
        self.remove_from_build_phase_files("PBXSourcesBuildPhase", "Sources", file);
    }

    pub(crate) fn add_to_pbx_resources_build_phase(&mut self, file: &PbxFile) {
        self.add_to_build_phase_files("PBXResourcesBuildPhase", "Resources", file);
    }

    pub(crate) fn remove_from_pbx_resources_build_phase(&mut self, file: &PbxFile) {
        self.remove_from_build_phase_files("PBXResourcesBuildPhase", "Resources", file);
    }

    pub(crate) fn add_to_pbx_frameworks_build_phase(&mut self, file: &PbxFile) {
        self.add_to_build_phase_files("PBXFrameworksBuildPhase", "Frameworks", file);
    }

    pub(crate) fn remove_from_pbx_frameworks_build_phase(&mut self, file: &PbxFile) {
        self.remove_from_build_phase_files("PBXFrameworksBuildPhase", "Frameworks", file);
    }

    pub(crate) fn add_to_pbx_embed_frameworks_build_phase(&mut self, file: &PbxFile) {
        self.add_to_build_phase_files("PBXCopyFilesBuildPhase", "Embed Frameworks", file);
    }

    pub(crate) fn remove_from_pbx_embed_frameworks_build_phase(&mut self, file: &PbxFile) {
        self.remove_from_build_phase_files("PBXCopyFilesBuildPhase", "Embed Frameworks", file);
    }

    pub(crate) fn add_to_pbx_copy_files_build_phase(&mut self, file: &PbxFile) {
        self.add_to_build_phase_files("PBXCopyFilesBuildPhase", "Copy Files", file);
    }

    pub(crate) fn remove_from_pbx_copy_files_build_phase(&mut self, file: &PbxFile) {
        self.remove_from_build_phase_files("PBXCopyFilesBuildPhase", "Copy Files", file);
    }

    // =========================================================================
    // Phase creation
    // =========================================================================

    /// Create a build phase labelled `comment` on `target` (the first
    /// target when `None`) and fill its `files` from `file_paths`: paths
    /// already bound to a build file reuse it, unknown paths get fresh
    /// file-reference and build-file records. Returns the phase UUID.
    pub fn add_build_phase(
        &mut self,
        file_paths: &[&str],
        isa: &str,
        comment: &str,
        target: Option<&str>,
        options: BuildPhaseOptions,
        subfolder_path: Option<&str>,
    ) -> Result<String> {
        let target_uuid = match target {
            Some(target) if !target.is_empty() => target.to_string(),
            _ => self.get_first_target()?.0,
        };

        let mut phase = OrderedMap::from_entries([
            ("isa", Value::from(isa)),
            ("buildActionMask", Value::from(2147483647i64)),
            ("files", Value::Sequence(Vec::new())),
            ("runOnlyForDeploymentPostprocessing", Value::from(0i64)),
        ]);
        match (&options, isa) {
            (BuildPhaseOptions::CopyFiles { target_type }, "PBXCopyFilesBuildPhase") => {
                extend_copy_files_phase(&mut phase, target_type, subfolder_path, comment)?;
            }
            (BuildPhaseOptions::ShellScript(script), "PBXShellScriptBuildPhase") => {
                extend_shell_script_phase(&mut phase, script, comment);
            }
            (BuildPhaseOptions::None, "PBXCopyFilesBuildPhase" | "PBXShellScriptBuildPhase") => {
                return Err(Error::invalid_argument(format!(
                    "{isa} requires a matching options payload"
                )));
            }
            (BuildPhaseOptions::None, _) => {}
            (_, _) => {
                return Err(Error::invalid_argument(format!(
                    "options payload does not match {isa}"
                )));
            }
        }

        // Stored file-reference path -> existing build file.
        let mut existing: HashMap<String, PbxFile> = HashMap::new();
        if let Some(build_files) = self.section("PBXBuildFile") {
            let references = self.section("PBXFileReference");
            for (key, _) in build_files.comment_entries() {
                let build_key = strip_comment_key(key);
                let Some(record) = build_files.mapping(build_key) else {
                    continue;
                };
                let Some(reference) =
                    references.and_then(|section| section.mapping(record.string("fileRef")))
                else {
                    continue;
                };
                let stored_path = reference.string("path");
                if stored_path.is_empty() {
                    continue;
                }
                let probe = PbxFile::new(
                    crate::tree::unquoted(stored_path),
                    &PbxFileOptions::default(),
                )?;
                existing.insert(
                    stored_path.to_string(),
                    PbxFile {
                        uuid: build_key.to_string(),
                        basename: probe.basename,
                        group: probe.group,
                        ..PbxFile::default()
                    },
                );
            }
        }

        let phase_uuid = self.generate_uuid();
        for file_path in file_paths {
            let reused = existing
                .get(*file_path)
                .or_else(|| existing.get(&quoted(file_path)));
            if let Some(build_file) = reused {
                add_to_list(&mut phase, "files", build_phase_entry(build_file));
                continue;
            }
            let mut file = PbxFile::new(file_path, &PbxFileOptions::default())?;
            file.uuid = self.generate_uuid();
            file.file_ref = self.generate_uuid();
            self.add_to_pbx_file_reference_section(&file);
            self.add_to_pbx_build_file_section(&file);
            add_to_list(&mut phase, "files", build_phase_entry(&file));
        }

        let section = self.section_mut(isa);
        if !section.has(&phase_uuid) {
            section.set(phase_uuid.clone(), Value::Mapping(phase));
            section.set(comment_key(&phase_uuid), comment);
        }
        if let Some(target_obj) = self.section_mut("PBXNativeTarget").mapping_mut(&target_uuid) {
            if target_obj.has("buildPhases") {
                add_to_list(
                    target_obj,
                    "buildPhases",
                    CommentedEntry::new(phase_uuid.clone(), comment).into_value(),
                );
            }
        }
        Ok(phase_uuid)
    }
}

fn extend_copy_files_phase(
    phase: &mut OrderedMap,
    target_type: &str,
    subfolder_path: Option<&str>,
    name: &str,
) -> Result<()> {
    let destination = tables::destination_for_targettype(target_type)
        .ok_or_else(|| Error::invalid_argument(format!("unknown target type: {target_type}")))?;
    let spec = tables::subfolderspec_for_destination(destination).ok_or_else(|| {
        Error::invalid_argument(format!("unknown copy destination: {destination}"))
    })?;
    phase.set("name", quoted(name));
    let dst_path = match subfolder_path {
        Some(path) if !path.is_empty() => path.to_string(),
        _ => "\"\"".to_string(),
    };
    phase.set("dstPath", dst_path);
    phase.set("dstSubfolderSpec", spec);
    Ok(())
}

fn extend_shell_script_phase(phase: &mut OrderedMap, script: &ShellScriptPhase, name: &str) {
    phase.set("name", quoted(name));
    phase.set(
        "inputPaths",
        Value::Sequence(script.input_paths.iter().map(|p| Value::from(p.as_str())).collect()),
    );
    phase.set(
        "outputPaths",
        Value::Sequence(
            script
                .output_paths
                .iter()
                .map(|p| Value::from(p.as_str()))
                .collect(),
        ),
    );
    phase.set("shellPath", "/bin/sh");
    phase.set("shellScript", quoted(&script.shell_script.replace('"', "\\\"")));
}
