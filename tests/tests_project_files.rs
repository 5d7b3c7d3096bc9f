//! File-level mutations: source files, frameworks, libraries, resources,
//! copy files, and the add/remove symmetry they promise.

use pbxproj::{Error, OrderedMap, PbxFileOptions, PbxProject, Value};

mod helpers;

fn bucket<'a>(project: &'a PbxProject, isa: &str) -> &'a OrderedMap {
    project
        .get_pbx_object(isa)
        .unwrap_or_else(|| panic!("missing bucket {isa}"))
}

/// Non-comment records of a bucket, as (uuid, record) pairs.
fn records<'a>(project: &'a PbxProject, isa: &str) -> Vec<(&'a str, &'a OrderedMap)> {
    bucket(project, isa)
        .non_comment_entries()
        .filter_map(|(key, value)| value.as_mapping().map(|record| (key, record)))
        .collect()
}

fn phase_file_comments(project: &PbxProject, isa: &str, group: &str) -> Vec<String> {
    let phase = project
        .build_phase_object(isa, group, "")
        .unwrap_or_else(|| panic!("missing {group} phase"));
    phase
        .sequence("files")
        .unwrap()
        .iter()
        .filter_map(|entry| entry.as_mapping())
        .map(|entry| entry.string("comment").to_string())
        .collect()
}

#[test]
fn test_add_source_file_wires_all_four_spots() {
    let mut project = helpers::base_project();
    project
        .add_source_file("foo.m", None, PbxFileOptions::default())
        .unwrap();

    // new file reference, typed and commented
    let references = records(&project, "PBXFileReference");
    let (file_ref, reference) = references
        .iter()
        .find(|(_, record)| record.string("path") == "\"foo.m\"")
        .expect("file reference for foo.m");
    assert_eq!(reference.string("lastKnownFileType"), "sourcecode.c.objc");
    assert_eq!(
        bucket(&project, "PBXFileReference").comment_for(file_ref),
        Some("foo.m")
    );

    // new build file pointing back at it
    let build_files = records(&project, "PBXBuildFile");
    let (build_uuid, build_file) = build_files
        .iter()
        .find(|(_, record)| record.string("fileRef") == *file_ref)
        .expect("build file for foo.m");
    assert_eq!(build_file.comment_for("fileRef"), Some("foo.m"));
    assert_eq!(
        bucket(&project, "PBXBuildFile").comment_for(build_uuid),
        Some("foo.m in Sources")
    );

    // membership in the Sources phase, labelled with the long comment
    let comments = phase_file_comments(&project, "PBXSourcesBuildPhase", "Sources");
    assert!(comments.contains(&"foo.m in Sources".to_string()));

    // the Plugins group was created around the file
    let plugins = project.pbx_group_by_name("Plugins").expect("Plugins group");
    let children = plugins.sequence("children").unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(
        children[0].as_mapping().unwrap().string("comment"),
        "foo.m"
    );
}

#[test]
fn test_duplicate_source_file_fails_and_leaves_tree_unchanged() {
    let mut project = helpers::base_project();
    project
        .add_source_file("foo.m", None, PbxFileOptions::default())
        .unwrap();
    let before = project.to_pbxproj_string();

    let err = project
        .add_source_file("foo.m", None, PbxFileOptions::default())
        .unwrap_err();
    assert!(matches!(err, Error::AlreadyExists { .. }));
    assert_eq!(project.to_pbxproj_string(), before);
}

#[test]
fn test_add_then_remove_source_file_restores_sections() {
    let mut project = helpers::base_project();
    project
        .add_source_file("foo.m", None, PbxFileOptions::default())
        .unwrap();
    project
        .remove_source_file("foo.m", None, PbxFileOptions::default())
        .unwrap();

    assert_eq!(records(&project, "PBXBuildFile").len(), 1);
    assert_eq!(records(&project, "PBXFileReference").len(), 2);
    let comments = phase_file_comments(&project, "PBXSourcesBuildPhase", "Sources");
    assert_eq!(comments, ["main.m in Sources"]);
    // the created Plugins group stays, but the file is gone from it
    let plugins = project.pbx_group_by_name("Plugins").unwrap();
    assert!(plugins.sequence("children").unwrap().is_empty());
}

#[test]
fn test_add_framework_with_embed_and_custom_framework() {
    let mut project = helpers::base_project();
    project
        .add_framework(
            "Libs/My.framework",
            PbxFileOptions {
                custom_framework: true,
                link: true,
                embed: true,
                ..PbxFileOptions::default()
            },
        )
        .unwrap();

    // one file reference with group-relative source tree
    let references = records(&project, "PBXFileReference");
    let (file_ref, reference) = references
        .iter()
        .find(|(_, record)| record.string("path") == "\"Libs/My.framework\"")
        .expect("framework file reference");
    assert_eq!(reference.string("sourceTree"), "\"<group>\"");

    // two build files share the reference with distinct uuids
    let build_files = records(&project, "PBXBuildFile");
    let sharing: Vec<_> = build_files
        .iter()
        .filter(|(_, record)| record.string("fileRef") == *file_ref)
        .map(|(uuid, _)| *uuid)
        .collect();
    assert_eq!(sharing.len(), 2);
    assert_ne!(sharing[0], sharing[1]);

    // one linked, one embedded
    let linked = phase_file_comments(&project, "PBXFrameworksBuildPhase", "Frameworks");
    assert!(linked.contains(&"My.framework in Frameworks".to_string()));
    let embedded = phase_file_comments(&project, "PBXCopyFilesBuildPhase", "Embed Frameworks");
    assert!(embedded.contains(&"My.framework in Embed Frameworks".to_string()));

    // search paths extended only in configurations matching PRODUCT_NAME
    let entry = Value::from("\"\\\"Libs\\\"\"");
    for (uuid, configuration) in records(&project, "XCBuildConfiguration") {
        let settings = configuration.mapping("buildSettings").unwrap();
        let paths = settings.sequence("FRAMEWORK_SEARCH_PATHS");
        if settings.string("PRODUCT_NAME").is_empty() {
            assert!(paths.is_none(), "ungated configuration {uuid} was touched");
        } else {
            assert!(paths.unwrap().contains(&entry), "missing entry in {uuid}");
        }
    }

    // the inherited sentinel was promoted to a sequence first
    let (_, debug_config) = records(&project, "XCBuildConfiguration")
        .into_iter()
        .find(|(uuid, _)| *uuid == "2B0000000000000000000003")
        .unwrap();
    let paths = debug_config
        .mapping("buildSettings")
        .unwrap()
        .sequence("FRAMEWORK_SEARCH_PATHS")
        .unwrap();
    assert_eq!(paths[0], Value::from("\"$(inherited)\""));
}

#[test]
fn test_add_then_remove_framework_is_byte_identical() {
    let mut project = helpers::base_project();
    let before = project.to_pbxproj_string();
    project
        .add_framework("FooKit.framework", PbxFileOptions::default())
        .unwrap();
    assert_ne!(project.to_pbxproj_string(), before);
    project
        .remove_framework("FooKit.framework", PbxFileOptions::default())
        .unwrap();
    assert_eq!(project.to_pbxproj_string(), before);
}

#[test]
fn test_add_framework_without_link_skips_frameworks_phase() {
    let mut project = helpers::base_project();
    project
        .add_framework(
            "FooKit.framework",
            PbxFileOptions {
                link: false,
                ..PbxFileOptions::default()
            },
        )
        .unwrap();
    let linked = phase_file_comments(&project, "PBXFrameworksBuildPhase", "Frameworks");
    assert!(linked.is_empty());
    // the build file still exists for the group entry
    assert_eq!(records(&project, "PBXBuildFile").len(), 2);
}

#[test]
fn test_add_static_library_updates_library_search_paths() {
    let mut project = helpers::base_project();
    project
        .add_static_library("vendor/libfoo.a", PbxFileOptions::default())
        .unwrap();

    let linked = phase_file_comments(&project, "PBXFrameworksBuildPhase", "Frameworks");
    assert!(linked.contains(&"libfoo.a in Frameworks".to_string()));

    let entry = Value::from("\"\\\"$(SRCROOT)/TestApp/vendor\\\"\"");
    for (_, configuration) in records(&project, "XCBuildConfiguration") {
        let settings = configuration.mapping("buildSettings").unwrap();
        if settings.string("PRODUCT_NAME").is_empty() {
            assert!(settings.sequence("LIBRARY_SEARCH_PATHS").is_none());
        } else {
            assert!(settings
                .sequence("LIBRARY_SEARCH_PATHS")
                .unwrap()
                .contains(&entry));
        }
    }
}

#[test]
fn test_add_resource_file_lands_in_resources_group_and_phase() {
    let mut project = helpers::base_project();
    project
        .add_resource_file("icon.png", None, PbxFileOptions::default())
        .unwrap();

    let comments = phase_file_comments(&project, "PBXResourcesBuildPhase", "Resources");
    assert_eq!(comments, ["icon.png in Resources"]);

    let resources = project.pbx_group_by_name("Resources").unwrap();
    let children = resources.sequence("children").unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].as_mapping().unwrap().string("comment"), "icon.png");
}

#[test]
fn test_remove_resource_file_reverses_the_add() {
    let mut project = helpers::base_project();
    let before = project.to_pbxproj_string();
    project
        .add_resource_file("icon.png", None, PbxFileOptions::default())
        .unwrap();
    project
        .remove_resource_file("icon.png", None, PbxFileOptions::default())
        .unwrap();
    assert_eq!(project.to_pbxproj_string(), before);
}

#[test]
fn test_variant_group_resource_skips_build_file() {
    let mut project = helpers::base_project();
    project
        .add_resource_file(
            "Localizable.strings",
            None,
            PbxFileOptions {
                variant_group: true,
                ..PbxFileOptions::default()
            },
        )
        .unwrap();
    assert_eq!(records(&project, "PBXBuildFile").len(), 1);
    assert_eq!(records(&project, "PBXFileReference").len(), 3);
}

#[test]
fn test_add_copy_file_binds_into_copy_files_phase() {
    let mut project = helpers::base_project();
    // no Copy Files phase exists yet; create one on the only target
    project
        .add_build_phase(
            &[],
            "PBXCopyFilesBuildPhase",
            "Copy Files",
            Some(helpers::TARGET_UUID),
            pbxproj::BuildPhaseOptions::CopyFiles {
                target_type: "application".to_string(),
            },
            None,
        )
        .unwrap();
    project
        .add_copy_file(
            "payload.dat",
            PbxFileOptions {
                target: Some(helpers::TARGET_UUID.to_string()),
                ..PbxFileOptions::default()
            },
        )
        .unwrap();

    let comments =
        phase_file_comments(&project, "PBXCopyFilesBuildPhase", "Copy Files");
    assert_eq!(comments, ["payload.dat in Resources"]);

    // build file and file reference share one identity for copy files
    let build_files = records(&project, "PBXBuildFile");
    let copied = build_files
        .iter()
        .find(|(_, record)| record.comment_for("fileRef") == Some("payload.dat"))
        .expect("copy build file");
    assert_eq!(copied.0, copied.1.string("fileRef"));
}

#[test]
fn test_weak_framework_settings_survive_into_build_file() {
    let mut project = helpers::base_project();
    project
        .add_framework(
            "FooKit.framework",
            PbxFileOptions {
                weak: true,
                ..PbxFileOptions::default()
            },
        )
        .unwrap();
    let build_files = records(&project, "PBXBuildFile");
    let (_, record) = build_files
        .iter()
        .find(|(_, record)| record.comment_for("fileRef") == Some("FooKit.framework"))
        .unwrap();
    let attributes = record
        .mapping("settings")
        .unwrap()
        .sequence("ATTRIBUTES")
        .unwrap();
    assert_eq!(attributes, &[Value::from("Weak")]);
}

#[test]
fn test_xc_version_group_for_data_model_bundle() {
    let mut project = helpers::base_project();

    // a plain source file has no model data to promote
    let plain = pbxproj::PbxFile::new("foo.m", &PbxFileOptions::default()).unwrap();
    assert!(matches!(
        project.add_to_xc_version_group_section(&plain),
        Err(Error::InvalidArgument { .. })
    ));

    let mut model = pbxproj::PbxFile::new(
        "Model.xcdatamodeld/Model.xcdatamodel",
        &PbxFileOptions::default(),
    )
    .unwrap();
    model.file_ref = "3A0000000000000000000002".to_string();
    let mut bundle =
        pbxproj::PbxFile::new("Model.xcdatamodeld", &PbxFileOptions::default()).unwrap();
    bundle.file_ref = "3A0000000000000000000001".to_string();
    bundle.current_model = Some(Box::new(model.clone()));
    bundle.models = vec![model];
    project.add_to_xc_version_group_section(&bundle).unwrap();

    let versions = project.get_pbx_object("XCVersionGroup").unwrap();
    let record = versions.mapping("3A0000000000000000000001").unwrap();
    assert_eq!(record.string("versionGroupType"), "wrapper.xcdatamodel");
    assert_eq!(record.string("currentVersion"), "3A0000000000000000000002");
    assert_eq!(record.string("path"), "Model.xcdatamodeld");
    assert_eq!(
        versions.comment_for("3A0000000000000000000001"),
        Some("Model.xcdatamodeld")
    );
}
