//! Transient domain view of one file being added to or removed from a
//! project.
//!
//! A `PbxFile` is constructed per edit call, carries everything the mutator
//! needs to materialize the `PBXFileReference`/`PBXBuildFile` records and
//! group/phase memberships, and is discarded afterwards. It is never stored
//! in the tree.

use std::path::Path;

use crate::error::{Error, Result};
use crate::tree::{unquoted, OrderedMap, Value};

use super::tables;

/// Options accepted by the file-level edit operations.
///
/// Everything is optional; the defaults resolve through the file-type
/// tables. `link` defaults to true: a framework added without options is
/// linked.
#[derive(Debug, Clone)]
pub struct PbxFileOptions {
    pub last_known_file_type: Option<String>,
    pub explicit_file_type: Option<String>,
    pub source_tree: Option<String>,
    pub default_encoding: Option<i64>,
    pub compiler_flags: Option<String>,
    /// UUID of the owning native target.
    pub target: Option<String>,
    pub group: Option<String>,
    pub weak: bool,
    pub embed: bool,
    pub sign: bool,
    pub link: bool,
    pub plugin: bool,
    pub custom_framework: bool,
    pub variant_group: bool,
}

impl Default for PbxFileOptions {
    fn default() -> Self {
        Self {
            last_known_file_type: None,
            explicit_file_type: None,
            source_tree: None,
            default_encoding: None,
            compiler_flags: None,
            target: None,
            group: None,
            weak: false,
            embed: false,
            sign: false,
            link: true,
            plugin: false,
            custom_framework: false,
            variant_group: false,
        }
    }
}

/// In-memory record of one file edit.
#[derive(Debug, Clone, Default)]
pub struct PbxFile {
    pub basename: String,
    pub path: String,
    /// Directory of the original path, kept for custom frameworks.
    pub dirname: String,
    pub last_known_file_type: String,
    pub explicit_file_type: String,
    pub group: String,
    pub source_tree: String,
    pub file_encoding: i64,
    pub default_encoding: i64,
    pub include_in_index: i64,
    pub settings: Option<OrderedMap>,
    /// Build-file identity, allocated by the mutator when the kind
    /// participates in a build phase.
    pub uuid: String,
    /// File-reference identity.
    pub file_ref: String,
    /// UUID of the owning native target.
    pub target: String,
    pub plugin: bool,
    pub custom_framework: bool,
    /// Versioned models of an `.xcdatamodeld` bundle.
    pub models: Vec<PbxFile>,
    pub current_model: Option<Box<PbxFile>>,
}

impl PbxFile {
    /// Build the domain view for `file_path`, resolving type, group,
    /// encoding, source tree and default path through the tables.
    pub fn new(file_path: &str, options: &PbxFileOptions) -> Result<Self> {
        let mut file = PbxFile {
            basename: basename_of(file_path),
            ..PbxFile::default()
        };

        file.last_known_file_type = match &options.last_known_file_type {
            Some(filetype) => filetype.clone(),
            None => detect_type(file_path).to_string(),
        };

        if options.custom_framework {
            file.custom_framework = true;
            file.dirname = to_slash(&dirname_of(file_path));
        }

        file.default_encoding = match options.default_encoding {
            Some(encoding) => encoding,
            None => tables::encoding_for_filetype(unquoted(file.active_filetype())),
        };
        file.file_encoding = file.default_encoding;

        if let Some(explicit) = &options.explicit_file_type {
            // Product references: no path on disk, the name is derived from
            // the product file type.
            file.explicit_file_type = explicit.clone();
            let extension = file.default_extension()?;
            file.basename = format!("{}.{}", file.basename, extension);
            file.last_known_file_type.clear();
            file.path.clear();
            file.group.clear();
            file.default_encoding = tables::DEFAULT_ENCODING;
        } else {
            file.group = file.detect_group(options).to_string();
            file.path = to_slash(&file.default_path(file_path));
        }

        file.source_tree = match &options.source_tree {
            Some(tree) => tree.clone(),
            None => file.detect_sourcetree().to_string(),
        };

        if options.weak {
            push_attribute(&mut file.settings, "Weak");
        }
        if let Some(flags) = &options.compiler_flags {
            file.settings
                .get_or_insert_with(OrderedMap::new)
                .set("COMPILER_FLAGS", format!("\"{flags}\""));
        }
        if options.embed && options.sign {
            push_attribute(&mut file.settings, "CodeSignOnCopy");
        }

        Ok(file)
    }

    /// The file type the lookups key on: the last-known type when present,
    /// the explicit type otherwise.
    fn active_filetype(&self) -> &str {
        if self.last_known_file_type.is_empty() {
            &self.explicit_file_type
        } else {
            &self.last_known_file_type
        }
    }

    fn default_extension(&self) -> Result<&'static str> {
        let filetype = if !self.last_known_file_type.is_empty()
            && self.last_known_file_type != tables::DEFAULT_FILETYPE
        {
            &self.last_known_file_type
        } else {
            &self.explicit_file_type
        };
        tables::extension_for_filetype(unquoted(filetype))
            .ok_or_else(|| Error::invalid_argument(format!("unknown file type: {filetype}")))
    }

    fn detect_group(&self, options: &PbxFileOptions) -> &'static str {
        if extension_of(&self.basename) == "xcdatamodeld" {
            return "Sources";
        }
        if options.custom_framework && options.embed {
            return tables::group_for_filetype("embedded.framework")
                .unwrap_or(tables::DEFAULT_GROUP);
        }
        tables::group_for_filetype(unquoted(self.active_filetype())).unwrap_or(tables::DEFAULT_GROUP)
    }

    fn detect_sourcetree(&self) -> &'static str {
        if !self.explicit_file_type.is_empty() {
            return tables::DEFAULT_PRODUCT_SOURCE_TREE;
        }
        if self.custom_framework {
            return tables::DEFAULT_SOURCE_TREE;
        }
        tables::sourcetree_for_filetype(unquoted(self.active_filetype()))
            .unwrap_or(tables::DEFAULT_SOURCE_TREE)
    }

    fn default_path(&self, file_path: &str) -> String {
        if self.custom_framework {
            return file_path.to_string();
        }
        match tables::path_prefix_for_filetype(unquoted(self.active_filetype())) {
            Some(prefix) => format!("{}{}", prefix, basename_of(file_path)),
            None => file_path.to_string(),
        }
    }
}

fn push_attribute(settings: &mut Option<OrderedMap>, attribute: &str) {
    settings
        .get_or_insert_with(OrderedMap::new)
        .ensure_sequence("ATTRIBUTES")
        .push(Value::from(attribute));
}

fn detect_type(file_path: &str) -> &'static str {
    let extension = extension_of(file_path);
    tables::filetype_for_extension(unquoted(&extension)).unwrap_or(tables::DEFAULT_FILETYPE)
}

pub(crate) fn basename_of(file_path: &str) -> String {
    Path::new(file_path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_path.to_string())
}

pub(crate) fn dirname_of(file_path: &str) -> String {
    match Path::new(file_path).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_string_lossy().into_owned(),
        _ => ".".to_string(),
    }
}

fn extension_of(file_path: &str) -> String {
    Path::new(file_path)
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Normalize path separators to forward slashes.
pub(crate) fn to_slash(path: &str) -> String {
    path.replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_file_defaults() {
        let file = PbxFile::new("Classes/foo.m", &PbxFileOptions::default()).unwrap();
        assert_eq!(file.basename, "foo.m");
        assert_eq!(file.path, "Classes/foo.m");
        assert_eq!(file.last_known_file_type, "sourcecode.c.objc");
        assert_eq!(file.group, "Sources");
        assert_eq!(file.source_tree, "\"<group>\"");
        assert_eq!(file.file_encoding, 4);
        assert!(file.settings.is_none());
    }

    #[test]
    fn test_system_framework_path_and_sourcetree() {
        let file = PbxFile::new("FooKit.framework", &PbxFileOptions::default()).unwrap();
        assert_eq!(file.path, "System/Library/Frameworks/FooKit.framework");
        assert_eq!(file.source_tree, "SDKROOT");
        assert_eq!(file.group, "Frameworks");
    }

    #[test]
    fn test_custom_framework_keeps_path() {
        let options = PbxFileOptions {
            custom_framework: true,
            ..PbxFileOptions::default()
        };
        let file = PbxFile::new("Libs/My.framework", &options).unwrap();
        assert_eq!(file.path, "Libs/My.framework");
        assert_eq!(file.dirname, "Libs");
        assert_eq!(file.source_tree, "\"<group>\"");
    }

    #[test]
    fn test_embedded_custom_framework_group() {
        let options = PbxFileOptions {
            custom_framework: true,
            embed: true,
            ..PbxFileOptions::default()
        };
        let file = PbxFile::new("Libs/My.framework", &options).unwrap();
        assert_eq!(file.group, "Embed Frameworks");
    }

    #[test]
    fn test_product_reference() {
        let options = PbxFileOptions {
            explicit_file_type: Some("wrapper.application".to_string()),
            ..PbxFileOptions::default()
        };
        let file = PbxFile::new("MyApp", &options).unwrap();
        assert_eq!(file.basename, "MyApp.app");
        assert_eq!(file.path, "");
        assert_eq!(file.last_known_file_type, "");
        assert_eq!(file.group, "");
        assert_eq!(file.source_tree, "BUILT_PRODUCTS_DIR");
    }

    #[test]
    fn test_unknown_product_type_rejected() {
        let options = PbxFileOptions {
            explicit_file_type: Some("no.such.type".to_string()),
            ..PbxFileOptions::default()
        };
        assert!(matches!(
            PbxFile::new("MyApp", &options),
            Err(Error::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_weak_and_flags_settings() {
        let options = PbxFileOptions {
            weak: true,
            compiler_flags: Some("-fno-objc-arc".to_string()),
            ..PbxFileOptions::default()
        };
        let file = PbxFile::new("foo.m", &options).unwrap();
        let settings = file.settings.unwrap();
        let attrs = settings.sequence("ATTRIBUTES").unwrap();
        assert_eq!(attrs, &[Value::from("Weak")]);
        assert_eq!(settings.string("COMPILER_FLAGS"), "\"-fno-objc-arc\"");
    }

    #[test]
    fn test_embed_and_sign_adds_code_sign_attribute() {
        let options = PbxFileOptions {
            embed: true,
            sign: true,
            ..PbxFileOptions::default()
        };
        let file = PbxFile::new("Libs/My.framework", &options).unwrap();
        let settings = file.settings.unwrap();
        let attrs = settings.sequence("ATTRIBUTES").unwrap();
        assert_eq!(attrs, &[Value::from("CodeSignOnCopy")]);
    }

    #[test]
    fn test_unknown_extension_falls_back() {
        let file = PbxFile::new("data.bin", &PbxFileOptions::default()).unwrap();
        assert_eq!(file.last_known_file_type, "unknown");
        assert_eq!(file.group, "Resources");
    }
}
