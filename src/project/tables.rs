//! Fixed lookup tables for file kinds, groups, encodings and target types.
//!
//! These are shipped data, not logic: the values mirror what Xcode itself
//! writes and are looked up verbatim by the mutator.

pub const DEFAULT_SOURCE_TREE: &str = "\"<group>\"";
pub const DEFAULT_PRODUCT_SOURCE_TREE: &str = "BUILT_PRODUCTS_DIR";
pub const DEFAULT_GROUP: &str = "Resources";
pub const DEFAULT_FILETYPE: &str = "unknown";
pub const DEFAULT_ENCODING: i64 = 4;

pub const FILETYPE_BY_EXTENSION: &[(&str, &str)] = &[
    ("a", "archive.ar"),
    ("app", "wrapper.application"),
    ("appex", "wrapper.app-extension"),
    ("bundle", "wrapper.plug-in"),
    ("dylib", "compiled.mach-o.dylib"),
    ("framework", "wrapper.framework"),
    ("h", "sourcecode.c.h"),
    ("m", "sourcecode.c.objc"),
    ("markdown", "text"),
    ("mdimporter", "wrapper.cfbundle"),
    ("octest", "wrapper.cfbundle"),
    ("pch", "sourcecode.c.h"),
    ("plist", "text.plist.xml"),
    ("sh", "text.script.sh"),
    ("swift", "sourcecode.swift"),
    ("tbd", "sourcecode.text-based-dylib-definition"),
    ("xcassets", "folder.assetcatalog"),
    ("xcconfig", "text.xcconfig"),
    ("xcdatamodel", "wrapper.xcdatamodel"),
    ("xcodeproj", "wrapper.pb-project"),
    ("xctest", "wrapper.cfbundle"),
    ("xib", "file.xib"),
    ("strings", "text.plist.strings"),
];

pub const GROUP_BY_FILETYPE: &[(&str, &str)] = &[
    ("archive.ar", "Frameworks"),
    ("compiled.mach-o.dylib", "Frameworks"),
    ("sourcecode.text-based-dylib-definition", "Frameworks"),
    ("wrapper.framework", "Frameworks"),
    ("embedded.framework", "Embed Frameworks"),
    ("sourcecode.c.h", "Resources"),
    ("sourcecode.c.objc", "Sources"),
    ("sourcecode.swift", "Sources"),
];

pub const PATH_BY_FILETYPE: &[(&str, &str)] = &[
    ("compiled.mach-o.dylib", "usr/lib/"),
    ("sourcecode.text-based-dylib-definition", "usr/lib/"),
    ("wrapper.framework", "System/Library/Frameworks/"),
];

pub const SOURCETREE_BY_FILETYPE: &[(&str, &str)] = &[
    ("compiled.mach-o.dylib", "SDKROOT"),
    ("sourcecode.text-based-dylib-definition", "SDKROOT"),
    ("wrapper.framework", "SDKROOT"),
];

pub const ENCODING_BY_FILETYPE: &[(&str, i64)] = &[
    ("sourcecode.c.h", DEFAULT_ENCODING),
    ("sourcecode.c.objc", DEFAULT_ENCODING),
    ("sourcecode.swift", DEFAULT_ENCODING),
    ("text", DEFAULT_ENCODING),
    ("text.plist.xml", DEFAULT_ENCODING),
    ("text.script.sh", DEFAULT_ENCODING),
    ("text.xcconfig", DEFAULT_ENCODING),
    ("text.plist.strings", DEFAULT_ENCODING),
];

/// Copy-phase destination kind per target type.
pub const DESTINATION_BY_TARGETTYPE: &[(&str, &str)] = &[
    ("application", "wrapper"),
    ("app_extension", "plugins"),
    ("bundle", "wrapper"),
    ("command_line_tool", "wrapper"),
    ("dynamic_library", "products_directory"),
    ("framework", "shared_frameworks"),
    ("frameworks", "frameworks"),
    ("static_library", "products_directory"),
    ("unit_test_bundle", "wrapper"),
    ("watch_app", "wrapper"),
    ("watch2_app", "products_directory"),
    ("watch_extension", "plugins"),
    ("watch2_extension", "plugins"),
];

/// `dstSubfolderSpec` code per copy-phase destination kind.
pub const SUBFOLDERSPEC_BY_DESTINATION: &[(&str, i64)] = &[
    ("absolute_path", 0),
    ("executables", 6),
    ("frameworks", 10),
    ("java_resources", 15),
    ("plugins", 13),
    ("products_directory", 16),
    ("resources", 7),
    ("shared_frameworks", 11),
    ("shared_support", 12),
    ("wrapper", 1),
    ("xpc_services", 0),
];

fn lookup<'a>(table: &'a [(&str, &str)], key: &str) -> Option<&'a str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

pub fn filetype_for_extension(extension: &str) -> Option<&'static str> {
    lookup(FILETYPE_BY_EXTENSION, extension)
}

/// Inverse of [`filetype_for_extension`]; later duplicate file types win,
/// matching how the table inversion has always behaved.
pub fn extension_for_filetype(filetype: &str) -> Option<&'static str> {
    FILETYPE_BY_EXTENSION
        .iter()
        .rev()
        .find(|(_, v)| *v == filetype)
        .map(|(k, _)| *k)
}

pub fn group_for_filetype(filetype: &str) -> Option<&'static str> {
    lookup(GROUP_BY_FILETYPE, filetype)
}

pub fn path_prefix_for_filetype(filetype: &str) -> Option<&'static str> {
    lookup(PATH_BY_FILETYPE, filetype)
}

pub fn sourcetree_for_filetype(filetype: &str) -> Option<&'static str> {
    lookup(SOURCETREE_BY_FILETYPE, filetype)
}

pub fn encoding_for_filetype(filetype: &str) -> i64 {
    ENCODING_BY_FILETYPE
        .iter()
        .find(|(k, _)| *k == filetype)
        .map(|(_, v)| *v)
        .unwrap_or(DEFAULT_ENCODING)
}

pub fn destination_for_targettype(target_type: &str) -> Option<&'static str> {
    lookup(DESTINATION_BY_TARGETTYPE, target_type)
}

pub fn subfolderspec_for_destination(destination: &str) -> Option<i64> {
    SUBFOLDERSPEC_BY_DESTINATION
        .iter()
        .find(|(k, _)| *k == destination)
        .map(|(_, v)| *v)
}

/// `com.apple.product-type.*` identifier for one of the twelve target kinds.
pub fn product_type_for_target_type(target_type: &str) -> Option<&'static str> {
    match target_type {
        "application" => Some("com.apple.product-type.application"),
        "app_extension" => Some("com.apple.product-type.app-extension"),
        "bundle" => Some("com.apple.product-type.bundle"),
        "command_line_tool" => Some("com.apple.product-type.tool"),
        "dynamic_library" => Some("com.apple.product-type.library.dynamic"),
        "framework" => Some("com.apple.product-type.framework"),
        "static_library" => Some("com.apple.product-type.library.static"),
        "unit_test_bundle" => Some("com.apple.product-type.bundle.unit-test"),
        "watch_app" => Some("com.apple.product-type.application.watchapp"),
        "watch2_app" => Some("com.apple.product-type.application.watchapp2"),
        "watch_extension" => Some("com.apple.product-type.watchkit-extension"),
        "watch2_extension" => Some("com.apple.product-type.watchkit2-extension"),
        _ => None,
    }
}

/// Product file type for a `com.apple.product-type.*` identifier.
pub fn file_type_for_product_type(product_type: &str) -> Option<&'static str> {
    match product_type {
        "com.apple.product-type.application" => Some("wrapper.application"),
        "com.apple.product-type.app-extension" => Some("wrapper.app-extension"),
        "com.apple.product-type.bundle" => Some("wrapper.plug-in"),
        "com.apple.product-type.tool" => Some("compiled.mach-o.dylib"),
        "com.apple.product-type.library.dynamic" => Some("compiled.mach-o.dylib"),
        "com.apple.product-type.framework" => Some("wrapper.framework"),
        "com.apple.product-type.library.static" => Some("archive.ar"),
        "com.apple.product-type.bundle.unit-test" => Some("wrapper.cfbundle"),
        "com.apple.product-type.application.watchapp" => Some("wrapper.application"),
        "com.apple.product-type.application.watchapp2" => Some("wrapper.application"),
        "com.apple.product-type.watchkit-extension" => Some("wrapper.app-extension"),
        "com.apple.product-type.watchkit2-extension" => Some("wrapper.app-extension"),
        _ => None,
    }
}
