//! Read, mutate and canonically rewrite Xcode `project.pbxproj` files.
//!
//! The pbxproj format is a legacy NeXTSTEP-style property list: an ordered,
//! comment-annotated text tree that Xcode parses and rewrites in one
//! canonical shape. Key order, inline `/* ... */` labels and quoting are
//! all meaningful — disturbing any of them produces noisy diffs, and both
//! Xcode and downstream tooling depend on the canonical form.
//!
//! The crate is four layers:
//!
//! ```text
//! parser   — recognizes the dialect, builds the value tree
//! tree     — ordered mappings + the tagged value union
//! project  — typed mutation layer over the tree (targets, files, phases,
//!            groups, settings), keeping UUID cross-references consistent
//! writer   — emits the tree back in Xcode's canonical text shape
//! ```
//!
//! ```no_run
//! use pbxproj::{PbxFileOptions, PbxProject};
//!
//! # fn main() -> pbxproj::Result<()> {
//! let mut project = PbxProject::load("project.pbxproj")?;
//! project.add_source_file("Classes/Foo.m", None, PbxFileOptions::default())?;
//! project.add_framework("FooKit.framework", PbxFileOptions::default())?;
//! project.save()?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod parser;
pub mod project;
pub mod tree;
pub mod writer;

pub use error::{Error, ParseError, Result};
pub use project::{BuildPhaseOptions, PbxFile, PbxFileOptions, PbxProject, ShellScriptPhase};
pub use tree::{CommentedEntry, OrderedMap, Value};
pub use writer::PbxWriter;
