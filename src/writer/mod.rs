//! Canonical text rendering of a project tree.
//!
//! The writer reproduces the dialect Xcode itself emits, so that a
//! re-written project diffs minimally: an optional `// ...` head line,
//! hard-tab indentation one level per nesting depth, one delimited section
//! per isa bucket under `objects` (empty buckets omitted), `PBXBuildFile`
//! and `PBXFileReference` records rendered inline on a single line, and the
//! `<key>_comment` companions rendered back as `/* ... */` labels.
//!
//! Output is a deterministic function of the tree: every backing container
//! is insertion-ordered, so parse → serialize is a fixed point on files this
//! writer produced.

use crate::tree::{OrderedMap, Value};

const INDENT: &str = "\t";

/// Serializer for the canonical pbxproj layout.
pub struct PbxWriter<'a> {
    contents: &'a OrderedMap,
    out: String,
    indent_level: usize,
    omit_empty: bool,
}

impl<'a> PbxWriter<'a> {
    /// Writer over a root tree (`headComment` + `project`), skipping
    /// empty-string scalars. Empty sequences and mappings still render;
    /// that is part of the Xcode shape.
    pub fn new(contents: &'a OrderedMap) -> Self {
        Self {
            contents,
            out: String::new(),
            indent_level: 0,
            omit_empty: true,
        }
    }

    /// Writer that renders empty-string scalars as `key = ;` instead of
    /// dropping them. Only useful for inspecting raw trees.
    pub fn with_raw_empty_values(contents: &'a OrderedMap) -> Self {
        Self {
            omit_empty: false,
            ..Self::new(contents)
        }
    }

    /// Render the whole document.
    pub fn render(mut self) -> String {
        let contents = self.contents;
        let head = contents.string("headComment");
        if !head.is_empty() {
            self.line_no_indent(&format!("// {head}"));
        }
        self.line("{");
        self.indent_level += 1;
        if let Some(project) = contents.mapping("project") {
            self.write_body(project, true);
        }
        self.indent_level -= 1;
        self.line("}");
        self.out
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.indent_level {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn line_no_indent(&mut self, text: &str) {
        self.out.push_str(text);
        self.out.push('\n');
    }

    /// The fields of one mapping, in order, comments re-attached.
    /// `top_level` switches the `objects` key to section rendering.
    fn write_body(&mut self, obj: &OrderedMap, top_level: bool) {
        for (key, value) in obj.non_comment_entries() {
            let comment = obj.comment_for(key);
            match value {
                Value::Sequence(seq) => self.write_array(key, seq),
                Value::Mapping(map) => {
                    self.line(&format!("{key} = {{"));
                    self.indent_level += 1;
                    if top_level && key == "objects" {
                        self.write_sections(map);
                    } else {
                        self.write_body(map, false);
                    }
                    self.indent_level -= 1;
                    self.line("};");
                }
                Value::String(s) => {
                    if self.omit_empty && s.is_empty() {
                        continue;
                    }
                    self.write_scalar_line(key, s, comment);
                }
                Value::Integer(n) => {
                    self.write_scalar_line(key, &n.to_string(), comment);
                }
            }
        }
    }

    fn write_scalar_line(&mut self, key: &str, rendered: &str, comment: Option<&str>) {
        match comment {
            Some(cmt) => self.line(&format!("{key} = {rendered} /* {cmt} */;")),
            None => self.line(&format!("{key} = {rendered};")),
        }
    }

    /// One delimited section per non-empty isa bucket.
    fn write_sections(&mut self, objects: &OrderedMap) {
        for (isa, value) in objects.iter() {
            let Some(bucket) = value.as_mapping() else {
                continue;
            };
            if bucket.is_empty() {
                continue;
            }
            self.out.push('\n');
            self.line_no_indent(&format!("/* Begin {isa} section */"));
            self.write_section(bucket);
            self.line_no_indent(&format!("/* End {isa} section */"));
        }
    }

    /// The records of one bucket. `PBXBuildFile` and `PBXFileReference`
    /// render inline; everything else renders block-form.
    fn write_section(&mut self, section: &OrderedMap) {
        for (key, value) in section.non_comment_entries() {
            let Some(record) = value.as_mapping() else {
                continue;
            };
            let comment = section.comment_for(key);
            let isa = record.string("isa");
            if isa == "PBXBuildFile" || isa == "PBXFileReference" {
                let rendered = self.render_inline_record(key, comment, record);
                self.line(rendered.trim_end());
            } else {
                match comment {
                    Some(cmt) => self.line(&format!("{key} /* {cmt} */ = {{")),
                    None => self.line(&format!("{key} = {{")),
                }
                self.indent_level += 1;
                self.write_body(record, false);
                self.indent_level -= 1;
                self.line("};");
            }
        }
    }

    /// `<key> /* cmt */ = {isa = ...; fileRef = X /* y */; ... };` on one
    /// line, nested mappings and sequences inlined recursively.
    fn render_inline_record(
        &self,
        key: &str,
        comment: Option<&str>,
        record: &OrderedMap,
    ) -> String {
        let mut out = String::new();
        match comment {
            Some(cmt) => out.push_str(&format!("{key} /* {cmt} */ = {{")),
            None => out.push_str(&format!("{key} = {{")),
        }
        self.render_inline_fields(&mut out, record);
        out.push_str("};");
        out
    }

    fn render_inline_fields(&self, out: &mut String, obj: &OrderedMap) {
        for (key, value) in obj.non_comment_entries() {
            let comment = obj.comment_for(key);
            match value {
                Value::Sequence(seq) => {
                    out.push_str(&format!("{key} = ("));
                    for item in seq {
                        match item {
                            Value::String(s) => out.push_str(&format!("{s}, ")),
                            Value::Integer(n) => out.push_str(&format!("{n}, ")),
                            _ => {}
                        }
                    }
                    out.push_str("); ");
                }
                Value::Mapping(map) => {
                    out.push_str(&format!("{key} = {{"));
                    self.render_inline_fields(out, map);
                    out.push_str("}; ");
                }
                Value::String(s) => {
                    if self.omit_empty && s.is_empty() {
                        continue;
                    }
                    match comment {
                        Some(cmt) => out.push_str(&format!("{key} = {s} /* {cmt} */; ")),
                        None => out.push_str(&format!("{key} = {s}; ")),
                    }
                }
                Value::Integer(n) => match comment {
                    Some(cmt) => out.push_str(&format!("{key} = {n} /* {cmt} */; ")),
                    None => out.push_str(&format!("{key} = {n}; ")),
                },
            }
        }
    }

    /// A block-form sequence: one entry per line, `{value, comment}` pairs
    /// rendered as `V /* C */,`, nested mappings as indented blocks.
    fn write_array(&mut self, name: &str, seq: &[Value]) {
        self.line(&format!("{name} = ("));
        self.indent_level += 1;
        for item in seq {
            match item {
                Value::Mapping(map) => {
                    let value = map.string("value");
                    let comment = map.string("comment");
                    if !value.is_empty() && !comment.is_empty() {
                        self.line(&format!("{value} /* {comment} */,"));
                    } else {
                        self.line("{");
                        self.indent_level += 1;
                        self.write_body(map, false);
                        self.indent_level -= 1;
                        self.line("},");
                    }
                }
                Value::String(s) => self.line(&format!("{s},")),
                Value::Integer(n) => self.line(&format!("{n},")),
                Value::Sequence(_) => {}
            }
        }
        self.indent_level -= 1;
        self.line(");");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn canon(source: &str) -> String {
        PbxWriter::new(&parse(source).unwrap()).render()
    }

    #[test]
    fn test_minimal_document() {
        let out = canon("// !$*UTF8*$!\n{ archiveVersion = 1; }\n");
        assert_eq!(out, "// !$*UTF8*$!\n{\n\tarchiveVersion = 1;\n}\n");
    }

    #[test]
    fn test_comment_pair_renders_inline_label() {
        let out = canon("{ rootObject = ABC /* Project object */; }");
        assert!(out.contains("\trootObject = ABC /* Project object */;\n"));
    }

    #[test]
    fn test_empty_string_omitted() {
        let mut project = OrderedMap::new();
        let mut body = OrderedMap::new();
        body.set("a", "");
        body.set("b", "x");
        project.set("project", Value::Mapping(body));
        let out = PbxWriter::new(&project).render();
        assert!(!out.contains("a ="));
        assert!(out.contains("b = x;"));
        let raw = PbxWriter::with_raw_empty_values(&project).render();
        assert!(raw.contains("a = ;"));
    }

    #[test]
    fn test_section_layout() {
        let source = "{ objects = {\n/* Begin PBXGroup section */\nABC /* Sources */ = {isa = PBXGroup; children = (\n); name = Sources; };\n/* End PBXGroup section */\n}; }";
        let out = canon(source);
        assert!(out.contains("\n\n/* Begin PBXGroup section */\n"));
        assert!(out.contains("/* End PBXGroup section */\n"));
        // block record, fields on their own lines
        assert!(out.contains("\t\tABC /* Sources */ = {\n"));
        assert!(out.contains("\t\t\tisa = PBXGroup;\n"));
        assert!(out.contains("\t\t\tchildren = (\n\t\t\t);\n"));
    }

    #[test]
    fn test_build_file_renders_inline() {
        let source = "{ objects = {\n/* Begin PBXBuildFile section */\nABC /* foo.m in Sources */ = {isa = PBXBuildFile; fileRef = DEF /* foo.m */; };\n/* End PBXBuildFile section */\n}; }";
        let out = canon(source);
        assert!(out.contains(
            "\t\tABC /* foo.m in Sources */ = {isa = PBXBuildFile; fileRef = DEF /* foo.m */; };\n"
        ));
    }

    #[test]
    fn test_inline_settings_sequence() {
        let source = "{ objects = {\n/* Begin PBXBuildFile section */\nABC = {isa = PBXBuildFile; fileRef = DEF; settings = {ATTRIBUTES = (Weak, ); }; };\n/* End PBXBuildFile section */\n}; }";
        let out = canon(source);
        assert!(out.contains("settings = {ATTRIBUTES = (Weak, ); };"));
    }

    #[test]
    fn test_empty_bucket_omitted() {
        let source =
            "{ objects = {\n/* Begin XCVersionGroup section */\n/* End XCVersionGroup section */\n}; }";
        let out = canon(source);
        assert!(!out.contains("XCVersionGroup"));
    }
}
