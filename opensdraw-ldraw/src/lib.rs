// MIT License
//
// Copyright (c) 2024 OpenSDraw contributors
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.
//

//! Turns a finished `opensdraw_lang::Model` into LDraw text. Lives outside
//! `opensdraw-lang` on purpose: the interpreter core has no notion of output
//! formatting, per spec.md's separation of the evaluator from its consumers.
//!
//! File layout mirrors the original `lcad_to_ldraw.py`: one `0 FILE <name>`
//! line per group in multi-group output, header lines, a single
//! `// Generated by opensdraw from <source>` comment on the first group
//! only, then parts/primitives in step order with `0 STEP` markers between
//! differing step numbers (suppressed for groups containing explicit
//! comments).

use opensdraw_lang::model::{Color, Entry, Group, PrimitiveKind};
use opensdraw_lang::Model;

/// Result of serializing a `Model`: the LDraw text plus whether it came
/// out as a multi-part document, so the caller can pick `.mpd` over
/// `.dat` the way `lcad_to_ldraw.py` does.
pub struct Output {
    pub text: String,
    pub multi_part: bool,
}

/// Serializes every group of `model` into one LDraw document.
///
/// `source_name` is the basename written into the `// Generated by ...`
/// comment on the first group, matching the original script's
/// `os.path.basename(sys.argv[1])`.
pub fn serialize(model: Model, source_name: &str) -> Output {
    let groups = model.into_groups();
    let multi_part = groups.len() > 1;

    let mut out = String::new();
    let mut wrote_program_comment = false;

    for group in &groups {
        if multi_part {
            out.push_str("0 FILE ");
            out.push_str(&group.name);
            out.push('\n');
        }

        for line in &group.header_lines {
            out.push_str("0 ");
            out.push_str(line);
            out.push('\n');
        }

        if !wrote_program_comment {
            out.push_str("0 // Generated by opensdraw from ");
            out.push_str(source_name);
            out.push('\n');
            wrote_program_comment = true;
        }

        out.push('\n');
        write_entries(&mut out, group);
        out.push_str("\n\n");
    }

    Output { text: out, multi_part }
}

fn write_entries(out: &mut String, group: &Group) {
    let have_comments = group.entries.iter().any(|e| matches!(e, Entry::Comment { .. }));

    for (i, entry) in group.entries.iter().enumerate() {
        match entry {
            Entry::Comment { text } => {
                out.push_str("0 ");
                out.push_str(text);
                out.push('\n');
            }
            Entry::Part { .. } | Entry::Primitive { .. } => {
                out.push_str(&entry_to_ldraw(entry));
                out.push('\n');
            }
        }

        if !have_comments {
            if let (Some(cur_step), Some(next_step)) =
                (entry_step(entry), group.entries.get(i + 1).and_then(entry_step))
            {
                if cur_step != next_step {
                    out.push_str("0 STEP\n");
                }
            }
        }
    }
}

fn entry_step(entry: &Entry) -> Option<u32> {
    match entry {
        Entry::Part { step, .. } => Some(*step),
        Entry::Primitive { step, .. } => Some(*step),
        Entry::Comment { .. } => None,
    }
}

fn entry_to_ldraw(entry: &Entry) -> String {
    match entry {
        Entry::Part { part_id, color, matrix, .. } => {
            let t = matrix.translation_part();
            let r = matrix.rotation_part_row_major();
            format!(
                "1 {} {} {} {} {} {} {} {} {} {} {} {} {} {}",
                format_color(*color),
                fmt(t.x),
                fmt(t.y),
                fmt(t.z),
                fmt(r[0]),
                fmt(r[1]),
                fmt(r[2]),
                fmt(r[3]),
                fmt(r[4]),
                fmt(r[5]),
                fmt(r[6]),
                fmt(r[7]),
                fmt(r[8]),
                part_id,
            )
        }
        Entry::Primitive { kind, points, color, matrix, .. } => {
            let line_type = match kind {
                PrimitiveKind::Line => 2,
                PrimitiveKind::Triangle => 3,
                PrimitiveKind::Quadrilateral => 4,
            };
            let mut s = format!("{} {}", line_type, format_color(*color));
            for p in points {
                let transformed = matrix.transform_point(opensdraw_math::Pt3::new(p[0], p[1], p[2]));
                s.push(' ');
                s.push_str(&fmt(transformed.x));
                s.push(' ');
                s.push_str(&fmt(transformed.y));
                s.push(' ');
                s.push_str(&fmt(transformed.z));
            }
            s
        }
        Entry::Comment { text } => format!("0 {text}"),
    }
}

fn format_color(color: Color) -> String {
    match color {
        Color::Indexed(n) => n.to_string(),
        Color::Direct(rgb) => format!("0x2{rgb:06X}"),
    }
}

fn fmt(n: f64) -> String {
    if (n - n.round()).abs() < 1e-9 {
        format!("{}", n.round())
    } else {
        format!("{n:.6}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opensdraw_lang::model::PrimitiveKind as PK;

    #[test]
    fn single_part_model_has_no_file_line() {
        let mut model = Model::new(0.0);
        model.add_part("3001", Color::Indexed(4));
        let text = serialize(model, "test.lcad").text;
        assert!(!text.contains("0 FILE"));
        assert!(text.contains("1 4 0 0 0 1 0 0 0 1 0 0 0 1 3001"));
    }

    #[test]
    fn direct_color_formats_as_hex() {
        let mut model = Model::new(0.0);
        model.add_part("3001", Color::Direct(0x00FF00));
        let text = serialize(model, "test.lcad").text;
        assert!(text.contains("0x200FF00"));
    }

    #[test]
    fn step_marker_separates_differing_steps() {
        let mut model = Model::new(0.0);
        model.add_part("3001", Color::Indexed(4));
        model.advance_step();
        model.add_part("3002", Color::Indexed(4));
        let text = serialize(model, "test.lcad").text;
        assert!(text.contains("0 STEP"));
    }

    #[test]
    fn multi_group_model_emits_file_lines() {
        let mut model = Model::new(0.0);
        model.add_part("3001", Color::Indexed(4));
        model.push_group("sub").unwrap();
        model.add_part("3002", Color::Indexed(4));
        model.pop_group();
        let text = serialize(model, "test.lcad").text;
        assert!(text.contains("0 FILE main"));
        assert!(text.contains("0 FILE sub"));
    }

    #[test]
    fn comments_suppress_step_markers() {
        let mut model = Model::new(0.0);
        model.add_part("3001", Color::Indexed(4));
        model.advance_step();
        model.add_comment("a note");
        model.add_part("3002", Color::Indexed(4));
        let text = serialize(model, "test.lcad").text;
        assert!(!text.contains("0 STEP"));
    }

    #[test]
    fn quadrilateral_emits_line_type_4() {
        let mut model = Model::new(0.0);
        model.add_primitive(
            PK::Quadrilateral,
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
            Color::Indexed(16),
        );
        let text = serialize(model, "test.lcad").text;
        assert!(text.contains("4 16"));
    }
}
