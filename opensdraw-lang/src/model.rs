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

//! The evaluation context built up by `part`, `translate`, `group` and
//! friends: a stack of named groups, each accumulating entries under its
//! own current transform.

use std::collections::HashSet;

use opensdraw_math::Mt4;

use crate::error::{ErrorKind, LResult, LcadError};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Color {
    Indexed(i64),
    Direct(u32),
}

#[derive(Clone, Debug)]
pub enum PrimitiveKind {
    Line,
    Triangle,
    Quadrilateral,
}

#[derive(Clone, Debug)]
pub enum Entry {
    Part { part_id: String, color: Color, matrix: Mt4, step: u32 },
    Primitive { kind: PrimitiveKind, points: Vec<[f64; 3]>, color: Color, matrix: Mt4, step: u32 },
    Comment { text: String },
}

pub struct Group {
    pub name: String,
    pub header_lines: Vec<String>,
    pub matrix: Mt4,
    pub entries: Vec<Entry>,
    pub step: u32,
    /// Creation order, used to put groups back in declaration order once
    /// the stack (which finishes innermost-first) has been unwound.
    seq: usize,
}

impl Group {
    fn new(name: impl Into<String>, seq: usize) -> Self {
        Group {
            name: name.into(),
            header_lines: Vec::new(),
            matrix: Mt4::identity(),
            entries: Vec::new(),
            step: 0,
            seq,
        }
    }
}

/// The `Model` accumulated by one evaluation. Created fresh per
/// `evaluate()` call and handed off, read-only, to a serializer
/// afterward.
pub struct Model {
    stack: Vec<Group>,
    finished: Vec<Group>,
    group_names: HashSet<String>,
    next_seq: usize,
    pub time_index: f64,
}

impl Model {
    pub fn new(time_index: f64) -> Self {
        let mut group_names = HashSet::new();
        group_names.insert("main".to_string());
        Model {
            stack: vec![Group::new("main", 0)],
            finished: Vec::new(),
            group_names,
            next_seq: 1,
            time_index,
        }
    }

    pub fn current_matrix(&self) -> Mt4 {
        self.stack.last().expect("main group always present").matrix
    }

    pub fn set_current_matrix(&mut self, m: Mt4) {
        self.stack.last_mut().expect("main group always present").matrix = m;
    }

    pub fn current_step(&self) -> u32 {
        self.stack.last().expect("main group always present").step
    }

    pub fn push_group(&mut self, name: &str) -> LResult<()> {
        if self.group_names.contains(name) {
            return Err(LcadError::new(ErrorKind::GroupExists(name.to_string())));
        }
        self.group_names.insert(name.to_string());
        let parent_matrix = self.current_matrix();
        let mut g = Group::new(name, self.next_seq);
        self.next_seq += 1;
        g.matrix = parent_matrix;
        self.stack.push(g);
        Ok(())
    }

    pub fn pop_group(&mut self) {
        if self.stack.len() > 1 {
            let g = self.stack.pop().unwrap();
            self.finished.push(g);
        }
    }

    pub fn add_header(&mut self, text: &str) {
        self.stack.last_mut().unwrap().header_lines.push(text.to_string());
    }

    pub fn add_comment(&mut self, text: &str) {
        self.stack.last_mut().unwrap().entries.push(Entry::Comment { text: text.to_string() });
    }

    pub fn add_part(&mut self, part_id: &str, color: Color) {
        let matrix = self.current_matrix();
        let step = self.current_step();
        self.stack.last_mut().unwrap().entries.push(Entry::Part {
            part_id: part_id.to_string(),
            color,
            matrix,
            step,
        });
    }

    pub fn add_primitive(&mut self, kind: PrimitiveKind, points: Vec<[f64; 3]>, color: Color) {
        let matrix = self.current_matrix();
        let step = self.current_step();
        self.stack.last_mut().unwrap().entries.push(Entry::Primitive { kind, points, color, matrix, step });
    }

    pub fn advance_step(&mut self) {
        self.stack.last_mut().unwrap().step += 1;
    }

    /// Whether any group accumulated a part or primitive. Lets a CLI driver
    /// skip writing an output file for an empty time step, the way
    /// `lcad_to_ldraw.py` skips steps with zero parts.
    pub fn has_entries(&self) -> bool {
        let has = |g: &Group| g.entries.iter().any(|e| !matches!(e, Entry::Comment { .. }));
        self.stack.iter().any(has) || self.finished.iter().any(has)
    }

    /// Runs `body` with the current group's matrix temporarily replaced,
    /// restoring it afterward regardless of how `body` returns.
    pub fn with_matrix<T>(&mut self, matrix: Mt4, body: impl FnOnce(&mut Self) -> T) -> T {
        let saved = self.current_matrix();
        self.set_current_matrix(matrix);
        let result = body(self);
        self.set_current_matrix(saved);
        result
    }

    /// Finishes evaluation: pops every remaining group and returns them
    /// all in declaration order, main first.
    pub fn into_groups(mut self) -> Vec<Group> {
        while self.stack.len() > 1 {
            self.pop_group();
        }
        let mut groups = self.stack;
        groups.extend(self.finished);
        groups.sort_by_key(|g| g.seq);
        groups
    }
}
