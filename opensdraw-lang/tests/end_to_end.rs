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

//! Source-to-result scenarios, one per concrete example in spec.md's
//! "testable properties" section.

use opensdraw_lang::ast::NodeKind;
use opensdraw_lang::error::LResult;
use opensdraw_lang::eval::Evaluator;
use opensdraw_lang::ffi::Registry;
use opensdraw_lang::model::Color;
use opensdraw_lang::value::Value;
use opensdraw_lang::{parser, prepass};

/// Evaluates `source` and returns the value of its last top-level form,
/// the way a REPL would -- `evaluate()`'s public contract only returns
/// the `Model`, so scenarios about plain values go through the evaluator
/// directly instead.
fn eval_to_value(source: &str) -> LResult<Value> {
    let ast = parser::parse(source, "test.lcad")?;
    prepass::run(&ast)?;
    let mut evaluator = Evaluator::new(0.0, Registry::new(), None);
    let NodeKind::Expression(forms) = &ast.kind else { unreachable!() };
    let root_scope = evaluator.scopes.root_scope;
    evaluator.eval_sequence(forms, root_scope)
}

#[test]
fn arithmetic_sums_all_arguments() {
    let v = eval_to_value("(+ 1 2 3)").unwrap();
    assert_eq!(v.as_number(), Some(6.0));
}

#[test]
fn aref_set_mutates_the_shared_list_cell() {
    let v = eval_to_value("(def x (list 1 2 3)) (set (aref x 1) 4) (aref x 1)").unwrap();
    assert_eq!(v.as_number(), Some(4.0));
}

#[test]
fn user_function_with_keyword_default() {
    let v = eval_to_value("(def inc (x :y 0) (+ x y 1)) (inc 1 :y 2)").unwrap();
    assert_eq!(v.as_number(), Some(4.0));
}

#[test]
fn for_loop_accumulates_sum_one_to_ten() {
    let v = eval_to_value("(def s 0) (for (i 1 11) (set s (+ s i))) s").unwrap();
    assert_eq!(v.as_number(), Some(55.0));
}

#[test]
fn truthiness_of_if() {
    assert_eq!(eval_to_value("(if t 1 2)").unwrap().as_number(), Some(1.0));
    assert_eq!(eval_to_value("(if nil 1 2)").unwrap().as_number(), Some(2.0));
    assert_eq!(eval_to_value("(if (list) 1 2)").unwrap().as_number(), Some(2.0));
}

#[test]
fn curve_sample_near_control_point_distance() {
    let v = eval_to_value(
        "(def c (curve (list \
           (list (list 0 0 0) (list 1 0 0) (list 0 1 0)) \
           (list (list 10 0 0) (list 1 0 0))))) \
         (aref (c 5) 0)",
    )
    .unwrap();
    let x = v.as_number().expect("curve sample first coordinate is a number");
    assert!((x - 5.0).abs() < 0.5, "expected approximately 5.0, got {x}");
}

#[test]
fn translate_offsets_part_origin_with_identity_rotation() {
    let model = opensdraw_lang::evaluate("(translate (1 2 3) (part \"3001\" 4))", "test.lcad", 0.0).unwrap();
    let groups = model.into_groups();
    let main = groups.into_iter().find(|g| g.name == "main").unwrap();
    let part = main
        .entries
        .iter()
        .find_map(|e| match e {
            opensdraw_lang::model::Entry::Part { part_id, color, matrix, .. } => {
                Some((part_id.clone(), *color, *matrix))
            }
            _ => None,
        })
        .expect("model has a part entry");

    assert_eq!(part.0, "3001");
    assert_eq!(part.1, Color::Indexed(4));
    let t = part.2.translation_part();
    assert!((t.x - 1.0).abs() < 1e-9 && (t.y - 2.0).abs() < 1e-9 && (t.z - 3.0).abs() < 1e-9);
    let r = part.2.rotation_part_row_major();
    let identity = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];
    for (actual, expected) in r.iter().zip(identity.iter()) {
        assert!((actual - expected).abs() < 1e-9);
    }
}

#[test]
fn duplicate_def_in_same_scope_is_an_error() {
    use opensdraw_lang::error::ErrorKind;
    let err = eval_to_value("(def x 1) (def x 2)").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::SymbolAlreadyExists(ref name) if name == "x"));
}

#[test]
fn duplicate_function_def_in_same_scope_is_an_error() {
    use opensdraw_lang::error::ErrorKind;
    let err = eval_to_value("(def f (x) x) (def f (x) (+ x 1))").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::SymbolAlreadyExists(ref name) if name == "f"));
}

#[test]
fn mutual_recursion_between_hoisted_functions_still_works() {
    let v = eval_to_value(
        "(def is-even (n) (if (= n 0) t (is-odd (- n 1)))) \
         (def is-odd (n) (if (= n 0) nil (is-even (- n 1)))) \
         (if (is-even 10) 1 0)",
    )
    .unwrap();
    assert_eq!(v.as_number(), Some(1.0));
}

#[test]
fn loop_variable_does_not_trip_the_duplicate_def_guard() {
    // Each `for` iteration rebinds its loop variable; that must not be
    // treated as a same-scope redefinition error.
    let v = eval_to_value("(def total 0) (for (i 1 4) (set total (+ total i))) total").unwrap();
    assert_eq!(v.as_number(), Some(6.0));
}

#[test]
fn rotation_order_matches_single_axis_rotation() {
    let model = opensdraw_lang::evaluate(
        "(rotate (90 0 0) (translate (0 0 1) (part \"3001\" 4)))",
        "test.lcad",
        0.0,
    )
    .unwrap();
    let groups = model.into_groups();
    let main = groups.into_iter().find(|g| g.name == "main").unwrap();
    let matrix = main
        .entries
        .iter()
        .find_map(|e| match e {
            opensdraw_lang::model::Entry::Part { matrix, .. } => Some(*matrix),
            _ => None,
        })
        .unwrap();
    let t = matrix.translation_part();
    // Rx(90) maps (0,0,1) -> (0,-1,0).
    assert!((t.x - 0.0).abs() < 1e-6);
    assert!((t.y - (-1.0)).abs() < 1e-6);
    assert!((t.z - 0.0).abs() < 1e-6);
}
