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

//! `opensdraw`: reads an `.lcad` source file, runs the interpreter once per
//! time step, and writes one LDraw file (or, for animations, one file per
//! step) per spec.md §6's "exit codes of a CLI driver" contract.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use clap::Parser;
use opensdraw_lang::ffi::Registry;
use opensdraw_lang::model::Model;
use opensdraw_lang::value::Value;

#[derive(Parser, Debug)]
#[command(name = "opensdraw", about = "Evaluate an .lcad model and emit LDraw output")]
struct Args {
    /// Source .lcad file to evaluate.
    source: PathBuf,

    /// Output file. Defaults to the source name with its extension
    /// replaced by `.dat` (single-part) or `.mpd` (multi-part).
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Number of time steps to evaluate (for animations). Each step beyond
    /// the first is written to its own `_NNNNN`-suffixed file.
    #[arg(long = "time-steps", default_value_t = 1)]
    time_steps: u32,

    /// Library root searched by `(import MOD)` after the source file's own
    /// directory.
    #[arg(long = "lib-root")]
    lib_root: Option<PathBuf>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(err) = run(&args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), String> {
    let source = std::fs::read_to_string(&args.source)
        .map_err(|e| format!("failed to read {}: {e}", args.source.display()))?;
    let filename = args.source.to_string_lossy().into_owned();
    let source_name = args.source.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_else(|| filename.clone());

    for index in 0..args.time_steps {
        let model = opensdraw_lang::evaluate_with(
            &source,
            &filename,
            index as f64,
            build_ffi_registry(),
            args.lib_root.clone(),
        )
        .map_err(|e| e.to_string())?;

        if !model.has_entries() {
            log::info!("time step {index}: no parts or primitives, skipping");
            continue;
        }
        if index == 0 || index % 10 == 0 {
            log::info!("time step {index}");
        }

        let output = opensdraw_ldraw::serialize(model, &source_name);
        let out_path = output_path(args, index, output.multi_part);
        std::fs::write(&out_path, output.text)
            .map_err(|e| format!("failed to write {}: {e}", out_path.display()))?;
    }

    Ok(())
}

fn output_path(args: &Args, index: u32, multi_part: bool) -> PathBuf {
    let base = args.out.clone().unwrap_or_else(|| {
        let mut p = args.source.clone();
        p.set_extension(if multi_part { "mpd" } else { "dat" });
        p
    });

    if args.time_steps <= 1 {
        return base;
    }

    let stem = base.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    let ext = base.extension().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    let mut name = format!("{stem}_{index:05}");
    if !ext.is_empty() {
        name.push('.');
        name.push_str(&ext);
    }
    let parent: &Path = base.parent().unwrap_or_else(|| Path::new(""));
    parent.join(name)
}

/// Registers the example host-native function from spec.md §1: `picture`.
/// Real image decoding is out of scope (spec.md Non-goals); this stub
/// follows the original's calling convention -- filename, then either a
/// boolean for "give me the size" or pixel coordinates for a color -- and
/// logs that it cannot actually decode anything.
fn build_ffi_registry() -> Registry {
    let mut registry = Registry::new();
    registry.register(
        "picture",
        Rc::new(|args: &[Value], _model: &mut Model| {
            let filename = args.first().and_then(Value::as_str).unwrap_or("<unknown>");
            log::warn!("picture: image decoding is out of scope, ignoring request for {filename}");
            Ok(Value::Nil)
        }),
    );
    registry
}
