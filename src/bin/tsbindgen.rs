//! tsbindgen CLI.
//!
//! Exit codes: 0 on a clean gate, 1 when the gate refused emission or
//! loading failed. Progress goes to stdout via tracing; diagnostics to
//! stderr and the artifact files under the output directory.

#![allow(clippy::print_stderr)]

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tsbindgen::args::CliArgs;
use tsbindgen::check::persist_artifacts;
use tsbindgen::config::{load_config, BindgenConfig};
use tsbindgen::ingest::{apply_ingest_rules, AssemblyIngest, JsonGraphIngest};
use tsbindgen::report::{render_code_table, render_diagnostics};
use walkdir::WalkDir;

fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    if args.list_diagnostics {
        render_code_table();
        return ExitCode::SUCCESS;
    }

    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("tsbindgen: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn run(args: CliArgs) -> Result<bool> {
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => BindgenConfig::default(),
    };

    let mut paths = collect_dump_paths(&args.paths);
    paths.extend(config.assemblies.iter().cloned());
    paths.sort();
    paths.dedup();
    if paths.is_empty() {
        bail!("no symbol-graph dumps given (pass paths or set `assemblies` in the config)");
    }

    let mut ingest = JsonGraphIngest;
    let mut run = match ingest.load(&paths) {
        Ok(graph) => {
            let mut pre_diagnostics = tsbindgen::common::DiagnosticBag::new();
            let graph = apply_ingest_rules(graph, &mut pre_diagnostics);
            let mut run = tsbindgen::run_pipeline(graph, &config.policy);
            for d in pre_diagnostics.iter() {
                run.diagnostics.push(d.clone());
            }
            run
        }
        Err(diagnostic) => {
            eprintln!("tsbindgen: {diagnostic}");
            return Ok(false);
        }
    };

    render_diagnostics(&run.diagnostics);

    let out_dir = args.out.or(config.out_dir);
    if let Some(out_dir) = &out_dir {
        std::fs::create_dir_all(out_dir)
            .with_context(|| format!("creating `{}`", out_dir.display()))?;
        let mut summary = File::create(out_dir.join("diagnostics.json"))
            .context("creating diagnostics.json")?;
        let mut human = File::create(out_dir.join("diagnostics.txt"))
            .context("creating diagnostics.txt")?;
        persist_artifacts(&run.diagnostics, &mut summary, &mut human)
            .context("writing gate artifacts")?;
    }

    if !run.outcome.passed {
        tracing::info!(errors = run.outcome.errors, "emission skipped");
        return Ok(false);
    }

    // The syntactic printer consumes `run.plan` from here; it lives
    // outside this workspace behind `plan::DeclarationPrinter`.
    tracing::info!(
        namespaces = run.plan.graph.namespaces.len(),
        types = run.plan.graph.type_count(),
        "emission plan ready"
    );
    Ok(true)
}

/// Expand directories into the `.json` dumps they contain.
fn collect_dump_paths(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut out = Vec::new();
    for input in inputs {
        if input.is_dir() {
            for entry in WalkDir::new(input)
                .sort_by_file_name()
                .into_iter()
                .filter_map(Result::ok)
            {
                let path = entry.path();
                if path.extension().is_some_and(|e| e == "json") {
                    out.push(path.to_path_buf());
                }
            }
        } else {
            out.push(input.clone());
        }
    }
    out
}
