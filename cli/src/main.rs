//! Command-line embedder for `vesper`: evaluates one or more JavaScript
//! files, or starts an interactive REPL when none are given.

use clap::Parser as ClapParser;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use vesper_engine::{Context, JsValue};
use vesper_gc::collect_garbage;

#[derive(Debug, ClapParser)]
#[command(name = "vesper", author, version, about = "A tree-walking ECMAScript engine")]
struct Opt {
    /// JavaScript file(s) to evaluate. With none given, starts a REPL.
    files: Vec<PathBuf>,

    /// Evaluate the given file(s) as modules instead of scripts.
    #[arg(long)]
    module: bool,

    /// Increase log verbosity (info, debug, trace with repeated use).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    simple_logger::SimpleLogger::new().with_level(level).init().expect("logger can only be initialised once");
}

fn main() -> ExitCode {
    let opt = Opt::parse();
    init_logging(opt.verbose);

    if opt.files.is_empty() {
        return run_repl();
    }

    let mut ctx = Context::new();
    let mut had_error = false;
    for file in &opt.files {
        let source = match fs::read_to_string(file) {
            Ok(source) => source,
            Err(e) => {
                eprintln!("{}: {}: {e}", "vesper".red().bold(), file.display());
                had_error = true;
                continue;
            }
        };
        let result = if opt.module {
            run_module(&mut ctx, file, &source)
        } else {
            vesper_engine::evaluate(&source, &mut ctx)
        };
        match result {
            Ok(_) => {}
            Err(e) => {
                eprintln!("{}", format_error(&e, &mut ctx).red());
                had_error = true;
            }
        }
    }

    if had_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run_module(ctx: &mut Context, file: &PathBuf, source: &str) -> vesper_engine::JsResult<JsValue> {
    let key = file.to_string_lossy().into_owned();
    let id = ctx.create_source_text_module(key, source)?;
    ctx.link_module(id)?;
    let result = ctx.evaluate_module(id);
    ctx.run_jobs()?;
    Ok(result)
}

fn format_error(err: &vesper_engine::JsError, ctx: &mut Context) -> String {
    match vesper_engine::operations::to_js_string(err.value(), ctx) {
        Ok(s) => s.to_string(),
        Err(_) => format!("{:?}", err.value()),
    }
}

fn run_repl() -> ExitCode {
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;

    println!("{} — ^D or .exit to quit", "vesper".green().bold());

    let mut ctx = Context::new();
    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("{}: failed to start line editor: {e}", "vesper".red().bold());
            return ExitCode::FAILURE;
        }
    };

    loop {
        match rl.readline("vesper> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if trimmed == ".exit" {
                    break;
                }
                let _ = rl.add_history_entry(line.as_str());
                match vesper_engine::evaluate(&line, &mut ctx) {
                    Ok(value) => println!("{}", display_value(&value, &mut ctx)),
                    Err(e) => eprintln!("{}", format_error(&e, &mut ctx).red()),
                }
                collect_garbage();
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "vesper".red().bold());
                break;
            }
        }
    }

    ExitCode::SUCCESS
}

fn display_value(value: &JsValue, ctx: &mut Context) -> String {
    match vesper_engine::operations::to_js_string(value, ctx) {
        Ok(s) => s.to_string(),
        Err(_) => format!("{value:?}"),
    }
}
