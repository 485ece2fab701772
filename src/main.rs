// ABOUTME: CLI entry point: file loading and the interactive REPL shell

use clap::Parser;
use jaratkaru::builtins::register_builtins;
use jaratkaru::config::{HISTORY_FILE, PROMPT};
use jaratkaru::env::Environment;
use jaratkaru::error::JkError;
use jaratkaru::eval::eval;
use jaratkaru::reader;
use rustyline::error::ReadlineError;
use rustyline::{Config, DefaultEditor};
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// A small homoiconic Lisp-family interpreter
#[derive(Parser, Debug)]
#[command(name = "jk")]
#[command(version)]
#[command(about = "A small homoiconic Lisp-family interpreter")]
struct CliArgs {
    /// Source file to load before entering the REPL
    #[arg(value_name = "FILE")]
    script: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    let env = Environment::new();
    register_builtins(&env);

    if let Some(path) = &args.script {
        // A load failure is reported like any REPL error; top-level
        // bindings made before the failure stay usable.
        if let Err(e) = load_file(path, &env) {
            eprintln!("{}", e);
        }
    }

    let config = Config::builder().auto_add_history(true).build();
    let mut rl = DefaultEditor::with_config(config)?;
    let _ = rl.load_history(HISTORY_FILE);

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => match rep(&line, &env) {
                Ok(Some(printed)) => println!("{}", printed),
                Ok(None) => {}
                Err(e) => eprintln!("{}", e),
            },
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("Error: {}", err);
                break;
            }
        }
    }

    let _ = rl.save_history(HISTORY_FILE);
    Ok(())
}

/// Read, evaluate, and render one REPL line. Every top-level form on
/// the line is evaluated; only the last result is printed.
fn rep(line: &str, env: &Rc<Environment>) -> Result<Option<String>, JkError> {
    let forms = reader::read(vec![line.to_string()])?;
    let mut last = None;
    for form in &forms {
        last = Some(eval(form, env)?);
    }
    Ok(last.map(|value| value.to_string()))
}

/// Reads a whole source file into memory and evaluates its top-level
/// forms in order against the root environment.
fn load_file(path: &Path, env: &Rc<Environment>) -> Result<(), Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read source file {}: {}", path.display(), e))?;
    let lines: Vec<String> = contents.lines().map(str::to_string).collect();

    let forms = reader::read(lines)?;
    for form in &forms {
        eval(form, env)?;
    }
    Ok(())
}
