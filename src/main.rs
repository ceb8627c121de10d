use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use qfa::environment::Environment;
use qfa::interpreter::evaluate_program;
use qfa::object::{final_value, NULL};
use qfa::parser::parse;
use qfa::scanner::Scanner;

#[derive(Parser)]
#[command(name = "qfa", version, about = "Interpreter for the qfa expression language")]
struct Cli {
    /// Script to run; starts the prompt when omitted
    #[arg(value_name = "SCRIPT")]
    script: Option<PathBuf>,

    /// Print the scanned tokens before parsing
    #[arg(long)]
    tokens: bool,

    /// Print the parsed program, fully parenthesized
    #[arg(long)]
    ast: bool,

    /// Log filter directive, overrides RUST_LOG
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Success,
    ParseError,
    RuntimeError,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match &cli.log_level {
        Some(directive) => EnvFilter::try_new(directive)?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    match &cli.script {
        Some(path) => run_file(path, &cli),
        None => run_prompt(&cli),
    }
}

fn run_file(path: &Path, cli: &Cli) -> Result<()> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("could not read script {}", path.display()))?;
    let mut environment = Environment::new();

    match run(&source, &mut environment, cli) {
        Outcome::ParseError => process::exit(65),
        Outcome::RuntimeError => process::exit(70),
        Outcome::Success => Ok(()),
    }
}

fn run_prompt(cli: &Cli) -> Result<()> {
    let stdin = io::stdin();
    let mut environment = Environment::new();
    let mut input = String::new();

    loop {
        print!(">> ");
        io::stdout().flush()?;

        input.clear();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }
        run(&input, &mut environment, cli);
    }

    Ok(())
}

fn run(source: &str, environment: &mut Environment, cli: &Cli) -> Outcome {
    let tokens = Scanner::scan_all(source);
    if cli.tokens {
        for token in &tokens {
            println!("{{{} : {:?}}} line {}", token.kind, token.text, token.line);
        }
    }

    let (program, errors) = parse(tokens);
    if let Some(error) = errors.first() {
        println!("Parse error: {error}");
        return Outcome::ParseError;
    }
    if cli.ast {
        println!("{program}");
    }

    let results = evaluate_program(&program, environment);
    let last = match results.last() {
        Some(last) => last,
        None => return Outcome::Success,
    };

    if let Some(error) = last.as_error() {
        println!("Runtime error: {error}");
        return Outcome::RuntimeError;
    }

    let value = final_value(last);
    if !Arc::ptr_eq(&value, &NULL) {
        println!("{value}");
    }
    Outcome::Success
}
