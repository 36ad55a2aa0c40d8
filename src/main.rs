use anyhow::Result;
use clap::Parser as ClapParser;
use rustyline::DefaultEditor;
use std::collections::HashMap;
use std::fs;
use vesper::config::RuntimeConfig;
use vesper::diagnostics;
use vesper::interpreter::environment::Environment;
use vesper::interpreter::value::Value;
use vesper::interpreter::Interpreter;
use vesper::keywords::load_keywords;
use vesper::parser::Parser;
use vesper::scanner::token::TokenType;
use vesper::scanner::Scanner;

#[derive(ClapParser)]
#[command(name = "vesper")]
#[command(about = "The Vesper programming language")]
struct Cli {
    /// Script file to run (omit for REPL)
    script: Option<String>,

    /// Path to keywords JSON file
    #[arg(short, long)]
    keywords: Option<String>,

    /// Call depth at which recursion fails with a stack overflow error
    #[arg(long)]
    max_call_depth: Option<usize>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let keywords = load_keywords(cli.keywords.as_deref())?;
    let mut config = RuntimeConfig::default();
    if let Some(depth) = cli.max_call_depth {
        config.max_call_depth = depth;
    }
    let mut interpreter = Interpreter::new(Environment::new(), config);

    match cli.script {
        None => run_prompt(&keywords, &mut interpreter)?,
        Some(path) => run_file(&path, &keywords, &mut interpreter)?,
    }

    Ok(())
}

fn run_prompt(
    keywords: &HashMap<String, TokenType>,
    interpreter: &mut Interpreter,
) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    let mut buffer = String::new();

    let history_path = dirs::home_dir().map(|p| p.join(".vesper_history"));
    if let Some(ref path) = history_path {
        let _ = rl.load_history(path);
    }

    loop {
        let prompt = if buffer.is_empty() { "> " } else { "| " };

        match rl.readline(prompt) {
            Ok(line) => {
                buffer.push_str(&line);
                buffer.push('\n');

                if is_complete(&buffer) {
                    if !buffer.trim().is_empty() {
                        let _ = rl.add_history_entry(buffer.trim());
                        run(&buffer, keywords, interpreter, true);
                    }
                    buffer.clear();
                }
            }
            Err(rustyline::error::ReadlineError::Eof) => break,
            Err(rustyline::error::ReadlineError::Interrupted) => {
                buffer.clear();
                println!("^C");
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                break;
            }
        }
    }

    if let Some(ref path) = history_path {
        let _ = rl.save_history(path);
    }

    Ok(())
}

/// Balanced delimiters and closed strings mean the buffered input can be
/// handed to the parser; otherwise the REPL keeps reading continuation
/// lines. Strings may span newlines, so an open quote keeps the buffer
/// open too.
fn is_complete(code: &str) -> bool {
    let mut depth = 0i32;
    let mut in_string = false;

    for c in code.chars() {
        if in_string {
            if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' | '(' | '[' => depth += 1,
            '}' | ')' | ']' => depth -= 1,
            _ => {}
        }
    }

    depth <= 0 && !in_string
}

fn run_file(
    path: &str,
    keywords: &HashMap<String, TokenType>,
    interpreter: &mut Interpreter,
) -> Result<()> {
    let contents = fs::read_to_string(path)?;
    run(&contents, keywords, interpreter, false);
    Ok(())
}

fn run(
    source: &str,
    keywords: &HashMap<String, TokenType>,
    interpreter: &mut Interpreter,
    echo_result: bool,
) {
    let scanner = Scanner::new(source, keywords);
    let parser = Parser::new(scanner);

    // Parse errors are reported en bloc; nothing is evaluated.
    let program = match parser.parse() {
        Ok(program) => program,
        Err(errors) => {
            for e in &errors {
                let hint = diagnostics::suggest_hint(&e.message);
                eprint!(
                    "{}",
                    diagnostics::render(source, "parse", e.line, &e.message, hint.as_deref())
                );
            }
            return;
        }
    };

    match interpreter.interpret(&program) {
        Value::Null => {}
        Value::Error(message) => {
            if let Some(hint) = diagnostics::suggest_hint(&message) {
                eprintln!("Error: {}\n  = hint: {}", message, hint);
            } else {
                eprintln!("Error: {}", message);
            }
        }
        value => {
            if echo_result {
                println!("{}", value);
            }
        }
    }
}
