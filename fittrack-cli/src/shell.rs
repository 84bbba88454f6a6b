// src/shell.rs
use anyhow::{bail, Context, Result};
use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use fittrack_lib::AppService;

use crate::cli::{Cli, Commands};
use crate::commands;

/// Splits a shell line into arguments, honouring single and double quotes.
fn split_args(line: &str) -> Result<Vec<String>> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_arg = false;
    let mut quote: Option<char> = None;
    for c in line.chars() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                in_arg = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_arg {
                    args.push(std::mem::take(&mut current));
                    in_arg = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_arg = true;
            }
        }
    }
    if let Some(q) = quote {
        bail!("Unterminated {q} quote");
    }
    if in_arg {
        args.push(current);
    }
    Ok(args)
}

/// Interactive loop over one session, so joins and profile edits can be undone.
pub fn run(service: &mut AppService, export_csv: bool) -> Result<()> {
    let mut rl = DefaultEditor::new().context("Failed to initialize readline")?;
    println!("FitTrack shell. Type `help` for commands, `exit` to quit.");

    loop {
        match rl.readline("fittrack> ") {
            Ok(line) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(input);
                if matches!(input, "exit" | "quit") {
                    break;
                }
                let args = match split_args(input) {
                    Ok(args) => args,
                    Err(e) => {
                        eprintln!("Error: {e}");
                        continue;
                    }
                };
                let cli = match Cli::try_parse_from(std::iter::once("fittrack".to_string()).chain(args)) {
                    Ok(cli) => cli,
                    Err(e) => {
                        let _ = e.print();
                        continue;
                    }
                };
                match cli.command {
                    Commands::Shell => println!("Already in the shell."),
                    Commands::GenerateCompletion { .. } => {
                        println!("Run `fittrack generate-completion` outside the shell.");
                    }
                    command => {
                        if let Err(e) = commands::run(service, command, export_csv || cli.export_csv) {
                            eprintln!("Error: {e:#}");
                        }
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
            }
            Err(ReadlineError::Eof) => {
                println!();
                break;
            }
            Err(e) => return Err(e).context("Failed to read input"),
        }
    }
    Ok(())
}
