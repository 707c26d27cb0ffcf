use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};

use quill_script as quill;

use quill::ast_printer::AstPrinter;
use quill::interpreter::Interpreter;
use quill::scanner::Scanner;

#[derive(ClapParser, Debug)]
#[command(version, about = "Quill script engine", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable logging to app.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes a script, printing each token
    Tokenize {
        filename: PathBuf,

        /// Emit tokens as JSON, one object per line
        #[arg(long)]
        json: bool,
    },

    /// Parses a script and prints each statement's AST
    Parse { filename: PathBuf },

    /// Runs a script
    Run { filename: PathBuf },
}

/// Reads a script file into a String, rejecting invalid UTF-8.
fn read_source(filename: &PathBuf) -> Result<String> {
    info!("Reading script: {:?}", filename);

    let file = File::open(filename).context(format!("Failed to open file {:?}", filename))?;
    let mut reader = BufReader::new(file);
    let mut source = String::new();

    let bytes = reader
        .read_to_string(&mut source)
        .context(format!("Failed to read file {:?}", filename))?;

    info!("Read {} bytes from {:?}", bytes, filename);

    Ok(source)
}

fn init_logger() -> Result<()> {
    let log_file = File::create("app.log").context("Failed to create app.log")?;

    // Log lines carry the module path (crate prefix stripped) and source line.
    Builder::new()
        .format(|buf, record| {
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("quill_script::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug) // Default to Debug, override with RUST_LOG
        .init();

    info!("Logger initialized, writing to app.log");

    Ok(())
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    // Initialize logging only when --log is provided.
    if args.log {
        init_logger()?;
    } else {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    match args.command {
        Commands::Tokenize { filename, json } => {
            info!("Running Tokenize subcommand");

            let source = read_source(&filename)?;
            let mut clean = true;

            for result in Scanner::new(&source) {
                match result {
                    Ok(token) => {
                        debug!("Scanned token: {}", token);

                        if json {
                            let line = serde_json::to_string(&token)
                                .context("Failed to serialize token")?;
                            println!("{}", line);
                        } else {
                            println!("{}", token);
                        }
                    }

                    Err(e) => {
                        clean = false;

                        debug!("Tokenization error: {}", e);

                        eprintln!("{}", e);
                    }
                }
            }

            if !clean {
                debug!("Tokenization failed, exiting with code 65");

                std::process::exit(65);
            }

            info!("Tokenization completed successfully");
        }

        Commands::Parse { filename } => {
            info!("Running Parse subcommand");

            let source = read_source(&filename)?;
            let statements = match load_program(&source) {
                Ok(statements) => statements,
                Err(code) => std::process::exit(code),
            };

            let printer = AstPrinter;

            for statement in &statements {
                let rendered = printer.print_stmt(statement);

                debug!("AST: {}", rendered);
                println!("{}", rendered);
            }

            info!("Parse subcommand completed");
        }

        Commands::Run { filename } => {
            info!("Running Run subcommand");

            let source = read_source(&filename)?;
            let statements = match load_program(&source) {
                Ok(statements) => statements,
                Err(code) => std::process::exit(code),
            };

            info!("Parsed {} statements", statements.len());

            let mut interpreter = Interpreter::new();

            match interpreter.interpret(&statements) {
                Ok(()) => {
                    info!("Program executed successfully");
                }

                Err(e) => {
                    debug!("Runtime error: {}", e);

                    eprintln!("{}", e);
                    std::process::exit(70);
                }
            }
        }
    }

    Ok(())
}

/// Tokenizes and parses `source`, printing every collected error to stderr.
/// A program with any lexical or syntax error is never executed.
fn load_program(source: &str) -> std::result::Result<Vec<quill::stmt::Stmt>, i32> {
    let tokens = match quill::tokenize(source) {
        Ok(tokens) => tokens,
        Err(errors) => {
            for e in &errors {
                debug!("Tokenization error: {}", e);
                eprintln!("{}", e);
            }
            return Err(65);
        }
    };

    match quill::parse(&tokens) {
        Ok(statements) => Ok(statements),
        Err(errors) => {
            for e in &errors {
                debug!("Parse error: {}", e);
                eprintln!("{}", e);
            }
            Err(65)
        }
    }
}
