//! semsql CLI - Compile semantic query documents to SQL
//!
//! Usage:
//!   semsql compile [FILE] [--dialect <dialect>] [--output sql|verbose|json] [--strict] [--raw]
//!   semsql validate [FILE] [--dialect <dialect>] [--raw]
//!   semsql extract [FILE]
//!
//! FILE omitted or `-` reads stdin.
//!
//! Examples:
//!   semsql compile query.json
//!   echo '{"tables": ["orders"], "limit": 5}' | semsql compile --dialect postgres
//!   semsql compile --raw response.txt --output verbose

use clap::{Parser, Subcommand, ValueEnum};
use semsql::compile::{CompileOutcome, Compiler};
use semsql::config::Settings;
use semsql::document::QueryDocument;
use semsql::sql::Dialect;
use semsql::summary::Summary;
use semsql::validation::Validator;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Exit status when the statement printed is a fallback.
const EXIT_DEGRADED: u8 = 2;

#[derive(Parser)]
#[command(name = "semsql")]
#[command(about = "semsql - Compile semantic query documents to SQL")]
#[command(version)]
struct Cli {
    /// Path to a semsql.toml config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a semantic query document to SQL
    Compile {
        /// Path to the document (stdin if omitted or `-`)
        file: Option<PathBuf>,

        /// SQL dialect to generate (overrides config)
        #[arg(short, long)]
        dialect: Option<DialectArg>,

        /// Output format
        #[arg(short, long, default_value = "sql")]
        output: OutputFormat,

        /// Refuse documents that fail validation
        #[arg(long)]
        strict: bool,

        /// Input is a free-text response containing the document
        #[arg(long)]
        raw: bool,
    },

    /// Validate a semantic query document without generating SQL
    Validate {
        /// Path to the document (stdin if omitted or `-`)
        file: Option<PathBuf>,

        /// Dialect to check join support against (overrides config)
        #[arg(short, long)]
        dialect: Option<DialectArg>,

        /// Input is a free-text response containing the document
        #[arg(long)]
        raw: bool,
    },

    /// Extract the document from a free-text response and print it as JSON
    Extract {
        /// Path to the response text (stdin if omitted or `-`)
        file: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DialectArg {
    Mysql,
    Postgres,
    Duckdb,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Mysql => Dialect::MySql,
            DialectArg::Postgres => Dialect::Postgres,
            DialectArg::Duckdb => Dialect::DuckDb,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Output SQL only
    Sql,
    /// Output a narrated summary with the SQL
    Verbose,
    /// Output a JSON object with the SQL and outcome
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match Settings::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        match settings.logging.max_level() {
            Ok(level) => level,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                return ExitCode::FAILURE;
            }
        }
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let dialect_or = |arg: Option<DialectArg>| {
        arg.map(Dialect::from)
            .unwrap_or(settings.compiler.dialect)
    };

    match cli.command {
        Commands::Compile {
            file,
            dialect,
            output,
            strict,
            raw,
        } => cmd_compile(
            file.as_deref(),
            dialect_or(dialect),
            output,
            strict || settings.compiler.strict,
            raw,
        ),
        Commands::Validate { file, dialect, raw } => {
            cmd_validate(file.as_deref(), dialect_or(dialect), raw)
        }
        Commands::Extract { file } => cmd_extract(file.as_deref()),
    }
}

fn read_input(file: Option<&Path>) -> Result<String, String> {
    match file {
        None => read_stdin(),
        Some(path) if path == Path::new("-") => read_stdin(),
        Some(path) => fs::read_to_string(path)
            .map_err(|e| format!("Error reading file '{}': {}", path.display(), e)),
    }
}

fn read_stdin() -> Result<String, String> {
    let mut text = String::new();
    io::stdin()
        .read_to_string(&mut text)
        .map_err(|e| format!("Error reading stdin: {}", e))?;
    Ok(text)
}

fn load_document(file: Option<&Path>, raw: bool) -> Result<QueryDocument, String> {
    let text = read_input(file)?;
    if raw {
        Ok(QueryDocument::from_response_or_empty(&text))
    } else {
        QueryDocument::from_json(&text).map_err(|e| e.to_string())
    }
}

fn cmd_compile(
    file: Option<&Path>,
    dialect: Dialect,
    output: OutputFormat,
    strict: bool,
    raw: bool,
) -> ExitCode {
    let doc = match load_document(file, raw) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if strict {
        match Validator::new(dialect).validate(&doc) {
            Ok(report) => {
                for warning in &report.warnings {
                    eprintln!("warning: {}", warning);
                }
            }
            Err(e) => {
                eprintln!("Validation error: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    let outcome = Compiler::new(dialect).compile_document(&doc);

    match output {
        OutputFormat::Sql => {
            println!("{}", outcome.sql());
        }
        OutputFormat::Verbose => {
            println!("{}", Summary::from_document(&doc, &outcome, dialect));
        }
        OutputFormat::Json => {
            let json = serde_json::json!({
                "dialect": dialect,
                "sql": outcome.sql(),
                "degraded": outcome.is_degraded(),
                "reason": outcome.degrade_reason().map(|r| r.to_string()),
            });
            match serde_json::to_string_pretty(&json) {
                Ok(text) => println!("{}", text),
                Err(e) => {
                    eprintln!("Error serializing output: {}", e);
                    return ExitCode::FAILURE;
                }
            }
        }
    }

    match outcome {
        CompileOutcome::Compiled(_) => ExitCode::SUCCESS,
        CompileOutcome::Degraded { .. } => ExitCode::from(EXIT_DEGRADED),
    }
}

fn cmd_validate(file: Option<&Path>, dialect: Dialect, raw: bool) -> ExitCode {
    let doc = match load_document(file, raw) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match Validator::new(dialect).validate(&doc) {
        Ok(report) => {
            for warning in &report.warnings {
                println!("warning: {}", warning);
            }
            println!(
                "OK: document is valid ({} warning{})",
                report.warnings.len(),
                if report.warnings.len() == 1 { "" } else { "s" }
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Validation error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_extract(file: Option<&Path>) -> ExitCode {
    let text = match read_input(file) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let doc = match QueryDocument::from_response(&text) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("Extraction error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&doc) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error serializing document: {}", e);
            ExitCode::FAILURE
        }
    }
}
