use std::path::PathBuf;
use std::process;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand, ValueEnum};
use filexpect::cmd::expect::{self, ExpectCommandArgs, ExpectationArgs, LineOptions};
use filexpect::engine::file::DEFAULT_HASH_ALG;
use filexpect::logging::{self, LogFormat};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Debug, Parser)]
#[command(
    name = "filexpect",
    version,
    about = "Evaluate expectations about a single file"
)]
struct Cli {
    /// File the expectation is evaluated against.
    #[arg(long)]
    path: PathBuf,

    #[arg(long, value_enum, global = true, default_value_t = CliLogFormat::Text)]
    log_format: CliLogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Expect the path to be an existing regular file.
    Exists,
    /// Expect the file digest to equal a value.
    Hash(HashArgs),
    /// Expect the file size in bytes to lie within inclusive bounds.
    Size(SizeArgs),
    /// Expect the table header to have unique column names.
    Header(HeaderArgs),
    /// Expect the file to be valid JSON, optionally against a schema.
    Json(JsonArgs),
    /// Expect per-line regex match counts to lie within a range.
    LineCount(LineCountArgs),
    /// Expect per-line regex match counts to equal a value.
    LineCountEqual(LineCountEqualArgs),
}

#[derive(Debug, clap::Args)]
struct HashArgs {
    #[arg(long)]
    value: String,

    #[arg(long, default_value = DEFAULT_HASH_ALG)]
    alg: String,
}

#[derive(Debug, clap::Args)]
struct SizeArgs {
    #[arg(long, allow_hyphen_values = true)]
    min: String,

    #[arg(long, allow_hyphen_values = true)]
    max: String,
}

#[derive(Debug, clap::Args)]
struct HeaderArgs {
    /// Delimiter pattern separating column names.
    #[arg(long)]
    regex: String,

    #[arg(long, default_value_t = 0)]
    skip: usize,

    /// Treat `--regex` as a literal delimiter with CSV quoting.
    #[arg(long, default_value_t = false)]
    literal: bool,
}

#[derive(Debug, clap::Args)]
struct JsonArgs {
    #[arg(long)]
    schema: Option<PathBuf>,
}

#[derive(Debug, clap::Args)]
struct LineArgs {
    #[arg(long, default_value_t = 0)]
    skip: usize,

    #[arg(long)]
    mostly: Option<f64>,

    #[arg(long)]
    null_lines_regex: Option<String>,
}

#[derive(Debug, clap::Args)]
struct LineCountArgs {
    #[arg(long)]
    regex: String,

    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    min: i64,

    #[arg(long, allow_hyphen_values = true)]
    max: Option<i64>,

    #[command(flatten)]
    lines: LineArgs,
}

#[derive(Debug, clap::Args)]
struct LineCountEqualArgs {
    #[arg(long)]
    regex: String,

    #[arg(long, allow_hyphen_values = true)]
    count: i64,

    #[command(flatten)]
    lines: LineArgs,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLogFormat {
    Text,
    Json,
}

impl From<CliLogFormat> for LogFormat {
    fn from(value: CliLogFormat) -> Self {
        match value {
            CliLogFormat::Text => Self::Text,
            CliLogFormat::Json => Self::Json,
        }
    }
}

impl From<LineArgs> for LineOptions {
    fn from(value: LineArgs) -> Self {
        Self {
            skip: value.skip,
            mostly: value.mostly,
            null_lines_regex: value.null_lines_regex,
        }
    }
}

impl From<Commands> for ExpectationArgs {
    fn from(value: Commands) -> Self {
        match value {
            Commands::Exists => Self::Exists,
            Commands::Hash(args) => Self::Hash {
                value: args.value,
                alg: args.alg,
            },
            Commands::Size(args) => Self::Size {
                min: args.min,
                max: args.max,
            },
            Commands::Header(args) => Self::Header {
                regex: args.regex,
                skip: args.skip,
                literal: args.literal,
            },
            Commands::Json(args) => Self::Json {
                schema: args.schema,
            },
            Commands::LineCount(args) => Self::LineCount {
                regex: args.regex,
                min: args.min,
                max: args.max,
                lines: args.lines.into(),
            },
            Commands::LineCountEqual(args) => Self::LineCountEqual {
                regex: args.regex,
                count: args.count,
                lines: args.lines.into(),
            },
        }
    }
}

#[derive(Serialize)]
struct CliError<'a> {
    error: &'a str,
    message: String,
    code: i32,
    details: Value,
}

fn main() {
    process::exit(run());
}

fn run() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => return handle_parse_error(error),
    };

    logging::init(cli.log_format.into());

    let args = ExpectCommandArgs {
        path: cli.path,
        expectation: cli.command.into(),
    };
    let response = expect::run(&args);

    match response.exit_code {
        0 | 2 => {
            if emit_json_stdout(&response.payload) {
                response.exit_code
            } else {
                emit_serialize_failure()
            }
        }
        3 | 1 => {
            if emit_json_stderr(&response.payload) {
                response.exit_code
            } else {
                emit_serialize_failure()
            }
        }
        other => {
            emit_error(
                "internal_error",
                format!("unexpected exit code: {other}"),
                json!({"command": "expect"}),
                1,
            );
            1
        }
    }
}

fn handle_parse_error(error: clap::Error) -> i32 {
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            print!("{error}");
            0
        }
        _ => {
            emit_error(
                "input_usage_error",
                error.to_string(),
                json!({"kind": "cli_parse_error"}),
                3,
            );
            3
        }
    }
}

fn emit_serialize_failure() -> i32 {
    emit_error(
        "internal_error",
        "failed to serialize expectation response".to_string(),
        json!({"command": "expect"}),
        1,
    );
    1
}

fn emit_json_stdout(value: &Value) -> bool {
    match serde_json::to_string(value) {
        Ok(serialized) => {
            println!("{serialized}");
            true
        }
        Err(_) => false,
    }
}

fn emit_json_stderr(value: &Value) -> bool {
    match serde_json::to_string(value) {
        Ok(serialized) => {
            eprintln!("{serialized}");
            true
        }
        Err(_) => false,
    }
}

fn emit_error(error: &'static str, message: String, details: Value, code: i32) {
    let payload = CliError {
        error,
        message,
        code,
        details,
    };
    match serde_json::to_string(&payload) {
        Ok(serialized) => eprintln!("{serialized}"),
        Err(_) => eprintln!(
            "{{\"error\":\"internal_error\",\"message\":\"failed to serialize error\",\"code\":1}}"
        ),
    }
}
