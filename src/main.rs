//! Purpose: `jsonpick` CLI entry point.
//! Role: Binary crate root; parses args, decodes inputs, runs lookups, prints results.
//! Invariants: Results go to stdout, one per input, in input order.
//! Invariants: Warnings and errors go to stderr (human on a TTY, JSON lines otherwise).
//! Invariants: A bad input never stops later inputs; the exit code reports the first failure.
#![allow(clippy::result_large_err)]
use std::error::Error as StdError;
use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, ValueEnum, ValueHint, error::ErrorKind as ClapErrorKind};
use clap_complete::aot::Shell;
use serde_json::{Map, Value, json};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod color_json;
mod json;

use color_json::{RenderOptions, render_json};
use json::parse::DecodeFailure;
use jsonpick::core::error::{Error, ErrorKind, to_exit_code};
use jsonpick::core::highlight::{DEFAULT_CONTEXT, highlight};
use jsonpick::notice::{Notice, notice_json};
use jsonpick::{DiagnosticSink, Dialect, Lookup, Pattern, Warning};

const STDIN_LABEL: &str = "<stdin>";

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }

    fn with_code(exit_code: i32) -> Self {
        Self { exit_code }
    }
}

fn main() {
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err((err, color_mode)) => {
            emit_error(&err, color_mode);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<RunOutcome, (Error, ColorMode)> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion => {
                err.print().map_err(|io_err| {
                    (
                        Error::new(ErrorKind::Io)
                            .with_message("failed to write help")
                            .with_source(io_err),
                        ColorMode::Auto,
                    )
                })?;
                return Ok(RunOutcome::ok());
            }
            _ => {
                return Err((
                    Error::new(ErrorKind::Usage)
                        .with_message(clap_error_summary(&err))
                        .with_hint("Try `jsonpick --help`."),
                    ColorMode::Auto,
                ));
            }
        },
    };

    let color_mode = cli.color;
    init_tracing(cli.verbose);

    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        clap_complete::aot::generate(shell, &mut cmd, "jsonpick", &mut io::stdout());
        return Ok(RunOutcome::ok());
    }

    let settings = Settings::from_cli(&cli);
    let lookup = build_lookup(&cli);
    let inputs = if cli.files.is_empty() {
        vec![PathBuf::from("-")]
    } else {
        cli.files.clone()
    };

    let mut first_failure: Option<ErrorKind> = None;
    for input in &inputs {
        match process_input(input, &lookup, &settings) {
            Ok(result) => {
                emit_result(&result, &settings).map_err(|err| (err, color_mode))?;
            }
            Err(err) => {
                emit_error(&err, color_mode);
                first_failure.get_or_insert(err.kind());
            }
        }
    }

    Ok(RunOutcome::with_code(first_failure.map_or(0, to_exit_code)))
}

#[derive(Parser)]
#[command(
    name = "jsonpick",
    version,
    about = "Pick values out of JSON documents with slash-delimited path patterns",
    long_about = None,
    allow_negative_numbers = true,
    after_help = r#"PATTERNS
  key           object member (exact match, digits stay keys)
  3, -1         array or string index, negative counts from the end
  1:, :-2, 1:3  half-open slice of an array or string
  ...!int       convert the final value: i/int, f/float, r/repr

EXAMPLES
  $ jsonpick data/0/name -f doc.json
  $ curl -s https://api.example.com/items | jsonpick items/-1/id
  $ jsonpick -j , user/name user/email -f a.json -f b.json
  $ jsonpick 'stats/count!int' -f doc.json

NOTES
  - Without -f/--file, the document is read from stdin (`-f -` does the same)
  - Failed segments warn on stderr and keep the value they were applied to
  - Use `--` before patterns that start with `-` but are not plain numbers"#
)]
struct Cli {
    #[arg(value_name = "PATTERN", help = "Path pattern, e.g. data/0/name or data/0/count!int")]
    patterns: Vec<String>,
    #[arg(
        short = 'f',
        long = "file",
        value_name = "PATH",
        help = "Input JSON file (repeatable; use - for stdin)",
        value_hint = ValueHint::FilePath
    )]
    files: Vec<PathBuf>,
    #[arg(
        short = 'j',
        long,
        value_name = "SEP",
        help = "Join all results into one string with this separator"
    )]
    join: Option<String>,
    #[arg(
        long,
        default_value_t = 2,
        value_name = "N",
        help = "Spaces per indent level for JSON output"
    )]
    indent: usize,
    #[arg(
        short = 'c',
        long,
        conflicts_with = "indent",
        help = "Print JSON output on a single line"
    )]
    compact: bool,
    #[arg(short = 's', long, help = "Sort object keys in JSON output")]
    sort_keys: bool,
    #[arg(short = 'r', long, help = "Print string results without JSON quoting")]
    raw: bool,
    #[arg(
        long,
        default_value = "auto",
        value_enum,
        help = "Colorize output and stderr diagnostics: auto|always|never"
    )]
    color: ColorMode,
    #[arg(
        long,
        default_value_t = DEFAULT_CONTEXT,
        value_name = "N",
        help = "Characters of input shown on each side of a decode error"
    )]
    context: usize,
    #[arg(
        long,
        help = "Treat the first `!` before a `/` as the conversion and ignore the rest"
    )]
    legacy_bang: bool,
    #[arg(short = 'q', long, conflicts_with = "verbose", help = "Suppress warnings")]
    quiet: bool,
    #[arg(short = 'v', long, help = "Enable debug logging on stderr (RUST_LOG overrides)")]
    verbose: bool,
    #[arg(long, value_name = "SHELL", help = "Print shell completions and exit")]
    completions: Option<Shell>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn use_color(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

#[derive(Clone, Debug)]
struct Settings {
    render: RenderOptions,
    raw: bool,
    context: usize,
    color_mode: ColorMode,
    quiet: bool,
}

impl Settings {
    fn from_cli(cli: &Cli) -> Self {
        Self {
            render: RenderOptions {
                indent: if cli.compact { None } else { Some(cli.indent) },
                sort_keys: cli.sort_keys,
                color: cli.color.use_color(io::stdout().is_terminal()),
            },
            raw: cli.raw,
            context: cli.context,
            color_mode: cli.color,
            quiet: cli.quiet,
        }
    }
}

fn build_lookup(cli: &Cli) -> Lookup {
    let dialect = if cli.legacy_bang {
        Dialect::Legacy
    } else {
        Dialect::Final
    };
    let lookup = Lookup::new(&cli.patterns, dialect);
    match &cli.join {
        Some(separator) => lookup.with_join(separator.as_str()),
        None => lookup,
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn input_label(path: &Path) -> String {
    if path == Path::new("-") {
        STDIN_LABEL.to_string()
    } else {
        path.display().to_string()
    }
}

fn read_input(path: &Path) -> Result<String, Error> {
    if path == Path::new("-") {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text).map_err(|err| {
            Error::new(ErrorKind::Io)
                .with_message("failed to read stdin")
                .with_source(err)
        })?;
        return Ok(text);
    }
    fs::read_to_string(path).map_err(|err| {
        Error::new(ErrorKind::Io)
            .with_message("failed to read input file")
            .with_hint("Check that the file exists, is readable, and is UTF-8.")
            .with_path(path)
            .with_source(err)
    })
}

fn process_input(path: &Path, lookup: &Lookup, settings: &Settings) -> Result<Value, Error> {
    let label = input_label(path);
    let text = read_input(path)?;
    let value = json::parse::from_str(&text)
        .map_err(|failure| decode_error(failure, &text, &label, settings))?;
    debug!(input = %label, bytes = text.len(), "decoded input");

    let mut sink = NoticeSink {
        input: &label,
        pattern: String::new(),
        color_mode: settings.color_mode,
        quiet: settings.quiet,
    };
    Ok(lookup.run(&value, &mut sink))
}

fn decode_error(failure: DecodeFailure, text: &str, label: &str, settings: &Settings) -> Error {
    let category = failure.category();
    // JSON envelopes (non-TTY stderr) always carry the plain context.
    let color = io::stderr().is_terminal() && settings.color_mode.use_color(true);
    let context = highlight(text, failure.offset, settings.context, settings.context, color);
    Error::new(ErrorKind::Decode)
        .with_message(format!("invalid json ({})", category.label()))
        .with_hint(category.hint())
        .with_path(label)
        .with_position(failure.line(), failure.column())
        .with_offset(failure.offset as u64)
        .with_context(context)
        .with_source(failure.error)
}

struct NoticeSink<'a> {
    input: &'a str,
    pattern: String,
    color_mode: ColorMode,
    quiet: bool,
}

impl DiagnosticSink for NoticeSink<'_> {
    fn warning(&mut self, warning: Warning) {
        if self.quiet {
            return;
        }
        let notice = Notice::from_warning(&warning, &self.pattern, self.input);
        emit_notice(&notice, self.color_mode);
    }

    fn enter_pattern(&mut self, pattern: &Pattern) {
        self.pattern = pattern.to_string();
    }
}

fn format_result(value: &Value, settings: &Settings) -> String {
    match value {
        Value::String(text) if settings.raw => text.clone(),
        _ => render_json(value, &settings.render),
    }
}

fn emit_result(value: &Value, settings: &Settings) -> Result<(), Error> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", format_result(value, settings))
        .and_then(|()| stdout.flush())
        .map_err(|err| {
            Error::new(ErrorKind::Io)
                .with_message("failed to write output")
                .with_source(err)
        })
}

#[derive(Copy, Clone, Debug)]
enum AnsiColor {
    Red,
    Yellow,
}

fn colorize_label(label: &str, enabled: bool, color: AnsiColor) -> String {
    if !enabled {
        return label.to_string();
    }
    let code = match color {
        AnsiColor::Red => "31",
        AnsiColor::Yellow => "33",
    };
    format!("\u{1b}[{code}m{label}\u{1b}[0m")
}

fn emit_error(err: &Error, color_mode: ColorMode) {
    let is_tty = io::stderr().is_terminal();
    if is_tty {
        eprintln!("{}", error_text(err, color_mode.use_color(is_tty)));
        return;
    }

    let value = error_json(err);
    let json = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn emit_notice(notice: &Notice, color_mode: ColorMode) {
    let is_tty = io::stderr().is_terminal();
    if is_tty {
        let label = colorize_label("warning:", color_mode.use_color(is_tty), AnsiColor::Yellow);
        eprintln!(
            "{label} {} (pattern: {}, input: {})",
            notice.message, notice.pattern, notice.input
        );
        return;
    }

    let value = notice_json(notice);
    let json = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"warning\":{\"kind\":\"internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_message(err: &Error) -> String {
    if let Some(message) = err.message() {
        return message.to_string();
    }
    match err.kind() {
        ErrorKind::Internal => "internal error".to_string(),
        ErrorKind::Usage => "usage error".to_string(),
        ErrorKind::Decode => "invalid json".to_string(),
        ErrorKind::Io => "i/o error".to_string(),
    }
}

fn error_causes(err: &Error) -> Vec<String> {
    let mut causes = Vec::new();
    let mut cur = StdError::source(err);
    while let Some(source) = cur {
        causes.push(source.to_string());
        cur = source.source();
    }
    causes
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(error_message(err)));
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    if let Some(path) = err.path() {
        inner.insert("path".to_string(), json!(path.display().to_string()));
    }
    if let Some((line, column)) = err.position() {
        inner.insert("line".to_string(), json!(line));
        inner.insert("column".to_string(), json!(column));
    }
    if let Some(offset) = err.offset() {
        inner.insert("offset".to_string(), json!(offset));
    }
    if let Some(context) = err.context() {
        inner.insert("context".to_string(), json!(context));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn error_text(err: &Error, use_color: bool) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "{} {}",
        colorize_label("error:", use_color, AnsiColor::Red),
        error_message(err)
    ));

    if let Some(path) = err.path() {
        let location = match err.position() {
            Some((line, column)) => format!("{}:{line}:{column}", path.display()),
            None => path.display().to_string(),
        };
        lines.push(format!(
            "{} {location}",
            colorize_label("input:", use_color, AnsiColor::Yellow)
        ));
    }
    if let Some(context) = err.context() {
        lines.push(format!(
            "{} {context}",
            colorize_label("context:", use_color, AnsiColor::Yellow)
        ));
    }
    if let Some(hint) = err.hint() {
        lines.push(format!(
            "{} {hint}",
            colorize_label("hint:", use_color, AnsiColor::Yellow)
        ));
    }

    let causes = error_causes(err);
    if let Some(cause) = causes.first() {
        lines.push(format!(
            "{} {cause}",
            colorize_label("caused by:", use_color, AnsiColor::Yellow)
        ));
    }

    lines.join("\n")
}

fn clap_error_summary(err: &clap::Error) -> String {
    for line in err.to_string().lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("error:") {
            return rest.trim().to_string();
        }
        return trimmed.to_string();
    }
    "invalid arguments".to_string()
}

#[cfg(test)]
mod tests {
    use super::{Cli, ColorMode, Settings, error_json, error_text, format_result};
    use crate::color_json::RenderOptions;
    use clap::{CommandFactory, Parser};
    use jsonpick::core::error::{Error, ErrorKind};
    use serde_json::json;

    fn settings(raw: bool) -> Settings {
        Settings {
            render: RenderOptions {
                indent: None,
                sort_keys: false,
                color: false,
            },
            raw,
            context: 8,
            color_mode: ColorMode::Never,
            quiet: false,
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn negative_index_patterns_parse_as_positionals() {
        let cli = Cli::try_parse_from(["jsonpick", "-1", "data/-1", "-c"]).expect("parse");
        assert_eq!(cli.patterns, ["-1", "data/-1"]);
        assert!(cli.compact);
    }

    #[test]
    fn compact_conflicts_with_explicit_indent() {
        assert!(Cli::try_parse_from(["jsonpick", "--indent", "4", "-c"]).is_err());
    }

    #[test]
    fn raw_mode_only_unquotes_strings() {
        assert_eq!(format_result(&json!("a\"b"), &settings(true)), "a\"b");
        assert_eq!(format_result(&json!("a\"b"), &settings(false)), "\"a\\\"b\"");
        assert_eq!(format_result(&json!([1, "x"]), &settings(true)), "[1,\"x\"]");
    }

    #[test]
    fn decode_error_envelope_carries_location() {
        let err = Error::new(ErrorKind::Decode)
            .with_message("invalid json (syntax)")
            .with_path("doc.json")
            .with_position(1, 7)
            .with_offset(6)
            .with_context("{\"a\": <HERE>}");
        let value = error_json(&err);
        assert_eq!(value["error"]["kind"], "Decode");
        assert_eq!(value["error"]["line"], 1);
        assert_eq!(value["error"]["column"], 7);
        assert_eq!(value["error"]["offset"], 6);
        assert_eq!(value["error"]["context"], "{\"a\": <HERE>}");

        let text = error_text(&err, false);
        assert!(text.starts_with("error: invalid json (syntax)"));
        assert!(text.contains("input: doc.json:1:7"));
        assert!(text.contains("context: {\"a\": <HERE>}"));
    }
}
