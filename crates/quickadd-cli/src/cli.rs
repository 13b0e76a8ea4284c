use chrono::NaiveDateTime;
use clap::{Args, Parser, Subcommand};
use quickadd_domain::TokenKind;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "quickadd")]
#[command(about = "Turn quick-add text into structured task fields", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a config file (or set QUICKADD_CONFIG env var)
    #[arg(long, global = true, value_name = "FILE", env = "QUICKADD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the debounce delay in milliseconds
    #[arg(long, global = true, value_name = "MS")]
    pub debounce_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse one line of text and print the result
    Parse(ParseArgs),
    /// Replay an editing script and print the resulting draft
    Session(SessionArgs),
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Args)]
pub struct ContextArgs {
    /// Reference time for relative dates, e.g. 2024-05-08T09:00 (defaults to local now)
    #[arg(long, value_name = "DATETIME", value_parser = parse_datetime)]
    pub now: Option<NaiveDateTime>,

    /// JSON file listing known projects and labels (or set QUICKADD_DIRECTORY env var)
    #[arg(long, value_name = "FILE", env = "QUICKADD_DIRECTORY")]
    pub directory: Option<PathBuf>,
}

#[derive(Args)]
pub struct ParseArgs {
    /// Text to parse
    pub text: String,

    #[command(flatten)]
    pub context: ContextArgs,

    /// Token kind to ignore (repeatable)
    #[arg(long = "disable", value_name = "KIND")]
    pub disabled: Vec<TokenKind>,

    /// Caret byte offset; a project or label ending there is treated as still being typed
    #[arg(long)]
    pub caret: Option<usize>,
}

#[derive(Args)]
pub struct SessionArgs {
    #[command(flatten)]
    pub context: ContextArgs,

    /// Script file, one command per line (reads stdin when omitted)
    #[arg(long, value_name = "FILE")]
    pub script: Option<PathBuf>,
}

fn parse_datetime(value: &str) -> Result<NaiveDateTime, String> {
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| format!("expected YYYY-MM-DDTHH:MM, got '{}'", value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_datetime_formats() {
        let expected = chrono::NaiveDate::from_ymd_opt(2024, 5, 8)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        assert_eq!(parse_datetime("2024-05-08T09:30").unwrap(), expected);
        assert_eq!(parse_datetime("2024-05-08T09:30:00").unwrap(), expected);
        assert_eq!(parse_datetime("2024-05-08 09:30").unwrap(), expected);
        assert_eq!(
            parse_datetime("2024-05-08").unwrap(),
            expected.date().and_hms_opt(0, 0, 0).unwrap()
        );
        assert!(parse_datetime("yesterday").is_err());
    }
}
