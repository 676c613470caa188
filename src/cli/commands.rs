use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "td", about = concat!("td v", env!("CARGO_PKG_VERSION"), " - pick tags, submit only what changed"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different session directory
    #[arg(short = 'C', long = "dir", global = true)]
    pub dir: Option<String>,

    /// Suggestion rules file (default: <dir>/tagdelta.toml if present)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Only print warnings and errors on stderr
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an edit session seeded with the record's persisted tags
    Open(OpenArgs),
    /// Add a tag to the selection
    Add(AddArgs),
    /// Remove a tag from the selection
    Rm(RmArgs),
    /// Show the selection and the pending delta
    Show,
    /// Set (or clear) a form field used for suggestions
    Field(FieldArgs),
    /// Suggest tags from the session's form fields
    Suggest(SuggestArgs),
    /// Print the encoded submission payload
    Payload,
    /// Submit: print the payload, apply it, and start over on the result
    Submit,
    /// Abandon the session without submitting
    Close,
    /// Apply a payload to a persisted tag list (server side of submit)
    Apply(ApplyArgs),
}

#[derive(Args)]
pub struct OpenArgs {
    /// Persisted tags (`growth`, `#growth`, or `"#a #b"`)
    pub tags: Vec<String>,
    /// Persisted tags as one free-text string, e.g. "#7203トヨタ #高配当"
    #[arg(long = "tags")]
    pub tag_string: Option<String>,
    /// Discard an existing session
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct AddArgs {
    /// Tag to add (`#` is added if missing)
    pub tag: String,
}

#[derive(Args)]
pub struct RmArgs {
    /// Tag to remove
    pub tag: String,
}

#[derive(Args)]
pub struct FieldArgs {
    /// Field name (e.g. content, status, stock_code, company_name)
    pub key: String,
    /// New value; omit to clear the field
    pub value: Option<String>,
}

#[derive(Args)]
pub struct SuggestArgs {
    /// Override a field for this call only: --field KEY=VALUE (repeatable)
    #[arg(long = "field", value_parser = parse_key_val, action = clap::ArgAction::Append)]
    pub fields: Vec<(String, String)>,
}

#[derive(Args)]
pub struct ApplyArgs {
    /// The record's persisted tags, e.g. "#growth #tech"
    #[arg(long, default_value = "")]
    pub persisted: String,
    /// Encoded payload as printed by `td payload`
    pub payload: String,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty field name in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}
