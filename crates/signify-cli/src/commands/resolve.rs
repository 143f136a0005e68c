//! `signify resolve` -- resolve caption text and print the sequence.
//!
//! # Examples
//!
//! ```text
//! signify resolve "Hello, how are you?"
//! signify resolve --words thank,you --table
//! signify resolve "good morning" --remote
//! ```

use clap::Args;
use comfy_table::{Table, presets::UTF8_FULL};

use signify_types::{Config, ResolveRequest, ResolveResponse};

/// Arguments for `signify resolve`.
#[derive(Args)]
pub struct ResolveArgs {
    /// Caption text (joined with spaces).
    pub text: Vec<String>,

    /// Pre-tokenized words; takes precedence over the text.
    #[arg(long, value_delimiter = ',')]
    pub words: Vec<String>,

    /// Host video identifier echoed back in the response.
    #[arg(long)]
    pub video_id: Option<String>,

    /// Ask the configured backend instead of resolving in-process.
    #[arg(long)]
    pub remote: bool,

    /// Print a table instead of JSON.
    #[arg(long)]
    pub table: bool,
}

impl ResolveArgs {
    fn request(&self) -> ResolveRequest {
        let text = self.text.join(" ");
        ResolveRequest {
            text: (!text.trim().is_empty()).then_some(text),
            words: (!self.words.is_empty()).then(|| self.words.clone()),
            video_id: self.video_id.clone(),
        }
    }
}

pub async fn run(args: ResolveArgs, config: Config) -> anyhow::Result<()> {
    let request = args.request();
    request.validate()?;

    let client = super::resolve_client(&config, args.remote)?;
    let response = client.resolve(&request).await?;

    if args.table {
        println!("{}", render_table(&response));
        if !response.not_found_words.is_empty() {
            println!("not found: {}", response.not_found_words.join(", "));
        }
    } else {
        println!("{}", serde_json::to_string_pretty(&response)?);
    }
    Ok(())
}

fn render_table(response: &ResolveResponse) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(["#", "WORD", "GLOSS", "TYPE", "SOURCE", "URL"]);
    for (i, token) in response.sequence.iter().enumerate() {
        table.add_row([
            (i + 1).to_string(),
            token.source_word.clone(),
            token.gloss.clone(),
            token.media_type.to_string(),
            token.match_source.to_string(),
            token.url.clone(),
        ]);
    }
    table
}
