//! Newsbrief CLI - article summaries and daily AI digests
//!
//! The flows live in lib.rs; this file parses arguments, builds the request records and
//! prints the results.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use newsbrief::schema::DIGEST_TOPICS;
use newsbrief::{logging, ArticleFetchRequest, Config, DigestRequest, Flows, SummarizeRequest};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "newsbrief")]
#[command(author, version, about = "Article summaries and daily AI digests", long_about = None)]
struct Cli {
    /// Path to a newsbrief.toml (defaults to ./newsbrief.toml, then ~/.config/newsbrief/)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Print the raw response record as JSON
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarise article text from a file, the command line, or stdin
    Summarize {
        #[command(flatten)]
        input: TextInput,
        /// Where the article came from
        #[arg(long)]
        url: Option<String>,
    },
    /// Fetch a URL and extract the article's main text
    Fetch {
        url: String,
        /// Summarise the extracted text as well
        #[arg(long)]
        summarize: bool,
    },
    /// Generate a daily digest for the given interests
    Digest {
        /// Interest topic, repeatable
        #[arg(short, long = "interest", required = true)]
        interests: Vec<String>,
        /// Number of articles to cover
        #[arg(short, long, default_value_t = newsbrief::schema::DEFAULT_ARTICLE_COUNT)]
        count: u32,
    },
    /// List the suggested digest topics
    Topics,
}

#[derive(Args)]
#[group(multiple = false)]
struct TextInput {
    /// Read the article from this file
    #[arg(long)]
    file: Option<PathBuf>,
    /// Article text given inline
    #[arg(long)]
    text: Option<String>,
}

impl TextInput {
    fn read(self) -> anyhow::Result<String> {
        if let Some(path) = self.file {
            return Ok(std::fs::read_to_string(path)?);
        }
        if let Some(text) = self.text {
            return Ok(text);
        }
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::configure_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Summarize { input, url } => {
            let flows = load_flows(cli.config.as_deref())?;
            let mut req = SummarizeRequest::new(input.read()?);
            if let Some(url) = url {
                req = req.with_url(url);
            }
            let resp = flows.summarize_article(&req).await?;
            emit(cli.json, &resp, || print_summary(&resp.summary, req.article_url.as_deref()))?;
        }
        Commands::Fetch { url, summarize } => {
            let flows = load_flows(cli.config.as_deref())?;
            let fetched = flows
                .get_article_content(&ArticleFetchRequest::new(url.clone()))
                .await?;
            if summarize {
                let req = SummarizeRequest::new(fetched.article_content).with_url(url.clone());
                let resp = flows.summarize_article(&req).await?;
                emit(cli.json, &resp, || print_summary(&resp.summary, Some(url.as_str())))?;
            } else {
                emit(cli.json, &fetched, || {
                    println!("{}", fetched.article_content);
                    eprintln!(
                        "\n--- Extracted {} characters ---",
                        fetched.article_content.chars().count()
                    );
                })?;
            }
        }
        Commands::Digest { interests, count } => {
            let flows = load_flows(cli.config.as_deref())?;
            let req = DigestRequest::new(interests).with_article_count(count);
            let resp = flows.generate_daily_digest(&req).await?;
            emit(cli.json, &resp, || {
                println!("{}\n", "📰 Daily Digest".bold());
                println!("{}\n", resp.summary);
                println!("{}", "📌 Articles:".bold());
                for title in &resp.articles {
                    println!("  • {}", title);
                }
            })?;
        }
        Commands::Topics => {
            for topic in DIGEST_TOPICS {
                println!("{:<30} {}", topic.id.bold(), topic.label);
            }
        }
    }

    Ok(())
}

fn load_flows(path: Option<&Path>) -> anyhow::Result<Flows> {
    let config = match path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    Ok(Flows::from_config(config)?)
}

fn emit<T: Serialize>(json: bool, value: &T, pretty: impl FnOnce()) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        pretty();
    }
    Ok(())
}

fn print_summary(summary: &str, url: Option<&str>) {
    println!("{}\n", "💡 Summary".bold());
    println!("{}", summary);
    if let Some(url) = url {
        println!("\n{} {}", "🔗".dimmed(), url.underline());
    }
}
