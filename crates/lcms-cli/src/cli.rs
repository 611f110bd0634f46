use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "lcms", about = "Landing CMS administration", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Data directory; overrides the config file
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `lcms_store=trace`
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create, edit, and delete landings
    #[command(subcommand)]
    Landing(LandingCommand),
    /// Show or replace the navigation menu
    #[command(subcommand)]
    Menu(MenuCommand),
    /// Manage the shared resource library
    #[command(subcommand)]
    Resource(ResourceCommand),
}

#[derive(Subcommand)]
pub enum LandingCommand {
    /// List every landing from the index
    List,
    /// Show one landing document
    Show { id: String },
    /// Create a landing and link it into the menu
    Create(CreateArgs),
    /// Update a landing and relabel its menu nodes
    Update(UpdateArgs),
    /// Delete a landing and unlink it from the menu
    Delete { id: String },
}

#[derive(Args)]
pub struct CreateArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub slug: String,
    /// Menu category to link the landing under
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub featured: bool,
}

#[derive(Args)]
pub struct UpdateArgs {
    pub id: String,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub slug: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub featured: Option<bool>,
    /// JSON file holding the full replacement `content` object
    #[arg(long)]
    pub content: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum MenuCommand {
    Show,
    /// Replace the menu with the JSON forest in FILE
    Replace { file: PathBuf },
}

#[derive(Subcommand)]
pub enum ResourceCommand {
    List,
    /// Add a resource, or replace the one with the same id
    Upsert(UpsertArgs),
    Delete { id: String },
}

#[derive(Args)]
pub struct UpsertArgs {
    /// Existing id to replace; a new id is assigned when omitted
    #[arg(long)]
    pub id: Option<String>,
    #[arg(long)]
    pub title: String,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long, default_value = "")]
    pub url: String,
    #[arg(long, default_value = "")]
    pub button_text: String,
}
