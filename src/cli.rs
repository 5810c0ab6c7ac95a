use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "storefront",
    version,
    about = "CSV order import into the storefront database"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Import(ImportArgs),
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ImportArgs {
    #[arg(long, default_value = ".cache/storefront")]
    pub cache_root: PathBuf,

    #[arg(long, default_value = "orders.csv")]
    pub input: PathBuf,

    #[arg(long)]
    pub db_path: Option<PathBuf>,

    #[arg(long)]
    pub report_path: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long, default_value = ".cache/storefront")]
    pub cache_root: PathBuf,

    #[arg(long)]
    pub db_path: Option<PathBuf>,
}
