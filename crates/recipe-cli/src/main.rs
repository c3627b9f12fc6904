mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{
    config::ConfigSubcommand,
    play::PlayArgs,
    step::{CookSubcommand, IngredientSubcommand, PrepSubcommand, StepSubcommand},
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "recipe",
    about = "Recipe library with a step-by-step cooking walkthrough",
    version,
    propagate_version = true
)]
struct Cli {
    /// Library root (default: auto-detect from .recipes/, then the home directory)
    #[arg(long, global = true, env = "RECIPE_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a recipe library
    Init,

    /// Create an empty recipe
    Create {
        slug: String,
        /// Display title (defaults to the slug)
        #[arg(long, num_args = 1..)]
        title: Option<Vec<String>>,
    },

    /// List recipes in the library
    List,

    /// Show a recipe's steps
    Show {
        slug: String,
        /// Scale ingredient quantities, e.g. 2 or 0.5
        #[arg(long, short = 'm')]
        multiplier: Option<String>,
    },

    /// Delete a recipe
    Delete { slug: String },

    /// Change a recipe's title
    Rename {
        slug: String,
        #[arg(required = true)]
        title: Vec<String>,
    },

    /// Export a recipe as JSON for sharing
    Export { slug: String, path: PathBuf },

    /// Import an exported recipe into the library
    Import { path: PathBuf },

    /// Manage ingredients
    Ingredient {
        #[command(subcommand)]
        subcommand: IngredientSubcommand,
    },

    /// Manage prep steps
    Prep {
        #[command(subcommand)]
        subcommand: PrepSubcommand,
    },

    /// Manage cooking steps
    Cook {
        #[command(subcommand)]
        subcommand: CookSubcommand,
    },

    /// Edit steps of any category
    Step {
        #[command(subcommand)]
        subcommand: StepSubcommand,
    },

    /// Show, validate and change walkthrough settings
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Walk through a recipe step by step, reading commands from stdin
    Play(PlayArgs),
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Play(_) => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root, cli.json),
        Commands::Create { slug, title } => {
            let title = title.map(|t| t.join(" "));
            cmd::recipe::create(&root, &slug, title.as_deref(), cli.json)
        }
        Commands::List => cmd::recipe::list(&root, cli.json),
        Commands::Show { slug, multiplier } => {
            cmd::recipe::show(&root, &slug, multiplier.as_deref(), cli.json)
        }
        Commands::Delete { slug } => cmd::recipe::delete(&root, &slug, cli.json),
        Commands::Rename { slug, title } => {
            cmd::recipe::rename(&root, &slug, &title.join(" "), cli.json)
        }
        Commands::Export { slug, path } => cmd::recipe::export(&root, &slug, &path, cli.json),
        Commands::Import { path } => cmd::recipe::import(&root, &path, cli.json),
        Commands::Ingredient { subcommand } => {
            cmd::step::run_ingredient(&root, subcommand, cli.json)
        }
        Commands::Prep { subcommand } => cmd::step::run_prep(&root, subcommand, cli.json),
        Commands::Cook { subcommand } => cmd::step::run_cook(&root, subcommand, cli.json),
        Commands::Step { subcommand } => cmd::step::run(&root, subcommand, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
        Commands::Play(args) => cmd::play::run(&root, args, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
