use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

use mdsite::{Config, Site};

#[derive(Parser)]
#[command(name = "mdsite")]
#[command(about = "Build a static HTML site from a tree of Markdown files")]
struct Cli {
    /// Site root; every other path is resolved against it
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    /// Config file, relative to the root
    #[arg(short, long, default_value = "mdsite.toml")]
    config: PathBuf,

    /// Markdown content directory
    #[arg(long)]
    content: Option<PathBuf>,

    /// Static assets directory
    #[arg(long = "static")]
    static_dir: Option<PathBuf>,

    /// Output directory (replaced on every build)
    #[arg(long)]
    public: Option<PathBuf>,

    /// HTML template file
    #[arg(long)]
    template: Option<PathBuf>,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let mut config = match Config::load(&cli.root.join(&cli.config)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    // Command-line flags win over the config file
    if let Some(content) = cli.content {
        config.site.content_dir = content;
    }
    if let Some(static_dir) = cli.static_dir {
        config.site.static_dir = static_dir;
    }
    if let Some(public) = cli.public {
        config.site.public_dir = public;
    }
    if let Some(template) = cli.template {
        config.site.template = template;
    }

    let site = Site::new(cli.root, config);
    match site.build() {
        Ok(pages) => println!(
            "Built {} page(s) into {}",
            pages,
            site.root().join(&site.config().site.public_dir).display()
        ),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
