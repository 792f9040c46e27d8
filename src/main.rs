//! CLI entry point for quire

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quire::commands::new::NewArticle;

#[derive(Parser)]
#[command(name = "quire")]
#[command(version)]
#[command(about = "A small MDX-backed blog site", long_about = None)]
struct Cli {
    /// Set the site directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new site with sample articles
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new article
    New {
        /// Title of the new article
        title: String,

        /// File name without extension (defaults to the slugified title)
        #[arg(short, long)]
        slug: Option<String>,

        /// Author (defaults to the site author)
        #[arg(short, long)]
        author: Option<String>,

        /// Short description shown on article cards
        #[arg(long)]
        description: Option<String>,

        /// Category
        #[arg(long)]
        category: Option<String>,

        /// Tag, may be repeated
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },

    /// List site information
    List {
        /// What to list (articles, featured, tags, categories)
        #[arg(default_value = "articles")]
        r#type: String,
    },

    /// Print one article
    Show {
        /// Article slug (file name without extension)
        slug: String,
    },

    /// Start the web server
    #[command(alias = "s")]
    Server {
        /// Port to listen on (defaults to server.port in _config.yml)
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to (defaults to server.ip in _config.yml)
        #[arg(short, long)]
        ip: Option<String>,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "quire=debug,info"
    } else {
        "quire=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing site in {:?}", target_dir);
            quire::commands::init::init_site(&target_dir)?;
            println!("Initialized site in {:?}", target_dir);
        }

        Commands::New {
            title,
            slug,
            author,
            description,
            category,
            tags,
        } => {
            let site = quire::Site::new(&base_dir)?;
            tracing::info!("Creating new article with title: {}", title);
            let article = NewArticle {
                title,
                slug,
                description,
                author,
                category,
                tags,
                image: None,
            };
            quire::commands::new::create_article(&site, &article)?;
        }

        Commands::List { r#type } => {
            let site = quire::Site::new(&base_dir)?;
            quire::commands::list::run(&site, &r#type)?;
        }

        Commands::Show { slug } => {
            let site = quire::Site::new(&base_dir)?;
            quire::commands::show::run(&site, &slug)?;
        }

        Commands::Server { port, ip, open } => {
            let site = quire::Site::new(&base_dir)?;
            let ip = ip.unwrap_or_else(|| site.config.server.ip.clone());
            let port = port.unwrap_or(site.config.server.port);

            tracing::info!("Starting server at http://{}:{}", ip, port);
            quire::server::start(&site, &ip, port, open).await?;
        }

        Commands::Version => {
            println!("quire version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
