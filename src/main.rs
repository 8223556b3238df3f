//! CLI entry point for space-traveling

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use space_traveling::{commands, server, SpaceTraveling};

#[derive(Parser)]
#[command(name = "space-traveling")]
#[command(version)]
#[command(about = "Renders Space Traveling blog posts from a Prismic repository", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
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
    /// Serve post pages, generating unknown posts on first request
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// Write every known post to the public folder
    #[command(alias = "g")]
    Generate,

    /// List the identifiers of every known post
    List,

    /// Print the HTML page of one post
    Render {
        /// Post identifier (slug)
        slug: String,
    },

    /// Clean the public folder
    Clean,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "space_traveling=debug,info"
    } else {
        "space_traveling=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Server { port, ip } => {
            let app = SpaceTraveling::new(&base_dir)?;
            let generator = Arc::new(app.generator()?);

            tracing::info!("Starting server at http://{}:{}", ip, port);
            server::start(generator, app.public_dir.clone(), &ip, port).await?;
        }

        Commands::Generate => {
            let app = SpaceTraveling::new(&base_dir)?;
            tracing::info!("Generating post pages...");
            app.generate().await?;
            println!("Generated successfully!");
        }

        Commands::List => {
            let app = SpaceTraveling::new(&base_dir)?;
            commands::list::run(&app).await?;
        }

        Commands::Render { slug } => {
            let app = SpaceTraveling::new(&base_dir)?;
            commands::render::run(&app, &slug).await?;
        }

        Commands::Clean => {
            let app = SpaceTraveling::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            app.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Version => {
            println!("space-traveling version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
