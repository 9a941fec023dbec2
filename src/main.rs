use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use moviegraph::db::{migrate, Db, MovieRepository};
use moviegraph::http::HttpServer;
use moviegraph::model::parse_movie_records;
use moviegraph::{Config, GraphService};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "moviegraph")]
#[command(about = "Movie/person graph: traversal and shortest-path queries over a movie store")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the graph API over HTTP
    Serve,
    /// Import movie records from a JSON file (array of movies)
    Import {
        file: PathBuf,
    },
    /// Print the diagnostic graph dump
    Dump,
    /// Print the shortest path between two nodes
    Path {
        start: String,
        end: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load()?;

    // RUST_LOG wins over the configured level
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", config.moviegraph.log_level.as_str())
    ).init();

    log::info!("Starting MovieGraph v{}", env!("CARGO_PKG_VERSION"));
    let db = Db::new(config.db_path());
    log::info!("Database path: {}", db.path().display());
    db.with_connection(migrate::run_migrations).await?;

    let repo = MovieRepository::new(db);

    match args.command {
        Command::Serve => {
            let service = GraphService::new(repo);
            HttpServer::new(service, config.http_server.clone()).run().await?;
        }
        Command::Import { file } => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read import file: {}", file.display()))?;
            let records = parse_movie_records(&content)
                .with_context(|| format!("Failed to parse movie records from {}", file.display()))?;
            let inserted = repo.import(records).await?;
            println!("Imported {} new movie(s)", inserted);
        }
        Command::Dump => {
            let service = GraphService::new(repo);
            println!("{}", service.graph_string().await?);
        }
        Command::Path { start, end } => {
            let service = GraphService::new(repo);
            let path = service.shortest_path(&start, &end).await?;
            if path.is_empty() {
                println!("No path from '{}' to '{}'", start, end);
            } else {
                println!("{}", path.join(" -> "));
                println!("{} hop(s)", path.len() - 1);
            }
        }
    }

    Ok(())
}
