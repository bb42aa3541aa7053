//! CLI entry point for the cinegraph client.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

use cinegraph_core::{Credentials, MovieSelector, Node, Relationship, UserSelector};
use cinegraph_graph::{GraphClient, GraphConfig, Outcome};

use cinegraph_cli::args::parse_properties;

#[derive(Parser)]
#[command(name = "cinegraph")]
#[command(about = "Create and query users, movies, and ratings in Neo4j")]
struct Cli {
    /// Read credentials from a NEO4J_URI= / NEO4J_USERNAME= / NEO4J_PASSWORD= file.
    #[arg(long)]
    auth_file: Option<PathBuf>,

    /// Config file prefix (default: cinegraph).
    #[arg(short, long, default_value = "cinegraph")]
    config: String,

    /// Target database (server default if omitted).
    #[arg(long)]
    database: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a node.
    CreateNode {
        /// Label; repeat for several.
        #[arg(short, long = "label", required = true)]
        labels: Vec<String>,

        /// Property as key=value; repeat for several.
        #[arg(short, long = "prop")]
        props: Vec<String>,

        /// Property used to match this node later (default: first --prop).
        #[arg(long)]
        key: Option<String>,
    },

    /// Create a relationship between two existing nodes.
    Relate {
        #[arg(long = "from-label", required = true)]
        from_labels: Vec<String>,

        /// Match property of the source node as key=value.
        #[arg(long = "from", required = true)]
        from_props: Vec<String>,

        #[arg(long = "to-label", required = true)]
        to_labels: Vec<String>,

        /// Match property of the target node as key=value.
        #[arg(long = "to", required = true)]
        to_props: Vec<String>,

        /// Relationship type, e.g. RATED.
        #[arg(short = 't', long = "type")]
        rel_type: String,

        #[arg(short, long = "prop")]
        props: Vec<String>,
    },

    /// Find users by id or name.
    FindUser {
        #[arg(long)]
        id: Option<i64>,
        #[arg(long)]
        name: Option<String>,
    },

    /// Find movies by id or title.
    FindMovie {
        #[arg(long)]
        id: Option<i64>,
        #[arg(long)]
        title: Option<String>,
    },

    /// Find the rating a user gave a movie.
    FindRating {
        #[arg(long)]
        user_id: i64,
        #[arg(long)]
        movie_id: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();

    let credentials = match &cli.auth_file {
        Some(path) => Credentials::from_auth_file(path)?,
        None => Credentials::load(&cli.config)?,
    };
    let graph_config = GraphConfig {
        database: cli.database.clone(),
        ..GraphConfig::from(credentials)
    };
    let client = GraphClient::connect(&graph_config).await?;

    match cli.command {
        Command::CreateNode { labels, props, key } => {
            let mut builder = Node::builder()
                .labels(labels)
                .properties(parse_properties(&props)?);
            if let Some(key) = key {
                builder = builder.key(key);
            }
            let node = builder.build()?;
            let ack = cinegraph_graph::create_node(&client, &node).await?;
            print_json(&ack)?;
        }
        Command::Relate {
            from_labels,
            from_props,
            to_labels,
            to_props,
            rel_type,
            props,
        } => {
            let from = Node::new(from_labels, Some(parse_properties(&from_props)?))?;
            let to = Node::new(to_labels, Some(parse_properties(&to_props)?))?;
            let rel = Relationship::builder(rel_type)
                .from(&from)
                .to(&to)
                .properties(parse_properties(&props)?)
                .build()?;
            let outcome = cinegraph_graph::create_relationship(&client, &rel).await?;
            report(outcome)?;
        }
        Command::FindUser { id, name } => {
            let selector = UserSelector::from_parts(id, name.as_deref())?;
            report(cinegraph_graph::find_user(&client, selector).await?)?;
        }
        Command::FindMovie { id, title } => {
            let selector = MovieSelector::from_parts(id, title.as_deref())?;
            report(cinegraph_graph::find_movie(&client, selector).await?)?;
        }
        Command::FindRating { user_id, movie_id } => {
            report(cinegraph_graph::find_user_rating(&client, user_id, movie_id).await?)?;
        }
    }

    Ok(())
}

fn report<T: Serialize>(outcome: Outcome<T>) -> anyhow::Result<()> {
    match outcome {
        Outcome::Found(value) => print_json(&value),
        Outcome::NotFound(nf) => {
            tracing::info!(entity = %nf.entity, criteria = ?nf.criteria, "No match");
            println!("{nf}");
            Ok(())
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
