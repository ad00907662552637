use anyhow::Result;
use clap::{Parser, Subcommand};
use graphql_labs::labs::{hidden_endpoint, private_fields, private_posts};
use graphql_labs::server;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(short, long, global = true)]
    log_level: Option<String>,
    /// Allowed CORS origin; permissive when omitted
    #[clap(long, global = true)]
    cors_origin: Option<String>,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// IDOR lab: unpublished blog posts reachable by id
    PrivatePosts {
        #[clap(short, long, default_value = "3000")]
        port: u16,
    },
    /// Field exposure lab: the User type leaks password and isAdmin
    PrivateFields {
        #[clap(short, long, default_value = "4000")]
        port: u16,
    },
    /// Hidden endpoint lab: unadvertised /api with a naive introspection block
    HiddenEndpoint {
        #[clap(short, long, default_value = "3000")]
        port: u16,
    },
    /// Run all three labs on consecutive ports
    All {
        #[clap(long, default_value = "3000")]
        base_port: u16,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli.log_level);

    let cors_origin = cli.cors_origin.as_deref();
    match cli.command {
        Command::PrivatePosts { port } => {
            let app = private_posts::app(cors_origin)?;
            server::serve(app, private_posts::SERVICE, port).await
        }
        Command::PrivateFields { port } => {
            let app = private_fields::app(cors_origin)?;
            server::serve(app, private_fields::SERVICE, port).await
        }
        Command::HiddenEndpoint { port } => {
            let app = hidden_endpoint::app(cors_origin)?;
            server::serve(app, hidden_endpoint::SERVICE, port).await
        }
        Command::All { base_port } => server::run_all(base_port, cors_origin).await,
    }
}

fn setup_logging(log_level: &Option<String>) {
    let log_level = match log_level
        .as_ref()
        .unwrap_or(&"info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("handlebars=off,{}", log_level)))
        .without_time()
        .init();
}
