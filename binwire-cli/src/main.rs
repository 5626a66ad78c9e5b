//! binwire CLI

use anyhow::{Context, Result};
use binwire_config::{env_defaults, load_config, Config};
use binwire_core::{endpoint_fn, Body, Bytes, Entity, Request, ResponseBuilder, StatusCode};
use binwire_middleware::{classify_response, MiddlewareBuilder};
use clap::{Parser, Subcommand, ValueEnum};
use http_body_util::BodyExt;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "binwire")]
#[command(about = "Binary response encoding policy", long_about = None)]
#[command(version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate configuration file
    Validate {
        /// Path to configuration file
        #[arg(short, long, default_value = "binwire.yaml")]
        config: PathBuf,
    },

    /// Run a synthetic response through the encoding stack and show the result
    Explain {
        /// Path to configuration file (defaults apply when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Kind of entity the endpoint returns
        #[arg(short, long, value_enum, default_value_t = EntityArg::Bytes)]
        entity: EntityArg,

        /// Entity payload
        #[arg(short, long, default_value = "binary")]
        body: String,

        /// Declared charset for stream entities
        #[arg(long)]
        charset: Option<String>,

        /// Accept-Encoding request header
        #[arg(short, long)]
        accept_encoding: Option<String>,

        /// Override the binary-compression-only policy flag
        #[arg(long)]
        binary_compression_only: Option<bool>,
    },

    /// Show version information
    Version,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum EntityArg {
    Bytes,
    Stream,
    Text,
    Json,
    Form,
    Empty,
}

#[derive(Serialize)]
struct Explanation {
    status: u16,
    representation: String,
    headers: BTreeMap<String, String>,
    body_size: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    match cli.command {
        Commands::Validate { config } => {
            tracing::info!("Validating configuration: {}", config.display());

            match load_config(&config) {
                Ok(cfg) => {
                    tracing::info!("Configuration is valid");
                    tracing::info!(
                        "  binary_compression_only: {}",
                        cfg.binary_response.binary_compression_only
                    );
                    tracing::info!("  compression enabled: {}", cfg.compression.enabled);
                    Ok(())
                }
                Err(e) => {
                    tracing::error!("Configuration validation failed: {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Explain {
            config,
            entity,
            body,
            charset,
            accept_encoding,
            binary_compression_only,
        } => {
            let mut cfg = match config {
                Some(path) => load_config(&path)
                    .with_context(|| format!("loading {}", path.display()))?,
                None => env_defaults(),
            };
            if let Some(flag) = binary_compression_only {
                cfg.binary_response.binary_compression_only = flag;
            }

            let explanation = explain(cfg, entity, body, charset, accept_encoding).await?;
            println!("{}", serde_json::to_string_pretty(&explanation)?);
            Ok(())
        }

        Commands::Version => {
            println!("binwire");
            println!("Version: {}", env!("CARGO_PKG_VERSION"));
            println!("Rust version: {}", env!("CARGO_PKG_RUST_VERSION"));
            Ok(())
        }
    }
}

fn build_entity(kind: EntityArg, body: String, charset: Option<String>) -> Result<Entity> {
    let entity = match kind {
        EntityArg::Bytes => Entity::Bytes(Bytes::from(body)),
        EntityArg::Stream => Entity::from_reader(body.as_bytes(), charset.as_deref())?,
        EntityArg::Text => Entity::Text(body),
        EntityArg::Json => Entity::Json(serde_json::from_str(&body).context("parsing JSON body")?),
        EntityArg::Form => Entity::Form(
            body.split('&')
                .filter_map(|pair| pair.split_once('='))
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ),
        EntityArg::Empty => Entity::Empty,
    };
    Ok(entity)
}

async fn explain(
    config: Config,
    kind: EntityArg,
    body: String,
    charset: Option<String>,
    accept_encoding: Option<String>,
) -> Result<Explanation> {
    let entity = build_entity(kind, body, charset)?;
    let endpoint = endpoint_fn(move |_req| {
        let entity = entity.clone();
        async move { ResponseBuilder::new(StatusCode::OK).entity(entity) }
    });

    let pipeline = MiddlewareBuilder::new()
        .with_binary_response_encoding(config.binary_response, config.compression)
        .build_pipeline(Arc::new(endpoint));

    let mut request = Request::builder().uri("/explain");
    if let Some(accept) = accept_encoding {
        request = request.header(http::header::ACCEPT_ENCODING, accept);
    }
    let response = pipeline.handle(request.body(Body::from(""))?).await?;

    let representation = classify_response(&response).to_string();
    let headers = response
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    let status = response.status().as_u16();
    let body_size = response.into_body().collect().await?.to_bytes().len();

    Ok(Explanation {
        status,
        representation,
        headers,
        body_size,
    })
}

fn init_tracing(level: &str) -> Result<()> {
    let filter = match level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr),
        )
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(filter.into()))
        .init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_form_entity() {
        let entity = build_entity(EntityArg::Form, "a=1&b=2".to_string(), None).unwrap();
        assert_eq!(
            entity,
            Entity::Form(vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string())
            ])
        );
    }

    #[tokio::test]
    async fn test_explain_binary_gzip() {
        let explanation = explain(
            Config::default(),
            EntityArg::Bytes,
            "binary".to_string(),
            None,
            Some("gzip".to_string()),
        )
        .await
        .unwrap();

        assert_eq!(explanation.status, 200);
        assert_eq!(explanation.representation, "binary");
        assert_eq!(explanation.headers.get("content-encoding").unwrap(), "gzip");
        assert_eq!(
            explanation.headers.get("x-binwire-binary-response").unwrap(),
            "true"
        );
    }

    #[tokio::test]
    async fn test_explain_text_veto() {
        let explanation = explain(
            Config::default(),
            EntityArg::Text,
            "non-binary".to_string(),
            None,
            Some("gzip".to_string()),
        )
        .await
        .unwrap();

        assert_eq!(explanation.representation, "text");
        assert!(!explanation.headers.contains_key("content-encoding"));
        assert_eq!(explanation.body_size, "non-binary".len());
    }
}
