use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use lazy_static::lazy_static;
use reqwest::Client;
use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, instrument};

use crate::reference::{Image, Reference};

lazy_static! {
    static ref CLIENT: Client = Client::new();
}

/// Registry used for references without a registry component.
const DEFAULT_REGISTRY: &str = "registry-1.docker.io";

/// The operations the copy workflow needs from a container engine.
///
/// Keeping the engine behind this trait lets the workflow run against an
/// in-memory engine in tests instead of a live registry.
#[async_trait]
pub trait ContainerEngine {
    async fn list_tags(&self, repository: &Reference) -> Result<Vec<String>>;
    async fn pull(&self, image: &Image) -> Result<()>;
    async fn tag(&self, source: &Image, destination: &Image) -> Result<()>;
    async fn push(&self, image: &Image) -> Result<()>;
}

/// Engine backed by the registry HTTP API for tag listing and the local
/// `docker` binary for pull/tag/push. Registry and engine authentication are
/// whatever the local docker configuration provides.
#[derive(Debug, Default)]
pub struct Docker;

#[async_trait]
impl ContainerEngine for Docker {
    #[instrument(skip(self))]
    async fn list_tags(&self, repository: &Reference) -> Result<Vec<String>> {
        #[derive(Debug, Deserialize)]
        struct Response {
            tags: Option<Vec<String>>,
        }

        let registry = repository.registry().unwrap_or(DEFAULT_REGISTRY);
        let response: Response = CLIENT
            .get(format!(
                "https://{registry}/v2/{}/tags/list",
                repository.repository()
            ))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response.tags.unwrap_or_default())
    }

    #[instrument(skip(self))]
    async fn pull(&self, image: &Image) -> Result<()> {
        run_docker(&["pull", &image.to_string()]).await
    }

    #[instrument(skip(self))]
    async fn tag(&self, source: &Image, destination: &Image) -> Result<()> {
        run_docker(&["tag", &source.to_string(), &destination.to_string()]).await
    }

    #[instrument(skip(self))]
    async fn push(&self, image: &Image) -> Result<()> {
        run_docker(&["push", &image.to_string()]).await
    }
}

async fn run_docker(args: &[&str]) -> Result<()> {
    debug!("docker {}", args.join(" "));
    let status = Command::new("docker")
        .args(args)
        .status()
        .await
        .context("failed to spawn docker, is it installed?")?;

    if !status.success() {
        bail!("docker {} exited with {status}", args[0]);
    }
    Ok(())
}
