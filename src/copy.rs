use thiserror::Error;
use tracing::{debug, error, info};

use crate::docker::ContainerEngine;
use crate::reference::{Image, Reference};

/// Error aborting a whole run. Per-tag transfer failures do not abort the
/// run and are collected in the [`CopyReport`] instead.
#[derive(Debug, Error)]
pub enum CopyError {
    #[error("source repository {repository} does not exist or is unreachable")]
    SourceNotFound {
        repository: Reference,
        #[source]
        source: anyhow::Error,
    },
}

/// One pending copy: a source image and the destination it maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedCopy {
    pub source: Image,
    pub destination: Image,
}

/// A pull/tag/push failure for a single tag, carrying the offending image.
#[derive(Debug)]
pub struct TransferError {
    pub image: Image,
    pub cause: anyhow::Error,
}

/// Outcome of one run: every planned copy plus the per-tag failures.
#[derive(Debug, Default)]
pub struct CopyReport {
    pub planned: Vec<PlannedCopy>,
    pub failed: Vec<TransferError>,
}

/// Copies every tag of `source` to `destination`.
///
/// Tags are resolved at invocation time and processed one at a time. With
/// `apply` unset each planned copy is only reported. A failing tag is
/// recorded and the remaining tags are still attempted; tags already copied
/// are not rolled back.
pub async fn copy_repository<E: ContainerEngine>(
    engine: &E,
    source: &Reference,
    destination: &Reference,
    apply: bool,
) -> Result<CopyReport, CopyError> {
    debug!("Collecting tags of {source}");
    let tags = engine
        .list_tags(source)
        .await
        .map_err(|cause| CopyError::SourceNotFound {
            repository: source.clone(),
            source: cause,
        })?;

    if tags.is_empty() {
        info!("Repository {source} has no tags, nothing to copy");
        return Ok(CopyReport::default());
    }

    let mut report = CopyReport::default();
    for tag in tags {
        let planned = PlannedCopy {
            source: source.with_tag(&tag),
            destination: destination.with_tag(&tag),
        };

        if apply {
            match transfer(engine, &planned).await {
                Ok(()) => info!("Copied {} -> {}", planned.source, planned.destination),
                Err(failure) => {
                    error!("Failed to copy {} ({:#})", failure.image, failure.cause);
                    report.failed.push(failure);
                }
            }
        } else {
            info!("{} -> {}", planned.source, planned.destination);
        }
        report.planned.push(planned);
    }

    Ok(report)
}

/// Pull and local-retag failures name the source image, push failures the
/// destination image.
async fn transfer<E: ContainerEngine>(
    engine: &E,
    copy: &PlannedCopy,
) -> Result<(), TransferError> {
    if let Err(cause) = engine.pull(&copy.source).await {
        return Err(TransferError {
            image: copy.source.clone(),
            cause,
        });
    }
    if let Err(cause) = engine.tag(&copy.source, &copy.destination).await {
        return Err(TransferError {
            image: copy.source.clone(),
            cause,
        });
    }
    if let Err(cause) = engine.push(&copy.destination).await {
        return Err(TransferError {
            image: copy.destination.clone(),
            cause,
        });
    }
    Ok(())
}
