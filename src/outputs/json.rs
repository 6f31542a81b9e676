//! JSON persistence for the link store and article files.
//!
//! # Link store
//!
//! A single pretty-printed array of [`MatchedLink`] objects (four-space
//! indent). It is rewritten in full after every archive day by writing a
//! sibling `.tmp` file and renaming it over the store, so a crash mid-write
//! leaves the previous day's store intact.
//!
//! # Article files
//!
//! One compact JSON object per article, created with create-new semantics:
//! an existing file is never overwritten and surfaces as
//! [`std::io::ErrorKind::AlreadyExists`]. A file whose write fails is
//! removed again, since its existence alone marks the article as stored.

use crate::models::{MatchedLink, StoredArticle};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::future::Future;
use std::io;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument, warn};

async fn ensure_parent(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent).await,
        _ => Ok(()),
    }
}

fn to_pretty_json<T: Serialize>(value: &T) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut ser)?;
    Ok(buf)
}

/// Overwrite the link store with `links`.
#[instrument(level = "debug", skip_all, fields(path = %path.display(), count = links.len()))]
pub async fn write_link_store(path: &Path, links: &[MatchedLink]) -> io::Result<()> {
    let json = to_pretty_json(&links)?;
    ensure_parent(path).await?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    fs::write(&tmp, json).await?;
    fs::rename(&tmp, path).await?;
    debug!("Wrote link store");
    Ok(())
}

/// Read every link from the link store.
pub async fn read_link_store(path: &Path) -> io::Result<Vec<MatchedLink>> {
    let raw = fs::read(path).await?;
    Ok(serde_json::from_slice(&raw)?)
}

/// Create `path` and write `article` to it, failing if the file exists.
pub async fn write_article(path: &Path, article: &StoredArticle) -> io::Result<()> {
    let json = serde_json::to_vec(article)?;
    ensure_parent(path).await?;

    create_new_with(path, |mut file| async move {
        file.write_all(&json).await?;
        file.flush().await
    })
    .await
}

/// Create `path` exclusively and hand it to `fill`, removing it if `fill` fails.
async fn create_new_with<F, Fut>(path: &Path, fill: F) -> io::Result<()>
where
    F: FnOnce(fs::File) -> Fut,
    Fut: Future<Output = io::Result<()>>,
{
    let file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await?;

    if let Err(e) = fill(file).await {
        if let Err(cleanup) = fs::remove_file(path).await {
            warn!(path = %path.display(), error = %cleanup, "Failed to remove partial article file");
        }
        return Err(e);
    }
    Ok(())
}
