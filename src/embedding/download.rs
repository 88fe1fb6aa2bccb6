// Model provisioning: resolve a model name to a cached vector file.
//
// Vector files are downloaded from the gensim-data GitHub releases and kept
// under <cache_dir>/models/<name>/<name>.gz so later runs skip the download.
// The cache location is carried by ModelStore rather than process-wide state,
// which lets tests point it at a temporary directory.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use super::registry::{self, ModelInfo};

/// Release download root; each model lives at <base>/<name>/<name>.gz.
pub const DEFAULT_BASE_URL: &str =
    "https://github.com/RaRe-Technologies/gensim-data/releases/download";

/// Returns the default per-user cache directory: ~/.docintegrity
pub fn default_cache_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".docintegrity")
}

/// Where downloaded models live and where they come from.
#[derive(Debug, Clone)]
pub struct ModelStore {
    root: PathBuf,
    base_url: String,
}

impl ModelStore {
    pub fn new(cache_dir: impl AsRef<Path>, base_url: impl Into<String>) -> Self {
        Self {
            root: cache_dir.as_ref().join("models"),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Directory holding one subdirectory per downloaded model.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the cached vector file for a model (it may not exist yet).
    pub fn model_path(&self, info: &ModelInfo) -> PathBuf {
        self.root
            .join(info.name)
            .join(format!("{}.gz", info.name))
    }

    pub fn is_cached(&self, info: &ModelInfo) -> bool {
        self.model_path(info).is_file()
    }

    fn model_url(&self, info: &ModelInfo) -> String {
        format!("{}/{}/{}.gz", self.base_url, info.name, info.name)
    }

    /// Resolve a model name to a local file, downloading it if needed.
    ///
    /// Unknown names fail with `ModelError::InvalidModel` before any I/O.
    pub async fn resolve(&self, name: &str) -> Result<PathBuf> {
        let info = registry::lookup(name)?;
        let path = self.model_path(info);

        if path.is_file() {
            info!(model = name, path = %path.display(), "Using cached model");
            return Ok(path);
        }

        self.download(info).await?;
        Ok(path)
    }

    /// Download a model into the cache, replacing any partial download.
    pub async fn download(&self, info: &ModelInfo) -> Result<()> {
        let path = self.model_path(info);
        let dir = path
            .parent()
            .context("Model path has no parent directory")?;
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create model directory: {}", dir.display()))?;

        println!(
            "Downloading {} (~{} MB)...",
            info.name,
            info.download_bytes / (1024 * 1024)
        );
        download_file(&self.model_url(info), &path, info.download_bytes).await
    }
}

/// Stream a URL to `dest` with a progress bar.
///
/// The body is written to a ".part" sibling first and renamed when complete,
/// so an interrupted download is never mistaken for a cached model.
async fn download_file(url: &str, dest: &Path, size_hint: u64) -> Result<()> {
    let client = reqwest::Client::new();
    let mut response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to download {}", url))?;

    if !response.status().is_success() {
        anyhow::bail!("Download failed with status {}: {}", response.status(), url);
    }

    let total_size = response.content_length().unwrap_or(size_hint);
    let pb = ProgressBar::new(total_size);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("    [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
            .expect("valid template")
            .progress_chars("=> "),
    );

    let partial = partial_path(dest);
    let mut file = File::create(&partial)
        .with_context(|| format!("Failed to create {}", partial.display()))?;

    while let Some(chunk) = response
        .chunk()
        .await
        .context("Failed to read response body")?
    {
        file.write_all(&chunk)
            .with_context(|| format!("Failed to write {}", partial.display()))?;
        pb.inc(chunk.len() as u64);
    }
    file.flush()?;
    drop(file);

    std::fs::rename(&partial, dest)
        .with_context(|| format!("Failed to move download into {}", dest.display()))?;
    pb.finish_and_clear();

    info!("Downloaded {} to {}", url, dest.display());
    Ok(())
}

fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    dest.with_file_name(name)
}
