//! Manifest parsing for manifest.yml files

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use srcsync_fs::{NormalizedPath, clean_relative, compute_checksum, io};

use crate::cache_key::{CacheKey, derive_cache_key};
use crate::{Error, Result};

/// Revision used when a repository entry has no `version`
pub const DEFAULT_REVISION: &str = "master";

#[derive(Debug, Deserialize)]
struct RawManifest {
    #[serde(default, alias = "outputDir")]
    output_dir: Option<String>,
    #[serde(default)]
    repos: Option<Vec<RawRepo>>,
}

#[derive(Debug, Deserialize)]
struct RawRepo {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default, alias = "revision")]
    version: Option<String>,
    #[serde(default)]
    copy: Option<Vec<RawCopy>>,
}

#[derive(Debug, Deserialize)]
struct RawCopy {
    #[serde(default)]
    src: Option<String>,
    #[serde(default)]
    dst: Option<String>,
}

/// One extraction rule within a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopySpec {
    /// Glob pattern or literal path relative to the repository root
    pub src: String,
    /// Path relative to the output root; empty means the root itself.
    /// A trailing `/` marks a directory target.
    pub dst: String,
}

impl CopySpec {
    pub fn new(src: impl Into<String>, dst: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            dst: dst.into(),
        }
    }
}

impl std::fmt::Display for CopySpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> '{}'", self.src, self.dst)
    }
}

/// One remote source and its copy rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSpec {
    pub url: String,
    /// Branch, tag or commit id
    pub revision: String,
    /// Display name: the manifest `id`, or the cache key
    pub label: String,
    pub cache_key: CacheKey,
    pub copies: Vec<CopySpec>,
}

/// A parsed and validated manifest.
#[derive(Debug, Clone)]
pub struct Manifest {
    path: Option<PathBuf>,
    output_dir: PathBuf,
    repos: Vec<RepoSpec>,
    fingerprint: String,
}

impl Manifest {
    /// Load and validate the manifest at `path`.
    ///
    /// A relative `output_dir` in the file is resolved against the
    /// manifest's own directory. `output_override`, when given, replaces it
    /// and is resolved against the current directory.
    pub fn load(path: &Path, output_override: Option<&Path>) -> Result<Self> {
        let raw = io::read_bytes(&NormalizedPath::new(path))?;

        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let base_dir = dunce::canonicalize(parent).map_err(|e| srcsync_fs::Error::io(parent, e))?;

        let mut manifest = Self::parse(&raw, &base_dir, output_override)?;
        manifest.path = path.file_name().map(|name| base_dir.join(name));
        Ok(manifest)
    }

    /// Parse and validate manifest bytes.
    ///
    /// `base_dir` anchors a relative `output_dir` from the manifest.
    pub fn parse(raw: &[u8], base_dir: &Path, output_override: Option<&Path>) -> Result<Self> {
        let parsed: RawManifest = serde_yaml::from_slice(raw)?;

        let output_dir = match (output_override, parsed.output_dir.as_deref()) {
            (Some(dir), _) => absolutize(&std::env::current_dir()?, dir),
            (None, Some(dir)) if !dir.trim().is_empty() => absolutize(base_dir, Path::new(dir)),
            _ => {
                return Err(Error::malformed(
                    "no output directory: set output_dir in the manifest or pass one explicitly",
                ));
            }
        };

        let raw_repos = parsed
            .repos
            .ok_or_else(|| Error::malformed("manifest has no 'repos' list"))?;

        let mut repos = Vec::with_capacity(raw_repos.len());
        for (index, raw_repo) in raw_repos.into_iter().enumerate() {
            repos.push(validate_repo(index, raw_repo)?);
        }
        check_shared_checkouts(&repos)?;

        Ok(Self {
            path: None,
            output_dir,
            repos,
            fingerprint: compute_checksum(raw),
        })
    }

    /// Absolute path of the manifest file, when loaded from disk.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Absolute, normalized output directory.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn repos(&self) -> &[RepoSpec] {
        &self.repos
    }

    /// `sha256:<hex>` over the raw manifest bytes.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

fn absolutize(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };
    NormalizedPath::new(joined).to_native()
}

fn validate_repo(index: usize, raw: RawRepo) -> Result<RepoSpec> {
    let url = raw
        .url
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .ok_or_else(|| Error::malformed(format!("repos[{}]: missing 'url'", index)))?;

    let cache_key = derive_cache_key(&url)?;

    let revision = match raw.version {
        Some(version) if version.trim().is_empty() => {
            return Err(Error::malformed(format!(
                "repos[{}] ({}): 'version' is empty",
                index, url
            )));
        }
        Some(version) => version.trim().to_string(),
        None => DEFAULT_REVISION.to_string(),
    };

    let raw_copies = raw.copy.ok_or_else(|| {
        Error::malformed(format!("repos[{}] ({}): missing 'copy' list", index, url))
    })?;

    let mut copies = Vec::with_capacity(raw_copies.len());
    for (copy_index, raw_copy) in raw_copies.into_iter().enumerate() {
        let context = format!("repos[{}].copy[{}]", index, copy_index);

        let src = raw_copy
            .src
            .filter(|src| !src.is_empty())
            .ok_or_else(|| Error::malformed(format!("{}: missing 'src'", context)))?;
        if clean_relative(&src).is_none() {
            return Err(Error::malformed(format!(
                "{}: src '{}' must stay inside the repository",
                context, src
            )));
        }

        let dst = raw_copy.dst.unwrap_or_default();
        if clean_relative(&dst).is_none() {
            return Err(Error::malformed(format!(
                "{}: dst '{}' must stay inside the output directory",
                context, dst
            )));
        }

        copies.push(CopySpec { src, dst });
    }

    let label = raw
        .id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| cache_key.to_string());

    Ok(RepoSpec {
        url,
        revision,
        label,
        cache_key,
        copies,
    })
}

/// Repositories sharing a cache key share one checkout, so they must agree
/// on the revision checked out there.
fn check_shared_checkouts(repos: &[RepoSpec]) -> Result<()> {
    let mut revisions: HashMap<&CacheKey, &str> = HashMap::new();
    for repo in repos {
        match revisions.get(&repo.cache_key) {
            Some(existing) if *existing != repo.revision => {
                return Err(Error::malformed(format!(
                    "{} is listed at both '{}' and '{}'; one checkout cannot hold two revisions",
                    repo.cache_key, existing, repo.revision
                )));
            }
            Some(_) => {}
            None => {
                revisions.insert(&repo.cache_key, &repo.revision);
            }
        }
    }
    Ok(())
}
