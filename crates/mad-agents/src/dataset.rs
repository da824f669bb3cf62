//! Question datasets: local snapshots and the Hugging Face datasets-server.
//!
//! Local snapshots are JSONL (one record per line), a JSON array, or a
//! directory holding `data.jsonl`. Hub datasets are read page by page from
//! the datasets-server REST API, which needs no client library or token for
//! public datasets.

use std::io::Write;
use std::path::{Path, PathBuf};

use scoring::QuestionRecord;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::{DatasetSettings, DatasetSource};
use crate::errors::DatasetError;

/// File looked up when a local snapshot path is a directory.
pub const SNAPSHOT_FILE_NAME: &str = "data.jsonl";

/// Rows requested per datasets-server page (the server's maximum).
const HUB_PAGE_SIZE: usize = 100;

/// Ordered, length-known collection of questions.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    name: String,
    records: Vec<QuestionRecord>,
}

impl Dataset {
    pub fn new(name: impl Into<String>, records: Vec<QuestionRecord>) -> Self {
        Self {
            name: name.into(),
            records,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[QuestionRecord] {
        &self.records
    }

    /// Keep only the first `n` records. `None`, 0, or a cap at or beyond
    /// the length keeps everything.
    pub fn select_first(mut self, n: Option<usize>) -> Self {
        if let Some(n) = n.filter(|&n| n > 0 && n < self.records.len()) {
            self.records.truncate(n);
        }
        self
    }

    /// Load whichever source the settings select, applying the cap.
    pub async fn load(settings: &DatasetSettings) -> Result<Self, DatasetError> {
        let dataset = match settings.source {
            DatasetSource::Local => Self::load_local(&settings.local_path)?,
            DatasetSource::Hub => {
                HubClient::new()?
                    .fetch(
                        &settings.hub_name,
                        &settings.hub_config,
                        &settings.hub_split,
                        settings.max_questions,
                    )
                    .await?
            }
        };
        Ok(dataset.select_first(settings.max_questions))
    }

    /// Load a local snapshot.
    pub fn load_local(path: &Path) -> Result<Self, DatasetError> {
        let file = if path.is_dir() {
            path.join(SNAPSHOT_FILE_NAME)
        } else {
            path.to_path_buf()
        };

        let raw = std::fs::read_to_string(&file).map_err(|source| DatasetError::Io {
            path: file.clone(),
            source,
        })?;

        let records = match file.extension().and_then(|e| e.to_str()) {
            Some("jsonl") => parse_jsonl(&file, &raw)?,
            Some("json") => {
                serde_json::from_str(&raw).map_err(|source| DatasetError::InvalidDocument {
                    path: file.clone(),
                    source,
                })?
            }
            _ => return Err(DatasetError::UnsupportedPath(file)),
        };

        info!(path = %file.display(), questions = records.len(), "Loaded local dataset");
        Ok(Self::new(file.display().to_string(), records))
    }

    /// Write the records as a JSONL snapshot, creating parent directories.
    pub fn save_jsonl(&self, path: &Path) -> Result<PathBuf, DatasetError> {
        let file = if path.extension().is_none() {
            path.join(SNAPSHOT_FILE_NAME)
        } else {
            path.to_path_buf()
        };
        let snapshot_err = |source| DatasetError::Snapshot {
            path: file.clone(),
            source,
        };

        if let Some(parent) = file.parent() {
            std::fs::create_dir_all(parent).map_err(snapshot_err)?;
        }

        let mut out = std::io::BufWriter::new(std::fs::File::create(&file).map_err(snapshot_err)?);
        for record in &self.records {
            let line = serde_json::to_string(record).map_err(|source| {
                DatasetError::InvalidDocument {
                    path: file.clone(),
                    source,
                }
            })?;
            writeln!(out, "{}", line).map_err(snapshot_err)?;
        }
        out.flush().map_err(snapshot_err)?;

        info!(path = %file.display(), questions = self.len(), "Saved dataset snapshot");
        Ok(file)
    }
}

fn parse_jsonl(path: &Path, raw: &str) -> Result<Vec<QuestionRecord>, DatasetError> {
    raw.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).map_err(|source| DatasetError::InvalidRecord {
                path: path.to_path_buf(),
                line: i + 1,
                source,
            })
        })
        .collect()
}

// ── Hugging Face datasets-server ────────────────────────────────────

/// One `(config, split)` pair exposed by a hub dataset.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SplitInfo {
    pub config: String,
    pub split: String,
}

#[derive(Debug, Deserialize)]
struct SplitsResponse {
    splits: Vec<SplitInfo>,
}

#[derive(Debug, Deserialize)]
struct RowsPage {
    rows: Vec<RowEnvelope>,
    num_rows_total: usize,
}

#[derive(Debug, Deserialize)]
struct RowEnvelope {
    row: QuestionRecord,
}

/// Pick the requested split, or fall back to the first available one.
///
/// Splits under the requested config are preferred for the fallback.
pub fn choose_split(available: &[SplitInfo], config: &str, split: &str) -> Option<SplitInfo> {
    if let Some(exact) = available
        .iter()
        .find(|s| s.config == config && s.split == split)
    {
        return Some(exact.clone());
    }

    let fallback = available
        .iter()
        .find(|s| s.config == config)
        .or_else(|| available.first())?
        .clone();

    warn!(
        requested = %split,
        available = ?available.iter().map(|s| s.split.as_str()).collect::<Vec<_>>(),
        using = %fallback.split,
        "Split not found, falling back to first available"
    );
    Some(fallback)
}

/// Minimal client for `https://datasets-server.huggingface.co`.
pub struct HubClient {
    client: reqwest::Client,
    base_url: String,
}

impl HubClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://datasets-server.huggingface.co";

    pub fn new() -> Result<Self, DatasetError> {
        Self::with_base_url(Self::DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, DatasetError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(|e| DatasetError::Hub(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, DatasetError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| DatasetError::Hub(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DatasetError::Hub(format!("{} returned {}: {}", path, status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| DatasetError::Hub(format!("{}: {}", path, e)))
    }

    /// All `(config, split)` pairs of a dataset.
    pub async fn splits(&self, dataset: &str) -> Result<Vec<SplitInfo>, DatasetError> {
        let resp: SplitsResponse = self
            .get_json("/splits", &[("dataset", dataset.to_string())])
            .await?;
        Ok(resp.splits)
    }

    /// Download a split, reading at most `cap` rows (all when `None` or 0).
    pub async fn fetch(
        &self,
        dataset: &str,
        config: &str,
        split: &str,
        cap: Option<usize>,
    ) -> Result<Dataset, DatasetError> {
        let available = self.splits(dataset).await?;
        let chosen = choose_split(&available, config, split).ok_or_else(|| {
            DatasetError::NoSplits {
                dataset: dataset.to_string(),
            }
        })?;
        let cap = cap.filter(|&n| n > 0);

        info!(dataset, config = %chosen.config, split = %chosen.split, "Fetching hub dataset");

        let mut records = Vec::new();
        let mut total = None;
        loop {
            let offset = records.len();
            let wanted = cap.map_or(HUB_PAGE_SIZE, |c| c.saturating_sub(offset).min(HUB_PAGE_SIZE));
            if wanted == 0 || total.is_some_and(|t| offset >= t) {
                break;
            }

            let page: RowsPage = self
                .get_json(
                    "/rows",
                    &[
                        ("dataset", dataset.to_string()),
                        ("config", chosen.config.clone()),
                        ("split", chosen.split.clone()),
                        ("offset", offset.to_string()),
                        ("length", wanted.to_string()),
                    ],
                )
                .await?;

            debug!(offset, rows = page.rows.len(), total = page.num_rows_total, "Fetched page");
            total = Some(page.num_rows_total);
            if page.rows.is_empty() {
                break;
            }
            records.extend(page.rows.into_iter().map(|r| r.row));
        }
        if let Some(cap) = cap {
            records.truncate(cap);
        }

        info!(questions = records.len(), "Loaded hub dataset");
        Ok(Dataset::new(format!("{}/{}", dataset, chosen.split), records))
    }
}
