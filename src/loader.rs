// File: ./src/loader.rs
//! Dataset loading: the structured conference list and the tabular taxonomies.
//!
//! All sources are fetched concurrently and every one must succeed; there is
//! no partial dataset and no retry. The one exception is a missing conference
//! list (absent file or HTTP 404), which loads as an empty list. Callers decide what a failure means for
//! their surface.
use crate::client::{DataSource, SourceClient};
use crate::config::Config;
use crate::context::AppContext;
use crate::model::{ConferenceInstance, TaxonomyRow};
use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

pub const DEFAULT_CONFERENCES_FILE: &str = "conferences.yaml";
pub const DEFAULT_TAXONOMY_FILE: &str = "conferences.csv";
pub const DEFAULT_TAXONOMY_NAME: &str = "CSRankings";

const REQUIRED_COLUMNS: &[&str] = &["ConferenceTitle", "AreaTitle"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedTaxonomy {
    pub name: String,
    pub rows: Vec<TaxonomyRow>,
}

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub conferences: Vec<ConferenceInstance>,
    pub taxonomies: Vec<NamedTaxonomy>,
}

impl Dataset {
    /// Rows of the first taxonomy, the one shown by default.
    pub fn taxonomy_rows(&self) -> &[TaxonomyRow] {
        self.taxonomies
            .first()
            .map(|t| t.rows.as_slice())
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone)]
pub struct DatasetSources {
    pub conferences: DataSource,
    pub taxonomies: Vec<(String, DataSource)>,
}

impl DatasetSources {
    /// Sources from config, falling back to files in the data directory.
    pub fn resolve(config: &Config, ctx: &dyn AppContext) -> Result<Self> {
        let conferences = match &config.conferences_source {
            Some(src) => DataSource::parse(src)?,
            None => DataSource::Local(ctx.get_data_dir()?.join(DEFAULT_CONFERENCES_FILE)),
        };

        let mut taxonomies = Vec::new();
        for entry in &config.taxonomies {
            taxonomies.push((entry.name.clone(), DataSource::parse(&entry.source)?));
        }
        if taxonomies.is_empty() {
            taxonomies.push((
                DEFAULT_TAXONOMY_NAME.to_string(),
                DataSource::Local(ctx.get_data_dir()?.join(DEFAULT_TAXONOMY_FILE)),
            ));
        }

        Ok(Self {
            conferences,
            taxonomies,
        })
    }

    /// Replaces configured sources with command-line overrides, when given.
    pub fn with_overrides(mut self, conferences: Option<&str>, taxonomies: &[String]) -> Result<Self> {
        if let Some(src) = conferences {
            self.conferences = DataSource::parse(src)?;
        }
        if !taxonomies.is_empty() {
            self.taxonomies = taxonomies
                .iter()
                .enumerate()
                .map(|(i, src)| {
                    let name = if i == 0 {
                        DEFAULT_TAXONOMY_NAME.to_string()
                    } else {
                        format!("Taxonomy {}", i + 1)
                    };
                    DataSource::parse(src).map(|s| (name, s))
                })
                .collect::<Result<_>>()?;
        }
        Ok(self)
    }
}

/// Parses the hand-edited conference list. An empty or null document is an empty list.
pub fn parse_conferences(text: &str) -> Result<Vec<ConferenceInstance>> {
    let has_content = text
        .lines()
        .map(str::trim)
        .any(|l| !l.is_empty() && !l.starts_with('#') && l != "---");
    if !has_content {
        return Ok(Vec::new());
    }

    let parsed: Option<Vec<ConferenceInstance>> =
        serde_yaml::from_str(text).context("Malformed conference list")?;
    Ok(parsed.unwrap_or_default())
}

#[derive(Debug, Deserialize)]
struct RawTaxonomyRow {
    #[serde(rename = "ConferenceTitle", default)]
    conference_title: Option<String>,
    #[serde(rename = "Area", default)]
    area: Option<String>,
    #[serde(rename = "AreaTitle", default)]
    area_title: Option<String>,
    #[serde(rename = "ParentArea", default)]
    parent_area: Option<String>,
    #[serde(rename = "NextTier", default)]
    next_tier: Option<String>,
    #[serde(default)]
    year: Option<String>,
    #[serde(default)]
    note: Option<String>,
}

/// Parses a taxonomy table with a header row.
///
/// Rows without a conference or area title are skipped; a missing parent area
/// becomes [`crate::model::OTHER_PARENT_AREA`].
pub fn parse_taxonomy(text: &str) -> Result<Vec<TaxonomyRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers().context("Malformed taxonomy header")?.clone();
    if headers.is_empty() || (headers.len() == 1 && headers[0].is_empty()) {
        return Ok(Vec::new());
    }
    for col in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == *col) {
            return Err(anyhow!("Taxonomy table is missing the '{}' column", col));
        }
    }
    let has_next_tier = headers.iter().any(|h| h == "NextTier");

    let mut rows = Vec::new();
    for (line, record) in reader.deserialize::<RawTaxonomyRow>().enumerate() {
        let raw = record.with_context(|| format!("Malformed taxonomy row {}", line + 2))?;

        let (Some(conference_title), Some(area_title)) = (raw.conference_title, raw.area_title)
        else {
            log::warn!("Skipping taxonomy row {}: no conference or area title", line + 2);
            continue;
        };

        let mut row = TaxonomyRow::new(
            &conference_title,
            raw.area.as_deref().unwrap_or_default(),
            &area_title,
            raw.parent_area.as_deref().unwrap_or_default(),
        );
        if has_next_tier {
            row.next_tier = Some(
                raw.next_tier
                    .as_deref()
                    .is_some_and(|v| v.eq_ignore_ascii_case("true")),
            );
        }
        row.year = raw.year;
        row.note = raw.note;
        rows.push(row);
    }
    Ok(rows)
}

async fn load_conferences(client: &SourceClient, source: &DataSource) -> Result<Vec<ConferenceInstance>> {
    let Some(text) = client.fetch_optional_text(source).await? else {
        log::warn!("Conference list {} not found, showing no conferences", source);
        return Ok(Vec::new());
    };
    let conferences =
        parse_conferences(&text).with_context(|| format!("While parsing '{}'", source))?;
    log::info!("Loaded {} conference editions from {}", conferences.len(), source);
    Ok(conferences)
}

async fn load_taxonomy(client: &SourceClient, name: &str, source: &DataSource) -> Result<NamedTaxonomy> {
    let text = client.fetch_text(source).await?;
    let rows = parse_taxonomy(&text).with_context(|| format!("While parsing '{}'", source))?;
    log::info!("Loaded {} taxonomy rows for '{}' from {}", rows.len(), name, source);
    Ok(NamedTaxonomy {
        name: name.to_string(),
        rows,
    })
}

/// Fetches and parses every source concurrently. Fails if any one fails,
/// except for a missing conference list.
pub async fn load_dataset(client: &SourceClient, sources: &DatasetSources) -> Result<Dataset> {
    let taxonomies = futures::future::try_join_all(
        sources
            .taxonomies
            .iter()
            .map(|(name, src)| load_taxonomy(client, name, src)),
    );
    let (conferences, taxonomies) =
        tokio::try_join!(load_conferences(client, &sources.conferences), taxonomies)?;

    Ok(Dataset {
        conferences,
        taxonomies,
    })
}
