use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Company-level metadata exposed by grouped board layouts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyMeta {
    pub slug: String,
    pub description: String,
    pub stage: String,
    pub size: String,
    pub industries: BTreeSet<String>,
    pub hq_location: String,
}

/// One job listing. Created card-only during extraction and filled in by the
/// detail enricher; enrichment only ever adds fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobCard {
    pub company: String,
    pub title: String,
    pub location: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub detail_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apply_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_meta: Option<CompanyMeta>,
}

/// Fields harvested from a job's detail page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailFields {
    pub description: Option<String>,
    pub requirements: Vec<String>,
    pub salary: Option<String>,
    pub apply_url: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
}

impl DetailFields {
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.requirements.is_empty()
            && self.salary.is_none()
            && self.apply_url.is_none()
            && self.company.is_none()
            && self.location.is_none()
    }
}

impl JobCard {
    pub fn is_enriched(&self) -> bool {
        self.description.is_some()
    }

    /// Merges detail-page fields into the card. Values already present on the
    /// card are never replaced.
    pub fn absorb(&mut self, fields: DetailFields) {
        fill(&mut self.description, fields.description);
        if self.requirements.as_ref().is_none_or(|r| r.is_empty()) && !fields.requirements.is_empty() {
            self.requirements = Some(fields.requirements);
        }
        fill(&mut self.salary, fields.salary);
        fill(&mut self.apply_url, fields.apply_url);
        fill_text(&mut self.company, fields.company);
        fill_text(&mut self.location, fields.location);
    }

    /// Copies the enrichment a previous run stored for this position.
    pub fn absorb_enrichment(&mut self, saved: &JobCard) {
        self.absorb(DetailFields {
            description: saved.description.clone(),
            requirements: saved.requirements.clone().unwrap_or_default(),
            salary: saved.salary.clone(),
            apply_url: saved.apply_url.clone(),
            company: non_empty(&saved.company),
            location: non_empty(&saved.location),
        });
    }
}

fn fill(slot: &mut Option<String>, value: Option<String>) {
    if slot.as_deref().is_none_or(str::is_empty) {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            *slot = Some(value);
        }
    }
}

fn fill_text(slot: &mut String, value: Option<String>) {
    if slot.is_empty() {
        if let Some(value) = value {
            *slot = value;
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeMetadata {
    pub board_url: String,
    pub vc_firm: String,
    pub scraped_at: DateTime<Utc>,
    pub total_jobs_on_board: usize,
    pub us_intern_jobs: usize,
}

/// The terminal artifact handed to downstream ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeOutput {
    pub metadata: ScrapeMetadata,
    pub jobs: Vec<JobCard>,
}
