use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::models::ScrapeOutput;

/// Writes the output as pretty-printed UTF-8 JSON, creating the parent
/// directory if needed.
pub fn write_output(path: &Path, output: &ScrapeOutput) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let mut json = serde_json::to_string_pretty(output)?;
    json.push('\n');
    fs::write(path, json)?;
    Ok(())
}

pub fn read_output(path: &Path) -> Result<ScrapeOutput> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{JobCard, ScrapeMetadata};
    use chrono::{TimeZone, Utc};

    #[test]
    fn output_shape_is_stable() {
        let output = ScrapeOutput {
            metadata: ScrapeMetadata {
                board_url: "https://jobs.example.vc".to_string(),
                vc_firm: "Example Ventures".to_string(),
                scraped_at: Utc.with_ymd_and_hms(2026, 10, 1, 12, 0, 0).unwrap(),
                total_jobs_on_board: 42,
                us_intern_jobs: 1,
            },
            jobs: vec![JobCard {
                company: "Acme".to_string(),
                title: "Data Intern".to_string(),
                detail_url: "https://jobs.example.vc/jobs/1".to_string(),
                ..Default::default()
            }],
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.json");
        write_output(&path, &output).unwrap();

        let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["metadata"]["boardUrl"], "https://jobs.example.vc");
        assert_eq!(raw["metadata"]["vcFirm"], "Example Ventures");
        assert_eq!(raw["metadata"]["scrapedAt"], "2026-10-01T12:00:00Z");
        assert_eq!(raw["metadata"]["totalJobsOnBoard"], 42);
        assert_eq!(raw["metadata"]["usInternJobs"], 1);
        assert_eq!(raw["jobs"][0]["title"], "Data Intern");
        assert_eq!(read_output(&path).unwrap(), output);
    }
}
