//! Tuning report: the retained candidates plus a generation timestamp.
//!
//! Written as pretty JSON:
//! `{"generatedAt": "...Z", "top3": [{"cfg": {...}, "score": n}, ...]}`

use std::fs;
use std::io::Write;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ReportError;
use crate::search::{CandidateConfig, ScoredCandidate};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TuneReport {
    /// ISO-8601 UTC timestamp
    #[serde(rename = "generatedAt")]
    pub generated_at: String,
    #[serde(rename = "top3", default)]
    pub top: Vec<ScoredCandidate>,
}

impl TuneReport {
    /// Stamp `top` with the current UTC time
    pub fn new(top: Vec<ScoredCandidate>) -> Self {
        Self {
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            top,
        }
    }

    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write to `path`, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<(), ReportError> {
        write_json(path, &self.to_json()?)
    }

    pub fn load(path: &Path) -> Result<Self, ReportError> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Entry by 1-based rank
    pub fn select(&self, rank: usize) -> Result<&ScoredCandidate, ReportError> {
        if rank == 0 || rank > self.top.len() {
            return Err(ReportError::IndexOutOfRange {
                index: rank,
                len: self.top.len(),
            });
        }
        Ok(&self.top[rank - 1])
    }
}

/// Write one candidate config as the active configuration
pub fn write_active_config(config: &CandidateConfig, path: &Path) -> Result<(), ReportError> {
    write_json(path, &serde_json::to_string_pretty(config)?)
}

fn write_json(path: &Path, json: &str) -> Result<(), ReportError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut file = fs::File::create(path)?;
    file.write_all(json.as_bytes())?;
    file.write_all(b"\n")?;
    Ok(())
}

/// `"{rank}: score=0.1234 cfg={...}"`
pub fn format_result_line(rank: usize, entry: &ScoredCandidate) -> String {
    let cfg = serde_json::to_string(&entry.config)
        .unwrap_or_else(|_| format!("{:?}", entry.config));
    format!("{}: score={:.4} cfg={}", rank, entry.score, cfg)
}

/// Header line plus one ranked line per entry, as printed by `apply --list`
pub fn format_report(report: &TuneReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("Generated at {}\n", report.generated_at));
    for (i, entry) in report.top.iter().enumerate() {
        out.push_str(&format_result_line(i + 1, entry));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> TuneReport {
        let entry = |ap: f64, score: f64| ScoredCandidate {
            config: CandidateConfig {
                ap_scale: ap,
                ps_scale: 0.5,
                sa_scale: 0.75,
                duration_scale: 1.25,
            },
            score,
        };
        TuneReport {
            generated_at: "2024-01-01T00:00:00.000Z".to_string(),
            top: vec![entry(1.5, 0.25), entry(1.0, 0.125)],
        }
    }

    #[test]
    fn test_json_field_names() {
        let json = sample_report().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["generatedAt"], "2024-01-01T00:00:00.000Z");
        let first = &value["top3"][0];
        assert_eq!(first["score"], 0.25);
        assert_eq!(first["cfg"]["apScale"], 1.5);
        assert_eq!(first["cfg"]["psScale"], 0.5);
        assert_eq!(first["cfg"]["saScale"], 0.75);
        assert_eq!(first["cfg"]["durationScale"], 1.25);
    }

    #[test]
    fn test_timestamp_is_utc_iso8601() {
        let report = TuneReport::new(Vec::new());
        assert!(report.generated_at.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&report.generated_at).is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("configs").join("best.json");

        let report = sample_report();
        report.save(&path).unwrap();
        assert_eq!(TuneReport::load(&path).unwrap(), report);
    }

    #[test]
    fn test_select_is_one_based() {
        let report = sample_report();
        assert_eq!(report.select(1).unwrap().score, 0.25);
        assert_eq!(report.select(2).unwrap().score, 0.125);
        assert!(matches!(
            report.select(0),
            Err(ReportError::IndexOutOfRange { index: 0, len: 2 })
        ));
        assert!(matches!(
            report.select(3),
            Err(ReportError::IndexOutOfRange { index: 3, len: 2 })
        ));
    }

    #[test]
    fn test_write_active_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("active.json");

        let report = sample_report();
        let chosen = report.select(2).unwrap().config;
        write_active_config(&chosen, &path).unwrap();

        let written: CandidateConfig =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, chosen);
    }

    #[test]
    fn test_format_result_line() {
        let report = sample_report();
        let line = format_result_line(1, &report.top[0]);
        assert!(line.starts_with("1: score=0.2500 cfg={"));
        assert!(line.contains("\"apScale\":1.5"));
    }

    #[test]
    fn test_format_report_lists_every_entry() {
        let text = format_report(&sample_report());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Generated at 2024-01-01T00:00:00.000Z");
        assert!(lines[2].starts_with("2: score=0.1250"));
    }
}
