//! Structured output.
//!
//! The structured form of a brief is the payload itself; this module only
//! serializes it and writes it under the dated output directory.

use crate::models::BriefPayload;
use crate::outputs::brief_path;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::error::Error;
use tokio::fs;
use tracing::{error, info, instrument};

/// Pretty JSON for any serializable report (brief, digest, page, article).
pub fn render_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

/// Write a [`BriefPayload`] to `{output_dir}/{date}/brief-{HHMM}.json`.
///
/// # Returns
///
/// The path written, or an error if directory creation or file writing fails.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir))]
pub async fn write_brief_json(
    brief: &BriefPayload,
    output_dir: &str,
    now: DateTime<Utc>,
) -> Result<String, Box<dyn Error>> {
    let json = render_json(brief)?;
    let (dir, path) = brief_path(output_dir, now, "json");

    info!(%dir, "Ensuring JSON directory exists");
    if let Err(e) = fs::create_dir_all(&dir).await {
        error!(%dir, error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    fs::write(&path, json).await?;
    info!(path = %path, "Wrote brief JSON");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feeds::{BrokerProbe, NewsSource, OfflineBroker, StaticNews};
    use crate::models::DigestResult;
    use crate::outputs::brief::build_brief;
    use chrono::TimeZone;

    #[tokio::test]
    async fn test_write_brief_json_roundtrip_file() {
        let tmp = tempfile::tempdir().unwrap();
        let now = Utc.with_ymd_and_hms(2025, 5, 6, 20, 30, 0).unwrap();
        let brief = build_brief(
            DigestResult::new(vec![]),
            StaticNews.scan("us", "6h"),
            OfflineBroker::default().status(),
            now,
        );

        let path = write_brief_json(&brief, tmp.path().to_str().unwrap(), now)
            .await
            .unwrap();
        assert!(path.ends_with("2025-05-06/brief-2030.json"));

        let written: BriefPayload =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, brief);
    }

    #[test]
    fn test_render_json_shape() {
        let now = Utc.with_ymd_and_hms(2025, 5, 6, 20, 30, 0).unwrap();
        let brief = build_brief(
            DigestResult::new(vec![]),
            StaticNews.scan("us", "6h"),
            OfflineBroker::default().status(),
            now,
        );
        let value: serde_json::Value = serde_json::from_str(&render_json(&brief).unwrap()).unwrap();
        assert_eq!(value["ok"], true);
        assert_eq!(value["generated_at"], "2025-05-06 20:30 UTC");
        assert_eq!(value["digest"]["count"], 0);
        assert_eq!(value["broker"]["connected"], false);
        assert!(value["recommendations"].is_array());
    }
}
