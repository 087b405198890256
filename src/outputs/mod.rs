//! Brief assembly and output generation.
//!
//! # Submodules
//!
//! - [`brief`]: Combines digest, news, broker status and recommendations
//! - [`json`]: Structured form of the brief and its file writer
//! - [`text`]: Fixed-layout plain-text report and its file writer
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! └── 2025-05-06/
//!     ├── brief-0715.json
//!     └── brief-0715.txt
//! ```

pub mod brief;
pub mod json;
pub mod text;

use chrono::{DateTime, Utc};

/// `{output_dir}/{YYYY-MM-DD}/brief-{HHMM}.{ext}` for the given instant.
pub fn brief_path(output_dir: &str, now: DateTime<Utc>, ext: &str) -> (String, String) {
    let dir = format!(
        "{}/{}",
        output_dir.trim_end_matches('/'),
        now.format("%Y-%m-%d")
    );
    let file = format!("{}/brief-{}.{}", dir, now.format("%H%M"), ext);
    (dir, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_brief_path() {
        let now = Utc.with_ymd_and_hms(2025, 5, 6, 7, 15, 0).unwrap();
        let (dir, file) = brief_path("/tmp/out/", now, "json");
        assert_eq!(dir, "/tmp/out/2025-05-06");
        assert_eq!(file, "/tmp/out/2025-05-06/brief-0715.json");
    }
}
