//! Domain records for runs and passes
//!
//! These are the persisted artifacts: field names are stable because
//! transcripts are stored as line-delimited JSON and read back by other
//! tooling.

use chrono::{SecondsFormat, Utc};

mod record;
mod run;

pub use record::{PassRecord, RunPhase};
pub use run::{Mode, RunResult, StopReason};

/// Current UTC timestamp as an ISO-8601 string with a `Z` suffix
pub fn utc_now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utc_now_iso_format() {
        let ts = utc_now_iso();
        assert!(ts.ends_with('Z'));
        assert!(ts.contains('T'));
    }
}
