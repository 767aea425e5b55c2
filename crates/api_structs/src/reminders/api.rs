use crate::dtos::ScanErrorDTO;
use serde::{Deserialize, Serialize};

pub mod run_reminders {
    use super::*;

    /// Observability summary of one reminder run
    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub scanned: usize,
        pub eligible: usize,
        pub sent: usize,
        pub skipped_duplicate: usize,
        pub failed: usize,
        pub scan_errors: Vec<ScanErrorDTO>,
    }
}
