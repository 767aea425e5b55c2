use serde::{Deserialize, Serialize};

/// One calendar that could not be scanned during a reminder run
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ScanErrorDTO {
    pub calendar: String,
    pub message: String,
}
