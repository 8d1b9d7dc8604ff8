//! Paginated patient fetch.
//!
//! Pages are requested one at a time, `page=1, 2, ...`, each through the
//! retrying client, with a fixed pause between pages. The loop ends when
//! the API reports `pagination.hasNext == false` or returns an empty batch.

use serde_json::Value;

use crate::api::{ApiClient, ApiError};
use crate::config::AssessmentConfig;
use crate::models::Patient;

/// Envelope fields checked, in order, for the page's patient array.
pub const KNOWN_BATCH_KEYS: &[&str] = &["data", "patients", "results", "items"];

/// The patient array of one page response.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBatch<'a> {
    /// Envelope field the array was found under.
    pub key: &'a str,
    pub records: &'a [Value],
    /// True when no known key matched and the generic scan was used.
    pub via_fallback: bool,
}

/// Locate the patient array in a page response.
///
/// Known envelope keys win; otherwise the first array-valued top-level
/// field (document order) is used.
pub fn find_batch(body: &Value) -> Option<PageBatch<'_>> {
    let fields = body.as_object()?;

    for &key in KNOWN_BATCH_KEYS {
        if let Some(Value::Array(records)) = fields.get(key) {
            return Some(PageBatch {
                key,
                records,
                via_fallback: false,
            });
        }
    }

    fields.iter().find_map(|(key, value)| {
        value.as_array().map(|records| PageBatch {
            key: key.as_str(),
            records,
            via_fallback: true,
        })
    })
}

/// Whether the response explicitly says there are no further pages.
///
/// Only a boolean `false` counts; a missing or odd `pagination` block
/// leaves the decision to the empty-batch rule.
pub fn is_last_page(body: &Value) -> bool {
    body.get("pagination")
        .and_then(|p| p.get("hasNext"))
        .and_then(Value::as_bool)
        == Some(false)
}

/// Fetch every patient across all pages, in API order.
pub async fn fetch_all_patients(
    client: &ApiClient,
    config: &AssessmentConfig,
) -> Result<Vec<Patient>, ApiError> {
    let url = config.patients_url();
    let mut patients = Vec::new();
    let mut page: u32 = 1;

    loop {
        let query = [
            ("page", page.to_string()),
            ("limit", config.page_limit.to_string()),
        ];
        let body = client.get_json(&url, &query).await?;

        if body.is_null() {
            tracing::info!(page, "Empty response body, ending pagination");
            break;
        }

        let Some(batch) = find_batch(&body) else {
            tracing::error!(page, payload = %body, "Page response has no patient array");
            return Err(ApiError::MalformedResponse {
                page,
                reason: "missing array payload".into(),
            });
        };

        if batch.via_fallback {
            tracing::warn!(
                page,
                key = batch.key,
                "No known envelope field, using first array field"
            );
        }

        let batch_len = batch.records.len();
        collect_page(&mut patients, batch.records, page);
        tracing::debug!(page, batch_len, total = patients.len(), "Fetched patient page");

        if batch_len == 0 || is_last_page(&body) {
            break;
        }

        page += 1;
        tokio::time::sleep(config.inter_page_delay).await;
    }

    tracing::info!(pages = page, patients = patients.len(), "Patient fetch complete");
    Ok(patients)
}

/// Decode a page's records onto the running list. Records without a
/// usable `patient_id` cannot be reported, so they are skipped.
fn collect_page(patients: &mut Vec<Patient>, records: &[Value], page: u32) {
    for (index, record) in records.iter().enumerate() {
        match Patient::from_value(record.clone()) {
            Ok(patient) => patients.push(patient),
            Err(e) => {
                tracing::warn!(page, index, error = %e, "Skipping patient record without usable id");
            }
        }
    }
}
