use crate::types::{ApiResponse, EntryOutcome, RenderReport, SplitArtifact};
use serde_json::Value;
use tracing::{debug, info, warn};

pub struct ResultRenderer;

impl ResultRenderer {
    pub fn render(response: &ApiResponse) -> RenderReport {
        let Some(splits) = response.splits() else {
            warn!("API response structure is unexpected: no 'splits' sequence");
            return RenderReport::UnexpectedStructure;
        };

        let containers_detected = response.containers_detected();
        info!(
            "Rendering {} splits ({} containers detected)",
            splits.len(),
            containers_detected
        );

        let entries = splits
            .iter()
            .enumerate()
            .map(|(idx, split)| Self::render_entry(idx + 1, split))
            .collect();

        RenderReport::Rendered {
            containers_detected,
            entries,
        }
    }

    fn render_entry(index: usize, split: &Value) -> EntryOutcome {
        let fallback = format!("Split {}", index);

        let Some(fields) = split.as_object() else {
            return EntryOutcome::Failed {
                index,
                container: fallback,
                reason: format!("entry is not an object: {}", split),
            };
        };

        let container = match fields.get("container") {
            None | Some(Value::Null) => fallback,
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        };

        let page_range = match fields.get("page_range") {
            None | Some(Value::Null) => "N/A".to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                return EntryOutcome::Failed {
                    index,
                    container,
                    reason: format!("page_range is not text: {}", other),
                }
            }
        };

        let base64 = match fields.get("base64") {
            Some(value) if Self::is_truthy(value) => Some(match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            }),
            _ => None,
        };

        match base64 {
            Some(base64) => {
                let file_name = Self::file_name(&container, &page_range);
                debug!("Split {} ready as {}", index, file_name);
                EntryOutcome::Ready(SplitArtifact {
                    index,
                    container,
                    page_range,
                    file_name,
                    base64,
                })
            }
            None => {
                warn!("No Base64 PDF data found for {}", container);
                EntryOutcome::MissingData {
                    index,
                    container,
                    page_range,
                }
            }
        }
    }

    /// `null`, `false`, zero, and empty strings, arrays or objects carry no
    /// payload.
    fn is_truthy(value: &Value) -> bool {
        match value {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
            Value::String(s) => !s.is_empty(),
            Value::Array(a) => !a.is_empty(),
            Value::Object(o) => !o.is_empty(),
        }
    }

    /// `{container}_{page range, spaces as underscores}.pdf`
    pub fn file_name(container: &str, page_range: &str) -> String {
        format!("{}_{}.pdf", container, page_range.replace(' ', "_"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn split(container: &str, range: &str, b64: &str) -> Value {
        json!({"container": container, "page_range": range, "base64": b64})
    }

    #[test]
    fn test_file_name_synthesis() {
        assert_eq!(ResultRenderer::file_name("A1", "1-3"), "A1_1-3.pdf");
        assert_eq!(
            ResultRenderer::file_name("MSCU 123", "pages 4 - 7"),
            "MSCU 123_pages_4_-_7.pdf"
        );
    }

    #[test]
    fn test_all_entries_render_in_order() {
        let response = ApiResponse::new(json!({
            "containers_detected": 3,
            "splits": [
                split("A1", "1-3", "QUFB"),
                split("B2", "4-5", "QkJC"),
                split("C3", "6", "Q0ND"),
            ]
        }));

        let report = ResultRenderer::render(&response);
        let artifacts: Vec<_> = report.artifacts().collect();
        assert_eq!(artifacts.len(), 3);
        assert_eq!(
            artifacts.iter().map(|a| a.container.as_str()).collect::<Vec<_>>(),
            vec!["A1", "B2", "C3"]
        );
        assert_eq!(artifacts[0].file_name, "A1_1-3.pdf");
        assert_eq!(artifacts[0].data_uri(), "data:application/pdf;base64,QUFB");
        assert_eq!(report.warning_count(), 0);

        match report {
            RenderReport::Rendered {
                containers_detected,
                ..
            } => assert_eq!(containers_detected, "3"),
            RenderReport::UnexpectedStructure => panic!("expected rendered report"),
        }
    }

    #[test]
    fn test_missing_payload_only_affects_its_entry() {
        let response = ApiResponse::new(json!({
            "splits": [
                split("A1", "1-3", "QUFB"),
                {"container": "B2", "page_range": "4-5"},
                split("C3", "6", ""),
                split("D4", "7-9", "RERE"),
            ]
        }));

        let report = ResultRenderer::render(&response);
        let entries = report.entries();
        assert_eq!(entries.len(), 4);
        assert!(matches!(entries[1], EntryOutcome::MissingData { index: 2, .. }));
        assert!(matches!(entries[2], EntryOutcome::MissingData { index: 3, .. }));
        assert_eq!(
            entries[1].message().unwrap(),
            "No Base64 PDF data found for B2."
        );
        assert_eq!(report.artifacts().count(), 2);
        assert_eq!(entries[3].artifact().unwrap().file_name, "D4_7-9.pdf");
    }

    #[test]
    fn test_fallback_labels() {
        let response = ApiResponse::new(json!({
            "splits": [ {"base64": "QUFB"} ]
        }));

        let report = ResultRenderer::render(&response);
        let artifact = report.artifacts().next().unwrap();
        assert_eq!(artifact.container, "Split 1");
        assert_eq!(artifact.page_range, "N/A");
        assert_eq!(artifact.file_name, "Split 1_N/A.pdf");
    }

    #[test]
    fn test_malformed_entries_are_isolated() {
        let response = ApiResponse::new(json!({
            "splits": [
                "garbage",
                {"container": "B2", "page_range": 4, "base64": "QkJC"},
                split("D4", "7-9", "RERE"),
            ]
        }));

        let report = ResultRenderer::render(&response);
        let entries = report.entries();
        assert!(matches!(&entries[0], EntryOutcome::Failed { container, .. } if container == "Split 1"));
        assert!(matches!(entries[1], EntryOutcome::Failed { index: 2, .. }));
        assert!(entries[1]
            .message()
            .unwrap()
            .starts_with("Error creating download/preview for B2"));
        assert_eq!(report.artifacts().count(), 1);
        assert_eq!(report.warning_count(), 2);
    }

    #[test]
    fn test_base64_presence_follows_truthiness() {
        let response = ApiResponse::new(json!({
            "splits": [
                {"container": "A1", "page_range": "1", "base64": false},
                {"container": "B2", "page_range": "2", "base64": 0},
                {"container": "C3", "page_range": "3", "base64": []},
                {"container": "D4", "page_range": "4", "base64": {}},
                {"container": "E5", "page_range": "5", "base64": 17},
            ]
        }));

        let report = ResultRenderer::render(&response);
        let entries = report.entries();
        for entry in &entries[..4] {
            assert!(
                matches!(entry, EntryOutcome::MissingData { .. }),
                "got: {entry:?}"
            );
        }
        assert!(entries[0]
            .message()
            .unwrap()
            .starts_with("No Base64 PDF data found for A1"));

        let artifact = entries[4].artifact().unwrap();
        assert_eq!(artifact.base64, "17");
        assert_eq!(artifact.data_uri(), "data:application/pdf;base64,17");
    }

    #[test]
    fn test_unexpected_structure() {
        for raw in [
            json!({"containers_detected": 2}),
            json!({"splits": "nope"}),
            json!({"splits": null}),
            json!(["A1"]),
        ] {
            let response = ApiResponse::new(raw.clone());
            assert_eq!(
                ResultRenderer::render(&response),
                RenderReport::UnexpectedStructure
            );
            // Raw body stays available for inspection.
            assert_eq!(response.raw, raw);
        }
    }

    #[test]
    fn test_non_string_container_is_displayed() {
        let response = ApiResponse::new(json!({
            "splits": [ {"container": 42, "page_range": "1 - 2", "base64": "QUFB"} ]
        }));
        let report = ResultRenderer::render(&response);
        assert_eq!(report.artifacts().next().unwrap().file_name, "42_1_-_2.pdf");
    }
}
