//! Adapter for entity annotations produced by an external recogniser

use crate::detector::SpanSource;
use blackout_core::{Category, Detection, DetectionPayload, Error, Result, TextSnapshot};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// One entity reported by an external recogniser, offsets in code points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityAnnotation {
    pub label: String,
    pub start: usize,
    pub end: usize,
    #[serde(default)]
    pub salience: f32,
}

/// Map an entity label to a redaction category
pub fn category_for_label(label: &str) -> Option<Category> {
    match label.to_ascii_uppercase().as_str() {
        "PERSON" => Some(Category::Name),
        "DATE" => Some(Category::Date),
        "PHONE_NUMBER" => Some(Category::Phone),
        "ADDRESS" | "GPE" | "LOC" | "FAC" | "LOCATION" => Some(Category::Address),
        _ => None,
    }
}

/// Span source backed by a sidecar `<file>.entities.json` annotation file.
///
/// The sidecar is read once when the source is built and the same entities serve every
/// pass of the file. Offsets refer to the original text; masking preserves length, so they
/// remain valid after earlier passes.
pub struct AnnotationSource {
    path: PathBuf,
    entities: Vec<EntityAnnotation>,
}

impl AnnotationSource {
    /// Load the annotations at `path`. A missing file gives an empty source.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No annotation file");
                return Ok(Self {
                    path,
                    entities: Vec::new(),
                });
            }
            Err(e) => {
                return Err(Error::detector(
                    SOURCE_NAME,
                    format!("{}: {e}", path.display()),
                ));
            }
        };

        let entities = serde_json::from_str(&content)
            .map_err(|e| Error::detector(SOURCE_NAME, format!("{}: {e}", path.display())))?;

        Ok(Self { path, entities })
    }

    /// Load the sidecar for `input` from `dir`
    pub fn for_input(dir: &Path, input: &Path) -> Result<Self> {
        let file_name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::load(dir.join(format!("{file_name}.entities.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entities(&self) -> &[EntityAnnotation] {
        &self.entities
    }
}

const SOURCE_NAME: &str = "annotations";

impl SpanSource for AnnotationSource {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    fn supported_categories(&self) -> Vec<Category> {
        vec![Category::Name, Category::Date, Category::Phone, Category::Address]
    }

    fn detect(&self, _snapshot: &TextSnapshot) -> Result<Vec<Detection>> {
        let detections = self
            .entities
            .iter()
            .filter_map(|entity| {
                let category = category_for_label(&entity.label)?;
                Some(
                    Detection::new(category, entity.start, entity.end).with_payload(
                        DetectionPayload::Entity {
                            label: entity.label.clone(),
                            salience: entity.salience,
                        },
                    ),
                )
            })
            .collect();

        Ok(detections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_label_mapping() {
        assert_eq!(category_for_label("PERSON"), Some(Category::Name));
        assert_eq!(category_for_label("gpe"), Some(Category::Address));
        assert_eq!(category_for_label("PHONE_NUMBER"), Some(Category::Phone));
        assert_eq!(category_for_label("ORG"), None);
    }

    #[test]
    fn test_reads_sidecar() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("mail.txt.entities.json"),
            r#"[
                {"label": "PERSON", "start": 0, "end": 8, "salience": 0.4},
                {"label": "ORG", "start": 9, "end": 12},
                {"label": "DATE", "start": 20, "end": 30}
            ]"#,
        )
        .unwrap();

        let source = AnnotationSource::for_input(dir.path(), Path::new("/in/mail.txt")).unwrap();
        assert_eq!(source.entities().len(), 3);
        let snapshot = TextSnapshot::new("x".repeat(40));
        let detections = source.detect(&snapshot).unwrap();

        assert_eq!(detections.len(), 2);
        assert_eq!(detections[0].category, Category::Name);
        assert_eq!((detections[0].start, detections[0].end), (0, 8));
        assert!(matches!(
            &detections[0].payload,
            DetectionPayload::Entity { label, salience } if label == "PERSON" && *salience > 0.3
        ));
        assert_eq!(detections[1].category, Category::Date);
    }

    #[test]
    fn test_missing_sidecar_is_empty() {
        let dir = TempDir::new().unwrap();
        let source = AnnotationSource::for_input(dir.path(), Path::new("absent.txt")).unwrap();
        assert_eq!(source.path(), dir.path().join("absent.txt.entities.json"));
        let detections = source.detect(&TextSnapshot::new("text")).unwrap();
        assert!(detections.is_empty());
    }

    #[test]
    fn test_malformed_sidecar_is_detector_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bad.txt.entities.json"), "{not json").unwrap();

        let err = AnnotationSource::for_input(dir.path(), Path::new("bad.txt"))
            .err()
            .unwrap();
        assert!(matches!(err, Error::Detector { .. }));
    }

    #[test]
    fn test_sidecar_read_once_serves_every_pass() {
        let dir = TempDir::new().unwrap();
        let sidecar = dir.path().join("memo.txt.entities.json");
        fs::write(&sidecar, r#"[{"label": "PERSON", "start": 0, "end": 4}]"#).unwrap();

        let source = AnnotationSource::for_input(dir.path(), Path::new("memo.txt")).unwrap();
        fs::remove_file(&sidecar).unwrap();

        let snapshot = TextSnapshot::new("Anna called");
        assert_eq!(source.detect(&snapshot).unwrap().len(), 1);
        assert_eq!(source.detect(&snapshot).unwrap().len(), 1);
    }
}
