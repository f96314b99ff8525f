use crate::types::lesson::LessonData;
use anyhow::Context;
use log::info;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Created,
    Updated,
    Unchanged,
}

/// Reconcile canonical derived fields into an existing lesson record.
///
/// Only `id` and `image` (lesson-level, plus any segment that already
/// carries an `image`) are touched; everything else in the record,
/// notably hand-authored `analysis` blocks, is left as found. Returns
/// whether anything changed.
pub fn reconcile(existing: &mut Value, canonical_id: &str, canonical_image: &str) -> bool {
    let mut changed = false;

    if existing.get("id").and_then(Value::as_str) != Some(canonical_id) {
        existing["id"] = Value::String(canonical_id.to_string());
        changed = true;
    }

    if existing.get("image").and_then(Value::as_str) != Some(canonical_image) {
        existing["image"] = Value::String(canonical_image.to_string());
        changed = true;
    }

    if let Some(segments) = existing.get_mut("segments").and_then(Value::as_array_mut) {
        for segment in segments {
            let has_image = segment.get("image").and_then(Value::as_str).is_some();
            if has_image && segment["image"].as_str() != Some(canonical_image) {
                segment["image"] = Value::String(canonical_image.to_string());
                changed = true;
            }
        }
    }

    changed
}

pub fn lesson_path(lessons_dir: &Path, lesson_id: &str) -> PathBuf {
    lessons_dir.join(format!("{}.json", lesson_id))
}

/// Create or update the JSON file for one parsed lesson.
///
/// Fresh lessons are written verbatim. Existing files go through
/// `reconcile` and are rewritten only when a field actually changed, so
/// re-running over unchanged input performs no writes.
pub fn sync_lesson(lessons_dir: &Path, parsed: &LessonData) -> anyhow::Result<SyncOutcome> {
    let path = lesson_path(lessons_dir, &parsed.id);

    if !path.exists() {
        let json = serde_json::to_string_pretty(parsed)?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write lesson file {:?}", path))?;
        info!("Created {}.json", parsed.id);
        return Ok(SyncOutcome::Created);
    }

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read lesson file {:?}", path))?;
    let mut existing: Value = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in lesson file {:?}", path))?;

    let canonical_image = parsed
        .image
        .as_deref()
        .unwrap_or(crate::assets::PLACEHOLDER_IMAGE);

    if reconcile(&mut existing, &parsed.id, canonical_image) {
        let json = serde_json::to_string_pretty(&existing)?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write lesson file {:?}", path))?;
        info!("Updated {}.json", parsed.id);
        Ok(SyncOutcome::Updated)
    } else {
        Ok(SyncOutcome::Unchanged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::lrc::parse_lrc;
    use serde_json::json;

    const SAMPLE_LRC: &str = "\
[00:00.00]Lesson 131|第131课
[00:02.50]Don't be So Sure|别那么肯定
[00:05.00]Listen to the tape then answer this question.|听录音。
[00:09.00]Where does Paul work?|保罗在哪里工作？
[00:12.50]Hello, Jim.|你好，吉姆。
";

    fn parsed_lesson() -> LessonData {
        parse_lrc(
            SAMPLE_LRC,
            "nce1",
            131,
            "Don't be So Sure",
            "/audio/nce1/131&132－Don't be So Sure.mp3",
        )
    }

    #[test]
    fn fresh_lesson_is_written_verbatim() {
        let tmp = tempfile::tempdir().unwrap();
        let outcome = sync_lesson(tmp.path(), &parsed_lesson()).unwrap();
        assert_eq!(outcome, SyncOutcome::Created);

        let content = fs::read_to_string(tmp.path().join("nce1-l131.json")).unwrap();
        let value: Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["id"], "nce1-l131");
        assert_eq!(value["segments"][4]["id"], "s1");
    }

    #[test]
    fn second_run_is_a_no_op() {
        let tmp = tempfile::tempdir().unwrap();
        let lesson = parsed_lesson();
        sync_lesson(tmp.path(), &lesson).unwrap();

        let path = tmp.path().join("nce1-l131.json");
        let before = fs::read_to_string(&path).unwrap();
        let outcome = sync_lesson(tmp.path(), &lesson).unwrap();
        assert_eq!(outcome, SyncOutcome::Unchanged);
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn hand_authored_analysis_survives_reconcile() {
        let tmp = tempfile::tempdir().unwrap();
        let lesson = parsed_lesson();
        sync_lesson(tmp.path(), &lesson).unwrap();

        // Simulate hand editing: add an analysis block and break the id.
        let path = tmp.path().join("nce1-l131.json");
        let mut value: Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        value["id"] = json!("l131");
        value["segments"][4]["analysis"] = json!({
            "words": [{"word": "hello", "pos": "interj.", "meaning": "你好"}]
        });
        fs::write(&path, serde_json::to_string_pretty(&value).unwrap()).unwrap();

        let outcome = sync_lesson(tmp.path(), &lesson).unwrap();
        assert_eq!(outcome, SyncOutcome::Updated);

        let value: Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["id"], "nce1-l131");
        assert_eq!(value["segments"][4]["analysis"]["words"][0]["word"], "hello");
    }

    #[test]
    fn stale_segment_image_is_rewritten() {
        let mut existing = json!({
            "id": "nce1-l131",
            "image": "/images/nce1/l131/scene1.png",
            "segments": [
                {"id": "s1", "image": "/images/old/path.png"},
                {"id": "s2"}
            ]
        });
        let changed = reconcile(&mut existing, "nce1-l131", "/images/nce1/l131/scene1.png");
        assert!(changed);
        assert_eq!(existing["segments"][0]["image"], "/images/nce1/l131/scene1.png");
        // Segments without an image field stay that way.
        assert!(existing["segments"][1].get("image").is_none());
    }

    #[test]
    fn reconcile_reports_no_change_when_canonical() {
        let mut existing = json!({
            "id": "nce1-l132",
            "image": "/images/placeholder.svg",
            "segments": []
        });
        assert!(!reconcile(&mut existing, "nce1-l132", "/images/placeholder.svg"));
    }
}
