use crate::assets;
use crate::books::{self, BookSpec};
use crate::config::Config;
use crate::parsing::lrc::parse_lrc;
use crate::sync::{sync_lesson, SyncOutcome};
use crate::types::curriculum::{CurriculumBook, LessonSummary};
use anyhow::Context;
use log::{info, warn};
use regex::Regex;
use serde::Serialize;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

#[derive(Debug, Default, Clone)]
pub struct SyncStats {
    pub lessons_seen: usize,
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub skipped: usize,
    pub curriculum_written: bool,
}

/// Run the full sync: scan each book's audio directory, synchronize one
/// lesson JSON per matching LRC file, and rebuild the curriculum
/// manifest's lesson listings from the scan results.
pub fn run_sync(config: &Config) -> anyhow::Result<SyncStats> {
    let lessons_dir = config.lessons_dir();
    fs::create_dir_all(&lessons_dir)
        .with_context(|| format!("Failed to create lessons directory {:?}", lessons_dir))?;

    let curriculum_path = config.curriculum_path();
    let mut curriculum = load_curriculum(&curriculum_path)?;
    let mut stats = SyncStats::default();

    for book in books::all() {
        let audio_dir = config.audio_dir(book.id);
        if !audio_dir.is_dir() {
            warn!("No audio directory for {} at {:?}, skipping book", book.id, audio_dir);
            continue;
        }
        info!("Processing book {} from {:?}", book.id, audio_dir);

        let summaries = sync_book(book, &audio_dir, &lessons_dir, &mut stats)?;
        replace_book_lessons(&mut curriculum, book, summaries);
    }

    stats.curriculum_written = write_curriculum(&curriculum_path, &curriculum)?;
    Ok(stats)
}

/// Process every LRC file for one book, returning lesson summaries
/// sorted numerically by lesson number.
fn sync_book(
    book: &BookSpec,
    audio_dir: &Path,
    lessons_dir: &Path,
    stats: &mut SyncStats,
) -> anyhow::Result<Vec<LessonSummary>> {
    let pattern = Regex::new(book.lrc_pattern).unwrap();

    let mut file_names: Vec<String> = fs::read_dir(audio_dir)
        .with_context(|| format!("Failed to read audio directory {:?}", audio_dir))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().to_str().map(String::from))
        .filter(|name| name.ends_with(".lrc"))
        .collect();
    file_names.sort();

    let mut collected: Vec<(u32, LessonSummary)> = Vec::new();

    for name in &file_names {
        let Some(caps) = pattern.captures(name) else {
            warn!("Skipping {} (does not match {} naming)", name, book.id);
            stats.skipped += 1;
            continue;
        };
        let lesson_num: u32 = match caps[1].parse() {
            Ok(n) => n,
            Err(_) => {
                warn!("Skipping {} (lesson number out of range)", name);
                stats.skipped += 1;
                continue;
            }
        };
        let title = caps[2].trim();

        let lrc_path = audio_dir.join(name);
        let content = fs::read_to_string(&lrc_path)
            .with_context(|| format!("Failed to read LRC file {:?}", lrc_path))?;

        let stem = name.trim_end_matches(".lrc");
        let audio = format!("/audio/{}/{}.mp3", book.id, stem);
        let parsed = parse_lrc(&content, book.id, lesson_num, title, &audio);

        match sync_lesson(lessons_dir, &parsed)? {
            SyncOutcome::Created => stats.created += 1,
            SyncOutcome::Updated => stats.updated += 1,
            SyncOutcome::Unchanged => stats.unchanged += 1,
        }
        stats.lessons_seen += 1;

        collected.push((
            lesson_num,
            LessonSummary {
                id: parsed.id.clone(),
                title: format!("Lesson {}", lesson_num),
                subtitle: title.to_string(),
                image: assets::resolve_image(book.id, lesson_num),
            },
        ));
    }

    collected.sort_by_key(|(num, _)| *num);
    Ok(collected.into_iter().map(|(_, summary)| summary).collect())
}

fn load_curriculum(path: &Path) -> anyhow::Result<Value> {
    if !path.exists() {
        return Ok(json!({ "books": [] }));
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read curriculum manifest {:?}", path))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in curriculum manifest {:?}", path))
}

/// Replace a book's `lessons` array wholesale, preserving its curated
/// metadata. Books not yet present in the manifest are appended with
/// defaults from the book table.
fn replace_book_lessons(curriculum: &mut Value, book: &BookSpec, lessons: Vec<LessonSummary>) {
    let lessons_value = serde_json::to_value(&lessons).unwrap_or_else(|_| json!([]));

    if !curriculum.get("books").map_or(false, Value::is_array) {
        curriculum["books"] = json!([]);
    }
    let Some(entries) = curriculum["books"].as_array_mut() else {
        return;
    };

    if let Some(entry) = entries
        .iter_mut()
        .find(|entry| entry.get("id").and_then(Value::as_str) == Some(book.id))
    {
        entry["lessons"] = lessons_value;
        return;
    }

    let new_book = CurriculumBook {
        id: book.id.to_string(),
        title: book.title.to_string(),
        subtitle: book.subtitle.to_string(),
        description: book.description.to_string(),
        level: book.level.to_string(),
        color: book.color.to_string(),
        lessons,
    };
    entries.push(serde_json::to_value(&new_book).unwrap_or_else(|_| json!({})));
}

// The manifest is hand-edited too, so it keeps its 4-space indentation.
fn to_json_4space<T: Serialize>(value: &T) -> anyhow::Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8(buf)?)
}

/// Write the manifest only when its content actually changed. Returns
/// whether a write happened.
fn write_curriculum(path: &Path, curriculum: &Value) -> anyhow::Result<bool> {
    let rendered = to_json_4space(curriculum)?;
    if path.exists() {
        let existing = fs::read_to_string(path)
            .with_context(|| format!("Failed to read curriculum manifest {:?}", path))?;
        if existing == rendered {
            info!("Curriculum manifest unchanged");
            return Ok(false);
        }
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {:?}", parent))?;
    }
    fs::write(path, rendered)
        .with_context(|| format!("Failed to write curriculum manifest {:?}", path))?;
    info!("Wrote curriculum manifest {:?}", path);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    const LRC_131: &str = "\
[00:00.00]Lesson 131|第131课
[00:02.50]Don't be So Sure|别那么肯定
[00:05.00]Listen to the tape then answer this question.|听录音。
[00:09.00]Where does Paul work?|保罗在哪里工作？
[00:12.50]Hello, Jim.|你好，吉姆。
";

    const LRC_3: &str = "\
[00:00.00]Lesson 3|第3课
[00:02.00]Sorry, Sir.|对不起，先生。
[00:04.00]Listen to the tape then answer this question.|听录音。
[00:07.00]Does the man get his umbrella back?|男士拿回雨伞了吗？
[00:10.00]My coat and my umbrella please.|请把我的大衣和伞给我。
";

    fn make_project() -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        let audio_dir = tmp.path().join("public/audio/nce1");
        fs::create_dir_all(&audio_dir).unwrap();
        fs::write(audio_dir.join("131&132－Don't be So Sure.lrc"), LRC_131).unwrap();
        fs::write(audio_dir.join("003&004－Sorry, Sir..lrc"), LRC_3).unwrap();
        fs::write(audio_dir.join("notes.lrc"), "[00:00.00]stray").unwrap();
        tmp
    }

    fn config_for(tmp: &tempfile::TempDir) -> Config {
        Config {
            project_dir: tmp.path().to_string_lossy().into_owned(),
        }
    }

    #[test]
    fn sync_creates_lessons_and_manifest() {
        let tmp = make_project();
        let config = config_for(&tmp);
        let stats = run_sync(&config).unwrap();

        assert_eq!(stats.lessons_seen, 2);
        assert_eq!(stats.created, 2);
        assert_eq!(stats.skipped, 1); // notes.lrc
        assert!(stats.curriculum_written);

        assert!(tmp.path().join("src/data/lessons/nce1-l3.json").exists());
        assert!(tmp.path().join("src/data/lessons/nce1-l131.json").exists());
    }

    #[test]
    fn manifest_lessons_are_sorted_numerically() {
        let tmp = make_project();
        run_sync(&config_for(&tmp)).unwrap();

        let manifest: Value = serde_json::from_str(
            &fs::read_to_string(tmp.path().join("src/data/curriculum.json")).unwrap(),
        )
        .unwrap();
        let book = &manifest["books"][0];
        assert_eq!(book["id"], "nce1");
        assert_eq!(book["lessons"][0]["id"], "nce1-l3");
        assert_eq!(book["lessons"][1]["id"], "nce1-l131");
        assert_eq!(book["lessons"][1]["title"], "Lesson 131");
        assert_eq!(book["lessons"][1]["subtitle"], "Don't be So Sure");
        assert_eq!(book["lessons"][1]["image"], "/images/nce1/l131/scene1.png");
    }

    #[test]
    fn rerun_writes_nothing() {
        let tmp = make_project();
        let config = config_for(&tmp);
        run_sync(&config).unwrap();

        let stats = run_sync(&config).unwrap();
        assert_eq!(stats.created, 0);
        assert_eq!(stats.updated, 0);
        assert_eq!(stats.unchanged, 2);
        assert!(!stats.curriculum_written);
    }

    #[test]
    fn curated_book_metadata_is_preserved() {
        let tmp = make_project();
        let config = config_for(&tmp);

        let manifest_path = tmp.path().join("src/data/curriculum.json");
        fs::create_dir_all(manifest_path.parent().unwrap()).unwrap();
        fs::write(
            &manifest_path,
            serde_json::to_string_pretty(&json!({
                "books": [{
                    "id": "nce1",
                    "title": "NCE Book One (curated title)",
                    "subtitle": "First Things First",
                    "description": "Hand-written description.",
                    "level": "beginner",
                    "color": "#123456",
                    "lessons": [{"id": "nce1-l999", "title": "stale", "subtitle": "", "image": ""}]
                }]
            }))
            .unwrap(),
        )
        .unwrap();

        run_sync(&config).unwrap();

        let manifest: Value =
            serde_json::from_str(&fs::read_to_string(&manifest_path).unwrap()).unwrap();
        let book = &manifest["books"][0];
        assert_eq!(book["title"], "NCE Book One (curated title)");
        assert_eq!(book["color"], "#123456");
        // Stale listing fully replaced by the scan.
        assert_eq!(book["lessons"].as_array().unwrap().len(), 2);
        assert_eq!(book["lessons"][0]["id"], "nce1-l3");
    }

    #[test]
    fn manifest_uses_four_space_indent() {
        let tmp = make_project();
        run_sync(&config_for(&tmp)).unwrap();

        let content =
            fs::read_to_string(tmp.path().join("src/data/curriculum.json")).unwrap();
        assert!(content.contains("\n    \"books\""));
    }
}
