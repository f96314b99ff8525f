use crate::config::Config;
use crate::types::lesson::LessonData;
use anyhow::Context;
use regex::Regex;
use serde::Serialize;
use std::fs;

// Lessons past this number have no analysis pass scheduled yet.
const MAX_AUDITED_LESSON: u32 = 131;
const COVERAGE_THRESHOLD: f64 = 0.9;

/// One under-analyzed lesson in the coverage report.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CoverageGap {
    pub file: String,
    pub lesson_num: u32,
    pub word_ratio: String,
}

fn count_text_words(text: &str) -> usize {
    text.replace(['\'', '"', ',', '.', '!', '?'], "")
        .split_whitespace()
        .count()
}

/// Ratio of hand-analyzed words to total dialogue words for one lesson,
/// intro segments excluded.
pub fn coverage_ratio(lesson: &LessonData) -> f64 {
    let mut total_words = 0;
    let mut analyzed_words = 0;

    for segment in &lesson.segments {
        if segment.id.starts_with("intro") || segment.text.is_empty() {
            continue;
        }
        total_words += count_text_words(&segment.text);
        if let Some(analysis) = &segment.analysis {
            analyzed_words += analysis.words.len();
        }
    }

    if total_words > 0 {
        analyzed_words as f64 / total_words as f64
    } else {
        0.0
    }
}

/// Scan the lessons directory and report lessons (up to lesson 131) whose
/// word-analysis coverage falls below 90%.
pub fn run_audit(config: &Config) -> anyhow::Result<Vec<CoverageGap>> {
    let lessons_dir = config.lessons_dir();
    let name_re = Regex::new(r"^[a-z0-9]+-l(\d+)\.json$").unwrap();

    let mut candidates: Vec<(u32, String)> = fs::read_dir(&lessons_dir)
        .with_context(|| format!("Failed to read lessons directory {:?}", lessons_dir))?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().to_str().map(String::from))
        .filter_map(|name| {
            let num: u32 = name_re.captures(&name)?[1].parse().ok()?;
            Some((num, name))
        })
        .collect();
    candidates.sort();

    let mut gaps = Vec::new();
    for (lesson_num, file) in candidates {
        if lesson_num > MAX_AUDITED_LESSON {
            continue;
        }
        let path = lessons_dir.join(&file);
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read lesson file {:?}", path))?;
        let lesson: LessonData = serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON in lesson file {:?}", path))?;

        let ratio = coverage_ratio(&lesson);
        if ratio < COVERAGE_THRESHOLD {
            gaps.push(CoverageGap {
                file,
                lesson_num,
                word_ratio: format!("{:.2}", ratio),
            });
        }
    }

    Ok(gaps)
}
