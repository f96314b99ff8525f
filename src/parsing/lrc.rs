use crate::assets;
use crate::types::lesson::{LessonData, Role, Segment};
use regex::Regex;

// Narrative lines open with one of these; everything else alternates
// between the two dialogue speakers.
const NARRATIVE_KEYWORDS: [&str; 8] = [
    "Lesson",
    "Listen to",
    "answer this question",
    "Why",
    "What",
    "How",
    "Which",
    "Who",
];

/// Parse an LRC timestamp token `[mm:ss.cc]` into a second offset.
/// Malformed input yields 0.0 rather than an error.
pub fn parse_time(token: &str) -> f64 {
    let re = Regex::new(r"\[(\d+):(\d+)\.(\d+)\]").unwrap();
    match re.captures(token) {
        Some(caps) => {
            let minutes: f64 = caps[1].parse().unwrap_or(0.0);
            let seconds: f64 = caps[2].parse().unwrap_or(0.0);
            let centiseconds: f64 = caps[3].parse().unwrap_or(0.0);
            minutes * 60.0 + seconds + centiseconds / 100.0
        }
        None => 0.0,
    }
}

/// Heuristic speaker assignment for one dialogue line.
pub fn detect_role(text: &str, prev_role: Role) -> Role {
    if NARRATIVE_KEYWORDS.iter().any(|kw| text.starts_with(kw))
        || text.contains("Listen to the tape")
    {
        return Role::Narrator;
    }
    match prev_role {
        Role::Narrator => Role::Man,
        Role::Man => Role::Woman,
        Role::Woman => Role::Man,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Build the ordered segment list from raw LRC content.
///
/// Only lines opening with a `[mm:ss.cc]` timestamp are considered; the
/// remainder of each line splits on the first `|` into English text and
/// Chinese translation. The first four segments are the fixed lesson
/// intro: forced `Narrator`, ids `intro_1..intro_4`. Dialogue segments
/// that follow are numbered `s1, s2, ...`.
pub fn build_segments(content: &str) -> Vec<Segment> {
    let line_re = Regex::new(r"^\[(\d+:\d+\.\d+)\]").unwrap();
    let timed_lines: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|line| line_re.is_match(line))
        .collect();

    let mut segments = Vec::with_capacity(timed_lines.len());
    let mut prev_role = Role::Narrator;

    for (index, line) in timed_lines.iter().enumerate() {
        let start_time = parse_time(line);
        let rest = line_re.replace(line, "");
        let rest = rest.trim();

        let (text, translation) = match rest.split_once('|') {
            Some((text, translation)) => (text.trim(), translation.trim()),
            None => (rest, ""),
        };

        // End where the next line starts; the final line gets a fixed
        // 5-second fallback duration.
        let end_time = match timed_lines.get(index + 1) {
            Some(next_line) => parse_time(next_line) - 0.01,
            None => start_time + 5.0,
        };

        let role = if index < 4 {
            Role::Narrator
        } else {
            detect_role(text, prev_role)
        };
        let id = if index < 4 {
            format!("intro_{}", index + 1)
        } else {
            format!("s{}", index - 3)
        };

        segments.push(Segment {
            id,
            role,
            text: text.to_string(),
            translation: translation.to_string(),
            start_time: round2(start_time),
            end_time: round2(end_time),
            image: None,
            analysis: None,
        });

        prev_role = role;
    }

    segments
}

/// Parse a full LRC file into a lesson record with canonical derived
/// fields (`id`, `title`, `audio`, `image`).
pub fn parse_lrc(
    content: &str,
    book: &str,
    lesson_num: u32,
    title: &str,
    audio: &str,
) -> LessonData {
    LessonData {
        id: assets::lesson_id(book, lesson_num),
        title: format!("Lesson {}: {}", lesson_num, title),
        audio: audio.to_string(),
        image: Some(assets::resolve_image(book, lesson_num)),
        segments: build_segments(content),
    }
}
