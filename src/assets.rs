//! Canonical asset-path derivation for lessons.
//!
//! The curated-illustration allowlist below is the single source of truth
//! for whether a lesson gets a scene image or the shared placeholder.
//! Every place an image path is written (lesson file, segment, curriculum
//! entry) must go through `resolve_image`.

pub const PLACEHOLDER_IMAGE: &str = "/images/placeholder.svg";

// Lessons with hand-made Ghibli-style scene illustrations.
const CURATED_LESSONS: [&str; 11] = [
    "nce1-l3",
    "nce1-l5",
    "nce1-l7",
    "nce1-l9",
    "nce1-l131",
    "nce1-l133",
    "nce1-l135",
    "nce1-l137",
    "nce1-l139",
    "nce1-l141",
    "nce1-l143",
];

pub fn lesson_id(book: &str, lesson_num: u32) -> String {
    format!("{}-l{}", book, lesson_num)
}

pub fn has_curated_illustration(lesson_id: &str) -> bool {
    CURATED_LESSONS.contains(&lesson_id)
}

pub fn resolve_image(book: &str, lesson_num: u32) -> String {
    if has_curated_illustration(&lesson_id(book, lesson_num)) {
        format!("/images/{}/l{}/scene1.png", book, lesson_num)
    } else {
        PLACEHOLDER_IMAGE.to_string()
    }
}
