use serde::{Deserialize, Serialize};

/// Entry in a book's lesson listing, used for navigation.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LessonSummary {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub image: String,
}

/// One book entry in the shared curriculum manifest. Everything except
/// `lessons` is curated by hand; `lessons` is rebuilt from the filesystem
/// scan on every sync run.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CurriculumBook {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub level: String,
    pub color: String,
    pub lessons: Vec<LessonSummary>,
}
