use serde::{Deserialize, Serialize};

/// Speaker label for one dialogue line. Serialized as the plain variant
/// name ("Narrator", "Man", "Woman") in lesson JSON.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Narrator,
    Man,
    Woman,
}

/// One dictionary entry inside a hand-authored word analysis.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Word {
    pub word: String,
    pub pos: String,
    pub meaning: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Analysis {
    pub words: Vec<Word>,
}

/// One timed dialogue line within a lesson.
///
/// `analysis` is never produced by the parser; it is added by hand to the
/// lesson JSON afterwards and must survive re-runs untouched.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub id: String,
    pub role: Role,
    pub text: String,
    pub translation: String,
    pub start_time: f64,
    pub end_time: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Analysis>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LessonData {
    pub id: String,
    pub title: String,
    pub audio: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub segments: Vec<Segment>,
}
