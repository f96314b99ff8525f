/// Static description of one book in the content set.
///
/// `lrc_pattern` captures (1) the lesson number and (2) the lesson title
/// from an LRC filename in the book's audio directory. nce1 audio files
/// cover two lesson numbers per recording (`131&132－Title.lrc`); the
/// first number is the lesson the file belongs to.
#[derive(Debug, Clone, Copy)]
pub struct BookSpec {
    pub id: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub description: &'static str,
    pub level: &'static str,
    pub color: &'static str,
    pub lrc_pattern: &'static str,
}

const BOOKS: [BookSpec; 2] = [
    BookSpec {
        id: "nce1",
        title: "New Concept English 1",
        subtitle: "First Things First",
        description: "Everyday dialogues for beginners, with word-level analysis.",
        level: "beginner",
        color: "#4a90d9",
        lrc_pattern: r"^(\d+)&\d+－(.+)\.lrc$",
    },
    BookSpec {
        id: "nce2",
        title: "New Concept English 2",
        subtitle: "Practice and Progress",
        description: "Short narrative texts for elementary learners.",
        level: "elementary",
        color: "#5cb85c",
        lrc_pattern: r"^(\d+)－(.+)\.lrc$",
    },
];

pub fn all() -> &'static [BookSpec] {
    &BOOKS
}

pub fn find(book_id: &str) -> Option<&'static BookSpec> {
    BOOKS.iter().find(|b| b.id == book_id)
}
