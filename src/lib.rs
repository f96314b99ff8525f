// Declare all modules that are part of this library
pub mod config;
pub mod types {
    pub mod curriculum;
    pub mod lesson;
}
pub mod parsing {
    pub mod lrc;
}
pub mod assets;
pub mod audit;
pub mod books;
pub mod curriculum;
pub mod sync;
