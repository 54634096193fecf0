pub mod analyze;
pub mod matching;
pub mod persons;
pub mod traits;
pub mod types;
