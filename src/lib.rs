mod puzzle;

pub use puzzle::{grade, verify, Category, Grade, Puzzle, PuzzleError, PuzzleShape, Submission};
pub mod cache;
pub mod config;
pub mod hint;
pub mod server;
pub mod store;
