pub mod engine;
pub mod error;
pub mod models;
pub mod probe;
pub mod reporting;
pub mod scanner;

// Re-export commonly used items
pub use engine::*;
pub use error::*;
pub use models::*;
pub use probe::*;
pub use reporting::*;
pub use scanner::*;
