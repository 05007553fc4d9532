pub mod aggregator;
pub mod builder;
pub mod models;
pub mod pipeline;
pub mod scheduler;

pub use builder::{DocumentBuilder, DocumentTarget};
pub use models::{CalendarSheetData, EventRow, GeneratedDocument};
pub use pipeline::{Generator, ReplayOutcome, WindowSource};
