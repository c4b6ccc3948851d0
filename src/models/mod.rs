pub mod session;

pub use session::{Event, GenerateRequest, LocationReport, Session, TelemetryReport};
