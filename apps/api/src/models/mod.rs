pub mod lenient;
pub mod request;
pub mod resume;

pub use request::{DesignSettings, GenerateRequest};
pub use resume::ResumeDocument;
