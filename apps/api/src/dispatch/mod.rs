// Format dispatch.
// Implements: request resolution and validation, scratch directories, blocking-pool rendering, file streaming.
// Renderers never touch HTTP; handlers never touch layout.

pub mod dispatcher;
pub mod handlers;
pub mod scratch;
