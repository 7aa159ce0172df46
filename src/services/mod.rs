pub mod client;
pub mod exporter;
pub mod renderer;
pub mod session;

pub use client::SplitterClient;
pub use exporter::ArtifactExporter;
pub use renderer::ResultRenderer;
pub use session::{Phase, ProcessedResult, Session};
