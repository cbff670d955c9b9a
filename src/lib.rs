// DocumentExtractor API client - typed bindings for the document data extraction service

pub mod client;
pub mod config;
pub mod error;
pub mod models;

// Re-exports for convenience
pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use models::{
    ExtractedItem, FieldType, FileResponse, ResultFormat, RunCreate, RunResponse, RunResult,
    RunResultData, RunStatus, SchemaCreate, SchemaResponse, WorkflowCreate, WorkflowResponse,
    WorkflowUpdate,
};
