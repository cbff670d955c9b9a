// Transfer models shared with the DocumentExtractor API.
//
// These mirror the server's wire shapes: request payloads (`*Create`,
// `*Update`) are validated client-side before they are sent, response shapes
// (`*Response`) are owned by the server and deserialized as received.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::Validate;

use crate::error::Error;

/// A file stored on the server, returned by the files endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileResponse {
    pub id: uuid::Uuid,
    pub filename: String,
    pub content_type: String,
    pub size_bytes: u64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Value type of a single extraction schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    Text,
    Number,
    Date,
    Boolean,
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldType::Text => write!(f, "Text"),
            FieldType::Number => write!(f, "Number"),
            FieldType::Date => write!(f, "Date"),
            FieldType::Boolean => write!(f, "Boolean"),
        }
    }
}

/// One node of an extraction schema tree.
///
/// The root node carries no `key`; nested fields are addressed by their key
/// in the extracted output. Arrays of objects (e.g. invoice line items) set
/// `is_array` and describe the element shape through `children`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SchemaCreate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub is_array: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[validate(nested)]
    pub children: Vec<SchemaCreate>,
}

impl SchemaCreate {
    /// A leaf field with the given key, display name, and type.
    pub fn field(
        key: impl Into<String>,
        name: impl Into<String>,
        field_type: FieldType,
    ) -> Self {
        Self {
            key: Some(key.into()),
            name: name.into(),
            description: None,
            field_type,
            is_array: false,
            children: Vec::new(),
        }
    }

    /// A root schema node with the given name and children.
    pub fn root(name: impl Into<String>, children: Vec<SchemaCreate>) -> Self {
        Self {
            key: None,
            name: name.into(),
            description: None,
            field_type: FieldType::Text,
            is_array: false,
            children,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn as_array(mut self) -> Self {
        self.is_array = true;
        self
    }

    pub fn with_children(mut self, children: Vec<SchemaCreate>) -> Self {
        self.children = children;
        self
    }
}

/// An extraction schema node as stored on the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaResponse {
    pub id: uuid::Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub is_array: bool,
    #[serde(default)]
    pub children: Vec<SchemaResponse>,
}

/// Payload for creating (or fully replacing) a workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct WorkflowCreate {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(nested)]
    pub extraction_schema: SchemaCreate,
}

/// Partial-update payload for a workflow; `None` fields are left untouched
/// by the server and omitted from the wire body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct WorkflowUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub extraction_schema: Option<SchemaCreate>,
}

/// A workflow as stored on the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowResponse {
    pub id: uuid::Uuid,
    pub name: String,
    pub extraction_schema: SchemaResponse,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Payload for starting a run of a workflow against uploaded files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct RunCreate {
    #[validate(length(min = 1))]
    pub file_ids: Vec<uuid::Uuid>,
}

/// Lifecycle state of a workflow run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl RunStatus {
    /// Whether the run has reached a final state and will not change again.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunStatus::Completed | RunStatus::Failed | RunStatus::Cancelled
        )
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStatus::Pending => write!(f, "pending"),
            RunStatus::Running => write!(f, "running"),
            RunStatus::Completed => write!(f, "completed"),
            RunStatus::Failed => write!(f, "failed"),
            RunStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A workflow run. Runs are addressed by `(workflow_id, run_num)`, where
/// `run_num` counts up per workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResponse {
    pub id: uuid::Uuid,
    pub workflow_id: uuid::Uuid,
    pub run_num: u32,
    pub status: RunStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Structured extraction output for one input file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedItem {
    pub file_id: uuid::Uuid,
    pub data: serde_json::Value,
}

/// Full structured result of a completed run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub extracted_data: Vec<ExtractedItem>,
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Export format for run results, negotiated via the `Accept` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultFormat {
    Json,
    Csv,
    Excel,
}

impl ResultFormat {
    /// MIME type sent as the `Accept` header for this format.
    pub fn accept_header(&self) -> &'static str {
        match self {
            ResultFormat::Json => "application/json",
            ResultFormat::Csv => "text/csv",
            ResultFormat::Excel => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }
}

impl FromStr for ResultFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ResultFormat::Json),
            "csv" => Ok(ResultFormat::Csv),
            "excel" | "xlsx" => Ok(ResultFormat::Excel),
            other => Err(Error::InvalidArgument(format!(
                "unsupported result format: {other} (expected json, csv, or excel)"
            ))),
        }
    }
}

impl std::fmt::Display for ResultFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResultFormat::Json => write!(f, "json"),
            ResultFormat::Csv => write!(f, "csv"),
            ResultFormat::Excel => write!(f, "excel"),
        }
    }
}

/// Run results in whichever representation the requested format yields.
#[derive(Debug, Clone)]
pub enum RunResultData {
    Json(RunResult),
    Csv(String),
    Excel(Bytes),
}

impl RunResultData {
    /// Structured result, if the format was [`ResultFormat::Json`].
    pub fn as_json(&self) -> Option<&RunResult> {
        match self {
            RunResultData::Json(result) => Some(result),
            _ => None,
        }
    }
}
