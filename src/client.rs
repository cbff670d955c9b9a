//! DocumentExtractor API Client
//!
//! Typed methods over the `/v1` REST endpoints:
//! - Files: list, upload (multipart), get, delete
//! - Workflows: list, create, get, replace (PUT), update (PATCH), delete
//! - Runs: list, create, get, fetch results (JSON / CSV / Excel)
//!
//! Every method performs exactly one HTTP exchange and maps failures onto
//! the [`Error`](crate::error::Error) taxonomy; there is no retry or
//! pagination layer.

use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, warn};
use uuid::Uuid;
use validator::Validate;

use crate::config::ClientConfig;
use crate::error::{self, Error, Result};
use crate::models::{
    FileResponse, ResultFormat, RunCreate, RunResponse, RunResultData, WorkflowCreate,
    WorkflowResponse, WorkflowUpdate,
};

/// Client for the DocumentExtractor API.
///
/// Cheap to clone; clones share the underlying connection pool. The client
/// holds no state of its own beyond the base URL and credentials, so
/// concurrent calls on one instance are safe.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    root_url: String,
    api_key: String,
}

/// Context threaded through request dispatch so errors can name the
/// operation and the resource it targeted.
#[derive(Clone, Copy)]
struct Op<'a> {
    name: &'static str,
    resource: &'static str,
    id: &'a str,
}

impl ApiClient {
    /// Create a client for the given base URL and API key.
    pub fn new(root_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        Self::from_config(&ClientConfig::new(root_url, api_key))
    }

    /// Create a client from a [`ClientConfig`], honoring its timeout.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            http,
            root_url: config.root_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.root_url, path)
    }

    /// Attach auth, send, and map non-2xx responses to errors.
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        op: Op<'_>,
    ) -> Result<reqwest::Response> {
        let response = request
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!("{} failed with status {}", op.name, status);
        Err(error::from_response(op.name, op.resource, op.id, status, &body))
    }

    /// Read the body as text first so a malformed payload is reported as a
    /// validation failure rather than a transport one.
    async fn decode<T: DeserializeOwned>(
        response: reqwest::Response,
        operation: &'static str,
    ) -> Result<T> {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| Error::Validation {
            operation,
            detail: e.to_string(),
        })
    }

    fn check_payload<T: Validate>(payload: &T, operation: &'static str) -> Result<()> {
        payload.validate().map_err(|e| Error::Validation {
            operation,
            detail: e.to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, op: Op<'_>) -> Result<T> {
        debug!("GET {}", path);
        let response = self.send(self.http.get(self.url(path)), op).await?;
        Self::decode(response, op.name).await
    }

    async fn send_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &B,
        op: Op<'_>,
    ) -> Result<T> {
        debug!("{} {}", method, path);
        let request = self.http.request(method, self.url(path)).json(body);
        let response = self.send(request, op).await?;
        Self::decode(response, op.name).await
    }

    async fn delete(&self, path: &str, op: Op<'_>) -> Result<()> {
        debug!("DELETE {}", path);
        self.send(self.http.delete(self.url(path)), op).await?;
        Ok(())
    }

    // --- Files ---

    /// List all files uploaded to the account.
    pub async fn list_files(&self) -> Result<Vec<FileResponse>> {
        let op = Op {
            name: "list_files",
            resource: "file",
            id: "",
        };
        self.get_json("/v1/files/", op).await
    }

    /// Upload a file from disk.
    ///
    /// The filename and MIME type are derived from the path; unknown
    /// extensions fall back to `application/octet-stream`. A missing local
    /// file fails with [`Error::NotFound`] without touching the network.
    pub async fn upload_file(&self, path: impl AsRef<Path>) -> Result<FileResponse> {
        let path = path.as_ref();
        let content = tokio::fs::read(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::NotFound {
                    operation: "upload_file",
                    resource: "local file",
                    id: path.display().to_string(),
                    status: None,
                }
            } else {
                Error::Io {
                    path: path.display().to_string(),
                    source: e,
                }
            }
        })?;
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                Error::InvalidArgument(format!("path has no usable filename: {}", path.display()))
            })?
            .to_string();
        self.upload_file_bytes(&filename, content).await
    }

    /// Upload in-memory content under the given filename.
    pub async fn upload_file_bytes(
        &self,
        filename: &str,
        content: Vec<u8>,
    ) -> Result<FileResponse> {
        if filename.is_empty() {
            return Err(Error::InvalidArgument(
                "filename must not be empty".to_string(),
            ));
        }

        let mime = mime_guess::from_path(filename).first_or_octet_stream();
        let part = Part::bytes(content)
            .file_name(filename.to_string())
            .mime_str(mime.essence_str())
            .map_err(|e| Error::InvalidArgument(format!("invalid MIME type: {e}")))?;
        let form = Form::new().part("file", part);

        let op = Op {
            name: "upload_file",
            resource: "file",
            id: filename,
        };
        debug!("POST /v1/files/ ({}, {})", filename, mime);
        let request = self.http.post(self.url("/v1/files/")).multipart(form);
        let response = self.send(request, op).await?;
        Self::decode(response, op.name).await
    }

    /// Fetch metadata for a single file.
    pub async fn get_file(&self, file_id: Uuid) -> Result<FileResponse> {
        let id = file_id.to_string();
        let op = Op {
            name: "get_file",
            resource: "file",
            id: &id,
        };
        self.get_json(&format!("/v1/files/{file_id}"), op).await
    }

    /// Delete a file. Not idempotent: deleting an already-deleted id
    /// surfaces the server's 404 as [`Error::NotFound`].
    pub async fn delete_file(&self, file_id: Uuid) -> Result<()> {
        let id = file_id.to_string();
        let op = Op {
            name: "delete_file",
            resource: "file",
            id: &id,
        };
        self.delete(&format!("/v1/files/{file_id}"), op).await
    }

    // --- Workflows ---

    /// List all workflows in the account.
    pub async fn list_workflows(&self) -> Result<Vec<WorkflowResponse>> {
        let op = Op {
            name: "list_workflows",
            resource: "workflow",
            id: "",
        };
        self.get_json("/v1/workflows/", op).await
    }

    /// Create a workflow. The payload is validated before anything is sent.
    pub async fn create_workflow(&self, workflow: &WorkflowCreate) -> Result<WorkflowResponse> {
        let op = Op {
            name: "create_workflow",
            resource: "workflow",
            id: "",
        };
        Self::check_payload(workflow, op.name)?;
        self.send_json(reqwest::Method::POST, "/v1/workflows/", workflow, op)
            .await
    }

    /// Fetch a single workflow.
    pub async fn get_workflow(&self, workflow_id: Uuid) -> Result<WorkflowResponse> {
        let id = workflow_id.to_string();
        let op = Op {
            name: "get_workflow",
            resource: "workflow",
            id: &id,
        };
        self.get_json(&format!("/v1/workflows/{workflow_id}"), op)
            .await
    }

    /// Replace a workflow wholesale (PUT).
    pub async fn override_workflow(
        &self,
        workflow_id: Uuid,
        workflow: &WorkflowCreate,
    ) -> Result<WorkflowResponse> {
        let id = workflow_id.to_string();
        let op = Op {
            name: "override_workflow",
            resource: "workflow",
            id: &id,
        };
        Self::check_payload(workflow, op.name)?;
        self.send_json(
            reqwest::Method::PUT,
            &format!("/v1/workflows/{workflow_id}"),
            workflow,
            op,
        )
        .await
    }

    /// Partially update a workflow (PATCH); unset fields are left untouched.
    pub async fn update_workflow(
        &self,
        workflow_id: Uuid,
        update: &WorkflowUpdate,
    ) -> Result<WorkflowResponse> {
        let id = workflow_id.to_string();
        let op = Op {
            name: "update_workflow",
            resource: "workflow",
            id: &id,
        };
        Self::check_payload(update, op.name)?;
        self.send_json(
            reqwest::Method::PATCH,
            &format!("/v1/workflows/{workflow_id}"),
            update,
            op,
        )
        .await
    }

    /// Delete a workflow. Not idempotent, like [`delete_file`](Self::delete_file).
    pub async fn delete_workflow(&self, workflow_id: Uuid) -> Result<()> {
        let id = workflow_id.to_string();
        let op = Op {
            name: "delete_workflow",
            resource: "workflow",
            id: &id,
        };
        self.delete(&format!("/v1/workflows/{workflow_id}"), op).await
    }

    // --- Runs ---

    /// List all runs of a workflow.
    pub async fn list_runs(&self, workflow_id: Uuid) -> Result<Vec<RunResponse>> {
        let id = workflow_id.to_string();
        let op = Op {
            name: "list_runs",
            resource: "workflow",
            id: &id,
        };
        self.get_json(&format!("/v1/workflows/{workflow_id}/runs/"), op)
            .await
    }

    /// Start a run of a workflow against previously uploaded files.
    pub async fn create_run(&self, workflow_id: Uuid, run: &RunCreate) -> Result<RunResponse> {
        let id = workflow_id.to_string();
        let op = Op {
            name: "create_run",
            resource: "workflow",
            id: &id,
        };
        Self::check_payload(run, op.name)?;
        self.send_json(
            reqwest::Method::POST,
            &format!("/v1/workflows/{workflow_id}/runs/"),
            run,
            op,
        )
        .await
    }

    /// Fetch the current state of a run.
    pub async fn get_run(&self, workflow_id: Uuid, run_num: u32) -> Result<RunResponse> {
        let id = format!("{workflow_id}/runs/{run_num}");
        let op = Op {
            name: "get_run",
            resource: "run",
            id: &id,
        };
        self.get_json(&format!("/v1/workflows/{workflow_id}/runs/{run_num}"), op)
            .await
    }

    /// Fetch the results of a completed run in the requested export format.
    ///
    /// The format selects the `Accept` header; `format_option` is passed
    /// through as a query parameter for server-side export tuning (e.g. a
    /// CSV delimiter variant).
    pub async fn get_run_results(
        &self,
        workflow_id: Uuid,
        run_num: u32,
        format: ResultFormat,
        format_option: Option<&str>,
    ) -> Result<RunResultData> {
        let id = format!("{workflow_id}/runs/{run_num}");
        let op = Op {
            name: "get_run_results",
            resource: "run",
            id: &id,
        };
        let path = format!("/v1/workflows/{workflow_id}/runs/{run_num}/results");

        debug!("GET {} (accept: {})", path, format.accept_header());
        let mut request = self
            .http
            .get(self.url(&path))
            .header(ACCEPT, format.accept_header());
        if let Some(option) = format_option {
            request = request.query(&[("format_option", option)]);
        }

        let response = self.send(request, op).await?;
        match format {
            ResultFormat::Json => Ok(RunResultData::Json(Self::decode(response, op.name).await?)),
            ResultFormat::Csv => Ok(RunResultData::Csv(response.text().await?)),
            ResultFormat::Excel => Ok(RunResultData::Excel(response.bytes().await?)),
        }
    }
}
