//! Deployment registry entities
//!
//! The registry is the one manifest a client fetches first: a flat list
//! of every published deployment and the kind of host serving it.

use serde::{Deserialize, Serialize};
use url::Url;

/// Root of a deployment registry manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeploymentRegistry {
    /// Every deployment currently published
    pub published_deployments: Vec<PublishedDeployment>,
}

/// One published deployment entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PublishedDeployment {
    /// Location of the deployment manifest
    pub manifest_uri: Url,
    /// How the manifest and its files are served
    pub file_host: FileHost,
}

/// The host serving a deployment's files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FileHost {
    /// Kind of host
    pub host_type: FileHostType,
    /// Whether downloads require authentication
    pub requires_authentication: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileHostType {
    #[serde(rename = "fileserver")]
    FileServer,
    #[serde(rename = "webserver")]
    WebServer,
}
