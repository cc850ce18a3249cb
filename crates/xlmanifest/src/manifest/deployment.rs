//! Deployment manifest entities
//!
//! The deployment half of a published add-in: where the add-in manifest
//! lives, how the client should install and update it, and what platform
//! it requires. Field-level invariants are enforced by
//! [`validate_deployment`](crate::validation::validate_deployment), not
//! by construction.

use crate::manifest::version::ManifestVersion;
use serde::{Deserialize, Serialize};
use url::Url;

/// Root of a deployment manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Deployment {
    /// Location of the companion add-in manifest
    pub add_in_uri: Url,
    /// Fallback location tried when the primary is unreachable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternate_add_in_uri: Option<Url>,
    /// Who publishes and supports this deployment
    pub description: Description,
    /// Install and update policy
    pub settings: DeploymentSettings,
    /// Platform requirements
    pub required_operating_system: RequiredOperatingSystem,
    /// Runtimes the add-in can load under; optional, but non-empty when
    /// present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compatible_frameworks: Option<Vec<CompatibleFramework>>,
}

/// Publisher-facing identification of a deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Description {
    /// Publishing organization
    pub publisher: String,
    /// Manufacturer of the add-in
    pub manufacturer: String,
    /// Product name
    pub product: String,
    /// Support page for the product
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support_uri: Option<Url>,
}

/// Install and update policy for one deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeploymentSettings {
    /// Whether the add-in installs per user or per machine
    pub deployment_basis: DeploymentBasis,
    /// Oldest client version allowed to consume this deployment
    pub minimum_required_version: Option<ManifestVersion>,
    /// Whether published file URIs carry the wrapper file extension
    pub map_file_extensions: bool,
    /// How the add-in is loaded into the host application
    pub load_behavior: LoadBehavior,
    /// How updates are applied
    pub update_behavior: UpdateBehavior,
}

/// Scope of an installation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeploymentBasis {
    /// Installed for the current user only
    #[serde(rename = "peruser")]
    PerUser,
    /// Installed machine-wide
    #[serde(rename = "permachine")]
    PerMachine,
}

/// How the host application loads the add-in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoadBehavior {
    /// Whether the add-in is registered for automatic load
    pub install: bool,
    /// Position among installed add-ins at load time
    pub load_order: u32,
}

/// Update policy for an installed add-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateBehavior {
    /// Whether updates are optional or forced
    pub mode: UpdateMode,
    /// Update applies on next host restart; mutually exclusive with
    /// `notify_client`
    pub requires_restart: bool,
    /// Whether superseded versions are deleted after update
    pub remove_deprecated_version: bool,
    /// Client is prompted before updating; mutually exclusive with
    /// `requires_restart`
    pub notify_client: bool,
    /// How stale an installed version may grow before an update check
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<UpdateExpiration>,
}

/// Whether the client may decline an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateMode {
    /// Client chooses when to update
    #[serde(rename = "normal")]
    Normal,
    /// Update is applied unconditionally
    #[serde(rename = "forced")]
    Forced,
}

/// Maximum tolerated staleness before an update check is due.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateExpiration {
    /// Unit the age is measured in
    pub unit_of_time: UnitOfTime,
    /// Age threshold; must be greater than zero
    pub maximum_age: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitOfTime {
    #[serde(rename = "minutes")]
    Minutes,
    #[serde(rename = "days")]
    Days,
    #[serde(rename = "weeks")]
    Weeks,
    #[serde(rename = "months")]
    Months,
}

/// Operating system requirements for a deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RequiredOperatingSystem {
    /// Where to read about the requirement
    pub support_url: String,
    /// Minimum OS version
    pub minimum_version: Option<ManifestVersion>,
    /// Required OS bitness
    pub bitness: OperatingSystemBitness,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperatingSystemBitness {
    #[serde(rename = "none")]
    None,
    #[serde(rename = "x86")]
    X86,
    #[serde(rename = "x64")]
    X64,
}

/// One runtime the add-in is compatible with.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CompatibleFramework {
    /// Where to obtain the runtime
    pub support_url: String,
    /// Whether this runtime must be present for install to proceed
    pub required: bool,
    /// Runtime family the target version belongs to
    pub supported_runtime: ClrVersion,
    /// Exact runtime version targeted
    pub target_version: Option<ManifestVersion>,
}

/// Common language runtime families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClrVersion {
    #[serde(rename = "1.0")]
    V1,
    #[serde(rename = "1.1")]
    V1_1,
    #[serde(rename = "2.0")]
    V2,
    #[serde(rename = "4.0")]
    V4,
}
