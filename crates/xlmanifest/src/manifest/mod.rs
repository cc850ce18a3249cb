//! Manifest entity graph
//!
//! Typed value objects for the three manifest documents a publisher
//! emits:
//!
//! - **Deployment** ([`deployment`]): install and update policy
//! - **AddIn** ([`addin`]): the installable file and its downloadable
//!   extras
//! - **DeploymentRegistry** ([`registry`]): index of published
//!   deployments
//!
//! Entities are plain data; every cross-field invariant is enforced by
//! the [`validation`](crate::validation) engine, not by construction.
//! Wire (de)serialization happens through serde with the field and enum
//! names manifests use.

pub mod addin;
pub mod deployment;
pub mod hash;
pub mod registry;
pub mod version;

pub use addin::{
    AddIn, AddInFileExtension, AddInIdentity, AddInType, AssemblyIdentity, AssetFile, Dependency,
    DependencyType, FilePlacement, OfficeBitness,
};
pub use deployment::{
    ClrVersion, CompatibleFramework, Deployment, DeploymentBasis, DeploymentSettings, Description,
    LoadBehavior, OperatingSystemBitness, RequiredOperatingSystem, UnitOfTime, UpdateBehavior,
    UpdateExpiration, UpdateMode,
};
pub use hash::FileHash;
pub use registry::{DeploymentRegistry, FileHost, FileHostType, PublishedDeployment};
pub use version::{ManifestVersion, ParseVersionError};

use url::Url;

/// Wrapper file extension applied to published file URIs when a
/// deployment enables extension mapping. Hosts that refuse to serve raw
/// binary extensions will serve the wrapped name.
pub const WRAPPER_FILE_EXTENSION: &str = "xldeploy";

/// File name of the deployment manifest for an add-in.
#[must_use]
pub fn deployment_manifest_file_name(add_in_name: &str) -> String {
    format!("{add_in_name}-Deployment.manifest.xml")
}

/// File name of the add-in manifest for an add-in.
#[must_use]
pub fn add_in_manifest_file_name(add_in_name: &str) -> String {
    format!("{add_in_name}-AddIn.manifest.xml")
}

/// Whether a URI's path carries the wrapper file extension.
#[must_use]
pub fn uri_has_wrapper_extension(uri: &Url) -> bool {
    uri_extension(uri).is_some_and(|ext| ext.eq_ignore_ascii_case(WRAPPER_FILE_EXTENSION))
}

/// Append the wrapper file extension to a URI's path.
pub fn append_wrapper_extension(uri: &mut Url) {
    let path = format!("{}.{WRAPPER_FILE_EXTENSION}", uri.path());
    uri.set_path(&path);
}

/// Remove the wrapper file extension from a URI's path if present.
pub fn strip_wrapper_extension(uri: &mut Url) {
    if !uri_has_wrapper_extension(uri) {
        return;
    }
    let path = uri.path();
    let truncated = path[..path.len() - WRAPPER_FILE_EXTENSION.len() - 1].to_string();
    uri.set_path(&truncated);
}

fn uri_extension(uri: &Url) -> Option<&str> {
    let segment = uri.path_segments()?.next_back()?;
    let (stem, ext) = segment.rsplit_once('.')?;
    (!stem.is_empty() && !ext.is_empty()).then_some(ext)
}
