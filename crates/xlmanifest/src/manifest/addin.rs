//! Add-in manifest entities
//!
//! The add-in half of a published deployment: the installable file
//! itself, its identity, and every downloadable dependency and asset
//! that ships with it. Field-level invariants are enforced by
//! [`validate_add_in`](crate::validation::validate_add_in).

use crate::manifest::hash::FileHash;
use crate::manifest::version::ManifestVersion;
use crate::manifest::{append_wrapper_extension, strip_wrapper_extension};
use serde::{Deserialize, Serialize};
use url::Url;

/// Root of an add-in manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AddIn {
    /// Location of the installable add-in file
    pub uri: Url,
    /// Location of the companion deployment manifest
    pub deployment_uri: Url,
    /// Bitness of the host application installation this add-in targets
    pub target_office_installation: OfficeBitness,
    /// What the add-in is
    pub identity: AddInIdentity,
    /// Files the add-in needs before it can load; optional, but
    /// non-empty when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<Dependency>>,
    /// Loose files shipped next to the add-in; optional, but non-empty
    /// when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_files: Option<Vec<AssetFile>>,
}

impl AddIn {
    /// Total downloadable size in bytes across dependencies, their asset
    /// files, and the add-in's own asset files.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        let dependency_size: u64 = self
            .dependencies
            .iter()
            .flatten()
            .map(|dependency| {
                dependency.size
                    + dependency
                        .asset_files
                        .iter()
                        .flatten()
                        .map(|file| file.size)
                        .sum::<u64>()
            })
            .sum();
        let asset_size: u64 = self.asset_files.iter().flatten().map(|file| file.size).sum();
        dependency_size + asset_size
    }

    /// Append the wrapper file extension to every downloadable file URI.
    ///
    /// Applied by a publisher before uploading when the deployment's
    /// "map file extensions" setting is enabled. Idempotent: any URI
    /// already carrying the extension is left with exactly one copy.
    pub fn append_wrapper_extensions(&mut self) {
        self.strip_wrapper_extensions();
        self.for_each_file_uri(append_wrapper_extension);
    }

    /// Remove the wrapper file extension from every downloadable file
    /// URI that carries it.
    pub fn strip_wrapper_extensions(&mut self) {
        self.for_each_file_uri(strip_wrapper_extension);
    }

    fn for_each_file_uri(&mut self, apply: fn(&mut Url)) {
        for dependency in self.dependencies.iter_mut().flatten() {
            apply(&mut dependency.uri);
            for file in dependency.asset_files.iter_mut().flatten() {
                apply(&mut file.uri);
            }
        }
        for file in self.asset_files.iter_mut().flatten() {
            apply(&mut file.uri);
        }
    }
}

/// Bitness of the host application installation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OfficeBitness {
    #[serde(rename = "x86")]
    X86,
    #[serde(rename = "x64")]
    X64,
}

/// What an add-in is: display title, file name, kind, and version.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AddInIdentity {
    /// Display title shown to the user
    pub title: String,
    /// File name stem; must contain no characters illegal in a file name
    pub name: String,
    /// Kind of add-in; constrains the allowed file extension
    pub add_in_type: AddInType,
    /// File extension of the installable file
    pub file_extension: AddInFileExtension,
    /// Version of the add-in
    pub version: Option<ManifestVersion>,
}

/// Kinds of add-in a manifest can describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddInType {
    /// Script-container add-in
    #[serde(rename = "vba")]
    Vba,
    /// Excel-DNA native add-in
    #[serde(rename = "exceldna")]
    ExcelDna,
    /// Automation add-in
    #[serde(rename = "automation")]
    Automation,
    /// COM add-in
    #[serde(rename = "com")]
    Com,
}

/// Allowed installable-file extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddInFileExtension {
    /// Script container (current format)
    #[serde(rename = "xlam")]
    Xlam,
    /// Script container (legacy format)
    #[serde(rename = "xla")]
    Xla,
    /// Native add-in library
    #[serde(rename = "xll")]
    Xll,
    /// Managed or native library
    #[serde(rename = "dll")]
    Dll,
}

/// A file the add-in requires before it can load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Dependency {
    /// Where to download the dependency from
    pub uri: Url,
    /// Whether the dependency is a prerequisite or a referenced assembly
    #[serde(rename = "Type")]
    pub dependency_type: DependencyType,
    /// Download size in bytes; must be greater than zero
    pub size: u64,
    /// Identity of the assembly behind the URI
    #[serde(rename = "AssemblyId")]
    pub assembly_identity: AssemblyIdentity,
    /// Whether the file is a managed assembly
    pub managed_assembly: bool,
    /// Where the file lands relative to the add-in
    pub file_placement: FilePlacement,
    /// Files shipped alongside this dependency; optional, but non-empty
    /// when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_files: Option<Vec<AssetFile>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DependencyType {
    /// Must be installed before the add-in loads
    #[serde(rename = "prequisite")]
    Prerequisite,
    /// Referenced by the add-in at run time
    #[serde(rename = "requiredreference")]
    RequiredReference,
}

/// Identity of a dependency's assembly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AssemblyIdentity {
    /// Assembly name; must contain no characters illegal in a file name
    pub name: String,
    /// Assembly version
    pub version: Option<ManifestVersion>,
    /// Public key token, when strongly named
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
    /// Target processor architecture; one of a fixed allow-list
    pub processor_architecture: String,
    /// Assembly culture
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub culture: Option<String>,
    /// Content hash of the assembly file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<FileHash>,
}

/// A loose file shipped with an add-in or dependency.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AssetFile {
    /// Where to download the file from
    pub uri: Url,
    /// File name on disk; must contain no characters illegal in a file
    /// name
    pub name: String,
    /// Download size in bytes; must be greater than zero
    pub size: u64,
    /// Whether the installed file may be modified in place
    pub writeable: bool,
    /// Whether a zipped file is expanded after download
    pub decompress_if_zipped: bool,
    /// Where the file lands relative to the add-in
    pub file_placement: FilePlacement,
    /// Content hash of the file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<FileHash>,
}

/// Where a downloaded file is placed relative to the installed add-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FilePlacement {
    /// Placed in the add-in's own directory
    pub next_to_add_in: bool,
    /// Subdirectory used when not placed next to the add-in; mandatory
    /// in that case
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_directory: Option<String>,
}
