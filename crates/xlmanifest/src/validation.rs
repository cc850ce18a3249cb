//! Invariant validation over the manifest entity graph
//!
//! A synchronous, stateless walk over a [`Deployment`] and [`AddIn`]
//! pair. Each rule is a plain function returning a [`ValidationError`]
//! value on the first violated invariant; the public entry points chain
//! them fail-fast and wrap the outcome in the scope of the manifest half
//! that was at fault ([`ManifestError::InvalidDeployment`] or
//! [`ManifestError::InvalidAddIn`]), so callers can branch remediation
//! without parsing message text.
//!
//! Validation is independent of signature verification: a document whose
//! signature checks out is still rejected here if its entity graph is
//! inconsistent, and vice versa.

use crate::error::{ManifestError, Result};
use crate::manifest::{
    uri_has_wrapper_extension, AddIn, AddInFileExtension, AddInIdentity, AddInType,
    AssemblyIdentity, AssetFile, CompatibleFramework, Dependency, Deployment, DeploymentSettings,
    Description, FileHash, FilePlacement, RequiredOperatingSystem, UpdateBehavior,
    WRAPPER_FILE_EXTENSION,
};
use std::fmt;
use tracing::debug;
use url::Url;

/// Processor architectures an assembly identity may declare, compared
/// case-insensitively.
pub const PROCESSOR_ARCHITECTURES: &[&str] = &["NONE", "MSIL", "X86", "IA64", "AMD64", "ARM"];

/// Characters not allowed in file-name-like fields, plus any control
/// character.
const INVALID_FILE_NAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// One violated invariant, described for both humans and tooling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Which operation was in progress
    pub context: String,
    /// Which invariant failed
    pub problem: String,
    /// Corrective hint
    pub solution: String,
}

impl ValidationError {
    /// Construct an error from its three parts.
    #[must_use]
    pub fn new(
        context: impl Into<String>,
        problem: impl Into<String>,
        solution: impl Into<String>,
    ) -> Self {
        Self {
            context: context.into(),
            problem: problem.into(),
            solution: solution.into(),
        }
    }
}

// Three labeled lines, stable enough for machine parsing.
impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Context: {}\nProblem: {}\nSolution: {}",
            self.context, self.problem, self.solution
        )
    }
}

type RuleResult = std::result::Result<(), ValidationError>;

/// Validate a deployment manifest's entity graph.
///
/// # Errors
///
/// Returns `ManifestError::InvalidDeployment` carrying the first
/// violated invariant.
pub fn validate_deployment(deployment: &Deployment) -> Result<()> {
    deployment_rules(deployment).map_err(ManifestError::InvalidDeployment)?;
    debug!(
        product = %deployment.description.product,
        "validated deployment manifest"
    );
    Ok(())
}

/// Validate an add-in manifest's entity graph.
///
/// # Errors
///
/// Returns `ManifestError::InvalidAddIn` carrying the first violated
/// invariant.
pub fn validate_add_in(add_in: &AddIn) -> Result<()> {
    add_in_rules(add_in).map_err(ManifestError::InvalidAddIn)?;
    debug!(name = %add_in.identity.name, "validated add-in manifest");
    Ok(())
}

/// Validate a deployment and its companion add-in together.
///
/// Runs both single-manifest validations, then the cross-manifest pass:
/// when the deployment enables extension mapping, every downloadable
/// file URI under the add-in must carry the wrapper file extension.
///
/// # Errors
///
/// Returns the scoped error of whichever manifest half failed first.
pub fn validate_deployment_and_add_in(deployment: &Deployment, add_in: &AddIn) -> Result<()> {
    validate_deployment(deployment)?;
    validate_add_in(add_in)?;

    if deployment.settings.map_file_extensions {
        check_wrapper_extensions(add_in).map_err(ManifestError::InvalidAddIn)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Deployment subtree
// ---------------------------------------------------------------------------

fn deployment_rules(deployment: &Deployment) -> RuleResult {
    check_description(&deployment.description)?;
    check_settings(&deployment.settings)?;
    check_required_operating_system(&deployment.required_operating_system)?;
    if let Some(frameworks) = &deployment.compatible_frameworks {
        check_compatible_frameworks(frameworks)?;
    }
    Ok(())
}

fn check_description(description: &Description) -> RuleResult {
    let context = "Attempting to validate a Description instance.";
    check_non_blank(context, "Publisher", &description.publisher)?;
    check_non_blank(context, "Manufacturer", &description.manufacturer)?;
    check_non_blank(context, "Product", &description.product)?;
    Ok(())
}

fn check_settings(settings: &DeploymentSettings) -> RuleResult {
    let context = "Attempting to validate a DeploymentSettings instance.";
    if settings.minimum_required_version.is_none() {
        return Err(ValidationError::new(
            context,
            "The MinimumRequiredVersion is missing.",
            "Supply a value for MinimumRequiredVersion.",
        ));
    }
    check_update_behavior(&settings.update_behavior)
}

fn check_update_behavior(behavior: &UpdateBehavior) -> RuleResult {
    let context = "Attempting to validate an UpdateBehavior instance.";
    if behavior.requires_restart && behavior.notify_client {
        return Err(ValidationError::new(
            context,
            "Both RequiresRestart and NotifyClient cannot be true.",
            "Set either RequiresRestart or NotifyClient to true, but not both.",
        ));
    }
    if let Some(expiration) = &behavior.expiration {
        if expiration.maximum_age == 0 {
            return Err(ValidationError::new(
                "Attempting to validate an UpdateExpiration instance.",
                "The MaximumAge is 0.",
                "Supply a value greater than 0 for MaximumAge.",
            ));
        }
    }
    Ok(())
}

fn check_required_operating_system(os: &RequiredOperatingSystem) -> RuleResult {
    let context = "Attempting to validate a RequiredOperatingSystem instance.";
    check_non_blank(context, "SupportUrl", &os.support_url)?;
    check_url(&os.support_url)?;
    if os.minimum_version.is_none() {
        return Err(ValidationError::new(
            context,
            "The MinimumVersion is missing.",
            "Supply a valid value for MinimumVersion.",
        ));
    }
    Ok(())
}

fn check_compatible_frameworks(frameworks: &[CompatibleFramework]) -> RuleResult {
    if frameworks.is_empty() {
        return Err(ValidationError::new(
            "Attempting to validate a CompatibleFramework collection.",
            "The collection cannot be empty when present.",
            "Supply at least one CompatibleFramework, or omit the collection.",
        ));
    }
    frameworks.iter().try_for_each(check_compatible_framework)
}

fn check_compatible_framework(framework: &CompatibleFramework) -> RuleResult {
    let context = "Attempting to validate a CompatibleFramework instance.";
    check_non_blank(context, "SupportUrl", &framework.support_url)?;
    check_url(&framework.support_url)?;
    if framework.target_version.is_none() {
        return Err(ValidationError::new(
            context,
            "The TargetVersion is missing.",
            "Supply a valid value for TargetVersion.",
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Add-in subtree
// ---------------------------------------------------------------------------

fn add_in_rules(add_in: &AddIn) -> RuleResult {
    check_identity(&add_in.identity)?;
    if let Some(dependencies) = &add_in.dependencies {
        check_dependencies(dependencies)?;
    }
    if let Some(asset_files) = &add_in.asset_files {
        check_asset_files(asset_files)?;
    }
    Ok(())
}

fn check_identity(identity: &AddInIdentity) -> RuleResult {
    let context = "Attempting to validate an AddInIdentity instance.";
    check_non_blank(context, "Title", &identity.title)?;
    check_non_blank(context, "Name", &identity.name)?;
    check_file_name_chars(context, "Name", &identity.name)?;
    if identity.version.is_none() {
        return Err(ValidationError::new(
            context,
            "The Version is missing.",
            "Supply a valid Version.",
        ));
    }
    check_type_extension_pairing(identity)
}

// Script-container add-ins ship as script containers; everything else
// ships as a binary library.
fn check_type_extension_pairing(identity: &AddInIdentity) -> RuleResult {
    let context = "Attempting to validate an AddInIdentity instance.";
    let extension_is_script = matches!(
        identity.file_extension,
        AddInFileExtension::Xlam | AddInFileExtension::Xla
    );
    match identity.add_in_type {
        AddInType::Vba if !extension_is_script => Err(ValidationError::new(
            context,
            "The FileExtension for an add-in of type Vba must be either Xlam or Xla.",
            "Supply a valid FileExtension.",
        )),
        AddInType::ExcelDna | AddInType::Automation | AddInType::Com if extension_is_script => {
            Err(ValidationError::new(
                context,
                format!(
                    "The FileExtension for an add-in of type {:?} must be either Dll or Xll.",
                    identity.add_in_type
                ),
                "Supply a valid FileExtension.",
            ))
        }
        _ => Ok(()),
    }
}

fn check_dependencies(dependencies: &[Dependency]) -> RuleResult {
    if dependencies.is_empty() {
        return Err(ValidationError::new(
            "Attempting to validate a Dependency collection.",
            "The collection cannot be empty when present.",
            "Supply at least one Dependency, or omit the collection.",
        ));
    }
    dependencies.iter().try_for_each(check_dependency)
}

fn check_dependency(dependency: &Dependency) -> RuleResult {
    let context = "Attempting to validate a Dependency instance.";
    if dependency.size == 0 {
        return Err(ValidationError::new(
            context,
            "The Size cannot be 0.",
            "Supply a valid value for Size.",
        ));
    }
    check_assembly_identity(&dependency.assembly_identity)?;
    check_file_placement(&dependency.file_placement)?;
    if let Some(asset_files) = &dependency.asset_files {
        check_asset_files(asset_files)?;
    }
    Ok(())
}

fn check_assembly_identity(assembly: &AssemblyIdentity) -> RuleResult {
    let context = "Attempting to validate an AssemblyIdentity instance.";
    check_non_blank(context, "Name", &assembly.name)?;
    check_file_name_chars(context, "Name", &assembly.name)?;
    if assembly.version.is_none() {
        return Err(ValidationError::new(
            context,
            "The Version is missing.",
            "Supply a valid Version.",
        ));
    }
    check_non_blank(
        context,
        "ProcessorArchitecture",
        &assembly.processor_architecture,
    )?;
    if !PROCESSOR_ARCHITECTURES
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(&assembly.processor_architecture))
    {
        return Err(ValidationError::new(
            context,
            format!(
                "The ProcessorArchitecture value {} is not defined.",
                assembly.processor_architecture
            ),
            format!(
                "Supply a valid value from the following list for ProcessorArchitecture: {}.",
                PROCESSOR_ARCHITECTURES.join(", ")
            ),
        ));
    }
    if let Some(hash) = &assembly.hash {
        check_hash(context, hash)?;
    }
    Ok(())
}

fn check_asset_files(asset_files: &[AssetFile]) -> RuleResult {
    if asset_files.is_empty() {
        return Err(ValidationError::new(
            "Attempting to validate an AssetFile collection.",
            "The collection cannot be empty when present.",
            "Supply at least one AssetFile, or omit the collection.",
        ));
    }
    asset_files.iter().try_for_each(check_asset_file)
}

fn check_asset_file(asset_file: &AssetFile) -> RuleResult {
    let context = "Attempting to validate an AssetFile instance.";
    check_non_blank(context, "Name", &asset_file.name)?;
    check_file_name_chars(context, "Name", &asset_file.name)?;
    if asset_file.size == 0 {
        return Err(ValidationError::new(
            context,
            "The Size cannot be 0.",
            "Supply a valid value for Size.",
        ));
    }
    check_file_placement(&asset_file.file_placement)?;
    if let Some(hash) = &asset_file.hash {
        check_hash(context, hash)?;
    }
    Ok(())
}

fn check_file_placement(placement: &FilePlacement) -> RuleResult {
    let context = "Attempting to validate a FilePlacement instance.";
    if !placement.next_to_add_in && placement.sub_directory.is_none() {
        return Err(ValidationError::new(
            context,
            "The SubDirectory must have a value if NextToAddIn is false.",
            "Supply a valid SubDirectory.",
        ));
    }
    if let Some(sub_directory) = &placement.sub_directory {
        check_non_blank(context, "SubDirectory", sub_directory)?;
        check_file_name_chars(context, "SubDirectory", sub_directory)?;
    }
    Ok(())
}

fn check_hash(context: &str, hash: &FileHash) -> RuleResult {
    if !hash.is_well_formed() {
        return Err(ValidationError::new(
            context,
            format!(
                "The Hash Value does not decode to a {} digest.",
                hash.algorithm.wire_name()
            ),
            "Supply a hex Value whose length matches the Algorithm's digest length.",
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Cross-manifest extension mapping pass
// ---------------------------------------------------------------------------

fn check_wrapper_extensions(add_in: &AddIn) -> RuleResult {
    for dependency in add_in.dependencies.iter().flatten() {
        check_wrapped_uri("Dependency", &dependency.uri)?;
        for file in dependency.asset_files.iter().flatten() {
            check_wrapped_uri("AssetFile", &file.uri)?;
        }
    }
    for file in add_in.asset_files.iter().flatten() {
        check_wrapped_uri("AssetFile", &file.uri)?;
    }
    Ok(())
}

fn check_wrapped_uri(owner: &str, uri: &Url) -> RuleResult {
    if !uri_has_wrapper_extension(uri) {
        return Err(ValidationError::new(
            format!("Attempting to validate a {owner} Uri instance."),
            format!("The {owner} Uri must have a .{WRAPPER_FILE_EXTENSION} file extension."),
            format!("Supply a valid value for the {owner} Uri."),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Field-level helpers
// ---------------------------------------------------------------------------

fn check_non_blank(context: &str, field: &str, value: &str) -> RuleResult {
    if value.trim().is_empty() {
        return Err(ValidationError::new(
            context,
            format!("The {field} is either empty or whitespace."),
            format!("Supply a valid value for {field}."),
        ));
    }
    Ok(())
}

fn check_file_name_chars(context: &str, field: &str, value: &str) -> RuleResult {
    if value
        .chars()
        .any(|ch| ch.is_control() || INVALID_FILE_NAME_CHARS.contains(&ch))
    {
        return Err(ValidationError::new(
            context,
            format!("The {field} contains one or more invalid file characters."),
            format!("Supply a valid value for {field}."),
        ));
    }
    Ok(())
}

// URL-shaped strings are accepted without a scheme; a missing scheme is
// assumed to be http before parsing.
fn check_url(url: &str) -> RuleResult {
    let context = "Attempting to validate a url.";
    let invalid = || {
        ValidationError::new(
            context,
            "The url is not a valid URI.",
            "Supply a valid value for the url.",
        )
    };

    if url.trim().is_empty() {
        return Err(ValidationError::new(
            context,
            "The url is either empty or whitespace.",
            "Supply a valid value for the url.",
        ));
    }

    let lower = url.to_ascii_lowercase();
    let prefixed;
    let candidate = if lower.starts_with("http://") || lower.starts_with("https://") {
        url
    } else {
        prefixed = format!("http://{url}");
        &prefixed
    };

    let parsed = Url::parse(candidate).map_err(|_| invalid())?;
    let scheme_ok = parsed.scheme() == "http" || parsed.scheme() == "https";
    let host_ok = parsed.host_str().is_some_and(|host| host.contains('.'));
    if !(scheme_ok && host_ok) {
        return Err(invalid());
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::manifest::{
        ClrVersion, DeploymentBasis, DeploymentSettings, LoadBehavior, ManifestVersion,
        OfficeBitness, OperatingSystemBitness, UnitOfTime, UpdateExpiration, UpdateMode,
    };

    fn valid_deployment() -> Deployment {
        Deployment {
            add_in_uri: Url::parse("https://host.example.com/tools-AddIn.manifest.xml").unwrap(),
            alternate_add_in_uri: None,
            description: Description {
                publisher: "Example Corp".to_string(),
                manufacturer: "Example Tools".to_string(),
                product: "Analysis Toolkit".to_string(),
                support_uri: None,
            },
            settings: DeploymentSettings {
                deployment_basis: DeploymentBasis::PerUser,
                minimum_required_version: Some(ManifestVersion::new(1, 0, 0, 0)),
                map_file_extensions: false,
                load_behavior: LoadBehavior {
                    install: true,
                    load_order: 1,
                },
                update_behavior: UpdateBehavior {
                    mode: UpdateMode::Normal,
                    requires_restart: false,
                    remove_deprecated_version: false,
                    notify_client: true,
                    expiration: Some(UpdateExpiration {
                        unit_of_time: UnitOfTime::Days,
                        maximum_age: 7,
                    }),
                },
            },
            required_operating_system: RequiredOperatingSystem {
                support_url: "https://support.example.com".to_string(),
                minimum_version: Some(ManifestVersion::new(10, 0, 0, 0)),
                bitness: OperatingSystemBitness::X64,
            },
            compatible_frameworks: Some(vec![CompatibleFramework {
                support_url: "https://dotnet.example.com".to_string(),
                required: true,
                supported_runtime: ClrVersion::V4,
                target_version: Some(ManifestVersion::new(4, 8, 0, 0)),
            }]),
        }
    }

    fn valid_asset(uri: &str) -> AssetFile {
        AssetFile {
            uri: Url::parse(uri).unwrap(),
            name: "asset.dat".to_string(),
            size: 64,
            writeable: false,
            decompress_if_zipped: false,
            file_placement: FilePlacement {
                next_to_add_in: true,
                sub_directory: None,
            },
            hash: None,
        }
    }

    fn valid_add_in() -> AddIn {
        AddIn {
            uri: Url::parse("https://host.example.com/tools.xll").unwrap(),
            deployment_uri: Url::parse(
                "https://host.example.com/tools-Deployment.manifest.xml",
            )
            .unwrap(),
            target_office_installation: OfficeBitness::X64,
            identity: AddInIdentity {
                title: "Analysis Toolkit".to_string(),
                name: "tools".to_string(),
                add_in_type: AddInType::ExcelDna,
                file_extension: AddInFileExtension::Xll,
                version: Some(ManifestVersion::new(1, 0, 0, 0)),
            },
            dependencies: Some(vec![Dependency {
                uri: Url::parse("https://host.example.com/lib/core.dll").unwrap(),
                dependency_type: crate::manifest::DependencyType::RequiredReference,
                size: 2048,
                assembly_identity: AssemblyIdentity {
                    name: "Example.Core".to_string(),
                    version: Some(ManifestVersion::new(1, 0, 0, 0)),
                    public_key: None,
                    processor_architecture: "MSIL".to_string(),
                    culture: None,
                    hash: None,
                },
                managed_assembly: true,
                file_placement: FilePlacement {
                    next_to_add_in: false,
                    sub_directory: Some("lib".to_string()),
                },
                asset_files: None,
            }]),
            asset_files: Some(vec![valid_asset("https://host.example.com/readme.txt")]),
        }
    }

    fn deployment_problem(result: Result<()>) -> String {
        match result {
            Err(ManifestError::InvalidDeployment(detail)) => detail.problem,
            other => panic!("expected deployment-scoped error, got {other:?}"),
        }
    }

    fn add_in_problem(result: Result<()>) -> String {
        match result {
            Err(ManifestError::InvalidAddIn(detail)) => detail.problem,
            other => panic!("expected add-in-scoped error, got {other:?}"),
        }
    }

    // -----------------------------------------------------------------------
    // Baseline
    // -----------------------------------------------------------------------

    #[test]
    fn valid_pair_passes() {
        let deployment = valid_deployment();
        let add_in = valid_add_in();
        validate_deployment_and_add_in(&deployment, &add_in).unwrap();
    }

    // -----------------------------------------------------------------------
    // Deployment subtree
    // -----------------------------------------------------------------------

    #[test]
    fn blank_publisher_is_rejected() {
        let mut deployment = valid_deployment();
        deployment.description.publisher = "   ".to_string();
        let problem = deployment_problem(validate_deployment(&deployment));
        assert!(problem.contains("Publisher"));
    }

    #[test]
    fn missing_minimum_required_version_is_rejected() {
        let mut deployment = valid_deployment();
        deployment.settings.minimum_required_version = None;
        let problem = deployment_problem(validate_deployment(&deployment));
        assert!(problem.contains("MinimumRequiredVersion"));
    }

    #[test]
    fn restart_and_notify_are_mutually_exclusive() {
        let mut deployment = valid_deployment();
        deployment.settings.update_behavior.requires_restart = true;
        deployment.settings.update_behavior.notify_client = true;
        let problem = deployment_problem(validate_deployment(&deployment));
        assert!(problem.contains("RequiresRestart"));
        assert!(problem.contains("NotifyClient"));
    }

    #[test]
    fn either_restart_or_notify_alone_passes() {
        let mut deployment = valid_deployment();
        deployment.settings.update_behavior.requires_restart = true;
        deployment.settings.update_behavior.notify_client = false;
        validate_deployment(&deployment).unwrap();

        deployment.settings.update_behavior.requires_restart = false;
        deployment.settings.update_behavior.notify_client = true;
        validate_deployment(&deployment).unwrap();
    }

    #[test]
    fn zero_expiration_age_is_rejected() {
        let mut deployment = valid_deployment();
        deployment.settings.update_behavior.expiration = Some(UpdateExpiration {
            unit_of_time: UnitOfTime::Minutes,
            maximum_age: 0,
        });
        let problem = deployment_problem(validate_deployment(&deployment));
        assert!(problem.contains("MaximumAge"));
    }

    #[test]
    fn empty_framework_collection_is_rejected() {
        let mut deployment = valid_deployment();
        deployment.compatible_frameworks = Some(Vec::new());
        assert!(matches!(
            validate_deployment(&deployment),
            Err(ManifestError::InvalidDeployment(_))
        ));
    }

    #[test]
    fn absent_framework_collection_passes() {
        let mut deployment = valid_deployment();
        deployment.compatible_frameworks = None;
        validate_deployment(&deployment).unwrap();
    }

    #[test]
    fn bad_support_url_is_deployment_scoped() {
        let mut deployment = valid_deployment();
        deployment.required_operating_system.support_url = "not a url".to_string();
        assert!(matches!(
            validate_deployment(&deployment),
            Err(ManifestError::InvalidDeployment(_))
        ));
    }

    // -----------------------------------------------------------------------
    // Add-in subtree
    // -----------------------------------------------------------------------

    #[test]
    fn vba_with_binary_extension_is_rejected() {
        let mut add_in = valid_add_in();
        add_in.identity.add_in_type = AddInType::Vba;
        add_in.identity.file_extension = AddInFileExtension::Dll;
        let problem = add_in_problem(validate_add_in(&add_in));
        assert!(problem.contains("Vba"));
    }

    #[test]
    fn vba_with_script_extension_passes() {
        let mut add_in = valid_add_in();
        add_in.identity.add_in_type = AddInType::Vba;
        add_in.identity.file_extension = AddInFileExtension::Xlam;
        validate_add_in(&add_in).unwrap();
    }

    #[test]
    fn exceldna_with_script_extension_is_rejected() {
        let mut add_in = valid_add_in();
        add_in.identity.add_in_type = AddInType::ExcelDna;
        add_in.identity.file_extension = AddInFileExtension::Xla;
        assert!(matches!(
            validate_add_in(&add_in),
            Err(ManifestError::InvalidAddIn(_))
        ));
    }

    #[test]
    fn com_and_automation_require_binary_extension() {
        for add_in_type in [AddInType::Com, AddInType::Automation] {
            let mut add_in = valid_add_in();
            add_in.identity.add_in_type = add_in_type;
            add_in.identity.file_extension = AddInFileExtension::Xlam;
            assert!(validate_add_in(&add_in).is_err());

            add_in.identity.file_extension = AddInFileExtension::Dll;
            validate_add_in(&add_in).unwrap();
        }
    }

    #[test]
    fn name_with_path_separator_is_rejected() {
        let mut add_in = valid_add_in();
        add_in.identity.name = "tools/v2".to_string();
        let problem = add_in_problem(validate_add_in(&add_in));
        assert!(problem.contains("invalid file characters"));
    }

    #[test]
    fn missing_identity_version_is_rejected() {
        let mut add_in = valid_add_in();
        add_in.identity.version = None;
        let problem = add_in_problem(validate_add_in(&add_in));
        assert!(problem.contains("Version"));
    }

    #[test]
    fn zero_dependency_size_is_rejected() {
        let mut add_in = valid_add_in();
        add_in.dependencies.as_mut().unwrap()[0].size = 0;
        let problem = add_in_problem(validate_add_in(&add_in));
        assert!(problem.contains("Size"));
    }

    #[test]
    fn unknown_processor_architecture_is_rejected() {
        let mut add_in = valid_add_in();
        add_in.dependencies.as_mut().unwrap()[0]
            .assembly_identity
            .processor_architecture = "SPARC".to_string();
        let problem = add_in_problem(validate_add_in(&add_in));
        assert!(problem.contains("SPARC"));
    }

    #[test]
    fn processor_architecture_is_case_insensitive() {
        let mut add_in = valid_add_in();
        add_in.dependencies.as_mut().unwrap()[0]
            .assembly_identity
            .processor_architecture = "amd64".to_string();
        validate_add_in(&add_in).unwrap();
    }

    #[test]
    fn malformed_hash_is_rejected() {
        let mut add_in = valid_add_in();
        add_in.asset_files.as_mut().unwrap()[0].hash = Some(FileHash {
            algorithm: crate::HashAlgorithm::Sha256,
            value: "abcd".to_string(),
        });
        let problem = add_in_problem(validate_add_in(&add_in));
        assert!(problem.contains("Hash"));
    }

    #[test]
    fn empty_dependency_collection_is_rejected() {
        let mut add_in = valid_add_in();
        add_in.dependencies = Some(Vec::new());
        assert!(matches!(
            validate_add_in(&add_in),
            Err(ManifestError::InvalidAddIn(_))
        ));
    }

    // -----------------------------------------------------------------------
    // File placement
    // -----------------------------------------------------------------------

    #[test]
    fn detached_placement_without_subdirectory_is_rejected() {
        let mut add_in = valid_add_in();
        add_in.dependencies.as_mut().unwrap()[0].file_placement = FilePlacement {
            next_to_add_in: false,
            sub_directory: None,
        };
        let problem = add_in_problem(validate_add_in(&add_in));
        assert!(problem.contains("SubDirectory"));
    }

    #[test]
    fn detached_placement_with_subdirectory_passes() {
        let mut add_in = valid_add_in();
        add_in.dependencies.as_mut().unwrap()[0].file_placement = FilePlacement {
            next_to_add_in: false,
            sub_directory: Some("lib".to_string()),
        };
        validate_add_in(&add_in).unwrap();
    }

    #[test]
    fn subdirectory_with_invalid_chars_is_rejected() {
        let mut add_in = valid_add_in();
        add_in.dependencies.as_mut().unwrap()[0].file_placement = FilePlacement {
            next_to_add_in: false,
            sub_directory: Some("li|b".to_string()),
        };
        assert!(validate_add_in(&add_in).is_err());
    }

    // -----------------------------------------------------------------------
    // Extension mapping pass
    // -----------------------------------------------------------------------

    #[test]
    fn mapping_enabled_requires_wrapper_extension() {
        let mut deployment = valid_deployment();
        deployment.settings.map_file_extensions = true;
        let add_in = valid_add_in();

        let problem =
            add_in_problem(validate_deployment_and_add_in(&deployment, &add_in));
        assert!(problem.contains(WRAPPER_FILE_EXTENSION));
    }

    #[test]
    fn mapping_enabled_passes_after_append() {
        let mut deployment = valid_deployment();
        deployment.settings.map_file_extensions = true;
        let mut add_in = valid_add_in();
        add_in.append_wrapper_extensions();

        validate_deployment_and_add_in(&deployment, &add_in).unwrap();
    }

    #[test]
    fn mapping_disabled_ignores_extensions() {
        let deployment = valid_deployment();
        let add_in = valid_add_in();
        validate_deployment_and_add_in(&deployment, &add_in).unwrap();
    }

    // -----------------------------------------------------------------------
    // URL rule
    // -----------------------------------------------------------------------

    #[test]
    fn schemeless_url_with_dotted_host_passes() {
        check_url("support.example.com").unwrap();
    }

    #[test]
    fn non_http_scheme_is_rejected() {
        assert!(check_url("ftp://support.example.com").is_err());
    }

    #[test]
    fn dotless_host_is_rejected() {
        assert!(check_url("http://localhost").is_err());
    }

    #[test]
    fn blank_url_is_rejected() {
        assert!(check_url("   ").is_err());
    }

    // -----------------------------------------------------------------------
    // Error format
    // -----------------------------------------------------------------------

    #[test]
    fn validation_error_display_has_three_labeled_lines() {
        let error = ValidationError::new("ctx", "prob", "sol");
        let rendered = error.to_string();
        let lines: Vec<&str> = rendered.split('\n').collect();
        assert_eq!(
            lines,
            ["Context: ctx", "Problem: prob", "Solution: sol"]
        );
    }
}
