use crate::cli::ConfigArgs;
use crate::error::{CliError, Result};
use rsgc::engine::config::{StripConfig, StripConfigBuilder};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialRingConfig {
    max_ring_size: Option<usize>,
    flat_tolerance_degrees: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialHybridizationConfig {
    angle_threshold_degrees: Option<f64>,
    min_single_bond_length: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialCappingConfig {
    leave_as_ethyl: Option<bool>,
    hydrogen_bond_length: Option<f64>,
    tetrahedral_angle_degrees: Option<f64>,
    complete_alpha_carbons: Option<bool>,
    complete_sp3_carbons: Option<bool>,
}

/// The TOML configuration file. Every key is optional.
///
/// ```toml
/// solvent-residues = ["HOH", "DMS"]
/// path-search-limit = 1000000
///
/// [rings]
/// max-ring-size = 7
/// flat-tolerance-degrees = 20.0
///
/// [hybridization]
/// angle-threshold-degrees = 115.0
/// min-single-bond-length = 1.3
///
/// [capping]
/// leave-as-ethyl = false
/// hydrogen-bond-length = 0.97
/// tetrahedral-angle-degrees = 109.5
/// complete-alpha-carbons = false
/// complete-sp3-carbons = false
/// ```
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct PartialStripConfig {
    rings: Option<PartialRingConfig>,
    hybridization: Option<PartialHybridizationConfig>,
    capping: Option<PartialCappingConfig>,
    path_search_limit: Option<usize>,
    solvent_residues: Option<Vec<String>>,
}

/// Everything a command needs after the file and the flags are merged.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub strip: StripConfig,
    pub solvent_residues: HashSet<String>,
}

impl PartialStripConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Reads the file named by `--config`, or starts from an empty configuration.
    pub fn load(args: &ConfigArgs) -> Result<Self> {
        match &args.config {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Layers the command-line flags over the file and validates the result.
    /// Flags can only switch features on; an unset flag keeps the file's value.
    pub fn merge_with_cli(self, args: &ConfigArgs) -> Result<ResolvedConfig> {
        let rings = self.rings.unwrap_or_default();
        let hybridization = self.hybridization.unwrap_or_default();
        let capping = self.capping.unwrap_or_default();

        let mut builder = StripConfigBuilder::new();
        if let Some(size) = rings.max_ring_size {
            builder = builder.max_ring_size(size);
        }
        if let Some(tolerance) = rings.flat_tolerance_degrees {
            builder = builder.flat_ring_tolerance_degrees(tolerance);
        }
        if let Some(threshold) = hybridization.angle_threshold_degrees {
            builder = builder.sp3_angle_threshold_degrees(threshold);
        }
        if let Some(length) = hybridization.min_single_bond_length {
            builder = builder.sp3_min_single_bond_length(length);
        }
        if let Some(length) = capping.hydrogen_bond_length {
            builder = builder.hydrogen_bond_length(length);
        }
        if let Some(angle) = capping.tetrahedral_angle_degrees {
            builder = builder.tetrahedral_angle_degrees(angle);
        }
        if let Some(limit) = self.path_search_limit {
            builder = builder.path_search_limit(limit);
        }

        let leave_as_ethyl = args.ethyl || capping.leave_as_ethyl.unwrap_or(false);
        let complete_alpha_carbons =
            args.complete_alpha_carbons || capping.complete_alpha_carbons.unwrap_or(false);
        let complete_sp3_carbons =
            args.complete_sp3_carbons || capping.complete_sp3_carbons.unwrap_or(false);
        let strip = builder
            .leave_as_ethyl(leave_as_ethyl)
            .complete_alpha_carbons(complete_alpha_carbons)
            .complete_sp3_carbons(complete_sp3_carbons)
            .build()?;

        let solvent_residues = self
            .solvent_residues
            .unwrap_or_default()
            .into_iter()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();

        debug!(?strip, ?solvent_residues, "Resolved configuration");
        Ok(ResolvedConfig {
            strip,
            solvent_residues,
        })
    }
}
