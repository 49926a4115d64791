use crate::core::topology::flatness::AngleSumFlatness;
use crate::core::topology::hybridization::Sp3Classifier;
use crate::core::topology::paths::{DEFAULT_SEARCH_LIMIT, MoietyConnector};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Parameters of the stripping pipeline. Build with [`StripConfigBuilder`].
#[derive(Debug, Clone, PartialEq)]
pub struct StripConfig {
    /// Keep two carbons past the protected set (ethyl) instead of one (methyl).
    pub leave_as_ethyl: bool,
    pub max_ring_size: usize,
    pub flat_ring_tolerance_degrees: f64,
    pub sp3_angle_threshold_degrees: f64,
    /// Shortest bond (Angstroms) for which a singly bonded carbon still counts as sp3.
    pub sp3_min_single_bond_length: f64,
    /// C-H length (Angstroms) used for every capping and newly placed hydrogen.
    pub hydrogen_bond_length: f64,
    pub tetrahedral_angle_degrees: f64,
    /// After pruning, fill every surviving alpha carbon up to four neighbors.
    pub complete_alpha_carbons: bool,
    /// After pruning, fill every carbon the sp3 classifier accepts up to four neighbors.
    pub complete_sp3_carbons: bool,
    pub path_search_limit: usize,
}

impl Default for StripConfig {
    fn default() -> Self {
        Self {
            leave_as_ethyl: false,
            max_ring_size: 7,
            flat_ring_tolerance_degrees: 20.0,
            sp3_angle_threshold_degrees: 115.0,
            sp3_min_single_bond_length: 1.3,
            hydrogen_bond_length: 0.97,
            tetrahedral_angle_degrees: 109.5,
            complete_alpha_carbons: false,
            complete_sp3_carbons: false,
            path_search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

impl StripConfig {
    pub fn flatness(&self) -> AngleSumFlatness {
        AngleSumFlatness::new(self.flat_ring_tolerance_degrees)
    }

    pub fn sp3_classifier(&self) -> Sp3Classifier {
        Sp3Classifier {
            angle_threshold_degrees: self.sp3_angle_threshold_degrees,
            min_single_bond_length: self.sp3_min_single_bond_length,
        }
    }

    pub fn connector(&self) -> MoietyConnector {
        MoietyConnector::new(self.path_search_limit)
    }
}

#[derive(Default)]
pub struct StripConfigBuilder {
    leave_as_ethyl: Option<bool>,
    max_ring_size: Option<usize>,
    flat_ring_tolerance_degrees: Option<f64>,
    sp3_angle_threshold_degrees: Option<f64>,
    sp3_min_single_bond_length: Option<f64>,
    hydrogen_bond_length: Option<f64>,
    tetrahedral_angle_degrees: Option<f64>,
    complete_alpha_carbons: Option<bool>,
    complete_sp3_carbons: Option<bool>,
    path_search_limit: Option<usize>,
}

impl StripConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn leave_as_ethyl(mut self, enabled: bool) -> Self {
        self.leave_as_ethyl = Some(enabled);
        self
    }
    pub fn max_ring_size(mut self, size: usize) -> Self {
        self.max_ring_size = Some(size);
        self
    }
    pub fn flat_ring_tolerance_degrees(mut self, tolerance: f64) -> Self {
        self.flat_ring_tolerance_degrees = Some(tolerance);
        self
    }
    pub fn sp3_angle_threshold_degrees(mut self, threshold: f64) -> Self {
        self.sp3_angle_threshold_degrees = Some(threshold);
        self
    }
    pub fn sp3_min_single_bond_length(mut self, length: f64) -> Self {
        self.sp3_min_single_bond_length = Some(length);
        self
    }
    pub fn hydrogen_bond_length(mut self, length: f64) -> Self {
        self.hydrogen_bond_length = Some(length);
        self
    }
    pub fn tetrahedral_angle_degrees(mut self, angle: f64) -> Self {
        self.tetrahedral_angle_degrees = Some(angle);
        self
    }
    pub fn complete_alpha_carbons(mut self, enabled: bool) -> Self {
        self.complete_alpha_carbons = Some(enabled);
        self
    }
    pub fn complete_sp3_carbons(mut self, enabled: bool) -> Self {
        self.complete_sp3_carbons = Some(enabled);
        self
    }
    pub fn path_search_limit(mut self, limit: usize) -> Self {
        self.path_search_limit = Some(limit);
        self
    }

    /// Fills unset fields with their defaults and validates ranges.
    pub fn build(self) -> Result<StripConfig, ConfigError> {
        let defaults = StripConfig::default();
        let config = StripConfig {
            leave_as_ethyl: self.leave_as_ethyl.unwrap_or(defaults.leave_as_ethyl),
            max_ring_size: self.max_ring_size.unwrap_or(defaults.max_ring_size),
            flat_ring_tolerance_degrees: self
                .flat_ring_tolerance_degrees
                .unwrap_or(defaults.flat_ring_tolerance_degrees),
            sp3_angle_threshold_degrees: self
                .sp3_angle_threshold_degrees
                .unwrap_or(defaults.sp3_angle_threshold_degrees),
            sp3_min_single_bond_length: self
                .sp3_min_single_bond_length
                .unwrap_or(defaults.sp3_min_single_bond_length),
            hydrogen_bond_length: self
                .hydrogen_bond_length
                .unwrap_or(defaults.hydrogen_bond_length),
            tetrahedral_angle_degrees: self
                .tetrahedral_angle_degrees
                .unwrap_or(defaults.tetrahedral_angle_degrees),
            complete_alpha_carbons: self
                .complete_alpha_carbons
                .unwrap_or(defaults.complete_alpha_carbons),
            complete_sp3_carbons: self
                .complete_sp3_carbons
                .unwrap_or(defaults.complete_sp3_carbons),
            path_search_limit: self.path_search_limit.unwrap_or(defaults.path_search_limit),
        };
        validate(&config)?;
        Ok(config)
    }
}

fn invalid(name: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidParameter {
        name,
        reason: reason.into(),
    }
}

fn validate(config: &StripConfig) -> Result<(), ConfigError> {
    if config.max_ring_size < 3 {
        return Err(invalid("max_ring_size", "a ring needs at least 3 atoms"));
    }
    if !(0.0..180.0).contains(&config.flat_ring_tolerance_degrees) {
        return Err(invalid(
            "flat_ring_tolerance_degrees",
            "must be in [0, 180) degrees",
        ));
    }
    if !(0.0..=180.0).contains(&config.sp3_angle_threshold_degrees) {
        return Err(invalid(
            "sp3_angle_threshold_degrees",
            "must be in [0, 180] degrees",
        ));
    }
    if !(0.0..180.0).contains(&config.tetrahedral_angle_degrees)
        || config.tetrahedral_angle_degrees == 0.0
    {
        return Err(invalid(
            "tetrahedral_angle_degrees",
            "must be in (0, 180) degrees",
        ));
    }
    for (name, value) in [
        ("sp3_min_single_bond_length", config.sp3_min_single_bond_length),
        ("hydrogen_bond_length", config.hydrogen_bond_length),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(invalid(name, "must be a positive length in Angstroms"));
        }
    }
    if config.path_search_limit == 0 {
        return Err(invalid("path_search_limit", "must be at least 1"));
    }
    Ok(())
}
