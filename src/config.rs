//! TOML-based dataset profiles and built-in presets.
//!
//! A profile tells the pipeline how one dataset kind (production, battery,
//! charger, ...) is normalized and reduced: which columns are numeric, which
//! raw strings mean "no data", how values are scaled, and how each column
//! combines when buckets are coarsened.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::series::markers::MarkerFields;
use crate::series::normalize::{FieldPolicy, SentinelMatch, SentinelPolicy};
use crate::series::types::{FieldReducerSpec, Reducer, TIMESTAMP_FIELD};
use crate::series::window::DEFAULT_WINDOW_DAYS;

/// Sentinel used by charger consumption/production columns.
const NO_DATA: &str = "-1.00";
/// Sentinel used by state-of-charge columns when no vehicle is connected.
const NO_VEHICLE: &str = "-0.1";

/// Top-level dataset profile parsed from TOML.
///
/// Load from TOML with [`DatasetProfile::from_toml_file`] or use
/// [`DatasetProfile::from_preset`] for one of the built-in dataset kinds.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetProfile {
    /// Dataset identity and view defaults.
    #[serde(default)]
    pub dataset: DatasetConfig,
    /// Numeric columns, in chart order.
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
    /// EV session marker columns (charger datasets only).
    #[serde(default)]
    pub markers: Option<MarkerConfig>,
}

/// Dataset identity and view defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatasetConfig {
    /// Short identifier.
    pub name: String,
    /// Chart title.
    pub title: String,
    /// Days shown in the initial window (must be > 0).
    pub default_days: u32,
    /// Sentinel comparison mode: `"exact"` or `"numeric"`.
    pub sentinel_match: SentinelMatch,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            name: "custom".to_string(),
            title: "Custom dataset".to_string(),
            default_days: DEFAULT_WINDOW_DAYS,
            sentinel_match: SentinelMatch::Exact,
        }
    }
}

/// One numeric column.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldConfig {
    /// Column name as it appears in the CSV header.
    pub name: String,
    /// How the column combines within a bucket.
    pub reducer: Reducer,
    /// Raw strings meaning "no data".
    #[serde(default)]
    pub sentinels: Vec<String>,
    /// Multiplier applied to parsed values (e.g. 100 for fractions shown as %).
    #[serde(default = "default_scale")]
    pub scale: f64,
}

fn default_scale() -> f64 {
    1.0
}

impl FieldConfig {
    fn new(name: &str, reducer: Reducer) -> Self {
        Self {
            name: name.to_string(),
            reducer,
            sentinels: Vec::new(),
            scale: 1.0,
        }
    }

    fn sentinels(mut self, sentinels: &[&str]) -> Self {
        self.sentinels = sentinels.iter().map(|s| (*s).to_string()).collect();
        self
    }

    fn scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }
}

/// EV session marker columns.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkerConfig {
    /// Countdown column that is zero on the arrival step.
    pub arrival_field: String,
    /// Countdown column that is zero on the departure step.
    pub departure_field: String,
    /// Column holding the vehicle name.
    pub name_field: String,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        let fields = MarkerFields::default();
        Self {
            arrival_field: fields.arrival_field,
            departure_field: fields.departure_field,
            name_field: fields.name_field,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"fields[2].scale"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl DatasetProfile {
    fn preset(name: &str, title: &str, fields: Vec<FieldConfig>) -> Self {
        Self {
            dataset: DatasetConfig {
                name: name.to_string(),
                title: title.to_string(),
                ..DatasetConfig::default()
            },
            fields,
            markers: None,
        }
    }

    /// Building energy production: PV and EV discharge, summed.
    pub fn production() -> Self {
        Self::preset(
            "production",
            "Energy production",
            vec![
                FieldConfig::new("Energy Production from PV-kWh", Reducer::Sum),
                FieldConfig::new("Energy Production from EV-kWh", Reducer::Sum),
            ],
        )
    }

    /// Building energy consumption by end use, summed. Columns follow the
    /// CityLearn building export naming.
    pub fn consumption() -> Self {
        Self::preset(
            "consumption",
            "Energy consumption",
            vec![
                FieldConfig::new("Non-shiftable Load-kWh", Reducer::Sum),
                FieldConfig::new("Cooling Demand-kWh", Reducer::Sum),
                FieldConfig::new("Heating Demand-kWh", Reducer::Sum),
                FieldConfig::new("DHW Demand-kWh", Reducer::Sum),
            ],
        )
    }

    /// Stationary battery: state of charge (%) averaged, energy flow summed.
    pub fn battery() -> Self {
        Self::preset(
            "battery",
            "Battery",
            vec![
                FieldConfig::new("Battery Soc-%", Reducer::Average)
                    .sentinels(&[NO_DATA, NO_VEHICLE])
                    .scale(100.0),
                FieldConfig::new("Battery (Dis)Charge-kWh", Reducer::Sum),
            ],
        )
    }

    /// EV charger: energy summed, connected vehicle SOC averaged, session markers.
    pub fn charger() -> Self {
        let soc = |name: &str| {
            FieldConfig::new(name, Reducer::Average)
                .sentinels(&[NO_DATA, NO_VEHICLE])
                .scale(100.0)
        };
        Self {
            markers: Some(MarkerConfig::default()),
            ..Self::preset(
                "charger",
                "Charger",
                vec![
                    FieldConfig::new("Charger Consumption-kWh", Reducer::Sum).sentinels(&[NO_DATA]),
                    FieldConfig::new("Charger Production-kWh", Reducer::Sum).sentinels(&[NO_DATA]),
                    soc("EV Estimated SOC Arrival-%"),
                    soc("EV Required SOC Departure-%"),
                    soc("EV SOC-%"),
                ],
            )
        }
    }

    /// Electric vehicle state of charge, averaged.
    pub fn ev() -> Self {
        Self::preset(
            "ev",
            "Electric vehicle",
            vec![
                FieldConfig::new("electric_vehicle_estimated_soc_arrival", Reducer::Average)
                    .sentinels(&[NO_VEHICLE]),
                FieldConfig::new("electric_vehicle_required_soc_departure", Reducer::Average)
                    .sentinels(&[NO_VEHICLE]),
                FieldConfig::new("electric_vehicle_soc", Reducer::Average).sentinels(&["-1.0"]),
            ],
        )
    }

    /// Electricity price and its forecasts, averaged.
    pub fn pricing() -> Self {
        Self::preset(
            "pricing",
            "Electricity pricing",
            vec![
                FieldConfig::new("electricity_pricing-$/kWh", Reducer::Average),
                FieldConfig::new("electricity_pricing_predicted_1-$/kWh", Reducer::Average),
                FieldConfig::new("electricity_pricing_predicted_2-$/kWh", Reducer::Average),
                FieldConfig::new("electricity_pricing_predicted_3-$/kWh", Reducer::Average),
            ],
        )
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &[
        "production",
        "consumption",
        "battery",
        "charger",
        "ev",
        "pricing",
    ];

    /// Loads a profile from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "production" => Ok(Self::production()),
            "consumption" => Ok(Self::consumption()),
            "battery" => Ok(Self::battery()),
            "charger" => Ok(Self::charger()),
            "ev" => Ok(Self::ev()),
            "pricing" => Ok(Self::pricing()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a profile from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "profile".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a profile from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if the profile is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.dataset.default_days == 0 {
            errors.push(ConfigError {
                field: "dataset.default_days".into(),
                message: "must be > 0".into(),
            });
        }
        if self.fields.is_empty() {
            errors.push(ConfigError {
                field: "fields".into(),
                message: "at least one field is required".into(),
            });
        }

        let mut seen = HashSet::new();
        for (i, field) in self.fields.iter().enumerate() {
            let path = format!("fields[{i}]");
            if field.name.trim().is_empty() {
                errors.push(ConfigError {
                    field: format!("{path}.name"),
                    message: "must not be empty".into(),
                });
            } else if field.name == TIMESTAMP_FIELD {
                errors.push(ConfigError {
                    field: format!("{path}.name"),
                    message: format!("\"{TIMESTAMP_FIELD}\" is reserved"),
                });
            } else if !seen.insert(field.name.as_str()) {
                errors.push(ConfigError {
                    field: format!("{path}.name"),
                    message: format!("duplicate field \"{}\"", field.name),
                });
            }
            if !field.scale.is_finite() || field.scale == 0.0 {
                errors.push(ConfigError {
                    field: format!("{path}.scale"),
                    message: "must be finite and non-zero".into(),
                });
            }
            if field.sentinels.iter().any(|s| s.trim().is_empty()) {
                errors.push(ConfigError {
                    field: format!("{path}.sentinels"),
                    message: "must not contain empty strings".into(),
                });
            }
        }

        if let Some(markers) = &self.markers {
            let columns = [
                ("markers.arrival_field", &markers.arrival_field),
                ("markers.departure_field", &markers.departure_field),
                ("markers.name_field", &markers.name_field),
            ];
            for (path, column) in columns {
                if column.trim().is_empty() {
                    errors.push(ConfigError {
                        field: path.into(),
                        message: "must not be empty".into(),
                    });
                }
            }
        }

        errors
    }

    /// Normalization rules for this profile's columns.
    pub fn sentinel_policy(&self) -> SentinelPolicy {
        self.fields.iter().fold(
            SentinelPolicy::new(self.dataset.sentinel_match),
            |policy, field| {
                policy.with_field(
                    field.name.clone(),
                    FieldPolicy::new(field.sentinels.iter().cloned(), field.scale),
                )
            },
        )
    }

    /// Reducers for this profile's columns, in declaration order.
    pub fn reducers(&self) -> FieldReducerSpec {
        self.fields
            .iter()
            .map(|field| (field.name.clone(), field.reducer))
            .collect()
    }

    /// Marker columns, if this dataset carries EV sessions.
    pub fn marker_fields(&self) -> Option<MarkerFields> {
        self.markers.as_ref().map(|m| MarkerFields {
            arrival_field: m.arrival_field.clone(),
            departure_field: m.departure_field.clone(),
            name_field: m.name_field.clone(),
        })
    }
}
