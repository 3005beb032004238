//! Provider catalog, region carbon intensity and worst-case baseline.
//!
//! Every resource figure is expressed per 1000 tokens. CO2 figures on a
//! provider are grid-neutral and become comparable to the worst case only
//! after multiplying by the provider region's intensity.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// A model serving configuration with illustrative resource costs.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProviderProfile {
    pub name: String,
    pub model: String,
    pub region: String,
    /// Energy in Wh per 1000 tokens
    pub energy_wh_per_1k: f64,
    /// Base CO2 in g per 1000 tokens, before region adjustment
    pub co2_g_per_1k: f64,
    /// Water in ml per 1000 tokens
    pub water_ml_per_1k: f64,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

impl ProviderProfile {
    pub fn new(
        name: &str,
        model: &str,
        region: &str,
        energy_wh_per_1k: f64,
        co2_g_per_1k: f64,
        water_ml_per_1k: f64,
    ) -> Self {
        Self {
            name: name.to_string(),
            model: model.to_string(),
            region: region.to_string(),
            energy_wh_per_1k,
            co2_g_per_1k,
            water_ml_per_1k,
            available: true,
        }
    }

    /// Same profile, marked unavailable.
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }
}

/// Grid-mix multipliers by region (kg CO2e per kWh).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RegionIntensity {
    /// Multiplier for regions missing from `intensity`
    #[serde(default = "default_intensity")]
    pub default_intensity: f64,
    #[serde(default)]
    pub intensity: HashMap<String, f64>,
}

fn default_intensity() -> f64 {
    0.275
}

impl RegionIntensity {
    /// Intensity for `region`, falling back to the default multiplier.
    pub fn factor(&self, region: &str) -> f64 {
        self.intensity
            .get(region)
            .copied()
            .unwrap_or(self.default_intensity)
    }
}

impl Default for RegionIntensity {
    fn default() -> Self {
        let intensity = [
            ("france", 0.085),
            ("usa-east", 0.385),
            ("usa-west", 0.275),
            ("europe", 0.231),
        ]
        .into_iter()
        .map(|(region, factor)| (region.to_string(), factor))
        .collect();

        Self {
            default_intensity: default_intensity(),
            intensity,
        }
    }
}

/// Fixed per-1000-token baseline that savings are measured against.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct WorstCase {
    #[serde(default = "default_worst_energy")]
    pub energy_wh_per_1k: f64,
    /// Region-adjusted CO2 ceiling
    #[serde(default = "default_worst_co2")]
    pub co2_g_per_1k: f64,
    #[serde(default = "default_worst_water")]
    pub water_ml_per_1k: f64,
}

fn default_worst_energy() -> f64 {
    500.0
}

fn default_worst_co2() -> f64 {
    250.0
}

fn default_worst_water() -> f64 {
    1200.0
}

impl Default for WorstCase {
    fn default() -> Self {
        Self {
            energy_wh_per_1k: default_worst_energy(),
            co2_g_per_1k: default_worst_co2(),
            water_ml_per_1k: default_worst_water(),
        }
    }
}

/// The built-in illustrative providers.
pub fn default_providers() -> Vec<ProviderProfile> {
    vec![
        ProviderProfile::new("Claude", "claude-2.1", "france", 300.0, 100.0, 800.0),
        ProviderProfile::new("OpenAI", "gpt-4", "usa-east", 400.0, 200.0, 1000.0),
        ProviderProfile::new("Anthropic", "claude-3-opus", "usa-west", 350.0, 150.0, 900.0),
        ProviderProfile::new("Mistral", "mistral-large", "europe", 250.0, 80.0, 700.0),
    ]
}

/// Validated, immutable set of providers plus the tables used to score them.
#[derive(Debug, Clone)]
pub struct Catalog {
    providers: Vec<ProviderProfile>,
    regions: RegionIntensity,
    worst_case: WorstCase,
}

impl Catalog {
    /// Build a catalog, rejecting figures that are non-positive or exceed
    /// the worst case.
    ///
    /// A catalog with no available provider is accepted here; selection on
    /// it fails with [`crate::Error::NoAvailableProviders`].
    pub fn new(
        providers: Vec<ProviderProfile>,
        regions: RegionIntensity,
        worst_case: WorstCase,
    ) -> Result<Self, ConfigError> {
        validate_worst_case(&worst_case)?;
        validate_regions(&regions)?;

        for provider in &providers {
            validate_provider(provider, &regions, &worst_case)?;
        }

        if !providers.iter().any(|p| p.available) {
            tracing::warn!("No available providers in catalog - every estimate will fail");
        }

        Ok(Self {
            providers,
            regions,
            worst_case,
        })
    }

    /// All providers in catalog order, including unavailable ones.
    pub fn providers(&self) -> &[ProviderProfile] {
        &self.providers
    }

    /// Available providers in catalog order.
    pub fn available(&self) -> impl Iterator<Item = &ProviderProfile> {
        self.providers.iter().filter(|p| p.available)
    }

    pub fn regions(&self) -> &RegionIntensity {
        &self.regions
    }

    pub fn worst_case(&self) -> &WorstCase {
        &self.worst_case
    }

    /// Region-adjusted CO2 in g per 1000 tokens for `provider`.
    pub fn adjusted_co2_per_1k(&self, provider: &ProviderProfile) -> f64 {
        provider.co2_g_per_1k * self.regions.factor(&provider.region)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            providers: default_providers(),
            regions: RegionIntensity::default(),
            worst_case: WorstCase::default(),
        }
    }
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn validate_worst_case(worst_case: &WorstCase) -> Result<(), ConfigError> {
    let figures = [
        ("energy_wh_per_1k", worst_case.energy_wh_per_1k),
        ("co2_g_per_1k", worst_case.co2_g_per_1k),
        ("water_ml_per_1k", worst_case.water_ml_per_1k),
    ];
    for (field, value) in figures {
        if !positive(value) {
            return Err(ConfigError::Validation(format!(
                "Worst case '{}' must be positive, got {}",
                field, value
            )));
        }
    }
    Ok(())
}

fn validate_regions(regions: &RegionIntensity) -> Result<(), ConfigError> {
    if !positive(regions.default_intensity) {
        return Err(ConfigError::Validation(format!(
            "Default region intensity must be positive, got {}",
            regions.default_intensity
        )));
    }
    for (region, factor) in &regions.intensity {
        if !positive(*factor) {
            return Err(ConfigError::Validation(format!(
                "Intensity for region '{}' must be positive, got {}",
                region, factor
            )));
        }
    }
    Ok(())
}

fn validate_provider(
    provider: &ProviderProfile,
    regions: &RegionIntensity,
    worst_case: &WorstCase,
) -> Result<(), ConfigError> {
    for (field, value) in [
        ("name", &provider.name),
        ("model", &provider.model),
        ("region", &provider.region),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "Provider '{}' has empty {}",
                provider.name, field
            )));
        }
    }

    if !regions.intensity.contains_key(&provider.region) {
        tracing::warn!(
            provider = %provider.name,
            region = %provider.region,
            default = regions.default_intensity,
            "Region has no carbon intensity entry, using default"
        );
    }

    let adjusted_co2 = provider.co2_g_per_1k * regions.factor(&provider.region);
    let figures = [
        (
            "energy_wh_per_1k",
            provider.energy_wh_per_1k,
            provider.energy_wh_per_1k,
            worst_case.energy_wh_per_1k,
        ),
        (
            "co2_g_per_1k",
            provider.co2_g_per_1k,
            adjusted_co2,
            worst_case.co2_g_per_1k,
        ),
        (
            "water_ml_per_1k",
            provider.water_ml_per_1k,
            provider.water_ml_per_1k,
            worst_case.water_ml_per_1k,
        ),
    ];

    for (field, raw, compared, ceiling) in figures {
        if !positive(raw) {
            return Err(ConfigError::Validation(format!(
                "Provider '{}' {} must be positive, got {}",
                provider.name, field, raw
            )));
        }
        if compared > ceiling {
            return Err(ConfigError::Validation(format!(
                "Provider '{}' {} ({}) exceeds worst case ({})",
                provider.name, field, compared, ceiling
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(providers: Vec<ProviderProfile>) -> Result<Catalog, ConfigError> {
        Catalog::new(providers, RegionIntensity::default(), WorstCase::default())
    }

    #[test]
    fn test_default_catalog_is_valid() {
        let catalog = build(default_providers()).unwrap();
        assert_eq!(catalog.providers().len(), 4);
        assert_eq!(catalog.available().count(), 4);
    }

    #[test]
    fn test_region_factor_fallback() {
        let regions = RegionIntensity::default();
        assert_eq!(regions.factor("france"), 0.085);
        assert_eq!(regions.factor("mars"), 0.275);
    }

    #[test]
    fn test_adjusted_co2() {
        let catalog = Catalog::default();
        let claude = &catalog.providers()[0];
        assert!((catalog.adjusted_co2_per_1k(claude) - 8.5).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_non_positive_figure() {
        let provider = ProviderProfile::new("zero", "m", "france", 0.0, 10.0, 10.0);
        let err = build(vec![provider]).unwrap_err().to_string();
        assert!(err.contains("energy_wh_per_1k"), "{err}");
        assert!(err.contains("zero"), "{err}");
    }

    #[test]
    fn test_rejects_nan() {
        let provider = ProviderProfile::new("nan", "m", "france", 10.0, 10.0, f64::NAN);
        assert!(build(vec![provider]).is_err());
    }

    #[test]
    fn test_rejects_figure_above_worst_case() {
        let provider = ProviderProfile::new("hungry", "m", "france", 600.0, 10.0, 10.0);
        let err = build(vec![provider]).unwrap_err().to_string();
        assert!(err.contains("exceeds worst case"), "{err}");
    }

    #[test]
    fn test_co2_ceiling_is_region_adjusted() {
        // 1000 g base in france is 85 g adjusted, under the 250 g ceiling
        let clean = ProviderProfile::new("clean", "m", "france", 100.0, 1000.0, 100.0);
        assert!(build(vec![clean]).is_ok());

        // 1000 g base in usa-east is 385 g adjusted, over the ceiling
        let dirty = ProviderProfile::new("dirty", "m", "usa-east", 100.0, 1000.0, 100.0);
        assert!(build(vec![dirty]).is_err());
    }

    #[test]
    fn test_rejects_empty_identity() {
        let provider = ProviderProfile::new("blank", "", "france", 10.0, 10.0, 10.0);
        let err = build(vec![provider]).unwrap_err().to_string();
        assert!(err.contains("empty model"), "{err}");
    }

    #[test]
    fn test_rejects_bad_worst_case() {
        let worst_case = WorstCase {
            co2_g_per_1k: -1.0,
            ..WorstCase::default()
        };
        assert!(Catalog::new(default_providers(), RegionIntensity::default(), worst_case).is_err());
    }

    #[test]
    fn test_rejects_bad_region_intensity() {
        let mut regions = RegionIntensity::default();
        regions.intensity.insert("void".to_string(), 0.0);
        assert!(Catalog::new(default_providers(), regions, WorstCase::default()).is_err());
    }

    #[test]
    fn test_all_unavailable_is_constructible() {
        let providers = default_providers()
            .into_iter()
            .map(ProviderProfile::unavailable)
            .collect();
        let catalog = build(providers).unwrap();
        assert_eq!(catalog.available().count(), 0);
    }

    #[test]
    fn test_provider_deserialize_defaults_available() {
        let provider: ProviderProfile = toml::from_str(
            r#"
            name = "p"
            model = "m"
            region = "europe"
            energy_wh_per_1k = 1.0
            co2_g_per_1k = 1.0
            water_ml_per_1k = 1.0
            "#,
        )
        .unwrap();
        assert!(provider.available);
    }
}
