//! npe-catalog
//!
//! The allow-list registry and scenario selection. Pure data plus a random
//! sampler; no AWS dependency. Catalogs are built and validated once at
//! startup and only read afterwards.

pub mod age_groups;
pub mod differentials;
pub mod error;
pub mod lists;
pub mod sampling;
pub mod scenario;
pub mod specs;

use std::collections::HashSet;

use npe_core::catalog::Catalog;
use npe_core::models::scenario::AgeGroupProfile;

use age_groups::DEFAULT_AGE_GROUP;
use differentials::DifferentialMap;
use error::CatalogError;
use scenario::ScenarioConfig;

/// Every catalog the pipeline reads, plus the age-group profiles and the
/// option-set shape.
#[derive(Debug, Clone)]
pub struct Registry {
    pub diagnoses: Catalog,
    pub assessments: Catalog,
    pub modalities: Catalog,
    pub strategies: Catalog,
    pub differentials: DifferentialMap,
    pub scenario: ScenarioConfig,
    age_groups: Vec<AgeGroupProfile>,
    default_age_group: usize,
}

/// Inputs for [`Registry::from_parts`].
#[derive(Debug, Clone)]
pub struct RegistryParts {
    pub diagnoses: Catalog,
    pub assessments: Catalog,
    pub modalities: Catalog,
    pub strategies: Catalog,
    pub differentials: DifferentialMap,
    pub age_groups: Vec<AgeGroupProfile>,
    pub scenario: ScenarioConfig,
}

impl Registry {
    /// The built-in catalogs.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_parts(RegistryParts {
            diagnoses: Catalog::new(
                lists::diagnoses::NAME,
                lists::diagnoses::DIAGNOSES.iter().copied(),
            )?,
            assessments: Catalog::new(
                lists::assessments::NAME,
                lists::assessments::ASSESSMENTS.iter().copied(),
            )?,
            modalities: Catalog::new(
                lists::modalities::NAME,
                lists::modalities::MODALITIES.iter().copied(),
            )?,
            strategies: Catalog::new(
                lists::strategies::NAME,
                lists::strategies::STRATEGIES.iter().copied(),
            )?,
            differentials: DifferentialMap::builtin(),
            age_groups: age_groups::builtin(),
            scenario: ScenarioConfig::default(),
        })
    }

    /// Assemble a registry, checking that the differential map only names
    /// diagnoses, that option sets can be filled, and that the default age
    /// group exists.
    pub fn from_parts(parts: RegistryParts) -> Result<Self, CatalogError> {
        let RegistryParts {
            diagnoses,
            assessments,
            modalities,
            strategies,
            differentials,
            age_groups,
            scenario,
        } = parts;

        if scenario.option_count < 3 {
            return Err(CatalogError::OptionCountTooSmall(scenario.option_count));
        }
        if diagnoses.len() < scenario.option_count {
            return Err(CatalogError::CatalogTooSmall {
                catalog: diagnoses.name().to_string(),
                needed: scenario.option_count,
                available: diagnoses.len(),
            });
        }

        for (category, neighbors) in differentials.iter() {
            if !diagnoses.contains(category) {
                return Err(CatalogError::UnknownCategory {
                    catalog: diagnoses.name().to_string(),
                    label: category.clone(),
                });
            }
            let mut seen = HashSet::new();
            for neighbor in neighbors {
                if neighbor == category {
                    return Err(CatalogError::SelfDifferential(category.clone()));
                }
                if !diagnoses.contains(neighbor) {
                    return Err(CatalogError::UnknownCategory {
                        catalog: diagnoses.name().to_string(),
                        label: neighbor.clone(),
                    });
                }
                if !seen.insert(neighbor.as_str()) {
                    return Err(CatalogError::DuplicateDifferential {
                        category: category.clone(),
                        neighbor: neighbor.clone(),
                    });
                }
            }
        }

        let default_age_group = age_groups
            .iter()
            .position(|p| p.key == DEFAULT_AGE_GROUP)
            .ok_or_else(|| CatalogError::MissingDefaultAgeGroup(DEFAULT_AGE_GROUP.to_string()))?;

        Ok(Self {
            diagnoses,
            assessments,
            modalities,
            strategies,
            differentials,
            scenario,
            age_groups,
            default_age_group,
        })
    }

    pub fn age_groups(&self) -> &[AgeGroupProfile] {
        &self.age_groups
    }

    /// The profile matching `hint`, or the adult profile when nothing
    /// matches.
    pub fn resolve_age_group(&self, hint: &str) -> &AgeGroupProfile {
        self.age_groups
            .iter()
            .find(|p| p.matches(hint))
            .unwrap_or(&self.age_groups[self.default_age_group])
    }
}
