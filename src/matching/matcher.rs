use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::assisted::AssistedRanker;
use super::error::MatchError;
use super::lexical::LexicalRanker;
use super::types::{MatchOutcome, RankingMethod};
use crate::catalogue::DescriptorCatalogue;

/// Chooses a ranking strategy per request and applies the fallback policy.
#[derive(Clone)]
pub struct RelevanceMatcher {
    catalogue: Arc<dyn DescriptorCatalogue>,
    lexical: LexicalRanker,
    assisted: Option<AssistedRanker>,
}

impl std::fmt::Debug for RelevanceMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelevanceMatcher")
            .field("lexical", &self.lexical)
            .field("assisted", &self.assisted)
            .finish()
    }
}

impl RelevanceMatcher {
    /// `assisted` is `None` when assistance is disabled or no credential is
    /// configured.
    pub fn new(catalogue: Arc<dyn DescriptorCatalogue>, assisted: Option<AssistedRanker>) -> Self {
        Self {
            catalogue,
            lexical: LexicalRanker::default(),
            assisted,
        }
    }

    pub fn lexical_only(catalogue: Arc<dyn DescriptorCatalogue>) -> Self {
        Self::new(catalogue, None)
    }

    pub fn assisted_enabled(&self) -> bool {
        self.assisted.is_some()
    }

    pub fn catalogue(&self) -> &Arc<dyn DescriptorCatalogue> {
        &self.catalogue
    }

    /// Ranks the descriptors of `discipline` against `observation`.
    ///
    /// Blank inputs and empty catalogues short-circuit to an empty outcome
    /// without contacting the remote service. Only a catalogue read failure is
    /// returned as an error.
    #[instrument(skip(self, observation), fields(observation_len = observation.len()))]
    pub async fn suggest(
        &self,
        observation: &str,
        discipline: &str,
    ) -> Result<MatchOutcome, MatchError> {
        if observation.trim().is_empty() || discipline.trim().is_empty() {
            debug!("Blank observation or discipline");
            return Ok(MatchOutcome::empty());
        }

        let descriptors = self.catalogue.descriptors_for(discipline).await?;
        if descriptors.is_empty() {
            debug!(discipline, "No descriptors for discipline");
            return Ok(MatchOutcome::empty());
        }

        if let Some(assisted) = &self.assisted {
            match assisted.rank(observation, discipline, &descriptors).await {
                Ok(suggestions) if !suggestions.is_empty() => {
                    info!(count = suggestions.len(), "Assisted ranking used");
                    return Ok(MatchOutcome {
                        suggestions,
                        method: RankingMethod::Assisted,
                    });
                }
                Ok(_) => debug!("Assisted ranking returned nothing usable, falling back"),
                Err(e) => warn!(error = %e, "Assisted ranking failed, falling back"),
            }
        }

        let suggestions = self.lexical.rank(observation, &descriptors);
        let method = if suggestions.is_empty() {
            RankingMethod::None
        } else {
            RankingMethod::Lexical
        };
        Ok(MatchOutcome {
            suggestions,
            method,
        })
    }
}
