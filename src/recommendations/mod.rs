//! Alternative-supplier suggestions for exposed parts.
//!
//! Only parts that are both single-sourced and assessed HIGH or CRITICAL
//! get suggestions. Candidates are suppliers of other parts in the same
//! category, ranked by how many of those parts they supply. The suggestion
//! set is the top `max_per_part` candidates; candidates already stored for
//! the part are skipped, so repeated runs never add duplicates.

use crate::config::RecommendationConfig;
use crate::core::{PartHistory, PartSupplyChainRiskRecord, SupplierId, SupplierPart};
use crate::core::{NewRecommendation, RecommendationRecord};
use crate::errors::{Result, RiskError};
use crate::store::RiskStore;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub supplier: SupplierId,
    /// Distinct same-category parts the supplier offers.
    pub shared_parts: usize,
}

/// Suppliers of other parts in the category, excluding every supplier
/// already linked to the part, including inactive ones.
///
/// Ordered by shared part count (descending), then supplier id.
pub fn rank_candidates(history: &PartHistory, offerings: &[SupplierPart]) -> Vec<Candidate> {
    let current: BTreeSet<SupplierId> = history.linked_suppliers.iter().copied().collect();
    let mut shared: BTreeMap<SupplierId, BTreeSet<_>> = BTreeMap::new();
    for offering in offerings {
        if offering.part == history.part.id || current.contains(&offering.supplier) {
            continue;
        }
        shared
            .entry(offering.supplier)
            .or_default()
            .insert(offering.part);
    }

    let mut candidates: Vec<Candidate> = shared
        .into_iter()
        .map(|(supplier, parts)| Candidate {
            supplier,
            shared_parts: parts.len(),
        })
        .collect();
    candidates.sort_by(|a, b| {
        b.shared_parts
            .cmp(&a.shared_parts)
            .then(a.supplier.cmp(&b.supplier))
    });
    candidates
}

#[derive(Debug, Clone, Default)]
pub struct RecommendationGenerator {
    config: RecommendationConfig,
}

impl RecommendationGenerator {
    pub fn new(config: RecommendationConfig) -> Self {
        Self { config }
    }

    pub fn is_eligible(record: &PartSupplyChainRiskRecord) -> bool {
        record.risk_level().is_high() && record.single_source_risk()
    }

    pub fn similarity(&self, shared_parts: usize) -> u8 {
        let bonus = shared_parts.saturating_mul(usize::from(self.config.per_shared_part));
        usize::from(self.config.base_similarity)
            .saturating_add(bonus)
            .min(100) as u8
    }

    /// The drafts that would be inserted, given the part's existing suggestions.
    pub fn plan(
        &self,
        history: &PartHistory,
        offerings: &[SupplierPart],
        existing: &[RecommendationRecord],
    ) -> Vec<NewRecommendation> {
        let Some(category) = history.part.category.as_ref() else {
            return Vec::new();
        };
        let already: BTreeSet<SupplierId> =
            existing.iter().map(|r| r.suggested_supplier).collect();

        rank_candidates(history, offerings)
            .into_iter()
            .take(self.config.max_per_part)
            .filter(|candidate| !already.contains(&candidate.supplier))
            .map(|candidate| NewRecommendation {
                part: history.part.id,
                primary_supplier: history.suppliers.first().copied(),
                suggested_supplier: candidate.supplier,
                similarity_score: self.similarity(candidate.shared_parts),
                reason: format!(
                    "Supplier provides similar parts in category {}",
                    category.name
                ),
            })
            .collect()
    }

    /// Insert suggestions for an eligible part. Returns the new records.
    pub fn generate(
        &self,
        store: &dyn RiskStore,
        record: &PartSupplyChainRiskRecord,
        history: &PartHistory,
    ) -> Result<Vec<RecommendationRecord>> {
        if !Self::is_eligible(record) {
            return Ok(Vec::new());
        }
        let Some(category) = history.part.category.as_ref() else {
            tracing::debug!(part = %history.part.id, "no category, skipping recommendations");
            return Ok(Vec::new());
        };

        let offerings = store.category_offerings(category.id)?;
        let existing = store.recommendations_for_part(history.part.id)?;

        let mut created = Vec::new();
        for draft in self.plan(history, &offerings, &existing) {
            match store.insert_recommendation(draft) {
                Ok(recommendation) => created.push(recommendation),
                // inserted concurrently by another pass
                Err(RiskError::UniqueViolation(_)) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(created)
    }
}
