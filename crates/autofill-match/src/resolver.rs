//! Ranking and the autofill decision.

use autofill_core::defaults::{AUTOFILL_THRESHOLD, MAX_CANDIDATES};
use autofill_core::{AutofillResponse, Candidate, CandidateView, ResolvedPatch};

/// Ranked outcome of one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Best candidate's patch when its score reaches the threshold.
    pub matched: Option<ResolvedPatch>,
    /// Top candidates, best first.
    pub candidates: Vec<Candidate>,
}

impl Resolution {
    pub fn top_score(&self) -> Option<u32> {
        self.candidates.first().map(|c| c.score)
    }

    pub fn into_response(self) -> AutofillResponse {
        AutofillResponse {
            success: true,
            matched: self.matched,
            candidates: self.candidates.iter().map(CandidateView::from).collect(),
        }
    }
}

/// Ranks scored candidates and decides whether to autofill.
#[derive(Debug, Clone, Copy)]
pub struct Resolver {
    pub max_candidates: usize,
    pub autofill_threshold: u32,
}

impl Default for Resolver {
    fn default() -> Self {
        Self {
            max_candidates: MAX_CANDIDATES,
            autofill_threshold: AUTOFILL_THRESHOLD,
        }
    }
}

impl Resolver {
    /// Drop zero scores, sort by score descending and keep the top N.
    ///
    /// The sort is stable: equal scores keep their input order, which the
    /// retriever fixes as live before legacy, then store order.
    pub fn resolve(&self, scored: Vec<Candidate>) -> Resolution {
        let mut ranked: Vec<Candidate> = scored.into_iter().filter(|c| c.score > 0).collect();
        ranked.sort_by(|a, b| b.score.cmp(&a.score));

        // decided on the full ranking, before truncation
        let matched = ranked
            .first()
            .filter(|best| best.score >= self.autofill_threshold)
            .map(|best| ResolvedPatch::from(&best.record));

        ranked.truncate(self.max_candidates);
        Resolution {
            matched,
            candidates: ranked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autofill_core::{IndexedRecord, Provenance, RawVehicleFields};
    use uuid::Uuid;

    fn candidate(provenance: Provenance, chassis: &str, score: u32) -> Candidate {
        Candidate {
            record: IndexedRecord::with_derived_keys(
                Uuid::new_v4(),
                provenance,
                RawVehicleFields {
                    chassis_number: Some(chassis.to_string()),
                    ..Default::default()
                },
            ),
            score,
        }
    }

    #[test]
    fn test_zero_scores_are_dropped() {
        let resolution = Resolver::default().resolve(vec![
            candidate(Provenance::Live, "A", 0),
            candidate(Provenance::Legacy, "B", 20),
        ]);
        assert_eq!(resolution.candidates.len(), 1);
        assert_eq!(resolution.top_score(), Some(20));
        assert!(resolution.matched.is_none());
    }

    #[test]
    fn test_match_at_threshold() {
        let resolution = Resolver::default().resolve(vec![
            candidate(Provenance::Legacy, "B", 30),
            candidate(Provenance::Live, "A", 70),
        ]);
        let patch = resolution.matched.expect("70 reaches the threshold");
        assert_eq!(patch.chassis_number, "A");
        assert_eq!(resolution.candidates[0].score, 70);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let resolution = Resolver::default().resolve(vec![
            candidate(Provenance::Live, "L1", 20),
            candidate(Provenance::Live, "L2", 40),
            candidate(Provenance::Legacy, "G1", 20),
            candidate(Provenance::Legacy, "G2", 40),
        ]);
        let order: Vec<&str> = resolution
            .candidates
            .iter()
            .map(|c| c.record.raw.chassis_number.as_deref().unwrap_or_default())
            .collect();
        assert_eq!(order, vec!["L2", "G2", "L1", "G1"]);
    }

    #[test]
    fn test_truncates_to_max_candidates() {
        let scored = (0..8)
            .map(|i| candidate(Provenance::Legacy, &format!("C{}", i), 20 + i))
            .collect();
        let resolution = Resolver::default().resolve(scored);
        assert_eq!(resolution.candidates.len(), 5);
        assert_eq!(resolution.top_score(), Some(27));
    }

    #[test]
    fn test_empty_input() {
        let response = Resolver::default().resolve(Vec::new()).into_response();
        assert_eq!(response, AutofillResponse::empty());
    }
}
