use crate::category::Category;
use crate::error::CardError;
use crate::provider::{Candidate, ReferenceProvider};

/// Reduce a candidate set to the one record the query names.
///
/// One candidate wins outright. With several, a single candidate whose
/// `name` equals `query` exactly (case-sensitive, no normalization) wins;
/// zero or multiple exact matches are ambiguous.
pub fn select(query: &str, candidates: Vec<Candidate>) -> Result<Candidate, CardError> {
    let total = candidates.len();
    match total {
        0 => Err(CardError::NoMatch {
            query: query.to_string(),
        }),
        1 => Ok(candidates.into_iter().next().unwrap_or_default()),
        _ => {
            let mut exact = candidates.into_iter().filter(|c| c.name() == Some(query));
            match (exact.next(), exact.next()) {
                (Some(only), None) => Ok(only),
                _ => Err(CardError::Ambiguous {
                    query: query.to_string(),
                    candidates: total,
                }),
            }
        }
    }
}

/// Fetch candidates for `query` and resolve them to a single record.
pub async fn resolve<P: ReferenceProvider>(
    provider: &P,
    category: Category,
    query: &str,
) -> Result<Candidate, CardError> {
    let candidates = provider.fetch_candidates(category, query).await?;
    tracing::debug!(
        category = category.label(),
        query,
        candidates = candidates.len(),
        "resolving reference"
    );
    select(query, candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::future::Future;

    fn named(names: &[&str]) -> Vec<Candidate> {
        names
            .iter()
            .map(|n| match json!({ "name": n }) {
                serde_json::Value::Object(fields) => Candidate::new(fields),
                _ => unreachable!(),
            })
            .collect()
    }

    /// Answers every query with the same fixed result.
    struct FixedProvider(Result<Vec<Candidate>, CardError>);

    impl ReferenceProvider for FixedProvider {
        fn fetch_candidates(
            &self,
            _category: Category,
            _query: &str,
        ) -> impl Future<Output = Result<Vec<Candidate>, CardError>> + Send {
            let result = self.0.clone();
            async move { result }
        }
    }

    #[test]
    fn empty_set_is_no_match() {
        let err = select("Tackle", Vec::new()).unwrap_err();
        assert_eq!(err, CardError::NoMatch { query: "Tackle".into() });
    }

    #[test]
    fn single_candidate_wins_even_without_exact_name() {
        let chosen = select("tack", named(&["Tackle"])).unwrap();
        assert_eq!(chosen.name(), Some("Tackle"));
    }

    #[test]
    fn exact_match_overrides_cardinality() {
        let chosen = select("Tackle", named(&["Tackle", "Take Down", "Tail Whip", "Thrash"])).unwrap();
        assert_eq!(chosen.name(), Some("Tackle"));
    }

    #[test]
    fn exact_match_is_case_sensitive() {
        let err = select("tackle", named(&["Tackle", "Take Down"])).unwrap_err();
        assert_eq!(
            err,
            CardError::Ambiguous {
                query: "tackle".into(),
                candidates: 2
            }
        );
    }

    #[test]
    fn duplicate_exact_matches_are_ambiguous() {
        let err = select("Tackle", named(&["Tackle", "Tackle", "Take Down"])).unwrap_err();
        assert!(matches!(err, CardError::Ambiguous { candidates: 3, .. }));
    }

    #[test]
    fn several_fuzzy_matches_are_ambiguous() {
        assert!(matches!(
            select("Ta", named(&["Tackle", "Take Down"])),
            Err(CardError::Ambiguous { .. })
        ));
    }

    #[tokio::test]
    async fn resolve_uses_provider_result() {
        let provider = FixedProvider(Ok(named(&["Overgrow", "Overcoat"])));
        let chosen = resolve(&provider, Category::Ability, "Overgrow").await.unwrap();
        assert_eq!(chosen.name(), Some("Overgrow"));
    }

    #[tokio::test]
    async fn resolve_surfaces_provider_error() {
        let provider = FixedProvider(Err(CardError::Provider("Unknown type".into())));
        let err = resolve(&provider, Category::Skill, "Athletics").await.unwrap_err();
        assert_eq!(err, CardError::Provider("Unknown type".into()));
    }
}
