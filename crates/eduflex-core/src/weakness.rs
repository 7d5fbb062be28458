//! Gradesheet weakness analysis.
//!
//! A subject is weak when its score falls strictly below the threshold. When
//! nothing is below the threshold (or no threshold is given) the subjects
//! tied at the global minimum are weak instead.

use std::collections::BTreeSet;

use futures::future::join_all;

use crate::difficulty::DifficultyPolicy;
use crate::error::{CoreError, CoreResult};
use crate::model::{SubjectWeaknessMap, TaggedCourse};
use crate::recommend::recommend;
use crate::traits::{CourseCatalog, GradesheetAnalysis};

/// Default cut below which a subject counts as weak.
pub const DEFAULT_WEAKNESS_THRESHOLD: f64 = 50.0;

/// Identify the weakest subjects of a gradesheet.
pub fn analyze_weakness(
    scores: &SubjectWeaknessMap,
    threshold: Option<f64>,
) -> CoreResult<BTreeSet<String>> {
    let min = scores
        .min_score()
        .ok_or_else(|| CoreError::empty("gradesheet has no subject scores"))?;

    if let Some(cut) = threshold {
        let below: BTreeSet<String> = scores
            .iter()
            .filter(|(_, s)| *s < cut)
            .map(|(name, _)| name.to_string())
            .collect();
        if !below.is_empty() {
            return Ok(below);
        }
        tracing::debug!(threshold = cut, "no subject below threshold, using global minimum");
    }

    Ok(scores
        .iter()
        .filter(|(_, s)| *s == min)
        .map(|(name, _)| name.to_string())
        .collect())
}

/// Look up recommendations for each weak subject and tag them by subject.
///
/// Each subject's tier comes from its own gradesheet score. Lookups run
/// concurrently; results keep subject order, then catalog order.
pub async fn recommend_for_weaknesses(
    weak: &BTreeSet<String>,
    scores: &SubjectWeaknessMap,
    policy: &dyn DifficultyPolicy,
    catalog: &dyn CourseCatalog,
) -> CoreResult<Vec<TaggedCourse>> {
    let lookups = weak.iter().map(|subject| async move {
        let score = scores.get(subject).unwrap_or(0.0);
        let tier = policy.classify(score, None);
        let courses = recommend(subject, tier, catalog).await?;
        Ok::<_, CoreError>(
            courses
                .into_iter()
                .map(|course| TaggedCourse {
                    subject: subject.clone(),
                    course,
                })
                .collect::<Vec<_>>(),
        )
    });

    let mut tagged = Vec::new();
    for batch in join_all(lookups).await {
        tagged.extend(batch?);
    }
    Ok(tagged)
}

/// Full gradesheet path: find weak subjects, then recommend for each.
pub async fn analyze_gradesheet(
    scores: &SubjectWeaknessMap,
    threshold: Option<f64>,
    policy: &dyn DifficultyPolicy,
    catalog: &dyn CourseCatalog,
) -> CoreResult<GradesheetAnalysis> {
    let weak = analyze_weakness(scores, threshold)?;
    tracing::info!(weak = ?weak, "weak subjects identified");
    let recommendations = recommend_for_weaknesses(&weak, scores, policy, catalog).await?;

    Ok(GradesheetAnalysis {
        weakest_subjects: scores.subset(&weak),
        recommendations_based_on_weakness: recommendations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difficulty::ScoreBands;
    use crate::model::{CourseEntry, DifficultyTier};
    use crate::traits::CatalogQuery;
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn scores(pairs: &[(&str, f64)]) -> SubjectWeaknessMap {
        SubjectWeaknessMap::from_scores(pairs.iter().map(|(s, v)| (*s, *v))).unwrap()
    }

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_gradesheet_fails() {
        let err = analyze_weakness(&SubjectWeaknessMap::new(), Some(50.0)).unwrap_err();
        assert!(matches!(err, CoreError::EmptyInput(_)));
        let err = analyze_weakness(&SubjectWeaknessMap::new(), None).unwrap_err();
        assert!(matches!(err, CoreError::EmptyInput(_)));
    }

    #[test]
    fn below_threshold() {
        let map = scores(&[("Math", 90.0), ("Physics", 40.0), ("Chem", 85.0)]);
        assert_eq!(analyze_weakness(&map, Some(50.0)).unwrap(), set(&["Physics"]));
    }

    #[test]
    fn falls_back_to_global_minimum() {
        let map = scores(&[("Math", 90.0), ("Physics", 95.0)]);
        assert_eq!(analyze_weakness(&map, Some(50.0)).unwrap(), set(&["Math"]));
    }

    #[test]
    fn threshold_is_strict() {
        let map = scores(&[("Math", 50.0), ("Art", 70.0)]);
        assert_eq!(analyze_weakness(&map, Some(50.0)).unwrap(), set(&["Math"]));
        let map = scores(&[("Math", 50.0), ("Art", 20.0), ("Bio", 30.0)]);
        assert_eq!(analyze_weakness(&map, Some(50.0)).unwrap(), set(&["Art", "Bio"]));
    }

    #[test]
    fn ties_at_minimum_are_all_weak() {
        let map = scores(&[("Math", 60.0), ("Art", 60.0), ("Bio", 75.0)]);
        assert_eq!(analyze_weakness(&map, None).unwrap(), set(&["Art", "Math"]));
    }

    struct RecordingCatalog {
        seen: Mutex<Vec<CatalogQuery>>,
    }

    #[async_trait]
    impl CourseCatalog for RecordingCatalog {
        fn name(&self) -> &str {
            "recording"
        }

        async fn courses(&self, query: &CatalogQuery) -> CoreResult<Vec<CourseEntry>> {
            self.seen.lock().unwrap().push(query.clone());
            Ok(vec![CourseEntry {
                name: format!("{} refresher", query.subject),
                rating: 4.5,
                category: query.subject.clone(),
                link: String::new(),
                level: None,
            }])
        }
    }

    #[tokio::test]
    async fn gradesheet_recommendations_are_tagged_per_subject() {
        let catalog = RecordingCatalog {
            seen: Mutex::new(Vec::new()),
        };
        let map = scores(&[("Math", 90.0), ("Physics", 40.0), ("Chem", 10.0)]);
        let analysis = analyze_gradesheet(&map, Some(50.0), &ScoreBands::default(), &catalog)
            .await
            .unwrap();

        assert_eq!(analysis.weakest_subjects.len(), 2);
        assert_eq!(analysis.weakest_subjects.get("Physics"), Some(40.0));
        let subjects: Vec<_> = analysis
            .recommendations_based_on_weakness
            .iter()
            .map(|t| t.subject.as_str())
            .collect();
        assert_eq!(subjects, vec!["Chem", "Physics"]);

        let seen = catalog.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen
            .iter()
            .all(|q| q.tier == Some(DifficultyTier::Beginner)));
    }
}
