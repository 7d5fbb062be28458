//! Recommendation selection from an external course catalog.

use crate::error::{CoreError, CoreResult};
use crate::model::{CourseEntry, DifficultyTier};
use crate::traits::{CatalogQuery, CourseCatalog};

/// Look up courses for `subject` at `tier`.
///
/// Catalogs without tier data are queried by subject alone. The catalog's
/// order is preserved. An unavailable catalog degrades to an empty list, so
/// the only error is a blank subject.
pub async fn recommend(
    subject: &str,
    tier: DifficultyTier,
    catalog: &dyn CourseCatalog,
) -> CoreResult<Vec<CourseEntry>> {
    let subject = subject.trim();
    if subject.is_empty() {
        return Err(CoreError::invalid("subject is required for recommendations"));
    }

    let query = CatalogQuery {
        subject: subject.to_string(),
        tier: catalog.supports_tiers().then_some(tier),
    };

    match catalog.courses(&query).await {
        Ok(courses) => {
            tracing::info!(
                catalog = catalog.name(),
                subject,
                %tier,
                count = courses.len(),
                "recommendations selected"
            );
            Ok(courses)
        }
        Err(e) if e.is_external() => {
            tracing::warn!(
                catalog = catalog.name(),
                subject,
                %tier,
                "catalog unavailable, no recommendations: {e}"
            );
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}
