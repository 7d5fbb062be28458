//! The `eduflex courses` command.

use std::path::PathBuf;

use anyhow::{bail, Result};

use eduflex_core::model::{CourseEntry, DifficultyTier};
use eduflex_core::parser::{parse_catalog, starter_catalog};
use eduflex_core::recommend::recommend;
use eduflex_core::traits::{CatalogQuery, CourseCatalog};
use eduflex_providers::config::{create_service, load_config_from, CatalogConfig};

use crate::commands::course_table;

pub async fn execute(
    subject: Option<String>,
    tier: Option<String>,
    search: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    if let Some(needle) = search {
        let catalog = match &config.catalog {
            CatalogConfig::Local { path: Some(path) } => parse_catalog(path)?,
            CatalogConfig::Local { path: None } => starter_catalog()?,
            CatalogConfig::Firebase { .. } => {
                bail!("--search needs a local catalog; browse by --subject instead")
            }
        };
        let hits: Vec<CourseEntry> = catalog.search(&needle).into_iter().cloned().collect();
        println!("{} course(s) matching '{needle}':", hits.len());
        println!("{}", course_table(&hits));
        return Ok(());
    }

    let Some(subject) = subject else {
        bail!("either --subject or --search is required");
    };

    let service = create_service(&config)?;
    let courses = match tier {
        Some(tier) => {
            let tier: DifficultyTier = tier.parse().map_err(anyhow::Error::msg)?;
            recommend(&subject, tier, service.catalog()).await?
        }
        None => {
            let query = CatalogQuery {
                subject: subject.trim().to_string(),
                tier: None,
            };
            service.catalog().courses(&query).await?
        }
    };

    println!("Courses for {} ({}):", subject.trim(), service.catalog().name());
    println!("{}", course_table(&courses));
    Ok(())
}
