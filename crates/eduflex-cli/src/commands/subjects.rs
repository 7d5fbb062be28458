//! The `eduflex subjects` command.

use std::path::PathBuf;

use anyhow::Result;

use eduflex_core::traits::QuestionBank;
use eduflex_providers::config::{create_backend, create_service, load_config_from};

pub async fn execute(remote: bool, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let (source, subjects) = if remote {
        let backend = create_backend(&config)?;
        let subjects = backend.subjects().await?;
        (backend.base_url().to_string(), subjects)
    } else {
        let service = create_service(&config)?;
        let subjects = service.subjects().await?;
        (service.bank().name().to_string(), subjects)
    };

    if subjects.is_empty() {
        println!("No subjects available from {source}.");
        return Ok(());
    }

    println!("Subjects ({source}):");
    for subject in &subjects {
        println!("  {subject}");
    }
    Ok(())
}
