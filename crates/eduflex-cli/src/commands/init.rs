//! The `eduflex init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    write_once(Path::new("eduflex.toml"), SAMPLE_CONFIG)?;

    std::fs::create_dir_all("question-banks")?;
    write_once(Path::new("question-banks/example.toml"), EXAMPLE_BANK)?;

    println!("\nNext steps:");
    println!("  1. Edit eduflex.toml to point at your question bank and catalog");
    println!("  2. Run: eduflex validate --bank question-banks");
    println!("  3. Run: eduflex quiz --subject \"Math and Logic\" --name <you> --age <age>");

    Ok(())
}

fn write_once(path: &Path, contents: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, contents)?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# eduflex configuration

# Quiz backend used by `--remote` (override with EDUFLEX_BACKEND_URL).
backend_url = "http://localhost:5000"

# Gradesheet subjects scoring below this are weak.
weakness_threshold = 50
max_courses = 5
timeout_secs = 30
output_dir = "./eduflex-reports"

[question_bank]
type = "local"
path = "question-banks"

# Omit `path` to use the bundled catalog.
[catalog]
type = "local"

# [catalog]
# type = "firebase"
# database_url = "https://your-project.firebaseio.com"
# auth_token = "${EDUFLEX_FIREBASE_TOKEN}"

[difficulty]
intermediate_min = 50
advanced_min = 80
"#;

const EXAMPLE_BANK: &str = r#"[bank]
id = "example"
name = "Example question bank"

[[subjects]]
name = "Math and Logic"

[[subjects.questions]]
prompt = "What is 7 x 8?"
options = ["A) 54", "B) 56", "C) 64", "D) 48"]
answer = "B"

[[subjects.questions]]
prompt = "If all cats are animals and Tom is a cat, what is Tom?"
options = ["A) A plant", "B) An animal", "C) Unknown", "D) A number"]
answer = "B"

[[subjects.questions]]
prompt = "Which number is prime?"
options = ["13", "15", "21", "27"]
answer = "13"
"#;
