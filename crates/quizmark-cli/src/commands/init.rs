//! The `quizmark init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("quizmark.toml").exists() {
        println!("quizmark.toml already exists, skipping.");
    } else {
        std::fs::write("quizmark.toml", SAMPLE_CONFIG)?;
        println!("Created quizmark.toml");
    }

    std::fs::create_dir_all("catalog")?;
    let example_path = std::path::Path::new("catalog/example.toml");
    if example_path.exists() {
        println!("catalog/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_CATALOG)?;
        println!("Created catalog/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit catalog/example.toml with your quizzes and learners");
    println!("  2. Run: quizmark validate --catalog catalog");
    println!(
        "  3. Run: quizmark submit --quiz 1 --learner 1 --answers '{{\"1\": \"4\", \"2\": \"true\"}}'"
    );

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizmark configuration

# Catalog file or directory imported on every run.
catalog = "catalog"

[store]
type = "json_file"
path = "quizmark-data/store.json"
"#;

const EXAMPLE_CATALOG: &str = r#"[[learners]]
id = 1
name = "Ada Lovelace"

[[learners]]
id = 2
name = "Grace Hopper"

[[quizzes]]
id = 1
lesson_id = 1
title = "Warm-up"
description = "A first quiz to check the setup"

[[quizzes.questions]]
id = 1
text = "What is 2 + 2?"
kind = "multiple_choice"
options = ["3", "4", "5"]
correct_answer = "4"
points = 10

[[quizzes.questions]]
id = 2
text = "Rust guarantees memory safety without a garbage collector."
kind = "true_false"
options = ["true", "false"]
correct_answer = "true"
points = 5
"#;
