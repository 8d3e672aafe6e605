//! The `correlab init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create correlab.toml
    if std::path::Path::new("correlab.toml").exists() {
        println!("correlab.toml already exists, skipping.");
    } else {
        std::fs::write("correlab.toml", SAMPLE_CONFIG)?;
        println!("Created correlab.toml");
    }

    // Create example catalog
    std::fs::create_dir_all("catalog")?;
    let example_path = std::path::Path::new("catalog/example.toml");
    if example_path.exists() {
        println!("catalog/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_CATALOG)?;
        println!("Created catalog/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: correlab validate --catalog catalog");
    println!("  2. Run: correlab analyze --catalog catalog --dataset plants");
    println!("  3. Run: correlab play");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# correlab configuration

total_rounds = 5
points_per_round = 30
practice = true
default_guess = 0.0
catalog = "./catalog"

# Fix the seed to replay the same rounds.
# seed = 42

# Save a JSON report after every finished game.
# report_dir = "./correlab-reports"
"#;

const EXAMPLE_CATALOG: &str = r#"[[datasets]]
id = "plants"
name = "Greenhouse Plants"
description = "Growth of six tomato plants over a month"

[[datasets.columns]]
key = "water"
label = "Water per day (ml)"

[[datasets.columns]]
key = "growth"
label = "Growth (cm)"

[[datasets.columns]]
key = "pot"
label = "Pot number"

[[datasets.rows]]
id = 1
water = 100
growth = 4.0
pot = 3

[[datasets.rows]]
id = 2
water = 150
growth = 5.5
pot = 6

[[datasets.rows]]
id = 3
water = 200
growth = 7.5
pot = 1

[[datasets.rows]]
id = 4
water = 250
growth = 8.0
pot = 5

[[datasets.rows]]
id = 5
water = 300
growth = 10.5
pot = 2

[[datasets.rows]]
id = 6
water = 350
growth = 11.0
pot = 4

[[quests]]
id = "thirsty"
dataset = "plants"
target = "growth"
answers = ["water"]
expected_strength = "very strong"
title = "Thirsty plants"
prompt = "Which variable explains how much the plants grew?"
hint = "Pot numbers are just labels."
"#;
