//! Prints every configuration of a sweep document as JSON lines
//!
//! Usage: `cargo run --example sweep [path/to/document.{yml,json}]`
//!
//! Without a path, an embedded hyperparameter sweep is expanded.

use conf_generator::{ConfGenerator, Error, from_yaml_str};
use serde_json::json;
use std::env;
use std::process;

const DEFAULT_DOCUMENT: &str = r#"
dataset:
  path: data/train.csv
  $batch_size: [32, 64]
model:
  $$architecture:
    small:
      layers: [32]
      $dropout: [0.0, 0.2]
    large:
      layers: [256, 256]
      $dropout: [0.5]
  $activation:
    small: relu
    large: gelu
optimizer:
  $name:
    small: sgd
    large: adam
seed: 7
"#;

fn run() -> Result<(), Error> {
    let generator = match env::args().nth(1) {
        Some(path) => ConfGenerator::from_path(path)?,
        None => ConfGenerator::new(&from_yaml_str(DEFAULT_DOCUMENT)?)?,
    };

    eprintln!(
        "degree {}, {} varying sites",
        generator.degree(),
        generator.template().site_count()
    );

    let mut count = 0;
    for result in generator.generate() {
        let (config, summary) = result?;
        let line = json!({ "summary": summary, "config": config });
        println!("{}", line);
        count += 1;
    }
    eprintln!("{} configurations", count);
    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("error: {}", error);
        process::exit(1);
    }
}
