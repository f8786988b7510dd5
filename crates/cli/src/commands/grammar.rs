use std::path::Path;
use std::process;

use crate::{grammar_file, report_error, OutputFormat};

pub(crate) fn cmd_grammar(file: &Path, output: OutputFormat, quiet: bool) {
    let grammar = match grammar_file::load(file) {
        Ok(g) => g,
        Err(e) => {
            report_error(&e.to_string(), output, quiet);
            process::exit(1);
        }
    };
    let warnings = grammar.lint();

    match output {
        OutputFormat::Text => {
            for rule in grammar.rules() {
                println!("{}", rule);
            }
            if !quiet {
                for w in &warnings {
                    eprintln!("warning: {}", w);
                }
            }
        }
        OutputFormat::Json => {
            let json = serde_json::json!({
                "rules": grammar.rules(),
                "warnings": warnings,
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&json).unwrap_or_default()
            );
        }
    }
}
