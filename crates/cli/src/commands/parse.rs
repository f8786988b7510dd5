use std::io::{self, Write};
use std::path::Path;
use std::process;

use dsltk_core::{Block, ParseError};

use crate::{grammar_file, read_source, render, report_error, OutputFormat};

pub(crate) struct ParseOptions<'a> {
    pub file: &'a Path,
    pub grammar: &'a Path,
    pub recover: bool,
    pub max_errors: usize,
    pub output: OutputFormat,
    pub quiet: bool,
}

pub(crate) fn cmd_parse(opts: ParseOptions<'_>) {
    let ParseOptions {
        file,
        grammar,
        recover,
        max_errors,
        output,
        quiet,
    } = opts;

    let grammar = match grammar_file::load(grammar) {
        Ok(g) => g,
        Err(e) => {
            report_error(&e.to_string(), output, quiet);
            process::exit(1);
        }
    };
    for w in grammar.lint() {
        log::warn!("grammar: {}", w);
    }

    let src = read_source(file, output, quiet);
    let lexed = dsltk_core::lex(&src);

    let (block, errors) = if recover {
        dsltk_core::parse_recovering(&lexed.tokens, &grammar, max_errors)
    } else {
        match dsltk_core::parse(&lexed.tokens, &grammar) {
            Ok(block) => (block, Vec::new()),
            Err(e) => (Block::default(), vec![e]),
        }
    };

    // A non-recovering failure prints nothing but the error
    if recover || errors.is_empty() {
        print_block(&block, output);
    }

    if !errors.is_empty() {
        report_parse_errors(file, &errors, output, quiet);
        process::exit(1);
    }
}

fn print_block(block: &Block, output: OutputFormat) {
    match output {
        OutputFormat::Text => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            if let Err(e) = render::write_block(&mut out, block).and_then(|_| out.flush()) {
                eprintln!("error writing output: {}", e);
                process::exit(1);
            }
        }
        OutputFormat::Json => {
            let pretty = serde_json::to_string_pretty(block)
                .unwrap_or_else(|e| format!("serialization error: {}", e));
            println!("{}", pretty);
        }
    }
}

fn report_parse_errors(file: &Path, errors: &[ParseError], output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Json => {
            let values: Vec<serde_json::Value> =
                errors.iter().map(ParseError::to_json_value).collect();
            let json = serde_json::json!({
                "file": file.display().to_string(),
                "errors": values,
            });
            eprintln!(
                "{}",
                serde_json::to_string_pretty(&json).unwrap_or_default()
            );
        }
        OutputFormat::Text => {
            for e in errors {
                eprintln!("{}: {}", file.display(), e);
            }
        }
    }
}
