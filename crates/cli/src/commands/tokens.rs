use std::path::Path;

use crate::{read_source, OutputFormat};

pub(crate) fn cmd_tokens(file: &Path, output: OutputFormat, quiet: bool) {
    let src = read_source(file, output, quiet);
    let lexed = dsltk_core::lex(&src);

    match output {
        OutputFormat::Text => {
            for spanned in &lexed.tokens {
                println!("{}", spanned.token);
            }
        }
        OutputFormat::Json => {
            let pretty = serde_json::to_string_pretty(&lexed)
                .unwrap_or_else(|e| format!("serialization error: {}", e));
            println!("{}", pretty);
        }
    }
}
