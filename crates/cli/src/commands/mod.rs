mod grammar;
mod parse;
mod tokens;

pub(crate) use grammar::cmd_grammar;
pub(crate) use parse::{cmd_parse, ParseOptions};
pub(crate) use tokens::cmd_tokens;
