use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Unquoted word that is not a reserved keyword
    Word,
    /// `$name` variable reference (text excludes the sigil)
    Var,
    /// Quoted string literal (content without quotes, no escapes)
    Str,
    /// `[0-9]+('.'[0-9]+)?`
    Number,
    // Punctuation
    Semicolon,
    Colon,
    Comma,
    Dot,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    LParen,
    RParen,
    // Arithmetic operators
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    // Logical operators
    And,
    Or,
    Not,
    // Comparison operators
    Gt,
    Geq,
    Lt,
    Leq,
    Eq,
    Neq,
    Assign,
    // Reserved keywords
    True,
    False,
    If,
    While,
    Break,
    Continue,
    Panic,
    Print,
    // End of input
    Eof,
}

impl TokenKind {
    /// Canonical text for kinds whose spelling never varies.
    pub fn fixed_text(self) -> Option<&'static str> {
        let text = match self {
            TokenKind::Word | TokenKind::Var | TokenKind::Str | TokenKind::Number => return None,
            TokenKind::Semicolon => ";",
            TokenKind::Colon => ":",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::Add => "+",
            TokenKind::Sub => "-",
            TokenKind::Mul => "*",
            TokenKind::Div => "/",
            TokenKind::Mod => "%",
            TokenKind::And => "&",
            TokenKind::Or => "|",
            TokenKind::Not => "!",
            TokenKind::Gt => ">",
            TokenKind::Geq => ">=",
            TokenKind::Lt => "<",
            TokenKind::Leq => "<=",
            TokenKind::Eq => "==",
            TokenKind::Neq => "!=",
            TokenKind::Assign => "=",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::If => "if",
            TokenKind::While => "while",
            TokenKind::Break => "break",
            TokenKind::Continue => "continue",
            TokenKind::Panic => "panic",
            TokenKind::Print => "print",
            TokenKind::Eof => "<EOF>",
        };
        Some(text)
    }

    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::True
                | TokenKind::False
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Break
                | TokenKind::Continue
                | TokenKind::Panic
                | TokenKind::Print
        )
    }

    fn name(self) -> &'static str {
        match self {
            TokenKind::Word => "WORD",
            TokenKind::Var => "VAR_ID",
            TokenKind::Str => "STRING",
            TokenKind::Number => "NUMBER",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Colon => "COLON",
            TokenKind::Comma => "COMMA",
            TokenKind::Dot => "DOT",
            TokenKind::LBrace => "BRACE_L",
            TokenKind::RBrace => "BRACE_R",
            TokenKind::LBracket => "BRACKET_L",
            TokenKind::RBracket => "BRACKET_R",
            TokenKind::LParen => "PAREN_L",
            TokenKind::RParen => "PAREN_R",
            TokenKind::Add => "ADD",
            TokenKind::Sub => "SUB",
            TokenKind::Mul => "MUL",
            TokenKind::Div => "DIV",
            TokenKind::Mod => "MOD",
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
            TokenKind::Not => "NOT",
            TokenKind::Gt => "GT",
            TokenKind::Geq => "GEQ",
            TokenKind::Lt => "LT",
            TokenKind::Leq => "LEQ",
            TokenKind::Eq => "EQ",
            TokenKind::Neq => "NEQ",
            TokenKind::Assign => "ASSIGN",
            TokenKind::True => "KEY_TRUE",
            TokenKind::False => "KEY_FALSE",
            TokenKind::If => "KEY_IF",
            TokenKind::While => "KEY_WHILE",
            TokenKind::Break => "KEY_BREAK",
            TokenKind::Continue => "KEY_CONTINUE",
            TokenKind::Panic => "KEY_PANIC",
            TokenKind::Print => "KEY_PRINT",
            TokenKind::Eof => "EOF",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Reserved word table, consulted once per scanned word.
fn keyword(word: &str) -> Option<TokenKind> {
    match word {
        "true" => Some(TokenKind::True),
        "false" => Some(TokenKind::False),
        "if" => Some(TokenKind::If),
        "while" => Some(TokenKind::While),
        "break" => Some(TokenKind::Break),
        "continue" => Some(TokenKind::Continue),
        "panic" => Some(TokenKind::Panic),
        "print" => Some(TokenKind::Print),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Token {
            kind,
            text: text.into(),
        }
    }

    /// Token for a kind with a fixed spelling (punctuation, operators, keywords, EOF).
    ///
    /// Kinds that carry variable text get an empty string.
    pub fn fixed(kind: TokenKind) -> Self {
        Token::new(kind, kind.fixed_text().unwrap_or_default())
    }

    pub fn eof() -> Self {
        Token::fixed(TokenKind::Eof)
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}: {}]", self.kind, self.text)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Spanned {
    #[serde(flatten)]
    pub token: Token,
    pub line: u32,
}

/// A recoverable lexical anomaly. Tokenizing always continues past it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LexDiagnostic {
    /// A character no token can start with; exactly that character is skipped.
    UnknownChar { ch: char, line: u32 },
    /// A quote with no closing partner; the string runs to end of input.
    UnterminatedString { quote: char, line: u32 },
}

impl LexDiagnostic {
    pub fn line(&self) -> u32 {
        match self {
            LexDiagnostic::UnknownChar { line, .. } | LexDiagnostic::UnterminatedString { line, .. } => {
                *line
            }
        }
    }
}

impl fmt::Display for LexDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexDiagnostic::UnknownChar { ch, line } => {
                write!(f, "line {}: unknown character {:?}", line, ch)
            }
            LexDiagnostic::UnterminatedString { quote, line } => {
                write!(f, "line {}: unterminated string starting with {}", line, quote)
            }
        }
    }
}

/// Output of [`lex`]: the token sequence (always `Eof`-terminated) plus
/// any lexical diagnostics collected on the way.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Lexed {
    pub tokens: Vec<Spanned>,
    pub diagnostics: Vec<LexDiagnostic>,
}

impl Lexed {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn kinds(&self) -> Vec<TokenKind> {
        self.tokens.iter().map(|s| s.token.kind).collect()
    }
}

fn is_word_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_word_body(c: char) -> bool {
    is_word_start(c) || c.is_ascii_digit()
}

/// Tokenize `src`. Never fails; anomalies are logged and collected in
/// [`Lexed::diagnostics`].
pub fn lex(src: &str) -> Lexed {
    let lexed = scan(src);
    for diag in &lexed.diagnostics {
        log::warn!("{}", diag);
    }
    lexed
}

/// Same as [`lex`] without logging.
pub(crate) fn scan(src: &str) -> Lexed {
    let chars: Vec<char> = src.chars().collect();
    let mut out = Lexed::default();
    let mut pos = 0usize;
    let mut line: u32 = 1;

    let push = |out: &mut Lexed, token: Token, line: u32| {
        out.tokens.push(Spanned { token, line });
    };

    while pos < chars.len() {
        let c = chars[pos];

        // Whitespace
        if matches!(c, ' ' | '\t' | '\n' | '\r') {
            if c == '\n' {
                line += 1;
            }
            pos += 1;
            continue;
        }

        let tok_line = line;

        // Two-character operators take precedence over their one-character prefix
        let next_is_eq = pos + 1 < chars.len() && chars[pos + 1] == '=';
        let two = match c {
            '>' if next_is_eq => Some(TokenKind::Geq),
            '<' if next_is_eq => Some(TokenKind::Leq),
            '=' if next_is_eq => Some(TokenKind::Eq),
            '!' if next_is_eq => Some(TokenKind::Neq),
            _ => None,
        };
        if let Some(kind) = two {
            push(&mut out, Token::fixed(kind), tok_line);
            pos += 2;
            continue;
        }

        let single = match c {
            ';' => Some(TokenKind::Semicolon),
            ':' => Some(TokenKind::Colon),
            ',' => Some(TokenKind::Comma),
            '.' => Some(TokenKind::Dot),
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            '[' => Some(TokenKind::LBracket),
            ']' => Some(TokenKind::RBracket),
            '{' => Some(TokenKind::LBrace),
            '}' => Some(TokenKind::RBrace),
            '+' => Some(TokenKind::Add),
            '-' => Some(TokenKind::Sub),
            '*' => Some(TokenKind::Mul),
            '/' => Some(TokenKind::Div),
            '%' => Some(TokenKind::Mod),
            '&' => Some(TokenKind::And),
            '|' => Some(TokenKind::Or),
            '!' => Some(TokenKind::Not),
            '>' => Some(TokenKind::Gt),
            '<' => Some(TokenKind::Lt),
            '=' => Some(TokenKind::Assign),
            _ => None,
        };
        if let Some(kind) = single {
            push(&mut out, Token::fixed(kind), tok_line);
            pos += 1;
            continue;
        }

        // Number
        if c.is_ascii_digit() {
            let start = pos;
            while pos < chars.len() && chars[pos].is_ascii_digit() {
                pos += 1;
            }
            if pos + 1 < chars.len() && chars[pos] == '.' && chars[pos + 1].is_ascii_digit() {
                pos += 1; // consume '.'
                while pos < chars.len() && chars[pos].is_ascii_digit() {
                    pos += 1;
                }
            }
            let text: String = chars[start..pos].iter().collect();
            push(&mut out, Token::new(TokenKind::Number, text), tok_line);
            continue;
        }

        // Word / keyword
        if is_word_start(c) {
            let start = pos;
            while pos < chars.len() && is_word_body(chars[pos]) {
                pos += 1;
            }
            let word: String = chars[start..pos].iter().collect();
            let token = match keyword(&word) {
                Some(kind) => Token::fixed(kind),
                None => Token::new(TokenKind::Word, word),
            };
            push(&mut out, token, tok_line);
            continue;
        }

        // Variable reference
        if c == '$' {
            pos += 1;
            let start = pos;
            while pos < chars.len() && is_word_body(chars[pos]) {
                pos += 1;
            }
            let name: String = chars[start..pos].iter().collect();
            push(&mut out, Token::new(TokenKind::Var, name), tok_line);
            continue;
        }

        // Quoted string, verbatim up to the matching quote
        if c == '"' || c == '\'' {
            pos += 1;
            let start = pos;
            while pos < chars.len() && chars[pos] != c {
                if chars[pos] == '\n' {
                    line += 1;
                }
                pos += 1;
            }
            let text: String = chars[start..pos].iter().collect();
            if pos < chars.len() {
                pos += 1; // closing quote
            } else {
                let diag = LexDiagnostic::UnterminatedString {
                    quote: c,
                    line: tok_line,
                };
                out.diagnostics.push(diag);
            }
            push(&mut out, Token::new(TokenKind::Str, text), tok_line);
            continue;
        }

        let diag = LexDiagnostic::UnknownChar {
            ch: c,
            line: tok_line,
        };
        out.diagnostics.push(diag);
        pos += 1;
    }

    push(&mut out, Token::eof(), line);
    out
}
