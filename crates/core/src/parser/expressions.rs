use super::Parser;
use crate::ast::Expr;
use crate::error::ParseError;
use crate::lexer::TokenKind;

impl<'a> Parser<'a> {
    // -- Atomic expressions ---------------------------------------

    /// Consume exactly one token as an atomic value, or nothing at all.
    ///
    /// Operator and punctuation tokens are never values; `Ok(None)` leaves
    /// the cursor where it was.
    pub fn parse_expr(&mut self) -> Result<Option<Expr>, ParseError> {
        let position = self.stream.position();
        let line = self.stream.line();
        let token = self.stream.peek();

        let expr = match token.kind {
            TokenKind::Word | TokenKind::Str => Expr::Str(token.text.clone()),
            TokenKind::Var => Expr::Var(token.text.clone()),
            TokenKind::Number => {
                let n = token
                    .text
                    .parse::<f64>()
                    .map_err(|_| ParseError::InvalidNumber {
                        text: token.text.clone(),
                        position,
                        line,
                    })?;
                Expr::Number(n)
            }
            TokenKind::True => Expr::Bool(true),
            TokenKind::False => Expr::Bool(false),
            _ => return Ok(None),
        };

        self.stream.skip();
        Ok(Some(expr))
    }
}
