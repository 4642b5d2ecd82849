use crate::error::ParseError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Run of whitespace; some grammar positions require it as a separator
    Whitespace,
    /// `//`, `#` and `/* */` comments
    Comment,
    /// Identifiers and keywords; the parser tells them apart
    Word(String),
    /// `$name` (name stored without the sigil)
    Variable(String),
    /// `\`
    NsSeparator,
    /// Quoted string literal, content between the quotes kept verbatim
    Str(String),
    /// Integer literal
    Int(i64),
    /// Decimal literal, kept as written
    Float(String),
    /// `=>`
    DoubleArrow,
    /// Any other single character
    Other(char),
}

#[derive(Debug, Clone)]
pub struct Spanned {
    pub token: Token,
    /// Literal source text of the token, quotes and sigils included.
    pub text: String,
    /// 0-based line the token starts on.
    pub line: u32,
}

impl Spanned {
    pub fn is_whitespace(&self) -> bool {
        self.token == Token::Whitespace
    }

    pub fn is_other(&self, c: char) -> bool {
        self.token == Token::Other(c)
    }

    pub fn is_word(&self, w: &str) -> bool {
        matches!(&self.token, Token::Word(x) if x == w)
    }

    /// Human description used in "expected X, found Y" messages.
    pub fn describe(&self) -> String {
        match &self.token {
            Token::Whitespace => "whitespace".to_owned(),
            Token::Comment => "comment".to_owned(),
            Token::Str(_) => format!("string literal {}", self.text),
            Token::Variable(_) => format!("variable '{}'", self.text),
            _ => format!("'{}'", self.text),
        }
    }
}

pub fn lex(src: &str, filename: &str) -> Result<Vec<Spanned>, ParseError> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = src.chars().collect();
    let mut pos = 0usize;
    let mut line: u32 = 0;

    let text_of = |start: usize, end: usize| -> String { chars[start..end].iter().collect() };

    while pos < chars.len() {
        let c = chars[pos];
        let start = pos;
        let tok_line = line;

        // Whitespace
        if c.is_whitespace() {
            while pos < chars.len() && chars[pos].is_whitespace() {
                if chars[pos] == '\n' {
                    line += 1;
                }
                pos += 1;
            }
            tokens.push(Spanned {
                token: Token::Whitespace,
                text: text_of(start, pos),
                line: tok_line,
            });
            continue;
        }

        // Line comment
        if c == '#' || (c == '/' && pos + 1 < chars.len() && chars[pos + 1] == '/') {
            while pos < chars.len() && chars[pos] != '\n' {
                pos += 1;
            }
            tokens.push(Spanned {
                token: Token::Comment,
                text: text_of(start, pos),
                line: tok_line,
            });
            continue;
        }

        // Block comment
        if c == '/' && pos + 1 < chars.len() && chars[pos + 1] == '*' {
            pos += 2;
            loop {
                if pos >= chars.len() {
                    return Err(ParseError::lex(
                        filename,
                        tok_line,
                        "unterminated block comment",
                    ));
                }
                if chars[pos] == '\n' {
                    line += 1;
                }
                if chars[pos] == '*' && pos + 1 < chars.len() && chars[pos + 1] == '/' {
                    pos += 2;
                    break;
                }
                pos += 1;
            }
            tokens.push(Spanned {
                token: Token::Comment,
                text: text_of(start, pos),
                line: tok_line,
            });
            continue;
        }

        // String literal
        if c == '"' || c == '\'' {
            let quote = c;
            pos += 1;
            loop {
                if pos >= chars.len() {
                    return Err(ParseError::lex(
                        filename,
                        tok_line,
                        "unterminated string literal",
                    ));
                }
                let sc = chars[pos];
                if sc == '\\' && pos + 1 < chars.len() {
                    if chars[pos + 1] == '\n' {
                        line += 1;
                    }
                    pos += 2;
                    continue;
                }
                if sc == '\n' {
                    line += 1;
                }
                pos += 1;
                if sc == quote {
                    break;
                }
            }
            tokens.push(Spanned {
                token: Token::Str(text_of(start + 1, pos - 1)),
                text: text_of(start, pos),
                line: tok_line,
            });
            continue;
        }

        // Number
        if c.is_ascii_digit() {
            while pos < chars.len() && chars[pos].is_ascii_digit() {
                pos += 1;
            }
            if pos + 1 < chars.len() && chars[pos] == '.' && chars[pos + 1].is_ascii_digit() {
                pos += 1; // consume '.'
                while pos < chars.len() && chars[pos].is_ascii_digit() {
                    pos += 1;
                }
                let s = text_of(start, pos);
                tokens.push(Spanned {
                    token: Token::Float(s.clone()),
                    text: s,
                    line: tok_line,
                });
            } else {
                let s = text_of(start, pos);
                // literals beyond i64 are read as decimals
                let token = match s.parse::<i64>() {
                    Ok(n) => Token::Int(n),
                    Err(_) => Token::Float(s.clone()),
                };
                tokens.push(Spanned {
                    token,
                    text: s,
                    line: tok_line,
                });
            }
            continue;
        }

        // Identifier / keyword, or variable when prefixed with '$'
        let ident_start = |ch: char| ch.is_alphabetic() || ch == '_';
        let is_variable = c == '$' && pos + 1 < chars.len() && ident_start(chars[pos + 1]);
        if ident_start(c) || is_variable {
            if is_variable {
                pos += 1;
            }
            let name_start = pos;
            while pos < chars.len() && (chars[pos].is_alphanumeric() || chars[pos] == '_') {
                pos += 1;
            }
            let name = text_of(name_start, pos);
            tokens.push(Spanned {
                token: if is_variable {
                    Token::Variable(name)
                } else {
                    Token::Word(name)
                },
                text: text_of(start, pos),
                line: tok_line,
            });
            continue;
        }

        let token = match c {
            '\\' => Token::NsSeparator,
            '=' if pos + 1 < chars.len() && chars[pos + 1] == '>' => {
                pos += 1;
                Token::DoubleArrow
            }
            other => Token::Other(other),
        };
        pos += 1;
        tokens.push(Spanned {
            token,
            text: text_of(start, pos),
            line: tok_line,
        });
    }

    Ok(tokens)
}
