use dictum_session::ProviderError;

/// A status line: three digit code followed by free text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub code: u16,
    pub message: String,
}

impl Status {
    pub fn parse(line: &str) -> Result<Self, ProviderError> {
        let line = line.trim_end_matches(['\r', '\n']);
        let code = line
            .get(..3)
            .and_then(|c| c.parse().ok())
            .ok_or_else(|| ProviderError::Malformed(format!("no status code in '{line}'")))?;
        let message = line.get(3..).unwrap_or_default().trim().to_string();

        Ok(Self { code, message })
    }

    pub fn into_error(self) -> ProviderError {
        ProviderError::Protocol {
            code: self.code,
            message: self.message,
        }
    }
}

/// Split a reply line into words, honouring double and single quotes.
pub fn split_words(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut open_quote: Option<char> = None;
    let mut in_word = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (open_quote, c) {
            (_, '\\') => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
                in_word = true;
            }
            (Some(q), c) if c == q => open_quote = None,
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                open_quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if in_word {
        words.push(current);
    }
    words
}

/// Quote a command argument when it would not survive as a bare word.
pub fn quote(word: &str) -> String {
    let needs_quotes = word.is_empty()
        || word
            .chars()
            .any(|c| c.is_whitespace() || c == '"' || c == '\'' || c == '\\');

    if !needs_quotes {
        return word.to_string();
    }

    let escaped = word.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}
