use dictum_types::{DatabaseSelector, StrategySelector};

/// A chat line turned into a typed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Define {
        phrase: String,
        database: Option<DatabaseSelector>,
    },
    Match {
        phrase: String,
        strategy: Option<StrategySelector>,
        database: Option<DatabaseSelector>,
    },
    ListDatabases,
    ListStrategies,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Nothing to do")]
    Empty,

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Usage: {0}")]
    Usage(&'static str),
}

const DEFINE_USAGE: &str = "define <phrase> [from <database>]";
const MATCH_USAGE: &str = "match <phrase> [using <strategy>] [from <database>]";
const LIST_USAGE: &str = "list databases | list strategies";

/// Parse one chat line. A leading `!` is accepted and ignored.
pub fn parse_command(line: &str) -> Result<Command, ParseError> {
    let line = line.trim();
    let line = line.strip_prefix('!').unwrap_or(line).trim_start();
    if line.is_empty() {
        return Err(ParseError::Empty);
    }

    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    match verb.to_lowercase().as_str() {
        "define" | "def" => {
            let (phrase, database) = split_clause(rest, "from");
            let phrase = unquote(&phrase).ok_or(ParseError::Usage(DEFINE_USAGE))?;
            Ok(Command::Define {
                phrase,
                database: database.as_deref().map(DatabaseSelector::from),
            })
        }
        "match" => {
            let (rest, database) = split_clause(rest, "from");
            let (phrase, strategy) = split_clause(&rest, "using");
            let phrase = unquote(&phrase).ok_or(ParseError::Usage(MATCH_USAGE))?;
            Ok(Command::Match {
                phrase,
                strategy: strategy.as_deref().map(StrategySelector::from),
                database: database.as_deref().map(DatabaseSelector::from),
            })
        }
        "list" => match rest.to_lowercase().as_str() {
            "databases" | "dbs" | "db" => Ok(Command::ListDatabases),
            "strategies" | "strats" | "strat" => Ok(Command::ListStrategies),
            _ => Err(ParseError::Usage(LIST_USAGE)),
        },
        _ => Err(ParseError::UnknownCommand(verb.to_string())),
    }
}

/// Split `"<head> <keyword> <value>"` at the last standalone `keyword`.
fn split_clause(text: &str, keyword: &str) -> (String, Option<String>) {
    let words: Vec<&str> = text.split_whitespace().collect();
    let Some(pos) = words.iter().rposition(|w| w.eq_ignore_ascii_case(keyword)) else {
        return (text.to_string(), None);
    };
    // The keyword needs a phrase before it and exactly one value after it
    if pos == 0 || pos + 2 != words.len() {
        return (text.to_string(), None);
    }

    (words[..pos].join(" "), Some(words[pos + 1].to_string()))
}

fn unquote(phrase: &str) -> Option<String> {
    let phrase = phrase.trim();
    let phrase = phrase
        .strip_prefix('"')
        .and_then(|p| p.strip_suffix('"'))
        .unwrap_or(phrase)
        .trim();

    if phrase.is_empty() {
        None
    } else {
        Some(phrase.to_string())
    }
}
