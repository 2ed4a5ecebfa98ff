use std::collections::BTreeMap;

use crate::category::{Category, Command};
use crate::error::CardError;

/// Parsed command argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Name or id, used verbatim.
    Lookup(String),
    /// `key=value` pairs for cards built from the query itself.
    Fields(BTreeMap<String, String>),
}

impl Query {
    /// Raw lookup string, or `None` for a field query.
    pub fn lookup(&self) -> Option<&str> {
        match self {
            Query::Lookup(s) => Some(s),
            Query::Fields(_) => None,
        }
    }
}

/// Extract `key=value` pairs from free text.
///
/// A token is one or more characters other than `=`, `&` and space. Matches
/// don't overlap; a repeated key keeps its last value. Text without any pair
/// yields an empty map.
pub fn parse_chat_arguments(raw: &str) -> BTreeMap<String, String> {
    lazy_static::lazy_static! {
        static ref PAIR: regex::Regex = regex::Regex::new(r"([^=& ]+)=([^=& ]+)").unwrap();
    }

    let mut fields = BTreeMap::new();
    for caps in PAIR.captures_iter(raw) {
        fields.insert(caps[1].to_string(), caps[2].to_string());
    }
    fields
}

/// Turn a command argument into the query its category expects.
pub fn parse(raw: &str, category: Category) -> Query {
    if category.takes_fields() {
        Query::Fields(parse_chat_arguments(raw))
    } else {
        Query::Lookup(raw.to_string())
    }
}

/// Parse and check the fields a command cannot work without.
///
/// Runs before any network or render work so a bad invocation fails fast.
pub fn parse_for(command: Command, raw: &str) -> Result<Query, CardError> {
    let query = parse(raw, command.category());
    match (&query, command) {
        (Query::Fields(fields), Command::Bio) if !fields.contains_key("name") => {
            Err(CardError::MissingRequiredField {
                field: "name",
                command: "bio",
            })
        }
        (Query::Lookup(id), Command::Pokemon | Command::Status) if id.trim().is_empty() => {
            Err(CardError::MissingRequiredField {
                field: "id",
                command: command.key(),
            })
        }
        _ => Ok(query),
    }
}
