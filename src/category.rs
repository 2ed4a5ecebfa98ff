//! Command → category → card table.
//!
//! Every chat command maps to exactly one (`Category`, `CardKind`) pair. The
//! category decides where candidates come from; the card kind decides which
//! template renders them and which style tags the posted message carries.
//! Adding a command is one arm in each `match` below.

use serde::Serialize;

/// Reference domain being queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Pokemon,
    Ability,
    HeldItem,
    Capability,
    Skill,
    Edge,
    Move,
    Bio,
}

/// Where a category's candidates come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// `reference/{collection}?query=…`, returns a list of candidates.
    Reference(&'static str),
    /// `pokemon/{id}`, returns a single identity-keyed record.
    Pokemon,
    /// Built from the query itself; no network call.
    Local,
}

impl Category {
    pub fn endpoint(self) -> Endpoint {
        match self {
            Category::Pokemon => Endpoint::Pokemon,
            Category::Ability => Endpoint::Reference("abilities"),
            Category::HeldItem => Endpoint::Reference("heldItems"),
            Category::Capability => Endpoint::Reference("capabilities"),
            Category::Skill => Endpoint::Reference("skills"),
            Category::Edge => Endpoint::Reference("edges"),
            Category::Move => Endpoint::Reference("moves"),
            Category::Bio => Endpoint::Local,
        }
    }

    /// Name used in notifications ("… (type: moves)").
    pub fn label(self) -> &'static str {
        match self.endpoint() {
            Endpoint::Reference(collection) => collection,
            Endpoint::Pokemon => "pokemon",
            Endpoint::Local => "bio",
        }
    }

    /// Whether the query is a set of `key=value` pairs rather than a lookup string.
    pub fn takes_fields(self) -> bool {
        matches!(self, Category::Bio)
    }
}

/// Rendering target for a resolved record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardKind {
    Bio,
    Reference,
    Pokemon,
    Status,
}

impl CardKind {
    pub const ALL: [CardKind; 4] = [
        CardKind::Bio,
        CardKind::Reference,
        CardKind::Pokemon,
        CardKind::Status,
    ];

    pub fn template(self) -> &'static str {
        match self {
            CardKind::Bio => "bio",
            CardKind::Reference => "reference",
            CardKind::Pokemon => "pokemon",
            CardKind::Status => "status",
        }
    }

    /// Style tags attached to the posted chat message.
    pub fn class_names(self) -> &'static [&'static str] {
        match self {
            CardKind::Bio => &[
                "stream-card",
                "bio-card",
                "hide-header",
                "contains-header",
                "no-background",
                "full-width-content",
            ],
            CardKind::Reference => &[
                "stream-card",
                "reference-card",
                "hide-header",
                "contains-header",
                "no-background",
            ],
            CardKind::Pokemon => &["stream-card", "pokemon-card", "hide-header", "no-background"],
            CardKind::Status => &["stream-card", "status-card", "hide-header", "no-background"],
        }
    }
}

/// Chat commands understood by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Bio,
    HeldItem,
    Ability,
    Capability,
    Skill,
    Edge,
    Move,
    Pokemon,
    Status,
}

impl Command {
    pub const ALL: [Command; 9] = [
        Command::Bio,
        Command::HeldItem,
        Command::Ability,
        Command::Capability,
        Command::Skill,
        Command::Edge,
        Command::Move,
        Command::Pokemon,
        Command::Status,
    ];

    /// Command key without the leading slash.
    pub fn key(self) -> &'static str {
        match self {
            Command::Bio => "bio",
            Command::HeldItem => "helditem",
            Command::Ability => "ability",
            Command::Capability => "capability",
            Command::Skill => "skill",
            Command::Edge => "edge",
            Command::Move => "move",
            Command::Pokemon => "pokemon",
            Command::Status => "status",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Command::Bio => "Display a biography card.",
            Command::HeldItem => "Display a held item reference card.",
            Command::Ability => "Display an ability reference card.",
            Command::Capability => "Display a capability reference card.",
            Command::Skill => "Display a skill reference card.",
            Command::Edge => "Display an edge reference card.",
            Command::Move => "Display a move reference card.",
            Command::Pokemon => "Display a Pokemon reference card.",
            Command::Status => "Display a Pokemon status card.",
        }
    }

    pub fn category(self) -> Category {
        match self {
            Command::Bio => Category::Bio,
            Command::HeldItem => Category::HeldItem,
            Command::Ability => Category::Ability,
            Command::Capability => Category::Capability,
            Command::Skill => Category::Skill,
            Command::Edge => Category::Edge,
            Command::Move => Category::Move,
            Command::Pokemon | Command::Status => Category::Pokemon,
        }
    }

    pub fn card(self) -> CardKind {
        match self {
            Command::Bio => CardKind::Bio,
            Command::Pokemon => CardKind::Pokemon,
            Command::Status => CardKind::Status,
            _ => CardKind::Reference,
        }
    }

    /// Look up a command by key, with or without the leading slash.
    /// Keys are matched case-insensitively.
    pub fn from_key(key: &str) -> Option<Command> {
        let key = key.strip_prefix('/').unwrap_or(key);
        Command::ALL
            .into_iter()
            .find(|c| c.key().eq_ignore_ascii_case(key))
    }
}

/// Split a chat line into its command key and argument.
///
/// `"/move  Tackle "` → `Some(("/move", "Tackle"))`. Lines that don't start
/// with `/` are not commands.
pub fn split_command(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if !line.starts_with('/') {
        return None;
    }
    match line.split_once(char::is_whitespace) {
        Some((key, rest)) => Some((key, rest.trim())),
        None => Some((line, "")),
    }
}
