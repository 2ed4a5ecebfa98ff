//! Card formatting: resolved records → flat presentation models.
//!
//! A presentation model is the record's own fields with derived fields
//! layered on top under the names the templates use. Models are built per
//! request and dropped once rendered.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::calculate;
use crate::category::{CardKind, Category, Command};
use crate::error::CardError;
use crate::provider::Candidate;
use crate::types::{type_style, TypeStyle};

/// Pips drawn per combat stat.
pub const MAX_COMBAT_STAGE: u8 = 6;

const POWER_EFFECT: &str =
    "Power represents a Pokemon's physical strength. It determines how much weight a Pokemon can bear.";

const SPRITE_DIR: &str = "modules/pokemon-manager-data/assets/sprites";

// ---------------------------------------------------------------------------
// Presentation model
// ---------------------------------------------------------------------------

/// Flat, render-ready field set for one card.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PresentationModel(Map<String, Value>);

impl PresentationModel {
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }
}

/// What a card is built from: a resolved record, or the parsed fields of
/// the query itself.
#[derive(Debug, Clone, PartialEq)]
pub enum CardSource {
    Record(Candidate),
    Fields(BTreeMap<String, String>),
}

// ---------------------------------------------------------------------------
// Derived fields
// ---------------------------------------------------------------------------

/// Icon and color for a gender value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenderBadge {
    pub icon: &'static str,
    pub color: &'static str,
}

pub fn gender_badge(gender: &str) -> GenderBadge {
    match gender {
        "male" => GenderBadge {
            icon: "fa-mars",
            color: "#00f",
        },
        "female" => GenderBadge {
            icon: "fa-venus",
            color: "#f00",
        },
        _ => GenderBadge {
            icon: "fa-minus",
            color: "#999",
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageSign {
    Negative,
    Neutral,
    Positive,
}

/// Filled/empty pip counts for one combat stat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombatStagePips {
    pub stat: &'static str,
    pub label: &'static str,
    pub stage: i32,
    pub sign: StageSign,
    pub filled: u8,
    pub empty: u8,
}

impl CombatStagePips {
    fn to_value(&self) -> Value {
        json!({
            "stat": self.stat,
            "label": self.label,
            "stage": self.stage,
            "isNegative": self.sign == StageSign::Negative,
            "isPositive": self.sign == StageSign::Positive,
            "filledPips": self.filled,
            "emptyPips": self.empty,
            // Templates can only iterate, so counts are also exposed as arrays.
            "stages": vec![0; self.filled as usize],
            "remainingPips": vec![0; self.empty as usize],
        })
    }
}

/// Classify a combat stage and split it into filled and empty pips.
///
/// Magnitudes beyond `MAX_COMBAT_STAGE` are clamped so `empty` never goes
/// negative.
pub fn combat_stage_pips(stat: &'static str, label: &'static str, stage: i32) -> CombatStagePips {
    let sign = match stage {
        s if s < 0 => StageSign::Negative,
        s if s > 0 => StageSign::Positive,
        _ => StageSign::Neutral,
    };

    let magnitude = stage.unsigned_abs();
    if magnitude > u32::from(MAX_COMBAT_STAGE) {
        tracing::warn!(stat, stage, "combat stage out of range, clamping to ±{MAX_COMBAT_STAGE}");
    }
    let filled = magnitude.min(u32::from(MAX_COMBAT_STAGE)) as u8;

    CombatStagePips {
        stat,
        label,
        stage,
        sign,
        filled,
        empty: MAX_COMBAT_STAGE - filled,
    }
}

/// Capitalize the first character, leaving the rest untouched.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn has_type(type_name: &str) -> bool {
    !type_name.is_empty() && !type_name.eq_ignore_ascii_case("none")
}

// ---------------------------------------------------------------------------
// Pokémon records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Species {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub dex_number: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatBlock {
    #[serde(default)]
    pub hp: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NamedRef {
    pub name: String,
}

/// Typed view of the Pokémon record fields the derived values need.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PokemonRecord {
    pub name: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub experience: i64,
    #[serde(default)]
    pub current_health: f64,
    #[serde(default)]
    pub species: Species,
    #[serde(default)]
    pub base_stats: StatBlock,
    #[serde(default)]
    pub added_stats: StatBlock,
    #[serde(default)]
    pub type1: String,
    #[serde(default)]
    pub type2: String,
    #[serde(default)]
    pub abilities: Vec<NamedRef>,
    #[serde(default)]
    pub held_items: Vec<NamedRef>,
    #[serde(default)]
    pub moves: Vec<Map<String, Value>>,
    #[serde(default)]
    pub attack_combat_stages: i32,
    #[serde(default)]
    pub defense_combat_stages: i32,
    #[serde(default)]
    pub sp_attack_combat_stages: i32,
    #[serde(default)]
    pub sp_defense_combat_stages: i32,
    #[serde(default)]
    pub speed_combat_stages: i32,
}

impl PokemonRecord {
    pub fn from_candidate(candidate: &Candidate) -> Result<Self, CardError> {
        serde_json::from_value(Value::Object(candidate.fields().clone())).map_err(|e| {
            CardError::MalformedRecord {
                what: "pokemon",
                message: e.to_string(),
            }
        })
    }

    pub fn level(&self) -> u32 {
        calculate::level(self.experience)
    }

    pub fn max_hp(&self) -> u32 {
        calculate::max_hp(
            self.level(),
            self.base_stats.hp.saturating_add(self.added_stats.hp),
        )
    }

    pub fn sprite_path(&self) -> String {
        format!(
            "{SPRITE_DIR}/{}.png",
            calculate::normalize_pokemon_name(&self.species.name, self.species.dex_number)
        )
    }

    pub fn combat_stages(&self) -> [CombatStagePips; 5] {
        [
            combat_stage_pips("attack", "Attack", self.attack_combat_stages),
            combat_stage_pips("defense", "Defense", self.defense_combat_stages),
            combat_stage_pips("spAttack", "Sp. Attack", self.sp_attack_combat_stages),
            combat_stage_pips("spDefense", "Sp. Defense", self.sp_defense_combat_stages),
            combat_stage_pips("speed", "Speed", self.speed_combat_stages),
        ]
    }
}

fn join_names(refs: &[NamedRef]) -> String {
    if refs.is_empty() {
        return "None".to_string();
    }
    refs.iter()
        .map(|r| r.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Attach `typeColor`/`typeIcon` to a move, keyed by its own `type`.
pub fn decorate_move(mut fields: Map<String, Value>) -> Result<Map<String, Value>, CardError> {
    let move_type = fields.get("type").and_then(Value::as_str).unwrap_or_default();
    let TypeStyle { color, icon } = type_style(move_type)?;
    fields.insert("typeColor".into(), color.into());
    fields.insert("typeIcon".into(), icon.into());
    Ok(fields)
}

// ---------------------------------------------------------------------------
// Per-card formatting
// ---------------------------------------------------------------------------

/// Build the presentation model for `command` from its source.
pub fn format(command: Command, source: &CardSource) -> Result<PresentationModel, CardError> {
    match (command.card(), source) {
        (CardKind::Bio, CardSource::Fields(fields)) => Ok(format_bio(fields)),
        (CardKind::Reference, CardSource::Record(candidate)) => {
            Ok(format_reference(command.category(), candidate))
        }
        (CardKind::Pokemon, CardSource::Record(candidate)) => {
            format_pokemon(candidate, &PokemonRecord::from_candidate(candidate)?)
        }
        (CardKind::Status, CardSource::Record(candidate)) => {
            format_status(candidate, &PokemonRecord::from_candidate(candidate)?)
        }
        (kind, _) => Err(CardError::MalformedRecord {
            what: "card",
            message: format!("{} card cannot be built from this source", kind.template()),
        }),
    }
}

pub fn format_bio(fields: &BTreeMap<String, String>) -> PresentationModel {
    let mut model = PresentationModel::from_fields(
        fields
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect(),
    );
    let non_empty = |key: &str| fields.get(key).is_some_and(|v| !v.is_empty());
    model.set("showTwitter", non_empty("twitter"));
    model.set("showTwitch", non_empty("twitch"));
    model
}

pub fn format_reference(category: Category, candidate: &Candidate) -> PresentationModel {
    let mut model = PresentationModel::from_fields(candidate.fields().clone());
    if category == Category::Capability && candidate.name() == Some("Power") {
        model.set("effect", POWER_EFFECT);
    }
    model
}

pub fn format_pokemon(
    candidate: &Candidate,
    record: &PokemonRecord,
) -> Result<PresentationModel, CardError> {
    let mut model = PresentationModel::from_fields(candidate.fields().clone());

    let gender = gender_badge(&record.gender);
    let level = record.level();
    let total_health = record.max_hp();

    model.set("genderIcon", gender.icon);
    model.set("genderIconColor", gender.color);
    model.set("totalHealth", total_health);
    model.set("level", level);
    model.set(
        "healthPercentage",
        calculate::health_percentage(record.current_health, total_health),
    );
    model.set("icon", record.sprite_path());

    Ok(model)
}

pub fn format_status(
    candidate: &Candidate,
    record: &PokemonRecord,
) -> Result<PresentationModel, CardError> {
    let mut model = format_pokemon(candidate, record)?;

    let type1 = type_style(&record.type1)?;
    model.set("type1Name", capitalize(&record.type1));
    model.set("type1Color", type1.color);
    model.set("type1Icon", type1.icon);

    let has_type2 = has_type(&record.type2);
    model.set("hasType2", has_type2);
    if has_type2 {
        let type2 = type_style(&record.type2)?;
        model.set("type2Name", capitalize(&record.type2));
        model.set("type2Color", type2.color);
        model.set("type2Icon", type2.icon);
    }

    model.set("abilityNames", join_names(&record.abilities));
    model.set("heldItemNames", join_names(&record.held_items));
    model.set(
        "experienceToNextLevel",
        calculate::percentage_to_next_level(record.experience),
    );
    model.set(
        "combatStageData",
        record
            .combat_stages()
            .iter()
            .map(CombatStagePips::to_value)
            .collect::<Vec<_>>(),
    );

    let moves = record
        .moves
        .iter()
        .cloned()
        .map(|m| decorate_move(m).map(Value::Object))
        .collect::<Result<Vec<_>, _>>()?;
    model.set("moves", moves);

    Ok(model)
}
