//! Elemental type colors and icons.

use crate::error::CardError;

/// (lowercase type name, color, Font Awesome icon)
const TYPE_TABLE: [(&str, &str, &str); 18] = [
    ("normal", "#a8a878", "fa-circle"),
    ("fire", "#f08030", "fa-fire"),
    ("water", "#6890f0", "fa-tint"),
    ("electric", "#f8d030", "fa-bolt"),
    ("grass", "#78c850", "fa-leaf"),
    ("ice", "#98d8d8", "fa-snowflake"),
    ("fighting", "#c03028", "fa-fist-raised"),
    ("poison", "#a040a0", "fa-skull-crossbones"),
    ("ground", "#e0c068", "fa-mountain"),
    ("flying", "#a890f0", "fa-feather"),
    ("psychic", "#f85888", "fa-eye"),
    ("bug", "#a8b820", "fa-bug"),
    ("rock", "#b8a038", "fa-gem"),
    ("ghost", "#705898", "fa-ghost"),
    ("dragon", "#7038f8", "fa-dragon"),
    ("dark", "#705848", "fa-moon"),
    ("steel", "#b8b8d0", "fa-shield-alt"),
    ("fairy", "#ee99ac", "fa-magic"),
];

/// Display color and icon for one elemental type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeStyle {
    pub color: &'static str,
    pub icon: &'static str,
}

/// Look up a type by name, ignoring case.
///
/// A miss means the record carries a type this table doesn't know, which is
/// reported instead of rendering an unstyled badge.
pub fn type_style(type_name: &str) -> Result<TypeStyle, CardError> {
    let key = type_name.to_lowercase();
    TYPE_TABLE
        .iter()
        .find(|(name, _, _)| *name == key)
        .map(|&(_, color, icon)| TypeStyle { color, icon })
        .ok_or(CardError::LookupTableMiss {
            table: "type",
            key,
        })
}
