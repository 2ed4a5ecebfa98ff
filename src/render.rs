//! Handlebars rendering of card templates.
//!
//! The four card templates are embedded at compile time so the binary is
//! self-contained. A template directory can override any of them by file
//! name (`bio.hbs`, `reference.hbs`, `pokemon.hbs`, `status.hbs`).

use std::path::Path;

use handlebars::{handlebars_helper, Handlebars};
use include_dir::{include_dir, Dir};

use crate::category::CardKind;
use crate::error::CardError;
use crate::format::PresentationModel;

/// Card templates embedded at compile time.
static EMBEDDED_TEMPLATES: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/templates");

handlebars_helper!(capitalize_helper: |value: Json| {
    value.as_str().map(crate::format::capitalize).unwrap_or_default()
});

fn template_file(kind: CardKind) -> String {
    format!("{}.hbs", kind.template())
}

/// Renders presentation models into card markup.
pub struct CardRenderer {
    registry: Handlebars<'static>,
}

impl CardRenderer {
    /// Renderer using only the embedded templates.
    pub fn embedded() -> Result<Self, CardError> {
        Self::with_overrides(None)
    }

    /// Renderer preferring `<dir>/<kind>.hbs` over the embedded template
    /// when such a file exists.
    pub fn with_overrides(dir: Option<&Path>) -> Result<Self, CardError> {
        let mut registry = Handlebars::new();
        registry.register_helper("capitalize", Box::new(capitalize_helper));

        for kind in CardKind::ALL {
            let name = kind.template();
            let file = template_file(kind);
            let source = match dir.map(|d| d.join(&file)).filter(|p| p.is_file()) {
                Some(path) => {
                    tracing::info!(template = name, path = %path.display(), "using template override");
                    std::fs::read_to_string(&path).map_err(|e| CardError::Render {
                        template: name.to_string(),
                        message: format!("failed to read {}: {e}", path.display()),
                    })?
                }
                None => EMBEDDED_TEMPLATES
                    .get_file(&file)
                    .and_then(|f| f.contents_utf8())
                    .ok_or_else(|| CardError::Render {
                        template: name.to_string(),
                        message: "embedded template is missing".to_string(),
                    })?
                    .to_string(),
            };

            registry
                .register_template_string(name, source)
                .map_err(|e| CardError::Render {
                    template: name.to_string(),
                    message: e.to_string(),
                })?;
        }

        Ok(Self { registry })
    }

    pub fn render(&self, kind: CardKind, model: &PresentationModel) -> Result<String, CardError> {
        self.registry
            .render(kind.template(), model)
            .map_err(|e| CardError::Render {
                template: kind.template().to_string(),
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{Category, Command};
    use crate::format::{format, format_bio, format_reference, CardSource};
    use crate::provider::Candidate;
    use crate::query::parse_chat_arguments;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    fn candidate(value: Value) -> Candidate {
        match value {
            Value::Object(fields) => Candidate::new(fields),
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn every_card_kind_has_an_embedded_template() {
        for kind in CardKind::ALL {
            assert!(
                EMBEDDED_TEMPLATES.get_file(template_file(kind)).is_some(),
                "missing {}",
                template_file(kind)
            );
        }
        assert!(CardRenderer::embedded().is_ok());
    }

    #[test]
    fn bio_card_shows_only_present_links() {
        let renderer = CardRenderer::embedded().unwrap();
        let model = format_bio(&parse_chat_arguments("name=Ash twitter=ash_ketchum"));
        let html = renderer.render(CardKind::Bio, &model).unwrap();
        assert!(html.contains("Ash"));
        assert!(html.contains("ash_ketchum"));
        assert!(!html.contains("fa-twitch"));
    }

    #[test]
    fn reference_card_escapes_markup() {
        let renderer = CardRenderer::embedded().unwrap();
        let model = format_reference(
            Category::Move,
            &candidate(json!({"name": "<b>Tackle</b>", "effect": "Hits"})),
        );
        let html = renderer.render(CardKind::Reference, &model).unwrap();
        assert!(html.contains("&lt;b&gt;Tackle"));
        assert!(!html.contains("<b>"));
        assert!(html.contains("Hits"));
    }

    #[test]
    fn status_card_renders_pips_and_moves() {
        let renderer = CardRenderer::embedded().unwrap();
        let source = candidate(json!({
            "id": 1,
            "name": "Embers",
            "gender": "male",
            "experience": 0,
            "currentHealth": 11,
            "species": { "name": "Charmander", "dexNumber": 4 },
            "type1": "fire",
            "type2": "none",
            "moves": [{ "name": "Ember", "type": "fire" }],
            "attackCombatStages": 2
        }));
        let model = format(Command::Status, &CardSource::Record(source)).unwrap();
        let html = renderer.render(CardKind::Status, &model).unwrap();

        assert!(html.contains("Embers"));
        assert!(html.contains("Fire"));
        assert!(html.contains("Ember"));
        assert_eq!(html.matches("pip filled").count(), 2);
        assert_eq!(html.matches("pip empty").count(), 28);
    }

    #[test]
    fn pokemon_card_health_label_keeps_integer_health() {
        let renderer = CardRenderer::embedded().unwrap();
        let source = candidate(json!({
            "id": 25,
            "name": "Sparky",
            "gender": "male",
            "experience": 0,
            "currentHealth": 40,
            "species": { "name": "Pikachu", "dexNumber": 25 },
            "baseStats": { "hp": 10 }
        }));
        let model = format(Command::Pokemon, &CardSource::Record(source)).unwrap();
        let html = renderer.render(CardKind::Pokemon, &model).unwrap();

        // Level 1: 1 + 30 + 10.
        assert!(html.contains(">40 / 41<"), "got: {html}");
        assert!(!html.contains("40.0"));
    }

    #[test]
    fn capitalize_helper_ignores_non_strings() {
        let mut registry = Handlebars::new();
        registry.register_helper("capitalize", Box::new(capitalize_helper));
        let out = registry
            .render_template("{{capitalize a}}|{{capitalize b}}", &json!({"a": "grass", "b": 3}))
            .unwrap();
        assert_eq!(out, "Grass|");
    }

    #[test]
    fn directory_override_replaces_one_template() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("reference.hbs"), "<p>{{name}}!</p>").unwrap();

        let renderer = CardRenderer::with_overrides(Some(dir.path())).unwrap();
        let model = format_reference(Category::Edge, &candidate(json!({"name": "Ace Trainer"})));
        assert_eq!(
            renderer.render(CardKind::Reference, &model).unwrap(),
            "<p>Ace Trainer!</p>"
        );

        // Other kinds still come from the embedded set.
        let bio = format_bio(&parse_chat_arguments("name=Red"));
        assert!(renderer.render(CardKind::Bio, &bio).unwrap().contains("bio-card-body"));
    }

    #[test]
    fn invalid_override_is_a_render_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("pokemon.hbs"), "{{#if}}").unwrap();
        let err = CardRenderer::with_overrides(Some(dir.path())).err().unwrap();
        assert!(matches!(err, CardError::Render { ref template, .. } if template == "pokemon"));
    }
}
