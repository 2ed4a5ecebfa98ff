//! Card dispatch: the command pipeline from chat line to posted card.
//!
//! parse → resolve → format → render → post. Each invocation runs to
//! completion on its own; nothing is shared between invocations except the
//! injected collaborators.

use std::sync::Arc;

use serde_json::Value;

use crate::category::{split_command, CardKind, Command};
use crate::error::CardError;
use crate::format::{self, CardSource, PresentationModel};
use crate::notify::Notifier;
use crate::provider::ReferenceProvider;
use crate::query::{self, Query};
use crate::render::CardRenderer;
use crate::resolver;
use crate::settings::{Setting, SettingsStore};
use crate::transcript::{ChatMessage, TranscriptSink};

/// Renders presentation models and posts them to the transcript.
pub struct CardDispatcher {
    renderer: CardRenderer,
    transcript: Arc<dyn TranscriptSink>,
    speaker: String,
}

impl CardDispatcher {
    pub fn new(renderer: CardRenderer, transcript: Arc<dyn TranscriptSink>, speaker: impl Into<String>) -> Self {
        Self {
            renderer,
            transcript,
            speaker: speaker.into(),
        }
    }

    /// Render `model` with the template for `kind` and post it with the
    /// kind's style tags.
    pub fn dispatch(&self, kind: CardKind, model: &PresentationModel) -> Result<ChatMessage, CardError> {
        let content = self.renderer.render(kind, model)?;
        let message = ChatMessage::new(&self.speaker, content, kind.class_names());
        self.transcript.post(&message)?;
        tracing::debug!(card = kind.template(), id = %message.id, "card posted");
        Ok(message)
    }
}

fn display_value(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Informational alert shown when a card is posted.
pub fn announcement(command: Command, model: &PresentationModel) -> String {
    let name = display_value(model.get("name"));
    match command.card() {
        CardKind::Bio => format!("Displaying biography card for {name}"),
        CardKind::Reference => format!(
            "Displaying reference card for {name} (type: {})",
            command.category().label()
        ),
        CardKind::Pokemon => format!(
            "Displaying reference card for Pokemon: {name} (ID: {})",
            display_value(model.get("id"))
        ),
        CardKind::Status => format!(
            "Displaying combat status card for Pokemon: {name} (ID: {})",
            display_value(model.get("id"))
        ),
    }
}

/// The chat command front end.
pub struct StreamMode<P> {
    provider: P,
    dispatcher: CardDispatcher,
    notifier: Arc<dyn Notifier>,
    settings: Arc<SettingsStore>,
}

impl<P: ReferenceProvider> StreamMode<P> {
    pub fn new(
        provider: P,
        dispatcher: CardDispatcher,
        notifier: Arc<dyn Notifier>,
        settings: Arc<SettingsStore>,
    ) -> Self {
        Self {
            provider,
            dispatcher,
            notifier,
            settings,
        }
    }

    pub fn settings(&self) -> &Arc<SettingsStore> {
        &self.settings
    }

    /// Run one command with its raw argument.
    pub async fn run(&self, command: Command, argument: &str) -> Result<ChatMessage, CardError> {
        let source = match query::parse_for(command, argument)? {
            Query::Fields(fields) => CardSource::Fields(fields),
            Query::Lookup(lookup) => CardSource::Record(
                resolver::resolve(&self.provider, command.category(), &lookup).await?,
            ),
        };

        let model = format::format(command, &source)?;

        // Everyone already sees the cards, so the alert would be noise.
        if !self.settings.get(Setting::DisplayCards) {
            self.notifier.info(&announcement(command, &model));
        }

        self.dispatcher.dispatch(command.card(), &model)
    }

    /// Run a chat line. Lines that aren't commands yield `Ok(None)`.
    pub async fn invoke(&self, line: &str) -> Result<Option<ChatMessage>, CardError> {
        let Some((key, argument)) = split_command(line) else {
            return Ok(None);
        };
        let command =
            Command::from_key(key).ok_or_else(|| CardError::UnknownCommand(key.to_string()))?;

        tracing::info!(command = command.key(), argument, "running card command");
        self.run(command, argument).await.map(Some)
    }

    /// Like `invoke`, but any failure becomes a single warning notification.
    pub async fn handle(&self, line: &str) -> Option<ChatMessage> {
        match self.invoke(line).await {
            Ok(message) => message,
            Err(e) => {
                self.notifier.warn(&e.to_string());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use crate::notify::{NotificationCenter, NotificationLevel};
    use crate::provider::Candidate;
    use crate::transcript::MemoryTranscript;
    use serde_json::json;
    use std::collections::HashMap;
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory provider keyed by (category, query).
    #[derive(Default)]
    struct TableProvider {
        answers: HashMap<(Category, String), Result<Vec<Value>, CardError>>,
        calls: AtomicUsize,
    }

    impl TableProvider {
        fn answer(mut self, category: Category, query: &str, records: Vec<Value>) -> Self {
            self.answers.insert((category, query.to_string()), Ok(records));
            self
        }

        fn fail(mut self, category: Category, query: &str, message: &str) -> Self {
            self.answers
                .insert((category, query.to_string()), Err(CardError::Provider(message.into())));
            self
        }
    }

    impl ReferenceProvider for TableProvider {
        fn fetch_candidates(
            &self,
            category: Category,
            query: &str,
        ) -> impl Future<Output = Result<Vec<Candidate>, CardError>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let result = match self.answers.get(&(category, query.to_string())) {
                Some(Ok(records)) => Ok(records
                    .iter()
                    .filter_map(|r| r.as_object().cloned().map(Candidate::new))
                    .collect()),
                Some(Err(e)) => Err(e.clone()),
                None => Ok(Vec::new()),
            };
            async move { result }
        }
    }

    struct Harness {
        app: StreamMode<TableProvider>,
        transcript: Arc<MemoryTranscript>,
        notifications: Arc<NotificationCenter>,
    }

    fn harness(provider: TableProvider) -> Harness {
        let transcript = Arc::new(MemoryTranscript::new());
        let notifications = Arc::new(NotificationCenter::new(16));
        let dispatcher = CardDispatcher::new(
            CardRenderer::embedded().unwrap(),
            transcript.clone(),
            "Stream Mode",
        );
        let app = StreamMode::new(
            provider,
            dispatcher,
            notifications.clone(),
            Arc::new(SettingsStore::new()),
        );
        Harness {
            app,
            transcript,
            notifications,
        }
    }

    fn pokemon() -> Value {
        json!({
            "id": 7,
            "name": "Shelly",
            "gender": "male",
            "experience": 400,
            "currentHealth": 40,
            "species": { "name": "Squirtle", "dexNumber": 7 },
            "baseStats": { "hp": 4 },
            "type1": "water",
            "type2": "none",
            "abilities": [{ "name": "Torrent" }],
            "heldItems": [{ "name": "Mystic Water" }],
            "moves": [{ "name": "Water Gun", "type": "Water" }],
            "defenseCombatStages": 1
        })
    }

    #[tokio::test]
    async fn reference_card_is_posted_with_style_tags() {
        let provider = TableProvider::default().answer(
            Category::Move,
            "Tackle",
            vec![json!({"name": "Tackle", "effect": "Bonk"}), json!({"name": "Take Down"})],
        );
        let h = harness(provider);

        let message = h.app.invoke("/move Tackle").await.unwrap().unwrap();
        assert!(message.content.contains("Tackle"));
        assert!(message.content.contains("Bonk"));
        assert_eq!(message.class_names, CardKind::Reference.class_names());
        assert_eq!(message.speaker, "Stream Mode");
        assert_eq!(h.transcript.messages().len(), 1);

        let notes = h.notifications.recent(0);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].level, NotificationLevel::Info);
        assert_eq!(notes[0].message, "Displaying reference card for Tackle (type: moves)");
    }

    #[tokio::test]
    async fn display_cards_setting_suppresses_alert() {
        let provider = TableProvider::default().answer(
            Category::Ability,
            "Torrent",
            vec![json!({"name": "Torrent"})],
        );
        let h = harness(provider);
        h.app.settings().set(Setting::DisplayCards, true);

        assert!(h.app.handle("/ability Torrent").await.is_some());
        assert!(h.notifications.recent(0).is_empty());
    }

    #[tokio::test]
    async fn ambiguous_query_posts_nothing() {
        let provider = TableProvider::default().answer(
            Category::Edge,
            "Ace",
            vec![json!({"name": "Ace Trainer"}), json!({"name": "Ace Pilot"})],
        );
        let h = harness(provider);

        assert!(h.app.handle("/edge Ace").await.is_none());
        assert!(h.transcript.messages().is_empty());
        let notes = h.notifications.recent(0);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].level, NotificationLevel::Warn);
        assert_eq!(notes[0].message, "More than one result matches the query Ace");
    }

    #[tokio::test]
    async fn no_match_warns() {
        let h = harness(TableProvider::default());
        let err = h.app.invoke("/skill Flying").await.unwrap_err();
        assert_eq!(err, CardError::NoMatch { query: "Flying".into() });
    }

    #[tokio::test]
    async fn bio_never_touches_provider() {
        let h = harness(TableProvider::default());

        let message = h
            .app
            .invoke("/bio name=Ash twitch=ash_live")
            .await
            .unwrap()
            .unwrap();
        assert!(message.content.contains("ash_live"));
        assert_eq!(message.class_names, CardKind::Bio.class_names());
        assert_eq!(h.app.provider.calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.notifications.recent(0)[0].message, "Displaying biography card for Ash");
    }

    #[tokio::test]
    async fn bio_without_name_fails_before_any_work() {
        let h = harness(TableProvider::default());
        assert!(h.app.handle("/bio twitter=ash").await.is_none());
        assert!(h.transcript.messages().is_empty());
        assert_eq!(
            h.notifications.recent(0)[0].message,
            "name parameter is required for /bio"
        );
    }

    #[tokio::test]
    async fn status_card_for_pokemon() {
        let provider = TableProvider::default().answer(Category::Pokemon, "7", vec![pokemon()]);
        let h = harness(provider);

        let message = h.app.invoke("/status 7").await.unwrap().unwrap();
        assert_eq!(message.class_names, CardKind::Status.class_names());
        assert!(message.content.contains("Mystic Water"));
        assert!(message.content.contains("Water Gun"));
        assert_eq!(
            h.notifications.recent(0)[0].message,
            "Displaying combat status card for Pokemon: Shelly (ID: 7)"
        );
    }

    #[tokio::test]
    async fn pokemon_card_for_pokemon() {
        let provider = TableProvider::default().answer(Category::Pokemon, "7", vec![pokemon()]);
        let h = harness(provider);

        let message = h.app.invoke("/pokemon 7").await.unwrap().unwrap();
        assert_eq!(message.class_names, CardKind::Pokemon.class_names());
        assert!(message.content.contains("Squirtle"));
        assert!(message.content.contains("squirtle.png"));
    }

    #[tokio::test]
    async fn provider_error_is_surfaced_verbatim() {
        let provider =
            TableProvider::default().fail(Category::Pokemon, "404", "Pokemon not found");
        let h = harness(provider);

        assert!(h.app.handle("/pokemon 404").await.is_none());
        assert_eq!(h.notifications.recent(0)[0].message, "Pokemon not found");
    }

    #[tokio::test]
    async fn table_miss_posts_nothing() {
        let mut record = pokemon();
        record["type1"] = json!("shadow");
        let provider = TableProvider::default().answer(Category::Pokemon, "7", vec![record]);
        let h = harness(provider);

        let err = h.app.invoke("/status 7").await.unwrap_err();
        assert!(matches!(err, CardError::LookupTableMiss { .. }));
        assert!(h.transcript.messages().is_empty());
        assert!(h.notifications.recent(0).is_empty());
    }

    #[tokio::test]
    async fn non_command_lines_are_ignored() {
        let h = harness(TableProvider::default());
        assert_eq!(h.app.invoke("hello everyone").await.unwrap(), None);
    }

    #[tokio::test]
    async fn unknown_command_is_reported() {
        let h = harness(TableProvider::default());
        let err = h.app.invoke("/roll 1d20").await.unwrap_err();
        assert_eq!(err, CardError::UnknownCommand("/roll".into()));
    }

    #[test]
    fn announcement_uses_string_ids_verbatim() {
        let mut model = PresentationModel::default();
        model.set("name", "Shelly");
        model.set("id", "abc-123");
        assert_eq!(
            announcement(Command::Pokemon, &model),
            "Displaying reference card for Pokemon: Shelly (ID: abc-123)"
        );
    }
}
