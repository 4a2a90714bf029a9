//! Per-message session orchestration.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::in_memory::InMemoryStateStore;
use super::replies::Template;
use crate::config::MynahConfig;
use crate::error::{MynahError, MynahResult};
use crate::intent::IntentMatcher;
use crate::language::{create_language_adapter, HeuristicAdapter};
use crate::traits::{GenerationOptions, LanguageAdapter, Llm, StateStore};
use crate::types::{
    CompletionRequest, Intent, IntentKind, Language, Profile, Reply, Turn, TurnRole, UserId,
};

const DEFAULT_COMPLETION_TIMEOUT: Duration = Duration::from_secs(30);

/// Routes each inbound message to a structured reply or the completion backend.
///
/// Structured intents are answered from the state store without calling the
/// backend. Everything else is sent to the backend with the user's recent
/// conversation and a language instruction. The orchestrator never returns an
/// error to the caller; failures come back as an error-flavoured [`Reply`].
pub struct SessionOrchestrator {
    matcher: IntentMatcher,
    store: Arc<dyn StateStore>,
    language: Arc<dyn LanguageAdapter>,
    llm: Arc<dyn Llm>,
    options: GenerationOptions,
    completion_timeout: Duration,
    default_language: Language,
}

impl SessionOrchestrator {
    /// Create an orchestrator with the built-in rules, heuristic language
    /// detection and a 30 second completion deadline.
    pub fn new(llm: Arc<dyn Llm>, store: Arc<dyn StateStore>) -> Self {
        Self {
            matcher: IntentMatcher::new(),
            store,
            language: Arc::new(HeuristicAdapter::default()),
            llm,
            options: GenerationOptions::default(),
            completion_timeout: DEFAULT_COMPLETION_TIMEOUT,
            default_language: Language::default(),
        }
    }

    /// Build from configuration with an in-memory state store.
    pub fn from_config(config: &MynahConfig, llm: Arc<dyn Llm>) -> MynahResult<Self> {
        config.validate()?;

        let store = Arc::new(InMemoryStateStore::from_config(&config.session));
        Ok(Self::new(llm, store)
            .with_language_adapter(create_language_adapter(&config.language))
            .with_default_language(config.language.default_language)
            .with_generation_options(config.llm.config.generation_options())
            .with_completion_timeout(Duration::from_secs(config.session.completion_timeout_secs)))
    }

    pub fn with_matcher(mut self, matcher: IntentMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn with_language_adapter(mut self, language: Arc<dyn LanguageAdapter>) -> Self {
        self.language = language;
        self
    }

    pub fn with_default_language(mut self, language: Language) -> Self {
        self.default_language = language;
        self
    }

    pub fn with_generation_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_completion_timeout(mut self, timeout: Duration) -> Self {
        self.completion_timeout = timeout;
        self
    }

    /// Model identifier of the completion backend.
    pub fn model_name(&self) -> &str {
        self.llm.model_name()
    }

    /// Name of the active language strategy.
    pub fn language_strategy(&self) -> &'static str {
        self.language.name()
    }

    /// Handle one inbound message.
    pub async fn handle(&self, user: &UserId, message: &str, now: DateTime<Utc>) -> Reply {
        let started = Instant::now();

        // Read before touching so last-seen recall reports the previous visit.
        let previous = match self.store.get_profile(user).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!(user_id = %user, error = %e, "Failed to read profile");
                Profile::default()
            }
        };
        if let Err(e) = self.store.touch_last_seen(user, now).await {
            warn!(user_id = %user, error = %e, "Failed to update last seen");
        }

        let language = self.language.detect(message).unwrap_or(self.default_language);
        let text = message.trim();

        let reply = if text.is_empty() {
            Reply::clarification(Template::EmptyMessage.render(language), None, language)
        } else {
            let intent = self.matcher.classify(text);
            match intent.kind() {
                None => self.complete(user, text, language).await,
                Some(kind) => match self.structured(user, intent, &previous, language).await {
                    Ok(reply) => reply,
                    Err(e) => {
                        warn!(user_id = %user, intent = %kind, error = %e, "Structured intent failed");
                        Reply::error(Template::StoreError.render(language), Some(kind), language)
                    }
                },
            }
        };

        info!(
            user_id = %user,
            kind = ?reply.kind,
            language = %reply.language,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Handled message"
        );
        reply
    }

    async fn structured(
        &self,
        user: &UserId,
        intent: Intent,
        previous: &Profile,
        language: Language,
    ) -> MynahResult<Reply> {
        let reply = |template: Template<'_>, kind: IntentKind| {
            Reply::structured(template.render(language), kind, language)
        };

        Ok(match intent {
            Intent::SaveName(name) => {
                self.store.set_name(user, &name).await?;
                reply(Template::NameSaved(&name), IntentKind::SaveName)
            }
            Intent::SaveBirthdate(date) => {
                self.store.set_birthdate(user, &date).await?;
                reply(Template::BirthdateSaved(&date), IntentKind::SaveBirthdate)
            }
            Intent::SaveMemory(note) => {
                self.store.append_note(user, &note).await?;
                reply(Template::MemorySaved(&note), IntentKind::SaveMemory)
            }
            Intent::RecallName => match previous.name.as_deref() {
                Some(name) => reply(Template::NameKnown(name), IntentKind::RecallName),
                None => reply(Template::NameUnknown, IntentKind::RecallName),
            },
            Intent::RecallBirthdate => match previous.birthdate.as_deref() {
                Some(date) => reply(Template::BirthdateKnown(date), IntentKind::RecallBirthdate),
                None => reply(Template::BirthdateUnknown, IntentKind::RecallBirthdate),
            },
            Intent::RecallLastSeen => match previous.last_seen {
                Some(at) => reply(Template::LastSeen(at), IntentKind::RecallLastSeen),
                None => reply(Template::LastSeenUnknown, IntentKind::RecallLastSeen),
            },
            Intent::RecallMemory => {
                let notes = self.store.list_notes(user).await?;
                if notes.is_empty() {
                    reply(Template::NoMemories, IntentKind::RecallMemory)
                } else {
                    reply(Template::Memories(&notes), IntentKind::RecallMemory)
                }
            }
            Intent::MissingPayload(kind) => Reply::clarification(
                Template::AskForContent(kind).render(language),
                Some(kind),
                language,
            ),
            Intent::None => {
                return Err(MynahError::Internal(
                    "Message has no structured intent".to_string(),
                ))
            }
        })
    }

    async fn complete(&self, user: &UserId, message: &str, language: Language) -> Reply {
        let failed = || Reply::error(Template::BackendError.render(language), None, language);

        if let Err(e) = self.store.push_turn(user, Turn::user(message)).await {
            warn!(user_id = %user, error = %e, "Failed to record user turn");
            return failed();
        }

        let request = CompletionRequest {
            system_instruction: self.language.build_system_instruction(message),
            history: self.history(user, message).await,
            message: message.to_string(),
        };

        match self.request_completion(&request).await {
            Ok(text) => {
                if let Err(e) = self.store.push_turn(user, Turn::assistant(&text)).await {
                    warn!(user_id = %user, error = %e, "Failed to record assistant turn");
                }
                Reply::completion(text, language)
            }
            Err(e) => {
                // The user turn stays; no assistant turn is recorded.
                warn!(
                    user_id = %user,
                    error = %e,
                    code = e.code().as_str(),
                    "Completion failed"
                );
                failed()
            }
        }
    }

    /// Window turns before the just-recorded user message.
    async fn history(&self, user: &UserId, message: &str) -> Vec<Turn> {
        let mut window = match self.store.window(user).await {
            Ok(window) => window,
            Err(e) => {
                warn!(user_id = %user, error = %e, "Failed to read conversation window");
                return Vec::new();
            }
        };
        if matches!(window.last(), Some(turn) if turn.role == TurnRole::User && turn.text == message)
        {
            window.pop();
        }
        window
    }

    async fn request_completion(&self, request: &CompletionRequest) -> MynahResult<String> {
        let messages = request.to_messages();
        debug!(
            messages = messages.len(),
            timeout_secs = self.completion_timeout.as_secs(),
            "Requesting completion"
        );

        let response = tokio::time::timeout(
            self.completion_timeout,
            self.llm.generate(&messages, Some(self.options.clone())),
        )
        .await
        .map_err(|_| MynahError::Timeout {
            seconds: self.completion_timeout.as_secs(),
        })??;

        let text = response.content_or_empty().trim();
        if text.is_empty() {
            return Err(MynahError::invalid_response(
                "Completion backend returned no content",
            ));
        }
        Ok(text.to_string())
    }

    /// Reset a user's conversation window. Profile and notes are kept.
    pub async fn clear_conversation(&self, user: &UserId) -> MynahResult<()> {
        self.store.clear_conversation(user).await?;
        info!(user_id = %user, "Cleared conversation");
        Ok(())
    }

    pub async fn profile(&self, user: &UserId) -> MynahResult<Profile> {
        self.store.get_profile(user).await
    }

    pub async fn memories(&self, user: &UserId) -> MynahResult<Vec<String>> {
        self.store.list_notes(user).await
    }

    pub async fn conversation(&self, user: &UserId) -> MynahResult<Vec<Turn>> {
        self.store.window(user).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryCapacity;
    use crate::language::StaticAdapter;
    use crate::traits::{LlmResponse, MockLlm};
    use crate::types::{Message, MessageRole, ReplyKind};
    use chrono::{Duration as ChronoDuration, TimeZone};
    use std::sync::Mutex;

    /// Returns a fixed answer and records every request.
    struct RecordingLlm {
        answer: MynahResult<String>,
        calls: Mutex<Vec<Vec<Message>>>,
    }

    impl RecordingLlm {
        fn answering(text: &str) -> Self {
            Self {
                answer: Ok(text.to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                answer: Err(MynahError::from_http_status(503, "upstream unavailable")),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<Vec<Message>> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl Llm for RecordingLlm {
        async fn generate(
            &self,
            messages: &[Message],
            _options: Option<GenerationOptions>,
        ) -> MynahResult<LlmResponse> {
            self.calls.lock().unwrap().push(messages.to_vec());
            match &self.answer {
                Ok(text) => Ok(LlmResponse::text(text.clone())),
                Err(e) => Err(MynahError::llm(e.to_string())),
            }
        }

        fn model_name(&self) -> &str {
            "recording"
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap()
    }

    fn orchestrator(llm: Arc<dyn Llm>, window: usize) -> SessionOrchestrator {
        let store = Arc::new(InMemoryStateStore::new(window, MemoryCapacity::Unbounded));
        SessionOrchestrator::new(llm, store)
    }

    #[tokio::test]
    async fn test_structured_intents_skip_backend() {
        let mut mock = MockLlm::new();
        mock.expect_generate().never();
        let orch = orchestrator(Arc::new(mock), 10);
        let user = UserId::from("u1");

        let reply = orch.handle(&user, "my name is asha", now()).await;
        assert_eq!(reply.kind, ReplyKind::Structured);
        assert_eq!(reply.intent, Some(IntentKind::SaveName));

        let reply = orch.handle(&user, "what is my name?", now()).await;
        assert!(reply.text.contains("Asha"));

        orch.handle(&user, "remember buy milk", now()).await;
        orch.handle(&user, "remember call mom", now()).await;
        assert_eq!(orch.memories(&user).await.unwrap(), vec!["buy milk", "call mom"]);

        let reply = orch.handle(&user, "show my memories", now()).await;
        assert!(reply.text.find("buy milk").unwrap() < reply.text.find("call mom").unwrap());

        assert!(orch.conversation(&user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_recall_name_before_save() {
        let orch = orchestrator(Arc::new(RecordingLlm::answering("unused")), 10);
        let reply = orch.handle(&UserId::from("u"), "What is my name?", now()).await;
        assert_eq!(
            reply.text,
            Template::NameUnknown.render(Language::English)
        );
    }

    #[tokio::test]
    async fn test_empty_payload_asks_for_content() {
        let orch = orchestrator(Arc::new(RecordingLlm::answering("unused")), 10);
        let user = UserId::from("u");

        let reply = orch.handle(&user, "remember", now()).await;
        assert_eq!(reply.kind, ReplyKind::Clarification);
        assert_eq!(reply.intent, Some(IntentKind::SaveMemory));
        assert!(orch.memories(&user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_name_asks_for_name() {
        let mut mock = MockLlm::new();
        mock.expect_generate().never();
        let orch = orchestrator(Arc::new(mock), 10);
        let user = UserId::from("u");

        let reply = orch.handle(&user, "my name is", now()).await;
        assert_eq!(reply.kind, ReplyKind::Clarification);
        assert_eq!(reply.intent, Some(IntentKind::SaveName));
        assert_eq!(
            reply.text,
            Template::AskForContent(IntentKind::SaveName).render(Language::English)
        );

        let reply = orch.handle(&user, "my birthday is", now()).await;
        assert_eq!(reply.intent, Some(IntentKind::SaveBirthdate));

        let profile = orch.profile(&user).await.unwrap();
        assert!(profile.name.is_none());
        assert!(profile.birthdate.is_none());
    }

    #[tokio::test]
    async fn test_empty_message_touches_last_seen_only() {
        let llm = Arc::new(RecordingLlm::answering("unused"));
        let orch = orchestrator(llm.clone(), 10);
        let user = UserId::from("u");

        let reply = orch.handle(&user, "   ", now()).await;
        assert_eq!(reply.kind, ReplyKind::Clarification);
        assert!(llm.calls().is_empty());
        assert_eq!(orch.profile(&user).await.unwrap().last_seen, Some(now()));
        assert!(orch.conversation(&user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_last_seen_recall_reports_previous_visit() {
        let orch = orchestrator(Arc::new(RecordingLlm::answering("unused")), 10);
        let user = UserId::from("u");

        let first = orch.handle(&user, "when did we last talk?", now()).await;
        assert_eq!(first.text, Template::LastSeenUnknown.render(Language::English));

        let later = now() + ChronoDuration::hours(2);
        let second = orch.handle(&user, "when did we last talk?", later).await;
        assert!(second.text.contains("2024-06-01 09:30:00"));
        assert_eq!(orch.profile(&user).await.unwrap().last_seen, Some(later));
    }

    #[tokio::test]
    async fn test_completion_request_shape() {
        let llm = Arc::new(RecordingLlm::answering("Paris."));
        let orch = orchestrator(llm.clone(), 10);
        let user = UserId::from("u");

        orch.handle(&user, "Hello there", now()).await;
        let reply = orch
            .handle(&user, "What is the capital of France?", now())
            .await;
        assert_eq!(reply.kind, ReplyKind::Completion);
        assert_eq!(reply.text, "Paris.");

        let calls = llm.calls();
        let last = calls.last().unwrap();
        assert_eq!(last[0].role, MessageRole::System);
        assert!(last[0].content.contains("English only"));
        // system, "Hello there", "Paris.", new message
        assert_eq!(last.len(), 4);
        assert_eq!(last[1].content, "Hello there");
        assert_eq!(last[3].role, MessageRole::User);
        assert_eq!(last[3].content, "What is the capital of France?");

        assert_eq!(orch.conversation(&user).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_backend_failure_keeps_user_turn() {
        let orch = orchestrator(Arc::new(RecordingLlm::failing()), 10);
        let user = UserId::from("u");

        let reply = orch.handle(&user, "Tell me a story", now()).await;
        assert!(reply.is_error());
        assert_eq!(reply.text, Template::BackendError.render(Language::English));

        let window = orch.conversation(&user).await.unwrap();
        assert_eq!(window, vec![Turn::user("Tell me a story")]);
    }

    #[tokio::test]
    async fn test_error_reply_uses_detected_language() {
        let orch = orchestrator(Arc::new(RecordingLlm::failing()), 10);
        let reply = orch
            .handle(&UserId::from("u"), "मुझे एक कहानी सुनाओ", now())
            .await;
        assert_eq!(reply.language, Language::Hindi);
        assert_eq!(reply.text, Template::BackendError.render(Language::Hindi));
    }

    #[tokio::test]
    async fn test_blank_completion_is_failure() {
        let mut mock = MockLlm::new();
        mock.expect_generate()
            .times(1)
            .returning(|_, _| Ok(LlmResponse::text("   ")));
        let orch = orchestrator(Arc::new(mock), 10);
        let user = UserId::from("u");

        let reply = orch.handle(&user, "hello", now()).await;
        assert!(reply.is_error());
        assert_eq!(orch.conversation(&user).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_window_stays_bounded() {
        let orch = orchestrator(Arc::new(RecordingLlm::answering("ok")), 4);
        let user = UserId::from("u");
        for i in 0..5 {
            orch.handle(&user, &format!("tell me about {}", i), now()).await;
        }

        let window = orch.conversation(&user).await.unwrap();
        assert_eq!(window.len(), 4);
        assert_eq!(window[0].text, "tell me about 3");
    }

    #[tokio::test]
    async fn test_static_strategy_uses_default_language() {
        let llm = Arc::new(RecordingLlm::failing());
        let orch = orchestrator(llm, 10)
            .with_language_adapter(Arc::new(StaticAdapter::default()))
            .with_default_language(Language::Hinglish);

        let reply = orch.handle(&UserId::from("u"), "What is my name?", now()).await;
        assert_eq!(reply.language, Language::Hinglish);
        assert_eq!(reply.text, Template::NameUnknown.render(Language::Hinglish));
    }

    #[tokio::test]
    async fn test_clear_conversation() {
        let orch = orchestrator(Arc::new(RecordingLlm::answering("hi")), 10);
        let user = UserId::from("u");
        orch.handle(&user, "hello", now()).await;
        orch.handle(&user, "my name is asha", now()).await;

        orch.clear_conversation(&user).await.unwrap();
        assert!(orch.conversation(&user).await.unwrap().is_empty());
        assert_eq!(
            orch.profile(&user).await.unwrap().name.as_deref(),
            Some("Asha")
        );
    }
}
