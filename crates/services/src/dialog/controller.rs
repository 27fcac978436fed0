use std::num::IntErrorKind;
use std::sync::Arc;

use lesson_core::Clock;
use lesson_core::model::{ChatId, Language, LessonSummary, Locale, PendingStep, Session};
use storage::repository::{ContentRepository, SessionRepository, UserRecord, UserRepository};

use super::command::{Command, Parsed};
use super::gate::ChatGate;
use super::{InboundMessage, replies};
use crate::delivery::{Delivery, DeliveryReport, OutboundMessage};
use crate::error::DialogError;

/// What handling one inbound message produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogOutcome {
    /// Session as committed after the message.
    pub session: Session,
    pub reports: Vec<DeliveryReport>,
}

impl DialogOutcome {
    #[must_use]
    pub fn dropped(&self) -> usize {
        self.reports.iter().filter(|r| !r.is_delivered()).count()
    }
}

enum Selection {
    Index(usize),
    OutOfRange,
    NotANumber,
}

/// The conversation state machine.
///
/// Each inbound message is resolved against, in order: a slash command
/// (which replaces any pending step), the chat's pending step, and finally
/// an idle hint. The resulting session is committed before the replies are
/// delivered, so a dropped message never rolls dialog state back.
#[derive(Clone)]
pub struct DialogController {
    clock: Clock,
    content: Arc<dyn ContentRepository>,
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionRepository>,
    delivery: Delivery,
    gate: ChatGate,
    locale: Locale,
    bot_username: Option<String>,
}

impl DialogController {
    #[must_use]
    pub fn new(
        clock: Clock,
        content: Arc<dyn ContentRepository>,
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionRepository>,
        delivery: Delivery,
    ) -> Self {
        Self {
            clock,
            content,
            users,
            sessions,
            delivery,
            gate: ChatGate::new(),
            locale: Locale::default(),
            bot_username: None,
        }
    }

    #[must_use]
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Commands suffixed with a different `@username` are then ignored.
    #[must_use]
    pub fn with_bot_username(mut self, username: impl Into<String>) -> Self {
        self.bot_username = Some(username.into());
        self
    }

    /// Process one inbound message to completion.
    ///
    /// # Errors
    ///
    /// Returns `DialogError` when storage fails. The chat receives a generic
    /// apology and its session is left as it was before the message.
    pub async fn handle(&self, message: InboundMessage) -> Result<DialogOutcome, DialogError> {
        let chat_id = message.chat_id;
        let _turn = self.gate.acquire(chat_id).await;

        let replies_or_err = async {
            let before = self.load_session(chat_id).await?;
            let mut after = before.clone();
            let replies = self.step(&mut after, &message.text).await?;
            Ok::<_, DialogError>((before, after, replies))
        }
        .await;

        let (before, after, replies) = match replies_or_err {
            Ok(turn) => turn,
            Err(err) => {
                self.apologise(chat_id).await;
                return Err(err);
            }
        };

        let session = if after == before {
            after
        } else {
            let next = after.clone();
            match self
                .sessions
                .update(chat_id, Box::new(move |stored| *stored = next))
                .await
            {
                Ok(session) => session,
                Err(err) => {
                    self.apologise(chat_id).await;
                    return Err(err.into());
                }
            }
        };

        let reports = self.delivery.send_all(chat_id, &replies).await;
        tracing::debug!(
            %chat_id,
            replies = replies.len(),
            pending = ?session.pending_step(),
            "handled message"
        );
        Ok(DialogOutcome { session, reports })
    }

    async fn apologise(&self, chat_id: ChatId) {
        self.delivery
            .send(chat_id, &replies::internal_error(self.locale))
            .await;
    }

    /// Fetch the session, restoring a persisted name after a restart.
    async fn load_session(&self, chat_id: ChatId) -> Result<Session, DialogError> {
        let mut session = self.sessions.get_or_create(chat_id).await?;
        if session.display_name().is_none() {
            if let Some(name) = self.users.get_user_name(chat_id).await? {
                session.set_display_name(name);
            }
        }
        Ok(session)
    }

    async fn step(
        &self,
        session: &mut Session,
        text: &str,
    ) -> Result<Vec<OutboundMessage>, DialogError> {
        match Command::parse(text, self.bot_username.as_deref()) {
            Parsed::Command(command) => {
                if let Some(abandoned) = session.take_pending_step() {
                    tracing::debug!(chat_id = %session.chat_id(), ?abandoned, "command replaces pending step");
                }
                tracing::info!(chat_id = %session.chat_id(), command = command.name(), "command");
                return self.run_command(session, command).await;
            }
            Parsed::OtherBot => {
                tracing::debug!(chat_id = %session.chat_id(), "command for another bot ignored");
                return Ok(Vec::new());
            }
            Parsed::Text => {}
        }

        match session.take_pending_step() {
            Some(PendingStep::AwaitingName) => self.capture_name(session, text).await,
            Some(PendingStep::AwaitingLanguage) => Ok(choose_language(session, self.locale, text)),
            Some(PendingStep::AwaitingLessonNumber { language }) => {
                self.choose_lesson(session, language, text).await
            }
            None => Ok(vec![replies::unknown_input(self.locale)]),
        }
    }

    async fn run_command(
        &self,
        session: &mut Session,
        command: Command,
    ) -> Result<Vec<OutboundMessage>, DialogError> {
        match command {
            Command::Start => {
                session.await_step(PendingStep::AwaitingName);
                Ok(vec![replies::ask_name(self.locale)])
            }
            Command::Help => Ok(vec![replies::help(self.locale)]),
            Command::Languages => Ok(present_languages(session, self.locale)),
            Command::Lesson => {
                let Some(language) = session.selected_language() else {
                    return Ok(vec![replies::choose_language_first(self.locale)]);
                };
                self.show_lesson_list(session, language).await
            }
            Command::Continue => self.continue_lessons(session).await,
            Command::Quiz => self.quiz(session).await,
            Command::Exit => Ok(vec![replies::farewell(self.locale)]),
        }
    }

    async fn capture_name(
        &self,
        session: &mut Session,
        text: &str,
    ) -> Result<Vec<OutboundMessage>, DialogError> {
        let name = text.trim();
        if name.is_empty() {
            session.await_step(PendingStep::AwaitingName);
            return Ok(vec![replies::ask_name(self.locale)]);
        }

        session.set_display_name(name);
        let record = UserRecord {
            chat_id: session.chat_id(),
            name: name.to_owned(),
            saved_at: self.clock.now(),
        };
        // The in-memory session keeps the name even if persisting it fails.
        if let Err(err) = self.users.save_user_name(&record).await {
            tracing::warn!(chat_id = %session.chat_id(), error = %err, "failed to persist user name");
        }
        Ok(vec![replies::name_saved(self.locale, name)])
    }

    async fn show_lesson_list(
        &self,
        session: &mut Session,
        language: Language,
    ) -> Result<Vec<OutboundMessage>, DialogError> {
        let lessons = self.content.list_lessons(language).await?;
        if lessons.is_empty() {
            return Ok(vec![replies::no_lessons(self.locale, language)]);
        }
        session.await_step(PendingStep::AwaitingLessonNumber { language });
        Ok(vec![replies::lesson_list(self.locale, language, &lessons)])
    }

    async fn choose_lesson(
        &self,
        session: &mut Session,
        language: Language,
        text: &str,
    ) -> Result<Vec<OutboundMessage>, DialogError> {
        let lessons = self.content.list_lessons(language).await?;
        match parse_selection(text, lessons.len()) {
            Selection::Index(index) => self.deliver_lesson(session, language, &lessons, index).await,
            Selection::OutOfRange => {
                session.await_step(PendingStep::AwaitingLessonNumber { language });
                Ok(vec![replies::lesson_out_of_range(self.locale)])
            }
            Selection::NotANumber => {
                session.await_step(PendingStep::AwaitingLessonNumber { language });
                Ok(vec![replies::lesson_not_a_number(self.locale)])
            }
        }
    }

    async fn continue_lessons(
        &self,
        session: &mut Session,
    ) -> Result<Vec<OutboundMessage>, DialogError> {
        let Some(language) = session.selected_language() else {
            return Ok(vec![replies::choose_language_first(self.locale)]);
        };
        let Some(next) = session.next_lesson_index() else {
            return Ok(vec![replies::choose_lesson_first(self.locale)]);
        };

        let lessons = self.content.list_lessons(language).await?;
        if next >= lessons.len() {
            return Ok(vec![replies::last_lesson_reached(self.locale)]);
        }
        self.deliver_lesson(session, language, &lessons, next).await
    }

    /// Chunks of the lesson at `index`, followed by the what-next hint.
    async fn deliver_lesson(
        &self,
        session: &mut Session,
        language: Language,
        lessons: &[LessonSummary],
        index: usize,
    ) -> Result<Vec<OutboundMessage>, DialogError> {
        let number = lessons[index].number;
        let Some(lesson) = self.content.get_lesson(language, number).await? else {
            tracing::warn!(chat_id = %session.chat_id(), %language, %number, "listed lesson is missing");
            return Ok(vec![replies::lesson_not_found(self.locale)]);
        };

        session.record_lesson_viewed(index, lessons.len())?;
        tracing::info!(chat_id = %session.chat_id(), %language, %number, "delivering lesson");

        let mut out: Vec<OutboundMessage> = lesson
            .chunks()
            .into_iter()
            .map(OutboundMessage::text)
            .collect();
        out.push(replies::after_lesson(self.locale));
        Ok(out)
    }

    async fn quiz(&self, session: &Session) -> Result<Vec<OutboundMessage>, DialogError> {
        let Some(language) = session.selected_language() else {
            return Ok(vec![replies::choose_language_first(self.locale)]);
        };
        let reply = match self.content.get_quiz(language).await? {
            Some(quiz) => replies::quiz_link(self.locale, language, quiz.url()),
            None => replies::no_quiz(self.locale, language),
        };
        Ok(vec![reply])
    }
}

fn present_languages(session: &mut Session, locale: Locale) -> Vec<OutboundMessage> {
    session.await_step(PendingStep::AwaitingLanguage);
    vec![replies::choose_language(locale)]
}

fn choose_language(session: &mut Session, locale: Locale, text: &str) -> Vec<OutboundMessage> {
    match Language::from_display(text) {
        Some(language) => {
            session.select_language(language);
            tracing::info!(chat_id = %session.chat_id(), %language, "language selected");
            vec![replies::language_selected(locale, language)]
        }
        None => {
            let mut out = vec![replies::unknown_language(locale)];
            out.extend(present_languages(session, locale));
            out
        }
    }
}

/// Lesson numbers are 1-based in chat and 0-based internally.
fn parse_selection(text: &str, count: usize) -> Selection {
    match text.trim().parse::<i64>() {
        Ok(n) => usize::try_from(n)
            .ok()
            .filter(|n| (1..=count).contains(n))
            .map_or(Selection::OutOfRange, |n| Selection::Index(n - 1)),
        Err(err) if matches!(err.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
            Selection::OutOfRange
        }
        Err(_) => Selection::NotANumber,
    }
}
