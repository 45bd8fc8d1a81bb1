//! Receivers for decoded chat events.

use std::fmt;

use serde_json::Value;

use crate::error::StreamError;
use crate::models::Sources;
use crate::sse::events::ChatEvent;

/// Receives the events of one chat stream.
///
/// Every method defaults to doing nothing, so implementors only override the
/// events they care about. `on_error` is called at most once and nothing is
/// dispatched after it.
pub trait ChatStreamHandler {
    fn on_status(&mut self, _stage: &str, _data: &Value) {}

    fn on_delta(&mut self, _text: &str) {}

    fn on_sources(&mut self, _sources: &Sources) {}

    fn on_suggestions(&mut self, _prompts: &[String]) {}

    fn on_done(&mut self, _conversation_id: Option<&str>) {}

    fn on_error(&mut self, _error: &StreamError) {}
}

impl<H: ChatStreamHandler + ?Sized> ChatStreamHandler for &mut H {
    fn on_status(&mut self, stage: &str, data: &Value) {
        (**self).on_status(stage, data)
    }

    fn on_delta(&mut self, text: &str) {
        (**self).on_delta(text)
    }

    fn on_sources(&mut self, sources: &Sources) {
        (**self).on_sources(sources)
    }

    fn on_suggestions(&mut self, prompts: &[String]) {
        (**self).on_suggestions(prompts)
    }

    fn on_done(&mut self, conversation_id: Option<&str>) {
        (**self).on_done(conversation_id)
    }

    fn on_error(&mut self, error: &StreamError) {
        (**self).on_error(error)
    }
}

impl ChatEvent {
    /// Invoke the handler method matching this event.
    pub fn dispatch_to<H: ChatStreamHandler + ?Sized>(&self, handler: &mut H) {
        match self {
            ChatEvent::Status { stage, data } => handler.on_status(stage, data),
            ChatEvent::Delta { text } => handler.on_delta(text),
            ChatEvent::Sources(sources) => handler.on_sources(sources),
            ChatEvent::Suggestions { prompts } => handler.on_suggestions(prompts),
            ChatEvent::Done { conversation_id } => handler.on_done(conversation_id.as_deref()),
        }
    }
}

type StatusFn<'a> = Box<dyn FnMut(&str, &Value) + Send + 'a>;
type DeltaFn<'a> = Box<dyn FnMut(&str) + Send + 'a>;
type SourcesFn<'a> = Box<dyn FnMut(&Sources) + Send + 'a>;
type SuggestionsFn<'a> = Box<dyn FnMut(&[String]) + Send + 'a>;
type DoneFn<'a> = Box<dyn FnMut(Option<&str>) + Send + 'a>;
type ErrorFn<'a> = Box<dyn FnMut(&StreamError) + Send + 'a>;

/// Handler built from optional closures. Unset callbacks are skipped.
///
/// ```ignore
/// let mut answer = String::new();
/// let mut callbacks = ChatStreamCallbacks::new()
///     .with_delta(|text| answer.push_str(text))
///     .with_error(|err| eprintln!("{}", err));
/// client.stream_chat(&request, email, &mut callbacks).await?;
/// ```
#[derive(Default)]
pub struct ChatStreamCallbacks<'a> {
    status: Option<StatusFn<'a>>,
    delta: Option<DeltaFn<'a>>,
    sources: Option<SourcesFn<'a>>,
    suggestions: Option<SuggestionsFn<'a>>,
    done: Option<DoneFn<'a>>,
    error: Option<ErrorFn<'a>>,
}

impl<'a> ChatStreamCallbacks<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, f: impl FnMut(&str, &Value) + Send + 'a) -> Self {
        self.status = Some(Box::new(f));
        self
    }

    pub fn with_delta(mut self, f: impl FnMut(&str) + Send + 'a) -> Self {
        self.delta = Some(Box::new(f));
        self
    }

    pub fn with_sources(mut self, f: impl FnMut(&Sources) + Send + 'a) -> Self {
        self.sources = Some(Box::new(f));
        self
    }

    pub fn with_suggestions(mut self, f: impl FnMut(&[String]) + Send + 'a) -> Self {
        self.suggestions = Some(Box::new(f));
        self
    }

    pub fn with_done(mut self, f: impl FnMut(Option<&str>) + Send + 'a) -> Self {
        self.done = Some(Box::new(f));
        self
    }

    pub fn with_error(mut self, f: impl FnMut(&StreamError) + Send + 'a) -> Self {
        self.error = Some(Box::new(f));
        self
    }
}

impl ChatStreamHandler for ChatStreamCallbacks<'_> {
    fn on_status(&mut self, stage: &str, data: &Value) {
        if let Some(f) = self.status.as_mut() {
            f(stage, data);
        }
    }

    fn on_delta(&mut self, text: &str) {
        if let Some(f) = self.delta.as_mut() {
            f(text);
        }
    }

    fn on_sources(&mut self, sources: &Sources) {
        if let Some(f) = self.sources.as_mut() {
            f(sources);
        }
    }

    fn on_suggestions(&mut self, prompts: &[String]) {
        if let Some(f) = self.suggestions.as_mut() {
            f(prompts);
        }
    }

    fn on_done(&mut self, conversation_id: Option<&str>) {
        if let Some(f) = self.done.as_mut() {
            f(conversation_id);
        }
    }

    fn on_error(&mut self, error: &StreamError) {
        if let Some(f) = self.error.as_mut() {
            f(error);
        }
    }
}

impl fmt::Debug for ChatStreamCallbacks<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatStreamCallbacks")
            .field("status", &self.status.is_some())
            .field("delta", &self.delta.is_some())
            .field("sources", &self.sources.is_some())
            .field("suggestions", &self.suggestions.is_some())
            .field("done", &self.done.is_some())
            .field("error", &self.error.is_some())
            .finish()
    }
}
