//! Terminal renderings of a chat stream.

use std::io::{self, Write};

use serde_json::{json, Value};

use crate::error::StreamError;
use crate::models::{Citation, Sources};
use crate::sse::{ChatEvent, ChatStreamHandler};

/// Human-readable progress line for a `status` stage.
pub fn status_label(stage: &str) -> &str {
    match stage {
        "searching_corpus" => "Searching research...",
        "corpus_done" => "Analyzing sources...",
        "generating" => "Generating response...",
        "web_search" => "Searching the web...",
        other => other,
    }
}

/// Plain-text printer: answer text to `out`, progress to `err`.
///
/// Sources and suggestions are held back and printed by [`finish`](Self::finish)
/// so they follow the answer.
pub struct TranscriptPrinter<W: Write, E: Write> {
    out: W,
    err: E,
    sources: Option<Sources>,
    suggestions: Vec<String>,
    conversation_id: Option<String>,
    wrote_text: bool,
    io_error: Option<io::Error>,
}

impl<W: Write, E: Write> TranscriptPrinter<W, E> {
    pub fn new(out: W, err: E) -> Self {
        Self {
            out,
            err,
            sources: None,
            suggestions: Vec::new(),
            conversation_id: None,
            wrote_text: false,
            io_error: None,
        }
    }

    /// Conversation id from the `done` event, if one arrived.
    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    fn record(&mut self, result: io::Result<()>) {
        if let Err(e) = result {
            self.io_error.get_or_insert(e);
        }
    }

    /// Print the trailing sections and surface the first write error.
    pub fn finish(mut self) -> io::Result<()> {
        if let Some(e) = self.io_error.take() {
            return Err(e);
        }
        if self.wrote_text {
            writeln!(self.out)?;
        }

        if let Some(sources) = self.sources.take().filter(|s| !s.is_empty()) {
            writeln!(self.out, "\nSources:")?;
            write_citations(&mut self.out, "Research", &sources.research)?;
            write_citations(&mut self.out, "Web", &sources.web)?;
        }

        if !self.suggestions.is_empty() {
            writeln!(self.out, "\nFollow-up questions:")?;
            for prompt in &self.suggestions {
                writeln!(self.out, "  - {}", prompt)?;
            }
        }

        if let Some(id) = &self.conversation_id {
            writeln!(self.err, "[conversation {}]", id)?;
        }
        self.out.flush()
    }
}

fn write_citations<W: Write>(out: &mut W, heading: &str, citations: &[Citation]) -> io::Result<()> {
    if citations.is_empty() {
        return Ok(());
    }
    writeln!(out, "  {}:", heading)?;
    for (i, citation) in citations.iter().enumerate() {
        match (&citation.source_firm, &citation.url) {
            (Some(firm), Some(url)) => {
                writeln!(out, "    [{}] {} ({}) {}", i + 1, citation.label(), firm, url)?
            }
            (None, Some(url)) if citation.title.is_some() => {
                writeln!(out, "    [{}] {} {}", i + 1, citation.label(), url)?
            }
            (Some(firm), None) if citation.title.is_some() => {
                writeln!(out, "    [{}] {} ({})", i + 1, citation.label(), firm)?
            }
            _ => writeln!(out, "    [{}] {}", i + 1, citation.label())?,
        }
    }
    Ok(())
}

impl<W: Write, E: Write> ChatStreamHandler for TranscriptPrinter<W, E> {
    fn on_status(&mut self, stage: &str, _data: &Value) {
        let result = writeln!(self.err, "{}", status_label(stage));
        self.record(result);
    }

    fn on_delta(&mut self, text: &str) {
        self.wrote_text |= !text.is_empty();
        let result = self
            .out
            .write_all(text.as_bytes())
            .and_then(|_| self.out.flush());
        self.record(result);
    }

    fn on_sources(&mut self, sources: &Sources) {
        self.sources = Some(sources.clone());
    }

    fn on_suggestions(&mut self, prompts: &[String]) {
        self.suggestions = prompts.to_vec();
    }

    fn on_done(&mut self, conversation_id: Option<&str>) {
        self.conversation_id = conversation_id.map(str::to_string);
    }
}

/// Prints every event as one JSON object per line.
///
/// Events keep their wire shape under a `type` tag; a stream failure becomes
/// `{"type":"error","code":...,"message":...}`.
pub struct JsonLinesPrinter<W: Write> {
    out: W,
    io_error: Option<io::Error>,
}

impl<W: Write> JsonLinesPrinter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            io_error: None,
        }
    }

    fn emit(&mut self, value: &impl serde::Serialize) {
        let result = serde_json::to_writer(&mut self.out, value)
            .map_err(io::Error::from)
            .and_then(|_| writeln!(self.out))
            .and_then(|_| self.out.flush());
        if let Err(e) = result {
            self.io_error.get_or_insert(e);
        }
    }

    pub fn finish(self) -> io::Result<()> {
        match self.io_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl<W: Write> ChatStreamHandler for JsonLinesPrinter<W> {
    fn on_status(&mut self, stage: &str, data: &Value) {
        self.emit(&ChatEvent::Status {
            stage: stage.to_string(),
            data: data.clone(),
        });
    }

    fn on_delta(&mut self, text: &str) {
        self.emit(&ChatEvent::Delta {
            text: text.to_string(),
        });
    }

    fn on_sources(&mut self, sources: &Sources) {
        self.emit(&ChatEvent::Sources(sources.clone()));
    }

    fn on_suggestions(&mut self, prompts: &[String]) {
        self.emit(&ChatEvent::Suggestions {
            prompts: prompts.to_vec(),
        });
    }

    fn on_done(&mut self, conversation_id: Option<&str>) {
        self.emit(&ChatEvent::Done {
            conversation_id: conversation_id.map(str::to_string),
        });
    }

    fn on_error(&mut self, error: &StreamError) {
        self.emit(&json!({
            "type": "error",
            "code": error.error_code(),
            "message": error.to_string(),
        }));
    }
}
