//! The chat widget: reads the input, renders the conversation, and asks the
//! backend.
//!
//! A submission can run in one go with [`ChatWidget::submit_question`], or in
//! three steps when the caller wants other events handled while a request is
//! in flight:
//!
//! 1. [`ChatWidget::begin_submission`] trims the input, renders the user's
//!    message and clears the field;
//! 2. [`PendingRequest::dispatch`] performs the network call without
//!    borrowing the widget;
//! 3. [`ChatWidget::finish_submission`] renders the answer or the fallback.
//!
//! Nothing serializes overlapping submissions. Answers are rendered in the
//! order their requests resolve.

use std::sync::Arc;

use crate::client::ChatBackend;
use crate::error::ChatError;
use crate::state::{Message, Sender};
use crate::view::{ChatView, InputField};

pub const WELCOME_MESSAGE: &str =
    "Hello! I am your Kubernetes AI Assistant. How can I help you today?";

pub const FALLBACK_MESSAGE: &str = "Sorry, something went wrong. Please try again.";

/// A question that has been rendered and is waiting on the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    id: u64,
    question: String,
}

impl PendingRequest {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    /// Send the question and wait for the outcome.
    pub async fn dispatch(self, backend: Arc<dyn ChatBackend>) -> Answer {
        tracing::info!(request = self.id, "dispatching question");
        let outcome = backend.ask(&self.question).await;
        Answer {
            id: self.id,
            outcome,
        }
    }
}

/// Outcome of one dispatched request.
#[derive(Debug)]
pub struct Answer {
    pub id: u64,
    pub outcome: Result<String, ChatError>,
}

pub struct ChatWidget<V, I> {
    view: V,
    input: I,
    backend: Arc<dyn ChatBackend>,
    started: bool,
    next_id: u64,
}

impl<V: ChatView, I: InputField> ChatWidget<V, I> {
    pub fn new(view: V, input: I, backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            view,
            input,
            backend,
            started: false,
            next_id: 1,
        }
    }

    /// Render the welcome message. Only the first call has an effect.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.append_message(WELCOME_MESSAGE, Sender::Assistant);
    }

    pub fn append_message(&mut self, text: impl Into<String>, sender: Sender) {
        tracing::trace!(sender = sender.as_str(), "appending message");
        self.view.append(Message::new(text, sender));
        self.view.scroll_to_end();
    }

    /// Render the trimmed input as a user message and clear the field.
    ///
    /// Returns `None` without touching anything when the input is blank.
    pub fn begin_submission(&mut self) -> Option<PendingRequest> {
        let question = self.input.value().trim().to_string();
        if question.is_empty() {
            return None;
        }

        self.append_message(question.clone(), Sender::User);
        self.input.clear();

        let id = self.next_id;
        self.next_id += 1;
        Some(PendingRequest { id, question })
    }

    /// Render the backend's answer, or the fallback if the request failed.
    pub fn finish_submission(&mut self, answer: Answer) {
        match answer.outcome {
            Ok(response) => {
                tracing::info!(request = answer.id, "answer received");
                self.append_message(response, Sender::Assistant);
            }
            Err(err) => {
                tracing::error!(request = answer.id, kind = err.kind(), error = %err, "chat request failed");
                self.append_message(FALLBACK_MESSAGE, Sender::Assistant);
            }
        }
    }

    /// Submit the current input and wait for the answer.
    pub async fn submit_question(&mut self) {
        let Some(pending) = self.begin_submission() else {
            return;
        };
        let answer = pending.dispatch(self.backend()).await;
        self.finish_submission(answer);
    }

    pub fn backend(&self) -> Arc<dyn ChatBackend> {
        Arc::clone(&self.backend)
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }
}
