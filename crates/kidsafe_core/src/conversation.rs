use crate::{ChatMessage, ChatOutcome, ChatRequest, SessionId, TransportFailure};

/// Chat bound to one resolved analysis.
///
/// The product name, ingredients and analysis text are a snapshot taken at
/// creation; a new analysis means a new session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationSession {
    id: SessionId,
    product_name: String,
    ingredients: String,
    analysis: String,
    messages: Vec<ChatMessage>,
    pending: bool,
}

impl ConversationSession {
    pub fn new(
        id: SessionId,
        product_name: impl Into<String>,
        ingredients: impl Into<String>,
        analysis: impl Into<String>,
    ) -> Self {
        let product_name = product_name.into();
        let greeting = ChatMessage::assistant(greeting(&product_name));
        Self {
            id,
            product_name,
            ingredients: ingredients.into(),
            analysis: analysis.into(),
            messages: vec![greeting],
            pending: false,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Appends the user turn and returns the request to send.
    ///
    /// Returns `None` without touching the log when `text` is blank or a
    /// turn is already in flight. The history in the request is the log as
    /// it was before this turn; the question travels on its own.
    pub fn submit(&mut self, text: &str) -> Option<ChatRequest> {
        let question = text.trim();
        if question.is_empty() || self.pending {
            return None;
        }

        let chat_history = self.messages.clone();
        self.messages.push(ChatMessage::user(question));
        self.pending = true;

        Some(ChatRequest {
            cereal_name: self.product_name.clone(),
            ingredients: self.ingredients.clone(),
            previous_analysis: self.analysis.clone(),
            question: question.to_string(),
            chat_history,
        })
    }

    /// Answers the pending turn. Every outcome becomes an assistant message.
    pub fn apply_reply(&mut self, result: Result<ChatOutcome, TransportFailure>) -> bool {
        if !self.pending {
            return false;
        }
        let content = match result {
            Ok(ChatOutcome::Answered(answer)) => answer,
            Ok(ChatOutcome::Rejected { error }) => {
                format!("Sorry, I encountered an error: {error}")
            }
            Err(failure) => format!("Network error: {failure}"),
        };
        self.messages.push(ChatMessage::assistant(content));
        self.pending = false;
        true
    }
}

pub fn greeting(product_name: &str) -> String {
    format!(
        "Hi! I'm here to answer any questions you have about the ingredients in {product_name}. Feel free to ask me anything!"
    )
}
