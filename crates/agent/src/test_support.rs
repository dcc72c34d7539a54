use std::collections::VecDeque;
use std::io;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use sierra_core::ConversationTurn;

use crate::handlers::order::CredentialPrompt;
use crate::llm::LlmClient;

#[derive(Clone, Debug)]
pub struct RecordedCall {
    pub messages: Vec<ConversationTurn>,
    pub temperature: f32,
}

/// Replays canned replies in order; `None` entries and an exhausted script
/// behave like a provider outage.
#[derive(Default)]
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<Option<String>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedLlm {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_outages(replies.into_iter().map(|reply| Some(reply.into())))
    }

    pub fn with_outages<I>(replies: I) -> Self
    where
        I: IntoIterator<Item = Option<String>>,
    {
        Self { replies: Mutex::new(replies.into_iter().collect()), calls: Mutex::default() }
    }

    pub fn failing() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn complete(&self, messages: &[ConversationTurn], temperature: f32) -> Result<String> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall { messages: messages.to_vec(), temperature });
        }
        let next = self.replies.lock().ok().and_then(|mut replies| replies.pop_front()).flatten();
        next.ok_or_else(|| anyhow!("scripted provider outage"))
    }
}

#[derive(Default)]
pub struct ScriptedPrompt {
    answers: Mutex<VecDeque<String>>,
    questions: Mutex<Vec<String>>,
}

impl ScriptedPrompt {
    pub fn new<const N: usize>(answers: [&str; N]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().map(|answer| answer.to_string()).collect()),
            questions: Mutex::default(),
        }
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().map(|questions| questions.clone()).unwrap_or_default()
    }
}

impl CredentialPrompt for ScriptedPrompt {
    fn ask(&self, question: &str) -> io::Result<String> {
        if let Ok(mut questions) = self.questions.lock() {
            questions.push(question.to_string());
        }
        self.answers
            .lock()
            .ok()
            .and_then(|mut answers| answers.pop_front())
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no scripted answer"))
    }
}
