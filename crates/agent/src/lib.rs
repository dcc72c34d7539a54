//! Agent runtime for the Sierra Outfitters assistant.
//!
//! Each user message goes through a fixed pipeline:
//! 1. **Intent classification** (`intent`) - model labels the message with a
//!    subset of the closed [`intent::Intent`] taxonomy
//! 2. **Handlers** (`handlers`) - order lookup, product recommendation and the
//!    early-riser promo each produce a text fragment
//! 3. **Dispatch** (`dispatch`) - decides whether fragments are folded into
//!    the prompt or the raw message is passed through
//! 4. **Persona reply** (`conversation`) - final styled reply, recorded in the
//!    conversation history only when the model call succeeds
//!
//! The model is reached through [`llm::LanguageModelGateway`], which turns
//! every provider failure into a fixed apology string.

pub mod conversation;
pub mod dispatch;
pub mod handlers;
pub mod intent;
pub mod llm;
pub mod runtime;

#[cfg(test)]
pub(crate) mod test_support;
