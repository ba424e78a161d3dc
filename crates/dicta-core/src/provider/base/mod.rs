//! Base implementations and shared request logic for provider backends.

mod openai_compatible;

pub(crate) use openai_compatible::{Auth, chat_request, transcribe_request};
