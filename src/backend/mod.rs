pub mod openai;

use anyhow::Result;
use futures_util::future::BoxFuture;

/// Narrow capability surface of the generative backend: one method per
/// response path, so the dispatcher can run against a recording fake.
pub trait Backend: Send + Sync {
    /// One completion of `prompt` from `model`; returns the generated text.
    fn complete<'a>(&'a self, model: &'a str, prompt: &'a str) -> BoxFuture<'a, Result<String>>;

    /// One 1024x1024 image synthesized from `prompt`; returns its URL.
    fn generate_image<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String>>;

    /// One 1024x1024 variation of an RGBA PNG; returns its URL.
    fn vary_image(&self, png: Vec<u8>) -> BoxFuture<'_, Result<String>>;
}
