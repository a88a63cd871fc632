//! [`Llm`]-related implementations.

#[cfg(feature = "gemini")]
pub mod gemini;

use derive_more::{Display, Error as StdError, From};

#[cfg(feature = "gemini")]
pub use self::gemini::Gemini;

/// Text generation operation performed by a large language model.
pub use common::Handler as Llm;

#[cfg(doc)]
use common::operations::Perform;

/// Prompt to [`Perform`] with an [`Llm`].
#[derive(Clone, Debug, Display, From)]
#[from(String, &str)]
pub struct Prompt(String);

impl Prompt {
    /// Returns the text of this [`Prompt`].
    #[must_use]
    pub fn text(&self) -> &str {
        &self.0
    }
}

/// [`Llm`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// [`Llm`] is not configured to be called.
    #[display("text generation is not configured")]
    #[from(ignore)]
    Unconfigured,

    /// Request to the [`Llm`] failed or timed out.
    #[cfg(feature = "gemini")]
    #[display("text generation request failed: {_0}")]
    Request(reqwest::Error),

    /// [`Llm`] returned no candidates.
    #[display("text generation returned no candidates")]
    #[from(ignore)]
    NoCandidates,

    /// [`Llm`] returned a candidate without any text.
    #[display("text generation returned empty text")]
    #[from(ignore)]
    EmptyText,
}
