/*!
 * Provider implementations for chat completion services.
 *
 * - `openai`: any OpenAI-compatible `/chat/completions` endpoint
 * - `mock`: scripted provider used by the tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for all LLM providers
///
/// The markdown translator is generic over this trait, so the HTTP client and
/// the scripted test provider are interchangeable.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// The request type for this provider
    type Request: Send + Sync;

    /// The response type for this provider
    type Response: Send + Sync;

    /// Complete a request using this provider
    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError>;

    /// Test the connection to the provider
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Extract text from the provider response
    fn extract_text(response: &Self::Response) -> String;
}

pub mod mock;
pub mod openai;
