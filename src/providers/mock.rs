/*!
 * Scripted chat provider.
 *
 * Speaks the OpenAI request/response types so the markdown translator runs
 * end to end without network access. Answers tag every non-blank line of the
 * user message with `MOCK_TAG`.
 */

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::ProviderError;
use crate::providers::Provider;
use crate::providers::openai::{ChatRequest, ChatResponse};

/// Tag prepended to every non-blank line
pub const MOCK_TAG: &str = "[TRANSLATED]";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Answers with the tagged chunk
    Working,
    /// Answers with the tagged chunk wrapped in a ```markdown fence
    Fenced,
    /// Fails the request with this zero-based number, answers the others
    FailOnRequest(usize),
    /// Every request fails
    Failing,
    /// Answers with no text
    Empty,
}

/// Chat provider answering from a script, counting requests across clones
#[derive(Debug, Clone)]
pub struct MockProvider {
    behavior: MockBehavior,
    request_count: Arc<AtomicUsize>,
}

impl MockProvider {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn fenced() -> Self {
        Self::new(MockBehavior::Fenced)
    }

    pub fn fail_on_request(index: usize) -> Self {
        Self::new(MockBehavior::FailOnRequest(index))
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Tag every non-blank line, keeping blank lines where they are
    pub fn tag_lines(text: &str) -> String {
        text.lines()
            .map(|line| {
                if line.trim().is_empty() {
                    line.to_string()
                } else {
                    format!("{} {}", MOCK_TAG, line)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn simulated_failure(request_number: usize) -> ProviderError {
        ProviderError::ApiError {
            status_code: 500,
            message: format!("Simulated failure on request #{}", request_number + 1),
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    type Request = ChatRequest;
    type Response = ChatResponse;

    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        let number = self.request_count.fetch_add(1, Ordering::SeqCst);
        let tagged = Self::tag_lines(request.user_content());

        match self.behavior {
            MockBehavior::Working => Ok(ChatResponse::from_text(tagged)),
            MockBehavior::Fenced => Ok(ChatResponse::from_text(format!("```markdown\n{}\n```", tagged))),
            MockBehavior::FailOnRequest(index) if index == number => Err(Self::simulated_failure(number)),
            MockBehavior::FailOnRequest(_) => Ok(ChatResponse::from_text(tagged)),
            MockBehavior::Failing => Err(Self::simulated_failure(number)),
            MockBehavior::Empty => Ok(ChatResponse::from_text("")),
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Failing => Err(ProviderError::ConnectionError("Simulated outage".to_string())),
            _ => Ok(()),
        }
    }

    fn extract_text(response: &ChatResponse) -> String {
        response
            .choices
            .first()
            .map(|choice| choice.message.content.clone())
            .unwrap_or_default()
    }
}
