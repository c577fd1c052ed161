use crate::core::error::AgentError;
use crate::providers::base_client::BaseApiClient;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://en.wikipedia.org/api/rest_v1";
pub const SUMMARY_SENTENCES: usize = 2;

#[derive(Deserialize)]
struct PageSummary {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    extract: String,
}

/// Short topic summaries from the Wikipedia REST API.
#[derive(Clone)]
pub struct WikiClient {
    client: BaseApiClient,
}

impl WikiClient {
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, AgentError> {
        Ok(Self {
            client: BaseApiClient::new(endpoint, None, timeout)?,
        })
    }

    pub async fn summary(&self, query: &str) -> Result<String, AgentError> {
        let title = query.trim().replace(' ', "_");
        let response = self
            .client
            .get_segments(&["page", "summary", title.as_str()])
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AgentError::Api(format!(
                "No Wikipedia page found for '{}'",
                query
            )));
        }
        if !status.is_success() {
            tracing::warn!(%status, query, "encyclopedia lookup failed");
            return Err(AgentError::Api(format!(
                "Encyclopedia service returned {}",
                status
            )));
        }

        let page: PageSummary = response.json().await?;
        if page.kind == "disambiguation" {
            return Err(AgentError::Api(format!(
                "'{}' may refer to several pages; please be more specific",
                query
            )));
        }
        if page.extract.trim().is_empty() {
            return Err(AgentError::Api(format!("No summary available for '{}'", query)));
        }

        Ok(first_sentences(&page.extract, SUMMARY_SENTENCES))
    }
}

/// Keeps the first `n` sentences of `text`. A sentence ends at `.`, `!` or
/// `?` followed by whitespace or the end of the text.
pub fn first_sentences(text: &str, n: usize) -> String {
    let text = text.trim();
    let mut seen = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if matches!(ch, '.' | '!' | '?') {
            let at_boundary = chars.peek().is_none_or(|(_, next)| next.is_whitespace());
            if at_boundary {
                seen += 1;
                if seen == n {
                    return text[..idx + ch.len_utf8()].to_string();
                }
            }
        }
    }

    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> WikiClient {
        WikiClient::new(server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn keeps_first_two_sentences() {
        let text = "Rust is a language. It is fast! Is it safe? Yes.";
        assert_eq!(first_sentences(text, 2), "Rust is a language. It is fast!");
    }

    #[test]
    fn decimal_points_do_not_end_sentences() {
        let text = "Version 1.5 shipped in 2015. It was stable. More text.";
        assert_eq!(
            first_sentences(text, 2),
            "Version 1.5 shipped in 2015. It was stable."
        );
    }

    #[test]
    fn short_text_is_returned_whole() {
        assert_eq!(first_sentences("Only one sentence.", 2), "Only one sentence.");
        assert_eq!(first_sentences("no punctuation", 2), "no punctuation");
    }

    #[tokio::test]
    async fn fetches_summary_for_spaced_title() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page/summary/Alan_Turing"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "type": "standard",
                "title": "Alan Turing",
                "extract": "Alan Turing was a mathematician. He was born in 1912. He died in 1954."
            })))
            .mount(&server)
            .await;

        let summary = client(&server).summary("Alan Turing").await.unwrap();
        assert_eq!(
            summary,
            "Alan Turing was a mathematician. He was born in 1912."
        );
    }

    #[tokio::test]
    async fn missing_page_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client(&server).summary("Nonexistent topic").await.unwrap_err();
        assert!(err.to_string().starts_with("Error: No Wikipedia page found"));
    }

    #[tokio::test]
    async fn disambiguation_page_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page/summary/Mercury"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "type": "disambiguation",
                "extract": "Mercury may refer to:"
            })))
            .mount(&server)
            .await;

        let err = client(&server).summary("Mercury").await.unwrap_err();
        assert!(err.to_string().contains("more specific"));
    }
}
