use crate::core::error::AgentError;
use crate::providers::base_client::BaseApiClient;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_CITY: &str = "New York";

#[derive(Deserialize)]
struct WeatherResponse {
    main: MainReading,
    weather: Vec<Condition>,
}

#[derive(Deserialize)]
struct MainReading {
    temp: f64,
}

#[derive(Deserialize)]
struct Condition {
    description: String,
}

/// Current-conditions lookup against an OpenWeatherMap-style endpoint.
#[derive(Clone)]
pub struct WeatherClient {
    client: BaseApiClient,
    api_key: Option<String>,
}

impl WeatherClient {
    pub fn new(
        endpoint: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, AgentError> {
        Ok(Self {
            client: BaseApiClient::new(endpoint, None, timeout)?,
            api_key,
        })
    }

    /// One-line summary for `city`. Every failure maps to
    /// [`AgentError::WeatherUnavailable`].
    pub async fn current(&self, city: &str) -> Result<String, AgentError> {
        let key = self.api_key.as_deref().unwrap_or_default();
        let query = [("q", city), ("appid", key), ("units", "metric")];

        let response = self.client.get("weather", &query).await.map_err(|e| {
            tracing::warn!(error = %e, city, "weather request failed");
            AgentError::WeatherUnavailable
        })?;

        if response.status() != reqwest::StatusCode::OK {
            tracing::warn!(status = %response.status(), city, "weather lookup rejected");
            return Err(AgentError::WeatherUnavailable);
        }

        let body: WeatherResponse = response.json().await.map_err(|e| {
            tracing::warn!(error = %e, "unexpected weather payload");
            AgentError::WeatherUnavailable
        })?;

        let description = body
            .weather
            .into_iter()
            .next()
            .map(|c| c.description)
            .ok_or(AgentError::WeatherUnavailable)?;

        Ok(format!(
            "Weather in {}: {}°C, {}",
            city, body.main.temp, description
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> WeatherClient {
        WeatherClient::new(
            server.uri(),
            Some("wkey".to_string()),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn formats_temperature_and_description() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "Paris"))
            .and(query_param("appid", "wkey"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "main": {"temp": 18.5, "humidity": 40},
                "weather": [{"main": "Clouds", "description": "broken clouds"}]
            })))
            .mount(&server)
            .await;

        let summary = client(&server).current("Paris").await.unwrap();
        assert_eq!(summary, "Weather in Paris: 18.5°C, broken clouds");
    }

    #[tokio::test]
    async fn non_200_yields_fixed_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "cod": "404", "message": "city not found"
            })))
            .mount(&server)
            .await;

        let err = client(&server).current("Atlantis").await.unwrap_err();
        assert!(matches!(err, AgentError::WeatherUnavailable));
        assert_eq!(
            err.to_string(),
            "Sorry, I couldn't fetch the weather information."
        );
    }

    #[tokio::test]
    async fn unreachable_endpoint_yields_fixed_failure() {
        // Bind then drop a listener so the port is known to be closed.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let client = WeatherClient::new(
            format!("http://127.0.0.1:{}", port),
            Some("wkey".to_string()),
            Duration::from_secs(5),
        )
        .unwrap();

        let err = client.current("Paris").await.unwrap_err();
        assert!(matches!(err, AgentError::WeatherUnavailable));
        assert_eq!(
            err.to_string(),
            "Sorry, I couldn't fetch the weather information."
        );
    }

    #[tokio::test]
    async fn malformed_payload_yields_fixed_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"main": {}})))
            .mount(&server)
            .await;

        let err = client(&server).current("Paris").await.unwrap_err();
        assert!(matches!(err, AgentError::WeatherUnavailable));
    }
}
