use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::{
    error::SearchError,
    model::{Country, SearchRequest},
    search::{COUNTRIES_BASE_URL, countries_search_url, decode_countries, sort_by_population_desc},
};

use super::CountryCatalog;

/// Client for `restcountries.com`. No key required.
#[derive(Debug, Clone)]
pub struct RestCountriesClient {
    base_url: String,
    http: Client,
}

impl RestCountriesClient {
    pub fn new() -> Self {
        Self::with_base_url(COUNTRIES_BASE_URL.to_string())
    }

    pub fn with_base_url(base_url: String) -> Self {
        Self {
            base_url,
            http: Client::new(),
        }
    }
}

impl Default for RestCountriesClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CountryCatalog for RestCountriesClient {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<Country>, SearchError> {
        let url = countries_search_url(&self.base_url, request)?;

        debug!(%url, "searching countries");

        let res = self.http.get(url).send().await?;
        let status = res.status();
        let body = res.text().await?;

        debug!(%status, bytes = body.len(), "countries response");

        let mut countries = decode_countries(status, &body)?;
        sort_by_population_desc(&mut countries);
        Ok(countries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model::SearchMode, search::tests::country_json};
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    /// Serves one canned response and hands back the request line it saw.
    async fn serve_once(
        status: &'static str,
        body: String,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}/v3.1/", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();

            let request = String::from_utf8_lossy(&request).into_owned();
            request.lines().next().unwrap_or_default().to_string()
        });

        (base_url, handle)
    }

    #[tokio::test]
    async fn search_returns_most_populous_first() {
        let body = format!(
            "[{},{},{}]",
            country_json("Aland", 5),
            country_json("Brazil", 500),
            country_json("Chile", 50)
        );
        let (base_url, server) = serve_once("200 OK", body).await;
        let client = RestCountriesClient::with_base_url(base_url);

        let request = SearchRequest::new(SearchMode::Language, "portuguese");
        let countries = client.search(&request).await.unwrap();

        let names: Vec<_> = countries.iter().map(|c| c.name.common.as_str()).collect();
        assert_eq!(names, ["Brazil", "Chile", "Aland"]);

        let request_line = server.await.unwrap();
        assert!(request_line.starts_with("GET /v3.1/lang/portuguese?fields=name%2Ccapital"));
    }

    #[tokio::test]
    async fn search_not_found_is_no_results() {
        let body = r#"{"status":404,"message":"Not Found"}"#.to_string();
        let (base_url, _server) = serve_once("404 Not Found", body).await;
        let client = RestCountriesClient::with_base_url(base_url);

        let request = SearchRequest::new(SearchMode::Name, "atlantis");
        let err = client.search(&request).await.unwrap_err();

        assert!(err.is_no_results());
        assert_eq!(err.user_message(), "No results");
    }

    #[tokio::test]
    async fn search_server_error_is_not_no_results() {
        let (base_url, _server) = serve_once("502 Bad Gateway", String::new()).await;
        let client = RestCountriesClient::with_base_url(base_url);

        let request = SearchRequest::new(SearchMode::Name, "boom");
        let err = client.search(&request).await.unwrap_err();

        assert!(matches!(err, SearchError::Status(status) if status.as_u16() == 502));
        assert!(!err.is_no_results());
    }
}
