use crate::domain::interface::*;
use crate::error::*;
use async_trait::async_trait;

#[derive(Debug)]
pub enum HttpClientError {
    HttpError,
    InvalidUrl,
    InvalidHeader,
}

impl IServiceError for HttpClientError {
    fn error_type(&self) -> String {
        use HttpClientError::*;

        match self {
            HttpError => "http_error",
            InvalidUrl => "invalid_url",
            InvalidHeader => "invalid_header",
        }
        .to_string()
    }

    fn status_code(&self) -> http::StatusCode {
        http::StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> ServiceError {
        ServiceError::new(HttpClientError::HttpError, err)
    }
}

impl From<url::ParseError> for ServiceError {
    fn from(err: url::ParseError) -> ServiceError {
        ServiceError::new(HttpClientError::InvalidUrl, err)
    }
}

impl From<reqwest::header::InvalidHeaderValue> for ServiceError {
    fn from(err: reqwest::header::InvalidHeaderValue) -> ServiceError {
        ServiceError::new(HttpClientError::InvalidHeader, err)
    }
}

#[derive(Clone, Default)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> HttpClient {
        HttpClient {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl IHttpClient for HttpClient {
    async fn get(
        &self,
        url: &str,
        header: Option<reqwest::header::HeaderMap>,
    ) -> Result<reqwest::Response> {
        let mut req = self.client.get(url);
        if let Some(h) = header {
            req = req.headers(h);
        }
        let resp = req.send().await?.error_for_status()?;

        Ok(resp)
    }
}
