use async_trait::async_trait;
use reqwest::Url;

use crate::config::EmailConfig;

/// Outbound mail seam. Held as `Arc<dyn EmailClient>` in `AppState` so
/// handlers never know which transport is behind it.
#[async_trait]
pub trait EmailClient: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()>;
}

/// Postmark-style HTTP sender: POST {base_url}/email with a server token.
pub struct HttpEmailClient {
    http: reqwest::Client,
    base_url: String,
    sender: String,
    api_token: String,
}

const AUTH_HEADER: &str = "X-Postmark-Server-Token";

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "PascalCase")]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text_body: &'a str,
}

impl HttpEmailClient {
    pub fn new(config: &EmailConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            sender: config.sender.clone(),
            api_token: config.api_token.clone(),
        }
    }
}

#[async_trait]
impl EmailClient for HttpEmailClient {
    async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()> {
        let url = Url::parse(&self.base_url)?.join("/email")?;
        let request_body = SendEmailRequest {
            from: &self.sender,
            to,
            subject,
            text_body: body,
        };

        self.http
            .post(url)
            .header(AUTH_HEADER, &self.api_token)
            .json(&request_body)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_uses_pascal_case_keys() {
        let body = SendEmailRequest {
            from: "no-reply@storefront.local",
            to: "user@example.com",
            subject: "Password reset token",
            text_body: "hello",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["From"], "no-reply@storefront.local");
        assert_eq!(json["To"], "user@example.com");
        assert_eq!(json["TextBody"], "hello");
    }
}
