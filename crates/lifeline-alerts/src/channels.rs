use std::future::Future;
use std::time::Duration;

use serde_json::json;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

const PUSHBULLET_URL: &str = "https://api.pushbullet.com";
const TWILIO_URL: &str = "https://api.twilio.com";

#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("provider request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider rejected the request ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Channel A: one batched call-out reaching every recipient at once.
pub trait BroadcastChannel: Send + Sync {
    fn send_to_all(
        &self,
        numbers: &[String],
        body: &str,
    ) -> impl Future<Output = Result<(), ChannelError>> + Send;
}

/// Channel B: one call-out per recipient.
pub trait SmsChannel: Send + Sync {
    fn send_sms(
        &self,
        number: &str,
        body: &str,
    ) -> impl Future<Output = Result<(), ChannelError>> + Send;
}

fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .unwrap_or_default()
}

async fn check_status(resp: reqwest::Response) -> Result<(), ChannelError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(());
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ChannelError::Rejected {
        status: status.as_u16(),
        body,
    })
}

/// Pushbullet `/v2/texts` client: sends one SMS through a paired device to a
/// list of addresses in a single request.
#[derive(Clone)]
pub struct PushbulletClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
    device_iden: String,
}

impl PushbulletClient {
    pub fn new(access_token: impl Into<String>, device_iden: impl Into<String>) -> Self {
        Self {
            http: http_client(),
            base_url: PUSHBULLET_URL.to_string(),
            access_token: access_token.into(),
            device_iden: device_iden.into(),
        }
    }
}

impl BroadcastChannel for PushbulletClient {
    async fn send_to_all(&self, numbers: &[String], body: &str) -> Result<(), ChannelError> {
        let payload = json!({
            "data": {
                "target_device_iden": self.device_iden,
                "addresses": numbers,
                "message": body,
            }
        });

        let resp = self
            .http
            .post(format!("{}/v2/texts", self.base_url))
            .header("Access-Token", &self.access_token)
            .json(&payload)
            .send()
            .await?;

        check_status(resp).await?;
        debug!("Pushbullet broadcast accepted for {} numbers", numbers.len());
        Ok(())
    }
}

/// Twilio Messages API client: one request per recipient, form-encoded,
/// authenticated with account SID + auth token.
#[derive(Clone)]
pub struct TwilioClient {
    http: reqwest::Client,
    base_url: String,
    account_sid: String,
    auth_token: String,
    from_number: String,
}

impl TwilioClient {
    pub fn new(
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
        from_number: impl Into<String>,
    ) -> Self {
        Self {
            http: http_client(),
            base_url: TWILIO_URL.to_string(),
            account_sid: account_sid.into(),
            auth_token: auth_token.into(),
            from_number: from_number.into(),
        }
    }
}

impl SmsChannel for TwilioClient {
    async fn send_sms(&self, number: &str, body: &str) -> Result<(), ChannelError> {
        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url, self.account_sid
        );

        let resp = self
            .http
            .post(url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[
                ("To", number),
                ("From", self.from_number.as_str()),
                ("Body", body),
            ])
            .send()
            .await?;

        check_status(resp).await?;
        debug!("Twilio SMS accepted for {}", number);
        Ok(())
    }
}
