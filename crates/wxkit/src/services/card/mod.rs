//! Card (coupon and membership) service.

mod types;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::Result;
use crate::http::*;

pub use types::{
    BaseInfo, BaseInfoUpdate, CardType, CardUpdate, CodeType, DateInfo, NewCard, QrCodeOptions,
    Sku,
};

use types::UpdateCardRequest;

/// Request body for card create.
#[derive(Debug, Serialize)]
struct CreateCardRequest<'a> {
    card: &'a NewCard,
}

/// Request body for QR code create.
#[derive(Debug, Serialize)]
struct CreateQrCodeRequest<'a> {
    action_name: &'static str,
    action_info: QrActionInfo<'a>,
}

#[derive(Debug, Serialize)]
struct QrActionInfo<'a> {
    card: QrCard<'a>,
}

#[derive(Debug, Serialize)]
struct QrCard<'a> {
    code: &'a str,
    #[serde(flatten)]
    options: &'a QrCodeOptions,
}

/// Request body for the code endpoints addressed by code and optional card id.
#[derive(Debug, Serialize)]
struct CodeRequest<'a> {
    code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    card_id: Option<&'a str>,
}

/// Request body for code decrypt.
#[derive(Debug, Serialize)]
struct DecryptCodeRequest<'a> {
    encrypt_code: &'a str,
}

/// Request body for the endpoints addressed by card id.
#[derive(Debug, Serialize)]
struct CardIdRequest<'a> {
    card_id: &'a str,
}

/// Request body for batchget.
#[derive(Debug, Serialize)]
struct BatchGetRequest {
    offset: u32,
    count: u32,
}

/// Request body for modifystock.
#[derive(Debug, Serialize)]
struct ModifyStockRequest<'a> {
    card_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    increase_stock_value: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reduce_stock_value: Option<u64>,
}

/// Request body for code update.
#[derive(Debug, Serialize)]
struct UpdateCodeRequest<'a> {
    code: &'a str,
    new_code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    card_id: Option<&'a str>,
}

/// The Card service.
///
/// Obtain one from [`ServiceFactory`](crate::ServiceFactory).
///
/// # Example
///
/// ```no_run
/// use wxkit::{Credentials, ServiceFactory};
///
/// # async fn example() -> Result<(), wxkit::Error> {
/// let factory = ServiceFactory::new(Credentials::new("wxappid", "secret")?);
/// let card = factory.card().await?;
///
/// let colors = card.colors().await?;
/// println!("{}", colors["colors"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CardService {
    dispatcher: Dispatcher,
}

impl CardService {
    pub(crate) fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Returns the dispatcher, for endpoints this service does not wrap.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Get the list of IP addresses the platform sends callbacks from.
    pub async fn callback_ips(&self) -> Result<Value> {
        self.dispatcher.callback_ips().await
    }

    /// Upload an image for use as a card logo.
    ///
    /// The response carries the hosted image URL: `{"url": "http://mmbiz.qpic.cn/..."}`.
    #[instrument(skip(self, image), fields(file_name = image.file_name()))]
    pub async fn upload_image(&self, image: Media) -> Result<Value> {
        debug!("Uploading card image");
        self.dispatcher
            .send(ApiRequest::post(CARD_UPLOAD_IMAGE).file("buffer", image))
            .await
    }

    /// List the colors a card may use.
    #[instrument(skip(self))]
    pub async fn colors(&self) -> Result<Value> {
        self.dispatcher.send(ApiRequest::get(CARD_COLORS)).await
    }

    /// Create a card.
    #[instrument(skip(self, card), fields(card_type = card.card_type.as_str()))]
    pub async fn create_card(&self, card: &NewCard) -> Result<Value> {
        debug!("Creating card");
        self.dispatcher
            .send(ApiRequest::post(CARD_CREATE).json(&CreateCardRequest { card })?)
            .await
    }

    /// Create a QR code that hands out a card.
    #[instrument(skip(self, code))]
    pub async fn create_qrcode(&self, code: &str, options: &QrCodeOptions) -> Result<Value> {
        let request = CreateQrCodeRequest {
            action_name: "QR_CARD",
            action_info: QrActionInfo {
                card: QrCard { code, options },
            },
        };

        self.dispatcher
            .send(ApiRequest::post(CARD_QRCODE_CREATE).json(&request)?)
            .await
    }

    /// Mark a code as unusable.
    #[instrument(skip(self, code))]
    pub async fn unavailable_code(&self, code: &str, card_id: Option<&str>) -> Result<Value> {
        self.dispatcher
            .send(ApiRequest::post(CARD_CODE_UNAVAILABLE).json(&CodeRequest { code, card_id })?)
            .await
    }

    /// Decrypt the `encrypt_code` received from a card redirect.
    #[instrument(skip(self, encrypt_code))]
    pub async fn decrypt_code(&self, encrypt_code: &str) -> Result<Value> {
        self.dispatcher
            .send(ApiRequest::post(CARD_CODE_DECRYPT).json(&DecryptCodeRequest { encrypt_code })?)
            .await
    }

    /// Look up a code.
    #[instrument(skip(self, code))]
    pub async fn get_code(&self, code: &str, card_id: Option<&str>) -> Result<Value> {
        self.dispatcher
            .send(ApiRequest::post(CARD_CODE_GET).json(&CodeRequest { code, card_id })?)
            .await
    }

    /// Look up a card.
    #[instrument(skip(self))]
    pub async fn get_card(&self, card_id: &str) -> Result<Value> {
        self.dispatcher
            .send(ApiRequest::post(CARD_GET).json(&CardIdRequest { card_id })?)
            .await
    }

    /// List `count` card ids starting at `offset`.
    #[instrument(skip(self))]
    pub async fn batch_get_cards(&self, offset: u32, count: u32) -> Result<Value> {
        self.dispatcher
            .send(ApiRequest::post(CARD_BATCH_GET).json(&BatchGetRequest { offset, count })?)
            .await
    }

    /// Update a card.
    #[instrument(skip(self, update), fields(card_type = update.card_type.as_str()))]
    pub async fn update_card(&self, card_id: &str, update: &CardUpdate) -> Result<Value> {
        debug!("Updating card");
        self.dispatcher
            .send(ApiRequest::post(CARD_UPDATE).json(&UpdateCardRequest { card_id, update })?)
            .await
    }

    /// Increase and/or reduce the stock of a card.
    #[instrument(skip(self))]
    pub async fn modify_stock(
        &self,
        card_id: &str,
        increase_stock_value: Option<u64>,
        reduce_stock_value: Option<u64>,
    ) -> Result<Value> {
        let request = ModifyStockRequest {
            card_id,
            increase_stock_value,
            reduce_stock_value,
        };

        self.dispatcher
            .send(ApiRequest::post(CARD_MODIFY_STOCK).json(&request)?)
            .await
    }

    /// Replace a code with `new_code`.
    #[instrument(skip(self, code, new_code))]
    pub async fn update_code(
        &self,
        code: &str,
        new_code: &str,
        card_id: Option<&str>,
    ) -> Result<Value> {
        let request = UpdateCodeRequest {
            code,
            new_code,
            card_id,
        };

        self.dispatcher
            .send(ApiRequest::post(CARD_CODE_UPDATE).json(&request)?)
            .await
    }

    /// Delete a card.
    #[instrument(skip(self))]
    pub async fn delete_card(&self, card_id: &str) -> Result<Value> {
        debug!("Deleting card");
        self.dispatcher
            .send(ApiRequest::post(CARD_DELETE).json(&CardIdRequest { card_id })?)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn qrcode_body_nests_card_under_action_info() {
        let options = QrCodeOptions {
            card_id: Some("pFS7Fjg8kV1IdDz01r4SQwMkuCKc".to_string()),
            expire_seconds: Some(1800),
            ..Default::default()
        };
        let request = CreateQrCodeRequest {
            action_name: "QR_CARD",
            action_info: QrActionInfo {
                card: QrCard {
                    code: "198374613512",
                    options: &options,
                },
            },
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "action_name": "QR_CARD",
                "action_info": {
                    "card": {
                        "code": "198374613512",
                        "card_id": "pFS7Fjg8kV1IdDz01r4SQwMkuCKc",
                        "expire_seconds": 1800
                    }
                }
            })
        );
    }

    #[test]
    fn modify_stock_omits_absent_values() {
        let request = ModifyStockRequest {
            card_id: "abc",
            increase_stock_value: Some(100),
            reduce_stock_value: None,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"card_id": "abc", "increase_stock_value": 100})
        );
    }
}
