//! Typed inputs of the card endpoints.

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// The kind of card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardType {
    Groupon,
    Cash,
    Discount,
    Gift,
    GeneralCoupon,
    MemberCard,
    ScenicTicket,
    MovieTicket,
    BoardingPass,
    LuckyMoney,
    MeetingTicket,
}

impl CardType {
    /// The `card_type` value, e.g. `GROUPON`.
    pub fn as_str(&self) -> &'static str {
        match self {
            CardType::Groupon => "GROUPON",
            CardType::Cash => "CASH",
            CardType::Discount => "DISCOUNT",
            CardType::Gift => "GIFT",
            CardType::GeneralCoupon => "GENERAL_COUPON",
            CardType::MemberCard => "MEMBER_CARD",
            CardType::ScenicTicket => "SCENIC_TICKET",
            CardType::MovieTicket => "MOVIE_TICKET",
            CardType::BoardingPass => "BOARDING_PASS",
            CardType::LuckyMoney => "LUCKY_MONEY",
            CardType::MeetingTicket => "MEETING_TICKET",
        }
    }

    /// The key of the type-specific object, e.g. `groupon`.
    pub fn key(&self) -> String {
        self.as_str().to_ascii_lowercase()
    }
}

/// How the card code is displayed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum CodeType {
    #[serde(rename = "CODE_TYPE_TEXT")]
    Text,
    #[serde(rename = "CODE_TYPE_BARCODE")]
    Barcode,
    #[serde(rename = "CODE_TYPE_QRCODE")]
    QrCode,
    #[serde(rename = "CODE_TYPE_ONLY_QRCODE")]
    OnlyQrCode,
    #[serde(rename = "CODE_TYPE_ONLY_BARCODE")]
    OnlyBarcode,
    #[serde(rename = "CODE_TYPE_NONE")]
    None,
}

/// Validity period of a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DateInfo {
    /// Valid between two unix timestamps (`"type": 1`).
    FixedRange {
        begin_timestamp: i64,
        end_timestamp: i64,
    },
    /// Valid for `fixed_term` days, starting `fixed_begin_term` days after
    /// the card is received (`"type": 2`).
    FixedTerm { fixed_term: u32, fixed_begin_term: u32 },
}

impl Serialize for DateInfo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut ser = serializer.serialize_struct("DateInfo", 3)?;
        match *self {
            DateInfo::FixedRange {
                begin_timestamp,
                end_timestamp,
            } => {
                ser.serialize_field("type", &1)?;
                ser.serialize_field("begin_timestamp", &begin_timestamp)?;
                ser.serialize_field("end_timestamp", &end_timestamp)?;
            }
            DateInfo::FixedTerm {
                fixed_term,
                fixed_begin_term,
            } => {
                ser.serialize_field("type", &2)?;
                ser.serialize_field("fixed_term", &fixed_term)?;
                ser.serialize_field("fixed_begin_term", &fixed_begin_term)?;
            }
        }
        ser.end()
    }
}

/// Stock of a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Sku {
    pub quantity: u64,
}

/// The `base_info` object shared by every card type.
///
/// Fields the platform documents beyond the required ones (`sub_title`,
/// `service_phone`, `get_limit`, `can_share`, `location_id_list`, ...) go
/// into `extra` and are sent as siblings of the required fields. An extra
/// field named like a required one replaces it.
#[derive(Clone, Debug, PartialEq)]
pub struct BaseInfo {
    pub logo_url: String,
    pub brand_name: String,
    pub title: String,
    pub code_type: CodeType,
    pub color: String,
    pub notice: String,
    pub description: String,
    pub sku: Sku,
    pub date_info: DateInfo,
    pub extra: Map<String, Value>,
}

/// Writes `key` unless `extra` carries a field of the same name.
fn fixed_entry<M, T>(
    map: &mut M,
    extra: &Map<String, Value>,
    key: &str,
    value: &T,
) -> Result<(), M::Error>
where
    M: SerializeMap,
    T: Serialize + ?Sized,
{
    if extra.contains_key(key) {
        return Ok(());
    }
    map.serialize_entry(key, value)
}

fn extra_entries<M: SerializeMap>(map: &mut M, extra: &Map<String, Value>) -> Result<(), M::Error> {
    for (key, value) in extra {
        map.serialize_entry(key, value)?;
    }
    Ok(())
}

impl Serialize for BaseInfo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let extra = &self.extra;
        let mut map = serializer.serialize_map(None)?;
        fixed_entry(&mut map, extra, "logo_url", &self.logo_url)?;
        fixed_entry(&mut map, extra, "brand_name", &self.brand_name)?;
        fixed_entry(&mut map, extra, "title", &self.title)?;
        fixed_entry(&mut map, extra, "code_type", &self.code_type)?;
        fixed_entry(&mut map, extra, "color", &self.color)?;
        fixed_entry(&mut map, extra, "notice", &self.notice)?;
        fixed_entry(&mut map, extra, "description", &self.description)?;
        fixed_entry(&mut map, extra, "sku", &self.sku)?;
        fixed_entry(&mut map, extra, "date_info", &self.date_info)?;
        extra_entries(&mut map, extra)?;
        map.end()
    }
}

impl BaseInfo {
    /// Add an additional documented field.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }
}

/// A card to create.
///
/// `details` holds the type-specific fields sent next to `base_info`, such as
/// `deal_detail` for a groupon or `least_cost`/`reduce_cost` for cash. A
/// detail named `base_info` replaces the typed base info.
#[derive(Clone, Debug, PartialEq)]
pub struct NewCard {
    pub card_type: CardType,
    pub base_info: BaseInfo,
    pub details: Map<String, Value>,
}

impl NewCard {
    /// Create a card with no type-specific fields.
    pub fn new(card_type: CardType, base_info: BaseInfo) -> Self {
        Self {
            card_type,
            base_info,
            details: Map::new(),
        }
    }

    /// Add a type-specific field.
    pub fn with_detail(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(name.into(), value.into());
        self
    }
}

struct TypedCard<'a> {
    base_info: &'a BaseInfo,
    details: &'a Map<String, Value>,
}

impl Serialize for TypedCard<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        fixed_entry(&mut map, self.details, "base_info", self.base_info)?;
        extra_entries(&mut map, self.details)?;
        map.end()
    }
}

impl Serialize for NewCard {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("card_type", &self.card_type)?;
        map.serialize_entry(
            &self.card_type.key(),
            &TypedCard {
                base_info: &self.base_info,
                details: &self.details,
            },
        )?;
        map.end()
    }
}

/// The editable subset of `base_info`. Absent fields are left unchanged;
/// an `extra` field named like a typed one replaces it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BaseInfoUpdate {
    pub logo_url: Option<String>,
    pub notice: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub detail: Option<String>,
    pub extra: Map<String, Value>,
}

impl Serialize for BaseInfoUpdate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let extra = &self.extra;
        let fields = [
            ("logo_url", &self.logo_url),
            ("notice", &self.notice),
            ("description", &self.description),
            ("color", &self.color),
            ("detail", &self.detail),
        ];

        let mut map = serializer.serialize_map(None)?;
        for (key, value) in fields {
            if let Some(value) = value {
                fixed_entry(&mut map, extra, key, value)?;
            }
        }
        extra_entries(&mut map, extra)?;
        map.end()
    }
}

/// Changes to an existing card.
#[derive(Clone, Debug, PartialEq)]
pub struct CardUpdate {
    pub card_type: CardType,
    pub base_info: BaseInfoUpdate,
    pub bonus_cleared: Option<String>,
    pub bonus_rules: Option<String>,
    pub balance_rules: Option<String>,
    pub prerogative: Option<String>,
}

impl CardUpdate {
    /// Create an update touching only `base_info`.
    pub fn new(card_type: CardType, base_info: BaseInfoUpdate) -> Self {
        Self {
            card_type,
            base_info,
            bonus_cleared: None,
            bonus_rules: None,
            balance_rules: None,
            prerogative: None,
        }
    }
}

#[derive(Serialize)]
struct TypedUpdate<'a> {
    base_info: &'a BaseInfoUpdate,
    #[serde(skip_serializing_if = "Option::is_none")]
    bonus_cleared: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bonus_rules: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    balance_rules: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    prerogative: Option<&'a str>,
}

/// Request body for card update.
pub(super) struct UpdateCardRequest<'a> {
    pub card_id: &'a str,
    pub update: &'a CardUpdate,
}

impl Serialize for UpdateCardRequest<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let update = self.update;
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("card_id", self.card_id)?;
        map.serialize_entry(
            &update.card_type.key(),
            &TypedUpdate {
                base_info: &update.base_info,
                bonus_cleared: update.bonus_cleared.as_deref(),
                bonus_rules: update.bonus_rules.as_deref(),
                balance_rules: update.balance_rules.as_deref(),
                prerogative: update.prerogative.as_deref(),
            },
        )?;
        map.end()
    }
}

/// Optional fields of a card QR code.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct QrCodeOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expire_seconds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_unique_code: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outer_id: Option<i64>,
}
