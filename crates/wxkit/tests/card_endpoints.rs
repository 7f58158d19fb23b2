//! Request shapes of the Card endpoints.

use serde_json::{Map, json};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use wxkit::services::card::{
    BaseInfo, BaseInfoUpdate, CardType, CardUpdate, CodeType, DateInfo, NewCard, QrCodeOptions,
    Sku,
};
use wxkit::{ApiUrl, CardService, Credentials, Media, ServiceFactory};

const TOKEN: &str = "CARD_TOKEN";
const CARD_ID: &str = "ph_gmt7cUVrlRk8swPwx7aDyF-pg";

/// Start a mock server that grants [`TOKEN`] and build a Card service on it.
async fn card_service() -> (MockServer, CardService) {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cgi-bin/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": TOKEN,
            "expires_in": 7200
        })))
        .mount(&server)
        .await;

    let card = ServiceFactory::new(Credentials::new("wxappid", "secret").unwrap())
        .base_url(ApiUrl::new(server.uri()).unwrap())
        .card()
        .await
        .unwrap();

    (server, card)
}

/// Expect one POST to `endpoint` carrying `body`.
async fn expect_post(server: &MockServer, endpoint: &str, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path(endpoint))
        .and(query_param("access_token", TOKEN))
        .and(body_json(body))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errcode": 0,
            "errmsg": "ok"
        })))
        .expect(1)
        .mount(server)
        .await;
}

fn groupon() -> NewCard {
    let base_info = BaseInfo {
        logo_url: "http://mmbiz.qpic.cn/mmbiz/iaL1LJM1mF9aRKPZJkmG8xXhiaHqkKSVMMWeN3hLut7X7hicFNjakmxibMLGWpXrEXB33367o7zHN0CwngnQY7zb7g/0".to_string(),
        brand_name: "海底捞".to_string(),
        title: "132元双人火锅套餐".to_string(),
        code_type: CodeType::Text,
        color: "Color010".to_string(),
        notice: "使用时向服务员出示此券".to_string(),
        description: "不可与其他优惠同享".to_string(),
        sku: Sku { quantity: 500000 },
        date_info: DateInfo::FixedRange {
            begin_timestamp: 1397577600,
            end_timestamp: 1472724261,
        },
        extra: Map::new(),
    }
    .with_field("service_phone", "020-88888888")
    .with_field("get_limit", 3);

    NewCard::new(CardType::Groupon, base_info)
        .with_detail("deal_detail", "以下锅底2选1（有菌王锅、麻辣锅）")
}

// ============================================================================
// Card Tests
// ============================================================================

#[tokio::test]
async fn test_create_card() {
    let (server, card) = card_service().await;

    Mock::given(method("POST"))
        .and(path("/card/create"))
        .and(query_param("access_token", TOKEN))
        .and(body_json(json!({
            "card": {
                "card_type": "GROUPON",
                "groupon": {
                    "base_info": {
                        "logo_url": "http://mmbiz.qpic.cn/mmbiz/iaL1LJM1mF9aRKPZJkmG8xXhiaHqkKSVMMWeN3hLut7X7hicFNjakmxibMLGWpXrEXB33367o7zHN0CwngnQY7zb7g/0",
                        "brand_name": "海底捞",
                        "title": "132元双人火锅套餐",
                        "code_type": "CODE_TYPE_TEXT",
                        "color": "Color010",
                        "notice": "使用时向服务员出示此券",
                        "description": "不可与其他优惠同享",
                        "sku": {"quantity": 500000},
                        "date_info": {
                            "type": 1,
                            "begin_timestamp": 1397577600,
                            "end_timestamp": 1472724261
                        },
                        "service_phone": "020-88888888",
                        "get_limit": 3
                    },
                    "deal_detail": "以下锅底2选1（有菌王锅、麻辣锅）"
                }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errcode": 0,
            "errmsg": "ok",
            "card_id": "p1Pj9jr90_SQRaVqYI239Ka1erkI"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let value = card.create_card(&groupon()).await.unwrap();
    assert_eq!(value["card_id"], "p1Pj9jr90_SQRaVqYI239Ka1erkI");
}

#[tokio::test]
async fn test_create_card_with_fixed_term() {
    let (server, card) = card_service().await;

    let mut new_card = groupon();
    new_card.card_type = CardType::Cash;
    new_card.base_info.date_info = DateInfo::FixedTerm {
        fixed_term: 15,
        fixed_begin_term: 0,
    };
    new_card.details = Map::new();
    let new_card = new_card
        .with_detail("least_cost", 10000)
        .with_detail("reduce_cost", 1000);

    let mut expected = serde_json::to_value(&groupon().base_info).unwrap();
    expected["date_info"] = json!({"type": 2, "fixed_term": 15, "fixed_begin_term": 0});

    expect_post(
        &server,
        "/card/create",
        json!({
            "card": {
                "card_type": "CASH",
                "cash": {
                    "base_info": expected,
                    "least_cost": 10000,
                    "reduce_cost": 1000
                }
            }
        }),
    )
    .await;

    card.create_card(&new_card).await.unwrap();
}

#[tokio::test]
async fn test_colors_uses_get() {
    let (server, card) = card_service().await;

    Mock::given(method("GET"))
        .and(path("/card/getcolors"))
        .and(query_param("access_token", TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errcode": 0,
            "errmsg": "ok",
            "colors": [{"name": "Color010", "value": "#55bd47"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let value = card.colors().await.unwrap();
    assert_eq!(value["colors"][0]["value"], "#55bd47");
}

#[tokio::test]
async fn test_get_and_batch_get() {
    let (server, card) = card_service().await;

    expect_post(&server, "/card/get", json!({"card_id": CARD_ID})).await;
    expect_post(&server, "/card/batchget", json!({"offset": 0, "count": 10})).await;

    card.get_card(CARD_ID).await.unwrap();
    card.batch_get_cards(0, 10).await.unwrap();
}

#[tokio::test]
async fn test_update_card_omits_absent_fields() {
    let (server, card) = card_service().await;

    expect_post(
        &server,
        "/card/update",
        json!({
            "card_id": CARD_ID,
            "member_card": {
                "base_info": {
                    "logo_url": "http://www.supadmin.cn/uploads/allimg/120216/1_120216214725_1.jpg",
                    "color": "Color010"
                },
                "bonus_cleared": "aaaaaaaaaaaaaa"
            }
        }),
    )
    .await;

    let mut update = CardUpdate::new(
        CardType::MemberCard,
        BaseInfoUpdate {
            logo_url: Some("http://www.supadmin.cn/uploads/allimg/120216/1_120216214725_1.jpg".to_string()),
            color: Some("Color010".to_string()),
            ..Default::default()
        },
    );
    update.bonus_cleared = Some("aaaaaaaaaaaaaa".to_string());

    card.update_card(CARD_ID, &update).await.unwrap();
}

#[tokio::test]
async fn test_modify_stock() {
    let (server, card) = card_service().await;

    expect_post(
        &server,
        "/card/modifystock",
        json!({
            "card_id": CARD_ID,
            "increase_stock_value": 1231231,
            "reduce_stock_value": 100
        }),
    )
    .await;

    card.modify_stock(CARD_ID, Some(1231231), Some(100))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_card() {
    let (server, card) = card_service().await;

    expect_post(&server, "/card/delete", json!({"card_id": CARD_ID})).await;

    card.delete_card(CARD_ID).await.unwrap();
}

#[tokio::test]
async fn test_upload_image() {
    let (server, card) = card_service().await;

    Mock::given(method("POST"))
        .and(path("/cgi-bin/media/uploadimg"))
        .and(query_param("access_token", TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": "http://mmbiz.qpic.cn/mmbiz/iaL1LJM1mF9aRKPZJkmG8xXhiaHqkKSVMMWeN3hLut7X7hicFNjakmxibMLGWpXrEXB33367o7zHN0CwngnQY7zb7g/0"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let value = card
        .upload_image(Media::new("logo.jpg", vec![0xff, 0xd8, 0xff, 0xe0]))
        .await
        .unwrap();
    assert!(value["url"].as_str().unwrap().starts_with("http://mmbiz.qpic.cn"));

    let requests = server.received_requests().await.unwrap();
    let upload = requests
        .iter()
        .find(|request| request.url.path() == "/cgi-bin/media/uploadimg")
        .unwrap();
    let body = String::from_utf8_lossy(&upload.body);
    assert!(body.contains("name=\"buffer\""));
    assert!(body.contains("filename=\"logo.jpg\""));
}

// ============================================================================
// Code Tests
// ============================================================================

#[tokio::test]
async fn test_create_qrcode() {
    let (server, card) = card_service().await;

    expect_post(
        &server,
        "/card/qrcode/create",
        json!({
            "action_name": "QR_CARD",
            "action_info": {
                "card": {
                    "code": "198374613512",
                    "card_id": "pFS7Fjg8kV1IdDz01r4SQwMkuCKc",
                    "openid": "oFS7Fjl0WsZ9AMZqrI80nbIq8xrA",
                    "expire_seconds": 1800,
                    "is_unique_code": false,
                    "outer_id": 1
                }
            }
        }),
    )
    .await;

    let options = QrCodeOptions {
        card_id: Some("pFS7Fjg8kV1IdDz01r4SQwMkuCKc".to_string()),
        openid: Some("oFS7Fjl0WsZ9AMZqrI80nbIq8xrA".to_string()),
        expire_seconds: Some(1800),
        is_unique_code: Some(false),
        outer_id: Some(1),
    };
    card.create_qrcode("198374613512", &options).await.unwrap();
}

#[tokio::test]
async fn test_code_endpoints() {
    let (server, card) = card_service().await;

    expect_post(
        &server,
        "/card/code/unavailable",
        json!({"code": "12312313"}),
    )
    .await;
    expect_post(
        &server,
        "/card/code/get",
        json!({"code": "110201201245", "card_id": CARD_ID}),
    )
    .await;
    expect_post(
        &server,
        "/card/code/update",
        json!({"code": "12345678", "new_code": "3495739475", "card_id": CARD_ID}),
    )
    .await;

    card.unavailable_code("12312313", None).await.unwrap();
    card.get_code("110201201245", Some(CARD_ID)).await.unwrap();
    card.update_code("12345678", "3495739475", Some(CARD_ID))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_decrypt_code() {
    let (server, card) = card_service().await;

    Mock::given(method("POST"))
        .and(path("/card/code/decrypt"))
        .and(query_param("access_token", TOKEN))
        .and(body_json(json!({
            "encrypt_code": "XXIzTtMqCxwOaawoE91+VJdsFmv7b8g0VZIZkqf4GWA60Fzpc8ksZ/5ZZ0DVkXdE"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errcode": 0,
            "errmsg": "ok",
            "code": "751234212312"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let value = card
        .decrypt_code("XXIzTtMqCxwOaawoE91+VJdsFmv7b8g0VZIZkqf4GWA60Fzpc8ksZ/5ZZ0DVkXdE")
        .await
        .unwrap();
    assert_eq!(value["code"], "751234212312");
}

#[tokio::test]
async fn test_remote_error_from_card_endpoint() {
    let (server, card) = card_service().await;

    Mock::given(method("POST"))
        .and(path("/card/get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errcode": 40056,
            "errmsg": "invalid serial code"
        })))
        .mount(&server)
        .await;

    let err = card.get_card(CARD_ID).await.unwrap_err();
    let remote = err.as_remote().unwrap();
    assert_eq!(remote.code, 40056);
    assert_eq!(err.to_string(), "remote error: 40056: invalid serial code");
}

#[tokio::test]
async fn test_extra_fields_sent_once() {
    let (server, card) = card_service().await;

    Mock::given(method("POST"))
        .and(path("/card/create"))
        .and(query_param("access_token", TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errcode": 0,
            "errmsg": "ok",
            "card_id": "p1Pj9jr90_SQRaVqYI239Ka1erkI"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut new_card = groupon();
    new_card.base_info = new_card.base_info.with_field("title", "88元单人套餐");
    card.create_card(&new_card).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let create = requests
        .iter()
        .find(|request| request.url.path() == "/card/create")
        .unwrap();
    let body = String::from_utf8(create.body.clone()).unwrap();

    for key in ["\"card\"", "\"groupon\"", "\"base_info\"", "\"title\"", "\"deal_detail\""] {
        assert_eq!(body.matches(key).count(), 1, "{key} in {body}");
    }
    let value: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(value["card"]["groupon"]["base_info"]["title"], "88元单人套餐");
}
