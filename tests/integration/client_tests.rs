// Client operation tests against the scripted transport

use crate::support::{
    self, body_json, header, ScriptedTransport, ACCOUNT_ID, API_KEY, BASE_URL,
};
use chrono::{TimeZone, Utc};
use oanda_client::model::{
    AccountId, Instrument, Order, OrderId, OrderType, Price, TimeInForce, TradeId, Units,
};
use oanda_client::oanda::TransportError;
use oanda_client::OandaError;
use reqwest::{Method, StatusCode};
use rust_decimal_macros::dec;

const ORDERS_BODY: &str = r#"{
    "orders": [{
        "id": "21",
        "type": "LIMIT",
        "instrument": "EUR_USD",
        "units": "1000",
        "price": "1.08500",
        "timeInForce": "GTC",
        "createTime": "2024-03-01T08:00:00.000000000Z",
        "state": "PENDING",
        "positionFill": "DEFAULT",
        "triggerCondition": "DEFAULT"
    }],
    "lastTransactionID": "22"
}"#;

fn account_body(id: &str, alias: &str) -> String {
    format!(
        r#"{{"account":{{"id":"{id}","alias":"{alias}","currency":"JPY","balance":"100000.0",
        "pl":"0","unrealizedPL":"0","marginUsed":"0","marginAvailable":"100000.0",
        "marginRate":"0.04","openTradeCount":0,"openPositionCount":0,"pendingOrderCount":0}},
        "lastTransactionID":"1"}}"#
    )
}

#[tokio::test]
async fn test_list_orders_request_and_decoding() {
    let transport = ScriptedTransport::new();
    transport.respond(200, ORDERS_BODY);

    let orders = support::client(&transport).list_orders().await.unwrap();

    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].id, Some(OrderId::from("21")));
    assert_eq!(orders[0].order_type, OrderType::Limit);
    assert_eq!(orders[0].units, Some(Units(1000)));
    assert_eq!(orders[0].price, Some(Price::new(dec!(1.085))));

    let request = transport.last_request();
    assert_eq!(request.method, Method::GET);
    assert_eq!(
        request.url,
        format!("{}/v3/accounts/{}/orders", BASE_URL, ACCOUNT_ID)
    );
    assert_eq!(
        header(&request, "authorization"),
        Some(format!("Bearer {}", API_KEY).as_str())
    );
    assert_eq!(header(&request, "content-type"), Some("application/json"));
    assert_eq!(header(&request, "accept-datetime-format"), Some("RFC3339"));
    assert!(request.body.is_none());
}

#[tokio::test]
async fn test_get_order_not_found() {
    let transport = ScriptedTransport::new();
    transport.respond(404, r#"{"errorMessage":"no such order"}"#);

    let err = support::client(&transport)
        .get_order(&OrderId::from("99"))
        .await
        .unwrap_err();

    match err {
        OandaError::UnexpectedStatus {
            operation,
            status,
            body,
        } => {
            assert_eq!(operation, "get_order");
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(body, r#"{"errorMessage":"no such order"}"#);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(
        transport.last_request().url,
        format!("{}/v3/accounts/{}/orders/99", BASE_URL, ACCOUNT_ID)
    );
}

#[tokio::test]
async fn test_malformed_units_is_decode_error() {
    let transport = ScriptedTransport::new();
    transport.respond(200, &ORDERS_BODY.replace(r#""units": "1000""#, r#""units": "abc""#));

    let err = support::client(&transport).list_orders().await.unwrap_err();
    assert!(matches!(
        err,
        OandaError::Decode {
            operation: Some("list_orders"),
            ref field,
            ..
        } if field == "units"
    ));
    assert!(err.to_string().starts_with("list_orders: "));
}

#[tokio::test]
async fn test_decode_errors_name_their_operation() {
    let transport = ScriptedTransport::new();
    transport.respond(200, r#"{"order":{"id":"7","type":"LIMIT","price":"one"}}"#);
    transport.respond(200, r#"{"trades":"none"}"#);
    transport.respond(200, r#"{"orderBook":{"instrument":"USD_JPY","time":"now","price":"1"}}"#);

    let client = support::client(&transport);
    let errors = [
        client.get_order(&OrderId::from("7")).await.unwrap_err(),
        client.list_open_trades().await.unwrap_err(),
        client
            .get_order_book(&Instrument::UsdJpy, None)
            .await
            .unwrap_err(),
    ];

    let operations: Vec<_> = errors
        .iter()
        .map(|err| match err {
            OandaError::Decode { operation, .. } => *operation,
            other => panic!("unexpected error: {other:?}"),
        })
        .collect();
    assert_eq!(
        operations,
        vec![
            Some("get_order"),
            Some("list_open_trades"),
            Some("get_order_book")
        ]
    );
}

#[tokio::test]
async fn test_malformed_json_is_decode_error() {
    let transport = ScriptedTransport::new();
    transport.respond(200, "<html>maintenance</html>");

    let err = support::client(&transport)
        .list_open_trades()
        .await
        .unwrap_err();
    assert_eq!(err.error_type(), "decode_error");
}

#[tokio::test]
async fn test_transport_failure_carries_operation() {
    let transport = ScriptedTransport::new();
    transport.fail(TransportError::Timeout);

    let err = support::client(&transport)
        .cancel_order(&OrderId::from("21"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        OandaError::Transport {
            operation: "cancel_order",
            ..
        }
    ));
}

#[tokio::test]
async fn test_create_order_expects_created() {
    let transport = ScriptedTransport::new();
    transport.respond(201, r#"{"orderCreateTransaction":{"id":"30"}}"#);

    let order = Order::new(OrderType::Limit, Instrument::UsdJpy, Units(-100))
        .with_price(Price::new(dec!(150.25)))
        .good_till(Utc.with_ymd_and_hms(2024, 3, 3, 0, 0, 0).unwrap());
    support::client(&transport).create_order(&order).await.unwrap();

    let request = transport.last_request();
    assert_eq!(request.method, Method::POST);
    assert_eq!(
        request.url,
        format!("{}/v3/accounts/{}/orders", BASE_URL, ACCOUNT_ID)
    );
    let body = body_json(&request);
    assert_eq!(body["order"]["type"], "LIMIT");
    assert_eq!(body["order"]["instrument"], "USD_JPY");
    assert_eq!(body["order"]["units"], "-100");
    assert_eq!(body["order"]["price"], "150.2500000");
    assert_eq!(body["order"]["timeInForce"], "GTD");
    assert_eq!(body["order"]["gtdTime"], "2024-03-03T00:00:00.000000000Z");
}

#[tokio::test]
async fn test_create_order_rejects_ok_status() {
    let transport = ScriptedTransport::new();
    transport.respond(200, "{}");

    let order = Order::new(OrderType::Market, Instrument::EurUsd, Units(10));
    let err = support::client(&transport)
        .create_order(&order)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::OK));
}

#[tokio::test]
async fn test_update_round_trips_fetched_order() {
    let transport = ScriptedTransport::new();
    transport.respond(
        200,
        r#"{"order":{"id":"12","type":"MARKET_IF_TOUCHED","instrument":"USD_JPY",
            "units":"-1","price":"107.000","timeInForce":"GTC",
            "stopLossOnFill":{"price":"107.5","timeInForce":"GTC"}}}"#,
    );
    transport.respond(201, r#"{"orderCancelTransaction":{},"orderCreateTransaction":{}}"#);

    let client = support::client(&transport);
    let mut order = client.get_order(&OrderId::from("12")).await.unwrap();
    order.time_in_force = Some(TimeInForce::Gtc);
    client.update_order(&order).await.unwrap();

    let request = transport.last_request();
    assert_eq!(request.method, Method::PUT);
    assert_eq!(
        request.url,
        format!("{}/v3/accounts/{}/orders/12", BASE_URL, ACCOUNT_ID)
    );
    let body = body_json(&request);
    assert_eq!(body["order"]["units"], "-1");
    assert_eq!(body["order"]["price"], "107.0000000");
    assert_eq!(body["order"]["stopLossOnFill"]["price"], "107.5000000");
}

#[tokio::test]
async fn test_update_order_rejects_ok_status() {
    let transport = ScriptedTransport::new();
    transport.respond(200, r#"{"orderCancelTransaction":{}}"#);

    let order = Order::new(OrderType::Limit, Instrument::EurUsd, Units(10))
        .with_id("12")
        .with_price(Price::new(dec!(1.09)));
    let err = support::client(&transport)
        .update_order(&order)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        OandaError::UnexpectedStatus {
            operation: "update_order",
            status: StatusCode::OK,
            ..
        }
    ));
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn test_update_without_id_sends_nothing() {
    let transport = ScriptedTransport::new();
    let order = Order::new(OrderType::Market, Instrument::EurUsd, Units(10));

    let err = support::client(&transport)
        .update_order(&order)
        .await
        .unwrap_err();
    assert!(matches!(err, OandaError::InvalidRequest(_)));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_cancel_order() {
    let transport = ScriptedTransport::new();
    transport.respond(200, r#"{"orderCancelTransaction":{"id":"23"}}"#);

    support::client(&transport)
        .cancel_order(&OrderId::from("21"))
        .await
        .unwrap();

    let request = transport.last_request();
    assert_eq!(request.method, Method::PUT);
    assert!(request.url.ends_with("/orders/21/cancel"));
}

#[tokio::test]
async fn test_close_trade_sends_all_units() {
    let transport = ScriptedTransport::new();
    transport.respond(200, r#"{"orderFillTransaction":{"id":"40"}}"#);

    support::client(&transport)
        .close_trade(&TradeId::from("1"))
        .await
        .unwrap();

    let request = transport.last_request();
    assert_eq!(request.method, Method::PUT);
    assert_eq!(
        request.url,
        format!("{}/v3/accounts/{}/trades/1/close", BASE_URL, ACCOUNT_ID)
    );
    assert_eq!(body_json(&request), serde_json::json!({ "units": "ALL" }));
    assert_eq!(header(&request, "accept-datetime-format"), None);
}

#[tokio::test]
async fn test_ids_are_encoded_as_one_segment() {
    let transport = ScriptedTransport::new();
    transport.respond(200, r#"{"orderFillTransaction":{"id":"40"}}"#);

    support::client(&transport)
        .close_trade(&TradeId::from("1/../../orders/5/cancel?x="))
        .await
        .unwrap();

    let url = transport.last_request().url;
    assert_eq!(
        url,
        format!(
            "{}/v3/accounts/{}/trades/1%2F..%2F..%2Forders%2F5%2Fcancel%3Fx=/close",
            BASE_URL, ACCOUNT_ID
        )
    );
    assert!(!url.contains("/orders/5/cancel"));
}

#[tokio::test]
async fn test_dot_segment_ids_are_rejected() {
    let transport = ScriptedTransport::new();
    let client = support::client(&transport);

    let err = client.cancel_order(&OrderId::from("..")).await.unwrap_err();
    assert!(matches!(err, OandaError::InvalidRequest(_)));
    let err = client.close_trade(&TradeId::from("")).await.unwrap_err();
    assert!(matches!(err, OandaError::InvalidRequest(_)));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_list_open_trades() {
    let transport = ScriptedTransport::new();
    transport.respond(
        200,
        r#"{"trades":[{"id":"6397","instrument":"EUR_JPY","price":"162.310",
            "openTime":"2024-03-01T09:30:00Z","state":"OPEN","initialUnits":"500",
            "currentUnits":"500","realizedPL":"0.0000","unrealizedPL":"12.5000",
            "financing":"0.0000"}],"lastTransactionID":"6400"}"#,
    );

    let client = support::client(&transport);
    let trades = client.list_open_trades().await.unwrap();

    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].id, TradeId::from("6397"));
    assert_eq!(trades[0].instrument, Instrument::EurJpy);
    assert_eq!(trades[0].unrealized_pl, dec!(12.5));
    assert!(transport.last_request().url.ends_with("/openTrades"));
}

#[tokio::test]
async fn test_raw_json_is_returned_unparsed() {
    let transport = ScriptedTransport::new();
    transport.respond(200, r#"{"trades":[],"lastTransactionID":"7"}"#);

    let raw = support::client(&transport)
        .list_open_trades_json()
        .await
        .unwrap();
    assert_eq!(raw, br#"{"trades":[],"lastTransactionID":"7"}"#.to_vec());
}

#[tokio::test]
async fn test_get_account() {
    let transport = ScriptedTransport::new();
    transport.respond(200, &account_body("101-004-1-002", "Hedge"));

    let account = support::client(&transport)
        .get_account(&AccountId::from("101-004-1-002"))
        .await
        .unwrap();

    assert_eq!(account.id, AccountId::from("101-004-1-002"));
    assert_eq!(account.alias.as_deref(), Some("Hedge"));
    assert_eq!(account.currency, "JPY");
    assert_eq!(account.balance, dec!(100000));
    assert_eq!(account.margin_rate, dec!(0.04));

    let request = transport.last_request();
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.url, format!("{}/v3/accounts/101-004-1-002", BASE_URL));
    assert_eq!(header(&request, "accept-datetime-format"), Some("RFC3339"));
}

#[tokio::test]
async fn test_get_account_not_found() {
    let transport = ScriptedTransport::new();
    transport.respond(404, r#"{"errorMessage":"Invalid value specified for 'accountID'"}"#);

    let err = support::client(&transport)
        .get_account(&AccountId::from("101-004-9-999"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        OandaError::UnexpectedStatus {
            operation: "get_account",
            status: StatusCode::NOT_FOUND,
            ..
        }
    ));
}

#[tokio::test]
async fn test_account_lookups() {
    let transport = ScriptedTransport::new();
    let list = r#"{"accounts":[
        {"id":"101-004-1-001","tags":[]},
        {"id":"101-004-1-002","tags":[]}
    ]}"#;
    transport.respond(200, list);
    transport.respond(200, &account_body("101-004-1-001", "Primary"));
    transport.respond(200, &account_body("101-004-1-002", "Hedge"));
    transport.respond(200, list);
    transport.respond(200, &account_body("101-004-1-001", "Primary"));
    transport.respond(200, &account_body("101-004-1-002", "Hedge"));

    let client = support::client(&transport);
    let names = client.list_account_names().await.unwrap();
    assert_eq!(names, vec!["Primary".to_string(), "Hedge".to_string()]);

    let id = client.find_account_id("Hedge").await.unwrap();
    assert_eq!(id, Some(AccountId::from("101-004-1-002")));

    let urls: Vec<String> = transport.requests().into_iter().map(|r| r.url).collect();
    assert_eq!(urls[0], format!("{}/v3/accounts", BASE_URL));
    assert_eq!(urls[1], format!("{}/v3/accounts/101-004-1-001", BASE_URL));
    assert_eq!(urls.len(), 6);
}

#[tokio::test]
async fn test_find_account_id_without_match() {
    let transport = ScriptedTransport::new();
    transport.respond(200, r#"{"accounts":[{"id":"101-004-1-001"}]}"#);
    transport.respond(200, &account_body("101-004-1-001", "Primary"));

    let id = support::client(&transport)
        .find_account_id("Missing")
        .await
        .unwrap();
    assert_eq!(id, None);
}
