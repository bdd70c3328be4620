// Order book fetch and vicinity extraction

use crate::support::{self, ScriptedTransport, BASE_URL};
use chrono::{TimeZone, Utc};
use oanda_client::model::{Instrument, Price};
use oanda_client::OandaError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const BOOK_BODY: &str = r#"{
    "orderBook": {
        "instrument": "USD_JPY",
        "time": "2024-03-01T12:00:00Z",
        "price": "101.200",
        "bucketWidth": "0.500",
        "buckets": [
            { "price": "100.000", "longCountPercent": "0.10", "shortCountPercent": "0.20" },
            { "price": "100.500", "longCountPercent": "0.11", "shortCountPercent": "0.21" },
            { "price": "101.000", "longCountPercent": "0.12", "shortCountPercent": "0.22" },
            { "price": "101.500", "longCountPercent": "0.13", "shortCountPercent": "0.23" },
            { "price": "102.000", "longCountPercent": "0.14", "shortCountPercent": "0.24" }
        ]
    }
}"#;

fn prices(buckets: &[oanda_client::model::Bucket]) -> Vec<Decimal> {
    buckets.iter().map(|b| b.price.value()).collect()
}

#[tokio::test]
async fn test_fetch_and_extract_vicinity() {
    let transport = ScriptedTransport::new();
    transport.respond(200, BOOK_BODY);

    let book = support::client(&transport)
        .get_order_book(&Instrument::UsdJpy, None)
        .await
        .unwrap();

    assert_eq!(book.instrument, Instrument::UsdJpy);
    assert_eq!(book.price, Price::new(dec!(101.2)));
    assert_eq!(book.buckets.len(), 5);

    let vicinity = book.extract_bucket_vicinity(book.price, 2).unwrap();
    assert_eq!(prices(&vicinity.higher), vec![dec!(101.0), dec!(101.5)]);
    assert_eq!(prices(&vicinity.lower), vec![dec!(100.5), dec!(100.0)]);
    assert_eq!(vicinity.lower[0].long_count_percent, dec!(0.11));

    let err = book.extract_bucket_vicinity(book.price, 3).unwrap_err();
    assert!(matches!(err, OandaError::InsufficientLowerBuckets { .. }));

    let request = transport.last_request();
    assert_eq!(
        request.url,
        format!("{}/v3/instruments/USD_JPY/orderBook", BASE_URL)
    );
    assert_eq!(
        support::header(&request, "accept-datetime-format"),
        Some("RFC3339")
    );
}

#[tokio::test]
async fn test_historical_snapshot_query() {
    let transport = ScriptedTransport::new();
    transport.respond(200, BOOK_BODY);

    let time = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    support::client(&transport)
        .get_order_book_json(&Instrument::UsdJpy, Some(time))
        .await
        .unwrap();

    assert_eq!(
        transport.last_request().url,
        format!(
            "{}/v3/instruments/USD_JPY/orderBook?time=2024-03-01T12:00:00Z",
            BASE_URL
        )
    );
}

#[tokio::test]
async fn test_bad_bucket_percent_fails_whole_book() {
    let transport = ScriptedTransport::new();
    transport.respond(200, &BOOK_BODY.replace(r#""0.13""#, r#""n/a""#));

    let err = support::client(&transport)
        .get_order_book(&Instrument::UsdJpy, None)
        .await
        .unwrap_err();
    assert!(
        matches!(err, OandaError::Decode { ref field, .. } if field == "buckets.longCountPercent")
    );
}
