//! Client for the special day info service (public holidays,
//! anniversaries and sundry days).
//!
//! The service answers with an envelope like:
//!
//! ```json
//! {"response": {
//!    "header": {"resultCode": "00", "resultMsg": "NORMAL SERVICE."},
//!    "body": {"items": {"item": [
//!      {"dateKind": "01", "dateName": "신정", "isHoliday": "Y", "locdate": 20240101, "seq": 1}
//!    ]}, "numOfRows": 200, "pageNo": 1, "totalCount": 1}}}
//! ```
//!
//! `item` is a bare object when there is a single result and `items`
//! is an empty string when there are none.

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use itertools::Itertools;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use super::{HolidayError, HolidayItem, HolidayKind, HolidaySource};
use crate::cache::{Cache, get_json, set_json};
use crate::core::AppConfig;

const MAX_ROWS: &str = "200";

static LOCDATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})(\d{2})(\d{2})$").unwrap());

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSpecialDay {
    locdate: Option<Value>,
    date_name: Option<String>,
    is_holiday: Option<Value>,
}

pub struct HolidayFetcher {
    kind: HolidayKind,
    client: Client,
    base_url: String,
    api_key: Option<String>,
    cache: Arc<dyn Cache>,
    ttl: Duration,
}

impl HolidayFetcher {
    pub fn new(
        kind: HolidayKind,
        client: Client,
        base_url: &str,
        api_key: Option<String>,
        cache: Arc<dyn Cache>,
        ttl: Duration,
    ) -> Self {
        Self {
            kind,
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            cache,
            ttl,
        }
    }

    pub fn from_config(
        kind: HolidayKind,
        config: &AppConfig,
        client: Client,
        cache: Arc<dyn Cache>,
    ) -> Self {
        Self::new(
            kind,
            client,
            &config.holiday_api_url,
            config.holiday_api_key.clone(),
            cache,
            config.holiday_cache_ttl,
        )
    }

    pub fn kind(&self) -> HolidayKind {
        self.kind
    }

    pub fn cache_key(kind: HolidayKind, year: i32, month: u32) -> String {
        format!("{}:v1:{}-{:02}", kind.as_str(), year, month)
    }

    /// Fetch the normalized, de-duplicated items for a month. Cached
    /// results are returned as-is until they expire.
    pub async fn fetch(&self, year: i32, month: u32) -> Result<Vec<HolidayItem>, HolidayError> {
        let key = Self::cache_key(self.kind, year, month);
        if let Some(items) = get_json::<Vec<HolidayItem>>(self.cache.as_ref(), &key).await {
            tracing::debug!("Holiday cache hit for {}", key);
            return Ok(items);
        }
        tracing::debug!("Holiday cache miss for {}", key);

        let body = self.request(year, month).await?;
        let items = normalize_response(self.kind, &body)?;

        set_json(self.cache.as_ref(), &key, &items, self.ttl).await;
        Ok(items)
    }

    async fn request(&self, year: i32, month: u32) -> Result<Value, HolidayError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(HolidayError::MissingConfig)?;
        // Keys are issued in both an encoded and a decoded form. Decode
        // so the query builder doesn't encode twice.
        let api_key = urlencoding::decode(api_key)
            .map(|k| k.into_owned())
            .unwrap_or_else(|_| api_key.to_string());

        let url = format!("{}/{}", self.base_url, self.kind.operation());
        tracing::debug!("Fetching {} for {}-{:02}", self.kind.operation(), year, month);

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("serviceKey", api_key),
                ("solYear", year.to_string()),
                ("solMonth", format!("{:02}", month)),
                ("numOfRows", MAX_ROWS.to_string()),
                ("pageNo", "1".to_string()),
                ("_type", "json".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let text = resp.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            let snippet: String = text.chars().take(120).collect();
            HolidayError::InvalidBody(format!("{} ({})", e, snippet))
        })
    }
}

/// Validate the envelope and turn its items into `HolidayItem`s,
/// dropping anything malformed.
pub fn normalize_response(kind: HolidayKind, body: &Value) -> Result<Vec<HolidayItem>, HolidayError> {
    let header = body
        .pointer("/response/header")
        .ok_or_else(|| HolidayError::InvalidBody("missing response header".to_string()))?;
    let code = value_as_string(header.get("resultCode")).unwrap_or_default();
    if code != "00" {
        let message = value_as_string(header.get("resultMsg")).unwrap_or_default();
        return Err(HolidayError::UpstreamResult { code, message });
    }

    let raw_items: Vec<&Value> = match body.pointer("/response/body/items/item") {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(item @ Value::Object(_)) => vec![item],
        _ => vec![],
    };

    let items = raw_items
        .into_iter()
        .filter_map(|raw| normalize_item(kind, raw))
        .unique_by(|item| item.feed_identity())
        .collect();
    Ok(items)
}

/// Returns `None` for anything without an 8 digit date and a name.
pub fn normalize_item(kind: HolidayKind, raw: &Value) -> Option<HolidayItem> {
    let raw: RawSpecialDay = serde_json::from_value(raw.clone()).ok()?;
    let date = normalize_locdate(&value_as_string(raw.locdate.as_ref())?)?;
    let name = raw.date_name?.trim().to_string();
    if name.is_empty() {
        return None;
    }
    let is_holiday = match raw.is_holiday {
        Some(Value::Bool(b)) => b,
        Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("Y"),
        _ => false,
    };

    Some(HolidayItem {
        date,
        name,
        source: HolidaySource::External,
        is_holiday,
        kind,
    })
}

/// `20240101` -> `2024-01-01`
pub fn normalize_locdate(raw: &str) -> Option<String> {
    let caps = LOCDATE_RE.captures(raw.trim())?;
    Some(format!("{}-{}-{}", &caps[1], &caps[2], &caps[3]))
}

fn value_as_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use mockito::Matcher;
    use serde_json::json;

    fn envelope(items: Value) -> String {
        json!({
            "response": {
                "header": {"resultCode": "00", "resultMsg": "NORMAL SERVICE."},
                "body": {"items": items, "numOfRows": 200, "pageNo": 1, "totalCount": 1}
            }
        })
        .to_string()
    }

    fn fetcher(kind: HolidayKind, url: &str, cache: Arc<dyn Cache>) -> HolidayFetcher {
        HolidayFetcher::new(
            kind,
            Client::new(),
            url,
            Some("test-key".to_string()),
            cache,
            Duration::from_secs(60 * 60 * 12),
        )
    }

    #[test]
    fn it_normalizes_a_public_holiday() {
        let raw = json!({"locdate": 20240101, "dateName": "신정", "isHoliday": "Y"});
        let item = normalize_item(HolidayKind::Public, &raw).unwrap();
        assert_eq!(
            item,
            HolidayItem {
                date: "2024-01-01".to_string(),
                name: "신정".to_string(),
                source: HolidaySource::External,
                is_holiday: true,
                kind: HolidayKind::Public,
            }
        );
    }

    #[test]
    fn it_drops_malformed_items() {
        let bad_date = json!({"locdate": "2024-1-1", "dateName": "신정", "isHoliday": "Y"});
        let no_name = json!({"locdate": 20240101, "dateName": "  ", "isHoliday": "Y"});
        let no_date = json!({"dateName": "신정"});
        assert!(normalize_item(HolidayKind::Public, &bad_date).is_none());
        assert!(normalize_item(HolidayKind::Public, &no_name).is_none());
        assert!(normalize_item(HolidayKind::Public, &no_date).is_none());
    }

    #[test]
    fn it_accepts_string_dates() {
        assert_eq!(normalize_locdate("20241009"), Some("2024-10-09".to_string()));
        assert_eq!(normalize_locdate("2024109"), None);
        assert_eq!(normalize_locdate("2024100a"), None);
    }

    #[test]
    fn it_coerces_single_and_empty_items() {
        let single: Value = serde_json::from_str(&envelope(json!({
            "item": {"locdate": 20240301, "dateName": "삼일절", "isHoliday": "Y"}
        })))
        .unwrap();
        let items = normalize_response(HolidayKind::Public, &single).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].date, "2024-03-01");

        let empty: Value = serde_json::from_str(&envelope(json!(""))).unwrap();
        assert!(normalize_response(HolidayKind::Public, &empty).unwrap().is_empty());
    }

    #[test]
    fn it_dedupes_first_occurrence_wins() {
        let body: Value = serde_json::from_str(&envelope(json!({"item": [
            {"locdate": 20240209, "dateName": "설날", "isHoliday": "Y"},
            {"locdate": 20240209, "dateName": "설날", "isHoliday": "N"},
            {"locdate": 20240210, "dateName": "설날", "isHoliday": "Y"},
            {"locdate": "2024-1-1", "dateName": "broken", "isHoliday": "Y"}
        ]})))
        .unwrap();
        let items = normalize_response(HolidayKind::Public, &body).unwrap();
        assert_eq!(items.len(), 2);
        assert!(items[0].is_holiday);
        assert_eq!(items[1].date, "2024-02-10");
    }

    #[test]
    fn it_rejects_non_success_result_codes() {
        let body = json!({"response": {"header": {"resultCode": "30", "resultMsg": "SERVICE_KEY_IS_NOT_REGISTERED_ERROR"}}});
        let err = normalize_response(HolidayKind::Public, &body).unwrap_err();
        assert!(matches!(err, HolidayError::UpstreamResult { ref code, .. } if code == "30"));
        assert!(err.is_upstream());
    }

    #[tokio::test]
    async fn it_fetches_once_then_serves_from_cache() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/getRestDeInfo")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("solYear".into(), "2024".into()),
                Matcher::UrlEncoded("solMonth".into(), "02".into()),
                Matcher::UrlEncoded("numOfRows".into(), "200".into()),
                Matcher::UrlEncoded("_type".into(), "json".into()),
                Matcher::UrlEncoded("serviceKey".into(), "test-key".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(envelope(json!({"item": [
                {"locdate": 20240209, "dateName": "설날", "isHoliday": "Y"},
                {"locdate": 20240210, "dateName": "설날", "isHoliday": "Y"}
            ]})))
            .expect(1)
            .create_async()
            .await;

        let cache: Arc<dyn Cache> = Arc::new(MemoryCache::default());
        let fetcher = fetcher(HolidayKind::Public, &server.url(), cache.clone());

        let first = fetcher.fetch(2024, 2).await.unwrap();
        let second = fetcher.fetch(2024, 2).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert!(cache.get("public:v1:2024-02").await.is_some());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn it_uses_the_operation_for_each_kind() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/getSundryDayInfo")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(envelope(json!({"item":
                {"locdate": 20240320, "dateName": "춘분", "isHoliday": "N"}
            })))
            .expect(1)
            .create_async()
            .await;

        let cache: Arc<dyn Cache> = Arc::new(MemoryCache::default());
        let items = fetcher(HolidayKind::Sundry, &server.url(), cache)
            .fetch(2024, 3)
            .await
            .unwrap();
        assert_eq!(items[0].kind, HolidayKind::Sundry);
        assert!(!items[0].is_holiday);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn it_reports_upstream_failures_without_caching() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/getRestDeInfo")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "text/xml")
            .with_body("<OpenAPI_ServiceResponse><cmmMsgHeader>SERVICE ERROR</cmmMsgHeader></OpenAPI_ServiceResponse>")
            .create_async()
            .await;

        let cache = Arc::new(MemoryCache::default());
        let fetcher = fetcher(HolidayKind::Public, &server.url(), cache.clone());
        let err = fetcher.fetch(2024, 5).await.unwrap_err();
        assert!(matches!(err, HolidayError::InvalidBody(_)));
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn it_reports_http_errors_as_upstream() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/getAnniversaryInfo")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let cache: Arc<dyn Cache> = Arc::new(MemoryCache::default());
        let err = fetcher(HolidayKind::Anniversary, &server.url(), cache)
            .fetch(2024, 5)
            .await
            .unwrap_err();
        assert!(matches!(err, HolidayError::Transport(_)));
        assert!(err.is_upstream());
    }

    #[tokio::test]
    async fn it_requires_an_api_key() {
        let fetcher = HolidayFetcher::new(
            HolidayKind::Public,
            Client::new(),
            "http://127.0.0.1:1",
            None,
            Arc::new(MemoryCache::default()),
            Duration::from_secs(60),
        );
        let err = fetcher.fetch(2024, 1).await.unwrap_err();
        assert!(matches!(err, HolidayError::MissingConfig));
        assert!(!err.is_upstream());
    }
}
