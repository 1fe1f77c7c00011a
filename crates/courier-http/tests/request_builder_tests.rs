//! Tests for request configuration and resume-time finalization.

use courier_http::{Client, Error, HttpMethod, ParamMap, ParamValue, QueryParams, SerializationMode};
use http::HeaderMap;
use http::header;

fn query(key: &str, value: &str) -> QueryParams {
    QueryParams::from([(key.to_string(), value.to_string())])
}

#[test]
fn test_invalid_url_fails_fast() {
    let client = Client::new();

    let result = client.get("not a url", QueryParams::new());
    assert!(matches!(result, Err(Error::InvalidUrl(_))));
}

#[test]
fn test_all_method_constructors() {
    let client = Client::new();

    assert!(client.get("https://example.com", QueryParams::new()).is_ok());
    assert!(client.delete("https://example.com", QueryParams::new()).is_ok());
    assert!(client.head("https://example.com", QueryParams::new()).is_ok());
    assert!(client.options("https://example.com", QueryParams::new()).is_ok());
    assert!(client.post("https://example.com", ParamMap::new()).is_ok());
    assert!(client.put("https://example.com", ParamMap::new()).is_ok());
    assert!(client.patch("https://example.com", ParamMap::new()).is_ok());
    assert!(client.request(HttpMethod::Options, "https://example.com").is_ok());
}

#[test]
fn test_query_params_reach_prepared_url() {
    let client = Client::new();

    let prepared = client
        .get("http://example.com/x", query("k", "v"))
        .expect("valid URL")
        .build();

    assert_eq!(prepared.method, HttpMethod::Get);
    assert_eq!(prepared.url.query(), Some("k=v"));
}

#[test]
fn test_query_merge_preserves_existing_pairs() {
    let client = Client::new();

    let prepared = client
        .get("http://example.com/x?p=1", query("k", "v"))
        .expect("valid URL")
        .build();

    let pairs: Vec<(String, String)> = prepared.url.query_pairs().into_owned().collect();
    assert_eq!(
        pairs,
        vec![
            ("p".to_string(), "1".to_string()),
            ("k".to_string(), "v".to_string()),
        ]
    );
}

#[test]
fn test_content_type_reflects_finalized_mode() {
    let client = Client::new();

    let prepared = client
        .post("http://example.com", ParamMap::new())
        .expect("valid URL")
        .header(header::CONTENT_TYPE, "text/plain")
        .build();

    // The finalization step writes Content-Type last, on purpose.
    assert_eq!(
        prepared.headers.get(header::CONTENT_TYPE).unwrap(),
        "application/x-www-form-urlencoded"
    );
}

#[test]
fn test_json_mode_sets_json_content_type() {
    let client = Client::new();

    let prepared = client
        .post("http://example.com", ParamMap::new())
        .expect("valid URL")
        .serialization_mode(SerializationMode::Json)
        .build();

    assert_eq!(
        prepared.headers.get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
}

#[test]
fn test_basic_auth_wire_format() {
    let client = Client::new();

    let prepared = client
        .get("http://example.com", QueryParams::new())
        .expect("valid URL")
        .basic_auth("postman", "password")
        .build();

    assert_eq!(
        prepared.headers.get(header::AUTHORIZATION).unwrap(),
        "Basic cG9zdG1hbjpwYXNzd29yZA=="
    );
}

#[test]
fn test_header_last_write_wins() {
    let client = Client::new();

    let prepared = client
        .get("http://example.com", QueryParams::new())
        .expect("valid URL")
        .header("X-Token", "first")
        .header("X-Token", "second")
        .build();

    assert_eq!(prepared.headers.get("X-Token").unwrap(), "second");
}

#[test]
fn test_headers_replaces_entire_set() {
    let client = Client::new();

    let mut replacement = HeaderMap::new();
    replacement.insert("X-Only", http::HeaderValue::from_static("kept"));

    let prepared = client
        .get("http://example.com", QueryParams::new())
        .expect("valid URL")
        .basic_auth("postman", "password")
        .header("X-Dropped", "gone")
        .headers(replacement)
        .build();

    assert!(prepared.headers.get(header::AUTHORIZATION).is_none());
    assert!(prepared.headers.get("X-Dropped").is_none());
    assert_eq!(prepared.headers.get("X-Only").unwrap(), "kept");
}

#[test]
fn test_cookie_header_join() {
    let client = Client::new();

    let cookies = QueryParams::from([
        ("session".to_string(), "abc".to_string()),
        ("theme".to_string(), "dark".to_string()),
    ]);

    let prepared = client
        .get("http://example.com", QueryParams::new())
        .expect("valid URL")
        .cookies(cookies)
        .build();

    assert_eq!(
        prepared.headers.get(header::COOKIE).unwrap(),
        "session=abc; theme=dark"
    );
}

#[test]
fn test_cookies_merge_without_clearing_headers() {
    let client = Client::new();

    let prepared = client
        .get("http://example.com", QueryParams::new())
        .expect("valid URL")
        .header("X-Custom", "1")
        .cookies(QueryParams::from([("a".to_string(), "1".to_string())]))
        .build();

    assert_eq!(prepared.headers.get("X-Custom").unwrap(), "1");
    assert_eq!(prepared.headers.get(header::COOKIE).unwrap(), "a=1");
}

#[test]
fn test_get_without_params_has_no_body() {
    let client = Client::new();

    let prepared = client
        .get("http://example.com", QueryParams::new())
        .expect("valid URL")
        .build();

    assert!(prepared.body.is_none());
    // Content-Type still reflects the (default) mode.
    assert_eq!(
        prepared.headers.get(header::CONTENT_TYPE).unwrap(),
        "application/x-www-form-urlencoded"
    );
}

#[test]
fn test_post_body_is_form_encoded() {
    let client = Client::new();

    let params = ParamMap::from([("name".to_string(), ParamValue::from("john"))]);
    let prepared = client
        .post("http://example.com", params)
        .expect("valid URL")
        .build();

    assert_eq!(prepared.body.as_deref(), Some(b"name=john".as_slice()));
}

#[test]
fn test_param_builders_accumulate() {
    let client = Client::new();

    let prepared = client
        .post("http://example.com", ParamMap::new())
        .expect("valid URL")
        .param("a", "1")
        .param("list", vec!["x", "y"])
        .build();

    assert_eq!(
        prepared.body.as_deref(),
        Some(b"a=1&list%5B%5D=x&list%5B%5D=y".as_slice())
    );
}

#[test]
fn test_params_json_from_serializable() {
    #[derive(serde::Serialize)]
    struct NewUser {
        name: String,
        tags: Vec<String>,
    }

    let client = Client::new();
    let body = NewUser {
        name: "john".to_string(),
        tags: vec!["a".to_string()],
    };

    let prepared = client
        .post("http://example.com", ParamMap::new())
        .expect("valid URL")
        .params_json(&body)
        .serialization_mode(SerializationMode::Json)
        .build();

    let value: serde_json::Value =
        serde_json::from_slice(prepared.body.as_deref().expect("body")).expect("valid JSON");
    assert_eq!(value, serde_json::json!({"name": "john", "tags": ["a"]}));
}

#[test]
fn test_query_builder_methods() {
    let client = Client::new();

    let prepared = client
        .post("http://example.com/x", ParamMap::new())
        .expect("valid URL")
        .query("k", "v")
        .query_pairs([("k2".to_string(), "v2".to_string())])
        .build();

    let pairs: Vec<(String, String)> = prepared.url.query_pairs().into_owned().collect();
    assert_eq!(
        pairs,
        vec![
            ("k".to_string(), "v".to_string()),
            ("k2".to_string(), "v2".to_string()),
        ]
    );
}

#[test]
fn test_accept_header_helper() {
    let client = Client::new();

    let prepared = client
        .get("http://example.com", QueryParams::new())
        .expect("valid URL")
        .accept("application/json")
        .build();

    assert_eq!(
        prepared.headers.get(header::ACCEPT).unwrap(),
        "application/json"
    );
}

#[test]
fn test_method_display() {
    assert_eq!(HttpMethod::Get.to_string(), "GET");
    assert_eq!(HttpMethod::Patch.to_string(), "PATCH");
}
