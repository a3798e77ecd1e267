use serde_json::{json, Value};
use utils_toolkit::general_utils::*;

#[cfg(test)]
mod tests {
    use super::*;

    fn object(value: Value) -> Object {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {}", other),
        }
    }

    #[test]
    fn test_conditional_request_body() {
        let include_debug = false;
        let mut body = object(json!({"query": "rust"}));
        body.extend(obj_if(true, object(json!({"limit": 10}))));
        body.extend(obj_if(include_debug, object(json!({"debug": true}))));

        assert_eq!(Value::Object(body), json!({"query": "rust", "limit": 10}));
    }

    #[test]
    fn test_clean_parsed_payload() {
        let raw = r#"{"userName": "ada", "lastLogin": null, "loginCount": 3}"#;
        let parsed = safe_parse(raw).unwrap();
        assert!(is_non_null_object(&parsed));

        let cleaned = filter_values(parsed.as_object().unwrap(), |v| !v.is_null());
        let labelled = map_keys(&cleaned, camel_case_to_capital);
        assert_eq!(
            Value::Object(labelled),
            json!({"User Name": "ada", "Login Count": 3})
        );
    }

    #[test]
    fn test_entry_helpers_agree() {
        let source = object(json!({"a": 1, "b": 2, "c": 3}));
        let doubled = map_values(&source, |v| json!(v.as_i64().unwrap_or(0) * 2));
        let odd_keys = filter_entries(&source, |_, v| v.as_i64().unwrap_or(0) % 2 == 1);
        let renamed = map_entries(&source, |k, v| (format!("{}_key", k), v.clone()));
        let only_a = filter_keys(&source, |k| k == "a");
        let sorted_desc = on_keys(&source, |mut keys| {
            keys.sort_by(|a, b| b.cmp(a));
            keys
        });

        assert_eq!(Value::Object(doubled), json!({"a": 2, "b": 4, "c": 6}));
        assert_eq!(Value::Object(odd_keys), json!({"a": 1, "c": 3}));
        assert!(renamed.contains_key("b_key"));
        assert_eq!(Value::Object(only_a), json!({"a": 1}));
        assert_eq!(sorted_desc.keys().collect::<Vec<_>>(), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_lookup_and_dispatch() {
        let routes = vec![
            json!({"method": "GET", "path": "/users"}),
            json!({"method": "POST", "path": "/users"}),
        ];
        let post = get_by_key(&routes, "method", &json!("POST")).unwrap();

        let verb = post["method"].as_str().unwrap_or_default();
        let action = switch_on(verb)
            .case("GET", || "read")
            .case("POST", || "create")
            .otherwise(|| "unsupported");
        assert_eq!(action, "create");

        let path_len = call_on(&post["path"], |p| p.as_str().map(str::len));
        assert_eq!(path_len, Some(Some(6)));
        assert_eq!(call_on(&post["missing"], |_| 1), None);
    }

    #[test]
    fn test_safe_call_wraps_fallible_parse() {
        let port = safe_call(|| Ok("8080".parse::<u16>()?)).unwrap_or(80);
        let bad = safe_call(|| Ok("http".parse::<u16>()?)).unwrap_or(80);
        assert_eq!((port, bad), (8080, 80));
        assert_eq!(capitalize_words("global state"), "Global State");
        assert_eq!(arr_if(false, vec![1, 2]), Vec::<i32>::new());
    }
}
