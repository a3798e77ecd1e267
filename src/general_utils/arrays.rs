use serde_json::Value;

/// `items` when `condition` holds, otherwise empty. Meant for conditionally
/// extending a larger list.
pub fn arr_if<T>(condition: bool, items: Vec<T>) -> Vec<T> {
    if condition {
        items
    } else {
        Vec::new()
    }
}

/// First item matching `predicate`.
pub fn get_by<T, F>(items: &[T], mut predicate: F) -> Option<&T>
where
    F: FnMut(&T) -> bool,
{
    items.iter().find(|item| predicate(item))
}

/// First object whose `key` field equals `expected`. Non-objects are skipped.
pub fn get_by_key<'a>(items: &'a [Value], key: &str, expected: &Value) -> Option<&'a Value> {
    get_by(items, |item| item.get(key) == Some(expected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_arr_if() {
        let mut list = vec![1];
        list.extend(arr_if(true, vec![2, 3]));
        list.extend(arr_if(false, vec![4]));
        assert_eq!(list, vec![1, 2, 3]);
    }

    #[test]
    fn test_get_by_key_skips_non_objects() {
        let users = vec![
            json!("stray"),
            json!({"id": 1, "name": "ada"}),
            json!({"id": 2, "name": "grace"}),
            json!({"id": 2, "name": "duplicate"}),
        ];
        let found = get_by_key(&users, "id", &json!(2)).unwrap();
        assert_eq!(found["name"], "grace");
        assert!(get_by_key(&users, "id", &json!(3)).is_none());
    }

    #[test]
    fn test_get_by_predicate() {
        let numbers = [3, 8, 12];
        assert_eq!(get_by(&numbers, |n| *n > 5), Some(&8));
        assert_eq!(get_by(&numbers, |n| *n > 50), None);
    }
}
