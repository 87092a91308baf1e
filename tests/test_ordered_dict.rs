use tether_dict::OrderedDict;

fn abc() -> OrderedDict<&'static str, i32> {
    let dict = OrderedDict::new();
    dict.set("a", 1);
    dict.set("b", 2);
    dict.set("c", 3);
    dict
}

#[test]
fn test_insertion_order() {
    let dict = OrderedDict::new();
    dict.set("first", 1);
    dict.set("second", 2);
    dict.set("third", 3);

    assert_eq!(dict.keys(), ["first", "second", "third"]);
    assert_eq!(dict.values(), [1, 2, 3]);
    assert_eq!(dict.len(), 3);
}

#[test]
fn test_delete_middle() {
    let dict = OrderedDict::new();
    dict.set("first", 1);
    dict.set("second", 2);
    dict.set("third", 3);

    assert_eq!(dict.delete(&"second"), Some(2));
    assert_eq!(dict.keys(), ["first", "third"]);
    assert_eq!(dict.len(), 2);
    assert!(!dict.has(&"second"));
    dict.debug_validate();
}

#[test]
fn test_delete_absent_changes_nothing() {
    let dict = abc();
    assert_eq!(dict.delete(&"missing"), None);
    assert!(!dict.remove(&"missing"));
    assert_eq!(dict.len(), 3);
    assert_eq!(dict.keys(), ["a", "b", "c"]);
    assert_eq!(dict.values(), [1, 2, 3]);
}

#[test]
fn test_delete_all() {
    let dict = abc();
    for key in ["b", "a", "c"] {
        assert!(dict.remove(&key));
        dict.debug_validate();
    }
    assert!(dict.is_empty());
    assert!(dict.keys().is_empty());
}

#[test]
fn test_update_preserves_position() {
    let dict = abc();
    dict.set("b", 20);
    dict.set("a", 10);

    assert_eq!(dict.len(), 3);
    assert_eq!(dict.keys(), ["a", "b", "c"]);
    assert_eq!(dict.values(), [10, 20, 3]);
}

#[test]
fn test_new_key_appends_to_end() {
    let dict = abc();
    dict.move_to_start(&"c");
    dict.set("d", 4);
    assert_eq!(dict.keys(), ["c", "a", "b", "d"]);
}

#[test]
fn test_reordering_scenario() {
    let dict = abc();

    assert!(dict.move_to_end(&"a"));
    assert_eq!(dict.keys(), ["b", "c", "a"]);

    assert!(dict.move_to_start(&"c"));
    assert_eq!(dict.keys(), ["c", "b", "a"]);

    assert!(dict.move_after(&"c", &"a"));
    assert_eq!(dict.keys(), ["b", "a", "c"]);
    dict.debug_validate();
}

#[test]
fn test_move_after_forward() {
    let dict = OrderedDict::new();
    for (i, key) in ["a", "b", "c", "d"].into_iter().enumerate() {
        dict.set(key, i + 1);
    }

    assert!(dict.move_after(&"a", &"c"));
    assert_eq!(dict.keys(), ["b", "c", "a", "d"]);
    assert_eq!(dict.get(&"a"), Some(1));
    assert_eq!(dict.len(), 4);
}

#[test]
fn test_move_after_last() {
    let dict = abc();
    assert!(dict.move_after(&"a", &"c"));
    assert_eq!(dict.keys(), ["b", "c", "a"]);
}

#[test]
fn test_move_after_adjacent() {
    let dict = abc();
    assert!(dict.move_after(&"c", &"a"));
    assert_eq!(dict.keys(), ["a", "c", "b"]);
}

#[test]
fn test_move_after_missing_either_key() {
    let dict = abc();
    assert!(!dict.move_after(&"missing", &"a"));
    assert!(!dict.move_after(&"a", &"missing"));
    assert_eq!(dict.keys(), ["a", "b", "c"]);
    assert_eq!(dict.len(), 3);
}

#[test]
fn test_move_after_same_key() {
    let dict = abc();
    assert!(dict.move_after(&"b", &"b"));
    assert_eq!(dict.len(), 3);
    assert_eq!(dict.keys(), ["a", "c", "b"]);
    dict.debug_validate();
}

#[test]
fn test_move_idempotent_at_boundaries() {
    let dict = abc();
    assert!(dict.move_to_end(&"c"));
    assert_eq!(dict.keys(), ["a", "b", "c"]);
    assert!(dict.move_to_start(&"a"));
    assert_eq!(dict.keys(), ["a", "b", "c"]);
    assert_eq!(dict.values(), [1, 2, 3]);
}

#[test]
fn test_move_missing_key() {
    let dict = abc();
    assert!(!dict.move_to_end(&"missing"));
    assert!(!dict.move_to_start(&"missing"));
    assert_eq!(dict.keys(), ["a", "b", "c"]);
}

#[test]
fn test_move_single_element() {
    let dict = OrderedDict::new();
    dict.set("only", 1);
    assert!(dict.move_to_end(&"only"));
    assert!(dict.move_to_start(&"only"));
    assert_eq!(dict.keys(), ["only"]);
    assert_eq!(dict.get(&"only"), Some(1));
}

#[test]
fn test_clear_matches_fresh_dict() {
    let cleared = abc();
    cleared.clear();
    cleared.clear();
    let fresh = OrderedDict::new();

    for dict in [&cleared, &fresh] {
        dict.set("x", 9);
        dict.set("y", 8);
        dict.move_to_start(&"y");
        dict.debug_validate();
    }

    assert_eq!(cleared.entries(), fresh.entries());
    assert_eq!(cleared.len(), fresh.len());
}

#[test]
fn test_iterate_all_and_break() {
    let dict = abc();

    let all: Vec<_> = dict.iter().collect();
    assert_eq!(all, [("a", 1), ("b", 2), ("c", 3)]);

    let mut visited = 0;
    for (key, _) in &dict {
        visited += 1;
        if key == "b" {
            break;
        }
    }
    assert_eq!(visited, 2);

    dict.set("d", 4);
    assert_eq!(dict.iter().count(), 4);
}

#[test]
fn test_zero_values() {
    let dict = OrderedDict::new();
    dict.set(String::new(), 0);
    assert!(dict.has(&String::new()));
    assert_eq!(dict.get(&String::new()), Some(0));
}

#[test]
fn test_different_types() {
    let dict: OrderedDict<u64, Vec<String>> = OrderedDict::with_capacity(4);
    dict.set(7, vec!["seven".to_string()]);
    dict.set(3, vec![]);

    assert_eq!(dict.keys(), [7, 3]);
    assert_eq!(dict.get_with(&7, |v| v[0].clone()), Some("seven".to_string()));

    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    struct Point(i32, i32);

    let points = OrderedDict::new();
    points.set(Point(1, 2), "a");
    points.set(Point(0, 0), "origin");
    assert_eq!(points.first(), Some((Point(1, 2), "a")));
    assert_eq!(points.last(), Some((Point(0, 0), "origin")));
}

#[test]
fn test_display_rendering() {
    let dict = abc();
    dict.move_to_end(&"a");
    assert_eq!(dict.to_string(), "OrderedDict[b:2 c:3 a:1]");
}
