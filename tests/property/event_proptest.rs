//! Property-based tests for wire event decoding

use corkboard::shared::ClientEvent;
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_decode_never_panics(text in ".*") {
        let _ = ClientEvent::decode(&text);
    }

    #[test]
    fn test_unknown_event_names_are_ignored(name in "[a-z]{1,8}:[a-z]{1,8}") {
        prop_assume!(!["user:join", "board:init", "note:create", "note:update", "note:delete", "note:comment"]
            .contains(&name.as_str()));
        let frame = serde_json::json!({ "event": name, "data": { "x": 1 } }).to_string();
        prop_assert_eq!(ClientEvent::decode(&frame).unwrap(), None);
    }

    #[test]
    fn test_join_name_survives_the_wire(name in "\\PC{1,24}") {
        let event = ClientEvent::UserJoin { name: name.clone() };
        let decoded = ClientEvent::decode(&event.encode().unwrap()).unwrap();
        prop_assert_eq!(decoded, Some(ClientEvent::UserJoin { name }));
    }
}
