//! Property tests for the fragment encoding.

use proptest::prelude::*;
use serde_json::{Map, Value};
use std::sync::Arc;
use url_hash_binding::{
    decode_component, encode_fragment, parse_object, BindingConfig, EncodedState, FnFetcher,
    InboundOutcome, JsonStateTree, MemoryNavigation, OutboundOutcome, RecordingStatus,
    RemoteLoader, ResolvedUrl, Result, StandardResolver, StateTree, UrlHashBinding,
};

fn no_fetch(_: &ResolvedUrl) -> Result<String> {
    Ok("{}".to_string())
}

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        ".{0,12}".prop_map(Value::String),
    ]
}

fn json_value() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-zA-Z_]{1,6}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

fn json_object() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::btree_map(".{1,8}", json_value(), 0..5)
        .prop_map(|m| m.into_iter().collect())
}

proptest! {
    #[test]
    fn prop_decode_inverts_encode(text in ".{0,64}") {
        prop_assert_eq!(decode_component(&encode_fragment(&text)).unwrap(), text);
    }

    #[test]
    fn prop_encoded_fragment_has_no_escaped_set_chars(text in ".{0,64}") {
        let encoded = encode_fragment(&text);
        for c in ['!', '\'', '(', ')', '*', ';', ',', ' ', '"', '{', '}'] {
            prop_assert!(!encoded.contains(c));
        }
        prop_assert!(encoded.is_ascii());
        // Escapes are uppercase hex
        prop_assert!(!encoded.contains("%2a") && !encoded.contains("%3b"));
    }

    #[test]
    fn prop_state_roundtrip(state in json_object()) {
        let value = Value::Object(state.clone());
        let encoded = EncodedState::from_value(&value);
        let decoded = decode_component(&encoded.escaped).unwrap();
        prop_assert_eq!(parse_object(&decoded).unwrap(), state);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_binding_roundtrip_through_url(state in json_object()) {
        let source = Arc::new(JsonStateTree::new());
        let source_nav = Arc::new(MemoryNavigation::new("https://app/").unwrap());
        let mut writer = UrlHashBinding::new(
            source.clone(),
            source_nav.clone(),
            RemoteLoader::new(
                Arc::new(StandardResolver),
                Arc::new(FnFetcher(no_fetch)),
                Arc::new(RecordingStatus::new()),
            ),
            BindingConfig::default(),
        );
        writer.update_from_url_hash();
        source.restore_state(&state).unwrap();
        let wrote = writer.update_url_hash();
        prop_assert!(!matches!(wrote, OutboundOutcome::GenerationOnly));

        // Open the written URL in a fresh binding
        let target = Arc::new(JsonStateTree::new());
        let target_nav = Arc::new(MemoryNavigation::new(&source_nav.href()).unwrap());
        let mut reader = UrlHashBinding::new(
            target.clone(),
            target_nav.clone(),
            RemoteLoader::new(
                Arc::new(StandardResolver),
                Arc::new(FnFetcher(no_fetch)),
                Arc::new(RecordingStatus::new()),
            ),
            BindingConfig::default(),
        );

        prop_assert_eq!(reader.update_from_url_hash(), InboundOutcome::Replaced);
        prop_assert_eq!(target.snapshot().value, Value::Object(state));

        // Re-serializing the restored tree writes nothing
        prop_assert_eq!(reader.update_url_hash(), OutboundOutcome::Unchanged);
        prop_assert_eq!(target_nav.replacement_count(), 0);
    }
}
