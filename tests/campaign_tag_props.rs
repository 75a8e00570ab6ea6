use pix_gateway::services::campaign_tag::{canonicalize, TagState};
use proptest::prelude::*;

fn encode(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}

#[test]
fn documented_examples() {
    assert_eq!(canonicalize(Some("TT-55")).as_deref(), Some("utm_source=TT-55"));
    assert_eq!(canonicalize(Some("utm_source=abc")).as_deref(), Some("utm_source=abc"));
    assert_eq!(canonicalize(Some("utm_source%3Dabc")).as_deref(), Some("utm_source=abc"));
    assert_eq!(
        canonicalize(Some(&encode(&encode("utm_source=abc")))).as_deref(),
        Some("utm_source=abc")
    );
}

#[test]
fn double_encoded_query_string() {
    let raw = encode(&encode("utm_source=TT-1&utm_campaign=black friday"));
    assert_eq!(TagState::classify(Some(&raw)), TagState::DoubleEncoded);

    let once = canonicalize(Some(&raw));
    assert_eq!(once.as_deref(), Some("utm_source=TT-1"));
    assert_eq!(canonicalize(once.as_deref()), once);
}

proptest! {
    #[test]
    fn canonicalizing_twice_changes_nothing(raw in any::<String>()) {
        let once = canonicalize(Some(&raw));
        prop_assert_eq!(canonicalize(once.as_deref()), once);
    }

    #[test]
    fn encoded_forms_agree(value in "[A-Za-z0-9_.~-]{1,16}") {
        let plain = format!("utm_source={}", value);
        let once = canonicalize(Some(&plain));
        prop_assert_eq!(once.clone(), Some(plain.clone()));
        prop_assert_eq!(canonicalize(Some(&encode(&plain))), once.clone());
        prop_assert_eq!(canonicalize(Some(&encode(&encode(&plain)))), once.clone());
        prop_assert_eq!(canonicalize(once.as_deref()), once);
    }

    #[test]
    fn bare_identifiers_get_prefixed(id in "[A-Za-z0-9_-]{1,24}") {
        prop_assert_eq!(canonicalize(Some(&id)), Some(format!("utm_source={}", id)));
    }
}
