use chrono::{DateTime, FixedOffset, TimeZone};
use graph_core::diff::json_diff;
use graph_core::json::{from_json_as, from_json_value, to_changes_value, to_json_value};
use graph_core::parse::apply_field;
use graph_core::store::SubscriptionCallback;
use graph_core::{BackingStore, Parsable};
use graph_models::registry::{self, parse_any};
use graph_models::{
    AgeGroup, DirectoryObjectCollectionResponse, Entity, ExpirationPattern, Group, GroupVisibility,
    User, UserType,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{Value, json};

fn instant() -> impl Strategy<Value = DateTime<FixedOffset>> {
    (0i64..4_000_000_000, -12i32..=12).prop_map(|(secs, hours)| {
        let offset = FixedOffset::east_opt(hours * 3600).unwrap();
        offset.timestamp_opt(secs, 0).unwrap()
    })
}

fn user_type() -> impl Strategy<Value = UserType> {
    prop_oneof![
        Just(UserType::Member),
        Just(UserType::Guest),
        "[A-Z][a-z]{1,8}".prop_map(|s| UserType::from(s.as_str())),
    ]
}

fn user() -> impl Strategy<Value = User> {
    (
        proptest::option::of("[a-f0-9-]{1,36}"),
        proptest::option::of(any::<bool>()),
        proptest::option::of("\\PC{0,24}"),
        proptest::option::of(proptest::collection::vec("[0-9 +]{1,15}", 0..3)),
        proptest::option::of(instant()),
        proptest::option::of(user_type()),
        proptest::option::of(prop_oneof![Just(AgeGroup::Adult), Just(AgeGroup::Minor)]),
    )
        .prop_map(|(id, enabled, name, phones, created, kind, age)| {
            let mut user = User::new();
            user.set_id(id);
            user.set_account_enabled(enabled);
            user.set_display_name(name);
            user.set_business_phones(phones);
            user.set_created_date_time(created);
            user.set_user_type(kind);
            user.set_age_group(age);
            user
        })
}

proptest! {
    #[test]
    fn encode_then_decode_reproduces_user_values(original in user()) {
        let encoded = to_json_value(&original).unwrap();
        let decoded: User = from_json_as(&encoded.to_string(), User::create_from_discriminator_value)
            .unwrap();

        prop_assert_eq!(decoded.id(), original.id());
        prop_assert_eq!(decoded.account_enabled(), original.account_enabled());
        prop_assert_eq!(decoded.display_name(), original.display_name());
        prop_assert_eq!(decoded.business_phones(), original.business_phones());
        prop_assert_eq!(decoded.created_date_time(), original.created_date_time());
        prop_assert_eq!(decoded.user_type(), original.user_type());
        prop_assert_eq!(decoded.age_group(), original.age_group());
        prop_assert_eq!(to_json_value(&decoded).unwrap(), encoded);
    }

    #[test]
    fn unknown_fields_survive_a_round_trip(
        extra in proptest::collection::btree_map("x[A-Za-z]{1,10}", any::<i32>(), 0..5),
    ) {
        let mut input = json!({"@odata.type": "#microsoft.graph.group", "id": "g1"});
        for (key, value) in &extra {
            input[key.as_str()] = json!(value);
        }
        let model = from_json_value(&input, Entity::create_from_discriminator_value).unwrap();
        prop_assert_eq!(model.additional_data().map(|d| d.len()), Some(extra.len()));
        prop_assert_eq!(to_json_value(model.as_ref()).unwrap(), input);
    }
}

#[test]
fn discriminator_selects_the_same_type_every_time() {
    let payloads = [
        json!({"@odata.type": "#microsoft.graph.user"}),
        json!({"@odata.type": "#microsoft.graph.group"}),
        json!({"@odata.type": "#microsoft.graph.directoryObject"}),
        json!({"@odata.type": "#microsoft.graph.accessPackageAssignmentPolicy"}),
        json!({"@odata.type": "#microsoft.graph.somethingNew"}),
        json!({}),
    ];
    for payload in &payloads {
        let names: Vec<&str> = (0..5)
            .map(|_| {
                from_json_value(payload, Entity::create_from_discriminator_value)
                    .unwrap()
                    .type_name()
            })
            .collect();
        assert!(names.windows(2).all(|w| w[0] == w[1]), "{payload}: {names:?}");
    }
}

#[test]
fn every_registered_discriminator_decodes_to_its_own_type() {
    for entry in registry::types() {
        let Some(odata_type) = entry.odata_type else {
            continue;
        };
        let payload = json!({ "@odata.type": odata_type });
        let model = parse_any(&payload, Entity::create_from_discriminator_value, true).unwrap();
        assert_eq!(model.type_name(), entry.name);
        assert_eq!(model.odata_type(), Some(odata_type));
    }
}

#[test]
fn patch_body_holds_only_edits() {
    let input = json!({
        "@odata.type": "#microsoft.graph.user",
        "id": "87d349ed",
        "displayName": "Adele Vance",
        "mail": "adele@contoso.com",
        "jobTitle": "Retail Manager"
    });
    let mut user: User = from_json_as(&input.to_string(), User::create_from_discriminator_value)
        .unwrap();
    user.set_display_name(Some("Adele Kerr".into()));
    user.set_mail(None);
    user.set_user_type(Some(UserType::Guest));

    assert_eq!(
        to_changes_value(&mut user).unwrap(),
        json!({"displayName": "Adele Kerr", "mail": null, "userType": "Guest"})
    );
    assert!(!user.store().return_only_changed_values());
}

#[test]
fn patch_body_holds_only_edited_additional_keys() {
    let input = json!({
        "@odata.context": "https://graph.microsoft.com/v1.0/$metadata#users/$entity",
        "@odata.type": "#microsoft.graph.user",
        "id": "87d349ed",
        "jobTitle": "Retail Manager"
    });
    let mut user = from_json_value(&input, User::create_from_discriminator_value).unwrap();
    apply_field(user.as_mut(), "officeLocation", &json!("18/2111")).unwrap();

    assert_eq!(
        to_changes_value(user.as_mut()).unwrap(),
        json!({"officeLocation": "18/2111"})
    );
    let full = to_json_value(user.as_ref()).unwrap();
    assert_eq!(full["jobTitle"], json!("Retail Manager"));
    assert_eq!(full["officeLocation"], json!("18/2111"));
}

#[test]
fn non_canonical_durations_survive_a_round_trip() {
    for duration in ["P0D", "PT1H0M", "PT1.50S", "P0Y0M7D", "-PT0S"] {
        let input = json!({
            "@odata.type": "#microsoft.graph.expirationPattern",
            "type": "afterDuration",
            "duration": duration
        });
        let pattern = from_json_value(&input, ExpirationPattern::create_from_discriminator_value)
            .unwrap();
        let output = to_json_value(pattern.as_ref()).unwrap();
        let losses: Vec<String> = json_diff(&input, &output)
            .iter()
            .filter(|d| d.is_loss())
            .map(ToString::to_string)
            .collect();
        assert!(losses.is_empty(), "{duration}: {losses:?}");
    }
}

#[test]
fn subscribers_observe_model_edits() {
    use std::sync::{Arc, Mutex};

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let callback: SubscriptionCallback =
        Arc::new(move |key, _, _| sink.lock().unwrap().push(key.to_owned()));
    let mut group = Group::new();
    group.store_mut().subscribe(callback);
    group.set_visibility(Some(GroupVisibility::HiddenMembership));
    group.set_mail_enabled(Some(false));

    assert_eq!(*seen.lock().unwrap(), vec!["visibility", "mailEnabled"]);
}

#[test]
fn directory_page_snapshot() {
    let page: DirectoryObjectCollectionResponse = from_json_as(
        r##"{
            "@odata.nextLink": "https://graph.microsoft.com/v1.0/groups/g1/members?$skiptoken=abc",
            "value": [
                {"@odata.type": "#microsoft.graph.user", "id": "u1", "displayName": "Adele Vance"},
                {"@odata.type": "#microsoft.graph.group", "id": "g2", "displayName": "Finance"},
                {"@odata.type": "#microsoft.graph.device", "id": "d1"}
            ]
        }"##,
        DirectoryObjectCollectionResponse::create_from_discriminator_value,
    )
    .unwrap();
    let summary: Vec<String> = page
        .value()
        .unwrap()
        .iter()
        .map(|m| format!("{} {}", m.type_name(), m.odata_type().unwrap_or("-")))
        .collect();
    insta::assert_snapshot!(summary.join("\n"), @r"
    User #microsoft.graph.user
    Group #microsoft.graph.group
    DirectoryObject #microsoft.graph.device
    ");
}

#[test]
fn top_level_arrays_are_not_models() {
    let err = parse_any(&Value::Array(vec![]), Entity::create_from_discriminator_value, false)
        .unwrap_err();
    assert_eq!(err.to_string(), "expected a JSON object, found array");
}
