//! Integration tests for linking complete designs.

use trestle_design::{
    ActionDefinition, ApiDefinition, AttributeDefinition, LinkError, MediaTypeDefinition,
    Primitive, ResourceDefinition, ResponseDefinition, RouteDefinition, UserTypeDefinition, link,
};

fn string_attr() -> AttributeDefinition {
    AttributeDefinition::primitive(Primitive::String)
}

fn widget_media_type() -> MediaTypeDefinition {
    let mut attribute = AttributeDefinition::object([
        ("id".to_string(), string_attr()),
        (
            "name".to_string(),
            AttributeDefinition::primitive(Primitive::String),
        ),
    ]);
    attribute.validation.required = vec!["id".to_string()];
    MediaTypeDefinition {
        identifier: "vnd.test.widgets".to_string(),
        name: "widget".to_string(),
        description: None,
        attribute,
        views: Vec::new(),
    }
}

fn get_action() -> ActionDefinition {
    let mut params = AttributeDefinition::object([("id".to_string(), string_attr())]);
    params.validation.required = vec!["id".to_string()];
    ActionDefinition {
        name: "get".to_string(),
        description: None,
        routes: vec![RouteDefinition {
            verb: "GET".to_string(),
            path: "/:id".to_string(),
        }],
        params: Some(params),
        headers: None,
        payload: None,
        payload_optional: false,
        responses: vec![
            ResponseDefinition {
                name: "ok".to_string(),
                status: 200,
                description: None,
                media_type: Some("vnd.test.widgets".to_string()),
            },
            ResponseDefinition {
                name: "upgrade".to_string(),
                status: 101,
                description: None,
                media_type: None,
            },
        ],
        security: None,
    }
}

fn widget_resource() -> ResourceDefinition {
    ResourceDefinition {
        name: "Widget".to_string(),
        description: None,
        base_path: Some("/widgets".to_string()),
        media_type: Some("vnd.test.widgets".to_string()),
        canonical_action: Some("get".to_string()),
        actions: vec![get_action()],
        params: None,
        headers: Some(AttributeDefinition::object([(
            "X-Request-Id".to_string(),
            string_attr(),
        )])),
        origins: Vec::new(),
        file_servers: Vec::new(),
    }
}

fn widget_api() -> ApiDefinition {
    ApiDefinition {
        name: "widgets".to_string(),
        title: Some("Widget service".to_string()),
        resources: vec![widget_resource()],
        media_types: vec![widget_media_type()],
        ..ApiDefinition::default()
    }
}

#[test]
fn test_linking_a_valid_design() {
    let linked = link(&widget_api()).expect("design should link");

    let resource = &linked.resources["Widget"];
    let action = &resource.actions["get"];
    assert_eq!(action.routes[0].path, "/:id");
    assert!(action.params.as_ref().unwrap().is_required("id"));
}

#[test]
fn test_resource_headers_merge_into_actions() {
    let linked = link(&widget_api()).unwrap();

    let action = &linked.resources["Widget"].actions["get"];
    let headers = action.headers.as_ref().expect("headers should be merged");
    assert!(headers.ty.as_object().unwrap().contains_key("X-Request-Id"));
}

#[test]
fn test_media_type_resolution_round_trip() {
    let linked = link(&widget_api()).unwrap();

    let resource = &linked.resources["Widget"];
    let identifier = resource.media_type.as_deref().unwrap();
    let resolved = linked.media_type(identifier).expect("reference must resolve");
    assert_eq!(resolved.identifier, "vnd.test.widgets");
    assert_eq!(resolved.name, "widget");
}

#[test]
fn test_success_responses_exclude_protocol_switch() {
    let linked = link(&widget_api()).unwrap();

    let action = &linked.resources["Widget"].actions["get"];
    // Both responses are retained for routing.
    assert_eq!(action.responses.len(), 2);
    let helpers: Vec<&str> = action
        .success_responses()
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(helpers, ["ok"]);
}

#[test]
fn test_linking_never_mutates_the_input() {
    let api = widget_api();
    let before = serde_json::to_string(&api).unwrap();
    let _ = link(&api).unwrap();
    let after = serde_json::to_string(&api).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_all_errors_reported_in_one_batch() {
    let mut api = widget_api();
    // Duplicate media type, unknown reference, unmatched wildcard.
    api.media_types.push(widget_media_type());
    api.resources[0].media_type = Some("vnd.missing".to_string());
    api.resources[0].actions[0].params = None;

    let errors = link(&api).unwrap_err();
    assert!(errors.len() >= 3, "expected a batch, got {errors:?}");
    assert!(errors.errors.iter().any(|e| matches!(
        e,
        LinkError::Duplicate { kind: "media type", .. }
    )));
    assert!(errors
        .errors
        .iter()
        .any(|e| matches!(e, LinkError::UnknownMediaType { .. })));
    assert!(errors
        .errors
        .iter()
        .any(|e| matches!(e, LinkError::UnmatchedWildcard { .. })));
}

#[test]
fn test_duplicate_resource_is_an_error() {
    let mut api = widget_api();
    api.resources.push(widget_resource());

    let errors = link(&api).unwrap_err();
    assert!(errors.errors.iter().any(|e| matches!(
        e,
        LinkError::Duplicate { kind: "resource", name } if name == "Widget"
    )));
}

#[test]
fn test_unknown_user_type_in_payload() {
    let mut api = widget_api();
    api.resources[0].actions[0].payload = Some(AttributeDefinition::new(
        trestle_design::AttributeType::UserType("missing".to_string()),
    ));

    let errors = link(&api).unwrap_err();
    assert!(errors.errors.iter().any(|e| matches!(
        e,
        LinkError::UnknownUserType { name, .. } if name == "missing"
    )));
}

#[test]
fn test_unknown_canonical_action() {
    let mut api = widget_api();
    api.resources[0].canonical_action = Some("delete".to_string());

    let errors = link(&api).unwrap_err();
    assert!(errors
        .errors
        .iter()
        .any(|e| matches!(e, LinkError::UnknownCanonicalAction { .. })));
}

#[test]
fn test_action_without_routes() {
    let mut api = widget_api();
    api.resources[0].actions[0].routes.clear();

    let errors = link(&api).unwrap_err();
    assert!(errors
        .errors
        .iter()
        .any(|e| matches!(e, LinkError::NoRoutes { .. })));
}

#[test]
fn test_design_document_loads_from_toml() {
    let api: ApiDefinition = toml::from_str(
        r#"
        name = "widgets"

        [[resources]]
        name = "Widget"
        base_path = "/widgets"

        [[resources.actions]]
        name = "list"

        [[resources.actions.routes]]
        verb = "GET"
        path = ""
    "#,
    )
    .unwrap();

    let linked = link(&api).expect("design should link");
    assert!(linked.resources["Widget"].actions.contains_key("list"));
}

#[test]
fn test_user_type_registry_round_trip() {
    let mut api = widget_api();
    api.user_types.push(UserTypeDefinition {
        name: "widget-id".to_string(),
        description: None,
        attribute: string_attr(),
    });
    api.resources[0].actions[0].payload = Some(AttributeDefinition::new(
        trestle_design::AttributeType::UserType("widget-id".to_string()),
    ));

    let linked = link(&api).unwrap();
    assert!(linked.user_type("widget-id").is_some());
}
