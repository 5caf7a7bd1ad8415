//! End-to-end generation tests: artifact content, determinism, and the
//! atomic output lifecycle.

use std::fs;
use std::path::Path;

use tempfile::TempDir;
use trestle_codegen::{GenerationError, Generator, Options};
use trestle_design::{
    ActionDefinition, ApiDefinition, AttributeDefinition, AttributeType, LinkedApi,
    MediaTypeDefinition, Primitive, ResourceDefinition, ResponseDefinition, RouteDefinition,
    SchemeKind, SecurityScheme, ViewDefinition, link,
};

fn string_attr() -> AttributeDefinition {
    AttributeDefinition::primitive(Primitive::String)
}

fn widget_media_type() -> MediaTypeDefinition {
    let mut attribute = AttributeDefinition::object([
        ("id".to_string(), string_attr()),
        (
            "count".to_string(),
            AttributeDefinition::primitive(Primitive::Integer),
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
        responses: vec![ResponseDefinition {
            name: "ok".to_string(),
            status: 200,
            description: None,
            media_type: Some("vnd.test.widgets".to_string()),
        }],
        security: None,
    }
}

fn widget_resource(name: &str) -> ResourceDefinition {
    ResourceDefinition {
        name: name.to_string(),
        description: None,
        base_path: Some("/widgets".to_string()),
        media_type: Some("vnd.test.widgets".to_string()),
        canonical_action: Some("get".to_string()),
        actions: vec![get_action()],
        params: None,
        headers: None,
        origins: Vec::new(),
        file_servers: Vec::new(),
    }
}

fn widget_api() -> ApiDefinition {
    ApiDefinition {
        name: "widgets".to_string(),
        resources: vec![widget_resource("Widget")],
        media_types: vec![widget_media_type()],
        ..ApiDefinition::default()
    }
}

fn linked(api: &ApiDefinition) -> LinkedApi {
    link(api).expect("design should link")
}

fn generate_into(api: &LinkedApi, out: &Path, options: Options) -> Vec<std::path::PathBuf> {
    Generator::new(out, options)
        .generate(api)
        .expect("generation should succeed")
}

fn read(out: &Path, file: &str) -> String {
    fs::read_to_string(out.join("app").join(file)).unwrap_or_else(|_| panic!("missing {file}"))
}

// Scenario A: an API with no resources generates the fixed skeleton set.
#[test]
fn test_empty_api_generates_skeleton_files() {
    let api = linked(&ApiDefinition {
        name: "empty".to_string(),
        ..ApiDefinition::default()
    });
    let temp = TempDir::new().unwrap();

    let files = generate_into(&api, temp.path(), Options::default());

    let names: Vec<String> = files
        .iter()
        .skip(1)
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        [
            "contexts.rs",
            "controllers.rs",
            "hrefs.rs",
            "media_types.rs",
            "user_types.rs",
            "tests.rs"
        ]
    );
    // The directory entry comes first, then only skeleton content.
    assert_eq!(files[0], temp.path().join("app"));
    assert!(!read(temp.path(), "contexts.rs").contains("pub struct"));
    assert!(!read(temp.path(), "hrefs.rs").contains("pub fn"));
}

#[test]
fn test_notest_suppresses_test_helpers() {
    let api = linked(&widget_api());
    let temp = TempDir::new().unwrap();

    let files = generate_into(
        &api,
        temp.path(),
        Options {
            notest: true,
            ..Options::default()
        },
    );

    assert!(
        !files
            .iter()
            .any(|p| p.file_name().is_some_and(|n| n == "tests.rs"))
    );
}

// Scenario B: a widget resource with a get action.
#[test]
fn test_widget_context_generation() {
    let api = linked(&widget_api());
    let temp = TempDir::new().unwrap();
    generate_into(&api, temp.path(), Options::default());

    let contexts = read(temp.path(), "contexts.rs");
    assert!(contexts.contains("pub struct GetWidgetContext {"));
    assert!(contexts.contains("    pub id: String,"));
    assert!(contexts.contains(r#"let id = match req.param("id") {"#));
    assert!(contexts.contains(r#"errors.missing_param("id");"#));
    assert!(contexts.contains("pub fn ok(&self, resp: &mut trestle_runtime::Response, body: &Widget) -> trestle_runtime::Outcome {"));
    assert!(contexts.contains(r#"resp.set_header("Content-Type", "vnd.test.widgets");"#));
    assert!(contexts.contains("resp.send(200, body)"));

    let controllers = read(temp.path(), "controllers.rs");
    assert!(controllers.contains("pub trait WidgetController: trestle_runtime::Controller {"));
    assert!(controllers.contains("fn get(&self, ctx: GetWidgetContext"));
    assert!(controllers.contains("pub fn mount_widget_controller<C>("));
    assert!(controllers.contains(r#"service.mux().register("GET", "/widgets/:id""#));

    let hrefs = read(temp.path(), "hrefs.rs");
    assert!(hrefs.contains("pub fn widget_href(id: impl std::fmt::Display) -> String {"));
    assert!(hrefs.contains(r#"format!("/widgets/{}", id)"#));

    let media_types = read(temp.path(), "media_types.rs");
    assert!(media_types.contains("pub struct Widget {"));
    assert!(media_types.contains(r#"pub const IDENTIFIER: &'static str = "vnd.test.widgets";"#));
}

// Scenario C: a required payload must be assigned or rejected.
#[test]
fn test_required_payload_rejects_missing_body() {
    let mut api = widget_api();
    api.resources[0].actions[0].payload = Some(AttributeDefinition::array(
        AttributeDefinition::primitive(Primitive::Integer),
    ));
    let api = linked(&api);
    let temp = TempDir::new().unwrap();
    generate_into(&api, temp.path(), Options::default());

    let contexts = read(temp.path(), "contexts.rs");
    assert!(contexts.contains("pub payload: Option<Vec<i64>>,"));

    let controllers = read(temp.path(), "controllers.rs");
    assert!(controllers.contains("ctx.payload = Some(unmarshal_get_widget_payload(raw)?)"));
    assert!(controllers.contains("None => return Err(trestle_runtime::Error::missing_payload()),"));
    assert!(controllers.contains("fn unmarshal_get_widget_payload(raw: &trestle_runtime::Decoded) -> Result<Vec<i64>, trestle_runtime::Error> {"));
}

// Scenario D: an optional payload passes through when absent.
#[test]
fn test_optional_payload_allows_missing_body() {
    let mut api = widget_api();
    api.resources[0].actions[0].payload = Some(AttributeDefinition::array(
        AttributeDefinition::primitive(Primitive::Integer),
    ));
    api.resources[0].actions[0].payload_optional = true;
    let api = linked(&api);
    let temp = TempDir::new().unwrap();
    generate_into(&api, temp.path(), Options::default());

    let controllers = read(temp.path(), "controllers.rs");
    assert!(controllers.contains("if let Some(raw) = req.decoded_payload() {"));
    assert!(!controllers.contains("missing_payload"));
}

// Scenario E: two entities deriving the same identifier abort generation
// before any file is written.
#[test]
fn test_naming_collision_fails_before_writing() {
    let mut api = widget_api();
    api.resources.push(widget_resource("widget"));
    let api = linked(&api);
    let temp = TempDir::new().unwrap();

    let err = Generator::new(temp.path(), Options::default())
        .generate(&api)
        .unwrap_err();

    match err {
        GenerationError::NamingCollision { identifier, first, second } => {
            assert!(identifier.starts_with("Get") || identifier.ends_with("Controller"));
            assert_ne!(first, second);
        }
        other => panic!("expected a naming collision, got {other:?}"),
    }
    assert!(!temp.path().join("app").exists());
}

#[test]
fn test_generation_is_deterministic() {
    let api = linked(&widget_api());
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();

    let first_files = generate_into(&api, first.path(), Options::default());
    let second_files = generate_into(&api, second.path(), Options::default());

    assert_eq!(first_files.len(), second_files.len());
    for (a, b) in first_files.iter().skip(1).zip(second_files.iter().skip(1)) {
        assert_eq!(a.file_name(), b.file_name());
        assert_eq!(
            fs::read_to_string(a).unwrap(),
            fs::read_to_string(b).unwrap(),
            "{:?} differs between runs",
            a.file_name()
        );
    }
}

#[test]
fn test_regeneration_replaces_previous_output() {
    let api = linked(&widget_api());
    let temp = TempDir::new().unwrap();

    generate_into(&api, temp.path(), Options::default());
    let stale = temp.path().join("app").join("stale.rs");
    fs::write(&stale, "// leftover").unwrap();

    generate_into(&api, temp.path(), Options::default());
    assert!(!stale.exists());
}

// A writer failure mid-run removes everything written so far.
#[test]
fn test_writer_failure_rolls_back_output() {
    let mut api = widget_api();
    api.media_types[0].views = vec![ViewDefinition {
        name: "tiny".to_string(),
        fields: vec!["bogus".to_string()],
    }];
    let api = linked(&api);
    let temp = TempDir::new().unwrap();

    let err = Generator::new(temp.path(), Options::default())
        .generate(&api)
        .unwrap_err();

    assert!(matches!(err, GenerationError::InvalidShape { .. }));
    assert!(!temp.path().join("app").exists());
}

#[test]
fn test_security_artifact_only_with_schemes() {
    let mut api = widget_api();
    let temp = TempDir::new().unwrap();
    let files = generate_into(&linked(&api), temp.path(), Options::default());
    assert!(
        !files
            .iter()
            .any(|p| p.file_name().is_some_and(|n| n == "security.rs"))
    );

    api.security_schemes.push(SecurityScheme {
        name: "api-key".to_string(),
        description: None,
        kind: SchemeKind::ApiKey {
            header: "X-Api-Key".to_string(),
        },
    });
    api.resources[0].actions[0].security = Some("api-key".to_string());
    let temp = TempDir::new().unwrap();
    let files = generate_into(&linked(&api), temp.path(), Options::default());
    let names: Vec<String> = files
        .iter()
        .skip(1)
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    // Security slots in after controllers, before hrefs.
    assert_eq!(
        names,
        [
            "contexts.rs",
            "controllers.rs",
            "security.rs",
            "hrefs.rs",
            "media_types.rs",
            "user_types.rs",
            "tests.rs"
        ]
    );

    let controllers = read(temp.path(), "controllers.rs");
    assert!(controllers.contains(r#"service.mux().register_guard("GET", "/widgets/:id", "api-key");"#));
    let security = read(temp.path(), "security.rs");
    assert!(security.contains("pub fn new_api_key_security()"));
}

#[test]
fn test_view_projection_generation() {
    let mut api = widget_api();
    api.media_types[0].views = vec![ViewDefinition {
        name: "tiny".to_string(),
        fields: vec!["id".to_string()],
    }];
    let api = linked(&api);
    let temp = TempDir::new().unwrap();
    generate_into(&api, temp.path(), Options::default());

    let media_types = read(temp.path(), "media_types.rs");
    assert!(media_types.contains("pub struct WidgetTiny {"));
    assert!(media_types.contains("pub fn tiny(&self) -> WidgetTiny {"));
}

#[test]
fn test_user_type_payload_round_trip() {
    let mut api = widget_api();
    api.user_types.push(trestle_design::UserTypeDefinition {
        name: "widget-patch".to_string(),
        description: None,
        attribute: AttributeDefinition::object([(
            "name".to_string(),
            AttributeDefinition::primitive(Primitive::String),
        )]),
    });
    api.resources[0].actions[0].payload = Some(AttributeDefinition::new(
        AttributeType::UserType("widget-patch".to_string()),
    ));
    let api = linked(&api);
    let temp = TempDir::new().unwrap();
    generate_into(&api, temp.path(), Options::default());

    let contexts = read(temp.path(), "contexts.rs");
    assert!(contexts.contains("pub payload: Option<WidgetPatch>,"));
    let user_types = read(temp.path(), "user_types.rs");
    assert!(user_types.contains("pub struct WidgetPatch {"));
}
