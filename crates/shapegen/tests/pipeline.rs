//! End-to-end tests: fixture files through the whole pipeline.

use shapegen::generate::{GenerateError, Generated, Unit, generate_unit, media_type_for_format};
use shapegen::loader::FileLoader;
use shapegen_typegen::input::tree::parse_yaml;
use shapegen_typegen::model::{PrimitiveType, PropertyDefinition, PropertyValue, Scalar};
use shapegen_typegen::naming::{AccessorKind, accessor_kind};
use shapegen_typegen::resolve::resolve_property;
use shapegen_typegen::{
    BackendRegistry, EmissionMode, ParseOptions, ParserRegistry, TargetType, parse_properties,
};

fn fixtures() -> FileLoader {
    FileLoader::new(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures"))
}

fn fixture(name: &str) -> String {
    std::fs::read_to_string(fixtures().resolve(name)).unwrap()
}

fn generate(unit: &Unit) -> Result<Generated, GenerateError> {
    generate_unit(
        unit,
        &fixtures(),
        &ParserRegistry::builtin(),
        &BackendRegistry::builtin(),
    )
}

fn unit(input: &str, type_name: &str, backend: &str) -> Unit {
    let mut unit = Unit::new(input, type_name);
    unit.backend = backend.to_string();
    unit
}

// === Properties ===

#[test]
fn flat_keys_survive_parse_and_flatten() {
    let text = fixture("app.properties");
    let tree = parse_properties(&text, &ParseOptions::default()).unwrap();

    let source_keys: Vec<String> = shapegen_core::read_entries(&text)
        .unwrap()
        .into_iter()
        .map(|e| e.key)
        .collect();
    let flattened: Vec<String> = tree.flatten(".").into_iter().map(|(k, _)| k).collect();
    assert_eq!(flattened, source_keys);
}

#[test]
fn dotted_keys_nest() {
    let tree = parse_properties("app.name=Demo\napp.port=8080", &ParseOptions::default()).unwrap();
    assert_eq!(
        tree.get_path(&["app", "name"]),
        Some(&PropertyValue::Scalar(Scalar::String("Demo".into())))
    );
    assert_eq!(
        tree.get_path(&["app", "port"]),
        Some(&PropertyValue::Scalar(Scalar::Integer(8080)))
    );
}

#[test]
fn yaml_document_becomes_tree() {
    let tree = parse_yaml(&fixture("server.yaml")).unwrap();
    assert_eq!(
        tree.get_path(&["server", "host"]),
        Some(&PropertyValue::Scalar(Scalar::String("localhost".into())))
    );
    assert_eq!(
        tree.get_path(&["server", "tags"]),
        Some(&PropertyValue::List(vec![
            Scalar::String("a".into()).into(),
            Scalar::String("b".into()).into(),
        ]))
    );
    // root, server, limits
    assert_eq!(tree.depth(), 3);
}

#[test]
fn properties_embed_in_java() {
    let generated = generate(&unit("app.properties", "AppConfig", "java")).unwrap();
    let out = &generated.source;
    assert!(out.starts_with("// Generated by shapegen. Do not edit.\n"));
    assert!(out.contains("public final class AppConfig {"));
    assert!(out.contains("public static final class App {"));
    assert!(out.contains("private final double ratio = 0.75;"));
    assert!(out.contains("public boolean isDebug() {"));
    assert!(out.contains("public static final class Pool {"));
    assert!(out.contains("private final int maxSize = 20;"));
    assert!(out.contains("private final Db db = new Db();"));
}

#[test]
fn properties_shape_in_rust() {
    let mut unit = unit("app.properties", "AppConfig", "rust");
    unit.generation.mode = EmissionMode::Shape;
    let generated = generate(&unit).unwrap();
    assert_eq!(generated.file_name, "app_config.rs");
    let out = &generated.source;
    assert!(out.contains("pub mod app_config {"));
    assert!(out.contains("pub mod db {"));
    assert!(out.contains("app: Option<app_config::App>,"));
    assert!(out.contains("pool: Option<db::Pool>,"));
    assert!(out.contains("pub fn is_debug(&self) -> Option<bool> {"));
    assert!(out.contains("pub struct AppConfigBuilder {"));
}

#[test]
fn list_delimiter_splits_values() {
    let options = ParseOptions {
        list_delimiter: Some(','),
        ..Default::default()
    };
    let tree = parse_properties("ports=80, 443\nhosts=a,b\n", &options).unwrap();
    assert_eq!(
        tree.get("ports"),
        Some(&PropertyValue::List(vec![
            Scalar::Integer(80).into(),
            Scalar::Integer(443).into()
        ]))
    );
}

// === Schemas ===

#[test]
fn int64_required_id_is_boxed_long() {
    let mut id = PropertyDefinition::new("id", PrimitiveType::Integer);
    id.format = Some("int64".into());
    id.required = true;
    let ty = resolve_property(&id, false);
    assert_eq!(ty, TargetType::I64);
    assert_eq!(accessor_kind(&ty), AccessorKind::Get);

    let generated = generate(&unit("pet.schema.json", "Pet", "java")).unwrap();
    assert!(generated.source.contains("@NotNull\n    private Long id;"));
    assert!(generated.source.contains("public Long getId() {"));
}

#[test]
fn boolean_accessor_uses_is() {
    let java = generate(&unit("pet.schema.json", "Pet", "java")).unwrap().source;
    assert!(java.contains("public Boolean isActive() {"));
    assert!(!java.contains("getActive"));

    let rust = generate(&unit("pet.schema.json", "Pet", "rust")).unwrap().source;
    assert!(rust.contains("pub fn is_active(&self) -> Option<bool> {"));
    assert!(!rust.contains("get_active"));
}

#[test]
fn rust_shapes_import_validate() {
    let rust = generate(&unit("pet.schema.json", "Pet", "rust")).unwrap().source;
    assert!(rust.contains("\nuse validator::Validate;\n\npub mod pet {\n    use validator::Validate;\n"));
    assert!(rust.contains("#[validate(nested)]\n    owner: Option<pet::Owner>,"));
}

#[test]
fn schema_metadata_reaches_the_output() {
    let mut unit = unit("pet.schema.json", "Pet", "java");
    unit.generation.enum_types = true;
    let java = generate(&unit).unwrap().source;
    assert!(java.contains(" * A pet in the store"));
    assert!(java.contains("@Size(min = 1, max = 64)"));
    assert!(java.contains("@Size(max = 10)\n    private List<String> tags;"));
    assert!(java.contains("public enum Status {"));
    assert!(java.contains("public static class Owner {"));
    assert!(java.contains("@Email"));
    assert!(java.contains("@Valid\n    private Owner owner;"));
}

#[test]
fn openapi_component_with_reference() {
    let mut unit = unit("petstore.openapi.yaml", "Order", "java");
    unit.parse.schema = Some("Order".into());
    let java = generate(&unit).unwrap().source;
    assert!(java.contains("public class Order {"));
    assert!(java.contains("private OffsetDateTime shipDate;"));
    assert!(java.contains("import java.time.OffsetDateTime;"));
    assert!(java.contains("@Valid\n    private Category category;"));
    assert!(java.contains("@NotNull\n    @DecimalMin(\"1\")\n    private Integer quantity;"));
}

#[test]
fn missing_openapi_schema_is_a_reference_error() {
    let mut unit = unit("petstore.openapi.yaml", "Pet", "java");
    unit.parse.schema = Some("Pet".into());
    let err = generate(&unit).unwrap_err();
    assert!(matches!(err, GenerateError::SchemaReference { .. }));
    assert!(err.to_string().contains("petstore.openapi.yaml"));
    assert!(err.to_string().contains("Pet"));
}

// === Messages ===

fn messages(backend: &str) -> String {
    let mut unit = unit("messages.properties", "Messages", backend);
    unit.media_type = media_type_for_format("messages").map(String::from);
    generate(&unit).unwrap().source
}

#[test]
fn plural_argument_appears_once() {
    let java = messages("java");
    assert!(java.contains("String cartItems(Number count);"));
    assert!(java.contains("String greeting(Object name);"));
    assert!(java.contains("String orderShipped(Object id, Date date);"));
    assert!(java.contains("String title();"));

    let rust = messages("rust");
    assert!(rust.contains("fn cart_items(&self, count: f64) -> String;"));
    assert!(rust.contains("args: &[\"count\"],"));
    assert!(rust.contains("fn order_shipped(&self, id: impl Into<MessageArg>, date: chrono::NaiveDateTime) -> String;"));
}

// === Determinism ===

#[test]
fn emission_is_deterministic() {
    for backend in ["java", "rust"] {
        for (input, name) in [
            ("app.properties", "AppConfig"),
            ("server.yaml", "ServerConfig"),
            ("pet.schema.json", "Pet"),
        ] {
            let first = generate(&unit(input, name, backend)).unwrap();
            let second = generate(&unit(input, name, backend)).unwrap();
            assert_eq!(first, second, "{input} via {backend}");
        }
    }
}
