// OpenAPI schema contract test

use utoipa::OpenApi;

#[test]
fn openapi_schema_is_valid_json() {
    let schema = serde_json::to_string_pretty(&moodjournal_backend::ApiDoc::openapi())
        .expect("OpenAPI schema should serialize to JSON");
    assert!(!schema.is_empty(), "Schema should not be empty");
    assert!(schema.contains("Mood Journal API"), "Schema should contain project name");
}

#[test]
fn openapi_schema_documents_both_endpoints() {
    let doc = moodjournal_backend::ApiDoc::openapi();
    let value = serde_json::to_value(&doc).expect("Schema should convert to Value");
    let paths = value.get("paths").expect("Schema should have 'paths' section");
    assert!(paths.get("/").is_some(), "Schema should document GET /");
    assert!(paths["/analyze"].get("post").is_some(), "Schema should document POST /analyze");
}

#[test]
fn openapi_schema_names_response_types() {
    let value = serde_json::to_value(moodjournal_backend::ApiDoc::openapi()).unwrap();
    let schemas = &value["components"]["schemas"];
    for name in ["JournalRequest", "AnalysisResponse", "SupportPayload", "PlaylistRef", "MoodCategory"] {
        assert!(schemas.get(name).is_some(), "missing schema {name}");
    }
}
