mod common;

use common::*;
use doxfill::template::{
    FsMetadataStore, MemoryMetadataStore, MetadataStore, TemplateLibrary, DOCX_CONTENT_TYPE,
};
use doxfill::{GenerateRequest, TemplateError, TemplateService, SCHEMA_VERSION};
use serde_json::json;

#[cfg(test)]
mod service_tests {
    use super::*;

    #[test]
    fn test_upload_stores_document_and_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let service = TemplateService::open(dir.path());

        let uploaded = service.upload("Project Plan.docx", &project_plan()).unwrap();
        assert_eq!(uploaded.template_id, "Project_Plan.docx");
        assert_eq!(
            uploaded.fields.placeholders,
            vec!["overview", "budget", "deliverables"]
        );
        assert!(dir.path().join("Project_Plan.docx").is_file());
        assert!(dir.path().join("_meta").join("Project_Plan.docx.json").is_file());
        assert_eq!(service.list().unwrap(), vec!["Project_Plan.docx"]);

        let fields = service.fields("Project_Plan.docx").unwrap();
        assert_eq!(fields, uploaded.fields);
    }

    #[test]
    fn test_upload_rejects_other_formats() {
        let dir = tempfile::tempdir().unwrap();
        let service = TemplateService::open(dir.path());
        let err = service.upload("plan.pdf", b"%PDF").unwrap_err();
        assert!(matches!(err, TemplateError::UnsupportedFormat(_)));
        assert!(service.list().unwrap().is_empty());
    }

    #[test]
    fn test_generate_uses_fields_over_data() {
        let dir = tempfile::tempdir().unwrap();
        let service = TemplateService::open(dir.path());
        service.upload("plan.docx", &project_plan()).unwrap();

        let request: GenerateRequest = serde_json::from_value(json!({
            "template_id": "plan.docx",
            "data": {"budget_content": "From data."},
            "fields": {"budget_content": "From fields."},
        }))
        .unwrap();
        assert_eq!(request.output_filename, "generated.docx");

        let generated = service.generate(&request).unwrap();
        assert_eq!(generated.content_type, DOCX_CONTENT_TYPE);
        assert_eq!(generated.filename, "generated.docx");

        let texts = visible_texts(&load(&generated.bytes));
        assert!(texts.iter().any(|t| t == "From fields."));
        assert!(!texts.iter().any(|t| t == "From data."));
    }

    #[test]
    fn test_generate_unknown_template_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let service = TemplateService::open(dir.path());
        let request = GenerateRequest::new("missing.docx", Default::default());
        let err = service.generate(&request).unwrap_err();
        assert!(matches!(err, TemplateError::NotFound(_)));
    }

    #[test]
    fn test_stale_metadata_is_recomputed() {
        let dir = tempfile::tempdir().unwrap();
        let library = TemplateLibrary::new(dir.path());
        library.save("plan.docx", &project_plan()).unwrap();

        let store = MemoryMetadataStore::new();
        let service = TemplateService::new(library, store);
        let mut metadata = service.ensure_metadata("plan.docx").unwrap();
        assert_eq!(metadata.schema_version, SCHEMA_VERSION);

        metadata.schema_version = SCHEMA_VERSION + 1;
        metadata.auto_sections.clear();
        service.store().save("plan.docx", &metadata).unwrap();

        let refreshed = service.ensure_metadata("plan.docx").unwrap();
        assert_eq!(refreshed.schema_version, SCHEMA_VERSION);
        assert_eq!(refreshed.auto_sections.len(), 3);
    }

    #[test]
    fn test_cached_metadata_is_reused() {
        let dir = tempfile::tempdir().unwrap();
        let service = TemplateService::open(dir.path());
        service.upload("plan.docx", &project_plan()).unwrap();

        let store = FsMetadataStore::new(dir.path().join("_meta"));
        let mut cached = store.load("plan.docx").unwrap().unwrap();
        cached.placeholders = vec!["from_cache".to_string()];
        store.save("plan.docx", &cached).unwrap();

        let fields = service.fields("plan.docx").unwrap();
        assert_eq!(fields.placeholders, vec!["from_cache"]);
    }
}
