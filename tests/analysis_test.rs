mod common;

use common::*;
use docx_rs::{Docx, Header};
use doxfill::template::{analyze, analyze_bytes, FieldKind, FieldMeta, TemplateMetadata};

#[cfg(test)]
mod analysis_tests {
    use super::*;

    #[test]
    fn test_sections_and_ranges() {
        let metadata = analyze_bytes(&project_plan()).unwrap();
        let ids: Vec<_> = metadata.auto_sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["overview", "budget", "deliverables"]);

        let overview = &metadata.auto_sections[0];
        assert_eq!(overview.heading_index, 0);
        assert_eq!((overview.content_start, overview.content_end), (1, 4));
        assert_eq!(overview.paragraphs.len(), 3);
        assert_eq!(
            overview.default_text,
            "This plan covers the migration of the billing system.\n\n\
             Work starts in the first quarter.\n\n\
             Owners are listed in the appendix."
        );

        let deliverables = &metadata.auto_sections[2];
        assert!(
            deliverables
                .paragraphs
                .iter()
                .all(|p| p.format.list_properties.is_some()),
            "Bullet paragraphs should carry their numbering"
        );
    }

    #[test]
    fn test_analysis_is_idempotent() {
        let bytes = project_plan();
        let first = analyze_bytes(&bytes).unwrap();
        let second = analyze_bytes(&bytes).unwrap();
        assert_eq!(first, second);

        let json = serde_json::to_string(&first).unwrap();
        let restored: TemplateMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, first);
    }

    #[test]
    fn test_field_map_matches_schema_one_to_one() {
        let metadata = analyze_bytes(&project_plan()).unwrap();
        let mut names: Vec<_> = metadata
            .schema
            .iter()
            .flat_map(|group| group.fields.iter().map(|f| f.name.clone()))
            .collect();
        names.sort();
        let keys: Vec<_> = metadata.field_map.keys().cloned().collect();
        assert_eq!(names, keys);
        assert_eq!(
            keys,
            vec![
                "budget_content",
                "budget_table_1",
                "deliverables_content",
                "overview_content"
            ]
        );
    }

    #[test]
    fn test_table_is_associated_with_preceding_section() {
        let metadata = analyze_bytes(&project_plan()).unwrap();
        let table = &metadata.tables[0];
        assert_eq!(table.section_id.as_deref(), Some("budget"));
        assert_eq!(table.label, "Phase");
        assert_eq!(table.rows.len(), 4);
        assert_eq!(table.rows[2], vec!["Build", "40"]);

        let budget = metadata
            .schema
            .iter()
            .find(|group| group.section == "Budget")
            .unwrap();
        assert_eq!(budget.fields[1].kind, FieldKind::Table);
        assert!(matches!(
            metadata.field_map["budget_table_1"],
            FieldMeta::Table { table_index: 0, .. }
        ));
    }

    #[test]
    fn test_table_after_consecutive_headings_belongs_to_the_second() {
        let bytes = pack(
            with_heading_styles(Docx::new())
                .add_paragraph(heading("Budget"))
                .add_paragraph(heading("Costs"))
                .add_table(table(&[&["Item", "Amount"], &["Licences", "12"]]))
                .add_paragraph(text("Totals are reviewed monthly.")),
        );
        let metadata = analyze_bytes(&bytes).unwrap();

        let budget = &metadata.auto_sections[0];
        assert_eq!((budget.content_start, budget.content_end), (1, 1));
        assert_eq!(metadata.tables[0].section_id.as_deref(), Some("costs"));
        assert!(metadata.field_map.contains_key("costs_table_1"));
        assert!(!metadata.field_map.contains_key("budget_table_1"));
    }

    #[test]
    fn test_orphan_table_without_sections() {
        let bytes = pack(
            Docx::new()
                .add_paragraph(text("just some text before the table."))
                .add_table(table(&[&["", "b"], &["c", "d"]])),
        );
        let metadata = analyze_bytes(&bytes).unwrap();
        assert!(metadata.auto_sections.is_empty());
        assert_eq!(metadata.schema.len(), 1);
        assert_eq!(metadata.schema[0].section, "Table 1");
        assert_eq!(metadata.schema[0].fields[0].name, "table_1");
    }

    #[test]
    fn test_duplicate_headings_get_unique_ids() {
        let bytes = pack(
            with_heading_styles(Docx::new())
                .add_paragraph(heading("Notes"))
                .add_paragraph(text("first body"))
                .add_paragraph(heading("Notes"))
                .add_paragraph(text("second body"))
                .add_paragraph(heading("Notes!"))
                .add_paragraph(text("third body")),
        );
        let metadata = analyze_bytes(&bytes).unwrap();
        let ids: Vec<_> = metadata.auto_sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["notes", "notes_2", "notes_3"]);
    }

    #[test]
    fn test_numbered_mode_ignores_other_heuristics() {
        let bytes = pack(
            Docx::new()
                .add_paragraph(bold("Executive Summary"))
                .add_paragraph(text("NOTES"))
                .add_paragraph(text("Deliverables:"))
                .add_paragraph(text("1 Introduction"))
                .add_paragraph(text("The introduction text."))
                .add_paragraph(text("2.1 Layout"))
                .add_paragraph(text("The layout text.")),
        );
        let metadata = analyze_bytes(&bytes).unwrap();
        let headings: Vec<_> = metadata
            .auto_sections
            .iter()
            .map(|s| s.heading.as_str())
            .collect();
        assert_eq!(headings, vec!["1 Introduction", "2.1 Layout"]);
    }

    #[test]
    fn test_typed_ordered_list_does_not_switch_to_numbered_mode() {
        let bytes = pack(
            with_heading_styles(Docx::new())
                .add_paragraph(heading("Overview"))
                .add_paragraph(text("Follow these steps in order."))
                .add_paragraph(text("1. Install the tool"))
                .add_paragraph(text("2. Run the migration"))
                .add_paragraph(heading("Budget"))
                .add_paragraph(text("Costs are estimated per phase.")),
        );
        let metadata = analyze_bytes(&bytes).unwrap();
        let ids: Vec<_> = metadata.auto_sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["overview", "budget"]);

        let overview = &metadata.auto_sections[0];
        assert_eq!((overview.content_start, overview.content_end), (1, 4));
        assert!(overview.default_text.contains("1. Install the tool"));
    }

    #[test]
    fn test_heuristic_mode_without_numbering() {
        let bytes = pack(
            Docx::new()
                .add_paragraph(bold("Executive Summary"))
                .add_paragraph(text("the summary body text goes here."))
                .add_paragraph(text("NEXT STEPS"))
                .add_paragraph(text("more body text follows here."))
                .add_paragraph(text("Open questions:"))
                .add_paragraph(text("none so far, which is nice.")),
        );
        let metadata = analyze_bytes(&bytes).unwrap();
        let ids: Vec<_> = metadata.auto_sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["executive_summary", "next_steps", "open_questions"]);
    }

    #[test]
    fn test_placeholders_found_in_body_tables_and_headers() {
        let bytes = pack(
            Docx::new()
                .header(Header::new().add_paragraph(text("Prepared for {{ client }}")))
                .add_paragraph(text("Dear {{name}}, you are {{age}}."))
                .add_table(table(&[&["{{project.code}}", "{{name}}"]])),
        );
        let document = load(&bytes);
        let metadata = analyze(&document);
        assert_eq!(
            metadata.placeholders,
            vec!["age", "client", "name", "project.code"]
        );
        assert_eq!(metadata.fields().placeholders, metadata.placeholders);
    }

    #[test]
    fn test_section_ids_stand_in_for_missing_placeholders() {
        let metadata = analyze_bytes(&project_plan()).unwrap();
        assert!(metadata.placeholders.is_empty());
        assert_eq!(
            metadata.fields().placeholders,
            vec!["overview", "budget", "deliverables"]
        );
    }
}
