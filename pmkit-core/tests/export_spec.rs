use speculate2::speculate;

speculate! {
    use chrono::Utc;
    use pmkit_core::export::{export_document, ExportFormat};
    use pmkit_core::models::{DocumentRecord, FlatDocument, Prd, UatForm};
    use uuid::Uuid;

    fn record<T>(body: T) -> DocumentRecord<T> {
        DocumentRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            body,
        }
    }

    fn prd() -> Prd {
        Prd {
            product_name: "Team Insights".to_string(),
            overview: "Dashboards <for> PMs & leads".to_string(),
            features: "Cohorts\nFunnels".to_string(),
            ..Prd::default()
        }
    }

    fn field_keys<T: FlatDocument>() -> Vec<String> {
        let value = serde_json::to_value(T::default()).unwrap();
        let mut keys: Vec<String> = value.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    fn declared<T: FlatDocument>() -> Vec<String> {
        let mut names: Vec<String> = T::FIELDS.iter().map(|f| f.name.to_string()).collect();
        names.sort();
        names
    }

    describe "document fields" {
        it "declare every prd field exactly once" {
            assert_eq!(Prd::FIELDS.len(), 31);
            assert_eq!(declared::<Prd>(), field_keys::<Prd>());
        }

        it "declare every uat field exactly once" {
            assert_eq!(UatForm::FIELDS.len(), 20);
            assert_eq!(declared::<UatForm>(), field_keys::<UatForm>());
        }
    }

    describe "markdown" {
        it "renders non-empty fields as sections" {
            let exported = export_document(&record(prd()), ExportFormat::Markdown);

            assert_eq!(exported.filename, "team-insights.md");
            assert!(exported.body.starts_with("# Team Insights\n"));
            assert!(exported.body.contains("## Features\n\nCohorts\nFunnels\n"));
            assert!(!exported.body.contains("## Budget"));
        }
    }

    describe "doc" {
        it "is escaped html with a word content type" {
            let exported = export_document(&record(prd()), ExportFormat::Doc);

            assert_eq!(exported.filename, "team-insights.doc");
            assert_eq!(exported.content_type, "application/msword");
            assert!(exported.body.contains("<h1>Team Insights</h1>"));
            assert!(exported.body.contains("Dashboards &lt;for&gt; PMs &amp; leads"));
            assert!(exported.body.contains("<p>Cohorts</p>\n<p>Funnels</p>"));
        }

        it "falls back to the document title for a blank form" {
            let exported = export_document(&record(UatForm::default()), ExportFormat::Doc);
            assert_eq!(exported.filename, "user-acceptance-testing-plan.doc");
        }
    }

    describe "format names" {
        it "accepts aliases" {
            assert_eq!(ExportFormat::from_str("word"), Some(ExportFormat::Doc));
            assert_eq!(ExportFormat::from_str("md"), Some(ExportFormat::Markdown));
            assert_eq!(ExportFormat::from_str("pdf"), None);
        }
    }
}
