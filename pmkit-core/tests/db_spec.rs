use speculate2::speculate;

speculate! {
    use pmkit_core::models::{
        CohortInput, FlatDocument, Prd, RoadmapColumn, RoadmapFormat, RoadmapGoal, RoadmapInput,
        StickinessInput, UatForm, User,
    };
    use pmkit_core::{Database, ValidationError};

    fn setup_db() -> Database {
        let db = Database::open_memory().expect("Failed to create test database");
        db.migrate().expect("Failed to migrate test database");
        db
    }

    fn register(db: &Database, email: &str) -> User {
        db.register_user(email).expect("Failed to register user")
    }

    fn cohort(date: &str, total: i64, retained: i64) -> CohortInput {
        CohortInput {
            cohort_date: Some(date.to_string()),
            total_users: Some(total),
            retained_users: Some(retained),
        }
    }

    fn sample_prd(name: &str) -> Prd {
        Prd {
            product_name: name.to_string(),
            document_owner: "Dana".to_string(),
            overview: "Self-serve analytics".to_string(),
            problem_statement: "PMs wait days for reports".to_string(),
            target_audience: "Product managers".to_string(),
            features: "Dashboards\nAlerts".to_string(),
            timeline: "Q3".to_string(),
            success_metrics: "Weekly active PMs".to_string(),
            ..Prd::default()
        }
    }

    fn sample_roadmap(columns: &[&str]) -> RoadmapInput {
        RoadmapInput {
            roadmap_header: Some("2026 plan".to_string()),
            format: Some("now_next_later".to_string()),
            column_count: Some(columns.len() as i64),
            roadmap: columns
                .iter()
                .map(|title| RoadmapColumn {
                    title: title.to_string(),
                    goals: vec![RoadmapGoal {
                        title: format!("{title} goal"),
                        features: vec![],
                    }],
                })
                .collect(),
        }
    }

    describe "users" {
        it "normalizes email and is idempotent" {
            let db = setup_db();
            let first = register(&db, "  Ana@Example.com ");
            let second = register(&db, "ana@example.com");

            assert_eq!(first.id, second.id);
            assert_eq!(first.email, "ana@example.com");
        }

        it "returns one user for concurrent registrations of an email" {
            let db = setup_db();
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let db = db.clone();
                    std::thread::spawn(move || db.register_user("race@example.com"))
                })
                .collect();

            let mut ids: Vec<_> = handles
                .into_iter()
                .map(|h| h.join().unwrap().unwrap().id)
                .collect();
            ids.dedup();
            assert_eq!(ids.len(), 1);
        }

        it "rejects an address without an at sign" {
            let db = setup_db();
            let err = db.register_user("not-an-email").unwrap_err();
            assert!(err.downcast_ref::<ValidationError>().is_some());
        }
    }

    describe "cohorts" {
        it "lists cohorts oldest first" {
            let db = setup_db();
            let user = register(&db, "pm@example.com");
            for input in [cohort("2026-03-01", 100, 40), cohort("2026-01-01", 100, 50)] {
                let fields = input.validate().unwrap();
                db.create_cohort(user.id, &fields).unwrap();
            }

            let cohorts = db.list_cohorts(user.id).unwrap();
            assert_eq!(cohorts.len(), 2);
            assert_eq!(cohorts[0].cohort_date.to_string(), "2026-01-01");
        }

        it "writes nothing when a required field is missing" {
            let db = setup_db();
            let user = register(&db, "pm@example.com");
            let input = CohortInput {
                cohort_date: Some("2026-01-01".to_string()),
                total_users: None,
                retained_users: Some(10),
            };

            match input.validate() {
                Err(ValidationError::MissingFields(fields)) => {
                    assert_eq!(fields, vec!["total_users".to_string()]);
                }
                other => panic!("expected missing fields, got {other:?}"),
            }
            assert!(db.list_cohorts(user.id).unwrap().is_empty());
        }

        it "rejects more retained than total users" {
            let err = cohort("2026-01-01", 10, 11).validate().unwrap_err();
            assert_eq!(err.fields(), vec!["retained_users".to_string()]);
        }

        it "keeps the id on update" {
            let db = setup_db();
            let user = register(&db, "pm@example.com");
            let created = db
                .create_cohort(user.id, &cohort("2026-01-01", 100, 50).validate().unwrap())
                .unwrap();

            let updated = db
                .update_cohort(user.id, created.id, &cohort("2026-01-01", 200, 90).validate().unwrap())
                .unwrap();
            assert!(updated);

            let cohorts = db.list_cohorts(user.id).unwrap();
            assert_eq!(cohorts.len(), 1);
            assert_eq!(cohorts[0].id, created.id);
            assert_eq!(cohorts[0].total_users, 200);
        }

        it "hides other users' records" {
            let db = setup_db();
            let owner = register(&db, "owner@example.com");
            let other = register(&db, "other@example.com");
            let created = db
                .create_cohort(owner.id, &cohort("2026-01-01", 100, 50).validate().unwrap())
                .unwrap();

            assert!(db.get_cohort(other.id, created.id).unwrap().is_none());
            assert!(!db.delete_cohort(other.id, created.id).unwrap());
            assert!(db.list_cohorts(other.id).unwrap().is_empty());
            assert!(db.get_cohort(owner.id, created.id).unwrap().is_some());
        }
    }

    describe "stickiness" {
        it "stores and deletes snapshots" {
            let db = setup_db();
            let user = register(&db, "pm@example.com");
            let input = StickinessInput {
                analysis_date: Some("2026-02-01".to_string()),
                dau: Some(300),
                mau: Some(1000),
            };
            let created = db.create_stickiness(user.id, &input.validate().unwrap()).unwrap();

            assert_eq!(db.list_stickiness(user.id).unwrap().len(), 1);
            assert!(db.delete_stickiness(user.id, created.id).unwrap());
            assert!(db.list_stickiness(user.id).unwrap().is_empty());
        }

        it "rejects dau above mau" {
            let input = StickinessInput {
                analysis_date: Some("2026-02-01".to_string()),
                dau: Some(2000),
                mau: Some(1000),
            };
            assert_eq!(input.validate().unwrap_err().fields(), vec!["dau".to_string()]);
        }
    }

    describe "documents" {
        it "round-trips every prd field" {
            let db = setup_db();
            let user = register(&db, "pm@example.com");
            let mut prd = sample_prd("Insights");
            prd.open_questions = "Pricing?".to_string();

            let created = db.create_document(user.id, &prd).unwrap();
            let loaded = db.get_document::<Prd>(user.id, created.id).unwrap().unwrap();

            assert_eq!(loaded.body, prd);
        }

        it "lists the most recently edited first" {
            let db = setup_db();
            let user = register(&db, "pm@example.com");
            let first = db.create_document(user.id, &sample_prd("First")).unwrap();
            db.create_document(user.id, &sample_prd("Second")).unwrap();

            std::thread::sleep(std::time::Duration::from_millis(5));
            assert!(db.update_document(user.id, first.id, &sample_prd("First v2")).unwrap());

            let prds = db.list_documents::<Prd>(user.id).unwrap();
            assert_eq!(prds[0].id, first.id);
            assert_eq!(prds[0].body.product_name, "First v2");
        }

        it "reports every missing required uat field" {
            let err = UatForm::default().validate().unwrap_err();
            let required: Vec<String> = UatForm::FIELDS
                .iter()
                .filter(|f| f.required)
                .map(|f| f.name.to_string())
                .collect();
            assert_eq!(err.fields(), required);
        }

        it "does not update another user's document" {
            let db = setup_db();
            let owner = register(&db, "owner@example.com");
            let other = register(&db, "other@example.com");
            let created = db.create_document(owner.id, &sample_prd("Mine")).unwrap();

            assert!(!db.update_document(other.id, created.id, &sample_prd("Theirs")).unwrap());
            let loaded = db.get_document::<Prd>(owner.id, created.id).unwrap().unwrap();
            assert_eq!(loaded.body.product_name, "Mine");
        }
    }

    describe "roadmaps" {
        it "stores the column tree" {
            let db = setup_db();
            let user = register(&db, "pm@example.com");
            let fields = sample_roadmap(&["Now", "Next", "Later"]).validate().unwrap();

            let created = db.create_roadmap(user.id, &fields).unwrap();
            let loaded = db.get_roadmap(user.id, created.id).unwrap().unwrap();

            assert_eq!(loaded.format, RoadmapFormat::NowNextLater);
            assert_eq!(loaded.column_count, 3);
            assert_eq!(loaded.roadmap, fields.roadmap);
        }

        it "rejects a column count that disagrees with the columns" {
            let mut input = sample_roadmap(&["Q1", "Q2"]);
            input.column_count = Some(3);
            assert_eq!(input.validate().unwrap_err().fields(), vec!["column_count".to_string()]);
        }

        it "rejects an unknown format" {
            let mut input = sample_roadmap(&["Q1"]);
            input.format = Some("kanban".to_string());
            assert_eq!(input.validate().unwrap_err().fields(), vec!["format".to_string()]);
        }
    }

    describe "on disk" {
        it "persists across reopen" {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("nested").join("pmkit.db");

            {
                let db = Database::open(&path).unwrap();
                db.migrate().unwrap();
                register(&db, "pm@example.com");
            }

            let db = Database::open(&path).unwrap();
            db.migrate().unwrap();
            assert!(db.find_user_by_email("pm@example.com").unwrap().is_some());
        }
    }
}
