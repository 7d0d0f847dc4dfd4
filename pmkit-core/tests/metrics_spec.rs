use speculate2::speculate;

speculate! {
    use chrono::NaiveDate;
    use pmkit_core::metrics::{
        analyze_cohorts, analyze_stickiness, percentage_change, ratio, MetricKind, Outcome,
        RetentionSample, StickinessSample,
    };

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn cohort(d: &str, total: i64, retained: i64) -> RetentionSample {
        RetentionSample {
            cohort_date: date(d),
            total_users: total,
            retained_users: retained,
        }
    }

    describe "ratio" {
        it "is a percentage" {
            assert_eq!(ratio(40, 200), 20.0);
        }

        it "is zero for an empty denominator" {
            assert_eq!(ratio(5, 0), 0.0);
        }
    }

    describe "percentage_change" {
        it "is relative to the previous value" {
            assert_eq!(percentage_change(50.0, 60.0), Some(20.0));
            assert_eq!(percentage_change(50.0, 25.0), Some(-50.0));
        }

        it "is undefined after a zero rate" {
            assert_eq!(percentage_change(0.0, 30.0), None);
        }
    }

    describe "retention analysis" {
        it "sorts cohorts by date and labels each change" {
            let analysis = analyze_cohorts(&[
                cohort("2026-03-01", 100, 45),
                cohort("2026-01-01", 100, 50),
                cohort("2026-02-01", 100, 60),
                cohort("2026-04-01", 100, 45),
            ]);

            let dates: Vec<String> = analysis.points.iter().map(|p| p.date.to_string()).collect();
            assert_eq!(dates, vec!["2026-01-01", "2026-02-01", "2026-03-01", "2026-04-01"]);

            let outcomes: Vec<Outcome> = analysis.points.iter().map(|p| p.outcome).collect();
            assert_eq!(
                outcomes,
                vec![Outcome::Stable, Outcome::Positive, Outcome::Negative, Outcome::Stable]
            );
            assert_eq!(analysis.points[0].change, None);
            assert_eq!(analysis.points[1].change, Some(20.0));
            assert_eq!(analysis.points[3].change, Some(0.0));
        }

        it "attaches the retention recommendation for the outcome" {
            let analysis = analyze_cohorts(&[cohort("2026-01-01", 100, 50), cohort("2026-02-01", 100, 40)]);
            let last = &analysis.points[1];
            assert_eq!(last.recommendation, Outcome::Negative.recommendation(MetricKind::Retention));
        }

        it "keeps a zero-user cohort at zero percent" {
            let analysis = analyze_cohorts(&[cohort("2026-01-01", 0, 0), cohort("2026-02-01", 10, 5)]);
            assert_eq!(analysis.points[0].rate, 0.0);
            assert_eq!(analysis.points[1].change, None);
            assert_eq!(analysis.points[1].outcome, Outcome::Stable);
        }

        it "summarizes the series" {
            let analysis = analyze_cohorts(&[cohort("2026-01-01", 100, 40), cohort("2026-02-01", 100, 60)]);
            assert_eq!(analysis.summary.count, 2);
            assert_eq!(analysis.summary.average_rate, Some(50.0));
            assert_eq!(analysis.summary.latest_rate, Some(60.0));
            assert_eq!(analysis.summary.latest_outcome, Some(Outcome::Positive));
        }

        it "has an empty summary without data" {
            let analysis = analyze_cohorts::<RetentionSample>(&[]);
            assert!(analysis.points.is_empty());
            assert_eq!(analysis.summary.average_rate, None);
        }
    }

    describe "stickiness analysis" {
        it "uses dau over mau" {
            let analysis = analyze_stickiness(&[
                StickinessSample { analysis_date: date("2026-01-01"), dau: 200, mau: 1000 },
                StickinessSample { analysis_date: date("2026-02-01"), dau: 250, mau: 1000 },
            ]);

            assert_eq!(analysis.kind, MetricKind::Stickiness);
            assert_eq!(analysis.points[0].rate, 20.0);
            assert_eq!(analysis.points[1].rate, 25.0);
            assert_eq!(analysis.points[1].change, Some(25.0));
            assert_eq!(
                analysis.points[1].recommendation,
                Outcome::Positive.recommendation(MetricKind::Stickiness)
            );
        }
    }

    describe "samples" {
        it "accept retained equal to total" {
            assert!(cohort("2026-01-01", 50, 50).validate().is_ok());
        }

        it "reject more retained than total users" {
            let err = cohort("2026-01-01", 10, 11).validate().unwrap_err();
            assert_eq!(err.fields(), vec!["retained_users".to_string()]);
        }

        it "reject negative counts" {
            let err = cohort("2026-01-01", -5, 0).validate().unwrap_err();
            assert_eq!(err.fields(), vec!["total_users".to_string()]);

            let err = StickinessSample { analysis_date: date("2026-01-01"), dau: -1, mau: 10 }
                .validate()
                .unwrap_err();
            assert_eq!(err.fields(), vec!["dau".to_string()]);
        }

        it "reject dau above mau" {
            let err = StickinessSample { analysis_date: date("2026-01-01"), dau: 20, mau: 10 }
                .validate()
                .unwrap_err();
            assert_eq!(err.fields(), vec!["dau".to_string()]);
        }
    }
}
