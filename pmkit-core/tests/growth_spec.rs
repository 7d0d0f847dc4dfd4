use speculate2::speculate;

speculate! {
    use pmkit_core::growth::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    describe "referral growth" {
        it "compounds the multiplier per cycle" {
            let result = referral_growth(&ReferralInput {
                initial_users: 100,
                multiplier: 2.0,
                cycles: 5,
            })
            .unwrap();

            assert_eq!(result.total_users, 3200.0);
            assert_eq!(result.series.len(), 6);
            assert_eq!(result.series[0].users, 100.0);
        }

        it "caps the number of cycles" {
            let err = referral_growth(&ReferralInput {
                initial_users: 100,
                multiplier: 2.0,
                cycles: 11,
            })
            .unwrap_err();
            assert!(matches!(err, GrowthError::OutOfRange { field: "cycles", .. }));
        }
    }

    describe "viral loop" {
        it "is viral above a k-factor of one" {
            let result = viral_loop(&ViralLoopInput {
                initial_users: 100,
                invites_per_user: 5.0,
                conversion_rate: 30.0,
                cycles: 2,
            })
            .unwrap();

            assert!(close(result.k_factor, 1.5));
            assert!(result.is_viral);
            assert!(close(result.total_users, 100.0 + 150.0 + 225.0));
        }

        it "decays below one" {
            let result = viral_loop(&ViralLoopInput {
                initial_users: 100,
                invites_per_user: 2.0,
                conversion_rate: 25.0,
                cycles: 3,
            })
            .unwrap();
            assert!(!result.is_viral);
            assert!(result.cycles[3].new_users < result.cycles[2].new_users);
        }
    }

    describe "funnel" {
        it "applies each stage to the previous one" {
            let result = simulate_funnel(&FunnelInput {
                visitors: 1000,
                stages: vec![
                    FunnelStageInput { name: "Sign up".into(), rate: 20.0 },
                    FunnelStageInput { name: "Activate".into(), rate: 50.0 },
                ],
            })
            .unwrap();

            assert_eq!(result.stages[0].users, 200);
            assert_eq!(result.stages[0].dropped, 800);
            assert_eq!(result.stages[1].users, 100);
            assert!(close(result.overall_conversion, 10.0));
        }

        it "needs a stage" {
            let err = simulate_funnel(&FunnelInput { visitors: 10, stages: vec![] }).unwrap_err();
            assert_eq!(err, GrowthError::EmptyFunnel);
        }

        it "rejects rates above 100" {
            let err = simulate_funnel(&FunnelInput {
                visitors: 10,
                stages: vec![FunnelStageInput { name: "x".into(), rate: 120.0 }],
            })
            .unwrap_err();
            assert!(matches!(err, GrowthError::OutOfRange { field: "rate", .. }));
        }
    }

    describe "retention curve" {
        it "loses a constant share each period" {
            let curve = retention_curve(&RetentionCurveInput {
                users: 1000,
                churn_rate: 10.0,
                periods: 2,
            })
            .unwrap();

            let retained: Vec<u64> = curve.iter().map(|p| p.retained_users).collect();
            assert_eq!(retained, vec![1000, 900, 810]);
        }
    }

    describe "churn reduction" {
        it "halves churn at a perfect score" {
            let result = churn_reduction(&ChurnReductionInput {
                base_churn_rate: 10.0,
                habit_score: 100.0,
                personalization_score: 100.0,
                reengagement_score: 100.0,
            })
            .unwrap();
            assert!(close(result.weighted_score, 100.0));
            assert!(close(result.projected_churn_rate, 5.0));
        }

        it "leaves churn alone at zero effort" {
            let result = churn_reduction(&ChurnReductionInput {
                base_churn_rate: 8.0,
                habit_score: 0.0,
                personalization_score: 0.0,
                reengagement_score: 0.0,
            })
            .unwrap();
            assert_eq!(result.projected_churn_rate, 8.0);
        }
    }

    describe "activation" {
        it "rewards a short sign-up" {
            let result = activation_rate(&ActivationInput {
                signup_steps: 1,
                required_fields: 2,
                social_login: true,
            })
            .unwrap();
            assert_eq!(result.activation_rate, 85.0);
            assert_eq!(result.friction, Friction::Low);
        }

        it "never drops below the floor" {
            let result = activation_rate(&ActivationInput {
                signup_steps: 10,
                required_fields: 20,
                social_login: false,
            })
            .unwrap();
            assert_eq!(result.activation_rate, 10.0);
            assert_eq!(result.friction, Friction::High);
        }
    }

    describe "ab test" {
        it "is reproducible with a seeded rng" {
            let input = AbTestInput {
                control_rate: 10.0,
                variant_rate: 12.0,
                sample_size: 5000,
            };
            let first = simulate_ab_test_with(&input, &mut StdRng::seed_from_u64(7)).unwrap();
            let second = simulate_ab_test_with(&input, &mut StdRng::seed_from_u64(7)).unwrap();
            assert_eq!(first, second);
            assert_eq!(first.control.visitors, 5000);
        }

        it "picks the arm with a certain conversion" {
            let result = simulate_ab_test_with(
                &AbTestInput {
                    control_rate: 0.0,
                    variant_rate: 100.0,
                    sample_size: 50,
                },
                &mut StdRng::seed_from_u64(1),
            )
            .unwrap();
            assert_eq!(result.variant.conversions, 50);
            assert_eq!(result.winner, AbWinner::Variant);
            assert_eq!(result.uplift, None);
        }

        it "rejects an empty sample" {
            let err = simulate_ab_test(&AbTestInput {
                control_rate: 10.0,
                variant_rate: 10.0,
                sample_size: 0,
            })
            .unwrap_err();
            assert!(matches!(err, GrowthError::OutOfRange { field: "sample_size", .. }));
        }
    }
}
