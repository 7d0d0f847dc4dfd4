use speculate2::speculate;

speculate! {
    use pmkit_core::simulation::{find_scenario, SimulationRun, TaskStatus, SCENARIOS};

    fn statuses(run: &SimulationRun) -> Vec<TaskStatus> {
        run.tasks.iter().map(|t| t.status).collect()
    }

    describe "scenarios" {
        it "all have tasks" {
            for scenario in SCENARIOS {
                assert!(!scenario.tasks.is_empty(), "{}", scenario.name);
            }
        }

        it "are found by name" {
            assert_eq!(find_scenario("bug-triage").unwrap().tasks.len(), 5);
            assert!(find_scenario("payroll").is_none());
        }
    }

    describe "advance" {
        it "runs one task at a time in order" {
            let scenario = find_scenario("user-onboarding").unwrap();
            let mut run = SimulationRun::new(scenario);
            assert!(statuses(&run).iter().all(|s| *s == TaskStatus::Pending));

            assert!(run.advance());
            assert_eq!(
                statuses(&run),
                vec![TaskStatus::Running, TaskStatus::Pending, TaskStatus::Pending, TaskStatus::Pending]
            );

            assert!(run.advance());
            assert_eq!(
                statuses(&run),
                vec![TaskStatus::Done, TaskStatus::Running, TaskStatus::Pending, TaskStatus::Pending]
            );
            assert_eq!(run.current_task().unwrap().name, scenario.tasks[1]);
            assert_eq!(run.progress(), 25.0);
        }

        it "finishes with every task done" {
            let scenario = find_scenario("weekly-report").unwrap();
            let mut run = SimulationRun::new(scenario);

            let mut steps = 0;
            while run.advance() {
                steps += 1;
            }

            assert_eq!(steps, scenario.tasks.len());
            assert!(run.is_complete());
            assert!(run.finished_at.is_some());
            assert_eq!(run.progress(), 100.0);
            assert!(!run.advance());
        }
    }
}
