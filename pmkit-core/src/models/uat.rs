use serde::{Deserialize, Serialize};

use super::document::{DocumentField, FlatDocument};

/// User Acceptance Testing plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UatForm {
    pub project_name: String,
    pub test_plan_title: String,
    pub prepared_by: String,
    pub test_objective: String,
    pub scope: String,
    pub out_of_scope: String,
    pub test_environment: String,
    pub entry_criteria: String,
    pub exit_criteria: String,
    pub test_scenarios: String,
    pub test_cases: String,
    pub expected_results: String,
    pub test_data: String,
    pub roles_responsibilities: String,
    pub schedule: String,
    pub defect_management: String,
    pub risks: String,
    pub sign_off_criteria: String,
    pub approvers: String,
    pub notes: String,
}

impl FlatDocument for UatForm {
    const TABLE: &'static str = "uat_forms";
    const TITLE: &'static str = "User Acceptance Testing Plan";
    const FIELDS: &'static [DocumentField] = &[
        DocumentField::required("project_name", "Project Name"),
        DocumentField::required("test_plan_title", "Test Plan Title"),
        DocumentField::required("prepared_by", "Prepared By"),
        DocumentField::required("test_objective", "Test Objective"),
        DocumentField::required("scope", "Scope"),
        DocumentField::optional("out_of_scope", "Out of Scope"),
        DocumentField::optional("test_environment", "Test Environment"),
        DocumentField::optional("entry_criteria", "Entry Criteria"),
        DocumentField::required("exit_criteria", "Exit Criteria"),
        DocumentField::required("test_scenarios", "Test Scenarios"),
        DocumentField::optional("test_cases", "Test Cases"),
        DocumentField::optional("expected_results", "Expected Results"),
        DocumentField::optional("test_data", "Test Data"),
        DocumentField::optional("roles_responsibilities", "Roles and Responsibilities"),
        DocumentField::optional("schedule", "Schedule"),
        DocumentField::optional("defect_management", "Defect Management"),
        DocumentField::optional("risks", "Risks"),
        DocumentField::optional("sign_off_criteria", "Sign-off Criteria"),
        DocumentField::optional("approvers", "Approvers"),
        DocumentField::optional("notes", "Notes"),
    ];
}
