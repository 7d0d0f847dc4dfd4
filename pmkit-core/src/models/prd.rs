use serde::{Deserialize, Serialize};

use super::document::{DocumentField, FlatDocument};

/// Product Requirements Document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Prd {
    pub product_name: String,
    pub document_owner: String,
    pub version: String,
    pub overview: String,
    pub problem_statement: String,
    pub summary: String,
    pub objectives: String,
    pub target_audience: String,
    pub user_personas: String,
    pub user_stories: String,
    pub features: String,
    pub functional_requirements: String,
    pub non_functional_requirements: String,
    pub design_notes: String,
    pub technical_considerations: String,
    pub dependencies: String,
    pub assumptions: String,
    pub constraints: String,
    pub timeline: String,
    pub milestones: String,
    pub success_metrics: String,
    pub kpis: String,
    pub risks: String,
    pub mitigations: String,
    pub stakeholders: String,
    pub budget: String,
    pub resources: String,
    pub go_to_market: String,
    pub launch_plan: String,
    pub post_launch: String,
    pub open_questions: String,
}

impl FlatDocument for Prd {
    const TABLE: &'static str = "prds";
    const TITLE: &'static str = "Product Requirements Document";
    const FIELDS: &'static [DocumentField] = &[
        DocumentField::required("product_name", "Product Name"),
        DocumentField::required("document_owner", "Document Owner"),
        DocumentField::optional("version", "Version"),
        DocumentField::required("overview", "Overview"),
        DocumentField::required("problem_statement", "Problem Statement"),
        DocumentField::optional("summary", "Summary"),
        DocumentField::optional("objectives", "Objectives"),
        DocumentField::required("target_audience", "Target Audience"),
        DocumentField::optional("user_personas", "User Personas"),
        DocumentField::optional("user_stories", "User Stories"),
        DocumentField::required("features", "Features"),
        DocumentField::optional("functional_requirements", "Functional Requirements"),
        DocumentField::optional("non_functional_requirements", "Non-Functional Requirements"),
        DocumentField::optional("design_notes", "Design Notes"),
        DocumentField::optional("technical_considerations", "Technical Considerations"),
        DocumentField::optional("dependencies", "Dependencies"),
        DocumentField::optional("assumptions", "Assumptions"),
        DocumentField::optional("constraints", "Constraints"),
        DocumentField::required("timeline", "Timeline"),
        DocumentField::optional("milestones", "Milestones"),
        DocumentField::required("success_metrics", "Success Metrics"),
        DocumentField::optional("kpis", "KPIs"),
        DocumentField::optional("risks", "Risks"),
        DocumentField::optional("mitigations", "Mitigations"),
        DocumentField::optional("stakeholders", "Stakeholders"),
        DocumentField::optional("budget", "Budget"),
        DocumentField::optional("resources", "Resources"),
        DocumentField::optional("go_to_market", "Go-to-Market Strategy"),
        DocumentField::optional("launch_plan", "Launch Plan"),
        DocumentField::optional("post_launch", "Post-Launch Review"),
        DocumentField::optional("open_questions", "Open Questions"),
    ];
}
