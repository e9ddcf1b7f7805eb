//! Built-in onboarding flows.

use super::model::{Checklist, Step};

/// Task type of the Jira account signup flow.
pub const JIRA: &str = "jira";
/// Task type of the GCP Cloud Storage bucket creation flow.
pub const GCP_STORAGE: &str = "gcp_storage";

/// All built-in checklists keyed by task type.
pub fn builtin_checklists() -> Vec<(&'static str, Checklist)> {
    vec![(JIRA, jira_signup()), (GCP_STORAGE, gcp_storage_bucket())]
}

fn jira_signup() -> Checklist {
    Checklist::new(
        "Jira Account Setup",
        vec![
            Step::new(1, "Navigate to Jira signup page")
                .with_keywords(&["jira", "sign up", "create account", "atlassian"]),
            Step::new(2, "Enter valid email address")
                .with_keywords(&["email", "work email", "@"])
                .with_required_fields(&["email"]),
            Step::new(3, "Create a strong password")
                .with_keywords(&["password", "create password", "confirm password"])
                .with_required_fields(&["password"]),
            Step::new(4, "Enter full name")
                .with_keywords(&["name", "full name", "first name", "last name"])
                .with_required_fields(&["name"]),
            Step::new(5, "Accept terms and conditions")
                .with_keywords(&["terms", "conditions", "agree", "accept"])
                .with_required_fields(&["terms"]),
            Step::new(6, "Verify email address")
                .with_keywords(&["verify", "verification", "confirm email", "check email"]),
            Step::new(7, "Complete account setup")
                .with_keywords(&["complete", "finish", "done", "success"]),
        ],
    )
}

fn gcp_storage_bucket() -> Checklist {
    Checklist::new(
        "GCP Cloud Storage Setup",
        vec![
            Step::new(1, "Navigate to Cloud Storage in GCP Console")
                .with_keywords(&["cloud storage", "storage", "buckets", "navigation menu"]),
            Step::new(2, "Click 'Create Bucket' button")
                .with_keywords(&["create", "create bucket", "new bucket", "button"]),
            Step::new(3, "Enter a unique bucket name")
                .with_keywords(&["name", "bucket name", "globally unique"])
                .with_required_fields(&["bucket_name"]),
            Step::new(4, "Choose location type and region")
                .with_keywords(&["location", "region", "multi-region", "dual-region"])
                .with_required_fields(&["location"]),
            Step::new(5, "Select storage class")
                .with_keywords(&["storage class", "standard", "nearline", "coldline", "archive"])
                .with_required_fields(&["storage_class"]),
            Step::new(6, "Configure access control")
                .with_keywords(&["access control", "uniform", "fine-grained", "permissions"])
                .with_required_fields(&["access_control"]),
            Step::new(7, "Review and create bucket")
                .with_keywords(&["create", "confirm", "review", "finish"]),
        ],
    )
}
