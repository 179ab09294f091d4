/// Suggested service labels for new tickets
///
/// The store accepts any label; this list only drives prompts and the
/// `services` command.
pub const GCP_SERVICES: &[&str] = &[
    "Compute Engine",
    "Cloud Storage",
    "BigQuery",
    "Cloud Run",
    "Kubernetes Engine",
    "Cloud Functions",
    "Cloud SQL",
    "Vertex AI",
    "App Engine",
    "Cloud Spanner",
    "Dataflow",
    "Dataproc",
    "Pub/Sub",
    "Other",
];

/// Case-insensitive membership test against a service catalog
pub fn is_known_service(catalog: &[String], service: &str) -> bool {
    catalog.iter().any(|s| s.eq_ignore_ascii_case(service))
}
