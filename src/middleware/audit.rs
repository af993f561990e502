/// Record a user-initiated change on the `audit` log target.
pub fn log_event(user_id: &str, action: &str, resource_type: &str, resource_id: &str) {
    tracing::info!(
        target: "audit",
        user_id,
        resource_type,
        resource_id,
        "{action}"
    );
}
