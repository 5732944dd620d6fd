/*
 * Responsibility
 * - Fixed-text areas: one open, one per role
 * - Access is decided entirely by the pipeline in front of them
 */

pub async fn public_area() -> &'static str {
    "public"
}

pub async fn admin_area() -> &'static str {
    "admin"
}

pub async fn user_area() -> &'static str {
    "user"
}
