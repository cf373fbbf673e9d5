//! Integration test to verify the workspace crates link together.

#![allow(clippy::no_effect_underscore_binding)]

#[test]
fn domain_crate_compiles() {
    let _method = reqx_domain::HttpMethod::Get;
    let _store = reqx_domain::SavedRequestsStore::new();
    let _tree = reqx_domain::TreeState::new();
    let _env = reqx_domain::Environment::new("Test");
}

#[test]
fn application_crate_compiles() {
    let _error = reqx_application::ApplicationError::Http("offline".to_string());
    let _sidebar = reqx_application::Sidebar::default();
}

#[test]
fn infrastructure_crate_compiles() {
    use reqx_application::ports::Clock;
    let clock = reqx_infrastructure::adapters::SystemClock::new();
    let _now = clock.now();
}
