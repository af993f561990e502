mod common;

use reqwest::StatusCode;
use serde_json::{json, Value};

use notekeeper::config::RegistrationMode;

fn titles(list: &Value) -> Vec<String> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|n| n["title"].as_str().unwrap().to_string())
        .collect()
}

// ── Health ──────────────────────────────────────────────────────

#[tokio::test]
async fn health_returns_ok() {
    let app = common::spawn_app().await;

    let resp = app.client.get(app.url("/health")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["x-content-type-options"], "nosniff");
    assert_eq!(resp.text().await.unwrap(), "ok");
}

// ── Registration & Auth ─────────────────────────────────────────

#[tokio::test]
async fn register_returns_token_and_profile() {
    let app = common::spawn_app().await;

    let (body, status) = app.register("alice", "alice@example.com", "secret1").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].is_string());
    assert_eq!(body["user"]["username"], "alice");
    assert_eq!(body["user"]["email"], "alice@example.com");
    assert!(body["user"]["passwordHash"].is_null());

    let users = std::fs::read_to_string(app.data_file("users.json")).unwrap();
    assert!(users.contains("alice@example.com"));
    assert!(!users.contains("secret1"));
}

#[tokio::test]
async fn register_rejects_duplicate_email() {
    let app = common::spawn_app().await;
    app.signup("alice", "alice@example.com").await;

    let (body, status) = app.register("alice2", "alice@example.com", "other12").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("already registered"));
}

#[tokio::test]
async fn register_rejects_short_password() {
    let app = common::spawn_app().await;

    let (_, status) = app.register("alice", "alice@example.com", "short").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn register_rejects_when_closed() {
    let app = common::spawn_app_with(|c| c.registration = RegistrationMode::Closed).await;

    let (body, status) = app.register("alice", "alice@example.com", "secret1").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].as_str().unwrap().contains("disabled"));
}

#[tokio::test]
async fn login_valid_credentials() {
    let app = common::spawn_app().await;
    app.signup("alice", "alice@example.com").await;

    let (body, status) = app.login("alice@example.com", "secret1").await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap();

    let (me, status) = app.get_auth("/api/v1/me", token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], "alice");
}

#[tokio::test]
async fn login_does_not_reveal_which_part_was_wrong() {
    let app = common::spawn_app().await;
    app.signup("alice", "alice@example.com").await;

    let (wrong_pw, status) = app.login("alice@example.com", "wrongpass").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (no_user, status) = app.login("nobody@example.com", "secret1").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert_eq!(wrong_pw, no_user);
}

#[tokio::test]
async fn login_is_rate_limited_after_repeated_failures() {
    let app = common::spawn_app().await;
    app.signup("alice", "alice@example.com").await;

    for _ in 0..5 {
        let (_, status) = app.login("alice@example.com", "wrongpass").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    let (_, status) = app.login("alice@example.com", "secret1").await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn api_requires_authentication() {
    let app = common::spawn_app().await;

    let resp = app.client.get(app.url("/api/v1/notes")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].is_string());

    let (_, status) = app.get_auth("/api/v1/notes", "not-a-token").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ── Notes ───────────────────────────────────────────────────────

#[tokio::test]
async fn create_note_applies_defaults() {
    let app = common::spawn_app().await;
    let token = app.signup("alice", "alice@example.com").await;

    let note = app.create_note(&token, "Groceries", "Buy milk").await;
    assert_eq!(note["category"], "general");
    assert_eq!(note["isFavorite"], false);
    assert_eq!(note["isPinned"], false);
    assert!(note["deletedAt"].is_null());
    assert_eq!(note["createdAt"], note["updatedAt"]);
}

#[tokio::test]
async fn create_note_requires_title() {
    let app = common::spawn_app().await;
    let token = app.signup("alice", "alice@example.com").await;

    let (_, status) = app
        .post_auth("/api/v1/notes", &token, &json!({ "title": "  ", "content": "x" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn notes_lifecycle_keeps_most_recent_first() {
    let app = common::spawn_app().await;
    let token = app.signup("alice", "alice@example.com").await;

    let groceries = app.create_note(&token, "Groceries", "Buy milk").await;
    let gid = groceries["id"].as_str().unwrap().to_string();
    app.create_note(&token, "Work plan", "Quarterly goals").await;

    let (list, _) = app.get_auth("/api/v1/notes", &token).await;
    assert_eq!(titles(&list), vec!["Work plan", "Groceries"]);

    // Editing moves the note to the front
    let (updated, status) = app
        .put_auth(
            &format!("/api/v1/notes/{gid}"),
            &token,
            &json!({ "title": "Groceries", "content": "Buy milk and eggs", "category": "home" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["category"], "home");

    let (list, _) = app.get_auth("/api/v1/notes", &token).await;
    assert_eq!(titles(&list), vec!["Groceries", "Work plan"]);

    // Pin
    let (pinned, status) = app
        .post_auth(&format!("/api/v1/notes/{gid}/pin"), &token, &json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(pinned["isPinned"], true);

    // Favorite twice returns to false
    for expected in [true, false] {
        let (fav, _) = app
            .post_auth(&format!("/api/v1/notes/{gid}/favorite"), &token, &json!({}))
            .await;
        assert_eq!(fav["isFavorite"], expected);
    }

    // Delete
    let (body, status) = app.delete_auth(&format!("/api/v1/notes/{gid}"), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Deleted");

    let (list, _) = app.get_auth("/api/v1/notes", &token).await;
    assert_eq!(titles(&list), vec!["Work plan"]);

    let (_, status) = app.get_auth(&format!("/api/v1/notes/{gid}"), &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Soft delete keeps the record on disk
    let raw = std::fs::read_to_string(app.data_file("notes.json")).unwrap();
    let stored: Vec<Value> = serde_json::from_str(&raw).unwrap();
    let kept = stored.iter().find(|n| n["id"] == gid.as_str()).unwrap();
    assert!(kept["deletedAt"].is_string());
}

#[tokio::test]
async fn deleted_note_cannot_be_modified() {
    let app = common::spawn_app().await;
    let token = app.signup("alice", "alice@example.com").await;

    let note = app.create_note(&token, "Groceries", "Buy milk").await;
    let id = note["id"].as_str().unwrap();
    app.delete_auth(&format!("/api/v1/notes/{id}"), &token).await;

    let (_, status) = app
        .put_auth(
            &format!("/api/v1/notes/{id}"),
            &token,
            &json!({ "title": "Back", "content": "" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, status) = app
        .post_auth(&format!("/api/v1/notes/{id}/pin"), &token, &json!({}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, status) = app.delete_auth(&format!("/api/v1/notes/{id}"), &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn search_matches_title_and_content() {
    let app = common::spawn_app().await;
    let token = app.signup("alice", "alice@example.com").await;

    app.create_note(&token, "Groceries", "Buy MILK").await;
    app.create_note(&token, "Milkshake recipe", "Blend").await;
    app.create_note(&token, "Work plan", "Quarterly goals").await;

    let (hits, status) = app.get_auth("/api/v1/notes?search=milk", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&hits), vec!["Milkshake recipe", "Groceries"]);

    let (none, _) = app.get_auth("/api/v1/notes?search=xyz", &token).await;
    assert!(none.as_array().unwrap().is_empty());

    let (all, _) = app.get_auth("/api/v1/notes?search=", &token).await;
    assert_eq!(all.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn users_cannot_see_or_touch_each_others_notes() {
    let app = common::spawn_app().await;
    let alice = app.signup("alice", "alice@example.com").await;
    let bob = app.signup("bob", "bob@example.com").await;

    let note = app.create_note(&alice, "Diary", "private").await;
    let id = note["id"].as_str().unwrap();

    let (list, _) = app.get_auth("/api/v1/notes", &bob).await;
    assert!(list.as_array().unwrap().is_empty());

    let (_, status) = app.get_auth(&format!("/api/v1/notes/{id}"), &bob).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, status) = app.delete_auth(&format!("/api/v1/notes/{id}"), &bob).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, status) = app
        .post_auth(&format!("/api/v1/notes/{id}/favorite"), &bob, &json!({}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (mine, status) = app.get_auth(&format!("/api/v1/notes/{id}"), &alice).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine["isFavorite"], false);
}

// ── Preferences & Suggestions ───────────────────────────────────

#[tokio::test]
async fn preferences_default_on_and_can_be_patched() {
    let app = common::spawn_app().await;
    let token = app.signup("alice", "alice@example.com").await;

    let (prefs, status) = app.get_auth("/api/v1/settings", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(prefs, json!({ "emailNotifications": true, "aiSuggestions": true }));

    let (prefs, status) = app
        .put_auth("/api/v1/settings", &token, &json!({ "aiSuggestions": false }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(prefs, json!({ "emailNotifications": true, "aiSuggestions": false }));
}

#[tokio::test]
async fn suggestions_endpoint_matches_keywords() {
    let app = common::spawn_app().await;
    let token = app.signup("alice", "alice@example.com").await;

    let (list, status) = app
        .post_auth(
            "/api/v1/suggestions",
            &token,
            &json!({ "content": "Team meeting before the deadline" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let kinds: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["type"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["calendar", "reminder"]);
}

#[tokio::test]
async fn notes_carry_suggestions_when_enabled() {
    let app = common::spawn_app_with(|c| c.features.ai_suggestions = true).await;
    let token = app.signup("alice", "alice@example.com").await;

    let note = app.create_note(&token, "Sprint", "tasks for this week").await;
    assert_eq!(note["suggestions"][0]["type"], "checklist");

    // Switched off for this user, nothing is attached
    app.put_auth("/api/v1/settings", &token, &json!({ "aiSuggestions": false }))
        .await;
    let note = app.create_note(&token, "Sprint 2", "tasks again").await;
    assert!(note["suggestions"].is_null());
}

#[tokio::test]
async fn switching_suggestions_off_hides_and_clears_them() {
    let app = common::spawn_app_with(|c| c.features.ai_suggestions = true).await;
    let token = app.signup("alice", "alice@example.com").await;

    let note = app.create_note(&token, "Standup", "team meeting at 10").await;
    let id = note["id"].as_str().unwrap();
    assert_eq!(note["suggestions"][0]["type"], "calendar");

    app.put_auth("/api/v1/settings", &token, &json!({ "aiSuggestions": false }))
        .await;

    // Hidden on read before any edit
    let (fetched, _) = app.get_auth(&format!("/api/v1/notes/{id}"), &token).await;
    assert!(fetched["suggestions"].is_null());
    let (list, _) = app.get_auth("/api/v1/notes", &token).await;
    assert!(list[0]["suggestions"].is_null());

    let (edited, status) = app
        .put_auth(
            &format!("/api/v1/notes/{id}"),
            &token,
            &json!({ "title": "Standup", "content": "buy bread" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(edited["suggestions"].is_null());

    // The edit cleared the stored list too
    let raw = std::fs::read_to_string(app.data_file("notes.json")).unwrap();
    assert!(!raw.contains("Schedule a meeting"));

    app.submit(&[("action", "login"), ("email", "alice@example.com"), ("password", "secret1")])
        .await;
    let html = app.page("?action=dashboard").await.text().await.unwrap();
    assert!(html.contains("Standup"));
    assert!(!html.contains("Schedule a meeting"));
}

#[tokio::test]
async fn notes_have_no_suggestions_when_feature_is_off() {
    let app = common::spawn_app().await;
    let token = app.signup("alice", "alice@example.com").await;

    let note = app.create_note(&token, "Sprint", "tasks for this week").await;
    assert!(note["suggestions"].is_null());
}

// ── HTML pages ──────────────────────────────────────────────────

#[tokio::test]
async fn dashboard_without_session_redirects_to_login() {
    let app = common::spawn_app().await;

    let resp = app.page("").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(common::location(&resp), "/?action=login");

    let resp = app.page("?action=login").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("Log in"));
}

#[tokio::test]
async fn form_login_and_note_flow() {
    let app = common::spawn_app().await;
    app.signup("alice", "alice@example.com").await;

    let resp = app
        .submit(&[("action", "login"), ("email", "alice@example.com"), ("password", "secret1")])
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(common::location(&resp), "/?action=dashboard");

    let resp = app
        .submit(&[
            ("action", "create_note"),
            ("title", "Groceries"),
            ("content", "Buy milk"),
            ("category", ""),
        ])
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(common::location(&resp), "/?action=dashboard&notice=note_created");

    let html = app
        .page("?action=dashboard&notice=note_created")
        .await
        .text()
        .await
        .unwrap();
    assert!(html.contains("Groceries"));
    assert!(html.contains("Note created successfully!"));

    let html = app.page("?action=dashboard&search=xyz").await.text().await.unwrap();
    assert!(!html.contains("Buy milk"));

    // Logout clears the session
    let resp = app.page("?action=logout").await;
    assert_eq!(common::location(&resp), "/?action=login&notice=logged_out");
    let resp = app.page("?action=dashboard").await;
    assert_eq!(common::location(&resp), "/?action=login");
}

#[tokio::test]
async fn form_login_with_bad_password_shows_error() {
    let app = common::spawn_app().await;
    app.signup("alice", "alice@example.com").await;

    let resp = app
        .submit(&[("action", "login"), ("email", "alice@example.com"), ("password", "nope")])
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = resp.text().await.unwrap();
    assert!(html.contains("Invalid email or password."));
    assert!(html.contains("alice@example.com"));
}

#[tokio::test]
async fn register_page_says_when_registration_is_closed() {
    let app = common::spawn_app_with(|c| c.registration = RegistrationMode::Closed).await;

    let resp = app.page("?action=register").await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let html = resp.text().await.unwrap();
    assert!(html.contains("Registration is disabled."));
    assert!(!html.contains(r#"name="password""#));
}

#[tokio::test]
async fn form_register_starts_a_session() {
    let app = common::spawn_app().await;

    let resp = app
        .submit(&[
            ("action", "register"),
            ("username", "carol"),
            ("email", "carol@example.com"),
            ("password", "secret1"),
        ])
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(common::location(&resp), "/?action=dashboard&notice=welcome");

    let resp = app.page("?action=dashboard").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("carol"));
}

#[tokio::test]
async fn legacy_get_toggles_and_missing_notes() {
    let app = common::spawn_app().await;
    let token = app.signup("alice", "alice@example.com").await;
    let note = app.create_note(&token, "Groceries", "Buy milk").await;
    let id = note["id"].as_str().unwrap();

    app.submit(&[("action", "login"), ("email", "alice@example.com"), ("password", "secret1")])
        .await;

    let resp = app.page(&format!("?toggle_favorite={id}")).await;
    assert_eq!(common::location(&resp), "/?action=dashboard");
    let (fetched, _) = app.get_auth(&format!("/api/v1/notes/{id}"), &token).await;
    assert_eq!(fetched["isFavorite"], true);

    let resp = app.page("?action=edit_note&id=missing").await;
    assert_eq!(common::location(&resp), "/?action=dashboard&notice=note_not_found");
}

#[tokio::test]
async fn form_settings_update_reads_checkboxes() {
    let app = common::spawn_app().await;
    let token = app.signup("alice", "alice@example.com").await;

    app.submit(&[("action", "login"), ("email", "alice@example.com"), ("password", "secret1")])
        .await;

    let resp = app
        .submit(&[("action", "update_settings"), ("email_notifications", "on")])
        .await;
    assert_eq!(common::location(&resp), "/?action=settings&notice=settings_saved");

    let (prefs, _) = app.get_auth("/api/v1/settings", &token).await;
    assert_eq!(prefs, json!({ "emailNotifications": true, "aiSuggestions": false }));
}
