mod common;

use axum::http::{Method, StatusCode};
use chrono::{Days, Local};
use common::{TestApp, issue_paths, spawn_app};
use serde_json::{Value, json};

fn days_from_today(days: i64) -> String {
    let today = Local::now().date_naive();
    let date = if days >= 0 {
        today + Days::new(days.unsigned_abs())
    } else {
        today - Days::new(days.unsigned_abs())
    };
    date.format("%Y-%m-%d").to_string()
}

fn ids(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_create_user_hides_password() {
    let app = spawn_app().await;

    let (status, body) = app
        .post(
            "/api/users",
            json!({ "username": "  jane ", "password": "s3cret-pass", "displayName": "Jane" }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let user = &body["data"];
    assert_eq!(user["username"], "jane");
    assert_eq!(user["displayName"], "Jane");
    assert!(user["createdAt"].is_string());
    assert!(user.get("password").is_none());
    assert!(user.get("passwordHash").is_none());

    let id = user["id"].as_str().unwrap();
    let (status, body) = app.get(&format!("/api/users/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "jane");
    assert!(body["data"].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_user_validation_and_conflict() {
    let app = spawn_app().await;

    let (status, body) = app
        .post("/api/users", json!({ "username": "jo", "password": "short" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    let paths = issue_paths(&body);
    assert!(paths.contains(&"username".to_string()));
    assert!(paths.contains(&"password".to_string()));

    app.create_user("jane").await;
    let (status, body) = app
        .post(
            "/api/users",
            json!({ "username": "jane", "password": "another-password" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("jane"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_signups_conflict() {
    let app = spawn_app().await;
    let payload = json!({ "username": "racer", "password": "correct horse battery" });

    let (first, second) = tokio::join!(
        app.post("/api/users", payload.clone()),
        app.post("/api/users", payload.clone())
    );

    let mut statuses = vec![first.0, second.0];
    statuses.sort();
    assert_eq!(statuses, vec![StatusCode::OK, StatusCode::CONFLICT]);

    let conflict = if first.0 == StatusCode::CONFLICT {
        first.1
    } else {
        second.1
    };
    assert_eq!(conflict["success"], false);
    assert!(conflict["error"].as_str().unwrap().contains("racer"));
}

#[tokio::test]
async fn test_current_user_requires_identity() {
    let app = spawn_app().await;
    let user_id = app.create_user("jane").await;

    let (status, body) = app.get("/api/users/me").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let (status, body) = app
        .send(Method::GET, "/api/users/me", None, Some(&user_id))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], user_id.as_str());

    let (status, _) = app
        .send(Method::GET, "/api/users/me", None, Some("nobody"))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_project_crud() {
    let app = spawn_app().await;
    let user_id = app.create_user("jane").await;

    let project = app
        .create(
            "projects",
            json!({
                "userId": user_id,
                "name": "Kitchen remodel",
                "budget": 12000,
                "deadline": "2026-12-01",
                "tags": ["home"]
            }),
        )
        .await;
    let id = project["id"].as_str().unwrap().to_string();
    assert_eq!(project["status"], "planning");
    assert_eq!(project["priority"], "medium");
    assert_eq!(project["progress"], 0);
    assert_eq!(project["tags"], json!(["home"]));
    assert_eq!(project["createdAt"], project["updatedAt"]);

    let (status, body) = app
        .put(
            &format!("/api/projects/{id}"),
            json!({ "progress": 40, "status": "in_progress", "userId": "someone-else" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let updated = &body["data"];
    assert_eq!(updated["progress"], 40);
    assert_eq!(updated["status"], "in_progress");
    assert_eq!(updated["name"], "Kitchen remodel");
    assert_eq!(updated["userId"], user_id.as_str());
    assert_eq!(updated["createdAt"], project["createdAt"]);

    let (status, body) = app
        .get(&format!("/api/projects?ownerId={user_id}"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![id.clone()]);

    let (status, body) = app.delete(&format!("/api/projects/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({ "id": id, "deleted": true }));

    let (status, _) = app.get(&format!("/api/projects/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.delete(&format!("/api/projects/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_validation() {
    let app = spawn_app().await;
    let user_id = app.create_user("jane").await;
    let project = app
        .create("projects", json!({ "userId": user_id, "name": "Garden" }))
        .await;
    let uri = format!("/api/projects/{}", project["id"].as_str().unwrap());

    let (status, body) = app.put(&uri, json!({ "progress": "lots" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(issue_paths(&body), vec!["progress"]);

    let (status, body) = app.put(&uri, json!({ "name": null })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(issue_paths(&body), vec!["name"]);

    let (status, body) = app.put(&uri, json!({ "deadline": "next week" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(issue_paths(&body), vec!["deadline"]);

    let (status, _) = app
        .put("/api/projects/does-not-exist", json!({ "progress": 10 }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_rejects_missing_and_unknown_owner() {
    let app = spawn_app().await;

    let (status, body) = app.post("/api/tasks", json!({ "title": "Call Jane" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(issue_paths(&body), vec!["userId"]);

    let (status, body) = app
        .post("/api/tasks", json!({ "userId": "ghost", "title": "Call Jane" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["issues"][0]["path"], "userId");
    assert_eq!(body["issues"][0]["code"], "unknown_reference");

    let (status, _) = app.get("/api/tasks?ownerId=ghost").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_malformed_body_is_rejected() {
    let app = spawn_app().await;

    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/api/notes")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let response = tower::ServiceExt::oneshot(app.router.clone(), request)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_note_defaults_and_ignored_id() {
    let app = spawn_app().await;
    let user_id = app.create_user("jane").await;

    let note = app
        .create(
            "notes",
            json!({ "userId": user_id, "content": "hello", "id": "chosen-by-client" }),
        )
        .await;

    assert_ne!(note["id"], "chosen-by-client");
    assert!(note["id"].is_string());
    assert!(note["createdAt"].is_string());
    assert_eq!(note["title"], Value::Null);
    assert_eq!(note["tags"], json!([]));
    assert_eq!(note["content"], "hello");

    let id = note["id"].as_str().unwrap();
    let (status, body) = app
        .put(&format!("/api/notes/{id}"), json!({ "title": "Greeting" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Greeting");
    assert_eq!(body["data"]["content"], "hello");

    let (status, body) = app
        .put(&format!("/api/notes/{id}"), json!({ "title": null }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], Value::Null);
}

#[tokio::test]
async fn test_unknown_ids_are_not_found() {
    let app = spawn_app().await;

    for collection in [
        "users", "projects", "tasks", "contacts", "notes", "assets", "mood",
    ] {
        let (status, body) = app.get(&format!("/api/{collection}/missing-id")).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{collection}");
        assert_eq!(body["success"], false);
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn test_lists_are_scoped_to_owner() {
    let app = spawn_app().await;
    let jane = app.create_user("jane").await;
    let john = app.create_user("john").await;

    let first = app
        .create("notes", json!({ "userId": jane, "content": "one" }))
        .await;
    let second = app
        .create("notes", json!({ "userId": jane, "content": "two" }))
        .await;
    app.create("notes", json!({ "userId": john, "content": "three" }))
        .await;

    let (status, body) = app.get(&format!("/api/notes?ownerId={jane}")).await;
    assert_eq!(status, StatusCode::OK);
    let listed = ids(&body);
    assert_eq!(listed.len(), 2);
    assert!(listed.contains(&first["id"].as_str().unwrap().to_string()));
    assert!(listed.contains(&second["id"].as_str().unwrap().to_string()));

    let (status, body) = app.get("/api/notes").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(issue_paths(&body), vec!["ownerId"]);
}

#[tokio::test]
async fn test_task_completion_and_filters() {
    let app = spawn_app().await;
    let user_id = app.create_user("jane").await;
    let project = app
        .create("projects", json!({ "userId": user_id, "name": "Move house" }))
        .await;
    let project_id = project["id"].as_str().unwrap();

    let task = app
        .create(
            "tasks",
            json!({
                "userId": user_id,
                "projectId": project_id,
                "title": "Book movers",
                "time": "09:30",
                "recurringPattern": { "frequency": "weekly", "daysOfWeek": [1, 3] }
            }),
        )
        .await;
    assert_eq!(task["status"], "pending");
    assert_eq!(task["priority"], "medium");
    assert_eq!(task["completedAt"], Value::Null);
    assert_eq!(task["recurringPattern"]["frequency"], "weekly");
    assert_eq!(task["recurringPattern"]["interval"], 1);

    let done = app
        .create(
            "tasks",
            json!({ "userId": user_id, "title": "Pack books", "status": "completed" }),
        )
        .await;
    assert!(done["completedAt"].is_string());

    let task_uri = format!("/api/tasks/{}", task["id"].as_str().unwrap());
    let (status, body) = app.put(&task_uri, json!({ "status": "completed" })).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["completedAt"].is_string());

    let (_, body) = app.put(&task_uri, json!({ "status": "pending" })).await;
    assert_eq!(body["data"]["completedAt"], Value::Null);

    let (_, body) = app
        .get(&format!("/api/tasks?ownerId={user_id}&projectId={project_id}"))
        .await;
    assert_eq!(ids(&body), vec![task["id"].as_str().unwrap().to_string()]);

    let (_, body) = app
        .get(&format!("/api/tasks?ownerId={user_id}&status=completed"))
        .await;
    assert_eq!(ids(&body), vec![done["id"].as_str().unwrap().to_string()]);

    let (status, body) = app
        .get(&format!("/api/tasks?ownerId={user_id}&status=finished"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(issue_paths(&body), vec!["status"]);

    let (status, body) = app
        .post(
            "/api/tasks",
            json!({ "userId": user_id, "title": "Bad time", "time": "25:00" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(issue_paths(&body), vec!["time"]);
}

#[tokio::test]
async fn test_contacts_due_and_contacted() {
    let app = spawn_app().await;
    let user_id = app.create_user("jane").await;

    let overdue = app
        .create(
            "contacts",
            json!({
                "userId": user_id,
                "firstName": "Ada",
                "contactFrequencyDays": 7,
                "lastContactedAt": days_from_today(-10)
            }),
        )
        .await;
    assert_eq!(overdue["nextContactDue"], days_from_today(-3).as_str());

    let upcoming = app
        .create(
            "contacts",
            json!({
                "userId": user_id,
                "firstName": "Grace",
                "nextContactDue": days_from_today(5)
            }),
        )
        .await;
    app.create("contacts", json!({ "userId": user_id, "firstName": "Linus" }))
        .await;

    let (status, body) = app
        .get(&format!("/api/contacts/due?ownerId={user_id}"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![overdue["id"].as_str().unwrap().to_string()]);

    let id = overdue["id"].as_str().unwrap();
    let (status, body) = app
        .post(&format!("/api/contacts/{id}/contacted"), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["lastContactedAt"], days_from_today(0).as_str());
    assert_eq!(body["data"]["nextContactDue"], days_from_today(7).as_str());

    let (_, body) = app
        .get(&format!("/api/contacts/due?ownerId={user_id}"))
        .await;
    assert!(ids(&body).is_empty());

    let (_, body) = app.get(&format!("/api/contacts?ownerId={user_id}")).await;
    assert_eq!(ids(&body).len(), 3);
    assert!(ids(&body).contains(&upcoming["id"].as_str().unwrap().to_string()));

    let (status, _) = app
        .post("/api/contacts/missing/contacted", json!({}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .post(
            "/api/contacts",
            json!({ "userId": user_id, "firstName": "Ken", "relationshipLevel": 9 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(issue_paths(&body), vec!["relationshipLevel"]);
}

#[tokio::test]
async fn test_assets_expiring() {
    let app = spawn_app().await;
    let user_id = app.create_user("jane").await;

    let soon = app
        .create(
            "assets",
            json!({
                "userId": user_id,
                "name": "Laptop",
                "purchasePrice": 1299.0,
                "warrantyEndDate": days_from_today(10)
            }),
        )
        .await;
    let later = app
        .create(
            "assets",
            json!({
                "userId": user_id,
                "name": "Car",
                "insuranceExpiryDate": days_from_today(100)
            }),
        )
        .await;
    app.create(
        "assets",
        json!({ "userId": user_id, "name": "Old phone", "warrantyEndDate": days_from_today(-5) }),
    )
    .await;

    let (status, body) = app
        .get(&format!("/api/assets/expiring?ownerId={user_id}"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![soon["id"].as_str().unwrap().to_string()]);

    let (_, body) = app
        .get(&format!("/api/assets/expiring?ownerId={user_id}&withinDays=365"))
        .await;
    let listed = ids(&body);
    assert_eq!(listed.len(), 2);
    assert!(listed.contains(&later["id"].as_str().unwrap().to_string()));

    let (status, body) = app
        .get(&format!("/api/assets/expiring?ownerId={user_id}&withinDays=0"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(issue_paths(&body), vec!["withinDays"]);

    let (status, body) = app
        .post(
            "/api/assets",
            json!({ "userId": user_id, "name": "Bike", "purchasePrice": -1 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(issue_paths(&body), vec!["purchasePrice"]);
}

#[tokio::test]
async fn test_mood_entries_newest_first() {
    let app = spawn_app().await;
    let user_id = app.create_user("jane").await;

    let older = app
        .create(
            "mood",
            json!({ "userId": user_id, "mood": "tired", "energyLevel": 3,
                    "timestamp": "2026-03-01T08:00:00+02:00" }),
        )
        .await;
    assert_eq!(older["timestamp"], "2026-03-01T06:00:00.000Z");

    let newer = app
        .create(
            "mood",
            json!({ "userId": user_id, "mood": "great", "timestamp": "2026-03-02T08:00:00Z" }),
        )
        .await;

    let (status, body) = app.get(&format!("/api/mood?ownerId={user_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        ids(&body),
        vec![
            newer["id"].as_str().unwrap().to_string(),
            older["id"].as_str().unwrap().to_string()
        ]
    );

    let (_, body) = app
        .get(&format!("/api/mood?ownerId={user_id}&limit=1"))
        .await;
    assert_eq!(ids(&body), vec![newer["id"].as_str().unwrap().to_string()]);

    let (status, _) = app
        .get(&format!("/api/mood?ownerId={user_id}&limit=0"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .post(
            "/api/mood",
            json!({ "userId": user_id, "mood": "wired", "energyLevel": 11 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(issue_paths(&body), vec!["energyLevel"]);

    let recorded = app
        .create("mood", json!({ "userId": user_id, "mood": "ok" }))
        .await;
    assert!(recorded["timestamp"].as_str().unwrap().ends_with('Z'));

    let (status, _) = app
        .send(
            Method::DELETE,
            &format!("/api/mood/{}", recorded["id"].as_str().unwrap()),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

async fn assert_deleted(app: &TestApp, collection: &str, id: &str) {
    let (status, _) = app.delete(&format!("/api/{collection}/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get(&format!("/api/{collection}/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_then_get_is_not_found() {
    let app = spawn_app().await;
    let user_id = app.create_user("jane").await;

    let task = app
        .create("tasks", json!({ "userId": user_id, "title": "Water plants" }))
        .await;
    let contact = app
        .create("contacts", json!({ "userId": user_id, "firstName": "Ada" }))
        .await;
    let asset = app
        .create("assets", json!({ "userId": user_id, "name": "Drill" }))
        .await;

    assert_deleted(&app, "tasks", task["id"].as_str().unwrap()).await;
    assert_deleted(&app, "contacts", contact["id"].as_str().unwrap()).await;
    assert_deleted(&app, "assets", asset["id"].as_str().unwrap()).await;
}
