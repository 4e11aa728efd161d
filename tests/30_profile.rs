mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{message, TestServer};

fn experience(title: &str) -> Value {
    json!({ "title": title, "company": "Acme", "from": "2020-01-01", "current": true })
}

#[tokio::test]
async fn me_without_profile_is_bad_request() -> Result<()> {
    let server = TestServer::spawn().await?;
    let token = server.register("Ada", "ada@example.com").await?;

    let res = server.get("/api/profile/me", Some(&token)).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(message(&res.json().await?), "There is no profile for this user");
    Ok(())
}

#[tokio::test]
async fn upsert_creates_then_updates_single_profile() -> Result<()> {
    let server = TestServer::spawn().await?;
    let token = server.register("Ada", "ada@example.com").await?;

    let created = server.create_profile(&token).await?;
    assert_eq!(created["skills"], json!(["rust", "sql"]));

    let updated: Value = server
        .post(
            "/api/profile",
            &token,
            json!({ "status": "Senior Developer", "skills": "rust", "company": "Acme" }),
        )
        .await?
        .json()
        .await?;
    assert_eq!(updated["_id"], created["_id"]);
    assert_eq!(updated["status"], "Senior Developer");
    assert_eq!(updated["company"], "Acme");
    assert_eq!(updated["githubusername"], "octocat");

    let all: Vec<Value> = server.get("/api/profile", None).await?.json().await?;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0]["user"]["name"], "Ada");
    Ok(())
}

#[tokio::test]
async fn upsert_requires_status_and_skills() -> Result<()> {
    let server = TestServer::spawn().await?;
    let token = server.register("Ada", "ada@example.com").await?;

    let res = server.post("/api/profile", &token, json!({})).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    let msgs: Vec<_> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["msg"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(msgs, ["Skills is required", "Status is required"]);
    Ok(())
}

#[tokio::test]
async fn public_lookup_by_user() -> Result<()> {
    let server = TestServer::spawn().await?;
    let token = server.register("Ada", "ada@example.com").await?;
    let profile = server.create_profile(&token).await?;
    let user_id = profile["user"].as_str().unwrap();

    let res = server.get(&format!("/api/profile/user/{}", user_id), None).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let view: Value = res.json().await?;
    assert_eq!(view["user"]["_id"], user_id);
    assert_eq!(view["user"]["name"], "Ada");

    for missing in ["not-a-user", "0b0d6a1e-6f1b-4d8e-9f55-2a0f2c9d8e11"] {
        let res = server.get(&format!("/api/profile/user/{}", missing), None).await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(message(&res.json().await?), "Profile not found");
    }
    Ok(())
}

#[tokio::test]
async fn experience_is_prepended_and_removed_by_id() -> Result<()> {
    let server = TestServer::spawn().await?;
    let token = server.register("Ada", "ada@example.com").await?;
    server.create_profile(&token).await?;

    server.put("/api/profile/experience", &token, experience("Junior")).await?;
    server.put("/api/profile/experience", &token, experience("Mid")).await?;
    let profile: Value = server
        .put("/api/profile/experience", &token, experience("Senior"))
        .await?
        .json()
        .await?;

    let titles = |p: &Value| -> Vec<String> {
        p["experience"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["title"].as_str().unwrap().to_string())
            .collect()
    };
    assert_eq!(titles(&profile), ["Senior", "Mid", "Junior"]);

    let mid = profile["experience"][1]["_id"].as_str().unwrap();
    let profile: Value = server
        .delete(&format!("/api/profile/experience/{}", mid), &token)
        .await?
        .json()
        .await?;
    assert_eq!(titles(&profile), ["Senior", "Junior"]);

    let res = server.delete(&format!("/api/profile/experience/{}", mid), &token).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(message(&res.json().await?), "Experience not found");
    Ok(())
}

#[tokio::test]
async fn experience_validation_and_missing_profile() -> Result<()> {
    let server = TestServer::spawn().await?;
    let token = server.register("Ada", "ada@example.com").await?;

    let res = server
        .put("/api/profile/experience", &token, json!({ "title": "Dev", "company": "Acme" }))
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(message(&res.json().await?), "From date is required");

    let res = server.put("/api/profile/experience", &token, experience("Dev")).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(message(&res.json().await?), "There is no profile for this user");
    Ok(())
}

#[tokio::test]
async fn education_is_prepended_and_removed_by_id() -> Result<()> {
    let server = TestServer::spawn().await?;
    let token = server.register("Ada", "ada@example.com").await?;
    server.create_profile(&token).await?;

    let entry = |school: &str| json!({ "school": school, "degree": "BSc", "fieldofstudy": "CS", "from": "2010-09-01" });
    server.put("/api/profile/education", &token, entry("First")).await?;
    let profile: Value = server
        .put("/api/profile/education", &token, entry("Second"))
        .await?
        .json()
        .await?;
    assert_eq!(profile["education"][0]["school"], "Second");
    assert_eq!(profile["education"][1]["school"], "First");

    let first = profile["education"][1]["_id"].as_str().unwrap();
    let profile: Value = server
        .delete(&format!("/api/profile/education/{}", first), &token)
        .await?
        .json()
        .await?;
    assert_eq!(profile["education"].as_array().unwrap().len(), 1);
    assert_eq!(profile["education"][0]["school"], "Second");

    let res = server.delete("/api/profile/education/garbage", &token).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(message(&res.json().await?), "Education not found");
    Ok(())
}

#[tokio::test]
async fn delete_account_cascades() -> Result<()> {
    let server = TestServer::spawn().await?;
    let ada = server.register("Ada", "ada@example.com").await?;
    let bob = server.register("Bob", "bob@example.com").await?;
    server.create_profile(&ada).await?;
    server.create_profile(&bob).await?;
    server.post("/api/posts", &ada, json!({ "text": "ada's post" })).await?;
    server.post("/api/posts", &bob, json!({ "text": "bob's post" })).await?;

    let res = server.delete("/api/profile", &ada).await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(message(&res.json().await?), "User deleted");

    let profiles: Vec<Value> = server.get("/api/profile", None).await?.json().await?;
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0]["user"]["name"], "Bob");

    let res = server.get("/api/profile/me", Some(&bob)).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let posts: Vec<Value> = server.get("/api/posts", Some(&bob)).await?.json().await?;
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["text"], "bob's post");

    let res = server.login("ada@example.com", common::PASSWORD).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn github_repos_are_proxied() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server.get("/api/profile/github/octocat", None).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let repos: Vec<Value> = res.json().await?;
    assert_eq!(repos.len(), 5);

    let res = server.get("/api/profile/github/nobody-here", None).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(message(&res.json().await?), "No Github profile found");
    Ok(())
}
