mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use common::TestServer;

async fn add_person(server: &TestServer, name: &str, number: &str) -> Result<reqwest::Response> {
    Ok(server
        .client
        .post(server.url("/api/persons"))
        .json(&json!({ "name": name, "number": number }))
        .send()
        .await?)
}

#[tokio::test]
async fn phonebook_crud() -> Result<()> {
    let server = TestServer::start().await?;

    let res = add_person(&server, "Mary Poppendieck", "39-23-6423122").await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["code"], "VALIDATION_ERROR");

    let res = add_person(&server, "Mary Poppendieck", "39-236423122").await?;
    assert_eq!(res.status(), StatusCode::OK);
    let person = res.json::<Value>().await?;
    let path = format!("/api/persons/{}", person["id"].as_str().unwrap());

    let res = server
        .client
        .put(server.url(&path))
        .json(&json!({ "name": "Someone Else", "number": "040-9999999" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let updated = res.json::<Value>().await?;
    assert_eq!(updated["name"], "Mary Poppendieck");
    assert_eq!(updated["number"], "040-9999999");

    let fetched = server.client.get(server.url(&path)).send().await?.json::<Value>().await?;
    assert_eq!(fetched, updated);

    let res = server.client.delete(server.url(&path)).send().await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = server.client.get(server.url(&path)).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // deleting again is still a 204
    let res = server.client.delete(server.url(&path)).send().await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    Ok(())
}

#[tokio::test]
async fn create_rejects_missing_and_duplicate_names() -> Result<()> {
    let server = TestServer::start().await?;

    let res = server
        .client
        .post(server.url("/api/persons"))
        .json(&json!({ "name": "Dan Abramov" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["message"], "name or number missing");

    assert_eq!(add_person(&server, "Dan Abramov", "12-43234345").await?.status(), StatusCode::OK);

    let res = add_person(&server, "Dan Abramov", "12-99999999").await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["message"], "name must be unique");

    let persons = server.client.get(server.url("/api/persons")).send().await?.json::<Value>().await?;
    assert_eq!(persons.as_array().map(Vec::len), Some(1));
    Ok(())
}

#[tokio::test]
async fn malformed_json_and_ids_are_bad_requests() -> Result<()> {
    let server = TestServer::start().await?;

    let res = server
        .client
        .post(server.url("/api/persons"))
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["code"], "INVALID_JSON");

    let res = server.client.get(server.url("/api/persons/123")).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = server
        .client
        .put(server.url(&format!("/api/persons/{}", Uuid::new_v4())))
        .json(&json!({ "number": "040-1234567" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}
