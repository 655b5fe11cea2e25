mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = common::TestServer::start().await?;

    let res = server.client.get(server.url("/health")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "memory");
    Ok(())
}

#[tokio::test]
async fn unknown_endpoint_is_404() -> Result<()> {
    let server = common::TestServer::start().await?;

    let res = server.client.get(server.url("/api/nothing-here")).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "unknown endpoint");
    assert_eq!(body["code"], "NOT_FOUND");
    Ok(())
}

#[tokio::test]
async fn info_page_counts_persons() -> Result<()> {
    let server = common::TestServer::start().await?;

    for (name, number) in [("Arto Hellas", "040-123456"), ("Ada Lovelace", "39-445323523")] {
        let res = server
            .client
            .post(server.url("/api/persons"))
            .json(&json!({ "name": name, "number": number }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::OK);
    }

    let res = server.client.get(server.url("/info")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let text = res.text().await?;
    assert!(text.contains("Phonebook has info for 2 people"), "unexpected page: {}", text);
    Ok(())
}
