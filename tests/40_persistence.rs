mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tempfile::TempDir;

use common::{write_seed, TestServer};

fn titles(quests: &Value) -> Vec<&str> {
    quests
        .as_array()
        .map(|qs| qs.iter().filter_map(|q| q["title"].as_str()).collect())
        .unwrap_or_default()
}

#[tokio::test]
async fn quests_survive_a_restart() -> Result<()> {
    let dir = TempDir::new()?;
    let data = dir.path().join("bdd").join("quests");
    let seed = dir.path().join("quests.json");

    let server = TestServer::start_with(data.clone(), seed.clone()).await?;
    let client = server.authed_client()?;
    for (id, title) in [("keep", "Keeper"), ("drop", "Dropped")] {
        let res = client.post(server.url("/quests")).json(&json!({ "_id": id, "title": title })).send().await?;
        assert_eq!(res.status(), StatusCode::CREATED);
    }
    client.delete(server.url("/quests/drop")).send().await?;
    server.stop();

    let server = TestServer::start_with(data, seed).await?;
    let client = server.authed_client()?;
    let listed: Value = client.get(server.url("/quests")).send().await?.json().await?;
    assert_eq!(titles(&listed), vec!["Keeper"]);
    Ok(())
}

#[tokio::test]
async fn reserved_field_names_never_reach_the_log() -> Result<()> {
    let dir = TempDir::new()?;
    let data = dir.path().join("bdd").join("quests");
    let seed = dir.path().join("quests.json");

    let server = TestServer::start_with(data.clone(), seed.clone()).await?;
    let client = server.authed_client()?;
    let res = client
        .post(server.url("/quests"))
        .json(&json!({ "_id": "x", "title": "X", "$$deleted": true }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let res = client.post(server.url("/quests")).json(&json!({ "_id": "y", "title": "Y" })).send().await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    server.stop();

    let server = TestServer::start_with(data, seed).await?;
    let listed: Value = server.authed_client()?.get(server.url("/quests")).send().await?.json().await?;
    assert_eq!(titles(&listed), vec!["Y"]);
    Ok(())
}

#[tokio::test]
async fn batch_loads_the_seed_file_once() -> Result<()> {
    let dir = TempDir::new()?;
    let server = TestServer::start(&dir).await?;
    write_seed(
        &dir.path().join("quests.json"),
        &json!([
            { "_id": "s1", "title": "Slay the dragon", "completed": false, "objectives": [ { "descr": "Find sword", "completed": false } ] },
            { "_id": "s2", "title": "Bake bread", "completed": true, "objectives": [] }
        ]),
    )?;

    // No token needed
    let res = reqwest::get(server.url("/batch")).await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?.as_array().map(Vec::len), Some(2));

    let again = reqwest::get(server.url("/batch")).await?;
    assert_eq!(again.status(), StatusCode::BAD_REQUEST);

    let client = server.authed_client()?;
    let listed: Value = client.get(server.url("/quests")).send().await?.json().await?;
    assert_eq!(titles(&listed), vec!["Bake bread", "Slay the dragon"]);
    Ok(())
}
