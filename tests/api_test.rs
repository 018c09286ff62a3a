//! End-to-end tests: the full router on an ephemeral port, backed by the
//! in-memory store, driven over real HTTP and WebSocket connections.

#![allow(clippy::panic, clippy::indexing_slicing)]

use std::net::SocketAddr;
use std::sync::Arc;

use chrono::{Duration, Utc};
use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;

use wildwatch_api::api::build_app;
use wildwatch_api::app_state::AppState;
use wildwatch_api::chat::ChatRelay;
use wildwatch_api::domain::{AlertStatus, CameraLocation, EventBus, SessionManager};
use wildwatch_api::persistence::{AlertSeed, MemoryStore, WildlifeStore};

const RANGER_EMAIL: &str = "ranger@park.org";
const RANGER_PASSWORD: &str = "savanna1";

struct TestServer {
    addr: SocketAddr,
    store: Arc<MemoryStore>,
    client: reqwest::Client,
}

impl TestServer {
    fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    async fn get_json(&self, path: &str) -> (u16, Value) {
        let Ok(response) = self.client.get(self.url(path)).send().await else {
            panic!("GET {path} failed");
        };
        let status = response.status().as_u16();
        let Ok(body) = response.json::<Value>().await else {
            panic!("GET {path} returned no JSON");
        };
        (status, body)
    }

    async fn login(&self) -> String {
        let Ok(response) = self
            .client
            .post(self.url("/api/v1/auth/login"))
            .json(&json!({ "email": RANGER_EMAIL, "password": RANGER_PASSWORD }))
            .send()
            .await
        else {
            panic!("login request failed");
        };
        assert_eq!(response.status(), 200);
        let Ok(body) = response.json::<Value>().await else {
            panic!("login returned no JSON");
        };
        let Some(token) = body["token"].as_str() else {
            panic!("login response has no token: {body}");
        };
        token.to_string()
    }
}

/// Start the server on a random port with a seeded store.
async fn start_test_server() -> TestServer {
    let store = Arc::new(MemoryStore::new());
    let Ok(hash) = bcrypt::hash(RANGER_PASSWORD, 4) else {
        panic!("hashing failed");
    };
    store.seed_user(RANGER_EMAIL, "Head Ranger", &hash).await;

    let state = AppState::new(
        Arc::clone(&store) as Arc<dyn WildlifeStore>,
        EventBus::new(64),
        Arc::new(SessionManager::new(3600)),
        ChatRelay::new(None),
    );
    let app = build_app(state);

    let Ok(listener) = TcpListener::bind("127.0.0.1:0").await else {
        panic!("bind failed");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("no local addr");
    };
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    TestServer {
        addr,
        store,
        client: reqwest::Client::new(),
    }
}

#[tokio::test]
async fn test_health_endpoint() {
    let server = start_test_server().await;
    let (status, body) = server.get_json("/health").await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"], "up");
    assert_eq!(body["chat"], "disabled");
}

#[tokio::test]
async fn test_empty_store_lists_are_empty_arrays() {
    let server = start_test_server().await;
    for path in ["/api/v1/alerts", "/api/v1/animals", "/api/v1/cameras", "/api/v1/species"] {
        let (status, body) = server.get_json(path).await;
        assert_eq!(status, 200, "{path}");
        assert_eq!(body, json!([]), "{path}");
    }
}

#[tokio::test]
async fn test_store_outage_is_an_error_not_an_empty_list() {
    let server = start_test_server().await;
    server.store.set_offline(true);

    let (status, body) = server.get_json("/api/v1/animals").await;
    assert_eq!(status, 500);
    assert_eq!(body["error"]["code"], 3001);

    let (status, _) = server.get_json("/health").await;
    assert_eq!(status, 503);
}

#[tokio::test]
async fn test_writes_without_session_are_unauthorized() {
    let server = start_test_server().await;
    let Ok(response) = server
        .client
        .post(server.url("/api/v1/animals"))
        .json(&json!({}))
        .send()
        .await
    else {
        panic!("request failed");
    };
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let server = start_test_server().await;
    let Ok(response) = server
        .client
        .post(server.url("/api/v1/auth/login"))
        .json(&json!({ "email": RANGER_EMAIL, "password": "savanna2" }))
        .send()
        .await
    else {
        panic!("request failed");
    };
    assert_eq!(response.status(), 401);

    let Ok(response) = server
        .client
        .post(server.url("/api/v1/auth/login"))
        .json(&json!({ "email": "not-an-email", "password": RANGER_PASSWORD }))
        .send()
        .await
    else {
        panic!("request failed");
    };
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_session_lifecycle() {
    let server = start_test_server().await;
    let token = server.login().await;

    let Ok(response) = server
        .client
        .get(server.url("/api/v1/auth/session"))
        .bearer_auth(&token)
        .send()
        .await
    else {
        panic!("request failed");
    };
    assert_eq!(response.status(), 200);

    let Ok(response) = server
        .client
        .post(server.url("/api/v1/auth/logout"))
        .bearer_auth(&token)
        .send()
        .await
    else {
        panic!("request failed");
    };
    assert_eq!(response.status(), 204);

    let Ok(response) = server
        .client
        .get(server.url("/api/v1/auth/session"))
        .bearer_auth(&token)
        .send()
        .await
    else {
        panic!("request failed");
    };
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_added_animal_is_listed_with_species_name() {
    let server = start_test_server().await;
    let species_id = server
        .store
        .seed_species("Bengal Tiger", "Panthera tigris tigris", "Endangered")
        .await;
    let token = server.login().await;

    let Ok(response) = server
        .client
        .post(server.url("/api/v1/animals"))
        .bearer_auth(&token)
        .json(&json!({
            "name": "Raja",
            "tag_id": "TI-004",
            "species_id": species_id,
            "gender": "male",
            "age_estimate": "adult",
            "health_status": "healthy",
        }))
        .send()
        .await
    else {
        panic!("request failed");
    };
    assert_eq!(response.status(), 201);

    let (status, body) = server.get_json("/api/v1/animals").await;
    assert_eq!(status, 200);
    let Some(animals) = body.as_array() else {
        panic!("expected an array: {body}");
    };
    assert_eq!(animals.len(), 1);
    assert_eq!(animals[0]["name"], "Raja");
    assert_eq!(animals[0]["species_name"], "Bengal Tiger");
}

#[tokio::test]
async fn test_unknown_species_is_a_store_error() {
    let server = start_test_server().await;
    let token = server.login().await;
    let Ok(response) = server
        .client
        .post(server.url("/api/v1/animals"))
        .bearer_auth(&token)
        .json(&json!({
            "name": "Raja",
            "tag_id": "TI-004",
            "species_id": 999,
            "gender": "male",
            "age_estimate": "adult",
            "health_status": "healthy",
        }))
        .send()
        .await
    else {
        panic!("request failed");
    };
    assert_eq!(response.status(), 500);
}

#[tokio::test]
async fn test_resolve_alert_flow() {
    let server = start_test_server().await;
    let now = Utc::now();
    let older = server
        .store
        .seed_alert(AlertSeed {
            animal_id: None,
            alert_type: "poaching".to_string(),
            severity: "high".to_string(),
            message: "Gunshot detected near the river".to_string(),
            status: AlertStatus::Active,
            created_at: now - Duration::hours(2),
        })
        .await;
    let newer = server
        .store
        .seed_alert(AlertSeed {
            animal_id: None,
            alert_type: "fence".to_string(),
            severity: "medium".to_string(),
            message: "Fence breach in sector 4".to_string(),
            status: AlertStatus::Active,
            created_at: now,
        })
        .await;

    let (_, body) = server.get_json("/api/v1/alerts").await;
    assert_eq!(body[0]["id"], newer);
    assert_eq!(body[1]["id"], older);

    let token = server.login().await;
    let Ok(response) = server
        .client
        .post(server.url(&format!("/api/v1/alerts/{older}/resolve")))
        .bearer_auth(&token)
        .send()
        .await
    else {
        panic!("request failed");
    };
    assert_eq!(response.status(), 200);

    let (_, body) = server.get_json("/api/v1/alerts").await;
    let Some(active) = body.as_array() else {
        panic!("expected an array: {body}");
    };
    assert_eq!(active.len(), 1);

    let (_, body) = server.get_json("/api/v1/alerts?include_resolved=true").await;
    let Some(all) = body.as_array() else {
        panic!("expected an array: {body}");
    };
    assert_eq!(all.len(), 2);

    let Ok(response) = server
        .client
        .post(server.url("/api/v1/alerts/424242/resolve"))
        .bearer_auth(&token)
        .send()
        .await
    else {
        panic!("request failed");
    };
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_camera_locations_are_normalized() {
    let server = start_test_server().await;
    server
        .store
        .seed_camera("Legacy text", Some(CameraLocation::Text("North gate".to_string())), "offline", None)
        .await;
    server.store.seed_camera("No location", None, "online", None).await;
    let token = server.login().await;

    let Ok(response) = server
        .client
        .post(server.url("/api/v1/cameras"))
        .bearer_auth(&token)
        .json(&json!({
            "name": "Waterhole Cam",
            "latitude": -1.5,
            "longitude": 35.25,
            "camera_type": "trail",
        }))
        .send()
        .await
    else {
        panic!("request failed");
    };
    assert_eq!(response.status(), 201);
    let Ok(created) = response.json::<Value>().await else {
        panic!("no JSON body");
    };
    assert_eq!(created["location"], "(35.25, -1.5)");
    assert_eq!(created["status"], "online");

    let (_, body) = server.get_json("/api/v1/cameras").await;
    let Some(cameras) = body.as_array() else {
        panic!("expected an array: {body}");
    };
    let location_of = |name: &str| {
        cameras
            .iter()
            .find(|c| c["name"] == name)
            .map(|c| c["location"].clone())
    };
    assert_eq!(location_of("Legacy text"), Some(json!("North gate")));
    assert_eq!(location_of("No location"), Some(json!("Unknown")));
    assert_eq!(location_of("Waterhole Cam"), Some(json!("(35.25, -1.5)")));
}

#[tokio::test]
async fn test_camera_update_validates_threshold() {
    let server = start_test_server().await;
    let id = server.store.seed_camera("Ridge Cam", None, "online", None).await;
    let token = server.login().await;

    let Ok(response) = server
        .client
        .patch(server.url(&format!("/api/v1/cameras/{id}")))
        .bearer_auth(&token)
        .json(&json!({ "detection_threshold": 1.5 }))
        .send()
        .await
    else {
        panic!("request failed");
    };
    assert_eq!(response.status(), 400);

    let Ok(response) = server
        .client
        .patch(server.url(&format!("/api/v1/cameras/{id}")))
        .bearer_auth(&token)
        .json(&json!({ "status": "maintenance", "detection_threshold": 0.8 }))
        .send()
        .await
    else {
        panic!("request failed");
    };
    assert_eq!(response.status(), 200);
    let Ok(body) = response.json::<Value>().await else {
        panic!("no JSON body");
    };
    assert_eq!(body["status"], "maintenance");
    assert_eq!(body["detection_threshold"], 0.8);
}

#[tokio::test]
async fn test_summary_counts() {
    let server = start_test_server().await;
    server.store.seed_species("African Elephant", "Loxodonta africana", "Endangered").await;
    server.store.seed_camera("A", None, "online", None).await;
    server.store.seed_camera("B", None, "offline", None).await;
    server
        .store
        .seed_alert(AlertSeed {
            animal_id: None,
            alert_type: "health".to_string(),
            severity: "low".to_string(),
            message: "Limping observed".to_string(),
            status: AlertStatus::Active,
            created_at: Utc::now(),
        })
        .await;

    let (status, body) = server.get_json("/api/v1/summary").await;
    assert_eq!(status, 200);
    assert_eq!(body["total_species"], 1);
    assert_eq!(body["total_cameras"], 2);
    assert_eq!(body["cameras_online"], 1);
    assert_eq!(body["active_alerts"], 1);
}

#[tokio::test]
async fn test_chat_without_upstream_is_unavailable() {
    let server = start_test_server().await;
    let Ok(response) = server
        .client
        .post(server.url("/api/v1/chat"))
        .json(&json!({ "messages": [{ "role": "user", "content": "Where is Raja?" }] }))
        .send()
        .await
    else {
        panic!("request failed");
    };
    assert_eq!(response.status(), 503);
}

#[tokio::test]
async fn test_ws_receives_subscribed_events() {
    let server = start_test_server().await;
    let id = server.store.seed_camera("Ridge Cam", None, "online", None).await;

    let Ok((mut ws, _)) = tokio_tungstenite::connect_async(format!("ws://{}/ws", server.addr)).await
    else {
        panic!("ws connect failed");
    };
    let subscribe = json!({
        "id": "sub-1",
        "type": "command",
        "timestamp": Utc::now(),
        "payload": { "command": "subscribe", "topics": ["cameras"] }
    });
    let Ok(()) = ws.send(Message::text(subscribe.to_string())).await else {
        panic!("ws send failed");
    };
    let Some(Ok(Message::Text(ack))) = ws.next().await else {
        panic!("expected a subscribe response");
    };
    let Ok(ack) = serde_json::from_str::<Value>(&ack) else {
        panic!("ack is not JSON");
    };
    assert_eq!(ack["type"], "response");

    let token = server.login().await;
    let Ok(response) = server
        .client
        .patch(server.url(&format!("/api/v1/cameras/{id}")))
        .bearer_auth(&token)
        .json(&json!({ "status": "offline" }))
        .send()
        .await
    else {
        panic!("request failed");
    };
    assert_eq!(response.status(), 200);

    let Some(Ok(Message::Text(event))) = ws.next().await else {
        panic!("expected a camera event");
    };
    let Ok(event) = serde_json::from_str::<Value>(&event) else {
        panic!("event is not JSON");
    };
    assert_eq!(event["type"], "event");
    assert_eq!(event["payload"]["event_type"], "camera_updated");
    assert_eq!(event["payload"]["camera_id"], id);
    assert_eq!(event["payload"]["status"], "offline");
}
