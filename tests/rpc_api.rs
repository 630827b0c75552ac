//! End-to-end tests of the HTTP/JSON RPC surface.
//!
//! Each test serves the router on an ephemeral port and talks to it with `reqwest`.

use face_profiler::directory::repository::ContactRepository;
use face_profiler::rpc::handlers::router;
use face_profiler::rpc::protocol::*;
use face_profiler::rpc::service::ContactService;

use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

struct TestServer {
    base: String,
    service: Arc<ContactService>,
    client: reqwest::Client,
}

impl TestServer {
    async fn start(search_pacing: Duration) -> Self {
        let service = ContactService::new(ContactRepository::new(), search_pacing);
        let app = router(service.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr: SocketAddr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base: format!("http://{}", addr),
            service,
            client: reqwest::Client::new(),
        }
    }

    async fn call(&self, endpoint: &str, body: serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.base, endpoint))
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    async fn create(&self, tenant: &str, user: &str) -> ContactModel {
        let response = self
            .call(
                ENDPOINT_CREATE_NEW_CONTACT,
                json!({
                    "tenant_name": tenant,
                    "user_name": user,
                    "address": "Calle Triana 5",
                    "city": "Las Palmas",
                    "country": "Spain",
                    "zipcode": "35002",
                    "email": format!("{}@example.com", user),
                    "face_data": "AAEC"
                }),
            )
            .await;
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        response.json().await.unwrap()
    }
}

fn parse_ndjson(body: &str) -> Vec<ContactModel> {
    body.lines()
        .filter(|line| !line.is_empty())
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[tokio::test]
async fn create_and_get_round_trip() {
    let server = TestServer::start(Duration::ZERO).await;

    let created = server.create("ACME Corp", "alice").await;
    assert_eq!(created.face_data, vec![0, 1, 2]);
    assert!(created.phone_numbers.is_empty());

    let response = server
        .call(ENDPOINT_GET_CONTACT, json!({ "contact_id": created.contact_id }))
        .await;
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let fetched: ContactModel = response.json().await.unwrap();

    assert_eq!(fetched, created);
}

#[tokio::test]
async fn missing_contact_is_404_with_message() {
    let server = TestServer::start(Duration::ZERO).await;

    let response = server
        .call(ENDPOINT_GET_CONTACT, json!({ "contact_id": 41 }))
        .await;

    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    let error: ErrorResponse = response.json().await.unwrap();
    assert_eq!(error.code, "not_found");
    assert_eq!(error.message, "Contact with ID=41 is not found.");
}

#[tokio::test]
async fn phone_number_lifecycle() {
    let server = TestServer::start(Duration::ZERO).await;
    let contact = server.create("acme", "alice").await;

    // Add
    let response = server
        .call(
            ENDPOINT_ADD_PHONE_NUMBER,
            json!({ "contact_id": contact.contact_id, "number": "555-0100", "phone_type": "HOME" }),
        )
        .await;
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let with_phone: ContactModel = response.json().await.unwrap();
    assert_eq!(with_phone.phone_numbers.len(), 1);
    let number_id = with_phone.phone_numbers[0].number_id;

    // Update returns the parent contact
    let response = server
        .call(
            ENDPOINT_UPDATE_PHONE_NUMBER,
            json!({ "number_id": number_id, "number": "555-0199", "phone_type": "WORK" }),
        )
        .await;
    let parent: ContactModel = response.json().await.unwrap();
    assert_eq!(parent.contact_id, contact.contact_id);
    assert_eq!(parent.phone_numbers[0].number, "555-0199");

    // Get
    let response = server
        .call(ENDPOINT_GET_PHONE_NUMBER, json!({ "number_id": number_id }))
        .await;
    let phone: PhoneNumberModel = response.json().await.unwrap();
    assert_eq!(phone.number, "555-0199");

    // Delete returns the parent contact without the phone
    let response = server
        .call(ENDPOINT_DELETE_PHONE_NUMBER, json!({ "number_id": number_id }))
        .await;
    let parent: ContactModel = response.json().await.unwrap();
    assert!(parent.phone_numbers.is_empty());

    // Gone
    let response = server
        .call(ENDPOINT_GET_PHONE_NUMBER, json!({ "number_id": number_id }))
        .await;
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    let error: ErrorResponse = response.json().await.unwrap();
    assert_eq!(
        error.message,
        format!("Phone number with ID={} is not found.", number_id.0)
    );
}

#[tokio::test]
async fn update_and_delete_contact() {
    let server = TestServer::start(Duration::ZERO).await;
    let contact = server.create("acme", "alice").await;

    let response = server
        .call(
            ENDPOINT_UPDATE_CONTACT,
            json!({ "contact_id": contact.contact_id, "tenant_name": "globex", "user_name": "alicia" }),
        )
        .await;
    let updated: ContactModel = response.json().await.unwrap();
    assert_eq!(updated.tenant_name, "globex");
    assert_eq!(updated.city, "");

    let response = server
        .call(ENDPOINT_DELETE_CONTACT, json!({ "contact_id": contact.contact_id }))
        .await;
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let ack: GenericResponseMessage = response.json().await.unwrap();
    assert_eq!(ack.message, "Contact is successfully deleted");

    let response = server
        .call(ENDPOINT_DELETE_CONTACT, json!({ "contact_id": contact.contact_id }))
        .await;
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);

    let response = server
        .call(
            ENDPOINT_UPDATE_CONTACT,
            json!({ "contact_id": contact.contact_id, "tenant_name": "initech" }),
        )
        .await;
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_all_contacts_lists_in_creation_order() {
    let server = TestServer::start(Duration::ZERO).await;
    server.create("acme", "carol").await;
    server.create("globex", "alice").await;

    let response = server.call(ENDPOINT_GET_ALL_CONTACTS, json!({})).await;
    let all: ContactsResponse = response.json().await.unwrap();

    let users: Vec<&str> = all.contacts.iter().map(|c| c.user_name.as_str()).collect();
    assert_eq!(users, vec!["carol", "alice"]);
}

#[tokio::test]
async fn search_streams_ndjson_matches() {
    let server = TestServer::start(Duration::from_millis(5)).await;
    server.create("ACME Corp", "alice").await;
    server.create("Globex", "bob").await;
    server.create("acme labs", "carol").await;

    let response = server
        .call(ENDPOINT_SEARCH_CONTACTS, json!({ "tenant_name": "acme" }))
        .await;
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(
        response.headers()[reqwest::header::CONTENT_TYPE],
        NDJSON_CONTENT_TYPE
    );

    let results = parse_ndjson(&response.text().await.unwrap());
    let users: Vec<&str> = results.iter().map(|c| c.user_name.as_str()).collect();
    assert_eq!(users, vec!["alice", "carol"]);
}

#[tokio::test]
async fn search_with_empty_request_returns_everything() {
    let server = TestServer::start(Duration::ZERO).await;
    server.create("ACME Corp", "alice").await;
    server.create("Globex", "bob").await;

    let response = server.call(ENDPOINT_SEARCH_CONTACTS, json!({})).await;

    let results = parse_ndjson(&response.text().await.unwrap());
    assert_eq!(results.len(), 2);
}

#[tokio::test]
async fn search_stops_after_client_disconnects() {
    let server = TestServer::start(Duration::from_millis(100)).await;
    for n in 0..20 {
        server.create("acme", &format!("user-{}", n)).await;
    }

    let mut response = server.call(ENDPOINT_SEARCH_CONTACTS, json!({})).await;
    let first = response.chunk().await.unwrap();
    assert!(first.is_some());
    assert_eq!(server.service.streams().active_count(), 1);
    drop(response);

    // Pacing out the remaining 19 results would take almost two seconds.
    let deadline = tokio::time::Instant::now() + Duration::from_millis(1200);
    while server.service.streams().active_count() > 0 {
        assert!(
            tokio::time::Instant::now() < deadline,
            "search stream still active after disconnect"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test]
async fn health_endpoint() {
    let server = TestServer::start(Duration::ZERO).await;

    let response = server
        .client
        .get(format!("{}{}", server.base, ENDPOINT_HEALTH))
        .send()
        .await
        .unwrap();

    let health: HealthResponse = response.json().await.unwrap();
    assert_eq!(health.status, "ok");
}
