use super::error::ApiError;
use super::protocol::*;
use super::service::{ContactService, SearchFilter};
use crate::directory::types::Contact;

use axum::body::Body;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::{
    Extension, Json, Router,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::ReceiverStream;

/// Results buffered between the search producer and the response body.
const SEARCH_CHANNEL_CAPACITY: usize = 16;

/// Builds the RPC router with every operation mounted at its endpoint.
pub fn router(service: Arc<ContactService>) -> Router {
    Router::new()
        .route(ENDPOINT_CREATE_NEW_CONTACT, post(handle_create_new_contact))
        .route(ENDPOINT_GET_ALL_CONTACTS, post(handle_get_all_contacts))
        .route(ENDPOINT_SEARCH_CONTACTS, post(handle_search_contacts))
        .route(ENDPOINT_ADD_PHONE_NUMBER, post(handle_add_phone_number))
        .route(ENDPOINT_UPDATE_CONTACT, post(handle_update_contact))
        .route(ENDPOINT_UPDATE_PHONE_NUMBER, post(handle_update_phone_number))
        .route(ENDPOINT_DELETE_CONTACT, post(handle_delete_contact))
        .route(ENDPOINT_DELETE_PHONE_NUMBER, post(handle_delete_phone_number))
        .route(ENDPOINT_GET_CONTACT, post(handle_get_contact))
        .route(ENDPOINT_GET_PHONE_NUMBER, post(handle_get_phone_number))
        .route(ENDPOINT_HEALTH, get(handle_health))
        .layer(Extension(service))
}

pub async fn handle_create_new_contact(
    Extension(service): Extension<Arc<ContactService>>,
    Json(req): Json<ContactModel>,
) -> Json<ContactModel> {
    let contact = service.create_new_contact(req.into_fields()).await;
    Json(contact.into())
}

pub async fn handle_get_all_contacts(
    Extension(service): Extension<Arc<ContactService>>,
    Json(_req): Json<GetAllRequest>,
) -> Json<ContactsResponse> {
    let contacts = service
        .get_all_contacts()
        .await
        .into_iter()
        .map(ContactModel::from)
        .collect();
    Json(ContactsResponse { contacts })
}

/// Streams matches as NDJSON.
///
/// The search runs in its own task and feeds a bounded channel that backs the response body.
/// When the client disconnects, axum drops the body, the channel closes and the task stops.
pub async fn handle_search_contacts(
    Extension(service): Extension<Arc<ContactService>>,
    Json(req): Json<SearchRequest>,
) -> Response {
    let filter = SearchFilter {
        tenant_name: req.tenant_name,
        user_name: req.user_name,
    };
    let (tx, rx) = mpsc::channel::<Contact>(SEARCH_CHANNEL_CAPACITY);

    tokio::spawn(async move {
        let outcome = service.search_contacts(filter, tx).await;
        tracing::debug!("Search stream finished: {:?}", outcome);
    });

    let lines = ReceiverStream::new(rx).map(|contact| encode_line(&ContactModel::from(contact)));

    (
        [(header::CONTENT_TYPE, NDJSON_CONTENT_TYPE)],
        Body::from_stream(lines),
    )
        .into_response()
}

fn encode_line(model: &ContactModel) -> Result<Vec<u8>, serde_json::Error> {
    let mut line = serde_json::to_vec(model)?;
    line.push(b'\n');
    Ok(line)
}

pub async fn handle_add_phone_number(
    Extension(service): Extension<Arc<ContactService>>,
    Json(req): Json<AddPhoneNumberRequest>,
) -> Result<Json<ContactModel>, ApiError> {
    let contact = service
        .add_phone_number(req.contact_id, req.number, req.phone_type)
        .await?;
    Ok(Json(contact.into()))
}

pub async fn handle_update_contact(
    Extension(service): Extension<Arc<ContactService>>,
    Json(req): Json<ContactModel>,
) -> Result<Json<ContactModel>, ApiError> {
    let contact_id = req.contact_id;
    let contact = service
        .update_contact(contact_id, req.into_fields())
        .await?;
    Ok(Json(contact.into()))
}

pub async fn handle_update_phone_number(
    Extension(service): Extension<Arc<ContactService>>,
    Json(req): Json<PhoneNumberModel>,
) -> Result<Json<ContactModel>, ApiError> {
    let contact = service
        .update_phone_number(req.number_id, req.number, req.phone_type)
        .await?;
    Ok(Json(contact.into()))
}

pub async fn handle_delete_contact(
    Extension(service): Extension<Arc<ContactService>>,
    Json(req): Json<DeleteContactRequest>,
) -> Result<Json<GenericResponseMessage>, ApiError> {
    let message = service.delete_contact(req.contact_id).await?;
    Ok(Json(GenericResponseMessage {
        message: message.to_string(),
    }))
}

pub async fn handle_delete_phone_number(
    Extension(service): Extension<Arc<ContactService>>,
    Json(req): Json<DeletePhoneNumberRequest>,
) -> Result<Json<ContactModel>, ApiError> {
    let contact = service.delete_phone_number(req.number_id).await?;
    Ok(Json(contact.into()))
}

pub async fn handle_get_contact(
    Extension(service): Extension<Arc<ContactService>>,
    Json(req): Json<GetContactRequest>,
) -> Result<Json<ContactModel>, ApiError> {
    let contact = service.get_contact(req.contact_id).await?;
    Ok(Json(contact.into()))
}

pub async fn handle_get_phone_number(
    Extension(service): Extension<Arc<ContactService>>,
    Json(req): Json<GetPhoneNumberRequest>,
) -> Result<Json<PhoneNumberModel>, ApiError> {
    let phone = service.get_phone_number(req.number_id).await?;
    Ok(Json(phone.into()))
}

pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
