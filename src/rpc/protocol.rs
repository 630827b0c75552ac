//! RPC Wire Protocol
//!
//! Defines the endpoints and the Data Transfer Objects (DTOs) exchanged with clients.
//! Every operation is a JSON `POST` to its own endpoint; `SearchContacts` answers with a
//! newline-delimited JSON stream instead of a single document.
//!
//! Missing fields take their zero value, so an empty object is a valid request for every
//! operation. Face data travels as standard base64.

use crate::directory::types::*;
use serde::{Deserialize, Serialize};

// --- API Endpoints ---

pub const ENDPOINT_CREATE_NEW_CONTACT: &str = "/rpc/CreateNewContact";
pub const ENDPOINT_GET_ALL_CONTACTS: &str = "/rpc/GetAllContacts";
/// Streaming endpoint. Responds with `application/x-ndjson`.
pub const ENDPOINT_SEARCH_CONTACTS: &str = "/rpc/SearchContacts";
pub const ENDPOINT_ADD_PHONE_NUMBER: &str = "/rpc/AddPhoneNumber";
pub const ENDPOINT_UPDATE_CONTACT: &str = "/rpc/UpdateContact";
pub const ENDPOINT_UPDATE_PHONE_NUMBER: &str = "/rpc/UpdatePhoneNumber";
pub const ENDPOINT_DELETE_CONTACT: &str = "/rpc/DeleteContact";
pub const ENDPOINT_DELETE_PHONE_NUMBER: &str = "/rpc/DeletePhoneNumber";
pub const ENDPOINT_GET_CONTACT: &str = "/rpc/GetContact";
pub const ENDPOINT_GET_PHONE_NUMBER: &str = "/rpc/GetPhoneNumber";
/// Liveness probe.
pub const ENDPOINT_HEALTH: &str = "/health";

pub const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";

// --- Data Transfer Objects ---

/// A contact as seen on the wire.
///
/// Doubles as the request of `CreateNewContact` (where `contact_id` and `phone_numbers` are
/// ignored) and of `UpdateContact` (where `phone_numbers` is ignored).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactModel {
    pub contact_id: ContactId,
    pub tenant_name: String,
    pub user_name: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub zipcode: String,
    pub email: String,
    #[serde(with = "base64_bytes")]
    pub face_data: Vec<u8>,
    pub phone_numbers: Vec<PhoneNumberModel>,
}

impl ContactModel {
    /// The scalar fields carried by this model.
    pub fn into_fields(self) -> ContactFields {
        ContactFields {
            tenant_name: self.tenant_name,
            user_name: self.user_name,
            address: self.address,
            city: self.city,
            country: self.country,
            zipcode: self.zipcode,
            email: self.email,
            face_data: self.face_data,
        }
    }
}

impl From<Contact> for ContactModel {
    fn from(contact: Contact) -> Self {
        Self {
            contact_id: contact.contact_id,
            tenant_name: contact.tenant_name,
            user_name: contact.user_name,
            address: contact.address,
            city: contact.city,
            country: contact.country,
            zipcode: contact.zipcode,
            email: contact.email,
            face_data: contact.face_data,
            phone_numbers: contact
                .phone_numbers
                .into_iter()
                .map(PhoneNumberModel::from)
                .collect(),
        }
    }
}

/// A phone number as seen on the wire. Also the request of `UpdatePhoneNumber`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhoneNumberModel {
    pub number_id: NumberId,
    pub number: String,
    pub phone_type: PhoneType,
}

impl From<PhoneNumber> for PhoneNumberModel {
    fn from(phone: PhoneNumber) -> Self {
        Self {
            number_id: phone.number_id,
            number: phone.number,
            phone_type: phone.phone_type,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetAllRequest {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactsResponse {
    pub contacts: Vec<ContactModel>,
}

/// Search criteria. Empty strings leave the corresponding field unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchRequest {
    pub tenant_name: String,
    pub user_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddPhoneNumberRequest {
    pub contact_id: ContactId,
    pub number: String,
    pub phone_type: PhoneType,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeleteContactRequest {
    pub contact_id: ContactId,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeletePhoneNumberRequest {
    pub number_id: NumberId,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetContactRequest {
    pub contact_id: ContactId,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetPhoneNumberRequest {
    pub number_id: NumberId,
}

/// Free-text acknowledgment, returned by `DeleteContact`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenericResponseMessage {
    pub message: String,
}

/// Body of every failed call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Stable machine-readable kind, e.g. `not_found`.
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

mod base64_bytes {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S, T>(bytes: T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: AsRef<[u8]>,
    {
        serializer.serialize_str(&STANDARD.encode(bytes.as_ref()))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        STANDARD
            .decode(text.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
