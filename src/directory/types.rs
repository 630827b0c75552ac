use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a contact.
///
/// Allocated by the repository when the contact is created and never handed out again,
/// even after the contact is deleted.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContactId(pub u64);

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a phone number.
///
/// Unique across the whole directory, not only within the owning contact.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NumberId(pub u64);

impl fmt::Display for NumberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhoneType {
    #[default]
    Mobile,
    Home,
    Work,
}

/// A typed phone entry. Always owned by exactly one [`Contact`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber {
    pub number_id: NumberId,
    pub number: String,
    pub phone_type: PhoneType,
}

/// The scalar profile fields of a contact.
///
/// Used both to create a contact and to overwrite an existing one. The phone list is
/// deliberately absent: it is only changed through the phone-number operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFields {
    pub tenant_name: String,
    pub user_name: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub zipcode: String,
    pub email: String,
    /// Opaque face descriptor supplied by the client.
    pub face_data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub contact_id: ContactId,
    pub tenant_name: String,
    pub user_name: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub zipcode: String,
    pub email: String,
    pub face_data: Vec<u8>,
    pub phone_numbers: Vec<PhoneNumber>,
}

impl Contact {
    /// Builds a contact with an empty phone list.
    pub fn new(contact_id: ContactId, fields: ContactFields) -> Self {
        let mut contact = Self {
            contact_id,
            tenant_name: String::new(),
            user_name: String::new(),
            address: String::new(),
            city: String::new(),
            country: String::new(),
            zipcode: String::new(),
            email: String::new(),
            face_data: Vec::new(),
            phone_numbers: Vec::new(),
        };
        contact.apply(fields);
        contact
    }

    /// Overwrites every scalar field in place. Phone numbers are left untouched.
    pub fn apply(&mut self, fields: ContactFields) {
        self.tenant_name = fields.tenant_name;
        self.user_name = fields.user_name;
        self.address = fields.address;
        self.city = fields.city;
        self.country = fields.country;
        self.zipcode = fields.zipcode;
        self.email = fields.email;
        self.face_data = fields.face_data;
    }

    pub fn phone_number(&self, number_id: NumberId) -> Option<&PhoneNumber> {
        self.phone_numbers
            .iter()
            .find(|phone| phone.number_id == number_id)
    }
}
