//! Contact Repository
//!
//! Owns every contact record together with the id counters. All state lives behind a single
//! `tokio::sync::RwLock`: callers take the read guard for lookups and the write guard for any
//! lookup-then-mutate step, which makes every RPC operation atomic with respect to the others.
//!
//! The repository knows nothing about the RPC protocol; translating absent lookups into
//! protocol errors is the job of the request handler.

use super::types::*;

use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// The unguarded collection of contacts and id counters.
///
/// Contacts are kept in insertion order. Lookups are linear scans, which is fine for the
/// directory sizes this service holds in memory.
#[derive(Debug, Default)]
pub struct ContactStore {
    contacts: Vec<Contact>,
    /// Last contact id handed out. Zero means none yet.
    last_contact_id: u64,
    /// Last phone number id handed out. Shared by all contacts.
    last_number_id: u64,
}

impl ContactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns a fresh contact id and stores a contact with an empty phone list.
    pub fn add_contact(&mut self, fields: ContactFields) -> &Contact {
        self.last_contact_id += 1;
        let contact = Contact::new(ContactId(self.last_contact_id), fields);
        self.contacts.push(contact);
        &self.contacts[self.contacts.len() - 1]
    }

    /// All live contacts in insertion order.
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn find_contact(&self, contact_id: ContactId) -> Option<&Contact> {
        self.contacts
            .iter()
            .find(|contact| contact.contact_id == contact_id)
    }

    pub fn find_contact_mut(&mut self, contact_id: ContactId) -> Option<&mut Contact> {
        self.contacts
            .iter_mut()
            .find(|contact| contact.contact_id == contact_id)
    }

    pub fn find_phone_number(&self, number_id: NumberId) -> Option<&PhoneNumber> {
        self.contacts
            .iter()
            .find_map(|contact| contact.phone_number(number_id))
    }

    /// Locates a phone number together with its parent contact.
    ///
    /// The phone is found first and the parent is derived from where it was found, so a
    /// returned entry always pairs a phone with the contact that actually owns it.
    pub fn find_contact_and_phone_number(&mut self, number_id: NumberId) -> Option<PhoneEntry<'_>> {
        self.contacts.iter_mut().find_map(|contact| {
            let index = contact
                .phone_numbers
                .iter()
                .position(|phone| phone.number_id == number_id)?;
            Some(PhoneEntry { contact, index })
        })
    }

    /// Allocates the next phone number id. Side-effecting: ids are never reused.
    pub fn next_number_id(&mut self) -> NumberId {
        self.last_number_id += 1;
        NumberId(self.last_number_id)
    }

    /// Removes a contact and, with it, every phone number it owns.
    pub fn remove_contact(&mut self, contact_id: ContactId) -> Option<Contact> {
        let index = self
            .contacts
            .iter()
            .position(|contact| contact.contact_id == contact_id)?;
        Some(self.contacts.remove(index))
    }

    pub fn contact_count(&self) -> usize {
        self.contacts.len()
    }

    pub fn phone_number_count(&self) -> usize {
        self.contacts
            .iter()
            .map(|contact| contact.phone_numbers.len())
            .sum()
    }
}

/// A phone number located inside its parent contact.
///
/// Holds the parent mutably, so the phone can be rewritten or detached without a second lookup.
#[derive(Debug)]
pub struct PhoneEntry<'a> {
    contact: &'a mut Contact,
    index: usize,
}

impl<'a> PhoneEntry<'a> {
    pub fn contact(&self) -> &Contact {
        &*self.contact
    }

    pub fn phone(&self) -> &PhoneNumber {
        &self.contact.phone_numbers[self.index]
    }

    /// Overwrites the number and type in place, returning the parent contact.
    pub fn update(self, number: String, phone_type: PhoneType) -> &'a Contact {
        let PhoneEntry { contact, index } = self;
        let phone = &mut contact.phone_numbers[index];
        phone.number = number;
        phone.phone_type = phone_type;
        contact
    }

    /// Detaches the phone from its parent, returning the parent and the removed phone.
    pub fn remove(self) -> (&'a Contact, PhoneNumber) {
        let PhoneEntry { contact, index } = self;
        let removed = contact.phone_numbers.remove(index);
        (contact, removed)
    }
}

/// Snapshot of repository sizes, used by the stats reporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepositoryStats {
    pub contacts: usize,
    pub phone_numbers: usize,
}

/// Shared, lock-guarded handle to the [`ContactStore`].
#[derive(Debug, Default)]
pub struct ContactRepository {
    store: RwLock<ContactStore>,
}

impl ContactRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Acquires shared access for lookups.
    pub async fn read(&self) -> RwLockReadGuard<'_, ContactStore> {
        self.store.read().await
    }

    /// Acquires exclusive access. Hold the guard for the whole lookup-then-mutate step.
    pub async fn write(&self) -> RwLockWriteGuard<'_, ContactStore> {
        self.store.write().await
    }

    pub async fn stats(&self) -> RepositoryStats {
        let store = self.store.read().await;
        RepositoryStats {
            contacts: store.contact_count(),
            phone_numbers: store.phone_number_count(),
        }
    }
}
