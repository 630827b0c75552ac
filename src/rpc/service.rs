//! Contact Service
//!
//! Implements every directory operation on top of the [`ContactRepository`]. Each method takes
//! the repository lock once and performs its whole lookup-then-mutate step under it, so no
//! other request can observe or interleave with a half-finished operation. Results are cloned
//! out of the store before the guard is released.
//!
//! Absent lookups are turned into [`DirectoryError`] values here; the HTTP layer maps those
//! to protocol-level failures.

use super::streams::SearchStreams;
use crate::directory::error::{DirectoryError, DirectoryResult};
use crate::directory::repository::ContactRepository;
use crate::directory::types::*;

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Confirmation returned by a successful contact deletion.
pub const CONTACT_DELETED_MESSAGE: &str = "Contact is successfully deleted";

/// Criteria of a streaming search.
///
/// A contact matches when any non-empty filter is a case-insensitive substring of the
/// corresponding field. The filters are OR-ed: supplying only one leaves the other field
/// unconstrained. When both are empty every contact matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    pub tenant_name: String,
    pub user_name: String,
}

impl SearchFilter {
    pub fn is_empty(&self) -> bool {
        self.tenant_name.is_empty() && self.user_name.is_empty()
    }

    pub fn matches(&self, contact: &Contact) -> bool {
        if self.is_empty() {
            return true;
        }
        contains_ignore_case(&contact.tenant_name, &self.tenant_name)
            || contains_ignore_case(&contact.user_name, &self.user_name)
    }
}

/// Empty needles never match, so an unset filter cannot satisfy the OR on its own.
fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    !needle.is_empty() && haystack.to_uppercase().contains(&needle.to_uppercase())
}

/// How a streaming search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Every matching contact was delivered.
    Completed { delivered: usize },
    /// The stream's token was cancelled (shutdown or explicit cancel).
    Cancelled { delivered: usize },
    /// The receiving side went away, e.g. the client disconnected.
    Disconnected { delivered: usize },
}

impl SearchOutcome {
    pub fn delivered(&self) -> usize {
        match *self {
            SearchOutcome::Completed { delivered }
            | SearchOutcome::Cancelled { delivered }
            | SearchOutcome::Disconnected { delivered } => delivered,
        }
    }
}

pub struct ContactService {
    repository: Arc<ContactRepository>,
    streams: Arc<SearchStreams>,
    /// Delay before each streamed search result.
    search_pacing: Duration,
}

impl ContactService {
    pub fn new(repository: Arc<ContactRepository>, search_pacing: Duration) -> Arc<Self> {
        Arc::new(Self {
            repository,
            streams: SearchStreams::new(),
            search_pacing,
        })
    }

    pub fn repository(&self) -> &Arc<ContactRepository> {
        &self.repository
    }

    pub fn streams(&self) -> &Arc<SearchStreams> {
        &self.streams
    }

    pub fn search_pacing(&self) -> Duration {
        self.search_pacing
    }

    pub async fn create_new_contact(&self, fields: ContactFields) -> Contact {
        let mut store = self.repository.write().await;
        let contact = store.add_contact(fields).clone();
        tracing::info!(
            "Created contact {} (tenant '{}', user '{}')",
            contact.contact_id,
            contact.tenant_name,
            contact.user_name
        );
        contact
    }

    pub async fn get_all_contacts(&self) -> Vec<Contact> {
        let store = self.repository.read().await;
        tracing::debug!("Listing {} contacts", store.contact_count());
        store.contacts().to_vec()
    }

    pub async fn add_phone_number(
        &self,
        contact_id: ContactId,
        number: String,
        phone_type: PhoneType,
    ) -> DirectoryResult<Contact> {
        let mut store = self.repository.write().await;
        if store.find_contact(contact_id).is_none() {
            return Err(not_found(DirectoryError::ContactNotFound(contact_id)));
        }

        let number_id = store.next_number_id();
        let contact = store
            .find_contact_mut(contact_id)
            .ok_or(DirectoryError::ContactNotFound(contact_id))?;
        contact.phone_numbers.push(PhoneNumber {
            number_id,
            number,
            phone_type,
        });

        tracing::info!("Added phone number {} to contact {}", number_id, contact_id);
        Ok(contact.clone())
    }

    pub async fn update_contact(
        &self,
        contact_id: ContactId,
        fields: ContactFields,
    ) -> DirectoryResult<Contact> {
        let mut store = self.repository.write().await;
        let contact = store
            .find_contact_mut(contact_id)
            .ok_or_else(|| not_found(DirectoryError::ContactNotFound(contact_id)))?;
        contact.apply(fields);

        tracing::info!("Updated contact {}", contact_id);
        Ok(contact.clone())
    }

    /// Rewrites a phone number and returns its parent contact.
    pub async fn update_phone_number(
        &self,
        number_id: NumberId,
        number: String,
        phone_type: PhoneType,
    ) -> DirectoryResult<Contact> {
        let mut store = self.repository.write().await;
        let entry = store
            .find_contact_and_phone_number(number_id)
            .ok_or_else(|| not_found(DirectoryError::PhoneNumberNotFound(number_id)))?;
        let contact = entry.update(number, phone_type);

        tracing::info!(
            "Updated phone number {} of contact {}",
            number_id,
            contact.contact_id
        );
        Ok(contact.clone())
    }

    pub async fn delete_contact(&self, contact_id: ContactId) -> DirectoryResult<&'static str> {
        let mut store = self.repository.write().await;
        let removed = store
            .remove_contact(contact_id)
            .ok_or_else(|| not_found(DirectoryError::ContactNotFound(contact_id)))?;

        tracing::info!(
            "Deleted contact {} with {} phone number(s)",
            contact_id,
            removed.phone_numbers.len()
        );
        Ok(CONTACT_DELETED_MESSAGE)
    }

    /// Removes a phone number and returns its parent contact.
    pub async fn delete_phone_number(&self, number_id: NumberId) -> DirectoryResult<Contact> {
        let mut store = self.repository.write().await;
        let entry = store
            .find_contact_and_phone_number(number_id)
            .ok_or_else(|| not_found(DirectoryError::PhoneNumberNotFound(number_id)))?;
        let (contact, _) = entry.remove();

        tracing::info!(
            "Deleted phone number {} from contact {}",
            number_id,
            contact.contact_id
        );
        Ok(contact.clone())
    }

    pub async fn get_contact(&self, contact_id: ContactId) -> DirectoryResult<Contact> {
        let store = self.repository.read().await;
        tracing::debug!("Looking up contact {}", contact_id);
        store
            .find_contact(contact_id)
            .cloned()
            .ok_or_else(|| not_found(DirectoryError::ContactNotFound(contact_id)))
    }

    pub async fn get_phone_number(&self, number_id: NumberId) -> DirectoryResult<PhoneNumber> {
        let store = self.repository.read().await;
        tracing::debug!("Looking up phone number {}", number_id);
        store
            .find_phone_number(number_id)
            .cloned()
            .ok_or_else(|| not_found(DirectoryError::PhoneNumberNotFound(number_id)))
    }

    /// Contacts matching `filter`, in storage order, as of this call.
    pub async fn matching_contacts(&self, filter: &SearchFilter) -> Vec<Contact> {
        let store = self.repository.read().await;
        store
            .contacts()
            .iter()
            .filter(|contact| filter.matches(contact))
            .cloned()
            .collect()
    }

    /// Streams every contact matching `filter` into `tx`, waiting `search_pacing` before each one.
    ///
    /// Matches are snapshotted up front so the repository lock is not held while pacing.
    /// Stops early, without error, when the stream is cancelled or the receiver is dropped.
    pub async fn search_contacts(
        &self,
        filter: SearchFilter,
        tx: mpsc::Sender<Contact>,
    ) -> SearchOutcome {
        let handle = self.streams.register();
        let token = handle.token().clone();
        let matches = self.matching_contacts(&filter).await;

        tracing::info!(
            stream_id = %handle.id(),
            tenant_filter = %filter.tenant_name,
            user_filter = %filter.user_name,
            "Search stream started with {} match(es)",
            matches.len()
        );

        let mut delivered = 0;
        for contact in matches {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::info!(stream_id = %handle.id(), delivered, "Search stream cancelled");
                    return SearchOutcome::Cancelled { delivered };
                }
                _ = tx.closed() => {
                    tracing::info!(stream_id = %handle.id(), delivered, "Search stream receiver gone");
                    return SearchOutcome::Disconnected { delivered };
                }
                _ = tokio::time::sleep(self.search_pacing) => {}
            }

            tokio::select! {
                _ = token.cancelled() => {
                    tracing::info!(stream_id = %handle.id(), delivered, "Search stream cancelled");
                    return SearchOutcome::Cancelled { delivered };
                }
                sent = tx.send(contact) => {
                    if sent.is_err() {
                        tracing::info!(stream_id = %handle.id(), delivered, "Search stream receiver gone");
                        return SearchOutcome::Disconnected { delivered };
                    }
                    delivered += 1;
                }
            }
        }

        tracing::info!(stream_id = %handle.id(), delivered, "Search stream completed");
        SearchOutcome::Completed { delivered }
    }
}

fn not_found(err: DirectoryError) -> DirectoryError {
    tracing::warn!("{}", err);
    err
}
