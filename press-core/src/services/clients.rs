//! Clients service

use crate::cache::EntityCache;
use crate::utils::validation::validate_client;
use press_client::RemoteStore;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Client, ClientCreate};

#[derive(Debug, Clone)]
pub struct ClientsService {
    cache: EntityCache<Client>,
}

impl ClientsService {
    pub fn new(store: RemoteStore) -> Self {
        Self {
            cache: EntityCache::new(store, "client"),
        }
    }

    pub fn cache(&self) -> &EntityCache<Client> {
        &self.cache
    }

    /// All clients, ordered by name as delivered by the store
    pub fn clients(&self) -> Vec<Client> {
        self.cache.snapshot()
    }

    pub fn get(&self, id: &str) -> Option<Client> {
        self.cache.get(id)
    }

    pub fn require(&self, id: &str) -> AppResult<Client> {
        self.cache.get(id).ok_or_else(|| {
            AppError::with_message(ErrorCode::ClientNotFound, format!("Client {} not found", id))
                .with_detail("id", id)
        })
    }

    pub fn tax_exempt(&self) -> Vec<Client> {
        self.cache.filter(|c| c.is_tax_exempt)
    }

    /// Case-insensitive match on name, email or city; a blank query matches all
    pub fn search(&self, query: &str) -> Vec<Client> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.clients();
        }
        self.cache.filter(|c| {
            c.name.to_lowercase().contains(&needle)
                || c.email.to_lowercase().contains(&needle)
                || c.city.to_lowercase().contains(&needle)
        })
    }

    pub fn create(&self, data: ClientCreate) -> AppResult<Client> {
        let client = data.into_client(String::new());
        validate_client(&client)?;
        let created = self.cache.create(client);
        tracing::info!(id = %created.id, name = %created.name, "Client created");
        Ok(created)
    }

    /// Full-record replace; `Ok(false)` when the id is unknown
    pub fn update(&self, client: Client) -> AppResult<bool> {
        validate_client(&client)?;
        Ok(self.cache.update(client))
    }

    /// Quotes and jobs that reference the client are left untouched
    pub fn delete(&self, id: &str) -> bool {
        self.cache.delete(id)
    }

    pub fn last_error(&self) -> Option<AppError> {
        self.cache.last_error()
    }
}
