//! Store selection: memory or sqlite (feature-gated) behind one type.

use domain::adapters::memory_store::InMemoryStore;
use domain::{Bill, BillStatus, CommunityStore, CoreError, House, Request, RequestStatus, Service};

use crate::config::{Config, StorageProvider};

pub enum AnyStore {
    Memory(InMemoryStore),
    #[cfg(feature = "sqlite")]
    Sqlite(sqlite_adapter::SqliteStore),
}

impl AnyStore {
    pub fn memory() -> Self {
        AnyStore::Memory(InMemoryStore::new())
    }

    #[cfg(feature = "sqlite")]
    pub fn sqlite(cfg: &Config) -> Result<Self, CoreError> {
        let store = sqlite_adapter::SqliteStore::from_path(&cfg.db_path, &cfg.community_name)?;
        tracing::info!(
            db_path = %cfg.db_path.display(),
            session_id = store.session_id(),
            "sqlite store opened"
        );
        Ok(AnyStore::Sqlite(store))
    }

    /// Construct a store based on config and feature flags. A sqlite store
    /// that fails to open falls back to memory.
    pub fn from_config(cfg: &Config) -> Self {
        match cfg.storage_provider {
            #[cfg(feature = "sqlite")]
            StorageProvider::Sqlite => match Self::sqlite(cfg) {
                Ok(s) => s,
                Err(e) => {
                    tracing::error!(err = %e, "failed to open sqlite store; falling back to memory");
                    Self::memory()
                }
            },
            _ => Self::memory(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AnyStore::Memory(_) => "memory",
            #[cfg(feature = "sqlite")]
            AnyStore::Sqlite(_) => "sqlite",
        }
    }
}

impl CommunityStore for AnyStore {
    fn insert_house(&self, house: &House) -> Result<(), CoreError> {
        match self {
            AnyStore::Memory(s) => s.insert_house(house),
            #[cfg(feature = "sqlite")]
            AnyStore::Sqlite(s) => s.insert_house(house),
        }
    }

    fn insert_service(&self, service: &Service) -> Result<(), CoreError> {
        match self {
            AnyStore::Memory(s) => s.insert_service(service),
            #[cfg(feature = "sqlite")]
            AnyStore::Sqlite(s) => s.insert_service(service),
        }
    }

    fn insert_request(&self, request: &Request) -> Result<(), CoreError> {
        match self {
            AnyStore::Memory(s) => s.insert_request(request),
            #[cfg(feature = "sqlite")]
            AnyStore::Sqlite(s) => s.insert_request(request),
        }
    }

    fn insert_bill(&self, bill: &Bill) -> Result<(), CoreError> {
        match self {
            AnyStore::Memory(s) => s.insert_bill(bill),
            #[cfg(feature = "sqlite")]
            AnyStore::Sqlite(s) => s.insert_bill(bill),
        }
    }

    fn update_bill_status(&self, bill_id: u32, status: BillStatus) -> Result<(), CoreError> {
        match self {
            AnyStore::Memory(s) => s.update_bill_status(bill_id, status),
            #[cfg(feature = "sqlite")]
            AnyStore::Sqlite(s) => s.update_bill_status(bill_id, status),
        }
    }

    fn update_request_status(
        &self,
        request_id: u32,
        status: RequestStatus,
    ) -> Result<(), CoreError> {
        match self {
            AnyStore::Memory(s) => s.update_request_status(request_id, status),
            #[cfg(feature = "sqlite")]
            AnyStore::Sqlite(s) => s.update_request_status(request_id, status),
        }
    }
}
