mod credential_repo;
mod in_memory_store;
mod json_file_store;

pub use credential_repo::KvCredentialRepository;
pub use in_memory_store::InMemoryKeyValueStore;
pub use json_file_store::JsonFileKeyValueStore;
