pub mod error;
pub mod records;
pub mod settings;
pub mod testing;

pub use error::StoreError;
pub use records::RecordStore;
pub use settings::SettingsStore;
