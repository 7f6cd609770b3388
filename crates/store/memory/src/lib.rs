mod records;
mod settings;

pub use records::MemoryRecordStore;
pub use settings::MemorySettingsStore;
