pub mod core;
pub mod csv_source;
pub mod factory;
pub mod mock;
pub mod persistence;
pub mod yahoo;

pub use csv_source::CsvPriceHistoryProvider;
pub use factory::MarketDataFactory;
pub use mock::MockPriceHistoryProvider;
pub use persistence::ArtifactStore;
pub use yahoo::YahooPriceHistoryProvider;
