pub mod catalog;
pub mod janya;
pub mod melakarta;
#[allow(clippy::module_inception)]
pub mod raga;

pub use catalog::{melakarta_catalog, CatalogError, RagaCatalog, RagaCatalogBuilder};
pub use janya::janya_ragas;
pub use melakarta::{
    chakra_name, generate_melakartas, melakarta, melakarta_arohana, melakarta_by_name, melakarta_number,
    MELAKARTA_ALIASES, MELAKARTA_COUNT, MELAKARTA_NAMES,
};
pub use raga::{Raga, RagaError};
