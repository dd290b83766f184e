pub mod deposit;
pub mod merge;

pub use deposit::DepositBuilder;
pub use merge::{
    creators_from_registry, creators_from_service, fill_from_citation, fill_from_publications,
    seed_from_record, with_identifier,
};
