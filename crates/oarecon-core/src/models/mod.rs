pub mod deposit;
pub mod license;
pub mod task_record;

pub use deposit::{Creator, DepositMetadata, RequiredField};
pub use license::rights_uri;
pub use task_record::TaskRecord;
