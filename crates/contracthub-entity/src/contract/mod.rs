//! Contract domain entities.

pub mod model;
pub mod status;
pub mod version;

pub use model::{Contract, ContractWithVersions, NewContract, UpdateContract};
pub use status::ContractStatus;
pub use version::{ContractVersion, INITIAL_VERSION_NAME, NewContractVersion, default_version_name};
