//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod file_reference_repo;
pub mod file_repo;
pub mod group_repo;
pub mod profile_repo;
pub mod project_repo;
pub mod session_master_repo;
pub mod session_master_work_lead_master_repo;
pub mod session_repo;
pub mod session_work_lead_repo;
pub mod type_seance_repo;
pub mod work_lead_master_repo;
pub mod work_lead_repo;
pub mod work_lead_type_repo;

pub use file_reference_repo::FileReferenceRepo;
pub use file_repo::FileRepo;
pub use group_repo::GroupRepo;
pub use profile_repo::ProfileRepo;
pub use project_repo::ProjectRepo;
pub use session_master_repo::SessionMasterRepo;
pub use session_master_work_lead_master_repo::SessionMasterWorkLeadMasterRepo;
pub use session_repo::SessionRepo;
pub use session_work_lead_repo::SessionWorkLeadRepo;
pub use type_seance_repo::TypeSeanceRepo;
pub use work_lead_master_repo::WorkLeadMasterRepo;
pub use work_lead_repo::WorkLeadRepo;
pub use work_lead_type_repo::WorkLeadTypeRepo;
