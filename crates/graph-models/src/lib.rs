//! Graph model types.
//!
//! Every model is a thin typed view over a backing store. Subtypes embed
//! their parent and dereference to it, so inherited accessors such as
//! `id()` are available on every entity.

pub mod access_package;
pub mod collections;
mod decode;
pub mod directory;
pub mod entity;
pub mod enums;
pub mod odata;
pub mod registry;
pub mod subject_set;

pub use access_package::{
    AccessPackageAssignmentPolicy, ApprovalSettings, ExpirationPattern, UnifiedApprovalStage,
};
pub use collections::{
    BaseCollectionPaginationCountResponse, DirectoryObjectCollectionResponse,
    GroupCollectionResponse, UserCollectionResponse,
};
pub use directory::{DirectoryObject, Group, User};
pub use entity::Entity;
pub use enums::{AgeGroup, AllowedTargetScope, ExpirationPatternType, GroupVisibility, UserType};
pub use subject_set::{GroupMembers, SingleUser, SubjectSet};
