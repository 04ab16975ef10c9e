//! `@odata.type` discriminators of the types in this crate.

pub const ENTITY: &str = "#microsoft.graph.entity";
pub const DIRECTORY_OBJECT: &str = "#microsoft.graph.directoryObject";
pub const USER: &str = "#microsoft.graph.user";
pub const GROUP: &str = "#microsoft.graph.group";
pub const ACCESS_PACKAGE_ASSIGNMENT_POLICY: &str = "#microsoft.graph.accessPackageAssignmentPolicy";
pub const APPROVAL_SETTINGS: &str = "#microsoft.graph.approvalSettings";
pub const UNIFIED_APPROVAL_STAGE: &str = "#microsoft.graph.unifiedApprovalStage";
pub const EXPIRATION_PATTERN: &str = "#microsoft.graph.expirationPattern";
pub const SUBJECT_SET: &str = "#microsoft.graph.subjectSet";
pub const SINGLE_USER: &str = "#microsoft.graph.singleUser";
pub const GROUP_MEMBERS: &str = "#microsoft.graph.groupMembers";

/// The Graph service version these models follow.
pub const GRAPH_API_VERSION: &str = "v1.0";
