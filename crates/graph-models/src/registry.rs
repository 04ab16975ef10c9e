//! Lookup from discriminators and type names to factories.

use graph_core::parse::json_kind;
use graph_core::{JsonParseNode, Parsable, ParsableFactory, ParseNode, Result, SerializationError};
use serde_json::Value;
use tracing::debug;

use crate::access_package::{
    AccessPackageAssignmentPolicy, ApprovalSettings, ExpirationPattern, UnifiedApprovalStage,
};
use crate::collections::{
    BaseCollectionPaginationCountResponse, DirectoryObjectCollectionResponse,
    GroupCollectionResponse, UserCollectionResponse,
};
use crate::directory::{DirectoryObject, Group, User};
use crate::entity::Entity;
use crate::odata;
use crate::subject_set::{GroupMembers, SingleUser, SubjectSet};

/// One registered model type.
#[derive(Debug, Clone, Copy)]
pub struct TypeEntry {
    /// The `@odata.type` value, for types that carry one.
    pub odata_type: Option<&'static str>,
    pub name: &'static str,
    pub factory: ParsableFactory,
}

const TYPES: &[TypeEntry] = &[
    TypeEntry {
        odata_type: Some(odata::ENTITY),
        name: "Entity",
        factory: Entity::create_from_discriminator_value,
    },
    TypeEntry {
        odata_type: Some(odata::DIRECTORY_OBJECT),
        name: "DirectoryObject",
        factory: DirectoryObject::create_from_discriminator_value,
    },
    TypeEntry {
        odata_type: Some(odata::USER),
        name: "User",
        factory: User::create_from_discriminator_value,
    },
    TypeEntry {
        odata_type: Some(odata::GROUP),
        name: "Group",
        factory: Group::create_from_discriminator_value,
    },
    TypeEntry {
        odata_type: Some(odata::ACCESS_PACKAGE_ASSIGNMENT_POLICY),
        name: "AccessPackageAssignmentPolicy",
        factory: AccessPackageAssignmentPolicy::create_from_discriminator_value,
    },
    TypeEntry {
        odata_type: Some(odata::APPROVAL_SETTINGS),
        name: "ApprovalSettings",
        factory: ApprovalSettings::create_from_discriminator_value,
    },
    TypeEntry {
        odata_type: Some(odata::UNIFIED_APPROVAL_STAGE),
        name: "UnifiedApprovalStage",
        factory: UnifiedApprovalStage::create_from_discriminator_value,
    },
    TypeEntry {
        odata_type: Some(odata::EXPIRATION_PATTERN),
        name: "ExpirationPattern",
        factory: ExpirationPattern::create_from_discriminator_value,
    },
    TypeEntry {
        odata_type: Some(odata::SUBJECT_SET),
        name: "SubjectSet",
        factory: SubjectSet::create_from_discriminator_value,
    },
    TypeEntry {
        odata_type: Some(odata::SINGLE_USER),
        name: "SingleUser",
        factory: SingleUser::create_from_discriminator_value,
    },
    TypeEntry {
        odata_type: Some(odata::GROUP_MEMBERS),
        name: "GroupMembers",
        factory: GroupMembers::create_from_discriminator_value,
    },
    TypeEntry {
        odata_type: None,
        name: "BaseCollectionPaginationCountResponse",
        factory: BaseCollectionPaginationCountResponse::create_from_discriminator_value,
    },
    TypeEntry {
        odata_type: None,
        name: "UserCollectionResponse",
        factory: UserCollectionResponse::create_from_discriminator_value,
    },
    TypeEntry {
        odata_type: None,
        name: "GroupCollectionResponse",
        factory: GroupCollectionResponse::create_from_discriminator_value,
    },
    TypeEntry {
        odata_type: None,
        name: "DirectoryObjectCollectionResponse",
        factory: DirectoryObjectCollectionResponse::create_from_discriminator_value,
    },
];

/// Every registered type, entities first.
pub fn types() -> &'static [TypeEntry] {
    TYPES
}

/// Finds the factory for a discriminator such as `#microsoft.graph.user`.
pub fn factory_for(discriminator: &str) -> Option<ParsableFactory> {
    TYPES
        .iter()
        .find(|t| t.odata_type == Some(discriminator))
        .map(|t| t.factory)
}

/// Finds a type by name, ignoring ASCII case.
pub fn lookup(name: &str) -> Option<&'static TypeEntry> {
    TYPES.iter().find(|t| t.name.eq_ignore_ascii_case(name))
}

/// Decodes any payload, choosing the factory by its discriminator.
///
/// Payloads without a discriminator use `fallback`. A discriminator that is
/// not registered is an error when `strict` is set and uses `fallback`
/// otherwise.
pub fn parse_any(value: &Value, fallback: ParsableFactory, strict: bool) -> Result<Box<dyn Parsable>> {
    if !value.is_object() {
        return Err(SerializationError::NotAnObject(json_kind(value)));
    }
    let node = JsonParseNode::new(value);
    let factory = match node.discriminator() {
        Some(discriminator) => match factory_for(&discriminator) {
            Some(factory) => factory,
            None if strict => return Err(SerializationError::UnknownDiscriminator(discriminator)),
            None => {
                debug!(discriminator = discriminator.as_str(), "unregistered discriminator, using fallback");
                fallback
            }
        },
        None => fallback,
    };
    graph_core::json::from_json_value(value, factory)
}
