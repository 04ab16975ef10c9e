//! Entitlement management: assignment policies and their approval and
//! expiration settings.

use std::ops::{Deref, DerefMut};

use chrono::{DateTime, FixedOffset};
use graph_core::accessor;
use graph_core::parsable::{FieldDeserializers, field, inherit};
use graph_core::store::default_backing_store;
use graph_core::{
    BackingStore, IsoDuration, ODATA_TYPE_KEY, Parsable, ParseNode, Result, SerializationWriter,
    StoreValue,
};

use crate::decode;
use crate::entity::Entity;
use crate::enums::{AllowedTargetScope, ExpirationPatternType};
use crate::odata;
use crate::subject_set::SubjectSet;

// ---------------------------------------------------------------------------
// AccessPackageAssignmentPolicy
// ---------------------------------------------------------------------------

/// `microsoft.graph.accessPackageAssignmentPolicy`.
#[derive(Debug, Clone)]
pub struct AccessPackageAssignmentPolicy {
    base: Entity,
}

impl Default for AccessPackageAssignmentPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl AccessPackageAssignmentPolicy {
    pub fn new() -> Self {
        Self {
            base: Entity::with_odata_type(odata::ACCESS_PACKAGE_ASSIGNMENT_POLICY),
        }
    }

    pub fn create_from_discriminator_value(_node: &dyn ParseNode) -> Result<Box<dyn Parsable>> {
        Ok(Box::new(Self::new()))
    }

    pub fn store(&self) -> &dyn BackingStore {
        self.base.store()
    }

    pub fn store_mut(&mut self) -> &mut dyn BackingStore {
        self.base.store_mut()
    }

    fn base_mut(&mut self) -> &mut Entity {
        &mut self.base
    }

    pub fn allowed_target_scope(&self) -> Option<AllowedTargetScope> {
        accessor::get_enum(self.store(), "allowedTargetScope")
    }

    pub fn set_allowed_target_scope(&mut self, value: Option<AllowedTargetScope>) {
        accessor::set(self.store_mut(), "allowedTargetScope", value);
    }

    pub fn created_date_time(&self) -> Option<DateTime<FixedOffset>> {
        accessor::get_date_time(self.store(), "createdDateTime")
    }

    pub fn set_created_date_time(&mut self, value: Option<DateTime<FixedOffset>>) {
        accessor::set(self.store_mut(), "createdDateTime", value);
    }

    pub fn description(&self) -> Option<&str> {
        accessor::get_str(self.store(), "description")
    }

    pub fn set_description(&mut self, value: Option<String>) {
        accessor::set(self.store_mut(), "description", value);
    }

    pub fn display_name(&self) -> Option<&str> {
        accessor::get_str(self.store(), "displayName")
    }

    pub fn set_display_name(&mut self, value: Option<String>) {
        accessor::set(self.store_mut(), "displayName", value);
    }

    pub fn expiration(&self) -> Option<&ExpirationPattern> {
        accessor::get_object(self.store(), "expiration")
    }

    pub fn set_expiration(&mut self, value: Option<ExpirationPattern>) {
        accessor::set(self.store_mut(), "expiration", value.map(StoreValue::object));
    }

    pub fn modified_date_time(&self) -> Option<DateTime<FixedOffset>> {
        accessor::get_date_time(self.store(), "modifiedDateTime")
    }

    pub fn set_modified_date_time(&mut self, value: Option<DateTime<FixedOffset>>) {
        accessor::set(self.store_mut(), "modifiedDateTime", value);
    }

    pub fn request_approval_settings(&self) -> Option<&ApprovalSettings> {
        accessor::get_object(self.store(), "requestApprovalSettings")
    }

    pub fn set_request_approval_settings(&mut self, value: Option<ApprovalSettings>) {
        accessor::set(
            self.store_mut(),
            "requestApprovalSettings",
            value.map(StoreValue::object),
        );
    }

    /// Who may request the package when the scope names specific users or
    /// groups. Elements are [`SubjectSet`] subtypes.
    pub fn specific_allowed_targets(&self) -> Option<Vec<&dyn Parsable>> {
        accessor::get_dyn_objects(self.store(), "specificAllowedTargets")
    }

    pub fn set_specific_allowed_targets(&mut self, value: Option<Vec<Box<dyn Parsable>>>) {
        accessor::set(
            self.store_mut(),
            "specificAllowedTargets",
            value.map(StoreValue::boxed_objects),
        );
    }

    pub fn serialize_fields(&self, writer: &mut dyn SerializationWriter) -> Result<()> {
        self.base.serialize_members(writer)?;
        writer.write_enum_value(
            Some("allowedTargetScope"),
            self.allowed_target_scope().as_ref().map(AllowedTargetScope::as_str),
        )?;
        writer.write_date_time_value(Some("createdDateTime"), self.created_date_time())?;
        writer.write_string_value(Some("description"), self.description())?;
        writer.write_string_value(Some("displayName"), self.display_name())?;
        writer.write_object_value(
            Some("expiration"),
            accessor::get_dyn_object(self.store(), "expiration"),
        )?;
        writer.write_date_time_value(Some("modifiedDateTime"), self.modified_date_time())?;
        writer.write_object_value(
            Some("requestApprovalSettings"),
            accessor::get_dyn_object(self.store(), "requestApprovalSettings"),
        )?;
        writer.write_collection_of_object_values(
            Some("specificAllowedTargets"),
            self.specific_allowed_targets().as_deref(),
        )?;
        writer.write_additional_data(Parsable::additional_data(self))
    }

    pub fn field_deserializers() -> FieldDeserializers<Self> {
        let mut table = inherit(Entity::field_deserializers(), Self::base_mut);
        table.extend([
            (
                "allowedTargetScope",
                field(|m: &mut Self, n: &dyn ParseNode| {
                    m.set_allowed_target_scope(decode::enumeration(n)?);
                    Ok(())
                }),
            ),
            (
                "createdDateTime",
                field(|m: &mut Self, n: &dyn ParseNode| {
                    m.set_created_date_time(n.get_date_time_value()?);
                    Ok(())
                }),
            ),
            (
                "description",
                field(|m: &mut Self, n: &dyn ParseNode| {
                    m.set_description(n.get_string_value()?);
                    Ok(())
                }),
            ),
            (
                "displayName",
                field(|m: &mut Self, n: &dyn ParseNode| {
                    m.set_display_name(n.get_string_value()?);
                    Ok(())
                }),
            ),
            (
                "expiration",
                field(|m: &mut Self, n: &dyn ParseNode| {
                    let value =
                        n.get_object_value(ExpirationPattern::create_from_discriminator_value)?;
                    accessor::set(m.store_mut(), "expiration", value);
                    Ok(())
                }),
            ),
            (
                "modifiedDateTime",
                field(|m: &mut Self, n: &dyn ParseNode| {
                    m.set_modified_date_time(n.get_date_time_value()?);
                    Ok(())
                }),
            ),
            (
                "requestApprovalSettings",
                field(|m: &mut Self, n: &dyn ParseNode| {
                    let value =
                        n.get_object_value(ApprovalSettings::create_from_discriminator_value)?;
                    accessor::set(m.store_mut(), "requestApprovalSettings", value);
                    Ok(())
                }),
            ),
            (
                "specificAllowedTargets",
                field(|m: &mut Self, n: &dyn ParseNode| {
                    m.set_specific_allowed_targets(n.get_collection_of_object_values(
                        SubjectSet::create_from_discriminator_value,
                    )?);
                    Ok(())
                }),
            ),
        ]);
        table
    }
}

impl Deref for AccessPackageAssignmentPolicy {
    type Target = Entity;

    fn deref(&self) -> &Entity {
        &self.base
    }
}

impl DerefMut for AccessPackageAssignmentPolicy {
    fn deref_mut(&mut self) -> &mut Entity {
        &mut self.base
    }
}

graph_core::impl_parsable!(AccessPackageAssignmentPolicy);

// ---------------------------------------------------------------------------
// ApprovalSettings
// ---------------------------------------------------------------------------

/// `microsoft.graph.approvalSettings`.
#[derive(Debug, Clone)]
pub struct ApprovalSettings {
    store: Box<dyn BackingStore>,
}

impl Default for ApprovalSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl ApprovalSettings {
    pub fn new() -> Self {
        let mut settings = Self {
            store: default_backing_store(),
        };
        accessor::set(
            settings.store_mut(),
            ODATA_TYPE_KEY,
            odata::APPROVAL_SETTINGS,
        );
        settings
    }

    pub fn create_from_discriminator_value(_node: &dyn ParseNode) -> Result<Box<dyn Parsable>> {
        Ok(Box::new(Self::new()))
    }

    pub fn store(&self) -> &dyn BackingStore {
        self.store.as_ref()
    }

    pub fn store_mut(&mut self) -> &mut dyn BackingStore {
        self.store.as_mut()
    }

    /// `SingleStage`, `Serial`, `Parallel` or `NoApproval`.
    pub fn approval_mode(&self) -> Option<&str> {
        accessor::get_str(self.store(), "approvalMode")
    }

    pub fn set_approval_mode(&mut self, value: Option<String>) {
        accessor::set(self.store_mut(), "approvalMode", value);
    }

    pub fn approval_stages(&self) -> Option<Vec<&UnifiedApprovalStage>> {
        accessor::get_objects(self.store(), "approvalStages")
    }

    pub fn set_approval_stages(&mut self, value: Option<Vec<UnifiedApprovalStage>>) {
        accessor::set(self.store_mut(), "approvalStages", value.map(StoreValue::objects));
    }

    pub fn is_approval_required(&self) -> Option<bool> {
        accessor::get_bool(self.store(), "isApprovalRequired")
    }

    pub fn set_is_approval_required(&mut self, value: Option<bool>) {
        accessor::set(self.store_mut(), "isApprovalRequired", value);
    }

    pub fn is_approval_required_for_extension(&self) -> Option<bool> {
        accessor::get_bool(self.store(), "isApprovalRequiredForExtension")
    }

    pub fn set_is_approval_required_for_extension(&mut self, value: Option<bool>) {
        accessor::set(self.store_mut(), "isApprovalRequiredForExtension", value);
    }

    pub fn is_requestor_justification_required(&self) -> Option<bool> {
        accessor::get_bool(self.store(), "isRequestorJustificationRequired")
    }

    pub fn set_is_requestor_justification_required(&mut self, value: Option<bool>) {
        accessor::set(self.store_mut(), "isRequestorJustificationRequired", value);
    }

    pub fn odata_type(&self) -> Option<&str> {
        accessor::get_str(self.store(), ODATA_TYPE_KEY)
    }

    pub fn serialize_fields(&self, writer: &mut dyn SerializationWriter) -> Result<()> {
        writer.write_string_value(Some("approvalMode"), self.approval_mode())?;
        writer.write_collection_of_object_values(
            Some("approvalStages"),
            accessor::get_dyn_objects(self.store(), "approvalStages").as_deref(),
        )?;
        writer.write_bool_value(Some("isApprovalRequired"), self.is_approval_required())?;
        writer.write_bool_value(
            Some("isApprovalRequiredForExtension"),
            self.is_approval_required_for_extension(),
        )?;
        writer.write_bool_value(
            Some("isRequestorJustificationRequired"),
            self.is_requestor_justification_required(),
        )?;
        writer.write_string_value(Some(ODATA_TYPE_KEY), self.odata_type())?;
        writer.write_additional_data(Parsable::additional_data(self))
    }

    pub fn field_deserializers() -> FieldDeserializers<Self> {
        FieldDeserializers::from([
            (
                "approvalMode",
                field(|m: &mut Self, n: &dyn ParseNode| {
                    m.set_approval_mode(n.get_string_value()?);
                    Ok(())
                }),
            ),
            (
                "approvalStages",
                field(|m: &mut Self, n: &dyn ParseNode| {
                    let stages = n.get_collection_of_object_values(
                        UnifiedApprovalStage::create_from_discriminator_value,
                    )?;
                    accessor::set(
                        m.store_mut(),
                        "approvalStages",
                        stages.map(StoreValue::boxed_objects),
                    );
                    Ok(())
                }),
            ),
            (
                "isApprovalRequired",
                field(|m: &mut Self, n: &dyn ParseNode| {
                    m.set_is_approval_required(n.get_bool_value()?);
                    Ok(())
                }),
            ),
            (
                "isApprovalRequiredForExtension",
                field(|m: &mut Self, n: &dyn ParseNode| {
                    m.set_is_approval_required_for_extension(n.get_bool_value()?);
                    Ok(())
                }),
            ),
            (
                "isRequestorJustificationRequired",
                field(|m: &mut Self, n: &dyn ParseNode| {
                    m.set_is_requestor_justification_required(n.get_bool_value()?);
                    Ok(())
                }),
            ),
            (
                ODATA_TYPE_KEY,
                field(|m: &mut Self, n: &dyn ParseNode| {
                    accessor::set(m.store_mut(), ODATA_TYPE_KEY, n.get_string_value()?);
                    Ok(())
                }),
            ),
        ])
    }
}

graph_core::impl_parsable!(ApprovalSettings);

// ---------------------------------------------------------------------------
// UnifiedApprovalStage
// ---------------------------------------------------------------------------

/// One stage of a multi-stage approval.
#[derive(Debug, Clone)]
pub struct UnifiedApprovalStage {
    store: Box<dyn BackingStore>,
}

impl Default for UnifiedApprovalStage {
    fn default() -> Self {
        Self::new()
    }
}

impl UnifiedApprovalStage {
    pub fn new() -> Self {
        let mut stage = Self {
            store: default_backing_store(),
        };
        accessor::set(stage.store_mut(), ODATA_TYPE_KEY, odata::UNIFIED_APPROVAL_STAGE);
        stage
    }

    pub fn create_from_discriminator_value(_node: &dyn ParseNode) -> Result<Box<dyn Parsable>> {
        Ok(Box::new(Self::new()))
    }

    pub fn store(&self) -> &dyn BackingStore {
        self.store.as_ref()
    }

    pub fn store_mut(&mut self) -> &mut dyn BackingStore {
        self.store.as_mut()
    }

    pub fn approval_stage_time_out_in_days(&self) -> Option<i32> {
        accessor::get_i32(self.store(), "approvalStageTimeOutInDays")
    }

    pub fn set_approval_stage_time_out_in_days(&mut self, value: Option<i32>) {
        accessor::set(self.store_mut(), "approvalStageTimeOutInDays", value);
    }

    /// Approvers the request escalates to. Elements are [`SubjectSet`]
    /// subtypes; view them with [`SubjectSet::of`].
    pub fn escalation_approvers(&self) -> Option<Vec<&dyn Parsable>> {
        accessor::get_dyn_objects(self.store(), "escalationApprovers")
    }

    pub fn set_escalation_approvers(&mut self, value: Option<Vec<Box<dyn Parsable>>>) {
        accessor::set(
            self.store_mut(),
            "escalationApprovers",
            value.map(StoreValue::boxed_objects),
        );
    }

    pub fn escalation_time_in_minutes(&self) -> Option<i32> {
        accessor::get_i32(self.store(), "escalationTimeInMinutes")
    }

    pub fn set_escalation_time_in_minutes(&mut self, value: Option<i32>) {
        accessor::set(self.store_mut(), "escalationTimeInMinutes", value);
    }

    pub fn is_approver_justification_required(&self) -> Option<bool> {
        accessor::get_bool(self.store(), "isApproverJustificationRequired")
    }

    pub fn set_is_approver_justification_required(&mut self, value: Option<bool>) {
        accessor::set(self.store_mut(), "isApproverJustificationRequired", value);
    }

    pub fn is_escalation_enabled(&self) -> Option<bool> {
        accessor::get_bool(self.store(), "isEscalationEnabled")
    }

    pub fn set_is_escalation_enabled(&mut self, value: Option<bool>) {
        accessor::set(self.store_mut(), "isEscalationEnabled", value);
    }

    /// First-line approvers; [`SubjectSet`] subtypes like
    /// [`escalation_approvers`](Self::escalation_approvers).
    pub fn primary_approvers(&self) -> Option<Vec<&dyn Parsable>> {
        accessor::get_dyn_objects(self.store(), "primaryApprovers")
    }

    pub fn set_primary_approvers(&mut self, value: Option<Vec<Box<dyn Parsable>>>) {
        accessor::set(
            self.store_mut(),
            "primaryApprovers",
            value.map(StoreValue::boxed_objects),
        );
    }

    pub fn odata_type(&self) -> Option<&str> {
        accessor::get_str(self.store(), ODATA_TYPE_KEY)
    }

    pub fn serialize_fields(&self, writer: &mut dyn SerializationWriter) -> Result<()> {
        writer.write_i32_value(
            Some("approvalStageTimeOutInDays"),
            self.approval_stage_time_out_in_days(),
        )?;
        writer.write_collection_of_object_values(
            Some("escalationApprovers"),
            self.escalation_approvers().as_deref(),
        )?;
        writer.write_i32_value(
            Some("escalationTimeInMinutes"),
            self.escalation_time_in_minutes(),
        )?;
        writer.write_bool_value(
            Some("isApproverJustificationRequired"),
            self.is_approver_justification_required(),
        )?;
        writer.write_bool_value(Some("isEscalationEnabled"), self.is_escalation_enabled())?;
        writer.write_collection_of_object_values(
            Some("primaryApprovers"),
            self.primary_approvers().as_deref(),
        )?;
        writer.write_string_value(Some(ODATA_TYPE_KEY), self.odata_type())?;
        writer.write_additional_data(Parsable::additional_data(self))
    }

    pub fn field_deserializers() -> FieldDeserializers<Self> {
        FieldDeserializers::from([
            (
                "approvalStageTimeOutInDays",
                field(|m: &mut Self, n: &dyn ParseNode| {
                    m.set_approval_stage_time_out_in_days(n.get_i32_value()?);
                    Ok(())
                }),
            ),
            (
                "escalationApprovers",
                field(|m: &mut Self, n: &dyn ParseNode| {
                    m.set_escalation_approvers(n.get_collection_of_object_values(
                        SubjectSet::create_from_discriminator_value,
                    )?);
                    Ok(())
                }),
            ),
            (
                "escalationTimeInMinutes",
                field(|m: &mut Self, n: &dyn ParseNode| {
                    m.set_escalation_time_in_minutes(n.get_i32_value()?);
                    Ok(())
                }),
            ),
            (
                "isApproverJustificationRequired",
                field(|m: &mut Self, n: &dyn ParseNode| {
                    m.set_is_approver_justification_required(n.get_bool_value()?);
                    Ok(())
                }),
            ),
            (
                "isEscalationEnabled",
                field(|m: &mut Self, n: &dyn ParseNode| {
                    m.set_is_escalation_enabled(n.get_bool_value()?);
                    Ok(())
                }),
            ),
            (
                "primaryApprovers",
                field(|m: &mut Self, n: &dyn ParseNode| {
                    m.set_primary_approvers(n.get_collection_of_object_values(
                        SubjectSet::create_from_discriminator_value,
                    )?);
                    Ok(())
                }),
            ),
            (
                ODATA_TYPE_KEY,
                field(|m: &mut Self, n: &dyn ParseNode| {
                    accessor::set(m.store_mut(), ODATA_TYPE_KEY, n.get_string_value()?);
                    Ok(())
                }),
            ),
        ])
    }
}

graph_core::impl_parsable!(UnifiedApprovalStage);

// ---------------------------------------------------------------------------
// ExpirationPattern
// ---------------------------------------------------------------------------

/// When an assignment ends.
#[derive(Debug, Clone)]
pub struct ExpirationPattern {
    store: Box<dyn BackingStore>,
}

impl Default for ExpirationPattern {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpirationPattern {
    pub fn new() -> Self {
        let mut pattern = Self {
            store: default_backing_store(),
        };
        accessor::set(pattern.store_mut(), ODATA_TYPE_KEY, odata::EXPIRATION_PATTERN);
        pattern
    }

    pub fn create_from_discriminator_value(_node: &dyn ParseNode) -> Result<Box<dyn Parsable>> {
        Ok(Box::new(Self::new()))
    }

    pub fn store(&self) -> &dyn BackingStore {
        self.store.as_ref()
    }

    pub fn store_mut(&mut self) -> &mut dyn BackingStore {
        self.store.as_mut()
    }

    /// Set when the type is `afterDuration`.
    pub fn duration(&self) -> Option<IsoDuration> {
        accessor::get_duration(self.store(), "duration")
    }

    pub fn set_duration(&mut self, value: Option<IsoDuration>) {
        accessor::set(self.store_mut(), "duration", value);
    }

    /// Set when the type is `afterDateTime`.
    pub fn end_date_time(&self) -> Option<DateTime<FixedOffset>> {
        accessor::get_date_time(self.store(), "endDateTime")
    }

    pub fn set_end_date_time(&mut self, value: Option<DateTime<FixedOffset>>) {
        accessor::set(self.store_mut(), "endDateTime", value);
    }

    pub fn pattern_type(&self) -> Option<ExpirationPatternType> {
        accessor::get_enum(self.store(), "type")
    }

    pub fn set_pattern_type(&mut self, value: Option<ExpirationPatternType>) {
        accessor::set(self.store_mut(), "type", value);
    }

    pub fn odata_type(&self) -> Option<&str> {
        accessor::get_str(self.store(), ODATA_TYPE_KEY)
    }

    pub fn serialize_fields(&self, writer: &mut dyn SerializationWriter) -> Result<()> {
        writer.write_duration_value(Some("duration"), self.duration())?;
        writer.write_date_time_value(Some("endDateTime"), self.end_date_time())?;
        writer.write_string_value(Some(ODATA_TYPE_KEY), self.odata_type())?;
        writer.write_enum_value(
            Some("type"),
            self.pattern_type().as_ref().map(ExpirationPatternType::as_str),
        )?;
        writer.write_additional_data(Parsable::additional_data(self))
    }

    pub fn field_deserializers() -> FieldDeserializers<Self> {
        FieldDeserializers::from([
            (
                "duration",
                field(|m: &mut Self, n: &dyn ParseNode| {
                    m.set_duration(n.get_duration_value()?);
                    Ok(())
                }),
            ),
            (
                "endDateTime",
                field(|m: &mut Self, n: &dyn ParseNode| {
                    m.set_end_date_time(n.get_date_time_value()?);
                    Ok(())
                }),
            ),
            (
                ODATA_TYPE_KEY,
                field(|m: &mut Self, n: &dyn ParseNode| {
                    accessor::set(m.store_mut(), ODATA_TYPE_KEY, n.get_string_value()?);
                    Ok(())
                }),
            ),
            (
                "type",
                field(|m: &mut Self, n: &dyn ParseNode| {
                    m.set_pattern_type(decode::enumeration(n)?);
                    Ok(())
                }),
            ),
        ])
    }
}

graph_core::impl_parsable!(ExpirationPattern);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subject_set::{GroupMembers, SingleUser};
    use graph_core::json::{from_json_as, to_json_value};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn policy_payload() -> serde_json::Value {
        json!({
            "@odata.type": "#microsoft.graph.accessPackageAssignmentPolicy",
            "id": "b2eba9a1-b357-42ee-83a8-336522ed6cbf",
            "displayName": "All Users",
            "description": "All users can request for access to the directory.",
            "allowedTargetScope": "specificDirectoryUsers",
            "specificAllowedTargets": [{
                "@odata.type": "#microsoft.graph.groupMembers",
                "groupId": "7d8a0e0c-2c4f-4c1b-9f0e-6a3a1c5b8d21",
                "description": "Sales"
            }],
            "createdDateTime": "2021-05-17T20:44:23.32Z",
            "modifiedDateTime": "2021-05-17T20:44:23.320Z",
            "expiration": {
                "@odata.type": "#microsoft.graph.expirationPattern",
                "type": "afterDuration",
                "duration": "P365D"
            },
            "requestApprovalSettings": {
                "@odata.type": "#microsoft.graph.approvalSettings",
                "isApprovalRequired": true,
                "isApprovalRequiredForExtension": false,
                "isRequestorJustificationRequired": true,
                "approvalMode": "SingleStage",
                "approvalStages": [{
                    "@odata.type": "#microsoft.graph.unifiedApprovalStage",
                    "approvalStageTimeOutInDays": 14,
                    "isApproverJustificationRequired": true,
                    "isEscalationEnabled": false,
                    "escalationTimeInMinutes": 0,
                    "primaryApprovers": [
                        {
                            "@odata.type": "#microsoft.graph.singleUser",
                            "userId": "e6ed9f36-0fcd-4fd1-9a3a-9ed2b5a8f44d",
                            "description": "Manager"
                        },
                        {
                            "@odata.type": "#microsoft.graph.groupMembers",
                            "groupId": "2dd1f4b4-2b1c-4a41-a1a6-0e4b0ac1bf47",
                            "description": "Auditors"
                        }
                    ],
                    "escalationApprovers": []
                }]
            },
            "canExtend": false
        })
    }

    #[test]
    fn decodes_nested_policy() {
        let policy: AccessPackageAssignmentPolicy = from_json_as(
            &policy_payload().to_string(),
            crate::entity::Entity::create_from_discriminator_value,
        )
        .unwrap();
        assert_eq!(policy.display_name(), Some("All Users"));
        assert_eq!(
            policy.allowed_target_scope(),
            Some(AllowedTargetScope::SpecificDirectoryUsers)
        );
        assert_eq!(policy.modified_date_time(), policy.created_date_time());
        let targets = policy.specific_allowed_targets().expect("targets");
        let sales = targets[0].downcast_ref::<GroupMembers>().unwrap();
        assert_eq!(sales.description(), Some("Sales"));

        let expiration = policy.expiration().expect("expiration");
        assert_eq!(expiration.pattern_type(), Some(ExpirationPatternType::AfterDuration));
        assert_eq!(expiration.duration(), Some(IsoDuration::from_dhms(365, 0, 0, 0)));

        let settings = policy.request_approval_settings().expect("settings");
        assert_eq!(settings.is_approval_required(), Some(true));
        let stages = settings.approval_stages().expect("stages");
        assert_eq!(stages.len(), 1);
        assert_eq!(stages[0].approval_stage_time_out_in_days(), Some(14));

        let approvers = stages[0].primary_approvers().expect("approvers");
        let kinds: Vec<&str> = approvers.iter().map(|a| a.type_name()).collect();
        assert_eq!(kinds, vec!["SingleUser", "GroupMembers"]);
        let manager = approvers[0].downcast_ref::<SingleUser>().unwrap();
        assert_eq!(manager.user_id(), Some("e6ed9f36-0fcd-4fd1-9a3a-9ed2b5a8f44d"));
        assert!(stages[0].escalation_approvers().unwrap().is_empty());
    }

    #[test]
    fn nested_policy_encodes_to_the_same_document() {
        let input = policy_payload();
        let policy: AccessPackageAssignmentPolicy = from_json_as(
            &input.to_string(),
            AccessPackageAssignmentPolicy::create_from_discriminator_value,
        )
        .unwrap();
        let output = to_json_value(&policy).unwrap();
        assert!(
            graph_core::diff::json_diff(&input, &output).is_empty(),
            "{output:#}"
        );
    }

    #[test]
    fn builds_policy_by_hand() {
        let mut stage = UnifiedApprovalStage::new();
        stage.set_approval_stage_time_out_in_days(Some(7));
        let mut members = GroupMembers::new();
        members.set_group_id(Some("g1".into()));
        let approver: Box<dyn Parsable> = Box::new(members);
        stage.set_primary_approvers(Some(vec![approver]));

        let mut settings = ApprovalSettings::new();
        settings.set_approval_mode(Some("Serial".into()));
        settings.set_approval_stages(Some(vec![stage]));

        let mut expiration = ExpirationPattern::new();
        expiration.set_pattern_type(Some(ExpirationPatternType::NoExpiration));

        let mut policy = AccessPackageAssignmentPolicy::new();
        policy.set_display_name(Some("Contractors".into()));
        policy.set_request_approval_settings(Some(settings));
        policy.set_expiration(Some(expiration));

        assert_eq!(
            to_json_value(&policy).unwrap(),
            json!({
                "@odata.type": "#microsoft.graph.accessPackageAssignmentPolicy",
                "displayName": "Contractors",
                "expiration": {
                    "@odata.type": "#microsoft.graph.expirationPattern",
                    "type": "noExpiration"
                },
                "requestApprovalSettings": {
                    "@odata.type": "#microsoft.graph.approvalSettings",
                    "approvalMode": "Serial",
                    "approvalStages": [{
                        "@odata.type": "#microsoft.graph.unifiedApprovalStage",
                        "approvalStageTimeOutInDays": 7,
                        "primaryApprovers": [{
                            "@odata.type": "#microsoft.graph.groupMembers",
                            "groupId": "g1"
                        }]
                    }]
                }
            })
        );
    }

    #[test]
    fn bad_nested_value_reports_full_path() {
        let mut input = policy_payload();
        input["requestApprovalSettings"]["approvalStages"][0]["escalationTimeInMinutes"] =
            json!("soon");
        let err = from_json_as::<AccessPackageAssignmentPolicy>(
            &input.to_string(),
            AccessPackageAssignmentPolicy::create_from_discriminator_value,
        )
        .unwrap_err();
        assert_eq!(
            err.field_path(),
            "requestApprovalSettings.approvalStages.[0].escalationTimeInMinutes"
        );
    }
}
