//! Enum types carried by Graph models.
//!
//! Each enum has:
//! - its wire spelling via `as_str()` and `Display`
//! - a catch-all variant that keeps unrecognised wire strings verbatim
//! - serde as a plain string
//! - a conversion into [`StoreValue::Enum`]

use std::fmt;

use graph_core::StoreValue;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ---------------------------------------------------------------------------
// Macro: defines an enum with known wire strings + an Other(String) fallback.
// ---------------------------------------------------------------------------
macro_rules! define_enum {
    (
        $(#[$meta:meta])*
        $name:ident, other_variant = $other:ident,
        variants: [
            $( ($variant:ident, $str:expr) ),+ $(,)?
        ]
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $variant, )+
            $other(String),
        }

        impl $name {
            /// Every known member, in declaration order.
            pub const KNOWN: &'static [Self] = &[$( Self::$variant, )+];

            /// Returns the wire spelling.
            pub fn as_str(&self) -> &str {
                match self {
                    $( Self::$variant => $str, )+
                    Self::$other(s) => s.as_str(),
                }
            }

            /// Returns `true` for members this crate knows by name.
            pub fn is_known(&self) -> bool {
                !matches!(self, Self::$other(_))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Ok(Self::from(s.as_str()))
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                match s {
                    $( $str => Self::$variant, )+
                    other => Self::$other(other.to_owned()),
                }
            }
        }

        impl From<$name> for StoreValue {
            fn from(value: $name) -> Self {
                StoreValue::enumeration(value.as_str())
            }
        }
    };
}

define_enum! {
    /// How an access package assignment expires.
    ExpirationPatternType, other_variant = Other,
    variants: [
        (NotSpecified, "notSpecified"),
        (NoExpiration, "noExpiration"),
        (AfterDateTime, "afterDateTime"),
        (AfterDuration, "afterDuration"),
        (UnknownFutureValue, "unknownFutureValue"),
    ]
}

define_enum! {
    /// Who may be assigned an access package through a policy.
    AllowedTargetScope, other_variant = Other,
    variants: [
        (NotSpecified, "notSpecified"),
        (SpecificDirectoryUsers, "specificDirectoryUsers"),
        (SpecificConnectedOrganizationUsers, "specificConnectedOrganizationUsers"),
        (SpecificDirectoryServicePrincipals, "specificDirectoryServicePrincipals"),
        (AllMemberUsers, "allMemberUsers"),
        (AllDirectoryUsers, "allDirectoryUsers"),
        (AllDirectoryServicePrincipals, "allDirectoryServicePrincipals"),
        (AllConfiguredConnectedOrganizationUsers, "allConfiguredConnectedOrganizationUsers"),
        (AllExternalUsers, "allExternalUsers"),
        (UnknownFutureValue, "unknownFutureValue"),
    ]
}

define_enum! {
    /// Who can see a group's content and membership.
    GroupVisibility, other_variant = Other,
    variants: [
        (Public, "Public"),
        (Private, "Private"),
        (HiddenMembership, "HiddenMembership"),
    ]
}

define_enum! {
    UserType, other_variant = Other,
    variants: [
        (Member, "Member"),
        (Guest, "Guest"),
    ]
}

define_enum! {
    /// Age classification used for parental-consent rules.
    AgeGroup, other_variant = Other,
    variants: [
        (Minor, "Minor"),
        (NotAdult, "NotAdult"),
        (Adult, "Adult"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_round_trip() {
        for member in ExpirationPatternType::KNOWN {
            assert_eq!(&ExpirationPatternType::from(member.as_str()), member);
        }
        assert_eq!(ExpirationPatternType::AfterDuration.as_str(), "afterDuration");
        assert_eq!(GroupVisibility::HiddenMembership.to_string(), "HiddenMembership");
        assert_eq!(
            AllowedTargetScope::from("allMemberUsers"),
            AllowedTargetScope::AllMemberUsers
        );
    }

    #[test]
    fn unknown_members_are_kept_verbatim() {
        let v = UserType::from("Partner");
        assert_eq!(v, UserType::Other("Partner".into()));
        assert!(!v.is_known());
        assert_eq!(v.as_str(), "Partner");
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&AgeGroup::NotAdult).unwrap();
        assert_eq!(json, r#""NotAdult""#);
        let back: AgeGroup = serde_json::from_str(r#""Adult""#).unwrap();
        assert_eq!(back, AgeGroup::Adult);
    }

    #[test]
    fn converts_to_store_enum() {
        match StoreValue::from(GroupVisibility::Private) {
            StoreValue::Enum(s) => assert_eq!(s, "Private"),
            other => panic!("expected enum, got {}", other.kind()),
        }
    }
}
