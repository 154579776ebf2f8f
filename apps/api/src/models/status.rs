//! Status vocabularies stored on candidate records.
//!
//! The wire strings are the ones the frontend renders verbatim, including the
//! historical `Embaucé` spelling, so they must not be "fixed" here.

use serde::{Deserialize, Serialize};

macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }
    };
}

wire_enum!(
    /// Screening decision.
    CandidateStatus {
        Pending => "en Attente",
        Accepted => "Accepté",
        Refused => "Refusé",
    }
);

wire_enum!(
    /// Where the candidate stands in the hiring pipeline.
    HiringStatus {
        AwaitingForm => "Attente formulaire",
        AwaitingClient => "Attente validation client",
        AwaitingCandidate => "Attente validation Candidat",
        Hired => "Embaucé",
        NotHired => "Non Embauché",
    }
);

wire_enum!(
    FormStatus {
        Inactive => "inactive",
        Active => "active",
        Submitted => "submitted",
    }
);

wire_enum!(
    EvalStatus {
        Inactive => "inactive",
        Active => "active",
        Submitted => "submitted",
        Corrected => "corrected",
    }
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hiring_status_keeps_historical_spelling() {
        assert_eq!(HiringStatus::Hired.as_str(), "Embaucé");
        let parsed: HiringStatus = serde_json::from_str(r#""Non Embauché""#).unwrap();
        assert_eq!(parsed, HiringStatus::NotHired);
    }

    #[test]
    fn test_as_str_matches_serde_wire_name() {
        for status in [
            CandidateStatus::Pending,
            CandidateStatus::Accepted,
            CandidateStatus::Refused,
        ] {
            let wire = serde_json::to_value(status).unwrap();
            assert_eq!(wire, status.as_str());
        }
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        assert!(serde_json::from_str::<EvalStatus>(r#""archived""#).is_err());
        assert!(serde_json::from_str::<FormStatus>(r#""open""#).is_err());
    }

    #[test]
    fn test_serialized_wire_strings() {
        assert_eq!(EvalStatus::Corrected.as_str(), "corrected");
        assert_eq!(
            serde_json::to_string(&CandidateStatus::Pending).unwrap(),
            r#""en Attente""#
        );
    }
}
