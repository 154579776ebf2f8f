//! Append-mostly ledgers of people who left the candidate pipeline.
//!
//! All four share one table; each has its own timestamp name on the wire.

pub mod handlers;
pub mod repository;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ledger {
    Archive,
    Refused,
    Hired,
    Departed,
}

impl Ledger {
    /// Value of the `ledger` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Ledger::Archive => "archive",
            Ledger::Refused => "refused",
            Ledger::Hired => "hired",
            Ledger::Departed => "departed",
        }
    }

    pub fn timestamp_field(self) -> &'static str {
        match self {
            Ledger::Archive => "createdAt",
            Ledger::Refused => "refusedAt",
            Ledger::Hired => "hiredAt",
            Ledger::Departed => "departedAt",
        }
    }

    pub fn created_message(self) -> &'static str {
        match self {
            Ledger::Archive => "Archive record created successfully",
            Ledger::Refused => "Refused candidate added successfully",
            Ledger::Hired => "Hired candidate added successfully",
            Ledger::Departed => "Departed individual added successfully",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_ledger_has_its_own_timestamp() {
        let fields: Vec<_> = [Ledger::Archive, Ledger::Refused, Ledger::Hired, Ledger::Departed]
            .into_iter()
            .map(Ledger::timestamp_field)
            .collect();
        assert_eq!(fields, vec!["createdAt", "refusedAt", "hiredAt", "departedAt"]);
    }
}
