use crate::model::LogRecord;

const CAMP_MARKER: &str = "camp";

/// A record is "at camp" when its destination mentions a camp anywhere.
///
/// Plain case-insensitive substring test: "Campbell Mill" counts as a camp
/// destination too.
pub fn is_at_camp(record: &LogRecord) -> bool {
    destination_is_camp(&record.destination)
}

pub fn destination_is_camp(destination: &str) -> bool {
    destination.to_lowercase().contains(CAMP_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::record;

    #[test]
    fn case_insensitive() {
        assert!(destination_is_camp("Camp Site A"));
        assert!(destination_is_camp("BASE CAMP"));
        assert!(destination_is_camp("upper camp 3"));
    }

    #[test]
    fn substring_not_whole_word() {
        assert!(destination_is_camp("Campbell Mill"));
        assert!(destination_is_camp("Campbell's Mill"));
        assert!(destination_is_camp("Encampment"));
    }

    #[test]
    fn non_camp_destinations() {
        assert!(!destination_is_camp("Mill B"));
        assert!(!destination_is_camp(""));
        assert!(!destination_is_camp("Cam p"));
    }

    #[test]
    fn classifies_records() {
        let at_camp = record("LOG010", "Meranti", 1.0, "Kapit", "2025-07-27", "Camp Site A");
        let moved = record("LOG011", "Meranti", 1.0, "Kapit", "2025-07-27", "Mill B");
        assert!(is_at_camp(&at_camp));
        assert!(!is_at_camp(&moved));
    }
}
