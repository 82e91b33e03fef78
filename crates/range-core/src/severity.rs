//! Keyword-precedence severity classification for resolved action names.

use contracts::Severity;

const CRITICAL_MARKERS: [&str; 3] = ["ransomware", "exfiltrate", "corrupt-file"];
const HIGH_MARKERS: [&str; 3] = ["dos-bot", "data-manipulation-bot", "shutdown"];
const MEDIUM_MARKERS: [&str; 4] = ["scan", "remote-command", "configure", "disable-nic"];

/// Classify an action name into a severity tier. Matching is case-sensitive
/// substring containment; groups are evaluated in descending severity order,
/// so a name matching several groups takes the most severe one.
pub fn classify(action_name: &str) -> Severity {
    if CRITICAL_MARKERS.iter().any(|marker| action_name.contains(marker)) {
        Severity::Critical
    } else if HIGH_MARKERS.iter().any(|marker| action_name.contains(marker)) {
        Severity::High
    } else if MEDIUM_MARKERS.iter().any(|marker| action_name.contains(marker)) {
        Severity::Medium
    } else {
        Severity::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_match_scenario_actions() {
        assert_eq!(classify("ransomware-script (client_1)"), Severity::Critical);
        assert_eq!(classify("dos-bot (client_1)"), Severity::High);
        assert_eq!(classify("scan-service (web_server)"), Severity::Medium);
        assert_eq!(classify("do-nothing"), Severity::Low);
    }

    #[test]
    fn group_order_breaks_multi_group_matches() {
        // configure-ransomware matches both the critical and medium groups.
        assert_eq!(classify("configure-ransomware (client_1)"), Severity::Critical);
        // shutdown beats nothing else; scan-os stays medium.
        assert_eq!(classify("shutdown (web_server)"), Severity::High);
        assert_eq!(classify("scan-os (client_2)"), Severity::Medium);
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert_eq!(classify("Ransomware-Script"), Severity::Low);
        assert_eq!(classify("DOS-BOT"), Severity::Low);
    }
}
