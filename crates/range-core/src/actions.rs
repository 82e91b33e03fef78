//! Static per-role action catalogs mapping numeric action ids to the
//! semantic names used throughout the simulated network scenario.

use contracts::Role;

/// Resolve the semantic name of an action id for a role. Ids with no table
/// entry (negative or out of range) resolve to `action-<id>`; the catalog is
/// total over all integer input.
pub fn action_name(role: Role, action_id: i64) -> String {
    let entry = match role {
        Role::Attacker => attacker_action(action_id),
        Role::Defender => defender_action(action_id),
    };

    match entry {
        Some(name) => name.to_string(),
        None => format!("action-{action_id}"),
    }
}

fn attacker_action(action_id: i64) -> Option<&'static str> {
    let name = match action_id {
        0 => "do-nothing",
        1 => "data-manipulation-bot (client_1)",
        2 => "dos-bot (client_1)",
        3 => "ransomware-script (client_1)",
        4 => "data-manipulation-bot (client_2)",
        5 => "dos-bot (client_2)",
        6 => "ransomware-script (client_2)",
        7 => "remote-command [cat /etc/passwd]",
        8 => "configure-ransomware (client_1)",
        9 => "configure-c2-beacon (client_1)",
        10 => "configure-database-client (client_1)",
        11 => "configure-dos-bot (client_1)",
        12 => "c2-server-ransomware-launch",
        13 => "c2-server-terminal-command",
        14 => "c2-server-data-exfiltrate",
        15 => "c2-server-ransomware-configure",
        16 => "corrupt-file (database.db)",
        _ => return None,
    };
    Some(name)
}

fn defender_action(action_id: i64) -> Option<&'static str> {
    let name = match action_id {
        0 => "do-nothing",
        1 => "scan-service (web_server)",
        2 => "stop-service (web_server)",
        3 => "start-service (web_server)",
        4 => "pause-service (web_server)",
        5 => "resume-service (web_server)",
        6 => "restart-service (web_server)",
        7 => "disable-service (web_server)",
        8 => "enable-service (web_server)",
        // The scenario file carries duplicate scan rows; preserved as-is.
        9 => "scan-file (database.db)",
        10 => "scan-file (database.db)",
        11 => "delete-file (database.db)",
        12 => "repair-file (database.db)",
        13 => "fix-service (database_server)",
        14 => "scan-folder (database)",
        15 => "scan-folder (database)",
        16 => "repair-folder (database)",
        17 => "restore-folder (database)",
        18 => "scan-os (domain_controller)",
        19 => "shutdown (domain_controller)",
        20 => "startup (domain_controller)",
        21 => "reset (domain_controller)",
        22 => "scan-os (web_server)",
        23 => "shutdown (web_server)",
        24 => "startup (web_server)",
        25 => "reset (web_server)",
        26 => "scan-os (database_server)",
        27 => "shutdown (database_server)",
        28 => "startup (database_server)",
        29 => "reset (database_server)",
        30 => "scan-os (backup_server)",
        31 => "shutdown (backup_server)",
        32 => "startup (backup_server)",
        33 => "reset (backup_server)",
        34 => "scan-os (security_suite)",
        35 => "shutdown (security_suite)",
        36 => "startup (security_suite)",
        37 => "reset (security_suite)",
        38 => "scan-os (client_1)",
        39 => "shutdown (client_1)",
        40 => "startup (client_1)",
        41 => "reset (client_1)",
        42 => "scan-os (client_2)",
        43 => "shutdown (client_2)",
        44 => "startup (client_2)",
        45 => "reset (client_2)",
        46 => "add-acl-rule [pos0]",
        47 => "add-acl-rule [pos1]",
        48 => "add-acl-rule [pos2]",
        49 => "add-acl-rule [pos3]",
        50 => "add-acl-rule [pos4]",
        51 => "add-acl-rule [pos5]",
        52 => "remove-acl-rule [pos0]",
        53 => "remove-acl-rule [pos1]",
        54 => "remove-acl-rule [pos2]",
        55 => "remove-acl-rule [pos3]",
        56 => "remove-acl-rule [pos4]",
        57 => "remove-acl-rule [pos5]",
        58 => "remove-acl-rule [pos6]",
        59 => "remove-acl-rule [pos7]",
        60 => "remove-acl-rule [pos8]",
        61 => "remove-acl-rule [pos9]",
        62 => "disable-nic (domain_controller)",
        63 => "enable-nic (domain_controller)",
        64 => "disable-nic (web_server)",
        65 => "enable-nic (web_server)",
        66 => "disable-nic (database_server)",
        67 => "enable-nic (database_server)",
        68 => "disable-nic (backup_server)",
        69 => "enable-nic (backup_server)",
        70 => "disable-nic (security_suite)",
        71 => "enable-nic (security_suite)",
        72 => "disable-nic2 (security_suite)",
        73 => "enable-nic2 (security_suite)",
        74 => "disable-nic (client_1)",
        75 => "enable-nic (client_1)",
        76 => "disable-nic (client_2)",
        77 => "enable-nic (client_2)",
        78 => "scan-app [web-browser] (client_1)",
        79 => "scan-app [web-browser] (client_2)",
        80 => "close-app [data-manip-bot] (client_1)",
        81 => "close-app [data-manip-bot] (client_2)",
        82 => "add-acl-rule [pos6]",
        83 => "add-acl-rule [pos7]",
        _ => return None,
    };
    Some(name)
}
