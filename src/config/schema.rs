//! Known option names.
//!
//! Unknown keys are rejected rather than ignored: a misspelled option would
//! otherwise leave the operator believing it took effect.

use toml::{Table, Value};

const SECTIONS: &[&str] = &["daemon", "firewall", "secrets"];

const DAEMON_OPTIONS: &[&str] = &[
    "listen",
    "verbose",
    "http-path",
    "client-ip",
    "ipv4-prefix",
    "ipv6-prefix",
    "cache-database",
    "cookie-lifespan",
    "firewall-lifespan",
    "firewall-chain-name",
    "firewall-deny-method",
];

const RULE_OPTIONS: &[&str] = &["comment", "proto", "dest", "dport", "redir"];

/// Find the first key in `document` that no config field consumes.
///
/// Returns a dotted path such as `daemon.listn` or `firewall[1].port`.
/// Keys under `[secrets]` are free-form. Sections of the wrong type are left
/// for typed decoding to report.
pub(crate) fn find_unknown_key(document: &Table) -> Option<String> {
    if let Some(key) = first_unknown(document, SECTIONS) {
        return Some(key.to_string());
    }

    if let Some(Value::Table(daemon)) = document.get("daemon")
        && let Some(key) = first_unknown(daemon, DAEMON_OPTIONS)
    {
        return Some(format!("daemon.{key}"));
    }

    if let Some(Value::Array(rules)) = document.get("firewall") {
        for (index, rule) in rules.iter().enumerate() {
            if let Value::Table(rule) = rule
                && let Some(key) = first_unknown(rule, RULE_OPTIONS)
            {
                return Some(format!("firewall[{index}].{key}"));
            }
        }
    }

    None
}

fn first_unknown<'a>(table: &'a Table, known: &[&str]) -> Option<&'a str> {
    table
        .keys()
        .map(String::as_str)
        .find(|key| !known.contains(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unknown(toml_str: &str) -> Option<String> {
        let document: Table = toml::from_str(toml_str).unwrap();
        find_unknown_key(&document)
    }

    #[test]
    fn known_keys_pass() {
        let toml_str = r#"
[daemon]
listen = "[::1]:706"
verbose = 1
http-path = "/"
client-ip = "X-Real-IP"
ipv4-prefix = 24
ipv6-prefix = 48
cache-database = "/var/cache/portknob.db"
cookie-lifespan = 0
firewall-lifespan = 0
firewall-chain-name = "portknob"
firewall-deny-method = "drop"

[[firewall]]
comment = "https"
proto = "tcp"
dest = "any"
dport = "443"
redir = ":8443"

[secrets]
anything-goes = "here"
"#;
        assert_eq!(unknown(toml_str), None);
    }

    #[test]
    fn unknown_section() {
        assert_eq!(unknown("[server]\nname = \"x\""), Some("server".into()));
    }

    #[test]
    fn unknown_top_level_scalar() {
        assert_eq!(unknown("verbose = 1"), Some("verbose".into()));
    }

    #[test]
    fn unknown_daemon_option() {
        assert_eq!(
            unknown("[daemon]\nlistn = \"[::1]:706\""),
            Some("daemon.listn".into())
        );
    }

    #[test]
    fn snake_case_spelling_is_unknown() {
        assert_eq!(
            unknown("[daemon]\nhttp_path = \"/\""),
            Some("daemon.http_path".into())
        );
    }

    #[test]
    fn nested_table_in_daemon_is_unknown() {
        assert_eq!(
            unknown("[daemon.tls]\ncert = \"x\""),
            Some("daemon.tls".into())
        );
    }

    #[test]
    fn unknown_rule_option_names_the_rule() {
        let toml_str = r#"
[[firewall]]
dport = "22"

[[firewall]]
dport = "80"
port = "80"
"#;
        assert_eq!(unknown(toml_str), Some("firewall[1].port".into()));
    }

    #[test]
    fn secrets_are_free_form() {
        assert_eq!(unknown("[secrets]\nlistn = \"x\""), None);
    }
}
