//! Minimal parser for the INI-style key-value files this tool reads
//!
//! Both the local target file and the linode-cli configuration were
//! written by Python's configparser, so the format is externally fixed:
//! `[SECTION]` headers, `key = value` (or `key: value`) lines, `#`/`;`
//! comments. Keys before the first header land in the implicit `DEFAULT`
//! section, matching configparser's defaults handling.

use std::collections::HashMap;

/// Section name used for keys appearing before any `[SECTION]` header
pub(crate) const DEFAULT_SECTION: &str = "DEFAULT";

/// Parse INI-style content into section → key → value maps
///
/// Unparseable lines are skipped rather than rejected; the files are
/// hand- or tool-edited and a stray line should not brick the run.
pub(crate) fn parse(content: &str) -> HashMap<String, HashMap<String, String>> {
    let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
    let mut current = DEFAULT_SECTION.to_string();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            current = name.trim().to_string();
            sections.entry(current.clone()).or_default();
            continue;
        }

        if let Some((key, value)) = line.split_once(['=', ':']) {
            sections
                .entry(current.clone())
                .or_default()
                .insert(key.trim().to_string(), value.trim().to_string());
        }
    }

    sections
}
