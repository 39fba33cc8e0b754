use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::error::{ArchiveError, ArchiveResult};
use crate::slack::ChannelInfo;

/// Resolve channel identifier to a channel of the archive
/// Supports:
/// - Channel IDs (C..., G...)
/// - Channel names (without #)
/// - #channel-name format
/// - Partial names, resolved to the best fuzzy match
pub fn resolve_channel<'a>(
    identifier: &str,
    channels: &'a [ChannelInfo],
) -> ArchiveResult<&'a ChannelInfo> {
    let identifier = identifier.trim();
    if identifier.is_empty() {
        return Err(ArchiveError::InvalidParameter(
            "Channel identifier must not be empty".to_string(),
        ));
    }

    if let Some(channel) = channels.iter().find(|c| c.id == identifier) {
        return Ok(channel);
    }

    // Handle #channel-name format
    let channel_name = identifier.strip_prefix('#').unwrap_or(identifier);

    if let Some(channel) = channels.iter().find(|c| c.name == channel_name) {
        return Ok(channel);
    }

    let matcher = SkimMatcherV2::default();
    channels
        .iter()
        .filter_map(|c| matcher.fuzzy_match(&c.name, channel_name).map(|score| (score, c)))
        // Highest score wins; ties go to the shorter name
        .max_by(|(a, ca), (b, cb)| a.cmp(b).then_with(|| cb.name.len().cmp(&ca.name.len())))
        .map(|(_, channel)| channel)
        .ok_or_else(|| ArchiveError::NotFound(format!("Channel '{}' not found", identifier)))
}

/// Human-readable byte count, e.g. `1.5 KB`
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut size = bytes as f64 / 1024.0;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", size, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn channel(id: &str, name: &str) -> ChannelInfo {
        ChannelInfo {
            id: id.to_string(),
            name: name.to_string(),
            created: None,
            creator: None,
            is_archived: false,
            is_general: false,
            members: Vec::new(),
            topic: None,
            purpose: None,
        }
    }

    fn channels() -> Vec<ChannelInfo> {
        vec![
            channel("C001", "general"),
            channel("C002", "random"),
            channel("C003", "dev-backend"),
            channel("C004", "dev-backend-alerts"),
        ]
    }

    #[rstest]
    #[case("C002", "random")]
    #[case("general", "general")]
    #[case("#random", "random")]
    #[case("  #general ", "general")]
    #[case("backend", "dev-backend")]
    #[case("alerts", "dev-backend-alerts")]
    fn test_resolve_channel(#[case] identifier: &str, #[case] expected: &str) {
        let channels = channels();
        assert_eq!(resolve_channel(identifier, &channels).unwrap().name, expected);
    }

    #[test]
    fn test_resolve_channel_not_found() {
        let channels = channels();
        let err = resolve_channel("zzzz", &channels).unwrap_err();
        assert_eq!(err.to_string(), "Not found: Channel 'zzzz' not found");
    }

    #[test]
    fn test_resolve_channel_empty_identifier() {
        let channels = channels();
        assert!(matches!(
            resolve_channel("  ", &channels),
            Err(ArchiveError::InvalidParameter(_))
        ));
    }

    #[rstest]
    #[case(0, "0 B")]
    #[case(1023, "1023 B")]
    #[case(1536, "1.5 KB")]
    #[case(5 * 1024 * 1024, "5.0 MB")]
    #[case(3 * 1024 * 1024 * 1024, "3.0 GB")]
    fn test_format_size(#[case] bytes: u64, #[case] expected: &str) {
        assert_eq!(format_size(bytes), expected);
    }
}
