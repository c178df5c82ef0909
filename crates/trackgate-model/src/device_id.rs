use std::fmt;

/// A device identifier, normalized to a string of ASCII digits.
///
/// Normalization left-pads the raw string to 20 characters with `'0'` and
/// *then* filters out any remaining non-digit characters, matching the
/// original gateway's `dev_id.zfill(20)` followed by `filter(str.isdigit)`.
/// For already-numeric input under 20 characters the two orderings agree;
/// the pad-first order only matters for malformed input and is kept for
/// parity with the source this was distilled from.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn normalize(raw: &str) -> Self {
        let padded = if raw.len() >= 20 {
            raw.to_string()
        } else {
            format!("{}{}", "0".repeat(20 - raw.len()), raw)
        };
        let digits: String = padded.chars().filter(|c| c.is_ascii_digit()).collect();
        Self(digits)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The last 15 digits, used as the effective identifier on the GT06 wire.
    pub fn gt06_effective_id(&self) -> Option<&str> {
        let len = self.0.len();
        if len < 15 {
            None
        } else {
            Some(&self.0[len - 15..])
        }
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(raw: &str) -> Self {
        Self::normalize(raw)
    }
}

impl From<String> for DeviceId {
    fn from(raw: String) -> Self {
        Self::normalize(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_short_ids_to_twenty_digits() {
        let id = DeviceId::normalize("123456789012345");
        assert_eq!(id.as_str(), "00000123456789012345");
        assert_eq!(id.gt06_effective_id(), Some("123456789012345"));
    }

    #[test]
    fn filters_non_digit_characters() {
        let id = DeviceId::normalize("mt02-88-7766");
        assert!(id.as_str().chars().all(|c| c.is_ascii_digit()));
        assert_eq!(id.as_str(), "00000000000000887766");
    }

    #[test]
    fn long_ids_keep_only_last_fifteen_for_gt06() {
        let id = DeviceId::normalize("999888777666555444333");
        assert_eq!(id.gt06_effective_id(), Some("777666555444333"));
    }
}
