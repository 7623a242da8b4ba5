use serde::Serialize;

use crate::error::SourceError;

/// One record as it came off the link, in channel order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawSample {
    pub values: Vec<f64>,
}

impl RawSample {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Parses a single newline-terminated record of comma-separated decimals.
/// Any bad token rejects the whole record.
pub fn parse_record(line: &str) -> Result<RawSample, SourceError> {
    let body = line
        .strip_suffix('\n')
        .ok_or(SourceError::Unterminated)?;
    let body = body.strip_suffix('\r').unwrap_or(body);

    let values = body
        .split(',')
        .enumerate()
        .map(|(position, token)| {
            let trimmed = token.trim();
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or_else(|| SourceError::Malformed {
                    position,
                    token: trimmed.to_string(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RawSample { values })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_terminated_record() {
        let sample = parse_record("0.1, 0.2,-3.5\r\n").unwrap();
        assert_eq!(sample.values, vec![0.1, 0.2, -3.5]);
    }

    #[test]
    fn rejects_non_numeric_token_without_partial_vector() {
        match parse_record("1.0,abc,3.0\n") {
            Err(SourceError::Malformed { position, token }) => {
                assert_eq!(position, 1);
                assert_eq!(token, "abc");
            }
            other => panic!("expected malformed record, got {other:?}"),
        }
    }

    #[test]
    fn rejects_missing_terminator() {
        assert!(matches!(
            parse_record("1.0,2.0"),
            Err(SourceError::Unterminated)
        ));
    }

    #[test]
    fn rejects_empty_tokens() {
        assert!(matches!(
            parse_record("1.0,,2.0\n"),
            Err(SourceError::Malformed { position: 1, .. })
        ));
        assert!(matches!(
            parse_record("\n"),
            Err(SourceError::Malformed { position: 0, .. })
        ));
    }

    #[test]
    fn rejects_non_finite_values() {
        assert!(matches!(
            parse_record("1.0,NaN\n"),
            Err(SourceError::Malformed { position: 1, .. })
        ));
    }
}
