use crate::prelude::{StageResult, VesselId};
use serde::{Deserialize, Serialize};

/// One timestamped position sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fix {
    /// Epoch seconds.
    #[serde(rename = "at")]
    pub timestamp: i64,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
}

impl Fix {
    pub fn new(timestamp: i64, latitude: f64, longitude: f64) -> Self {
        Self {
            timestamp,
            latitude,
            longitude,
        }
    }
}

/// Raw fix list for one vessel as found in the positions file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VesselPositions {
    pub id: VesselId,
    #[serde(default)]
    pub moments: Vec<Fix>,
}

/// Deduplicated fixes of one vessel in non-decreasing timestamp order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Track {
    fixes: Vec<Fix>,
}

impl Track {
    /// Wraps fixes that already satisfy the ordering and dedup rules.
    pub(crate) fn from_ingested(fixes: Vec<Fix>) -> Self {
        Self { fixes }
    }

    pub fn fixes(&self) -> &[Fix] {
        &self.fixes
    }

    pub fn len(&self) -> usize {
        self.fixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixes.is_empty()
    }

    pub fn first(&self) -> Option<&Fix> {
        self.fixes.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Fix> {
        self.fixes.iter()
    }
}

impl AsRef<[Fix]> for Track {
    fn as_ref(&self) -> &[Fix] {
        &self.fixes
    }
}

impl<'a> IntoIterator for &'a Track {
    type Item = &'a Fix;
    type IntoIter = std::slice::Iter<'a, Fix>;

    fn into_iter(self) -> Self::IntoIter {
        self.fixes.iter()
    }
}

/// Decodes the contents of a positions file (an array of per-vessel fix lists).
pub fn parse_positions_json(contents: &str) -> StageResult<Vec<VesselPositions>> {
    Ok(serde_json::from_str(contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::StageError;

    #[test]
    fn positions_decode_wire_names() {
        let json = r#"[
            {"id": 7, "moments": [{"at": 100, "lat": 50.5, "lon": -1.25}]},
            {"id": 9}
        ]"#;
        let boats = parse_positions_json(json).unwrap();
        assert_eq!(boats.len(), 2);
        assert_eq!(boats[0].id, 7);
        assert_eq!(boats[0].moments[0], Fix::new(100, 50.5, -1.25));
        assert!(boats[1].moments.is_empty());
    }

    #[test]
    fn malformed_positions_surface_decode_error() {
        let err = parse_positions_json(r#"[{"id": "x"}]"#).unwrap_err();
        assert!(matches!(err, StageError::Decode(_)));
    }
}
