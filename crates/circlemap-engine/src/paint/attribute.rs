use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Name of a data-driven style property, e.g. `circle-radius`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PaintProperty(Arc<str>);

impl PaintProperty {
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PaintProperty {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for PaintProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Encoded per-vertex values of one property for one tile.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PaintAttributeData {
    pub bytes: Vec<u8>,
    /// Largest source value encoded in `bytes`; drives value-range decoding.
    pub max_value: f32,
}

impl PaintAttributeData {
    #[inline]
    pub fn new(bytes: Vec<u8>, max_value: f32) -> Self {
        Self { bytes, max_value }
    }

    /// Encodes one `f32` per vertex.
    pub fn from_f32(values: &[f32]) -> Self {
        let max_value = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        Self {
            bytes: bytemuck::cast_slice(values).to_vec(),
            max_value: if values.is_empty() { 0.0 } else { max_value },
        }
    }
}

/// Paint snapshot of one tile: at most one buffer per property.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PaintArrays {
    by_property: BTreeMap<PaintProperty, PaintAttributeData>,
}

impl PaintArrays {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, property: impl Into<PaintProperty>, data: PaintAttributeData) -> Self {
        self.insert(property, data);
        self
    }

    /// Sets the buffer for `property`, returning the one it replaces.
    pub fn insert(
        &mut self,
        property: impl Into<PaintProperty>,
        data: PaintAttributeData,
    ) -> Option<PaintAttributeData> {
        self.by_property.insert(property.into(), data)
    }

    #[inline]
    pub fn get(&self, property: &PaintProperty) -> Option<&PaintAttributeData> {
        self.by_property.get(property)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PaintProperty, &PaintAttributeData)> {
        self.by_property.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.by_property.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.by_property.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_f32_tracks_max() {
        let data = PaintAttributeData::from_f32(&[1.0, 4.5, 2.0]);
        assert_eq!(data.bytes.len(), 12);
        assert_eq!(data.max_value, 4.5);
    }

    #[test]
    fn from_f32_empty_has_zero_max() {
        let data = PaintAttributeData::from_f32(&[]);
        assert!(data.bytes.is_empty());
        assert_eq!(data.max_value, 0.0);
    }

    #[test]
    fn insert_replaces_existing_property() {
        let mut arrays = PaintArrays::new().with("circle-radius", PaintAttributeData::new(vec![1], 1.0));
        let old = arrays.insert("circle-radius", PaintAttributeData::new(vec![2, 3], 3.0));
        assert_eq!(old.map(|d| d.bytes), Some(vec![1]));
        assert_eq!(arrays.len(), 1);
        assert_eq!(arrays.get(&"circle-radius".into()).unwrap().bytes, vec![2, 3]);
    }
}
