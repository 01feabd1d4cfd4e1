//! Glyph catalog
//!
//! Ordered collection of glyph records supplied by an external data source.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::sampler::parse_path_data;
use crate::types::{GlyphOutline, Point};

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate glyph id: {0}")]
    DuplicateId(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Wire form of one catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlyphRecord {
    pub id: String,
    /// SVG path-data describing the outline
    pub svg_path: String,
    #[serde(default)]
    pub guide_dots: Vec<Point>,
    #[serde(default)]
    pub start_point: Option<Point>,
}

impl GlyphRecord {
    pub fn to_outline(&self) -> GlyphOutline {
        GlyphOutline {
            id: self.id.clone(),
            commands: parse_path_data(&self.svg_path),
            guide_dots: self.guide_dots.clone(),
            start_point: self.start_point,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GlyphCatalog {
    outlines: Vec<GlyphOutline>,
    index: HashMap<String, usize>,
}

impl GlyphCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<GlyphRecord>) -> CatalogResult<Self> {
        let mut catalog = Self::new();
        for record in records {
            catalog.insert(record.to_outline())?;
        }
        Ok(catalog)
    }

    /// Parse a JSON array of glyph records
    pub fn from_json(json: &str) -> CatalogResult<Self> {
        let records: Vec<GlyphRecord> = serde_json::from_str(json)?;
        Self::from_records(records)
    }

    pub fn insert(&mut self, outline: GlyphOutline) -> CatalogResult<()> {
        if self.index.contains_key(&outline.id) {
            return Err(CatalogError::DuplicateId(outline.id));
        }
        self.index.insert(outline.id.clone(), self.outlines.len());
        self.outlines.push(outline);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&GlyphOutline> {
        self.index.get(id).map(|&i| &self.outlines[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Glyph ids in catalog order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.outlines.iter().map(|o| o.id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &GlyphOutline> {
        self.outlines.iter()
    }

    pub fn len(&self) -> usize {
        self.outlines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outlines.is_empty()
    }
}
