//! JSON rendering for extracted cells.

use crate::error::Result;
use crate::model::{Cell, DocumentResult};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Render cells as a JSON array.
pub fn cells_to_json(cells: &[Cell], format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(cells)?,
        JsonFormat::Compact => serde_json::to_string(cells)?,
    };
    Ok(json)
}

/// Render a whole document result (`{"id": .., "cells": [..]}`).
pub fn to_json(result: &DocumentResult, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(result)?,
        JsonFormat::Compact => serde_json::to_string(result)?,
    };
    Ok(json)
}

/// Parse a JSON array of cells.
pub fn cells_from_json(json: &str) -> Result<Vec<Cell>> {
    Ok(serde_json::from_str(json)?)
}
