//! Declarative level specifications
//!
//! A level is authored in tile units as JSON. Spans are `[start, end, row]`
//! with `end` exclusive; single markers are `[column, row]`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::LevelError;

/// Built-in level table
const BUILTIN_LEVELS: &str = include_str!("../../assets/levels.json");

/// A horizontal run of tiles on one row: `[start, end, row]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span(pub i32, pub i32, pub i32);

impl Span {
    pub fn start(&self) -> i32 {
        self.0
    }

    pub fn end(&self) -> i32 {
        self.1
    }

    pub fn row(&self) -> i32 {
        self.2
    }

    /// Tile columns covered by the span
    pub fn columns(&self) -> std::ops::Range<i32> {
        self.0..self.1
    }
}

/// Static description of one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LevelSpec {
    pub id: u32,
    /// Ground columns `[start, end)`, laid on the ground row
    pub ground: (i32, i32),
    pub platforms: Vec<Span>,
    /// Checkpoint flags `[column, row]`, by increasing column
    pub checkpoints: Vec<(i32, i32)>,
    pub spikes: Vec<Span>,
    #[serde(default)]
    pub inverters: Vec<Span>,
    #[serde(default)]
    pub boosts: Vec<Span>,
    /// The single end marker `[column, row]`
    pub end: (i32, i32),
}

impl LevelSpec {
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let spec: LevelSpec = serde_json::from_str(json)?;
        spec.validate()?;
        Ok(spec)
    }

    /// Reject specifications that cannot build a coherent level
    pub fn validate(&self) -> Result<(), LevelError> {
        let empty = |what, start, end| LevelError::EmptySpan {
            id: self.id,
            what,
            start,
            end,
        };

        if self.ground.0 >= self.ground.1 {
            return Err(empty("ground", self.ground.0, self.ground.1));
        }
        let spans = [
            ("platform", &self.platforms),
            ("spikes", &self.spikes),
            ("inverter", &self.inverters),
            ("boost", &self.boosts),
        ];
        for (what, list) in spans {
            if let Some(span) = list.iter().find(|s| s.start() >= s.end()) {
                return Err(empty(what, span.start(), span.end()));
            }
        }
        if self.checkpoints.windows(2).any(|w| w[0].0 > w[1].0) {
            return Err(LevelError::UnorderedCheckpoints { id: self.id });
        }
        Ok(())
    }
}

/// Read-only mapping from level id to specification
#[derive(Debug, Clone, Default)]
pub struct LevelTable {
    levels: BTreeMap<u32, LevelSpec>,
}

impl LevelTable {
    /// The levels shipped with the game
    pub fn builtin() -> Result<Self, LevelError> {
        Self::from_json(BUILTIN_LEVELS)
    }

    /// Parse a JSON array of level specifications
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let specs: Vec<LevelSpec> = serde_json::from_str(json)?;
        let mut levels = BTreeMap::new();
        for spec in specs {
            spec.validate()?;
            let id = spec.id;
            if levels.insert(id, spec).is_some() {
                return Err(LevelError::DuplicateLevel(id));
            }
        }
        log::info!("Loaded {} level specifications", levels.len());
        Ok(Self { levels })
    }

    pub fn get(&self, id: u32) -> Result<&LevelSpec, LevelError> {
        self.levels.get(&id).ok_or(LevelError::UnknownLevel(id))
    }

    pub fn contains(&self, id: u32) -> bool {
        self.levels.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Level ids in ascending order
    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.levels.keys().copied()
    }
}
