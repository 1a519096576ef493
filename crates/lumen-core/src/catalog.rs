use crate::color::{is_hex_color, ColorGenerator};
use crate::config::LampDefaults;
use crate::error::{LumenError, LumenResult};
use crate::protocol::LampType;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;
use strum_macros::{Display, EnumIter, EnumString};
use uuid::Uuid;

/// Editable field of a lamp type, named as the UI names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum LampField {
    Name,
    Cost,
    Radius,
    Color,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LampEdit {
    Name(String),
    Cost(f64),
    Radius(f64),
    Color(String),
}

impl LampEdit {
    pub fn field(&self) -> LampField {
        match self {
            LampEdit::Name(_) => LampField::Name,
            LampEdit::Cost(_) => LampField::Cost,
            LampEdit::Radius(_) => LampField::Radius,
            LampEdit::Color(_) => LampField::Color,
        }
    }

    /// Builds an edit from raw form input, e.g. `("cost", "120")`.
    pub fn parse(field: &str, value: &str) -> LumenResult<Self> {
        let field = LampField::from_str(field.trim())
            .map_err(|_| LumenError::UnknownLampField(field.to_string()))?;

        let number = |value: &str| {
            value
                .trim()
                .parse::<f64>()
                .map_err(|_| LumenError::InvalidLampField {
                    field,
                    reason: format!("'{}' is not a number", value),
                })
        };

        let edit = match field {
            LampField::Name => LampEdit::Name(value.to_string()),
            LampField::Cost => LampEdit::Cost(number(value)?),
            LampField::Radius => LampEdit::Radius(number(value)?),
            LampField::Color => LampEdit::Color(value.trim().to_string()),
        };
        edit.validate()?;
        Ok(edit)
    }

    pub fn validate(&self) -> LumenResult<()> {
        let invalid = |reason: String| {
            Err(LumenError::InvalidLampField {
                field: self.field(),
                reason,
            })
        };
        match self {
            LampEdit::Cost(v) | LampEdit::Radius(v) if !(v.is_finite() && *v > 0.0) => {
                invalid(format!("must be a positive number, got {}", v))
            }
            LampEdit::Color(c) if !is_hex_color(c) => invalid(format!("'{}' is not #rrggbb", c)),
            _ => Ok(()),
        }
    }

    fn apply(&self, lamp: &LampType) -> LampType {
        let mut next = lamp.clone();
        match self {
            LampEdit::Name(v) => next.name = v.clone(),
            LampEdit::Cost(v) => next.cost = *v,
            LampEdit::Radius(v) => next.radius = *v,
            LampEdit::Color(v) => next.color = v.clone(),
        }
        next
    }
}

/// Immutable snapshot of the lamp catalog.
///
/// Every change produces a new snapshot. Entries that a change does not touch
/// are shared with the previous snapshot, so holders of an old snapshot never
/// observe the change.
#[derive(Debug, Clone, Default)]
pub struct LampCatalog {
    entries: Arc<Vec<Arc<LampType>>>,
}

impl LampCatalog {
    pub fn new(lamps: Vec<LampType>) -> LumenResult<Self> {
        let mut seen = HashSet::new();
        for lamp in &lamps {
            if !seen.insert(lamp.id.as_str()) {
                return Err(LumenError::Config(format!("Duplicate lamp id '{}'", lamp.id)));
            }
        }
        Ok(Self::from_entries(lamps.into_iter().map(Arc::new).collect()))
    }

    fn from_entries(entries: Vec<Arc<LampType>>) -> Self {
        Self {
            entries: Arc::new(entries),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Arc<LampType>] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &LampType> {
        self.entries.iter().map(|e| e.as_ref())
    }

    pub fn get(&self, id: &str) -> Option<&Arc<LampType>> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn last(&self) -> Option<&Arc<LampType>> {
        self.entries.last()
    }

    pub fn with_updated(&self, id: &str, edit: &LampEdit) -> LumenResult<Self> {
        edit.validate()?;
        if self.get(id).is_none() {
            return Err(LumenError::UnknownLamp(id.to_string()));
        }
        let entries = self
            .entries
            .iter()
            .map(|e| {
                if e.id == id {
                    Arc::new(edit.apply(e))
                } else {
                    Arc::clone(e)
                }
            })
            .collect();
        Ok(Self::from_entries(entries))
    }

    pub fn without(&self, id: &str) -> LumenResult<Self> {
        if self.get(id).is_none() {
            return Err(LumenError::UnknownLamp(id.to_string()));
        }
        let entries = self
            .entries
            .iter()
            .filter(|e| e.id != id)
            .cloned()
            .collect();
        Ok(Self::from_entries(entries))
    }

    /// Owned copy in request order.
    pub fn to_wire(&self) -> Vec<LampType> {
        self.iter().cloned().collect()
    }

    pub fn same_snapshot(&self, other: &LampCatalog) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }
}

/// Catalog entry as written by hand in a catalog file. Missing fields are
/// filled in on import.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LampSpec {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub cost: f64,
    pub radius: f64,
    #[serde(default)]
    pub color: Option<String>,
}

/// Sole owner of the current catalog snapshot.
pub struct CatalogStore {
    current: LampCatalog,
    colors: ColorGenerator,
}

impl CatalogStore {
    pub fn new(colors: ColorGenerator) -> Self {
        Self {
            current: LampCatalog::default(),
            colors,
        }
    }

    /// The two lamp types the operator starts with.
    pub fn starter(colors: ColorGenerator) -> Self {
        let mut store = Self::new(colors);
        let specs = vec![
            LampSpec {
                id: Some("A".into()),
                name: Some("Standard".into()),
                cost: 100.0,
                radius: 80.0,
                color: None,
            },
            LampSpec {
                id: Some("B".into()),
                name: Some("Wide".into()),
                cost: 180.0,
                radius: 150.0,
                color: None,
            },
        ];
        store.current = store.build_from_specs(specs).unwrap_or_default();
        store
    }

    pub fn snapshot(&self) -> LampCatalog {
        self.current.clone()
    }

    /// Appends a lamp type with a fresh id, default cost and radius, and a
    /// generated color.
    pub fn add(&mut self, defaults: &LampDefaults) -> LampCatalog {
        let mut id = Uuid::new_v4().to_string();
        while self.current.get(&id).is_some() {
            id = Uuid::new_v4().to_string();
        }
        let lamp = LampType {
            id,
            name: format!("Lamp {}", self.current.len() + 1),
            cost: defaults.default_cost,
            radius: defaults.default_radius,
            color: self.colors.next_color(),
        };
        let mut entries = self.current.entries.as_ref().clone();
        entries.push(Arc::new(lamp));
        self.current = LampCatalog::from_entries(entries);
        self.snapshot()
    }

    pub fn update(&mut self, id: &str, edit: &LampEdit) -> LumenResult<LampCatalog> {
        self.current = self.current.with_updated(id, edit)?;
        Ok(self.snapshot())
    }

    /// Form-input variant of `update`, e.g. `("A", "cost", "120")`.
    pub fn update_field(&mut self, id: &str, field: &str, value: &str) -> LumenResult<LampCatalog> {
        let edit = LampEdit::parse(field, value)?;
        self.update(id, &edit)
    }

    pub fn remove(&mut self, id: &str) -> LumenResult<LampCatalog> {
        self.current = self.current.without(id)?;
        Ok(self.snapshot())
    }

    /// Replaces the whole catalog with imported entries.
    pub fn import(&mut self, specs: Vec<LampSpec>) -> LumenResult<LampCatalog> {
        self.current = self.build_from_specs(specs)?;
        Ok(self.snapshot())
    }

    fn build_from_specs(&mut self, specs: Vec<LampSpec>) -> LumenResult<LampCatalog> {
        let mut lamps = Vec::with_capacity(specs.len());
        for (i, spec) in specs.into_iter().enumerate() {
            LampEdit::Cost(spec.cost).validate()?;
            LampEdit::Radius(spec.radius).validate()?;
            let color = match spec.color {
                Some(c) => {
                    LampEdit::Color(c.clone()).validate()?;
                    c
                }
                None => self.colors.next_color(),
            };
            lamps.push(LampType {
                id: spec.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
                name: spec.name.unwrap_or_else(|| format!("Lamp {}", i + 1)),
                cost: spec.cost,
                radius: spec.radius,
                color,
            });
        }
        LampCatalog::new(lamps)
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new(ColorGenerator::new())
    }
}
