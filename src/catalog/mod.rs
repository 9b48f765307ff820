//! Entity catalog: the immutable list of skills the galaxy visualizes.
//!
//! The catalog is input data. It is loaded once at mount, either from the
//! built-in set or from a JSON file, and never mutated afterwards. Entries
//! that fail validation are skipped with a warning so one bad record never
//! takes the whole scene down.

pub mod color;

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::error::GalaxyError;
use crate::render::orbit::{CategoryProfile, ProfileTable};
pub use color::{parse_hex_color, Rgb};

/// Lowest and highest mastery level.
pub const LEVEL_MIN: u8 = 1;
pub const LEVEL_MAX: u8 = 10;

/// Index of an entity inside its [`Catalog`].
pub type EntityKey = usize;

/// One visualizable skill.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: String,
    pub name: String,
    /// Mastery level in `[LEVEL_MIN, LEVEL_MAX]`
    pub level: u8,
    /// Key into the orbital profile table
    pub category: String,
    pub color: Rgb,
    pub description: String,
    pub featured: bool,
}

impl Entity {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        level: u8,
        category: impl Into<String>,
        color: Rgb,
        description: impl Into<String>,
        featured: bool,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            level: level.clamp(LEVEL_MIN, LEVEL_MAX),
            category: category.into(),
            color,
            description: description.into(),
            featured,
        }
    }
}

/// Wire shape of an entity. Every field is optional so validation can
/// report which one is missing instead of rejecting the whole file.
#[derive(Debug, Default, Deserialize)]
struct RawEntity {
    id: Option<String>,
    name: Option<String>,
    level: Option<i64>,
    category: Option<String>,
    color: Option<String>,
    description: Option<String>,
    #[serde(default)]
    featured: bool,
}

impl RawEntity {
    fn validate(self, index: usize) -> Result<Entity, GalaxyError> {
        let missing = |field: &str| GalaxyError::malformed(index, format!("missing field `{field}`"));

        let id = self.id.filter(|s| !s.trim().is_empty()).ok_or_else(|| missing("id"))?;
        let name = self.name.filter(|s| !s.trim().is_empty()).ok_or_else(|| missing("name"))?;
        let raw_level = self.level.ok_or_else(|| missing("level"))?;
        let category = self.category.ok_or_else(|| missing("category"))?;
        let color_src = self.color.ok_or_else(|| missing("color"))?;
        let color = parse_hex_color(&color_src)
            .ok_or_else(|| GalaxyError::malformed(index, format!("invalid color `{color_src}`")))?;

        let level = raw_level.clamp(LEVEL_MIN as i64, LEVEL_MAX as i64) as u8;
        if level as i64 != raw_level {
            log::warn!("entity `{id}`: level {raw_level} clamped to {level}");
        }

        Ok(Entity {
            id,
            name,
            level,
            category,
            color,
            description: self.description.unwrap_or_default(),
            featured: self.featured,
        })
    }
}

/// Top-level catalog file.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    profiles: Option<Vec<CategoryProfile>>,
    entities: Vec<serde_json::Value>,
}

/// Immutable, validated entity list.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entities: Vec<Entity>,
}

impl Catalog {
    /// Build from already-typed entities. Later duplicates of an id are dropped.
    pub fn new(entities: Vec<Entity>) -> Self {
        let mut seen = HashSet::new();
        let entities = entities
            .into_iter()
            .filter(|e| {
                let fresh = seen.insert(e.id.clone());
                if !fresh {
                    log::warn!("duplicate entity id `{}` skipped", e.id);
                }
                fresh
            })
            .collect();
        Self { entities }
    }

    /// Default galaxy: one core language at the center, four orbits around it.
    pub fn builtin() -> Self {
        let e = |id: &str, name: &str, level: u8, cat: &str, hex: &str, desc: &str, featured: bool| {
            Entity::new(
                id,
                name,
                level,
                cat,
                parse_hex_color(hex).unwrap_or(Rgb::WHITE),
                desc,
                featured,
            )
        };

        Self::new(vec![
            e("python", "Python", 10, "core", "#3776ab", "Pandas, NumPy, Jupyter", true),
            e("pyspark", "PySpark", 9, "bigdata", "#e25a1c", "Distributed processing", true),
            e("airflow", "Airflow", 9, "bigdata", "#017cee", "ETL orchestration", true),
            e("nifi", "Apache NiFi", 9, "bigdata", "#728e9b", "Data ingestion", true),
            e("hadoop", "Hadoop", 8, "bigdata", "#66ccff", "HDFS, distributed storage", false),
            e("hive", "Hive", 8, "bigdata", "#fdee21", "Data warehouse", false),
            e("sklearn", "Scikit-learn", 9, "ml", "#f89939", "Classical ML", true),
            e("tensorflow", "TensorFlow", 8, "ml", "#ff6f00", "Deep learning", false),
            e("keras", "Keras", 8, "ml", "#d00000", "Neural networks", false),
            e("pytorch", "PyTorch", 7, "ml", "#ee4c2c", "Research & DL", false),
            e("xgboost", "XGBoost", 9, "ml", "#1e88e5", "Gradient boosting", true),
            e("sql", "SQL", 9, "data", "#00758f", "PostgreSQL, MySQL", true),
            e("mongodb", "MongoDB", 7, "data", "#47a248", "NoSQL", false),
            e("powerbi", "Power BI", 8, "viz", "#f2c811", "Dashboards", false),
            e("plotly", "Plotly", 8, "viz", "#3f4f75", "Interactive charts", false),
            e("superset", "Superset", 7, "viz", "#20a7c9", "Open-source BI", false),
        ])
    }

    /// Parse a catalog document. Malformed entities are skipped; the returned
    /// profile table is `Some` only when the document carries one.
    pub fn from_json_str(
        src: &str,
        path: &Path,
    ) -> Result<(Self, Option<ProfileTable>), GalaxyError> {
        let file: CatalogFile = serde_json::from_str(src).map_err(|source| GalaxyError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let mut entities = Vec::with_capacity(file.entities.len());
        for (index, value) in file.entities.into_iter().enumerate() {
            let parsed = serde_json::from_value::<RawEntity>(value)
                .map_err(|e| GalaxyError::malformed(index, e.to_string()))
                .and_then(|raw| raw.validate(index));
            match parsed {
                Ok(entity) => entities.push(entity),
                Err(e) => log::warn!("{e}; skipped"),
            }
        }

        let profiles = file.profiles.map(ProfileTable::from_profiles);
        Ok((Self::new(entities), profiles))
    }

    /// Read and parse a catalog file.
    pub fn load(path: &Path) -> Result<(Self, Option<ProfileTable>), GalaxyError> {
        let src = std::fs::read_to_string(path).map_err(|source| GalaxyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let loaded = Self::from_json_str(&src, path)?;
        log::info!("catalog {}: {} entities", path.display(), loaded.0.len());
        Ok(loaded)
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn get(&self, key: EntityKey) -> Option<&Entity> {
        self.entities.get(key)
    }

    pub fn index_of(&self, id: &str) -> Option<EntityKey> {
        self.entities.iter().position(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> (Catalog, Option<ProfileTable>) {
        Catalog::from_json_str(src, Path::new("test.json")).unwrap()
    }

    #[test]
    fn builtin_has_one_core_entity() {
        let cat = Catalog::builtin();
        assert_eq!(cat.len(), 16);
        let cores: Vec<_> = cat.entities().iter().filter(|e| e.category == "core").collect();
        assert_eq!(cores.len(), 1);
        assert_eq!(cores[0].id, "python");
    }

    #[test]
    fn builtin_levels_in_range() {
        for e in Catalog::builtin().entities() {
            assert!((LEVEL_MIN..=LEVEL_MAX).contains(&e.level), "{}", e.id);
        }
    }

    #[test]
    fn skips_entity_missing_name() {
        let (cat, profiles) = parse(
            r##"{ "entities": [
                { "id": "a", "name": "A", "level": 5, "category": "x", "color": "#112233", "description": "ok" },
                { "id": "b", "level": 5, "category": "x", "color": "#112233" },
                { "id": "c", "name": "C", "level": 3, "category": "y", "color": "#abc" }
            ] }"##,
        );
        assert!(profiles.is_none());
        let ids: Vec<_> = cat.entities().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["a", "c"]);
        assert_eq!(cat.get(1).map(|e| e.description.as_str()), Some(""));
    }

    #[test]
    fn skips_bad_color_and_non_objects() {
        let (cat, _) = parse(
            r##"{ "entities": [
                42,
                { "id": "a", "name": "A", "level": 5, "category": "x", "color": "blue" },
                { "id": "b", "name": "B", "level": 5, "category": "x", "color": "#0000ff" }
            ] }"##,
        );
        assert_eq!(cat.len(), 1);
        assert_eq!(cat.entities()[0].id, "b");
    }

    #[test]
    fn clamps_level() {
        let (cat, _) = parse(
            r##"{ "entities": [
                { "id": "hi", "name": "Hi", "level": 14, "category": "x", "color": "#000000" },
                { "id": "lo", "name": "Lo", "level": 0, "category": "x", "color": "#000000" }
            ] }"##,
        );
        assert_eq!(cat.entities()[0].level, 10);
        assert_eq!(cat.entities()[1].level, 1);
    }

    #[test]
    fn drops_duplicate_ids() {
        let (cat, _) = parse(
            r##"{ "entities": [
                { "id": "a", "name": "First", "level": 5, "category": "x", "color": "#000000" },
                { "id": "a", "name": "Second", "level": 5, "category": "x", "color": "#000000" }
            ] }"##,
        );
        assert_eq!(cat.len(), 1);
        assert_eq!(cat.entities()[0].name, "First");
    }

    #[test]
    fn reads_profiles_when_present() {
        let (_, profiles) = parse(
            r##"{
                "profiles": [ { "category": "x", "radius": 5.0, "speed": 0.0, "tilt": 0.0, "label": "X" } ],
                "entities": []
            }"##,
        );
        let table = profiles.unwrap();
        assert_eq!(table.get("x").map(|p| p.radius), Some(5.0));
    }

    #[test]
    fn rejects_non_json() {
        let err = Catalog::from_json_str("not json", Path::new("bad.json")).unwrap_err();
        assert!(matches!(err, GalaxyError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Catalog::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, GalaxyError::Io { .. }));
    }

    #[test]
    fn index_lookup() {
        let cat = Catalog::builtin();
        assert_eq!(cat.index_of("python"), Some(0));
        assert_eq!(cat.index_of("cobol"), None);
    }
}
