//! In-memory module store.
//!
//! `ModuleStore` owns the student's module records in insertion order. That
//! order is the order the classification engine sees, so it also decides
//! which module is split when several share the grade at the 120 credit
//! boundary.
//!
//! The store itself is not `Sync` - callers wrap it in
//! `Arc<RwLock<ModuleStore>>` so it can be shared between Axum handlers.
//! Persistence is handled separately by [`crate::repository`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classification::{
    forecast, CreditBreakdown, Forecast, Grade, Level, Module, ModuleError,
};

/// Largest credit value accepted for a single module.
pub const MAX_MODULE_CREDITS: i64 = 240;

/// Unvalidated module fields as submitted by a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleInput {
    #[serde(default)]
    pub name: String,
    pub level: i64,
    pub credits: i64,
    pub grade: i64,
}

impl ModuleInput {
    /// Apply boundary validation. Errors come back in field order.
    pub fn validate(&self) -> Result<ModuleFields, ModuleError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ModuleError::EmptyName);
        }
        Ok(ModuleFields {
            name: name.to_string(),
            module: self.validate_module()?,
        })
    }

    /// Validate everything except the name; used by stateless classification.
    pub fn validate_module(&self) -> Result<Module, ModuleError> {
        let level = u8::try_from(self.level)
            .map_err(|_| ModuleError::InvalidLevel { level: self.level })
            .and_then(Level::try_from)?;

        if self.credits <= 0 {
            return Err(ModuleError::NonPositiveCredits {
                credits: self.credits,
            });
        }
        if self.credits > MAX_MODULE_CREDITS {
            return Err(ModuleError::CreditsOutOfRange {
                credits: self.credits,
            });
        }

        let grade = u8::try_from(self.grade)
            .map_err(|_| ModuleError::InvalidGrade { grade: self.grade })
            .and_then(Grade::try_from)?;

        // Bounded by MAX_MODULE_CREDITS above.
        Ok(Module::new(level, self.credits as u32, grade))
    }
}

/// Validated fields of a module record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleFields {
    pub name: String,
    pub module: Module,
}

/// A persisted module record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredModule {
    pub id: i64,
    pub name: String,
    pub level: Level,
    pub credits: u32,
    pub grade: Grade,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredModule {
    pub fn as_module(&self) -> Module {
        Module::new(self.level, self.credits, self.grade)
    }

    fn with_fields(&self, fields: ModuleFields, now: DateTime<Utc>) -> Self {
        Self {
            id: self.id,
            name: fields.name,
            level: fields.module.level,
            credits: fields.module.credits,
            grade: fields.module.grade,
            created_at: self.created_at,
            updated_at: now,
        }
    }
}

/// Ordered collection of the student's modules.
#[derive(Debug)]
pub struct ModuleStore {
    modules: Vec<StoredModule>,
    next_id: i64,
    last_modified: DateTime<Utc>,
}

impl Default for ModuleStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleStore {
    pub fn new() -> Self {
        Self {
            modules: Vec::new(),
            next_id: 1,
            last_modified: Utc::now(),
        }
    }

    /// Replace the contents with previously persisted records, ordered by id.
    pub fn restore(&mut self, mut modules: Vec<StoredModule>) {
        modules.sort_by_key(|m| m.id);
        self.next_id = modules.last().map_or(1, |m| m.id + 1);
        self.last_modified = modules
            .iter()
            .map(|m| m.updated_at)
            .max()
            .unwrap_or_else(Utc::now);
        self.modules = modules;
    }

    /// Build the record `add` would insert, without inserting it.
    pub fn stage_new(&self, fields: ModuleFields) -> StoredModule {
        let now = Utc::now();
        StoredModule {
            id: self.next_id,
            name: fields.name,
            level: fields.module.level,
            credits: fields.module.credits,
            grade: fields.module.grade,
            created_at: now,
            updated_at: now,
        }
    }

    /// Build the record `update` would write, without writing it.
    pub fn stage_update(&self, id: i64, fields: ModuleFields) -> Result<StoredModule, ModuleError> {
        let current = self.get(id).ok_or_else(|| ModuleError::not_found(id))?;
        Ok(current.with_fields(fields, Utc::now()))
    }

    /// Insert or replace a staged record. New ids are appended at the end.
    pub fn commit(&mut self, module: StoredModule) {
        self.last_modified = module.updated_at;
        match self.modules.iter_mut().find(|m| m.id == module.id) {
            Some(existing) => *existing = module,
            None => {
                self.next_id = self.next_id.max(module.id + 1);
                self.modules.push(module);
            }
        }
    }

    pub fn add(&mut self, fields: ModuleFields) -> StoredModule {
        let module = self.stage_new(fields);
        self.commit(module.clone());
        module
    }

    pub fn update(&mut self, id: i64, fields: ModuleFields) -> Result<StoredModule, ModuleError> {
        let module = self.stage_update(id, fields)?;
        self.commit(module.clone());
        Ok(module)
    }

    pub fn remove(&mut self, id: i64) -> Result<StoredModule, ModuleError> {
        let position = self
            .modules
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| ModuleError::not_found(id))?;
        self.last_modified = Utc::now();
        Ok(self.modules.remove(position))
    }

    pub fn get(&self, id: i64) -> Option<&StoredModule> {
        self.modules.iter().find(|m| m.id == id)
    }

    /// All records, in insertion order.
    pub fn list(&self) -> &[StoredModule] {
        &self.modules
    }

    /// Engine view of the records, in insertion order.
    pub fn modules(&self) -> Vec<Module> {
        self.modules.iter().map(StoredModule::as_module).collect()
    }

    pub fn credits_by_level(&self) -> CreditBreakdown {
        CreditBreakdown::from_modules(&self.modules())
    }

    pub fn forecast(&self) -> Forecast {
        forecast(&self.modules())
    }

    /// Time of the last mutation (or restore).
    pub fn last_modified(&self) -> DateTime<Utc> {
        self.last_modified
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn clear(&mut self) {
        self.modules.clear();
        self.last_modified = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::{Classification, Eligibility};

    fn input(name: &str, level: i64, credits: i64, grade: i64) -> ModuleInput {
        ModuleInput {
            name: name.to_string(),
            level,
            credits,
            grade,
        }
    }

    fn fields(name: &str, level: i64, credits: i64, grade: i64) -> ModuleFields {
        input(name, level, credits, grade).validate().unwrap()
    }

    // ---- validation ----

    #[test]
    fn validate_accepts_well_formed_input() {
        let f = fields("  TM354 Software Engineering ", 3, 30, 2);
        assert_eq!(f.name, "TM354 Software Engineering");
        assert_eq!(f.module, Module::new(Level::Three, 30, Grade::Two));
    }

    #[test]
    fn validate_rejects_blank_name() {
        assert_eq!(input("   ", 2, 60, 1).validate(), Err(ModuleError::EmptyName));
    }

    #[test]
    fn validate_rejects_level_one_and_out_of_range_levels() {
        assert_eq!(
            input("M140", 1, 30, 1).validate(),
            Err(ModuleError::InvalidLevel { level: 1 })
        );
        assert_eq!(
            input("X", 300, 30, 1).validate(),
            Err(ModuleError::InvalidLevel { level: 300 })
        );
    }

    #[test]
    fn validate_rejects_non_positive_and_oversized_credits() {
        assert_eq!(
            input("X", 2, 0, 1).validate(),
            Err(ModuleError::NonPositiveCredits { credits: 0 })
        );
        assert_eq!(
            input("X", 2, -30, 1).validate(),
            Err(ModuleError::NonPositiveCredits { credits: -30 })
        );
        assert_eq!(
            input("X", 2, 241, 1).validate(),
            Err(ModuleError::CreditsOutOfRange { credits: 241 })
        );
    }

    #[test]
    fn validate_rejects_grades_outside_one_to_four() {
        assert_eq!(
            input("X", 3, 30, 0).validate(),
            Err(ModuleError::InvalidGrade { grade: 0 })
        );
        assert_eq!(
            input("X", 3, 30, 5).validate(),
            Err(ModuleError::InvalidGrade { grade: 5 })
        );
    }

    #[test]
    fn validate_module_ignores_missing_name() {
        let module = input("", 2, 15, 4).validate_module().unwrap();
        assert_eq!(module.credits, 15);
    }

    // ---- add / update / remove ----

    #[test]
    fn add_assigns_increasing_ids_in_insertion_order() {
        let mut store = ModuleStore::new();
        let a = store.add(fields("A", 2, 60, 1));
        let b = store.add(fields("B", 3, 60, 2));

        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        let names: Vec<_> = store.list().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn update_replaces_fields_in_place() {
        let mut store = ModuleStore::new();
        let a = store.add(fields("A", 2, 60, 1));
        store.add(fields("B", 3, 60, 2));

        let updated = store.update(a.id, fields("A2", 3, 30, 4)).unwrap();
        assert_eq!(updated.created_at, a.created_at);
        assert_eq!(store.list()[0].name, "A2");
        assert_eq!(store.list()[0].grade, Grade::Four);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let mut store = ModuleStore::new();
        let err = store.update(42, fields("A", 2, 60, 1)).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn remove_drops_only_the_matching_module() {
        let mut store = ModuleStore::new();
        let a = store.add(fields("A", 2, 60, 1));
        store.add(fields("B", 3, 60, 2));

        let removed = store.remove(a.id).unwrap();
        assert_eq!(removed.name, "A");
        assert_eq!(store.len(), 1);
        assert!(store.remove(a.id).unwrap_err().is_not_found());
    }

    #[test]
    fn ids_are_not_reused_after_removal() {
        let mut store = ModuleStore::new();
        store.add(fields("A", 2, 60, 1));
        let b = store.add(fields("B", 2, 60, 1));
        store.remove(b.id).unwrap();
        let c = store.add(fields("C", 2, 60, 1));
        assert_eq!(c.id, 3);
    }

    // ---- restore ----

    #[test]
    fn restore_orders_by_id_and_continues_numbering() {
        let mut source = ModuleStore::new();
        let a = source.add(fields("A", 2, 60, 1));
        let b = source.add(fields("B", 3, 60, 2));

        let mut store = ModuleStore::new();
        store.restore(vec![b.clone(), a.clone()]);

        assert_eq!(store.list(), &[a, b]);
        assert_eq!(store.add(fields("C", 3, 30, 1)).id, 3);
    }

    #[test]
    fn restore_empty_starts_at_one() {
        let mut store = ModuleStore::new();
        store.restore(Vec::new());
        assert!(store.is_empty());
        assert_eq!(store.add(fields("A", 2, 60, 1)).id, 1);
    }

    // ---- credits / forecast ----

    #[test]
    fn credits_by_level_tracks_mutations() {
        let mut store = ModuleStore::new();
        store.add(fields("A", 2, 60, 1));
        let b = store.add(fields("B", 3, 30, 1));
        assert_eq!(store.credits_by_level().total, 90);

        store.remove(b.id).unwrap();
        let credits = store.credits_by_level();
        assert_eq!(credits.level2, 60);
        assert_eq!(credits.level3, 0);
    }

    #[test]
    fn forecast_requires_both_levels_and_enough_credits() {
        let mut store = ModuleStore::new();
        assert_eq!(store.forecast().eligibility, Eligibility::NoModules);

        store.add(fields("L3a", 3, 60, 1));
        store.add(fields("L3b", 3, 60, 1));
        assert_eq!(store.forecast().eligibility, Eligibility::MissingLevel2);

        store.add(fields("L2a", 2, 60, 1));
        store.add(fields("L2b", 2, 60, 1));
        let forecast = store.forecast();
        let result = forecast.result.unwrap();
        assert_eq!(result.weighted_score, 360);
        assert_eq!(result.classification, Classification::First);
    }

    #[test]
    fn clear_empties_the_store() {
        let mut store = ModuleStore::new();
        store.add(fields("A", 2, 60, 1));
        store.clear();
        assert!(store.is_empty());
    }
}
