//! Studio catalog: class definitions, instructors and membership plans.
//!
//! The catalog is read-mostly reference data. Schedules snapshot a class's
//! capacity at creation time, so later catalog edits never touch live
//! occupancy counters.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use utoipa::ToSchema;

use super::membership::MembershipPlan;
use super::{ClassId, InstructorId, PlanId};
use crate::error::LedgerError;

/// Class discipline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ClassCategory {
    /// Yoga.
    Yoga,
    /// High-intensity interval training.
    Hiit,
    /// Indoor cycling.
    Spin,
    /// Pilates.
    Pilates,
    /// Boxing.
    Boxing,
    /// Barre.
    Barre,
    /// Strength training.
    Strength,
    /// Dance.
    Dance,
    /// Meditation.
    Meditation,
}

/// Intended experience level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// New to the discipline.
    Beginner,
    /// Some experience.
    Intermediate,
    /// Experienced.
    Advanced,
    /// Suitable for everyone.
    AllLevels,
}

/// A class offering that schedules are created from.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FitnessClass {
    /// Class identifier.
    pub id: ClassId,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Discipline.
    pub category: ClassCategory,
    /// Length of one session in minutes.
    pub duration_minutes: u32,
    /// Default capacity for new schedules.
    pub capacity: u32,
    /// Experience level.
    pub difficulty: Difficulty,
    /// Usual instructor.
    pub instructor_id: InstructorId,
}

/// An instructor.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Instructor {
    /// Instructor identifier.
    pub id: InstructorId,
    /// Full name.
    pub name: String,
    /// Short biography.
    pub bio: String,
    /// Disciplines taught.
    pub specialties: Vec<String>,
}

/// In-memory catalog store.
#[derive(Debug, Default)]
pub struct Catalog {
    classes: RwLock<HashMap<ClassId, FitnessClass>>,
    instructors: RwLock<HashMap<InstructorId, Instructor>>,
    plans: RwLock<HashMap<PlanId, MembershipPlan>>,
}

impl Catalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a class definition.
    pub async fn upsert_class(&self, class: FitnessClass) {
        self.classes.write().await.insert(class.id, class);
    }

    /// Adds or replaces an instructor.
    pub async fn upsert_instructor(&self, instructor: Instructor) {
        self.instructors
            .write()
            .await
            .insert(instructor.id, instructor);
    }

    /// Adds or replaces a membership plan.
    pub async fn upsert_plan(&self, plan: MembershipPlan) {
        self.plans.write().await.insert(plan.id, plan);
    }

    /// Looks up a class definition.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ClassNotFound`] for an unknown id.
    pub async fn class(&self, id: ClassId) -> Result<FitnessClass, LedgerError> {
        self.classes
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(LedgerError::ClassNotFound(id))
    }

    /// Looks up an instructor.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InstructorNotFound`] for an unknown id.
    pub async fn instructor(&self, id: InstructorId) -> Result<Instructor, LedgerError> {
        self.instructors
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(LedgerError::InstructorNotFound(id))
    }

    /// Looks up a membership plan.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::PlanNotFound`] for an unknown id.
    pub async fn plan(&self, id: PlanId) -> Result<MembershipPlan, LedgerError> {
        self.plans
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(LedgerError::PlanNotFound(id))
    }

    /// All class definitions, sorted by name.
    pub async fn classes(&self) -> Vec<FitnessClass> {
        let mut classes: Vec<_> = self.classes.read().await.values().cloned().collect();
        classes.sort_by(|a, b| a.name.cmp(&b.name));
        classes
    }

    /// All instructors, sorted by name.
    pub async fn instructors(&self) -> Vec<Instructor> {
        let mut instructors: Vec<_> = self.instructors.read().await.values().cloned().collect();
        instructors.sort_by(|a, b| a.name.cmp(&b.name));
        instructors
    }

    /// All plans, cheapest first.
    pub async fn plans(&self) -> Vec<MembershipPlan> {
        let mut plans: Vec<_> = self.plans.read().await.values().cloned().collect();
        plans.sort_by_key(|p| p.price_cents);
        plans
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::membership::PlanType;

    fn class(name: &str, capacity: u32) -> FitnessClass {
        FitnessClass {
            id: ClassId::new(),
            name: name.to_string(),
            description: String::new(),
            category: ClassCategory::Yoga,
            duration_minutes: 60,
            capacity,
            difficulty: Difficulty::AllLevels,
            instructor_id: InstructorId::new(),
        }
    }

    #[tokio::test]
    async fn class_lookup() {
        let catalog = Catalog::new();
        let c = class("Vinyasa Flow", 20);
        let id = c.id;
        catalog.upsert_class(c).await;

        let Ok(found) = catalog.class(id).await else {
            panic!("class should exist");
        };
        assert_eq!(found.capacity, 20);
        assert!(matches!(
            catalog.class(ClassId::new()).await,
            Err(LedgerError::ClassNotFound(_))
        ));
    }

    #[tokio::test]
    async fn classes_sorted_by_name() {
        let catalog = Catalog::new();
        catalog.upsert_class(class("Yin Yoga", 20)).await;
        catalog.upsert_class(class("Barre", 16)).await;
        let names: Vec<_> = catalog
            .classes()
            .await
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Barre".to_string(), "Yin Yoga".to_string()]);
    }

    #[tokio::test]
    async fn plans_sorted_by_price() {
        let catalog = Catalog::new();
        for (name, price) in [("Pack", 15_000), ("Drop-In", 2_000)] {
            catalog
                .upsert_plan(MembershipPlan {
                    id: PlanId::new(),
                    name: name.to_string(),
                    description: String::new(),
                    price_cents: price,
                    plan_type: PlanType::Dropin,
                    credits: None,
                    duration_days: None,
                    features: vec![],
                    popular: false,
                })
                .await;
        }
        let plans = catalog.plans().await;
        assert_eq!(plans.first().map(|p| p.price_cents), Some(2_000));
        assert!(matches!(
            catalog.plan(PlanId::new()).await,
            Err(LedgerError::PlanNotFound(_))
        ));
    }
}
