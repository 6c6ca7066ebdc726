//! Fixtures shared by the service tests.

use std::sync::Arc;

use chrono::{Duration, Utc};

use super::LedgerService;
use crate::domain::catalog::{ClassCategory, Difficulty, FitnessClass, Instructor};
use crate::domain::membership::PlanType;
use crate::domain::{
    Actor, Catalog, ClassId, EventBus, InstructorId, LedgerPolicy, MembershipPlan,
    MembershipRegistry, PlanId, Schedule, ScheduleId, ScheduleRegistry, UserId,
};

pub(crate) struct Fixture {
    pub service: LedgerService,
    pub class_id: ClassId,
    pub instructor_id: InstructorId,
    pub pack_plan: PlanId,
    pub unlimited_plan: PlanId,
}

pub(crate) async fn fixture(policy: LedgerPolicy) -> Fixture {
    let catalog = Arc::new(Catalog::new());
    let instructor_id = InstructorId::new();
    catalog
        .upsert_instructor(Instructor {
            id: instructor_id,
            name: "Sarah Johnson".to_string(),
            bio: String::new(),
            specialties: vec!["Yoga".to_string()],
        })
        .await;
    let class_id = ClassId::new();
    catalog
        .upsert_class(FitnessClass {
            id: class_id,
            name: "Vinyasa Flow".to_string(),
            description: String::new(),
            category: ClassCategory::Yoga,
            duration_minutes: 60,
            capacity: 20,
            difficulty: Difficulty::AllLevels,
            instructor_id,
        })
        .await;
    let pack_plan = PlanId::new();
    catalog
        .upsert_plan(MembershipPlan {
            id: pack_plan,
            name: "10-Class Pack".to_string(),
            description: String::new(),
            price_cents: 15_000,
            plan_type: PlanType::Pack,
            credits: Some(10),
            duration_days: Some(90),
            features: Vec::new(),
            popular: true,
        })
        .await;
    let unlimited_plan = PlanId::new();
    catalog
        .upsert_plan(MembershipPlan {
            id: unlimited_plan,
            name: "Unlimited".to_string(),
            description: String::new(),
            price_cents: 12_000,
            plan_type: PlanType::Unlimited,
            credits: None,
            duration_days: Some(30),
            features: Vec::new(),
            popular: false,
        })
        .await;

    let service = LedgerService::new(
        Arc::new(ScheduleRegistry::new()),
        Arc::new(MembershipRegistry::new()),
        catalog,
        EventBus::new(1000),
        policy,
    );
    Fixture {
        service,
        class_id,
        instructor_id,
        pack_plan,
        unlimited_plan,
    }
}

impl Fixture {
    /// Inserts a schedule starting `hours_ahead` from now.
    #[allow(clippy::panic)]
    pub async fn schedule(&self, capacity: u32, hours_ahead: i64) -> ScheduleId {
        let start = Utc::now() + Duration::hours(hours_ahead);
        let schedule = Schedule::new(
            self.class_id,
            self.instructor_id,
            start,
            start + Duration::hours(1),
            capacity,
        );
        let Ok(id) = self.service.schedules().insert(schedule).await else {
            panic!("insert should succeed");
        };
        id
    }
}

pub(crate) fn member() -> Actor {
    Actor::customer(UserId::new())
}

pub(crate) fn admin() -> Actor {
    Actor::admin(UserId::new())
}
