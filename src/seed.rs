//! Demo studio: instructors, classes, plans, accounts and two weeks of
//! timetable, loaded at startup when `SEED_DEMO_DATA` is on.
//!
//! Seeded `booked_count` values stand for walk-in bookings made outside
//! the ledger. Waitlist entries are real records held by walk-in guests,
//! so they can be promoted. The demo member's pack and bookings go
//! through the ledger so their credit balance is consistent with what
//! they hold.

use chrono::{DateTime, Duration, NaiveTime, Utc};

use crate::domain::catalog::{ClassCategory, Difficulty, FitnessClass, Instructor};
use crate::domain::membership::PlanType;
use crate::domain::{
    Actor, ClassId, InstructorId, MembershipPlan, PlanId, Role, Schedule, ScheduleId, User,
    UserId,
};
use crate::error::LedgerError;
use crate::service::{AccountService, LedgerService};

/// Seeded administrator login.
pub const ADMIN_EMAIL: &str = "admin@apexstudio.com";
/// Seeded member login.
pub const DEMO_EMAIL: &str = "demo@example.com";

/// Accounts created by [`load_demo_data`].
#[derive(Debug, Clone)]
pub struct DemoAccounts {
    /// The administrator.
    pub admin: User,
    /// The demo member holding a 10-class pack with three bookings.
    pub member: User,
}

const INSTRUCTORS: [(&str, &str, &[&str]); 6] = [
    (
        "Samantha Chen",
        "Certified yoga instructor with 8 years of experience in Vinyasa, Hatha, and Yin yoga.",
        &["Yoga", "Pilates", "Meditation"],
    ),
    (
        "Marcus Johnson",
        "Former professional athlete turned fitness coach.",
        &["HIIT", "Boxing", "Strength"],
    ),
    (
        "Jake Rivera",
        "Cycling enthusiast and certified spin instructor.",
        &["Spin", "HIIT", "Cardio"],
    ),
    (
        "Emma Williams",
        "Pilates master trainer and former ballet dancer.",
        &["Pilates", "Barre", "Yoga"],
    ),
    (
        "Carlos Mendez",
        "Ex-professional boxer with 15 years of training experience.",
        &["Boxing", "HIIT", "Strength"],
    ),
    (
        "Lily Park",
        "Dance artist and certified fitness instructor.",
        &["Barre", "Dance", "Yoga"],
    ),
];

struct ClassSeed {
    name: &'static str,
    description: &'static str,
    category: ClassCategory,
    duration_minutes: u32,
    capacity: u32,
    difficulty: Difficulty,
    instructor: usize,
}

const CLASSES: [ClassSeed; 10] = [
    ClassSeed {
        name: "Vinyasa Flow",
        description: "A dynamic, flowing yoga practice linking breath with movement.",
        category: ClassCategory::Yoga,
        duration_minutes: 60,
        capacity: 20,
        difficulty: Difficulty::Intermediate,
        instructor: 0,
    },
    ClassSeed {
        name: "Power HIIT",
        description: "High-intensity intervals to torch calories and build lean muscle.",
        category: ClassCategory::Hiit,
        duration_minutes: 45,
        capacity: 18,
        difficulty: Difficulty::Advanced,
        instructor: 1,
    },
    ClassSeed {
        name: "Rhythm Spin",
        description: "A heart-pumping cycling session choreographed to the beat.",
        category: ClassCategory::Spin,
        duration_minutes: 50,
        capacity: 24,
        difficulty: Difficulty::AllLevels,
        instructor: 2,
    },
    ClassSeed {
        name: "Core Pilates",
        description: "Precision mat work targeting your deep core muscles.",
        category: ClassCategory::Pilates,
        duration_minutes: 55,
        capacity: 16,
        difficulty: Difficulty::AllLevels,
        instructor: 3,
    },
    ClassSeed {
        name: "Boxing Cardio",
        description: "Real boxing technique and an incredible cardio workout.",
        category: ClassCategory::Boxing,
        duration_minutes: 60,
        capacity: 16,
        difficulty: Difficulty::Beginner,
        instructor: 4,
    },
    ClassSeed {
        name: "Ballet Barre",
        description: "Ballet-inspired movements at the barre to sculpt and lengthen.",
        category: ClassCategory::Barre,
        duration_minutes: 50,
        capacity: 16,
        difficulty: Difficulty::AllLevels,
        instructor: 5,
    },
    ClassSeed {
        name: "Strength Circuit",
        description: "Full-body strength training with barbells, dumbbells and kettlebells.",
        category: ClassCategory::Strength,
        duration_minutes: 60,
        capacity: 14,
        difficulty: Difficulty::Advanced,
        instructor: 1,
    },
    ClassSeed {
        name: "Yin Yoga",
        description: "Long-held poses to release deep connective tissue.",
        category: ClassCategory::Yoga,
        duration_minutes: 75,
        capacity: 20,
        difficulty: Difficulty::Beginner,
        instructor: 0,
    },
    ClassSeed {
        name: "Dance Fusion",
        description: "A high-energy mix of hip-hop, Latin and contemporary dance.",
        category: ClassCategory::Dance,
        duration_minutes: 60,
        capacity: 22,
        difficulty: Difficulty::Beginner,
        instructor: 5,
    },
    ClassSeed {
        name: "Mindful Meditation",
        description: "Guided meditation and breathwork to reduce stress.",
        category: ClassCategory::Meditation,
        duration_minutes: 45,
        capacity: 25,
        difficulty: Difficulty::AllLevels,
        instructor: 0,
    },
];

/// `(class, instructor, day offset, hour, minute, booked, waitlisted)`.
const TIMETABLE: [(usize, usize, i64, u32, u32, u32, u32); 47] = [
    (0, 0, 0, 6, 0, 12, 0),
    (1, 1, 0, 7, 0, 18, 2),
    (2, 2, 0, 9, 30, 20, 0),
    (3, 3, 0, 12, 0, 8, 0),
    (4, 4, 0, 17, 30, 15, 0),
    (5, 5, 0, 18, 30, 16, 0),
    (7, 0, 0, 19, 30, 6, 0),
    (1, 1, 1, 6, 0, 14, 0),
    (0, 0, 1, 7, 30, 10, 0),
    (6, 1, 1, 9, 0, 13, 0),
    (3, 3, 1, 12, 0, 6, 0),
    (2, 2, 1, 17, 0, 22, 0),
    (8, 5, 1, 18, 0, 15, 0),
    (9, 0, 1, 20, 0, 18, 0),
    (4, 4, 2, 6, 30, 10, 0),
    (5, 5, 2, 8, 0, 14, 0),
    (1, 1, 2, 12, 0, 18, 1),
    (0, 0, 2, 17, 30, 17, 0),
    (2, 2, 2, 19, 0, 20, 0),
    (7, 0, 3, 7, 0, 15, 0),
    (1, 1, 3, 9, 0, 16, 0),
    (3, 3, 3, 12, 30, 10, 0),
    (6, 1, 3, 17, 0, 12, 0),
    (8, 5, 3, 18, 30, 18, 0),
    (0, 0, 4, 6, 0, 8, 0),
    (4, 4, 4, 7, 30, 14, 0),
    (2, 2, 4, 17, 0, 21, 0),
    (5, 5, 4, 18, 0, 9, 0),
    (9, 0, 4, 19, 30, 22, 0),
    (1, 1, 5, 8, 0, 16, 0),
    (3, 3, 5, 10, 0, 14, 0),
    (8, 5, 5, 11, 0, 20, 0),
    (6, 1, 5, 16, 0, 10, 0),
    (0, 0, 6, 9, 0, 12, 0),
    (2, 2, 6, 10, 0, 19, 0),
    (7, 0, 6, 11, 30, 16, 0),
    (4, 4, 6, 14, 0, 8, 0),
    (1, 1, 7, 7, 0, 13, 0),
    (0, 0, 7, 9, 30, 10, 0),
    (5, 5, 7, 18, 0, 7, 0),
    (3, 3, 8, 12, 0, 4, 0),
    (6, 1, 9, 17, 0, 9, 0),
    (8, 5, 10, 18, 30, 14, 0),
    (2, 2, 11, 9, 0, 20, 0),
    (9, 0, 12, 20, 0, 11, 0),
    (1, 1, 13, 6, 30, 17, 0),
    (0, 0, 14, 7, 0, 8, 0),
];

/// Timetable rows the demo member holds a confirmed booking for.
const DEMO_BOOKINGS: [usize; 3] = [2, 8, 30];

/// Loads the demo studio into `ledger` and `accounts`.
///
/// # Errors
///
/// Returns a [`LedgerError`] if an account already exists or a ledger
/// operation on the demo member fails.
pub async fn load_demo_data(
    ledger: &LedgerService,
    accounts: &AccountService,
    now: DateTime<Utc>,
) -> Result<DemoAccounts, LedgerError> {
    let catalog = ledger.catalog();

    let mut instructor_ids = Vec::with_capacity(INSTRUCTORS.len());
    for (name, bio, specialties) in INSTRUCTORS {
        let id = InstructorId::new();
        catalog
            .upsert_instructor(Instructor {
                id,
                name: name.to_string(),
                bio: bio.to_string(),
                specialties: specialties.iter().map(ToString::to_string).collect(),
            })
            .await;
        instructor_ids.push(id);
    }

    let mut classes = Vec::with_capacity(CLASSES.len());
    for seed in &CLASSES {
        let instructor_id = pick(&instructor_ids, seed.instructor)?;
        let class = FitnessClass {
            id: ClassId::new(),
            name: seed.name.to_string(),
            description: seed.description.to_string(),
            category: seed.category,
            duration_minutes: seed.duration_minutes,
            capacity: seed.capacity,
            difficulty: seed.difficulty,
            instructor_id,
        };
        catalog.upsert_class(class.clone()).await;
        classes.push(class);
    }

    let pack_plan = PlanId::new();
    for plan in plans(pack_plan) {
        catalog.upsert_plan(plan).await;
    }

    let midnight = now.date_naive().and_time(NaiveTime::MIN).and_utc();
    let mut schedule_ids: Vec<ScheduleId> = Vec::with_capacity(TIMETABLE.len());
    for (class_idx, instructor_idx, day, hour, minute, booked, waitlisted) in TIMETABLE {
        let class = classes.get(class_idx).ok_or_else(|| {
            LedgerError::Internal(format!("timetable references class #{class_idx}"))
        })?;
        let instructor_id = pick(&instructor_ids, instructor_idx)?;
        let start = midnight
            + Duration::days(day)
            + Duration::hours(i64::from(hour))
            + Duration::minutes(i64::from(minute));
        let mut schedule = Schedule::new(
            class.id,
            instructor_id,
            start,
            start + Duration::minutes(i64::from(class.duration_minutes)),
            class.capacity,
        );
        schedule.booked_count = booked.min(class.capacity);
        let schedule_id = ledger.schedules().insert(schedule).await?;
        for _ in 0..waitlisted {
            let guest = Actor::customer(UserId::new());
            ledger.join_waitlist(Some(&guest), schedule_id).await?;
        }
        schedule_ids.push(schedule_id);
    }

    let admin = accounts
        .register(User::new(
            ADMIN_EMAIL,
            "Alex Morgan",
            Some("+1 (555) 000-0001".to_string()),
            Role::Admin,
        ))
        .await?;
    let member = accounts
        .register(User::new(
            DEMO_EMAIL,
            "Jordan Rivera",
            Some("+1 (555) 123-4567".to_string()),
            Role::Customer,
        ))
        .await?;

    let actor = member.actor();
    ledger.purchase_membership(Some(&actor), pack_plan).await?;
    for row in DEMO_BOOKINGS {
        let schedule_id = schedule_ids
            .get(row)
            .copied()
            .ok_or_else(|| LedgerError::Internal(format!("no timetable row #{row}")))?;
        ledger.book_class(Some(&actor), schedule_id).await?;
    }

    tracing::info!(
        admin = %admin.email,
        member = %member.email,
        instructors = instructor_ids.len(),
        classes = classes.len(),
        schedules = schedule_ids.len(),
        "demo data loaded"
    );
    Ok(DemoAccounts { admin, member })
}

fn pick(ids: &[InstructorId], idx: usize) -> Result<InstructorId, LedgerError> {
    ids.get(idx)
        .copied()
        .ok_or_else(|| LedgerError::Internal(format!("no seeded instructor #{idx}")))
}

fn plans(pack_plan: PlanId) -> [MembershipPlan; 3] {
    let features =
        |items: &[&str]| -> Vec<String> { items.iter().map(ToString::to_string).collect() };
    [
        MembershipPlan {
            id: PlanId::new(),
            name: "Drop-In Pass".to_string(),
            description: "Pay per session with no commitment.".to_string(),
            price_cents: 2_000,
            plan_type: PlanType::Dropin,
            credits: None,
            duration_days: None,
            features: features(&["Single class access", "All class types", "No commitment"]),
            popular: false,
        },
        MembershipPlan {
            id: pack_plan,
            name: "10-Class Pack".to_string(),
            description: "Best value for regulars. Use credits at your own pace.".to_string(),
            price_cents: 15_000,
            plan_type: PlanType::Pack,
            credits: Some(10),
            duration_days: Some(90),
            features: features(&["10 class credits", "Valid for 90 days", "Priority waitlist"]),
            popular: true,
        },
        MembershipPlan {
            id: PlanId::new(),
            name: "Unlimited Monthly".to_string(),
            description: "Unlimited classes all month.".to_string(),
            price_cents: 12_000,
            plan_type: PlanType::Unlimited,
            credits: None,
            duration_days: Some(30),
            features: features(&["Unlimited classes", "Month-to-month", "Guest pass (1/month)"]),
            popular: false,
        },
    ]
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::booking::BookingFilter;
    use crate::domain::schedule::ScheduleFilter;
    use crate::domain::{
        BookingStatus, Catalog, EventBus, LedgerPolicy, MembershipRegistry, ScheduleRegistry,
        UserRegistry,
    };

    #[tokio::test]
    async fn demo_member_holds_pack_with_three_bookings() {
        let ledger = LedgerService::new(
            Arc::new(ScheduleRegistry::new()),
            Arc::new(MembershipRegistry::new()),
            Arc::new(Catalog::new()),
            EventBus::new(64),
            LedgerPolicy::default(),
        );
        let accounts = AccountService::new(Arc::new(UserRegistry::new()), "admin123".to_string());

        let Ok(demo) = load_demo_data(&ledger, &accounts, Utc::now()).await else {
            panic!("seed should load");
        };
        assert_eq!(ledger.catalog().classes().await.len(), 10);
        assert_eq!(ledger.catalog().instructors().await.len(), 6);
        assert_eq!(ledger.plans().await.len(), 3);
        assert_eq!(ledger.schedules().len().await, TIMETABLE.len());

        let actor = demo.member.actor();
        let Ok(membership) = ledger.membership(Some(&actor)).await else {
            panic!("demo member should hold a membership");
        };
        assert_eq!(membership.credits_remaining, Some(7));
        assert_eq!(membership.credits_used, Some(3));
        assert_eq!(ledger.bookings_for_user(actor.user_id).await.len(), 3);
        assert!(demo.admin.actor().is_admin());
    }

    #[tokio::test]
    async fn seeded_waitlists_are_backed_by_records() {
        let ledger = LedgerService::new(
            Arc::new(ScheduleRegistry::new()),
            Arc::new(MembershipRegistry::new()),
            Arc::new(Catalog::new()),
            EventBus::new(64),
            LedgerPolicy::default(),
        );
        let accounts = AccountService::new(Arc::new(UserRegistry::new()), "admin123".to_string());
        tokio_test::assert_ok!(load_demo_data(&ledger, &accounts, Utc::now()).await);

        for schedule in ledger.list_schedules(&ScheduleFilter::default()).await {
            let waitlisted = ledger
                .schedules()
                .bookings(&BookingFilter {
                    status: Some(BookingStatus::Waitlist),
                    schedule_id: Some(schedule.id),
                    user_id: None,
                })
                .await;
            assert_eq!(waitlisted.len(), schedule.waitlist_count as usize);
        }
        let seeded: u32 = TIMETABLE.iter().map(|row| row.6).sum();
        let total: u32 = ledger
            .list_schedules(&ScheduleFilter::default())
            .await
            .iter()
            .map(|s| s.waitlist_count)
            .sum();
        assert_eq!(total, seeded);
    }
}
