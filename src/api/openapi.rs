//! OpenAPI document for the REST surface.

use utoipa::OpenApi;

use super::dto::{
    BookingListResponse, LoginRequest, PaginationMeta, PurchaseRequest, PurchaseResponse,
    ScheduleDto, SessionResponse, SignupRequest,
};
use super::handlers::{accounts, admin, bookings, catalog, memberships, schedules, system};
use crate::error::{ErrorBody, ErrorResponse};
use crate::persistence::models::StoredEvent;

/// Generated OpenAPI 3.1 document, served at `/api-docs/openapi.json`.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "Studio Ledger",
        description = "Booking, waitlist and membership ledger for a fitness studio. Authenticated requests carry the user id returned by login in the `x-user-id` header."
    ),
    paths(
        system::health_handler,
        accounts::signup,
        accounts::login,
        accounts::me,
        schedules::list_schedules,
        schedules::get_schedule,
        schedules::book_class,
        schedules::join_waitlist,
        schedules::leave_waitlist,
        bookings::my_bookings,
        bookings::get_booking,
        bookings::cancel_booking,
        memberships::list_plans,
        memberships::get_membership,
        memberships::purchase_membership,
        memberships::cancel_membership,
        catalog::list_classes,
        catalog::list_instructors,
        admin::add_schedule,
        admin::update_schedule,
        admin::delete_schedule,
        admin::cancel_scheduled_class,
        admin::list_bookings,
        admin::list_events,
    ),
    components(schemas(
        ErrorResponse,
        ErrorBody,
        SignupRequest,
        LoginRequest,
        SessionResponse,
        ScheduleDto,
        BookingListResponse,
        PaginationMeta,
        PurchaseRequest,
        PurchaseResponse,
        StoredEvent,
    )),
    tags(
        (name = "System", description = "Health"),
        (name = "Accounts", description = "Sign-up and login"),
        (name = "Schedules", description = "Timetable"),
        (name = "Bookings", description = "Booking, waitlist and cancellation"),
        (name = "Memberships", description = "Plans and memberships"),
        (name = "Catalog", description = "Classes and instructors"),
        (name = "Admin", description = "Timetable management and booking overview"),
    )
)]
pub struct ApiDoc;
