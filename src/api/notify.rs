//! Builds member notifications from ledger records and hands them to the
//! configured notifier.

use crate::app_state::AppState;
use crate::domain::{Booking, MembershipPlan, User};
use crate::integrations::notifier::dispatch;
use crate::integrations::Notification;

/// Which message a booking change produces.
#[derive(Debug, Clone, Copy)]
pub(crate) enum BookingNotice {
    Confirmed,
    Cancelled,
}

/// Sends a confirmation or cancellation for `booking`. Missing users,
/// schedules or catalog entries skip the message.
pub(crate) async fn booking(state: &AppState, booking: &Booking, notice: BookingNotice) {
    let Ok(user) = state.accounts.users().get(booking.user_id).await else {
        return;
    };
    let Ok(schedule) = state.ledger.schedule(booking.schedule_id).await else {
        return;
    };
    let catalog = state.ledger.catalog();
    let Ok(class) = catalog.class(schedule.class_id).await else {
        return;
    };
    let notification = match notice {
        BookingNotice::Confirmed => {
            let instructor = catalog
                .instructor(schedule.instructor_id)
                .await
                .map(|i| i.name)
                .unwrap_or_default();
            Notification::BookingConfirmation {
                email: user.email,
                name: user.name,
                class_name: class.name,
                start_time: schedule.start_time,
                instructor,
            }
        }
        BookingNotice::Cancelled => Notification::Cancellation {
            email: user.email,
            name: user.name,
            class_name: class.name,
            start_time: schedule.start_time,
        },
    };
    dispatch(&state.notifier, notification);
}

/// Sends the purchase confirmation for `plan`.
pub(crate) fn membership(state: &AppState, user: &User, plan: &MembershipPlan) {
    dispatch(
        &state.notifier,
        Notification::MembershipConfirmation {
            email: user.email.clone(),
            name: user.name.clone(),
            plan_name: plan.name.clone(),
            amount_cents: plan.price_cents,
        },
    );
}

/// Sends the welcome message to a new account.
pub(crate) fn welcome(state: &AppState, user: &User) {
    dispatch(
        &state.notifier,
        Notification::Welcome {
            email: user.email.clone(),
            name: user.name.clone(),
        },
    );
}
